//! Run journal
//!
//! Every finished run is appended to `runs.jsonl` in the tool directory as a
//! single JSON line, so operators can see what earlier runs did without
//! digging through server logs.
//!
//! - `RunRecord`: one finished run
//! - `RunJournal`: append and read the journal file

mod record;
mod writer;

pub use record::RunRecord;
pub use writer::RunJournal;
