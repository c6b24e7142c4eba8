//! Backup entry naming

use std::fmt::{Display, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};

use crate::error::{BackupError, BackupResult};

/// Pattern used when the configured one cannot produce a usable name
pub const FALLBACK_DATE_FORMAT: &str = "%d%m%Y-%H%M%S";

/// Format `now` with a strftime pattern into a single path component
pub fn format_entry_name<Tz>(now: &DateTime<Tz>, pattern: &str) -> BackupResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(BackupError::Config(format!(
            "invalid date format pattern '{}'",
            pattern
        )));
    }

    let mut name = String::new();
    write!(name, "{}", now.format_with_items(items.iter()))
        .map_err(|_| BackupError::Config(format!("cannot format date with '{}'", pattern)))?;

    if name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
    {
        return Err(BackupError::Config(format!(
            "date format '{}' yields unusable name '{}'",
            pattern, name
        )));
    }

    Ok(name)
}

/// Name for this run's entry, falling back to [`FALLBACK_DATE_FORMAT`]
///
/// The flag is true when the fallback had to be used.
pub fn entry_name_or_fallback<Tz>(now: &DateTime<Tz>, pattern: &str) -> (String, bool)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match format_entry_name(now, pattern) {
        Ok(name) => (name, false),
        Err(e) => {
            tracing::debug!(error = %e, "falling back to default date format");
            (now.format(FALLBACK_DATE_FORMAT).to_string(), true)
        }
    }
}

/// Whether `name` has the shape produced by [`FALLBACK_DATE_FORMAT`]
pub fn matches_fallback_shape(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || b.is_ascii_digit())
}
