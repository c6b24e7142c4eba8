//! Worlds still waiting to be copied during a run

use std::collections::VecDeque;

/// Ordered worlds pending copy, consumed front to back
///
/// Each world is taken out exactly once, so whatever is left after a run is
/// the set of worlds that were never attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldQueue {
    pending: VecDeque<String>,
}

impl WorldQueue {
    pub fn new<I, S>(worlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: worlds.into_iter().map(Into::into).collect(),
        }
    }

    /// Take the next world to process
    pub fn next_world(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Worlds not yet taken, in order
    pub fn remaining(&self) -> Vec<String> {
        self.pending.iter().cloned().collect()
    }
}
