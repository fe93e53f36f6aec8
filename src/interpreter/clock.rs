//! Current-year source for commands that omit the year.

use chrono::{Datelike, Local};

/// Supplies the year used when a date clause has no year token.
///
/// The interpreter reads it once per call, so a single command never sees
/// two different years.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> u32;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> u32 {
        Local::now().year().max(0) as u32
    }
}

/// Frozen year, for tests and reproducible batch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn current_year(&self) -> u32 {
        self.0
    }
}
