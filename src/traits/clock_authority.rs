//! Real-time clock seam. The orchestrator is the only writer (on every fix)
//! and the only reader (once per frame assembly).
use crate::telemetry::types::DateTime;

/// Settable/gettable wall-clock authority (hardware RTC on target).
pub trait ClockAuthority {
    type Error: core::fmt::Debug;

    /// Overwrite the current date and time.
    fn set(&mut self, now: &DateTime) -> Result<(), Self::Error>;

    /// Read the current date and time.
    fn get(&mut self) -> Result<DateTime, Self::Error>;
}
