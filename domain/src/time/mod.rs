//! Time and date resolution anchored to a single configured timezone.

pub mod clock;
pub mod resolver;

pub use clock::{Clock, FixedClock, SystemClock};
pub use resolver::{DEFAULT_TIMEZONE, ResolvedDate, TimeParseError, TimeRange, TimeResolver};
