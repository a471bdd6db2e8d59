//! Weekly activity bucketing: commit frequency and issue flow.
//!
//! Turns raw commit and issue timestamps into bounded, chronologically
//! sorted weekly series ready for charting. Everything here is pure and
//! synchronous; records arrive already fetched.

pub mod events;
pub mod series;
pub mod weeks;

pub use events::{EventKind, IssueRecord, RawEvent};
pub use series::{aggregate, ActivitySeries, BucketOptions};
