//! The checkplugin crate evaluates measured values against nagios style threshold ranges and
//! produces the single output line and exit code a monitoring system expects from a check.
//!
//! ```rust
//! use checkplugin::{ServiceState, ThresholdEvaluator};
//!
//! let mut evaluator = ThresholdEvaluator::new();
//! evaluator.add_metric("cpu", 95.0, "%", "0:80", "0:90").unwrap();
//!
//! let evaluation = evaluator.render(false);
//! assert_eq!(evaluation.overall(), ServiceState::Critical);
//! assert_eq!(evaluation.exit_code(), 2);
//! assert_eq!(evaluation.summary_line(), "CRITICAL - cpu=95%;0:80;0:90");
//! ```

use std::fmt;
use std::str::FromStr;

#[macro_use]
mod macros;

mod evaluator;
mod helper;
mod range;
mod runner;

#[cfg(feature = "clap")]
pub mod cli;

pub use crate::evaluator::{Evaluation, Metric, ThresholdEvaluator};
pub use crate::helper::{exit_unknown, safe_run};
pub use crate::range::Range;
pub use crate::runner::{CheckOutcome, Runner};

/// Errors raised while building or evaluating a check.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid range spec \"{spec}\": {reason}")]
    InvalidRangeSpec { spec: String, reason: String },
    #[error("evaluator has already been rendered")]
    AlreadyFinalized,
    #[error("no metrics collected")]
    NoMetrics,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a service state from nagios.
///
/// The ordering is the aggregation order: `Ok < Warning < Critical < Unknown`. Unknown ranks
/// highest because it means the result itself can't be trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ServiceState {
    /// Returns the corresponding nagios exit code to signal the service state of self.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Warning => 1,
            ServiceState::Critical => 2,
            ServiceState::Unknown => 3,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceState::Ok => "OK",
            ServiceState::Warning => "WARNING",
            ServiceState::Critical => "CRITICAL",
            ServiceState::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Unit of measurement attached to a metric value.
///
/// Parsing never fails: anything that isn't one of the well known performance data units ends up
/// in `Other` and is rendered back verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    None,
    Seconds,
    Milliseconds,
    Microseconds,
    Percentage,
    Bytes,
    Kilobytes,
    Megabytes,
    Terabytes,
    Counter,
    Other(String),
}

impl FromStr for Unit {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "" => Unit::None,
            "s" => Unit::Seconds,
            "ms" => Unit::Milliseconds,
            "us" => Unit::Microseconds,
            "%" => Unit::Percentage,
            "B" => Unit::Bytes,
            "KB" => Unit::Kilobytes,
            "MB" => Unit::Megabytes,
            "TB" => Unit::Terabytes,
            "c" => Unit::Counter,
            other => Unit::Other(other.to_owned()),
        })
    }
}

impl From<&str> for Unit {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(unit) => unit,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::None => "",
            Unit::Seconds => "s",
            Unit::Milliseconds => "ms",
            Unit::Microseconds => "us",
            Unit::Percentage => "%",
            Unit::Bytes => "B",
            Unit::Kilobytes => "KB",
            Unit::Megabytes => "MB",
            Unit::Terabytes => "TB",
            Unit::Counter => "c",
            Unit::Other(s) => s,
        };
        f.write_str(s)
    }
}
