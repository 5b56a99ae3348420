use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A threshold range in nagios notation: `[@][start]:[end]`.
///
/// A missing bound is unbounded in that direction, `~` may be written for an unbounded start and
/// a bare number `n` means `0:n`. By default a value alerts when it lies *outside* the range, a
/// leading `@` makes it alert when it lies *inside*.
///
/// ```rust
/// # use checkplugin::Range;
/// let range: Range = "10:20".parse().unwrap();
/// assert!(!range.matches(15.0));
/// assert!(range.matches(25.0));
///
/// let inverted = Range::parse("@10:20").unwrap();
/// assert!(inverted.matches(15.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    start: Option<f64>,
    end: Option<f64>,
    inverted: bool,
}

impl Range {
    /// Creates a non-inverted range. Fails if both bounds are given and `start > end`, or a bound
    /// isn't finite.
    pub fn new(start: Option<f64>, end: Option<f64>) -> Result<Self> {
        let range = Range {
            start,
            end,
            inverted: false,
        };
        range.validate()?;
        Ok(range)
    }

    /// Parses a range from its textual notation.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidRangeSpec {
            spec: spec.to_owned(),
            reason: reason.to_owned(),
        };

        let (inverted, body) = match spec.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };

        if body.is_empty() {
            return Err(invalid("range is empty"));
        }

        let (start, end) = match body.split_once(':') {
            Some((start, end)) => {
                let start = match start {
                    "" | "~" => None,
                    s => Some(parse_bound(s).ok_or_else(|| invalid("start is not a number"))?),
                };
                let end = match end {
                    "" => None,
                    s => Some(parse_bound(s).ok_or_else(|| invalid("end is not a number"))?),
                };
                (start, end)
            }
            None => {
                let end = parse_bound(body).ok_or_else(|| invalid("not a number"))?;
                (Some(0.0), Some(end))
            }
        };

        let range = Range {
            start,
            end,
            inverted,
        };
        range.validate().map_err(|_| invalid("start is greater than end"))?;
        Ok(range)
    }

    /// Returns the same range with inside/outside alerting swapped.
    pub fn inverted(mut self) -> Self {
        self.inverted = !self.inverted;
        self
    }

    pub fn start(&self) -> Option<f64> {
        self.start
    }

    pub fn end(&self) -> Option<f64> {
        self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Returns true if `value` should raise an alert for this range.
    pub fn matches(&self, value: f64) -> bool {
        let start = self.start.unwrap_or(f64::NEG_INFINITY);
        let end = self.end.unwrap_or(f64::INFINITY);
        let inside = start <= value && value <= end;

        if self.inverted {
            inside
        } else {
            !inside
        }
    }

    fn validate(&self) -> Result<()> {
        let finite = |bound: Option<f64>| bound.map_or(true, f64::is_finite);
        if !finite(self.start) || !finite(self.end) {
            return Err(Error::InvalidRangeSpec {
                spec: self.to_string(),
                reason: "bounds must be finite numbers".to_owned(),
            });
        }

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(Error::InvalidRangeSpec {
                    spec: self.to_string(),
                    reason: "start is greater than end".to_owned(),
                });
            }
        }

        Ok(())
    }
}

// `f64::from_str` also takes "inf" and "NaN", neither is a usable threshold.
fn parse_bound(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl FromStr for Range {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Range::parse(s)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("@")?;
        }
        match self.start {
            Some(start) => write!(f, "{start}:")?,
            None => f.write_str("~:")?,
        }
        if let Some(end) = self.end {
            write!(f, "{end}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Range};

    fn is_invalid(spec: &str) -> bool {
        matches!(Range::parse(spec), Err(Error::InvalidRangeSpec { .. }))
    }

    #[test]
    fn test_parse() {
        let range = Range::parse("10:20").unwrap();
        assert_eq!(range.start(), Some(10.0));
        assert_eq!(range.end(), Some(20.0));
        assert!(!range.is_inverted());

        let range = Range::parse("@10:20").unwrap();
        assert_eq!(range.start(), Some(10.0));
        assert_eq!(range.end(), Some(20.0));
        assert!(range.is_inverted());

        let range = Range::parse("80").unwrap();
        assert_eq!(range.start(), Some(0.0));
        assert_eq!(range.end(), Some(80.0));

        let range = Range::parse("10:").unwrap();
        assert_eq!(range.start(), Some(10.0));
        assert_eq!(range.end(), None);

        let range = Range::parse("~:10").unwrap();
        assert_eq!(range.start(), None);
        assert_eq!(range.end(), Some(10.0));

        let range = Range::parse(":10").unwrap();
        assert_eq!(range.start(), None);

        let range = Range::parse("-5.5:1e2").unwrap();
        assert_eq!(range.start(), Some(-5.5));
        assert_eq!(range.end(), Some(100.0));

        let range = Range::parse("5:5").unwrap();
        assert_eq!(range.start(), range.end());
    }

    #[test]
    fn test_parse_invalid() {
        for spec in [
            "abc", "20:10", "", "@", "1:2:3", "a:10", "10:b", "~", "10:~", "inf", "0:NaN", "-5",
            " 10:20", "@@10:20",
        ] {
            assert!(is_invalid(spec), "{spec:?} should be rejected");
        }
    }

    #[test]
    fn test_matches_outside() {
        let range = Range::parse("10:20").unwrap();
        for value in [10.0, 10.5, 15.0, 20.0] {
            assert!(!range.matches(value), "{value} is inside");
        }
        for value in [-1.0, 9.999, 20.001, 1e9] {
            assert!(range.matches(value), "{value} is outside");
        }

        let range = Range::parse("10:").unwrap();
        assert!(!range.matches(1e300));
        assert!(range.matches(9.0));

        let range = Range::parse("~:10").unwrap();
        assert!(!range.matches(-1e300));
        assert!(range.matches(11.0));
    }

    #[test]
    fn test_matches_inverted() {
        let plain = Range::parse("10:20").unwrap();
        let inverted = Range::parse("@10:20").unwrap();
        assert_eq!(plain.inverted(), inverted);

        for value in [-3.0, 9.0, 10.0, 12.5, 20.0, 21.0] {
            assert_eq!(inverted.matches(value), !plain.matches(value));
        }
    }

    #[test]
    fn test_new() {
        let range = Range::new(Some(0.0), Some(80.0)).unwrap();
        assert_eq!(range, Range::parse("0:80").unwrap());
        assert!(Range::new(None, None).is_ok());
        assert!(Range::new(Some(2.0), Some(1.0)).is_err());
        assert!(Range::new(Some(f64::NAN), None).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Range::parse("10:20").unwrap().to_string(), "10:20");
        assert_eq!(Range::parse("@10:20").unwrap().to_string(), "@10:20");
        assert_eq!(Range::parse("80").unwrap().to_string(), "0:80");
        assert_eq!(Range::parse(":10").unwrap().to_string(), "~:10");
        assert_eq!(Range::parse("1.5:").unwrap().to_string(), "1.5:");
    }
}
