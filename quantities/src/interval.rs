use std::fmt::{Debug, Formatter};

use chrono::{DateTime, Utc};

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Utc>,

    /// Exclusive.
    pub end: DateTime<Utc>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(self, other: DateTime<Utc>) -> bool {
        (self.start <= other) && (other < self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("2025-01-01T{hour:02}:00:00Z")).unwrap().to_utc()
    }

    #[test]
    fn test_contains_is_half_open() {
        let interval = Interval::new(at(10), at(11));
        assert!(interval.contains(at(10)));
        assert!(!interval.contains(at(11)));
        assert!(!interval.contains(at(9)));
    }
}
