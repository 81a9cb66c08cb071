// vim: tw=80
//! Call-count cardinalities, used by verification.

use std::{
    fmt,
    ops::{Range, RangeFrom, RangeInclusive, RangeTo, RangeToInclusive}
};

/// How many times a member is expected to have been invoked.
///
/// # Examples
/// ```
/// # use understudy::Times;
/// assert!(Times::between(2, 4).validate(4));
/// assert!(!Times::once().validate(2));
/// assert_eq!("at least 2 times", Times::at_least(2).to_string());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Times {
    Once,
    Never,
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
    /// Inclusive at both ends
    Between(usize, usize),
}

impl Times {
    pub fn once() -> Self {
        Times::Once
    }

    pub fn never() -> Self {
        Times::Never
    }

    pub fn exactly(n: usize) -> Self {
        Times::Exactly(n)
    }

    pub fn at_least(n: usize) -> Self {
        Times::AtLeast(n)
    }

    pub fn at_least_once() -> Self {
        Times::AtLeast(1)
    }

    pub fn at_most(n: usize) -> Self {
        Times::AtMost(n)
    }

    pub fn at_most_once() -> Self {
        Times::AtMost(1)
    }

    /// # Panics
    ///
    /// If `from` is greater than `to`.
    pub fn between(from: usize, to: usize) -> Self {
        assert!(from <= to, "Times::between({}, {}) is an empty range",
            from, to);
        Times::Between(from, to)
    }

    /// The inclusive bounds this cardinality accepts.
    pub fn bounds(&self) -> (usize, usize) {
        match *self {
            Times::Once => (1, 1),
            Times::Never => (0, 0),
            Times::Exactly(n) => (n, n),
            Times::AtLeast(n) => (n, usize::MAX),
            Times::AtMost(n) => (0, n),
            Times::Between(m, n) => (m, n),
        }
    }

    /// Does `count` satisfy this cardinality?
    pub fn validate(&self, count: usize) -> bool {
        let (lo, hi) = self.bounds();
        lo <= count && count <= hi
    }

    /// Is exactly one call count acceptable?
    pub fn is_exact(&self) -> bool {
        let (lo, hi) = self.bounds();
        lo == hi
    }
}

impl Default for Times {
    /// Verification without an explicit cardinality means "at least once".
    fn default() -> Self {
        Times::at_least_once()
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn plural(n: usize) -> &'static str {
            if n == 1 { "time" } else { "times" }
        }
        match *self {
            Times::Once => f.write_str("exactly once"),
            Times::Never => f.write_str("should never have been performed"),
            Times::Exactly(n) => write!(f, "exactly {} {}", n, plural(n)),
            Times::AtLeast(1) => f.write_str("at least once"),
            Times::AtLeast(n) => write!(f, "at least {} {}", n, plural(n)),
            Times::AtMost(1) => f.write_str("at most once"),
            Times::AtMost(n) => write!(f, "at most {} {}", n, plural(n)),
            Times::Between(m, n) =>
                write!(f, "between {} and {} times (inclusive)", m, n),
        }
    }
}

impl From<usize> for Times {
    fn from(n: usize) -> Self {
        Times::Exactly(n)
    }
}

impl From<Range<usize>> for Times {
    /// The end is exclusive.
    ///
    /// # Panics
    ///
    /// If the range is empty.
    fn from(r: Range<usize>) -> Self {
        assert!(r.start < r.end, "Times::from({:?}) is an empty range", r);
        Times::between(r.start, r.end - 1)
    }
}

impl From<RangeInclusive<usize>> for Times {
    fn from(r: RangeInclusive<usize>) -> Self {
        Times::between(*r.start(), *r.end())
    }
}

impl From<RangeFrom<usize>> for Times {
    fn from(r: RangeFrom<usize>) -> Self {
        Times::AtLeast(r.start)
    }
}

impl From<RangeTo<usize>> for Times {
    fn from(r: RangeTo<usize>) -> Self {
        assert!(r.end > 0, "Times::from({:?}) is an empty range", r);
        Times::AtMost(r.end - 1)
    }
}

impl From<RangeToInclusive<usize>> for Times {
    fn from(r: RangeToInclusive<usize>) -> Self {
        Times::AtMost(r.end)
    }
}
