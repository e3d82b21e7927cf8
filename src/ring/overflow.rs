use core::fmt;
use core::str::FromStr;

use const_default::ConstDefault;

/// The behavior of a full [`RingBuffer`](super::RingBuffer) when another
/// value is pushed.
///
/// Parses from and displays as `"reject"` or `"evict-oldest"`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Overflow {
    /// Refuse the new value.
    #[default]
    Reject,
    /// Drop the oldest value to make room for the new one.
    EvictOldest,
}

impl Overflow {
    /// The configuration name of this policy.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::EvictOldest => "evict-oldest",
        }
    }
}

impl ConstDefault for Overflow {
    const DEFAULT: Self = Self::Reject;
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Overflow {
    type Err = ParseOverflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "evict-oldest" => Ok(Self::EvictOldest),
            _ => Err(ParseOverflowError),
        }
    }
}

/// The error returned when parsing an unrecognized [`Overflow`] name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOverflowError;

impl fmt::Display for ParseOverflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unrecognized overflow policy")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseOverflowError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn overflow_parse() {
        assert_eq!("reject".parse(), Ok(Overflow::Reject));
        assert_eq!("evict-oldest".parse(), Ok(Overflow::EvictOldest));
        assert_eq!("evict".parse::<Overflow>(), Err(ParseOverflowError));
        assert_eq!(Overflow::EvictOldest.to_string(), "evict-oldest");
        assert_eq!(Overflow::DEFAULT, Overflow::default());
    }
}
