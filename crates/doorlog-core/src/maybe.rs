//! Result of a query the device may not answer.

use serde::{Deserialize, Serialize};

/// Value reported by the device, or `Unknown` when it did not answer in time
///
/// A silent device is expected during interviews, so this is a value, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaybeKnown<T> {
    /// Device answered
    Known(T),
    /// Device did not answer
    Unknown,
}

impl<T> MaybeKnown<T> {
    /// True if the device answered
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Convert to `Option`, dropping the distinction from `None` values
    pub fn known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown => None,
        }
    }

    /// Map the known value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MaybeKnown<U> {
        match self {
            Self::Known(value) => MaybeKnown::Known(f(value)),
            Self::Unknown => MaybeKnown::Unknown,
        }
    }

    /// Borrow the known value
    pub fn as_ref(&self) -> MaybeKnown<&T> {
        match self {
            Self::Known(value) => MaybeKnown::Known(value),
            Self::Unknown => MaybeKnown::Unknown,
        }
    }
}

impl<T> From<Option<T>> for MaybeKnown<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}
