use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};

/// Errors decoding a signed source reference
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// `0` names neither a gate nor an external input
    #[error("source id 0 is not a gate or an input")]
    Zero,
}
pub type SourceError = Error;

/// 1-based position of a gate inside its circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GateId(pub usize);

/// 1-based index of an external circuit input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InputId(pub usize);

/// 1-based index of a circuit output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputId(pub usize);

macro_rules! impl_id {
    ($($t:ident),*) => {$(
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Deref for $t {
            type Target = usize;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl $t {
            /// Zero-based slot for this id, `None` for the invalid id 0.
            pub fn index(self) -> Option<usize> {
                self.0.checked_sub(1)
            }
        }
    )*};
}

impl_id!(GateId, InputId, OutputId);

/// Where a gate input or a circuit output takes its value from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Gate(GateId),
    Input(InputId),
}

impl Source {
    pub fn gate(id: usize) -> Self {
        Source::Gate(GateId(id))
    }

    pub fn input(id: usize) -> Self {
        Source::Input(InputId(id))
    }

    /// Decodes the signed form used in circuit files: `k > 0` is gate `k`,
    /// `-k` is external input `k`.
    pub fn from_raw(raw: i64) -> Result<Self, SourceError> {
        match raw {
            0 => Err(Error::Zero),
            k if k > 0 => Ok(Source::gate(k.unsigned_abs() as usize)),
            k => Ok(Source::input(k.unsigned_abs() as usize)),
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            Source::Gate(GateId(k)) => k as i64,
            Source::Input(InputId(k)) => -(k as i64),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_encoding() {
        assert_eq!(Source::from_raw(3), Ok(Source::gate(3)));
        assert_eq!(Source::from_raw(-1), Ok(Source::input(1)));
        assert_eq!(Source::from_raw(-2), Ok(Source::input(2)));
        assert_eq!(Source::from_raw(0), Err(SourceError::Zero));
        assert_eq!(Source::input(4).to_raw(), -4);
        assert_eq!(Source::gate(7).to_string(), "7");
    }

    #[test]
    fn test_id_index() {
        assert_eq!(GateId(1).index(), Some(0));
        assert_eq!(GateId(0).index(), None);
        assert_eq!(*OutputId(5), 5);
    }
}
