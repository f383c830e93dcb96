use std::{
    fmt,
    ops::{BitAnd, BitOr, BitXor, Not},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Three-valued logic level carried by every wire of a circuit.
///
/// `Undef` is an ordinary value, not an error: it models a signal that is
/// unknown or has not settled yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bool3 {
    False,
    #[default]
    Undef,
    True,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("'{0}' is not a logic level (expected one of F, T, ?, 0, 1, X, U)")]
pub struct ParseBool3Error(pub String);

impl Bool3 {
    pub const ALL: [Bool3; 3] = [Bool3::False, Bool3::Undef, Bool3::True];

    pub fn is_defined(self) -> bool {
        self != Bool3::Undef
    }

    pub fn to_bool(self) -> Option<bool> {
        match self {
            Bool3::False => Some(false),
            Bool3::True => Some(true),
            Bool3::Undef => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Bool3::False => 'F',
            Bool3::Undef => '?',
            Bool3::True => 'T',
        }
    }

    /// Folds `AND` over a sequence, starting from `True`.
    pub fn all(values: impl IntoIterator<Item = Bool3>) -> Bool3 {
        values.into_iter().fold(Bool3::True, |acc, v| acc & v)
    }

    /// Folds `OR` over a sequence, starting from `False`.
    pub fn any(values: impl IntoIterator<Item = Bool3>) -> Bool3 {
        values.into_iter().fold(Bool3::False, |acc, v| acc | v)
    }

    /// Folds `XOR` over a sequence, starting from `False`.
    pub fn parity(values: impl IntoIterator<Item = Bool3>) -> Bool3 {
        values.into_iter().fold(Bool3::False, |acc, v| acc ^ v)
    }
}

impl From<bool> for Bool3 {
    fn from(value: bool) -> Self {
        if value { Bool3::True } else { Bool3::False }
    }
}

impl From<Option<bool>> for Bool3 {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Bool3::Undef, Bool3::from)
    }
}

impl TryFrom<char> for Bool3 {
    type Error = ParseBool3Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'F' | '0' => Ok(Bool3::False),
            'T' | '1' => Ok(Bool3::True),
            '?' | 'X' | 'U' => Ok(Bool3::Undef),
            _ => Err(ParseBool3Error(c.to_string())),
        }
    }
}

impl FromStr for Bool3 {
    type Err = ParseBool3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Bool3::try_from(c).map_err(|_| ParseBool3Error(s.to_owned())),
            _ => Err(ParseBool3Error(s.to_owned())),
        }
    }
}

impl fmt::Display for Bool3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Not for Bool3 {
    type Output = Bool3;

    fn not(self) -> Bool3 {
        match self {
            Bool3::False => Bool3::True,
            Bool3::Undef => Bool3::Undef,
            Bool3::True => Bool3::False,
        }
    }
}

impl BitAnd for Bool3 {
    type Output = Bool3;

    fn bitand(self, rhs: Bool3) -> Bool3 {
        match (self, rhs) {
            (Bool3::False, _) | (_, Bool3::False) => Bool3::False,
            (Bool3::True, Bool3::True) => Bool3::True,
            _ => Bool3::Undef,
        }
    }
}

impl BitOr for Bool3 {
    type Output = Bool3;

    fn bitor(self, rhs: Bool3) -> Bool3 {
        match (self, rhs) {
            (Bool3::True, _) | (_, Bool3::True) => Bool3::True,
            (Bool3::False, Bool3::False) => Bool3::False,
            _ => Bool3::Undef,
        }
    }
}

impl BitXor for Bool3 {
    type Output = Bool3;

    fn bitxor(self, rhs: Bool3) -> Bool3 {
        match (self.to_bool(), rhs.to_bool()) {
            (Some(a), Some(b)) => Bool3::from(a ^ b),
            _ => Bool3::Undef,
        }
    }
}
