use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown gate type '{0}' (expected NT, AN, NA, OR, NO, XO or NX)")]
pub struct UnknownGateType(pub String);

/// The seven logic functions a gate can compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateType {
    Not,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Nxor,
}

impl GateType {
    pub const ALL: [GateType; 7] = [
        GateType::Not,
        GateType::And,
        GateType::Nand,
        GateType::Or,
        GateType::Nor,
        GateType::Xor,
        GateType::Nxor,
    ];

    /// Two-letter tag used by the circuit text format.
    pub const fn name(self) -> &'static str {
        match self {
            GateType::Not => "NT",
            GateType::And => "AN",
            GateType::Nand => "NA",
            GateType::Or => "OR",
            GateType::Nor => "NO",
            GateType::Xor => "XO",
            GateType::Nxor => "NX",
        }
    }

    /// Whether the gate output is the negation of its base function.
    pub const fn is_inverted(self) -> bool {
        matches!(
            self,
            GateType::Not | GateType::Nand | GateType::Nor | GateType::Nxor
        )
    }

    /// Checks an arity against the kind: `NT` takes exactly one input,
    /// everything else at least two.
    pub const fn accepts_arity(self, arity: usize) -> bool {
        match self {
            GateType::Not => arity == 1,
            _ => arity >= 2,
        }
    }
}

impl FromStr for GateType {
    type Err = UnknownGateType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(UnknownGateType(s.to_owned()));
        }
        let upper = s.to_ascii_uppercase();
        GateType::ALL
            .into_iter()
            .find(|t| t.name() == upper)
            .ok_or_else(|| UnknownGateType(s.to_owned()))
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
