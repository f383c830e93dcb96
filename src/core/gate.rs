use serde::{Deserialize, Serialize};

use crate::{Bool3, GateType};


/// Errors that can occur while evaluating a gate
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The number of input values does not match the gate arity
    #[error("gate {gate_type} expects {expected} inputs, got {got}")]
    ArityMismatch {
        gate_type: GateType,
        expected: usize,
        got: usize,
    },
}
pub type GateError = Error;

/// A single logic gate with a fixed arity and the output of its last
/// evaluation.
///
/// The arity is fixed at construction. A circuit that needs a different
/// kind or arity replaces the whole gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    gate_type: GateType,
    arity: usize,
    #[serde(skip)]
    output: Bool3,
}

impl Gate {
    /// Builds a gate of the given kind.
    ///
    /// `NT` always gets one input and ignores `arity`. Other kinds given an
    /// arity below 2 end up with arity 0, a placeholder a circuit never
    /// accepts.
    pub fn new(gate_type: GateType, arity: usize) -> Self {
        let arity = match gate_type {
            GateType::Not => 1,
            _ if arity < 2 => 0,
            _ => arity,
        };
        Self {
            gate_type,
            arity,
            output: Bool3::Undef,
        }
    }

    pub fn not() -> Self {
        Self::new(GateType::Not, 1)
    }

    pub fn and(arity: usize) -> Self {
        Self::new(GateType::And, arity)
    }

    pub fn nand(arity: usize) -> Self {
        Self::new(GateType::Nand, arity)
    }

    pub fn or(arity: usize) -> Self {
        Self::new(GateType::Or, arity)
    }

    pub fn nor(arity: usize) -> Self {
        Self::new(GateType::Nor, arity)
    }

    pub fn xor(arity: usize) -> Self {
        Self::new(GateType::Xor, arity)
    }

    pub fn nxor(arity: usize) -> Self {
        Self::new(GateType::Nxor, arity)
    }

    pub fn gate_type(&self) -> GateType {
        self.gate_type
    }

    pub fn name(&self) -> &'static str {
        self.gate_type.name()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_usable(&self) -> bool {
        self.arity > 0
    }

    pub fn is_valid_pin(&self, pin: usize) -> bool {
        pin < self.arity
    }

    pub fn output(&self) -> Bool3 {
        self.output
    }

    pub fn set_output(&mut self, value: Bool3) {
        self.output = value;
    }

    /// Computes the gate function over `inputs` and caches the result.
    ///
    /// On an arity mismatch the cached output becomes `Undef` and an error
    /// is returned; the arity itself never changes.
    pub fn evaluate(&mut self, inputs: &[Bool3]) -> Result<Bool3, GateError> {
        self.output = Bool3::Undef;

        if inputs.len() != self.arity {
            return Err(Error::ArityMismatch {
                gate_type: self.gate_type,
                expected: self.arity,
                got: inputs.len(),
            });
        }

        self.output = self.execute(inputs);
        Ok(self.output)
    }

    /// Pure gate function, no arity check and no caching.
    pub fn execute(&self, inputs: &[Bool3]) -> Bool3 {
        let values = inputs.iter().copied();
        let base = match self.gate_type {
            GateType::Not => inputs.first().copied().unwrap_or_default(),
            GateType::And | GateType::Nand => Bool3::all(values),
            GateType::Or | GateType::Nor => Bool3::any(values),
            GateType::Xor | GateType::Nxor => Bool3::parity(values),
        };

        if self.gate_type.is_inverted() {
            !base
        } else {
            base
        }
    }
}
