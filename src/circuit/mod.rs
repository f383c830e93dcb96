//! Combinational circuit container.
//!
//! A [`Circuit`] owns its gates by value, addressed by 1-based position,
//! together with the source of every gate input and every circuit output.
//! It is built empty, sized with [`Circuit::resize`], populated gate by gate,
//! then simulated any number of times (see `simulate.rs`).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Bool3, Gate, GateError, GateId, GateType, OutputId, Source, UnknownGateType};

mod simulate;
pub mod text;


pub use simulate::TruthRow;

/// Errors raised by circuit construction, validation and simulation
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("circuit dimensions must be positive (inputs {inputs}, outputs {outputs}, gates {gates})")]
    InvalidDimensions {
        inputs: usize,
        outputs: usize,
        gates: usize,
    },
    #[error("gate id {0} is out of range")]
    InvalidGateId(GateId),
    #[error("output id {0} is out of range")]
    InvalidOutputId(OutputId),
    #[error(transparent)]
    UnknownGateType(#[from] UnknownGateType),
    #[error("gate {gate_type} cannot have {arity} inputs")]
    InvalidArity { gate_type: GateType, arity: usize },
    #[error("cannot allocate storage for {0} entries")]
    TooLarge(usize),
    #[error("gate {0} has no type")]
    UndefinedGate(GateId),
    #[error("gate {gate} has no input pin {pin}")]
    InvalidPin { gate: GateId, pin: usize },
    #[error("source {0} does not name a gate or an input of this circuit")]
    InvalidSource(Source),
    #[error("input pin {pin} of gate {gate} is not connected")]
    UnsetGateInput { gate: GateId, pin: usize },
    #[error("output {0} is not connected")]
    UnsetOutput(OutputId),
    #[error("gate {gate} has {arity} inputs but {pins} input sources")]
    PinCountMismatch {
        gate: GateId,
        arity: usize,
        pins: usize,
    },
    #[error("circuit has {outputs} outputs but caches {values} output values")]
    OutputCountMismatch { outputs: usize, values: usize },
    #[error("expected {expected} input values, got {got}")]
    InputCountMismatch { expected: usize, got: usize },
    #[error("truth table over {inputs} inputs exceeds the limit of {max}")]
    TooManyInputs { inputs: usize, max: usize },
    #[error("gate {gate} failed to evaluate")]
    Gate {
        gate: GateId,
        #[source]
        source: GateError,
    },
}
pub type CircuitError = Error;

/// `len` copies of `value`, or `TooLarge` if the storage cannot be reserved.
fn try_filled<T: Clone>(value: T, len: usize) -> Result<Vec<T>, CircuitError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::TooLarge(len))?;
    v.resize(len, value);
    Ok(v)
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Circuit {
    num_inputs: usize,
    /// `None` marks a gate whose type has not been set yet
    gates: Vec<Option<Gate>>,
    /// Per gate, one source per input pin
    gate_inputs: Vec<Vec<Option<Source>>>,
    output_sources: Vec<Option<Source>>,
    /// Output values from the last successful simulation
    outputs: Vec<Bool3>,
}

impl Circuit {
    /// Empty circuit with the given dimensions, see [`Circuit::resize`].
    pub fn new(inputs: usize, outputs: usize, gates: usize) -> Result<Self, CircuitError> {
        let mut circuit = Self::default();
        circuit.resize(inputs, outputs, gates)?;
        Ok(circuit)
    }

    /// Drops every gate and connection, leaving a zero-sized circuit.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Discards all content and allocates fresh, unconnected storage.
    ///
    /// Any zero dimension is rejected and leaves the circuit unchanged.
    pub fn resize(
        &mut self,
        inputs: usize,
        outputs: usize,
        gates: usize,
    ) -> Result<(), CircuitError> {
        if inputs == 0 || outputs == 0 || gates == 0 {
            return Err(Error::InvalidDimensions {
                inputs,
                outputs,
                gates,
            });
        }

        let fresh = Self {
            num_inputs: inputs,
            gates: try_filled(None, gates)?,
            gate_inputs: try_filled(Vec::new(), gates)?,
            output_sources: try_filled(None, outputs)?,
            outputs: try_filled(Bool3::Undef, outputs)?,
        };
        *self = fresh;
        Ok(())
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.output_sources.len()
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn is_valid_gate_id(&self, id: GateId) -> bool {
        (1..=self.num_gates()).contains(&id.0)
    }

    pub fn is_valid_output_id(&self, id: OutputId) -> bool {
        (1..=self.num_outputs()).contains(&id.0)
    }

    pub fn is_defined_gate(&self, id: GateId) -> bool {
        self.gate(id).is_some()
    }

    /// Whether `source` resolves to a gate or an external input of this
    /// circuit.
    pub fn is_valid_source(&self, source: Source) -> bool {
        match source {
            Source::Gate(id) => self.is_valid_gate_id(id),
            Source::Input(id) => (1..=self.num_inputs).contains(&id.0),
        }
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id.index()?)?.as_ref()
    }

    pub fn gates(&self) -> impl Iterator<Item = (GateId, Option<&Gate>)> {
        self.gates
            .iter()
            .enumerate()
            .map(|(i, g)| (GateId(i + 1), g.as_ref()))
    }

    pub fn gate_type(&self, id: GateId) -> Option<GateType> {
        self.gate(id).map(Gate::gate_type)
    }

    pub fn gate_name(&self, id: GateId) -> Option<&'static str> {
        self.gate(id).map(Gate::name)
    }

    pub fn gate_arity(&self, id: GateId) -> Option<usize> {
        self.gate(id).map(Gate::arity)
    }

    /// Cached output of a gate from the last simulation.
    pub fn gate_output(&self, id: GateId) -> Option<Bool3> {
        self.gate(id).map(Gate::output)
    }

    pub fn gate_input(&self, id: GateId, pin: usize) -> Option<Source> {
        *self.gate_inputs.get(id.index()?)?.get(pin)?
    }

    pub fn gate_inputs(&self, id: GateId) -> Option<&[Option<Source>]> {
        self.gate_inputs.get(id.index()?).map(Vec::as_slice)
    }

    pub fn output_source(&self, id: OutputId) -> Option<Source> {
        *self.output_sources.get(id.index()?)?
    }

    pub fn output(&self, id: OutputId) -> Option<Bool3> {
        self.outputs.get(id.index()?).copied()
    }

    pub fn outputs(&self) -> &[Bool3] {
        &self.outputs
    }

    /// Sets gate `id` from a two-letter tag such as `"AN"` or `"nx"`.
    pub fn set_gate(&mut self, id: GateId, tag: &str, arity: usize) -> Result<(), CircuitError> {
        if !self.is_valid_gate_id(id) {
            return Err(Error::InvalidGateId(id));
        }
        let gate_type = tag.parse::<GateType>()?;
        self.set_gate_type(id, gate_type, arity)
    }

    /// Replaces gate `id` with a fresh gate of the given kind and arity.
    ///
    /// The gate's input sources are reset to unconnected.
    pub fn set_gate_type(
        &mut self,
        id: GateId,
        gate_type: GateType,
        arity: usize,
    ) -> Result<(), CircuitError> {
        let index = match id.index() {
            Some(index) if index < self.gates.len() => index,
            _ => return Err(Error::InvalidGateId(id)),
        };
        if !gate_type.accepts_arity(arity) {
            debug!("rejecting gate {id}: {gate_type} with {arity} inputs");
            return Err(Error::InvalidArity { gate_type, arity });
        }

        let pins = try_filled(None, arity)?;
        let slot = self
            .gate_inputs
            .get_mut(index)
            .ok_or(Error::InvalidGateId(id))?;
        *slot = pins;
        self.gates[index] = Some(Gate::new(gate_type, arity));
        Ok(())
    }

    pub fn set_gate_input(
        &mut self,
        id: GateId,
        pin: usize,
        source: Source,
    ) -> Result<(), CircuitError> {
        let gate = self.gate(id).ok_or_else(|| {
            if self.is_valid_gate_id(id) {
                Error::UndefinedGate(id)
            } else {
                Error::InvalidGateId(id)
            }
        })?;
        if !gate.is_valid_pin(pin) {
            return Err(Error::InvalidPin { gate: id, pin });
        }
        if !self.is_valid_source(source) {
            return Err(Error::InvalidSource(source));
        }

        let slot = id
            .index()
            .and_then(|i| self.gate_inputs.get_mut(i))
            .and_then(|pins| pins.get_mut(pin))
            .ok_or(Error::InvalidPin { gate: id, pin })?;
        *slot = Some(source);
        Ok(())
    }

    pub fn set_output_source(&mut self, id: OutputId, source: Source) -> Result<(), CircuitError> {
        if !self.is_valid_output_id(id) {
            return Err(Error::InvalidOutputId(id));
        }
        if !self.is_valid_source(source) {
            return Err(Error::InvalidSource(source));
        }

        let slot = id
            .index()
            .and_then(|i| self.output_sources.get_mut(i))
            .ok_or(Error::InvalidOutputId(id))?;
        *slot = Some(source);
        Ok(())
    }

    /// Checks the structural invariants and reports the first violation.
    pub fn validate(&self) -> Result<(), CircuitError> {
        if self.num_inputs == 0 || self.num_outputs() == 0 || self.num_gates() == 0 {
            return Err(Error::InvalidDimensions {
                inputs: self.num_inputs,
                outputs: self.num_outputs(),
                gates: self.num_gates(),
            });
        }

        for (id, gate) in self.gates() {
            let gate = gate.ok_or(Error::UndefinedGate(id))?;
            let (gate_type, arity) = (gate.gate_type(), gate.arity());
            if !gate_type.accepts_arity(arity) {
                return Err(Error::InvalidArity { gate_type, arity });
            }

            let sources = self.gate_inputs(id).unwrap_or_default();
            if sources.len() != arity {
                return Err(Error::PinCountMismatch {
                    gate: id,
                    arity,
                    pins: sources.len(),
                });
            }
            for (pin, source) in sources.iter().enumerate() {
                match source {
                    None => return Err(Error::UnsetGateInput { gate: id, pin }),
                    Some(s) if !self.is_valid_source(*s) => return Err(Error::InvalidSource(*s)),
                    Some(_) => {}
                }
            }
        }

        if self.outputs.len() != self.num_outputs() {
            return Err(Error::OutputCountMismatch {
                outputs: self.num_outputs(),
                values: self.outputs.len(),
            });
        }

        for (i, source) in self.output_sources.iter().enumerate() {
            match source {
                None => return Err(Error::UnsetOutput(OutputId(i + 1))),
                Some(s) if !self.is_valid_source(*s) => return Err(Error::InvalidSource(*s)),
                Some(_) => {}
            }
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Structural equality: dimensions, gate kinds, arities and every source.
/// Cached simulation values are ignored.
impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        if self.num_inputs != other.num_inputs
            || self.num_outputs() != other.num_outputs()
            || self.num_gates() != other.num_gates()
        {
            return false;
        }

        let gates_match = self.gates().zip(other.gates()).all(|((id, a), (_, b))| match (a, b) {
            (Some(a), Some(b)) => {
                a.gate_type() == b.gate_type()
                    && a.arity() == b.arity()
                    && self.gate_inputs(id) == other.gate_inputs(id)
            }
            (None, None) => true,
            _ => false,
        });

        gates_match && self.output_sources == other.output_sources
    }
}

impl Eq for Circuit {}
