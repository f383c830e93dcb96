use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::{Circuit, Error};
use crate::{Bool3, CircuitError, GateId, Source};

/// Truth tables are refused past this many inputs.
pub const MAX_TRUTH_TABLE_INPUTS: usize = 16;

/// One row of a truth table: the input assignment and the outputs it gives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthRow {
    pub inputs: Vec<Bool3>,
    pub outputs: Vec<Bool3>,
}

impl Circuit {
    /// Value currently seen at `source`, given the external `inputs`.
    fn resolve(&self, source: Option<Source>, inputs: &[Bool3]) -> Bool3 {
        match source {
            Some(Source::Gate(id)) => self.gate_output(id).unwrap_or_default(),
            Some(Source::Input(id)) => id
                .index()
                .and_then(|i| inputs.get(i))
                .copied()
                .unwrap_or_default(),
            None => Bool3::Undef,
        }
    }

    /// Simulates the circuit for the given external input values and returns
    /// the resulting circuit outputs.
    ///
    /// Gates may be declared in any order. Every gate starts at `Undef`, then
    /// the gates still at `Undef` are swept in id order, each reading the
    /// current outputs of its source gates, until either every gate is
    /// determinate or a whole sweep resolves nothing new. Gates caught in a
    /// feedback loop, or fed by undetermined inputs, stay `Undef`.
    ///
    /// An invalid circuit or a wrong number of input values is rejected
    /// before anything is touched, so the previous outputs remain readable.
    pub fn simulate(&mut self, inputs: &[Bool3]) -> Result<&[Bool3], CircuitError> {
        self.validate()?;
        if inputs.len() != self.num_inputs {
            return Err(Error::InputCountMismatch {
                expected: self.num_inputs,
                got: inputs.len(),
            });
        }

        for gate in self.gates.iter_mut().flatten() {
            gate.set_output(Bool3::Undef);
        }

        let mut pending = self.gates.len();
        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let mut resolved = 0;

            for index in 0..self.gates.len() {
                let id = GateId(index + 1);
                if self.gate_output(id).is_some_and(Bool3::is_defined) {
                    continue;
                }

                let values = self.gate_inputs[index]
                    .iter()
                    .map(|source| self.resolve(*source, inputs))
                    .collect::<Vec<_>>();

                if let Some(gate) = self.gates[index].as_mut() {
                    let out = gate
                        .evaluate(&values)
                        .map_err(|source| Error::Gate { gate: id, source })?;
                    if out.is_defined() {
                        trace!("gate {id} resolved to {out} in sweep {sweeps}");
                        resolved += 1;
                    }
                }
            }

            pending -= resolved;
            if pending == 0 {
                break;
            }
            if resolved == 0 {
                debug!("{pending} gates left undetermined after {sweeps} sweeps");
                break;
            }
        }
        debug!("simulation settled in {sweeps} sweeps");

        self.outputs = self
            .output_sources
            .iter()
            .map(|source| self.resolve(*source, inputs))
            .collect();

        Ok(&self.outputs)
    }

    /// Simulates every determinate input assignment, input 1 varying slowest.
    pub fn truth_table(&mut self) -> Result<Vec<TruthRow>, CircuitError> {
        self.validate()?;
        if self.num_inputs > MAX_TRUTH_TABLE_INPUTS {
            return Err(Error::TooManyInputs {
                inputs: self.num_inputs,
                max: MAX_TRUTH_TABLE_INPUTS,
            });
        }

        (0..self.num_inputs)
            .map(|_| [Bool3::False, Bool3::True])
            .multi_cartesian_product()
            .map(|inputs| {
                let outputs = self.simulate(&inputs)?.to_vec();
                Ok::<_, CircuitError>(TruthRow { inputs, outputs })
            })
            .collect()
    }
}
