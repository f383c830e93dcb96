pub mod circuit;
mod core;

pub use crate::core::{
    bool3::{Bool3, ParseBool3Error},
    gate::{Gate, GateError},
    gate_type::{GateType, UnknownGateType},
    source::{GateId, InputId, OutputId, Source, SourceError},
};

pub use circuit::{
    Circuit, CircuitError, TruthRow,
    text::{FileError, ParseError, ParseErrorKind},
};

#[cfg(test)]
pub mod test_utils {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    pub fn trng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(0)
    }
}
