pub mod bool3;
pub mod gate;
pub mod gate_type;
pub mod source;
