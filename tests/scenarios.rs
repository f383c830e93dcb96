// End-to-end scenarios through the public API: text format in, simulation,
// text format out, and file load/save.

use std::{fs, path::PathBuf};

use serial_test::serial;
use tristate_circuit::{
    Bool3::{self, False, True, Undef},
    Circuit, CircuitError, FileError, GateId, OutputId, ParseErrorKind, Source,
};

const NOT1: &str = "\
CIRCUITO 1 1 1
PORTAS
1) NT 1
CONEXOES
1) -1
SAIDAS
1) 1
";

const AND2: &str = "\
CIRCUITO 2 1 1
PORTAS
1) AN 2
CONEXOES
1) -1 -2
SAIDAS
1) 1
";

// Half adder plus carry-out inverted, gates listed sinks first.
const HALF_ADDER: &str = "\
CIRCUITO 2 3 3
PORTAS
1) NT 1
2) XO 2
3) AN 2
CONEXOES
1) 3
2) -1 -2
3) -1 -2
SAIDAS
1) 2
2) 3
3) 1
";

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tristate-circuit-{}-{name}", std::process::id()))
}

#[test]
fn not_gate_passthrough() {
    let mut circuit: Circuit = NOT1.parse().expect("valid circuit");
    assert_eq!(circuit.simulate(&[True]).unwrap(), &[False]);
    assert_eq!(circuit.simulate(&[Undef]).unwrap(), &[Undef]);
}

#[test]
fn and_gate_from_text() {
    let mut circuit: Circuit = AND2.parse().expect("valid circuit");
    assert_eq!(circuit.simulate(&[True, True]).unwrap(), &[True]);
    assert_eq!(circuit.simulate(&[False, True]).unwrap(), &[False]);
    assert_eq!(circuit.simulate(&[Undef, True]).unwrap(), &[Undef]);
}

#[test]
fn half_adder_declared_out_of_order() {
    let mut circuit: Circuit = HALF_ADDER.parse().expect("valid circuit");

    for a in [false, true] {
        for b in [false, true] {
            let outputs = circuit.simulate(&[a.into(), b.into()]).unwrap();
            let expected: [Bool3; 3] = [(a ^ b).into(), (a && b).into(), (!(a && b)).into()];
            assert_eq!(outputs, &expected, "half adder({a}, {b})");
        }
    }

    let outputs = circuit.simulate(&[Undef, False]).unwrap();
    assert_eq!(outputs, &[Undef, False, True]);
}

#[test]
fn text_round_trip_preserves_equality() {
    for text in [NOT1, AND2, HALF_ADDER] {
        let circuit: Circuit = text.parse().expect("valid circuit");
        let written = circuit.to_text().expect("valid circuit renders");
        assert_eq!(written, text);

        let reread: Circuit = written.parse().expect("own output parses");
        assert_eq!(reread, circuit);
    }
}

#[test]
fn built_circuit_renders_text_format() {
    let mut circuit = Circuit::new(2, 1, 1).unwrap();
    circuit.set_gate(GateId(1), "an", 2).unwrap();
    circuit.set_gate_input(GateId(1), 0, Source::input(1)).unwrap();
    circuit.set_gate_input(GateId(1), 1, Source::input(2)).unwrap();
    circuit.set_output_source(OutputId(1), Source::gate(1)).unwrap();

    assert_eq!(circuit.to_string(), AND2);
}

#[test]
#[serial]
fn missing_outputs_keyword_keeps_target() {
    let path = scratch_path("missing-saidas.txt");
    fs::write(&path, AND2.replace("SAIDAS\n", "")).unwrap();

    let mut circuit: Circuit = HALF_ADDER.parse().unwrap();
    let before = circuit.clone();

    let err = circuit.reload(&path).unwrap_err();
    assert!(matches!(
        err,
        FileError::Parse(ref e) if e.kind == ParseErrorKind::ExpectedKeyword("SAIDAS")
    ));
    assert_eq!(circuit, before);

    fs::remove_file(&path).unwrap();
}

#[test]
#[serial]
fn save_then_load() {
    let path = scratch_path("half-adder.txt");
    let circuit: Circuit = HALF_ADDER.parse().unwrap();

    circuit.save(&path).expect("valid circuit saves");
    let loaded = Circuit::load(&path).expect("saved file loads");
    assert_eq!(loaded, circuit);

    fs::remove_file(&path).unwrap();
}

#[test]
#[serial]
fn invalid_circuit_is_not_saved() {
    let path = scratch_path("invalid.txt");
    let _ = fs::remove_file(&path);

    let circuit = Circuit::new(1, 1, 1).unwrap();
    let err = circuit.save(&path).unwrap_err();
    assert!(matches!(
        err,
        FileError::Circuit(CircuitError::UndefinedGate(GateId(1)))
    ));
    assert!(!path.exists());
}

#[test]
fn missing_file_is_io_error() {
    let mut circuit = Circuit::default();
    let err = circuit.reload(scratch_path("does-not-exist.txt")).unwrap_err();
    assert!(matches!(err, FileError::Io(_)));
    assert_eq!(circuit, Circuit::default());
}
