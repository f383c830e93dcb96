//! Plain-text circuit format.
//!
//! ```text
//! CIRCUITO <inputs> <outputs> <gates>
//! PORTAS
//! 1) AN 2
//! CONEXOES
//! 1) -1 -2
//! SAIDAS
//! 1) 1
//! ```
//!
//! Sources are signed: `k > 0` is gate `k`, `-k` is external input `k`.
//! Gate tags are read case-insensitively and written upper-case.

use std::{fmt, fs, io, path::Path, str::FromStr};

use itertools::Itertools;
use tracing::instrument;

use super::Circuit;
use crate::{CircuitError, GateId, OutputId, Source, SourceError};

const KW_CIRCUIT: &str = "CIRCUITO";
const KW_GATES: &str = "PORTAS";
const KW_CONNECTIONS: &str = "CONEXOES";
const KW_OUTPUTS: &str = "SAIDAS";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("expected keyword {0}")]
    ExpectedKeyword(&'static str),
    #[error("expected an integer")]
    ExpectedInteger,
    #[error("expected ')'")]
    ExpectedParen,
    #[error("expected a gate type")]
    ExpectedGateType,
    #[error("expected entry {expected}, found {found}")]
    OutOfOrder { expected: usize, found: i64 },
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

/// A malformed circuit description, with the line where reading stopped.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

/// Errors from reading or writing circuit files
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

/// Whitespace-separated token reader.
///
/// Integers stop at the first non-digit, so `1)` reads as `1` then `)`.
struct Lexer<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text, line: 1 }
    }

    fn error(&self, kind: impl Into<ParseErrorKind>) -> ParseError {
        ParseError {
            line: self.line,
            kind: kind.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest.trim_start();
        let skipped = &self.rest[..self.rest.len() - trimmed.len()];
        self.line += skipped.matches('\n').count();
        self.rest = trimmed;
    }

    fn word(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let end = self
            .rest
            .find(char::is_whitespace)
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(word)
    }

    fn keyword(&mut self, keyword: &'static str) -> Result<(), ParseError> {
        match self.word() {
            Some(w) if w == keyword => Ok(()),
            _ => Err(self.error(ParseErrorKind::ExpectedKeyword(keyword))),
        }
    }

    fn integer(&mut self) -> Result<i64, ParseError> {
        self.skip_whitespace();
        let bytes = self.rest.as_bytes();
        let sign = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
        let digits = bytes[sign..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return Err(self.error(ParseErrorKind::ExpectedInteger));
        }

        let (number, rest) = self.rest.split_at(sign + digits);
        let value = number
            .parse()
            .map_err(|_| self.error(ParseErrorKind::ExpectedInteger))?;
        self.rest = rest;
        Ok(value)
    }

    fn count(&mut self) -> Result<usize, ParseError> {
        // negative counts and arities fall through to the circuit checks as 0
        Ok(usize::try_from(self.integer()?).unwrap_or(0))
    }

    fn paren(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.rest.strip_prefix(')') {
            Some(rest) => {
                self.rest = rest;
                Ok(())
            }
            None => Err(self.error(ParseErrorKind::ExpectedParen)),
        }
    }

    /// Reads `<id>)` and checks it is the `expected` entry.
    fn entry(&mut self, expected: usize) -> Result<(), ParseError> {
        let found = self.integer()?;
        if usize::try_from(found).ok() != Some(expected) {
            return Err(self.error(ParseErrorKind::OutOfOrder { expected, found }));
        }
        self.paren()
    }

    fn source(&mut self) -> Result<Source, ParseError> {
        let raw = self.integer()?;
        Source::from_raw(raw).map_err(|e| self.error(e))
    }
}

impl Circuit {
    /// Parses the text format into a new circuit.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lx = Lexer::new(text);

        lx.keyword(KW_CIRCUIT)?;
        let inputs = lx.count()?;
        let outputs = lx.count()?;
        let gates = lx.count()?;
        let mut circuit = Circuit::new(inputs, outputs, gates).map_err(|e| lx.error(e))?;

        lx.keyword(KW_GATES)?;
        for id in 1..=gates {
            lx.entry(id)?;
            let tag = lx
                .word()
                .ok_or_else(|| lx.error(ParseErrorKind::ExpectedGateType))?;
            let arity = lx.count()?;
            circuit
                .set_gate(GateId(id), tag, arity)
                .map_err(|e| lx.error(e))?;
        }

        lx.keyword(KW_CONNECTIONS)?;
        for id in 1..=gates {
            lx.entry(id)?;
            let arity = circuit.gate_arity(GateId(id)).unwrap_or_default();
            for pin in 0..arity {
                let source = lx.source()?;
                circuit
                    .set_gate_input(GateId(id), pin, source)
                    .map_err(|e| lx.error(e))?;
            }
        }

        lx.keyword(KW_OUTPUTS)?;
        for id in 1..=outputs {
            lx.entry(id)?;
            let source = lx.source()?;
            circuit
                .set_output_source(OutputId(id), source)
                .map_err(|e| lx.error(e))?;
        }

        Ok(circuit)
    }

    /// Replaces this circuit with the one described by `text`.
    ///
    /// The circuit is only touched if the whole description parses.
    pub fn read_text(&mut self, text: &str) -> Result<(), ParseError> {
        *self = Self::parse(text)?;
        Ok(())
    }

    /// Renders the text format. Invalid circuits are refused.
    pub fn to_text(&self) -> Result<String, CircuitError> {
        self.validate()?;

        let raw = |s: &Option<Source>| s.map_or(0, Source::to_raw);

        let mut out = format!(
            "{KW_CIRCUIT} {} {} {}\n{KW_GATES}\n",
            self.num_inputs(),
            self.num_outputs(),
            self.num_gates()
        );
        for (id, gate) in self.gates() {
            if let Some(gate) = gate {
                out.push_str(&format!("{id}) {} {}\n", gate.name(), gate.arity()));
            }
        }

        out.push_str(KW_CONNECTIONS);
        out.push('\n');
        for (id, _) in self.gates() {
            let sources = self.gate_inputs(id).unwrap_or_default();
            out.push_str(&format!("{id})"));
            for s in sources {
                out.push_str(&format!(" {}", raw(s)));
            }
            out.push('\n');
        }

        out.push_str(KW_OUTPUTS);
        out.push('\n');
        let outputs = self
            .output_sources
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}) {}", i + 1, raw(s)))
            .join("\n");
        out.push_str(&outputs);
        out.push('\n');

        Ok(out)
    }

    /// Reads a circuit file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let text = fs::read_to_string(path.as_ref())?;
        let circuit = Self::parse(&text)?;
        tracing::info!(
            inputs = circuit.num_inputs(),
            outputs = circuit.num_outputs(),
            gates = circuit.num_gates(),
            "circuit loaded"
        );
        Ok(circuit)
    }

    /// Reads a circuit file into `self`, leaving `self` untouched on any
    /// failure.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), FileError> {
        *self = Self::load(path)?;
        Ok(())
    }

    /// Writes the circuit to a file. Invalid circuits produce no file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
        let text = self.to_text()?;
        fs::write(path.as_ref(), text)?;
        Ok(())
    }
}

impl FromStr for Circuit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Text format; an invalid circuit renders as nothing.
impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(text) => f.write_str(&text),
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bool3;

    const AND2: &str = "CIRCUITO 2 1 1\nPORTAS\n1) AN 2\nCONEXOES\n1) -1 -2\nSAIDAS\n1) 1\n";

    #[test]
    fn test_parse_and2() {
        let circuit = Circuit::parse(AND2).expect("valid file");
        assert_eq!(circuit.num_inputs(), 2);
        assert_eq!(circuit.gate_name(GateId(1)), Some("AN"));
        assert_eq!(circuit.gate_input(GateId(1), 1), Some(Source::input(2)));
        assert_eq!(circuit.output_source(OutputId(1)), Some(Source::gate(1)));
    }

    #[test]
    fn test_lowercase_tag_written_uppercase() {
        let text = AND2.replace("AN", "an");
        let circuit: Circuit = text.parse().expect("tags are case-insensitive");
        assert_eq!(circuit.to_text().as_deref(), Ok(AND2));
    }

    #[test]
    fn test_tokens_need_no_spacing_around_paren() {
        let text = "CIRCUITO 1 1 1 PORTAS 1 )NT 1 CONEXOES 1)-1 SAIDAS 1 ) 1";
        let mut circuit = Circuit::parse(text).expect("valid file");
        assert_eq!(circuit.simulate(&[Bool3::True]), Ok(&[Bool3::False][..]));
    }

    #[test]
    fn test_missing_keyword_reports_line() {
        let text = AND2.replace("SAIDAS", "SAIDA");
        let err = Circuit::parse(&text).unwrap_err();
        assert_eq!(err.line, 6);
        assert_eq!(err.kind, ParseErrorKind::ExpectedKeyword(KW_OUTPUTS));
    }

    #[test]
    fn test_out_of_order_gate_rejected() {
        let text = "CIRCUITO 1 1 2\nPORTAS\n2) NT 1\n1) NT 1\n";
        let err = Circuit::parse(text).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::OutOfOrder {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_bad_dimensions_and_arity() {
        let err = Circuit::parse("CIRCUITO 0 1 1").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::Circuit(CircuitError::InvalidDimensions { .. })
        ));

        let text = AND2.replace("AN 2", "AN 1");
        let err = Circuit::parse(&text).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::Circuit(CircuitError::InvalidArity { .. })
        ));
    }

    #[test]
    fn test_oversized_counts_are_parse_errors() {
        let err = Circuit::parse("CIRCUITO 1 1 9223372036854775807\nPORTAS\n").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::Circuit(CircuitError::TooLarge(9223372036854775807))
        );

        let text = AND2.replace("AN 2", "AN 9223372036854775807");
        let err = Circuit::parse(&text).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(
            err.kind,
            ParseErrorKind::Circuit(CircuitError::TooLarge(9223372036854775807))
        );

        // past i64 the number itself does not parse
        let err = Circuit::parse("CIRCUITO 1 1 99999999999999999999").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedInteger);
    }

    #[test]
    fn test_source_out_of_range_rejected() {
        let text = AND2.replace("1) -1 -2", "1) -1 -3");
        let err = Circuit::parse(&text).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::Circuit(CircuitError::InvalidSource(Source::input(3)))
        );

        let text = AND2.replace("1) -1 -2", "1) 0 -2");
        let err = Circuit::parse(&text).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Source(SourceError::Zero));
    }

    #[test]
    fn test_failed_read_keeps_previous_circuit() {
        let mut circuit = Circuit::parse(AND2).expect("valid file");
        let before = circuit.clone();

        let truncated = AND2.replace("SAIDAS\n1) 1\n", "");
        assert!(circuit.read_text(&truncated).is_err());
        assert_eq!(circuit, before);
    }

    #[test]
    fn test_invalid_circuit_renders_nothing() {
        let circuit = Circuit::new(1, 1, 1).expect("positive dimensions");
        assert!(circuit.to_text().is_err());
        assert_eq!(circuit.to_string(), "");
    }
}
