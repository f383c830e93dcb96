//! Loads a circuit file and simulates it.
//!
//! ```text
//! circuit-sim <circuit-file> [--table] [--json] [values...]
//! ```
//!
//! Values are logic levels (`F`, `T`, `?`, `0`, `1`, `X`), one per circuit
//! input, either as separate arguments or packed into one (`TF?`).

use std::{env, error::Error, process};

use itertools::Itertools;
use log::{error, info};
use tristate_circuit::{Bool3, Circuit};

const USAGE: &str = "usage: circuit-sim <circuit-file> [--table] [--json] [values...]";

struct Args {
    path: String,
    table: bool,
    json: bool,
    values: Vec<Bool3>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut path = None;
    let mut table = false;
    let mut json = false;
    let mut values = Vec::new();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--table" => table = true,
            "--json" => json = true,
            _ if path.is_none() => path = Some(arg),
            _ => {
                for c in arg.chars().filter(|c| !c.is_whitespace() && *c != ',') {
                    values.push(Bool3::try_from(c)?);
                }
            }
        }
    }

    Ok(Args {
        path: path.ok_or(USAGE)?,
        table,
        json,
        values,
    })
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut circuit = Circuit::load(&args.path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&circuit)?);
    }

    if args.table {
        for row in circuit.truth_table()? {
            println!(
                "{} | {}",
                row.inputs.iter().join(" "),
                row.outputs.iter().join(" ")
            );
        }
    }

    if !args.values.is_empty() {
        let outputs = circuit.simulate(&args.values)?;
        info!("simulated {} with {} inputs", args.path, args.values.len());
        println!("{}", outputs.iter().join(" "));
    }

    Ok(())
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let result = parse_args().and_then(run);
    if let Err(e) = result {
        error!("{e}");
        process::exit(1);
    }
}
