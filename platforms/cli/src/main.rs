mod logging;
mod render;

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use turing::{ProgramLoader, Step, TuringMachine, TuringMachineError};

/// Emulates a multi-tape Turing machine description on an input string.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The machine description file to execute
    tm: PathBuf,

    /// The input string for track 0 (may be empty)
    input: String,

    /// Print a snapshot of every track before each step
    #[clap(short, long)]
    verbose: bool,

    /// Print the result as JSON
    #[clap(long, conflicts_with = "verbose")]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    run: turing::RunResult,
    result: &'a str,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let machine = match ProgramLoader::load_program(&cli.tm) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut tm = match TuringMachine::new(&machine, &cli.input) {
        Ok(tm) => tm,
        Err(TuringMachineError::IllegalInput { symbol, position }) if cli.verbose => {
            eprint!("{}", render::illegal_input(&cli.input, symbol, position));
            return ExitCode::FAILURE;
        }
        Err(TuringMachineError::IllegalInput { .. }) => {
            eprintln!("illegal input string");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let run = if cli.verbose {
        println!("Input: {}\n{}", cli.input, render::RUN_BANNER);
        loop {
            print!("{}", render::snapshot(&tm));
            if tm.step() == Step::Halt {
                break tm.summary();
            }
        }
    } else {
        tm.run()
    };

    let result = tm.result();
    if cli.json {
        let report = Report { run, result: &result };
        match serde_json::to_string(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", render::result(run.accepted, &result, cli.verbose));
    }

    ExitCode::SUCCESS
}
