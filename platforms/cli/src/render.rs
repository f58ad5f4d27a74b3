//! Text rendering for verbose runs and final results.

use std::fmt::Write as _;
use turing::{Tape, TuringMachine};

pub const SEPARATOR: &str = "---------------------------------------------";
pub const RUN_BANNER: &str = "==================== RUN ====================";
pub const ERR_BANNER: &str = "==================== ERR ====================";
pub const END_BANNER: &str = "==================== END ====================";

fn digits(n: usize) -> usize {
    n.to_string().len()
}

/// Renders the step header followed by one Index/Tape/Head block per track.
pub fn snapshot(tm: &TuringMachine) -> String {
    let tracks = tm.tapes().len();
    let label = digits(tracks) + 6;
    let mut out = String::new();

    let _ = writeln!(out, "{:<label$}: {}", "Step", tm.step_count());
    let _ = writeln!(out, "{:<label$}: {}", "State", tm.state());
    let _ = writeln!(
        out,
        "{:<label$}: {}",
        "Acc",
        if tm.is_accepted() { "Yes" } else { "No" }
    );

    for (i, tape) in tm.tapes().iter().enumerate() {
        render_tape(&mut out, i, digits(tracks), tape);
    }

    out.push_str(SEPARATOR);
    out.push('\n');
    out
}

fn render_tape(out: &mut String, track: usize, width: usize, tape: &Tape) {
    let (left, right) = tape.printable_range();
    let cell_width = |j: isize| digits(j.unsigned_abs());

    let index = (left..=right)
        .map(|j| j.unsigned_abs().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let symbols = (left..=right)
        .map(|j| format!("{:<w$}", tape.get(j), w = cell_width(j)))
        .collect::<Vec<_>>()
        .join(" ");
    let head: String = (left..tape.head())
        .map(|j| " ".repeat(cell_width(j) + 1))
        .collect();

    let _ = writeln!(out, "Index{track:<width$} : {index}");
    let _ = writeln!(out, "Tape{track:<width$}  : {symbols}");
    let _ = writeln!(out, "Head{track:<width$}  : {head}^");
}

/// Renders the ERR block pointing at an illegal input symbol.
pub fn illegal_input(input: &str, symbol: char, position: usize) -> String {
    format!(
        "Input: {input}\n{ERR_BANNER}\nerror: Symbol \"{symbol}\" in input is not defined in the set of input symbols\nInput: {input}\n       {caret:>width$}\n{END_BANNER}\n",
        caret = '^',
        width = position + 1,
    )
}

/// Renders the final verdict line(s).
pub fn result(accepted: bool, result: &str, verbose: bool) -> String {
    let verdict = if accepted { "ACCEPTED" } else { "UNACCEPTED" };
    if verbose {
        format!("{verdict}\nResult: {result}\n{END_BANNER}\n")
    } else {
        format!("({verdict}) {result}\n")
    }
}
