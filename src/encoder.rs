//! This module renders a [`Machine`] back into the description language.
//!
//! The output is canonical: declarations come first in a fixed order, followed by the
//! rules grouped by source state. Rule order within a state is preserved, so parsing the
//! encoded text yields the same machine.

use crate::types::{Machine, Transition, BLANK_SYMBOL};
use std::fmt::Write as _;

/// Encodes a machine as description text.
///
/// # Arguments
///
/// * `machine` - The machine to encode.
///
/// # Returns
///
/// * `String` - Description text accepted by [`crate::parser::parse`].
pub fn encode(machine: &Machine) -> String {
    let mut out = String::new();

    let names = machine
        .states()
        .iter()
        .map(|state| state.name.as_str())
        .collect::<Vec<_>>();
    let names = names.as_slice();
    let finals = machine
        .final_states()
        .map(|i| names[i])
        .collect::<Vec<_>>();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "#Q = {{{}}}", names.join(", "));
    let _ = writeln!(out, "#S = {{{}}}", encode_symbols(machine.input_alphabet()));
    let _ = writeln!(out, "#G = {{{}}}", encode_symbols(machine.tape_alphabet()));
    let _ = writeln!(out, "#q0 = {}", names[machine.initial_state()]);
    let _ = writeln!(out, "#B = {BLANK_SYMBOL}");
    let _ = writeln!(out, "#F = {{{}}}", finals.join(", "));
    let _ = writeln!(out, "#N = {}", machine.tracks());

    let mut rules = machine
        .states()
        .iter()
        .flat_map(|state| {
            state
                .transitions
                .iter()
                .map(move |t| encode_transition(&state.name, t, names))
        })
        .peekable();

    if rules.peek().is_some() {
        out.push('\n');
    }
    for rule in rules {
        out.push_str(&rule);
        out.push('\n');
    }

    out
}

/// Encodes a single rule line.
fn encode_transition(source: &str, transition: &Transition, names: &[&str]) -> String {
    let read: String = transition.read.iter().map(|r| r.as_char()).collect();
    let write: String = transition.write.iter().map(|w| w.as_char()).collect();
    let directions: String = transition.directions.iter().map(|d| d.as_char()).collect();

    format!(
        "{} {} {} {} {}",
        source, read, write, directions, names[transition.next_state]
    )
}

fn encode_symbols(symbols: &[char]) -> String {
    symbols
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
