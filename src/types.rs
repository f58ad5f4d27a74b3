//! This module defines the core data structures and types used throughout the emulator,
//! including the validated machine definition, transition rules, run results, and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The reserved blank symbol. Every unwritten tape cell holds it.
pub const BLANK_SYMBOL: char = '_';
/// The wildcard used in read and write positions of a transition rule.
pub const WILDCARD_SYMBOL: char = '*';
/// Starts a trailing comment in a description file.
pub const COMMENT_SYMBOL: char = ';';
/// The largest track count a description may declare.
pub const MAX_TRACKS: usize = i32::MAX as usize;

/// A validated, immutable Turing machine definition.
///
/// Instances are only produced by [`crate::parser::parse`], which guarantees that every
/// state reference resolves, every symbol belongs to the tape alphabet, and every rule
/// covers exactly [`Machine::tracks`] tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Machine {
    pub(crate) states: Vec<State>,
    pub(crate) initial_state: usize,
    pub(crate) input_alphabet: Vec<char>,
    pub(crate) tape_alphabet: Vec<char>,
    pub(crate) tracks: usize,
}

impl Machine {
    /// All declared states, in declaration order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns the state with the given index.
    ///
    /// Indices come from [`Transition::next_state`] or [`Machine::initial_state`], which
    /// are always in range for the machine that produced them.
    pub fn state(&self, index: usize) -> &State {
        &self.states[index]
    }

    /// Looks up a state index by name.
    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|state| state.name == name)
    }

    /// Index of the initial state.
    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    /// The input alphabet (`#S`).
    pub fn input_alphabet(&self) -> &[char] {
        &self.input_alphabet
    }

    /// The tape alphabet (`#G`), which always contains [`BLANK_SYMBOL`].
    pub fn tape_alphabet(&self) -> &[char] {
        &self.tape_alphabet
    }

    /// Number of synchronized tracks (`#N`).
    pub fn tracks(&self) -> usize {
        self.tracks
    }

    /// Indices of the final states, in declaration order.
    pub fn final_states(&self) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_final)
            .map(|(i, _)| i)
    }

    /// Checks an input string against the input alphabet.
    ///
    /// Returns the first offending symbol and its character position.
    pub fn check_input(&self, input: &str) -> Result<(), TuringMachineError> {
        match input
            .chars()
            .enumerate()
            .find(|(_, c)| !self.input_alphabet.contains(c))
        {
            Some((position, symbol)) => Err(TuringMachineError::IllegalInput { symbol, position }),
            None => Ok(()),
        }
    }
}

/// A named state and its ordered rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct State {
    /// The identifier declared in `#Q`.
    pub name: String,
    /// Whether the state appears in `#F`.
    pub is_final: bool,
    /// Rules in file order. The first matching rule wins.
    pub transitions: Vec<Transition>,
}

impl State {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_final: false,
            transitions: Vec::new(),
        }
    }
}

/// A single transition rule, holding one read/write/direction triple per track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Symbols to be matched against each track's head.
    pub read: Vec<Read>,
    /// Symbols to be written on each track.
    pub write: Vec<Write>,
    /// Head movement for each track after writing.
    pub directions: Vec<Direction>,
    /// Index of the destination state.
    pub next_state: usize,
}

impl Transition {
    /// Checks whether this rule matches the symbols currently under the heads.
    pub fn matches(&self, symbols: &[char]) -> bool {
        self.read.len() == symbols.len()
            && self
                .read
                .iter()
                .zip(symbols)
                .all(|(read, &symbol)| read.matches(symbol))
    }
}

/// The read half of a rule on one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Read {
    /// `*`: matches any symbol except blank.
    Any,
    /// Matches exactly this symbol.
    Symbol(char),
}

impl Read {
    /// Wildcard never matches the blank symbol.
    pub fn matches(self, symbol: char) -> bool {
        match self {
            Read::Any => symbol != BLANK_SYMBOL,
            Read::Symbol(expected) => expected == symbol,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Read::Any => WILDCARD_SYMBOL,
            Read::Symbol(c) => c,
        }
    }
}

/// The write half of a rule on one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Write {
    /// `*`: leave the symbol under the head unchanged.
    Keep,
    /// Overwrite with this symbol.
    Symbol(char),
}

impl Write {
    /// Resolves the symbol to store given the one currently under the head.
    pub fn apply(self, current: char) -> char {
        match self {
            Write::Keep => current,
            Write::Symbol(c) => c,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Write::Keep => WILDCARD_SYMBOL,
            Write::Symbol(c) => c,
        }
    }
}

/// Represents the possible directions a head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left (`l`).
    Left,
    /// Move the head one position to the right (`r`).
    Right,
    /// Keep the head in the same position (`*`).
    Stay,
}

impl Direction {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'l' => Some(Direction::Left),
            'r' => Some(Direction::Right),
            '*' => Some(Direction::Stay),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Stay => '*',
        }
    }
}

/// Represents the outcome of a single emulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A rule matched and was applied.
    Continue,
    /// No rule matched; the machine has stopped for good.
    Halt,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Sticky acceptance: true once any visited state was final.
    pub accepted: bool,
    /// Number of transitions applied.
    pub steps: u64,
    /// Name of the state the machine halted in.
    pub state: String,
}

/// Represents the errors that can occur while loading a description or starting a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    /// A line of the description violates the syntax or the semantic constraints.
    #[error("syntax error: cannot accept line {line_number} \"{line}\": {reason}")]
    Syntax {
        line_number: usize,
        line: String,
        reason: String,
    },
    /// The description ended without a required declaration.
    #[error("syntax error: missing {0} declaration")]
    MissingDeclaration(&'static str),
    /// The input string contains a symbol outside the input alphabet.
    #[error("illegal input: symbol \"{symbol}\" at position {position} is not defined in the set of input symbols")]
    IllegalInput { symbol: char, position: usize },
    /// Indicates an error related to reading description files.
    #[error("File error: {0}")]
    FileError(String),
}

impl TuringMachineError {
    /// True for any error raised while building a [`Machine`] from its description.
    pub fn is_description_error(&self) -> bool {
        matches!(
            self,
            TuringMachineError::Syntax { .. } | TuringMachineError::MissingDeclaration(_)
        )
    }
}
