//! This crate provides the core logic for a multi-tape Turing machine emulator.
//! It includes modules for parsing machine descriptions, representing bidirectionally
//! infinite tapes, emulating runs, and rendering machines back into description text.

pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `encode` function from the encoder module.
pub use encoder::encode;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the machine definition and run types from the types module.
pub use types::{
    Direction, Machine, Read, RunResult, State, Step, Transition, TuringMachineError, Write,
    BLANK_SYMBOL, WILDCARD_SYMBOL,
};
