//! This module defines the `TuringMachine` struct, which emulates a validated [`Machine`]
//! on one growable tape per track. It tracks the current state, the step counter, and the
//! sticky acceptance flag, and exposes read-only views for presentation layers.

use crate::tape::Tape;
use crate::types::{Machine, RunResult, Step, Transition, TuringMachineError};
use tracing::{debug, trace};

/// A single run of a multi-track Turing machine.
///
/// The run owns its tapes and run state exclusively; the definition is borrowed and never
/// mutated. Acceptance is sticky: it becomes true the first time a final state is visited
/// (including the initial state) and stays true for the rest of the run.
#[derive(Debug, Clone)]
pub struct TuringMachine<'m> {
    machine: &'m Machine,
    state: usize,
    tapes: Vec<Tape>,
    step_count: u64,
    accepted: bool,
    halted: bool,
}

impl<'m> TuringMachine<'m> {
    /// Creates a new run of `machine` on `input`.
    ///
    /// Track 0 is seeded with the input (a single blank cell if it is empty); every other
    /// track starts blank.
    ///
    /// # Arguments
    ///
    /// * `machine` - The validated machine definition.
    /// * `input` - The input string for track 0.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` positioned at the initial state.
    /// * `Err(TuringMachineError::IllegalInput)` if `input` contains a symbol outside the
    ///   input alphabet. No tapes are built in that case.
    pub fn new(machine: &'m Machine, input: &str) -> Result<Self, TuringMachineError> {
        machine.check_input(input)?;

        let mut tapes = Vec::with_capacity(machine.tracks());
        tapes.push(Tape::new(input));
        tapes.extend((1..machine.tracks()).map(|_| Tape::blank()));

        let state = machine.initial_state();
        debug!(input, tracks = machine.tracks(), "initialized tapes");

        Ok(Self {
            machine,
            state,
            tapes,
            step_count: 0,
            accepted: machine.state(state).is_final,
            halted: false,
        })
    }

    /// Executes a single step.
    ///
    /// Searches the current state's rules in declaration order and applies the first one
    /// that matches on every track: each track writes its symbol (or keeps the current
    /// one for a wildcard write) and then moves its head.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a rule was applied.
    /// * `Step::Halt` if no rule matches. Every later call also returns `Step::Halt`.
    pub fn step(&mut self) -> Step {
        if self.halted {
            return Step::Halt;
        }

        let Some(transition) = self.transition() else {
            self.halted = true;
            debug!(
                state = self.state(),
                steps = self.step_count,
                accepted = self.accepted,
                "machine halted"
            );
            return Step::Halt;
        };

        for (i, tape) in self.tapes.iter_mut().enumerate() {
            let symbol = transition.write[i].apply(tape.read());
            tape.write(symbol);
            tape.move_head(transition.directions[i]);
        }

        self.state = transition.next_state;
        self.step_count += 1;
        self.accepted |= self.machine.state(self.state).is_final;

        trace!(
            step = self.step_count,
            state = self.state(),
            accepted = self.accepted,
            "applied rule"
        );

        Step::Continue
    }

    /// Runs until no rule matches.
    ///
    /// There is no step limit: a machine that never halts keeps running.
    pub fn run(&mut self) -> RunResult {
        while self.step() == Step::Continue {}
        self.summary()
    }

    /// Summary of the run so far.
    pub fn summary(&self) -> RunResult {
        RunResult {
            accepted: self.accepted,
            steps: self.step_count,
            state: self.state().to_string(),
        }
    }

    /// Finds the first rule of the current state matching the symbols under the heads.
    pub fn transition(&self) -> Option<&'m Transition> {
        let symbols = self.symbols();
        self.machine
            .state(self.state)
            .transitions
            .iter()
            .find(|t| t.matches(&symbols))
    }

    /// Returns the symbols currently under each track's head.
    pub fn symbols(&self) -> Vec<char> {
        self.tapes.iter().map(Tape::read).collect()
    }

    /// Name of the current state.
    pub fn state(&self) -> &'m str {
        &self.machine.state(self.state).name
    }

    /// Index of the current state.
    pub fn state_index(&self) -> usize {
        self.state
    }

    /// Number of rules applied so far.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Whether any visited state was final.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Whether a step has already found no matching rule.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Returns a slice of the tapes, one per track.
    pub fn tapes(&self) -> &[Tape] {
        &self.tapes
    }

    /// The trimmed content of track 0.
    pub fn result(&self) -> String {
        self.tapes[0].trimmed_content()
    }

    /// The definition being emulated.
    pub fn machine(&self) -> &'m Machine {
        self.machine
    }
}
