//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//!
//! Descriptions are line oriented. Each line has its trailing comment and trailing
//! whitespace stripped; empty lines are skipped. Every remaining line is parsed on its own
//! with the grammar in `grammar.pest` and applied to a [`MachineBuilder`], which enforces
//! the semantic constraints as soon as the line is seen. Names must therefore be declared
//! before they are referenced.

use crate::types::{
    Direction, Machine, Read, State, Transition, TuringMachineError, Write, BLANK_SYMBOL,
    COMMENT_SYMBOL, MAX_TRACKS, WILDCARD_SYMBOL,
};
use pest::{
    error::Error,
    iterators::{Pair, Pairs},
    Parser as PestParser,
};
use pest_derive::Parser as PestParser;
use tracing::debug;

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// Parses a machine description into a validated [`Machine`].
///
/// # Arguments
///
/// * `input` - The full description text.
///
/// # Returns
///
/// * `Ok(Machine)` if every line is well formed and all required declarations are present.
/// * `Err(TuringMachineError::Syntax)` naming the first offending line.
/// * `Err(TuringMachineError::MissingDeclaration)` if a required declaration never appears.
pub fn parse(input: &str) -> Result<Machine, TuringMachineError> {
    let mut builder = MachineBuilder::default();

    for (index, raw) in input.lines().enumerate() {
        let line = strip_line(raw);
        if line.is_empty() {
            continue;
        }

        builder
            .apply(line)
            .map_err(|reason| TuringMachineError::Syntax {
                line_number: index + 1,
                line: line.to_string(),
                reason,
            })?;
    }

    builder.build()
}

/// Removes a trailing `;` comment and trailing whitespace.
fn strip_line(raw: &str) -> &str {
    let content = match raw.find(COMMENT_SYMBOL) {
        Some(at) => &raw[..at],
        None => raw,
    };

    content.trim_end()
}

/// Accumulates declarations and rules line by line.
///
/// Each `apply` either fully succeeds or returns the reason the line was rejected.
#[derive(Debug, Default)]
struct MachineBuilder {
    states: Option<Vec<State>>,
    input_alphabet: Option<Vec<char>>,
    tape_alphabet: Option<Vec<char>>,
    initial_state: Option<usize>,
    blank_declared: bool,
    finals_declared: bool,
    tracks: Option<usize>,
}

impl MachineBuilder {
    fn apply(&mut self, line: &str) -> Result<(), String> {
        let pair = DescriptionParser::parse(Rule::line, line)
            .map_err(describe_pest_error)?
            .next()
            .and_then(|line| line.into_inner().next())
            .ok_or_else(|| "empty line".to_string())?;

        match pair.as_rule() {
            Rule::states_decl => self.declare_states(pair),
            Rule::input_alphabet_decl => self.declare_input_alphabet(pair),
            Rule::tape_alphabet_decl => self.declare_tape_alphabet(pair),
            Rule::initial_decl => self.declare_initial_state(pair),
            Rule::blank_decl => self.declare_blank(pair),
            Rule::final_decl => self.declare_final_states(pair),
            Rule::tracks_decl => self.declare_tracks(pair),
            Rule::transition => self.add_transition(pair),
            rule => Err(format!("unexpected {rule:?}")),
        }
    }

    fn declare_states(&mut self, pair: Pair<Rule>) -> Result<(), String> {
        check_unique(self.states.is_some(), "#Q")?;

        let mut states: Vec<State> = Vec::new();
        for name in idents(pair.into_inner()) {
            if states.iter().any(|state| state.name == name) {
                return Err(format!("duplicate state {name}"));
            }
            states.push(State::new(name));
        }

        debug!(count = states.len(), "declared states");
        self.states = Some(states);
        Ok(())
    }

    fn declare_input_alphabet(&mut self, pair: Pair<Rule>) -> Result<(), String> {
        check_unique(self.input_alphabet.is_some(), "#S")?;

        let symbols = symbols(pair.into_inner());
        if let Some(&reserved) = symbols
            .iter()
            .find(|&&c| c == BLANK_SYMBOL || c == WILDCARD_SYMBOL)
        {
            return Err(format!(
                "\"{reserved}\" is reserved and cannot be an input symbol"
            ));
        }

        debug!(?symbols, "declared input alphabet");
        self.input_alphabet = Some(symbols);
        Ok(())
    }

    fn declare_tape_alphabet(&mut self, pair: Pair<Rule>) -> Result<(), String> {
        check_unique(self.tape_alphabet.is_some(), "#G")?;

        let input = self
            .input_alphabet
            .as_ref()
            .ok_or_else(|| "tape alphabet declared before input alphabet (#S)".to_string())?;

        let symbols = symbols(pair.into_inner());
        if symbols.contains(&WILDCARD_SYMBOL) {
            return Err(format!(
                "\"{WILDCARD_SYMBOL}\" is reserved and cannot be a tape symbol"
            ));
        }
        if let Some(missing) = input.iter().find(|c| !symbols.contains(c)) {
            return Err(format!(
                "input symbol \"{missing}\" is not in the tape alphabet"
            ));
        }
        if !symbols.contains(&BLANK_SYMBOL) {
            return Err(format!(
                "tape alphabet must contain the blank symbol \"{BLANK_SYMBOL}\""
            ));
        }

        debug!(?symbols, "declared tape alphabet");
        self.tape_alphabet = Some(symbols);
        Ok(())
    }

    fn declare_initial_state(&mut self, pair: Pair<Rule>) -> Result<(), String> {
        check_unique(self.initial_state.is_some(), "#q0")?;

        let name = pair.into_inner().as_str();
        let index = self.resolve(name)?;

        debug!(state = name, "declared initial state");
        self.initial_state = Some(index);
        Ok(())
    }

    fn declare_blank(&mut self, pair: Pair<Rule>) -> Result<(), String> {
        check_unique(self.blank_declared, "#B")?;

        let symbol = pair.into_inner().as_str();
        if symbol != BLANK_SYMBOL.to_string() {
            return Err(format!("blank symbol must be \"{BLANK_SYMBOL}\""));
        }

        self.blank_declared = true;
        Ok(())
    }

    fn declare_final_states(&mut self, pair: Pair<Rule>) -> Result<(), String> {
        check_unique(self.finals_declared, "#F")?;

        let finals = idents(pair.into_inner())
            .into_iter()
            .map(|name| self.resolve(name))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(states) = self.states.as_mut() {
            for index in finals {
                states[index].is_final = true;
            }
        }

        self.finals_declared = true;
        Ok(())
    }

    fn declare_tracks(&mut self, pair: Pair<Rule>) -> Result<(), String> {
        check_unique(self.tracks.is_some(), "#N")?;

        let count = pair.into_inner().as_str();
        let tracks = count
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_TRACKS).contains(n))
            .ok_or_else(|| format!("track count must be between 1 and {MAX_TRACKS}"))?;

        debug!(tracks, "declared track count");
        self.tracks = Some(tracks);
        Ok(())
    }

    fn add_transition(&mut self, pair: Pair<Rule>) -> Result<(), String> {
        let tracks = self
            .tracks
            .ok_or_else(|| "rule declared before track count (#N)".to_string())?;
        let alphabet = self
            .tape_alphabet
            .as_ref()
            .ok_or_else(|| "rule declared before tape alphabet (#G)".to_string())?;

        let mut fields = pair.into_inner();
        let mut next = || fields.next().map(|p| p.as_str()).unwrap_or_default();
        let (source, read, write, directions, destination) =
            (next(), next(), next(), next(), next());

        for (name, field) in [("read", read), ("write", write), ("direction", directions)] {
            let width = field.chars().count();
            if width != tracks {
                return Err(format!(
                    "{name} field \"{field}\" has {width} symbols, expected {tracks}"
                ));
            }
        }

        let source = self.resolve(source)?;
        let next_state = self.resolve(destination)?;

        let mut transition = Transition {
            read: Vec::with_capacity(tracks),
            write: Vec::with_capacity(tracks),
            directions: Vec::with_capacity(tracks),
            next_state,
        };

        let columns = read.chars().zip(write.chars()).zip(directions.chars());
        for (track, ((r, w), d)) in columns.enumerate() {
            let r = parse_read(r, alphabet)?;
            let w = parse_write(w, alphabet)?;
            if r != Read::Any && w == Write::Keep {
                return Err(format!(
                    "wildcard write on track {track} requires a wildcard read"
                ));
            }
            let d = Direction::from_char(d).ok_or_else(|| {
                format!("unsupported direction \"{d}\" on track {track}, expected l, r or *")
            })?;

            transition.read.push(r);
            transition.write.push(w);
            transition.directions.push(d);
        }

        if let Some(states) = self.states.as_mut() {
            debug!(state = %states[source].name, rule = states[source].transitions.len(), "added rule");
            states[source].transitions.push(transition);
        }

        Ok(())
    }

    /// Resolves a state name against the states declared so far.
    fn resolve(&self, name: &str) -> Result<usize, String> {
        self.states
            .as_ref()
            .ok_or_else(|| format!("state {name} referenced before states (#Q) are declared"))?
            .iter()
            .position(|state| state.name == name)
            .ok_or_else(|| format!("no state named {name}"))
    }

    fn build(self) -> Result<Machine, TuringMachineError> {
        let states = check_required(self.states, "#Q")?;
        let input_alphabet = check_required(self.input_alphabet, "#S")?;
        let tape_alphabet = check_required(self.tape_alphabet, "#G")?;
        let initial_state = check_required(self.initial_state, "#q0")?;
        let tracks = check_required(self.tracks, "#N")?;

        Ok(Machine {
            states,
            initial_state,
            input_alphabet,
            tape_alphabet,
            tracks,
        })
    }
}

fn parse_read(symbol: char, alphabet: &[char]) -> Result<Read, String> {
    match symbol {
        WILDCARD_SYMBOL => Ok(Read::Any),
        c if alphabet.contains(&c) => Ok(Read::Symbol(c)),
        c => Err(format!("read symbol \"{c}\" is not in the tape alphabet")),
    }
}

fn parse_write(symbol: char, alphabet: &[char]) -> Result<Write, String> {
    match symbol {
        WILDCARD_SYMBOL => Ok(Write::Keep),
        c if alphabet.contains(&c) => Ok(Write::Symbol(c)),
        c => Err(format!("write symbol \"{c}\" is not in the tape alphabet")),
    }
}

/// Collects every identifier below the given pairs.
fn idents<'i>(pairs: Pairs<'i, Rule>) -> Vec<&'i str> {
    pairs
        .flatten()
        .filter(|p| p.as_rule() == Rule::ident)
        .map(|p| p.as_str())
        .collect()
}

/// Collects every symbol below the given pairs, dropping repeats.
fn symbols(pairs: Pairs<Rule>) -> Vec<char> {
    let mut symbols = Vec::new();
    for c in pairs
        .flatten()
        .filter(|p| p.as_rule() == Rule::symbol)
        .filter_map(|p| p.as_str().chars().next())
    {
        if !symbols.contains(&c) {
            symbols.push(c);
        }
    }
    symbols
}

/// Checks if a declaration has already been seen.
fn check_unique(seen: bool, name: &str) -> Result<(), String> {
    if seen {
        return Err(format!("duplicate \"{name}\" declaration"));
    }
    Ok(())
}

/// Checks if a required declaration is present, returning an `Err` if it's missing.
fn check_required<T>(value: Option<T>, name: &'static str) -> Result<T, TuringMachineError> {
    value.ok_or(TuringMachineError::MissingDeclaration(name))
}

/// Turns a grammar failure into a short, human-readable reason.
fn describe_pest_error(error: Error<Rule>) -> String {
    error
        .renamed_rules(|rule| {
            let name = match rule {
                Rule::states_decl => "#Q = {...}",
                Rule::input_alphabet_decl => "#S = {...}",
                Rule::tape_alphabet_decl => "#G = {...}",
                Rule::initial_decl => "#q0 = <state>",
                Rule::blank_decl => "#B = _",
                Rule::final_decl => "#F = {...}",
                Rule::tracks_decl => "#N = <count>",
                Rule::transition => "a rule",
                Rule::ident => "a state name",
                Rule::symbol => "a symbol",
                Rule::field => "a field",
                Rule::count => "a number",
                Rule::EOI => "end of line",
                other => return format!("{other:?}"),
            };
            name.to_string()
        })
        .variant
        .message()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINARY: &str = r#"
; accepts any binary string
#Q = {q0, q1}
#S = {0, 1}
#G = {0, 1, _}
#q0 = q0
#B = _
#F = {q1}
#N = 1

q0 0 0 r q0
q0 1 1 r q0
q0 _ _ * q1 ; done
"#;

    fn syntax_line(result: Result<Machine, TuringMachineError>) -> (usize, String, String) {
        match result {
            Err(TuringMachineError::Syntax {
                line_number,
                line,
                reason,
            }) => (line_number, line, reason),
            other => panic!("Expected a syntax error, but got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_machine() {
        let machine = parse(BINARY).unwrap();

        assert_eq!(machine.tracks(), 1);
        assert_eq!(machine.input_alphabet(), &['0', '1']);
        assert_eq!(machine.tape_alphabet(), &['0', '1', '_']);
        assert_eq!(machine.state(machine.initial_state()).name, "q0");
        assert_eq!(machine.final_states().collect::<Vec<_>>(), vec![1]);

        let q0 = machine.state(0);
        assert_eq!(q0.transitions.len(), 3);
        assert_eq!(
            q0.transitions[2],
            Transition {
                read: vec![Read::Symbol('_')],
                write: vec![Write::Symbol('_')],
                directions: vec![Direction::Stay],
                next_state: 1,
            }
        );
        assert!(machine.state(1).transitions.is_empty());
    }

    #[test]
    fn test_parse_compact_declarations() {
        let input = "#Q={q0,q1}\n#S={0,1}\n#G={0,1,_}\n#q0=q0\n#F={q1}\n#N=1\nq0 0 0 r q0\n";
        let machine = parse(input).unwrap();

        assert_eq!(machine.states().len(), 2);
        assert!(machine.state(1).is_final);
    }

    #[test]
    fn test_parse_empty_sets() {
        let input = "#Q = {q0}\n#S = {}\n#G = {_}\n#q0 = q0\n#F = {}\n#N = 1\n";
        let machine = parse(input).unwrap();

        assert!(machine.input_alphabet().is_empty());
        assert_eq!(machine.final_states().count(), 0);
    }

    #[test]
    fn test_parse_multi_track_rule() {
        let input = r#"
#Q = {copy, back, done}
#S = {a, b}
#G = {a, b, _}
#q0 = copy
#F = {done}
#N = 2
copy *_ *_ rr copy
copy __ __ l* back
back ** ** *l done
"#;
        let machine = parse(input).unwrap();
        let copy = &machine.state(0).transitions[0];

        assert_eq!(copy.read, vec![Read::Any, Read::Symbol('_')]);
        assert_eq!(copy.write, vec![Write::Keep, Write::Symbol('_')]);
        assert_eq!(copy.directions, vec![Direction::Right, Direction::Right]);
        assert_eq!(machine.state(1).transitions[0].next_state, 2);
    }

    #[test]
    fn test_rules_keep_file_order() {
        let input = r#"
#Q = {q0, a, b}
#S = {0}
#G = {0, _}
#q0 = q0
#N = 1
q0 * * r a
q0 0 0 r b
"#;
        let machine = parse(input).unwrap();
        let targets: Vec<_> = machine
            .state(0)
            .transitions
            .iter()
            .map(|t| t.next_state)
            .collect();

        assert_eq!(targets, vec![1, 2]);
    }

    #[test]
    fn test_wildcard_write_requires_wildcard_read() {
        let input = BINARY.replace("q0 1 1 r q0", "q0 1 * r q0");
        let (line_number, line, reason) = syntax_line(parse(&input));

        assert_eq!(line_number, 12);
        assert_eq!(line, "q0 1 * r q0");
        assert!(reason.contains("wildcard write"));
    }

    #[test]
    fn test_explicit_write_after_wildcard_read_is_allowed() {
        let input = BINARY.replace("q0 1 1 r q0", "q0 * 1 r q0");
        assert!(parse(&input).is_ok());
    }

    #[test]
    fn test_undeclared_state_in_rule() {
        let input = BINARY.replace("q0 _ _ * q1", "q0 _ _ * q9");
        let (_, line, reason) = syntax_line(parse(&input));

        assert_eq!(line, "q0 _ _ * q9");
        assert_eq!(reason, "no state named q9");
    }

    #[test]
    fn test_rule_width_must_match_tracks() {
        let input = BINARY.replace("q0 0 0 r q0", "q0 00 0 r q0");
        let (_, _, reason) = syntax_line(parse(&input));

        assert!(reason.contains("expected 1"));
    }

    #[test]
    fn test_rule_symbol_outside_tape_alphabet() {
        let input = BINARY.replace("q0 0 0 r q0", "q0 0 x r q0");
        let (_, _, reason) = syntax_line(parse(&input));

        assert!(reason.contains("\"x\""));
    }

    #[test]
    fn test_unsupported_direction() {
        let input = BINARY.replace("q0 0 0 r q0", "q0 0 0 R q0");
        let (_, _, reason) = syntax_line(parse(&input));

        assert!(reason.contains("unsupported direction"));
    }

    #[test]
    fn test_rule_with_missing_field() {
        let input = BINARY.replace("q0 0 0 r q0", "q0 0 0 r");
        let (_, line, _) = syntax_line(parse(&input));

        assert_eq!(line, "q0 0 0 r");
    }

    #[test]
    fn test_final_states_before_states() {
        let input = "#F = {q1}\n#Q = {q0, q1}\n";
        let (line_number, _, reason) = syntax_line(parse(input));

        assert_eq!(line_number, 1);
        assert!(reason.contains("before states"));
    }

    #[test]
    fn test_initial_state_must_exist() {
        let input = BINARY.replace("#q0 = q0", "#q0 = start");
        let (_, line, _) = syntax_line(parse(&input));

        assert_eq!(line, "#q0 = start");
    }

    #[test]
    fn test_tape_alphabet_must_contain_blank() {
        let input = BINARY.replace("#G = {0, 1, _}", "#G = {0, 1}");
        let (_, _, reason) = syntax_line(parse(&input));

        assert!(reason.contains("blank"));
    }

    #[test]
    fn test_tape_alphabet_must_cover_input() {
        let input = BINARY.replace("#G = {0, 1, _}", "#G = {0, _}");
        let (_, _, reason) = syntax_line(parse(&input));

        assert!(reason.contains("\"1\""));
    }

    #[test]
    fn test_tape_alphabet_before_input_alphabet() {
        let input = "#Q = {q0}\n#G = {0, _}\n#S = {0}\n";
        let (line_number, _, _) = syntax_line(parse(input));

        assert_eq!(line_number, 2);
    }

    #[test]
    fn test_input_alphabet_rejects_blank() {
        let input = BINARY.replace("#S = {0, 1}", "#S = {0, _}");
        assert!(parse(&input).unwrap_err().is_description_error());
    }

    #[test]
    fn test_multi_character_symbol() {
        let input = BINARY.replace("#S = {0, 1}", "#S = {0, 10}");
        let (_, line, _) = syntax_line(parse(&input));

        assert_eq!(line, "#S = {0, 10}");
    }

    #[test]
    fn test_blank_declaration_must_be_underscore() {
        let input = BINARY.replace("#B = _", "#B = 0");
        let (_, _, reason) = syntax_line(parse(&input));

        assert!(reason.contains("blank symbol"));
    }

    #[test]
    fn test_track_count_bounds() {
        for count in ["0", "2147483648", "99999999999999999999999"] {
            let input = BINARY.replace("#N = 1", &format!("#N = {count}"));
            let (_, _, reason) = syntax_line(parse(&input));
            assert!(reason.contains("track count"), "{count}: {reason}");
        }
    }

    #[test]
    fn test_duplicate_declaration() {
        let input = BINARY.replace("#N = 1", "#N = 1\n#N = 1");
        let (_, _, reason) = syntax_line(parse(&input));

        assert_eq!(reason, "duplicate \"#N\" declaration");
    }

    #[test]
    fn test_duplicate_state_name() {
        let input = BINARY.replace("#Q = {q0, q1}", "#Q = {q0, q1, q0}");
        let (_, _, reason) = syntax_line(parse(&input));

        assert_eq!(reason, "duplicate state q0");
    }

    #[test]
    fn test_unknown_declaration() {
        let input = BINARY.replace("#B = _", "#X = _");
        let (_, line, _) = syntax_line(parse(&input));

        assert_eq!(line, "#X = _");
    }

    #[test]
    fn test_rule_before_track_count() {
        let input = "#Q = {q0}\n#S = {}\n#G = {_}\nq0 _ _ * q0\n#N = 1\n";
        let (line_number, _, reason) = syntax_line(parse(input));

        assert_eq!(line_number, 4);
        assert!(reason.contains("#N"));
    }

    #[test]
    fn test_missing_declaration() {
        let input = "#Q = {q0}\n#S = {}\n#G = {_}\n#q0 = q0\n";
        let error = parse(input).unwrap_err();

        assert_eq!(error, TuringMachineError::MissingDeclaration("#N"));
        assert_eq!(error.to_string(), "syntax error: missing #N declaration");
    }

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let input = "; header\n\n   \n#Q = {q0} ; states\n#S = {};\n#G = {_}\t\n#q0 = q0\n#N = 1\n";
        assert!(parse(input).is_ok());
    }

    #[test]
    fn test_strip_line() {
        assert_eq!(strip_line("q0 0 0 r q0 ; move"), "q0 0 0 r q0");
        assert_eq!(strip_line("#N = 1   \r"), "#N = 1");
        assert_eq!(strip_line("; only a comment"), "");
    }
}
