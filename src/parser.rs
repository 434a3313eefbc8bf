//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//! It splits the input into records with the grammar in `grammar.pest` and then assembles
//! the header and transition rows into a `Program`.

use crate::types::{NtmError, Program, TransitionRow};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// A non-blank line of the description with its trimmed fields.
struct Record {
    line: usize,
    fields: Vec<String>,
}

impl Record {
    fn first(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    /// Returns the non-empty fields, for the informational header lists.
    fn values(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| !field.is_empty())
            .cloned()
            .collect()
    }
}

/// Parses the given input string into a `Program` struct.
///
/// This is the main entry point for parsing machine descriptions. Blank lines are skipped.
/// The first seven records form the header (name, states, input alphabet, tape alphabet,
/// start state, accept state, reject state); each later record is a transition row of the
/// form `current_state, symbol, next_state, write_symbol, move`. The transition table is
/// built once before returning so that malformed rows are reported here.
///
/// # Arguments
///
/// * `input` - A string slice containing the machine description.
///
/// # Returns
///
/// * `Ok(Program)` if the input is successfully parsed and its rows are well formed.
/// * `Err(NtmError::ParseError)` if there are any syntax errors.
/// * `Err(NtmError::MissingHeader)` if the header is incomplete.
/// * Any error of `TransitionTable::new` for malformed rows.
pub fn parse(input: &str) -> Result<Program, NtmError> {
    let records = DescriptionParser::parse(Rule::description, input)
        .map_err(|e| NtmError::ParseError(Box::new(e)))?
        .next()
        .map(parse_records)
        .unwrap_or_default();

    let program = parse_program(records)?;

    // Build the table once to reject malformed rows up front.
    program.table()?;

    Ok(program)
}

/// Collects the non-blank records of a `Pair<Rule::description>`.
fn parse_records(pair: Pair<Rule>) -> Vec<Record> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::record)
        .map(|p| {
            let (line, _) = p.as_span().start_pos().line_col();
            let fields = p
                .into_inner()
                .map(|field| field.as_str().trim().to_string())
                .collect();

            Record { line, fields }
        })
        .filter(|record| record.fields.iter().any(|field| !field.is_empty()))
        .collect()
}

/// Splits records into the header and the transition rows.
fn parse_program(records: Vec<Record>) -> Result<Program, NtmError> {
    let mut records = records.into_iter();
    let mut header =
        |field: &'static str| records.next().ok_or(NtmError::MissingHeader(field));

    let name = header("machine name")?;
    let states = header("states")?;
    let input_alphabet = header("input alphabet")?;
    let tape_alphabet = header("tape alphabet")?;
    let start = header("start state")?;
    let accept = header("accept state")?;
    let reject = header("reject state")?;

    Ok(Program {
        name: check_required_field(&name, "machine name")?,
        states: states.values(),
        input_alphabet: input_alphabet.values(),
        tape_alphabet: tape_alphabet.values(),
        start_state: check_required_field(&start, "start state")?,
        accept_state: check_required_field(&accept, "accept state")?,
        reject_state: check_required_field(&reject, "reject state")?,
        rows: records
            .map(|record| TransitionRow {
                line: record.line,
                fields: record.fields,
            })
            .collect(),
    })
}

/// Returns the first field of a header record, which must not be empty.
fn check_required_field(record: &Record, name: &'static str) -> Result<String, NtmError> {
    match record.first() {
        "" => Err(NtmError::MissingHeader(name)),
        value => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    const CONTAINS_11: &str = "\
Contains 11
q0,q1,qacc,qrej
0,1
0,1,_
q0
qacc
qrej
q0,0,q0,0,R
q0,1,q0,1,R
q0,1,q1,1,R
q0,_,qrej,_,R
q1,1,qacc,1,R
";

    #[test]
    fn test_parse_simple_program() {
        let result = parse(CONTAINS_11);
        assert!(result.is_ok());

        let program = result.unwrap();
        assert_eq!(program.name, "Contains 11");
        assert_eq!(program.states, vec!["q0", "q1", "qacc", "qrej"]);
        assert_eq!(program.input_alphabet, vec!["0", "1"]);
        assert_eq!(program.tape_alphabet, vec!["0", "1", "_"]);
        assert_eq!(program.start_state, "q0");
        assert_eq!(program.accept_state, "qacc");
        assert_eq!(program.reject_state, "qrej");
        assert_eq!(program.transition_count(), 5);
        assert_eq!(
            program.rows[0],
            TransitionRow::new(8, ["q0", "0", "q0", "0", "R"])
        );
    }

    #[test]
    fn test_parse_builds_table_in_row_order() {
        let program = parse(CONTAINS_11).unwrap();
        let table = program.table().unwrap();

        let q0 = table.state_id("q0").unwrap();
        let q1 = table.state_id("q1").unwrap();
        let transitions = table.lookup(q0, '1');

        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].next_state, q0);
        assert_eq!(transitions[1].next_state, q1);
        assert_eq!(transitions[1].direction, Direction::Right);
    }

    #[test]
    fn test_parse_trims_fields_and_skips_blank_lines() {
        let input = "\r\n  Spaced  \r\nq0 , qa\r\n\r\n0\r\n0,_\r\n q0 \r\nqa\r\nqr\r\n\r\n q0 , 0 , qa , 0 , R \r\n";

        let program = parse(input).unwrap();
        assert_eq!(program.name, "Spaced");
        assert_eq!(program.states, vec!["q0", "qa"]);
        assert_eq!(program.start_state, "q0");
        assert_eq!(
            program.rows,
            vec![TransitionRow::new(11, ["q0", "0", "qa", "0", "R"])]
        );
    }

    #[test]
    fn test_parse_missing_header() {
        let input = "Short\nq0,qa,qr\n0\n0,_\nq0\nqa\n";

        let error = parse(input).unwrap_err();
        assert_eq!(error, NtmError::MissingHeader("reject state"));
        assert_eq!(error.to_string(), "Missing reject state line");
    }

    #[test]
    fn test_parse_empty_input() {
        let error = parse("").unwrap_err();
        assert_eq!(error, NtmError::MissingHeader("machine name"));
    }

    #[test]
    fn test_parse_empty_start_state() {
        let input = "No Start\nq0,qa,qr\n0\n0,_\n,q0\nqa\nqr\n";

        let error = parse(input).unwrap_err();
        assert_eq!(error, NtmError::MissingHeader("start state"));
    }

    #[test]
    fn test_parse_malformed_row_names_line() {
        let input = "Bad Row\nq0,qa,qr\n0\n0,_\nq0\nqa\nqr\nq0,0,qa,0,R\nq0,1,qa,1\n";

        let error = parse(input).unwrap_err();
        assert_eq!(
            error,
            NtmError::MalformedRow {
                line: 9,
                message: "expected 5 fields, found 4".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_unsupported_move() {
        let input = "Bad Move\nq0,qa,qr\n0\n0,_\nq0\nqa\nqr\nq0,0,qa,0,S\n";

        let error = parse(input).unwrap_err();
        assert!(matches!(error, NtmError::InvalidMove { line: 8, .. }));
    }

    #[test]
    fn test_parse_rejects_quotes() {
        let input = "\"Quoted\"\nq0\n0\n0\nq0\nqa\nqr\n";

        let result = parse(input);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(matches!(error, NtmError::ParseError(_)));
    }

    #[test]
    fn test_parse_without_transitions() {
        let input = "Empty\nq0\n0\n0\nq0\nq0\nqr";

        let program = parse(input).unwrap();
        assert!(program.rows.is_empty());
        assert_eq!(program.start_state, program.accept_state);
    }
}
