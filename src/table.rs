//! This module provides the `TransitionTable`, the immutable lookup structure the engine
//! consults for every configuration it expands.

use crate::types::{Direction, NtmError, Program, Transition, TransitionRow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A dense identifier for a state name, assigned in order of first appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    /// Returns the position of the state in the table's interning order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Maps `(state, symbol)` to the ordered transitions leaving it.
///
/// Transitions sharing a key keep the order of the rows they came from. That order decides
/// the order of sibling configurations in the next frontier level.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    states: Vec<String>,
    ids: HashMap<String, StateId>,
    transitions: HashMap<(StateId, char), Vec<Transition>>,
    start: StateId,
    accept: StateId,
    reject: StateId,
    len: usize,
}

impl TransitionTable {
    /// Builds a table from the three distinguished states and the raw transition rows.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if every row is well formed.
    /// * `Err(NtmError::MissingHeader)` if one of the distinguished states is empty.
    /// * `Err(NtmError::MalformedRow)` if a row does not have five fields or names an empty state.
    /// * `Err(NtmError::InvalidSymbol)` if a read or written symbol is not a single character.
    /// * `Err(NtmError::InvalidMove)` if the move is not `L`, `R`, `<` or `>`.
    pub fn new<'a, I>(start: &str, accept: &str, reject: &str, rows: I) -> Result<Self, NtmError>
    where
        I: IntoIterator<Item = &'a TransitionRow>,
    {
        let start = check_header(start, "start state")?;
        let accept = check_header(accept, "accept state")?;
        let reject = check_header(reject, "reject state")?;

        let mut table = Self {
            states: Vec::new(),
            ids: HashMap::new(),
            transitions: HashMap::new(),
            start: StateId(0),
            accept: StateId(0),
            reject: StateId(0),
            len: 0,
        };

        table.start = table.intern(start);
        table.accept = table.intern(accept);
        table.reject = table.intern(reject);

        for row in rows {
            let (key, transition) = table.parse_row(row)?;
            table.transitions.entry(key).or_default().push(transition);
            table.len += 1;
        }

        Ok(table)
    }

    /// Builds a table from a parsed machine description.
    pub fn from_program(program: &Program) -> Result<Self, NtmError> {
        Self::new(
            &program.start_state,
            &program.accept_state,
            &program.reject_state,
            &program.rows,
        )
    }

    /// Returns the transitions for `(state, symbol)`, or an empty slice when there are none.
    pub fn lookup(&self, state: StateId, symbol: char) -> &[Transition] {
        self.transitions
            .get(&(state, symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn start_state(&self) -> StateId {
        self.start
    }

    pub fn accept_state(&self) -> StateId {
        self.accept
    }

    pub fn reject_state(&self) -> StateId {
        self.reject
    }

    /// Returns the id of a state name, if the table has seen it.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.ids.get(name).copied()
    }

    /// Returns the name of a state. The id must come from this table.
    pub fn state_name(&self, id: StateId) -> &str {
        &self.states[id.0]
    }

    /// Returns the number of distinct state names referenced by the table.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns the total number of transitions across all keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn intern(&mut self, name: &str) -> StateId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }

        let id = StateId(self.states.len());
        self.states.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    fn parse_row(&mut self, row: &TransitionRow) -> Result<((StateId, char), Transition), NtmError> {
        let line = row.line;
        let [current, symbol, next, write, movement] = row.fields.as_slice() else {
            return Err(NtmError::MalformedRow {
                line,
                message: format!("expected 5 fields, found {}", row.fields.len()),
            });
        };

        let current = check_state(line, "current state", current)?;
        let symbol = parse_symbol(line, "symbol", symbol)?;
        let next = check_state(line, "next state", next)?;
        let write = parse_symbol(line, "write symbol", write)?;
        let direction =
            Direction::from_symbol(movement).ok_or_else(|| NtmError::InvalidMove {
                line,
                value: movement.clone(),
            })?;

        let current = self.intern(current);
        let next_state = self.intern(next);

        Ok((
            (current, symbol),
            Transition {
                next_state,
                write,
                direction,
            },
        ))
    }
}

fn check_header<'a>(value: &'a str, field: &'static str) -> Result<&'a str, NtmError> {
    if value.is_empty() {
        return Err(NtmError::MissingHeader(field));
    }
    Ok(value)
}

fn check_state<'a>(line: usize, field: &str, value: &'a str) -> Result<&'a str, NtmError> {
    if value.is_empty() {
        return Err(NtmError::MalformedRow {
            line,
            message: format!("empty {field}"),
        });
    }
    Ok(value)
}

/// Parses a tape symbol, which must be exactly one character.
fn parse_symbol(line: usize, field: &'static str, value: &str) -> Result<char, NtmError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(NtmError::InvalidSymbol {
            line,
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: usize, fields: &[&str]) -> TransitionRow {
        TransitionRow::new(line, fields.iter().copied())
    }

    fn no_rows() -> Vec<TransitionRow> {
        Vec::new()
    }

    #[test]
    fn test_groups_rows_in_order() {
        let rows = vec![
            row(8, &["q0", "0", "q1", "x", "R"]),
            row(9, &["q0", "1", "q2", "x", "R"]),
            row(10, &["q0", "0", "q2", "y", "L"]),
            row(11, &["q0", "0", "q0", "0", "R"]),
        ];
        let table = TransitionTable::new("q0", "qa", "qr", &rows).unwrap();

        let q0 = table.state_id("q0").unwrap();
        let q1 = table.state_id("q1").unwrap();
        let q2 = table.state_id("q2").unwrap();

        assert_eq!(
            table.lookup(q0, '0'),
            &[
                Transition {
                    next_state: q1,
                    write: 'x',
                    direction: Direction::Right,
                },
                Transition {
                    next_state: q2,
                    write: 'y',
                    direction: Direction::Left,
                },
                Transition {
                    next_state: q0,
                    write: '0',
                    direction: Direction::Right,
                },
            ]
        );
        assert_eq!(table.lookup(q0, '1').len(), 1);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_absent_key_has_no_transitions() {
        let rows = vec![row(8, &["q0", "0", "q1", "x", "R"])];
        let table = TransitionTable::new("q0", "qa", "qr", &rows).unwrap();

        let q1 = table.state_id("q1").unwrap();
        assert!(table.lookup(q1, '0').is_empty());
        assert!(table.lookup(table.start_state(), '_').is_empty());
    }

    #[test]
    fn test_distinguished_states_are_interned_first() {
        let table = TransitionTable::new("q0", "qa", "qr", &no_rows()).unwrap();

        assert_eq!(table.start_state().index(), 0);
        assert_eq!(table.state_name(table.accept_state()), "qa");
        assert_eq!(table.state_name(table.reject_state()), "qr");
        assert_eq!(table.state_count(), 3);
        assert!(table.is_empty());
    }

    #[test]
    fn test_start_may_equal_accept() {
        let table = TransitionTable::new("q0", "q0", "qr", &no_rows()).unwrap();

        assert_eq!(table.start_state(), table.accept_state());
        assert_eq!(table.state_count(), 2);
    }

    #[test]
    fn test_wrong_field_count() {
        let rows = vec![row(12, &["q0", "0", "q1", "x"])];
        let error = TransitionTable::new("q0", "qa", "qr", &rows).unwrap_err();

        assert_eq!(
            error,
            NtmError::MalformedRow {
                line: 12,
                message: "expected 5 fields, found 4".to_string(),
            }
        );
        assert_eq!(
            error.to_string(),
            "Malformed transition on line 12: expected 5 fields, found 4"
        );
    }

    #[test]
    fn test_unrecognized_move() {
        let rows = vec![
            row(8, &["q0", "0", "q1", "x", "R"]),
            row(9, &["q0", "1", "q1", "x", "S"]),
        ];
        let error = TransitionTable::new("q0", "qa", "qr", &rows).unwrap_err();

        assert_eq!(
            error,
            NtmError::InvalidMove {
                line: 9,
                value: "S".to_string(),
            }
        );
    }

    #[test]
    fn test_multi_character_symbol() {
        let rows = vec![row(8, &["q0", "01", "q1", "x", "R"])];
        let error = TransitionTable::new("q0", "qa", "qr", &rows).unwrap_err();

        assert!(matches!(
            error,
            NtmError::InvalidSymbol {
                line: 8,
                field: "symbol",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_write_symbol() {
        let rows = vec![row(8, &["q0", "0", "q1", "", "R"])];
        let error = TransitionTable::new("q0", "qa", "qr", &rows).unwrap_err();

        assert!(matches!(
            error,
            NtmError::InvalidSymbol {
                field: "write symbol",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_state_name() {
        let rows = vec![row(8, &["q0", "0", "", "x", "R"])];
        let error = TransitionTable::new("q0", "qa", "qr", &rows).unwrap_err();

        assert!(error.to_string().contains("empty next state"));
    }

    #[test]
    fn test_missing_start_state() {
        let error = TransitionTable::new("", "qa", "qr", &no_rows()).unwrap_err();

        assert_eq!(error, NtmError::MissingHeader("start state"));
    }
}
