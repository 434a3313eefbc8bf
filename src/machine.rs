//! This module defines `NonDeterministicMachine`, which explores every branch of a
//! non-deterministic Turing machine breadth-first. Configurations live in an arena and
//! refer to their parent by index, so the accepting path is recovered by walking back
//! from the accepting configuration to the root.

use std::collections::VecDeque;
use std::ops::Range;

use crate::report::{Outcome, PathEntry, Trace};
use crate::table::{StateId, TransitionTable};
use crate::types::{Direction, Step, Transition, BLANK_SYMBOL};

/// A snapshot of the machine at one node of the exploration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    left: Vec<char>,
    state: StateId,
    right: VecDeque<char>,
    parent: Option<usize>,
}

impl Configuration {
    fn root(state: StateId, input: &str) -> Self {
        Self {
            left: Vec::new(),
            state,
            right: input.chars().collect(),
            parent: None,
        }
    }

    /// Tape content strictly left of the head.
    pub fn left(&self) -> &[char] {
        &self.left
    }

    /// Tape content from the head rightward, head symbol first.
    pub fn right(&self) -> &VecDeque<char> {
        &self.right
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    /// Arena index of the configuration this one was produced from.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Returns the symbol under the head, or the blank symbol past the end of the tape.
    pub fn head(&self) -> char {
        self.right.front().copied().unwrap_or(BLANK_SYMBOL)
    }

    /// Applies `transition` to this configuration, producing the child stored at `parent`'s slot.
    fn child(&self, parent: usize, transition: &Transition) -> Self {
        let mut left = self.left.clone();
        let mut right = self.right.clone();

        // The head cell is overwritten.
        right.pop_front();

        match transition.direction {
            Direction::Right => left.push(transition.write),
            Direction::Left => {
                let head = left.pop().unwrap_or(BLANK_SYMBOL);
                right.push_front(transition.write);
                right.push_front(head);
            }
        }

        Self {
            left,
            state: transition.next_state,
            right,
            parent: Some(parent),
        }
    }
}

/// Counters behind the average non-determinism figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// One per child configuration produced.
    pub total_transitions: usize,
    /// Sum of the sizes of every level whose expansion produced a non-empty next level.
    pub total_non_leaf_configurations: usize,
}

impl Statistics {
    /// Returns `total_transitions / total_non_leaf_configurations`, or 0 when nothing was expanded.
    pub fn average_nondeterminism(&self) -> f64 {
        if self.total_non_leaf_configurations == 0 {
            return 0.0;
        }

        self.total_transitions as f64 / self.total_non_leaf_configurations as f64
    }
}

/// Breadth-first explorer of a non-deterministic Turing machine's configuration tree.
///
/// Levels are contiguous ranges of the arena, since each level is appended in full before
/// the next one starts. Every configuration stays in the arena until the machine is dropped
/// or reset.
pub struct NonDeterministicMachine<'t> {
    table: &'t TransitionTable,
    input: String,
    configurations: Vec<Configuration>,
    level: Range<usize>,
    step_count: usize,
    statistics: Statistics,
    outcome: Option<Outcome>,
}

impl<'t> NonDeterministicMachine<'t> {
    /// Creates a machine whose only level holds the root configuration for `input`.
    pub fn new(table: &'t TransitionTable, input: &str) -> Self {
        Self {
            table,
            input: input.to_string(),
            configurations: vec![Configuration::root(table.start_state(), input)],
            level: 0..1,
            step_count: 0,
            statistics: Statistics::default(),
            outcome: None,
        }
    }

    /// Consumes the current frontier level and produces the next one.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if the level produced at least one child.
    /// * `Step::Halt(Outcome::Accepted)` if a configuration in the level is in the accept state.
    /// * `Step::Halt(Outcome::Rejected)` if the level produced no children.
    ///
    /// Once halted, further calls return the same outcome.
    pub fn step(&mut self) -> Step {
        if let Some(outcome) = &self.outcome {
            return Step::Halt(outcome.clone());
        }

        let table = self.table;
        let level = self.level.clone();
        let next_start = self.configurations.len();

        for id in level.clone() {
            let state = self.configurations[id].state;

            if state == table.accept_state() {
                // Children already appended for this level are never examined.
                self.configurations.truncate(next_start);
                let path = self.path(id);
                let outcome = Outcome::Accepted {
                    steps: self.step_count,
                    depth: path.len() - 1,
                    path,
                    average_nondeterminism: self.statistics.average_nondeterminism(),
                };
                return Step::Halt(self.finish(outcome));
            }

            if state == table.reject_state() {
                continue;
            }

            let head = self.configurations[id].head();
            let transitions = table.lookup(state, head);
            if transitions.is_empty() {
                tracing::trace!(
                    state = table.state_name(state),
                    %head,
                    "dead end"
                );
                continue;
            }

            for transition in transitions {
                let child = self.configurations[id].child(id, transition);
                self.configurations.push(child);
            }
            self.statistics.total_transitions += transitions.len();
        }

        let next = next_start..self.configurations.len();
        if next.is_empty() {
            let outcome = Outcome::Rejected {
                steps: self.step_count,
                average_nondeterminism: self.statistics.average_nondeterminism(),
            };
            return Step::Halt(self.finish(outcome));
        }

        tracing::debug!(
            step = self.step_count,
            configurations = level.len(),
            children = next.len(),
            "expanded frontier level"
        );

        self.statistics.total_non_leaf_configurations += level.len();
        self.step_count += 1;
        self.level = next;

        Step::Continue
    }

    /// Runs until the machine accepts, rejects, or its step counter reaches `max_steps`.
    ///
    /// A run decided at step `k` keeps its outcome for every limit above `k`. A limit of
    /// `Some(0)` stops before the root level is examined.
    pub fn run(&mut self, max_steps: Option<usize>) -> Outcome {
        loop {
            if let Some(outcome) = &self.outcome {
                return outcome.clone();
            }

            if let Some(limit) = max_steps {
                if self.step_count >= limit {
                    let outcome = Outcome::StepLimitReached {
                        limit,
                        average_nondeterminism: self.statistics.average_nondeterminism(),
                    };
                    return self.finish(outcome);
                }
            }

            if let Step::Halt(outcome) = self.step() {
                return outcome;
            }
        }
    }

    /// Discards everything but the root configuration and clears the counters.
    pub fn reset(&mut self) {
        self.configurations.truncate(1);
        self.level = 0..1;
        self.step_count = 0;
        self.statistics = Statistics::default();
        self.outcome = None;
    }

    /// Returns the input string the root configuration was built from.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the number of completed steps.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// Returns the configurations of the current level, in level order.
    pub fn frontier(&self) -> &[Configuration] {
        &self.configurations[self.level.clone()]
    }

    /// Returns a configuration by arena index.
    pub fn configuration(&self, id: usize) -> Option<&Configuration> {
        self.configurations.get(id)
    }

    /// Returns the number of configurations created so far, the root included.
    pub fn configuration_count(&self) -> usize {
        self.configurations.len()
    }

    /// Returns the outcome once the run has halted.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.outcome.is_some()
    }

    /// Resolves a configuration into its printable parts.
    pub fn render(&self, configuration: &Configuration) -> PathEntry {
        PathEntry {
            left: configuration.left.iter().collect(),
            state: self.table.state_name(configuration.state).to_string(),
            head: configuration.head(),
            rest: configuration.right.iter().skip(1).collect(),
        }
    }

    /// Walks parent links from `id` back to the root and returns the path in root-first order.
    fn path(&self, id: usize) -> Vec<PathEntry> {
        let mut ids = Vec::new();
        let mut current = Some(id);

        while let Some(id) = current {
            ids.push(id);
            current = self.configurations[id].parent;
        }

        ids.iter()
            .rev()
            .map(|&id| self.render(&self.configurations[id]))
            .collect()
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        match &outcome {
            Outcome::Accepted { steps, depth, .. } => {
                tracing::info!(input = %self.input, steps, depth, "string accepted")
            }
            Outcome::Rejected { steps, .. } => {
                tracing::info!(input = %self.input, steps, "string rejected")
            }
            Outcome::StepLimitReached { limit, .. } => {
                tracing::info!(input = %self.input, limit, "step limit reached")
            }
        }

        tracing::debug!(
            configurations = self.configurations.len(),
            total_transitions = self.statistics.total_transitions,
            total_non_leaf_configurations = self.statistics.total_non_leaf_configurations,
            "run finished"
        );

        self.outcome = Some(outcome.clone());
        outcome
    }
}

/// Simulates `input` on the machine described by `table`.
///
/// A limit of `None` explores until the run is decided, which never happens for machines
/// with an infinite branch and no accepting one.
pub fn simulate(table: &TransitionTable, input: &str, max_steps: Option<usize>) -> Trace {
    let mut machine = NonDeterministicMachine::new(table, input);
    let outcome = machine.run(max_steps);

    Trace {
        input: input.to_string(),
        outcome,
    }
}
