// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::command::Command;

/// Default cap on the undo stack.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Paired undo/redo stacks of bounded depth.
///
/// Both stacks hold only fully-formed commands; in-progress edits stay
/// outside the history until committed. Adding any command empties the
/// redo stack, and the undo stack drops its oldest entry once the cap is
/// exceeded.
#[derive(Debug)]
pub struct HistoryManager<C: Command> {
    undo: Vec<C>,
    redo: Vec<C>,
    max: usize,
}

impl<C: Command> Default for HistoryManager<C> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl<C: Command> HistoryManager<C> {
    /// Create a history with the given undo-stack cap (raised to at
    /// least 1).
    #[must_use]
    pub fn new(max_history_size: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max: max_history_size.max(1),
        }
    }

    /// Execute a command against `target`, then record it.
    pub fn execute_command(&mut self, mut command: C, target: &mut C::Target) {
        command.execute(target);
        self.add_command(command);
    }

    /// Record a command whose effect is already applied (live drawing).
    ///
    /// Clears the redo stack, then either folds the command into the top
    /// of the undo stack (when the top accepts the merge) or pushes it,
    /// trimming the oldest entry past the cap.
    pub fn add_command(&mut self, command: C) {
        self.redo.clear();
        if let Some(top) = self.undo.last_mut() {
            if top.can_merge(&command) {
                top.merge(command);
                return;
            }
        }
        self.undo.push(command);
        if self.undo.len() > self.max {
            tracing::trace!(cap = self.max, "history cap reached, dropping oldest command");
            self.undo.remove(0);
        }
    }

    /// Undo the most recent command. Returns `false` on an empty stack.
    pub fn undo(&mut self, target: &mut C::Target) -> bool {
        let Some(mut command) = self.undo.pop() else {
            return false;
        };
        command.undo(target);
        self.redo.push(command);
        true
    }

    /// Redo the most recently undone command. Returns `false` on an empty
    /// stack.
    pub fn redo(&mut self, target: &mut C::Target) -> bool {
        let Some(mut command) = self.redo.pop() else {
            return false;
        };
        command.execute(target);
        self.undo.push(command);
        true
    }

    /// Whether an undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of commands on the undo stack.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of commands on the redo stack.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// The configured undo-stack cap.
    #[must_use]
    pub fn max_history_size(&self) -> usize {
        self.max
    }

    /// Change the cap (raised to at least 1), trimming the oldest
    /// commands if the stack already exceeds it.
    pub fn set_max_history_size(&mut self, max_history_size: usize) {
        self.max = max_history_size.max(1);
        if self.undo.len() > self.max {
            let excess = self.undo.len() - self.max;
            tracing::trace!(excess, "trimming history to new cap");
            self.undo.drain(..excess);
        }
    }

    /// Drop every recorded command.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Toy command: pushes its id on execute, pops on undo.
    struct Push(u32);

    impl Command for Push {
        type Target = Vec<u32>;

        fn execute(&mut self, target: &mut Vec<u32>) {
            target.push(self.0);
        }

        fn undo(&mut self, target: &mut Vec<u32>) {
            target.pop();
        }
    }

    /// Toy command that merges with any neighbor, concatenating ids.
    struct Chain(Vec<u32>);

    impl Command for Chain {
        type Target = Vec<u32>;

        fn execute(&mut self, target: &mut Vec<u32>) {
            target.extend_from_slice(&self.0);
        }

        fn undo(&mut self, target: &mut Vec<u32>) {
            target.truncate(target.len() - self.0.len());
        }

        fn can_merge(&self, _other: &Self) -> bool {
            true
        }

        fn merge(&mut self, other: Self) {
            self.0.extend_from_slice(&other.0);
        }
    }

    #[test]
    fn undo_redo_roundtrip() {
        let mut target = Vec::new();
        let mut history = HistoryManager::default();

        history.execute_command(Push(1), &mut target);
        history.execute_command(Push(2), &mut target);
        assert_eq!(target, vec![1, 2]);

        assert!(history.undo(&mut target));
        assert_eq!(target, vec![1]);
        assert!(history.can_redo());

        assert!(history.redo(&mut target));
        assert_eq!(target, vec![1, 2]);

        assert!(history.undo(&mut target));
        assert!(history.undo(&mut target));
        assert!(!history.undo(&mut target));
        assert!(target.is_empty());
    }

    #[test]
    fn cap_drops_oldest_and_new_commands_clear_redo() {
        // Scenario: cap 3, strokes A..E, undo twice, then a new stroke F.
        let mut target = Vec::new();
        let mut history = HistoryManager::new(3);
        for id in 1..=5 {
            history.execute_command(Push(id), &mut target);
        }
        // Undo stack holds [C, D, E].
        assert_eq!(history.undo_len(), 3);

        assert!(history.undo(&mut target));
        assert!(history.undo(&mut target));
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.redo_len(), 2);

        history.execute_command(Push(6), &mut target);
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.redo_len(), 0);
        assert!(!history.can_redo());
    }

    #[test]
    fn zero_cap_is_raised_to_one() {
        let mut target = Vec::new();
        let mut history = HistoryManager::new(0);
        history.execute_command(Push(1), &mut target);
        history.execute_command(Push(2), &mut target);
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn shrinking_the_cap_trims_oldest() {
        let mut target = Vec::new();
        let mut history = HistoryManager::new(10);
        for id in 0..6 {
            history.execute_command(Push(id), &mut target);
        }
        history.set_max_history_size(2);
        assert_eq!(history.undo_len(), 2);

        // The two most recent commands survived.
        assert!(history.undo(&mut target));
        assert!(history.undo(&mut target));
        assert_eq!(target, vec![0, 1, 2, 3]);
    }

    #[test]
    fn add_command_merges_with_top() {
        let mut target = vec![1, 2];
        let mut history = HistoryManager::new(10);
        history.add_command(Chain(vec![1]));
        history.add_command(Chain(vec![2]));
        assert_eq!(history.undo_len(), 1);

        // One undo reverses both merged edits.
        assert!(history.undo(&mut target));
        assert!(target.is_empty());
    }

    #[test]
    fn add_command_records_without_executing() {
        let mut target = vec![7];
        let mut history = HistoryManager::new(10);
        // The effect is already on the target; adding must not re-apply it.
        history.add_command(Push(7));
        assert_eq!(target, vec![7]);
        assert!(history.undo(&mut target));
        assert!(target.is_empty());
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut target = Vec::new();
        let mut history = HistoryManager::new(10);
        history.execute_command(Push(1), &mut target);
        history.undo(&mut target);
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
