// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A reversible edit against a target value.
///
/// `execute` and `undo` must be inverses on the state the command was
/// recorded against: executing then undoing leaves the target pixel- (or
/// value-) identical. Commands may additionally support merging, so a
/// rapid series of small edits collapses into one history entry;
/// [`Command::merge`] is only called after [`Command::can_merge`] returned
/// `true`, and the merged command must behave exactly like the two
/// originals applied in sequence.
pub trait Command {
    /// The value this command edits (a raster surface for painting).
    type Target;

    /// Apply the command's effect.
    fn execute(&mut self, target: &mut Self::Target);

    /// Reverse the command's effect.
    fn undo(&mut self, target: &mut Self::Target);

    /// Whether `other` can be folded into this command.
    fn can_merge(&self, _other: &Self) -> bool
    where
        Self: Sized,
    {
        false
    }

    /// Fold `other` into this command.
    fn merge(&mut self, _other: Self)
    where
        Self: Sized,
    {
    }
}
