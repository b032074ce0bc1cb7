// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel History: undo/redo command stacks and the stroke command.
//!
//! The history model is a pair of bounded stacks of [`Command`]s. A
//! command is a reversible edit against a target (for painting, an
//! [`easel_raster::Surface`]): executing a fresh command empties the redo
//! stack, undoing moves it across, redoing moves it back.
//!
//! [`StrokeCommand`] is the one concrete command painting needs: it
//! records stroke data plus a pre-image [`easel_raster::Snapshot`] of the
//! bounded region the stroke touches, so undo is a verbatim pixel restore
//! rather than a recomputation.
//!
//! Commands drawn live (the stroke already on the raster when the command
//! is created) enter the history through [`HistoryManager::add_command`],
//! which skips execution; [`HistoryManager::execute_command`] is the path
//! for commands built ahead of their effect.

mod clock;
mod command;
mod history;
mod stroke;

pub use clock::now_ms;
pub use command::Command;
pub use history::HistoryManager;
pub use stroke::{StrokeCommand, StrokeData, StrokeMode, StrokePoint};
