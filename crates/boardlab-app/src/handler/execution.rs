//! Program execution control: direct pass-through to the board

use super::{panels, UpdateAction, UpdateResult};
use crate::state::AppState;

/// Make output observable, then submit the editor text
pub(crate) fn handle_run(state: &mut AppState) -> UpdateResult {
    let mut actions = Vec::new();
    if let Some(layout) = panels::open_terminal(state) {
        actions.push(layout);
    }
    actions.push(UpdateAction::RunProgram);
    UpdateResult::actions(actions)
}

pub(crate) fn handle_stop() -> UpdateResult {
    UpdateResult::action(UpdateAction::StopProgram)
}

pub(crate) fn handle_reset() -> UpdateResult {
    UpdateResult::action(UpdateAction::ResetDevice)
}
