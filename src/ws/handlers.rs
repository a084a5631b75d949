//! WebSocket message dispatch
//!
//! Every intent runs as one synchronous call on the locked session. Successful
//! state changes are broadcast as a fresh snapshot to all connected clients;
//! errors and private cards go back to the requesting socket only.

use crate::app::AppState;
use crate::error::EngineResult;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::Session;
use crate::types::RoundOutcome;
use std::sync::Arc;

/// Broadcast the new snapshot after a successful intent, or report the error
fn respond(state: &AppState, session: &Session, result: EngineResult<()>) -> Option<ServerMessage> {
    match result {
        Ok(()) => {
            state.broadcast_to_all(ServerMessage::State {
                state: session.snapshot(),
            });
            None
        }
        Err(e) => {
            tracing::warn!(code = e.code(), "Intent rejected: {}", e);
            Some(e.into())
        }
    }
}

/// Like [`respond`], also publishing the round outcome when there is one
fn respond_with_outcome(
    state: &AppState,
    session: &Session,
    result: EngineResult<Option<RoundOutcome>>,
) -> Option<ServerMessage> {
    match result {
        Ok(outcome) => {
            if let Some(outcome) = outcome {
                state.broadcast_to_all(ServerMessage::Outcome { outcome });
            }
            respond(state, session, Ok(()))
        }
        Err(e) => respond(state, session, Err(e)),
    }
}

/// Handle client messages and return optional response
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    let mut session = state.session.lock().await;

    match msg {
        ClientMessage::GetState => Some(ServerMessage::State {
            state: session.snapshot(),
        }),

        ClientMessage::ListCategories => Some(ServerMessage::Categories {
            list: session.list_categories(),
        }),

        // Roster and settings
        ClientMessage::AddPlayer { name } => {
            let result = session.add_player(&name).map(|_| ());
            respond(state, &session, result)
        }

        ClientMessage::RemovePlayer { player_id } => {
            let result = session.remove_player(&player_id).map(|_| ());
            respond(state, &session, result)
        }

        ClientMessage::UpdateSettings { settings } => {
            let result = session.update_settings(&settings).map(|_| ());
            respond(state, &session, result)
        }

        ClientMessage::SelectCategory { category_id } => {
            let result = session.select_category(&category_id).map(|_| ());
            respond(state, &session, result)
        }

        // Phase changes
        ClientMessage::OpenCategories => {
            let result = session.open_categories();
            respond(state, &session, result)
        }

        ClientMessage::BackToSetup => {
            let result = session.back_to_setup();
            respond(state, &session, result)
        }

        ClientMessage::StartGame => {
            let result = session.start_game();
            respond(state, &session, result)
        }

        ClientMessage::RequestReveal => {
            if let Err(e) = session.request_reveal() {
                return respond(state, &session, Err(e));
            }
            respond(state, &session, Ok(()));
            match session.current_card() {
                Ok(card) => Some(ServerMessage::Card { card }),
                Err(e) => Some(e.into()),
            }
        }

        ClientMessage::HideCard => {
            let result = session.hide_card();
            respond(state, &session, result)
        }

        ClientMessage::MarkSeen => {
            let result = session.mark_current_player_seen().map(|_| ());
            respond(state, &session, result)
        }

        ClientMessage::StartDiscussion => {
            let result = session.start_discussion();
            respond(state, &session, result)
        }

        ClientMessage::GoToVoting => {
            let result = session.go_to_voting();
            respond(state, &session, result)
        }

        // Voting and results
        ClientMessage::SubmitVote {
            voter_id,
            suspect_id,
        } => {
            let result = session.submit_vote(&voter_id, &suspect_id);
            respond_with_outcome(state, &session, result)
        }

        ClientMessage::SkipVoting => {
            let result = session.skip_voting().map(Some);
            respond_with_outcome(state, &session, result)
        }

        ClientMessage::RevealResults => {
            let result = session.reveal_results().map(Some);
            respond_with_outcome(state, &session, result)
        }

        ClientMessage::NewRound => {
            let result = session.new_round();
            respond(state, &session, result)
        }

        ClientMessage::FullReset => {
            session.full_reset();
            respond(state, &session, Ok(()))
        }
    }
}
