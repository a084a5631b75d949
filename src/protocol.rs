use crate::catalog::CategorySummary;
use crate::error::EngineError;
use crate::state::{CardView, SessionSnapshot};
use crate::types::*;
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "1.0";

/// Intents sent by the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    GetState,
    ListCategories,
    AddPlayer {
        name: String,
    },
    RemovePlayer {
        player_id: PlayerId,
    },
    UpdateSettings {
        settings: SettingsPatch,
    },
    OpenCategories,
    SelectCategory {
        category_id: CategoryId,
    },
    /// Back to the roster, abandoning any round in progress
    BackToSetup,
    StartGame,
    RequestReveal,
    HideCard,
    MarkSeen,
    StartDiscussion,
    GoToVoting,
    SkipVoting,
    SubmitVote {
        voter_id: PlayerId,
        suspect_id: PlayerId,
    },
    RevealResults,
    NewRound,
    FullReset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        server_now: String,
        state: SessionSnapshot,
    },
    State {
        state: SessionSnapshot,
    },
    /// Private card, only ever sent to the socket that asked for it
    Card {
        card: CardView,
    },
    Categories {
        list: Vec<CategorySummary>,
    },
    /// Round result for the score ledger
    Outcome {
        outcome: RoundOutcome,
    },
    Error {
        code: String,
        msg: String,
    },
}

impl From<EngineError> for ServerMessage {
    fn from(e: EngineError) -> Self {
        ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"submit_vote","voter_id":"a","suspect_id":"b"}"#)
                .unwrap();
        assert!(matches!(
            msg,
            ClientMessage::SubmitVote { ref voter_id, ref suspect_id }
                if voter_id == "a" && suspect_id == "b"
        ));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"update_settings","settings":{"troll_mode":true}}"#)
                .unwrap();
        match msg {
            ClientMessage::UpdateSettings { settings } => {
                assert_eq!(settings.troll_mode, Some(true));
                assert_eq!(settings.imposter_count, None);
            }
            _ => panic!("Expected UpdateSettings"),
        }

        let msg: ClientMessage = serde_json::from_str(r#"{"t":"mark_seen"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::MarkSeen));
    }

    #[test]
    fn test_error_from_engine_error() {
        let msg: ServerMessage = EngineError::NoCategorySelected.into();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["t"], "error");
        assert_eq!(json["code"], "NO_CATEGORY_SELECTED");
        assert_eq!(json["msg"], "No category selected");
    }
}
