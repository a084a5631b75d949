use super::{valid_transitions, Session};
use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Public view of a player. The role stays hidden until results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub has_seen_card: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Everything that becomes public once the round is over
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultsView {
    pub category_name: String,
    pub secret_word: String,
    pub confused_word: String,
    pub is_troll_round: bool,
    pub troll_word: Option<String>,
    pub imposter_name: Option<String>,
    pub votes: HashMap<PlayerId, PlayerId>,
    pub outcome: Option<RoundOutcome>,
}

/// Snapshot rendered by the UI; safe to show to whoever holds the device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub valid_transitions: Vec<Phase>,
    pub round_no: u32,
    pub players: Vec<PlayerView>,
    pub settings: Settings,
    pub selected_category_id: Option<CategoryId>,
    pub current_player_index: usize,
    pub current_player: Option<PlayerView>,
    pub round_starter_name: Option<String>,
    pub discussion_deadline: Option<String>,
    /// Players who have voted, in roster order. Ballots stay secret.
    pub voted: Vec<PlayerId>,
    pub results: Option<ResultsView>,
}

impl<R: Rng> Session<R> {
    fn player_view(&self, player: &Player) -> PlayerView {
        PlayerView {
            id: player.id.clone(),
            name: player.name.clone(),
            has_seen_card: player.has_seen_card,
            role: (self.phase == Phase::Results).then_some(player.role),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let results = (self.phase == Phase::Results).then(|| ResultsView {
            category_name: self.artifacts.category_name.clone(),
            secret_word: self.artifacts.secret_word.clone(),
            confused_word: self.artifacts.confused_word.clone(),
            is_troll_round: self.artifacts.is_troll_round,
            troll_word: self.artifacts.troll_word.clone(),
            imposter_name: self.artifacts.imposter_name.clone(),
            votes: self.artifacts.votes.clone(),
            outcome: self.artifacts.outcome.clone(),
        });

        SessionSnapshot {
            phase: self.phase,
            valid_transitions: valid_transitions(self.phase),
            round_no: self.round_no,
            players: self.players.iter().map(|p| self.player_view(p)).collect(),
            settings: self.settings.clone(),
            selected_category_id: self.selected_category_id.clone(),
            current_player_index: self.current_player_index,
            current_player: self.current_player().map(|p| self.player_view(p)),
            round_starter_name: self.artifacts.round_starter_name.clone(),
            discussion_deadline: self.artifacts.discussion_deadline.clone(),
            voted: self
                .players
                .iter()
                .filter(|p| self.artifacts.votes.contains_key(&p.id))
                .map(|p| p.id.clone())
                .collect(),
            results,
        }
    }
}
