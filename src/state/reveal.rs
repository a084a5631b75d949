use super::Session;
use crate::error::{EngineError, EngineResult};
use crate::types::*;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a single player sees on their private card.
///
/// Confused players and troll rounds get a plain `Word` card so the
/// substitution is not visible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardView {
    Word {
        player_name: String,
        word: String,
    },
    Imposter {
        player_name: String,
        /// Category name, only with the imposter hint setting
        hint: Option<String>,
    },
    Jester {
        player_name: String,
        word: String,
    },
    Accomplice {
        player_name: String,
        word: String,
        imposter_name: Option<String>,
    },
}

/// Build the private card for one player
pub fn card_for(player: &Player, artifacts: &RoundArtifacts, settings: &Settings) -> CardView {
    let player_name = player.name.clone();

    if let Some(word) = artifacts.troll_word.as_ref().filter(|_| artifacts.is_troll_round) {
        return CardView::Word {
            player_name,
            word: word.clone(),
        };
    }

    match player.role {
        Role::Civilian => CardView::Word {
            player_name,
            word: artifacts.secret_word.clone(),
        },
        Role::Confused => CardView::Word {
            player_name,
            word: artifacts.confused_word.clone(),
        },
        Role::Imposter => CardView::Imposter {
            player_name,
            hint: settings
                .imposter_hint
                .then(|| artifacts.category_name.clone()),
        },
        Role::Jester => CardView::Jester {
            player_name,
            word: artifacts.secret_word.clone(),
        },
        Role::Accomplice => CardView::Accomplice {
            player_name,
            word: artifacts.secret_word.clone(),
            imposter_name: artifacts.imposter_name.clone(),
        },
    }
}

/// Pick who speaks first.
///
/// With `imposter_never_starts` outside troll rounds imposters are skipped,
/// unless that would leave nobody to pick.
pub fn pick_round_starter<R: Rng + ?Sized>(
    players: &[Player],
    settings: &Settings,
    is_troll_round: bool,
    rng: &mut R,
) -> Option<String> {
    let exclude_imposters = settings.imposter_never_starts && !is_troll_round;

    let eligible: Vec<&Player> = players
        .iter()
        .filter(|p| !exclude_imposters || p.role != Role::Imposter)
        .collect();

    let pool = if eligible.is_empty() {
        players.iter().collect()
    } else {
        eligible
    };

    pool.choose(rng).map(|p| p.name.clone())
}

impl<R: Rng> Session<R> {
    /// Card of the player currently holding the device, only while revealing
    pub fn current_card(&self) -> EngineResult<CardView> {
        self.require_phase(&[Phase::Reveal], "view a card")?;
        let player = self
            .players
            .get(self.current_player_index)
            .ok_or_else(|| EngineError::PlayerNotFound(self.current_player_index.to_string()))?;
        Ok(card_for(player, &self.artifacts, &self.settings))
    }

    /// Acknowledge the current card and hand the device on.
    ///
    /// Returns the phase entered: `Passing` for the next player, or `Starter`
    /// once everybody has seen their card.
    pub fn mark_current_player_seen(&mut self) -> EngineResult<Phase> {
        self.require_phase(&[Phase::Reveal], "acknowledge a card")?;

        let index = self.current_player_index;
        let player_count = self.players.len();
        let player = self
            .players
            .get_mut(index)
            .ok_or_else(|| EngineError::PlayerNotFound(index.to_string()))?;
        player.has_seen_card = true;
        tracing::debug!(player = %player.name, "Card acknowledged");

        if index + 1 < player_count {
            self.current_player_index += 1;
            self.enter(Phase::Passing);
        } else {
            self.artifacts.round_starter_name = pick_round_starter(
                &self.players,
                &self.settings,
                self.artifacts.is_troll_round,
                &mut self.rng,
            );
            self.enter(Phase::Starter);
        }

        Ok(self.phase)
    }
}
