mod assignment;
mod phase;
mod reveal;
mod roster;
mod view;
mod vote;

pub use assignment::{assign_roles, effective_imposter_count, Assignment};
pub use phase::{is_valid_transition, valid_transitions};
pub use reveal::{card_for, pick_round_starter, CardView};
pub use view::{PlayerView, ResultsView, SessionSnapshot};
pub use vote::{resolve_votes, winner_for};

use crate::catalog::RoleCatalog;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// A single pass-and-play session.
///
/// Owns the roster, settings and per-round artifacts. All intents take
/// `&mut self` and either apply completely or return an [`EngineError`]
/// without touching any state.
pub struct Session<R = StdRng> {
    phase: Phase,
    /// Pass-around order during a round, join order otherwise
    players: Vec<Player>,
    /// Player ids in the order they joined
    seat_order: Vec<PlayerId>,
    settings: Settings,
    selected_category_id: Option<CategoryId>,
    current_player_index: usize,
    artifacts: RoundArtifacts,
    round_no: u32,
    catalog: Arc<dyn RoleCatalog>,
    config: EngineConfig,
    rng: R,
}

impl Session<StdRng> {
    pub fn new(catalog: Arc<dyn RoleCatalog>, config: EngineConfig) -> Self {
        Self::with_rng(catalog, config, StdRng::from_os_rng())
    }
}

impl<R: Rng> Session<R> {
    /// Create a session drawing from the given random source
    pub fn with_rng(catalog: Arc<dyn RoleCatalog>, config: EngineConfig, rng: R) -> Self {
        Self {
            phase: Phase::Setup,
            players: Vec::new(),
            seat_order: Vec::new(),
            settings: Settings::default(),
            selected_category_id: None,
            current_player_index: 0,
            artifacts: RoundArtifacts::default(),
            round_no: 0,
            catalog,
            config,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Roster in pass-around order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selected_category_id(&self) -> Option<&CategoryId> {
        self.selected_category_id.as_ref()
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    /// The player holding the device while cards are being passed around
    pub fn current_player(&self) -> Option<&Player> {
        if matches!(self.phase, Phase::Passing | Phase::Reveal) {
            self.players.get(self.current_player_index)
        } else {
            None
        }
    }

    pub fn artifacts(&self) -> &RoundArtifacts {
        &self.artifacts
    }

    pub fn round_no(&self) -> u32 {
        self.round_no
    }

    pub fn catalog(&self) -> &Arc<dyn RoleCatalog> {
        &self.catalog
    }

    fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Reject the intent unless the session is in one of `allowed`
    fn require_phase(&self, allowed: &[Phase], action: &'static str) -> EngineResult<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(EngineError::PhaseViolation {
                action,
                phase: self.phase,
            })
        }
    }

    fn require_players(&self) -> EngineResult<()> {
        if self.players.len() < MIN_PLAYERS {
            return Err(EngineError::InsufficientPlayers {
                required: MIN_PLAYERS,
                actual: self.players.len(),
            });
        }
        Ok(())
    }

    /// Drop everything that belongs to the current round and put the roster
    /// back in join order
    fn clear_round(&mut self) {
        self.artifacts = RoundArtifacts::default();
        self.current_player_index = 0;

        let seats = &self.seat_order;
        self.players
            .sort_by_key(|p| seats.iter().position(|id| *id == p.id).unwrap_or(usize::MAX));
        for player in &mut self.players {
            player.role = Role::Civilian;
            player.has_seen_card = false;
        }
    }
}
