use super::Session;
use crate::catalog::CategorySummary;
use crate::error::{EngineError, EngineResult};
use crate::types::*;
use rand::Rng;

/// Phases in which the roster and settings may be edited
const EDITABLE_PHASES: &[Phase] = &[Phase::Setup, Phase::Category];

impl<R: Rng> Session<R> {
    /// Add a player to the roster
    pub fn add_player(&mut self, name: &str) -> EngineResult<Player> {
        self.require_phase(EDITABLE_PHASES, "add players")?;

        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidPlayerName(
                "name cannot be empty".to_string(),
            ));
        }

        let lowered = name.to_lowercase();
        if self.players.iter().any(|p| p.name.to_lowercase() == lowered) {
            return Err(EngineError::InvalidPlayerName(format!(
                "'{}' is already playing",
                name
            )));
        }

        let player = Player::new(name.to_string());
        self.players.push(player.clone());
        self.seat_order.push(player.id.clone());
        tracing::info!(player = %player.name, players = self.players.len(), "Player added");
        Ok(player)
    }

    /// Remove a player from the roster
    pub fn remove_player(&mut self, player_id: &str) -> EngineResult<Player> {
        self.require_phase(EDITABLE_PHASES, "remove players")?;

        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_string()))?;

        let player = self.players.remove(idx);
        self.seat_order.retain(|id| *id != player.id);
        tracing::info!(player = %player.name, players = self.players.len(), "Player removed");
        Ok(player)
    }

    /// Apply a partial settings update
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> EngineResult<Settings> {
        self.require_phase(EDITABLE_PHASES, "change settings")?;

        let merged = self.settings.merged(patch);
        if merged.imposter_count == 0 {
            return Err(EngineError::InvalidSettings(
                "imposter count must be at least 1".to_string(),
            ));
        }
        if merged.timer_duration_minutes == 0 {
            return Err(EngineError::InvalidSettings(
                "timer duration must be at least 1 minute".to_string(),
            ));
        }

        tracing::debug!(settings = ?merged, "Settings updated");
        self.settings = merged.clone();
        Ok(merged)
    }

    /// Choose the category for the next round
    pub fn select_category(&mut self, category_id: &str) -> EngineResult<CategorySummary> {
        self.require_phase(&[Phase::Category], "select a category")?;

        let category = self
            .catalog
            .get_category(category_id)
            .ok_or_else(|| EngineError::UnknownCategory(category_id.to_string()))?;

        tracing::info!(category = %category.id, "Category selected");
        self.selected_category_id = Some(category.id.clone());
        Ok(CategorySummary::from(&category))
    }

    /// Categories available from the catalog
    pub fn list_categories(&self) -> Vec<CategorySummary> {
        self.catalog.categories()
    }
}
