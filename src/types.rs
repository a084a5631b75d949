use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque ID types for type safety
pub type PlayerId = String;
pub type CategoryId = String;

/// Minimum roster size for starting a round
pub const MIN_PLAYERS: usize = 3;

/// Chance that a round turns into a troll round when troll mode is on
pub const DEFAULT_TROLL_PROBABILITY: f64 = 0.2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Setup,
    Category,
    Passing,
    Reveal,
    Starter,
    Playing,
    Voting,
    Results,
}

impl Phase {
    /// Phases that belong to a round in progress
    pub fn is_in_round(&self) -> bool {
        matches!(
            self,
            Phase::Passing | Phase::Reveal | Phase::Starter | Phase::Playing | Phase::Voting
        )
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Civilian,
    Imposter,
    Jester,
    Confused,
    Accomplice,
}

impl Role {
    /// Jester, confused and accomplice
    pub fn is_special(&self) -> bool {
        matches!(self, Role::Jester | Role::Confused | Role::Accomplice)
    }

    /// Roles that count as a catch when eliminated
    pub fn is_imposter_side(&self) -> bool {
        matches!(self, Role::Imposter | Role::Accomplice)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub has_seen_card: bool,
}

impl Player {
    pub fn new(name: String) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            name,
            role: Role::Civilian,
            has_seen_card: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub imposter_count: u32,
    pub timer_enabled: bool,
    pub timer_duration_minutes: u32,
    pub imposter_hint: bool,
    pub troll_mode: bool,
    pub jester_enabled: bool,
    pub confused_enabled: bool,
    pub accomplice_enabled: bool,
    pub imposter_never_starts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            imposter_count: 1,
            timer_enabled: false,
            timer_duration_minutes: 3,
            imposter_hint: false,
            troll_mode: false,
            jester_enabled: false,
            confused_enabled: false,
            accomplice_enabled: false,
            imposter_never_starts: false,
        }
    }
}

/// Partial settings update, absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsPatch {
    pub imposter_count: Option<u32>,
    pub timer_enabled: Option<bool>,
    pub timer_duration_minutes: Option<u32>,
    pub imposter_hint: Option<bool>,
    pub troll_mode: Option<bool>,
    pub jester_enabled: Option<bool>,
    pub confused_enabled: Option<bool>,
    pub accomplice_enabled: Option<bool>,
    pub imposter_never_starts: Option<bool>,
}

impl Settings {
    /// Apply a patch, returning the merged settings
    pub fn merged(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            imposter_count: patch.imposter_count.unwrap_or(self.imposter_count),
            timer_enabled: patch.timer_enabled.unwrap_or(self.timer_enabled),
            timer_duration_minutes: patch
                .timer_duration_minutes
                .unwrap_or(self.timer_duration_minutes),
            imposter_hint: patch.imposter_hint.unwrap_or(self.imposter_hint),
            troll_mode: patch.troll_mode.unwrap_or(self.troll_mode),
            jester_enabled: patch.jester_enabled.unwrap_or(self.jester_enabled),
            confused_enabled: patch.confused_enabled.unwrap_or(self.confused_enabled),
            accomplice_enabled: patch.accomplice_enabled.unwrap_or(self.accomplice_enabled),
            imposter_never_starts: patch
                .imposter_never_starts
                .unwrap_or(self.imposter_never_starts),
        }
    }
}

/// Per-round derived data, rebuilt at every round start
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoundArtifacts {
    pub category_name: String,
    pub secret_word: String,
    /// Equal to `secret_word` when the drawn pair has no distinct twin
    pub confused_word: String,
    pub is_troll_round: bool,
    pub troll_word: Option<String>,
    pub round_starter_name: Option<String>,
    /// Only ever shown to the accomplice
    pub imposter_name: Option<String>,
    /// voter id -> suspect id
    pub votes: HashMap<PlayerId, PlayerId>,
    pub discussion_deadline: Option<String>, // ISO timestamp, set when the timer is enabled
    pub outcome: Option<RoundOutcome>,
}

/// Per-player vote count, in roster order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteCount {
    pub player_id: PlayerId,
    pub name: String,
    pub votes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteResult {
    pub tally: Vec<VoteCount>,
    pub max_votes: u32,
    pub eliminated_id: PlayerId,
    pub eliminated_name: String,
    pub eliminated_role: Role,
    pub imposter_caught: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Civilians,
    Imposters,
    Jester,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRole {
    pub player_id: PlayerId,
    pub name: String,
    pub role: Role,
}

/// Result of a finished round, forwarded to the external score ledger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundOutcome {
    pub round_no: u32,
    pub troll_round: bool,
    /// `None` when the vote was skipped
    pub vote: Option<VoteResult>,
    pub winner: Option<Winner>,
    pub roles: Vec<PlayerRole>,
    pub resolved_at: String,
}
