use super::{assign_roles, Session};
use crate::error::{EngineError, EngineResult};
use crate::types::*;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Check if a phase transition is valid
pub fn is_valid_transition(from: Phase, to: Phase) -> bool {
    use Phase::*;

    match (from, to) {
        // Normal forward flow
        (Setup, Category) => true,
        (Category, Passing) => true,
        (Passing, Reveal) => true,
        (Reveal, Passing) => true,
        (Reveal, Starter) => true,
        (Starter, Playing) => true,
        (Playing, Voting) => true,
        (Voting, Results) => true,

        // Skip the vote and reveal roles directly
        (Playing, Results) => true,

        // New round
        (Results, Setup) => true,

        // Backing out of category selection or an unfinished round
        (Category, Setup) => true,
        (from, Setup) if from.is_in_round() => true,

        _ => false,
    }
}

/// Phases reachable from `from` in one step
pub fn valid_transitions(from: Phase) -> Vec<Phase> {
    use Phase::*;

    [
        Setup, Category, Passing, Reveal, Starter, Playing, Voting, Results,
    ]
    .into_iter()
    .filter(|to| is_valid_transition(from, *to))
    .collect()
}

impl<R: Rng> Session<R> {
    /// Check that the session is in `from` and that `from -> to` is a legal edge
    pub(super) fn guard_transition(
        &self,
        action: &'static str,
        from: &[Phase],
        to: Phase,
    ) -> EngineResult<()> {
        if from.contains(&self.phase) && is_valid_transition(self.phase, to) {
            Ok(())
        } else {
            Err(EngineError::PhaseViolation {
                action,
                phase: self.phase,
            })
        }
    }

    /// Apply a transition that has already been guarded
    pub(super) fn enter(&mut self, to: Phase) {
        tracing::info!(from = ?self.phase, to = ?to, round_no = self.round_no, "Phase transition");
        self.phase = to;
    }

    /// Leave the roster screen for category selection
    pub fn open_categories(&mut self) -> EngineResult<()> {
        self.guard_transition("choose a category", &[Phase::Setup], Phase::Category)?;
        self.require_players()?;
        self.enter(Phase::Category);
        Ok(())
    }

    /// Navigate back to the roster screen, abandoning any round in progress
    pub fn back_to_setup(&mut self) -> EngineResult<()> {
        if !is_valid_transition(self.phase, Phase::Setup) {
            return Err(EngineError::PhaseViolation {
                action: "go back to setup",
                phase: self.phase,
            });
        }
        if self.phase.is_in_round() {
            tracing::info!(round_no = self.round_no, "Round abandoned");
        }
        self.clear_round();
        self.enter(Phase::Setup);
        Ok(())
    }

    /// Assign roles for a new round and start passing the device around
    pub fn start_game(&mut self) -> EngineResult<()> {
        self.guard_transition("start the game", &[Phase::Category], Phase::Passing)?;
        self.require_players()?;

        let category_id = self
            .selected_category_id
            .clone()
            .ok_or(EngineError::NoCategorySelected)?;
        let category = self
            .catalog
            .get_category(&category_id)
            .ok_or(EngineError::UnknownCategory(category_id))?;
        let troll_words = self.catalog.troll_words();

        let assignment = assign_roles(
            &self.players,
            &self.settings,
            &category,
            &troll_words,
            self.config.troll_probability(),
            &mut self.rng,
        )?;

        self.players = assignment.players;
        self.artifacts = assignment.artifacts;
        self.current_player_index = 0;
        self.round_no += 1;

        tracing::info!(
            round_no = self.round_no,
            players = self.players.len(),
            category = %category.id,
            troll_round = self.artifacts.is_troll_round,
            "Round started"
        );

        self.enter(Phase::Passing);
        Ok(())
    }

    /// The current player asks to see their card
    pub fn request_reveal(&mut self) -> EngineResult<()> {
        self.guard_transition("reveal a card", &[Phase::Passing], Phase::Reveal)?;
        self.enter(Phase::Reveal);
        Ok(())
    }

    /// Turn the card face down again without acknowledging it
    pub fn hide_card(&mut self) -> EngineResult<()> {
        self.guard_transition("hide the card", &[Phase::Reveal], Phase::Passing)?;
        self.enter(Phase::Passing);
        Ok(())
    }

    /// Leave the round starter screen and begin the discussion
    pub fn start_discussion(&mut self) -> EngineResult<()> {
        self.start_discussion_at(Utc::now())
    }

    pub fn start_discussion_at(&mut self, now: DateTime<Utc>) -> EngineResult<()> {
        self.guard_transition("start the discussion", &[Phase::Starter], Phase::Playing)?;

        self.artifacts.discussion_deadline = self.settings.timer_enabled.then(|| {
            let minutes = i64::from(self.settings.timer_duration_minutes);
            (now + Duration::minutes(minutes)).to_rfc3339()
        });

        self.enter(Phase::Playing);
        Ok(())
    }

    /// Call a vote
    pub fn go_to_voting(&mut self) -> EngineResult<()> {
        self.guard_transition("call a vote", &[Phase::Playing], Phase::Voting)?;
        self.enter(Phase::Voting);
        Ok(())
    }

    /// Move to voting once the discussion timer has run out.
    /// Returns whether a transition happened.
    pub fn expire_discussion(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }

        let expired = self
            .artifacts
            .discussion_deadline
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .is_some_and(|deadline| now >= deadline.with_timezone(&Utc));

        if expired {
            tracing::info!(round_no = self.round_no, "Discussion timer expired");
            self.enter(Phase::Voting);
        }
        expired
    }

    /// Start the next round with the same roster and settings
    pub fn new_round(&mut self) -> EngineResult<()> {
        self.guard_transition("start a new round", &[Phase::Results], Phase::Setup)?;
        self.clear_round();
        self.enter(Phase::Setup);
        Ok(())
    }

    /// Forget everything, including the roster
    pub fn full_reset(&mut self) {
        tracing::info!("Full session reset");
        self.players.clear();
        self.seat_order.clear();
        self.settings = Settings::default();
        self.selected_category_id = None;
        self.round_no = 0;
        self.clear_round();
        self.enter(Phase::Setup);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_valid_phase_transitions() {
        use Phase::*;

        assert!(is_valid_transition(Setup, Category));
        assert!(is_valid_transition(Category, Passing));
        assert!(is_valid_transition(Passing, Reveal));
        assert!(is_valid_transition(Reveal, Passing));
        assert!(is_valid_transition(Reveal, Starter));
        assert!(is_valid_transition(Starter, Playing));
        assert!(is_valid_transition(Playing, Voting));
        assert!(is_valid_transition(Playing, Results));
        assert!(is_valid_transition(Voting, Results));
        assert!(is_valid_transition(Results, Setup));
        assert!(is_valid_transition(Voting, Setup));
    }

    #[test]
    fn test_invalid_phase_transitions() {
        use Phase::*;

        assert!(!is_valid_transition(Setup, Passing));
        assert!(!is_valid_transition(Setup, Voting));
        assert!(!is_valid_transition(Category, Reveal));
        assert!(!is_valid_transition(Passing, Starter));
        assert!(!is_valid_transition(Results, Voting));
        assert!(!is_valid_transition(Setup, Setup));
    }

    #[test]
    fn test_valid_transitions_listing() {
        assert_eq!(valid_transitions(Phase::Setup), vec![Phase::Category]);
        assert_eq!(
            valid_transitions(Phase::Playing),
            vec![Phase::Setup, Phase::Voting, Phase::Results]
        );
        assert_eq!(
            valid_transitions(Phase::Reveal),
            vec![Phase::Setup, Phase::Passing, Phase::Starter]
        );
    }

    #[test]
    fn test_open_categories_requires_three_players() {
        let mut session = session(1);
        session.add_player("A").unwrap();
        session.add_player("B").unwrap();

        let result = session.open_categories();
        assert_eq!(
            result,
            Err(EngineError::InsufficientPlayers {
                required: 3,
                actual: 2
            })
        );
        assert_eq!(session.phase(), Phase::Setup);

        session.add_player("C").unwrap();
        assert!(session.open_categories().is_ok());
        assert_eq!(session.phase(), Phase::Category);
    }

    #[test]
    fn test_start_game_requires_category() {
        let mut session = session(1);
        for name in ["A", "B", "C"] {
            session.add_player(name).unwrap();
        }
        session.open_categories().unwrap();

        assert_eq!(session.start_game(), Err(EngineError::NoCategorySelected));
        assert_eq!(session.phase(), Phase::Category);
        assert_eq!(session.round_no(), 0);
    }

    #[test]
    fn test_start_game_requires_players() {
        let mut session = ready_session(1, &["A", "B", "C"]);
        let id = session.players()[0].id.clone();
        session.remove_player(&id).unwrap();

        let result = session.start_game();
        assert!(matches!(
            result,
            Err(EngineError::InsufficientPlayers { actual: 2, .. })
        ));
        assert_eq!(session.phase(), Phase::Category);
    }

    #[test]
    fn test_start_game_rejects_empty_category() {
        let mut session = session(1);
        for name in ["A", "B", "C"] {
            session.add_player(name).unwrap();
        }
        session.open_categories().unwrap();
        session.select_category("empty").unwrap();

        let before = session.snapshot();
        assert_eq!(
            session.start_game(),
            Err(EngineError::EmptyCategory("empty".to_string()))
        );
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_start_game_enters_passing() {
        let mut session = ready_session(3, &["A", "B", "C", "D"]);
        session.start_game().unwrap();

        assert_eq!(session.phase(), Phase::Passing);
        assert_eq!(session.current_player_index(), 0);
        assert_eq!(session.round_no(), 1);
        assert_eq!(session.artifacts().secret_word, "Pizza");
        assert_eq!(session.artifacts().category_name, "Food");
        assert!(session.players().iter().all(|p| !p.has_seen_card));
    }

    #[test]
    fn test_intents_rejected_in_wrong_phase() {
        let mut session = session(1);

        assert!(matches!(
            session.start_game(),
            Err(EngineError::PhaseViolation {
                phase: Phase::Setup,
                ..
            })
        ));
        assert!(session.request_reveal().is_err());
        assert!(session.hide_card().is_err());
        assert!(session.start_discussion().is_err());
        assert!(session.go_to_voting().is_err());
        assert!(session.new_round().is_err());
        assert!(session.back_to_setup().is_err());
        assert_eq!(session.phase(), Phase::Setup);
    }

    #[test]
    fn test_hide_card_returns_to_same_player() {
        let mut session = ready_session(4, &["A", "B", "C"]);
        session.start_game().unwrap();

        session.request_reveal().unwrap();
        session.hide_card().unwrap();

        assert_eq!(session.phase(), Phase::Passing);
        assert_eq!(session.current_player_index(), 0);
        assert!(!session.players()[0].has_seen_card);
    }

    #[test]
    fn test_full_round_flow() {
        let mut session = ready_session(5, &["A", "B", "C", "D"]);
        session.start_game().unwrap();
        reveal_all(&mut session);

        assert_eq!(session.phase(), Phase::Starter);
        assert!(session.artifacts().round_starter_name.is_some());

        session.start_discussion().unwrap();
        assert_eq!(session.phase(), Phase::Playing);
        assert!(session.artifacts().discussion_deadline.is_none());

        session.go_to_voting().unwrap();
        assert_eq!(session.phase(), Phase::Voting);

        session.reveal_results().unwrap();
        assert_eq!(session.phase(), Phase::Results);

        session.new_round().unwrap();
        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(session.players().len(), 4);
        assert!(session
            .players()
            .iter()
            .all(|p| p.role == Role::Civilian && !p.has_seen_card));
        assert_eq!(session.artifacts(), &RoundArtifacts::default());
        assert_eq!(session.selected_category_id().map(String::as_str), Some("food"));
    }

    fn names<R: Rng>(session: &Session<R>) -> Vec<String> {
        session.players().iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_new_round_restores_join_order() {
        let joined = ["A", "B", "C", "D", "E", "F"];
        let mut session = ready_session(11, &joined);
        session
            .update_settings(&SettingsPatch {
                imposter_count: Some(2),
                ..Default::default()
            })
            .unwrap();

        session.start_game().unwrap();
        reveal_all(&mut session);
        session.start_discussion().unwrap();
        session.skip_voting().unwrap();
        session.new_round().unwrap();
        assert_eq!(names(&session), joined);

        // The accomplice is told the first imposter by join order, not pass order
        session.open_categories().unwrap();
        session.start_game().unwrap();
        let first_imposter = joined
            .iter()
            .find(|name| {
                session
                    .players()
                    .iter()
                    .any(|p| p.name == **name && p.role == Role::Imposter)
            })
            .map(|name| name.to_string());
        assert_eq!(session.artifacts().imposter_name, first_imposter);

        session.back_to_setup().unwrap();
        assert_eq!(names(&session), joined);
    }

    #[test]
    fn test_removed_player_leaves_join_order() {
        let mut session = ready_session(12, &["A", "B", "C", "D"]);
        session.start_game().unwrap();
        session.back_to_setup().unwrap();

        let id = session.players()[1].id.clone();
        session.remove_player(&id).unwrap();
        session.add_player("E").unwrap();
        session.open_categories().unwrap();
        session.start_game().unwrap();
        session.back_to_setup().unwrap();

        assert_eq!(names(&session), ["A", "C", "D", "E"]);
    }

    #[test]
    fn test_back_to_setup_clears_reveal_state() {
        let mut session = ready_session(6, &["A", "B", "C"]);
        session.start_game().unwrap();
        session.request_reveal().unwrap();
        session.mark_current_player_seen().unwrap();
        assert_eq!(session.current_player_index(), 1);

        session.back_to_setup().unwrap();

        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(session.current_player_index(), 0);
        assert!(session
            .players()
            .iter()
            .all(|p| !p.has_seen_card && p.role == Role::Civilian));
        assert!(session.artifacts().secret_word.is_empty());
    }

    #[test]
    fn test_back_from_category() {
        let mut session = ready_session(7, &["A", "B", "C"]);
        session.back_to_setup().unwrap();
        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(session.players().len(), 3);
    }

    #[test]
    fn test_discussion_timer() {
        let mut session = ready_session(8, &["A", "B", "C"]);
        session
            .update_settings(&SettingsPatch {
                timer_enabled: Some(true),
                timer_duration_minutes: Some(2),
                ..Default::default()
            })
            .unwrap();
        session.start_game().unwrap();
        reveal_all(&mut session);

        let now = Utc::now();
        session.start_discussion_at(now).unwrap();
        let deadline = session.artifacts().discussion_deadline.clone().unwrap();
        let parsed = DateTime::parse_from_rfc3339(&deadline).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), now + Duration::minutes(2));

        assert!(!session.expire_discussion(now + Duration::seconds(60)));
        assert_eq!(session.phase(), Phase::Playing);

        assert!(session.expire_discussion(now + Duration::seconds(120)));
        assert_eq!(session.phase(), Phase::Voting);

        // Only fires from the playing phase
        assert!(!session.expire_discussion(now + Duration::seconds(500)));
    }

    #[test]
    fn test_expire_without_timer_is_noop() {
        let mut session = ready_session(9, &["A", "B", "C"]);
        session.start_game().unwrap();
        reveal_all(&mut session);
        session.start_discussion().unwrap();

        assert!(!session.expire_discussion(Utc::now() + Duration::days(1)));
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_full_reset() {
        let mut session = ready_session(10, &["A", "B", "C"]);
        session.start_game().unwrap();
        session.full_reset();

        assert_eq!(session.phase(), Phase::Setup);
        assert!(session.players().is_empty());
        assert!(session.selected_category_id().is_none());
        assert_eq!(session.round_no(), 0);
        assert_eq!(session.settings(), &Settings::default());
    }
}
