use super::Session;
use crate::error::{EngineError, EngineResult};
use crate::types::*;
use rand::Rng;
use std::collections::HashMap;

/// Count votes and pick the eliminated player.
///
/// The first player in roster order with the highest count is eliminated, so
/// ties go to whoever comes first. With no votes at all that is simply the
/// first player, eliminated with zero votes. Returns `None` for an empty
/// roster.
pub fn resolve_votes(
    players: &[Player],
    votes: &HashMap<PlayerId, PlayerId>,
) -> Option<VoteResult> {
    let mut counts: HashMap<&str, u32> = players.iter().map(|p| (p.id.as_str(), 0)).collect();
    for suspect in votes.values() {
        if let Some(count) = counts.get_mut(suspect.as_str()) {
            *count += 1;
        }
    }

    let tally: Vec<VoteCount> = players
        .iter()
        .map(|p| VoteCount {
            player_id: p.id.clone(),
            name: p.name.clone(),
            votes: counts.get(p.id.as_str()).copied().unwrap_or(0),
        })
        .collect();

    let max_votes = tally.iter().map(|c| c.votes).max()?;
    let eliminated_idx = tally.iter().position(|c| c.votes == max_votes)?;
    let eliminated = &players[eliminated_idx];

    if max_votes == 0 {
        tracing::warn!(
            eliminated = %eliminated.name,
            "No votes cast, first player in roster order is eliminated"
        );
    }

    Some(VoteResult {
        tally,
        max_votes,
        eliminated_id: eliminated.id.clone(),
        eliminated_name: eliminated.name.clone(),
        eliminated_role: eliminated.role,
        imposter_caught: eliminated.role.is_imposter_side(),
    })
}

/// Which side won, given the vote
pub fn winner_for(result: &VoteResult) -> Winner {
    if result.eliminated_role == Role::Jester {
        Winner::Jester
    } else if result.imposter_caught {
        Winner::Civilians
    } else {
        Winner::Imposters
    }
}

impl<R: Rng> Session<R> {
    /// Record one vote. Once every player has voted the round is resolved
    /// and the outcome returned.
    pub fn submit_vote(
        &mut self,
        voter_id: &str,
        suspect_id: &str,
    ) -> EngineResult<Option<RoundOutcome>> {
        self.require_phase(&[Phase::Voting], "submit votes")?;

        if self.player(voter_id).is_none() {
            return Err(EngineError::InvalidVote(format!("unknown voter {}", voter_id)));
        }
        if self.player(suspect_id).is_none() {
            return Err(EngineError::InvalidVote(format!(
                "unknown suspect {}",
                suspect_id
            )));
        }
        if self.artifacts.votes.contains_key(voter_id) {
            return Err(EngineError::InvalidVote(format!(
                "{} has already voted",
                voter_id
            )));
        }

        self.artifacts
            .votes
            .insert(voter_id.to_string(), suspect_id.to_string());
        tracing::debug!(
            votes = self.artifacts.votes.len(),
            players = self.players.len(),
            "Vote recorded"
        );

        if self.artifacts.votes.len() == self.players.len() {
            return Ok(Some(self.finish_round(true)));
        }
        Ok(None)
    }

    /// Close the vote with whatever has been cast so far
    pub fn reveal_results(&mut self) -> EngineResult<RoundOutcome> {
        self.guard_transition("reveal results", &[Phase::Voting], Phase::Results)?;
        Ok(self.finish_round(true))
    }

    /// Go straight to the role reveal without eliminating anyone
    pub fn skip_voting(&mut self) -> EngineResult<RoundOutcome> {
        self.guard_transition(
            "skip the vote",
            &[Phase::Playing, Phase::Voting],
            Phase::Results,
        )?;
        Ok(self.finish_round(false))
    }

    fn finish_round(&mut self, tally: bool) -> RoundOutcome {
        let vote = if tally {
            resolve_votes(&self.players, &self.artifacts.votes)
        } else {
            None
        };

        // An elimination with zero votes is not scored
        let winner = match &vote {
            Some(result) if !self.artifacts.is_troll_round && result.max_votes > 0 => {
                Some(winner_for(result))
            }
            _ => None,
        };

        let outcome = RoundOutcome {
            round_no: self.round_no,
            troll_round: self.artifacts.is_troll_round,
            vote,
            winner,
            roles: self
                .players
                .iter()
                .map(|p| PlayerRole {
                    player_id: p.id.clone(),
                    name: p.name.clone(),
                    role: p.role,
                })
                .collect(),
            resolved_at: chrono::Utc::now().to_rfc3339(),
        };

        tracing::info!(
            round_no = outcome.round_no,
            eliminated = ?outcome.vote.as_ref().map(|v| v.eliminated_name.as_str()),
            winner = ?outcome.winner,
            "Round resolved"
        );

        self.artifacts.outcome = Some(outcome.clone());
        self.enter(Phase::Results);
        outcome
    }
}
