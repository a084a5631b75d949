use crate::catalog::Category;
use crate::error::{EngineError, EngineResult};
use crate::types::*;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// Roles and words for one round
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Role-annotated roster in pass-around order
    pub players: Vec<Player>,
    pub artifacts: RoundArtifacts,
}

/// Number of imposters for a roster, never more than half the players and
/// never fewer than one
pub fn effective_imposter_count(configured: u32, player_count: usize) -> usize {
    (configured as usize).min(player_count / 2).max(1)
}

/// Draw words and roles for a new round.
///
/// Roles are dealt from a uniform permutation of the roster: the first
/// slots become imposters and the special roles are taken from the front
/// of what is left, in the order jester, confused, accomplice. The returned
/// roster is shuffled again independently to get the pass-around order.
pub fn assign_roles<R: Rng + ?Sized>(
    players: &[Player],
    settings: &Settings,
    category: &Category,
    troll_words: &[String],
    troll_probability: f64,
    rng: &mut R,
) -> EngineResult<Assignment> {
    // NaN would make the coin flip panic
    let troll_probability = if troll_probability.is_nan() {
        0.0
    } else {
        troll_probability.clamp(0.0, 1.0)
    };
    let troll_word = if settings.troll_mode && rng.random_bool(troll_probability) {
        let word = troll_words.choose(rng).cloned();
        if word.is_none() {
            tracing::warn!("Troll round triggered but the troll word pool is empty, skipping");
        }
        word
    } else {
        None
    };
    let is_troll_round = troll_word.is_some();

    // Drawn even for troll rounds so the artifacts are always complete
    let pair = category
        .word_pairs
        .choose(rng)
        .ok_or_else(|| EngineError::EmptyCategory(category.id.clone()))?;

    let mut annotated: Vec<Player> = players
        .iter()
        .cloned()
        .map(|mut p| {
            p.role = Role::Civilian;
            p.has_seen_card = false;
            p
        })
        .collect();

    let imposter_count =
        effective_imposter_count(settings.imposter_count, annotated.len()).min(annotated.len());

    let mut order: Vec<usize> = (0..annotated.len()).collect();
    order.shuffle(rng);
    let (imposters, civilian_pool) = order.split_at(imposter_count);

    for &i in imposters {
        annotated[i].role = Role::Imposter;
    }

    let specials = [
        (settings.jester_enabled, Role::Jester),
        (settings.confused_enabled, Role::Confused),
        (settings.accomplice_enabled, Role::Accomplice),
    ];
    let mut pool = civilian_pool.iter();
    for (enabled, role) in specials {
        if !enabled {
            continue;
        }
        match pool.next() {
            Some(&i) => annotated[i].role = role,
            None => break,
        }
    }

    if is_troll_round {
        for player in &mut annotated {
            player.role = Role::Imposter;
        }
    }

    // Roster order, before the pass-around shuffle
    let imposter_name = annotated
        .iter()
        .find(|p| p.role == Role::Imposter)
        .map(|p| p.name.clone());

    annotated.shuffle(rng);

    Ok(Assignment {
        players: annotated,
        artifacts: RoundArtifacts {
            category_name: category.name.clone(),
            secret_word: pair.word_a.clone(),
            confused_word: pair.confusable().to_string(),
            is_troll_round,
            troll_word,
            imposter_name,
            ..Default::default()
        },
    })
}
