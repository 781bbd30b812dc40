//! Game setup validation
//!
//! Checks a roster and a set of options before roles are dealt:
//! - Player count within [4, 30]
//! - Impostor count within [1, max(1, players / 3)]
//! - At least one round
//! - At least one category selected, each known and non-empty

use super::catalog::Catalog;
use super::engine::GameSetup;
use super::{max_impostors, MAX_PLAYERS, MIN_PLAYERS};
use thiserror::Error;

/// Reasons a game cannot start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("need at least {min} players, have {found}")]
    NotEnoughPlayers { found: usize, min: usize },
    #[error("at most {max} players allowed, have {found}")]
    TooManyPlayers { found: usize, max: usize },
    #[error("impostor count must be between 1 and {max}, got {requested}")]
    InvalidImpostorCount { requested: usize, max: usize },
    #[error("a game needs at least one round")]
    NoRounds,
    #[error("pick at least one category")]
    NoCategorySelected,
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
    #[error("category {0:?} has no words")]
    EmptyCategory(String),
}

/// Validate a setup against the number of players and the catalog.
///
/// Checks in order: player count, impostor count, rounds, categories.
pub fn validate_setup(
    player_count: usize,
    setup: &GameSetup,
    catalog: &Catalog,
) -> Result<(), SetupError> {
    if player_count < MIN_PLAYERS {
        return Err(SetupError::NotEnoughPlayers {
            found: player_count,
            min: MIN_PLAYERS,
        });
    }
    if player_count > MAX_PLAYERS {
        return Err(SetupError::TooManyPlayers {
            found: player_count,
            max: MAX_PLAYERS,
        });
    }

    let max = max_impostors(player_count);
    if setup.impostor_count == 0 || setup.impostor_count > max {
        return Err(SetupError::InvalidImpostorCount {
            requested: setup.impostor_count,
            max,
        });
    }

    if setup.total_rounds == 0 {
        return Err(SetupError::NoRounds);
    }

    if setup.categories.is_empty() {
        return Err(SetupError::NoCategorySelected);
    }
    for id in &setup.categories {
        match catalog.lookup_category(id) {
            None => return Err(SetupError::UnknownCategory(id.clone())),
            Some(category) if category.words.is_empty() => {
                return Err(SetupError::EmptyCategory(id.clone()))
            }
            Some(_) => {}
        }
    }

    Ok(())
}
