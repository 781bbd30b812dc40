//! Game rules: players, roles, rounds, votes and scoring

pub mod catalog;
pub mod engine;
pub mod roster;
pub mod validation;

use rand::prelude::*;
use std::fmt;

/// Fewest players a game can start with.
pub const MIN_PLAYERS: usize = 4;

/// Most players a roster can hold.
pub const MAX_PLAYERS: usize = 30;

/// Longest accepted player name, in characters.
pub const MAX_NAME_LENGTH: usize = 20;

/// Fewest words a user-defined category may have.
pub const MIN_CUSTOM_WORDS: usize = 5;

/// Rounds per game unless the players pick something else.
pub const DEFAULT_ROUNDS: u32 = 3;

/// Round counts offered by the setup form.
pub const ROUND_OPTIONS: [u32; 3] = [1, 3, 5];

/// Awarded to each voter who picked the impostor that got eliminated.
pub const CORRECT_VOTE_POINTS: u32 = 100;

/// Awarded to every impostor when a civilian is eliminated instead.
pub const SURVIVING_IMPOSTOR_POINTS: u32 = 50;

/// Awarded to every impostor when the secret word is guessed.
pub const CORRECT_GUESS_POINTS: u32 = 200;

const ID_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LENGTH: usize = 7;

/// Largest impostor count the setup form allows for `player_count` players.
///
/// One impostor per three players, never fewer than one.
pub fn max_impostors(player_count: usize) -> usize {
    (player_count / 3).max(1)
}

/// Stable identifier of a player for the lifetime of a roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap an existing identifier (e.g. one loaded from storage).
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self::generate_with_rng(&mut rand::rng())
    }

    /// Generate an identifier using a specific RNG (for testing/seeding).
    pub fn generate_with_rng<R: Rng>(rng: &mut R) -> Self {
        let id = (0..ID_LENGTH)
            .map(|_| ID_CHARS[rng.random_range(0..ID_CHARS.len())] as char)
            .collect();
        PlayerId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Avatar color tag. Order is the order new players receive them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    Teal,
    Pink,
    Cyan,
    DeepOrange,
    BlueGrey,
}

/// The fixed avatar palette.
pub const PALETTE: [PlayerColor; 10] = [
    PlayerColor::Red,
    PlayerColor::Blue,
    PlayerColor::Green,
    PlayerColor::Orange,
    PlayerColor::Purple,
    PlayerColor::Teal,
    PlayerColor::Pink,
    PlayerColor::Cyan,
    PlayerColor::DeepOrange,
    PlayerColor::BlueGrey,
];

impl PlayerColor {
    /// Hex code, also the persisted representation.
    pub fn hex(&self) -> &'static str {
        match self {
            PlayerColor::Red => "#e74c3c",
            PlayerColor::Blue => "#3498db",
            PlayerColor::Green => "#2ecc71",
            PlayerColor::Orange => "#f39c12",
            PlayerColor::Purple => "#9b59b6",
            PlayerColor::Teal => "#1abc9c",
            PlayerColor::Pink => "#e91e63",
            PlayerColor::Cyan => "#00bcd4",
            PlayerColor::DeepOrange => "#ff5722",
            PlayerColor::BlueGrey => "#607d8b",
        }
    }

    /// Parse a persisted hex code (case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        PALETTE
            .iter()
            .copied()
            .find(|c| c.hex().eq_ignore_ascii_case(hex))
    }

    /// RGB components for rendering.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }

    /// The color after this one in the palette, wrapping around.
    pub fn next(&self) -> Self {
        let idx = PALETTE.iter().position(|c| c == self).unwrap_or(0);
        PALETTE[(idx + 1) % PALETTE.len()]
    }
}

/// A participant, as held by the roster and snapshotted into a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: PlayerColor,
    pub is_impostor: bool,
    pub is_eliminated: bool,
    pub score: u32,
}

impl Player {
    /// A fresh player with no role, not eliminated, zero score.
    pub fn new(id: PlayerId, name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            is_impostor: false,
            is_eliminated: false,
            score: 0,
        }
    }

    /// Whether the player is still in the game.
    pub fn is_active(&self) -> bool {
        !self.is_eliminated
    }

    /// Up to two uppercase initials for avatars.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// Phase of a game session. Drives which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Choosing categories and settings
    Setup,
    /// Entering the roster
    Players,
    /// Handing the device to the next player
    Passing,
    /// A player privately looking at their role
    Reveal,
    /// Discussion round
    Playing,
    /// Collecting votes
    Voting,
    /// Showing the outcome of the vote
    Results,
    /// Game over
    Final,
}

impl GamePhase {
    pub fn label(&self) -> &'static str {
        match self {
            GamePhase::Setup => "setup",
            GamePhase::Players => "players",
            GamePhase::Passing => "passing",
            GamePhase::Reveal => "reveal",
            GamePhase::Playing => "playing",
            GamePhase::Voting => "voting",
            GamePhase::Results => "results",
            GamePhase::Final => "final",
        }
    }

    /// Whether a game is underway (roles have been dealt and not reset).
    pub fn is_in_game(&self) -> bool {
        !matches!(self, GamePhase::Setup | GamePhase::Players)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which side won a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Civilians,
    Impostors,
}

impl Winner {
    pub fn label(&self) -> &'static str {
        match self {
            Winner::Civilians => "Civilians win!",
            Winner::Impostors => "Impostors win!",
        }
    }
}
