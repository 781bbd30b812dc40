//! Player roster kept between games
//!
//! The roster outlives any single game: it is edited on the setup screen,
//! persisted to storage, and snapshotted into the session at game start.

use super::{Player, PlayerColor, PlayerId, MAX_NAME_LENGTH, MAX_PLAYERS, PALETTE};
use rand::Rng;

/// Ordered list of participants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a roster from stored players, keeping their order.
    pub fn from_players(players: Vec<Player>) -> Self {
        let players = players.into_iter().take(MAX_PLAYERS).collect();
        Self { players }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Append a player with a fresh id and the next free palette color.
    ///
    /// No-op (returns `None`) when the roster is full or the name is blank.
    pub fn add_player(&mut self, name: &str) -> Option<PlayerId> {
        self.add_player_with_rng(name, &mut rand::rng())
    }

    /// Same as [`Roster::add_player`] with a specific RNG for the id.
    pub fn add_player_with_rng<R: Rng>(&mut self, name: &str, rng: &mut R) -> Option<PlayerId> {
        if self.is_full() {
            return None;
        }
        let name: String = name.trim().chars().take(MAX_NAME_LENGTH).collect();
        if name.is_empty() {
            return None;
        }

        let id = loop {
            let candidate = PlayerId::generate_with_rng(rng);
            if self.get(&candidate).is_none() {
                break candidate;
            }
        };

        let color = self.next_color();
        self.players.push(Player::new(id.clone(), name, color));
        Some(id)
    }

    /// Remove a player by id. Returns whether anything was removed.
    pub fn remove_player(&mut self, id: &PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| &p.id != id);
        self.players.len() != before
    }

    /// Replace the roster with a caller-supplied ordering.
    pub fn reorder(&mut self, new_order: Vec<Player>) {
        self.players = new_order;
    }

    /// Move one player from `from` to `to`, shifting the others.
    /// Out-of-range positions are clamped.
    pub fn move_player(&mut self, from: usize, to: usize) {
        if from >= self.players.len() {
            return;
        }
        let mut order = self.players.clone();
        let player = order.remove(from);
        let to = to.min(order.len());
        order.insert(to, player);
        self.reorder(order);
    }

    /// Change a player's avatar color.
    pub fn set_color(&mut self, id: &PlayerId, color: PlayerColor) -> bool {
        match self.players.iter_mut().find(|p| &p.id == id) {
            Some(player) => {
                player.color = color;
                true
            }
            None => false,
        }
    }

    /// Drop every player (the "new players" path).
    pub fn clear(&mut self) {
        self.players.clear();
    }

    /// First palette color nobody uses yet, cycling through the palette once all are taken.
    fn next_color(&self) -> PlayerColor {
        PALETTE
            .iter()
            .copied()
            .find(|c| !self.players.iter().any(|p| p.color == *c))
            .unwrap_or(PALETTE[self.players.len() % PALETTE.len()])
    }
}
