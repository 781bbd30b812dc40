//! Game session state machine
//!
//! A `GameSession` owns everything about the game in progress: the player
//! snapshot with roles, reveal progress, the round counter, votes and scores.
//! Every transition is a method; calling one in the wrong phase returns
//! `EngineError::WrongPhase` and leaves the session untouched.
//!
//! Phase flow:
//!
//! ```text
//! setup -> passing <-> reveal -> playing -> voting -> results -> playing | final
//! ```
//!
//! Randomness (word, impostors, discussion leader) comes from the session's
//! own `StdRng`, so a seeded session replays identically.

use super::catalog::Catalog;
use super::validation::{validate_setup, SetupError};
use super::{
    GamePhase, Player, PlayerId, Winner, CORRECT_GUESS_POINTS, CORRECT_VOTE_POINTS,
    DEFAULT_ROUNDS, SURVIVING_IMPOSTOR_POINTS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

/// Options chosen on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetup {
    /// Selected category ids; one is drawn at random when the game starts.
    pub categories: Vec<String>,
    pub impostor_count: usize,
    pub total_rounds: u32,
}

impl GameSetup {
    pub fn new(category: impl Into<String>, impostor_count: usize, total_rounds: u32) -> Self {
        Self {
            categories: vec![category.into()],
            impostor_count,
            total_rounds,
        }
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            impostor_count: 1,
            total_rounds: DEFAULT_ROUNDS,
        }
    }
}

/// Errors returned by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("cannot {action} during the {phase} phase")]
    WrongPhase {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),
    #[error("player {0} is already eliminated")]
    AlreadyEliminated(PlayerId),
    #[error("no guess is available right now")]
    GuessUnavailable,
}

/// Result of resolving the votes of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// A single player had strictly the most votes
    Eliminated(PlayerId),
    /// Top vote count shared (or no votes at all); nobody leaves
    Tie,
}

/// Result of an impostor's last-chance guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Incorrect,
}

/// What happened when the results screen was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// The game is over
    GameOver(Winner),
    /// Another discussion round started; holds the new round number
    NextRound(u32),
}

/// What the player holding the device sees on the reveal screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCard<'a> {
    Civilian { category: &'a str, word: &'a str },
    Impostor { category: &'a str },
}

/// The single game session of the device.
pub struct GameSession {
    rng: StdRng,
    players: Vec<Player>,
    current_player_index: usize,
    revealed_players: HashSet<PlayerId>,
    starting_player_index: usize,
    total_rounds: u32,
    current_round: u32,
    impostor_count: usize,
    current_word: String,
    current_category: String,
    current_category_name: String,
    impostor_indices: Vec<usize>,
    phase: GamePhase,
    /// voter key -> player voted against
    votes: HashMap<String, PlayerId>,
    eliminated_this_round: Option<PlayerId>,
    /// Outcome of this round's tally, once it has happened
    round_outcome: Option<VoteOutcome>,
    guess_attempted: bool,
    word_guessed: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// A session seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// A deterministic session.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            players: Vec::new(),
            current_player_index: 0,
            revealed_players: HashSet::new(),
            starting_player_index: 0,
            total_rounds: DEFAULT_ROUNDS,
            current_round: 1,
            impostor_count: 1,
            current_word: String::new(),
            current_category: String::new(),
            current_category_name: String::new(),
            impostor_indices: Vec::new(),
            phase: GamePhase::Setup,
            votes: HashMap::new(),
            eliminated_this_round: None,
            round_outcome: None,
            guess_attempted: false,
            word_guessed: false,
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    /// The player the device belongs to during passing/reveal.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_players.len()
    }

    pub fn is_revealed(&self, id: &PlayerId) -> bool {
        self.revealed_players.contains(id)
    }

    pub fn starting_player_index(&self) -> usize {
        self.starting_player_index
    }

    /// Who opens the current discussion round.
    pub fn starting_player(&self) -> Option<&Player> {
        self.players.get(self.starting_player_index)
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn impostor_count(&self) -> usize {
        self.impostor_count
    }

    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    /// Id of the category the secret word was drawn from.
    pub fn current_category(&self) -> &str {
        &self.current_category
    }

    pub fn current_category_name(&self) -> &str {
        &self.current_category_name
    }

    /// Roster positions dealt the impostor role, ascending.
    pub fn impostor_indices(&self) -> &[usize] {
        &self.impostor_indices
    }

    pub fn votes(&self) -> &HashMap<String, PlayerId> {
        &self.votes
    }

    pub fn eliminated_this_round(&self) -> Option<&PlayerId> {
        self.eliminated_this_round.as_ref()
    }

    pub fn eliminated_player(&self) -> Option<&Player> {
        self.eliminated_this_round
            .as_ref()
            .and_then(|id| self.player(id))
    }

    /// Whether the impostors named the secret word.
    pub fn word_guessed(&self) -> bool {
        self.word_guessed
    }

    pub fn remaining_impostors(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.is_impostor && p.is_active())
            .count()
    }

    pub fn remaining_civilians(&self) -> usize {
        self.players
            .iter()
            .filter(|p| !p.is_impostor && p.is_active())
            .count()
    }

    // === Pre-game ===

    /// Switch the setup form to roster entry.
    pub fn begin_roster_entry(&mut self) -> Result<(), EngineError> {
        self.expect_phase(&[GamePhase::Setup, GamePhase::Players], "edit players")?;
        self.phase = GamePhase::Players;
        Ok(())
    }

    /// Switch the setup form to game options.
    pub fn begin_game_options(&mut self) -> Result<(), EngineError> {
        self.expect_phase(&[GamePhase::Setup, GamePhase::Players], "edit options")?;
        self.phase = GamePhase::Setup;
        Ok(())
    }

    /// Deal roles and start passing the device around.
    ///
    /// Validates the setup, draws a category among the selected ones and a
    /// word from it, picks `impostor_count` distinct impostors and an
    /// independent discussion leader, then snapshots the roster.
    pub fn start_game(
        &mut self,
        roster: &[Player],
        catalog: &Catalog,
        setup: &GameSetup,
    ) -> Result<(), EngineError> {
        self.expect_phase(
            &[GamePhase::Setup, GamePhase::Players, GamePhase::Final],
            "start a game",
        )?;
        validate_setup(roster.len(), setup, catalog)?;

        let category_id = setup.categories[self.rng.random_range(0..setup.categories.len())].clone();
        let category = catalog
            .lookup_category(&category_id)
            .ok_or_else(|| SetupError::UnknownCategory(category_id.clone()))?;
        let word = catalog
            .pick_random_word(&category_id, &mut self.rng)
            .ok_or_else(|| SetupError::EmptyCategory(category_id.clone()))?;

        let impostor_indices = select_impostors(&mut self.rng, roster.len(), setup.impostor_count);
        // Drawn separately so the leader carries no information about roles
        let starting_player_index = self.rng.random_range(0..roster.len());

        self.players = roster
            .iter()
            .enumerate()
            .map(|(i, p)| Player {
                is_impostor: impostor_indices.contains(&i),
                is_eliminated: false,
                ..p.clone()
            })
            .collect();
        self.current_category_name = category.name.clone();
        self.current_category = category_id;
        self.current_word = word;
        self.impostor_indices = impostor_indices;
        self.impostor_count = setup.impostor_count;
        self.total_rounds = setup.total_rounds;
        self.current_round = 1;
        self.current_player_index = 0;
        self.starting_player_index = starting_player_index;
        self.revealed_players.clear();
        self.votes.clear();
        self.eliminated_this_round = None;
        self.round_outcome = None;
        self.guess_attempted = false;
        self.word_guessed = false;
        self.phase = GamePhase::Passing;

        debug_assert!(self.roles_consistent());
        info!(
            players = self.players.len(),
            impostors = self.impostor_count,
            rounds = self.total_rounds,
            category = %self.current_category,
            "game started"
        );
        debug!(word = %self.current_word, "secret word drawn");
        Ok(())
    }

    // === Role reveal ===

    /// The current player has the device and opens their role.
    pub fn show_role(&mut self) -> Result<(), EngineError> {
        self.expect_phase(&[GamePhase::Passing], "show a role")?;
        self.phase = GamePhase::Reveal;
        Ok(())
    }

    /// What the current player sees. `None` outside the reveal phase.
    pub fn reveal_card(&self) -> Option<RoleCard<'_>> {
        if self.phase != GamePhase::Reveal {
            return None;
        }
        let player = self.current_player()?;
        let category = self.current_category_name.as_str();
        Some(if player.is_impostor {
            RoleCard::Impostor { category }
        } else {
            RoleCard::Civilian {
                category,
                word: self.current_word.as_str(),
            }
        })
    }

    /// Record that a player has seen their role. Returns `true` the first time.
    pub fn mark_player_revealed(&mut self, id: &PlayerId) -> bool {
        if self.player(id).is_none() {
            return false;
        }
        self.revealed_players.insert(id.clone())
    }

    /// The current player is done looking at their role.
    ///
    /// Once everyone has seen their role the discussion starts; otherwise the
    /// device goes to the next player. Returns the new phase.
    pub fn advance_to_next_player(&mut self) -> Result<GamePhase, EngineError> {
        self.expect_phase(&[GamePhase::Reveal], "advance to the next player")?;

        if let Some(id) = self.current_player().map(|p| p.id.clone()) {
            self.mark_player_revealed(&id);
        }

        if self.revealed_players.len() >= self.players.len() {
            self.current_player_index = 0;
            self.phase = GamePhase::Playing;
            info!(round = self.current_round, "all roles revealed, discussion begins");
        } else {
            self.current_player_index += 1;
            self.phase = GamePhase::Passing;
        }
        Ok(self.phase)
    }

    // === Discussion and voting ===

    /// Discussion order: the starting player first, then clockwise through
    /// the players still in the game. If the starting player is out, the
    /// first active player opens.
    pub fn turn_order(&self) -> Vec<&Player> {
        let active: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .collect();
        let start = active
            .iter()
            .position(|&i| i == self.starting_player_index)
            .unwrap_or(0);

        (0..active.len())
            .map(|offset| &self.players[active[(start + offset) % active.len()]])
            .collect()
    }

    /// Discussion is over, collect votes.
    pub fn begin_voting(&mut self) -> Result<(), EngineError> {
        self.expect_phase(&[GamePhase::Playing], "start voting")?;
        self.phase = GamePhase::Voting;
        Ok(())
    }

    /// Record (or replace) `voter`'s vote against `target`.
    ///
    /// The voter key is free-form so a single moderator vote works as well as
    /// one vote per player. The target must be a player still in the game.
    pub fn cast_vote(&mut self, voter: &str, target: &PlayerId) -> Result<(), EngineError> {
        self.expect_phase(&[GamePhase::Voting], "vote")?;
        let player = self
            .player(target)
            .ok_or_else(|| EngineError::UnknownPlayer(target.clone()))?;
        if player.is_eliminated {
            return Err(EngineError::AlreadyEliminated(target.clone()));
        }

        debug!(voter, target = %target, "vote cast");
        self.votes.insert(voter.to_string(), target.clone());
        Ok(())
    }

    /// Resolve the votes of this round.
    ///
    /// A strict plurality eliminates that player; a shared top count (or no
    /// votes) eliminates nobody. Scores are applied in the same step:
    /// correct voters get [`CORRECT_VOTE_POINTS`] when an impostor falls,
    /// surviving impostors get [`SURVIVING_IMPOSTOR_POINTS`] when a civilian
    /// falls.
    ///
    /// One-shot: calling it again on the results screen returns the recorded
    /// outcome without touching scores.
    pub fn tally_votes(&mut self) -> Result<VoteOutcome, EngineError> {
        if self.phase == GamePhase::Results {
            if let Some(outcome) = &self.round_outcome {
                return Ok(outcome.clone());
            }
        }
        self.expect_phase(&[GamePhase::Voting], "tally votes")?;

        let mut counts: HashMap<&PlayerId, usize> = HashMap::new();
        for target in self.votes.values() {
            *counts.entry(target).or_insert(0) += 1;
        }
        let max = counts.values().copied().max().unwrap_or(0);
        let leaders: Vec<&PlayerId> = counts
            .iter()
            .filter(|(_, &count)| count == max)
            .map(|(id, _)| *id)
            .collect();

        let outcome = match leaders.as_slice() {
            [single] => VoteOutcome::Eliminated((*single).clone()),
            _ => VoteOutcome::Tie,
        };

        match &outcome {
            VoteOutcome::Eliminated(id) => {
                let id = id.clone();
                self.apply_elimination(&id);
                self.eliminated_this_round = Some(id);
            }
            VoteOutcome::Tie => {
                self.eliminated_this_round = None;
                info!(round = self.current_round, votes = self.votes.len(), "vote tied, nobody eliminated");
            }
        }

        self.round_outcome = Some(outcome.clone());
        self.guess_attempted = false;
        self.phase = GamePhase::Results;
        Ok(outcome)
    }

    fn apply_elimination(&mut self, eliminated: &PlayerId) {
        let was_impostor = self
            .player(eliminated)
            .map(|p| p.is_impostor)
            .unwrap_or(false);

        for player in &mut self.players {
            if &player.id == eliminated {
                player.is_eliminated = true;
                continue;
            }
            if player.is_eliminated {
                continue;
            }
            let voted_correctly =
                was_impostor && self.votes.get(player.id.as_str()) == Some(eliminated);
            if voted_correctly {
                player.score += CORRECT_VOTE_POINTS;
            } else if player.is_impostor && !was_impostor {
                player.score += SURVIVING_IMPOSTOR_POINTS;
            }
        }

        info!(
            round = self.current_round,
            player = %eliminated,
            impostor = was_impostor,
            "player eliminated"
        );
    }

    // === Round end ===

    /// The side that has already won, if any.
    pub fn winner(&self) -> Option<Winner> {
        if self.word_guessed {
            return Some(Winner::Impostors);
        }
        let impostors = self.remaining_impostors();
        if impostors == 0 {
            Some(Winner::Civilians)
        } else if self.remaining_civilians() <= impostors {
            Some(Winner::Impostors)
        } else {
            None
        }
    }

    /// Decide whether the game ends after this round, and who won.
    ///
    /// Win conditions first, then the round limit. At the round limit the
    /// impostors still standing take the game.
    pub fn evaluate_round_end(&self) -> Option<Winner> {
        self.winner().or_else(|| {
            (self.current_round >= self.total_rounds).then(|| self.final_winner())
        })
    }

    /// Outcome shown on the final screen.
    pub fn final_winner(&self) -> Winner {
        self.winner().unwrap_or(Winner::Impostors)
    }

    /// Leave the results screen: either the game ends or another discussion
    /// round starts with the same word and roles.
    pub fn next_round(&mut self) -> Result<RoundEnd, EngineError> {
        self.expect_phase(&[GamePhase::Results], "start the next round")?;

        if let Some(winner) = self.evaluate_round_end() {
            self.phase = GamePhase::Final;
            info!(
                ?winner,
                round = self.current_round,
                impostors_left = self.remaining_impostors(),
                civilians_left = self.remaining_civilians(),
                "game over"
            );
            return Ok(RoundEnd::GameOver(winner));
        }

        let active: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, _)| i)
            .collect();
        self.starting_player_index = active[self.rng.random_range(0..active.len())];
        self.current_round += 1;
        self.current_player_index = 0;
        self.votes.clear();
        self.eliminated_this_round = None;
        self.round_outcome = None;
        self.guess_attempted = false;
        self.phase = GamePhase::Playing;

        info!(round = self.current_round, "next discussion round");
        Ok(RoundEnd::NextRound(self.current_round))
    }

    // === Last-chance guess ===

    /// An impostor was just voted out, the game is not decided yet, and no
    /// guess has been made this round.
    pub fn guess_available(&self) -> bool {
        self.phase == GamePhase::Results
            && !self.guess_attempted
            && self.eliminated_player().is_some_and(|p| p.is_impostor)
            && self.winner().is_none()
    }

    /// The impostors try to name the secret word.
    ///
    /// A match awards [`CORRECT_GUESS_POINTS`] to every impostor and ends the
    /// game in their favour. A miss changes nothing but uses up the guess.
    pub fn impostor_guess(&mut self, guess: &str) -> Result<GuessOutcome, EngineError> {
        if !self.guess_available() {
            return Err(EngineError::GuessUnavailable);
        }

        if guess_matches(guess, &self.current_word) {
            for player in self.players.iter_mut().filter(|p| p.is_impostor) {
                player.score += CORRECT_GUESS_POINTS;
            }
            self.word_guessed = true;
            self.phase = GamePhase::Final;
            info!(round = self.current_round, "impostors guessed the word");
            Ok(GuessOutcome::Correct)
        } else {
            self.guess_attempted = true;
            info!(round = self.current_round, "impostor guess missed");
            Ok(GuessOutcome::Incorrect)
        }
    }

    // === Teardown ===

    /// Back to setup with the same players: roles, eliminations and scores
    /// cleared, identity kept.
    pub fn reset_game(&mut self) {
        for player in &mut self.players {
            player.score = 0;
            player.is_impostor = false;
            player.is_eliminated = false;
        }
        self.current_player_index = 0;
        self.revealed_players.clear();
        self.starting_player_index = 0;
        self.total_rounds = DEFAULT_ROUNDS;
        self.current_round = 1;
        self.impostor_count = 1;
        self.current_word.clear();
        self.current_category.clear();
        self.current_category_name.clear();
        self.impostor_indices.clear();
        self.votes.clear();
        self.eliminated_this_round = None;
        self.round_outcome = None;
        self.guess_attempted = false;
        self.word_guessed = false;
        self.phase = GamePhase::Setup;
        info!("game reset");
    }

    /// Reset and forget the players entirely.
    pub fn clear_players(&mut self) {
        self.reset_game();
        self.players.clear();
    }

    /// Final standings, highest score first. Ties keep roster order.
    pub fn scoreboard(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    fn expect_phase(&self, allowed: &[GamePhase], action: &'static str) -> Result<(), EngineError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(EngineError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    /// `impostor_indices` and the per-player flags agree.
    fn roles_consistent(&self) -> bool {
        self.players
            .iter()
            .enumerate()
            .all(|(i, p)| p.is_impostor == self.impostor_indices.contains(&i))
    }
}

/// Pick `count` distinct positions in `[0, player_count)`.
///
/// Draws uniform indices and keeps the new ones until enough are collected.
fn select_impostors<R: Rng>(rng: &mut R, player_count: usize, count: usize) -> Vec<usize> {
    let target = count.min(player_count);
    let mut chosen = BTreeSet::new();
    while chosen.len() < target {
        chosen.insert(rng.random_range(0..player_count));
    }
    chosen.into_iter().collect()
}

/// Case-insensitive comparison ignoring surrounding whitespace.
pub fn guess_matches(guess: &str, word: &str) -> bool {
    guess.trim().to_lowercase() == word.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::roster::Roster;

    const MODERATOR: &str = "moderator";

    fn roster(n: usize) -> Vec<Player> {
        let mut rng = StdRng::seed_from_u64(n as u64);
        let mut roster = Roster::new();
        for i in 0..n {
            roster.add_player_with_rng(&format!("Player {}", i + 1), &mut rng);
        }
        roster.players().to_vec()
    }

    /// A catalog whose only custom category always yields "gato".
    fn gato_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_custom_category("Gatos", vec!["gato".to_string(); 5])
            .unwrap();
        catalog
    }

    fn started(players: usize, impostors: usize, rounds: u32, seed: u64) -> GameSession {
        let mut session = GameSession::with_seed(seed);
        session
            .start_game(
                &roster(players),
                &gato_catalog(),
                &GameSetup::new("custom_gatos", impostors, rounds),
            )
            .unwrap();
        session
    }

    fn reveal_all(session: &mut GameSession) {
        while session.phase() == GamePhase::Passing {
            session.show_role().unwrap();
            session.advance_to_next_player().unwrap();
        }
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    fn playing(players: usize, impostors: usize, rounds: u32, seed: u64) -> GameSession {
        let mut session = started(players, impostors, rounds, seed);
        reveal_all(&mut session);
        session
    }

    fn impostor_ids(session: &GameSession) -> Vec<PlayerId> {
        session
            .players()
            .iter()
            .filter(|p| p.is_impostor)
            .map(|p| p.id.clone())
            .collect()
    }

    fn civilian_ids(session: &GameSession) -> Vec<PlayerId> {
        session
            .players()
            .iter()
            .filter(|p| !p.is_impostor && p.is_active())
            .map(|p| p.id.clone())
            .collect()
    }

    /// Vote one player out through the moderator and tally.
    fn eliminate(session: &mut GameSession, id: &PlayerId) -> VoteOutcome {
        session.begin_voting().unwrap();
        session.cast_vote(MODERATOR, id).unwrap();
        session.tally_votes().unwrap()
    }

    fn score_of(session: &GameSession, id: &PlayerId) -> u32 {
        session.player(id).unwrap().score
    }

    // --- start ---

    #[test]
    fn test_start_game_assigns_exact_impostor_count() {
        let catalog = gato_catalog();
        for n in 4..=30 {
            for k in 1..=n / 3 {
                for seed in 0..3 {
                    let mut session = GameSession::with_seed(seed);
                    session
                        .start_game(&roster(n), &catalog, &GameSetup::new("custom_gatos", k, 3))
                        .unwrap();

                    let flagged = session.players().iter().filter(|p| p.is_impostor).count();
                    assert_eq!(flagged, k, "n={} k={}", n, k);
                    assert_eq!(session.players().len() - flagged, n - k);
                    assert_eq!(session.impostor_indices().len(), k);
                    assert!(session.roles_consistent());
                }
            }
        }
    }

    #[test]
    fn test_start_game_initial_state() {
        let session = started(5, 1, 3, 11);
        assert_eq!(session.phase(), GamePhase::Passing);
        assert_eq!(session.current_round(), 1);
        assert_eq!(session.total_rounds(), 3);
        assert_eq!(session.current_player_index(), 0);
        assert_eq!(session.revealed_count(), 0);
        assert!(session.votes().is_empty());
        assert!(session.eliminated_this_round().is_none());
        assert_eq!(session.current_word(), "gato");
        assert_eq!(session.current_category(), "custom_gatos");
        assert_eq!(session.current_category_name(), "Gatos");
        assert!(session.starting_player_index() < 5);
        assert!(session.players().iter().all(|p| p.is_active() && p.score == 0));
    }

    #[test]
    fn test_start_game_keeps_roster_identity_and_order() {
        let players = roster(6);
        let mut session = GameSession::with_seed(5);
        session
            .start_game(&players, &gato_catalog(), &GameSetup::new("custom_gatos", 2, 3))
            .unwrap();
        for (before, after) in players.iter().zip(session.players()) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.name, after.name);
            assert_eq!(before.color, after.color);
        }
    }

    #[test]
    fn test_start_game_rejects_invalid_setup() {
        let mut session = GameSession::with_seed(1);
        let result = session.start_game(
            &roster(3),
            &gato_catalog(),
            &GameSetup::new("custom_gatos", 1, 3),
        );
        assert_eq!(
            result,
            Err(EngineError::Setup(SetupError::NotEnoughPlayers { found: 3, min: 4 }))
        );
        assert_eq!(session.phase(), GamePhase::Setup);
        assert!(session.players().is_empty());

        let result = session.start_game(&roster(4), &gato_catalog(), &GameSetup::new("nope", 1, 3));
        assert_eq!(
            result,
            Err(EngineError::Setup(SetupError::UnknownCategory("nope".to_string())))
        );
    }

    #[test]
    fn test_start_game_rejected_mid_game() {
        let mut session = started(4, 1, 3, 2);
        let result = session.start_game(
            &roster(4),
            &gato_catalog(),
            &GameSetup::new("custom_gatos", 1, 3),
        );
        assert!(matches!(result, Err(EngineError::WrongPhase { .. })));
    }

    #[test]
    fn test_start_game_draws_among_selected_categories() {
        let catalog = Catalog::new();
        let setup = GameSetup {
            categories: vec!["animales".to_string(), "frutas".to_string()],
            impostor_count: 1,
            total_rounds: 3,
        };
        let mut seen = HashSet::new();
        let mut session = GameSession::with_seed(8);
        for _ in 0..40 {
            session.reset_game();
            session.start_game(&roster(4), &catalog, &setup).unwrap();
            let category = catalog.lookup_category(session.current_category()).unwrap();
            assert!(category.words.iter().any(|w| w == session.current_word()));
            seen.insert(session.current_category().to_string());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_seeded_sessions_are_deterministic() {
        let a = started(8, 2, 3, 42);
        let b = started(8, 2, 3, 42);
        assert_eq!(a.impostor_indices(), b.impostor_indices());
        assert_eq!(a.starting_player_index(), b.starting_player_index());
        assert_eq!(a.current_word(), b.current_word());
    }

    #[test]
    fn test_starting_player_independent_of_impostors() {
        let players = roster(6);
        let catalog = gato_catalog();
        let setup = GameSetup::new("custom_gatos", 1, 3);
        let mut session = GameSession::with_seed(2024);

        let trials = 6000;
        let mut starter_is_impostor = 0;
        let mut starter_counts = [0usize; 6];
        let mut impostor_counts = [0usize; 6];
        for _ in 0..trials {
            session.reset_game();
            session.start_game(&players, &catalog, &setup).unwrap();
            let start = session.starting_player_index();
            starter_counts[start] += 1;
            impostor_counts[session.impostor_indices()[0]] += 1;
            if session.players()[start].is_impostor {
                starter_is_impostor += 1;
            }
        }

        // P(starter is impostor) should be k/n = 1/6 if the draws are independent
        let rate = starter_is_impostor as f64 / trials as f64;
        assert!((rate - 1.0 / 6.0).abs() < 0.03, "rate = {}", rate);

        // Both draws are uniform over the roster
        for count in starter_counts.iter().chain(impostor_counts.iter()) {
            let share = *count as f64 / trials as f64;
            assert!((share - 1.0 / 6.0).abs() < 0.03, "share = {}", share);
        }
    }

    #[test]
    fn test_select_impostors_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let picked = select_impostors(&mut rng, 9, 3);
            assert_eq!(picked.len(), 3);
            assert!(picked.windows(2).all(|w| w[0] < w[1]));
            assert!(picked.iter().all(|&i| i < 9));
        }
        assert_eq!(select_impostors(&mut rng, 2, 5).len(), 2);
    }

    // --- setup phases ---

    #[test]
    fn test_setup_phase_toggles() {
        let mut session = GameSession::with_seed(1);
        session.begin_roster_entry().unwrap();
        assert_eq!(session.phase(), GamePhase::Players);
        session.begin_game_options().unwrap();
        assert_eq!(session.phase(), GamePhase::Setup);

        let mut session = started(4, 1, 3, 1);
        assert!(session.begin_roster_entry().is_err());
        assert_eq!(session.phase(), GamePhase::Passing);
    }

    // --- reveal ---

    #[test]
    fn test_reveal_flow() {
        let mut session = started(4, 1, 3, 7);
        for expected in 0..4 {
            assert_eq!(session.phase(), GamePhase::Passing);
            assert_eq!(session.current_player_index(), expected);
            session.show_role().unwrap();
            assert_eq!(session.phase(), GamePhase::Reveal);
            let next = session.advance_to_next_player().unwrap();
            if expected < 3 {
                assert_eq!(next, GamePhase::Passing);
            } else {
                assert_eq!(next, GamePhase::Playing);
            }
        }
        assert_eq!(session.revealed_count(), 4);
        assert_eq!(session.current_player_index(), 0);
    }

    #[test]
    fn test_mark_player_revealed_is_idempotent() {
        let mut session = started(4, 1, 3, 7);
        let id = session.players()[0].id.clone();
        assert!(session.mark_player_revealed(&id));
        assert!(!session.mark_player_revealed(&id));
        assert!(!session.mark_player_revealed(&PlayerId::new("ghost")));
        assert_eq!(session.revealed_count(), 1);
        assert!(session.is_revealed(&id));
        assert!(!session.is_revealed(&session.players()[1].id));

        // Marking ahead of time must not count twice toward completion
        session.show_role().unwrap();
        session.advance_to_next_player().unwrap();
        assert_eq!(session.revealed_count(), 1);
        assert_eq!(session.phase(), GamePhase::Passing);
        assert_eq!(session.current_player_index(), 1);
    }

    #[test]
    fn test_reveal_card_hides_word_from_impostor() {
        let mut session = started(6, 2, 3, 13);
        assert!(session.reveal_card().is_none());

        while session.phase() == GamePhase::Passing {
            session.show_role().unwrap();
            let is_impostor = session.current_player().unwrap().is_impostor;
            match session.reveal_card().unwrap() {
                RoleCard::Impostor { category } => {
                    assert!(is_impostor);
                    assert_eq!(category, "Gatos");
                }
                RoleCard::Civilian { category, word } => {
                    assert!(!is_impostor);
                    assert_eq!(category, "Gatos");
                    assert_eq!(word, "gato");
                }
            }
            session.advance_to_next_player().unwrap();
        }
    }

    #[test]
    fn test_wrong_phase_errors_leave_state_alone() {
        let mut session = started(4, 1, 3, 3);
        assert_eq!(
            session.tally_votes(),
            Err(EngineError::WrongPhase {
                action: "tally votes",
                phase: GamePhase::Passing
            })
        );
        assert!(session.advance_to_next_player().is_err());
        assert!(session.begin_voting().is_err());
        assert!(session.next_round().is_err());
        assert_eq!(session.phase(), GamePhase::Passing);

        reveal_all(&mut session);
        let target = session.players()[0].id.clone();
        assert!(matches!(
            session.cast_vote(MODERATOR, &target),
            Err(EngineError::WrongPhase { .. })
        ));
        assert!(session.votes().is_empty());
    }

    // --- voting ---

    #[test]
    fn test_tally_plurality_eliminates() {
        let mut session = playing(5, 1, 3, 21);
        let ids: Vec<PlayerId> = session.players().iter().map(|p| p.id.clone()).collect();
        let (x, y) = (&ids[3], &ids[4]);

        session.begin_voting().unwrap();
        session.cast_vote(ids[0].as_str(), x).unwrap();
        session.cast_vote(ids[1].as_str(), x).unwrap();
        session.cast_vote(ids[2].as_str(), y).unwrap();

        assert_eq!(session.tally_votes(), Ok(VoteOutcome::Eliminated(x.clone())));
        assert_eq!(session.eliminated_this_round(), Some(x));
        assert!(session.player(x).unwrap().is_eliminated);
        assert!(!session.player(y).unwrap().is_eliminated);
        assert_eq!(session.phase(), GamePhase::Results);
    }

    #[test]
    fn test_tally_tie_eliminates_nobody() {
        let mut session = playing(5, 1, 3, 21);
        let ids: Vec<PlayerId> = session.players().iter().map(|p| p.id.clone()).collect();

        session.begin_voting().unwrap();
        session.cast_vote(ids[0].as_str(), &ids[3]).unwrap();
        session.cast_vote(ids[1].as_str(), &ids[4]).unwrap();

        assert_eq!(session.tally_votes(), Ok(VoteOutcome::Tie));
        assert!(session.eliminated_this_round().is_none());
        assert!(session.players().iter().all(|p| p.is_active() && p.score == 0));
        assert_eq!(session.phase(), GamePhase::Results);
    }

    #[test]
    fn test_tally_with_no_votes_is_tie() {
        let mut session = playing(4, 1, 3, 2);
        session.begin_voting().unwrap();
        assert_eq!(session.tally_votes(), Ok(VoteOutcome::Tie));
        assert_eq!(session.phase(), GamePhase::Results);
        assert!(!session.guess_available());
    }

    #[test]
    fn test_vote_is_overwritten() {
        let mut session = playing(4, 1, 3, 2);
        let ids: Vec<PlayerId> = session.players().iter().map(|p| p.id.clone()).collect();
        session.begin_voting().unwrap();
        session.cast_vote("a", &ids[1]).unwrap();
        session.cast_vote("a", &ids[2]).unwrap();
        assert_eq!(session.votes().len(), 1);
        assert_eq!(session.votes().get("a"), Some(&ids[2]));
    }

    #[test]
    fn test_cast_vote_rejects_bad_targets() {
        let mut session = playing(5, 1, 3, 4);
        let civilian = civilian_ids(&session)[0].clone();
        eliminate(&mut session, &civilian);
        session.next_round().unwrap();
        session.begin_voting().unwrap();

        let ghost = PlayerId::new("ghost");
        assert_eq!(
            session.cast_vote(MODERATOR, &ghost),
            Err(EngineError::UnknownPlayer(ghost))
        );
        assert_eq!(
            session.cast_vote(MODERATOR, &civilian),
            Err(EngineError::AlreadyEliminated(civilian.clone()))
        );
        assert!(session.votes().is_empty());
    }

    #[test]
    fn test_correct_voters_score_when_impostor_eliminated() {
        let mut session = playing(6, 2, 3, 9);
        let impostor = impostor_ids(&session)[0].clone();
        let other_impostor = impostor_ids(&session)[1].clone();
        let civilians = civilian_ids(&session);

        session.begin_voting().unwrap();
        session.cast_vote(civilians[0].as_str(), &impostor).unwrap();
        session.cast_vote(civilians[1].as_str(), &impostor).unwrap();
        session.cast_vote(civilians[2].as_str(), &civilians[3]).unwrap();
        session.cast_vote(other_impostor.as_str(), &impostor).unwrap();
        session.cast_vote(MODERATOR, &impostor).unwrap();

        assert_eq!(session.tally_votes(), Ok(VoteOutcome::Eliminated(impostor.clone())));
        assert_eq!(score_of(&session, &civilians[0]), CORRECT_VOTE_POINTS);
        assert_eq!(score_of(&session, &civilians[1]), CORRECT_VOTE_POINTS);
        assert_eq!(score_of(&session, &civilians[2]), 0);
        assert_eq!(score_of(&session, &civilians[3]), 0);
        // Any voter who picked right is rewarded, whatever their role
        assert_eq!(score_of(&session, &other_impostor), CORRECT_VOTE_POINTS);
        assert_eq!(score_of(&session, &impostor), 0);
    }

    #[test]
    fn test_surviving_impostors_score_when_civilian_eliminated() {
        let mut session = playing(9, 2, 3, 17);
        let impostors = impostor_ids(&session);
        let civilians = civilian_ids(&session);

        session.begin_voting().unwrap();
        session.cast_vote(civilians[1].as_str(), &civilians[0]).unwrap();
        session.cast_vote(civilians[2].as_str(), &civilians[0]).unwrap();
        assert_eq!(
            session.tally_votes(),
            Ok(VoteOutcome::Eliminated(civilians[0].clone()))
        );

        for id in &impostors {
            assert_eq!(score_of(&session, id), SURVIVING_IMPOSTOR_POINTS);
        }
        for id in &civilians {
            assert_eq!(score_of(&session, id), 0);
        }
    }

    #[test]
    fn test_eliminated_impostor_gets_no_survival_points() {
        let mut session = playing(9, 3, 5, 23);
        let impostors = impostor_ids(&session);
        let civilians = civilian_ids(&session);

        // Round 1: impostor out (game continues, 2 impostors vs 6 civilians)
        eliminate(&mut session, &impostors[0]);
        assert_eq!(session.next_round(), Ok(RoundEnd::NextRound(2)));

        // Round 2: civilian out, only the two remaining impostors score
        eliminate(&mut session, &civilians[0]);
        assert_eq!(score_of(&session, &impostors[0]), 0);
        assert_eq!(score_of(&session, &impostors[1]), SURVIVING_IMPOSTOR_POINTS);
        assert_eq!(score_of(&session, &impostors[2]), SURVIVING_IMPOSTOR_POINTS);
    }

    #[test]
    fn test_tally_is_one_shot() {
        let mut session = playing(5, 1, 3, 30);
        let civilian = civilian_ids(&session)[0].clone();
        let first = eliminate(&mut session, &civilian);
        let scores: Vec<u32> = session.players().iter().map(|p| p.score).collect();

        let second = session.tally_votes().unwrap();
        assert_eq!(first, second);
        let again: Vec<u32> = session.players().iter().map(|p| p.score).collect();
        assert_eq!(scores, again);
        assert_eq!(session.phase(), GamePhase::Results);
    }

    // --- round end ---

    #[test]
    fn test_next_round_never_picks_eliminated_leader() {
        for seed in 0..60 {
            let mut session = playing(10, 1, 5, seed);
            let civilians = civilian_ids(&session);
            for (round, civilian) in civilians.iter().take(3).enumerate() {
                eliminate(&mut session, civilian);
                assert_eq!(
                    session.next_round(),
                    Ok(RoundEnd::NextRound(round as u32 + 2))
                );
                let leader = session.starting_player().unwrap();
                assert!(leader.is_active(), "seed {} picked eliminated leader", seed);
            }
        }
    }

    #[test]
    fn test_next_round_keeps_word_and_roles() {
        let mut session = playing(6, 2, 3, 31);
        let indices = session.impostor_indices().to_vec();
        let civilian = civilian_ids(&session)[0].clone();
        eliminate(&mut session, &civilian);
        session.next_round().unwrap();

        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.current_word(), "gato");
        assert_eq!(session.impostor_indices(), indices.as_slice());
        assert!(session.votes().is_empty());
        assert!(session.eliminated_this_round().is_none());
        assert!(session.roles_consistent());
    }

    #[test]
    fn test_tie_round_continues() {
        let mut session = playing(5, 1, 3, 6);
        session.begin_voting().unwrap();
        session.tally_votes().unwrap();
        assert_eq!(session.next_round(), Ok(RoundEnd::NextRound(2)));
        assert_eq!(session.remaining_civilians(), 4);
    }

    #[test]
    fn test_civilians_win_when_last_impostor_out() {
        let mut session = playing(6, 2, 5, 12);
        let impostors = impostor_ids(&session);

        eliminate(&mut session, &impostors[0]);
        assert_eq!(session.winner(), None);
        session.next_round().unwrap();

        eliminate(&mut session, &impostors[1]);
        assert_eq!(session.winner(), Some(Winner::Civilians));
        assert_eq!(session.next_round(), Ok(RoundEnd::GameOver(Winner::Civilians)));
        assert_eq!(session.phase(), GamePhase::Final);
        assert_eq!(session.current_round(), 2);
    }

    #[test]
    fn test_impostors_win_on_parity() {
        let mut session = playing(4, 1, 5, 14);
        let civilians = civilian_ids(&session);

        eliminate(&mut session, &civilians[0]);
        // 2 civilians vs 1 impostor: keep going
        assert_eq!(session.next_round(), Ok(RoundEnd::NextRound(2)));

        eliminate(&mut session, &civilians[1]);
        assert_eq!(session.remaining_civilians(), 1);
        assert_eq!(session.next_round(), Ok(RoundEnd::GameOver(Winner::Impostors)));
        assert_eq!(session.final_winner(), Winner::Impostors);
    }

    #[test]
    fn test_round_limit_forces_final() {
        let mut session = playing(7, 1, 1, 15);
        let civilian = civilian_ids(&session)[0].clone();
        eliminate(&mut session, &civilian);

        assert_eq!(session.winner(), None);
        assert_eq!(session.evaluate_round_end(), Some(Winner::Impostors));
        assert_eq!(session.next_round(), Ok(RoundEnd::GameOver(Winner::Impostors)));
        assert_eq!(session.current_round(), 1);
        assert_eq!(session.phase(), GamePhase::Final);
    }

    // --- guesses ---

    #[test]
    fn test_guess_matches_normalizes() {
        assert!(guess_matches("  Gato  ", "gato"));
        assert!(guess_matches("GATO", " gato"));
        assert!(!guess_matches("gatos", "gato"));
        assert!(!guess_matches("", "gato"));
    }

    #[test]
    fn test_impostor_guess_correct() {
        let mut session = playing(6, 2, 3, 19);
        let impostors = impostor_ids(&session);
        eliminate(&mut session, &impostors[0]);
        assert!(session.guess_available());

        assert_eq!(session.impostor_guess("  Gato  "), Ok(GuessOutcome::Correct));
        assert_eq!(session.phase(), GamePhase::Final);
        // Every impostor, including the one voted out
        assert_eq!(score_of(&session, &impostors[0]), CORRECT_GUESS_POINTS);
        assert_eq!(score_of(&session, &impostors[1]), CORRECT_GUESS_POINTS);
        assert_eq!(session.final_winner(), Winner::Impostors);
        assert!(!session.guess_available());
    }

    #[test]
    fn test_impostor_guess_incorrect() {
        let mut session = playing(6, 2, 3, 19);
        let impostors = impostor_ids(&session);
        eliminate(&mut session, &impostors[0]);
        let scores: Vec<u32> = session.players().iter().map(|p| p.score).collect();

        assert_eq!(session.impostor_guess("gatos"), Ok(GuessOutcome::Incorrect));
        assert_eq!(session.phase(), GamePhase::Results);
        let after: Vec<u32> = session.players().iter().map(|p| p.score).collect();
        assert_eq!(scores, after);

        // One attempt per results screen
        assert_eq!(session.impostor_guess("gato"), Err(EngineError::GuessUnavailable));
        assert_eq!(session.next_round(), Ok(RoundEnd::NextRound(2)));
    }

    #[test]
    fn test_guess_unavailable_cases() {
        // Civilian eliminated
        let mut session = playing(6, 2, 3, 27);
        let civilian = civilian_ids(&session)[0].clone();
        eliminate(&mut session, &civilian);
        assert!(!session.guess_available());
        assert_eq!(session.impostor_guess("gato"), Err(EngineError::GuessUnavailable));

        // Only impostor eliminated: civilians already won
        let mut session = playing(4, 1, 3, 27);
        let impostor = impostor_ids(&session)[0].clone();
        eliminate(&mut session, &impostor);
        assert!(!session.guess_available());

        // Not on the results screen
        let mut session = playing(4, 1, 3, 27);
        assert_eq!(session.impostor_guess("gato"), Err(EngineError::GuessUnavailable));
    }

    // --- teardown and views ---

    #[test]
    fn test_reset_game_keeps_identity() {
        let mut session = playing(6, 2, 3, 33);
        let impostors = impostor_ids(&session);
        eliminate(&mut session, &impostors[0]);
        let before: Vec<(PlayerId, String)> = session
            .players()
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect();

        session.reset_game();
        assert_eq!(session.phase(), GamePhase::Setup);
        assert_eq!(session.current_round(), 1);
        assert_eq!(session.revealed_count(), 0);
        assert!(session.votes().is_empty());
        assert!(session.current_word().is_empty());
        assert!(session.impostor_indices().is_empty());
        assert!(session
            .players()
            .iter()
            .all(|p| !p.is_impostor && !p.is_eliminated && p.score == 0));
        let after: Vec<(PlayerId, String)> = session
            .players()
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_clear_players() {
        let mut session = playing(4, 1, 3, 1);
        session.clear_players();
        assert!(session.players().is_empty());
        assert_eq!(session.phase(), GamePhase::Setup);
    }

    #[test]
    fn test_play_again_from_final() {
        let mut session = playing(4, 1, 1, 3);
        let impostor = impostor_ids(&session)[0].clone();
        eliminate(&mut session, &impostor);
        session.next_round().unwrap();
        assert_eq!(session.phase(), GamePhase::Final);

        session
            .start_game(&roster(4), &gato_catalog(), &GameSetup::new("custom_gatos", 1, 3))
            .unwrap();
        assert_eq!(session.phase(), GamePhase::Passing);
        assert!(session.players().iter().all(|p| p.is_active()));
    }

    #[test]
    fn test_turn_order() {
        let mut session = playing(5, 1, 5, 40);
        let start = session.starting_player_index();
        let order: Vec<&str> = session.turn_order().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order.len(), 5);
        assert_eq!(order[0], session.players()[start].id.as_str());
        assert_eq!(order[1], session.players()[(start + 1) % 5].id.as_str());

        // Eliminate the leader: the order falls back to the first active player
        let leader = session.players()[start].id.clone();
        session.begin_voting().unwrap();
        session.cast_vote(MODERATOR, &leader).unwrap();
        session.tally_votes().unwrap();
        let order = session.turn_order();
        assert_eq!(order.len(), 4);
        assert!(order.iter().all(|p| p.is_active()));
        let first_active = session.players().iter().find(|p| p.is_active()).unwrap();
        assert_eq!(order[0].id, first_active.id);
    }

    #[test]
    fn test_scoreboard_sorted() {
        let mut session = playing(6, 2, 3, 9);
        let impostor = impostor_ids(&session)[0].clone();
        let civilians = civilian_ids(&session);
        session.begin_voting().unwrap();
        session.cast_vote(civilians[2].as_str(), &impostor).unwrap();
        session.tally_votes().unwrap();

        let board = session.scoreboard();
        assert_eq!(board[0].id, civilians[2]);
        assert_eq!(board[0].score, CORRECT_VOTE_POINTS);
        assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
    }

    // --- end to end ---

    #[test]
    fn test_four_player_game_civilians_win() {
        let catalog = Catalog::new();
        let players = roster(4);
        let mut session = GameSession::with_seed(77);
        session
            .start_game(&players, &catalog, &GameSetup::new("animales", 1, 3))
            .unwrap();
        assert_eq!(session.players().iter().filter(|p| p.is_impostor).count(), 1);
        assert!(catalog
            .lookup_category("animales")
            .unwrap()
            .words
            .iter()
            .any(|w| w == session.current_word()));

        reveal_all(&mut session);
        assert_eq!(session.phase(), GamePhase::Playing);

        let impostor = impostor_ids(&session)[0].clone();
        let civilians = civilian_ids(&session);
        session.begin_voting().unwrap();
        session.cast_vote(civilians[0].as_str(), &impostor).unwrap();
        session.cast_vote(civilians[1].as_str(), &impostor).unwrap();
        session.cast_vote(civilians[2].as_str(), &civilians[0]).unwrap();
        assert_eq!(session.tally_votes(), Ok(VoteOutcome::Eliminated(impostor.clone())));

        assert_eq!(session.remaining_impostors(), 0);
        assert_eq!(session.next_round(), Ok(RoundEnd::GameOver(Winner::Civilians)));
        assert_eq!(session.phase(), GamePhase::Final);

        let board = session.scoreboard();
        assert_eq!(board[0].score, CORRECT_VOTE_POINTS);
        assert_eq!(board[1].score, CORRECT_VOTE_POINTS);
        assert_eq!(board[2].score, 0);
        assert_eq!(score_of(&session, &civilians[0]), CORRECT_VOTE_POINTS);
        assert_eq!(score_of(&session, &civilians[1]), CORRECT_VOTE_POINTS);
        assert_eq!(score_of(&session, &civilians[2]), 0);
    }

    #[test]
    fn test_five_player_game_continues_after_civilian_out() {
        let mut session = GameSession::with_seed(88);
        session
            .start_game(&roster(5), &Catalog::new(), &GameSetup::new("animales", 1, 3))
            .unwrap();
        reveal_all(&mut session);
        let word = session.current_word().to_string();

        let civilian = civilian_ids(&session)[0].clone();
        assert_eq!(
            eliminate(&mut session, &civilian),
            VoteOutcome::Eliminated(civilian.clone())
        );
        assert_eq!(session.remaining_civilians(), 3);
        assert_eq!(session.remaining_impostors(), 1);

        assert_eq!(session.next_round(), Ok(RoundEnd::NextRound(2)));
        assert_eq!(session.current_round(), 2);
        assert_eq!(session.current_word(), word);
        assert_eq!(session.phase(), GamePhase::Playing);
        let leader = session.starting_player().unwrap();
        assert_ne!(leader.id, civilian);
        assert_eq!(session.turn_order().len(), 4);
    }
}
