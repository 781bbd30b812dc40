//! Application screen state management
//!
//! Handles transitions between the application screens:
//! - Main menu and settings
//! - Setup (roster entry and game options)
//! - Pass / reveal loop
//! - Discussion, vote and results
//! - Final scoreboard
//!
//! Key handlers (`on_enter`, `on_up`, ...) dispatch on the current screen.
//! The rules live in `GameSession`; this layer picks the screen and persists
//! whatever the players edited.

use super::settings::{Settings, VOLUME_STEP};
use super::setup::{CategoryDraft, OptionRow, SetupForm, SetupTab};
use crate::game::catalog::Catalog;
use crate::game::engine::{GameSession, GuessOutcome, RoundEnd, VoteOutcome};
use crate::game::roster::Roster;
use crate::game::{GamePhase, Player, PlayerColor, MAX_NAME_LENGTH, MIN_PLAYERS, PALETTE};
use crate::storage::Storage;
use tracing::{info, warn};

/// Voter key for the single decisive vote entered on the vote screen.
pub const MODERATOR: &str = "moderator";

/// Longest guess accepted by the results screen.
const MAX_GUESS_LENGTH: usize = 40;

/// Menu option on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    NewGame,
    Settings,
    Quit,
}

impl MenuOption {
    /// Get all menu options in order
    pub fn all() -> &'static [MenuOption] {
        &[MenuOption::NewGame, MenuOption::Settings, MenuOption::Quit]
    }

    /// Get the display label for this option
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::NewGame => "New Game",
            MenuOption::Settings => "Settings",
            MenuOption::Quit => "Quit",
        }
    }
}

/// Row on the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Sound,
    Music,
    Haptics,
    Volume,
    Back,
}

impl SettingsRow {
    pub fn all() -> &'static [SettingsRow] {
        &[
            SettingsRow::Sound,
            SettingsRow::Music,
            SettingsRow::Haptics,
            SettingsRow::Volume,
            SettingsRow::Back,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingsRow::Sound => "Sound effects",
            SettingsRow::Music => "Music",
            SettingsRow::Haptics => "Vibration",
            SettingsRow::Volume => "Volume",
            SettingsRow::Back => "Back",
        }
    }
}

/// Choice on the final screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalOption {
    PlayAgain,
    NewPlayers,
    MainMenu,
}

impl FinalOption {
    pub fn all() -> &'static [FinalOption] {
        &[
            FinalOption::PlayAgain,
            FinalOption::NewPlayers,
            FinalOption::MainMenu,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FinalOption::PlayAgain => "Play again",
            FinalOption::NewPlayers => "New players",
            FinalOption::MainMenu => "Main menu",
        }
    }
}

/// The current application screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Main menu
    Menu { selected: usize },
    /// Preferences
    Settings { selected: usize },
    /// Roster and game options; state lives in `AppCoordinator::setup`
    Setup,
    /// Hand the device to the current player
    Pass,
    /// The current player looks at their role
    Reveal,
    /// Discussion round
    Discussion,
    /// Pick the player with the most votes; the row after the last player skips
    Vote { selected: usize },
    /// Outcome of the vote, with the last-chance guess input
    Results {
        outcome: VoteOutcome,
        guess: String,
        missed_guess: bool,
    },
    /// Game over
    Final { selected: usize },
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    pub roster: Roster,
    pub catalog: Catalog,
    pub settings: Settings,
    pub session: GameSession,
    pub setup: SetupForm,
    storage: Storage,
    /// An audible event happened since the last frame
    bell: bool,
}

impl AppCoordinator {
    /// Create a coordinator at the menu, restoring whatever was saved.
    pub fn new(storage: Storage, session: GameSession) -> Self {
        let roster = storage
            .load_roster()
            .map(Roster::from_players)
            .unwrap_or_else(|e| {
                warn!(error = %e, "could not load saved roster");
                Roster::new()
            });
        let catalog = storage
            .load_custom_categories()
            .map(Catalog::with_custom)
            .unwrap_or_else(|e| {
                warn!(error = %e, "could not load custom categories");
                Catalog::new()
            });
        let settings = storage.load_settings().unwrap_or_else(|e| {
            warn!(error = %e, "could not load settings");
            Settings::default()
        });

        info!(
            players = roster.len(),
            custom_categories = catalog.custom().len(),
            "saved data loaded"
        );

        Self {
            screen: Screen::Menu { selected: 0 },
            should_quit: false,
            roster,
            catalog,
            settings,
            session,
            setup: SetupForm::new(),
            storage,
            bell: false,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Go back to the main menu, abandoning any game in progress
    pub fn go_to_menu(&mut self) {
        if self.session.phase().is_in_game() {
            self.session.reset_game();
        }
        self.setup.draft = None;
        self.screen = Screen::Menu { selected: 0 };
    }

    /// Whether the terminal bell should ring now. Clears the request.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell) && self.settings.sound_enabled
    }

    /// Players that can still be voted for, in roster order.
    pub fn vote_candidates(&self) -> Vec<&Player> {
        self.session
            .players()
            .iter()
            .filter(|p| p.is_active())
            .collect()
    }

    // === Key dispatch ===

    pub fn on_up(&mut self) {
        match &mut self.screen {
            Screen::Menu { selected }
            | Screen::Settings { selected }
            | Screen::Vote { selected }
            | Screen::Final { selected } => *selected = selected.saturating_sub(1),
            Screen::Setup => self.setup_move(-1),
            _ => {}
        }
    }

    pub fn on_down(&mut self) {
        let vote_rows = self.vote_candidates().len() + 1;
        match &mut self.screen {
            Screen::Menu { selected } => {
                *selected = (*selected + 1).min(MenuOption::all().len() - 1)
            }
            Screen::Settings { selected } => {
                *selected = (*selected + 1).min(SettingsRow::all().len() - 1)
            }
            Screen::Vote { selected } => *selected = (*selected + 1).min(vote_rows - 1),
            Screen::Final { selected } => {
                *selected = (*selected + 1).min(FinalOption::all().len() - 1)
            }
            Screen::Setup => self.setup_move(1),
            _ => {}
        }
    }

    pub fn on_left(&mut self) {
        match self.screen {
            Screen::Setup => self.setup_adjust(false),
            Screen::Settings { selected } => self.settings_adjust(selected, -VOLUME_STEP),
            _ => {}
        }
    }

    pub fn on_right(&mut self) {
        match self.screen {
            Screen::Setup => self.setup_adjust(true),
            Screen::Settings { selected } => self.settings_adjust(selected, VOLUME_STEP),
            _ => {}
        }
    }

    pub fn on_enter(&mut self) {
        match self.screen {
            Screen::Menu { selected } => self.menu_select(selected),
            Screen::Settings { selected } => self.settings_activate(selected),
            Screen::Setup => self.setup_enter(),
            Screen::Pass => self.confirm_pass(),
            Screen::Reveal => self.finish_reveal(),
            Screen::Discussion => self.start_vote(),
            Screen::Vote { selected } => self.confirm_vote(selected),
            Screen::Results { .. } => self.results_enter(),
            Screen::Final { selected } => self.final_select(selected),
        }
    }

    pub fn on_char(&mut self, c: char) {
        let guess_open = self.session.guess_available();
        match &mut self.screen {
            Screen::Setup => self.setup_char(c),
            Screen::Settings { selected } if c == ' ' => {
                let selected = *selected;
                self.settings_activate(selected);
            }
            Screen::Results { guess, .. } if guess_open => {
                if guess.chars().count() < MAX_GUESS_LENGTH {
                    guess.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn on_backspace(&mut self) {
        match &mut self.screen {
            Screen::Setup => {
                if let Some(draft) = &mut self.setup.draft {
                    draft.input_mut().pop();
                } else if self.setup.tab == SetupTab::Players {
                    self.setup.name_input.pop();
                }
            }
            Screen::Results { guess, .. } => {
                guess.pop();
            }
            _ => {}
        }
    }

    pub fn on_delete(&mut self) {
        if self.screen != Screen::Setup || self.setup.draft.is_some() {
            return;
        }
        match self.setup.tab {
            SetupTab::Players => self.remove_selected_player(),
            SetupTab::Options => self.remove_current_category(),
        }
    }

    pub fn on_tab(&mut self) {
        if self.screen != Screen::Setup {
            return;
        }
        if let Some(draft) = &mut self.setup.draft {
            draft.toggle_field();
            return;
        }
        let next = match self.setup.tab {
            SetupTab::Players => SetupTab::Options,
            SetupTab::Options => SetupTab::Players,
        };
        self.switch_tab(next);
    }

    /// Reorder the highlighted player (players tab only).
    pub fn on_page(&mut self, delta: isize) {
        if self.screen == Screen::Setup && self.setup.tab == SetupTab::Players {
            self.move_selected_player(delta);
        }
    }

    pub fn on_escape(&mut self) {
        match self.screen {
            Screen::Menu { .. } => self.quit(),
            Screen::Setup if self.setup.draft.is_some() => {
                self.setup.draft = None;
                self.setup.error = None;
            }
            _ => self.go_to_menu(),
        }
    }

    // === Menu and settings ===

    fn menu_select(&mut self, selected: usize) {
        match MenuOption::all()[selected] {
            MenuOption::NewGame => self.open_setup(SetupTab::Players),
            MenuOption::Settings => self.screen = Screen::Settings { selected: 0 },
            MenuOption::Quit => self.quit(),
        }
    }

    fn settings_activate(&mut self, selected: usize) {
        match SettingsRow::all()[selected] {
            SettingsRow::Sound => self.settings.sound_enabled = !self.settings.sound_enabled,
            SettingsRow::Music => self.settings.music_enabled = !self.settings.music_enabled,
            SettingsRow::Haptics => {
                self.settings.haptics_enabled = !self.settings.haptics_enabled
            }
            SettingsRow::Volume => return,
            SettingsRow::Back => {
                self.screen = Screen::Menu { selected: 0 };
                return;
            }
        }
        self.persist_settings();
    }

    fn settings_adjust(&mut self, selected: usize, delta: f32) {
        if SettingsRow::all()[selected] == SettingsRow::Volume {
            self.settings.adjust_volume(delta);
            self.persist_settings();
        }
    }

    // === Setup ===

    fn open_setup(&mut self, tab: SetupTab) {
        if self.session.phase().is_in_game() {
            self.session.reset_game();
        }
        self.setup.error = None;
        self.setup.draft = None;
        self.setup.clamp_impostors(self.roster.len());
        self.setup
            .move_player_cursor(0, self.roster.len());
        self.screen = Screen::Setup;
        self.switch_tab(tab);
    }

    fn switch_tab(&mut self, tab: SetupTab) {
        let result = match tab {
            SetupTab::Players => self.session.begin_roster_entry(),
            SetupTab::Options => self.session.begin_game_options(),
        };
        if let Err(e) = result {
            warn!(error = %e, "setup tab switch refused");
            return;
        }
        self.setup.tab = tab;
        self.setup.error = None;
    }

    fn setup_move(&mut self, delta: isize) {
        match self.setup.tab {
            _ if self.setup.draft.is_some() => {}
            SetupTab::Players => self.setup.move_player_cursor(delta, self.roster.len()),
            SetupTab::Options => {
                let rows = self.setup.rows(&self.catalog).len();
                self.setup.move_cursor(delta, rows);
            }
        }
    }

    fn setup_adjust(&mut self, forward: bool) {
        if self.setup.draft.is_some() {
            return;
        }
        match self.setup.tab {
            SetupTab::Players => self.cycle_selected_color(forward),
            SetupTab::Options => match self.setup.current_row(&self.catalog) {
                Some(OptionRow::Impostors) if forward => {
                    self.setup.increase_impostors(self.roster.len())
                }
                Some(OptionRow::Impostors) => self.setup.decrease_impostors(self.roster.len()),
                Some(OptionRow::Rounds) => self.setup.cycle_rounds(forward),
                _ => {}
            },
        }
    }

    fn setup_char(&mut self, c: char) {
        if let Some(draft) = &mut self.setup.draft {
            draft.input_mut().push(c);
            return;
        }
        match self.setup.tab {
            SetupTab::Players => {
                if self.setup.name_input.chars().count() < MAX_NAME_LENGTH {
                    self.setup.name_input.push(c);
                    self.setup.error = None;
                }
            }
            SetupTab::Options => match c {
                ' ' => self.toggle_current_category(),
                's' | 'S' => self.start_game(),
                _ => {}
            },
        }
    }

    fn setup_enter(&mut self) {
        if self.setup.draft.is_some() {
            self.save_draft();
            return;
        }
        match self.setup.tab {
            SetupTab::Players if !self.setup.name_input.trim().is_empty() => self.add_player(),
            SetupTab::Players => {
                if self.roster.len() >= MIN_PLAYERS {
                    self.switch_tab(SetupTab::Options);
                }
            }
            SetupTab::Options => match self.setup.current_row(&self.catalog) {
                Some(OptionRow::Category(_)) => self.toggle_current_category(),
                Some(OptionRow::NewCategory) => {
                    self.setup.draft = Some(CategoryDraft::default());
                    self.setup.error = None;
                }
                _ => self.start_game(),
            },
        }
    }

    fn add_player(&mut self) {
        let name = std::mem::take(&mut self.setup.name_input);
        match self.roster.add_player(&name) {
            Some(id) => {
                info!(player = %id, total = self.roster.len(), "player added");
                self.setup.selected_player = self.roster.len() - 1;
                self.setup.clamp_impostors(self.roster.len());
                self.persist_roster();
            }
            None if self.roster.is_full() => {
                self.setup.error = Some(format!("the roster is full ({} players)", self.roster.len()));
            }
            None => {}
        }
    }

    fn remove_selected_player(&mut self) {
        let Some(id) = self
            .roster
            .players()
            .get(self.setup.selected_player)
            .map(|p| p.id.clone())
        else {
            return;
        };
        if self.roster.remove_player(&id) {
            info!(player = %id, total = self.roster.len(), "player removed");
            self.setup.move_player_cursor(0, self.roster.len());
            self.setup.clamp_impostors(self.roster.len());
            self.persist_roster();
        }
    }

    fn cycle_selected_color(&mut self, forward: bool) {
        let Some(player) = self.roster.players().get(self.setup.selected_player) else {
            return;
        };
        let color = if forward {
            player.color.next()
        } else {
            previous_color(player.color)
        };
        let id = player.id.clone();
        if self.roster.set_color(&id, color) {
            self.persist_roster();
        }
    }

    fn move_selected_player(&mut self, delta: isize) {
        if self.roster.is_empty() {
            return;
        }
        let from = self.setup.selected_player;
        let to = from
            .saturating_add_signed(delta)
            .min(self.roster.len() - 1);
        if from != to {
            self.roster.move_player(from, to);
            self.setup.selected_player = to;
            self.persist_roster();
        }
    }

    fn toggle_current_category(&mut self) {
        if let Some(OptionRow::Category(id)) = self.setup.current_row(&self.catalog) {
            self.setup.toggle_category(&id);
        }
    }

    fn remove_current_category(&mut self) {
        let Some(OptionRow::Category(id)) = self.setup.current_row(&self.catalog) else {
            return;
        };
        if !self.catalog.remove_custom_category(&id) {
            return;
        }
        info!(category = %id, "custom category removed");
        self.setup.forget_category(&id);
        let rows = self.setup.rows(&self.catalog).len();
        self.setup.move_cursor(0, rows);
        if let Err(e) = self.storage.remove_custom_category(&id) {
            warn!(error = %e, category = %id, "could not delete custom category");
        }
    }

    fn save_draft(&mut self) {
        let Some(draft) = self.setup.draft.take() else {
            return;
        };
        match self
            .catalog
            .add_custom_category(&draft.name, draft.word_list())
            .cloned()
        {
            Ok(category) => {
                info!(category = %category.id, words = category.words.len(), "custom category created");
                self.setup.selected_categories.push(category.id.clone());
                self.setup.error = None;
                if let Err(e) = self.storage.save_custom_category(&category) {
                    warn!(error = %e, category = %category.id, "could not save custom category");
                }
            }
            Err(e) => {
                self.setup.error = Some(e.to_string());
                self.setup.draft = Some(draft);
            }
        }
    }

    fn start_game(&mut self) {
        let setup = self.setup.to_setup();
        match self
            .session
            .start_game(self.roster.players(), &self.catalog, &setup)
        {
            Ok(()) => {
                self.setup.error = None;
                self.screen = Screen::Pass;
            }
            Err(e) => {
                info!(error = %e, "game not started");
                self.setup.error = Some(e.to_string());
            }
        }
    }

    // === In game ===

    fn confirm_pass(&mut self) {
        match self.session.show_role() {
            Ok(()) => self.screen = Screen::Reveal,
            Err(e) => warn!(error = %e, "could not show role"),
        }
    }

    fn finish_reveal(&mut self) {
        match self.session.advance_to_next_player() {
            Ok(GamePhase::Playing) => self.screen = Screen::Discussion,
            Ok(_) => self.screen = Screen::Pass,
            Err(e) => warn!(error = %e, "could not advance reveal"),
        }
    }

    fn start_vote(&mut self) {
        match self.session.begin_voting() {
            Ok(()) => self.screen = Screen::Vote { selected: 0 },
            Err(e) => warn!(error = %e, "could not start voting"),
        }
    }

    fn confirm_vote(&mut self, selected: usize) {
        let target = self.vote_candidates().get(selected).map(|p| p.id.clone());
        if let Some(target) = target {
            if let Err(e) = self.session.cast_vote(MODERATOR, &target) {
                warn!(error = %e, "vote rejected");
                return;
            }
        }

        match self.session.tally_votes() {
            Ok(outcome) => {
                if matches!(outcome, VoteOutcome::Eliminated(_)) {
                    self.bell = true;
                }
                self.screen = Screen::Results {
                    outcome,
                    guess: String::new(),
                    missed_guess: false,
                };
            }
            Err(e) => warn!(error = %e, "could not tally votes"),
        }
    }

    fn results_enter(&mut self) {
        let guess_open = self.session.guess_available();
        if let Screen::Results {
            guess, missed_guess, ..
        } = &mut self.screen
        {
            if guess_open && !guess.trim().is_empty() {
                let attempt = std::mem::take(guess);
                match self.session.impostor_guess(&attempt) {
                    Ok(GuessOutcome::Correct) => {
                        self.bell = true;
                        self.screen = Screen::Final { selected: 0 };
                    }
                    Ok(GuessOutcome::Incorrect) => *missed_guess = true,
                    Err(e) => warn!(error = %e, "guess rejected"),
                }
                return;
            }
        }

        match self.session.next_round() {
            Ok(RoundEnd::NextRound(_)) => self.screen = Screen::Discussion,
            Ok(RoundEnd::GameOver(_)) => self.screen = Screen::Final { selected: 0 },
            Err(e) => warn!(error = %e, "could not finish round"),
        }
    }

    fn final_select(&mut self, selected: usize) {
        match FinalOption::all()[selected] {
            FinalOption::PlayAgain => self.open_setup(SetupTab::Options),
            FinalOption::NewPlayers => {
                self.session.clear_players();
                self.roster.clear();
                self.setup.selected_player = 0;
                self.persist_roster();
                self.open_setup(SetupTab::Players);
            }
            FinalOption::MainMenu => self.go_to_menu(),
        }
    }

    // === Persistence (best-effort) ===

    fn persist_roster(&mut self) {
        if let Err(e) = self.storage.save_roster(self.roster.players()) {
            warn!(error = %e, "could not save roster");
        }
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.storage.save_settings(&self.settings) {
            warn!(error = %e, "could not save settings");
        }
    }
}

fn previous_color(color: PlayerColor) -> PlayerColor {
    let idx = PALETTE.iter().position(|c| *c == color).unwrap_or(0);
    PALETTE[(idx + PALETTE.len() - 1) % PALETTE.len()]
}
