//! Setup form: roster entry and game options
//!
//! The form lives across games so "play again" comes back with the same
//! choices. It never touches the roster or the catalog itself; the
//! coordinator applies its edits.

use crate::game::catalog::{parse_word_list, Catalog};
use crate::game::engine::GameSetup;
use crate::game::{max_impostors, DEFAULT_ROUNDS, MIN_CUSTOM_WORDS, ROUND_OPTIONS};

/// Category selected when the form is first opened.
const DEFAULT_CATEGORY: &str = "animales";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupTab {
    Players,
    Options,
}

/// One selectable row of the options tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionRow {
    Impostors,
    Rounds,
    Category(String),
    NewCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Words,
}

/// A custom category being typed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    /// Comma separated
    pub words: String,
    pub field: DraftField,
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            words: String::new(),
            field: DraftField::Name,
        }
    }
}

impl CategoryDraft {
    /// The text field that has focus.
    pub fn input_mut(&mut self) -> &mut String {
        match self.field {
            DraftField::Name => &mut self.name,
            DraftField::Words => &mut self.words,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            DraftField::Name => DraftField::Words,
            DraftField::Words => DraftField::Name,
        };
    }

    pub fn word_list(&self) -> Vec<String> {
        parse_word_list(&self.words)
    }

    /// Enough to try saving; the catalog has the final say.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.word_list().len() >= MIN_CUSTOM_WORDS
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupForm {
    pub tab: SetupTab,
    pub name_input: String,
    /// Highlighted roster entry
    pub selected_player: usize,
    /// Highlighted options row
    pub cursor: usize,
    pub selected_categories: Vec<String>,
    pub impostor_count: usize,
    pub total_rounds: u32,
    pub draft: Option<CategoryDraft>,
    /// Last validation message, cleared on the next edit
    pub error: Option<String>,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            tab: SetupTab::Players,
            name_input: String::new(),
            selected_player: 0,
            cursor: 0,
            selected_categories: vec![DEFAULT_CATEGORY.to_string()],
            impostor_count: 1,
            total_rounds: DEFAULT_ROUNDS,
            draft: None,
            error: None,
        }
    }
}

impl SetupForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of the options tab, in display order.
    pub fn rows(&self, catalog: &Catalog) -> Vec<OptionRow> {
        let mut rows = vec![OptionRow::Impostors, OptionRow::Rounds];
        rows.extend(catalog.categories().map(|c| OptionRow::Category(c.id.clone())));
        rows.push(OptionRow::NewCategory);
        rows
    }

    pub fn current_row(&self, catalog: &Catalog) -> Option<OptionRow> {
        self.rows(catalog).into_iter().nth(self.cursor)
    }

    /// Move the options cursor, staying within `row_count`.
    pub fn move_cursor(&mut self, delta: isize, row_count: usize) {
        self.cursor = step(self.cursor, delta, row_count);
    }

    /// Move the roster highlight, staying within `player_count`.
    pub fn move_player_cursor(&mut self, delta: isize, player_count: usize) {
        self.selected_player = step(self.selected_player, delta, player_count);
    }

    pub fn is_selected(&self, category_id: &str) -> bool {
        self.selected_categories.iter().any(|id| id == category_id)
    }

    pub fn toggle_category(&mut self, category_id: &str) {
        if self.is_selected(category_id) {
            self.forget_category(category_id);
        } else {
            self.selected_categories.push(category_id.to_string());
        }
        self.error = None;
    }

    /// Drop a category from the selection (e.g. after it was deleted).
    pub fn forget_category(&mut self, category_id: &str) {
        self.selected_categories.retain(|id| id != category_id);
    }

    pub fn increase_impostors(&mut self, player_count: usize) {
        self.impostor_count += 1;
        self.clamp_impostors(player_count);
    }

    pub fn decrease_impostors(&mut self, player_count: usize) {
        self.impostor_count = self.impostor_count.saturating_sub(1);
        self.clamp_impostors(player_count);
    }

    /// Keep the impostor count legal for the current roster size.
    pub fn clamp_impostors(&mut self, player_count: usize) {
        self.impostor_count = self.impostor_count.clamp(1, max_impostors(player_count));
    }

    /// Step through the offered round counts, wrapping around.
    pub fn cycle_rounds(&mut self, forward: bool) {
        let idx = ROUND_OPTIONS
            .iter()
            .position(|&r| r == self.total_rounds)
            .unwrap_or(0);
        let len = ROUND_OPTIONS.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.total_rounds = ROUND_OPTIONS[next];
    }

    pub fn to_setup(&self) -> GameSetup {
        GameSetup {
            categories: self.selected_categories.clone(),
            impostor_count: self.impostor_count,
            total_rounds: self.total_rounds,
        }
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
