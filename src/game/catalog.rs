//! Word catalog: built-in and user-defined categories
//!
//! Built-in categories are embedded at build time from `data/categories.txt`.
//! Custom categories live next to them under the `custom_` id namespace.

use super::MIN_CUSTOM_WORDS;
use once_cell::sync::Lazy;
use rand::Rng;
use thiserror::Error;

/// Prefix distinguishing user-defined category ids from built-in ones.
pub const CUSTOM_PREFIX: &str = "custom_";

/// Embedded catalog. `@id|Name` opens a category, every other line is a word.
static CATALOG_DATA: &str = include_str!("../../data/categories.txt");

static BUILT_IN: Lazy<Vec<Category>> = Lazy::new(|| parse_catalog(CATALOG_DATA));

/// A named list of candidate secret words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub words: Vec<String>,
}

impl Category {
    /// Whether this category was created by the players.
    pub fn is_custom(&self) -> bool {
        self.id.starts_with(CUSTOM_PREFIX)
    }
}

/// Why a custom category was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("category name is empty")]
    EmptyName,
    #[error("need at least {min} words, got {found}")]
    TooFewWords { found: usize, min: usize },
    #[error("a category named {0:?} already exists")]
    AlreadyExists(String),
}

/// The categories available to a game: the built-ins plus the custom ones.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    custom: Vec<Category>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog preloaded with previously saved custom categories.
    pub fn with_custom(custom: Vec<Category>) -> Self {
        Self { custom }
    }

    /// Built-in categories in catalog order.
    pub fn built_in() -> &'static [Category] {
        &BUILT_IN
    }

    /// User-defined categories in creation order.
    pub fn custom(&self) -> &[Category] {
        &self.custom
    }

    /// All categories: built-ins first, then custom ones.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        BUILT_IN.iter().chain(self.custom.iter())
    }

    /// Look up a category by id. Custom ids are resolved in the custom list only.
    pub fn lookup_category(&self, id: &str) -> Option<&Category> {
        if id.starts_with(CUSTOM_PREFIX) {
            self.custom.iter().find(|c| c.id == id)
        } else {
            BUILT_IN.iter().find(|c| c.id == id)
        }
    }

    /// Pick a word uniformly from a category.
    ///
    /// Returns `None` for an unknown id or an empty word list.
    pub fn pick_random_word<R: Rng>(&self, id: &str, rng: &mut R) -> Option<String> {
        let category = self.lookup_category(id)?;
        if category.words.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..category.words.len());
        Some(category.words[idx].clone())
    }

    /// Create a custom category from a display name and its words.
    pub fn add_custom_category(
        &mut self,
        name: &str,
        words: Vec<String>,
    ) -> Result<&Category, CategoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }

        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        if words.len() < MIN_CUSTOM_WORDS {
            return Err(CategoryError::TooFewWords {
                found: words.len(),
                min: MIN_CUSTOM_WORDS,
            });
        }

        let id = custom_category_id(name);
        if self.custom.iter().any(|c| c.id == id) {
            return Err(CategoryError::AlreadyExists(name.to_string()));
        }

        self.custom.push(Category {
            id,
            name: name.to_string(),
            words,
        });
        Ok(&self.custom[self.custom.len() - 1])
    }

    /// Remove a custom category. Returns whether anything was removed.
    pub fn remove_custom_category(&mut self, id: &str) -> bool {
        let before = self.custom.len();
        self.custom.retain(|c| c.id != id);
        self.custom.len() != before
    }
}

/// Derive the id of a custom category from its display name.
pub fn custom_category_id(name: &str) -> String {
    let slug = name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}{}", CUSTOM_PREFIX, slug)
}

/// Split user input into words: comma or newline separated, trimmed, no blanks.
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_catalog(data: &str) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();

    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('@') {
            let (id, name) = header.split_once('|').unwrap_or((header, header));
            categories.push(Category {
                id: id.trim().to_string(),
                name: name.trim().to_string(),
                words: Vec::new(),
            });
        } else if let Some(current) = categories.last_mut() {
            current.words.push(line.to_string());
        }
    }

    categories
}
