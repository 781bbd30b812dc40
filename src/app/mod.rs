//! Application state and screen flow

pub mod screen;
pub mod settings;
pub mod setup;

pub use screen::{AppCoordinator, FinalOption, MenuOption, Screen, SettingsRow};
