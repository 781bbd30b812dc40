//! UI rendering using ratatui
//!
//! One render function per screen:
//! - Menu: Main menu with options
//! - Settings: Preferences
//! - Setup: Roster and game options (see `setup.rs`)
//! - Pass / Reveal / Discussion / Vote / Results / Final (see `game.rs`)

use super::game::{render_discussion, render_final, render_pass, render_results, render_reveal, render_vote};
use super::setup::render_setup;
use crate::app::settings::Settings;
use crate::app::{AppCoordinator, MenuOption, Screen, SettingsRow};
use crate::game::PlayerColor;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, app: &AppCoordinator) {
    match &app.screen {
        Screen::Menu { selected } => render_menu(frame, *selected, app.roster.len()),
        Screen::Settings { selected } => render_settings(frame, *selected, &app.settings),
        Screen::Setup => render_setup(frame, app),
        Screen::Pass => render_pass(frame, &app.session),
        Screen::Reveal => render_reveal(frame, &app.session),
        Screen::Discussion => render_discussion(frame, &app.session),
        Screen::Vote { selected } => render_vote(frame, app, *selected),
        Screen::Results {
            outcome,
            guess,
            missed_guess,
        } => render_results(frame, &app.session, outcome, guess, *missed_guess),
        Screen::Final { selected } => render_final(frame, &app.session, *selected),
    }
}

/// Render the main menu
fn render_menu(frame: &mut Frame, selected: usize, saved_players: usize) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Logo
            Constraint::Length(2), // Tagline
            Constraint::Length(1), // Spacer
            Constraint::Min(4),    // Menu options
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
 ___ __  __ ____   ___  ____ _____ ___  ____
|_ _|  \/  |  _ \ / _ \/ ___|_   _/ _ \|  _ \
 | || |\/| | |_) | | | \___ \ | || | | | |_) |
 | || |  | |  __/| |_| |___) || || |_| |  _ <
|___|_|  |_|_|    \___/|____/ |_| \___/|_| \_\
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Red).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    let tagline = if saved_players > 0 {
        format!("One device, one secret word. {} players saved.", saved_players)
    } else {
        "One device, one secret word.".to_string()
    };
    let tagline_widget = Paragraph::new(tagline)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(tagline_widget, layout[1]);

    let labels: Vec<&str> = MenuOption::all().iter().map(|o| o.label()).collect();
    frame.render_widget(selection_list(&labels, selected), centered_column(layout[3], 24));

    render_footer(frame, layout[4], "↑↓ Navigate  Enter Select  Esc Quit");
}

/// Render the settings screen
fn render_settings(frame: &mut Frame, selected: usize, settings: &Settings) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Rows
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    render_header(frame, layout[0], "Settings", "");

    let items: Vec<ListItem> = SettingsRow::all()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let value = match row {
                SettingsRow::Sound => on_off(settings.sound_enabled),
                SettingsRow::Music => on_off(settings.music_enabled),
                SettingsRow::Haptics => on_off(settings.haptics_enabled),
                SettingsRow::Volume => volume_bar(settings.volume_percent()),
                SettingsRow::Back => String::new(),
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{:<16}{}", prefix, row.label(), value)).style(row_style(i == selected))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Preferences"));
    frame.render_widget(list, centered_column(layout[1], 44));

    render_footer(
        frame,
        layout[2],
        "↑↓ Navigate  Enter/Space Toggle  ←→ Volume  Esc Back",
    );
}

// === Shared helpers ===

/// Title bar: title on the left, extra info on the right.
pub(super) fn render_header(frame: &mut Frame, area: Rect, title: &str, right: &str) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Logo
            Constraint::Min(0),     // Title
            Constraint::Length(24), // Right side
        ])
        .split(inner);

    let logo = Paragraph::new("IMPOSTOR")
        .style(Style::default().fg(Color::Red).bold())
        .alignment(Alignment::Left);
    frame.render_widget(logo, header_layout[0]);

    let title = Paragraph::new(title.to_string())
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, header_layout[1]);

    let right = Paragraph::new(right.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    frame.render_widget(right, header_layout[2]);
}

/// Key hints at the bottom of a screen.
pub(super) fn render_footer(frame: &mut Frame, area: Rect, hints: &str) {
    let footer = Paragraph::new(hints.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// A vertical list with a `> ` marker on the selected entry.
pub(super) fn selection_list<'a>(labels: &[&str], selected: usize) -> List<'a> {
    let items: Vec<ListItem> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, label)).style(row_style(i == selected))
        })
        .collect();
    List::new(items)
}

pub(super) fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    }
}

/// Terminal color of an avatar.
pub(super) fn player_color(color: PlayerColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

/// A column of at most `width` cells, centered horizontally in `area`.
pub(super) fn centered_column(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn on_off(enabled: bool) -> String {
    if enabled { "On" } else { "Off" }.to_string()
}

fn volume_bar(percent: u8) -> String {
    let filled = (percent as usize + 5) / 10;
    format!("{}{} {:>3}%", "█".repeat(filled), "░".repeat(10 - filled), percent)
}
