//! Setup screen rendering
//!
//! Layout:
//! ┌─────────────────────────────────────────────────┐
//! │  IMPOSTOR            New game          4 / 30   │
//! ├─────────────────────────────────────────────────┤
//! │   Players   Options                             │
//! │  ╔═══════════════════════════════════════════╗  │
//! │  ║  > Ana_                                   ║  │
//! │  ╚═══════════════════════════════════════════╝  │
//! │  ╔═══════════════════════════════════════════╗  │
//! │  ║  > ● Ana                                  ║  │
//! │  ║    ● Beto                                 ║  │
//! │  ╚═══════════════════════════════════════════╝  │
//! │                                                 │
//! │  Enter Add  Del Remove  ←→ Color  Tab Options   │
//! └─────────────────────────────────────────────────┘

use super::ui::{centered_column, player_color, render_footer, render_header, row_style};
use crate::app::setup::{CategoryDraft, DraftField, OptionRow, SetupForm, SetupTab};
use crate::app::AppCoordinator;
use crate::game::catalog::Catalog;
use crate::game::roster::Roster;
use crate::game::{max_impostors, MAX_PLAYERS, MIN_CUSTOM_WORDS, MIN_PLAYERS};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
};

/// Render the setup screen: roster tab or options tab, plus the
/// custom category popup when it is open.
pub fn render_setup(frame: &mut Frame, app: &AppCoordinator) {
    let area = frame.area();
    let form = &app.setup;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Tabs
            Constraint::Min(6),    // Content
            Constraint::Length(1), // Error
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let count = format!("{} / {}", app.roster.len(), MAX_PLAYERS);
    render_header(frame, layout[0], "New game", &count);

    let selected_tab = match form.tab {
        SetupTab::Players => 0,
        SetupTab::Options => 1,
    };
    let tabs = Tabs::new(vec![" Players ", " Options "])
        .select(selected_tab)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold());
    frame.render_widget(tabs, layout[1]);

    match form.tab {
        SetupTab::Players => render_players_tab(frame, layout[2], form, &app.roster),
        SetupTab::Options => {
            render_options_tab(frame, layout[2], form, &app.catalog, app.roster.len())
        }
    }

    if let Some(error) = &form.error {
        let line = Paragraph::new(format!("! {}", error))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(line, layout[3]);
    }

    let hints = match (form.tab, form.draft.is_some()) {
        (_, true) => "Tab Switch field  Enter Save  Esc Cancel",
        (SetupTab::Players, false) => {
            "Enter Add  Del Remove  ←→ Color  PgUp/PgDn Move  Tab Options  Esc Menu"
        }
        (SetupTab::Options, false) => {
            "↑↓ Navigate  ←→ Change  Space Toggle  Del Delete  S Start  Tab Players  Esc Menu"
        }
    };
    render_footer(frame, layout[4], hints);

    if let Some(draft) = &form.draft {
        render_draft_popup(frame, area, draft);
    }
}

fn render_players_tab(frame: &mut Frame, area: Rect, form: &SetupForm, roster: &Roster) {
    let column = centered_column(area, 60);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name input
            Constraint::Min(3),    // Roster
        ])
        .split(column);

    let input = Paragraph::new(format!("> {}_", form.name_input))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .title(" Add player ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_widget(input, layout[0]);

    let items: Vec<ListItem> = roster
        .players()
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let selected = i == form.selected_player;
            let prefix = if selected { "> " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, row_style(selected)),
                Span::styled("● ", Style::default().fg(player_color(player.color))),
                Span::styled(player.name.clone(), row_style(selected)),
            ]))
        })
        .collect();

    let mut title = format!(" Players ({}/{}) ", roster.len(), MAX_PLAYERS);
    if roster.len() < MIN_PLAYERS {
        title.push_str(&format!("need at least {} ", MIN_PLAYERS));
    }
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    let mut state = ListState::default().with_selected(Some(form.selected_player));
    frame.render_stateful_widget(list, layout[1], &mut state);
}

fn render_options_tab(
    frame: &mut Frame,
    area: Rect,
    form: &SetupForm,
    catalog: &Catalog,
    player_count: usize,
) {
    let items: Vec<ListItem> = form
        .rows(catalog)
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = i == form.cursor;
            let prefix = if selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, option_label(row, form, catalog, player_count)))
                .style(row_style(selected))
        })
        .collect();

    let selected = form.selected_categories.len();
    let list = List::new(items).block(
        Block::default()
            .title(format!(" Game options ({} categories selected) ", selected))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    let mut state = ListState::default().with_selected(Some(form.cursor));
    frame.render_stateful_widget(list, centered_column(area, 60), &mut state);
}

fn option_label(row: &OptionRow, form: &SetupForm, catalog: &Catalog, player_count: usize) -> String {
    match row {
        OptionRow::Impostors => format!(
            "Impostors       < {} >  (max {})",
            form.impostor_count,
            max_impostors(player_count)
        ),
        OptionRow::Rounds => format!("Rounds          < {} >", form.total_rounds),
        OptionRow::Category(id) => {
            let mark = if form.is_selected(id) { "[x]" } else { "[ ]" };
            match catalog.lookup_category(id) {
                Some(category) => {
                    let custom = if category.is_custom() { " *" } else { "" };
                    format!("{} {}{} ({} words)", mark, category.name, custom, category.words.len())
                }
                None => format!("{} {}", mark, id),
            }
        }
        OptionRow::NewCategory => "+ New custom category".to_string(),
    }
}

fn render_draft_popup(frame: &mut Frame, area: Rect, draft: &CategoryDraft) {
    let width = 60.min(area.width);
    let height = 8.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let field_style = |field: DraftField| {
        if draft.field == field {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::Gray)
        }
    };
    let cursor = |field: DraftField| if draft.field == field { "_" } else { "" };

    let words = draft.word_list().len();
    let count_style = if draft.is_complete() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = vec![
        Line::from(vec![
            Span::styled("  Name:  ", field_style(DraftField::Name)),
            Span::raw(format!("{}{}", draft.name, cursor(DraftField::Name))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Words: ", field_style(DraftField::Words)),
            Span::raw(format!("{}{}", draft.words, cursor(DraftField::Words))),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} words, at least {} (comma separated)", words, MIN_CUSTOM_WORDS),
            count_style,
        )),
    ];

    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(" New category ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use crate::app::AppCoordinator;
    use crate::game::engine::GameSession;
    use crate::storage::Storage;
    use crate::tui::render_to_string as draw;

    fn app_in_setup(names: &[&str]) -> AppCoordinator {
        let mut app =
            AppCoordinator::new(Storage::open_in_memory().unwrap(), GameSession::with_seed(3));
        app.on_enter();
        for name in names {
            for c in name.chars() {
                app.on_char(c);
            }
            app.on_enter();
        }
        app
    }

    #[test]
    fn test_players_tab_lists_roster() {
        let mut app = app_in_setup(&["Ana", "Beto"]);
        app.on_char('C');
        let text = draw(&app);
        assert!(text.contains("> C_"));
        assert!(text.contains("● Ana"));
        assert!(text.contains("● Beto"));
        assert!(text.contains("Players (2/30)"));
        assert!(text.contains("need at least 4"));
    }

    #[test]
    fn test_options_tab_rows() {
        let mut app = app_in_setup(&["Ana", "Beto", "Carla", "Dani"]);
        app.on_tab();
        let text = draw(&app);
        assert!(text.contains("Impostors       < 1 >  (max 1)"));
        assert!(text.contains("Rounds          < 3 >"));
        assert!(text.contains("[x] Animales"));
        assert!(text.contains("1 categories selected"));
    }

    #[test]
    fn test_draft_popup_and_error() {
        let mut app = app_in_setup(&["Ana", "Beto", "Carla", "Dani"]);
        app.on_tab();
        for _ in 0..40 {
            app.on_down();
        }
        app.on_enter();
        for c in "Colores".chars() {
            app.on_char(c);
        }
        let text = draw(&app);
        assert!(text.contains("New category"));
        assert!(text.contains("Colores_"));
        assert!(text.contains("0 words, at least 5"));

        app.on_enter();
        let text = draw(&app);
        assert!(text.contains("need at least 5 words, got 0"));
    }
}
