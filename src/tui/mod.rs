//! Terminal UI components using ratatui

mod game;
mod setup;
mod terminal;
mod ui;

pub use terminal::Tui;
pub use ui::render;

/// Render the current screen into an off-screen buffer and return its text,
/// one line per terminal row.
#[cfg(test)]
pub(crate) fn render_to_string(app: &crate::app::AppCoordinator) -> String {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal.draw(|frame| render(frame, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
