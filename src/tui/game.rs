//! In-game screens: pass, reveal, discussion, vote, results and final

use super::ui::{centered_column, player_color, render_footer, render_header, row_style, selection_list};
use crate::app::{AppCoordinator, FinalOption};
use crate::game::engine::{GameSession, RoleCard, VoteOutcome};
use crate::game::Player;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Standard in-game frame: header, body, footer. Returns the body area.
fn game_frame(frame: &mut Frame, session: &GameSession, title: &str, hints: &str) -> Rect {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Body
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(frame.area());

    let round = format!("Round {} of {}", session.current_round(), session.total_rounds());
    render_header(frame, layout[0], title, &round);
    render_footer(frame, layout[2], hints);
    layout[1]
}

fn player_span(player: &Player) -> Span<'static> {
    Span::styled(
        player.name.clone(),
        Style::default().fg(player_color(player.color)).bold(),
    )
}

/// Hand the device to the current player.
pub fn render_pass(frame: &mut Frame, session: &GameSession) {
    let body = game_frame(frame, session, "Pass the device", "Enter I have the device  Esc Menu");

    let Some(player) = session.current_player() else {
        return;
    };
    let text = vec![
        Line::from(""),
        Line::from("Pass the device to").alignment(Alignment::Center),
        Line::from(""),
        Line::from(player_span(player)).alignment(Alignment::Center),
        Line::from(""),
        Line::from(format!(
            "Player {} of {}",
            session.current_player_index() + 1,
            session.players().len()
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray)),
        Line::from(""),
        Line::from(format!("Only {} should look at the screen.", player.name))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
    ];
    frame.render_widget(Paragraph::new(text), body);
}

/// The current player's role card.
pub fn render_reveal(frame: &mut Frame, session: &GameSession) {
    let body = game_frame(frame, session, "Your role", "Enter Hide and pass the device");

    let (Some(player), Some(card)) = (session.current_player(), session.reveal_card()) else {
        return;
    };

    let mut text = vec![
        Line::from(""),
        Line::from(player_span(player)).alignment(Alignment::Center),
        Line::from(""),
    ];
    match card {
        RoleCard::Civilian { category, word } => {
            text.push(Line::from(format!("Category: {}", category)).alignment(Alignment::Center));
            text.push(Line::from(""));
            text.push(Line::from("The secret word is").alignment(Alignment::Center));
            text.push(
                Line::from(Span::styled(
                    word.to_uppercase(),
                    Style::default().fg(Color::Green).bold(),
                ))
                .alignment(Alignment::Center),
            );
        }
        RoleCard::Impostor { category } => {
            text.push(
                Line::from(Span::styled(
                    "You are the IMPOSTOR",
                    Style::default().fg(Color::Red).bold(),
                ))
                .alignment(Alignment::Center),
            );
            text.push(Line::from(""));
            text.push(Line::from(format!("Category: {}", category)).alignment(Alignment::Center));
            text.push(
                Line::from("Blend in. Nobody can know you lack the word.")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Gray)),
            );
        }
    }

    let card = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(card, centered_column(body, 56));
}

/// Discussion round: who speaks first and in which order.
pub fn render_discussion(frame: &mut Frame, session: &GameSession) {
    let body = game_frame(frame, session, "Discussion", "Enter Start the vote  Esc Menu");

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary
            Constraint::Min(3),    // Turn order
        ])
        .split(centered_column(body, 60));

    let mut summary = vec![Line::from(vec![
        Span::styled("Category: ", Style::default().fg(Color::Gray)),
        Span::styled(
            session.current_category_name().to_string(),
            Style::default().fg(Color::Cyan).bold(),
        ),
    ])];
    if let Some(first) = session.starting_player() {
        summary.push(Line::from(vec![
            player_span(first),
            Span::raw(" starts. Each player says one word about the secret."),
        ]));
    }
    summary.push(
        Line::from(format!(
            "{} impostor(s) and {} civilian(s) still in the game",
            session.remaining_impostors(),
            session.remaining_civilians()
        ))
        .style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(Paragraph::new(summary).wrap(Wrap { trim: true }), layout[0]);

    let items: Vec<ListItem> = session
        .turn_order()
        .into_iter()
        .enumerate()
        .map(|(i, player)| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:>2}. ", i + 1)),
                Span::styled("● ", Style::default().fg(player_color(player.color))),
                Span::raw(player.name.clone()),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(" Turn order ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    frame.render_widget(list, layout[1]);
}

/// Pick the player the group voted out. The last row skips the vote.
pub fn render_vote(frame: &mut Frame, app: &AppCoordinator, selected: usize) {
    let body = game_frame(frame, &app.session, "Vote", "↑↓ Choose  Enter Confirm  Esc Menu");

    let candidates = app.vote_candidates();
    let mut items: Vec<ListItem> = candidates
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let is_selected = i == selected;
            let prefix = if is_selected { "> " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, row_style(is_selected)),
                Span::styled("● ", Style::default().fg(player_color(player.color))),
                Span::styled(player.name.clone(), row_style(is_selected)),
            ]))
        })
        .collect();
    let skip_selected = selected >= candidates.len();
    let prefix = if skip_selected { "> " } else { "  " };
    items.push(
        ListItem::new(format!("{}Skip vote (nobody is eliminated)", prefix))
            .style(row_style(skip_selected)),
    );

    let list = List::new(items).block(
        Block::default()
            .title(" Who is the impostor? ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(list, centered_column(body, 50));
}

/// Outcome of the vote, the last-chance guess and the running scores.
pub fn render_results(
    frame: &mut Frame,
    session: &GameSession,
    outcome: &VoteOutcome,
    guess: &str,
    missed_guess: bool,
) {
    let guess_open = session.guess_available();
    let hints = if guess_open {
        "Type the word  Enter Guess (empty to skip)  Esc Menu"
    } else {
        "Enter Continue  Esc Menu"
    };
    let body = game_frame(frame, session, "Results", hints);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Outcome
            Constraint::Length(3), // Guess
            Constraint::Min(3),    // Scores
        ])
        .split(centered_column(body, 60));

    let mut text = Vec::new();
    match outcome {
        VoteOutcome::Eliminated(id) => match session.player(id) {
            Some(player) => {
                text.push(Line::from(vec![player_span(player), Span::raw(" was eliminated.")]));
                let (role, color) = if player.is_impostor {
                    ("They were an IMPOSTOR!", Color::Green)
                } else {
                    ("They were a civilian.", Color::Red)
                };
                text.push(Line::from(Span::styled(role, Style::default().fg(color).bold())));
            }
            None => text.push(Line::from("A player was eliminated.")),
        },
        VoteOutcome::Tie => {
            text.push(Line::from("No one was eliminated this round."));
        }
    }
    if missed_guess {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "Wrong guess! The word stays secret.",
            Style::default().fg(Color::Yellow),
        )));
    }
    frame.render_widget(Paragraph::new(text), layout[0]);

    if guess_open {
        let input = Paragraph::new(format!("> {}_", guess)).block(
            Block::default()
                .title(" Impostors, guess the word ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        frame.render_widget(input, layout[1]);
    }

    frame.render_widget(score_list(session, " Scores "), layout[2]);
}

/// Game over: winner, the word, final standings and what to do next.
pub fn render_final(frame: &mut Frame, session: &GameSession, selected: usize) {
    let body = game_frame(frame, session, "Game over", "↑↓ Navigate  Enter Select  Esc Menu");

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Winner and word
            Constraint::Min(4),    // Scoreboard
            Constraint::Length(4), // Options
        ])
        .split(centered_column(body, 60));

    let winner = session.final_winner();
    let impostors: Vec<&str> = session
        .players()
        .iter()
        .filter(|p| p.is_impostor)
        .map(|p| p.name.as_str())
        .collect();

    let text = vec![
        Line::from(Span::styled(
            winner.label(),
            Style::default().fg(Color::Yellow).bold(),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(format!(
            "The word was {} ({})",
            session.current_word().to_uppercase(),
            session.current_category_name()
        ))
        .alignment(Alignment::Center),
        Line::from(format!("Impostors: {}", impostors.join(", ")))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red)),
    ];
    frame.render_widget(Paragraph::new(text), layout[0]);

    frame.render_widget(score_list(session, " Final scores "), layout[1]);

    let labels: Vec<&str> = FinalOption::all().iter().map(|o| o.label()).collect();
    frame.render_widget(selection_list(&labels, selected), centered_column(layout[2], 24));
}

fn score_list<'a>(session: &GameSession, title: &'a str) -> List<'a> {
    let items: Vec<ListItem> = session
        .scoreboard()
        .into_iter()
        .map(|player| {
            let status = if player.is_eliminated { " (out)" } else { "" };
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(player_color(player.color))),
                Span::raw(format!("{:<22}{:>5}{}", player.name, player.score, status)),
            ]))
        })
        .collect();
    List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    )
}
