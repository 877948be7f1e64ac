//! Terminal rendering.
//!
//! One draw call per frame, dispatched on the active game mode. The UI
//! reads engine state through snapshots and never mutates it.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::combat::session::{BattleSnapshot, Turn};
use crate::mode::GameMode;
use crate::player::Player;

/// Top-level draw: header, mode content, footer with key hints.
pub fn draw(
    frame: &mut Frame,
    mode: GameMode,
    player: &Player,
    battle: Option<&BattleSnapshot>,
    log: &[String],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header: player status
            Constraint::Min(0),    // Mode content
            Constraint::Length(3), // Footer: key hints
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], player);

    match mode {
        GameMode::Field => draw_field(frame, chunks[1], log),
        GameMode::Battle => {
            if let Some(snapshot) = battle {
                draw_battle(frame, chunks[1], snapshot, log);
            }
        }
        GameMode::Menu => {
            draw_field(frame, chunks[1], log);
            draw_menu_overlay(frame, chunks[1], player);
        }
        GameMode::Dialog => {
            draw_field(frame, chunks[1], log);
            draw_dialog_overlay(frame, chunks[1]);
        }
    }

    draw_footer(frame, chunks[2], mode);
}

fn draw_header(frame: &mut Frame, area: Rect, player: &Player) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", player.name),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "Lv {}  HP {}/{}  ATK {}  DEF {}  ",
            player.level, player.hp, player.max_hp, player.attack, player.defense
        )),
        Span::styled(format!("{} G", player.gold), Style::default().fg(Color::Yellow)),
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_field(frame: &mut Frame, area: Rect, log: &[String]) {
    let lines: Vec<Line> = log.iter().map(|entry| Line::from(entry.as_str())).collect();
    let field = Paragraph::new(lines).block(
        Block::default()
            .title(" Field ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(field, area);
}

fn draw_battle(frame: &mut Frame, area: Rect, snapshot: &BattleSnapshot, log: &[String]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Opponent gauge
            Constraint::Length(3), // Player gauge
            Constraint::Min(0),    // Battle log
        ])
        .split(area);

    draw_hp_gauge(
        frame,
        chunks[0],
        &snapshot.opponent_name,
        snapshot.opponent_hp,
        snapshot.opponent_max_hp,
        Color::Red,
    );
    draw_hp_gauge(
        frame,
        chunks[1],
        &snapshot.player_name,
        snapshot.player_hp,
        snapshot.player_max_hp,
        Color::Cyan,
    );

    let turn_hint = match snapshot.current_turn {
        Turn::Player if !snapshot.is_over => " Battle — your turn ",
        Turn::Opponent if !snapshot.is_over => " Battle ",
        _ => " Battle — over ",
    };
    let lines: Vec<Line> = log.iter().map(|entry| Line::from(entry.as_str())).collect();
    let log_widget = Paragraph::new(lines).block(
        Block::default()
            .title(turn_hint)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(log_widget, chunks[2]);
}

fn draw_hp_gauge(frame: &mut Frame, area: Rect, name: &str, hp: u32, max_hp: u32, color: Color) {
    let ratio = if max_hp == 0 {
        0.0
    } else {
        f64::from(hp) / f64::from(max_hp)
    };

    let gauge = Gauge::default()
        .block(Block::default().title(format!(" {} ", name)).borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(format!("{}/{}", hp, max_hp));
    frame.render_widget(gauge, area);
}

fn draw_menu_overlay(frame: &mut Frame, area: Rect, player: &Player) {
    let popup = centered_rect(40, 10, area);
    frame.render_widget(Clear, popup);

    let to_next = player.experience_to_next_level();
    let lines = vec![
        Line::from(format!("Level: {}", player.level)),
        Line::from(format!("HP: {}/{}", player.hp, player.max_hp)),
        Line::from(format!("Attack: {}", player.attack)),
        Line::from(format!("Defense: {}", player.defense)),
        Line::from(format!("Experience: {}", player.experience)),
        Line::from(format!("To next level: {}", to_next)),
        Line::from(format!("Gold: {}", player.gold)),
    ];
    let menu = Paragraph::new(lines).block(
        Block::default()
            .title(" Status ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(menu, popup);
}

fn draw_dialog_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 6, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("\"The Dragon King holds the princess captive."),
        Line::from(" Only a hero of great strength may face him.\""),
    ];
    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Villager ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(dialog, popup);
}

fn draw_footer(frame: &mut Frame, area: Rect, mode: GameMode) {
    let hints = match mode {
        GameMode::Field => "[s/arrows] step  [b] challenge boss  [m] menu  [t] talk  [q] quit",
        GameMode::Battle => "[a] attack  [f] flee",
        GameMode::Menu => "[esc/m] close  [q] quit",
        GameMode::Dialog => "[esc/enter] close  [q] quit",
    };

    let footer = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Centers a fixed-size popup inside `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
