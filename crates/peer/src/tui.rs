use std::collections::VecDeque;

use linkfire::net::NetworkStats;
use linkfire::render::{brightness, wall_height};
use linkfire::{FrameOutput, Hud, RoundPhase};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::events::LogLevel;

const MAX_LOG_LINES: usize = 200;

pub struct TuiState {
    log: VecDeque<(LogLevel, String)>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            log: VecDeque::new(),
        }
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.log.len() == MAX_LOG_LINES {
            self.log.pop_front();
        }
        self.log.push_back((level, message.into()));
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }
}

/// Everything one screen needs besides the log.
pub struct View<'a> {
    pub player_id: &'a str,
    pub tick: u64,
    pub round: usize,
    pub output: &'a FrameOutput,
    pub stats: NetworkStats,
}

pub fn render(frame: &mut Frame, state: &TuiState, view: &View) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(34)])
        .split(rows[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(34)])
        .split(rows[2]);

    render_header(frame, rows[0], view);
    render_view(frame, middle[0], &view.output.distances, &view.output.hud);
    render_hud(frame, middle[1], &view.output.hud);
    render_log(frame, bottom[0], state);
    render_network(frame, bottom[1], &view.stats);
    render_help(frame, rows[3]);
}

fn render_header(frame: &mut Frame, area: Rect, view: &View) {
    let hud = &view.output.hud;
    let block = Block::default()
        .title(format!(" linkfire - {} ", view.player_id))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = format!(
        "Tick: {}  |  Round: {}  |  Players: {}  |  {}",
        view.tick,
        view.round,
        hud.remote_players + 1,
        hud.connection_status
    );

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn render_view(frame: &mut Frame, area: Rect, distances: &[f32], hud: &Hud) {
    let border = if hud.muzzle_flash {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title(" View ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    let lines = raycast_lines(distances, inner.width as usize, inner.height as usize);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(paragraph, area);
}

fn shade(distance: f32) -> char {
    match brightness(distance) {
        200.. => '█',
        140..=199 => '▓',
        80..=139 => '▒',
        _ => '░',
    }
}

/// Turns ray distances into rows of glyphs: one column per ray (resampled to
/// the view width), wall slices centered vertically, floor below.
pub fn raycast_lines(distances: &[f32], width: usize, height: usize) -> Vec<Line<'static>> {
    if distances.is_empty() || width == 0 || height == 0 {
        return Vec::new();
    }

    let mut grid = vec![vec![' '; width]; height];
    for x in 0..width {
        let distance = distances[x * distances.len() / width];
        let slice = (wall_height(distance, height as f32).round() as usize).min(height);
        let top = (height - slice) / 2;
        let glyph = shade(distance);

        for (y, row) in grid.iter_mut().enumerate() {
            row[x] = if y < top {
                ' '
            } else if y < top + slice {
                glyph
            } else {
                '.'
            };
        }
    }

    if let Some(row) = grid.get_mut(height / 2) {
        row[width / 2] = '+';
    }

    grid.into_iter()
        .map(|row| Line::from(row.into_iter().collect::<String>()))
        .collect()
}

fn render_hud(frame: &mut Frame, area: Rect, hud: &Hud) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let health = Gauge::default()
        .block(Block::default().title(" Health ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(if hud.health > 30 {
            Color::Green
        } else {
            Color::Red
        }))
        .ratio(f64::from(hud.health_ratio).clamp(0.0, 1.0))
        .label(format!("{}/{}", hud.health, hud.max_health));
    frame.render_widget(health, rows[0]);

    let armor = Gauge::default()
        .block(Block::default().title(" Armor ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(f64::from(hud.armor_ratio).clamp(0.0, 1.0))
        .label(format!("{}/{}", hud.armor, hud.max_armor));
    frame.render_widget(armor, rows[1]);

    let phase_style = match hud.phase {
        RoundPhase::Playing => Style::default().fg(Color::Green),
        RoundPhase::Paused => Style::default().fg(Color::Yellow),
        RoundPhase::GameOver => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Weapon: ", Style::default().fg(Color::Gray)),
            Span::styled(hud.weapon.to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Ammo: ", Style::default().fg(Color::Gray)),
            Span::styled(
                hud.ammo_label(),
                Style::default().fg(if hud.magazine == 0 {
                    Color::Red
                } else if hud.ammo_ratio < 0.25 {
                    Color::Yellow
                } else {
                    Color::White
                }),
            ),
        ]),
        Line::from(vec![
            Span::styled("Time: ", Style::default().fg(Color::Gray)),
            Span::styled(hud.elapsed_label(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Phase: ", Style::default().fg(Color::Gray)),
            Span::styled(hud.phase.label(), phase_style),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Status ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(paragraph, rows[2]);
}

fn render_log(frame: &mut Frame, area: Rect, state: &TuiState) {
    let block = Block::default()
        .title(" Events ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .log
        .iter()
        .skip(state.log.len().saturating_sub(visible))
        .map(|(level, message)| {
            let color = match level {
                LogLevel::Info => Color::White,
                LogLevel::Warn => Color::Yellow,
                LogLevel::Error => Color::Red,
            };
            Line::from(Span::styled(message.as_str(), Style::default().fg(color)))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_network(frame: &mut Frame, area: Rect, stats: &NetworkStats) {
    let block = Block::default()
        .title(" Network ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let lines = vec![
        Line::from(vec![
            Span::styled("Messages: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} sent / {} recv", stats.messages_sent, stats.messages_received),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Bytes: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "{} sent / {} recv",
                    format_bytes(stats.bytes_sent),
                    format_bytes(stats.bytes_received)
                ),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Dropped: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "{} malformed / {} failed sends",
                    stats.malformed_dropped, stats.send_failures
                ),
                Style::default().fg(if stats.malformed_dropped > 0 {
                    Color::Red
                } else {
                    Color::White
                }),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let text = Paragraph::new(
        "WASD move  space jump  ←/→ turn  f fire  r reload  1/2/3 weapon  p pause  n new round  q quit",
    )
    .style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    );

    frame.render_widget(text, area);
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(lines: &[Line], y: usize) -> String {
        lines[y].spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn near_walls_fill_the_column() {
        let lines = raycast_lines(&[0.2; 10], 10, 8);
        assert_eq!(lines.len(), 8);
        assert_eq!(row(&lines, 0), "██████████");
        assert_eq!(row(&lines, 7), "██████████");
    }

    #[test]
    fn far_walls_leave_ceiling_and_floor() {
        let lines = raycast_lines(&[19.0; 4], 4, 20);
        assert_eq!(row(&lines, 0), "    ");
        assert_eq!(row(&lines, 19), "....");
        assert!(row(&lines, 9).contains('░') || row(&lines, 10).contains('░'));
    }

    #[test]
    fn rays_are_resampled_to_view_width() {
        let lines = raycast_lines(&[0.2, 19.0], 4, 20);
        let top = row(&lines, 0);
        assert_eq!(&top[..6], "██");
        assert!(top.ends_with("  "));
        assert!(raycast_lines(&[], 4, 4).is_empty());
    }

    #[test]
    fn log_is_bounded() {
        let mut state = TuiState::new();
        for i in 0..(MAX_LOG_LINES + 5) {
            state.log_info(format!("line {i}"));
        }
        assert_eq!(state.log.len(), MAX_LOG_LINES);
        assert_eq!(state.log.front().map(|(_, m)| m.as_str()), Some("line 5"));
    }
}
