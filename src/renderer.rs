use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entities::SwarmState;
use crate::game::GameState;
use crate::sprite::{ExplosionColor, ImageKey, RenderItem, Visual};

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub items: &'a [RenderItem],
    pub score: u32,
    pub lives: u8,
    pub circuit_name: &'static str,
    pub swarm_state: SwarmState,
    pub between_rounds: bool,
    pub area: Rect,
    pub fps: u32,
    pub elapsed_time_secs: u64,
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer {}

/// Map a world position onto a terminal cell inside `area`.
/// Returns `None` for positions that fall outside the world.
pub fn world_to_cell(x: i32, y: i32, area: Rect) -> Option<(u16, u16)> {
    if !(0..SCREEN_WIDTH).contains(&x) || !(0..SCREEN_HEIGHT).contains(&y) {
        return None;
    }
    let col = x as i64 * area.width as i64 / SCREEN_WIDTH as i64;
    let row = y as i64 * area.height as i64 / SCREEN_HEIGHT as i64;
    Some((area.x + col as u16, area.y + row as u16))
}

fn glyph(key: ImageKey) -> &'static str {
    match key {
        ImageKey::Ship => "/^\\",
        ImageKey::Mystery => "<=O=>",
        ImageKey::Enemy { row: 0, frame } => ["{@}", "}@{"][frame % 2],
        ImageKey::Enemy { row: 1..=2, frame } => ["/M\\", "\\M/"][frame % 2],
        ImageKey::Enemy { frame, .. } => ["<W>", ">W<"][frame % 2],
        ImageKey::Explosion { large: false, .. } => "*",
        ImageKey::Explosion { large: true, .. } => "\\*/",
        ImageKey::Laser => "|",
        ImageKey::EnemyLaser => "!",
        ImageKey::Blocker => "#",
        ImageKey::Life => "♥",
    }
}

fn color(key: ImageKey) -> Color {
    match key {
        ImageKey::Ship | ImageKey::Blocker => Color::Green,
        ImageKey::Mystery | ImageKey::Life => Color::Red,
        ImageKey::Enemy { row: 0, .. } => Color::Magenta,
        ImageKey::Enemy { row: 1..=2, .. } => Color::Cyan,
        ImageKey::Enemy { .. } => Color::LightGreen,
        ImageKey::Explosion { color, .. } => match color {
            ExplosionColor::Purple => Color::Magenta,
            ExplosionColor::Blue => Color::Cyan,
            ExplosionColor::Green => Color::LightGreen,
        },
        ImageKey::Laser => Color::Yellow,
        ImageKey::EnemyLaser => Color::White,
    }
}

/// Terminals have no alpha channel, so opacity becomes emphasis.
/// Fully transparent items are not drawn at all.
pub fn opacity_style(base: Style, opacity: f32) -> Option<Style> {
    if opacity <= 0.0 {
        None
    } else if opacity >= 0.75 {
        Some(base.add_modifier(Modifier::BOLD))
    } else if opacity >= 0.5 {
        Some(base)
    } else {
        Some(base.add_modifier(Modifier::DIM))
    }
}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        match view.game_state {
            GameState::Playing => self.render_game(frame, view),
            GameState::Paused => self.render_paused(frame, view),
            GameState::GameOver => self.render_game_over(frame, view),
        }
    }

    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;

        let field = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let game_area = block.inner(field);
        frame.render_widget(block, field);

        let buffer = frame.buffer_mut();
        for item in view.items {
            let Some((x, y)) = world_to_cell(item.hitbox.x, item.hitbox.y, game_area) else {
                continue;
            };
            let (text, base) = match &item.visual {
                Visual::Image(key) => (glyph(*key), Style::default().fg(color(*key))),
                Visual::Text(text) => (text.as_str(), Style::default().fg(Color::White)),
            };
            let Some(style) = opacity_style(base, item.opacity) else {
                continue;
            };
            let room = (game_area.x + game_area.width).saturating_sub(x) as usize;
            let clipped: String = text.chars().take(room).collect();
            buffer.set_string(x, y, clipped, style);
        }

        if view.between_rounds {
            let banner = Rect {
                x: game_area.x,
                y: game_area.y + game_area.height / 2,
                width: game_area.width,
                height: 1,
            };
            frame.render_widget(
                Paragraph::new(Line::from("NEXT ROUND").bold().yellow()).centered(),
                banner,
            );
        }

        let swarm_text = match view.swarm_state {
            SwarmState::Superposition => "superposition".to_string(),
            SwarmState::Measured { ship, .. } => format!("measured |{:03b}>", ship),
        };
        let stats_left = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Lives: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.lives),
                if view.lives > 1 {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                },
            ),
            Span::styled("  Circuit: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                view.circuit_name,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Swarm: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                swarm_text,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  FPS: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.fps),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(stats_left), stats_area);

        let minutes = view.elapsed_time_secs / 60;
        let seconds = view.elapsed_time_secs % 60;
        let timer_text = Line::from(vec![
            Span::styled("Time: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:02}:{:02}", minutes, seconds),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        let timer_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width.saturating_sub(1),
            height: 1,
        };
        frame.render_widget(Paragraph::new(timer_text).right_aligned(), timer_area);

        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Shift swarm] [Space: Fire] [C: Circuit] [P: Pause] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Renders the pause screen with overlay
    fn render_paused(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);

        let area = view.area;
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];

        let pause_area = Rect {
            x: (area.width / 2).saturating_sub(15),
            y: (area.height / 2).saturating_sub(3),
            width: 30.min(area.width),
            height: 6.min(area.height),
        };

        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }

    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let minutes = view.elapsed_time_secs / 60;
        let seconds = view.elapsed_time_secs % 60;

        let game_over_text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from("║      GAME OVER!           ║")
                .centered()
                .red()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            Line::from(format!("Final Score: {}", view.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("Time Survived: {:02}:{:02}", minutes, seconds))
                .centered()
                .cyan()
                .bold(),
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            area,
        );
    }
}
