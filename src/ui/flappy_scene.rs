//! Rendering of one simulation frame.

use crate::core::constants::INFO_PANEL_WIDTH;
use crate::core::frame::FrameView;
use crate::flappy::Bird;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Where each part of the screen goes.
///
/// ```text
/// ┌─ Flappy Neuro ───────────────┬─ Info ─────┐
/// │        [world, to scale]     │ generation │
/// │                              │ counters   │
/// │ Gen 7 · 12 alive · 1.48s     │ progress   │
/// └──────────────────────────────┴────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScreenLayout {
    world: Rect,
    status: Rect,
    info: Rect,
}

impl ScreenLayout {
    /// Split the inside of the outer border. The world view is shrunk and
    /// centred so that it keeps the world's width to height ratio.
    fn split(inner: Rect, info_width: u16, world_width: u32, world_height: u32) -> Self {
        let info_width = info_width.min(inner.width / 2);
        let left_width = inner.width - info_width;
        let info = Rect {
            x: inner.x + left_width,
            width: info_width,
            ..inner
        };

        let status_height = inner.height.min(1);
        let status = Rect {
            x: inner.x,
            y: inner.y + inner.height - status_height,
            width: left_width,
            height: status_height,
        };

        let room_height = inner.height - status_height;
        let ratio = world_width.max(1) as f64 / world_height.max(1) as f64;
        let width = (room_height as f64 * CELL_ASPECT * ratio)
            .round()
            .min(left_width as f64) as u16;
        let height = (width as f64 / (CELL_ASPECT * ratio))
            .round()
            .min(room_height as f64) as u16;
        let world = Rect {
            x: inner.x + (left_width - width) / 2,
            y: inner.y + (room_height - height) / 2,
            width,
            height,
        };

        Self {
            world,
            status,
            info,
        }
    }
}

/// Render the whole screen: play area, status line and info panel.
pub fn render_frame(frame: &mut Frame, area: Rect, view: &FrameView<'_>) {
    frame.render_widget(Clear, area);
    let border = Block::default()
        .title(" Flappy Neuro ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = border.inner(area);
    frame.render_widget(border, area);

    let settings = view.settings;
    let layout = ScreenLayout::split(
        inner,
        INFO_PANEL_WIDTH,
        settings.screen_width,
        settings.screen_height,
    );

    render_play_area(frame, layout.world, view);
    render_status_line(frame, layout.status, view);
    render_info_panel(frame, layout.info, view);
}

/// Training state on the left, the quit key on the right.
fn render_status_line(frame: &mut Frame, area: Rect, view: &FrameView<'_>) {
    if area.height == 0 {
        return;
    }
    let dim = Style::default().fg(Color::DarkGray);
    let state = Line::from(vec![
        Span::styled(format!(" Gen {}", view.generation), Style::default().fg(Color::Cyan)),
        Span::styled(" · ", dim),
        Span::styled(format!("{} alive", view.alive()), Style::default().fg(Color::Yellow)),
        Span::styled(" · ", dim),
        Span::styled(format!("{:.2}s", view.elapsed), Style::default().fg(Color::Green)),
    ]);
    frame.render_widget(Paragraph::new(state), area);
    let quit = Line::from(vec![
        Span::styled("q/Esc", Style::default().fg(Color::White)),
        Span::styled(" quit ", dim),
    ]);
    frame.render_widget(Paragraph::new(quit).alignment(Alignment::Right), area);
}

#[derive(Clone, Copy, PartialEq)]
enum Cell {
    Empty,
    Pipe,
    Floor,
    Ground,
}

/// Scale world coordinates onto the play area and draw pipes, floor and
/// birds.
fn render_play_area(frame: &mut Frame, area: Rect, view: &FrameView<'_>) {
    let width = area.width as usize;
    let height = area.height as usize;
    if width == 0 || height == 0 {
        return;
    }

    let settings = view.settings;
    let x_scale = width as f64 / settings.screen_width.max(1) as f64;
    let y_scale = height as f64 / settings.screen_height.max(1) as f64;
    let floor_row = (view.floor.y * y_scale).floor() as usize;

    let mut grid = vec![vec![Cell::Empty; width]; height];
    for (row, cells) in grid.iter_mut().enumerate() {
        let world_y = (row as f64 + 0.5) / y_scale;
        for (col, cell) in cells.iter_mut().enumerate() {
            let world_x = (col as f64 + 0.5) / x_scale;
            *cell = if row == floor_row {
                Cell::Floor
            } else if row > floor_row {
                Cell::Ground
            } else if view.pipes.iter().any(|pipe| {
                world_x >= pipe.x
                    && world_x < pipe.right_edge()
                    && (world_y < pipe.top_height || world_y >= pipe.bottom_top_left)
            }) {
                Cell::Pipe
            } else {
                Cell::Empty
            };
        }
    }

    let mut birds: Vec<Option<&str>> = vec![None; width * height];
    for bird in &view.birds {
        let center_x = bird.x + bird.width(view.sprites) / 2.0;
        let center_y = bird.y + bird.height(view.sprites) / 2.0;
        let col = (center_x * x_scale).floor();
        let row = (center_y * y_scale).floor();
        if col >= 0.0 && row >= 0.0 && (col as usize) < width && (row as usize) < height {
            birds[row as usize * width + col as usize] = Some(bird_glyph(bird));
        }
    }

    let lines: Vec<Line> = grid
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    if let Some(glyph) = birds[row * width + col] {
                        return Span::styled(
                            glyph,
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        );
                    }
                    match cell {
                        Cell::Pipe => Span::styled("█", Style::default().fg(Color::Green)),
                        Cell::Floor => Span::styled("▀", Style::default().fg(Color::LightYellow)),
                        Cell::Ground => Span::styled("░", Style::default().fg(Color::DarkGray)),
                        Cell::Empty => Span::raw(" "),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn bird_glyph(bird: &Bird) -> &'static str {
    if bird.tilt > 0.0 {
        "▲" // Climbing
    } else if bird.tilt < -45.0 {
        "▼" // Diving
    } else {
        "►"
    }
}

fn render_info_panel(frame: &mut Frame, area: Rect, view: &FrameView<'_>) {
    let block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" Generation {} ", view.generation),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        counter("Birds alive", view.alive().to_string(), Color::Yellow),
        counter("Score", view.score.to_string(), Color::White),
        counter("Timer", format!("{:.2}s", view.elapsed), Color::White),
        counter("Frame", view.frame.to_string(), Color::DarkGray),
        Line::from(""),
    ];

    // Progress towards the score cap
    let max_score = view.settings.max_score.max(1);
    let progress = (view.score as f64 / max_score as f64).min(1.0);
    let bar_width = (inner.width as usize).saturating_sub(4);
    let filled = (progress * bar_width as f64) as usize;
    let empty = bar_width.saturating_sub(filled);
    lines.push(Line::from(Span::styled(
        " Progress:",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
        Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn counter(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color)),
    ])
}
