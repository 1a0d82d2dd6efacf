//! Frame snapshots and a text renderer
//!
//! Renderers only ever see a [`FrameSnapshot`]; nothing they do feeds back
//! into the simulation.

use std::io::Write;

use glam::Vec2;

use crate::sim::{GameState, Platform};

/// Read-only view of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub width: f32,
    pub floor_y: f32,
    pub wall_inset: f32,
    pub player: Vec2,
    pub player_radius: f32,
    pub items: Vec<Vec2>,
    pub platforms: Vec<Platform>,
    pub score: u32,
    pub item_total: u32,
    pub seed: u64,
    /// Seconds since the stage started, frozen once cleared
    pub elapsed_secs: f32,
    pub clear_time: Option<f32>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState, frame: u64) -> Self {
        Self {
            width: state.settings.width as f32,
            floor_y: state.settings.floor_y(),
            wall_inset: state.settings.wall_inset,
            player: state.player_pos(),
            player_radius: state.player.radius,
            items: state.items.iter().map(|live| live.item.pos).collect(),
            platforms: state.platforms.clone(),
            score: state.score,
            item_total: state.item_total(),
            seed: state.seed,
            elapsed_secs: state.elapsed_secs(frame),
            clear_time: state.clear.clear_time(),
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.clear_time.is_some()
    }

    /// HUD text lines, top to bottom
    pub fn hud_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "[R]Restart [N]New Stage [0-9]Select".to_string(),
            format!(
                "Time: {:.2}  Stage: {}  Items: {}/{}",
                self.elapsed_secs, self.seed, self.score, self.item_total
            ),
        ];
        if let Some(time) = self.clear_time {
            lines.push("CLEAR!".to_string());
            lines.push(format!("Time: {time:.2} sec"));
            lines.push("Press S to Share".to_string());
        }
        lines
    }
}

/// Consumer of frame snapshots
pub trait Renderer {
    fn draw(&mut self, snapshot: &FrameSnapshot);
}

/// Draws the playfield as ASCII art, one character per `cell` pixels.
pub struct TextRenderer<W: Write> {
    writer: W,
    cell: f32,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W, cell: f32) -> Self {
        Self {
            writer,
            cell: cell.max(1.0),
        }
    }

    /// Render the field (walls, floor, platforms, items, ball) to a string
    pub fn render_field(&self, snap: &FrameSnapshot) -> String {
        let cols = (snap.width / self.cell).ceil() as usize;
        let rows = (snap.floor_y / self.cell).ceil() as usize + 1;
        let mut grid = vec![vec![' '; cols]; rows];

        let cell_of = |p: Vec2| -> Option<(usize, usize)> {
            let c = (p.x / self.cell).floor();
            let r = (p.y / self.cell).floor();
            (c >= 0.0 && r >= 0.0 && (c as usize) < cols && (r as usize) < rows).then(|| (r as usize, c as usize))
        };

        let left = (snap.wall_inset / self.cell) as usize;
        let right = ((snap.width - snap.wall_inset) / self.cell) as usize;
        for row in grid.iter_mut().take(rows - 1) {
            row[left.min(cols - 1)] = '|';
            row[right.min(cols - 1)] = '|';
        }
        for cell in grid[rows - 1].iter_mut() {
            *cell = '=';
        }

        for p in &snap.platforms {
            let mut x = p.pos.x - p.half_width();
            while x < p.pos.x + p.half_width() {
                if let Some((r, c)) = cell_of(Vec2::new(x, p.pos.y)) {
                    grid[r][c] = '#';
                }
                x += self.cell;
            }
        }
        for item in &snap.items {
            if let Some((r, c)) = cell_of(*item) {
                grid[r][c] = '*';
            }
        }
        if let Some((r, c)) = cell_of(snap.player) {
            grid[r][c] = 'o';
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, snapshot: &FrameSnapshot) {
        let mut frame = self.render_field(snapshot);
        for line in snapshot.hud_lines() {
            frame.push('\n');
            frame.push_str(&line);
        }
        if let Err(e) = writeln!(self.writer, "{frame}\n") {
            log::warn!("Text renderer write failed: {e}");
        }
    }
}
