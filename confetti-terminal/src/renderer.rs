//! Character-cell canvas for terminal rendering

use crossterm::{
    cursor,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use confetti_core::{Canvas, Color, Error, Result, SpriteMask, SpriteVertex};

/// Logical pixels per cell, horizontally
pub const CELL_WIDTH: u32 = 4;
/// Logical pixels per cell, vertically; cells are about twice as tall as wide
pub const CELL_HEIGHT: u32 = 8;

/// Character luminosity ramp for sprite coverage (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
    /// Strongest sprite intensity written this frame
    coverage: f32,
}

impl Cell {
    const fn blank(color: Color) -> Self {
        Self { glyph: ' ', color, coverage: 0.0 }
    }
}

/// Index of a mask uploaded with [`Canvas::create_texture`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskId(usize);

/// A [`Canvas`] backed by a grid of terminal cells.
///
/// Drawing happens in a logical pixel space of `cols * 4` by `rows * 8`;
/// [`Canvas::present`] writes the grid to `out` in one go.
pub struct TerminalCanvas<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    background: Color,
    cells: Vec<Cell>,
    masks: Vec<SpriteMask>,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        let background = Color::DARK_GREY;
        Self {
            out,
            cols,
            rows,
            background,
            cells: vec![Cell::blank(background); cols as usize * rows as usize],
            masks: Vec::new(),
        }
    }

    /// Grid size in cells
    pub fn grid_size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Resize the grid; contents are blanked
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if (cols, rows) == (self.cols, self.rows) {
            return;
        }
        log::debug!("Terminal resized to {cols}x{rows} cells");
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::blank(self.background); cols as usize * rows as usize];
    }

    /// Glyph and colour at a cell, if it exists
    pub fn cell(&self, col: u16, row: u16) -> Option<(char, Color)> {
        self.index(col as i32, row as i32).map(|i| (self.cells[i].glyph, self.cells[i].color))
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    fn plot_line_cell(&mut self, col: i32, row: i32, glyph: char, color: Color) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = Cell { glyph, color, coverage: 0.0 };
        }
    }

    fn rasterize_sprite(&mut self, tri: &[SpriteVertex], mask: usize) {
        let (v0, v1, v2) = (tri[0], tri[1], tri[2]);
        let xs = [v0.position[0], v1.position[0], v2.position[0]];
        let ys = [v0.position[1], v1.position[1], v2.position[1]];

        // Bounding box in cells
        let min_col = (xs.iter().copied().fold(f32::INFINITY, f32::min) / CELL_WIDTH as f32).floor() as i32;
        let max_col = (xs.iter().copied().fold(f32::NEG_INFINITY, f32::max) / CELL_WIDTH as f32).ceil() as i32;
        let min_row = (ys.iter().copied().fold(f32::INFINITY, f32::min) / CELL_HEIGHT as f32).floor() as i32;
        let max_row = (ys.iter().copied().fold(f32::NEG_INFINITY, f32::max) / CELL_HEIGHT as f32).ceil() as i32;

        // Clip to screen bounds
        let min_col = min_col.max(0);
        let max_col = max_col.min(self.cols as i32 - 1);
        let min_row = min_row.max(0);
        let max_row = max_row.min(self.rows as i32 - 1);

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let px = (col as f32 + 0.5) * CELL_WIDTH as f32;
                let py = (row as f32 + 0.5) * CELL_HEIGHT as f32;

                let Some((w0, w1, w2)) = barycentric(
                    (xs[0], ys[0]),
                    (xs[1], ys[1]),
                    (xs[2], ys[2]),
                    (px, py),
                ) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let u = w0 * v0.tex_coord[0] + w1 * v1.tex_coord[0] + w2 * v2.tex_coord[0];
                let v = w0 * v0.tex_coord[1] + w1 * v1.tex_coord[1] + w2 * v2.tex_coord[1];
                let color = Color::new(
                    w0 * v0.color.r + w1 * v1.color.r + w2 * v2.color.r,
                    w0 * v0.color.g + w1 * v1.color.g + w2 * v2.color.g,
                    w0 * v0.color.b + w1 * v1.color.b + w2 * v2.color.b,
                    w0 * v0.color.a + w1 * v1.color.a + w2 * v2.color.a,
                );
                let intensity = (self.masks[mask].sample(u, v) * color.a).clamp(0.0, 1.0);

                let Some(idx) = self.index(col, row) else {
                    continue;
                };
                if intensity <= 0.0 || intensity < self.cells[idx].coverage {
                    continue;
                }
                self.cells[idx] = Cell {
                    glyph: ramp_glyph(intensity),
                    color: blend(self.background, color, intensity),
                    coverage: intensity,
                };
            }
        }
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    type Texture = MaskId;

    fn size(&self) -> (u32, u32) {
        (self.cols as u32 * CELL_WIDTH, self.rows as u32 * CELL_HEIGHT)
    }

    fn clear(&mut self, color: Color) {
        self.background = color;
        self.cells.fill(Cell::blank(color));
    }

    fn draw_line(&mut self, from: [f32; 2], to: [f32; 2], color: Color) {
        let (width, height) = self.size();
        let Some((from, to)) = clip_segment(from, to, width as f32, height as f32) else {
            return;
        };
        let glyph = slope_glyph(to[0] - from[0], to[1] - from[1]);

        // Bresenham over cell coordinates
        let mut x0 = (from[0] / CELL_WIDTH as f32).floor() as i32;
        let mut y0 = (from[1] / CELL_HEIGHT as f32).floor() as i32;
        let x1 = (to[0] / CELL_WIDTH as f32).floor() as i32;
        let y1 = (to[1] / CELL_HEIGHT as f32).floor() as i32;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot_line_cell(x0, y0, glyph, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn create_texture(&mut self, mask: &SpriteMask) -> Result<MaskId> {
        if mask.size() == 0 {
            return Err(Error::Platform("empty sprite mask".to_string()));
        }
        self.masks.push(mask.clone());
        Ok(MaskId(self.masks.len() - 1))
    }

    fn draw_sprites(&mut self, vertices: &[SpriteVertex], texture: &MaskId) -> Result<()> {
        if texture.0 >= self.masks.len() {
            return Err(Error::Platform(format!("unknown sprite texture {}", texture.0)));
        }
        if vertices.len() % 3 != 0 {
            return Err(Error::Platform(format!("{} vertices is not a triangle list", vertices.len())));
        }
        for tri in vertices.chunks_exact(3) {
            self.rasterize_sprite(tri, texture.0);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.out.queue(SetBackgroundColor(to_terminal_color(self.background)))?;
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let mut current = None;
            for col in 0..self.cols {
                let cell = self.cells[row as usize * self.cols as usize + col as usize];
                let color = to_terminal_color(cell.color);
                if current != Some(color) {
                    self.out.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                self.out.queue(Print(cell.glyph))?;
            }
        }
        self.out.queue(ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}

fn to_terminal_color(color: Color) -> style::Color {
    let [r, g, b, _] = color.to_rgba8();
    style::Color::Rgb { r, g, b }
}

/// Fade `color` into `background` by `amount`
fn blend(background: Color, color: Color, amount: f32) -> Color {
    let mix = |bg: f32, fg: f32| bg + (fg - bg) * amount;
    Color::new(
        mix(background.r, color.r),
        mix(background.g, color.g),
        mix(background.b, color.b),
        1.0,
    )
}

/// Map a non-zero intensity to a visible glyph of the ramp
fn ramp_glyph(intensity: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (intensity * last as f32).ceil() as usize;
    LUMINOSITY_RAMP[index.clamp(1, last)]
}

/// Pick a line glyph from the slope in logical pixels (y grows downwards)
fn slope_glyph(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay <= ax * 0.5 {
        '-'
    } else if ay >= ax * 2.0 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Clip a segment to `[0, width) x [0, height)` (Liang-Barsky)
fn clip_segment(from: [f32; 2], to: [f32; 2], width: f32, height: f32) -> Option<([f32; 2], [f32; 2])> {
    if !(from.iter().chain(to.iter()).all(|c| c.is_finite())) || width <= 0.0 || height <= 0.0 {
        return None;
    }
    // Projected points near the camera can be huge; f32 loses the visible part
    let (x0, y0) = (from[0] as f64, from[1] as f64);
    let dx = to[0] as f64 - x0;
    let dy = to[1] as f64 - y0;
    // Keep the far edge inside the last cell
    let max_x = width as f64 - 1e-3;
    let max_y = height as f64 - 1e-3;

    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [(-dx, x0), (dx, max_x - x0), (-dy, y0), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        [(x0 + t0 * dx) as f32, (y0 + t0 * dy) as f32],
        [(x0 + t1 * dx) as f32, (y0 + t1 * dy) as f32],
    ))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
