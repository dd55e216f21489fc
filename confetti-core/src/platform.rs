//! The drawing surface seam
//!
//! The frame loop only ever talks to a [`Canvas`]. A frontend supplies the
//! concrete surface (terminal, window, test recorder) and the core stays free
//! of any windowing or rasterization code.

use crate::error::Result;

/// Linear RGBA colour, each channel nominally in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_rgba8(255, 255, 255, 255);
    pub const DARK_GREY: Color = Color::from_rgba8(95, 87, 79, 255);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Colour from 8-bit channels
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Channels quantized to 8 bits, clamping out-of-range values
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// One vertex of a textured, vertex-coloured triangle list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub color: Color,
    pub tex_coord: [f32; 2],
}

/// Square single-channel coverage image used as a sprite texture
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteMask {
    size: usize,
    coverage: Vec<f32>,
}

impl SpriteMask {
    /// A filled disc: pixels within `size / 2 - 1` of the centre are opaque
    pub fn circle(size: usize) -> Self {
        let center = size as f32 / 2.0;
        let radius = center - 1.0;
        let mut coverage = vec![0.0; size * size];
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                if dx * dx + dy * dy <= radius * radius {
                    coverage[y * size + x] = 1.0;
                }
            }
        }
        Self { size, coverage }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Coverage at pixel (x, y); zero outside the image
    pub fn at(&self, x: usize, y: usize) -> f32 {
        if x < self.size && y < self.size {
            self.coverage[y * self.size + x]
        } else {
            0.0
        }
    }

    /// Nearest-neighbour lookup at normalized texture coordinates
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        if self.size == 0 || !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return 0.0;
        }
        let last = self.size - 1;
        let x = ((u * self.size as f32) as usize).min(last);
        let y = ((v * self.size as f32) as usize).min(last);
        self.at(x, y)
    }
}

/// A 2D drawing surface the frame loop renders into
pub trait Canvas {
    /// Texture handle produced by [`Canvas::create_texture`]
    type Texture;

    /// Current drawable size in pixels
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Color);

    fn draw_line(&mut self, from: [f32; 2], to: [f32; 2], color: Color);

    /// Upload a sprite mask so it can be used by [`Canvas::draw_sprites`]
    fn create_texture(&mut self, mask: &SpriteMask) -> Result<Self::Texture>;

    /// Draw a triangle list (three vertices per triangle) with `texture`.
    ///
    /// Callers never pass an empty list.
    fn draw_sprites(&mut self, vertices: &[SpriteVertex], texture: &Self::Texture) -> Result<()>;

    /// Show the finished frame
    fn present(&mut self) -> Result<()>;
}
