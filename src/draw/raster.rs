//! Off-screen RGBA raster and its primitive drawing operations.
//!
//! [`PixelBuffer`] is the plain, row-major RGBA grid handed across thread and
//! collaborator boundaries. [`RasterBuffer`] wraps one and adds the brush
//! primitives; every primitive clips to the buffer and alpha-blends with
//! source-over compositing.

use super::color::{Color, TRANSPARENT};
use crate::error::PaintError;
use crate::util::Rect;
use rand::Rng;

/// Number of circles a splatter dab scatters.
pub const DEFAULT_SPLATTER_COUNT: usize = 5;

/// Plain RGBA pixel grid, row-major, 4 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Creates a buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let data = color
            .to_rgba()
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Wraps existing RGBA bytes.
    ///
    /// # Errors
    /// [`PaintError::InvalidImage`] when the byte count does not match the size.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PaintError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(PaintError::InvalidImage(format!(
                "expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.data
    }

    /// Whole-buffer rectangle, `None` for an empty buffer.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Color at (`x`, `y`), or `None` outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let i = self.pixel_index(x as u32, y as u32);
        Some(Color::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Overwrites a pixel; writes outside the buffer are ignored.
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.pixel_index(x as u32, y as u32);
        self.data[i..i + 4].copy_from_slice(&color.to_rgba());
    }

    /// Copies the part of `rect` that lies inside the buffer.
    pub fn crop(&self, rect: Rect) -> Option<PixelBuffer> {
        let area = self.bounds()?.intersect(&rect)?;
        let mut out = PixelBuffer::new(area.width as u32, area.height as u32);
        let row_bytes = area.width as usize * 4;
        for row in 0..area.height {
            let src = self.pixel_index(area.x as u32, (area.y + row) as u32);
            let dst = out.pixel_index(0, row as u32);
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        Some(out)
    }

    /// True when every pixel has alpha 0.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// The mutable painting canvas.
#[derive(Clone, Debug)]
pub struct RasterBuffer {
    pixels: PixelBuffer,
}

impl RasterBuffer {
    /// Allocates a transparent raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: PixelBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.pixels.get(x, y)
    }

    /// Reallocates the raster at the given size, fully transparent.
    pub fn clear(&mut self, width: u32, height: u32) {
        self.pixels = PixelBuffer::new(width, height);
    }

    /// Copy of a sub-rectangle, clipped to the raster.
    pub fn export_region(&self, rect: Rect) -> Option<PixelBuffer> {
        self.pixels.crop(rect)
    }

    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: u8) {
        if let Some(dst) = self.pixels.get(x, y) {
            self.pixels.set(x, y, dst.blend_over(color, alpha));
        }
    }

    /// Clips the span `[center - reach, center + reach + extra)` on both axes
    /// to the raster. Computed in `i64` so any center and reach are safe.
    fn clip_span(&self, cx: i32, cy: i32, reach: i32, extra: i64) -> Option<Rect> {
        let bounds = self.pixels.bounds()?;
        let clip = |v: i64, lo: i32, hi: i32| v.clamp(lo as i64, hi as i64) as i32;
        let (reach, cx, cy) = (reach as i64, cx as i64, cy as i64);
        Rect::from_min_max(
            clip(cx - reach, bounds.x, bounds.max_x()),
            clip(cy - reach, bounds.y, bounds.max_y()),
            clip(cx + reach + extra, bounds.x, bounds.max_x()),
            clip(cy + reach + extra, bounds.y, bounds.max_y()),
        )
    }

    /// Fills every pixel within `radius` of the center.
    ///
    /// Returns the touched area, or `None` when the circle misses the raster.
    pub fn draw_filled_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        color: Color,
        alpha: u8,
    ) -> Option<Rect> {
        if radius < 0 {
            return None;
        }
        let area = self.clip_span(cx, cy, radius, 1)?;
        let r2 = radius as i64 * radius as i64;
        for y in area.y..area.max_y() {
            let dy = y as i64 - cy as i64;
            for x in area.x..area.max_x() {
                let dx = x as i64 - cx as i64;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, color, alpha);
                }
            }
        }
        Some(area)
    }

    /// Fills the axis-aligned square of side `2 * radius` centered on the point.
    pub fn draw_filled_square(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        color: Color,
        alpha: u8,
    ) -> Option<Rect> {
        if radius <= 0 {
            return None;
        }
        let area = self.clip_span(cx, cy, radius, 0)?;
        for y in area.y..area.max_y() {
            for x in area.x..area.max_x() {
                self.blend_pixel(x, y, color, alpha);
            }
        }
        Some(area)
    }

    /// Scatters `count` circles within `radius` of the center.
    ///
    /// Each circle gets an offset in `[-radius, radius]` on both axes and its
    /// own radius in `[1, radius]`, drawn from `rng`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_splatter<R: Rng + ?Sized>(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        color: Color,
        alpha: u8,
        count: usize,
        rng: &mut R,
    ) -> Option<Rect> {
        let radius = radius.max(1);
        let mut touched: Option<Rect> = None;
        for _ in 0..count {
            let ox = rng.gen_range(-radius..=radius);
            let oy = rng.gen_range(-radius..=radius);
            let sub_radius = rng.gen_range(1..=radius);
            let (x, y) = (cx.saturating_add(ox), cy.saturating_add(oy));
            if let Some(area) = self.draw_filled_circle(x, y, sub_radius, color, alpha) {
                touched = Some(match touched {
                    Some(prev) => prev.union(&area),
                    None => area,
                });
            }
        }
        touched
    }
}

impl Default for RasterBuffer {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl From<PixelBuffer> for RasterBuffer {
    fn from(pixels: PixelBuffer) -> Self {
        Self { pixels }
    }
}

/// Counts pixels that are not fully transparent.
pub fn painted_pixel_count(buffer: &PixelBuffer) -> usize {
    buffer
        .as_rgba()
        .chunks_exact(4)
        .filter(|px| px[3] != TRANSPARENT.a)
        .count()
}
