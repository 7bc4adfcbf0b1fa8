//! RGBA color type, predefined constants, and source-over compositing.

/// Represents a non-premultiplied RGBA color with 8-bit channels.
///
/// # Examples
///
/// ```
/// use impressionist::draw::Color;
/// let red = Color::rgb(255, 0, 0);
/// let faded = red.with_alpha(128);
/// assert_eq!(faded.a, 128);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
    /// Alpha/opacity (0 = fully transparent, 255 = fully opaque)
    pub a: u8,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with its alpha replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn from_rgba(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Composites `src` over `self` with an extra opacity factor.
    ///
    /// The effective source alpha is `src.a * alpha / 255`. Standard
    /// non-premultiplied "source-over":
    ///
    /// ```text
    /// out_a = sa + da * (1 - sa)
    /// out_c = (sc * sa + dc * da * (1 - sa)) / out_a
    /// ```
    pub fn blend_over(self, src: Color, alpha: u8) -> Color {
        let sa = (src.a as f32 / 255.0) * (alpha as f32 / 255.0);
        if sa <= 0.0 {
            return self;
        }
        let da = self.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return TRANSPARENT;
        }

        let channel = |sc: u8, dc: u8| -> u8 {
            let value = (sc as f32 * sa + dc as f32 * da * (1.0 - sa)) / out_a;
            value.round().clamp(0.0, 255.0) as u8
        };

        Color {
            r: channel(src.r, self.r),
            g: channel(src.g, self.g),
            b: channel(src.b, self.b),
            a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

pub const RED: Color = Color::rgb(255, 0, 0);

pub const GREEN: Color = Color::rgb(0, 255, 0);

pub const BLUE: Color = Color::rgb(0, 0, 255);

pub const WHITE: Color = Color::rgb(255, 255, 255);

pub const BLACK: Color = Color::rgb(0, 0, 0);

/// Fully transparent color, the value of every freshly cleared raster pixel
pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
