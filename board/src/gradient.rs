//! Color gradients: expansion into a palette, lookup, and gamma correction.

use embedded_graphics_core::pixelcolor::{Rgb888, RgbColor};

use crate::NeoPixelColor;

/// An anchor of a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Where along the gradient this color sits, in `[0, 1]`.
    pub position: f32,
    pub color: Rgb888,
}

impl ColorStop {
    /// Stop from a packed `0xRRGGBB` color.
    pub const fn new(position: f32, rgb: u32) -> Self {
        ColorStop {
            position,
            color: Rgb888::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8),
        }
    }
}

/// An RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl From<Rgb888> for Color {
    fn from(c: Rgb888) -> Self {
        Color {
            r: c.r() as f32 / 255.0,
            g: c.g() as f32 / 255.0,
            b: c.b() as f32 / 255.0,
        }
    }
}

impl Color {
    /// Linear blend: `weight` 0 is all `self`, 1 is all `other`.
    pub fn mix(self, other: Color, weight: f32) -> Color {
        let lerp = |a: f32, b: f32| a + (b - a) * weight;
        Color {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
        }
    }

    /// Pack into an RGBW strip color, with the white channel off.
    pub fn pack(self) -> NeoPixelColor {
        let channel = |c: f32| (c * 256.0).floor().clamp(0.0, 255.0) as u8;
        [channel(self.r), channel(self.g), channel(self.b), 0]
    }
}

/// A dense table of colors sampled evenly along a gradient.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Sample `len` colors evenly along the gradient described by `stops`.
    ///
    /// Entry `i` is the color at position `i / (len - 1)`. Stops must be
    /// sorted by position, the first at 0 and the last at 1.
    pub fn expand(stops: &[ColorStop], len: usize) -> Self {
        let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
            return Palette { colors: Vec::new() };
        };
        let colors = (0..len)
            .map(|i| -> Color {
                let pos = if len > 1 {
                    i as f32 / (len - 1) as f32
                } else {
                    0.0
                };
                if pos <= first.position {
                    return first.color.into();
                }
                if pos >= last.position {
                    return last.color.into();
                }
                // Last stop at or before pos, and the one after it.
                let upper = stops
                    .iter()
                    .position(|s| s.position > pos)
                    .unwrap_or(stops.len() - 1);
                let below = &stops[upper.saturating_sub(1)];
                let above = &stops[upper];
                let span = above.position - below.position;
                if span <= 0.0 {
                    below.color.into()
                } else {
                    let weight = (pos - below.position) / span;
                    Color::from(below.color).mix(above.color.into(), weight)
                }
            })
            .collect();
        Palette { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The entry nearest to `position`, clamping to the ends of the palette.
    ///
    /// Returns black for an empty palette.
    pub fn lookup(&self, position: f64) -> Color {
        let Some(max) = self.colors.len().checked_sub(1) else {
            return Color::default();
        };
        let index = if position.is_nan() {
            0
        } else {
            (position * max as f64).round().clamp(0.0, max as f64) as usize
        };
        self.colors[index]
    }
}

/// Per-channel power-law correction, scaled by a per-channel brightness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gamma {
    pub exponent: f32,
    /// Red, green, blue multipliers.
    pub brightness: [f32; 3],
}

impl Default for Gamma {
    fn default() -> Self {
        Gamma {
            exponent: 2.7,
            brightness: [1.0; 3],
        }
    }
}

impl Gamma {
    pub fn apply(&self, c: Color) -> Color {
        let [br, bg, bb] = self.brightness;
        Color {
            r: c.r.powf(self.exponent) * br,
            g: c.g.powf(self.exponent) * bg,
            b: c.b.powf(self.exponent) * bb,
        }
    }
}
