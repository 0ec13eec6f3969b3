//! Routine for computing neopixel colors from positions along the gradient.

use crate::gradient::{Gamma, Palette};
use crate::{Error, NeoPixelColor, Result};

/// Color of a single position: nearest palette entry, gamma-corrected.
pub fn color_at(position: f64, palette: &Palette, gamma: &Gamma) -> NeoPixelColor {
    gamma.apply(palette.lookup(position)).pack()
}

/// Write the color for each present position into the matching pixel.
///
/// Pixels with no position keep whatever they held before.
pub fn render(
    positions: &[Option<f64>],
    palette: &Palette,
    gamma: &Gamma,
    output: &mut [NeoPixelColor],
) -> Result<()> {
    if positions.len() != output.len() {
        return Err(Error::LengthMismatch {
            expected: positions.len(),
            buffer: output.len(),
        });
    }
    for (i, (position, px)) in positions.iter().zip(output.iter_mut()).enumerate() {
        if let Some(position) = *position {
            *px = color_at(position, palette, gamma);
            tracing::trace!("point {i:03}: position {position:.3}, color {px:?}");
        } else {
            tracing::trace!("point {i:03}: no observation, left at {px:?}");
        }
    }
    Ok(())
}
