//! Utilities for drawing the strip onto an embedded-graphics display.

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::{DrawTarget, Point},
    Pixel,
};

use crate::NeoPixelColor;

/// Approximate an RGBW pixel on an RGB display.
///
/// The white channel is added to each of the others.
pub fn to_rgb(px: &NeoPixelColor) -> Rgb888 {
    let [r, g, b, w] = *px;
    Rgb888::new(r.saturating_add(w), g.saturating_add(w), b.saturating_add(w))
}

/// Draw the strip as a row of pixels, one per LED, along the top of the display.
pub fn render_strip<D>(strip: &[NeoPixelColor], display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let pixels = strip
        .iter()
        .enumerate()
        .map(|(i, px)| Pixel(Point::new(i as i32, 0), to_rgb(px)));
    display.draw_iter(pixels)
}
