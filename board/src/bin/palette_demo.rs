//! Demo of the board's palette: every entry, gamma-corrected, left to right.

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, Window};
use snowboard::{drawing::render_strip, render::color_at, Board};

fn main() -> Result<(), core::convert::Infallible> {
    let board = Board::default();
    let palette = board.palette();
    let n = palette.len();
    let pixels: Vec<_> = (0..n)
        .map(|i| {
            let position = i as f64 / (n.max(2) - 1) as f64;
            color_at(position, palette, &board.settings().gamma)
        })
        .collect();

    let mut display = SimulatorDisplay::<Rgb888>::new(Size::new(n as u32, 1));
    render_strip(&pixels, &mut display)?;

    let output_settings = OutputSettingsBuilder::new().scale(20).build();
    Window::new("Snow Board palette", &output_settings).show_static(&display);

    Ok(())
}
