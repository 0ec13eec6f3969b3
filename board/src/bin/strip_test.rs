//! Cycle the strip through solid colors to check wiring and channel order.

use snowboard::{context::Context, NeoPixelColor, Strip};
use std::time::Duration;

fn strip_color(state: &mut u8) -> NeoPixelColor {
    *state = (*state + 1) % 5;
    match state {
        1 => [255, 0, 0, 0],
        2 => [0, 255, 0, 0],
        3 => [0, 0, 255, 0],
        4 => [0, 0, 0, 255],
        _ => [255, 255, 255, 255],
    }
}

pub fn main() {
    tracing_subscriber::fmt::init();
    let count = snowboard::config::STATIONS.len();

    #[cfg(feature = "hardware")]
    let mut strip = snowboard::led_strip::LedStrip::new(&Default::default()).unwrap();

    #[cfg(all(not(feature = "hardware"), feature = "window"))]
    let mut strip = snowboard::simulator::SimStrip::new(count);

    #[cfg(all(not(feature = "hardware"), not(feature = "window")))]
    let mut strip = snowboard::MemoryStrip::new(count);

    let ctx = Context::new();
    ctx.cancel_on_interrupt().expect("could not set SIGINT handler");

    let mut channel = 0;

    tracing::info!("starting loop over {} LEDs", count);
    while !ctx.is_cancelled() {
        let color = strip_color(&mut channel);
        tracing::info!("showing {:?}", color);
        strip.data().fill(color);
        strip.flush().expect("could not flush strip");
        ctx.wait_timeout(Duration::from_secs(1));
    }
    // Leave the strip dark.
    strip.data().fill([0; 4]);
    let _ = strip.flush();
    tracing::info!("exiting loop");
}
