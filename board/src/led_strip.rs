//! Strip implementation on real NeoPixels.

use rs_ws281x::{ChannelBuilder, Controller, ControllerBuilder, StripType};

use crate::{NeoPixelColor, Strip};

/// Settings for the NeoPixel strip.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct StripSettings {
    /// GPIO pin driving the strip.
    pub pin: i32,
    /// Number of LEDs.
    pub count: i32,
    /// Global brightness, 0-255.
    pub brightness: u8,
}

impl Default for StripSettings {
    fn default() -> Self {
        Self {
            pin: 10, // SPI MOSI
            count: 30,
            brightness: 128,
        }
    }
}

/// Strip implementation for real hardware.
/// Backed by a strip of SK6812 RGBW NeoPixels.
///
/// The LEDs latch: they keep showing the last flush after this is dropped.
pub struct LedStrip {
    controller: Controller,
    pixels: Vec<NeoPixelColor>,
}

impl LedStrip {
    /// Create a new handler for the hardware strip.
    pub fn new(settings: &StripSettings) -> Result<Self, String> {
        let controller = ControllerBuilder::new()
            .freq(800_000)
            .dma(10)
            .channel(
                0,
                ChannelBuilder::new()
                    .pin(settings.pin)
                    .count(settings.count)
                    .strip_type(StripType::Sk6812Grbw)
                    .brightness(settings.brightness)
                    .build(),
            )
            .build()
            .map_err(|e| e.to_string())?;
        let pixels = vec![NeoPixelColor::default(); settings.count.max(0) as usize];
        Ok(Self { controller, pixels })
    }
}

impl Strip for LedStrip {
    fn data(&mut self) -> &mut [NeoPixelColor] {
        &mut self.pixels
    }

    fn flush(&mut self) -> Result<(), String> {
        // The driver's buffer holds 0xWWRRGGBB words, little-endian.
        for (raw, &[r, g, b, w]) in self.controller.leds_mut(0).iter_mut().zip(&self.pixels) {
            *raw = [b, g, r, w];
        }
        self.controller.render().map_err(|e| e.to_string())
    }
}
