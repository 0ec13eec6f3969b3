use embedded_graphics::{geometry::Size, pixelcolor::Rgb888};
use embedded_graphics_simulator::{
    OutputImage, OutputSettings, OutputSettingsBuilder, SimulatorDisplay,
};
#[cfg(feature = "window")]
use embedded_graphics_simulator::Window;

use crate::{drawing::render_strip, NeoPixelColor, Strip};

/// A strip drawn on the embedded-graphics simulator, one display pixel per LED.
pub struct SimStrip {
    display: SimulatorDisplay<Rgb888>,
    #[cfg(feature = "window")]
    window: Option<Window>,
    pixels: Vec<NeoPixelColor>,
}

impl SimStrip {
    /// Creates a strip with a window to show it in.
    #[cfg(feature = "window")]
    pub fn new(len: usize) -> Self {
        let window = Window::new("Snow Board", &Self::output_settings());
        SimStrip {
            window: Some(window),
            ..Self::new_hidden(len)
        }
    }

    /// Creates a new SimStrip, but without generating a window.
    pub fn new_hidden(len: usize) -> Self {
        let display = SimulatorDisplay::new(Size::new(len as u32, 1));
        SimStrip {
            display,
            #[cfg(feature = "window")]
            window: None,
            pixels: vec![NeoPixelColor::default(); len],
        }
    }

    fn output_settings() -> OutputSettings {
        OutputSettingsBuilder::new().scale(20).pixel_spacing(2).build()
    }

    #[cfg(feature = "window")]
    fn update_window(&mut self) {
        if let Some(window) = &mut self.window {
            window.update(&self.display);
        }
    }

    #[cfg(not(feature = "window"))]
    fn update_window(&mut self) {}

    /// The display, as of the last flush.
    pub fn display(&self) -> &SimulatorDisplay<Rgb888> {
        &self.display
    }

    /// Flush to a screenshot instead of a window.
    pub fn screenshot(&mut self) -> OutputImage<Rgb888> {
        // Drawing on the simulator can't fail.
        let _ = render_strip(&self.pixels, &mut self.display);
        self.display.to_rgb_output_image(&Self::output_settings())
    }
}

impl Strip for SimStrip {
    fn data(&mut self) -> &mut [NeoPixelColor] {
        &mut self.pixels
    }

    fn flush(&mut self) -> Result<(), String> {
        render_strip(&self.pixels, &mut self.display).map_err(|e| format!("{e:?}"))?;
        self.update_window();
        Ok(())
    }
}
