//! A snow-depth board.
//!
//! Drives a strip of RGBW NeoPixels, one per weather station, colored by each
//! station's latest snow depth relative to the others.
//!
//! # Building
//! The `hardware` feature requires:
//! - libclang, per [rs_ws281x](https://crates.io/crates/rs_ws281x)
//! - gcc-aarch64-linux-gnu for cross-compilation
//!
//! The `window` feature requires SDL2.

use swob::{ClientSettings, ObservationHour, Station, SwobClient};

pub mod clock;
pub mod config;
pub mod context;
pub mod drawing;
pub mod gradient;
pub mod network;
pub mod normalize;
pub mod observe;
pub mod render;
pub mod retry;

#[cfg(feature = "hardware")]
pub mod led_strip;

#[cfg(feature = "simulator")]
pub mod simulator;

use config::BoardSettings;
use context::Context;
use gradient::Palette;
use observe::{collect_observations, ObservationSource};

/// Alias for a color of NeoPixel: red, green, blue, white.
pub type NeoPixelColor = [u8; 4];

/// An error that ends a run of the board.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("station {station}: {source}")]
    Station {
        station: Station,
        #[source]
        source: swob::Error,
    },
    #[error("no station reported an observation")]
    NoObservations,
    #[error("strip has {buffer} pixels but there are {expected} stations")]
    LengthMismatch { expected: usize, buffer: usize },
    #[error("could not write to strip: {0}")]
    Strip(String),
    #[error("cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

/// A strip of LEDs.
/// In real hardware, this is a line of RGBW NeoPixels.
pub trait Strip {
    /// Access the data buffer.
    fn data(&mut self) -> &mut [NeoPixelColor];

    /// Flush the most recently-written data to the lights.
    fn flush(&mut self) -> std::result::Result<(), String>;
}

/// A strip that only lives in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryStrip {
    pub pixels: Vec<NeoPixelColor>,
    /// How many times the strip has been flushed.
    pub flushes: usize,
}

impl MemoryStrip {
    pub fn new(len: usize) -> Self {
        MemoryStrip {
            pixels: vec![NeoPixelColor::default(); len],
            flushes: 0,
        }
    }
}

impl Strip for MemoryStrip {
    fn data(&mut self) -> &mut [NeoPixelColor] {
        &mut self.pixels
    }

    fn flush(&mut self) -> std::result::Result<(), String> {
        self.flushes += 1;
        tracing::debug!("strip: {:?}", self.pixels);
        Ok(())
    }
}

/// What a run saw, per station.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub observations: Vec<Option<f64>>,
    pub positions: Vec<Option<f64>>,
}

/// The board: settings plus the palette built from them.
pub struct Board {
    settings: BoardSettings,
    palette: Palette,
}

impl From<BoardSettings> for Board {
    fn from(settings: BoardSettings) -> Self {
        let palette = Palette::expand(&settings.gradient, settings.palette_size);
        Board { settings, palette }
    }
}

impl Default for Board {
    fn default() -> Self {
        BoardSettings::default().into()
    }
}

impl Board {
    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Fill the strip with the startup color.
    pub fn show_startup(&self, strip: &mut impl Strip) -> Result<()> {
        strip.data().fill(self.settings.startup_color);
        strip.flush().map_err(Error::Strip)
    }

    /// A feed client for the configured base URL.
    pub fn client(&self) -> swob::Result<SwobClient> {
        SwobClient::new(ClientSettings::default().with_base_url(&self.settings.base_url))
    }

    /// Fetch every station's observation for the hour and color the strip.
    ///
    /// The strip is not cleared first: stations that report nothing keep
    /// whatever it showed, normally the [startup color](Board::show_startup).
    pub fn run(
        &self,
        ctx: &Context,
        source: &mut impl ObservationSource,
        strip: &mut impl Strip,
        hour: &ObservationHour,
    ) -> Result<Report> {
        let stations = &self.settings.stations;
        let pixels = strip.data().len();
        if pixels != stations.len() {
            return Err(Error::LengthMismatch {
                expected: stations.len(),
                buffer: pixels,
            });
        }

        tracing::info!("fetching {} stations for {}", stations.len(), hour);
        let observations = collect_observations(
            ctx,
            source,
            stations,
            hour,
            self.settings.on_fetch_error,
        )?;
        tracing::info!("observations: {:?}", observations);

        let positions = normalize::normalize(&observations)?;
        render::render(&positions, &self.palette, &self.settings.gamma, strip.data())?;
        strip.flush().map_err(Error::Strip)?;

        Ok(Report {
            observations,
            positions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STARTUP_COLOR;
    use crate::observe::{FailurePolicy, FakeSource};

    const A: Station = Station::from_code(b"AAAA");
    const B: Station = Station::from_code(b"BBBB");
    const C: Station = Station::from_code(b"CCCC");

    const HOUR: ObservationHour = ObservationHour {
        year: 2021,
        month: 1,
        day: 2,
        hour: 18,
    };

    fn board(stations: &[Station]) -> Board {
        BoardSettings {
            stations: stations.to_vec(),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn end_to_end() {
        let board = board(&[A, B, C]);
        let mut source = FakeSource::default()
            .with(A, Some(10.0))
            .with(B, Some(20.0));
        let mut strip = MemoryStrip::new(3);
        board.show_startup(&mut strip).expect("startup");

        let report = board
            .run(&Context::new(), &mut source, &mut strip, &HOUR)
            .expect("run should succeed");

        assert_eq!(report.observations, vec![Some(10.0), Some(20.0), None]);
        assert_eq!(report.positions, vec![Some(0.0), Some(10.0 / 11.0), None]);

        let gamma = &board.settings().gamma;
        assert_eq!(
            strip.pixels[0],
            render::color_at(0.0, board.palette(), gamma)
        );
        assert_eq!(
            strip.pixels[1],
            render::color_at(10.0 / 11.0, board.palette(), gamma)
        );
        assert_eq!(strip.pixels[2], STARTUP_COLOR);
        assert_ne!(strip.pixels[0], strip.pixels[1]);
        // Once at startup, once after rendering.
        assert_eq!(strip.flushes, 2);
    }

    #[test]
    fn all_absent_writes_no_colors() {
        let board = board(&[A, B, C]);
        let mut strip = MemoryStrip::new(3);
        board.show_startup(&mut strip).expect("startup");
        let err = board
            .run(&Context::new(), &mut FakeSource::default(), &mut strip, &HOUR)
            .expect_err("nothing observed");
        assert!(matches!(err, Error::NoObservations), "{err:?}");
        assert_eq!(strip.pixels, vec![STARTUP_COLOR; 3]);
        assert_eq!(strip.flushes, 1);
    }

    #[test]
    fn strip_must_match_stations() {
        let board = board(&[A, B, C]);
        let mut strip = MemoryStrip::new(2);
        let mut source = FakeSource::default().with(A, Some(1.0));
        let err = board
            .run(&Context::new(), &mut source, &mut strip, &HOUR)
            .expect_err("length mismatch");
        assert!(matches!(err, Error::LengthMismatch { expected: 3, buffer: 2 }), "{err:?}");
        assert!(source.asked.is_empty());
        assert_eq!(strip.flushes, 0);
    }

    #[test]
    fn failed_station_policy() {
        let mut settings = BoardSettings {
            stations: vec![A, B, C],
            ..Default::default()
        };
        let source = || {
            FakeSource::default()
                .with(A, Some(5.0))
                .failing(B, "MSNG")
                .with(C, Some(0.0))
        };

        let aborting = Board::from(settings.clone());
        let mut strip = MemoryStrip::new(3);
        aborting.show_startup(&mut strip).expect("startup");
        let err = aborting
            .run(&Context::new(), &mut source(), &mut strip, &HOUR)
            .expect_err("abort on B");
        assert!(matches!(err, Error::Station { station, .. } if station == B));
        assert_eq!(strip.pixels, vec![STARTUP_COLOR; 3]);

        settings.on_fetch_error = FailurePolicy::Skip;
        let skipping = Board::from(settings);
        let mut strip = MemoryStrip::new(3);
        skipping.show_startup(&mut strip).expect("startup");
        let report = skipping
            .run(&Context::new(), &mut source(), &mut strip, &HOUR)
            .expect("skip B");
        assert_eq!(report.positions, vec![Some(5.0 / 6.0), None, Some(0.0)]);
        assert_eq!(strip.pixels[1], STARTUP_COLOR);
    }

    #[test]
    fn run_keeps_what_the_strip_showed() {
        let board = board(&[A, B]);
        let mut strip = MemoryStrip::new(2);
        strip.pixels[1] = [1, 2, 3, 4];
        let mut source = FakeSource::default().with(A, Some(3.0));
        board
            .run(&Context::new(), &mut source, &mut strip, &HOUR)
            .expect("run should succeed");
        assert_eq!(strip.pixels[1], [1, 2, 3, 4]);
        assert_eq!(strip.flushes, 1);
    }

    #[test]
    fn client_uses_configured_feed() {
        let board = Board::from(BoardSettings {
            base_url: "http://localhost:8080/swob/".to_owned(),
            ..Default::default()
        });
        let client = board.client().expect("client");
        assert_eq!(client.base_url(), "http://localhost:8080/swob");
    }

    #[test]
    fn default_board() {
        let board = Board::default();
        assert_eq!(board.settings().stations.len(), 30);
        assert_eq!(board.palette().len(), config::PALETTE_SIZE);
    }
}
