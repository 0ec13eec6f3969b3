//! The board's fixed layout and colors.

use swob::{Station, DEFAULT_BASE_URL, SNOW_DEPTH};

use crate::gradient::{ColorStop, Gamma};
use crate::observe::FailurePolicy;
use crate::NeoPixelColor;

/// Station behind each LED, in strip order.
///
/// CXHM does not report snow, so its LED shows CTBF instead.
pub const STATIONS: [Station; 30] = [
    Station::from_code(b"CTZR"),
    Station::from_code(b"CXHA"),
    Station::from_code(b"CXRG"),
    Station::from_code(b"CWSN"),
    Station::from_code(b"CTBF"),
    Station::from_code(b"CTWL"),
    Station::from_code(b"CWNC"),
    Station::from_code(b"CTKG"),
    Station::from_code(b"CTBO"),
    Station::from_code(b"CXKE"),
    Station::from_code(b"CTCK"),
    Station::from_code(b"CWGD"),
    Station::from_code(b"CZEL"),
    Station::from_code(b"CTBF"),
    Station::from_code(b"CXTO"),
    Station::from_code(b"CTUX"),
    Station::from_code(b"CTPQ"),
    Station::from_code(b"CWRK"),
    Station::from_code(b"CTPM"),
    Station::from_code(b"CXOA"),
    Station::from_code(b"CTNK"),
    Station::from_code(b"CTZN"),
    Station::from_code(b"CTSB"),
    Station::from_code(b"COSM"),
    Station::from_code(b"CTZE"),
    Station::from_code(b"CTTR"),
    Station::from_code(b"CWLS"),
    Station::from_code(b"CXET"),
    Station::from_code(b"CTBT"),
    Station::from_code(b"CXPC"),
];

/// Shallow snow is pale yellow-green, deep snow is blue.
pub const GRADIENT: [ColorStop; 3] = [
    ColorStop::new(0.0, 0xedf8b1),
    ColorStop::new(0.5, 0x9ebcda),
    ColorStop::new(1.0, 0x0000ff),
];

pub const PALETTE_SIZE: usize = 50;

pub const GAMMA: Gamma = Gamma {
    exponent: 2.7,
    brightness: [0.25, 0.3, 0.15],
};

/// Shown from startup until a station's observation replaces it.
pub const STARTUP_COLOR: NeoPixelColor = [255, 0, 0, 0];

/// Settings for a run of the board.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct BoardSettings {
    /// One station per LED.
    pub stations: Vec<Station>,
    /// The SWOB-ML variable to display.
    pub variable: String,
    pub base_url: String,
    pub gradient: Vec<ColorStop>,
    pub palette_size: usize,
    pub gamma: Gamma,
    pub startup_color: NeoPixelColor,
    pub on_fetch_error: FailurePolicy,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            stations: STATIONS.to_vec(),
            variable: SNOW_DEPTH.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            gradient: GRADIENT.to_vec(),
            palette_size: PALETTE_SIZE,
            gamma: GAMMA,
            startup_color: STARTUP_COLOR,
            on_fetch_error: FailurePolicy::default(),
        }
    }
}
