//! Client for the Meteorological Service of Canada SWOB-ML observation feed.
//!
//! The feed publishes one XML document per station per hour at
//! `<base>/<YYYYMMDD>/<STATION>/<YYYY>-<MM>-<DD>-<HH>00-<STATION>-AUTO-swob.xml`.
//! Each observed variable is an `element` whose attributes are, in order,
//! `name`, `uom`, and `value`:
//!
//! ```xml
//! <element name="avg_snw_dpth_pst5mts" uom="cm" value="212"/>
//! ```
//!
//! See [the datamart notes](https://dd.weather.gc.ca/observations/doc/) for the
//! full list of variables.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Datelike, Timelike, Utc};
use reqwest::StatusCode;

pub mod extract;
pub mod tokens;

pub use extract::extract;
pub use tokens::{Token, Tokens};

/// Where the datamart keeps SWOB-ML documents.
pub const DEFAULT_BASE_URL: &str = "https://dd.weather.gc.ca/observations/swob-ml";

/// Average snow depth over the past five minutes, in centimeters.
pub const SNOW_DEPTH: &str = "avg_snw_dpth_pst5mts";

/// An error in fetching or interpreting a SWOB-ML document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("malformed XML attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("{variable} is not followed by a value")]
    MissingValue { variable: String },
    #[error("{variable} has non-numeric value {value:?}")]
    InvalidValue { variable: String, value: String },
    #[error("invalid station code {0:?}: expected four ASCII letters or digits")]
    InvalidStation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A weather station, identified by its four-character code (e.g. `CXRG`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Station([u8; 4]);

impl Station {
    /// Station from a code known at compile time.
    ///
    /// Panics (at compile time, in a const context) if the code is not
    /// ASCII alphanumeric.
    pub const fn from_code(code: &[u8; 4]) -> Self {
        let mut i = 0;
        while i < code.len() {
            assert!(code[i].is_ascii_alphanumeric());
            i += 1;
        }
        Station(*code)
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII gets in.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl FromStr for Station {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        match <[u8; 4]>::try_from(bytes) {
            Ok(code) if code.iter().all(u8::is_ascii_alphanumeric) => {
                Ok(Station(code.map(|b| b.to_ascii_uppercase())))
            }
            _ => Err(Error::InvalidStation(s.to_owned())),
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({})", self.as_str())
    }
}

/// The UTC hour whose observations to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObservationHour {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl From<DateTime<Utc>> for ObservationHour {
    fn from(t: DateTime<Utc>) -> Self {
        ObservationHour {
            year: t.year(),
            month: t.month(),
            day: t.day(),
            hour: t.hour(),
        }
    }
}

impl ObservationHour {
    /// Path of this hour's document for the station, relative to the feed base.
    pub fn path(&self, station: &Station) -> String {
        let Self {
            year,
            month,
            day,
            hour,
        } = *self;
        format!(
            "{year:04}{month:02}{day:02}/{station}/{year:04}-{month:02}-{day:02}-{hour:02}00-{station}-AUTO-swob.xml"
        )
    }
}

impl fmt::Display for ObservationHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:00 UTC",
            self.year, self.month, self.day, self.hour
        )
    }
}

/// Settings when creating a [`SwobClient`].
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct ClientSettings {
    /// Root of the SWOB-ML tree. A trailing slash is tolerated.
    pub base_url: String,
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    /// Time allowed for a whole request, including the body.
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// A fetched SWOB-ML document.
#[derive(Debug, Clone)]
pub struct Document {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Document {
    /// Extract the latest value of the named variable from this document.
    pub fn value_of(&self, variable: &str) -> Result<Option<f64>> {
        extract(Tokens::new(&self.body), variable)
    }
}

/// Handle to the SWOB-ML feed.
pub struct SwobClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl SwobClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .user_agent(concat!("snowboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Client)?;
        let base_url = settings.base_url.trim_end_matches('/').to_owned();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the station's document for the given hour.
    pub fn url(&self, station: &Station, hour: &ObservationHour) -> String {
        format!("{}/{}", self.base_url, hour.path(station))
    }

    /// Fetch the station's document for the given hour.
    ///
    /// Anything other than `200 OK` is an error.
    pub fn fetch(&self, station: &Station, hour: &ObservationHour) -> Result<Document> {
        let url = self.url(station, hour);
        tracing::info!("fetching obs from {}", url);
        let response = self.client.get(&url).send().map_err(|source| Error::Http {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = response.text().map_err(|source| Error::Http {
            url: url.clone(),
            source,
        })?;
        tracing::debug!("{} returned {} bytes", url, body.len());
        Ok(Document {
            url,
            status: status.as_u16(),
            body,
        })
    }

    /// Check that the feed is reachable at all.
    ///
    /// Any HTTP response counts; only transport errors fail.
    pub fn probe(&self) -> Result<()> {
        let url = format!("{}/", self.base_url);
        let response = self.client.head(&url).send().map_err(|source| Error::Http {
            url: url.clone(),
            source,
        })?;
        tracing::debug!("probe of {} returned {}", url, response.status());
        Ok(())
    }
}
