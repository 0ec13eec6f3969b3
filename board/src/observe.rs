//! Types for gathering the run's observations.

use std::collections::HashMap;

use swob::{ObservationHour, Station, SwobClient};

use crate::context::Context;
use crate::{Error, Result};

/// A type that can report a station's latest value of a variable.
pub trait ObservationSource {
    /// The station's value for the hour, or `None` if it didn't report one.
    fn observe(&mut self, station: &Station, hour: &ObservationHour) -> swob::Result<Option<f64>>;
}

/// Observations from the SWOB-ML feed.
pub struct SwobSource {
    client: SwobClient,
    variable: String,
}

impl SwobSource {
    pub fn new(client: SwobClient, variable: impl Into<String>) -> Self {
        Self {
            client,
            variable: variable.into(),
        }
    }
}

impl ObservationSource for SwobSource {
    fn observe(&mut self, station: &Station, hour: &ObservationHour) -> swob::Result<Option<f64>> {
        self.client.fetch(station, hour)?.value_of(&self.variable)
    }
}

/// Fake observation source: reports the given values.
///
/// Stations without an entry report nothing. Each station's entry is
/// handed out every time it is asked for.
#[derive(Default)]
pub struct FakeSource {
    pub values: HashMap<Station, std::result::Result<Option<f64>, String>>,
    /// Every station asked for, in order.
    pub asked: Vec<Station>,
}

impl FakeSource {
    pub fn with(mut self, station: Station, value: Option<f64>) -> Self {
        self.values.insert(station, Ok(value));
        self
    }

    /// The station reports a malformed value.
    pub fn failing(mut self, station: Station, value: &str) -> Self {
        self.values.insert(station, Err(value.to_owned()));
        self
    }
}

impl ObservationSource for FakeSource {
    fn observe(&mut self, station: &Station, _hour: &ObservationHour) -> swob::Result<Option<f64>> {
        self.asked.push(*station);
        match self.values.get(station) {
            None => Ok(None),
            Some(Ok(v)) => Ok(*v),
            Some(Err(value)) => Err(swob::Error::InvalidValue {
                variable: "fake".to_owned(),
                value: value.clone(),
            }),
        }
    }
}

/// What to do when a station can't be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Stop the run.
    #[default]
    Abort,
    /// Treat the station as not reporting; its pixel is left alone.
    Skip,
}

/// Ask the source about each station in turn.
///
/// The result has one entry per station, in the same order.
pub fn collect_observations(
    ctx: &Context,
    source: &mut impl ObservationSource,
    stations: &[Station],
    hour: &ObservationHour,
    policy: FailurePolicy,
) -> Result<Vec<Option<f64>>> {
    let mut observations = Vec::with_capacity(stations.len());
    for station in stations {
        ctx.check()?;
        let v = match source.observe(station, hour) {
            Ok(v) => v,
            Err(e) => match policy {
                FailurePolicy::Abort => {
                    return Err(Error::Station {
                        station: *station,
                        source: e,
                    })
                }
                FailurePolicy::Skip => {
                    tracing::warn!("skipping {}: {}", station, e);
                    None
                }
            },
        };
        match v {
            Some(v) => tracing::info!("{}: {}", station, v),
            None => tracing::info!("{}: no observation", station),
        }
        observations.push(v);
    }
    Ok(observations)
}
