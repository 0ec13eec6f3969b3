//! Placing each observation within the batch's range.

use crate::{Error, Result};

/// The range of values observed in one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    /// The range of the present observations, if there are any.
    pub fn of(observations: &[Option<f64>]) -> Option<Span> {
        observations.iter().flatten().fold(None, |span, &v| {
            Some(match span {
                None => Span { min: v, max: v },
                Some(Span { min, max }) => Span {
                    min: min.min(v),
                    max: max.max(v),
                },
            })
        })
    }

    /// Where `v` sits in this range.
    ///
    /// The denominator is padded by one unit so the maximum lands below 1.0,
    /// off the top stop of the gradient, and a single-valued range doesn't
    /// divide by zero.
    pub fn position(&self, v: f64) -> f64 {
        (v - self.min) / ((self.max + 1.0) - self.min)
    }
}

/// Positions, in `[0, 1)`, of each present observation.
///
/// Absent observations stay absent. Fails if every observation is absent.
pub fn normalize(observations: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
    let span = Span::of(observations).ok_or(Error::NoObservations)?;
    tracing::info!("observed range: {} to {}", span.min, span.max);
    Ok(observations
        .iter()
        .map(|v| v.map(|v| span.position(v)))
        .collect())
}
