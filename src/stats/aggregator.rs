//! Aggregator Module
//! Derives the chart-ready summaries from the cleaned vehicle table.

use crate::config::DEFAULT_JITTER_RADIUS;
use crate::data::{CleanedDataset, CYLINDERS, MODEL_YEAR};
use polars::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One scatter point per distinct model year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearFrequencyPoint {
    pub model_year: f64,
    /// `model_year` plus a cosmetic offset, used only as the x-position.
    pub jittered_year: f64,
    pub frequency: usize,
}

/// One bar per distinct cylinder count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderCountBar {
    pub cylinders: f64,
    pub count: usize,
}

/// Both summaries from a single render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub year_points: Vec<YearFrequencyPoint>,
    pub cylinder_bars: Vec<CylinderCountBar>,
}

impl DashboardSummary {
    pub fn is_empty(&self) -> bool {
        self.year_points.is_empty() && self.cylinder_bars.is_empty()
    }
}

/// Counts occurrences of each distinct value, skipping nulls.
///
/// Ordered by descending count; equal counts keep ascending value order.
pub fn value_counts(column: &Column) -> PolarsResult<Vec<(f64, usize)>> {
    let series = column.as_materialized_series().drop_nulls();
    if series.is_empty() {
        return Ok(Vec::new());
    }

    let counted = series.value_counts(false, false, "count".into(), false)?;
    let values = counted
        .column(series.name().as_str())?
        .cast(&DataType::Float64)?;
    let counts = counted.column("count")?.cast(&DataType::UInt64)?;

    let mut pairs: Vec<(f64, usize)> = values
        .f64()?
        .into_iter()
        .zip(counts.u64()?.into_iter())
        .filter_map(|(value, count)| Some((value?, count? as usize)))
        .collect();

    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.total_cmp(&b.0)));
    Ok(pairs)
}

/// Computes the year-frequency and cylinder-count tables.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    jitter_radius: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_JITTER_RADIUS)
    }
}

impl Aggregator {
    /// Negative or non-finite radii are treated as zero.
    pub fn new(jitter_radius: f64) -> Self {
        let jitter_radius = if jitter_radius.is_finite() && jitter_radius > 0.0 {
            jitter_radius
        } else {
            0.0
        };
        Self { jitter_radius }
    }

    pub fn jitter_radius(&self) -> f64 {
        self.jitter_radius
    }

    /// Frequency per model year, each with a fresh uniform offset in
    /// `[-radius, radius]`.
    pub fn year_frequency<R: Rng + ?Sized>(
        &self,
        data: &CleanedDataset,
        rng: &mut R,
    ) -> PolarsResult<Vec<YearFrequencyPoint>> {
        let points = value_counts(data.column(MODEL_YEAR)?)?
            .into_iter()
            .map(|(model_year, frequency)| YearFrequencyPoint {
                model_year,
                jittered_year: model_year + self.jitter(rng),
                frequency,
            })
            .collect();
        Ok(points)
    }

    /// Number of vehicles per cylinder count.
    pub fn cylinder_counts(&self, data: &CleanedDataset) -> PolarsResult<Vec<CylinderCountBar>> {
        let bars = value_counts(data.column(CYLINDERS)?)?
            .into_iter()
            .map(|(cylinders, count)| CylinderCountBar { cylinders, count })
            .collect();
        Ok(bars)
    }

    pub fn summarize<R: Rng + ?Sized>(
        &self,
        data: &CleanedDataset,
        rng: &mut R,
    ) -> PolarsResult<DashboardSummary> {
        let summary = DashboardSummary {
            year_points: self.year_frequency(data, rng)?,
            cylinder_bars: self.cylinder_counts(data)?,
        };
        log::debug!(
            "Aggregated {} records into {} year points and {} cylinder bars",
            data.len(),
            summary.year_points.len(),
            summary.cylinder_bars.len()
        );
        Ok(summary)
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.jitter_radius == 0.0 {
            return 0.0;
        }
        rng.gen_range(-self.jitter_radius..=self.jitter_radius)
    }
}
