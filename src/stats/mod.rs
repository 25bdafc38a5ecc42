//! Stats module - value-count aggregation for the charts

mod aggregator;

pub use aggregator::{
    value_counts, Aggregator, CylinderCountBar, DashboardSummary, YearFrequencyPoint,
};
