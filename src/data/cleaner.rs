//! Data Cleaner Module
//! Missing-value imputation for the vehicle listings table.

use super::loader::{CYLINDERS, MODEL, MODEL_YEAR, ODOMETER, PAINT_COLOR};
use crate::config::DEFAULT_UNKNOWN_COLOR;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{column}' has no observed values to impute from")]
    NoObservedValues { column: String },
}

/// Produces the replacement value for a column from its observed values.
pub trait FillStrategy {
    fn fill_value(&self, observed: &[f64]) -> Option<f64>;
}

/// Median of the observed values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianFill;

impl FillStrategy for MedianFill {
    fn fill_value(&self, observed: &[f64]) -> Option<f64> {
        let n = observed.len();
        if n == 0 {
            return None;
        }

        let mut sorted = observed.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        Some(median)
    }
}

/// Where the fill value for `cylinders` and `odometer` comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationScope {
    /// One value computed over the whole column.
    #[default]
    Global,
    /// One value per `model`, falling back to the global value for models
    /// without observations.
    PerModel,
}

/// Vehicle table with no missing values in the imputed columns.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    df: DataFrame,
}

impl CleanedDataset {
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column(&self, name: &str) -> PolarsResult<&Column> {
        self.df.column(name)
    }

    pub fn model_years(&self) -> Vec<f64> {
        self.numeric(MODEL_YEAR)
    }

    pub fn cylinders(&self) -> Vec<f64> {
        self.numeric(CYLINDERS)
    }

    pub fn odometer(&self) -> Vec<f64> {
        self.numeric(ODOMETER)
    }

    pub fn paint_colors(&self) -> Vec<String> {
        match self.df.column(PAINT_COLOR).and_then(|col| col.str()) {
            Ok(ca) => ca.into_iter().flatten().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn numeric(&self, column: &str) -> Vec<f64> {
        match self.df.column(column).and_then(|col| col.f64()) {
            Ok(ca) => ca.into_iter().flatten().collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Fills missing values in a schema-coerced vehicle table.
pub struct DataCleaner<S: FillStrategy = MedianFill> {
    strategy: S,
    scope: ImputationScope,
    unknown_label: String,
}

impl Default for DataCleaner<MedianFill> {
    fn default() -> Self {
        Self::new(MedianFill)
    }
}

impl<S: FillStrategy> DataCleaner<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            scope: ImputationScope::Global,
            unknown_label: DEFAULT_UNKNOWN_COLOR.to_string(),
        }
    }

    pub fn with_scope(mut self, scope: ImputationScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_unknown_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_label = label.into();
        self
    }

    /// Apply all imputation rules.
    ///
    /// Expects numeric columns as `Float64` and text columns as `String`,
    /// as produced by `DataLoader::coerce_schema`.
    pub fn clean(&self, mut df: DataFrame) -> Result<CleanedDataset, CleanerError> {
        self.fill_global(&mut df, MODEL_YEAR)?;

        for column in [CYLINDERS, ODOMETER] {
            match self.scope {
                ImputationScope::Global => self.fill_global(&mut df, column)?,
                ImputationScope::PerModel => self.fill_per_model(&mut df, column)?,
            }
        }

        self.fill_unknown(&mut df)?;

        Ok(CleanedDataset { df })
    }

    fn fill_global(&self, df: &mut DataFrame, column: &str) -> Result<(), CleanerError> {
        let values: Vec<Option<f64>> = df.column(column)?.f64()?.into_iter().collect();
        if !values.iter().any(Option::is_none) {
            return Ok(());
        }

        let observed: Vec<f64> = values.iter().flatten().copied().collect();
        let fill = self
            .strategy
            .fill_value(&observed)
            .ok_or_else(|| CleanerError::NoObservedValues {
                column: column.to_string(),
            })?;

        let missing = values.len() - observed.len();
        let filled: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(fill)).collect();
        df.replace(column, Series::new(column.into(), filled))?;

        log::info!("Filled {} missing '{}' with {}", missing, column, fill);
        Ok(())
    }

    fn fill_per_model(&self, df: &mut DataFrame, column: &str) -> Result<(), CleanerError> {
        let values: Vec<Option<f64>> = df.column(column)?.f64()?.into_iter().collect();
        if !values.iter().any(Option::is_none) {
            return Ok(());
        }

        let models: Vec<Option<String>> = df
            .column(MODEL)?
            .str()?
            .into_iter()
            .map(|m| m.map(str::to_string))
            .collect();

        let mut observed_by_model: HashMap<&str, Vec<f64>> = HashMap::new();
        for (model, value) in models.iter().zip(values.iter()) {
            if let (Some(model), Some(value)) = (model, value) {
                observed_by_model.entry(model.as_str()).or_default().push(*value);
            }
        }

        let observed: Vec<f64> = values.iter().flatten().copied().collect();
        let global = self
            .strategy
            .fill_value(&observed)
            .ok_or_else(|| CleanerError::NoObservedValues {
                column: column.to_string(),
            })?;

        let group_fill: HashMap<&str, f64> = observed_by_model
            .iter()
            .filter_map(|(model, vals)| self.strategy.fill_value(vals).map(|f| (*model, f)))
            .collect();

        let filled: Vec<f64> = values
            .iter()
            .zip(models.iter())
            .map(|(value, model)| match value {
                Some(v) => *v,
                None => model
                    .as_deref()
                    .and_then(|m| group_fill.get(m).copied())
                    .unwrap_or(global),
            })
            .collect();
        df.replace(column, Series::new(column.into(), filled))?;

        log::info!(
            "Filled {} missing '{}' from {} model groups (global fallback {})",
            values.len() - observed.len(),
            column,
            group_fill.len(),
            global
        );
        Ok(())
    }

    fn fill_unknown(&self, df: &mut DataFrame) -> Result<(), CleanerError> {
        let colors = df.column(PAINT_COLOR)?.str()?;
        let missing = colors.null_count();
        if missing == 0 {
            return Ok(());
        }

        let filled: Vec<String> = colors
            .into_iter()
            .map(|c| c.unwrap_or(self.unknown_label.as_str()).to_string())
            .collect();
        df.replace(PAINT_COLOR, Series::new(PAINT_COLOR.into(), filled))?;

        log::info!(
            "Filled {} missing '{}' with '{}'",
            missing,
            PAINT_COLOR,
            self.unknown_label
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns the same value, so imputed cells are easy to spot.
    struct ConstantFill(f64);

    impl FillStrategy for ConstantFill {
        fn fill_value(&self, observed: &[f64]) -> Option<f64> {
            if observed.is_empty() {
                None
            } else {
                Some(self.0)
            }
        }
    }

    fn sample_df() -> DataFrame {
        df![
            MODEL => ["ford f-150", "ford f-150", "honda civic", "honda civic", "honda civic"],
            MODEL_YEAR => [Some(2010.0), None, Some(2014.0), Some(2012.0), None],
            CYLINDERS => [Some(8.0), None, Some(4.0), None, Some(4.0)],
            ODOMETER => [Some(120000.0), Some(90000.0), None, Some(30000.0), Some(50000.0)],
            PAINT_COLOR => [Some("white"), None, Some("blue"), None, Some("red")],
        ]
        .unwrap()
    }

    // ========================================================================
    // MedianFill tests
    // ========================================================================

    #[test]
    fn test_median_fill_odd() {
        assert_eq!(MedianFill.fill_value(&[5.0, 1.0, 3.0]), Some(3.0));
    }

    #[test]
    fn test_median_fill_even() {
        assert_eq!(MedianFill.fill_value(&[2010.0, 2011.0]), Some(2010.5));
    }

    #[test]
    fn test_median_fill_empty() {
        assert_eq!(MedianFill.fill_value(&[]), None);
    }

    // ========================================================================
    // clean() tests
    // ========================================================================

    #[test]
    fn test_clean_leaves_no_missing_values() {
        let cleaned = DataCleaner::new(MedianFill).clean(sample_df()).unwrap();
        let df = cleaned.dataframe();

        for column in [MODEL_YEAR, CYLINDERS, ODOMETER, PAINT_COLOR] {
            assert_eq!(df.column(column).unwrap().null_count(), 0, "{column}");
        }
        assert_eq!(cleaned.len(), 5);
    }

    #[test]
    fn test_clean_imputes_nan_cells_after_coercion() {
        let df = df![
            MODEL => ["a", "b", "c"],
            MODEL_YEAR => [2010.0, f64::NAN, 2012.0],
            CYLINDERS => [4.0, 4.0, 6.0],
            ODOMETER => [f64::NAN, 2000.0, 4000.0],
            PAINT_COLOR => ["red", "blue", "white"],
        ]
        .unwrap();
        let df = crate::data::DataLoader::coerce_schema(df).unwrap();

        let cleaned = DataCleaner::new(MedianFill).clean(df).unwrap();

        assert_eq!(cleaned.model_years(), vec![2010.0, 2011.0, 2012.0]);
        assert_eq!(cleaned.odometer(), vec![3000.0, 2000.0, 4000.0]);
    }

    #[test]
    fn test_clean_uses_global_median() {
        let cleaned = DataCleaner::new(MedianFill).clean(sample_df()).unwrap();

        // Median of [2010, 2014, 2012] = 2012
        assert_eq!(
            cleaned.model_years(),
            vec![2010.0, 2012.0, 2014.0, 2012.0, 2012.0]
        );
        // Median of [8, 4, 4] = 4, even for the ford row
        assert_eq!(cleaned.cylinders(), vec![8.0, 4.0, 4.0, 4.0, 4.0]);
        // Median of [120000, 90000, 30000, 50000] = 70000
        assert_eq!(cleaned.odometer()[2], 70000.0);
    }

    #[test]
    fn test_clean_with_stub_strategy() {
        let cleaned = DataCleaner::new(ConstantFill(-1.0)).clean(sample_df()).unwrap();

        assert_eq!(
            cleaned.model_years(),
            vec![2010.0, -1.0, 2014.0, 2012.0, -1.0]
        );
        assert_eq!(cleaned.cylinders(), vec![8.0, -1.0, 4.0, -1.0, 4.0]);
        assert_eq!(cleaned.odometer()[2], -1.0);
    }

    #[test]
    fn test_clean_fills_unknown_color() {
        let cleaned = DataCleaner::new(MedianFill).clean(sample_df()).unwrap();
        assert_eq!(
            cleaned.paint_colors(),
            vec!["white", "Unknown", "blue", "Unknown", "red"]
        );
    }

    #[test]
    fn test_clean_custom_unknown_label() {
        let cleaned = DataCleaner::new(MedianFill)
            .with_unknown_label("n/a")
            .clean(sample_df())
            .unwrap();
        assert_eq!(cleaned.paint_colors()[1], "n/a");
    }

    #[test]
    fn test_clean_per_model_scope() {
        let cleaned = DataCleaner::new(MedianFill)
            .with_scope(ImputationScope::PerModel)
            .clean(sample_df())
            .unwrap();

        // ford group median = 8, honda group median = 4
        assert_eq!(cleaned.cylinders(), vec![8.0, 8.0, 4.0, 4.0, 4.0]);
        // honda odometer median of [30000, 50000] = 40000
        assert_eq!(cleaned.odometer()[2], 40000.0);
        // model_year stays global
        assert_eq!(cleaned.model_years()[1], 2012.0);
    }

    #[test]
    fn test_clean_per_model_falls_back_to_global() {
        let df = df![
            MODEL => [Some("ram 1500"), Some("ram 1500"), Some("kia soul"), None],
            MODEL_YEAR => [2015.0, 2016.0, 2017.0, 2018.0],
            CYLINDERS => [Some(8.0), Some(6.0), None, None],
            ODOMETER => [1.0, 2.0, 3.0, 4.0],
            PAINT_COLOR => ["black", "black", "grey", "grey"],
        ]
        .unwrap();

        let cleaned = DataCleaner::new(MedianFill)
            .with_scope(ImputationScope::PerModel)
            .clean(df)
            .unwrap();

        // Neither kia soul nor the unnamed row has observations: global median 7
        assert_eq!(cleaned.cylinders(), vec![8.0, 6.0, 7.0, 7.0]);
    }

    #[test]
    fn test_clean_keeps_extra_columns() {
        let mut df = sample_df();
        df.with_column(Column::new("price".into(), [1i64, 2, 3, 4, 5]))
            .unwrap();

        let cleaned = DataCleaner::new(MedianFill).clean(df).unwrap();
        let price: Vec<i64> = cleaned
            .dataframe()
            .column("price")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(price, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_clean_empty_dataset() {
        let df = df![
            MODEL => Vec::<String>::new(),
            MODEL_YEAR => Vec::<f64>::new(),
            CYLINDERS => Vec::<f64>::new(),
            ODOMETER => Vec::<f64>::new(),
            PAINT_COLOR => Vec::<String>::new(),
        ]
        .unwrap();

        let cleaned = DataCleaner::new(MedianFill).clean(df).unwrap();
        assert!(cleaned.is_empty());
        assert!(cleaned.model_years().is_empty());
    }

    #[test]
    fn test_clean_all_missing_column_errors() {
        let df = df![
            MODEL => ["a", "b"],
            MODEL_YEAR => [2010.0, 2011.0],
            CYLINDERS => [Option::<f64>::None, None],
            ODOMETER => [1.0, 2.0],
            PAINT_COLOR => ["red", "blue"],
        ]
        .unwrap();

        let err = DataCleaner::new(MedianFill).clean(df).unwrap_err();
        match err {
            CleanerError::NoObservedValues { column } => assert_eq!(column, CYLINDERS),
            other => panic!("unexpected error: {other}"),
        }
    }
}
