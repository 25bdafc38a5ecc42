//! CSV Data Loader Module
//! Reads the vehicle listings file with Polars and enforces the expected schema.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MODEL: &str = "model";
pub const MODEL_YEAR: &str = "model_year";
pub const CYLINDERS: &str = "cylinders";
pub const ODOMETER: &str = "odometer";
pub const PAINT_COLOR: &str = "paint_color";

/// Columns every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [MODEL, MODEL_YEAR, CYLINDERS, ODOMETER, PAINT_COLOR];

/// Columns coerced to `Float64` before imputation.
pub const NUMERIC_COLUMNS: [&str; 3] = [MODEL_YEAR, CYLINDERS, ODOMETER];

/// Columns coerced to `String`.
pub const TEXT_COLUMNS: [&str; 2] = [MODEL, PAINT_COLOR];

/// Cell values read as missing in every column, besides empty cells.
pub const NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Malformed data: required column '{0}' is missing")]
    MissingColumn(String),
    #[error("Malformed data: column '{column}' is not numeric ({source})")]
    NonNumeric {
        column: String,
        #[source]
        source: PolarsError,
    },
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file and coerce the required columns to their working types.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::FileNotFound(file_path.to_path_buf()));
        }

        let null_values = NULL_MARKERS.iter().map(|&m| PlSmallStr::from(m)).collect();

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_null_values(Some(NullValues::AllColumns(null_values)))
            .finish()?
            .collect()?;

        log::info!(
            "Read {} rows, {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        Self::coerce_schema(df)
    }

    /// Check required columns and cast them.
    ///
    /// Numeric columns use a strict cast so that text which cannot be read as a
    /// number is reported instead of silently turning into nulls. Float `NaN`
    /// cells become nulls so that imputation treats them as missing.
    pub fn coerce_schema(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|&&required| !names.iter().any(|n| n.as_str() == required))
        {
            return Err(LoaderError::MissingColumn(missing.to_string()));
        }

        for name in NUMERIC_COLUMNS {
            let series = df.column(name)?.as_materialized_series().clone();
            let cast = series
                .strict_cast(&DataType::Float64)
                .map_err(|source| LoaderError::NonNumeric {
                    column: name.to_string(),
                    source,
                })?;
            let without_nan: Float64Chunked = cast
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();
            df.replace(name, without_nan.with_name(name.into()).into_series())?;
        }

        for name in TEXT_COLUMNS {
            let series = df.column(name)?.as_materialized_series().clone();
            let cast = series.cast(&DataType::String)?;
            df.replace(name, cast)?;
        }

        Ok(df)
    }

    /// Count missing cells per required column, for logging.
    pub fn null_counts(df: &DataFrame) -> Vec<(&'static str, usize)> {
        REQUIRED_COLUMNS
            .iter()
            .filter_map(|&name| df.column(name).ok().map(|c| (name, c.null_count())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv_coerces_types() {
        let file = write_csv(
            "price,model,model_year,cylinders,odometer,paint_color\n\
             9400,bmw x5,2011,6,145000,\n\
             25500,ford f-150,,6,88705,white\n\
             5500,hyundai sonata,2013,4,,red\n",
        );

        let df = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.column(MODEL_YEAR).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(CYLINDERS).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(ODOMETER).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(PAINT_COLOR).unwrap().dtype(), &DataType::String);
        assert_eq!(df.column(MODEL_YEAR).unwrap().null_count(), 1);
        assert_eq!(df.column(PAINT_COLOR).unwrap().null_count(), 1);
        // Extra columns pass through.
        assert!(df.column("price").is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_required_column() {
        let file = write_csv("model,model_year,cylinders,odometer\nbmw x5,2011,6,145000\n");
        let err = DataLoader::load_csv(file.path()).unwrap_err();
        match err {
            LoaderError::MissingColumn(name) => assert_eq!(name, "paint_color"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_column() {
        let file = write_csv(
            "model,model_year,cylinders,odometer,paint_color\n\
             bmw x5,2011,six,145000,black\n",
        );
        let err = DataLoader::load_csv(file.path()).unwrap_err();
        match err {
            LoaderError::NonNumeric { column, .. } => assert_eq!(column, "cylinders"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_markers_read_as_missing() {
        let file = write_csv(
            "model,model_year,cylinders,odometer,paint_color\n\
             bmw x5,2011,4,145000,black\n\
             ford f-150,NaN,NA,null,N/A\n\
             kia soul,2013,4,nan,red\n",
        );

        let df = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(df.column(MODEL_YEAR).unwrap().null_count(), 1);
        assert_eq!(df.column(CYLINDERS).unwrap().null_count(), 1);
        assert_eq!(df.column(ODOMETER).unwrap().null_count(), 2);
        assert_eq!(df.column(PAINT_COLOR).unwrap().null_count(), 1);
    }

    #[test]
    fn test_coerce_schema_turns_nan_into_null() {
        let df = df![
            MODEL => ["a", "b", "c"],
            MODEL_YEAR => [2010.0, f64::NAN, 2012.0],
            CYLINDERS => [4.0, 6.0, f64::NAN],
            ODOMETER => [1.0, 2.0, 3.0],
            PAINT_COLOR => ["red", "blue", "white"],
        ]
        .unwrap();

        let df = DataLoader::coerce_schema(df).unwrap();

        let years: Vec<Option<f64>> = df
            .column(MODEL_YEAR)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(2010.0), None, Some(2012.0)]);
        assert_eq!(df.column(CYLINDERS).unwrap().null_count(), 1);
    }

    #[test]
    fn test_header_only_file_is_empty_not_error() {
        let file = write_csv("model,model_year,cylinders,odometer,paint_color\n");
        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn test_null_counts() {
        let df = df![
            MODEL => ["a", "b"],
            MODEL_YEAR => [Some(2010.0), None],
            CYLINDERS => [Option::<f64>::None, None],
            ODOMETER => [Some(1.0), Some(2.0)],
            PAINT_COLOR => [Some("red"), None],
        ]
        .unwrap();

        let counts = DataLoader::null_counts(&df);
        assert_eq!(
            counts,
            vec![
                (MODEL, 0),
                (MODEL_YEAR, 1),
                (CYLINDERS, 2),
                (ODOMETER, 0),
                (PAINT_COLOR, 1)
            ]
        );
    }
}
