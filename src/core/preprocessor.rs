use crate::domain::model::{TripFeatures, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};
use crate::utils::error::{Result, TripPriceError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Column transformer fitted at training time.
///
/// The output row is every numeric column (standardized) in listed order,
/// followed by one one-hot block per categorical column in listed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    #[serde(default)]
    pub numeric: Vec<NumericColumn>,
    #[serde(default)]
    pub categorical: Vec<CategoricalColumn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericColumn {
    pub column: String,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub column: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    #[default]
    Ignore,
    Error,
}

fn default_scale() -> f64 {
    1.0
}

impl NumericColumn {
    fn apply(&self, value: f64) -> f64 {
        // 與 StandardScaler 相同：標準差為 0 的欄位不做縮放
        let scale = if self.scale == 0.0 { 1.0 } else { self.scale };
        (value - self.mean) / scale
    }
}

impl CategoricalColumn {
    fn encode_into(&self, value: &str, row: &mut Vec<f64>) -> Result<()> {
        let position = self.categories.iter().position(|c| c == value);
        if position.is_none() && self.handle_unknown == HandleUnknown::Error {
            return Err(TripPriceError::UnknownCategoryError {
                column: self.column.clone(),
                value: value.to_string(),
            });
        }

        row.extend((0..self.categories.len()).map(|i| {
            if Some(i) == position {
                1.0
            } else {
                0.0
            }
        }));
        Ok(())
    }
}

impl Preprocessor {
    pub fn output_width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>()
    }

    pub fn transform(&self, trip: &TripFeatures) -> Result<Vec<f64>> {
        let mut row = Vec::with_capacity(self.output_width());

        for column in &self.numeric {
            let value = trip
                .numeric(&column.column)
                .ok_or_else(|| unknown_column(&column.column))?;
            row.push(column.apply(value));
        }

        for column in &self.categorical {
            let value = trip
                .categorical(&column.column)
                .ok_or_else(|| unknown_column(&column.column))?;
            column.encode_into(value, &mut row)?;
        }

        Ok(row)
    }

    /// Structural checks run once at load time; `transform` relies on them.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.numeric.is_empty() && self.categorical.is_empty() {
            return Err("preprocessor has no columns".to_string());
        }

        let mut seen = HashSet::new();

        for column in &self.numeric {
            if !NUMERIC_COLUMNS.contains(&column.column.as_str()) {
                return Err(format!("'{}' is not a numeric trip field", column.column));
            }
            if !seen.insert(column.column.as_str()) {
                return Err(format!("column '{}' is listed twice", column.column));
            }
            if !column.mean.is_finite() || !column.scale.is_finite() {
                return Err(format!(
                    "column '{}' has a non-finite mean or scale",
                    column.column
                ));
            }
        }

        for column in &self.categorical {
            if !CATEGORICAL_COLUMNS.contains(&column.column.as_str()) {
                return Err(format!(
                    "'{}' is not a categorical trip field",
                    column.column
                ));
            }
            if !seen.insert(column.column.as_str()) {
                return Err(format!("column '{}' is listed twice", column.column));
            }
            if column.categories.is_empty() {
                return Err(format!("column '{}' has no categories", column.column));
            }
            let unique: HashSet<&str> = column.categories.iter().map(String::as_str).collect();
            if unique.len() != column.categories.len() {
                return Err(format!(
                    "column '{}' has duplicate categories",
                    column.column
                ));
            }
        }

        Ok(())
    }
}

fn unknown_column(column: &str) -> TripPriceError {
    TripPriceError::InferenceError {
        message: format!("preprocessor references unknown column '{}'", column),
    }
}
