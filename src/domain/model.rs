use crate::utils::error::Result;
use crate::utils::validation::{
    validate_at_least, validate_finite, validate_greater_than, validate_int_between, Validate,
};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 數值欄位，順序即為前處理器輸出的預設順序
pub const NUMERIC_COLUMNS: [&str; 10] = [
    "distance",
    "surge_multiplier",
    "hour",
    "temp",
    "clouds",
    "pressure",
    "humidity",
    "wind",
    "month",
    "day",
];

pub const CATEGORICAL_COLUMNS: [&str; 4] = ["cab_type", "source", "destination", "name"];

pub const HEALTH_MESSAGE: &str = "API is running";

/// One trip, as submitted to `POST /predict`.
///
/// Extra keys in the JSON body are ignored. Integers are kept signed so that
/// out-of-range values such as `-1` reach the range checks instead of failing
/// deserialization. Whole-number floats such as `14.0` are accepted for the
/// integer fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripFeatures {
    pub distance: f64,
    pub cab_type: String,
    pub source: String,
    pub destination: String,
    pub surge_multiplier: f64,
    pub name: String,
    #[serde(deserialize_with = "whole_number")]
    pub hour: i64,
    pub temp: f64,
    pub clouds: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub wind: f64,
    #[serde(deserialize_with = "whole_number")]
    pub month: i64,
    #[serde(deserialize_with = "whole_number")]
    pub day: i64,
}

/// 接受整數，或小數部分為 0 且落在 i64 範圍內的浮點數
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct WholeNumber;

    impl<'de> Visitor<'de> for WholeNumber {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<i64, E> {
            i64::try_from(value).map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<i64, E> {
            let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
            if value.is_finite() && value.fract() == 0.0 && in_range {
                Ok(value as i64)
            } else {
                Err(E::invalid_value(Unexpected::Float(value), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeNumber)
}

impl TripFeatures {
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let value = match column {
            "distance" => self.distance,
            "surge_multiplier" => self.surge_multiplier,
            "hour" => self.hour as f64,
            "temp" => self.temp,
            "clouds" => self.clouds,
            "pressure" => self.pressure,
            "humidity" => self.humidity,
            "wind" => self.wind,
            "month" => self.month as f64,
            "day" => self.day as f64,
            _ => return None,
        };
        Some(value)
    }

    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "cab_type" => Some(&self.cab_type),
            "source" => Some(&self.source),
            "destination" => Some(&self.destination),
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

impl Validate for TripFeatures {
    fn validate(&self) -> Result<()> {
        validate_greater_than("distance", self.distance, 0.0)?;
        validate_at_least("surge_multiplier", self.surge_multiplier, 1.0)?;
        validate_int_between("hour", self.hour, 0, 23)?;
        validate_int_between("month", self.month, 1, 12)?;
        validate_int_between("day", self.day, 1, 31)?;

        for (column, value) in [
            ("temp", self.temp),
            ("clouds", self.clouds),
            ("pressure", self.pressure),
            ("humidity", self.humidity),
            ("wind", self.wind),
        ] {
            validate_finite(column, value)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(rename = "Predicted Price")]
    pub predicted_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn running() -> Self {
        Self {
            status: HEALTH_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
