use crate::error::PrepError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How missing cells are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputeMethod {
    Mean,
    Median,
    Mode,
    Constant,
}

impl ImputeMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Constant => "constant",
        }
    }
}

impl FromStr for ImputeMethod {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            "constant" => Ok(Self::Constant),
            _ => Err(PrepError::UnknownMethod(format!("imputation method '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeMethod {
    OneHot,
    Ordinal,
}

impl FromStr for EncodeMethod {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "onehot" => Ok(Self::OneHot),
            "ordinal" => Ok(Self::Ordinal),
            _ => Err(PrepError::UnknownMethod(format!("encoding method '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMethod {
    MinMax,
    Standard,
}

impl FromStr for ScaleMethod {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minmax" => Ok(Self::MinMax),
            "standard" => Ok(Self::Standard),
            _ => Err(PrepError::UnknownMethod(format!("scaling method '{s}'"))),
        }
    }
}

/// Target type of a `change_dtype` coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetDtype {
    Int,
    Float,
    String,
    Bool,
    Datetime,
}

impl fmt::Display for TargetDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Datetime => "datetime",
        };
        f.write_str(name)
    }
}

impl FromStr for TargetDtype {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "int32" | "int64" | "integer" => Ok(Self::Int),
            "float" | "float32" | "float64" | "double" => Ok(Self::Float),
            "str" | "string" | "object" | "category" => Ok(Self::String),
            "bool" | "boolean" => Ok(Self::Bool),
            "datetime" | "datetime64" | "datetime64[ns]" | "date" => Ok(Self::Datetime),
            _ => Err(PrepError::UnknownMethod(format!("dtype '{s}'"))),
        }
    }
}

/// Row predicates for `filter`. Absent fields do not constrain.
///
/// Bounds and the equality value arrive as text and are compared
/// numerically when the column is numeric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub column: String,
    pub value: Option<String>,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    pub regex: Option<String>,
}

impl FilterSpec {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn equal_to(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn at_least(mut self, min: impl Into<String>) -> Self {
        self.min_value = Some(min.into());
        self
    }

    #[must_use]
    pub fn at_most(mut self, max: impl Into<String>) -> Self {
        self.max_value = Some(max.into());
        self
    }

    #[must_use]
    pub fn matching(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }
}
