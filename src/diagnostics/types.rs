use serde::ser::{Serialize, SerializeMap as _, Serializer};

/// Buckets in a numeric column's histogram.
pub const HISTOGRAM_BINS: usize = 20;

/// Distinct values listed for a non-numeric column.
pub const TOP_VALUES: usize = 20;

/// Data-quality scores, each a fraction in `0..=1`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DataIssues {
    pub missing: f64,
    /// Share of rows holding the most frequent value, missing included
    pub constant: f64,
    /// Distinct present values per row
    pub high_cardinality: f64,
    /// Share of present values beyond 3 standard deviations; `None` for
    /// non-numeric columns
    pub outlier: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Histogram {
    pub bin_edges: Vec<f64>,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NumericProfile {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub histogram: Histogram,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CategoricalProfile {
    pub top: Option<String>,
    pub freq: usize,
    pub value_counts: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Profile {
    Numeric(NumericProfile),
    Categorical(CategoricalProfile),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ColumnDiagnostic {
    #[serde(skip)]
    pub name: String,
    /// Present (non-missing) cells
    pub count: usize,
    pub missing_pct: f64,
    /// Distinct present values
    pub unique: usize,
    #[serde(flatten)]
    pub profile: Profile,
    pub data_issues: DataIssues,
    pub recommendations: Vec<String>,
}

impl ColumnDiagnostic {
    pub fn numeric(&self) -> Option<&NumericProfile> {
        match &self.profile {
            Profile::Numeric(profile) => Some(profile),
            Profile::Categorical(_) => None,
        }
    }

    pub fn categorical(&self) -> Option<&CategoricalProfile> {
        match &self.profile {
            Profile::Categorical(profile) => Some(profile),
            Profile::Numeric(_) => None,
        }
    }
}

/// Diagnostics of every column, in table order.
///
/// Serializes as a JSON object keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticsReport {
    columns: Vec<ColumnDiagnostic>,
}

impl DiagnosticsReport {
    pub fn new(columns: Vec<ColumnDiagnostic>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDiagnostic> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[ColumnDiagnostic] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for DiagnosticsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(&column.name, column)?;
        }
        map.end()
    }
}
