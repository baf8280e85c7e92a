//! Experiment datasets and outcome classification
//!
//! This module wraps the externally produced experiment table and outcome map
//! into a [`Dataset`]: a column-oriented input matrix ([`Experiments`]), one
//! outcome vector `y`, and the analysis [`Mode`].
//!
//! # Column Types
//!
//! Every input dimension is either numeric or categorical:
//!
//! - **Numeric**: real-valued parameters (`[0.5, 1.2, ...]`)
//! - **Categorical**: finite label sets (`["low", "high", ...]`), stored as the
//!   sorted distinct categories plus one category code per row
//!
//! Raw values arriving from JSON are typed with [`RawValue`]. A column mixing
//! numbers and labels, or containing nulls, has no well-defined type and is
//! rejected with [`DatasetError::UnsupportedColumnType`].
//!
//! # Example
//!
//! ```
//! use scendisc_analysis::dataset::{Classifier, Column, Dataset, Experiments, Mode, Outcomes};
//!
//! let experiments = Experiments::new([
//!     ("x".to_owned(), Column::numeric(vec![0.0, 5.0, 10.0])),
//!     ("policy".to_owned(), Column::categorical(["a", "b", "a"])),
//! ])
//! .unwrap();
//! let outcomes = Outcomes::from_iter([("y".to_owned(), vec![0.2, 0.9, 0.4])]);
//!
//! let classifier = Classifier::rule(|outcomes: &Outcomes| {
//!     outcomes["y"].iter().map(|y| *y > 0.5).collect()
//! });
//! let dataset = Dataset::setup(experiments, &outcomes, classifier, &[] as &[&str]).unwrap();
//! assert_eq!(dataset.mode(), Mode::Binary);
//! assert_eq!(dataset.y(), &[0.0, 1.0, 0.0]);
//! ```

use std::{collections::BTreeSet, fmt};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Outcome vectors keyed by outcome name, in insertion order.
pub type Outcomes = IndexMap<String, Vec<f64>>;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("column '{name}' is neither numeric nor categorical")]
    UnsupportedColumnType { name: String },
    #[display("column '{name}' has {len} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        len: usize,
        expected: usize,
    },
    #[display("unknown outcome '{name}'")]
    UnknownOutcome { name: String },
    #[display("unknown dimension '{name}'")]
    UnknownDimension { name: String },
    #[display("outcome vector has {len} entries, but the experiments have {rows} rows")]
    LengthMismatch { len: usize, rows: usize },
}

/// Analysis mode, determined by how the outcome vector was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// `y` holds the raw values of one outcome.
    Regression,
    /// `y` holds 1.0 for cases of interest and 0.0 otherwise.
    Binary,
    /// `y` holds class codes supplied by the caller.
    Classification,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Regression => "regression",
            Mode::Binary => "binary",
            Mode::Classification => "classification",
        };
        fmt::Display::fmt(s, f)
    }
}

/// A single raw cell value as found in serialized experiment tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Flag(bool),
    Label(String),
    Missing,
}

/// A categorical column: sorted distinct categories and a code per row.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalColumn {
    categories: Vec<String>,
    codes: Vec<usize>,
}

impl CategoricalColumn {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels = labels.into_iter().map(Into::into).collect::<Vec<String>>();
        let categories = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        let codes = labels
            .iter()
            .map(|label| {
                // every label is present in `categories` by construction
                categories.binary_search(label).unwrap_or_default()
            })
            .collect();
        Self { categories, codes }
    }

    /// Sorted distinct categories.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Index into [`categories`](Self::categories) for each row.
    #[must_use]
    pub fn codes(&self) -> &[usize] {
        &self.codes
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.codes.iter().map(|code| self.categories[*code].as_str())
    }
}

/// One input dimension's values over all experiments.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(CategoricalColumn),
}

impl Column {
    #[must_use]
    pub fn numeric(values: Vec<f64>) -> Self {
        Column::Numeric(values)
    }

    pub fn categorical<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Column::Categorical(CategoricalColumn::from_labels(labels))
    }

    /// Types a raw column.
    ///
    /// All numbers make a numeric column; all labels (booleans included, as
    /// `"true"`/`"false"`) make a categorical column. An empty column is numeric.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnsupportedColumnType`] for nulls or mixed columns.
    pub fn from_raw(name: &str, values: Vec<RawValue>) -> Result<Self, DatasetError> {
        let unsupported = || DatasetError::UnsupportedColumnType {
            name: name.to_owned(),
        };

        if values.iter().all(|v| matches!(v, RawValue::Number(_))) {
            let numbers = values
                .into_iter()
                .filter_map(|v| match v {
                    RawValue::Number(n) => Some(n),
                    _ => None,
                })
                .collect();
            return Ok(Column::Numeric(numbers));
        }

        let labels = values
            .into_iter()
            .map(|v| match v {
                RawValue::Label(s) => Ok(s),
                RawValue::Flag(b) => Ok(b.to_string()),
                RawValue::Number(_) | RawValue::Missing => Err(unsupported()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Column::categorical(labels))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(column) => column.codes.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The experiment input matrix: named columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiments {
    columns: IndexMap<String, Column>,
    rows: usize,
}

impl Experiments {
    /// Builds an experiment table from named columns.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::RaggedColumn`] if the columns differ in length.
    pub fn new<I>(columns: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (String, Column)>,
    {
        let columns = columns.into_iter().collect::<IndexMap<_, _>>();
        let rows = columns.values().next().map_or(0, Column::len);
        if let Some((name, column)) = columns.iter().find(|(_, c)| c.len() != rows) {
            return Err(DatasetError::RaggedColumn {
                name: name.clone(),
                len: column.len(),
                expected: rows,
            });
        }
        Ok(Self { columns, rows })
    }

    /// Builds an experiment table from raw serialized columns.
    ///
    /// # Errors
    ///
    /// Returns an error if a column cannot be typed or the columns differ in length.
    pub fn from_raw<I>(columns: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (String, Vec<RawValue>)>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, values)| {
                let column = Column::from_raw(&name, values)?;
                Ok((name, column))
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;
        Self::new(columns)
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.columns.iter().map(|(name, column)| (name.as_str(), column))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn num_dims(&self) -> usize {
        self.columns.len()
    }

    /// Keeps only the named dimensions, in their original column order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnknownDimension`] if a name is not a column.
    pub fn select<S>(mut self, names: &[S]) -> Result<Self, DatasetError>
    where
        S: AsRef<str>,
    {
        if let Some(missing) = names
            .iter()
            .map(AsRef::as_ref)
            .find(|name| !self.columns.contains_key(*name))
        {
            return Err(DatasetError::UnknownDimension {
                name: missing.to_owned(),
            });
        }
        self.columns
            .retain(|name, _| names.iter().any(|n| n.as_ref() == name));
        Ok(self)
    }
}

/// How the outcome vector of interest is derived from the outcome map.
pub enum Classifier<'a> {
    /// Use the raw values of a named outcome (regression mode).
    Outcome(String),
    /// Map the outcomes to a boolean vector of cases of interest (binary mode).
    Rule(Box<dyn Fn(&Outcomes) -> Vec<bool> + 'a>),
}

impl<'a> Classifier<'a> {
    pub fn outcome<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Classifier::Outcome(name.into())
    }

    pub fn rule<F>(f: F) -> Self
    where
        F: Fn(&Outcomes) -> Vec<bool> + 'a,
    {
        Classifier::Rule(Box::new(f))
    }
}

impl fmt::Debug for Classifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classifier::Outcome(name) => f.debug_tuple("Outcome").field(name).finish(),
            Classifier::Rule(_) => f.debug_tuple("Rule").finish_non_exhaustive(),
        }
    }
}

/// Experiments paired with the outcome vector under analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Experiments,
    y: Vec<f64>,
    mode: Mode,
}

impl Dataset {
    /// Wraps experiments and an already derived outcome vector.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::LengthMismatch`] if `y` does not have one entry per row.
    pub fn new(x: Experiments, y: Vec<f64>, mode: Mode) -> Result<Self, DatasetError> {
        if y.len() != x.rows() {
            return Err(DatasetError::LengthMismatch {
                len: y.len(),
                rows: x.rows(),
            });
        }
        Ok(Self { x, y, mode })
    }

    /// Sets up a dataset for box analysis.
    ///
    /// When `include` is non-empty, every other dimension is dropped. The
    /// classifier selects the mode: a named outcome gives regression mode, a
    /// rule gives binary mode with `y` set to 1.0 for cases of interest.
    ///
    /// # Errors
    ///
    /// Returns an error if an included dimension or the named outcome does not
    /// exist, or if the outcome vector length differs from the row count.
    pub fn setup<S>(
        x: Experiments,
        outcomes: &Outcomes,
        classifier: Classifier<'_>,
        include: &[S],
    ) -> Result<Self, DatasetError>
    where
        S: AsRef<str>,
    {
        let x = if include.is_empty() {
            x
        } else {
            x.select(include)?
        };

        let (y, mode) = match classifier {
            Classifier::Outcome(name) => {
                let y = outcomes
                    .get(&name)
                    .cloned()
                    .ok_or(DatasetError::UnknownOutcome { name })?;
                (y, Mode::Regression)
            }
            Classifier::Rule(rule) => {
                let y = rule(outcomes)
                    .into_iter()
                    .map(|hit| if hit { 1.0 } else { 0.0 })
                    .collect();
                (y, Mode::Binary)
            }
        };
        Self::new(x, y, mode)
    }

    /// Wraps experiments with caller supplied class codes (classification mode).
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::LengthMismatch`] if `classes` does not have one entry per row.
    #[expect(clippy::cast_precision_loss)]
    pub fn with_classes(x: Experiments, classes: &[usize]) -> Result<Self, DatasetError> {
        let y = classes.iter().map(|c| *c as f64).collect();
        Self::new(x, y, Mode::Classification)
    }

    #[must_use]
    pub fn x(&self) -> &Experiments {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.x.rows()
    }
}
