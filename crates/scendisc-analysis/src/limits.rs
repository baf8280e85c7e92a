//! Box limits over mixed numeric and categorical dimensions
//!
//! A box constrains every input dimension with a [`Limit`]: an inclusive
//! interval for numeric dimensions, or the set of permitted labels for
//! categorical dimensions. [`BoxLimits::from_experiments`] builds the
//! reference box (`box_init`) spanning all observed data; every other box is
//! compared against it.
//!
//! # Restricted Dimensions
//!
//! A dimension is *restricted* by a box when its limit differs from the
//! reference box's limit. Equality is exact: both interval endpoints must be
//! equal, or both label sets must be equal.
//!
//! ```
//! use scendisc_analysis::{
//!     dataset::{Column, Experiments},
//!     limits::{self, BoxLimits, Limit},
//! };
//!
//! let x = Experiments::new([
//!     ("x".to_owned(), Column::numeric(vec![0.0, 10.0])),
//!     ("y".to_owned(), Column::numeric(vec![0.0, 10.0])),
//! ])
//! .unwrap();
//! let box_init = BoxLimits::from_experiments(&x).unwrap();
//! let boxed = box_init
//!     .narrowed([("x".to_owned(), Limit::numeric(2.0, 8.0))])
//!     .unwrap();
//!
//! assert_eq!(limits::restricted_dims(&boxed, &box_init).unwrap(), vec!["x"]);
//! assert_eq!(limits::count_restricted(&box_init, &box_init).unwrap(), 0);
//! ```

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::dataset::{Column, Experiments};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum BoxError {
    #[display("dimension '{name}' has no observations")]
    EmptyDimension { name: String },
    #[display("dimension '{name}' is missing from the box")]
    MissingDimension { name: String },
    #[display("dimension '{name}' is not part of the reference box")]
    UnknownDimension { name: String },
    #[display("dimension '{name}' is numeric on one side and categorical on the other")]
    TypeMismatch { name: String },
    #[display("limit for dimension '{name}' lies outside the reference box")]
    OutOfBounds { name: String },
}

/// Limit of one dimension of a box.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Limit {
    /// Inclusive interval `lower <= value <= upper`.
    Numeric { lower: f64, upper: f64 },
    /// Labels permitted in the box.
    Categorical { included: BTreeSet<String> },
}

impl Limit {
    #[must_use]
    pub fn numeric(lower: f64, upper: f64) -> Self {
        Limit::Numeric { lower, upper }
    }

    pub fn categorical<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Limit::Categorical {
            included: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether both limits constrain the same kind of dimension.
    #[must_use]
    pub fn same_kind(&self, other: &Limit) -> bool {
        matches!(
            (self, other),
            (Limit::Numeric { .. }, Limit::Numeric { .. })
                | (Limit::Categorical { .. }, Limit::Categorical { .. })
        )
    }

    /// Whether `other` lies within this limit (sub-interval or subset).
    #[must_use]
    pub fn contains(&self, other: &Limit) -> bool {
        match (self, other) {
            (
                Limit::Numeric { lower, upper },
                Limit::Numeric {
                    lower: other_lower,
                    upper: other_upper,
                },
            ) => lower <= other_lower && other_lower <= other_upper && other_upper <= upper,
            (Limit::Categorical { included }, Limit::Categorical { included: other }) => {
                other.is_subset(included)
            }
            _ => false,
        }
    }

    /// Limit spanning every observed value of a column.
    fn spanning(name: &str, column: &Column) -> Result<Self, BoxError> {
        match column {
            Column::Numeric(values) => {
                if values.is_empty() {
                    return Err(BoxError::EmptyDimension {
                        name: name.to_owned(),
                    });
                }
                let lower = values.iter().copied().fold(f64::INFINITY, f64::min);
                let upper = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                Ok(Limit::numeric(lower, upper))
            }
            Column::Categorical(column) => Ok(Limit::categorical(column.categories())),
        }
    }
}

/// Limits of a box, one per dimension, in dimension order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BoxLimits {
    limits: IndexMap<String, Limit>,
}

impl FromIterator<(String, Limit)> for BoxLimits {
    fn from_iter<T: IntoIterator<Item = (String, Limit)>>(iter: T) -> Self {
        Self {
            limits: iter.into_iter().collect(),
        }
    }
}

impl BoxLimits {
    /// Builds the reference box spanning all the data.
    ///
    /// Numeric dimensions get their observed `(min, max)`; categorical
    /// dimensions get their full set of categories.
    ///
    /// # Errors
    ///
    /// Returns [`BoxError::EmptyDimension`] if a numeric dimension has no rows.
    pub fn from_experiments(x: &Experiments) -> Result<Self, BoxError> {
        x.columns()
            .map(|(name, column)| {
                Ok::<_, BoxError>((name.to_owned(), Limit::spanning(name, column)?))
            })
            .collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Limit> {
        self.limits.get(name)
    }

    /// Looks up a dimension's limit, failing if the box does not constrain it.
    ///
    /// # Errors
    ///
    /// Returns [`BoxError::MissingDimension`] if the box has no such dimension.
    pub fn limit(&self, name: &str) -> Result<&Limit, BoxError> {
        self.limits.get(name).ok_or_else(|| BoxError::MissingDimension {
            name: name.to_owned(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Limit)> + '_ {
        self.limits.iter().map(|(name, limit)| (name.as_str(), limit))
    }

    pub fn dims(&self) -> impl Iterator<Item = &str> + '_ {
        self.limits.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Whether any dimension of the box is categorical.
    #[must_use]
    pub fn has_categorical(&self) -> bool {
        self.limits.values().any(Limit::is_categorical)
    }

    /// Derives a box from this (reference) box by replacing some limits.
    ///
    /// Dimensions not listed keep this box's limits.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is unknown, its kind differs, or the
    /// new limit does not lie within this box's limit.
    pub fn narrowed<I>(&self, limits: I) -> Result<Self, BoxError>
    where
        I: IntoIterator<Item = (String, Limit)>,
    {
        let mut narrowed = self.clone();
        for (name, limit) in limits {
            let Some(current) = narrowed.limits.get_mut(&name) else {
                return Err(BoxError::UnknownDimension { name });
            };
            if !current.same_kind(&limit) {
                return Err(BoxError::TypeMismatch { name });
            }
            if !current.contains(&limit) {
                return Err(BoxError::OutOfBounds { name });
            }
            *current = limit;
        }
        Ok(narrowed)
    }

    /// Copy of this box with one dimension reset to the reference box's limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoxError::MissingDimension`] if either box lacks the dimension.
    pub fn relaxed(&self, name: &str, box_init: &BoxLimits) -> Result<Self, BoxError> {
        let init = box_init.limit(name)?.clone();
        let mut relaxed = self.clone();
        let slot = relaxed
            .limits
            .get_mut(name)
            .ok_or_else(|| BoxError::MissingDimension {
                name: name.to_owned(),
            })?;
        *slot = init;
        Ok(relaxed)
    }
}

/// Compares two boxes dimension by dimension.
///
/// Returns, in `a`'s dimension order, `true` where both limits are identical.
///
/// # Errors
///
/// Returns an error if the boxes do not share the same dimensions, or a
/// dimension is numeric in one box and categorical in the other.
#[expect(clippy::float_cmp)]
pub fn compare(a: &BoxLimits, b: &BoxLimits) -> Result<Vec<bool>, BoxError> {
    if let Some(extra) = b.dims().find(|name| a.get(name).is_none()) {
        return Err(BoxError::UnknownDimension {
            name: extra.to_owned(),
        });
    }
    a.iter()
        .map(|(name, limit_a)| {
            let limit_b = b.limit(name)?;
            match (limit_a, limit_b) {
                (
                    Limit::Numeric { lower, upper },
                    Limit::Numeric {
                        lower: lower_b,
                        upper: upper_b,
                    },
                ) => Ok(lower == lower_b && upper == upper_b),
                (Limit::Categorical { included }, Limit::Categorical { included: included_b }) => {
                    Ok(included == included_b)
                }
                _ => Err(BoxError::TypeMismatch {
                    name: name.to_owned(),
                }),
            }
        })
        .collect()
}

/// Names of the dimensions a box restricts, in the reference box's order.
///
/// # Errors
///
/// Returns an error if the boxes do not share dimensions and kinds.
pub fn restricted_dims(boxed: &BoxLimits, box_init: &BoxLimits) -> Result<Vec<String>, BoxError> {
    let same = compare(box_init, boxed)?;
    Ok(box_init
        .dims()
        .zip(same)
        .filter(|(_, same)| !same)
        .map(|(name, _)| name.to_owned())
        .collect())
}

/// Number of dimensions a box restricts.
///
/// # Errors
///
/// Returns an error if the boxes do not share dimensions and kinds.
pub fn count_restricted(boxed: &BoxLimits, box_init: &BoxLimits) -> Result<usize, BoxError> {
    Ok(compare(box_init, boxed)?.into_iter().filter(|same| !same).count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experiments() -> Experiments {
        Experiments::new([
            ("x".to_owned(), Column::numeric(vec![3.0, -1.0, 7.5, 2.0])),
            ("kind".to_owned(), Column::categorical(["b", "a", "d", "c"])),
            ("y".to_owned(), Column::numeric(vec![0.0, 0.0, 1.0, 1.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_reference_box_spans_data() {
        let box_init = BoxLimits::from_experiments(&experiments()).unwrap();
        assert_eq!(box_init.get("x"), Some(&Limit::numeric(-1.0, 7.5)));
        assert_eq!(
            box_init.get("kind"),
            Some(&Limit::categorical(["a", "b", "c", "d"]))
        );
        assert_eq!(box_init.dims().collect::<Vec<_>>(), vec!["x", "kind", "y"]);
        assert!(box_init.has_categorical());
    }

    #[test]
    fn test_reference_box_rejects_empty_numeric() {
        let x = Experiments::new([("x".to_owned(), Column::numeric(vec![]))]).unwrap();
        assert_eq!(
            BoxLimits::from_experiments(&x),
            Err(BoxError::EmptyDimension {
                name: "x".to_owned()
            })
        );
    }

    #[test]
    fn test_reference_box_is_unrestricted() {
        let box_init = BoxLimits::from_experiments(&experiments()).unwrap();
        assert!(restricted_dims(&box_init, &box_init).unwrap().is_empty());
        assert_eq!(count_restricted(&box_init, &box_init).unwrap(), 0);
    }

    #[test]
    fn test_restricted_dims_cover_both_kinds() {
        let box_init = BoxLimits::from_experiments(&experiments()).unwrap();
        let boxed = box_init
            .narrowed([
                ("y".to_owned(), Limit::numeric(0.0, 0.5)),
                ("kind".to_owned(), Limit::categorical(["a", "b"])),
            ])
            .unwrap();
        assert_eq!(restricted_dims(&boxed, &box_init).unwrap(), vec!["kind", "y"]);
        assert_eq!(count_restricted(&boxed, &box_init).unwrap(), 2);
        assert_eq!(compare(&box_init, &boxed).unwrap(), vec![true, false, false]);
    }

    #[test]
    fn test_single_endpoint_change_is_restriction() {
        let box_init = BoxLimits::from_experiments(&experiments()).unwrap();
        let boxed = box_init
            .narrowed([("x".to_owned(), Limit::numeric(-1.0, 7.0))])
            .unwrap();
        assert_eq!(restricted_dims(&boxed, &box_init).unwrap(), vec!["x"]);
    }

    #[test]
    fn test_narrowed_validates_limits() {
        let box_init = BoxLimits::from_experiments(&experiments()).unwrap();
        assert_eq!(
            box_init.narrowed([("x".to_owned(), Limit::numeric(-2.0, 1.0))]),
            Err(BoxError::OutOfBounds {
                name: "x".to_owned()
            })
        );
        assert_eq!(
            box_init.narrowed([("x".to_owned(), Limit::categorical(["a"]))]),
            Err(BoxError::TypeMismatch {
                name: "x".to_owned()
            })
        );
        assert_eq!(
            box_init.narrowed([("kind".to_owned(), Limit::categorical(["e"]))]),
            Err(BoxError::OutOfBounds {
                name: "kind".to_owned()
            })
        );
        assert_eq!(
            box_init.narrowed([("w".to_owned(), Limit::numeric(0.0, 1.0))]),
            Err(BoxError::UnknownDimension {
                name: "w".to_owned()
            })
        );
    }

    #[test]
    fn test_compare_detects_mismatched_boxes() {
        let box_init = BoxLimits::from_experiments(&experiments()).unwrap();
        let wrong_kind = box_init
            .iter()
            .map(|(name, limit)| {
                let limit = if name == "x" {
                    Limit::categorical(["a"])
                } else {
                    limit.clone()
                };
                (name.to_owned(), limit)
            })
            .collect::<BoxLimits>();
        assert_eq!(
            restricted_dims(&wrong_kind, &box_init),
            Err(BoxError::TypeMismatch {
                name: "x".to_owned()
            })
        );

        let partial = box_init
            .iter()
            .filter(|(name, _)| *name != "y")
            .map(|(name, limit)| (name.to_owned(), limit.clone()))
            .collect::<BoxLimits>();
        assert_eq!(
            restricted_dims(&partial, &box_init),
            Err(BoxError::MissingDimension {
                name: "y".to_owned()
            })
        );
    }

    #[test]
    fn test_relaxed_resets_one_dimension() {
        let box_init = BoxLimits::from_experiments(&experiments()).unwrap();
        let boxed = box_init
            .narrowed([
                ("x".to_owned(), Limit::numeric(0.0, 3.0)),
                ("y".to_owned(), Limit::numeric(0.0, 0.0)),
            ])
            .unwrap();
        let relaxed = boxed.relaxed("x", &box_init).unwrap();
        assert_eq!(restricted_dims(&relaxed, &box_init).unwrap(), vec!["y"]);
    }
}
