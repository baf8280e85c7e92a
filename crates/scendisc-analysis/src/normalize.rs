//! Normalization of box limits to the unit interval
//!
//! Box limits are mapped onto a comparable `[0, 1]` scale using the reference
//! box as the baseline:
//!
//! - **Numeric** dimensions use the affine map `a * v + b` with
//!   `a = 1 / (init_upper - init_lower)` and `b = -init_lower * a`, so the
//!   reference interval maps exactly to `(0, 1)`.
//! - **Categorical** dimensions report `(0, fraction)` where `fraction` is the
//!   share of the reference categories still included in the box.
//!
//! A categorical "width" is thus a fraction of categories remaining, not a
//! geometric interval.

use tracing::warn;

use crate::limits::{BoxError, BoxLimits, Limit};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum NormalizeError {
    /// The reference box has zero width (or no categories) on this dimension.
    #[display("reference box has a degenerate range on dimension '{name}'")]
    #[from(ignore)]
    DegenerateDimension { name: String },
    #[display("{_0}")]
    Box(BoxError),
}

/// Normalizes a box's limits over the given dimensions.
///
/// Returns one `[lower, upper]` pair per requested dimension, in order.
///
/// # Errors
///
/// Returns [`NormalizeError::DegenerateDimension`] if the reference box's
/// numeric range has zero width or its category set is empty, and a
/// [`BoxError`] if a dimension is missing or its kind differs between boxes.
pub fn normalize<S>(
    boxed: &BoxLimits,
    box_init: &BoxLimits,
    dims: &[S],
) -> Result<Vec<[f64; 2]>, NormalizeError>
where
    S: AsRef<str>,
{
    dims.iter()
        .map(|name| normalize_dim(boxed, box_init, name.as_ref()))
        .collect()
}

/// Normalized width of each dimension: `upper - lower` of the normalized limits.
///
/// # Errors
///
/// Same as [`normalize`].
pub fn normalized_widths<S>(
    boxed: &BoxLimits,
    box_init: &BoxLimits,
    dims: &[S],
) -> Result<Vec<f64>, NormalizeError>
where
    S: AsRef<str>,
{
    Ok(normalize(boxed, box_init, dims)?
        .into_iter()
        .map(|[lower, upper]| upper - lower)
        .collect())
}

#[expect(clippy::cast_precision_loss)]
fn normalize_dim(
    boxed: &BoxLimits,
    box_init: &BoxLimits,
    name: &str,
) -> Result<[f64; 2], NormalizeError> {
    match (boxed.limit(name)?, box_init.limit(name)?) {
        (
            Limit::Numeric { lower, upper },
            Limit::Numeric {
                lower: init_lower,
                upper: init_upper,
            },
        ) => {
            let range = init_upper - init_lower;
            if range <= 0.0 || !range.is_finite() {
                warn!(dimension = name, range, "zero-width reference range");
                return Err(NormalizeError::DegenerateDimension {
                    name: name.to_owned(),
                });
            }
            let a = 1.0 / range;
            let b = -init_lower * a;
            Ok([a * lower + b, a * upper + b])
        }
        (Limit::Categorical { included }, Limit::Categorical { included: init }) => {
            if init.is_empty() {
                warn!(dimension = name, "empty reference category set");
                return Err(NormalizeError::DegenerateDimension {
                    name: name.to_owned(),
                });
            }
            Ok([0.0, included.len() as f64 / init.len() as f64])
        }
        _ => Err(BoxError::TypeMismatch {
            name: name.to_owned(),
        }
        .into()),
    }
}
