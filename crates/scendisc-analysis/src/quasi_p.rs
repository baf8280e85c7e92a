//! Quasi-p significance of box restrictions
//!
//! For every dimension a box restricts, the quasi-p value asks whether the
//! box's concentration of cases of interest is significantly higher than in
//! the same box with that single restriction removed.
//!
//! # Algorithm
//!
//! For each restricted dimension `j`:
//!
//! 1. Relax the box on `j` alone (reset `j` to the reference box's limit)
//! 2. `T_j` = rows inside the relaxed box, `H_j` = sum of `y` over those rows
//! 3. `p = H_j / T_j`
//! 4. One-sided exact binomial test of `H_box` successes in `T_box` trials
//!    against `p` (alternative: greater)
//!
//! `H_box` and `T_box` are truncated toward zero before testing. A relaxed box
//! without rows (`T_j == 0`) has no defined base rate and is reported as
//! [`QuasiPError::EmptyRelaxedBox`].

use indexmap::IndexMap;
use scendisc_stats::binomial::{self, BinomialError};
use tracing::{debug, warn};

use crate::{
    dataset::Dataset,
    limits::{self, BoxError, BoxLimits},
    membership,
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum QuasiPError {
    #[display("{_0}")]
    Box(BoxError),
    #[display("no rows remain when relaxing dimension '{dimension}'")]
    #[from(ignore)]
    EmptyRelaxedBox { dimension: String },
    #[display("{_0}")]
    Binomial(BinomialError),
}

/// Quasi-p value per restricted dimension, counting the box's own rows.
///
/// `H_box` is the sum of `y` inside the box and `T_box` the number of rows
/// inside it.
///
/// # Errors
///
/// See [`quasi_p_with_counts`].
pub fn quasi_p(
    dataset: &Dataset,
    boxed: &BoxLimits,
    box_init: &BoxLimits,
) -> Result<IndexMap<String, f64>, QuasiPError> {
    let mask = membership::in_box(dataset.x(), boxed)?;
    let (t_box, h_box) = membership::count_in_mask(&mask, dataset.y());
    #[expect(clippy::cast_precision_loss)]
    let t_box = t_box as f64;
    quasi_p_with_counts(dataset, boxed, box_init, h_box, t_box)
}

/// Quasi-p value per restricted dimension, for caller supplied box counts.
///
/// Returns the p-values keyed by dimension, in restricted-dimension order.
///
/// # Errors
///
/// Returns [`QuasiPError::EmptyRelaxedBox`] when relaxing a dimension leaves
/// no rows, [`QuasiPError::Binomial`] when the base rate falls outside
/// `[0, 1]` or `h_box > t_box`, and [`QuasiPError::Box`] when the boxes and
/// dataset disagree on dimensions.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quasi_p_with_counts(
    dataset: &Dataset,
    boxed: &BoxLimits,
    box_init: &BoxLimits,
    h_box: f64,
    t_box: f64,
) -> Result<IndexMap<String, f64>, QuasiPError> {
    let h_box = h_box as u64;
    let t_box = t_box as u64;

    limits::restricted_dims(boxed, box_init)?
        .into_iter()
        .map(|dimension| {
            let relaxed = boxed.relaxed(&dimension, box_init)?;
            let mask = membership::in_box_restricted(dataset.x(), &relaxed, box_init)?;
            let (t_j, h_j) = membership::count_in_mask(&mask, dataset.y());
            if t_j == 0 {
                warn!(%dimension, "relaxed box contains no rows");
                return Err(QuasiPError::EmptyRelaxedBox { dimension });
            }

            #[expect(clippy::cast_precision_loss)]
            let p = h_j / t_j as f64;
            let qp = binomial::binomial_test_greater(h_box, t_box, p)?;
            debug!(%dimension, h_j, t_j, p, h_box, t_box, qp, "quasi-p");
            Ok((dimension, qp))
        })
        .collect()
}
