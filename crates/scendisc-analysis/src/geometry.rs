//! Normalized display geometry for box sequences
//!
//! Produces the geometry an external renderer needs to draw a box sequence
//! over the restricted dimensions; nothing is drawn here.
//!
//! # Layout
//!
//! Dimensions are laid out as rows in the order of
//! [`sorted_dims_and_boxes`](crate::sorting::sorted_dims_and_boxes). The
//! dimension at sorted position `i` sits at `y = n - i - 1`, and
//! [`Axes::row_labels`] names the dimension at each integer `y`. The y axis is
//! inverted (`y_limits = [n - 0.5, -0.5]`, bottom first).
//!
//! The reference box spans `x` in `[0, 1]` and is drawn as a grey background
//! rectangle, so the last box of the sequence is never emitted as marks.
//!
//! # Marks
//!
//! - **Numeric** dimensions become a horizontal segment between the
//!   normalized lower and upper limits.
//! - **Categorical** dimensions become points, one per included category, at
//!   the category's index in the sorted reference categories divided by
//!   `categories - 1`.
//!
//! In a combined bundle, box `j` is drawn at `y - 0.1 * j` so the boxes of a
//! row do not overlap.
//!
//! ```text
//!   row 1  d1  ───────●────────   box 0
//!              ────────────       box 1 (y - 0.1)
//!   row 0  d0    ● ●              box 0 (categorical)
//! ```

#![expect(clippy::cast_precision_loss)]

use serde::Serialize;

use crate::{
    limits::{BoxError, BoxLimits, Limit},
    normalize::{self, NormalizeError},
    report, sorting,
};

/// Vertical offset between boxes sharing a row.
const BOX_OFFSET: f64 = 0.1;

const X_LIMITS: [f64; 2] = [-0.2, 1.2];
const X_TICKS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Geometry for one box sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxDisplay {
    /// Restricted dimensions in sorted order.
    pub dims: Vec<String>,
    /// One bundle for a combined display, one per displayed box otherwise.
    pub bundles: Vec<DisplayBundle>,
}

/// Everything needed to draw one figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayBundle {
    pub title: Option<String>,
    pub axes: Axes,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axes {
    /// `row_labels[r]` names the dimension drawn at `y = r`.
    pub row_labels: Vec<String>,
    pub x_limits: [f64; 2],
    /// `[bottom, top]`
    pub y_limits: [f64; 2],
    pub x_ticks: Vec<f64>,
    /// Area covered by the reference box.
    pub background: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A single box's extent on a single dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    /// Index of the box in the sequence.
    pub box_index: usize,
    pub dimension: String,
    /// Position in the renderer's cycling colour palette.
    pub color_index: usize,
    pub y: f64,
    #[serde(flatten)]
    pub shape: MarkShape,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkShape {
    Segment { x0: f64, x1: f64 },
    Points { xs: Vec<f64> },
}

/// Builds the display geometry for all but the last box of `boxes`.
///
/// With `together`, all boxes share one bundle; otherwise each box gets its
/// own bundle. Bundle titles are 1-based and match [`report::box_label`], so
/// the first box is titled `box 1` here and in the tabular reports.
///
/// # Errors
///
/// Returns an error if a box disagrees with `box_init`, a numeric reference
/// range has zero width, or a box includes categories of a dimension whose
/// reference set has fewer than two categories to spread them over.
pub fn display_boxes(
    boxes: &[BoxLimits],
    box_init: &BoxLimits,
    together: bool,
) -> Result<BoxDisplay, NormalizeError> {
    let dims = sorting::sorted_dims_and_boxes(boxes, box_init)?.dims;
    let shown = &boxes[..boxes.len().saturating_sub(1)];
    let normalized = shown
        .iter()
        .map(|boxed| normalize::normalize(boxed, box_init, &dims))
        .collect::<Result<Vec<_>, _>>()?;

    let layout = RowLayout {
        box_init,
        dims: &dims,
    };

    let bundles = if together {
        let mut marks = vec![];
        for i in 0..dims.len() {
            for (j, boxed) in shown.iter().enumerate() {
                marks.push(layout.mark(boxed, &normalized[j][i], i, j, j, j)?);
            }
        }
        vec![DisplayBundle {
            title: None,
            axes: layout.axes(),
            marks,
        }]
    } else {
        shown
            .iter()
            .enumerate()
            .map(|(j, boxed)| {
                let marks = (0..dims.len())
                    .map(|i| layout.mark(boxed, &normalized[j][i], i, j, 0, j))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(DisplayBundle {
                    title: Some(report::box_label(j)),
                    axes: layout.axes(),
                    marks,
                })
            })
            .collect::<Result<Vec<_>, NormalizeError>>()?
    };

    Ok(BoxDisplay { dims, bundles })
}

struct RowLayout<'a> {
    box_init: &'a BoxLimits,
    dims: &'a [String],
}

impl RowLayout<'_> {
    fn axes(&self) -> Axes {
        let n = self.dims.len() as f64;
        Axes {
            row_labels: self.dims.iter().rev().cloned().collect(),
            x_limits: X_LIMITS,
            y_limits: [n - 0.5, -0.5],
            x_ticks: X_TICKS.to_vec(),
            background: Rect {
                x: 0.0,
                y: -0.5,
                width: 1.0,
                height: n + 1.5,
            },
        }
    }

    /// Mark for dimension `i` of box `box_index`, shifted down by `offset` boxes.
    fn mark(
        &self,
        boxed: &BoxLimits,
        normalized: &[f64; 2],
        i: usize,
        box_index: usize,
        offset: usize,
        color_index: usize,
    ) -> Result<Mark, NormalizeError> {
        let dimension = &self.dims[i];
        let row = self.dims.len() - i - 1;
        let y = row as f64 - offset as f64 * BOX_OFFSET;

        let shape = match (self.box_init.limit(dimension)?, boxed.limit(dimension)?) {
            (Limit::Categorical { included: categories }, Limit::Categorical { included }) => {
                if categories.len() < 2 && !included.is_empty() {
                    return Err(NormalizeError::DegenerateDimension {
                        name: dimension.clone(),
                    });
                }
                let max_index = (categories.len() - 1) as f64;
                let xs = included
                    .iter()
                    .map(|label| {
                        categories
                            .iter()
                            .position(|c| c == label)
                            .map(|index| index as f64 / max_index)
                            .ok_or_else(|| BoxError::OutOfBounds {
                                name: dimension.clone(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                MarkShape::Points { xs }
            }
            (Limit::Numeric { .. }, Limit::Numeric { .. }) => MarkShape::Segment {
                x0: normalized[0],
                x1: normalized[1],
            },
            _ => {
                return Err(BoxError::TypeMismatch {
                    name: dimension.clone(),
                }
                .into());
            }
        };

        Ok(Mark {
            box_index,
            dimension: dimension.clone(),
            color_index,
            y,
            shape,
        })
    }
}
