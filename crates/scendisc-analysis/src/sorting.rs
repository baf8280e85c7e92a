//! Consistent dimension ordering for reporting a box sequence
//!
//! A box sequence runs from the most restricted box (index 0) to the least
//! restricted one. For reporting, every box is shown over the same list of
//! dimensions:
//!
//! 1. Collect the union of dimensions restricted by *any* box, in encounter
//!    order (boxes in sequence order, dimensions in reference box order)
//! 2. Normalize the first box over that union
//! 3. Stable-sort the union by ascending normalized width
//!
//! Dimensions only restricted by later boxes therefore still appear, ordered
//! by how strongly the first box restricts them.

use tracing::debug;

use crate::{
    limits::{self, BoxLimits},
    normalize::{self, NormalizeError},
};

/// A box sequence with the dimension order shared by all its boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedBoxes<'a> {
    pub boxes: &'a [BoxLimits],
    pub dims: Vec<String>,
}

/// Sorts the dimensions restricted anywhere in `boxes` by the normalized
/// width of the first box.
///
/// An empty sequence yields no dimensions.
///
/// # Errors
///
/// Returns an error if a box disagrees with `box_init` on dimensions or
/// kinds, or a restricted dimension cannot be normalized.
pub fn sorted_dims_and_boxes<'a>(
    boxes: &'a [BoxLimits],
    box_init: &BoxLimits,
) -> Result<SortedBoxes<'a>, NormalizeError> {
    let mut dims = Vec::<String>::new();
    for boxed in boxes {
        for dim in limits::restricted_dims(boxed, box_init)? {
            if !dims.contains(&dim) {
                dims.push(dim);
            }
        }
    }

    if let Some(first) = boxes.first() {
        let widths = normalize::normalized_widths(first, box_init, &dims)?;
        let mut keyed = dims.into_iter().zip(widths).collect::<Vec<_>>();
        // stable, so equal widths keep encounter order
        keyed.sort_by(|(_, a), (_, b)| a.total_cmp(b));
        dims = keyed.into_iter().map(|(dim, _)| dim).collect();
    }

    debug!(?dims, boxes = boxes.len(), "sorted restricted dimensions");
    Ok(SortedBoxes { boxes, dims })
}
