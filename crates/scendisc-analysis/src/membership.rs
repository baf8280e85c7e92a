//! Row membership in boxes
//!
//! A row is inside a box iff every dimension's limit is satisfied:
//!
//! - numeric: `lower <= value <= upper`, inclusive on both ends
//! - categorical: the row's label is not among the dataset categories the box
//!   excludes
//!
//! [`in_box`] evaluates every dimension of the experiments. Unrestricted
//! dimensions are always satisfied, so [`in_box_restricted`] evaluates only
//! the dimensions a box restricts and returns the same mask.

use crate::{
    dataset::{Column, Experiments},
    limits::{self, BoxError, BoxLimits, Limit},
};

/// Boolean mask over rows: `true` where the row lies inside the box.
///
/// # Errors
///
/// Returns a [`BoxError`] if the box lacks a dimension of the experiments or
/// a limit's kind differs from the column's type.
pub fn in_box(x: &Experiments, boxed: &BoxLimits) -> Result<Vec<bool>, BoxError> {
    let mut mask = vec![true; x.rows()];
    for (name, column) in x.columns() {
        apply_limit(&mut mask, name, column, boxed.limit(name)?)?;
    }
    Ok(mask)
}

/// Like [`in_box`], but only evaluates the dimensions `boxed` restricts
/// relative to `box_init`.
///
/// # Errors
///
/// Returns a [`BoxError`] if the boxes or experiments disagree on dimensions
/// or their kinds.
pub fn in_box_restricted(
    x: &Experiments,
    boxed: &BoxLimits,
    box_init: &BoxLimits,
) -> Result<Vec<bool>, BoxError> {
    let mut mask = vec![true; x.rows()];
    for name in limits::restricted_dims(boxed, box_init)? {
        let column = x
            .column(&name)
            .ok_or_else(|| BoxError::UnknownDimension { name: name.clone() })?;
        apply_limit(&mut mask, &name, column, boxed.limit(&name)?)?;
    }
    Ok(mask)
}

/// Number of rows inside the box and the sum of `y` over those rows.
pub(crate) fn count_in_mask(mask: &[bool], y: &[f64]) -> (usize, f64) {
    mask.iter()
        .zip(y)
        .filter(|(inside, _)| **inside)
        .fold((0, 0.0), |(count, sum), (_, y)| (count + 1, sum + y))
}

fn apply_limit(
    mask: &mut [bool],
    name: &str,
    column: &Column,
    limit: &Limit,
) -> Result<(), BoxError> {
    match (column, limit) {
        (Column::Numeric(values), Limit::Numeric { lower, upper }) => {
            for (inside, value) in mask.iter_mut().zip(values) {
                *inside &= lower <= value && value <= upper;
            }
        }
        (Column::Categorical(column), Limit::Categorical { included }) => {
            let excluded = column
                .categories()
                .iter()
                .map(|category| !included.contains(category))
                .collect::<Vec<_>>();
            if excluded.iter().any(|e| *e) {
                for (inside, code) in mask.iter_mut().zip(column.codes()) {
                    *inside &= !excluded[*code];
                }
            }
        }
        _ => {
            return Err(BoxError::TypeMismatch {
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg64;

    use super::*;

    fn grid_experiments() -> Experiments {
        // x and y on a 10x10 grid over [0, 10]
        let (x, y) = (0..100)
            .map(|i| (f64::from(i % 10) * 10.0 / 9.0, f64::from(i / 10) * 10.0 / 9.0))
            .unzip();
        Experiments::new([
            ("x".to_owned(), Column::numeric(x)),
            ("y".to_owned(), Column::numeric(y)),
        ])
        .unwrap()
    }

    fn random_experiments(rng: &mut Pcg64, rows: usize) -> Experiments {
        let labels = ["A", "B", "C", "D"];
        let x = (0..rows).map(|_| rng.random_range(0.0..10.0)).collect();
        let kind = (0..rows)
            .map(|_| labels[rng.random_range(0..labels.len())])
            .collect::<Vec<_>>();
        Experiments::new([
            ("x".to_owned(), Column::numeric(x)),
            ("kind".to_owned(), Column::categorical(kind)),
        ])
        .unwrap()
    }

    #[test]
    fn test_reference_box_contains_every_row() {
        let mut rng = Pcg64::seed_from_u64(7);
        let x = random_experiments(&mut rng, 200);
        let box_init = BoxLimits::from_experiments(&x).unwrap();
        assert!(in_box(&x, &box_init).unwrap().iter().all(|inside| *inside));
    }

    #[test]
    fn test_numeric_bounds_are_inclusive() {
        let x = Experiments::new([("x".to_owned(), Column::numeric(vec![1.0, 2.0, 3.0, 4.0]))])
            .unwrap();
        let box_init = BoxLimits::from_experiments(&x).unwrap();
        let boxed = box_init
            .narrowed([("x".to_owned(), Limit::numeric(2.0, 3.0))])
            .unwrap();
        assert_eq!(in_box(&x, &boxed).unwrap(), vec![false, true, true, false]);
    }

    #[test]
    fn test_categorical_exclusion() {
        let x = Experiments::new([(
            "kind".to_owned(),
            Column::categorical(["A", "C", "B", "D", "A"]),
        )])
        .unwrap();
        let box_init = BoxLimits::from_experiments(&x).unwrap();
        let boxed = box_init
            .narrowed([("kind".to_owned(), Limit::categorical(["A", "B"]))])
            .unwrap();
        assert_eq!(
            in_box(&x, &boxed).unwrap(),
            vec![true, false, true, false, true]
        );
    }

    #[test]
    fn test_grid_box_selects_expected_rows() {
        let x = grid_experiments();
        let box_init = BoxLimits::from_experiments(&x).unwrap();
        let boxed = box_init
            .narrowed([("x".to_owned(), Limit::numeric(2.0, 8.0))])
            .unwrap();
        let mask = in_box(&x, &boxed).unwrap();
        // grid columns 2..=7 lie within [2, 8]
        assert_eq!(mask.iter().filter(|inside| **inside).count(), 60);
        assert_eq!(mask, in_box_restricted(&x, &boxed, &box_init).unwrap());
    }

    #[test]
    fn test_membership_is_monotone() {
        let mut rng = Pcg64::seed_from_u64(42);
        let x = random_experiments(&mut rng, 300);
        let box_init = BoxLimits::from_experiments(&x).unwrap();
        let &Limit::Numeric { lower, upper } = box_init.limit("x").unwrap() else {
            panic!("x should be numeric");
        };
        let mid = f64::midpoint(lower, upper);

        for _ in 0..50 {
            // narrowing may only shrink the observed range
            let a = rng.random_range(lower..mid);
            let b = rng.random_range(mid..=upper);
            let outer = box_init
                .narrowed([
                    ("x".to_owned(), Limit::numeric(a, b)),
                    ("kind".to_owned(), Limit::categorical(["A", "B", "C"])),
                ])
                .unwrap();
            let inner = outer
                .narrowed([
                    ("x".to_owned(), Limit::numeric(a + (b - a) / 4.0, b - (b - a) / 4.0)),
                    ("kind".to_owned(), Limit::categorical(["B", "C"])),
                ])
                .unwrap();

            let outer_mask = in_box(&x, &outer).unwrap();
            let inner_mask = in_box(&x, &inner).unwrap();
            assert!(
                inner_mask
                    .iter()
                    .zip(&outer_mask)
                    .all(|(inner, outer)| !inner || *outer)
            );
            assert_eq!(outer_mask, in_box_restricted(&x, &outer, &box_init).unwrap());
        }
    }

    #[test]
    fn test_mismatched_limit_kind() {
        let x = grid_experiments();
        let wrong = BoxLimits::from_iter([
            ("x".to_owned(), Limit::categorical(["A"])),
            ("y".to_owned(), Limit::numeric(0.0, 10.0)),
        ]);
        assert_eq!(
            in_box(&x, &wrong),
            Err(BoxError::TypeMismatch {
                name: "x".to_owned()
            })
        );
    }

    #[test]
    fn test_count_in_mask() {
        let (count, sum) = count_in_mask(&[true, false, true, true], &[1.0, 1.0, 0.0, 1.0]);
        assert_eq!(count, 3);
        assert_eq!(sum, 2.0);
    }
}
