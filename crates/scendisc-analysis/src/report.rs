//! Reporting for box-producing algorithms
//!
//! Any algorithm that produces an ordered box sequence (a peeling algorithm
//! such as PRIM, a tree classifier such as CART) implements [`BoxReport`] by
//! exposing its dataset, boxes and per-box statistics. The trait's provided
//! methods turn these into:
//!
//! - [`BoxesTable`]: the limits of every box over the restricted dimensions
//! - [`StatsTable`]: one row of statistics per box
//! - [`BoxDisplay`]: normalized geometry for an external renderer
//!
//! Box labels are 1-based (`box 1`, `box 2`, ...) in every output.
//!
//! # Example
//!
//! ```
//! use scendisc_analysis::{
//!     dataset::{Column, Dataset, Experiments, Mode},
//!     limits::{BoxLimits, Limit},
//!     report::{BoxReport, BoxSequence, StatsRecord},
//! };
//!
//! let x = Experiments::new([("x".to_owned(), Column::numeric(vec![0.0, 5.0, 10.0]))]).unwrap();
//! let dataset = Dataset::new(x, vec![0.0, 1.0, 1.0], Mode::Binary).unwrap();
//! let box_init = BoxLimits::from_experiments(dataset.x()).unwrap();
//! let boxes = vec![
//!     box_init.narrowed([("x".to_owned(), Limit::numeric(5.0, 10.0))]).unwrap(),
//!     box_init.clone(),
//! ];
//! let stats = vec![
//!     StatsRecord::from_iter([("coverage".to_owned(), 1.0), ("density".to_owned(), 1.0)]),
//!     StatsRecord::from_iter([("coverage".to_owned(), 1.0), ("density".to_owned(), 2.0 / 3.0)]),
//! ];
//!
//! let sequence = BoxSequence::new(dataset, boxes, stats);
//! let table = sequence.boxes_to_table().unwrap();
//! assert_eq!(table.dims, vec!["x"]);
//! assert_eq!(sequence.stats_to_table().index, vec!["box 1", "box 2"]);
//! ```

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    dataset::Dataset,
    geometry::{self, BoxDisplay},
    limits::{BoxError, BoxLimits, Limit},
    normalize::NormalizeError,
    sorting,
};

/// Named statistics of one box, in insertion order.
pub type StatsRecord = IndexMap<String, f64>;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ReportError {
    #[display("the box sequence is empty")]
    #[from(ignore)]
    NoBoxes,
    #[display("{_0}")]
    Box(BoxError),
    #[display("{_0}")]
    Normalize(NormalizeError),
}

/// Reporting capability shared by box-producing algorithms.
///
/// Implementors own their box-growing state; only the accessors are required.
pub trait BoxReport {
    /// The dataset the boxes were grown on.
    fn dataset(&self) -> &Dataset;

    /// Boxes ordered from most to least restricted.
    fn boxes(&self) -> &[BoxLimits];

    /// Statistics per box, in box order.
    fn stats(&self) -> &[StatsRecord];

    /// Reference box spanning the whole dataset.
    fn box_init(&self) -> Result<BoxLimits, BoxError> {
        BoxLimits::from_experiments(self.dataset().x())
    }

    /// Tabulates the limits of every box over the sorted restricted dimensions.
    fn boxes_to_table(&self) -> Result<BoxesTable, ReportError> {
        let boxes = self.boxes();
        let first = boxes.first().ok_or(ReportError::NoBoxes)?;
        let box_init = self.box_init()?;
        let sorted = sorting::sorted_dims_and_boxes(boxes, &box_init)?;

        let dtype = if first.has_categorical() {
            TableDtype::Mixed
        } else {
            TableDtype::Numeric
        };
        let cells = sorted
            .dims
            .iter()
            .map(|dim| {
                boxes
                    .iter()
                    .map(|boxed| boxed.limit(dim).map(LimitCells::from))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BoxesTable {
            dtype,
            boxes: (0..boxes.len()).map(box_label).collect(),
            dims: sorted.dims,
            cells,
        })
    }

    /// Tabulates the statistics records, one row per box.
    fn stats_to_table(&self) -> StatsTable {
        StatsTable::from_records(self.stats())
    }

    /// Normalized geometry of every box but the last, for an external renderer.
    fn display_boxes(&self, together: bool) -> Result<BoxDisplay, ReportError> {
        if self.boxes().is_empty() {
            return Err(ReportError::NoBoxes);
        }
        let box_init = self.box_init()?;
        Ok(geometry::display_boxes(self.boxes(), &box_init, together)?)
    }
}

/// Label of the box at `index` in a sequence.
#[must_use]
pub fn box_label(index: usize) -> String {
    format!("box {}", index + 1)
}

/// Column type of a [`BoxesTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableDtype {
    /// Every cell is a number.
    Numeric,
    /// Cells are numbers or label sets.
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Labels(BTreeSet<String>),
}

/// The `min` and `max` cells of one box on one dimension.
///
/// A categorical limit repeats its label set in both cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitCells {
    pub min: Cell,
    pub max: Cell,
}

impl From<&Limit> for LimitCells {
    fn from(limit: &Limit) -> Self {
        match limit {
            Limit::Numeric { lower, upper } => Self {
                min: Cell::Number(*lower),
                max: Cell::Number(*upper),
            },
            Limit::Categorical { included } => Self {
                min: Cell::Labels(included.clone()),
                max: Cell::Labels(included.clone()),
            },
        }
    }
}

/// Box limits indexed by dimension, with a `(min, max)` column pair per box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxesTable {
    pub dtype: TableDtype,
    /// Column group labels, one per box.
    pub boxes: Vec<String>,
    /// Row index.
    pub dims: Vec<String>,
    /// `cells[row][box]`
    pub cells: Vec<Vec<LimitCells>>,
}

impl BoxesTable {
    #[must_use]
    pub fn get(&self, dim: &str, box_index: usize) -> Option<&LimitCells> {
        let row = self.dims.iter().position(|d| d == dim)?;
        self.cells[row].get(box_index)
    }
}

/// Statistics records tabulated with one row per box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsTable {
    /// Row labels (`box 1`, `box 2`, ...).
    pub index: Vec<String>,
    /// Statistic names in first-seen order.
    pub columns: Vec<String>,
    /// `rows[box][column]`, `None` where a record lacks the statistic.
    pub rows: Vec<Vec<Option<f64>>>,
}

impl StatsTable {
    #[must_use]
    pub fn from_records(records: &[StatsRecord]) -> Self {
        let mut columns = Vec::<String>::new();
        for name in records.iter().flat_map(IndexMap::keys) {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).copied())
                    .collect()
            })
            .collect();
        Self {
            index: (0..records.len()).map(box_label).collect(),
            columns,
            rows,
        }
    }

    #[must_use]
    pub fn get(&self, box_index: usize, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(box_index)?[col]
    }
}

/// A finished box sequence, detached from the algorithm that grew it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSequence {
    dataset: Dataset,
    boxes: Vec<BoxLimits>,
    stats: Vec<StatsRecord>,
}

impl BoxSequence {
    #[must_use]
    pub fn new(dataset: Dataset, boxes: Vec<BoxLimits>, stats: Vec<StatsRecord>) -> Self {
        Self {
            dataset,
            boxes,
            stats,
        }
    }
}

impl BoxReport for BoxSequence {
    fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn boxes(&self) -> &[BoxLimits] {
        &self.boxes
    }

    fn stats(&self) -> &[StatsRecord] {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::{Column, Experiments, Mode},
        limits,
        membership,
    };

    fn dataset() -> Dataset {
        let rows = 40;
        let x = (0..rows).map(|i| f64::from(i) / 4.0).collect::<Vec<_>>();
        let kind = (0..rows)
            .map(|i| ["low", "mid", "high"][usize::try_from(i % 3).unwrap()])
            .collect::<Vec<_>>();
        let y = x.iter().map(|x| if *x > 6.0 { 1.0 } else { 0.0 }).collect();
        let experiments = Experiments::new([
            ("x".to_owned(), Column::numeric(x)),
            ("kind".to_owned(), Column::categorical(kind)),
        ])
        .unwrap();
        Dataset::new(experiments, y, Mode::Binary).unwrap()
    }

    /// Peeling-style producer: shrinks `x` from below, one box per step.
    struct Peeler {
        dataset: Dataset,
        boxes: Vec<BoxLimits>,
        stats: Vec<StatsRecord>,
    }

    impl Peeler {
        fn run(dataset: Dataset) -> Self {
            let box_init = BoxLimits::from_experiments(dataset.x()).unwrap();
            let total_interest = dataset.y().iter().sum::<f64>();
            let mut boxes = vec![];
            let mut stats = vec![];
            for lower in [0.0, 3.0, 6.25] {
                let boxed = box_init
                    .narrowed([("x".to_owned(), Limit::numeric(lower, 9.75))])
                    .unwrap();
                let mask = membership::in_box(dataset.x(), &boxed).unwrap();
                let (count, interest) = membership::count_in_mask(&mask, dataset.y());
                stats.push(StatsRecord::from_iter([
                    ("coverage".to_owned(), interest / total_interest),
                    ("density".to_owned(), interest / f64::from(u32::try_from(count).unwrap())),
                ]));
                boxes.push(boxed);
            }
            boxes.reverse();
            stats.reverse();
            Self {
                dataset,
                boxes,
                stats,
            }
        }
    }

    impl BoxReport for Peeler {
        fn dataset(&self) -> &Dataset {
            &self.dataset
        }

        fn boxes(&self) -> &[BoxLimits] {
            &self.boxes
        }

        fn stats(&self) -> &[StatsRecord] {
            &self.stats
        }
    }

    /// Tree-style producer: one leaf box per category split.
    struct Splitter {
        dataset: Dataset,
        boxes: Vec<BoxLimits>,
    }

    impl BoxReport for Splitter {
        fn dataset(&self) -> &Dataset {
            &self.dataset
        }

        fn boxes(&self) -> &[BoxLimits] {
            &self.boxes
        }

        fn stats(&self) -> &[StatsRecord] {
            &[]
        }
    }

    #[test]
    fn test_peeler_boxes_table() {
        let peeler = Peeler::run(dataset());
        let table = peeler.boxes_to_table().unwrap();
        assert_eq!(table.dtype, TableDtype::Mixed);
        assert_eq!(table.boxes, vec!["box 1", "box 2", "box 3"]);
        assert_eq!(table.dims, vec!["x"]);
        assert_eq!(
            table.get("x", 0),
            Some(&LimitCells {
                min: Cell::Number(6.25),
                max: Cell::Number(9.75)
            })
        );
        assert_eq!(
            table.get("x", 2),
            Some(&LimitCells {
                min: Cell::Number(0.0),
                max: Cell::Number(9.75)
            })
        );
        assert_eq!(table.get("kind", 0), None);
    }

    #[test]
    fn test_peeler_stats_table() {
        let peeler = Peeler::run(dataset());
        let table = peeler.stats_to_table();
        assert_eq!(table.index, vec!["box 1", "box 2", "box 3"]);
        assert_eq!(table.columns, vec!["coverage", "density"]);
        assert_eq!(table.get(0, "density"), Some(1.0));
        assert_eq!(table.get(2, "coverage"), Some(1.0));
        assert_eq!(table.get(0, "mass"), None);
    }

    #[test]
    fn test_peeler_display_skips_reference_box() {
        let peeler = Peeler::run(dataset());
        let display = peeler.display_boxes(false).unwrap();
        assert_eq!(display.bundles.len(), 2);
        assert!(
            limits::count_restricted(&peeler.boxes[2], &peeler.box_init().unwrap()).unwrap() == 0
        );
    }

    #[test]
    fn test_splitter_mixed_table() {
        let data = dataset();
        let box_init = BoxLimits::from_experiments(data.x()).unwrap();
        let boxes = vec![
            box_init
                .narrowed([
                    ("kind".to_owned(), Limit::categorical(["high"])),
                    ("x".to_owned(), Limit::numeric(5.0, 9.75)),
                ])
                .unwrap(),
            box_init
                .narrowed([("kind".to_owned(), Limit::categorical(["low", "mid"]))])
                .unwrap(),
        ];
        let splitter = Splitter {
            dataset: data,
            boxes,
        };

        let table = splitter.boxes_to_table().unwrap();
        // kind keeps 1/3 of its categories, x about half of its range
        assert_eq!(table.dims, vec!["kind", "x"]);
        assert_eq!(
            table.get("kind", 0),
            Some(&LimitCells {
                min: Cell::Labels(BTreeSet::from(["high".to_owned()])),
                max: Cell::Labels(BTreeSet::from(["high".to_owned()])),
            })
        );

        let stats = splitter.stats_to_table();
        assert!(stats.index.is_empty() && stats.columns.is_empty());
    }

    #[test]
    fn test_numeric_only_dtype() {
        let x = Experiments::new([("x".to_owned(), Column::numeric(vec![0.0, 1.0]))]).unwrap();
        let data = Dataset::new(x, vec![0.0, 1.0], Mode::Binary).unwrap();
        let box_init = BoxLimits::from_experiments(data.x()).unwrap();
        let sequence = BoxSequence::new(data, vec![box_init], vec![]);
        let table = sequence.boxes_to_table().unwrap();
        assert_eq!(table.dtype, TableDtype::Numeric);
        assert!(table.dims.is_empty());
    }

    #[test]
    fn test_empty_sequence() {
        let x = Experiments::new([("x".to_owned(), Column::numeric(vec![0.0, 1.0]))]).unwrap();
        let data = Dataset::new(x, vec![0.0, 1.0], Mode::Binary).unwrap();
        let sequence = BoxSequence::new(data, vec![], vec![]);
        assert_eq!(sequence.boxes_to_table(), Err(ReportError::NoBoxes));
        assert_eq!(sequence.display_boxes(true), Err(ReportError::NoBoxes));
    }

    #[test]
    fn test_stats_columns_in_first_seen_order() {
        let records = vec![
            StatsRecord::from_iter([("density".to_owned(), 0.9)]),
            StatsRecord::from_iter([("coverage".to_owned(), 0.4), ("density".to_owned(), 0.5)]),
        ];
        let table = StatsTable::from_records(&records);
        assert_eq!(table.columns, vec!["density", "coverage"]);
        assert_eq!(table.rows, vec![vec![Some(0.9), None], vec![Some(0.5), Some(0.4)]]);
    }
}
