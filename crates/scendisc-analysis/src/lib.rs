//! Box analysis for scenario discovery
//!
//! Scenario discovery searches a table of experiments (input dimensions) and
//! outcomes for hyper-rectangular regions, *boxes*, where cases of interest
//! concentrate. This crate holds the machinery shared by every box-producing
//! algorithm: describing boxes, testing rows against them, scoring how much
//! each restriction matters, and laying boxes out for reporting.
//!
//! # Overview
//!
//! ## Data Preparation
//!
//! 1. **Experiments** ([`dataset::Experiments`]): Typed input columns, numeric or categorical
//! 2. **Dataset** ([`dataset::Dataset`]): Experiments paired with a per-row outcome `y`
//!    and an analysis [`dataset::Mode`]
//! 3. **Reference Box** ([`limits::BoxLimits::from_experiments`]): Limits spanning the
//!    whole dataset
//!
//! ## Box Evaluation
//!
//! - **Comparison** ([`limits::compare`], [`limits::restricted_dims`]): Which dimensions
//!   a box restricts relative to the reference box
//! - **Membership** ([`membership::in_box`]): Row mask for a box
//! - **Significance** ([`quasi_p::quasi_p`]): One-sided binomial test per restriction
//!
//! ## Reporting
//!
//! 1. **Normalization** ([`normalize::normalize`]): Map limits onto `[0, 1]`
//! 2. **Dimension Ordering** ([`sorting::sorted_dims_and_boxes`]): Shared row order for a
//!    box sequence
//! 3. **Tables and Geometry** ([`report::BoxReport`]): Limit and statistics tables, and
//!    plotting geometry for an external renderer
//!
//! # Example
//!
//! ```
//! use scendisc_analysis::{
//!     dataset::{Column, Dataset, Experiments, Mode},
//!     limits::{self, BoxLimits, Limit},
//!     membership, quasi_p,
//! };
//!
//! let x = Experiments::new([
//!     ("x".to_owned(), Column::numeric((0..10).map(f64::from).collect())),
//!     ("kind".to_owned(), Column::categorical(["A", "B"].repeat(5))),
//! ])
//! .unwrap();
//! let y = (0..10).map(|i| if i >= 6 { 1.0 } else { 0.0 }).collect();
//! let dataset = Dataset::new(x, y, Mode::Binary).unwrap();
//!
//! let box_init = BoxLimits::from_experiments(dataset.x()).unwrap();
//! let boxed = box_init
//!     .narrowed([("x".to_owned(), Limit::numeric(6.0, 9.0))])
//!     .unwrap();
//! assert_eq!(limits::restricted_dims(&boxed, &box_init).unwrap(), vec!["x"]);
//!
//! let mask = membership::in_box(dataset.x(), &boxed).unwrap();
//! assert_eq!(mask.iter().filter(|inside| **inside).count(), 4);
//!
//! let qp = quasi_p::quasi_p(&dataset, &boxed, &box_init).unwrap();
//! assert!(qp["x"] < 0.05);
//! ```

pub mod dataset;
pub mod geometry;
pub mod limits;
pub mod membership;
pub mod normalize;
pub mod quasi_p;
pub mod report;
pub mod sorting;
