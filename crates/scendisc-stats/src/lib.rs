//! Statistical support utilities for scenario discovery.
//!
//! This crate provides the numeric building blocks used by the box analysis
//! crate:
//!
//! - **Binomial distribution**: Exact upper-tail probabilities and the
//!   one-sided ("greater") binomial test behind the quasi-p statistic
//! - **Descriptive statistics**: Summaries of outcome vectors
//!
//! # Modules
//!
//! - [`binomial`]: Binomial distribution and one-sided exact test
//! - [`descriptive`]: Descriptive statistics for summarizing outcome vectors
//!
//! # Examples
//!
//! ## Testing a concentration of cases
//!
//! ```
//! use scendisc_stats::binomial::binomial_test_greater;
//!
//! // 18 cases of interest among 20 rows, against a base rate of 0.5
//! let p_value = binomial_test_greater(18, 20, 0.5).unwrap();
//! assert!(p_value < 0.001);
//! ```
//!
//! ## Summarizing an outcome
//!
//! ```
//! use scendisc_stats::descriptive::DescriptiveStats;
//!
//! let outcome = [0.0, 1.0, 1.0, 0.0];
//! let stats = DescriptiveStats::new(outcome).unwrap();
//! assert_eq!(stats.positive_count, 2);
//! ```

pub mod binomial;
pub mod descriptive;
