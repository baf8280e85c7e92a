use anyhow::Context;
use indexmap::IndexMap;
use scendisc_analysis::{
    dataset::{Classifier, Dataset, Experiments, Outcomes, RawValue},
    limits::{BoxLimits, Limit},
    report::{self, BoxSequence, StatsRecord},
};
use serde::Deserialize;
use tracing::debug;

/// An analysis snapshot: experiments, outcomes and the box sequence found on them.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    /// Input columns, typed from their values
    pub experiments: IndexMap<String, Vec<RawValue>>,
    pub outcomes: Outcomes,
    /// How to derive the outcome vector of interest
    pub classify: ClassifyRule,
    /// Dimensions to keep (all when empty)
    #[serde(default)]
    pub include: Vec<String>,
    /// Boxes listing only the dimensions they restrict
    pub boxes: Vec<IndexMap<String, RawLimit>>,
    #[serde(default)]
    pub stats: Vec<StatsRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifyRule {
    /// Regression on the named outcome
    Outcome(String),
    /// Cases of interest where the outcome exceeds the threshold
    Above { outcome: String, threshold: f64 },
    /// Cases of interest where the outcome falls below the threshold
    Below { outcome: String, threshold: f64 },
}

impl ClassifyRule {
    fn outcome(&self) -> &str {
        match self {
            ClassifyRule::Outcome(outcome)
            | ClassifyRule::Above { outcome, .. }
            | ClassifyRule::Below { outcome, .. } => outcome,
        }
    }

    fn into_classifier(self) -> Classifier<'static> {
        match self {
            ClassifyRule::Outcome(outcome) => Classifier::outcome(outcome),
            ClassifyRule::Above { outcome, threshold } => {
                Classifier::rule(move |outcomes: &Outcomes| {
                    outcomes
                        .get(&outcome)
                        .map(|ys| ys.iter().map(|y| *y > threshold).collect())
                        .unwrap_or_default()
                })
            }
            ClassifyRule::Below { outcome, threshold } => {
                Classifier::rule(move |outcomes: &Outcomes| {
                    outcomes
                        .get(&outcome)
                        .map(|ys| ys.iter().map(|y| *y < threshold).collect())
                        .unwrap_or_default()
                })
            }
        }
    }
}

/// A box limit as written in a snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawLimit {
    /// `[lower, upper]`
    Range([f64; 2]),
    /// Included categories
    Labels(Vec<String>),
}

impl From<RawLimit> for Limit {
    fn from(raw: RawLimit) -> Self {
        match raw {
            RawLimit::Range([lower, upper]) => Limit::numeric(lower, upper),
            RawLimit::Labels(labels) => Limit::categorical(labels),
        }
    }
}

impl Snapshot {
    /// Builds the dataset and boxes described by this snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a column cannot be typed, the classified outcome
    /// is missing, or a box limit is unknown, mistyped or outside the data.
    pub fn into_sequence(self) -> anyhow::Result<BoxSequence> {
        let Snapshot {
            experiments,
            outcomes,
            classify,
            include,
            boxes,
            stats,
        } = self;

        let x = Experiments::from_raw(experiments).context("Failed to read experiments")?;
        if !outcomes.contains_key(classify.outcome()) {
            anyhow::bail!("Outcome {} not found", classify.outcome());
        }
        let dataset = Dataset::setup(x, &outcomes, classify.into_classifier(), &include[..])
            .context("Failed to set up dataset")?;
        debug!(
            rows = dataset.rows(),
            dims = dataset.x().num_dims(),
            mode = %dataset.mode(),
            "dataset ready"
        );

        let box_init = BoxLimits::from_experiments(dataset.x())
            .context("Failed to compute reference box")?;
        let boxes = boxes
            .into_iter()
            .enumerate()
            .map(|(i, limits)| {
                box_init
                    .narrowed(limits.into_iter().map(|(name, raw)| (name, raw.into())))
                    .with_context(|| format!("Invalid limits in {}", report::box_label(i)))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(BoxSequence::new(dataset, boxes, stats))
    }
}
