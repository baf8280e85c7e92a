/// Error returned when the parameters of a binomial computation are invalid.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum BinomialError {
    /// The success probability is not a finite value in `[0, 1]`.
    #[display("success probability {p} is outside [0, 1]")]
    InvalidProbability { p: f64 },
    /// The number of successes exceeds the number of trials.
    #[display("successes ({successes}) exceed trials ({trials})")]
    SuccessesExceedTrials { successes: u64, trials: u64 },
}

/// Binomial distribution with `trials` independent Bernoulli draws.
///
/// # Examples
///
/// ```
/// use scendisc_stats::binomial::Binomial;
///
/// let dist = Binomial::new(4, 0.5).unwrap();
/// assert!((dist.pmf(2) - 0.375).abs() < 1e-12);
/// assert!((dist.sf(2) - 0.6875).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binomial {
    trials: u64,
    p: f64,
}

impl Binomial {
    /// Creates a binomial distribution.
    ///
    /// # Errors
    ///
    /// Returns [`BinomialError::InvalidProbability`] if `p` is NaN or outside `[0, 1]`.
    pub fn new(trials: u64, p: f64) -> Result<Self, BinomialError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(BinomialError::InvalidProbability { p });
        }
        Ok(Self { trials, p })
    }

    /// Probability of exactly `k` successes.
    #[must_use]
    pub fn pmf(&self, k: u64) -> f64 {
        self.ln_pmf(k).exp()
    }

    /// Upper tail probability `P(X >= k)`.
    ///
    /// The tail is summed in log space from `k` to `trials`, so it stays
    /// accurate for large trial counts where individual terms underflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use scendisc_stats::binomial::Binomial;
    ///
    /// let dist = Binomial::new(10, 0.3).unwrap();
    /// assert_eq!(dist.sf(0), 1.0);
    /// assert_eq!(dist.sf(11), 0.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn sf(&self, k: u64) -> f64 {
        let n = self.trials;
        if k == 0 {
            return 1.0;
        }
        if k > n {
            return 0.0;
        }
        // degenerate distributions put all mass on one point
        if self.p <= 0.0 {
            return 0.0;
        }
        if self.p >= 1.0 {
            return 1.0;
        }

        let log_ratio = self.p.ln() - (1.0 - self.p).ln();
        let mut term = self.ln_pmf(k);
        let mut terms = Vec::with_capacity(usize::try_from(n - k + 1).unwrap_or(0));
        terms.push(term);
        for i in k..n {
            term += ((n - i) as f64).ln() - ((i + 1) as f64).ln() + log_ratio;
            terms.push(term);
        }

        let max = terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return 0.0;
        }
        let sum = terms.iter().map(|t| (t - max).exp()).sum::<f64>();
        (max + sum.ln()).exp().clamp(0.0, 1.0)
    }

    #[expect(clippy::cast_precision_loss)]
    fn ln_pmf(&self, k: u64) -> f64 {
        let n = self.trials;
        if k > n {
            return f64::NEG_INFINITY;
        }
        let successes = if k == 0 { 0.0 } else { k as f64 * self.p.ln() };
        let failures = if k == n {
            0.0
        } else {
            (n - k) as f64 * (1.0 - self.p).ln()
        };
        ln_choose(n, k) + successes + failures
    }
}

/// Natural logarithm of the binomial coefficient `C(n, k)`.
///
/// # Examples
///
/// ```
/// use scendisc_stats::binomial::ln_choose;
///
/// assert!((ln_choose(5, 2).exp() - 10.0).abs() < 1e-9);
/// assert_eq!(ln_choose(3, 4), f64::NEG_INFINITY);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    (1..=k)
        .map(|j| ((n - k + j) as f64).ln() - (j as f64).ln())
        .sum()
}

/// One-sided exact binomial test with the "greater" alternative.
///
/// Returns the p-value for observing at least `successes` out of `trials`
/// when the true success probability is `p`.
///
/// # Errors
///
/// Returns an error if `p` is outside `[0, 1]` or `successes > trials`.
///
/// # Examples
///
/// ```
/// use scendisc_stats::binomial::binomial_test_greater;
///
/// let p_value = binomial_test_greater(9, 10, 0.5).unwrap();
/// assert!((p_value - 11.0 / 1024.0).abs() < 1e-12);
/// ```
pub fn binomial_test_greater(successes: u64, trials: u64, p: f64) -> Result<f64, BinomialError> {
    if successes > trials {
        return Err(BinomialError::SuccessesExceedTrials { successes, trials });
    }
    Ok(Binomial::new(trials, p)?.sf(successes))
}
