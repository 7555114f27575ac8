//! Training configuration.

use std::env;

/// Environment variable overriding [`TrainConfig::learning_rate`].
pub const LR_ENV: &str = "BRINY_CONV_LR";
/// Environment variable overriding [`TrainConfig::iterations`].
pub const ITERS_ENV: &str = "BRINY_CONV_ITERS";

/// Hyperparameters for [`crate::train::fit`].
///
/// The defaults reproduce the edge-kernel experiment: ten full-batch steps at
/// a learning rate of `0.03`, reporting every second step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub iterations: usize,
    /// Log progress every `log_every` iterations; `0` disables progress lines.
    pub log_every: usize,
    /// Also update the bias. The edge-kernel experiment trains the kernel only.
    pub train_bias: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.03,
            iterations: 10,
            log_every: 2,
            train_bias: false,
        }
    }
}

impl TrainConfig {
    #[must_use]
    pub const fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub const fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    #[must_use]
    pub const fn with_train_bias(mut self, train_bias: bool) -> Self {
        self.train_bias = train_bias;
        self
    }

    /// Defaults, overridden by [`LR_ENV`] and [`ITERS_ENV`] when they are set.
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(lr) = read_env(LR_ENV) {
            cfg.learning_rate = lr;
        }
        if let Some(iters) = read_env(ITERS_ENV) {
            cfg.iterations = iters;
        }
        cfg
    }
}

fn read_env<T: core::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}
