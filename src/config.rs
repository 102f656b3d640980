use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{GctError, Result};

/// Default sharpness of the Gaussian gate.
pub const DEFAULT_C: f64 = 2.0;

/// Default value added to the cross-channel variance for numerical stability.
pub const DEFAULT_EPS: f64 = 1e-5;

fn default_c() -> f64 {
    DEFAULT_C
}

fn default_eps() -> f64 {
    DEFAULT_EPS
}

/// Fixed hyper parameters of a Gaussian context transformer.
/// Missing fields fall back to their defaults when deserialized.
#[derive(PartialEq, Clone, Copy, Serialize, Deserialize, Debug)]
pub struct GctConfig {
    /// Sharpness of the gate: exp(-c * y_norm^2 / 2)
    #[serde(default = "default_c")]
    pub c: f64,

    /// Floor added to the variance before taking its square root
    #[serde(default = "default_eps")]
    pub eps: f64,
}

impl Default for GctConfig {
    fn default() -> Self {
        GctConfig {
            c: DEFAULT_C,
            eps: DEFAULT_EPS,
        }
    }
}

impl GctConfig {
    pub fn new(c: f64, eps: f64) -> Self {
        GctConfig { c, eps }
    }

    /// Rejects values that would make the normalization ill defined.
    pub fn validate(&self) -> Result<()> {
        if !self.c.is_finite() {
            return Err(GctError::InvalidConfiguration(format!(
                "c must be finite, got {}",
                self.c
            )));
        }
        if !self.eps.is_finite() || self.eps <= 0. {
            return Err(GctError::InvalidConfiguration(format!(
                "eps must be a finite positive number, got {}",
                self.eps
            )));
        }
        Ok(())
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: GctConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }
}

/// Run a Gaussian context transformer over a random feature map.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of feature maps in the batch
    #[clap(long, env = "GCT_BATCH_SIZE", default_value_t = 2)]
    pub batch_size: i64,

    /// Number of channels per feature map
    #[clap(long, env = "GCT_CHANNELS", default_value_t = 64)]
    pub channels: i64,

    #[clap(long, env = "GCT_HEIGHT", default_value_t = 32)]
    pub height: i64,

    #[clap(long, env = "GCT_WIDTH", default_value_t = 32)]
    pub width: i64,

    /// Sharpness of the Gaussian gate
    #[clap(long, env = "GCT_C", default_value_t = DEFAULT_C)]
    pub c: f64,

    /// Numerical stability floor added to the variance
    #[clap(long, env = "GCT_EPS", default_value_t = DEFAULT_EPS)]
    pub eps: f64,

    /// JSON file with `c` and `eps`, takes precedence over --c and --eps
    #[clap(long, env = "GCT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run on CUDA when a device is available
    #[clap(long, env = "GCT_USE_GPU")]
    pub use_gpu: bool,

    /// Seed for the random input
    #[clap(long, env = "GCT_SEED")]
    pub seed: Option<i64>,
}

impl Cli {
    pub fn gct_config(&self) -> Result<GctConfig> {
        match &self.config {
            Some(path) => GctConfig::from_json_file(path),
            None => Ok(GctConfig::new(self.c, self.eps)),
        }
    }

    pub fn input_shape(&self) -> [i64; 4] {
        [self.batch_size, self.channels, self.height, self.width]
    }
}
