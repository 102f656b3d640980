use tch::nn::Module;
use tch::Tensor;

use crate::attention::avg_pooling::GlobalAvgPooling;
use crate::config::GctConfig;
use crate::error::{GctError, Result};

/// Channels are reduced along this axis when taking cross-channel statistics.
const CHANNEL_DIM: i64 = 1;

/// Checks that the input is a (N, C, H, W) feature map with non empty C, H and W.
fn check_feature_map(x_nchw: &Tensor) -> Result<()> {
    let size = x_nchw.size();
    if size.len() != 4 || size[1..].iter().any(|&d| d < 1) {
        return Err(GctError::InvalidShape {
            expected: "(N, C, H, W) with C, H, W >= 1",
            actual: size,
        });
    }
    Ok(())
}

/// Computes the (N, C, 1, 1) gate of the Gaussian context transformer.
///
/// Every channel is pooled to a scalar, normalized against the mean and
/// population variance of all pooled channels of the same sample, and
/// mapped through exp(-c * y_norm^2 / 2). Values lie in (0, 1] for c >= 0.
pub fn gaussian_gate(x_nchw: &Tensor, config: &GctConfig) -> Result<Tensor> {
    config.validate()?;
    check_feature_map(x_nchw)?;
    let kind = x_nchw.kind();
    let dims = [CHANNEL_DIM];

    let y_nc11 = GlobalAvgPooling.f_forward(x_nchw)?;
    let mean_n111 = y_nc11.f_mean_dim(dims.as_slice(), true, kind)?;
    let mean_x2_n111 = y_nc11.f_square()?.f_mean_dim(dims.as_slice(), true, kind)?;

    // E[y^2] - E[y]^2, the biased estimator. Cancellation can push it below zero.
    let var_n111 = mean_x2_n111
        .f_sub(&mean_n111.f_square()?)?
        .f_clamp_min(0.)?;

    let std_n111 = var_n111.f_add_scalar(config.eps)?.f_sqrt()?;
    let y_norm_nc11 = y_nc11.f_sub(&mean_n111)?.f_div(&std_n111)?;

    let exponent_nc11 = y_norm_nc11
        .f_square()?
        .f_div_scalar(2.)?
        .f_mul_scalar(config.c)?
        .f_neg()?;
    Ok(exponent_nc11.f_exp()?)
}

/// Stateless Gaussian context transform: `x * gate(x)`, with the gate
/// broadcast over the spatial dimensions. The input is never mutated.
pub fn gaussian_context(x_nchw: &Tensor, config: &GctConfig) -> Result<Tensor> {
    let gate_nc11 = gaussian_gate(x_nchw, config)?;
    Ok(x_nchw.f_mul(&gate_nc11.f_expand_as(x_nchw)?)?)
}

/// Gaussian Context Transformer (Ruan et al., CVPR 2021).
/// Parameter free channel attention, can be dropped after any convolution
/// much like a squeeze and excitation block.
/// https://openaccess.thecvf.com/content/CVPR2021/papers/Ruan_Gaussian_Context_Transformer_CVPR_2021_paper.pdf
#[derive(Debug, Clone, Copy)]
pub struct GaussianContextTransformer {
    channels: i64,
    config: GctConfig,
}

impl GaussianContextTransformer {
    pub fn new(channels: i64, config: GctConfig) -> Result<Self> {
        if channels < 1 {
            return Err(GctError::InvalidConfiguration(format!(
                "channels must be at least 1, got {}",
                channels
            )));
        }
        config.validate()?;
        log::debug!(
            "Created Gaussian context transformer: channels={} c={} eps={}",
            channels,
            config.c,
            config.eps
        );
        Ok(GaussianContextTransformer { channels, config })
    }

    /// Same as `new` with `c = 2` and `eps = 1e-5`.
    pub fn with_defaults(channels: i64) -> Result<Self> {
        Self::new(channels, GctConfig::default())
    }

    pub fn channels(&self) -> i64 {
        self.channels
    }

    pub fn config(&self) -> &GctConfig {
        &self.config
    }

    fn trace_input(&self, x_nchw: &Tensor) {
        let size = x_nchw.size();
        log::trace!("GCT forward on {:?}", size);
        if size.len() == 4 && size[1] != self.channels {
            log::warn!(
                "GCT configured for {} channels received {} channels",
                self.channels,
                size[1]
            );
        }
    }

    pub fn f_gate(&self, x_nchw: &Tensor) -> Result<Tensor> {
        self.trace_input(x_nchw);
        gaussian_gate(x_nchw, &self.config)
    }

    pub fn gate(&self, x_nchw: &Tensor) -> Tensor {
        match self.f_gate(x_nchw) {
            Ok(gate_nc11) => gate_nc11,
            Err(err) => panic!("Error while computing GCT gate: {}", err),
        }
    }

    pub fn f_forward(&self, x_nchw: &Tensor) -> Result<Tensor> {
        self.trace_input(x_nchw);
        gaussian_context(x_nchw, &self.config)
    }
}

impl Module for GaussianContextTransformer {
    fn forward(&self, x_nchw: &Tensor) -> Tensor {
        match self.f_forward(x_nchw) {
            Ok(y_nchw) => y_nchw,
            Err(err) => panic!("Error while applying GCT: {}", err),
        }
    }
}
