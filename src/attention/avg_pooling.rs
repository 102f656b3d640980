use tch::nn::Module;
use tch::Tensor;

use crate::error::Result;

/// Spatial size every channel is reduced to.
const OUTPUT_SIZE: [i64; 2] = [1, 1];

/// Global average pooling: (N, C, H, W) -> (N, C, 1, 1).
/// Summarizes the context of every channel in a single scalar.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalAvgPooling;

impl GlobalAvgPooling {
    pub fn new() -> Self {
        GlobalAvgPooling
    }

    pub fn f_forward(&self, x_nchw: &Tensor) -> Result<Tensor> {
        Ok(x_nchw.f_adaptive_avg_pool2d(OUTPUT_SIZE)?)
    }
}

impl Module for GlobalAvgPooling {
    fn forward(&self, x_nchw: &Tensor) -> Tensor {
        x_nchw.adaptive_avg_pool2d(OUTPUT_SIZE)
    }
}
