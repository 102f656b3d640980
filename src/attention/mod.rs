pub mod avg_pooling;
pub mod gaussian_context;

pub use avg_pooling::GlobalAvgPooling;
pub use gaussian_context::{gaussian_context, gaussian_gate, GaussianContextTransformer};
