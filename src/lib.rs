/*

Gaussian Context Transformer (GCT) for tch feature maps.

https://openaccess.thecvf.com/content/CVPR2021/papers/Ruan_Gaussian_Context_Transformer_CVPR_2021_paper.pdf

export LIBTORCH_USE_PYTORCH=1
*/

pub mod attention;
pub mod config;
pub mod error;

pub use attention::{gaussian_context, gaussian_gate, GaussianContextTransformer, GlobalAvgPooling};
pub use config::GctConfig;
pub use error::{GctError, Result};

#[cfg(test)]
macro_rules! generate_test {
    ($test_name:ident, $channels:expr, $input_size:expr) => {
        #[test]
        fn $test_name() {
            let module = GaussianContextTransformer::with_defaults($channels).unwrap();
            let input = Tensor::randn($input_size, (Kind::Float, Device::Cpu));

            let output = module.forward(&input);

            assert_eq!(output.size(), input.size(), "Failed test: {:?}", stringify!($test_name));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::nn::{self, Module};
    use tch::{Device, Kind, Tensor};

    generate_test!(test_reference_shape, 64, [2, 64, 32, 32]);

    generate_test!(test_single_sample, 16, [1, 16, 8, 8]);

    generate_test!(test_single_channel, 1, [4, 1, 6, 6]);

    generate_test!(test_single_pixel, 32, [3, 32, 1, 1]);

    generate_test!(test_non_square_map, 8, [2, 8, 5, 13]);

    #[test]
    fn test_inside_sequential() {
        let vs = nn::VarStore::new(Device::Cpu);
        let root = vs.root();
        let gct = GaussianContextTransformer::with_defaults(8).unwrap();

        let net = nn::seq()
            .add(nn::conv2d(&root / "conv", 3, 8, 3, Default::default()))
            .add(gct)
            .add_fn(|xs| xs.relu());

        let x_nchw = Tensor::randn([2, 3, 10, 10], (Kind::Float, Device::Cpu));
        assert_eq!(net.forward(&x_nchw).size(), vec![2, 8, 8, 8]);
    }
}
