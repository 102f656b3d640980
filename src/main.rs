/*

Smoke test for the Gaussian context transformer.

    RUST_LOG=debug cargo run -- --batch-size 2 --channels 64 --height 32 --width 32

*/
use clap::Parser;
use tch::{Device, Kind, Tensor};

use gct::config::Cli;
use gct::{GaussianContextTransformer, Result};

fn run(cli: &Cli) -> Result<()> {
    if let Some(seed) = cli.seed {
        tch::manual_seed(seed);
    }

    let device = if cli.use_gpu {
        Device::cuda_if_available()
    } else {
        Device::Cpu
    };
    log::info!("Running on {:?}", device);

    let config = cli.gct_config()?;
    let gct = GaussianContextTransformer::new(cli.channels, config)?;

    let x_nchw = Tensor::f_randn(cli.input_shape(), (Kind::Float, device))?;
    let gate_nc11 = gct.f_gate(&x_nchw)?;
    let y_nchw = gct.f_forward(&x_nchw)?;

    log::info!(
        "Gate min={:.6} mean={:.6} max={:.6}",
        gate_nc11.f_min()?.f_double_value(&[])?,
        gate_nc11.f_mean(Kind::Float)?.f_double_value(&[])?,
        gate_nc11.f_max()?.f_double_value(&[])?,
    );

    println!("{:?}", y_nchw.size());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
