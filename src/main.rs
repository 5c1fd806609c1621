//! Shape check: build each network, run a zero observation through it, and
//! log the tensor shapes along the way.

use std::path::PathBuf;
use structopt::StructOpt;

use dueling_q::config::ModelConfig;
use dueling_q::error::Result;
use dueling_q::models::{CylinderCoordConv, CylinderNet, LanderNet};
use dueling_q::network::QNetwork;
use dueling_q::observation::{CylinderImageObservation, CylinderObservation};
use ndarray::Array2;

#[derive(StructOpt, Debug)]
#[structopt(name = "dueling_q", about = "Sanity-check dueling Q-network tensor shapes")]
struct Cli {
    /// JSON model configuration, defaults are used when omitted
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Run every network on the accelerated device
    #[structopt(short, long)]
    accelerate: bool,

    /// Observation batch size
    #[structopt(short, long, default_value = "1")]
    batch: usize,
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ModelConfig::from_json_file(path)?,
        None => ModelConfig::default(),
    };
    if cli.accelerate {
        config = config.with_acceleration(true);
    }

    let lander = LanderNet::from_config(&config.lander)?;
    let q = lander.q_values(&Array2::zeros((cli.batch, dueling_q::dims::LANDER_STATE_DIM)))?;
    tracing::info!("{}", lander);
    tracing::info!(params = lander.parameter_count(), "lander q-values {:?}", q.shape());

    let cylinder = CylinderNet::from_config(&config.cylinder)?;
    let q = cylinder.q_values(&CylinderObservation::zeros(cli.batch, cylinder.dims()))?;
    tracing::info!("{}", cylinder);
    tracing::info!(params = cylinder.parameter_count(), "cylinder q-values {:?}", q.shape());

    let coord_conv = CylinderCoordConv::from_config(&config.coord_conv)?;
    let obs = CylinderImageObservation::zeros(cli.batch, coord_conv.dims(), coord_conv.image_dims());
    tracing::info!(
        "observation shapes: config {:?} tscs {:?} rms {:?} image {:?} time {:?}",
        obs.vector.config.shape(),
        obs.vector.tscs.shape(),
        obs.vector.rms.shape(),
        obs.image.shape(),
        obs.vector.time.shape()
    );
    tracing::info!("{}", coord_conv);
    let fused = coord_conv.fused_features(&obs)?;
    let q = coord_conv.q_values(&obs)?;
    tracing::info!(
        params = coord_conv.parameter_count(),
        device = %coord_conv.context().device_type(),
        "fused features {:?}, coord-conv q-values {:?}",
        fused.shape(),
        q.shape()
    );

    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Cli::from_args()) {
        tracing::error!("shape check failed: {}", e);
        std::process::exit(1);
    }
}
