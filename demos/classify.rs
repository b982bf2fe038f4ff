//! Image Classification Example
//!
//! Loads a model directory (`synset.txt`, `model-symbol.json`,
//! `model.params`, `mean.nd`) and prints the top prediction for each input
//! image.
//!
//! # Usage
//!
//! ```bash
//! MXNET_LIB_DIR=/opt/mxnet/lib cargo run --features mxnet --example classify -- \
//!     -m models/inception-bn --width 224 --height 224 cat.jpg dog.png
//! ```
//!
//! # Arguments
//!
//! * `-m, --model-dir` - Directory holding the model artifacts
//! * `-c, --config` - Optional JSON predictor configuration (overrides geometry flags)
//! * `--width`, `--height` - Model input size
//! * `--device` - Device to run on (`cpu`, `gpu`, `cpu_pinned`)
//! * `--device-id` - Device ordinal
//! * `--seed` - Engine random seed
//! * `--probs` - Print the full probability vector instead of the top label
//! * `<IMAGES>...` - Images to classify

use clap::Parser;
use image_pred::core::{ConfigValidator, Device, DeviceType, PredictorConfig, init_tracing};
use image_pred::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Command-line arguments for the classification example
#[derive(Parser)]
#[command(name = "classify")]
#[command(about = "Classify images with a pretrained MXNet model")]
struct Args {
    /// Directory holding the model artifacts
    #[arg(short, long)]
    model_dir: PathBuf,

    /// Paths to input images
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// JSON predictor configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model input width
    #[arg(long, default_value = "224")]
    width: u32,

    /// Model input height
    #[arg(long, default_value = "224")]
    height: u32,

    /// Device to use for inference
    #[arg(long, default_value = "cpu")]
    device: DeviceType,

    /// Device ordinal
    #[arg(long, default_value = "0")]
    device_id: i32,

    /// Engine random seed
    #[arg(long)]
    seed: Option<i32>,

    /// Print the probability vector instead of the top label
    #[arg(long)]
    probs: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PredictorConfig::from_json_file(path)?,
        None => {
            let config = PredictorConfig::new(args.width, args.height, 3).with_device(Device {
                device_type: args.device,
                device_id: args.device_id,
            });
            config.validate()?;
            config
        }
    };
    let (width, height, channels) = (config.width, config.height, config.channels);

    let mut predictor = ImagePredictor::with_config(MxNetBackend::new(), config)?;
    if let Some(seed) = args.seed {
        predictor.set_seed(seed)?;
    }

    let start = Instant::now();
    predictor.load_model(&args.model_dir)?;
    info!("Model loaded in {:.2?}", start.elapsed());

    for path in &args.images {
        let mut pixels = match load_image_buffer(path, width, height, channels) {
            Ok(pixels) => pixels,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                continue;
            }
        };

        let start = Instant::now();
        if args.probs {
            match predictor.predict_probabilities(&mut pixels) {
                Ok(probs) => println!("{}: {:?}", path.display(), probs),
                Err(e) => error!("Prediction failed for {}: {}", path.display(), e),
            }
        } else {
            match predictor.predict(&mut pixels) {
                Ok(prediction) => println!("{}: {}", path.display(), prediction),
                Err(e) => error!("Prediction failed for {}: {}", path.display(), e),
            }
        }
        info!("{} processed in {:.2?}", path.display(), start.elapsed());
    }

    Ok(())
}
