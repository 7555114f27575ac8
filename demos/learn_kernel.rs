use briny_conv::config::TrainConfig;
use briny_conv::train::{edge_detection_data, fit};
use briny_conv::ConvLayer;
use rand::Rng;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // progress lines are logged at info level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (x, y) = edge_detection_data()?;
    let cfg = TrainConfig::from_env();

    let mut rng = rand::rng();
    let mut layer = ConvLayer::with_shape(1, 2, || rng.random_range(-1.0..1.0))?;
    println!("initial kernel: {}", layer.kernel());

    let losses = fit(&mut layer, &x, &y, &cfg)?;

    println!("learned kernel: {}", layer.kernel());
    if let (Some(first), Some(last)) = (losses.first(), losses.last()) {
        println!("loss {first:.3} -> {last:.3} over {} iterations", losses.len());
    }

    Ok(())
}
