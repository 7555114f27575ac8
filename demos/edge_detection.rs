use briny_conv::train::{edge_detection_data, edge_kernel};
use briny_conv::{ConvLayer, parse_grid};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // small worked example: 3×3 input, 2×2 kernel
    let x = parse_grid("[[0, 1, 2], [3, 4, 5], [6, 7, 8]]")?;
    let k = parse_grid("[[0, 1], [2, 3]]")?;
    println!("corr2d =\n{}\n", briny_conv::corr2d(&x, &k)?);

    // vertical stripe of zeros: the edge kernel fires on both borders
    let (image, _) = edge_detection_data()?;
    println!("image =\n{image}\n");

    let layer = ConvLayer::new(edge_kernel());
    println!("edges =\n{}\n", layer.forward(&image)?);

    // no horizontal edges after transposing
    println!("edges (transposed) =\n{}", layer.forward(&image.transpose())?);

    Ok(())
}
