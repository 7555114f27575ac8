use briny_conv::config::{ITERS_ENV, LR_ENV, TrainConfig};
use briny_conv::train::{edge_detection_data, edge_kernel, fit};
use briny_conv::{ConvLayer, Grid, ShapeError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn distance_to(kernel: &Grid, reference: &Grid) -> f64 {
    kernel
        .data()
        .iter()
        .zip(reference.data())
        .map(|(a, b)| (a - b).powi(2))
        .sum()
}

fn random_layer(seed: u64) -> ConvLayer {
    let mut rng = StdRng::seed_from_u64(seed);
    ConvLayer::with_shape(1, 2, || rng.random_range(-1.0..1.0)).unwrap()
}

#[test]
fn test_learns_edge_kernel() {
    let (x, y) = edge_detection_data().unwrap();
    let reference = edge_kernel();

    for seed in [0, 1, 7, 42] {
        let mut layer = random_layer(seed);
        let cfg = TrainConfig::default().with_iterations(1).with_log_every(0);

        let mut distances = vec![distance_to(layer.kernel(), &reference)];
        for _ in 0..10 {
            fit(&mut layer, &x, &y, &cfg).unwrap();
            distances.push(distance_to(layer.kernel(), &reference));
        }

        for pair in distances.windows(2) {
            assert!(pair[1] < pair[0], "seed {seed}: distance went {} -> {}", pair[0], pair[1]);
        }
        assert_eq!(layer.bias(), 0.0);
    }
}

#[test]
fn test_fit_losses_decrease() {
    let (x, y) = edge_detection_data().unwrap();
    let mut layer = random_layer(3);

    let losses = fit(&mut layer, &x, &y, &TrainConfig::default()).unwrap();
    assert_eq!(losses.len(), 10);
    for pair in losses.windows(2) {
        assert!(pair[1] < pair[0]);
    }
}

#[test]
fn test_fit_with_bias_converges_further() {
    let (x, y) = edge_detection_data().unwrap();
    let mut layer = random_layer(5);
    *layer.bias_mut() = 0.5;

    let cfg = TrainConfig::default()
        .with_iterations(200)
        .with_learning_rate(0.01)
        .with_train_bias(true);
    let losses = fit(&mut layer, &x, &y, &cfg).unwrap();

    assert!(losses[losses.len() - 1] < 1e-6 * losses[0].max(1.0));
    assert!(distance_to(layer.kernel(), &edge_kernel()) < 1e-3);
    assert!(layer.bias().abs() < 1e-2);
}

#[test]
fn test_fit_rejects_misshaped_target_without_update() {
    let (x, _) = edge_detection_data().unwrap();
    let mut layer = random_layer(9);
    let before = layer.clone();

    let err = fit(&mut layer, &x, &Grid::zeros(6, 8), &TrainConfig::default()).unwrap_err();
    assert!(matches!(err, ShapeError::ShapeMismatch { .. }));
    assert_eq!(layer, before);
}

#[test]
fn test_zero_iterations_is_a_no_op() {
    let (x, y) = edge_detection_data().unwrap();
    let mut layer = random_layer(11);
    let before = layer.clone();

    let losses = fit(&mut layer, &x, &y, &TrainConfig::default().with_iterations(0)).unwrap();
    assert!(losses.is_empty());
    assert_eq!(layer, before);
}

#[test]
fn test_default_config() {
    let cfg = TrainConfig::default();
    assert_eq!(cfg.learning_rate, 0.03);
    assert_eq!(cfg.iterations, 10);
    assert_eq!(cfg.log_every, 2);
    assert!(!cfg.train_bias);
}

#[test]
fn test_config_from_env() {
    // the only test in this binary that touches these variables
    unsafe {
        std::env::set_var(LR_ENV, "0.125");
        std::env::set_var(ITERS_ENV, "25");
    }
    let cfg = TrainConfig::from_env();
    assert_eq!(cfg.learning_rate, 0.125);
    assert_eq!(cfg.iterations, 25);
    assert_eq!(cfg.log_every, 2);

    unsafe {
        std::env::set_var(LR_ENV, "abc");
        std::env::set_var(ITERS_ENV, "5");
    }
    let cfg = TrainConfig::from_env();
    assert_eq!(cfg.learning_rate, 0.03);
    assert_eq!(cfg.iterations, 5);

    unsafe {
        std::env::remove_var(LR_ENV);
        std::env::set_var(ITERS_ENV, "-3");
    }
    assert_eq!(TrainConfig::from_env(), TrainConfig::default());

    unsafe {
        std::env::remove_var(ITERS_ENV);
    }
}
