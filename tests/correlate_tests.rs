use briny_conv::correlate::{corr2d, output_shape};
use briny_conv::train::{edge_detection_data, edge_kernel};
use briny_conv::{Grid, ShapeError, grid, parse_grid};

#[test]
fn test_corr2d_literal_case() {
    let x = grid!([[0, 1, 2], [3, 4, 5], [6, 7, 8]]);
    let k = grid!([[0, 1], [2, 3]]);
    assert_eq!(corr2d(&x, &k).unwrap(), grid!([[19, 25], [37, 43]]));
}

#[test]
fn test_corr2d_parsed_literal_case() {
    let x = parse_grid("[[0, 1, 2], [3, 4, 5], [6, 7, 8]]").unwrap();
    let k = parse_grid("[[0, 1], [2, 3]]").unwrap();
    let expected = parse_grid("[[19, 25], [37, 43]]").unwrap();
    assert_eq!(corr2d(&x, &k).unwrap(), expected);
}

#[test]
fn test_output_shape_for_all_fitting_kernels() {
    let x = Grid::from_fn(5, 7, |r, c| (r * 7 + c) as f64);
    for h in 1..=5 {
        for w in 1..=7 {
            let k = Grid::filled(h, w, 1.0);
            let out = corr2d(&x, &k).unwrap();
            assert_eq!(out.shape(), (5 - h + 1, 7 - w + 1));
            assert_eq!(output_shape(&x, &k).unwrap(), out.shape());
        }
    }
}

#[test]
fn test_edge_detection() {
    let (x, _) = edge_detection_data().unwrap();
    assert_eq!(x.shape(), (6, 8));
    assert_eq!(x.row(0), &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);

    let out = corr2d(&x, &edge_kernel()).unwrap();
    assert_eq!(out.shape(), (6, 7));
    for r in 0..6 {
        for c in 0..7 {
            let expected = match c {
                1 => 1.0,
                5 => -1.0,
                _ => 0.0,
            };
            assert_eq!(out[(r, c)], expected, "cell ({r}, {c})");
        }
    }
}

#[test]
fn test_edge_kernel_ignores_transposed_edges() {
    let (x, _) = edge_detection_data().unwrap();
    let out = corr2d(&x.transpose(), &edge_kernel()).unwrap();
    assert_eq!(out.shape(), (8, 5));
    assert!(out.data().iter().all(|&v| v == 0.0));
}

#[test]
fn test_corr2d_is_deterministic() {
    let x = Grid::from_fn(33, 47, |r, c| ((r * 31 + c * 17) % 13) as f64 * 0.1 - 0.6);
    let k = Grid::from_fn(3, 5, |r, c| (r as f64 - 1.0) * 0.37 + c as f64 * 0.011);
    let a = corr2d(&x, &k).unwrap();
    let b = corr2d(&x, &k).unwrap();
    let bits = |g: &Grid| g.data().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn test_corr2d_leaves_inputs_untouched() {
    let x = grid!([[1, 2, 3], [4, 5, 6]]);
    let k = grid!([[1, 0]]);
    let (x0, k0) = (x.clone(), k.clone());
    let _ = corr2d(&x, &k).unwrap();
    assert_eq!(x, x0);
    assert_eq!(k, k0);
}

#[test]
fn test_kernel_too_tall_or_wide() {
    let x = Grid::zeros(3, 3);

    let tall = Grid::zeros(4, 1);
    assert_eq!(
        corr2d(&x, &tall),
        Err(ShapeError::KernelTooLarge {
            input: (3, 3),
            kernel: (4, 1)
        })
    );

    assert_eq!(
        output_shape(&x, &Grid::zeros(2, 0)),
        Err(ShapeError::EmptyKernel((2, 0)))
    );

    let wide = Grid::zeros(1, 4);
    assert!(matches!(
        corr2d(&x, &wide),
        Err(ShapeError::KernelTooLarge { .. })
    ));
}
