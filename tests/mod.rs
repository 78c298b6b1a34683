use matgen::*;
use matgen::command::{self, MatGen};
use structopt::StructOpt;
use approx::assert_relative_eq;

const EPS : f64 = 1E-8;

fn non_gaussian() -> impl Iterator<Item=&'static str> {
    matgen::resize::method_names().filter(|m| *m != "gaussian" )
}

#[test]
fn resize_matrix_correct_size() {
    let original = SparseMatrix::identity(100);
    for (name, _) in METHODS.iter() {
        let res = resize(&original, 200, *name);
        if *name == "gaussian" {
            assert!(matches!(res, Err(ResizeError::UnsupportedOperation(_))), "{} should refuse upscaling", name);
        } else {
            let resized = res.unwrap();
            assert_eq!(resized.shape(), (200, 200), "{} failed to resize properly", name);
        }
    }
}

#[test]
fn downscale_correct_size_for_every_method() {
    let original = SparseMatrix::identity(64);
    for (name, m) in METHODS.iter() {
        let resized = resize(&original, 24, *m).unwrap();
        assert_eq!(resized.shape(), (24, 24), "{} failed to downscale", name);
    }
}

#[test]
fn bilinear_identity_upscale_density() {
    let resized = resize(&SparseMatrix::identity(100), 200, "bilinear").unwrap();
    assert!(resized.nnz() >= 100);
    assert!(resized.nnz() <= 200 * 200);
}

#[test]
fn nearest_identity_same_size() {
    for &n in [1, 10, 33].iter() {
        let id = SparseMatrix::identity(n);
        assert_eq!(resize(&id, n as i64, "nearest-neighbour").unwrap(), id);
    }
}

#[test]
fn resize_invalid_size() {
    let original = SparseMatrix::identity(10);
    for name in matgen::resize::method_names() {
        for &sz in [0, -1, -100].iter() {
            assert_eq!(resize(&original, sz, name), Err(ResizeError::InvalidSize(sz)));
        }
    }
}

#[test]
fn resize_non_square_input() {
    let rect = SparseMatrix::from_triplets(3, 5, vec![(0, 4, 1.0)]).unwrap();
    for name in matgen::resize::method_names() {
        assert!(matches!(resize(&rect, 10, name), Err(ResizeError::InvalidMatrixType(_))));
        assert!(matches!(resize(&rect, -1, name), Err(ResizeError::InvalidMatrixType(_))));
    }
}

#[test]
fn resize_unknown_method() {
    let res = resize(&SparseMatrix::identity(4), 8, "bicubic");
    assert_eq!(res, Err(ResizeError::InvalidMethod("bicubic".into())));
}

#[test]
fn save_and_load_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let matrix = SparseMatrix::identity(10);
    let path = save_matrix(&matrix, "test_matrix.mtx", dir.path()).unwrap();
    let loaded = load_matrix(&path).unwrap();
    assert_eq!(loaded.shape(), matrix.shape());
    assert!(loaded.approx_eq(&matrix, EPS));
}

#[test]
fn resized_matrices_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let source = SparseMatrix::from_triplets(
        16, 16, (0..16).flat_map(|i| vec![(i, i, 2.0), (i, (i + 3) % 16, -0.5)] )
    ).unwrap();
    for name in non_gaussian() {
        let resized = resize(&source, 27, name).unwrap();
        let path = save_matrix(&resized, &format!("{}.mtx", name), dir.path().join("nested")).unwrap();
        let loaded = load_matrix(&path).unwrap();
        assert!(loaded.approx_eq(&resized, EPS), "{} did not round-trip", name);
    }
}

#[test]
fn custom_resizer_through_dispatcher() {
    let scaled = |m : &SparseMatrix, n : usize| -> Result<SparseMatrix, ResizeError> {
        let out = resize(m, n as i64, Method::NearestNeighbour)?;
        SparseMatrix::from_triplets(n, n, out.iter().map(|(r, c, v)| (r, c, 2.0 * v) ))
    };
    let out = resize(&SparseMatrix::identity(5), 10, MethodRef::Custom(&scaled)).unwrap();
    assert_eq!(out.shape(), (10, 10));
    assert_relative_eq!(out.sum(), 40.0);
}

#[test]
fn deserialized_matrix_resizes_with_last_written_value() {
    let json = r#"{ "nrows" : 2, "ncols" : 2, "entries" : [[0, 0, 1.0], [0, 0, 2.0]] }"#;
    let m : SparseMatrix = serde_json::from_str(json).unwrap();
    let out = resize(&m, 2, "nearest-neighbour").unwrap();
    assert_eq!(out.get(0, 0), 2.0);
    assert_eq!(out.nnz(), 1);
}

#[test]
fn gaussian_same_size_is_a_smoothing_pass() {
    let spike = SparseMatrix::from_triplets(9, 9, vec![(4, 4, 1.0)]).unwrap();
    let out = resize(&spike, 9, "gaussian").unwrap();
    assert_eq!(out.shape(), (9, 9));
    assert!(out.get(4, 4) > 0.0);
    assert!(out.get(4, 4) <= 1.0);
}

#[test]
fn input_is_not_mutated() {
    let source = SparseMatrix::from_triplets(8, 8, vec![(1, 2, 3.0), (7, 7, -1.0)]).unwrap();
    let copy = source.clone();
    for (_, m) in METHODS.iter() {
        let _ = resize(&source, 5, *m);
        let _ = resize(&source, 13, *m);
    }
    assert_eq!(source, copy);
}

fn run_cli(args : &[&str]) -> anyhow::Result<()> {
    let cmd = MatGen::from_iter_safe(args).map_err(|e| anyhow::anyhow!("{}", e.message) )?;
    command::run(cmd)
}

#[test]
fn resize_cli() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_matrix(&SparseMatrix::identity(10), "input.mtx", dir.path()).unwrap();
    let output = dir.path().join("out").join("output.mtx");
    run_cli(&["matgen", "resize", input.to_str().unwrap(), output.to_str().unwrap(), "--size", "20", "--method", "bilinear"])
        .unwrap();
    assert!(output.exists());
    assert_eq!(load_matrix(&output).unwrap().shape(), (20, 20));
}

#[test]
fn resize_cli_default_method() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_matrix(&SparseMatrix::identity(10), "input.mtx", dir.path()).unwrap();
    let output = dir.path().join("output.mtx");
    run_cli(&["matgen", "resize", input.to_str().unwrap(), output.to_str().unwrap(), "--size", "15"]).unwrap();
    let resized = load_matrix(&output).unwrap();
    assert_eq!(resized.shape(), (15, 15));
}

#[test]
fn resize_cli_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.mtx");
    let err = run_cli(&["matgen", "resize", "non_existent.mtx", output.to_str().unwrap(), "--size", "20"]).unwrap_err();
    assert!(format!("{:?}", err).contains("non_existent.mtx"));
    assert!(!output.exists());
}

#[test]
fn resize_cli_invalid_method() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_matrix(&SparseMatrix::identity(10), "input.mtx", dir.path()).unwrap();
    let output = dir.path().join("output.mtx");
    let err = run_cli(&["matgen", "resize", input.to_str().unwrap(), output.to_str().unwrap(), "--size", "20", "--method", "nonexistent_method"])
        .unwrap_err();
    assert!(format!("{}", err).contains("Invalid value for '--method"));
    assert!(!output.exists());
}

#[test]
fn resize_cli_invalid_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_matrix(&SparseMatrix::identity(10), "input.mtx", dir.path()).unwrap();
    let output = dir.path().join("output.mtx");
    let err = run_cli(&["matgen", "resize", input.to_str().unwrap(), output.to_str().unwrap(), "--size", "-5"]).unwrap_err();
    assert!(format!("{}", err).contains("Invalid size"));
    assert!(!output.exists());
}

#[test]
fn resize_cli_gaussian_upscale_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_matrix(&SparseMatrix::identity(10), "input.mtx", dir.path()).unwrap();
    let output = dir.path().join("output.mtx");
    let err = run_cli(&["matgen", "resize", input.to_str().unwrap(), output.to_str().unwrap(), "-s", "20", "-m", "Gaussian"]).unwrap_err();
    assert!(format!("{}", err).contains("Unsupported operation"));
}

#[test]
fn resize_cli_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_matrix(&SparseMatrix::identity(12), "input.mtx", dir.path()).unwrap();
    let cfg = dir.path().join("cfg.json");
    std::fs::write(&cfg, r#"{ "dct_block" : 4, "tolerance" : 1e-6 }"#).unwrap();
    let output = dir.path().join("output.mtx");
    run_cli(&["matgen", "resize", input.to_str().unwrap(), output.to_str().unwrap(), "-s", "6", "-m", "dct", "--config", cfg.to_str().unwrap()])
        .unwrap();
    assert_eq!(load_matrix(&output).unwrap().shape(), (6, 6));
}

#[test]
fn resize_cli_help() {
    let err = MatGen::from_iter_safe(&["matgen", "resize", "--help"]).unwrap_err();
    assert_eq!(err.kind, structopt::clap::ErrorKind::HelpDisplayed);
    assert!(err.message.contains("Resize a sparse matrix"));
    assert!(err.message.contains("--size"));
    assert!(err.message.contains("--method"));
}

#[test]
fn features_cli() {
    let dir = tempfile::tempdir().unwrap();
    let input = save_matrix(&SparseMatrix::identity(10), "input.mtx", dir.path()).unwrap();
    let output = dir.path().join("features.json");
    run_cli(&["matgen", "features", input.to_str().unwrap(), "-o", output.to_str().unwrap()]).unwrap();
    let content = std::fs::read_to_string(&output).unwrap();
    let value : serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["nnz"], 10);
}
