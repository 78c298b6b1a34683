use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context};
use structopt::StructOpt;
use crate::config::ResizeConfig;
use crate::error::ResizeError;
use crate::features::compute_features;
use crate::io;
use crate::resize::{self, method_names, Method};

fn parse_method(s : &str) -> Result<Method, String> {
    s.parse::<Method>().map_err(|e| {
        format!("{} (choose from: {})", e, method_names().collect::<Vec<_>>().join(", "))
    })
}

/// MatGen - Sparse matrix generator and resizer.
#[derive(StructOpt, Debug)]
#[structopt(name = "matgen")]
pub enum MatGen {

    /// Resize a sparse matrix to a new size using the specified method.
    Resize {

        /// Matrix Market file to read.
        input : PathBuf,

        /// Matrix Market file to write.
        output : PathBuf,

        /// New matrix dimension (NxN).
        #[structopt(short, long, allow_hyphen_values = true)]
        size : i64,

        /// Resizing method to use (nearest-neighbour, bilinear, gaussian, graph,
        /// lanczos, dct, dft, wavelet, image; case-insensitive).
        #[structopt(short, long, default_value = "nearest-neighbour", parse(try_from_str = parse_method))]
        method : Method,

        /// JSON file with algorithm tunables.
        #[structopt(short, long)]
        config : Option<PathBuf>
    },

    /// Compute structural features of a sparse matrix, as JSON.
    Features {

        input : PathBuf,

        #[structopt(short)]
        output : Option<PathBuf>
    }

}

fn print_or_save(content : &str, opt_path : &Option<PathBuf>) -> anyhow::Result<()> {
    match opt_path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Unable to write {}", path.display()) ),
        None => { println!("{}", content); Ok(()) }
    }
}

fn resize_file(
    input : &Path,
    output : &Path,
    size : i64,
    method : Method,
    config : &Option<PathBuf>
) -> anyhow::Result<()> {
    if size <= 0 {
        return Err(ResizeError::InvalidSize(size).into());
    }
    let cfg = match config {
        Some(path) => ResizeConfig::load_from_path(path)
            .with_context(|| format!("Unable to read configuration {}", path.display()) )?,
        None => ResizeConfig::default()
    };
    let file_name = output.file_name()
        .and_then(|n| n.to_str() )
        .ok_or_else(|| anyhow!("Invalid output path: {}", output.display()) )?;
    let folder = output.parent().unwrap_or_else(|| Path::new("") );

    let matrix = io::load_matrix(input)
        .with_context(|| format!("Unable to load {}", input.display()) )?;
    if method.densifies() {
        log::debug!("Method {} materializes a dense {}x{} intermediate", method, matrix.nrows().max(size as usize), matrix.nrows().max(size as usize));
    }
    let resized = resize::resize_with(&matrix, size, method, &cfg)?;
    let path = io::save_matrix(&resized, file_name, folder)?;
    log::info!(
        "Resized {}x{} ({} stored, total {}) to {}x{} ({} stored, total {}) with {}; written to {}",
        matrix.nrows(), matrix.ncols(), matrix.nnz(), matrix.sum(),
        resized.nrows(), resized.ncols(), resized.nnz(), resized.sum(),
        method,
        path.display()
    );
    Ok(())
}

/// Executes one parsed command.
pub fn run(cmd : MatGen) -> anyhow::Result<()> {
    match &cmd {
        MatGen::Resize { input, output, size, method, config } => {
            resize_file(input, output, *size, *method, config)
        },
        MatGen::Features { input, output } => {
            let matrix = io::load_matrix(input)
                .with_context(|| format!("Unable to load {}", input.display()) )?;
            let features = compute_features(&matrix);
            print_or_save(&serde_json::to_string_pretty(&features)?, output)
        }
    }
}

#[cfg(test)]
pub mod test {

    use super::*;

    #[test]
    fn parses_defaults_and_case() {
        let cmd = MatGen::from_iter_safe(&["matgen", "resize", "a.mtx", "b.mtx", "--size", "20"]).unwrap();
        match cmd {
            MatGen::Resize { size, method, .. } => {
                assert_eq!(size, 20);
                assert_eq!(method, Method::NearestNeighbour);
            },
            _ => panic!("Expected resize")
        }
        let cmd = MatGen::from_iter_safe(&["matgen", "resize", "a.mtx", "b.mtx", "-s", "5", "-m", "DFT"]).unwrap();
        assert!(matches!(cmd, MatGen::Resize { method : Method::Dft, .. }));
    }

    #[test]
    fn rejects_unknown_method_at_parse_time() {
        let err = MatGen::from_iter_safe(&["matgen", "resize", "a.mtx", "b.mtx", "-s", "5", "-m", "nonexistent_method"])
            .unwrap_err();
        assert!(err.message.contains("Invalid value for '--method"));
        assert!(err.message.contains("nearest-neighbour"));
    }

    #[test]
    fn negative_size_fails_before_io() {
        let cmd = MatGen::from_iter_safe(&["matgen", "resize", "missing.mtx", "b.mtx", "--size", "-5"]).unwrap();
        let err = run(cmd).unwrap_err();
        assert!(format!("{}", err).contains("Invalid size"));
    }

}
