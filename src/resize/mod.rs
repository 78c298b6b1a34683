use std::convert::TryFrom;
use std::fmt::{self, Display};
use std::str::FromStr;
use crate::matrix::SparseMatrix;
use crate::error::ResizeError;
use crate::config::ResizeConfig;

/// Separable per-axis weight tables shared by the spatial resizers.
pub mod kernel;

/// Copies the value of the source cell each target cell falls on.
pub mod nearest;

/// Weighted average of the four surrounding source cells.
pub mod bilinear;

/// Gaussian-weighted downscaling (anti-aliasing).
pub mod gaussian;

/// Contraction/expansion of the matrix seen as a weighted graph.
pub mod graph;

/// Windowed-sinc resampling.
pub mod lanczos;

/// Truncation/zero-padding of per-block cosine spectra.
pub mod dct;

/// Truncation/zero-padding of the 2D Fourier spectrum.
pub mod dft;

/// Coarse approximation (downscale) or synthesis (upscale) through a wavelet basis.
pub mod wavelet;

/// Densify, resample with a general-purpose raster filter, re-sparsify.
pub mod image;

pub use nearest::resize_nearest;
pub use bilinear::resize_bilinear;
pub use gaussian::GaussianResizer;
pub use graph::resize_graph;
pub use lanczos::Lanczos;
pub use dct::BlockDct;
pub use dft::FourierResizer;
pub use wavelet::WaveletResizer;
pub use self::image::ImageFilter;

/// Capability contract every resizing algorithm honors, built-in or not.
/// An implementation must be a pure function of its inputs: it receives a
/// square matrix and a positive target dimension (both already validated by
/// the dispatcher), must not retain or mutate the input, and returns a new
/// target x target matrix. Failures are reported only through
/// UnsupportedOperation (the algorithm refuses the requested direction, before
/// doing any work) or ComputationError (a numerical step failed).
///
/// Any closure or function with the signature
/// `Fn(&SparseMatrix, usize) -> Result<SparseMatrix, ResizeError>` satisfies
/// this contract through the blanket implementation below.
pub trait Resizer {

    fn resize(&self, matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError>;

}

impl<F> Resizer for F
    where F : Fn(&SparseMatrix, usize) -> Result<SparseMatrix, ResizeError>
{

    fn resize(&self, matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
        self(matrix, target)
    }

}

/// The closed set of built-in algorithms. Variants carry no state; the
/// tunables of the configurable algorithms come from a ResizeConfig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    NearestNeighbour,
    Bilinear,
    Gaussian,
    Graph,
    Lanczos,
    Dct,
    Dft,
    Wavelet,
    Image
}

/// Process-wide registry from lower-case method name to algorithm. The table
/// is a compile-time constant; the command line uses it to validate --method.
pub static METHODS : [(&str, Method); 9] = [
    ("nearest-neighbour", Method::NearestNeighbour),
    ("bilinear", Method::Bilinear),
    ("gaussian", Method::Gaussian),
    ("graph", Method::Graph),
    ("lanczos", Method::Lanczos),
    ("dct", Method::Dct),
    ("dft", Method::Dft),
    ("wavelet", Method::Wavelet),
    ("image", Method::Image),
];

pub fn method_names() -> impl Iterator<Item=&'static str> {
    METHODS.iter().map(|(name, _)| *name )
}

impl Method {

    pub fn name(&self) -> &'static str {
        METHODS.iter()
            .find(|(_, m)| m == self )
            .map(|(name, _)| *name )
            .unwrap_or("unknown")
    }

    /// Whether the algorithm materializes an O(N^2) dense intermediate
    /// (N being the larger of the source and target dimensions). Callers
    /// holding very large matrices should check this before dispatching.
    pub fn densifies(&self) -> bool {
        match self {
            Method::Dct | Method::Dft | Method::Wavelet | Method::Image => true,
            _ => false
        }
    }

    pub fn resize_with(
        &self,
        matrix : &SparseMatrix,
        target : usize,
        cfg : &ResizeConfig
    ) -> Result<SparseMatrix, ResizeError> {
        match self {
            Method::NearestNeighbour => resize_nearest(matrix, target),
            Method::Bilinear => resize_bilinear(matrix, target),
            Method::Gaussian => GaussianResizer::new(cfg.gaussian_truncate).resize(matrix, target),
            Method::Graph => resize_graph(matrix, target),
            Method::Lanczos => Lanczos::new(cfg.lanczos_lobes).resize(matrix, target),
            Method::Dct => BlockDct::new(cfg.dct_block, cfg.tolerance).resize(matrix, target),
            Method::Dft => FourierResizer::new(cfg.tolerance).resize(matrix, target),
            Method::Wavelet => WaveletResizer::new(cfg.wavelet, cfg.wavelet_levels, cfg.tolerance).resize(matrix, target),
            Method::Image => ImageFilter::new(cfg.image_filter, cfg.tolerance).resize(matrix, target)
        }
    }

}

impl Resizer for Method {

    fn resize(&self, matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
        self.resize_with(matrix, target, &ResizeConfig::default())
    }

}

impl FromStr for Method {

    type Err = ResizeError;

    fn from_str(s : &str) -> Result<Self, ResizeError> {
        let key = s.trim().to_lowercase();
        METHODS.iter()
            .find(|(name, _)| *name == key )
            .map(|(_, m)| *m )
            .ok_or_else(|| ResizeError::InvalidMethod(s.to_string()) )
    }

}

impl Display for Method {

    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }

}

/// How the caller identifies the algorithm: a registry name, a built-in
/// variant, or any implementation of the Resizer contract.
pub enum MethodRef<'a> {
    Named(&'a str),
    Builtin(Method),
    Custom(&'a dyn Resizer)
}

impl<'a> From<&'a str> for MethodRef<'a> {

    fn from(name : &'a str) -> Self {
        MethodRef::Named(name)
    }

}

impl<'a> From<&'a String> for MethodRef<'a> {

    fn from(name : &'a String) -> Self {
        MethodRef::Named(&name[..])
    }

}

impl<'a> From<Method> for MethodRef<'a> {

    fn from(m : Method) -> Self {
        MethodRef::Builtin(m)
    }

}

impl<'a> From<&'a dyn Resizer> for MethodRef<'a> {

    fn from(r : &'a dyn Resizer) -> Self {
        MethodRef::Custom(r)
    }

}

fn validate_matrix(matrix : &SparseMatrix) -> Result<(), ResizeError> {
    let (nrows, ncols) = matrix.shape();
    if nrows != ncols {
        return Err(ResizeError::invalid_matrix(format!("Matrix must be square (got {}x{})", nrows, ncols)));
    }
    let conforming = matrix.iter().all(|(r, c, v)| r < nrows && c < ncols && v.is_finite() );
    if !conforming {
        return Err(ResizeError::invalid_matrix("Matrix holds out-of-range or non-finite entries"));
    }
    Ok(())
}

fn validate_size(target_size : i64) -> Result<usize, ResizeError> {
    match usize::try_from(target_size) {
        Ok(sz) if sz > 0 => Ok(sz),
        _ => Err(ResizeError::InvalidSize(target_size))
    }
}

/// Resizes a square sparse matrix to target_size x target_size using the
/// given method and default tunables. See resize_with.
pub fn resize<'a, M>(matrix : &SparseMatrix, target_size : i64, method : M) -> Result<SparseMatrix, ResizeError>
    where M : Into<MethodRef<'a>>
{
    resize_with(matrix, target_size, method, &ResizeConfig::default())
}

/// Validates the matrix (InvalidMatrixType), then the size (InvalidSize),
/// then resolves the method (InvalidMethod), and only then runs the
/// algorithm. Names are matched case-insensitively against METHODS. The
/// algorithm's output or error is returned unchanged.
pub fn resize_with<'a, M>(
    matrix : &SparseMatrix,
    target_size : i64,
    method : M,
    cfg : &ResizeConfig
) -> Result<SparseMatrix, ResizeError>
    where M : Into<MethodRef<'a>>
{
    validate_matrix(matrix)?;
    let target = validate_size(target_size)?;
    match method.into() {
        MethodRef::Named(name) => name.parse::<Method>()?.resize_with(matrix, target, cfg),
        MethodRef::Builtin(m) => m.resize_with(matrix, target, cfg),
        MethodRef::Custom(r) => r.resize(matrix, target)
    }
}
