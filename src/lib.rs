/// Immutable sparse matrix (shape plus explicit entries), with conversions
/// to and from dense nalgebra matrices.
pub mod matrix;

/// Error vocabulary shared by the dispatcher, the algorithms and the
/// persistence layer.
pub mod error;

/// Resizing algorithms, the Resizer contract they implement, the static
/// method registry and the validating dispatcher.
pub mod resize;

/// Matrix Market persistence (load/save).
pub mod io;

/// Feature extraction for downstream consumers of generated matrices.
pub mod features;

/// JSON-configurable tunables for the configurable algorithms.
pub mod config;

/// Command line surface, shared by the matgen binary and its tests.
pub mod command;

pub use matrix::SparseMatrix;
pub use error::{ResizeError, IoError};
pub use resize::{resize, resize_with, Method, MethodRef, Resizer, METHODS};
pub use io::{load_matrix, save_matrix};
pub use features::compute_features;
pub use config::ResizeConfig;
