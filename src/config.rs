use serde::{Serialize, Deserialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use crate::error::IoError;
use crate::matrix::DEFAULT_TOLERANCE;
use crate::resize::wavelet::Basis;
use crate::resize::image::Filter;

/// Tunables for the configurable resizing algorithms. Every field is optional
/// in the JSON representation and falls back to its default, so an empty
/// object `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {

    /// Re-sparsification threshold for dense-intermediate algorithms.
    pub tolerance : f64,

    pub lanczos_lobes : usize,

    /// Gaussian window radius, in standard deviations.
    pub gaussian_truncate : f64,

    pub dct_block : usize,

    pub wavelet : Basis,

    /// Upper bound on the number of decomposition/synthesis steps.
    pub wavelet_levels : Option<usize>,

    pub image_filter : Filter

}

impl Default for ResizeConfig {

    fn default() -> Self {
        Self {
            tolerance : DEFAULT_TOLERANCE,
            lanczos_lobes : 3,
            gaussian_truncate : 3.0,
            dct_block : 8,
            wavelet : Basis::Haar,
            wavelet_levels : None,
            image_filter : Filter::CatmullRom
        }
    }

}

impl ResizeConfig {

    pub fn validate(&self) -> Result<(), IoError> {
        if !(self.tolerance >= 0.0 && self.tolerance.is_finite()) {
            return Err(IoError::Config(format!("tolerance must be a non-negative number (got {})", self.tolerance)));
        }
        if self.lanczos_lobes == 0 {
            return Err(IoError::Config("lanczos_lobes must be positive".into()));
        }
        if !(self.gaussian_truncate > 0.0 && self.gaussian_truncate.is_finite()) {
            return Err(IoError::Config(format!("gaussian_truncate must be positive (got {})", self.gaussian_truncate)));
        }
        if self.dct_block == 0 {
            return Err(IoError::Config("dct_block must be positive".into()));
        }
        Ok(())
    }

    pub fn load_from_path<P>(path : P) -> Result<Self, IoError>
        where P : AsRef<Path>
    {
        let mut content = String::new();
        File::open(path)?.read_to_string(&mut content)?;
        let cfg : ResizeConfig = serde_json::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

}

#[cfg(test)]
pub mod test {

    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg : ResizeConfig = serde_json::from_str(r#"{ "dct_block" : 4, "wavelet" : "daubechies4" }"#).unwrap();
        assert_eq!(cfg.dct_block, 4);
        assert_eq!(cfg.wavelet, Basis::Daubechies4);
        assert_eq!(cfg.lanczos_lobes, 3);
        assert_eq!(cfg.image_filter, Filter::CatmullRom);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(serde_json::from_str::<ResizeConfig>(r#"{ "block" : 4 }"#).is_err());
        let cfg = ResizeConfig { dct_block : 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(IoError::Config(_))));
    }

}
