use std::path::Path;

use serde::Deserialize;

use crate::error::SamplerError;

/// Global SMPL body parameters of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SmplParams {
    /// Global body orientation as an axis-angle rotation vector.
    #[serde(rename = "Rh")]
    pub rh: [f64; 3],
    /// Global body translation in meters.
    #[serde(rename = "Th")]
    pub th: [f64; 3],
}

impl SmplParams {
    /// Load the parameters of one frame from a JSON file.
    ///
    /// # Errors
    ///
    /// A missing file is reported as [`SamplerError::FileDoesNotExist`];
    /// malformed JSON propagates the deserialization error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SamplerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SamplerError::FileDoesNotExist(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}
