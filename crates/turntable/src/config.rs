use std::path::{Path, PathBuf};

use serde::Deserialize;

use turntable_geom::PaddingMode;

fn default_vertices_dir() -> String {
    "vertices".into()
}

fn default_params_dir() -> String {
    "params".into()
}

fn default_mask_dirs() -> (String, String) {
    ("mask".into(), "mask_cihp".into())
}

fn default_n_rays() -> usize {
    1024
}

/// Every option the rotation sampler consumes, passed explicitly at
/// construction time.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    /// Root directory of the capture.
    pub data_root: PathBuf,
    /// Subject identifier of the capture.
    pub subject: String,
    /// Subjects whose mask frames lag the geometry frames by one step.
    ///
    /// A dataset-compatibility shim for captures annotated with this known
    /// off-by-one; the offset is applied verbatim, never derived.
    #[serde(default)]
    pub mask_offset_subjects: Vec<String>,
    /// Directory of per-frame vertex PLY files, relative to `data_root`.
    #[serde(default = "default_vertices_dir")]
    pub vertices_dir: String,
    /// Directory of per-frame SMPL parameter files, relative to `data_root`.
    #[serde(default = "default_params_dir")]
    pub params_dir: String,
    /// The two independent mask source directories, relative to `data_root`.
    #[serde(default = "default_mask_dirs")]
    pub mask_dirs: (String, String),
    /// First annotated frame of the window used for sampling.
    pub begin_frame: usize,
    /// Base frame to rotate, relative to `begin_frame`.
    pub base_frame: usize,
    /// Step between frames of the window.
    pub frame_interval: usize,
    /// Number of frames in the window.
    pub frame_count: usize,
    /// Indices of the camera views used for supervision.
    pub training_views: Vec<usize>,
    /// Voxel edge lengths in x/y/z order.
    pub voxel_size: [f64; 3],
    /// Bounding volume padding policy.
    pub padding: PaddingMode,
    /// Full capture image height in pixels.
    pub height: usize,
    /// Full capture image width in pixels.
    pub width: usize,
    /// Resolution reduction ratio applied to the image plane.
    pub ratio: f64,
    /// Rays drawn per batch by the surrounding trainer; stored, not used here.
    #[serde(default = "default_n_rays")]
    pub n_rays: usize,
    /// Experiment name, used to derive the render output directory.
    pub exp_name: String,
}

impl SamplerConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::error::SamplerError> {
        let file = std::fs::File::open(path.as_ref())?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// The image plane size after resolution reduction, `(height, width)`.
    pub fn reduced_size(&self) -> (usize, usize) {
        (
            (self.height as f64 * self.ratio) as usize,
            (self.width as f64 * self.ratio) as usize,
        )
    }

    /// Directory where the surrounding driver writes rendered frames.
    pub fn render_dir(&self) -> PathBuf {
        PathBuf::from("data/render").join(&self.exp_name)
    }

    /// Whether the configured subject needs the one-frame mask offset.
    pub fn has_mask_offset(&self) -> bool {
        self.mask_offset_subjects
            .iter()
            .any(|s| s == &self.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "data_root": "/data/capture",
            "subject": "S1",
            "begin_frame": 0,
            "base_frame": 0,
            "frame_interval": 1,
            "frame_count": 3,
            "training_views": [0, 1],
            "voxel_size": [0.005, 0.005, 0.005],
            "padding": "vertical_only",
            "height": 1024,
            "width": 1024,
            "ratio": 0.5,
            "exp_name": "demo"
        }"#;
        let cfg: SamplerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.vertices_dir, "vertices");
        assert_eq!(cfg.mask_dirs.1, "mask_cihp");
        assert_eq!(cfg.n_rays, 1024);
        assert_eq!(cfg.reduced_size(), (512, 512));
        assert!(!cfg.has_mask_offset());
        assert_eq!(cfg.render_dir(), PathBuf::from("data/render/demo"));
    }

    #[test]
    fn mask_offset_matches_listed_subjects() {
        let json = r#"{
            "data_root": "/data/capture",
            "subject": "S313",
            "mask_offset_subjects": ["S313", "S315"],
            "begin_frame": 0,
            "base_frame": 1,
            "frame_interval": 1,
            "frame_count": 3,
            "training_views": [0],
            "voxel_size": [0.005, 0.005, 0.005],
            "padding": "uniform",
            "height": 1024,
            "width": 1024,
            "ratio": 0.5,
            "exp_name": "demo"
        }"#;
        let cfg: SamplerConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.has_mask_offset());
    }
}
