use std::path::Path;

use serde::Deserialize;

use crate::camera::{Camera, Extrinsics, Intrinsics};
use crate::distortion::Distortion;
use crate::error::CalibError;

/// Translation unit conversion applied to the annotation extrinsics,
/// millimeters to meters.
const TRANSLATION_SCALE: f64 = 1.0 / 1000.0;

#[derive(Debug, Deserialize)]
struct RawCameras {
    #[serde(rename = "K")]
    k: Vec<Intrinsics>,
    #[serde(rename = "D")]
    d: Vec<Distortion>,
    #[serde(rename = "R")]
    r: Vec<[[f64; 3]; 3]>,
    #[serde(rename = "T")]
    t: Vec<[f64; 3]>,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    ims: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnnotation {
    cams: RawCameras,
    ims: Vec<RawFrame>,
}

/// A parsed capture annotation: the camera rig and the per-frame image table.
///
/// The annotation is a JSON document with two keys: `cams` holding the
/// per-camera `K`, `D`, `R` and `T` tables (translations in millimeters),
/// and `ims` holding one list of per-view relative image paths per frame.
#[derive(Debug, Clone)]
pub struct Annotation {
    /// The calibrated cameras of the rig, in annotation order.
    pub cameras: Vec<Camera>,
    /// Per frame, the relative image path of every camera view.
    pub frames: Vec<Vec<String>>,
}

impl Annotation {
    /// Parse an annotation file.
    ///
    /// # Errors
    ///
    /// I/O and deserialization failures are propagated unmodified; a missing
    /// file is reported as [`CalibError::FileDoesNotExist`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CalibError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CalibError::FileDoesNotExist(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let raw: RawAnnotation = serde_json::from_reader(std::io::BufReader::new(file))?;
        Self::from_raw(raw)
    }

    /// Parse an annotation from a JSON string. Mostly useful for tests.
    pub fn from_json_str(json: &str) -> Result<Self, CalibError> {
        let raw: RawAnnotation = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawAnnotation) -> Result<Self, CalibError> {
        let cams = raw.cams;
        let n = cams.k.len();
        if cams.d.len() != n || cams.r.len() != n || cams.t.len() != n {
            return Err(CalibError::InconsistentCameraCount(
                cams.k.len(),
                cams.d.len(),
                cams.r.len(),
                cams.t.len(),
            ));
        }

        let cameras = cams
            .k
            .into_iter()
            .zip(cams.d)
            .zip(cams.r.into_iter().zip(cams.t))
            .map(|((intrinsics, distortion), (rotation, translation))| Camera {
                intrinsics,
                distortion,
                extrinsics: Extrinsics {
                    rotation,
                    translation,
                },
            })
            .collect::<Vec<_>>();

        let frames = raw.ims.into_iter().map(|f| f.ims).collect::<Vec<_>>();

        log::debug!(
            "loaded annotation: {} cameras, {} frames",
            cameras.len(),
            frames.len()
        );

        Ok(Self { cameras, frames })
    }

    /// Number of cameras in the rig.
    pub fn num_cameras(&self) -> usize {
        self.cameras.len()
    }

    /// Number of annotated frames.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Derive the rendering camera tables.
    ///
    /// Per camera, the intrinsic matrix with its first two rows multiplied by
    /// `ratio` and the homogeneous world-to-camera matrix with the
    /// translation converted from millimeters to meters.
    pub fn render_cameras(&self, ratio: f64) -> (Vec<Intrinsics>, Vec<[[f64; 4]; 4]>) {
        let mut ks = Vec::with_capacity(self.cameras.len());
        let mut w2cs = Vec::with_capacity(self.cameras.len());
        for cam in &self.cameras {
            ks.push(cam.intrinsics.scaled(ratio));
            let t = cam.extrinsics.translation;
            let metric = Extrinsics {
                rotation: cam.extrinsics.rotation,
                translation: [
                    t[0] * TRANSLATION_SCALE,
                    t[1] * TRANSLATION_SCALE,
                    t[2] * TRANSLATION_SCALE,
                ],
            };
            w2cs.push(metric.to_homogeneous());
        }
        (ks, w2cs)
    }
}
