use std::path::{Path, PathBuf};

use ndarray::Array2;

use turntable_calib::{center_ray_direction, Annotation, Distortion, Intrinsics};
use turntable_geom::bounds::Aabb;
use turntable_geom::linalg::{add3, mat3_mul, mat3_mul_vec, sub3, vec_mul_mat3};
use turntable_geom::ply::read_ply_binary;
use turntable_geom::transforms::{
    rotate_about_center, rotation_about_up_axis, rotation_matrix_to_vector,
    rotation_vector_to_matrix,
};
use turntable_geom::voxelize::voxelize;
use turntable_imgproc::mask::{binarize, fuse, read_mask_png};
use turntable_imgproc::morphology::dilate;
use turntable_imgproc::resize::resize_nearest;
use turntable_imgproc::undistort::undistort_mask;

use crate::config::SamplerConfig;
use crate::error::SamplerError;
use crate::rays::image_rays;
use crate::sample::RotationSample;
use crate::smpl::SmplParams;

/// Number of synthetic angles spanning one full turn.
pub const FULL_TURN_STEPS: usize = 144;

/// Angular step between consecutive synthetic views.
pub const ANGLE_STEP: f64 = std::f64::consts::PI / 72.0;

// structuring element side used on the fused masks
const MASK_DILATE_KERNEL: usize = 5;

/// One geometry preparation result, before rays and masks are attached.
struct PreparedFrame {
    feature: Array2<f32>,
    coord: Array2<i32>,
    out_sh: [i32; 3],
    can_bounds: Aabb,
    bounds: Aabb,
    rh: [f64; 3],
    th: [f64; 3],
}

/// Samples one fixed capture frame under a full turn of synthetic rotations.
///
/// Constructed once per capture; every query is stateless beyond the
/// read-only tables built here, so a sampler can be shared across parallel
/// data-loading workers.
pub struct RotationSampler {
    config: SamplerConfig,
    angles: Vec<f64>,
    /// Frame window restricted to the training views.
    frames: Vec<Vec<String>>,
    /// Intrinsics of the render camera (first camera of the rig), ratio scaled.
    primary_k: Intrinsics,
    /// World-to-camera of the render camera.
    primary_w2c: [[f64; 4]; 4],
    view_ks: Vec<Intrinsics>,
    view_w2c: Vec<[[f64; 4]; 4]>,
    view_distortions: Vec<Distortion>,
    center_rays: Vec<[f64; 3]>,
}

impl RotationSampler {
    /// Build a sampler by loading the annotation from `annotation_path`.
    pub fn new(
        config: SamplerConfig,
        annotation_path: impl AsRef<Path>,
    ) -> Result<Self, SamplerError> {
        let annotation = Annotation::from_file(annotation_path)?;
        Self::from_annotation(config, &annotation)
    }

    /// Build a sampler from an already parsed annotation.
    pub fn from_annotation(
        config: SamplerConfig,
        annotation: &Annotation,
    ) -> Result<Self, SamplerError> {
        if annotation.cameras.is_empty() {
            return Err(SamplerError::EmptyRig);
        }

        let (render_ks, render_w2c) = annotation.render_cameras(config.ratio);

        let start = config.begin_frame.min(annotation.frames.len());
        let end = (start + config.frame_count * config.frame_interval)
            .min(annotation.frames.len());
        let frames = annotation.frames[start..end]
            .iter()
            .map(|views| {
                config
                    .training_views
                    .iter()
                    .map(|&v| {
                        views
                            .get(v)
                            .cloned()
                            .ok_or(SamplerError::ViewOutOfRange(v, views.len()))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let n_cams = annotation.cameras.len();
        let mut view_ks = Vec::with_capacity(config.training_views.len());
        let mut view_w2c = Vec::with_capacity(config.training_views.len());
        let mut view_distortions = Vec::with_capacity(config.training_views.len());
        for &v in &config.training_views {
            if v >= n_cams {
                return Err(SamplerError::ViewOutOfRange(v, n_cams));
            }
            view_ks.push(render_ks[v]);
            view_w2c.push(render_w2c[v]);
            view_distortions.push(annotation.cameras[v].distortion);
        }

        let (height, width) = config.reduced_size();
        let center_rays = view_ks
            .iter()
            .zip(&view_w2c)
            .map(|(k, w2c)| {
                center_ray_direction(k, w2c, width as f64, height as f64)
                    .map_err(SamplerError::Calib)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let angles = (0..FULL_TURN_STEPS)
            .map(|k| k as f64 * ANGLE_STEP)
            .collect();

        log::debug!(
            "rotation sampler over {} frames, {} views, {} angles",
            frames.len(),
            view_ks.len(),
            FULL_TURN_STEPS
        );

        Ok(Self {
            config,
            angles,
            frames,
            primary_k: render_ks[0],
            primary_w2c: render_w2c[0],
            view_ks,
            view_w2c,
            view_distortions,
            center_rays,
        })
    }

    /// Number of synthetic rotation angles served by the sampler.
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    /// A sampler always serves a full turn of angles.
    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// The synthetic angle set in radians.
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// The training view whose center ray best matches the given camera.
    pub fn nearest_camera(
        &self,
        intrinsics: &Intrinsics,
        world_to_camera: &[[f64; 4]; 4],
    ) -> Result<usize, SamplerError> {
        if self.center_rays.is_empty() {
            return Err(SamplerError::EmptyRig);
        }
        let (height, width) = self.config.reduced_size();
        let query = center_ray_direction(intrinsics, world_to_camera, width as f64, height as f64)
            .map_err(SamplerError::Calib)?;
        let mut best = 0;
        let mut best_dot = f64::NEG_INFINITY;
        for (i, ray) in self.center_rays.iter().enumerate() {
            let dot = ray[0] * query[0] + ray[1] * query[1] + ray[2] * query[2];
            if dot > best_dot {
                best = i;
                best_dot = dot;
            }
        }
        Ok(best)
    }

    /// Load one frame's geometry and rotate it by the synthetic angle.
    ///
    /// Mirrors the capture preprocessing exactly: the world rotation spins
    /// the points about their centroid, the body transform then removes the
    /// combined global rotation and translation, and the body-centric points
    /// are bucketed into the voxel grid.
    fn prepare_frame(
        &self,
        frame: usize,
        angle_index: usize,
    ) -> Result<PreparedFrame, SamplerError> {
        let angle = *self
            .angles
            .get(angle_index)
            .ok_or(SamplerError::AngleOutOfRange(angle_index, self.angles.len()))?;

        let vertices_path = self.frame_file(&self.config.vertices_dir, frame, "ply");
        let cloud = read_ply_binary(&vertices_path)?;
        let mut xyz = cloud.points().to_vec();
        log::trace!("frame {frame}: {} points", xyz.len());

        let rot = rotation_about_up_axis(angle);
        let center = cloud.centroid()?;
        rotate_about_center(&mut xyz, &rot, &center);

        let can_bounds = Aabb::from_points(&xyz)?.padded(self.config.padding);

        let params_path = self.frame_file(&self.config.params_dir, frame, "json");
        let params = SmplParams::from_file(&params_path)?;

        // fold the synthetic rotation into the global body orientation
        let r = rotation_vector_to_matrix(&params.rh);
        let r = mat3_mul(&rot, &r);
        let rh = rotation_matrix_to_vector(&r);
        let th = add3(&mat3_mul_vec(&rot, &sub3(&params.th, &center)), &center);

        // body-centric frame: translation removed, then the raw combined
        // rotation applied as a row-vector product
        let body: Vec<[f64; 3]> = xyz.iter().map(|p| vec_mul_mat3(&sub3(p, &th), &r)).collect();
        let bounds = Aabb::from_points(&body)?.padded(self.config.padding);

        let mut feature = Array2::<f32>::zeros((body.len(), 6));
        for (i, p) in body.iter().enumerate() {
            for k in 0..3 {
                feature[[i, k]] = p[k] as f32;
            }
            // columns 3..6 stay zero, placeholder normals
        }

        let voxelized = voxelize(&body, &bounds, &self.config.voxel_size)?;

        Ok(PreparedFrame {
            feature,
            coord: voxelized.coords,
            out_sh: voxelized.out_shape,
            can_bounds,
            bounds,
            rh,
            th,
        })
    }

    /// Load, fuse and clean the ground-truth masks of every training view.
    fn view_masks(&self, mask_frame: usize) -> Result<Vec<Array2<u8>>, SamplerError> {
        let views = self
            .frames
            .get(mask_frame)
            .ok_or(SamplerError::FrameOutOfRange(mask_frame, self.frames.len()))?;

        let mut masks = Vec::with_capacity(views.len());
        for (view, im) in views.iter().enumerate() {
            let rel = Path::new(im).with_extension("png");
            let first = read_mask_png(
                self.config
                    .data_root
                    .join(&self.config.mask_dirs.0)
                    .join(&rel),
            )?;
            let second = read_mask_png(
                self.config
                    .data_root
                    .join(&self.config.mask_dirs.1)
                    .join(&rel),
            )?;
            let fused = fuse(&binarize(&first), &binarize(&second))?;

            // the stored intrinsics are ratio scaled; undo that to match the
            // full-resolution mask images
            let k = self.view_ks[view].scaled(1.0 / self.config.ratio);
            let undistorted = undistort_mask(&fused, &k, &self.view_distortions[view]);
            masks.push(dilate(&undistorted, MASK_DILATE_KERNEL));
        }
        Ok(masks)
    }

    /// Produce the sample for one synthetic rotation angle.
    pub fn get(&self, angle_index: usize) -> Result<RotationSample, SamplerError> {
        let geometry_frame = self.config.base_frame + self.config.begin_frame;
        let prep = self.prepare_frame(geometry_frame, angle_index)?;

        let mask_frame = if self.config.has_mask_offset() {
            self.config
                .base_frame
                .checked_sub(1)
                .ok_or(SamplerError::FrameOutOfRange(0, self.frames.len()))?
        } else {
            self.config.base_frame
        };

        let (height, width) = self.config.reduced_size();
        let masks = self
            .view_masks(mask_frame)?
            .iter()
            .map(|m| resize_nearest(m, height, width))
            .collect();

        let rays = image_rays(
            &self.primary_w2c,
            &self.primary_k,
            &prep.can_bounds,
            height,
            width,
        )?;

        let r = rotation_vector_to_matrix(&prep.rh);
        let latent_index = ((mask_frame as f64 / self.config.frame_interval as f64).round()
            as usize)
            .min(self.config.frame_count.saturating_sub(1));

        Ok(RotationSample {
            feature: prep.feature,
            coord: prep.coord,
            out_sh: prep.out_sh,
            ray_o: rays.ray_o,
            ray_d: rays.ray_d,
            near: rays.near,
            far: rays.far,
            mask_at_box: rays.mask_at_box,
            bounds: prep.bounds,
            r,
            th: prep.th,
            latent_index,
            angle_index,
            frame_index: mask_frame,
            masks,
            ks: self.view_ks.clone(),
            rt: self.view_w2c.clone(),
        })
    }

    fn frame_file(&self, dir: &str, frame: usize, extension: &str) -> PathBuf {
        self.config
            .data_root
            .join(dir)
            .join(format!("{frame}.{extension}"))
    }
}
