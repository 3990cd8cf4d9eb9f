use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use ndarray::Array2;

use turntable::{RotationSampler, SamplerConfig, FULL_TURN_STEPS};
use turntable_geom::ply::write_ply_binary;
use turntable_imgproc::mask::write_mask_png;

/// Point block shaped like a small box around `offset`, with one arm point
/// sticking out so the cloud is not rotation symmetric.
fn box_points(offset: [f64; 3]) -> Vec<[f64; 3]> {
    let mut points = Vec::new();
    for &x in &[-0.1, 0.0, 0.1] {
        for &y in &[-0.1, 0.0, 0.1] {
            for &z in &[-0.1, 0.0, 0.1] {
                points.push([x + offset[0], y + offset[1], z + offset[2]]);
            }
        }
    }
    points.push([0.3 + offset[0], offset[1], offset[2]]);
    points
}

fn write_annotation(root: &Path) {
    let annotation = serde_json::json!({
        "cams": {
            "K": [
                [[16.0, 0.0, 8.0], [0.0, 16.0, 8.0], [0.0, 0.0, 1.0]],
                [[16.0, 0.0, 8.0], [0.0, 16.0, 8.0], [0.0, 0.0, 1.0]]
            ],
            "D": [
                [0.0, 0.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 0.0, 0.0]
            ],
            "R": [
                [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
                [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
            ],
            "T": [
                [0.0, 0.0, 2000.0],
                [100.0, 0.0, 2000.0]
            ]
        },
        "ims": [
            {"ims": ["cam0/000000.jpg", "cam1/000000.jpg"]},
            {"ims": ["cam0/000001.jpg", "cam1/000001.jpg"]},
            {"ims": ["cam0/000002.jpg", "cam1/000002.jpg"]}
        ]
    });
    fs::write(
        root.join("annots.json"),
        serde_json::to_vec(&annotation).unwrap(),
    )
    .unwrap();
}

fn write_frame_masks(root: &Path) {
    // full resolution 16x16 blobs in both mask sources
    let mut first = Array2::<u8>::zeros((16, 16));
    for y in 4..12 {
        for x in 4..12 {
            first[[y, x]] = 255;
        }
    }
    let mut second = Array2::<u8>::zeros((16, 16));
    for y in 6..14 {
        for x in 6..14 {
            second[[y, x]] = 1;
        }
    }
    for source in ["mask", "mask_cihp"] {
        for cam in ["cam0", "cam1"] {
            fs::create_dir_all(root.join(source).join(cam)).unwrap();
        }
    }
    for frame in 0..3 {
        for cam in ["cam0", "cam1"] {
            let name = format!("{cam}/{frame:06}.png");
            write_mask_png(root.join("mask").join(&name), &first).unwrap();
            write_mask_png(root.join("mask_cihp").join(&name), &second).unwrap();
        }
    }
}

fn write_geometry(root: &Path) {
    fs::create_dir_all(root.join("vertices")).unwrap();
    fs::create_dir_all(root.join("params")).unwrap();

    // frames 0..2; frame 2 is frame 1 shifted by a constant, with Th shifted
    // by the same constant
    let shift = [0.25, -0.3, 0.1];
    for frame in 0..3 {
        let (offset, th) = match frame {
            2 => (
                [0.0 + shift[0], 0.0 + shift[1], 1.0 + shift[2]],
                [0.05 + shift[0], -0.05 + shift[1], 1.0 + shift[2]],
            ),
            _ => ([0.0, 0.0, 1.0], [0.05, -0.05, 1.0]),
        };
        write_ply_binary(
            root.join("vertices").join(format!("{frame}.ply")),
            &box_points(offset),
        )
        .unwrap();
        let params = serde_json::json!({"Rh": [0.0, 0.0, 0.3], "Th": th});
        fs::write(
            root.join("params").join(format!("{frame}.json")),
            serde_json::to_vec(&params).unwrap(),
        )
        .unwrap();
    }
}

fn config(root: &Path, base_frame: usize) -> SamplerConfig {
    serde_json::from_value(serde_json::json!({
        "data_root": root,
        "subject": "subject_a",
        "begin_frame": 0,
        "base_frame": base_frame,
        "frame_interval": 1,
        "frame_count": 3,
        "training_views": [0, 1],
        "voxel_size": [0.005, 0.005, 0.005],
        "padding": "uniform",
        "height": 16,
        "width": 16,
        "ratio": 0.5,
        "exp_name": "turntable_test"
    }))
    .unwrap()
}

fn setup(root: &Path) {
    let _ = env_logger::builder().is_test(true).try_init();
    write_annotation(root);
    write_frame_masks(root);
    write_geometry(root);
}

#[test]
fn full_turn_has_144_angles() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let sampler = RotationSampler::new(config(dir.path(), 1), dir.path().join("annots.json")).unwrap();
    assert_eq!(sampler.len(), FULL_TURN_STEPS);
    assert!(!sampler.is_empty());
    assert_relative_eq!(sampler.angles()[72], std::f64::consts::PI, epsilon = 1e-12);
}

#[test]
fn half_turn_moves_the_pose_but_not_the_body_frame() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let sampler = RotationSampler::new(config(dir.path(), 1), dir.path().join("annots.json")).unwrap();

    let front = sampler.get(0).unwrap();
    let back = sampler.get(72).unwrap();

    // the synthetic rotation is folded into R, so the body-centric voxel
    // buckets are the same from every angle
    assert_eq!(front.coord, back.coord);
    assert_eq!(front.out_sh, back.out_sh);

    // while the world-side pose turned with the stage
    let th_shift: f64 = front
        .th
        .iter()
        .zip(&back.th)
        .map(|(a, b)| (a - b).abs())
        .sum();
    assert!(th_shift > 1e-3);
    assert!((front.r[0][0] - back.r[0][0]).abs() > 1e-3);

    for sample in [&front, &back] {
        for s in sample.out_sh {
            assert!(s > 0);
            assert_eq!(s % 32, 0);
            assert!(s <= 128);
        }
    }
}

#[test]
fn ray_bundle_covers_the_reduced_image_plane() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let sampler = RotationSampler::new(config(dir.path(), 1), dir.path().join("annots.json")).unwrap();

    let sample = sampler.get(0).unwrap();
    // 16x16 capture at ratio 0.5 -> 8x8 rays
    assert_eq!(sample.mask_at_box.len(), 64);
    assert_eq!(sample.ray_o.dim(), (64, 3));
    assert_eq!(sample.ray_d.dim(), (64, 3));
    let hits = sample.mask_at_box.iter().filter(|&&m| m).count();
    assert!(hits > 0, "the subject volume is in front of the camera");
    assert_eq!(sample.near.len(), hits);
    assert_eq!(sample.far.len(), hits);
}

#[test]
fn masks_are_fused_and_reduced_per_view() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let sampler = RotationSampler::new(config(dir.path(), 1), dir.path().join("annots.json")).unwrap();

    let sample = sampler.get(0).unwrap();
    assert_eq!(sample.masks.len(), 2);
    for mask in &sample.masks {
        assert_eq!(mask.dim(), (8, 8));
        // the fused blob survives undistortion, dilation and the resize
        assert!(mask.iter().any(|&v| v != 0));
        // the border stays background
        assert_eq!(mask[[0, 0]], 0);
    }
}

#[test]
fn zero_angle_keeps_body_pose() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let sampler = RotationSampler::new(config(dir.path(), 1), dir.path().join("annots.json")).unwrap();

    let sample = sampler.get(0).unwrap();
    // no synthetic rotation: Th passes through unchanged
    assert_relative_eq!(sample.th[0], 0.05, epsilon = 1e-9);
    assert_relative_eq!(sample.th[1], -0.05, epsilon = 1e-9);
    assert_relative_eq!(sample.th[2], 1.0, epsilon = 1e-9);
    // and R is the matrix of the stored rotation vector
    let expected = turntable_geom::transforms::rotation_vector_to_matrix(&[0.0, 0.0, 0.3]);
    for i in 0..3 {
        for j in 0..3 {
            assert_relative_eq!(sample.r[i][j], expected[i][j], epsilon = 1e-9);
        }
    }
    // feature columns 3..6 are the placeholder normals
    for row in sample.feature.rows() {
        assert_eq!(row[3], 0.0);
        assert_eq!(row[4], 0.0);
        assert_eq!(row[5], 0.0);
    }
}

#[test]
fn body_bounds_ignore_a_constant_world_shift() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    // frame 2 is frame 1 translated by a constant, with Th translated
    // identically; the body-centric bounds must match
    let plain = RotationSampler::new(config(dir.path(), 1), dir.path().join("annots.json"))
        .unwrap()
        .get(5)
        .unwrap();
    let shifted = RotationSampler::new(config(dir.path(), 2), dir.path().join("annots.json"))
        .unwrap()
        .get(5)
        .unwrap();
    for k in 0..3 {
        assert_relative_eq!(plain.bounds.min[k], shifted.bounds.min[k], epsilon = 1e-9);
        assert_relative_eq!(plain.bounds.max[k], shifted.bounds.max[k], epsilon = 1e-9);
    }
}

#[test]
fn quirk_subjects_shift_the_mask_frame_back_by_one() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());

    let mut cfg = config(dir.path(), 1);
    cfg.mask_offset_subjects = vec!["subject_a".into()];
    let sampler = RotationSampler::new(cfg, dir.path().join("annots.json")).unwrap();
    let sample = sampler.get(0).unwrap();
    assert_eq!(sample.frame_index, 0);

    let plain = RotationSampler::new(config(dir.path(), 1), dir.path().join("annots.json")).unwrap();
    assert_eq!(plain.get(0).unwrap().frame_index, 1);
}

#[test]
fn latent_index_is_clamped_to_the_frame_window() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let sampler = RotationSampler::new(config(dir.path(), 2), dir.path().join("annots.json")).unwrap();
    let sample = sampler.get(0).unwrap();
    // round(2 / 1) = 2 sits exactly on the frame_count - 1 cap
    assert_eq!(sample.latent_index, 2);
    assert_eq!(sample.frame_index, 2);
}

#[test]
fn missing_geometry_file_fails_the_query() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    fs::remove_file(dir.path().join("vertices/1.ply")).unwrap();
    let sampler = RotationSampler::new(config(dir.path(), 1), dir.path().join("annots.json")).unwrap();
    assert!(sampler.get(0).is_err());
}

#[test]
fn angle_index_out_of_range_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let sampler = RotationSampler::new(config(dir.path(), 1), dir.path().join("annots.json")).unwrap();
    assert!(sampler.get(FULL_TURN_STEPS).is_err());
}
