//! Batch flushing cadence, declared shapes, and round-trips.

use collect::{read_batch, BatchWriter, ImageDataset, Trajectory, VideoWriter};
use envs::{Observation, Step, StepInfo};

fn trajectory(len: usize) -> Trajectory {
    let mut trajectory = Trajectory::with_label("test");
    let obs = Observation {
        state: vec![0.0; 8],
        image: None,
    };
    for i in 0..len {
        let step = Step {
            observation: Observation {
                state: vec![i as f32; 8],
                image: None,
            },
            reward: 1.0,
            done: i + 1 == len,
            info: StepInfo {
                grasp_success: Some(1.0),
            },
        };
        trajectory.push(&obs, &[0.1, 0.2, 0.3, 0.4], &step);
    }
    trajectory
}

#[test]
fn flushes_exactly_one_batch_per_interval() {
    let dir = tempfile::tempdir().unwrap();
    let params = serde_json::json!({"action_scale": 0.2});
    let mut writer = BatchWriter::new(dir.path(), "demo", 5, &params).unwrap();

    for i in 0..14 {
        writer.push(trajectory(3)).unwrap();
        let expected = (i + 1) / 5;
        assert_eq!(writer.batches_written(), expected, "after episode {i}");
    }
    assert_eq!(writer.pending(), 4);

    let batch0 = writer.batch_path(0);
    let batch1 = writer.batch_path(1);
    let batch2 = writer.batch_path(2);
    assert!(batch0.exists());
    assert!(batch1.exists());
    assert!(!batch2.exists());

    // finish() flushes the tail.
    let total = writer.finish().unwrap();
    assert_eq!(total, 3);
    assert!(batch2.exists());
}

#[test]
fn batches_roundtrip_with_params_and_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let params = serde_json::json!({"action_scale": 0.2, "action_repeat": 10});
    let mut writer = BatchWriter::new(dir.path(), "demo", 2, &params).unwrap();
    writer.push(trajectory(4)).unwrap();
    writer.push(trajectory(4)).unwrap();

    let batch = read_batch(&writer.batch_path(0)).unwrap();
    assert_eq!(batch.trajectories.len(), 2);
    let parsed: serde_json::Value = serde_json::from_str(&batch.params_json).unwrap();
    assert_eq!(parsed, params);

    for trajectory in &batch.trajectories {
        assert_eq!(trajectory.len(), 4);
        assert_eq!(trajectory.observations.len(), 4);
        assert_eq!(trajectory.next_observations.len(), 4);
        assert_eq!(trajectory.actions.len(), 4);
        assert_eq!(trajectory.rewards.len(), 4);
        assert_eq!(trajectory.terminals.len(), 4);
        assert_eq!(trajectory.env_infos.len(), 4);
        assert_eq!(trajectory.actions[0].len(), 4);
        assert_eq!(trajectory.terminals, vec![0, 0, 0, 1]);
        assert!((trajectory.episode_return() - 4.0).abs() < f32::EPSILON);
    }
}

#[test]
fn image_dataset_keeps_declared_shape() {
    let mut dataset = ImageDataset::new(2, 3, 12);
    assert_eq!(dataset.shape(), (2, 3, 12));

    dataset.set_frame(1, 2, &[7u8; 12]).unwrap();
    assert_eq!(dataset.frame(1, 2), &[7u8; 12]);
    assert_eq!(dataset.frame(0, 0), &[0u8; 12]);

    // Wrong frame length is rejected.
    assert!(dataset.set_frame(0, 0, &[1u8; 5]).is_err());
}

#[test]
fn image_dataset_roundtrips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("images.bin");

    let mut dataset = ImageDataset::new(1, 2, 6);
    dataset.set_frame(0, 0, &[1, 2, 3, 4, 5, 6]).unwrap();
    dataset.set_frame(0, 1, &[9, 9, 9, 9, 9, 9]).unwrap();
    dataset.save(&path).unwrap();

    let loaded = ImageDataset::load(&path).unwrap();
    assert_eq!(loaded.shape(), (1, 2, 6));
    assert_eq!(loaded.frame(0, 0), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(loaded.frame(0, 1), &[9, 9, 9, 9, 9, 9]);
}

#[test]
fn video_writer_produces_a_gif() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("episode.gif");

    let mut video = VideoWriter::new();
    for shade in [0u8, 128, 255] {
        video.push(image::RgbaImage::from_pixel(
            8,
            8,
            image::Rgba([shade, shade, shade, 255]),
        ));
    }
    assert_eq!(video.len(), 3);
    video.save_gif(&path, 100).unwrap();
    assert!(video.is_empty());

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"GIF8"), "not a gif file");
}
