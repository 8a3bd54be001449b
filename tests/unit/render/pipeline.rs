use std::sync::Arc;

use super::*;
use crate::animation::clip::{AnimationClip, Direction, SpriteFrame};
use crate::animation::sequencer::AnimationParams;
use crate::decode::source::InMemorySource;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Fps, Rgb8};

const PITCH: Rgb8 = Rgb8::new(10, 90, 20);
const POST: Rgb8 = Rgb8::new(220, 220, 220);
const RED: Rgb8 = Rgb8::new(250, 0, 0);

fn goal_frame() -> VideoFrame {
    let mut frame = VideoFrame::filled(200, 120, PITCH);
    frame.fill_rect(20, 20, 170, 80, POST);
    frame
}

fn red_clip(len: usize) -> Arc<AnimationClip> {
    let sprite =
        SpriteFrame::from_rgba(image::RgbaImage::from_pixel(10, 5, image::Rgba([250, 0, 0, 255])));
    Arc::new(AnimationClip::new(Direction::Right, vec![sprite; len]))
}

fn state(len: usize, total: u64, speed: f64) -> AnimationState {
    AnimationState::new(
        red_clip(len),
        total,
        AnimationParams {
            speed,
            y_offset_fraction: 0.25,
        },
    )
    .unwrap()
}

#[test]
fn detection_without_animation_leaves_frame_untouched() {
    let renderer = VideoRenderer::default();
    let mut frame = goal_frame();
    let before = frame.clone();
    let report = renderer.process_frame(&mut frame, None).unwrap();

    assert_eq!(report.goal, Some(GoalBox::new(20, 20, 170, 80).unwrap()));
    assert_eq!(report.sprite_index, None);
    assert_eq!(report.composite, None);
    assert_eq!(frame, before);
}

#[test]
fn sprite_is_composited_on_detected_goal() {
    let renderer = VideoRenderer::default();
    let mut st = state(4, 10, 1.0);
    let mut frame = goal_frame();
    let report = renderer.process_frame(&mut frame, Some(&mut st)).unwrap();

    assert_eq!(report.sprite_index, Some(0));
    assert_eq!(
        report.composite,
        Some(CompositeOutcome::Applied {
            x: 20,
            y: 23,
            width: 150,
            height: 75
        })
    );
    assert_eq!(frame.pixel(30, 50), RED);
    assert_eq!(frame.pixel(5, 5), PITCH);
    assert_eq!(st.current_video_frame(), 1);
}

#[test]
fn missed_detection_still_advances_the_timeline() {
    let renderer = VideoRenderer::default();
    let mut st = state(4, 10, 1.0);
    let mut frame = VideoFrame::filled(200, 120, PITCH);
    let before = frame.clone();
    let report = renderer.process_frame(&mut frame, Some(&mut st)).unwrap();

    assert_eq!(report.goal, None);
    assert_eq!(report.sprite_index, Some(0));
    assert_eq!(report.composite, None);
    assert_eq!(frame, before);
    assert_eq!(st.current_video_frame(), 1);
}

#[test]
fn exhausted_timeline_stops_compositing() {
    let renderer = VideoRenderer::default();
    let mut st = state(4, 2, 1.0);
    for _ in 0..2 {
        let mut frame = goal_frame();
        let report = renderer.process_frame(&mut frame, Some(&mut st)).unwrap();
        assert!(report.sprite_index.is_some());
    }
    let mut frame = goal_frame();
    let before = frame.clone();
    let report = renderer.process_frame(&mut frame, Some(&mut st)).unwrap();
    assert_eq!(report.sprite_index, None);
    assert_eq!(frame, before);
    assert_eq!(st.current_video_frame(), 3);
}

#[test]
fn render_streams_every_frame_into_sink() {
    let renderer = VideoRenderer::default();
    let fps = Fps::new(25, 1).unwrap();
    let frames = (0..6)
        .map(|i| {
            if i % 2 == 0 {
                goal_frame()
            } else {
                VideoFrame::filled(200, 120, PITCH)
            }
        })
        .collect();
    let mut source = InMemorySource::new(200, 120, fps, frames).unwrap();
    let mut sink = InMemorySink::new();

    let stats = renderer
        .render(&mut source, Some(state(3, 6, 1.0)), &mut sink)
        .unwrap();

    assert_eq!(
        stats,
        RenderStats {
            frames_total: 6,
            frames_detected: 3,
            frames_composited: 3,
        }
    );
    assert!(sink.is_finished());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps), (200, 120, fps));
    assert_eq!(sink.frames().len(), 6);
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!((frame.width, frame.height), (200, 120));
    }
}

#[test]
fn invalid_detect_config_is_rejected() {
    let cfg = DetectConfig {
        close_kernel: 4,
        ..DetectConfig::default()
    };
    assert!(VideoRenderer::new(cfg).is_err());
}
