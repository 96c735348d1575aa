//! Frame loop ordering and load-completion behavior

mod common;

use std::sync::mpsc;
use std::time::{Duration, Instant};

use common::{offline_context, CountingScheduler, GatedBoxes, RecordingRenderer};
use roomview::config::AppConfig;
use roomview::systems::{AppContext, FrameLoop};
use roomview_core::ModelLoader;
use roomview_render::RenderError;

#[test]
fn test_one_step_and_one_render_per_frame() {
    let mut ctx = offline_context();
    let mut renderer = RecordingRenderer::default();
    let scheduler = CountingScheduler::default();
    let mut frame_loop = FrameLoop::new(0.25);

    for (i, dt) in [0.0, 1.0 / 60.0, 0.1, 5.0].into_iter().enumerate() {
        frame_loop.run_frame(dt, &mut ctx, &mut renderer, &scheduler);
        let frames = i as u64 + 1;
        assert_eq!(renderer.calls.len() as u64, frames);
        // The step for this frame has already happened when render runs
        assert_eq!(renderer.calls[i].step_calls, frames);
        assert_eq!(scheduler.requests.get() as u64, frames);
    }
    assert_eq!(frame_loop.frame_count(), 4);
}

#[test]
fn test_large_delta_is_clamped() {
    let mut ctx = offline_context();
    let mut renderer = RecordingRenderer::default();
    let scheduler = CountingScheduler::default();
    let mut frame_loop = FrameLoop::new(0.25);

    let report = frame_loop.run_frame(10.0, &mut ctx, &mut renderer, &scheduler);
    assert_eq!(report.dt, 0.25);
    // 0.25 s at 20 Hz, give or take float rounding in the accumulator
    assert!((4..=5).contains(&report.substeps), "substeps = {}", report.substeps);

    let report = frame_loop.run_frame(f32::NAN, &mut ctx, &mut renderer, &scheduler);
    assert_eq!(report.dt, 0.0);
    assert_eq!(report.substeps, 0);
}

#[test]
fn test_render_error_does_not_stop_the_loop() {
    let mut ctx = offline_context();
    let mut renderer = RecordingRenderer {
        fail_with: Some(RenderError::Timeout),
        ..RecordingRenderer::default()
    };
    let scheduler = CountingScheduler::default();
    let mut frame_loop = FrameLoop::new(0.25);

    let report = frame_loop.run_frame(0.016, &mut ctx, &mut renderer, &scheduler);
    assert!(!report.rendered);
    assert_eq!(report.render_error, Some(RenderError::Timeout));
    assert_eq!(scheduler.requests.get(), 1);

    renderer.fail_with = None;
    let report = frame_loop.run_frame(0.016, &mut ctx, &mut renderer, &scheduler);
    assert!(report.rendered);
}

#[test]
fn test_power_flag_turns_knob_over_frames() {
    let mut ctx = offline_context();
    let mut renderer = RecordingRenderer::default();
    let scheduler = CountingScheduler::default();
    let mut frame_loop = FrameLoop::new(0.25);

    ctx.toggle_power();
    frame_loop.run_frame(0.0, &mut ctx, &mut renderer, &scheduler);
    assert_eq!(ctx.tweens.active_count(), 1);

    for _ in 0..30 {
        frame_loop.run_frame(1.0 / 60.0, &mut ctx, &mut renderer, &scheduler);
    }
    assert_eq!(ctx.tweens.active_count(), 0);
    let tv = ctx.tv.as_ref().unwrap();
    assert!(tv.is_powered());
    let yaw = ctx.graph.get(tv.knob).unwrap().transform.euler().y.to_degrees();
    assert!((yaw + 90.0).abs() < 0.01, "knob yaw {yaw}");
}

#[test]
fn test_plant_registers_physics_only_after_load() {
    let (gate, rx) = mpsc::channel();
    let loader = ModelLoader::with_source(GatedBoxes { gate: rx });
    let mut ctx = AppContext::with_loader(&AppConfig::default(), loader);
    let mut renderer = RecordingRenderer::default();
    let scheduler = CountingScheduler::default();
    let mut frame_loop = FrameLoop::new(0.25);

    let plant = ctx.graph.find_by_name("plantFromFile").unwrap();
    for _ in 0..5 {
        frame_loop.run_frame(1.0 / 60.0, &mut ctx, &mut renderer, &scheduler);
    }
    assert!(ctx.graph.get(plant).unwrap().physics.is_none());
    assert_eq!(ctx.graph.physics().unwrap().body_count(), 0);

    // Release the three models
    for _ in 0..3 {
        gate.send(()).unwrap();
    }
    let deadline = Instant::now() + Duration::from_secs(5);
    while ctx.loader.pending_count() > 0 && Instant::now() < deadline {
        frame_loop.run_frame(1.0 / 60.0, &mut ctx, &mut renderer, &scheduler);
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(ctx.loader.pending_count(), 0);
    assert!(ctx.graph.get(plant).unwrap().physics.is_some());
    assert_eq!(ctx.graph.physics().unwrap().body_count(), 1);
    // Floor plus the table's box
    assert_eq!(ctx.graph.physics().unwrap().static_colliders().len(), 2);
}
