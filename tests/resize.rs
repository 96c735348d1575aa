//! Resize propagation

mod common;

use common::{offline_context, CountingScheduler, RecordingRenderer};
use roomview::systems::{handle_resize, FrameLoop};
use roomview_core::Vec2;

#[test]
fn test_resize_updates_surface_and_camera_before_render() {
    let mut ctx = offline_context();
    let mut renderer = RecordingRenderer::default();
    let scheduler = CountingScheduler::default();
    let mut frame_loop = FrameLoop::new(0.25);

    assert!(handle_resize(&mut ctx, &mut renderer, 800, 400));
    frame_loop.run_frame(0.016, &mut ctx, &mut renderer, &scheduler);

    assert_eq!(renderer.size, (800, 400));
    assert_eq!(renderer.calls[0].camera_aspect, 2.0);
    assert_eq!(ctx.pointer.viewport(), Vec2::new(800.0, 400.0));
}

#[test]
fn test_zero_sized_resize_ignored() {
    let mut ctx = offline_context();
    let mut renderer = RecordingRenderer::default();
    handle_resize(&mut ctx, &mut renderer, 1024, 512);
    let aspect = ctx.camera.aspect;

    assert!(!handle_resize(&mut ctx, &mut renderer, 0, 0));
    assert!(!handle_resize(&mut ctx, &mut renderer, 1024, 0));
    assert_eq!(renderer.size, (1024, 512));
    assert_eq!(renderer.resizes, 1);
    assert_eq!(ctx.camera.aspect, aspect);
}

#[test]
fn test_pointer_ndc_after_resize() {
    let mut ctx = offline_context();
    let mut renderer = RecordingRenderer::default();
    handle_resize(&mut ctx, &mut renderer, 200, 100);

    ctx.on_cursor_moved(100.0, 50.0);
    assert_eq!(ctx.interaction.pointer_ndc, Vec2::ZERO);
    ctx.on_cursor_moved(0.0, 0.0);
    assert_eq!(ctx.interaction.pointer_ndc, Vec2::new(-1.0, 1.0));
    ctx.on_cursor_moved(200.0, 100.0);
    assert_eq!(ctx.interaction.pointer_ndc, Vec2::new(1.0, -1.0));
}
