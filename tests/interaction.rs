//! Clicking through the camera into the living room

mod common;

use common::offline_context;
use roomview_core::{DispatchOutcome, Vec2, Vec3};

/// Put the camera straight in front of the power knob
fn aim_at_knob(ctx: &mut roomview::systems::AppContext) {
    let knob = ctx.tv.as_ref().unwrap().knob;
    let assembly = ctx.graph.find_by_name("knobAssembly").unwrap();
    let out_of_front = ctx
        .graph
        .world_matrix(assembly)
        .transform_vector3(Vec3::Y)
        .normalize();
    let target = ctx.graph.world_position(knob);
    ctx.camera.target = target;
    ctx.camera.position = target + out_of_front * 60.0;
}

#[test]
fn test_click_on_knob_toggles_once() {
    let mut ctx = offline_context();
    aim_at_knob(&mut ctx);

    let outcome = ctx.handle_click(Vec2::ZERO);
    let knob = ctx.tv.as_ref().unwrap().knob;
    assert!(matches!(outcome, DispatchOutcome::Activated { handler, .. } if handler == knob));
    assert!(ctx.is_powered());
    assert_eq!(ctx.interaction.toggles, 1);

    ctx.handle_click(Vec2::ZERO);
    assert!(!ctx.is_powered());
    assert_eq!(ctx.interaction.toggles, 2);
}

#[test]
fn test_click_on_nothing_is_noop() {
    let mut ctx = offline_context();
    ctx.camera.position = Vec3::new(0.0, 500.0, 0.0);
    ctx.camera.target = Vec3::new(0.0, 900.0, 1.0);

    assert_eq!(ctx.handle_click(Vec2::ZERO), DispatchOutcome::Missed);
    assert!(!ctx.is_powered());
    assert_eq!(ctx.interaction.toggles, 0);
}

#[test]
fn test_click_on_floor_is_unhandled() {
    let mut ctx = offline_context();
    ctx.camera.position = Vec3::new(80.0, 100.0, 80.0);
    ctx.camera.target = Vec3::new(80.0, 0.0, 79.0);

    let outcome = ctx.handle_click(Vec2::ZERO);
    let floor = ctx.graph.find_by_name("floor").unwrap();
    assert_eq!(outcome, DispatchOutcome::Unhandled { node: floor });
    assert!(!ctx.is_powered());
}
