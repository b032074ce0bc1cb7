// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios across the camera, planes, layers, and history.

use easel_view::{
    CanvasLayer, Color, FitMode, Layer, LayerSpace, MarginUpdate, Modifiers, PointerButton,
    ViewConfig, ViewController, WheelDelta, WheelDeltaMode,
};
use kurbo::{Point, Rect, Vec2};

fn red() -> Color {
    Color::from_rgba8(255, 0, 0, 255)
}

/// Drive the frame loop for `frames` ticks of 16 ms.
fn run(vc: &mut ViewController, frames: usize) {
    let mut now = 0.0;
    for _ in 0..frames {
        now += 16.0;
        vc.tick(now);
    }
}

#[test]
fn anchored_zoom_settles_on_the_cursor() {
    // 1000x1000 canvas, DPR 1, identity camera. Retarget 2x under the
    // center and let the loop settle.
    let mut vc = ViewController::new(1000.0, 1000.0, 1.0, ViewConfig::default()).unwrap();
    vc.zoom_to_at_screen(500.0, 500.0, 2.0);
    run(&mut vc, 400);

    assert!((vc.zoom() - 2.0).abs() < 1e-3);
    assert!((vc.translation().x + 500.0).abs() < 0.5);
    assert!((vc.translation().y + 500.0).abs() < 0.5);

    // The world point that was under the cursor is still under it.
    let world = vc.to_world(500.0, 500.0);
    assert!((world.x - 500.0).abs() < 0.5);
    assert!((world.y - 500.0).abs() < 0.5);
}

#[test]
fn fit_contain_centers_the_document() {
    let mut vc = ViewController::new(800.0, 600.0, 1.0, ViewConfig::default()).unwrap();
    vc.set_document_rect(0.0, 0.0, 700.0, 700.0);
    vc.set_document_margins(MarginUpdate {
        left: Some(50.0),
        right: Some(50.0),
        top: Some(50.0),
        bottom: Some(50.0),
    });
    vc.zoom_document_to_fit(FitMode::Contain);

    assert!((vc.zoom() - 500.0 / 700.0).abs() < 1e-12);
    let center = vc.to_screen(350.0, 350.0);
    assert!((center.x - 400.0).abs() < 0.5);
    assert!((center.y - 300.0).abs() < 0.5);
}

#[test]
fn min_visible_clamp_stops_runaway_pan() {
    let mut vc = ViewController::new(1000.0, 1000.0, 1.0, ViewConfig::default()).unwrap();
    vc.set_document_rect(0.0, 0.0, 2000.0, 2000.0);

    // Drag the document almost entirely off to the left.
    vc.pointer_down(Point::new(500.0, 500.0), PointerButton::Primary, 0.0);
    vc.pointer_move(Vec2::new(-1e6, -1e6), 16.0);
    vc.pointer_up(16.0);
    run(&mut vc, 1);

    // The document's right edge holds at min_visible_px from the left
    // viewport edge: tx = 30 - 2000.
    assert!((vc.translation().x - (30.0 - 2000.0)).abs() < 1e-9);
    assert!((vc.translation().y - (30.0 - 2000.0)).abs() < 1e-9);
}

#[test]
fn content_pipeline_paints_layers_under_the_camera() {
    let mut vc = ViewController::new(200.0, 200.0, 1.0, ViewConfig::default()).unwrap();

    let mut layer = CanvasLayer::new("art", 100, 100).unwrap();
    layer.surface_mut().fill_all(red());
    layer.common_mut().pose.x = 50.0;
    layer.common_mut().pose.y = 50.0;
    vc.content_layers_mut().add_layer(Box::new(layer), None);
    run(&mut vc, 1);

    // Inside the layer: red. Outside: the white background.
    let inside = vc.pixel_color_at_screen(100.0, 100.0);
    assert_eq!((inside.r, inside.g, inside.b), (255, 0, 0));
    let outside = vc.pixel_color_at_screen(10.0, 10.0);
    assert_eq!((outside.r, outside.g, outside.b), (255, 255, 255));

    // World reads agree with screen reads.
    let world = vc.pixel_color_at_world(75.0, 75.0);
    assert_eq!(world.r, 255);

    // After a raw 2x zoom at the origin the layer lands further out.
    vc.zoom_to_at_screen_raw(0.0, 0.0, 2.0);
    run(&mut vc, 1);
    assert_eq!(vc.pixel_color_at_screen(150.0, 150.0).r, 255);
    let former_edge = vc.pixel_color_at_screen(60.0, 60.0);
    assert_eq!((former_edge.r, former_edge.g), (255, 255));
}

#[test]
fn dpr_scales_the_device_planes() {
    let mut vc = ViewController::new(100.0, 100.0, 2.0, ViewConfig::default()).unwrap();
    assert_eq!(vc.final_surface().width(), 200);
    assert_eq!(vc.final_surface().height(), 200);

    let mut layer = CanvasLayer::new("art", 50, 50).unwrap();
    layer.surface_mut().fill_all(red());
    layer.common_mut().pose.x = 10.0;
    layer.common_mut().pose.y = 10.0;
    vc.content_layers_mut().add_layer(Box::new(layer), None);
    run(&mut vc, 1);

    // CSS (30, 30) is device (60, 60); both views agree.
    assert_eq!(vc.pixel_color_at_screen(30.0, 30.0).r, 255);
    assert_eq!(vc.content_surface().pixel(60, 60).r, 255);
    // CSS (5, 5) is outside the layer.
    assert_eq!(vc.pixel_color_at_screen(5.0, 5.0).g, 255);
}

#[test]
fn overlay_composites_over_content() {
    let mut vc = ViewController::new(100.0, 100.0, 1.0, ViewConfig::default()).unwrap();

    let mut content = CanvasLayer::new("content", 100, 100).unwrap();
    content.surface_mut().fill_all(red());
    vc.content_layers_mut().add_layer(Box::new(content), None);

    let swatch = easel_layers::overlay::SwatchLayer::new(
        "swatch",
        Rect::new(10.0, 10.0, 30.0, 30.0),
        Color::from_rgba8(0, 255, 0, 255),
    );
    vc.overlay_layers_mut().add_layer(Box::new(swatch), None);
    run(&mut vc, 1);

    // The final plane shows the swatch over the content.
    let over = vc.final_surface().pixel(20, 20);
    assert_eq!((over.r, over.g), (0, 255));
    let under = vc.final_surface().pixel(60, 60);
    assert_eq!(under.r, 255);

    // The content plane itself is unaffected by the overlay.
    assert_eq!(vc.pixel_color_at_screen(20.0, 20.0).r, 255);
}

#[test]
fn screen_layers_ignore_the_camera() {
    let mut vc = ViewController::new(100.0, 100.0, 1.0, ViewConfig::default()).unwrap();
    let mut hud = CanvasLayer::new("hud", 10, 10).unwrap();
    hud.surface_mut().fill_all(red());
    hud.common_mut().space = LayerSpace::Screen;
    hud.common_mut().pose.x = 80.0;
    vc.content_layers_mut().add_layer(Box::new(hud), None);

    vc.zoom_to_at_screen_raw(0.0, 0.0, 2.0);
    run(&mut vc, 1);
    // Still at CSS (80..90, 0..10) despite the 2x camera.
    assert_eq!(vc.pixel_color_at_screen(85.0, 5.0).r, 255);
    assert_eq!(vc.pixel_color_at_screen(45.0, 5.0).g, 255);
}

#[test]
fn document_clip_and_border() {
    let config = ViewConfig {
        draw_doc_border: true,
        ..ViewConfig::default()
    };
    let mut vc = ViewController::new(200.0, 200.0, 1.0, config).unwrap();
    vc.set_document_rect(50.0, 50.0, 100.0, 100.0);

    // A content layer bigger than the document: everything outside the
    // document must be clipped away.
    let mut layer = CanvasLayer::new("art", 200, 200).unwrap();
    layer.surface_mut().fill_all(red());
    vc.content_layers_mut().add_layer(Box::new(layer), None);
    run(&mut vc, 1);

    assert_eq!(vc.pixel_color_at_screen(100.0, 100.0).r, 255);
    // Outside the document the background shows through.
    let outside = vc.pixel_color_at_screen(20.0, 100.0);
    assert_eq!((outside.r, outside.g, outside.b), (255, 255, 255));

    // The border darkens the document edge.
    let edge = vc.pixel_color_at_screen(100.0, 50.0);
    assert!(edge.r < 255);
}

#[test]
fn wheel_zoom_honors_limits() {
    let mut vc = ViewController::new(400.0, 400.0, 1.0, ViewConfig::default()).unwrap();
    let up = WheelDelta {
        dx: 0.0,
        dy: -120.0,
        mode: WheelDeltaMode::Pixel,
    };
    vc.wheel(Point::new(200.0, 200.0), up, Modifiers::default());
    assert!(vc.view().target_zoom() > 1.0);

    for _ in 0..2000 {
        vc.wheel(Point::new(200.0, 200.0), up, Modifiers::default());
    }
    run(&mut vc, 400);
    assert!(vc.zoom() <= 10.0 + 1e-9);

    let down = WheelDelta {
        dx: 0.0,
        dy: 120.0,
        mode: WheelDeltaMode::Pixel,
    };
    for _ in 0..2000 {
        vc.wheel(Point::new(200.0, 200.0), down, Modifiers::default());
    }
    run(&mut vc, 400);
    assert!(vc.zoom() >= 0.5 - 1e-9);
}

#[test]
fn disabling_pan_mid_drag_freezes_the_camera() {
    let mut vc = ViewController::new(200.0, 200.0, 1.0, ViewConfig::default()).unwrap();
    vc.pointer_down(Point::new(100.0, 100.0), PointerButton::Primary, 0.0);
    vc.pointer_move(Vec2::new(40.0, 0.0), 16.0);
    let mid = vc.translation();
    assert_eq!(mid.x, 40.0);

    vc.set_pan_enabled(false);
    vc.pointer_move(Vec2::new(40.0, 0.0), 32.0);
    run(&mut vc, 10);
    assert_eq!(vc.translation(), mid);
}

#[test]
fn secondary_button_does_not_pan() {
    let mut vc = ViewController::new(200.0, 200.0, 1.0, ViewConfig::default()).unwrap();
    vc.pointer_down(Point::new(100.0, 100.0), PointerButton::Secondary, 0.0);
    vc.pointer_move(Vec2::new(40.0, 0.0), 16.0);
    assert_eq!(vc.translation(), Vec2::ZERO);
}

#[test]
fn smooth_reset_returns_to_identity() {
    let mut vc = ViewController::new(300.0, 300.0, 1.0, ViewConfig::default()).unwrap();
    vc.zoom_to_at_screen_raw(100.0, 100.0, 4.0);
    vc.pointer_down(Point::new(0.0, 0.0), PointerButton::Primary, 0.0);
    vc.pointer_move(Vec2::new(55.0, -20.0), 16.0);
    vc.pointer_up(200.0);

    vc.reset_smooth();
    run(&mut vc, 600);
    assert_eq!(vc.translation(), Vec2::ZERO);
    assert!((vc.zoom() - 1.0).abs() < 1e-9);
}

#[test]
fn resize_rebuilds_planes_and_keeps_painting() {
    let mut vc = ViewController::new(100.0, 100.0, 1.0, ViewConfig::default()).unwrap();
    run(&mut vc, 1);
    vc.resize(50.0, 40.0, 2.0).unwrap();
    assert_eq!(vc.final_surface().width(), 100);
    assert_eq!(vc.final_surface().height(), 80);
    run(&mut vc, 1);
    // Background still paints after the rebuild.
    assert_eq!(vc.pixel_color_at_screen(25.0, 20.0).r, 255);

    // Shrinking to nothing fails without tearing the controller down.
    assert!(vc.resize(0.0, 40.0, 1.0).is_err());
}

#[test]
fn painting_on_a_stacked_layer_with_undo() {
    use easel_history::{HistoryManager, StrokeMode};

    let mut vc = ViewController::new(200.0, 200.0, 1.0, ViewConfig::default()).unwrap();
    let mut layer = CanvasLayer::new("paint", 200, 200).unwrap();
    layer.bind_history(HistoryManager::default());
    let id = vc.content_layers_mut().add_layer(Box::new(layer), None);

    // Host flow: convert pointer positions to world, then stroke.
    let start = vc.to_world(40.0, 40.0);
    let end = vc.to_world(160.0, 160.0);
    {
        let layer = vc.content_layers_mut().canvas_mut(id).unwrap();
        layer.begin_stroke(start.x, start.y);
        layer.stroke_to(end.x, end.y, red(), 6.0, 1.0, StrokeMode::Brush);
        layer.end_stroke();
    }
    run(&mut vc, 1);
    assert_eq!(vc.pixel_color_at_screen(100.0, 100.0).r, 255);
    assert_eq!(vc.pixel_color_at_screen(100.0, 100.0).g, 0);

    let layer = vc.content_layers_mut().canvas_mut(id).unwrap();
    assert!(layer.undo());
    run(&mut vc, 1);
    let px = vc.pixel_color_at_screen(100.0, 100.0);
    assert_eq!((px.r, px.g, px.b), (255, 255, 255));
}
