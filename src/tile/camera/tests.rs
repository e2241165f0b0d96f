use std::time::Duration;

use super::*;
use crate::app::input::FrameInput;
use crate::utils::DEFAULT_EPSILON;

#[test]
fn test_zoom_is_clamped() {
    let mut camera = Camera::new(Size::new(800, 600));
    assert_eq!(camera.current_zoom(), DEFAULT_ZOOM);

    camera.set_zoom(10.0);
    assert_eq!(camera.current_zoom(), MAX_ZOOM);

    camera.set_zoom(0.0);
    assert_eq!(camera.current_zoom(), MIN_ZOOM);

    camera.set_zoom(-3.0);
    assert_eq!(camera.current_zoom(), MIN_ZOOM);

    camera.set_zoom(f32::NAN);
    assert_eq!(camera.current_zoom(), MIN_ZOOM);

    camera.set_zoom(1.5);
    camera.request_zoom(Zoom::In, 2.0);
    assert_eq!(camera.current_zoom(), MAX_ZOOM);
    camera.request_zoom(Zoom::Out, 2.0);
    assert_eq!(camera.current_zoom(), 1.0);
}

#[test]
fn test_dirty_flag() {
    let mut camera = Camera::new(Size::new(800, 600));
    assert!(camera.is_dirty());

    let _ = camera.view_transform();
    assert!(!camera.is_dirty());

    // No-op changes keep it clean:
    {
        camera.set_zoom(DEFAULT_ZOOM);
        camera.pan(Vec2::zero());
        camera.set_viewport_size(Size::new(800, 600));
        assert!(!camera.is_dirty());
    }

    // Pan dirties, recompute clears:
    {
        camera.pan(Vec2::new(10.0, 0.0));
        assert!(camera.is_dirty());
        let _ = camera.view_transform();
        assert!(!camera.is_dirty());
    }

    // Zoom dirties:
    {
        camera.set_zoom(0.5);
        assert!(camera.is_dirty());
        let _ = camera.view_transform();
    }

    // Resize dirties:
    {
        camera.set_viewport_size(Size::new(1024, 768));
        assert!(camera.is_dirty());
    }
}

#[test]
fn test_view_transform() {
    let mut camera = Camera::new(Size::new(800, 600));
    camera.pan(Vec2::new(100.0, -50.0));
    camera.set_zoom(2.0);

    let view = camera.view_transform();
    let iso = Vec2::new(30.0, 20.0);

    // (iso - displacement) * zoom + center
    let expected = Vec2::new((30.0 - 100.0) * 2.0 + 400.0, (20.0 + 50.0) * 2.0 + 300.0);
    assert!(view.apply_to_iso_point(iso).approx_equal(expected, DEFAULT_EPSILON));

    // Inverse maps back:
    assert!(view.apply_to_screen_point(expected).approx_equal(iso, DEFAULT_EPSILON));

    // Cached and read-only paths agree:
    assert_eq!(camera.current_view_transform(), view);
}

#[test]
fn test_parallax() {
    let mut camera = Camera::new(Size::new(800, 600));
    camera.pan(Vec2::new(200.0, 100.0));

    let origin = Vec2::zero();
    let center = camera.viewport_center();

    // Parallax 0 never moves:
    let background = camera.compute_view_transform(0.0);
    assert!(background.apply_to_iso_point(origin).approx_equal(center, DEFAULT_EPSILON));

    // Half parallax moves half as far:
    let midground = camera.compute_view_transform(0.5);
    assert!(midground.apply_to_iso_point(origin)
        .approx_equal(center - Vec2::new(100.0, 50.0), DEFAULT_EPSILON));

    // Negative parallax is treated as 0:
    assert_eq!(camera.compute_view_transform(-1.0), background);
}

#[test]
fn test_input_controls() {
    let mut camera = Camera::new(Size::new(800, 600));
    let controls = CameraControls { pan_speed: 100.0, zoom_step: 2.0 };
    let mut input = FrameInput::new();

    // Pan right and up for half a second:
    {
        input.set_key(Key::Right, true);
        input.set_key(Key::Up, true);
        camera.update(&input, &controls, Duration::from_millis(500));
        assert!(camera.displacement().approx_equal(Vec2::new(50.0, -50.0), DEFAULT_EPSILON));
        input.set_key(Key::Right, false);
        input.set_key(Key::Up, false);
        input.end_frame();
    }

    // Zoom in by key press, only once while held:
    {
        input.set_key(Key::Equal, true);
        camera.update(&input, &controls, Duration::from_millis(16));
        assert_eq!(camera.current_zoom(), 2.0);
        input.end_frame();
        camera.update(&input, &controls, Duration::from_millis(16));
        assert_eq!(camera.current_zoom(), 2.0);
        input.set_key(Key::Equal, false);
        input.end_frame();
    }

    // Scroll down zooms out:
    {
        input.add_scroll(-1.0);
        camera.update(&input, &controls, Duration::from_millis(16));
        assert_eq!(camera.current_zoom(), 1.0);
        input.end_frame();
    }
}
