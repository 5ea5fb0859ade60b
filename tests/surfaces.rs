//! Surface creation, matching against native formats, and destruction.

use eglx::display::Display;
use eglx::egl;
use eglx::error::ErrorKind;
use eglx::platform::glx;
use eglx::platform::headless::HeadlessPlatform;
use eglx::surface::SurfaceType;

const WINDOW: u32 = 77;

fn initialized() -> Display<HeadlessPlatform> {
    let mut display = Display::new(HeadlessPlatform::new());
    display.initialize().unwrap();
    display
}

#[test]
fn window_surface_against_a_double_buffered_config() {
    let display = initialized();

    let surface = display.create_window_surface(0, WINDOW, &[egl::NONE]).unwrap();
    assert_eq!(surface.surface_type(), SurfaceType::Window);
    assert!(surface.draw_to_window());
    assert!(!surface.draw_to_pixmap());
    assert!(!surface.draw_to_pbuffer());
    assert!(surface.is_double_buffered());
    assert_eq!(surface.config_id(), 0);
    assert_eq!(surface.raw(), WINDOW);

    // The caller keeps the window; dropping a window surface touches no
    // native resource.
    assert_eq!(display.platform().destroyed_window_count(), 0);
}

#[test]
fn creation_requeries_the_native_formats() {
    let display = initialized();
    let after_init = display.platform().format_batch_count();

    display.create_window_surface(0, WINDOW, &[egl::NONE]).unwrap();
    assert_eq!(display.platform().format_batch_count(), after_init + 1);

    display.create_pbuffer_surface(0, &[egl::NONE]).unwrap();
    assert_eq!(display.platform().format_batch_count(), after_init + 2);
}

#[test]
fn render_buffer_request_must_match_the_config() {
    let display = initialized();

    // Config 0 is double-buffered, config 1 is not.
    let err = display
        .create_window_surface(0, WINDOW, &[egl::RENDER_BUFFER, egl::SINGLE_BUFFER, egl::NONE])
        .unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::BadMatch);

    let err = display
        .create_window_surface(1, WINDOW, &[egl::RENDER_BUFFER, egl::BACK_BUFFER, egl::NONE])
        .unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::BadMatch);

    display
        .create_window_surface(0, WINDOW, &[egl::RENDER_BUFFER, egl::BACK_BUFFER, egl::NONE])
        .unwrap();
}

#[test]
fn srgb_request_narrows_the_match() {
    let display = initialized();

    // Visual 0x22 is the sRGB-capable one.
    let surface = display
        .create_window_surface(1, WINDOW, &[egl::GL_COLORSPACE, egl::GL_COLORSPACE_SRGB, egl::NONE])
        .unwrap();
    assert!(!surface.is_double_buffered());

    // Visual 0x21 has no sRGB-capable format, so nothing matches.
    let err = display
        .create_window_surface(0, WINDOW, &[egl::GL_COLORSPACE, egl::GL_COLORSPACE_SRGB, egl::NONE])
        .unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::Misc);
}

#[test]
fn degenerate_pbuffer_uses_zero_defaults() {
    let display = initialized();

    let surface = display.create_pbuffer_surface(0, &[egl::NONE]).unwrap();
    assert_eq!(surface.surface_type(), SurfaceType::Pbuffer);
    assert!(surface.draw_to_pbuffer());
    assert!(!surface.draw_to_window());
    assert!(!surface.is_double_buffered());

    assert_eq!(display.platform().live_pbuffer_count(), 1);
    assert_eq!(
        display.platform().last_pbuffer_attribs().unwrap(),
        vec![glx::PBUFFER_WIDTH, 0, glx::PBUFFER_HEIGHT, 0, glx::LARGEST_PBUFFER, egl::FALSE, 0],
    );

    let mut surface = surface;
    display.destroy_surface(&mut surface).unwrap();
}

#[test]
fn pbuffer_attributes_reach_the_native_array() {
    let display = initialized();

    let mut surface = display
        .create_pbuffer_surface(
            0,
            &[egl::WIDTH, 640, egl::HEIGHT, 480, egl::LARGEST_PBUFFER, egl::TRUE, egl::NONE],
        )
        .unwrap();

    assert_eq!(
        display.platform().last_pbuffer_attribs().unwrap(),
        vec![glx::PBUFFER_WIDTH, 640, glx::PBUFFER_HEIGHT, 480, glx::LARGEST_PBUFFER, egl::TRUE, 0],
    );

    display.destroy_surface(&mut surface).unwrap();
}

#[test]
fn destroying_a_pbuffer_releases_the_native_buffer() {
    let display = initialized();

    let mut surface = display.create_pbuffer_surface(0, &[egl::NONE]).unwrap();
    assert_eq!(display.platform().live_pbuffer_count(), 1);

    display.destroy_surface(&mut surface).unwrap();
    assert!(surface.is_destroyed());
    assert_eq!(display.platform().live_pbuffer_count(), 0);

    // A second destroy is tolerated and does not touch the platform again.
    display.destroy_surface(&mut surface).unwrap();
    assert_eq!(display.platform().live_pbuffer_count(), 0);
}

#[test]
fn destroying_a_window_surface_keeps_the_window() {
    let display = initialized();

    let mut surface = display.create_window_surface(0, WINDOW, &[egl::NONE]).unwrap();
    display.destroy_surface(&mut surface).unwrap();
    assert!(surface.is_destroyed());
    assert_eq!(display.platform().destroyed_window_count(), 0);
}

#[test]
fn failed_native_pbuffer_creation_surfaces_as_an_error() {
    let display = initialized();
    display.platform().fail_create_pbuffer();

    let err = display.create_pbuffer_surface(0, &[egl::NONE]).unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::Misc);
    assert_eq!(display.platform().live_pbuffer_count(), 0);
}

#[test]
fn swap_buffers_rejects_a_destroyed_surface() {
    let display = initialized();

    let mut surface = display.create_window_surface(0, WINDOW, &[egl::NONE]).unwrap();
    display.swap_buffers(&surface).unwrap();
    assert_eq!(display.platform().swap_count(), 1);

    display.destroy_surface(&mut surface).unwrap();
    let err = display.swap_buffers(&surface).unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::BadSurface);
    assert_eq!(display.platform().swap_count(), 1);
}

#[test]
fn unknown_config_is_rejected() {
    let display = initialized();

    let err = display.create_window_surface(42, WINDOW, &[egl::NONE]).unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::BadConfig);

    let err = display.create_pbuffer_surface(42, &[egl::NONE]).unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::BadConfig);
}
