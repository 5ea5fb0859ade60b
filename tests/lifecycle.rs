//! Initialize/terminate lifecycle properties, observed through the headless
//! platform's resource counters.

use eglx::context::Version;
use eglx::display::Display;
use eglx::error::ErrorKind;
use eglx::platform::headless::HeadlessPlatform;

#[test]
fn initialize_probes_the_platform() {
    let mut display = Display::new(HeadlessPlatform::new());
    display.initialize().unwrap();

    assert!(display.is_initialized());
    assert_eq!(display.version(), Some(Version::new(1, 4)));
    assert!(!display.configs().is_empty());

    let platform = display.platform();
    assert_eq!(platform.open_display_count(), 1);
    // The bootstrap context is alive and bound on the root window.
    assert_eq!(platform.live_context_count(), 1);
    assert!(platform.current_pair().is_some());
}

#[test]
fn initialize_twice_is_a_noop() {
    let mut display = Display::new(HeadlessPlatform::new());
    display.initialize().unwrap();
    display.initialize().unwrap();

    assert_eq!(display.platform().open_display_count(), 1);
    assert_eq!(display.platform().live_context_count(), 1);
}

#[test]
fn failed_open_leaves_nothing_behind() {
    let platform = HeadlessPlatform::new();
    platform.fail_open_display();

    let mut display = Display::new(platform);
    let err = display.initialize().unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::NotInitialized);
    assert!(!display.is_initialized());
    assert_eq!(display.platform().open_display_count(), 0);
}

#[test]
fn failed_version_query_closes_the_display() {
    let platform = HeadlessPlatform::new();
    platform.fail_query_version();

    let mut display = Display::new(platform);
    let err = display.initialize().unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::NotInitialized);
    assert_eq!(display.platform().open_display_count(), 0);
    assert_eq!(display.platform().live_context_count(), 0);
}

#[test]
fn unsupported_version_closes_the_display() {
    let platform = HeadlessPlatform::new();
    platform.set_version(Version::new(1, 3));

    let mut display = Display::new(platform);
    let err = display.initialize().unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::NotInitialized);
    assert!(!display.is_initialized());
    assert_eq!(display.platform().open_display_count(), 0);
    assert_eq!(display.version(), None);
}

#[test]
fn missing_root_window_unwinds() {
    let platform = HeadlessPlatform::new();
    platform.fail_root_window();

    let mut display = Display::new(platform);
    display.initialize().unwrap_err();
    assert_eq!(display.platform().open_display_count(), 0);
}

#[test]
fn missing_bootstrap_visual_unwinds() {
    let platform = HeadlessPlatform::new();
    platform.deny_bootstrap_visual();

    let mut display = Display::new(platform);
    display.initialize().unwrap_err();
    assert_eq!(display.platform().open_display_count(), 0);
    assert_eq!(display.platform().live_context_count(), 0);
}

#[test]
fn failed_bootstrap_context_unwinds() {
    let platform = HeadlessPlatform::new();
    platform.fail_create_context(true);

    let mut display = Display::new(platform);
    display.initialize().unwrap_err();
    assert_eq!(display.platform().open_display_count(), 0);
    assert_eq!(display.platform().live_context_count(), 0);
}

#[test]
fn failed_bootstrap_bind_destroys_the_context() {
    let platform = HeadlessPlatform::new();
    platform.fail_make_current(true);

    let mut display = Display::new(platform);
    display.initialize().unwrap_err();
    assert_eq!(display.platform().open_display_count(), 0);
    assert_eq!(display.platform().live_context_count(), 0);
}

#[test]
fn failed_enumeration_unwinds_the_bootstrap() {
    // Version and extensions are fine, but the screen exposes no formats.
    let mut display = Display::new(HeadlessPlatform::bare());
    let err = display.initialize().unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::NotInitialized);
    assert!(!display.is_initialized());
    assert_eq!(display.platform().open_display_count(), 0);
    assert_eq!(display.platform().live_context_count(), 0);
    assert_eq!(display.platform().current_pair(), None);
}

#[test]
fn terminate_is_idempotent() {
    let mut display = Display::new(HeadlessPlatform::new());
    display.initialize().unwrap();

    display.terminate().unwrap();
    assert!(!display.is_initialized());
    assert_eq!(display.configs().len(), 0);
    assert_eq!(display.platform().open_display_count(), 0);
    assert_eq!(display.platform().live_context_count(), 0);
    assert_eq!(display.platform().current_pair(), None);
    assert_eq!(display.platform().destroyed_window_count(), 1);

    // Second terminate, and terminate on a never-initialized display, are
    // both fine.
    display.terminate().unwrap();
    assert_eq!(display.platform().destroyed_window_count(), 1);

    let mut cold = Display::new(HeadlessPlatform::new());
    cold.terminate().unwrap();
}

#[test]
fn reinitialize_after_terminate() {
    let mut display = Display::new(HeadlessPlatform::new());
    display.initialize().unwrap();
    display.terminate().unwrap();

    display.initialize().unwrap();
    assert!(display.is_initialized());
    assert_eq!(display.platform().open_display_count(), 1);
}

#[test]
fn operations_on_an_uninitialized_display_fail() {
    let display = Display::new(HeadlessPlatform::new());

    let err = display.create_context(0, None, &[eglx::egl::NONE]).unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::NotInitialized);

    let err = display.create_pbuffer_surface(0, &[eglx::egl::NONE]).unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::NotInitialized);
}
