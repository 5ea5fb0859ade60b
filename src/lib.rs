//! The purpose of this library is to provide a standardized, EGL-style API for
//! enumerating rendering configurations and managing the lifecycle of
//! rendering [`Surface`]s and [`Context`]s on top of a lower-level, GLX-like
//! native platform.
//!
//! The native windowing and GPU primitives themselves are not part of this
//! crate. They sit behind the [`NativePlatform`] trait: opening and closing a
//! display connection, enumerating native pixel formats, creating and
//! destroying native contexts and pixel buffers, and binding a
//! (context, drawable) pair current. A deterministic in-memory implementation
//! is provided in [`platform::headless`] for tests and headless use.
//!
//! The entry point is [`Display`]. After [`Display::initialize`] succeeds, the
//! display owns a native connection, a bootstrap context used to probe
//! capabilities, and the ordered list of [`Config`]s projected from the native
//! pixel formats. Surfaces and contexts are then created against a chosen
//! config id, and [`Display::terminate`] unwinds everything in a fixed order.
//!
//! Attribute lists follow the standardized wire contract: an array of
//! `(key, value)` integer pairs terminated by the [`egl::NONE`] sentinel key,
//! with the token values from the [`egl`] module.
//!
//! [`Display`]: crate::display::Display
//! [`Display::initialize`]: crate::display::Display::initialize
//! [`Display::terminate`]: crate::display::Display::terminate
//! [`Config`]: crate::config::Config
//! [`Surface`]: crate::surface::Surface
//! [`Context`]: crate::context::Context
//! [`NativePlatform`]: crate::platform::NativePlatform

#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod context;
pub mod display;
pub mod egl;
pub mod error;
pub mod platform;
pub mod surface;
