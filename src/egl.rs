//! Standardized attribute tokens.
//!
//! Attribute lists passed to context and surface creation are arrays of
//! `(key, value)` integer pairs terminated by the [`NONE`] sentinel key. The
//! token values below are the Khronos-assigned ones; the encoding is part of
//! the public contract and must not change.

use std::os::raw::c_int;

/// Sentinel key terminating an attribute list.
pub const NONE: c_int = 0x3038;

pub const TRUE: c_int = 1;
pub const FALSE: c_int = 0;
pub const DONT_CARE: c_int = -1;

// Context creation attributes.
pub const CONTEXT_MAJOR_VERSION: c_int = 0x3098;
pub const CONTEXT_MINOR_VERSION: c_int = 0x30FB;
pub const CONTEXT_OPENGL_PROFILE_MASK: c_int = 0x30FD;
pub const CONTEXT_OPENGL_CORE_PROFILE_BIT: c_int = 0x0001;
pub const CONTEXT_OPENGL_COMPATIBILITY_PROFILE_BIT: c_int = 0x0002;
pub const CONTEXT_OPENGL_DEBUG: c_int = 0x31B0;
pub const CONTEXT_OPENGL_FORWARD_COMPATIBLE: c_int = 0x31B1;
pub const CONTEXT_OPENGL_ROBUST_ACCESS: c_int = 0x31B2;
pub const CONTEXT_OPENGL_RESET_NOTIFICATION_STRATEGY: c_int = 0x3138;
pub const NO_RESET_NOTIFICATION: c_int = 0x31BE;
pub const LOSE_CONTEXT_ON_RESET: c_int = 0x31BF;

// Surface creation attributes.
pub const WIDTH: c_int = 0x3057;
pub const HEIGHT: c_int = 0x3056;
pub const LARGEST_PBUFFER: c_int = 0x3058;
pub const RENDER_BUFFER: c_int = 0x3086;
pub const SINGLE_BUFFER: c_int = 0x3085;
pub const BACK_BUFFER: c_int = 0x3084;
pub const GL_COLORSPACE: c_int = 0x309D;
pub const GL_COLORSPACE_SRGB: c_int = 0x3089;
pub const GL_COLORSPACE_LINEAR: c_int = 0x308A;
pub const VG_COLORSPACE: c_int = 0x3087;
pub const VG_ALPHA_FORMAT: c_int = 0x3088;

// Config capability tokens.
pub const RGB_BUFFER: c_int = 0x308E;
pub const TRANSPARENT_RGB: c_int = 0x3052;

// Surface type bits.
pub const PBUFFER_BIT: c_int = 0x0001;
pub const PIXMAP_BIT: c_int = 0x0002;
pub const WINDOW_BIT: c_int = 0x0004;

// Renderable type bits.
pub const OPENGL_ES_BIT: c_int = 0x0001;
pub const OPENGL_ES2_BIT: c_int = 0x0004;
pub const OPENGL_ES3_BIT: c_int = 0x0040;
pub const OPENGL_BIT: c_int = 0x0008;
