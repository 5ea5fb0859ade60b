//! The native platform boundary.
//!
//! Everything below the standardized API is expressed through the
//! [`NativePlatform`] trait: a GLX-like windowing/rendering interface layered
//! on an X11-like display protocol. The engine in this crate only ever talks
//! to the platform through this trait, which keeps the configuration and
//! lifecycle logic independent of any concrete binding and lets the
//! [`headless`] implementation drive it deterministically.

use std::fmt;
use std::os::raw::c_int;

use crate::context::Version;

pub mod headless;

/// Native attribute tokens, named after their GLX counterparts.
pub mod glx {
    use std::os::raw::c_int;

    pub const NONE: c_int = 0x8000;

    pub const BUFFER_SIZE: c_int = 2;
    pub const DOUBLEBUFFER: c_int = 5;
    pub const RED_SIZE: c_int = 8;
    pub const GREEN_SIZE: c_int = 9;
    pub const BLUE_SIZE: c_int = 10;
    pub const ALPHA_SIZE: c_int = 11;
    pub const DEPTH_SIZE: c_int = 12;
    pub const STENCIL_SIZE: c_int = 13;

    pub const TRANSPARENT_TYPE: c_int = 0x23;
    pub const TRANSPARENT_RED_VALUE: c_int = 0x25;
    pub const TRANSPARENT_GREEN_VALUE: c_int = 0x26;
    pub const TRANSPARENT_BLUE_VALUE: c_int = 0x27;
    pub const TRANSPARENT_RGB: c_int = 0x8008;
    pub const TRANSPARENT_INDEX: c_int = 0x8009;

    pub const DRAWABLE_TYPE: c_int = 0x8010;
    pub const RENDER_TYPE: c_int = 0x8011;
    pub const VISUAL_ID: c_int = 0x800B;

    pub const WINDOW_BIT: c_int = 0x0001;
    pub const PIXMAP_BIT: c_int = 0x0002;
    pub const PBUFFER_BIT: c_int = 0x0004;
    pub const RGBA_BIT: c_int = 0x0001;

    pub const MAX_PBUFFER_WIDTH: c_int = 0x8016;
    pub const MAX_PBUFFER_HEIGHT: c_int = 0x8017;
    pub const MAX_PBUFFER_PIXELS: c_int = 0x8018;
    pub const LARGEST_PBUFFER: c_int = 0x801C;
    pub const PBUFFER_HEIGHT: c_int = 0x8040;
    pub const PBUFFER_WIDTH: c_int = 0x8041;

    pub const SAMPLE_BUFFERS: c_int = 100000;
    pub const SAMPLES: c_int = 100001;

    pub const BIND_TO_TEXTURE_RGB_EXT: c_int = 0x20D0;
    pub const BIND_TO_TEXTURE_RGBA_EXT: c_int = 0x20D1;
    pub const FRAMEBUFFER_SRGB_CAPABLE_ARB: c_int = 0x20B2;

    pub const CONTEXT_MAJOR_VERSION_ARB: c_int = 0x2091;
    pub const CONTEXT_MINOR_VERSION_ARB: c_int = 0x2092;
    pub const CONTEXT_FLAGS_ARB: c_int = 0x2094;
    pub const CONTEXT_PROFILE_MASK_ARB: c_int = 0x9126;
    pub const CONTEXT_CORE_PROFILE_BIT_ARB: c_int = 0x0001;
    pub const CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB: c_int = 0x0002;
    pub const CONTEXT_DEBUG_BIT_ARB: c_int = 0x0001;
    pub const CONTEXT_FORWARD_COMPATIBLE_BIT_ARB: c_int = 0x0002;
    pub const CONTEXT_ROBUST_ACCESS_BIT_ARB: c_int = 0x0004;
    pub const CONTEXT_RESET_NOTIFICATION_STRATEGY_ARB: c_int = 0x8256;
    pub const NO_RESET_NOTIFICATION_ARB: c_int = 0x8261;
    pub const LOSE_CONTEXT_ON_RESET_ARB: c_int = 0x8252;
}

/// Entry point resolved for context creation with an attribute list.
pub const CREATE_CONTEXT_ATTRIBS_FN: &str = "glXCreateContextAttribsARB";

/// Entry point resolved for swap interval control.
pub const SWAP_INTERVAL_FN: &str = "glXSwapIntervalEXT";

/// Extension advertising ES profile context creation.
pub const CREATE_CONTEXT_ES_PROFILE_EXT: &str = "GLX_EXT_create_context_es_profile";

/// The lower-level native windowing/rendering interface.
///
/// All operations are synchronous and blocking; they either complete or fail
/// within the call. Failure is reported the way the native API reports it:
/// `None` for missing handles, `false` for refused operations. Mapping those
/// onto standardized error codes is the engine's job, not the platform's.
///
/// Format handles are only meaningful within the batch returned by a single
/// [`formats`] call. Callers must re-query rather than cache them across
/// batches.
///
/// [`formats`]: NativePlatform::formats
pub trait NativePlatform {
    /// Handle to an open display connection.
    type Display: Copy + fmt::Debug;

    /// Handle to something a context can render into. Windows and pixel
    /// buffers share this namespace, as XIDs do.
    type Drawable: Copy + PartialEq + fmt::Debug;

    /// Handle to a native visual.
    type Visual: Copy + fmt::Debug;

    /// Handle to a native rendering context.
    type Context: Copy + PartialEq + fmt::Debug;

    /// Handle to a native pixel format, scoped to one [`formats`] batch.
    ///
    /// [`formats`]: NativePlatform::formats
    type Format: Copy + fmt::Debug;

    /// Open the default display connection.
    fn open_display(&self) -> Option<Self::Display>;

    /// Close a display connection opened by [`open_display`].
    ///
    /// [`open_display`]: NativePlatform::open_display
    fn close_display(&self, display: Self::Display);

    /// Query the native protocol version of the display.
    fn query_version(&self, display: Self::Display) -> Option<Version>;

    /// The default root window of the display.
    fn root_window(&self, display: Self::Display) -> Option<Self::Drawable>;

    /// Choose a minimal double-buffered RGBA visual suitable for the
    /// bootstrap context.
    fn choose_bootstrap_visual(&self, display: Self::Display) -> Option<Self::Visual>;

    /// Create a throwaway context against a bootstrap visual.
    fn create_bootstrap_context(
        &self,
        display: Self::Display,
        visual: Self::Visual,
    ) -> Option<Self::Context>;

    /// The space-separated native extension string for a screen.
    fn query_extensions(&self, display: Self::Display, screen: c_int) -> String;

    /// Whether a dynamically resolved extension entry point is present.
    ///
    /// Only valid once a context has been bound current.
    fn has_extension_fn(&self, name: &str) -> bool;

    /// Enumerate the native pixel formats of a screen.
    ///
    /// An empty vector means the query failed or the screen exposes no
    /// formats.
    fn formats(&self, display: Self::Display, screen: c_int) -> Vec<Self::Format>;

    /// Query a single integer attribute of a format. `None` means the query
    /// failed.
    fn format_attrib(
        &self,
        display: Self::Display,
        format: Self::Format,
        attrib: c_int,
    ) -> Option<c_int>;

    /// Derive the visual identifier of a format. `None` means the format has
    /// no associated visual.
    fn visual_id(&self, display: Self::Display, format: Self::Format) -> Option<c_int>;

    /// Install the fatal protocol error handler.
    ///
    /// Real backends must abort the process when the native display
    /// connection raises a protocol error; such corruption is not a
    /// recoverable condition and is never surfaced through [`Result`].
    ///
    /// [`Result`]: crate::error::Result
    fn install_fatal_error_handler(&self, display: Self::Display);

    /// Create a context against a format with a translated native attribute
    /// array, optionally sharing state with another context.
    ///
    /// Failure is signaled by `None` (a null handle), not by the error
    /// handler.
    fn create_context(
        &self,
        display: Self::Display,
        format: Self::Format,
        share: Option<Self::Context>,
        attribs: &[c_int],
    ) -> Option<Self::Context>;

    /// Destroy a native context.
    fn destroy_context(&self, display: Self::Display, context: Self::Context);

    /// Bind a (drawable, context) pair current, or detach with
    /// `(None, None)`.
    fn make_current(
        &self,
        display: Self::Display,
        drawable: Option<Self::Drawable>,
        context: Option<Self::Context>,
    ) -> bool;

    /// Create a native pixel buffer from a width/height/largest attribute
    /// array.
    fn create_pbuffer(
        &self,
        display: Self::Display,
        format: Self::Format,
        attribs: &[c_int],
    ) -> Option<Self::Drawable>;

    /// Destroy a native pixel buffer.
    fn destroy_pbuffer(&self, display: Self::Display, pbuffer: Self::Drawable);

    /// Destroy a native window.
    fn destroy_window(&self, display: Self::Display, window: Self::Drawable);

    /// Swap the front and back buffers of a drawable.
    fn swap_buffers(&self, display: Self::Display, drawable: Self::Drawable) -> bool;

    /// Set the swap interval for a drawable.
    ///
    /// Backed by a dynamically resolved entry point; the engine checks for
    /// its presence before calling.
    fn set_swap_interval(
        &self,
        display: Self::Display,
        drawable: Self::Drawable,
        interval: c_int,
    ) -> bool;
}
