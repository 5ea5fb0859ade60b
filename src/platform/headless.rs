//! A deterministic in-memory native platform.
//!
//! [`HeadlessPlatform`] implements [`NativePlatform`] entirely in process
//! memory: the pixel format table, the protocol version and the extension
//! surface are all scriptable, and every step of the lifecycle can be made to
//! fail on demand. It backs the crate's tests and is usable for headless
//! consumers that only need the configuration and lifecycle semantics.
//!
//! The platform keeps counters for open displays, live contexts and live
//! pixel buffers so the unwind guarantees of the engine can be observed from
//! the outside.

use std::cell::RefCell;
use std::fmt;
use std::os::raw::c_int;

use crate::context::Version;
use crate::platform::{glx, NativePlatform};

const DISPLAY_HANDLE: u32 = 1;
const ROOT_WINDOW: u32 = 10;
const DEFAULT_VISUAL: c_int = 0x21;
const FIRST_CONTEXT: u32 = 0x100;
const FIRST_PBUFFER: u32 = 0x1000;

/// One native pixel format of the headless platform.
///
/// Field values answer the attribute queries of the engine verbatim; the
/// defaults describe an ordinary double-buffered RGBA 8888 format.
#[derive(Debug, Clone)]
pub struct FormatSpec {
    pub visual_id: c_int,
    pub render_type: c_int,
    pub transparent_type: c_int,
    pub transparent_red_value: c_int,
    pub transparent_green_value: c_int,
    pub transparent_blue_value: c_int,
    pub drawable_type: c_int,
    pub double_buffer: bool,
    pub srgb_capable: bool,
    pub buffer_size: c_int,
    pub red_size: c_int,
    pub green_size: c_int,
    pub blue_size: c_int,
    pub alpha_size: c_int,
    pub depth_size: c_int,
    pub stencil_size: c_int,
    pub sample_buffers: c_int,
    pub samples: c_int,
    pub bind_to_texture_rgb: bool,
    pub bind_to_texture_rgba: bool,
    pub max_pbuffer_width: c_int,
    pub max_pbuffer_height: c_int,
    pub max_pbuffer_pixels: c_int,

    /// When set, querying this attribute fails, as a failed native round
    /// trip would.
    pub failing_attrib: Option<c_int>,
}

impl FormatSpec {
    /// A double-buffered RGBA 8888 format with the given visual.
    pub fn rgba8888(visual_id: c_int) -> Self {
        Self {
            visual_id,
            render_type: glx::RGBA_BIT,
            transparent_type: glx::NONE,
            transparent_red_value: 0,
            transparent_green_value: 0,
            transparent_blue_value: 0,
            drawable_type: glx::WINDOW_BIT | glx::PIXMAP_BIT | glx::PBUFFER_BIT,
            double_buffer: true,
            srgb_capable: false,
            buffer_size: 32,
            red_size: 8,
            green_size: 8,
            blue_size: 8,
            alpha_size: 8,
            depth_size: 24,
            stencil_size: 8,
            sample_buffers: 0,
            samples: 0,
            bind_to_texture_rgb: false,
            bind_to_texture_rgba: false,
            max_pbuffer_width: 4096,
            max_pbuffer_height: 4096,
            max_pbuffer_pixels: 4096 * 4096,
            failing_attrib: None,
        }
    }

    /// Same as [`rgba8888`](Self::rgba8888) but single-buffered.
    pub fn rgba8888_single(visual_id: c_int) -> Self {
        Self { double_buffer: false, ..Self::rgba8888(visual_id) }
    }

    /// Flip the format sRGB-capable.
    pub fn srgb(mut self) -> Self {
        self.srgb_capable = true;
        self
    }

    fn attrib(&self, attrib: c_int) -> Option<c_int> {
        if self.failing_attrib == Some(attrib) {
            return None;
        }

        let value = match attrib {
            glx::VISUAL_ID => self.visual_id,
            glx::RENDER_TYPE => self.render_type,
            glx::TRANSPARENT_TYPE => self.transparent_type,
            glx::TRANSPARENT_RED_VALUE => self.transparent_red_value,
            glx::TRANSPARENT_GREEN_VALUE => self.transparent_green_value,
            glx::TRANSPARENT_BLUE_VALUE => self.transparent_blue_value,
            glx::DRAWABLE_TYPE => self.drawable_type,
            glx::DOUBLEBUFFER => self.double_buffer as c_int,
            glx::FRAMEBUFFER_SRGB_CAPABLE_ARB => self.srgb_capable as c_int,
            glx::BUFFER_SIZE => self.buffer_size,
            glx::RED_SIZE => self.red_size,
            glx::GREEN_SIZE => self.green_size,
            glx::BLUE_SIZE => self.blue_size,
            glx::ALPHA_SIZE => self.alpha_size,
            glx::DEPTH_SIZE => self.depth_size,
            glx::STENCIL_SIZE => self.stencil_size,
            glx::SAMPLE_BUFFERS => self.sample_buffers,
            glx::SAMPLES => self.samples,
            glx::BIND_TO_TEXTURE_RGB_EXT => self.bind_to_texture_rgb as c_int,
            glx::BIND_TO_TEXTURE_RGBA_EXT => self.bind_to_texture_rgba as c_int,
            glx::MAX_PBUFFER_WIDTH => self.max_pbuffer_width,
            glx::MAX_PBUFFER_HEIGHT => self.max_pbuffer_height,
            glx::MAX_PBUFFER_PIXELS => self.max_pbuffer_pixels,
            _ => return None,
        };

        Some(value)
    }
}

#[derive(Debug, Default)]
struct State {
    version: Option<Version>,
    extensions: String,
    missing_fns: Vec<String>,
    formats: Vec<FormatSpec>,

    fail_open_display: bool,
    fail_query_version: bool,
    fail_root_window: bool,
    deny_bootstrap_visual: bool,
    fail_create_context: bool,
    fail_make_current: bool,
    fail_create_pbuffer: bool,

    open_displays: u32,
    next_context: u32,
    live_contexts: Vec<u32>,
    next_pbuffer: u32,
    live_pbuffers: Vec<u32>,
    destroyed_windows: Vec<u32>,
    current: Option<(u32, u32)>,
    format_batches: u32,
    error_handler_installed: bool,
    swap_count: u32,
    last_swap_interval: Option<c_int>,
    last_context_attribs: Option<Vec<c_int>>,
    last_pbuffer_attribs: Option<Vec<c_int>>,
}

/// The scriptable in-memory platform.
pub struct HeadlessPlatform {
    state: RefCell<State>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    /// A platform with protocol version 1.4, the full extension surface and
    /// two ordinary formats: a double-buffered visual `0x21` and a
    /// single-buffered sRGB-capable visual `0x22`.
    pub fn new() -> Self {
        let platform = Self::bare();
        {
            let mut state = platform.state.borrow_mut();
            state.formats = vec![
                FormatSpec::rgba8888(DEFAULT_VISUAL),
                FormatSpec::rgba8888_single(0x22).srgb(),
            ];
        }
        platform
    }

    /// A platform with the same version and extensions as [`new`](Self::new)
    /// but no formats at all.
    pub fn bare() -> Self {
        let state = State {
            version: Some(Version::new(1, 4)),
            extensions: format!(
                "GLX_ARB_create_context GLX_EXT_swap_control {}",
                crate::platform::CREATE_CONTEXT_ES_PROFILE_EXT
            ),
            next_context: FIRST_CONTEXT,
            next_pbuffer: FIRST_PBUFFER,
            ..State::default()
        };

        Self { state: RefCell::new(state) }
    }

    // Scripting knobs.

    pub fn set_version(&self, version: Version) {
        self.state.borrow_mut().version = Some(version);
    }

    pub fn set_extensions(&self, extensions: &str) {
        self.state.borrow_mut().extensions = extensions.to_owned();
    }

    /// Make a dynamically resolved entry point unresolvable.
    pub fn remove_extension_fn(&self, name: &str) {
        self.state.borrow_mut().missing_fns.push(name.to_owned());
    }

    pub fn set_formats(&self, formats: Vec<FormatSpec>) {
        self.state.borrow_mut().formats = formats;
    }

    pub fn push_format(&self, format: FormatSpec) {
        self.state.borrow_mut().formats.push(format);
    }

    pub fn fail_open_display(&self) {
        self.state.borrow_mut().fail_open_display = true;
    }

    pub fn fail_query_version(&self) {
        self.state.borrow_mut().fail_query_version = true;
    }

    pub fn fail_root_window(&self) {
        self.state.borrow_mut().fail_root_window = true;
    }

    pub fn deny_bootstrap_visual(&self) {
        self.state.borrow_mut().deny_bootstrap_visual = true;
    }

    pub fn fail_create_context(&self, fail: bool) {
        self.state.borrow_mut().fail_create_context = fail;
    }

    pub fn fail_make_current(&self, fail: bool) {
        self.state.borrow_mut().fail_make_current = fail;
    }

    pub fn fail_create_pbuffer(&self) {
        self.state.borrow_mut().fail_create_pbuffer = true;
    }

    // Observation of the native side.

    /// Number of display connections currently open.
    pub fn open_display_count(&self) -> u32 {
        self.state.borrow().open_displays
    }

    /// Number of native contexts currently alive, bootstrap included.
    pub fn live_context_count(&self) -> usize {
        self.state.borrow().live_contexts.len()
    }

    /// Number of native pixel buffers currently alive.
    pub fn live_pbuffer_count(&self) -> usize {
        self.state.borrow().live_pbuffers.len()
    }

    /// How many times the format table has been queried.
    pub fn format_batch_count(&self) -> u32 {
        self.state.borrow().format_batches
    }

    /// The currently bound (drawable, context) pair.
    pub fn current_pair(&self) -> Option<(u32, u32)> {
        self.state.borrow().current
    }

    /// Number of native windows destroyed so far.
    pub fn destroyed_window_count(&self) -> usize {
        self.state.borrow().destroyed_windows.len()
    }

    pub fn error_handler_installed(&self) -> bool {
        self.state.borrow().error_handler_installed
    }

    pub fn swap_count(&self) -> u32 {
        self.state.borrow().swap_count
    }

    pub fn last_swap_interval(&self) -> Option<c_int> {
        self.state.borrow().last_swap_interval
    }

    /// The native attribute array passed to the last context creation.
    pub fn last_context_attribs(&self) -> Option<Vec<c_int>> {
        self.state.borrow().last_context_attribs.clone()
    }

    /// The native attribute array passed to the last pbuffer creation.
    pub fn last_pbuffer_attribs(&self) -> Option<Vec<c_int>> {
        self.state.borrow().last_pbuffer_attribs.clone()
    }
}

impl NativePlatform for HeadlessPlatform {
    type Display = u32;
    type Drawable = u32;
    type Visual = c_int;
    type Context = u32;
    type Format = usize;

    fn open_display(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        if state.fail_open_display {
            return None;
        }

        state.open_displays += 1;
        Some(DISPLAY_HANDLE)
    }

    fn close_display(&self, _display: u32) {
        let mut state = self.state.borrow_mut();
        state.open_displays = state.open_displays.saturating_sub(1);
    }

    fn query_version(&self, _display: u32) -> Option<Version> {
        let state = self.state.borrow();
        if state.fail_query_version {
            return None;
        }

        state.version
    }

    fn root_window(&self, _display: u32) -> Option<u32> {
        if self.state.borrow().fail_root_window {
            return None;
        }

        Some(ROOT_WINDOW)
    }

    fn choose_bootstrap_visual(&self, _display: u32) -> Option<c_int> {
        if self.state.borrow().deny_bootstrap_visual {
            return None;
        }

        Some(DEFAULT_VISUAL)
    }

    fn create_bootstrap_context(&self, _display: u32, _visual: c_int) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        if state.fail_create_context {
            return None;
        }

        let context = state.next_context;
        state.next_context += 1;
        state.live_contexts.push(context);
        Some(context)
    }

    fn query_extensions(&self, _display: u32, _screen: c_int) -> String {
        self.state.borrow().extensions.clone()
    }

    fn has_extension_fn(&self, name: &str) -> bool {
        !self.state.borrow().missing_fns.iter().any(|missing| missing == name)
    }

    fn formats(&self, _display: u32, _screen: c_int) -> Vec<usize> {
        let mut state = self.state.borrow_mut();
        state.format_batches += 1;
        (0..state.formats.len()).collect()
    }

    fn format_attrib(&self, _display: u32, format: usize, attrib: c_int) -> Option<c_int> {
        self.state.borrow().formats.get(format)?.attrib(attrib)
    }

    fn visual_id(&self, _display: u32, format: usize) -> Option<c_int> {
        let state = self.state.borrow();
        let visual = state.formats.get(format)?.visual_id;
        (visual != 0).then_some(visual)
    }

    fn install_fatal_error_handler(&self, _display: u32) {
        self.state.borrow_mut().error_handler_installed = true;
    }

    fn create_context(
        &self,
        _display: u32,
        _format: usize,
        _share: Option<u32>,
        attribs: &[c_int],
    ) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        state.last_context_attribs = Some(attribs.to_vec());

        if state.fail_create_context {
            return None;
        }

        let context = state.next_context;
        state.next_context += 1;
        state.live_contexts.push(context);
        Some(context)
    }

    fn destroy_context(&self, _display: u32, context: u32) {
        self.state.borrow_mut().live_contexts.retain(|&live| live != context);
    }

    fn make_current(
        &self,
        _display: u32,
        drawable: Option<u32>,
        context: Option<u32>,
    ) -> bool {
        let mut state = self.state.borrow_mut();
        if state.fail_make_current {
            return false;
        }

        state.current = match (drawable, context) {
            (Some(drawable), Some(context)) => Some((drawable, context)),
            _ => None,
        };

        true
    }

    fn create_pbuffer(&self, _display: u32, _format: usize, attribs: &[c_int]) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        state.last_pbuffer_attribs = Some(attribs.to_vec());

        if state.fail_create_pbuffer {
            return None;
        }

        let pbuffer = state.next_pbuffer;
        state.next_pbuffer += 1;
        state.live_pbuffers.push(pbuffer);
        Some(pbuffer)
    }

    fn destroy_pbuffer(&self, _display: u32, pbuffer: u32) {
        self.state.borrow_mut().live_pbuffers.retain(|&live| live != pbuffer);
    }

    fn destroy_window(&self, _display: u32, window: u32) {
        self.state.borrow_mut().destroyed_windows.push(window);
    }

    fn swap_buffers(&self, _display: u32, _drawable: u32) -> bool {
        self.state.borrow_mut().swap_count += 1;
        true
    }

    fn set_swap_interval(&self, _display: u32, _drawable: u32, interval: c_int) -> bool {
        self.state.borrow_mut().last_swap_interval = Some(interval);
        true
    }
}

impl fmt::Debug for HeadlessPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessPlatform")
            .field("formats", &state.formats.len())
            .field("open_displays", &state.open_displays)
            .field("live_contexts", &state.live_contexts.len())
            .field("live_pbuffers", &state.live_pbuffers.len())
            .finish()
    }
}
