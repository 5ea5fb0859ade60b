//! Everything related to surfaces: window- and pbuffer-backed drawables and
//! the parsing of their standardized attribute lists.

use std::fmt;
use std::os::raw::c_int;

use log::warn;

use crate::config::{find_native_format, Config, FormatFilter};
use crate::display::Display;
use crate::egl;
use crate::error::{ErrorKind, Result};
use crate::platform::{glx, NativePlatform};

/// A window surface attribute list never legally carries this many pairs.
const WINDOW_ATTRIBS_PAIR_CAP: usize = 4;

/// Length of the native pbuffer attribute array: three key/value pairs and
/// the terminator.
const PBUFFER_ATTRIBS_LEN: usize = 7;

/// The drawing target backing a surface. Exactly one per surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceType {
    /// An on-screen window surface.
    Window,
    /// An off-screen pixmap surface.
    Pixmap,
    /// An off-screen, windowless pixel buffer.
    Pbuffer,
}

/// A created drawable, bound to the config it was created against.
///
/// Surfaces are destroyed explicitly with [`Display::destroy_surface`] and
/// must not outlive the display that created them.
pub struct Surface<P: NativePlatform> {
    ty: SurfaceType,
    double_buffer: bool,
    config_id: c_int,
    destroyed: bool,
    pub(crate) drawable: P::Drawable,
    pub(crate) format: P::Format,
}

impl<P: NativePlatform> Surface<P> {
    /// The drawing target backing this surface.
    pub fn surface_type(&self) -> SurfaceType {
        self.ty
    }

    pub fn draw_to_window(&self) -> bool {
        self.ty == SurfaceType::Window
    }

    pub fn draw_to_pixmap(&self) -> bool {
        self.ty == SurfaceType::Pixmap
    }

    pub fn draw_to_pbuffer(&self) -> bool {
        self.ty == SurfaceType::Pbuffer
    }

    /// Whether rendering to this surface is double-buffered.
    pub fn is_double_buffered(&self) -> bool {
        self.double_buffer
    }

    /// The id of the config the surface was created against.
    pub fn config_id(&self) -> c_int {
        self.config_id
    }

    /// Whether the surface has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The native drawable handle.
    pub fn raw(&self) -> P::Drawable {
        self.drawable
    }

    /// The native format the surface was matched against at creation time.
    pub fn native_format(&self) -> P::Format {
        self.format
    }
}

impl<P: NativePlatform> Drop for Surface<P> {
    fn drop(&mut self) {
        if self.ty == SurfaceType::Pbuffer && !self.destroyed {
            warn!("pbuffer surface dropped without destroy; the native pixel buffer leaks");
        }
    }
}

impl<P: NativePlatform> fmt::Debug for Surface<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("type", &self.ty)
            .field("double_buffer", &self.double_buffer)
            .field("config_id", &self.config_id)
            .field("destroyed", &self.destroyed)
            .field("drawable", &self.drawable)
            .finish()
    }
}

/// Parsed window surface attributes.
#[derive(Debug, Clone, Copy, Default)]
struct WindowAttribs {
    srgb: bool,
    back_buffer: bool,
}

/// Walk a window surface attribute list.
///
/// Color space and render buffer requests are checked against the config's
/// actual double-buffer capability; vector-graphics attributes are rejected
/// outright since VG surfaces are unsupported. Unrecognized keys are skipped.
fn parse_window_attribs(attrib_list: &[c_int], config: &Config) -> Result<WindowAttribs> {
    let mut attribs = WindowAttribs::default();

    if attrib_list.is_empty() {
        return Ok(attribs);
    }

    let mut index = 0;
    loop {
        let key = match attrib_list.get(index) {
            Some(&key) => key,
            None => return Err(ErrorKind::BadAttribute.into()),
        };

        if key == egl::NONE {
            break;
        }

        let value = match attrib_list.get(index + 1) {
            Some(&value) => value,
            None => return Err(ErrorKind::BadAttribute.into()),
        };

        match key {
            egl::GL_COLORSPACE => match value {
                egl::GL_COLORSPACE_LINEAR => attribs.srgb = false,
                egl::GL_COLORSPACE_SRGB => attribs.srgb = true,
                _ => return Err(ErrorKind::BadAttribute.into()),
            },
            egl::RENDER_BUFFER => match value {
                egl::SINGLE_BUFFER => {
                    attribs.back_buffer = false;
                    if config.double_buffer {
                        return Err(ErrorKind::BadMatch.into());
                    }
                },
                egl::BACK_BUFFER => {
                    attribs.back_buffer = true;
                    if !config.double_buffer {
                        return Err(ErrorKind::BadMatch.into());
                    }
                },
                _ => return Err(ErrorKind::BadAttribute.into()),
            },
            // Vector-graphics surfaces are unsupported.
            egl::VG_ALPHA_FORMAT | egl::VG_COLORSPACE => {
                return Err(ErrorKind::BadMatch.into())
            },
            _ => (),
        }

        index += 2;

        if index >= WINDOW_ATTRIBS_PAIR_CAP * 2 {
            return Err(ErrorKind::BadAttribute.into());
        }
    }

    Ok(attribs)
}

/// Parsed pbuffer surface attributes.
#[derive(Debug, Clone, Copy)]
struct PbufferAttribs {
    width: c_int,
    height: c_int,
    largest: c_int,
    srgb: bool,
}

/// Walk a pbuffer attribute list. Width and height default to zero; a
/// degenerate zero-sized pbuffer is legal. Unrecognized keys are skipped.
fn parse_pbuffer_attribs(attrib_list: &[c_int]) -> Result<PbufferAttribs> {
    let mut attribs = PbufferAttribs { width: 0, height: 0, largest: egl::FALSE, srgb: false };

    if attrib_list.is_empty() {
        return Ok(attribs);
    }

    let mut index = 0;
    loop {
        let key = match attrib_list.get(index) {
            Some(&key) => key,
            None => return Err(ErrorKind::BadAttribute.into()),
        };

        if key == egl::NONE {
            break;
        }

        let value = match attrib_list.get(index + 1) {
            Some(&value) => value,
            None => return Err(ErrorKind::BadAttribute.into()),
        };

        match key {
            egl::WIDTH => attribs.width = value,
            egl::HEIGHT => attribs.height = value,
            egl::LARGEST_PBUFFER => attribs.largest = value,
            egl::GL_COLORSPACE => attribs.srgb = value == egl::GL_COLORSPACE_SRGB,
            _ => (),
        }

        index += 2;
    }

    Ok(attribs)
}

impl<P: NativePlatform> Display<P> {
    /// Create a window-backed surface against a config.
    ///
    /// The window handle is supplied by the caller and stays owned by the
    /// caller; destroying the surface does not destroy the window.
    pub fn create_window_surface(
        &self,
        config_id: c_int,
        window: P::Drawable,
        attrib_list: &[c_int],
    ) -> Result<Surface<P>> {
        let display = self.native_display()?;
        let config = self.config(config_id)?.clone();

        let attribs = parse_window_attribs(attrib_list, &config)?;
        let filter =
            FormatFilter { srgb_capable: attribs.srgb, double_buffered: attribs.back_buffer };

        let format =
            find_native_format(self.platform(), display, self.screen(), config.native_visual_id, filter)?
                .ok_or(ErrorKind::Misc)?;

        Ok(Surface {
            ty: SurfaceType::Window,
            double_buffer: config.double_buffer,
            config_id: config.config_id,
            destroyed: false,
            drawable: window,
            format,
        })
    }

    /// Create a pbuffer-backed surface against a config.
    ///
    /// Pbuffer surfaces are always single-buffered. A zero width or height
    /// yields a valid degenerate surface.
    pub fn create_pbuffer_surface(
        &self,
        config_id: c_int,
        attrib_list: &[c_int],
    ) -> Result<Surface<P>> {
        let display = self.native_display()?;
        let config = self.config(config_id)?.clone();

        let attribs = parse_pbuffer_attribs(attrib_list)?;
        let filter = FormatFilter { srgb_capable: attribs.srgb, double_buffered: false };

        let format =
            find_native_format(self.platform(), display, self.screen(), config.native_visual_id, filter)?
                .ok_or(ErrorKind::Misc)?;

        let native_attribs: [c_int; PBUFFER_ATTRIBS_LEN] = [
            glx::PBUFFER_WIDTH,
            attribs.width,
            glx::PBUFFER_HEIGHT,
            attribs.height,
            glx::LARGEST_PBUFFER,
            attribs.largest,
            0,
        ];

        let pbuffer = self
            .platform()
            .create_pbuffer(display, format, &native_attribs)
            .ok_or(ErrorKind::Misc)?;

        Ok(Surface {
            ty: SurfaceType::Pbuffer,
            double_buffer: false,
            config_id: config.config_id,
            destroyed: false,
            drawable: pbuffer,
            format,
        })
    }

    /// Destroy a surface.
    ///
    /// Only pbuffer surfaces own a separate native resource; window and
    /// pixmap surfaces only mark the record destroyed. Destroying an already
    /// destroyed surface is tolerated.
    pub fn destroy_surface(&self, surface: &mut Surface<P>) -> Result<()> {
        if surface.destroyed {
            warn!("surface already destroyed");
            return Ok(());
        }

        if surface.ty == SurfaceType::Pbuffer {
            let display = self.native_display()?;
            self.platform().destroy_pbuffer(display, surface.drawable);
        }

        surface.destroyed = true;

        Ok(())
    }
}
