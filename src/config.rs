//! Everything related to finding and manipulating the rendering configs.

use std::os::raw::c_int;

use bitflags::bitflags;
use log::debug;

use crate::egl;
use crate::error::{ErrorKind, Result};
use crate::platform::{glx, NativePlatform, CREATE_CONTEXT_ES_PROFILE_EXT};

bitflags! {
    /// The types of surfaces a config can back.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigSurfaceTypes: u32 {
        /// The config supports pbuffers.
        const PBUFFER = egl::PBUFFER_BIT as u32;

        /// The config supports pixmaps.
        const PIXMAP = egl::PIXMAP_BIT as u32;

        /// The config supports windows.
        const WINDOW = egl::WINDOW_BIT as u32;
    }
}

bitflags! {
    /// The rendering APIs a config can serve.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Api: u32 {
        /// OpenGL ES 1 API.
        const GLES1 = egl::OPENGL_ES_BIT as u32;

        /// OpenGL ES 2 API.
        const GLES2 = egl::OPENGL_ES2_BIT as u32;

        /// OpenGL ES 3 API.
        const GLES3 = egl::OPENGL_ES3_BIT as u32;

        /// Desktop OpenGL API.
        const OPENGL = egl::OPENGL_BIT as u32;
    }
}

/// One selectable rendering configuration, projected from a native pixel
/// format at display initialization.
///
/// Records are stored by the display in native enumeration order. The
/// [`config_id`] is the format's 0-based index in that enumeration and is
/// stable for the lifetime of the initialization, but not contiguous: formats
/// filtered out during enumeration leave gaps.
///
/// [`config_id`]: Config::config_id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Stable identifier, assigned at enumeration time.
    pub config_id: c_int,

    /// The native visual identifier used to re-derive the native format when
    /// creating surfaces and contexts.
    pub native_visual_id: c_int,

    /// Which drawing targets the config supports.
    pub surface_types: ConfigSurfaceTypes,

    pub draw_to_window: bool,
    pub draw_to_pixmap: bool,
    pub draw_to_pbuffer: bool,

    /// Whether the config is double-buffered.
    pub double_buffer: bool,

    /// APIs the config is conformant for.
    pub conformant: Api,

    /// APIs a context created against the config can render.
    pub renderable_type: Api,

    /// Color buffer type token; always [`egl::RGB_BUFFER`] since non-RGBA
    /// formats are filtered out.
    pub color_buffer_type: c_int,

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

    pub max_pbuffer_pixels: c_int,
    pub max_pbuffer_width: c_int,
    pub max_pbuffer_height: c_int,

    /// Either [`egl::TRANSPARENT_RGB`] or [`egl::NONE`].
    pub transparent_type: c_int,
    pub transparent_red_value: c_int,
    pub transparent_green_value: c_int,
    pub transparent_blue_value: c_int,

    /// Fixed to [`egl::NONE`]; pixmap matching is not implemented.
    pub match_native_pixmap: c_int,

    /// Fixed to [`egl::DONT_CARE`].
    pub native_renderable: c_int,
}

/// The ES renderable bits advertised when the native platform supports ES
/// profile context creation.
pub(crate) fn es_profile_mask(extensions: &str) -> Api {
    if extensions.split(' ').any(|ext| ext == CREATE_CONTEXT_ES_PROFILE_EXT) {
        Api::GLES1 | Api::GLES2 | Api::GLES3
    } else {
        Api::empty()
    }
}

fn query<P: NativePlatform>(
    platform: &P,
    display: P::Display,
    format: P::Format,
    attrib: c_int,
) -> Result<c_int> {
    platform
        .format_attrib(display, format, attrib)
        .ok_or_else(|| ErrorKind::NotInitialized.into())
}

/// Whether a format is usable at all: it must have a visual, render RGBA, and
/// not use indexed-color transparency. Unusable formats are skipped both at
/// enumeration and at match time.
///
/// `Ok(None)` means skip, `Ok(Some(visual))` carries the raw visual attribute.
fn usable_visual<P: NativePlatform>(
    platform: &P,
    display: P::Display,
    format: P::Format,
    on_failure: ErrorKind,
) -> Result<Option<c_int>> {
    let visual = platform
        .format_attrib(display, format, glx::VISUAL_ID)
        .ok_or(on_failure)?;
    if visual == 0 {
        return Ok(None);
    }

    let render_type = platform
        .format_attrib(display, format, glx::RENDER_TYPE)
        .ok_or(on_failure)?;
    if render_type & glx::RGBA_BIT == 0 {
        return Ok(None);
    }

    let transparent_type = platform
        .format_attrib(display, format, glx::TRANSPARENT_TYPE)
        .ok_or(on_failure)?;
    if transparent_type == glx::TRANSPARENT_INDEX {
        return Ok(None);
    }

    Ok(Some(visual))
}

/// Project every usable native pixel format into a [`Config`] record.
///
/// Runs once per display initialization. Fails with
/// [`ErrorKind::NotInitialized`] when the native format query returns nothing
/// or any single attribute query fails; partially built records are released
/// before returning.
pub(crate) fn enumerate_configs<P: NativePlatform>(
    platform: &P,
    display: P::Display,
    screen: c_int,
    es_mask: Api,
) -> Result<Vec<Config>> {
    let formats = platform.formats(display, screen);
    if formats.is_empty() {
        return Err(ErrorKind::NotInitialized.into());
    }

    let mut configs = Vec::new();

    for (index, &format) in formats.iter().enumerate() {
        match usable_visual(platform, display, format, ErrorKind::NotInitialized)? {
            Some(_) => (),
            None => continue,
        }

        let drawable_type = query(platform, display, format, glx::DRAWABLE_TYPE)?;
        let draw_to_window = drawable_type & glx::WINDOW_BIT != 0;
        let draw_to_pixmap = drawable_type & glx::PIXMAP_BIT != 0;
        let draw_to_pbuffer = drawable_type & glx::PBUFFER_BIT != 0;

        let mut surface_types = ConfigSurfaceTypes::empty();
        surface_types.set(ConfigSurfaceTypes::WINDOW, draw_to_window);
        surface_types.set(ConfigSurfaceTypes::PIXMAP, draw_to_pixmap);
        surface_types.set(ConfigSurfaceTypes::PBUFFER, draw_to_pbuffer);

        let double_buffer = query(platform, display, format, glx::DOUBLEBUFFER)? != 0;

        let buffer_size = query(platform, display, format, glx::BUFFER_SIZE)?;
        let red_size = query(platform, display, format, glx::RED_SIZE)?;
        let green_size = query(platform, display, format, glx::GREEN_SIZE)?;
        let blue_size = query(platform, display, format, glx::BLUE_SIZE)?;
        let alpha_size = query(platform, display, format, glx::ALPHA_SIZE)?;
        let depth_size = query(platform, display, format, glx::DEPTH_SIZE)?;
        let stencil_size = query(platform, display, format, glx::STENCIL_SIZE)?;

        let sample_buffers = query(platform, display, format, glx::SAMPLE_BUFFERS)?;
        let samples = query(platform, display, format, glx::SAMPLES)?;

        let bind_to_texture_rgb =
            query(platform, display, format, glx::BIND_TO_TEXTURE_RGB_EXT)? != 0;
        let bind_to_texture_rgba =
            query(platform, display, format, glx::BIND_TO_TEXTURE_RGBA_EXT)? != 0;

        let max_pbuffer_pixels = query(platform, display, format, glx::MAX_PBUFFER_PIXELS)?;
        let max_pbuffer_width = query(platform, display, format, glx::MAX_PBUFFER_WIDTH)?;
        let max_pbuffer_height = query(platform, display, format, glx::MAX_PBUFFER_HEIGHT)?;

        let transparent_type =
            match query(platform, display, format, glx::TRANSPARENT_TYPE)? {
                glx::TRANSPARENT_RGB => egl::TRANSPARENT_RGB,
                _ => egl::NONE,
            };
        let transparent_red_value =
            query(platform, display, format, glx::TRANSPARENT_RED_VALUE)?;
        let transparent_green_value =
            query(platform, display, format, glx::TRANSPARENT_GREEN_VALUE)?;
        let transparent_blue_value =
            query(platform, display, format, glx::TRANSPARENT_BLUE_VALUE)?;

        let native_visual_id = platform
            .visual_id(display, format)
            .ok_or(ErrorKind::NotInitialized)?;

        configs.push(Config {
            config_id: index as c_int,
            native_visual_id,
            surface_types,
            draw_to_window,
            draw_to_pixmap,
            draw_to_pbuffer,
            double_buffer,
            conformant: Api::OPENGL | es_mask,
            renderable_type: Api::OPENGL | es_mask,
            color_buffer_type: egl::RGB_BUFFER,
            buffer_size,
            red_size,
            green_size,
            blue_size,
            alpha_size,
            depth_size,
            stencil_size,
            sample_buffers,
            samples,
            bind_to_texture_rgb,
            bind_to_texture_rgba,
            max_pbuffer_pixels,
            max_pbuffer_width,
            max_pbuffer_height,
            transparent_type,
            transparent_red_value,
            transparent_green_value,
            transparent_blue_value,
            match_native_pixmap: egl::NONE,
            native_renderable: egl::DONT_CARE,
        });
    }

    debug!("enumerated {} configs from {} native formats", configs.len(), formats.len());

    Ok(configs)
}

/// Surface-specific constraints applied on top of the usable-format filter
/// when re-deriving a native format.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FormatFilter {
    /// Only accept sRGB-capable formats.
    pub srgb_capable: bool,
    /// Only accept double-buffered formats.
    pub double_buffered: bool,
}

/// Re-derive the native format matching a config's visual id.
///
/// Format handles are scoped to the query batch that produced them, so this
/// re-queries the native formats instead of reusing enumeration-time handles.
/// Returns the first usable format whose derived visual id equals
/// `visual_id`, or `None` when nothing matches.
pub(crate) fn find_native_format<P: NativePlatform>(
    platform: &P,
    display: P::Display,
    screen: c_int,
    visual_id: c_int,
    filter: FormatFilter,
) -> Result<Option<P::Format>> {
    let formats = platform.formats(display, screen);
    if formats.is_empty() {
        return Err(ErrorKind::Misc.into());
    }

    for &format in &formats {
        match usable_visual(platform, display, format, ErrorKind::Misc)? {
            Some(_) => (),
            None => continue,
        }

        if filter.srgb_capable {
            let srgb = platform
                .format_attrib(display, format, glx::FRAMEBUFFER_SRGB_CAPABLE_ARB)
                .ok_or(ErrorKind::Misc)?;
            if srgb == 0 {
                continue;
            }
        }

        if filter.double_buffered {
            let double_buffer = platform
                .format_attrib(display, format, glx::DOUBLEBUFFER)
                .ok_or(ErrorKind::Misc)?;
            if double_buffer == 0 {
                continue;
            }
        }

        match platform.visual_id(display, format) {
            Some(id) if id == visual_id => return Ok(Some(format)),
            Some(_) => (),
            None => return Err(ErrorKind::Misc.into()),
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn es_mask_requires_the_profile_extension() {
        assert_eq!(es_profile_mask(""), Api::empty());
        assert_eq!(es_profile_mask("GLX_EXT_swap_control GLX_ARB_multisample"), Api::empty());
        assert_eq!(
            es_profile_mask("GLX_EXT_swap_control GLX_EXT_create_context_es_profile"),
            Api::GLES1 | Api::GLES2 | Api::GLES3,
        );
    }

    #[test]
    fn surface_type_bits_match_the_standardized_encoding() {
        assert_eq!(ConfigSurfaceTypes::PBUFFER.bits(), 0x1);
        assert_eq!(ConfigSurfaceTypes::PIXMAP.bits(), 0x2);
        assert_eq!(ConfigSurfaceTypes::WINDOW.bits(), 0x4);
        assert_eq!(Api::OPENGL.bits(), 0x8);
    }
}
