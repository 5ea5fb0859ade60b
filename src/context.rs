//! Everything related to rendering contexts and the translation of
//! standardized context attributes into native ones.

use std::fmt;
use std::os::raw::c_int;

use crate::egl;
use crate::error::{ErrorKind, Result};
use crate::platform::{glx, NativePlatform};

/// The native protocol or API version.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// Major version of the API.
    pub major: u8,
    /// Minor version of the API.
    pub minor: u8,
}

impl Version {
    /// Create a new version with the given major and minor.
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Length of the translated native attribute array: five key/value pairs and
/// the terminator.
pub(crate) const CONTEXT_ATTRIBS_LEN: usize = 11;

/// A context attribute list never legally carries this many pairs.
const CONTEXT_ATTRIBS_PAIR_CAP: usize = 7;

// Template slots, by position in the native array.
const MAJOR_SLOT: usize = 1;
const MINOR_SLOT: usize = 3;
const FLAGS_SLOT: usize = 5;
const PROFILE_SLOT: usize = 7;
const RESET_SLOT: usize = 9;

/// A fixed-capacity native context attribute array translated from a
/// standardized attribute list.
///
/// Translation is all-or-nothing: any unrecognized key, illegal value, or
/// oversized list fails with [`ErrorKind::BadAttribute`] and no buffer is
/// produced. Translating the same input twice yields identical buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeContextAttribs([c_int; CONTEXT_ATTRIBS_LEN]);

impl NativeContextAttribs {
    /// Translate a sentinel-terminated standardized attribute list.
    ///
    /// An empty list is treated as a bare terminator and yields the native
    /// defaults: version 1.0, no flags, core profile, no reset notification.
    pub fn translate(attrib_list: &[c_int]) -> Result<Self> {
        let mut template: [c_int; CONTEXT_ATTRIBS_LEN] = [
            glx::CONTEXT_MAJOR_VERSION_ARB,
            1,
            glx::CONTEXT_MINOR_VERSION_ARB,
            0,
            glx::CONTEXT_FLAGS_ARB,
            0,
            glx::CONTEXT_PROFILE_MASK_ARB,
            glx::CONTEXT_CORE_PROFILE_BIT_ARB,
            glx::CONTEXT_RESET_NOTIFICATION_STRATEGY_ARB,
            glx::NO_RESET_NOTIFICATION_ARB,
            0,
        ];

        if attrib_list.is_empty() {
            return Ok(Self(template));
        }

        let mut index = 0;
        loop {
            let key = match attrib_list.get(index) {
                Some(&key) => key,
                // Ran off the end without seeing the terminator.
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
                egl::CONTEXT_MAJOR_VERSION => {
                    if value < 1 {
                        return Err(ErrorKind::BadAttribute.into());
                    }

                    template[MAJOR_SLOT] = value;
                },
                egl::CONTEXT_MINOR_VERSION => {
                    if value < 0 {
                        return Err(ErrorKind::BadAttribute.into());
                    }

                    template[MINOR_SLOT] = value;
                },
                egl::CONTEXT_OPENGL_PROFILE_MASK => match value {
                    egl::CONTEXT_OPENGL_CORE_PROFILE_BIT => {
                        template[PROFILE_SLOT] = glx::CONTEXT_CORE_PROFILE_BIT_ARB;
                    },
                    egl::CONTEXT_OPENGL_COMPATIBILITY_PROFILE_BIT => {
                        template[PROFILE_SLOT] = glx::CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB;
                    },
                    _ => return Err(ErrorKind::BadAttribute.into()),
                },
                egl::CONTEXT_OPENGL_DEBUG => {
                    set_flag(&mut template[FLAGS_SLOT], glx::CONTEXT_DEBUG_BIT_ARB, value)?;
                },
                egl::CONTEXT_OPENGL_FORWARD_COMPATIBLE => {
                    set_flag(
                        &mut template[FLAGS_SLOT],
                        glx::CONTEXT_FORWARD_COMPATIBLE_BIT_ARB,
                        value,
                    )?;
                },
                egl::CONTEXT_OPENGL_ROBUST_ACCESS => {
                    set_flag(&mut template[FLAGS_SLOT], glx::CONTEXT_ROBUST_ACCESS_BIT_ARB, value)?;
                },
                egl::CONTEXT_OPENGL_RESET_NOTIFICATION_STRATEGY => match value {
                    egl::NO_RESET_NOTIFICATION => {
                        template[RESET_SLOT] = glx::NO_RESET_NOTIFICATION_ARB;
                    },
                    egl::LOSE_CONTEXT_ON_RESET => {
                        template[RESET_SLOT] = glx::LOSE_CONTEXT_ON_RESET_ARB;
                    },
                    _ => return Err(ErrorKind::BadAttribute.into()),
                },
                _ => return Err(ErrorKind::BadAttribute.into()),
            }

            index += 2;

            if index >= CONTEXT_ATTRIBS_PAIR_CAP * 2 {
                return Err(ErrorKind::BadAttribute.into());
            }
        }

        Ok(Self(template))
    }

    /// The native attribute array, terminator included.
    pub fn as_slice(&self) -> &[c_int] {
        &self.0
    }
}

/// Set or clear a bit in the native flags slot from a standardized boolean.
fn set_flag(flags: &mut c_int, bit: c_int, value: c_int) -> Result<()> {
    match value {
        egl::TRUE => *flags |= bit,
        egl::FALSE => *flags &= !bit,
        _ => return Err(ErrorKind::BadAttribute.into()),
    }

    Ok(())
}

/// A rendering context created against a config.
///
/// Wraps the native context handle plus an optional back-reference to the
/// context it shares state with. Sharing does not transfer ownership; the
/// shared context has its own independent lifetime.
pub struct Context<P: NativePlatform> {
    pub(crate) raw: P::Context,
    pub(crate) shared: Option<P::Context>,
    pub(crate) config_id: c_int,
}

impl<P: NativePlatform> Context<P> {
    /// The id of the config the context was created against.
    pub fn config_id(&self) -> c_int {
        self.config_id
    }

    /// Whether the context shares state with another context.
    pub fn is_shared(&self) -> bool {
        self.shared.is_some()
    }

    /// The raw native context handle.
    pub fn raw(&self) -> P::Context {
        self.raw
    }
}

impl<P: NativePlatform> fmt::Debug for Context<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("raw", &self.raw)
            .field("shared", &self.shared)
            .field("config_id", &self.config_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_attributes() {
        let attribs = NativeContextAttribs::translate(&[egl::NONE]).unwrap();
        assert_eq!(
            attribs.as_slice(),
            &[
                glx::CONTEXT_MAJOR_VERSION_ARB,
                1,
                glx::CONTEXT_MINOR_VERSION_ARB,
                0,
                glx::CONTEXT_FLAGS_ARB,
                0,
                glx::CONTEXT_PROFILE_MASK_ARB,
                glx::CONTEXT_CORE_PROFILE_BIT_ARB,
                glx::CONTEXT_RESET_NOTIFICATION_STRATEGY_ARB,
                glx::NO_RESET_NOTIFICATION_ARB,
                0,
            ]
        );

        let empty = NativeContextAttribs::translate(&[]).unwrap();
        assert_eq!(empty, attribs);
    }

    #[test]
    fn version_and_profile_overwrite_template_slots() {
        let attribs = NativeContextAttribs::translate(&[
            egl::CONTEXT_MAJOR_VERSION,
            4,
            egl::CONTEXT_MINOR_VERSION,
            6,
            egl::CONTEXT_OPENGL_PROFILE_MASK,
            egl::CONTEXT_OPENGL_COMPATIBILITY_PROFILE_BIT,
            egl::NONE,
        ])
        .unwrap();

        assert_eq!(attribs.as_slice()[MAJOR_SLOT], 4);
        assert_eq!(attribs.as_slice()[MINOR_SLOT], 6);
        assert_eq!(attribs.as_slice()[PROFILE_SLOT], glx::CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB);
    }

    #[test]
    fn boolean_flags_or_and_mask_bits() {
        let attribs = NativeContextAttribs::translate(&[
            egl::CONTEXT_OPENGL_DEBUG,
            egl::TRUE,
            egl::CONTEXT_OPENGL_ROBUST_ACCESS,
            egl::TRUE,
            egl::CONTEXT_OPENGL_DEBUG,
            egl::FALSE,
            egl::NONE,
        ])
        .unwrap();

        assert_eq!(attribs.as_slice()[FLAGS_SLOT], glx::CONTEXT_ROBUST_ACCESS_BIT_ARB);
    }

    #[test]
    fn unrecognized_key_is_bad_attribute() {
        let err = NativeContextAttribs::translate(&[0x3100, 1, egl::NONE]).unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::BadAttribute);
    }

    #[test]
    fn illegal_values_are_bad_attribute() {
        for list in [
            [egl::CONTEXT_MAJOR_VERSION, 0, egl::NONE],
            [egl::CONTEXT_MINOR_VERSION, -1, egl::NONE],
            [egl::CONTEXT_OPENGL_PROFILE_MASK, 0x4, egl::NONE],
            [egl::CONTEXT_OPENGL_DEBUG, 2, egl::NONE],
            [egl::CONTEXT_OPENGL_RESET_NOTIFICATION_STRATEGY, 0, egl::NONE],
        ] {
            let err = NativeContextAttribs::translate(&list).unwrap_err();
            assert_eq!(err.error_kind(), ErrorKind::BadAttribute);
        }
    }

    #[test]
    fn truncated_list_is_bad_attribute() {
        let err = NativeContextAttribs::translate(&[egl::CONTEXT_MAJOR_VERSION]).unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::BadAttribute);

        let err =
            NativeContextAttribs::translate(&[egl::CONTEXT_MAJOR_VERSION, 3]).unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::BadAttribute);
    }

    #[test]
    fn pair_cap_is_enforced_even_for_legal_pairs() {
        // Seven pairs, each individually legal.
        let mut list = Vec::new();
        for _ in 0..7 {
            list.push(egl::CONTEXT_OPENGL_DEBUG);
            list.push(egl::TRUE);
        }
        list.push(egl::NONE);

        let err = NativeContextAttribs::translate(&list).unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::BadAttribute);

        // Six pairs are fine.
        let ok = NativeContextAttribs::translate(&list[2..]).unwrap();
        assert_eq!(ok.as_slice()[FLAGS_SLOT], glx::CONTEXT_DEBUG_BIT_ARB);
    }

    #[test]
    fn translation_is_deterministic() {
        let list = [
            egl::CONTEXT_MAJOR_VERSION,
            3,
            egl::CONTEXT_MINOR_VERSION,
            2,
            egl::CONTEXT_OPENGL_FORWARD_COMPATIBLE,
            egl::TRUE,
            egl::NONE,
        ];

        let first = NativeContextAttribs::translate(&list).unwrap();
        let second = NativeContextAttribs::translate(&list).unwrap();
        assert_eq!(first.as_slice(), second.as_slice());
    }
}
