//! The display: connection lifecycle, capability probing, and the operations
//! routed through it.

use std::fmt;
use std::os::raw::c_int;

use bitflags::bitflags;
use log::debug;
use once_cell::sync::OnceCell;

use crate::config::{self, find_native_format, Config, FormatFilter};
use crate::context::{Context, NativeContextAttribs, Version};
use crate::error::{ErrorKind, Result};
use crate::platform::{NativePlatform, CREATE_CONTEXT_ATTRIBS_FN, SWAP_INTERVAL_FN};
use crate::surface::Surface;

/// The minimum native protocol version the engine supports.
const MIN_NATIVE_VERSION: Version = Version::new(1, 4);

/// The default screen all operations target.
const DEFAULT_SCREEN: c_int = 0;

bitflags! {
    /// Optional capabilities of the native platform, probed once the
    /// bootstrap context is bound.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DisplayFeatures: u32 {
        /// Context creation with a native attribute array is available.
        const CREATE_CONTEXT_ATTRIBS = 0b0000_0001;

        /// Swap interval control is available.
        const SWAP_CONTROL = 0b0000_0010;

        /// ES profile contexts can be created.
        const CREATE_ES_CONTEXT = 0b0000_0100;
    }
}

/// The native resources owned by an initialized display.
///
/// Either all three handles are set or none of them is; a partially set
/// connection means a previous initialize was interrupted in a way that
/// violated the unwind contract and is not recoverable.
struct NativeConnection<P: NativePlatform> {
    display: Option<P::Display>,
    root_window: Option<P::Drawable>,
    bootstrap_context: Option<P::Context>,
}

impl<P: NativePlatform> NativeConnection<P> {
    fn unset() -> Self {
        Self { display: None, root_window: None, bootstrap_context: None }
    }

    fn fully_set(&self) -> bool {
        self.display.is_some() && self.root_window.is_some() && self.bootstrap_context.is_some()
    }

    fn partially_set(&self) -> bool {
        !self.fully_set()
            && (self.display.is_some()
                || self.root_window.is_some()
                || self.bootstrap_context.is_some())
    }
}

/// A connection to the native display plus everything enumerated from it.
///
/// The display is the root of the resource hierarchy: it owns the native
/// connection, the bootstrap context used to probe capabilities, and the
/// ordered config list. It is constructed cold with [`Display::new`], brought
/// up with [`Display::initialize`] and torn down with
/// [`Display::terminate`]; terminate is idempotent and runs implicitly on
/// drop.
pub struct Display<P: NativePlatform> {
    platform: P,
    screen: c_int,
    connection: NativeConnection<P>,
    configs: Vec<Config>,
    version: Option<Version>,
    features: DisplayFeatures,
    current_draw: Option<P::Drawable>,
    fatal_handler: OnceCell<()>,
}

impl<P: NativePlatform> Display<P> {
    /// Wrap a native platform without touching it. No native resource is
    /// acquired until [`Display::initialize`].
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            screen: DEFAULT_SCREEN,
            connection: NativeConnection::unset(),
            configs: Vec::new(),
            version: None,
            features: DisplayFeatures::empty(),
            current_draw: None,
            fatal_handler: OnceCell::new(),
        }
    }

    /// Open the native display and bring the engine up.
    ///
    /// Opens the connection, checks the native protocol version, binds a
    /// bootstrap context on the root window, resolves the extension entry
    /// points and enumerates the config list. Every step unwinds all
    /// previously acquired resources on failure, so after an error the
    /// connection state is exactly as cold as before the call. Calling
    /// initialize on an already initialized display is a no-op.
    pub fn initialize(&mut self) -> Result<()> {
        if self.connection.fully_set() {
            return Ok(());
        }

        if self.connection.partially_set() {
            return Err(ErrorKind::BadDisplay.into());
        }

        let display = match self.platform.open_display() {
            Some(display) => display,
            None => return Err(ErrorKind::NotInitialized.into()),
        };

        let version = match self.platform.query_version(display) {
            Some(version) if version >= MIN_NATIVE_VERSION => version,
            _ => {
                self.platform.close_display(display);
                return Err(ErrorKind::NotInitialized.into());
            },
        };

        let root_window = match self.platform.root_window(display) {
            Some(root_window) => root_window,
            None => {
                self.platform.close_display(display);
                return Err(ErrorKind::NotInitialized.into());
            },
        };

        let visual = match self.platform.choose_bootstrap_visual(display) {
            Some(visual) => visual,
            None => {
                self.platform.close_display(display);
                return Err(ErrorKind::NotInitialized.into());
            },
        };

        let bootstrap_context = match self.platform.create_bootstrap_context(display, visual) {
            Some(context) => context,
            None => {
                self.platform.close_display(display);
                return Err(ErrorKind::NotInitialized.into());
            },
        };

        if !self.platform.make_current(display, Some(root_window), Some(bootstrap_context)) {
            self.platform.destroy_context(display, bootstrap_context);
            self.platform.close_display(display);
            return Err(ErrorKind::NotInitialized.into());
        }

        // Extension entry points are resolvable only now that a context is
        // bound. Missing entries are tolerated; the calls relying on them
        // fail when invoked.
        let mut features = DisplayFeatures::empty();
        features.set(
            DisplayFeatures::CREATE_CONTEXT_ATTRIBS,
            self.platform.has_extension_fn(CREATE_CONTEXT_ATTRIBS_FN),
        );
        features.set(DisplayFeatures::SWAP_CONTROL, self.platform.has_extension_fn(SWAP_INTERVAL_FN));

        let extensions = self.platform.query_extensions(display, self.screen);
        let es_mask = config::es_profile_mask(&extensions);
        features.set(DisplayFeatures::CREATE_ES_CONTEXT, !es_mask.is_empty());

        let configs = match config::enumerate_configs(&self.platform, display, self.screen, es_mask)
        {
            Ok(configs) => configs,
            Err(err) => {
                self.platform.make_current(display, None, None);
                self.platform.destroy_context(display, bootstrap_context);
                self.platform.close_display(display);
                return Err(err);
            },
        };

        debug!("display initialized: native version {version}, {} configs", configs.len());

        self.connection.display = Some(display);
        self.connection.root_window = Some(root_window);
        self.connection.bootstrap_context = Some(bootstrap_context);
        self.version = Some(version);
        self.features = features;
        self.configs = configs;
        self.current_draw = Some(root_window);

        Ok(())
    }

    /// Tear the display down.
    ///
    /// Detaches the current binding, then destroys the bootstrap context,
    /// the window and the connection, in that fixed order, skipping whatever
    /// is not set. Safe to call any number of times.
    pub fn terminate(&mut self) -> Result<()> {
        if let Some(display) = self.connection.display {
            self.platform.make_current(display, None, None);
        }

        if let Some(display) = self.connection.display {
            if let Some(context) = self.connection.bootstrap_context.take() {
                self.platform.destroy_context(display, context);
            }

            if let Some(window) = self.connection.root_window.take() {
                self.platform.destroy_window(display, window);
            }
        }

        if let Some(display) = self.connection.display.take() {
            self.platform.close_display(display);
        }

        self.configs.clear();
        self.version = None;
        self.features = DisplayFeatures::empty();
        self.current_draw = None;

        Ok(())
    }

    /// Whether the display has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.connection.fully_set()
    }

    /// The native protocol version, available once initialized.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// The probed platform capabilities.
    pub fn features(&self) -> DisplayFeatures {
        self.features
    }

    /// The enumerated configs, in native enumeration order.
    pub fn configs(&self) -> &[Config] {
        &self.configs
    }

    /// Look a config up by its id.
    pub fn config(&self, config_id: c_int) -> Result<&Config> {
        self.configs
            .iter()
            .find(|config| config.config_id == config_id)
            .ok_or_else(|| ErrorKind::BadConfig.into())
    }

    /// The wrapped native platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub(crate) fn screen(&self) -> c_int {
        self.screen
    }

    pub(crate) fn native_display(&self) -> Result<P::Display> {
        self.connection.display.ok_or_else(|| ErrorKind::NotInitialized.into())
    }

    /// Create a rendering context against a config, optionally sharing state
    /// with an existing context.
    ///
    /// The standardized attribute list is translated into the native array
    /// first; the native format is re-derived from the config's visual id at
    /// call time. The fatal protocol error handler is installed before the
    /// native creation call; creation failure is signaled by a null handle,
    /// not through the handler.
    pub fn create_context(
        &self,
        config_id: c_int,
        share: Option<&Context<P>>,
        attrib_list: &[c_int],
    ) -> Result<Context<P>> {
        let attribs = NativeContextAttribs::translate(attrib_list)?;

        let display = self.native_display()?;
        let config = self.config(config_id)?;

        if !self.features.contains(DisplayFeatures::CREATE_CONTEXT_ATTRIBS) {
            return Err(ErrorKind::NotSupported(
                "the platform lacks the context creation entry point",
            )
            .into());
        }

        let format = find_native_format(
            &self.platform,
            display,
            self.screen,
            config.native_visual_id,
            FormatFilter::default(),
        )?
        .ok_or(ErrorKind::Misc)?;

        // A protocol error raised during creation is unrecoverable and must
        // terminate the process; install the handler once per display.
        self.fatal_handler.get_or_init(|| self.platform.install_fatal_error_handler(display));

        let shared = share.map(|context| context.raw);
        let raw = self
            .platform
            .create_context(display, format, shared, attribs.as_slice())
            .ok_or(ErrorKind::BadContext)?;

        Ok(Context { raw, shared, config_id })
    }

    /// Destroy a context. Independent of any surface the context was current
    /// on.
    pub fn destroy_context(&self, context: Context<P>) -> Result<()> {
        let display = self.native_display()?;
        self.platform.destroy_context(display, context.raw);
        Ok(())
    }

    /// Bind a (surface, context) pair current, or detach with
    /// `(None, None)`.
    ///
    /// A surface without a context or a context without a surface is an
    /// illegal pairing and fails with [`ErrorKind::BadMatch`].
    pub fn make_current(
        &mut self,
        surface: Option<&Surface<P>>,
        context: Option<&Context<P>>,
    ) -> Result<()> {
        let display = self.native_display()?;

        match (surface, context) {
            (None, None) => {
                if !self.platform.make_current(display, None, None) {
                    return Err(ErrorKind::Misc.into());
                }

                self.current_draw = None;
                Ok(())
            },
            (Some(surface), Some(context)) => {
                if surface.is_destroyed() {
                    return Err(ErrorKind::BadSurface.into());
                }

                if !self.platform.make_current(
                    display,
                    Some(surface.drawable),
                    Some(context.raw),
                ) {
                    return Err(ErrorKind::Misc.into());
                }

                self.current_draw = Some(surface.drawable);
                Ok(())
            },
            _ => Err(ErrorKind::BadMatch.into()),
        }
    }

    /// Swap the front and back buffers of a surface.
    pub fn swap_buffers(&self, surface: &Surface<P>) -> Result<()> {
        let display = self.native_display()?;

        if surface.is_destroyed() {
            return Err(ErrorKind::BadSurface.into());
        }

        if !self.platform.swap_buffers(display, surface.drawable) {
            return Err(ErrorKind::Misc.into());
        }

        Ok(())
    }

    /// Set the swap interval for the current draw surface.
    ///
    /// Requires the swap control entry point and a current surface.
    pub fn swap_interval(&self, interval: c_int) -> Result<()> {
        let display = self.native_display()?;

        if !self.features.contains(DisplayFeatures::SWAP_CONTROL) {
            return Err(ErrorKind::NotSupported(
                "the platform lacks the swap interval entry point",
            )
            .into());
        }

        let drawable = self.current_draw.ok_or(ErrorKind::BadSurface)?;

        if !self.platform.set_swap_interval(display, drawable, interval) {
            return Err(ErrorKind::Misc.into());
        }

        Ok(())
    }
}

impl<P: NativePlatform> Drop for Display<P> {
    fn drop(&mut self) {
        let _ = self.terminate();
    }
}

impl<P: NativePlatform> fmt::Debug for Display<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("initialized", &self.is_initialized())
            .field("version", &self.version)
            .field("features", &self.features)
            .field("configs", &self.configs.len())
            .finish()
    }
}
