//! The boundary entry point a host runtime talks to.

use std::panic::{self, AssertUnwindSafe};

use crate::command::interp;
use crate::display::window::{Display, DisplayController};
use crate::foundation::config::BridgeOpts;
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::nif::funcs;
use crate::pixel::buffer::Image;
use crate::registry::handle::{Handle, Resource};
use crate::registry::table::{Registry, RegistryStats, Shared};
use crate::term::marshal::{FromTerm, IntoTerm};
use crate::term::value::Term;

/// One native side of the boundary: a handle registry plus the options every call runs
/// under.
///
/// All entry points take `&self`; a `Bridge` can be shared between host threads. Calls
/// against the same handle serialize on that handle's lock.
pub struct Bridge {
    registry: Registry,
    opts: BridgeOpts,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::from_valid_opts(BridgeOpts::default())
    }
}

impl Bridge {
    /// Bridge with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bridge with caller-supplied options.
    pub fn with_opts(opts: BridgeOpts) -> BridgeResult<Self> {
        opts.validate()?;
        Ok(Self::from_valid_opts(opts))
    }

    fn from_valid_opts(opts: BridgeOpts) -> Self {
        Self {
            registry: Registry::new(opts.max_handles),
            opts,
        }
    }

    /// Options in effect.
    pub fn opts(&self) -> &BridgeOpts {
        &self.opts
    }

    /// Registry occupancy.
    pub fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    /// Call boundary function `name` and render the outcome as a term.
    ///
    /// Failures come back as `{:error, {kind, "message"}}`. A panic inside a function is
    /// caught and reported the same way, with kind `other`.
    #[tracing::instrument(skip(self, args), fields(arity = args.len()))]
    pub fn call(&self, name: &str, args: &[Term]) -> Term {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_call(name, args)))
            .unwrap_or_else(|payload| Err(panic_error(name, payload.as_ref())));
        match outcome {
            Ok(term) => term,
            Err(err) => {
                tracing::debug!(kind = err.kind_atom(), error = %err, "call failed");
                err.to_term()
            }
        }
    }

    /// Call boundary function `name`, keeping the typed error.
    pub fn try_call(&self, name: &str, args: &[Term]) -> BridgeResult<Term> {
        let func = funcs::lookup(name)
            .ok_or_else(|| BridgeError::bad_argument(format!("unknown function '{name}'")))?;
        func(self, args)
    }

    /// Run a command script against a fresh pipeline image.
    pub fn run(&self, script: &[Term]) -> BridgeResult<Term> {
        interp::run(&self.registry, &self.opts, script)
    }

    /// Drop the host's reference to `handle`. Releasing twice is a no-op.
    pub fn release(&self, handle: &Handle) -> bool {
        self.registry.release(handle)
    }

    /// Hand `img` to the registry.
    pub fn insert_image(&self, img: Image) -> BridgeResult<Handle> {
        self.registry.register(img)
    }

    /// Copy of the image behind `handle`.
    pub fn image(&self, handle: &Handle) -> BridgeResult<Image> {
        Ok(self.registry.resolve::<Image>(handle)?.lock()?.clone())
    }

    /// Event sender for a display.
    ///
    /// Obtain it before calling `display_wait`: the wait holds the display's lock until an
    /// event arrives.
    pub fn display_controller(&self, handle: &Handle) -> BridgeResult<DisplayController> {
        Ok(self.registry.resolve::<Display>(handle)?.lock()?.controller())
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn max_elements(&self) -> usize {
        self.opts.max_elements
    }

    /// Resolve a handle argument.
    pub(crate) fn shared<T: Resource>(&self, term: &Term) -> BridgeResult<Shared<T>> {
        self.registry.resolve(&Handle::from_term(term)?)
    }

    /// Clone the object behind a handle argument, holding its lock only for the copy.
    ///
    /// Two-handle functions read their source through this, so no call ever holds two
    /// object locks at once.
    pub(crate) fn snapshot<T: Resource + Clone>(&self, term: &Term) -> BridgeResult<T> {
        Ok(self.shared::<T>(term)?.lock()?.clone())
    }

    /// Register `value` and answer `{:ok, handle}`.
    pub(crate) fn adopt<T: Resource>(&self, value: T) -> BridgeResult<Term> {
        Ok(Term::ok_tuple(self.registry.register(value)?.into_term()))
    }
}

fn panic_error(name: &str, payload: &(dyn std::any::Any + Send)) -> BridgeError {
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());
    tracing::warn!(function = name, panic = %msg, "boundary function panicked");
    BridgeError::Other(anyhow::anyhow!("{name} panicked: {msg}"))
}

#[cfg(test)]
#[path = "../../tests/unit/nif/bridge.rs"]
mod tests;
