use alloc::vec::Vec;
use tracing::{debug, error, info_span};

use crate::{
    any::TypeInfo,
    component::{boxed_constructor, boxed_constructor_fn, boxed_instance, BoxCloneConstructor, Component},
    errors::{ConstructErrorKind, RegisterErrorKind},
    host::ComponentHost,
    utils::thread_safety::{SendSafety, SyncSafety},
};

#[derive(Clone)]
struct Entry {
    type_info: TypeInfo,
    constructor: BoxCloneConstructor,
}

/// Collects component registrations and applies them to a host in one pass,
/// in registration order.
///
/// Meant for the one-shot startup sequence of a host application; outside of
/// it, [`ComponentHost::register`] and friends do the same work one
/// component at a time.
#[derive(Default, Clone)]
pub struct Registrar {
    entries: Vec<Entry>,
}

impl Registrar {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Schedules `C` to be constructed from the target host and registered.
    #[inline]
    #[must_use]
    pub fn provide<C: Component>(mut self) -> Self {
        self.entries.push(Entry {
            type_info: TypeInfo::of::<C>(),
            constructor: boxed_constructor::<C>(),
        });
        self
    }

    /// Schedules a closure-built component.
    #[inline]
    #[must_use]
    pub fn provide_with<T, Err, F>(mut self, constructor: F) -> Self
    where
        T: SendSafety + SyncSafety + 'static,
        Err: Into<ConstructErrorKind>,
        F: Fn(&ComponentHost) -> Result<T, Err> + Clone + 'static,
    {
        self.entries.push(Entry {
            type_info: TypeInfo::of::<T>(),
            constructor: boxed_constructor_fn(constructor),
        });
        self
    }

    /// Schedules a pre-constructed instance, registered as-is.
    #[inline]
    #[must_use]
    pub fn instance<T>(mut self, value: T) -> Self
    where
        T: SendSafety + SyncSafety + 'static,
    {
        self.entries.push(Entry {
            type_info: TypeInfo::of::<T>(),
            constructor: boxed_instance(value),
        });
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Constructs and registers every entry against `host`, in order.
    /// Entries for the same type overwrite each other, last write wins.
    ///
    /// # Errors
    /// - Returns [`RegisterErrorKind::HostDisposed`] if the host is no longer
    ///   live; nothing is constructed.
    /// - Returns [`RegisterErrorKind::Construct`] with the first constructor
    ///   error, unchanged. Entries registered before it stay registered.
    pub fn apply(self, host: &ComponentHost) -> Result<(), RegisterErrorKind> {
        let span = info_span!("apply", host = host.label(), entries = self.entries.len());
        let _guard = span.enter();

        if host.is_disposed() {
            let err = RegisterErrorKind::HostDisposed;
            error!("{}", err);
            return Err(err);
        }

        for Entry { type_info, constructor } in self.entries {
            let component = match constructor.construct(host) {
                Ok(component) => component,
                Err(err) => {
                    let err = RegisterErrorKind::Construct(err);
                    error!(component = type_info.name, "{}", err);
                    return Err(err);
                }
            };

            host.insert_erased(type_info, component);
            debug!(component = type_info.short_name(), "Registered");
        }
        Ok(())
    }
}

/// Builds a [`Registrar`] from a list of [`Component`] types.
///
/// ```rust
/// use componentry::{components, Component, ComponentHost, ConstructErrorKind};
///
/// struct Config;
/// struct Analyzer;
///
/// impl Component for Config {
///     type Error = ConstructErrorKind;
///
///     fn construct(_host: &ComponentHost) -> Result<Self, Self::Error> {
///         Ok(Self)
///     }
/// }
///
/// impl Component for Analyzer {
///     type Error = ConstructErrorKind;
///
///     fn construct(_host: &ComponentHost) -> Result<Self, Self::Error> {
///         Ok(Self)
///     }
/// }
///
/// let host = ComponentHost::new("application");
/// components![Config, Analyzer].apply(&host).unwrap();
/// ```
#[macro_export]
macro_rules! components {
    ( $( $component:ty ),* $(,)? ) => {{
        let registrar = $crate::Registrar::new();
        $( let registrar = registrar.provide::<$component>(); )*
        registrar
    }};
}
