use core::{
    any::type_name,
    sync::atomic::{AtomicBool, Ordering},
};
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    any::TypeInfo,
    component::Component,
    errors::{LookupErrorKind, RegisterErrorKind},
    registry::ComponentRegistry,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Owning context of a [`ComponentRegistry`].
///
/// A host both carries the registry and serves as the sole constructor
/// dependency of the components registered into it. Handles are cheap to
/// clone and all point at the same registry.
///
/// Hosts form a chain: lookups missing locally fall through to the parent,
/// registrations always write into the host they were called on.
#[derive(Clone)]
pub struct ComponentHost {
    inner: RcThreadSafety<HostInner>,
}

struct HostInner {
    registry: Mutex<ComponentRegistry>,
    label: &'static str,
    disposed: AtomicBool,
    parent: Option<ComponentHost>,
}

impl ComponentHost {
    /// Creates a root (application-level) host with an empty registry.
    #[inline]
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            inner: RcThreadSafety::new(HostInner {
                registry: Mutex::new(ComponentRegistry::new()),
                label,
                disposed: AtomicBool::new(false),
                parent: None,
            }),
        }
    }

    /// Creates a child (project/session-level) host whose lookups fall back
    /// to this one.
    #[inline]
    #[must_use]
    pub fn child(&self, label: &'static str) -> Self {
        Self {
            inner: RcThreadSafety::new(HostInner {
                registry: Mutex::new(ComponentRegistry::new()),
                label,
                disposed: AtomicBool::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.inner.label
    }

    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// `true` if both handles point at the same host.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        RcThreadSafety::ptr_eq(&self.inner, &other.inner)
    }

    /// Constructs `C` with this host as its sole dependency and registers
    /// the instance under `C`'s type.
    ///
    /// Calling this twice constructs two distinct instances; the registry
    /// keeps the last one.
    ///
    /// # Errors
    /// - Returns [`RegisterErrorKind::HostDisposed`] if the host is no longer
    ///   live; liveness is checked before construction, so nothing is built
    ///   and nothing is mutated.
    /// - Returns [`RegisterErrorKind::Construct`] with the constructor's own
    ///   error, unchanged.
    pub fn register<C: Component>(&self) -> Result<(), RegisterErrorKind> {
        let span = info_span!("register", component = type_name::<C>(), host = self.inner.label);
        let _guard = span.enter();

        if self.is_disposed() {
            let err = RegisterErrorKind::HostDisposed;
            error!("{}", err);
            return Err(err);
        }

        let component = match C::construct(self) {
            Ok(component) => component,
            Err(err) => {
                let err = RegisterErrorKind::Construct(err.into());
                error!("{}", err);
                return Err(err);
            }
        };

        if self.inner.registry.lock().insert(component).is_some() {
            debug!("Registered, previous instance evicted");
        } else {
            debug!("Registered");
        }
        Ok(())
    }

    /// Registers a pre-constructed instance under its type, returning the
    /// instance it replaced, if any.
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::HostDisposed`] if the host is no longer
    /// live; the registry isn't touched.
    pub fn register_instance<T: SendSafety + SyncSafety + 'static>(
        &self,
        value: T,
    ) -> Result<Option<RcThreadSafety<T>>, RegisterErrorKind> {
        let span = info_span!("register_instance", component = type_name::<T>(), host = self.inner.label);
        let _guard = span.enter();

        if self.is_disposed() {
            let err = RegisterErrorKind::HostDisposed;
            error!("{}", err);
            return Err(err);
        }

        let previous = self.inner.registry.lock().insert(value);
        debug!("Registered");
        Ok(previous)
    }

    /// Removes the binding for `T` from this host, returning the evicted
    /// instance. Parent bindings are left alone.
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::HostDisposed`] if the host is no longer
    /// live.
    pub fn unregister<T: SendSafety + SyncSafety + 'static>(&self) -> Result<Option<RcThreadSafety<T>>, RegisterErrorKind> {
        let span = info_span!("unregister", component = type_name::<T>(), host = self.inner.label);
        let _guard = span.enter();

        if self.is_disposed() {
            let err = RegisterErrorKind::HostDisposed;
            error!("{}", err);
            return Err(err);
        }

        let evicted = self.inner.registry.lock().remove::<T>();
        if evicted.is_some() {
            debug!("Unregistered");
        }
        Ok(evicted)
    }

    /// Returns the exact instance registered for `T`, searching this host
    /// first and then its parents.
    ///
    /// # Errors
    /// - Returns [`LookupErrorKind::HostDisposed`] if this host is no longer
    ///   live.
    /// - Returns [`LookupErrorKind::NotRegistered`] if no host in the chain
    ///   has a binding for `T`.
    pub fn get<T: SendSafety + SyncSafety + 'static>(&self) -> Result<RcThreadSafety<T>, LookupErrorKind> {
        let span = info_span!("get", component = type_name::<T>(), host = self.inner.label);
        let _guard = span.enter();

        if self.is_disposed() {
            let err = LookupErrorKind::HostDisposed;
            error!("{}", err);
            return Err(err);
        }

        if let Some(component) = self.inner.registry.lock().get::<T>() {
            debug!("Found");
            return Ok(component);
        }

        let mut parent = self.inner.parent.as_ref();
        while let Some(host) = parent {
            if let Some(component) = host.inner.registry.lock().get::<T>() {
                debug!(parent = host.inner.label, "Found in parent");
                return Ok(component);
            }
            parent = host.inner.parent.as_ref();
        }

        let err = LookupErrorKind::NotRegistered {
            type_info: TypeInfo::of::<T>(),
        };
        error!("{}", err);
        Err(err)
    }

    /// Clears the registry and marks the host dead. Every later operation
    /// on this handle (or any clone of it) fails with the disposed error.
    ///
    /// Disposing a child leaves its parent untouched. Disposing twice is a
    /// no-op.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.registry.lock().clear();
        debug!(host = self.inner.label, "Host disposed");
    }
}

impl ComponentHost {
    #[inline]
    pub(crate) fn insert_erased(&self, type_info: TypeInfo, component: RcAnyThreadSafety) -> Option<RcAnyThreadSafety> {
        self.inner.registry.lock().insert_erased(type_info, component)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::{
        format,
        string::{String, ToString},
    };

    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing_test::traced_test;

    use super::ComponentHost;
    use crate::{
        errors::{ConstructErrorKind, LookupErrorKind, RegisterErrorKind},
        utils::thread_safety::RcThreadSafety,
        Component,
    };

    struct Owned {
        owner: ComponentHost,
    }

    impl Component for Owned {
        type Error = ConstructErrorKind;

        fn construct(host: &ComponentHost) -> Result<Self, Self::Error> {
            Ok(Self { owner: host.clone() })
        }
    }

    struct Counted;

    static CONSTRUCT_CALLS: AtomicU8 = AtomicU8::new(0);

    impl Component for Counted {
        type Error = ConstructErrorKind;

        fn construct(_host: &ComponentHost) -> Result<Self, Self::Error> {
            CONSTRUCT_CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(Self)
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl Component for Failing {
        type Error = ConstructErrorKind;

        fn construct(_host: &ComponentHost) -> Result<Self, Self::Error> {
            Err(anyhow::anyhow!("constructor failed").into())
        }
    }

    #[test]
    #[traced_test]
    fn test_register_then_get_holds_owner() {
        let host = ComponentHost::new("project");

        host.register::<Owned>().unwrap();
        let component = host.get::<Owned>().unwrap();

        assert!(component.owner.ptr_eq(&host));
    }

    #[test]
    #[traced_test]
    fn test_register_twice_last_write_wins() {
        let host = ComponentHost::new("project");

        host.register::<Owned>().unwrap();
        let first = host.get::<Owned>().unwrap();

        host.register::<Owned>().unwrap();
        let second = host.get::<Owned>().unwrap();

        assert!(!RcThreadSafety::ptr_eq(&first, &second));
    }

    #[test]
    #[traced_test]
    fn test_register_instance_returns_previous() {
        let host = ComponentHost::new("project");

        assert!(host.register_instance(1u32).unwrap().is_none());
        let previous = host.register_instance(2u32).unwrap().unwrap();

        assert_eq!(*previous, 1);
        assert_eq!(*host.get::<u32>().unwrap(), 2);
    }

    #[test]
    #[traced_test]
    fn test_get_same_instance_every_time() {
        let host = ComponentHost::new("project");

        host.register_instance(1u32).unwrap();

        let first = host.get::<u32>().unwrap();
        let second = host.get::<u32>().unwrap();

        assert!(RcThreadSafety::ptr_eq(&first, &second));
    }

    #[test]
    #[traced_test]
    fn test_unregister() {
        let host = ComponentHost::new("project");

        host.register_instance(1u32).unwrap();
        let evicted = host.unregister::<u32>().unwrap().unwrap();

        assert_eq!(*evicted, 1);
        assert!(matches!(
            host.get::<u32>().unwrap_err(),
            LookupErrorKind::NotRegistered { .. }
        ));
    }

    #[test]
    #[traced_test]
    fn test_child_falls_back_to_parent() {
        let application = ComponentHost::new("application");
        let project = application.child("project");

        application.register_instance(1u32).unwrap();

        let from_parent = project.get::<u32>().unwrap();
        assert_eq!(*from_parent, 1);

        // A local binding shadows the parent without touching it.
        project.register_instance(2u32).unwrap();
        assert_eq!(*project.get::<u32>().unwrap(), 2);
        assert_eq!(*application.get::<u32>().unwrap(), 1);
    }

    #[test]
    #[traced_test]
    fn test_register_on_disposed_host_constructs_nothing() {
        let host = ComponentHost::new("project");
        host.dispose();

        let calls_before = CONSTRUCT_CALLS.load(Ordering::SeqCst);
        let err = host.register::<Counted>().unwrap_err();

        assert!(matches!(err, RegisterErrorKind::HostDisposed));
        assert_eq!(CONSTRUCT_CALLS.load(Ordering::SeqCst), calls_before);
    }

    #[test]
    #[traced_test]
    fn test_disposed_host_rejects_everything() {
        let host = ComponentHost::new("project");
        host.register_instance(1u32).unwrap();
        host.dispose();

        assert!(host.is_disposed());
        assert!(matches!(host.get::<u32>().unwrap_err(), LookupErrorKind::HostDisposed));
        assert!(matches!(
            host.register_instance(2u32).unwrap_err(),
            RegisterErrorKind::HostDisposed
        ));
        assert!(matches!(host.unregister::<u32>().unwrap_err(), RegisterErrorKind::HostDisposed));
    }

    #[test]
    #[traced_test]
    fn test_dispose_child_keeps_parent_alive() {
        let application = ComponentHost::new("application");
        let project = application.child("project");

        application.register_instance(1u32).unwrap();
        project.dispose();

        assert!(!application.is_disposed());
        assert_eq!(*application.get::<u32>().unwrap(), 1);
    }

    #[test]
    #[traced_test]
    fn test_construct_error_propagates_unchanged() {
        let host = ComponentHost::new("project");

        let err = host.register::<Failing>().unwrap_err();

        match err {
            RegisterErrorKind::Construct(ConstructErrorKind::Custom(err)) => {
                assert_eq!(std::format!("{err}"), "constructor failed");
            }
            err => panic!("unexpected error: {err:?}"),
        }
        assert!(matches!(
            host.get::<Failing>().unwrap_err(),
            LookupErrorKind::NotRegistered { .. }
        ));
    }

    #[test]
    fn test_clones_share_registry() {
        let host = ComponentHost::new("project");
        let handle = host.clone();

        host.register_instance(1u32).unwrap();

        assert!(handle.ptr_eq(&host));
        assert_eq!(*handle.get::<u32>().unwrap(), 1);
    }
}
