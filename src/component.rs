use alloc::boxed::Box;

use crate::{
    errors::ConstructErrorKind,
    host::ComponentHost,
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// A service constructed with the owning host as its sole dependency.
///
/// The host never clones or rewraps the context it hands to `construct`:
/// the instance sees exactly the handle registration was called on.
pub trait Component: Sized + SendSafety + SyncSafety + 'static {
    type Error: Into<ConstructErrorKind>;

    fn construct(host: &ComponentHost) -> Result<Self, Self::Error>;
}

pub(crate) trait CloneConstructor {
    fn construct_erased(&self, host: &ComponentHost) -> Result<RcAnyThreadSafety, ConstructErrorKind>;

    #[must_use]
    fn clone_box(&self) -> Box<dyn CloneConstructor>;
}

/// Type-erased, cloneable component constructor.
pub(crate) struct BoxCloneConstructor(Box<dyn CloneConstructor>);

impl Clone for BoxCloneConstructor {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl BoxCloneConstructor {
    #[inline]
    pub(crate) fn construct(&self, host: &ComponentHost) -> Result<RcAnyThreadSafety, ConstructErrorKind> {
        self.0.construct_erased(host)
    }
}

struct ConstructorFn<F> {
    f: F,
}

impl<F> CloneConstructor for ConstructorFn<F>
where
    F: Fn(&ComponentHost) -> Result<RcAnyThreadSafety, ConstructErrorKind> + Clone + 'static,
{
    #[inline]
    fn construct_erased(&self, host: &ComponentHost) -> Result<RcAnyThreadSafety, ConstructErrorKind> {
        (self.f)(host)
    }

    #[inline]
    fn clone_box(&self) -> Box<dyn CloneConstructor> {
        Box::new(Self { f: self.f.clone() })
    }
}

#[must_use]
pub(crate) fn boxed_constructor<C: Component>() -> BoxCloneConstructor {
    boxed_constructor_fn(C::construct)
}

#[must_use]
pub(crate) fn boxed_constructor_fn<T, Err, F>(constructor: F) -> BoxCloneConstructor
where
    T: SendSafety + SyncSafety + 'static,
    Err: Into<ConstructErrorKind>,
    F: Fn(&ComponentHost) -> Result<T, Err> + Clone + 'static,
{
    BoxCloneConstructor(Box::new(ConstructorFn {
        f: move |host: &ComponentHost| match constructor(host) {
            Ok(component) => Ok(RcThreadSafety::new(component) as RcAnyThreadSafety),
            Err(err) => Err(err.into()),
        },
    }))
}

#[must_use]
pub(crate) fn boxed_instance<T>(value: T) -> BoxCloneConstructor
where
    T: SendSafety + SyncSafety + 'static,
{
    let value = RcThreadSafety::new(value) as RcAnyThreadSafety;
    BoxCloneConstructor(Box::new(ConstructorFn {
        f: move |_: &ComponentHost| Ok(value.clone()),
    }))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{boxed_constructor, boxed_constructor_fn, Component};
    use crate::{errors::ConstructErrorKind, ComponentHost};

    struct Echo {
        label: &'static str,
    }

    impl Component for Echo {
        type Error = ConstructErrorKind;

        fn construct(host: &ComponentHost) -> Result<Self, Self::Error> {
            Ok(Self { label: host.label() })
        }
    }

    #[test]
    fn test_boxed_constructor() {
        let host = ComponentHost::new("application");
        let constructor = boxed_constructor::<Echo>();

        let component = constructor.construct(&host).unwrap();

        assert_eq!(component.downcast::<Echo>().unwrap().label, "application");
    }

    #[test]
    fn test_boxed_constructor_fn_error_propagates() {
        let host = ComponentHost::new("application");
        let constructor =
            boxed_constructor_fn(|_: &ComponentHost| Err::<Echo, _>(ConstructErrorKind::Custom(anyhow::anyhow!("boom"))));

        let err = constructor.construct(&host).unwrap_err();

        assert!(matches!(err, ConstructErrorKind::Custom(_)));
    }
}
