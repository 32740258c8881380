#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod component;
pub(crate) mod errors;
pub(crate) mod host;
pub(crate) mod registrar;
pub(crate) mod registry;

pub mod utils;

pub use any::TypeInfo;
pub use component::Component;
pub use errors::{ConstructErrorKind, LookupErrorKind, RegisterErrorKind};
pub use host::ComponentHost;
pub use registrar::Registrar;
pub use registry::ComponentRegistry;
