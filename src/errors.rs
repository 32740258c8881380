mod construct;
mod lookup;
mod register;

pub use construct::ConstructErrorKind;
pub use lookup::LookupErrorKind;
pub use register::RegisterErrorKind;
