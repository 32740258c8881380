use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum LookupErrorKind {
    #[error("Component {} not registered", type_info.name)]
    NotRegistered { type_info: TypeInfo },
    #[error("Host is disposed")]
    HostDisposed,
}
