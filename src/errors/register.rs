use super::construct::ConstructErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum RegisterErrorKind {
    #[error("Host is disposed")]
    HostDisposed,
    #[error(transparent)]
    Construct(ConstructErrorKind),
}
