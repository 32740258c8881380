/// Error raised by a component constructor.
///
/// The registry doesn't catch, wrap or recover from it; whatever the
/// constructor reports reaches the registration caller unchanged.
#[derive(thiserror::Error, Debug)]
pub enum ConstructErrorKind {
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
