/// Failure reported while constructing an implementation or calling a factory.
///
/// Constructors can return any [`anyhow::Error`] with `?`, missing or mistyped
/// arguments are reported by [`crate::Args`] getters.
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Argument '{param}' not provided")]
    MissingArgument { param: &'static str },
    #[error("Incorrect type of argument '{param}', expected: {expected}")]
    IncorrectType { param: &'static str, expected: &'static str },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
