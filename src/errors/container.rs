#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ScopeErrorKind {
    #[error("Scope is already active. Nested scopes aren't supported, leave the current scope first")]
    AlreadyActive,
}
