/// Caching policy of a binding.
///
/// - [`Lifecycle::PerRequest`]: a new instance is built on every resolution.
/// - [`Lifecycle::Scoped`]: one instance per contract is built per active scope and reused until the scope is left.
///   Resolving it without an active scope is an error.
/// - [`Lifecycle::Singleton`]: one instance per contract is built for the whole life of the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    #[default]
    PerRequest,
    Scoped,
    Singleton,
}

impl Lifecycle {
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Lifecycle::PerRequest => "per_request",
            Lifecycle::Scoped => "scoped",
            Lifecycle::Singleton => "singleton",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Lifecycle;

    #[test]
    fn test_default_is_per_request() {
        assert_eq!(Lifecycle::default(), Lifecycle::PerRequest);
        assert_eq!(Lifecycle::default().name(), "per_request");
    }
}
