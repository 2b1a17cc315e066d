/// Config for a container
/// ## Fields
/// - `detect_cycles`:
///   If `true`, every resolution tracks the chain of contracts being built
///   and a contract that depends on itself (directly or not) is reported as
///   [`crate::ResolveErrorKind::CyclicConfiguration`].
///
///   If `false`, a cyclic configuration recurses until the stack is exhausted.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub detect_cycles: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { detect_cycles: true }
    }
}
