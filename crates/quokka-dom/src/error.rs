//! DOM-view errors.

use thiserror::Error;

/// A caller invoked DOM behavior the read-only view does not provide.
///
/// The tree is built once and read thereafter; every mutation and every
/// live-DOM facility signals this error instead of silently doing
/// nothing, so programmer misuse surfaces immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The named DOM operation is not supported.
    #[error("not supported {0:?} operation")]
    Unsupported(&'static str),
}
