//! Provider kind definitions.

use std::fmt;

/// The two kinds of bean providers the container understands.
///
/// The kind decides how a provider's factories are assembled during
/// scanning: library factories run as declared, while service factories are
/// wrapped so the produced bean can manage its own remote binding.
///
/// # Examples
///
/// ```rust
/// use beancan::ProviderKind;
///
/// assert!(ProviderKind::Library.is_library());
/// assert!(!ProviderKind::Service.is_library());
/// assert_eq!(ProviderKind::Service.to_string(), "service");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// In-process bean with no external binding.
    ///
    /// Library beans are plain objects: their factory output is cached
    /// as-is and nothing about them changes after construction.
    Library,
    /// Bean representing a remotely reachable capability.
    ///
    /// Service beans are built through a stateful wrapper that hands the
    /// factory a self-refreshing binding, so the bean can re-resolve its
    /// target on each use while the bean instance itself stays cached.
    Service,
}

impl ProviderKind {
    /// Whether this is the library kind.
    pub fn is_library(self) -> bool {
        matches!(self, ProviderKind::Library)
    }

    /// Whether this is the service kind.
    pub fn is_service(self) -> bool {
        matches!(self, ProviderKind::Service)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Library => f.write_str("library"),
            ProviderKind::Service => f.write_str("service"),
        }
    }
}
