//! Error types for the bean container.

use std::fmt;
use std::sync::Arc;

use crate::key::{BeanKey, ObjectId};

/// Boxed error type used by factory closures and lifecycle hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Container errors.
///
/// Each condition the container can fail with is a distinct variant so
/// callers can branch on the kind programmatically instead of parsing
/// message text. Bootstrap failures (`DuplicateProvider`, `IllegalProvider`)
/// abort [`ContainerBuilder::build`](crate::ContainerBuilder::build) entirely;
/// the remaining kinds surface per request and never poison the cache.
///
/// # Examples
///
/// ```rust
/// use beancan::{ContainerBuilder, ContainerError};
///
/// struct HelloBean;
///
/// // Requesting a bean from an empty container reports the missing provider.
/// let container = ContainerBuilder::new().build().unwrap();
/// match container.get_bean::<HelloBean>() {
///     Err(ContainerError::MissingBeanProvider { key }) => {
///         assert!(key.type_name().ends_with("HelloBean"));
///     }
///     other => panic!("expected MissingBeanProvider, got {:?}", other.err()),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum ContainerError {
    /// Two providers claim the same bean key; raised at catalog build.
    DuplicateProvider {
        /// The contested key.
        key: BeanKey,
        /// Provider that registered the key first.
        first_owner: &'static str,
        /// Provider that tried to register it again.
        second_owner: &'static str,
    },
    /// A descriptor cannot be turned into factories; raised during scanning.
    IllegalProvider {
        /// The offending provider's name.
        provider: &'static str,
        /// Why the descriptor was rejected.
        reason: String,
    },
    /// The requested key has no entry in the catalog at all.
    MissingBeanProvider {
        /// The key nobody exports.
        key: BeanKey,
    },
    /// The requested bean's provider exists but a transitive requirement is absent.
    MissingBeanDependency {
        /// The bean whose factory declared the requirement.
        required_by: BeanKey,
        /// The missing leaf.
        missing: BeanKey,
    },
    /// A dependency cycle was found while planning construction.
    CircularDependency {
        /// The full cycle, first node repeated at the end.
        path: Vec<ObjectId>,
    },
    /// An injection point was declared with zero dependencies.
    InvalidInjectionTarget {
        /// The class carrying the bad declaration.
        class: &'static str,
    },
    /// A factory invocation or init hook failed.
    Construction {
        /// Identity of the object that failed to build.
        id: ObjectId,
        /// The underlying failure.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// The container was already destroyed.
    Destroyed,
}

impl ContainerError {
    pub(crate) fn construction(id: ObjectId, source: impl Into<BoxError>) -> Self {
        ContainerError::Construction {
            id,
            source: Arc::from(source.into()),
        }
    }
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::DuplicateProvider {
                key,
                first_owner,
                second_owner,
            } => write!(
                f,
                "Duplicate provider for {}: '{}' and '{}' both export it",
                key, first_owner, second_owner
            ),
            ContainerError::IllegalProvider { provider, reason } => {
                write!(f, "Illegal provider '{}': {}", provider, reason)
            }
            ContainerError::MissingBeanProvider { key } => {
                write!(f, "No provider exports bean {}", key)
            }
            ContainerError::MissingBeanDependency {
                required_by,
                missing,
            } => write!(
                f,
                "Bean {} requires {}, which no provider exports",
                required_by, missing
            ),
            ContainerError::CircularDependency { path } => {
                write!(f, "Circular dependency: ")?;
                for (i, id) in path.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    write!(f, "{}", id)?;
                }
                Ok(())
            }
            ContainerError::InvalidInjectionTarget { class } => {
                write!(f, "Injection point on {} declares no dependencies", class)
            }
            ContainerError::Construction { id, source } => {
                write!(f, "Failed to construct {}: {}", id, source)
            }
            ContainerError::Destroyed => f.write_str("Container already destroyed"),
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Construction { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// Result type for container operations.
///
/// ```rust
/// use beancan::{ContainerError, ContainerResult};
///
/// fn lookup() -> ContainerResult<u32> {
///     Err(ContainerError::Destroyed)
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type ContainerResult<T> = Result<T, ContainerError>;
