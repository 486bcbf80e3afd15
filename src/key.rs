//! Identity types for beans and cached objects.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a requestable bean: a type plus an optional qualifier.
///
/// The qualifier discriminates multiple providers of the same type. Equality
/// and hashing use the type and the qualifier; the captured type name is
/// carried for diagnostics only.
///
/// # Examples
///
/// ```rust
/// use beancan::BeanKey;
///
/// struct HelloBean;
///
/// let plain = BeanKey::of::<HelloBean>();
/// let primary = BeanKey::qualified::<HelloBean>("primary");
///
/// assert_eq!(plain, BeanKey::of::<HelloBean>());
/// assert_ne!(plain, primary);
/// assert_eq!(primary.qualifier(), Some("primary"));
/// assert!(plain.type_name().ends_with("HelloBean"));
/// ```
#[derive(Debug, Clone)]
pub struct BeanKey {
    type_id: TypeId,
    type_name: &'static str,
    qualifier: Option<&'static str>,
}

impl BeanKey {
    /// Key for an unqualified bean of type `T`.
    pub fn of<T: 'static>() -> Self {
        BeanKey {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            qualifier: None,
        }
    }

    /// Key for a bean of type `T` discriminated by `qualifier`.
    pub fn qualified<T: 'static>(qualifier: &'static str) -> Self {
        BeanKey {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            qualifier: Some(qualifier),
        }
    }

    /// The bean's type name, as reported by `std::any::type_name`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The qualifier, if this key is qualified.
    pub fn qualifier(&self) -> Option<&'static str> {
        self.qualifier
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }
}

// TypeId comparison first: it is the hot path and never collides, while the
// name is only reliable for ordering, not identity.
impl PartialEq for BeanKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.qualifier == other.qualifier
    }
}

impl Eq for BeanKey {}

impl Hash for BeanKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.qualifier.hash(state);
    }
}

// Ordered by name so introspection output is deterministic across runs; the
// TypeId tie-break keeps the ordering consistent with equality when two
// distinct types render the same name.
impl Ord for BeanKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_name
            .cmp(other.type_name)
            .then_with(|| self.qualifier.cmp(&other.qualifier))
            .then_with(|| self.type_id.cmp(&other.type_id))
    }
}

impl PartialOrd for BeanKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BeanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier {
            Some(q) => write!(f, "{}({})", self.type_name, q),
            None => f.write_str(self.type_name),
        }
    }
}

/// Identity used by the instance cache.
///
/// Catalog beans are cached under their [`BeanKey`]; ad-hoc injected classes
/// are cached under their class identity, since they carry no qualifier.
/// One instance is cached per `ObjectId` for the container's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectId {
    /// A bean from the catalog.
    Bean(BeanKey),
    /// A plain class wired through injection points.
    Class(TypeId, &'static str),
}

impl ObjectId {
    /// Cache identity for a catalog bean.
    pub fn bean(key: BeanKey) -> Self {
        ObjectId::Bean(key)
    }

    /// Cache identity for an injected class.
    pub fn class<T: 'static>() -> Self {
        ObjectId::Class(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// The underlying type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectId::Bean(key) => key.type_name(),
            ObjectId::Class(_, name) => name,
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectId::Bean(key) => write!(f, "{}", key),
            ObjectId::Class(_, name) => write!(f, "{} (class)", name),
        }
    }
}
