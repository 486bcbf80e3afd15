//! Self-refreshing bindings for service-kind beans.
//!
//! A service bean fronts a remote endpoint. Instead of resolving the endpoint
//! once and trusting it forever, the bean holds a [`ServiceBinding`] that
//! re-validates its cached endpoint on every use and re-binds through the
//! container's [`ServiceLookup`] when the cached one goes stale. The bean
//! instance itself is still cached exactly once; only its target moves.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::BoxError;
use crate::factory::CtorFn;
use crate::key::BeanKey;

/// Locates and validates remote endpoints for service beans.
///
/// Implementations are supplied by the application through
/// [`ContainerBuilder::with_service_lookup`](crate::ContainerBuilder::with_service_lookup);
/// the container core never speaks any transport itself.
pub trait ServiceLookup: Send + Sync + 'static {
    /// Find the current endpoint for `key` on the given transport component.
    fn locate(&self, key: &BeanKey, component: &str) -> Result<ServiceEndpoint, BoxError>;

    /// Whether a previously located endpoint is still good to use.
    ///
    /// Defaults to `true`; registries that track liveness override this so
    /// bindings re-locate dead targets.
    fn validate(&self, endpoint: &ServiceEndpoint) -> bool {
        let _ = endpoint;
        true
    }
}

/// A located endpoint: a uri plus transport-specific properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    uri: String,
    properties: HashMap<String, String>,
}

impl ServiceEndpoint {
    pub fn new(uri: impl Into<String>) -> Self {
        ServiceEndpoint {
            uri: uri.into(),
            properties: HashMap::new(),
        }
    }

    /// Attach a transport property, e.g. a space name or partition id.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// The handle a service bean keeps to its moving remote target.
///
/// [`endpoint`](Self::endpoint) returns the cached endpoint while the lookup
/// still vouches for it and transparently re-binds when it does not;
/// [`rebind`](Self::rebind) forces a fresh lookup; [`invalidate`](Self::invalidate)
/// drops the cache so the next use re-binds.
pub struct ServiceBinding {
    key: BeanKey,
    component: &'static str,
    lookup: Arc<dyn ServiceLookup>,
    endpoint: RwLock<Option<ServiceEndpoint>>,
}

impl ServiceBinding {
    pub(crate) fn new(
        key: BeanKey,
        component: &'static str,
        lookup: Arc<dyn ServiceLookup>,
    ) -> Self {
        ServiceBinding {
            key,
            component,
            lookup,
            endpoint: RwLock::new(None),
        }
    }

    /// The bean key this binding serves.
    pub fn key(&self) -> &BeanKey {
        &self.key
    }

    /// The transport component endpoints are located on.
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// The current endpoint, re-binding first if the cached one is missing
    /// or no longer valid.
    pub fn endpoint(&self) -> Result<ServiceEndpoint, BoxError> {
        {
            let cached = self.endpoint.read().unwrap();
            if let Some(endpoint) = cached.as_ref() {
                if self.lookup.validate(endpoint) {
                    return Ok(endpoint.clone());
                }
            }
        }
        self.rebind()
    }

    /// Drop the cached endpoint and locate a fresh one.
    pub fn rebind(&self) -> Result<ServiceEndpoint, BoxError> {
        let endpoint = self.lookup.locate(&self.key, self.component)?;
        tracing::debug!(bean = %self.key, uri = endpoint.uri(), "service bean bound");
        *self.endpoint.write().unwrap() = Some(endpoint.clone());
        Ok(endpoint)
    }

    /// Forget the cached endpoint; the next [`endpoint`](Self::endpoint)
    /// call re-binds.
    pub fn invalidate(&self) {
        *self.endpoint.write().unwrap() = None;
    }
}

/// Layer the stateful binding ahead of a service export's raw constructor.
///
/// The raw constructor sees the binding through its context. A container
/// without a configured lookup cannot bind, so construction fails there.
pub(crate) fn stateful_invoke(key: BeanKey, component: &'static str, raw: CtorFn) -> CtorFn {
    Arc::new(move |cx| {
        let lookup = cx.service_lookup().ok_or_else(|| {
            format!("no service lookup configured, service bean {} cannot bind", key)
        })?;
        let binding = Arc::new(ServiceBinding::new(key.clone(), component, lookup));
        raw(&cx.with_binding(binding))
    })
}
