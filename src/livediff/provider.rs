//! Virtual documents served under a custom URI scheme
//!
//! A provider is registered per scheme for the lifetime of one diff session.
//! `register` hands back a `ProviderRegistration`; dropping it (or calling
//! `dispose`) removes the provider, so every exit path of a session releases
//! it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use url::Url;

use super::error::ProviderError;
use super::types::{DiffSide, LiveDiffPreview};

/// Produces the text of a virtual document
pub trait TextDocumentContentProvider: Send + Sync {
    fn provide_text_document_content(&self, uri: &Url) -> Result<String, ProviderError>;
}

struct RegisteredProvider {
    id: u64,
    provider: Arc<dyn TextDocumentContentProvider>,
}

type ProviderTable = Mutex<HashMap<String, RegisteredProvider>>;

/// Scheme-keyed table of active providers, shared between sessions and hosts
#[derive(Clone, Default)]
pub struct DocumentProviderRegistry {
    providers: Arc<ProviderTable>,
    next_id: Arc<AtomicU64>,
}

impl DocumentProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `scheme` with `provider` until the returned handle is dropped
    ///
    /// Fails if another registration for the scheme is still alive.
    pub fn register(
        &self,
        scheme: &str,
        provider: Arc<dyn TextDocumentContentProvider>,
    ) -> Result<ProviderRegistration, ProviderError> {
        let mut providers = self.providers.lock().unwrap_or_else(|e| e.into_inner());

        if providers.contains_key(scheme) {
            return Err(ProviderError::SchemeInUse(scheme.to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        providers.insert(scheme.to_string(), RegisteredProvider { id, provider });

        Ok(ProviderRegistration {
            scheme: scheme.to_string(),
            id,
            providers: Arc::downgrade(&self.providers),
        })
    }

    pub fn is_registered(&self, scheme: &str) -> bool {
        let providers = self.providers.lock().unwrap_or_else(|e| e.into_inner());
        providers.contains_key(scheme)
    }

    /// Resolve the content of `uri` through the provider for its scheme
    pub fn provide(&self, uri: &Url) -> Result<String, ProviderError> {
        let provider = {
            let providers = self.providers.lock().unwrap_or_else(|e| e.into_inner());
            providers
                .get(uri.scheme())
                .map(|registered| Arc::clone(&registered.provider))
        };

        match provider {
            Some(provider) => provider.provide_text_document_content(uri),
            None => Err(ProviderError::NoProvider(uri.to_string())),
        }
    }
}

/// Keeps a provider registered; released on drop
#[must_use = "dropping the registration immediately unregisters the provider"]
pub struct ProviderRegistration {
    scheme: String,
    id: u64,
    providers: Weak<ProviderTable>,
}

impl ProviderRegistration {
    #[allow(dead_code)]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Unregister now rather than at end of scope
    pub fn dispose(self) {}
}

impl Drop for ProviderRegistration {
    fn drop(&mut self) {
        let Some(providers) = self.providers.upgrade() else {
            return;
        };

        let mut providers = providers.lock().unwrap_or_else(|e| e.into_inner());
        // Only remove our own entry
        if providers.get(&self.scheme).map(|p| p.id) == Some(self.id) {
            providers.remove(&self.scheme);
        }
    }
}

/// Serves the two sides of one live diff preview
pub struct LiveDiffContentProvider {
    preview: LiveDiffPreview,
    placeholder: String,
}

impl LiveDiffContentProvider {
    pub fn new(preview: LiveDiffPreview, placeholder: &str) -> Self {
        Self {
            preview,
            placeholder: placeholder.to_string(),
        }
    }
}

impl TextDocumentContentProvider for LiveDiffContentProvider {
    fn provide_text_document_content(&self, uri: &Url) -> Result<String, ProviderError> {
        match uri.fragment().and_then(DiffSide::from_fragment) {
            Some(side) => self
                .preview
                .to_yaml(side)
                .map_err(|e| ProviderError::Serialize(e.to_string())),
            None => Ok(self.placeholder.clone()),
        }
    }
}
