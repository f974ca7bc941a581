//! Runtime backend registry for dynamic backend selection.
//!
//! This module enables registering and selecting backends by name at runtime,
//! avoiding hardcoded backend types throughout the codebase. Backends can be
//! registered from any crate (including external ones) using the global
//! registry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use super::spec::{BackendResult, SequentialSpec, SpecBackend};
use crate::layout::ImageDataFormat;

/// Type-erased model handle that can be downcast to concrete handle types.
pub type BackendHandle = Box<dyn Any + Send + Sync>;

/// Factory function that creates a new backend instance.
pub type BackendConstructor = Box<dyn Fn() -> Box<dyn ErasedSpecBackend> + Send + Sync>;

/// Type-erased backend trait that wraps [`SpecBackend`] without generic
/// parameters, enabling dynamic dispatch and runtime backend selection.
pub trait ErasedSpecBackend: Send + Sync {
    /// Returns a human-readable backend identifier (e.g., `"ref"`).
    fn backend_name(&self) -> &str;

    /// Axis-ordering convention this backend expects for image tensors.
    fn image_data_format(&self) -> ImageDataFormat;

    /// Loads a sequential spec and returns a type-erased model handle.
    fn load_sequential(&self, spec: &SequentialSpec) -> BackendResult<BackendHandle>;

    /// Clone this backend as a trait object.
    fn clone_backend(&self) -> Box<dyn ErasedSpecBackend>;

    /// Downcast to Any for type recovery when needed.
    fn as_any(&self) -> &dyn Any;
}

/// Wrapper that implements [`ErasedSpecBackend`] for any concrete backend.
struct BackendWrapper<B: SpecBackend> {
    inner: Arc<B>,
}

impl<B> ErasedSpecBackend for BackendWrapper<B>
where
    B: SpecBackend + 'static,
    B::ModelHandle: Send + Sync,
{
    fn backend_name(&self) -> &str {
        self.inner.backend_name()
    }

    fn image_data_format(&self) -> ImageDataFormat {
        self.inner.image_data_format()
    }

    fn load_sequential(&self, spec: &SequentialSpec) -> BackendResult<BackendHandle> {
        let handle = self.inner.load_sequential(spec)?;
        Ok(Box::new(handle))
    }

    fn clone_backend(&self) -> Box<dyn ErasedSpecBackend> {
        Box::new(BackendWrapper {
            inner: Arc::clone(&self.inner),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn registry() -> &'static RwLock<HashMap<String, BackendConstructor>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, BackendConstructor>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers a backend constructor under `name`, replacing any previous
/// registration with the same name.
pub fn register_spec_backend<B, F>(name: &str, constructor: F)
where
    B: SpecBackend + 'static,
    B::ModelHandle: Send + Sync,
    F: Fn() -> B + Send + Sync + 'static,
{
    let erased: BackendConstructor = Box::new(move || {
        Box::new(BackendWrapper {
            inner: Arc::new(constructor()),
        })
    });

    let mut map = registry().write().expect("backend registry poisoned");
    map.insert(name.to_string(), erased);
}

/// Instantiates the backend registered under `name`, if any.
pub fn create_backend(name: &str) -> Option<Box<dyn ErasedSpecBackend>> {
    let map = registry().read().expect("backend registry poisoned");
    map.get(name).map(|constructor| constructor())
}

/// Returns the sorted names of all registered backends.
pub fn registered_backends() -> Vec<String> {
    let map = registry().read().expect("backend registry poisoned");
    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
}
