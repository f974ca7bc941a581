pub mod graph;

pub use graph::{LoadedGraph, RefSpecBackend};

/// Register the reference backend with the global backend registry.
///
/// This function is called automatically via a static initializer, but can
/// also be called manually to ensure the backend is registered.
pub fn register_ref_backend() {
    lenet_rs::backend::registry::register_spec_backend("ref", RefSpecBackend::new);
}

// Auto-register on library load
#[cfg(not(target_family = "wasm"))]
#[used]
#[link_section = ".init_array"]
static REGISTER_REF_BACKEND: extern "C" fn() = {
    extern "C" fn register() {
        register_ref_backend();
    }
    register
};
