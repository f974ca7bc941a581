use lenet_rs::backend::registry::{create_backend, registered_backends};
use lenet_rs::{ImageDataFormat, LeNet};
use lenet_rs_backend_ref::{register_ref_backend, LoadedGraph};

#[test]
fn ref_backend_is_registered_by_name() {
    register_ref_backend();

    assert!(registered_backends().contains(&"ref".to_string()));

    let backend = create_backend("ref").expect("ref backend resolves");
    assert_eq!(backend.backend_name(), "ref");
    assert_eq!(backend.image_data_format(), ImageDataFormat::ChannelsLast);
}

#[test]
fn erased_load_returns_downcastable_handle() {
    register_ref_backend();

    let backend = create_backend("ref").expect("ref backend resolves");
    let spec = LeNet::build_with_format(ImageDataFormat::ChannelsLast, 28, 28, 1, 10);

    let handle = backend.load_sequential(&spec).expect("spec loads");
    let graph = handle
        .downcast::<LoadedGraph>()
        .expect("handle downcasts to the ref backend's graph");
    assert_eq!(graph.output_shape(), [10]);
    assert_eq!(graph.spec(), &spec);
}

#[test]
fn cloned_backend_preserves_identity() {
    register_ref_backend();

    let backend = create_backend("ref").expect("ref backend resolves");
    let clone = backend.clone_backend();
    assert_eq!(clone.backend_name(), "ref");
    assert_eq!(clone.image_data_format(), backend.image_data_format());
}

#[test]
fn unknown_backend_resolves_to_none() {
    assert!(create_backend("cuda").is_none());
}
