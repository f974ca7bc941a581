use lenet_rs::backend::spec::{
    Activation, Conv2dSpec, DenseSpec, LayerSpec, MaxPool2dSpec, Padding,
};
use lenet_rs::model::lenet::KIND;
use lenet_rs::model::registry::{model_factory, model_registry};
use lenet_rs::{ImageDataFormat, LeNet, LeNetConfig, ModelConfig};
use lenet_rs_backend_ref::RefSpecBackend;

fn conv(filters: usize, input_shape: Option<[usize; 3]>) -> LayerSpec {
    LayerSpec::Conv2d(Conv2dSpec {
        filters,
        kernel: [5, 5],
        padding: Padding::Same,
        input_shape,
    })
}

fn pool() -> LayerSpec {
    LayerSpec::MaxPool2d(MaxPool2dSpec {
        window: [2, 2],
        stride: [2, 2],
    })
}

fn dense(units: usize) -> LayerSpec {
    LayerSpec::Dense(DenseSpec { units })
}

#[test]
fn lenet_layer_sequence_channels_last() {
    let spec = LeNet::build_with_format(ImageDataFormat::ChannelsLast, 28, 28, 1, 10);

    let expected = vec![
        conv(20, Some([28, 28, 1])),
        LayerSpec::Activation(Activation::Relu),
        pool(),
        conv(50, None),
        LayerSpec::Activation(Activation::Relu),
        pool(),
        LayerSpec::Flatten,
        dense(500),
        LayerSpec::Activation(Activation::Relu),
        dense(10),
        LayerSpec::Activation(Activation::Softmax),
    ];

    assert_eq!(spec.layers(), expected.as_slice());
}

#[test]
fn lenet_is_structurally_idempotent() {
    let first = LeNet::build_with_format(ImageDataFormat::ChannelsLast, 32, 32, 3, 100);
    let second = LeNet::build_with_format(ImageDataFormat::ChannelsLast, 32, 32, 3, 100);
    assert_eq!(first, second);
}

#[test]
fn channels_first_orders_depth_before_spatial_dims() {
    let spec = LeNet::build_with_format(ImageDataFormat::ChannelsFirst, 32, 32, 3, 100);

    let LayerSpec::Conv2d(first) = &spec.layers()[0] else {
        panic!("first layer is not a convolution");
    };
    assert_eq!(first.input_shape, Some([3, 32, 32]));

    let LayerSpec::Dense(last_dense) = &spec.layers()[9] else {
        panic!("tenth layer is not dense");
    };
    assert_eq!(last_dense.units, 100);
}

#[test]
fn conv_and_pool_hyperparameters_are_fixed() {
    let spec = LeNet::build_with_format(ImageDataFormat::ChannelsLast, 28, 28, 1, 10);

    let convs: Vec<&Conv2dSpec> = spec
        .iter()
        .filter_map(|layer| match layer {
            LayerSpec::Conv2d(conv) => Some(conv),
            _ => None,
        })
        .collect();
    assert_eq!(convs.len(), 2);
    assert_eq!(convs[0].filters, 20);
    assert_eq!(convs[1].filters, 50);
    for conv in convs {
        assert_eq!(conv.kernel, [5, 5]);
        assert_eq!(conv.padding, Padding::Same);
    }

    let pools: Vec<&MaxPool2dSpec> = spec
        .iter()
        .filter_map(|layer| match layer {
            LayerSpec::MaxPool2d(pool) => Some(pool),
            _ => None,
        })
        .collect();
    assert_eq!(pools.len(), 2);
    for pool in pools {
        assert_eq!(pool.window, [2, 2]);
        assert_eq!(pool.stride, [2, 2]);
    }
}

#[test]
fn final_dense_width_tracks_classes() {
    for classes in [1, 2, 10, 1000] {
        let spec = LeNet::build_with_format(ImageDataFormat::ChannelsLast, 28, 28, 1, classes);
        assert_eq!(spec.len(), 11);

        let LayerSpec::Dense(last_dense) = &spec.layers()[9] else {
            panic!("tenth layer is not dense");
        };
        assert_eq!(last_dense.units, classes);
        assert_eq!(
            spec.layers()[10],
            LayerSpec::Activation(Activation::Softmax)
        );
    }
}

#[test]
fn backend_convention_drives_input_shape() {
    let channels_first = RefSpecBackend::with_format(ImageDataFormat::ChannelsFirst);
    let spec = LeNet::build_for_backend(&channels_first, 28, 28, 1, 10);
    let LayerSpec::Conv2d(first) = &spec.layers()[0] else {
        panic!("first layer is not a convolution");
    };
    assert_eq!(first.input_shape, Some([1, 28, 28]));

    let channels_last = RefSpecBackend::with_format(ImageDataFormat::ChannelsLast);
    let spec = LeNet::build_for_backend(&channels_last, 28, 28, 1, 10);
    let LayerSpec::Conv2d(first) = &spec.layers()[0] else {
        panic!("first layer is not a convolution");
    };
    assert_eq!(first.input_shape, Some([28, 28, 1]));
}

#[test]
fn default_build_uses_process_wide_convention() {
    // LENETRS_IMAGE_DATA_FORMAT is unset in the test environment, so the
    // process-wide convention resolves to channels-last.
    let spec = LeNet::build(28, 28, 1, 10);
    let explicit = LeNet::build_with_format(ImageDataFormat::ChannelsLast, 28, 28, 1, 10);
    assert_eq!(spec, explicit);
}

#[test]
fn model_config_dispatches_through_registry() {
    let config: ModelConfig = serde_json::from_str(
        r#"{"kind": "lenet", "config": {"width": 28, "height": 28, "depth": 1, "classes": 10}}"#,
    )
    .expect("tagged config parses");

    let build = model_factory(KIND).expect("lenet factory is registered");
    let spec = build(&config).expect("config builds");
    assert_eq!(spec, LeNet::build(28, 28, 1, 10));

    assert!(model_factory("resnet34").is_none());
    assert!(model_registry().contains_key(KIND));
}

#[test]
fn null_config_payload_falls_back_to_defaults() {
    let config: ModelConfig = serde_json::from_str(r#"{"kind": "lenet"}"#).expect("parses");
    let spec = LeNet::build_from_model_config(&config).expect("builds");

    let defaults = LeNetConfig::default();
    assert_eq!(
        spec,
        LeNet::build(defaults.width, defaults.height, defaults.depth, defaults.classes)
    );
}

#[test]
fn legacy_model_config_is_accepted() {
    let config: ModelConfig = serde_json::from_str(
        r#"{"width": 32, "height": 32, "depth": 3, "classes": 100}"#,
    )
    .expect("legacy config parses");
    assert_eq!(config.kind, KIND);

    let spec = LeNet::build_from_model_config(&config).expect("legacy config builds");
    assert_eq!(spec, LeNet::build(32, 32, 3, 100));
}

#[test]
fn mismatched_kind_is_rejected() {
    let config = ModelConfig::new("resnet34", serde_json::Value::Null);
    assert!(LeNet::build_from_model_config(&config).is_err());
}
