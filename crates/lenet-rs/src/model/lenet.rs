//! LeNet assembled from portable layer descriptors.

use anyhow::{ensure, Result};

use crate::backend::spec::{
    Activation, Conv2dSpec, DenseSpec, LayerSpec, MaxPool2dSpec, Padding, SequentialSpec,
    SpecBackend,
};
use crate::env;
use crate::layout::ImageDataFormat;
use crate::model::config::{LeNetConfig, ModelConfig};

pub const KIND: &str = "lenet";

/// Stateless factory for the LeNet topology.
pub struct LeNet;

impl LeNet {
    /// Builds the spec using the process-wide data-format convention.
    pub fn build(width: usize, height: usize, depth: usize, classes: usize) -> SequentialSpec {
        Self::build_with_format(env::image_data_format(), width, height, depth, classes)
    }

    /// Builds the spec for a live backend, querying its convention.
    pub fn build_for_backend<B: SpecBackend>(
        backend: &B,
        width: usize,
        height: usize,
        depth: usize,
        classes: usize,
    ) -> SequentialSpec {
        Self::build_with_format(backend.image_data_format(), width, height, depth, classes)
    }

    pub fn from_config(config: &LeNetConfig, format: ImageDataFormat) -> SequentialSpec {
        Self::build_with_format(
            format,
            config.width,
            config.height,
            config.depth,
            config.classes,
        )
    }

    /// Builds the spec with an explicit data-format convention.
    ///
    /// Inputs are passed through unvalidated; out-of-range dimensions surface
    /// as errors from the backend that loads the spec.
    pub fn build_with_format(
        format: ImageDataFormat,
        width: usize,
        height: usize,
        depth: usize,
        classes: usize,
    ) -> SequentialSpec {
        const KERNEL: [usize; 2] = [5, 5];
        const POOL_WINDOW: [usize; 2] = [2, 2];
        const POOL_STRIDE: [usize; 2] = [2, 2];

        let input_shape = format.input_dims(width, height, depth);

        let layers = vec![
            // first CONV => RELU => POOL block; only this layer carries the
            // input contract, later shapes are inferred by the backend.
            LayerSpec::Conv2d(Conv2dSpec {
                filters: 20,
                kernel: KERNEL,
                padding: Padding::Same,
                input_shape: Some(input_shape),
            }),
            LayerSpec::Activation(Activation::Relu),
            LayerSpec::MaxPool2d(MaxPool2dSpec {
                window: POOL_WINDOW,
                stride: POOL_STRIDE,
            }),
            // second CONV => RELU => POOL block.
            LayerSpec::Conv2d(Conv2dSpec {
                filters: 50,
                kernel: KERNEL,
                padding: Padding::Same,
                input_shape: None,
            }),
            LayerSpec::Activation(Activation::Relu),
            LayerSpec::MaxPool2d(MaxPool2dSpec {
                window: POOL_WINDOW,
                stride: POOL_STRIDE,
            }),
            // FC => RELU head.
            LayerSpec::Flatten,
            LayerSpec::Dense(DenseSpec { units: 500 }),
            LayerSpec::Activation(Activation::Relu),
            // softmax classifier.
            LayerSpec::Dense(DenseSpec { units: classes }),
            LayerSpec::Activation(Activation::Softmax),
        ];

        SequentialSpec::from_layers(layers)
    }

    /// Builds the spec from a tagged model config, as dispatched by the
    /// model registry.
    pub fn build_from_model_config(config: &ModelConfig) -> Result<SequentialSpec> {
        ensure!(
            config.kind == KIND,
            "model config kind '{}' is not '{KIND}'",
            config.kind
        );

        let lenet = if config.config.is_null() {
            LeNetConfig::default()
        } else {
            serde_json::from_value(config.config.clone())?
        };

        Ok(Self::from_config(&lenet, env::image_data_format()))
    }
}
