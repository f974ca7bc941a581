//! Reference backend: loads sequential specs and infers their shape chain.
//!
//! This backend compiles nothing and executes nothing. It walks a spec once,
//! resolves the shape every layer produces, and rejects graphs no engine
//! could run. It is the structural oracle the builder crate tests against.

use lenet_rs::backend::spec::{
    BackendError, BackendResult, Conv2dSpec, LayerSpec, MaxPool2dSpec, Padding, SequentialSpec,
    SpecBackend, SpecErrorCode,
};
use lenet_rs::layout::ImageDataFormat;

#[derive(Debug, Clone)]
pub struct RefSpecBackend {
    format: ImageDataFormat,
}

impl RefSpecBackend {
    pub fn new() -> Self {
        Self {
            format: ImageDataFormat::ChannelsLast,
        }
    }

    pub fn with_format(format: ImageDataFormat) -> Self {
        Self { format }
    }

    fn required_input<'a>(
        &self,
        index: usize,
        input: Option<&'a [usize]>,
    ) -> BackendResult<&'a [usize]> {
        input.ok_or_else(|| {
            BackendError::spec(
                SpecErrorCode::MissingInputShape,
                Some(format!("layer {index} has no input to infer from")),
            )
        })
    }

    /// Splits a rank-3 shape into `(height, width, channels)` according to
    /// this backend's convention.
    fn spatial_dims(
        &self,
        index: usize,
        what: &str,
        input: &[usize],
    ) -> BackendResult<(usize, usize, usize)> {
        if input.len() != 3 {
            return Err(BackendError::spec(
                SpecErrorCode::RankMismatch,
                Some(format!(
                    "{what} at layer {index} expects rank-3 input, got rank {}",
                    input.len()
                )),
            ));
        }
        match self.format {
            ImageDataFormat::ChannelsFirst => Ok((input[1], input[2], input[0])),
            ImageDataFormat::ChannelsLast => Ok((input[0], input[1], input[2])),
        }
    }

    fn assemble(&self, height: usize, width: usize, channels: usize) -> Vec<usize> {
        match self.format {
            ImageDataFormat::ChannelsFirst => vec![channels, height, width],
            ImageDataFormat::ChannelsLast => vec![height, width, channels],
        }
    }

    fn conv_output(
        &self,
        index: usize,
        input: &[usize],
        conv: &Conv2dSpec,
    ) -> BackendResult<Vec<usize>> {
        let (height, width, _channels) = self.spatial_dims(index, "conv2d", input)?;
        let [kernel_h, kernel_w] = conv.kernel;

        let (out_h, out_w) = match conv.padding {
            Padding::Same => (height, width),
            Padding::Valid => {
                if height < kernel_h || width < kernel_w {
                    return Err(BackendError::spec(
                        SpecErrorCode::NegativeDimension,
                        Some(format!(
                            "conv2d kernel {kernel_h}x{kernel_w} exceeds input \
                             {height}x{width} at layer {index}"
                        )),
                    ));
                }
                (height - kernel_h + 1, width - kernel_w + 1)
            }
        };

        Ok(self.assemble(out_h, out_w, conv.filters))
    }

    fn pool_output(
        &self,
        index: usize,
        input: &[usize],
        pool: &MaxPool2dSpec,
    ) -> BackendResult<Vec<usize>> {
        let (height, width, channels) = self.spatial_dims(index, "max_pool2d", input)?;
        let [window_h, window_w] = pool.window;
        let [stride_h, stride_w] = pool.stride;

        if stride_h == 0 || stride_w == 0 {
            return Err(BackendError::spec(
                SpecErrorCode::InvalidAttributeValue,
                Some(format!("max_pool2d stride must be non-zero at layer {index}")),
            ));
        }
        if height < window_h || width < window_w {
            return Err(BackendError::spec(
                SpecErrorCode::NegativeDimension,
                Some(format!(
                    "max_pool2d window {window_h}x{window_w} exceeds input \
                     {height}x{width} at layer {index}"
                )),
            ));
        }

        Ok(self.assemble(
            (height - window_h) / stride_h + 1,
            (width - window_w) / stride_w + 1,
            channels,
        ))
    }

    fn infer_layer(
        &self,
        index: usize,
        layer: &LayerSpec,
        input: Option<&[usize]>,
    ) -> BackendResult<Vec<usize>> {
        match layer {
            LayerSpec::Conv2d(conv) => {
                // The leading layer resolves its shape from the declared
                // input contract; every later layer from the running chain.
                let input: Vec<usize> = match input {
                    Some(shape) => shape.to_vec(),
                    None => match conv.input_shape {
                        Some(dims) => dims.to_vec(),
                        None => {
                            return Err(BackendError::spec(
                                SpecErrorCode::MissingInputShape,
                                Some(format!("conv2d at layer {index} declares no input shape")),
                            ))
                        }
                    },
                };
                self.conv_output(index, &input, conv)
            }
            LayerSpec::MaxPool2d(pool) => {
                let input = self.required_input(index, input)?;
                self.pool_output(index, input, pool)
            }
            LayerSpec::Activation(_) => Ok(self.required_input(index, input)?.to_vec()),
            LayerSpec::Flatten => {
                let input = self.required_input(index, input)?;
                Ok(vec![input.iter().product()])
            }
            LayerSpec::Dense(dense) => {
                let input = self.required_input(index, input)?;
                if input.len() != 1 {
                    return Err(BackendError::spec(
                        SpecErrorCode::RankMismatch,
                        Some(format!(
                            "dense at layer {index} expects rank-1 input, got rank {}",
                            input.len()
                        )),
                    ));
                }
                Ok(vec![dense.units])
            }
        }
    }
}

impl Default for RefSpecBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// A spec accepted by the reference backend, with the shape every layer
/// produces resolved in layer order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGraph {
    spec: SequentialSpec,
    shapes: Vec<Vec<usize>>,
}

impl LoadedGraph {
    pub fn spec(&self) -> &SequentialSpec {
        &self.spec
    }

    pub fn shapes(&self) -> &[Vec<usize>] {
        &self.shapes
    }

    pub fn output_shape(&self) -> &[usize] {
        self.shapes.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl SpecBackend for RefSpecBackend {
    type ModelHandle = LoadedGraph;

    fn backend_name(&self) -> &str {
        "ref"
    }

    fn image_data_format(&self) -> ImageDataFormat {
        self.format
    }

    fn load_sequential(&self, spec: &SequentialSpec) -> BackendResult<LoadedGraph> {
        if spec.is_empty() {
            return Err(BackendError::spec(SpecErrorCode::EmptySequence, None));
        }

        let mut shapes: Vec<Vec<usize>> = Vec::with_capacity(spec.len());
        let mut current: Option<Vec<usize>> = None;

        for (index, layer) in spec.iter().enumerate() {
            let next = self.infer_layer(index, layer, current.as_deref())?;
            shapes.push(next.clone());
            current = Some(next);
        }

        Ok(LoadedGraph {
            spec: spec.clone(),
            shapes,
        })
    }
}
