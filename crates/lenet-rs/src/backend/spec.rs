//! Portable sequential-spec interface consumed by execution backends.
//!
//! A sequential spec is an ordered list of layer descriptors. It carries no
//! parameters and performs no computation; backends compile it into whatever
//! executable form they need.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::ImageDataFormat;

/// Frozen sequential-spec version enforced by this interface.
pub const SPEC_VERSION: &str = "seqspec.v0.1";

fn default_spec_version() -> String {
    SPEC_VERSION.to_string()
}

/// Elementwise nonlinearities a sequential graph may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Softmax,
}

/// Spatial padding policy for convolution windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    Same,
    Valid,
}

/// Descriptor for a 2-D convolution layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Conv2dSpec {
    pub filters: usize,
    pub kernel: [usize; 2],
    pub padding: Padding,
    /// Input contract for the first layer of a graph. Omitted everywhere
    /// else; backends infer later shapes transitively.
    #[serde(default)]
    pub input_shape: Option<[usize; 3]>,
}

/// Descriptor for a 2-D max-pooling layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaxPool2dSpec {
    pub window: [usize; 2],
    pub stride: [usize; 2],
}

/// Descriptor for a fully-connected layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DenseSpec {
    pub units: usize,
}

/// Declarative form of the layer kinds a sequential graph may contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerSpec {
    Conv2d(Conv2dSpec),
    Activation(Activation),
    MaxPool2d(MaxPool2dSpec),
    Flatten,
    Dense(DenseSpec),
}

/// Ordered, immutable sequence of layer descriptors.
///
/// Order determines data-flow order when the spec is later compiled and
/// executed by a backend. A spec is constructed fresh by each builder call
/// and owned by the caller thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialSpec {
    #[serde(default = "default_spec_version")]
    spec_version: String,
    layers: Vec<LayerSpec>,
}

impl SequentialSpec {
    pub fn from_layers(layers: Vec<LayerSpec>) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            layers,
        }
    }

    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayerSpec> {
        self.layers.iter()
    }

    pub fn to_json(&self) -> Result<String, SpecSerdeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SpecSerdeError> {
        let spec: SequentialSpec = serde_json::from_str(json)?;
        if spec.spec_version != SPEC_VERSION {
            return Err(SpecSerdeError::SpecVersionMismatch {
                found: spec.spec_version,
                expected: SPEC_VERSION,
            });
        }
        Ok(spec)
    }
}

#[derive(Debug, Error)]
pub enum SpecSerdeError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("spec version '{found}' does not match expected '{expected}'")]
    SpecVersionMismatch {
        found: String,
        expected: &'static str,
    },
}

/// Structural defects a backend may report when loading a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecErrorCode {
    EmptySequence,
    MissingInputShape,
    RankMismatch,
    NegativeDimension,
    InvalidAttributeValue,
}

impl SpecErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecErrorCode::EmptySequence => "SpecError: sequential spec has no layers",
            SpecErrorCode::MissingInputShape => {
                "SpecError: first layer does not declare an input shape"
            }
            SpecErrorCode::RankMismatch => "SpecError: layer input rank mismatch",
            SpecErrorCode::NegativeDimension => "SpecError: negative dimension",
            SpecErrorCode::InvalidAttributeValue => "SpecError: invalid attribute value",
        }
    }
}

/// Validation failure captured by a backend before execution.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecError {
    pub code: SpecErrorCode,
    pub detail: Option<String>,
}

impl SpecError {
    pub fn new(code: SpecErrorCode, detail: impl Into<Option<String>>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({detail})", self.code.as_str()),
            None => write!(f, "{}", self.code.as_str()),
        }
    }
}

impl std::error::Error for SpecError {}

/// Backend error surfaced to higher layers.
#[derive(Debug)]
pub enum BackendError {
    SpecViolation(SpecError),
    Execution { message: String },
}

impl BackendError {
    pub fn spec(code: SpecErrorCode, detail: impl Into<Option<String>>) -> Self {
        BackendError::SpecViolation(SpecError::new(code, detail))
    }

    pub fn execution(message: impl Into<String>) -> Self {
        BackendError::Execution {
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::SpecViolation(err) => write!(f, "{err}"),
            BackendError::Execution { message } => {
                write!(f, "backend execution failure: {message}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Convenience alias for results returned by backend routines.
pub type BackendResult<T> = Result<T, BackendError>;

/// Capability interface implemented by execution engines that consume
/// sequential specs.
pub trait SpecBackend: Send + Sync {
    /// Engine-side handle for a model compiled from a loaded spec.
    type ModelHandle: 'static;

    /// Returns a human-readable backend identifier (e.g., `"ref"`, `"cuda"`).
    fn backend_name(&self) -> &str;

    /// Axis-ordering convention this backend expects for image tensors.
    fn image_data_format(&self) -> ImageDataFormat;

    /// Accepts a finished spec, unmodified, for compilation and later
    /// execution. Structural failures surface here, never at build time.
    fn load_sequential(&self, spec: &SequentialSpec) -> BackendResult<Self::ModelHandle>;
}
