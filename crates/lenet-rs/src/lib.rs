pub mod backend;
pub mod layout;
pub mod model;

mod env;

pub use backend::spec::{SequentialSpec, SpecBackend};
pub use layout::ImageDataFormat;
pub use model::{LeNet, LeNetConfig, ModelConfig};
