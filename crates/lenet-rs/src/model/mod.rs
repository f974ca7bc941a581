pub mod config;
pub mod lenet;
pub mod registry;

pub use config::{LeNetConfig, ModelConfig};
pub use lenet::LeNet;
