//! Random and fixed image transforms applied to normalized NHWC images.

pub mod affine;
pub mod config;
pub mod flow;
pub mod generator;

pub use affine::apply_affine_transform;
pub use config::AugmentationConfig;
pub use flow::Flow;
pub use generator::{ImageDataGenerator, TransformParams};
