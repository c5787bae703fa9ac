pub mod tensor;
pub mod tensor_desc;

pub use tensor::Tensor;
pub use tensor_desc::{ImageDims, TensorDesc};
