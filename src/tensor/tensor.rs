use crate::dataloader::error::DatasetError;

use super::tensor_desc::TensorDesc;

/// Dense row-major `f32` tensor. Axis 0 is always the sample axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    desc: TensorDesc,
    data: Vec<f32>,
}

impl Tensor {
    pub fn new(desc: TensorDesc, data: Vec<f32>) -> Result<Self, DatasetError> {
        if desc.num_elements() != data.len() {
            return Err(DatasetError::ShapeMismatch {
                expected: desc.num_elements(),
                found: data.len(),
            });
        }
        Ok(Self { desc, data })
    }

    pub fn zeros(desc: TensorDesc) -> Self {
        let size = desc.num_elements();
        Self {
            desc,
            data: vec![0.0; size],
        }
    }

    pub fn desc(&self) -> &TensorDesc {
        &self.desc
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.desc.batch()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample(&self, index: usize) -> &[f32] {
        let n = self.desc.sample_len();
        &self.data[index * n..(index + 1) * n]
    }

    pub fn sample_mut(&mut self, index: usize) -> &mut [f32] {
        let n = self.desc.sample_len();
        &mut self.data[index * n..(index + 1) * n]
    }

    pub fn samples(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(self.desc.sample_len().max(1))
    }

    /// Copies the given samples, in the given order, into a new tensor.
    pub fn gather(&self, indices: &[usize]) -> Tensor {
        let mut data = Vec::with_capacity(indices.len() * self.desc.sample_len());
        for &idx in indices {
            data.extend_from_slice(self.sample(idx));
        }
        Tensor {
            desc: self.desc.with_batch(indices.len()),
            data,
        }
    }
}
