use std::sync::Arc;

use crate::tensor::Tensor;

use super::split::LabeledSet;

/// Single input, single output batch for a CNN classifier.
#[derive(Clone, Debug)]
pub struct Batch {
    pub images: Arc<Tensor>,
    pub labels: Arc<Tensor>,
    pub batch_number: usize,
}

impl Batch {
    pub fn new(images: Tensor, labels: Tensor, batch_number: usize) -> Self {
        Self {
            images: Arc::new(images),
            labels: Arc::new(labels),
            batch_number,
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dual input, dual output batch for a capsule network.
///
/// `inputs` is `[images, labels]` and `targets` is `[labels, images]`: the
/// decoder reconstructs the input image. Both positions share one allocation.
#[derive(Clone, Debug)]
pub struct CapsNetBatch {
    pub inputs: [Arc<Tensor>; 2],
    pub targets: [Arc<Tensor>; 2],
}

impl CapsNetBatch {
    pub fn new(images: Arc<Tensor>, labels: Arc<Tensor>) -> Self {
        Self {
            inputs: [Arc::clone(&images), Arc::clone(&labels)],
            targets: [labels, images],
        }
    }

    pub fn len(&self) -> usize {
        self.inputs[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Batch> for CapsNetBatch {
    fn from(batch: Batch) -> Self {
        Self::new(batch.images, batch.labels)
    }
}

impl From<LabeledSet> for CapsNetBatch {
    fn from(set: LabeledSet) -> Self {
        Self::new(set.images, set.labels)
    }
}

/// Reshapes every batch of a CNN generator into capsule network form.
pub struct CapsNetIter<I> {
    inner: I,
}

impl<I: Iterator<Item = Batch>> CapsNetIter<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: Iterator<Item = Batch>> Iterator for CapsNetIter<I> {
    type Item = CapsNetBatch;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(CapsNetBatch::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
