use std::sync::Arc;

use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

use crate::dataloader::batch::Batch;
use crate::dataloader::split::LabeledSet;
use crate::tensor::{ImageDims, Tensor};

use super::generator::{ImageDataGenerator, TransformParams};

/// Infinite iterator of augmented batches over a [`LabeledSet`].
///
/// Samples are visited in epochs. With `shuffle` the visiting order is
/// reshuffled at the start of every epoch. A batch that crosses an epoch
/// boundary is topped up from the next epoch, so every batch is full.
pub struct Flow {
    generator: ImageDataGenerator,
    set: LabeledSet,
    dims: ImageDims,
    batch_size: usize,
    shuffle: bool,
    rng: StdRng,
    order: Vec<usize>,
    cursor: usize,
    epoch: usize,
    batch_number: usize,
    pool: Arc<rayon::ThreadPool>,
}

impl Flow {
    pub(crate) fn new(
        generator: ImageDataGenerator,
        set: LabeledSet,
        batch_size: usize,
        shuffle: bool,
        rng: StdRng,
        pool: Arc<rayon::ThreadPool>,
    ) -> Self {
        let dims = set.dims();
        let order = (0..set.len()).collect::<Vec<_>>();
        Self {
            generator,
            set,
            dims,
            batch_size,
            shuffle,
            rng,
            cursor: order.len(),
            order,
            epoch: 0,
            batch_number: 0,
            pool,
        }
    }

    fn start_epoch(&mut self) {
        if self.shuffle {
            self.order.shuffle(&mut self.rng);
        }
        self.cursor = 0;
        self.epoch += 1;
        trace!("flow epoch {} over {} samples", self.epoch, self.order.len());
    }

    fn next_indices(&mut self) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.batch_size);
        while indices.len() < self.batch_size {
            if self.cursor == self.order.len() {
                self.start_epoch();
            }
            let take = (self.batch_size - indices.len()).min(self.order.len() - self.cursor);
            indices.extend_from_slice(&self.order[self.cursor..self.cursor + take]);
            self.cursor += take;
        }
        indices
    }
}

impl Iterator for Flow {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.next_indices();

        // Draw sequentially so the output only depends on the seed, then augment in parallel
        let params: Vec<TransformParams> = indices
            .iter()
            .map(|_| self.generator.random_transform(self.dims, &mut self.rng))
            .collect();

        let source = &self.set.images;
        let mut images = Tensor::zeros(source.desc().with_batch(indices.len()));
        let sample_len = self.dims.num_elements();
        let generator = &self.generator;
        let dims = self.dims;
        self.pool.install(|| {
            images
                .data_mut()
                .par_chunks_exact_mut(sample_len)
                .zip(indices.par_iter().zip(params.par_iter()))
                .for_each(|(out, (&idx, p))| {
                    generator.apply_transform(source.sample(idx), out, dims, p)
                });
        });

        let labels = self.set.labels.gather(&indices);
        trace!("flow batch {} of {} samples", self.batch_number, indices.len());
        let batch = Batch::new(images, labels, self.batch_number);
        self.batch_number += 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
