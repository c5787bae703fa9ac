use std::sync::{Arc, Mutex};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

use crate::augment::affine::apply_affine_transform;
use crate::augment::flow::Flow;
use crate::augment::generator::ImageDataGenerator;
use crate::tensor::Tensor;

use super::batch::{CapsNetBatch, CapsNetIter};
use super::config::DatasetConfig;
use super::datasource::CorpusSource;
use super::error::{DatasetError, Result};
use super::split::{DatasetSplit, LabeledSet, Split};

/// Lazily loads, splits and caches a corpus, and hands out augmented views of it.
///
/// The split is computed on the first accessor call and shared by every
/// later call for as long as the provider lives. The cache lock is held while
/// loading, so concurrent first calls still load once. A failed load caches
/// nothing and the next call tries again.
pub struct DatasetProvider<S: CorpusSource> {
    source: S,
    config: DatasetConfig,
    generator: ImageDataGenerator,
    cache: Mutex<Option<Arc<Split>>>,
    rng: Arc<Mutex<StdRng>>,
    pool: Arc<rayon::ThreadPool>,
}

impl<S: CorpusSource> DatasetProvider<S> {
    pub fn new(source: S, config: Option<DatasetConfig>) -> Result<Self> {
        let mut config = config.unwrap_or_default().build()?;
        let seed = *config.seed.get_or_insert_with(|| rand::thread_rng().gen());
        debug!("dataset provider seed: {}", seed);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;

        Ok(Self {
            source,
            generator: ImageDataGenerator::new(config.augmentation),
            config,
            cache: Mutex::new(None),
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
            pool: Arc::new(pool),
        })
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Seed every generator's RNG stream is derived from.
    pub fn seed(&self) -> u64 {
        self.config.seed.unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.lock().map(|cache| cache.is_some()).unwrap_or(false)
    }

    pub fn load_data(&self) -> Result<Arc<Split>> {
        let mut cache = self.cache.lock().map_err(|_| DatasetError::CacheLockError)?;
        if let Some(split) = cache.as_ref() {
            return Ok(Arc::clone(split));
        }

        let raw = self.source.load()?;
        let split = Arc::new(Split::from_raw(raw, &self.config)?);
        info!(
            "loaded corpus: {} train, {} validation, {} test",
            split.train.len(),
            split.validation.len(),
            split.test.len()
        );

        *cache = Some(Arc::clone(&split));
        Ok(split)
    }

    /// Un-augmented view of one split.
    pub fn split(&self, split: DatasetSplit) -> Result<LabeledSet> {
        Ok(self.load_data()?.get(split).clone())
    }

    fn next_rng(&self) -> Result<StdRng> {
        let mut rng = self.rng.lock().map_err(|_| DatasetError::RngLockError)?;
        Ok(StdRng::seed_from_u64(rng.gen()))
    }

    fn flow(&self, set: LabeledSet, batch_size: usize) -> Result<Flow> {
        self.generator
            .flow(set, batch_size, true, self.next_rng()?, Arc::clone(&self.pool))
    }

    /// Endless augmented batches of `batch_size` training samples.
    pub fn train_generator_for_cnn(&self, batch_size: usize) -> Result<Flow> {
        if batch_size == 0 {
            return Err(DatasetError::InvalidBatchSize);
        }
        let split = self.load_data()?;
        debug!("train generator, batch size {}", batch_size);
        self.flow(split.train.clone(), batch_size)
    }

    /// The CNN generator reshaped into `([images, labels], [labels, images])`.
    pub fn train_generator_for_capsnet(&self, batch_size: usize) -> Result<CapsNetIter<Flow>> {
        Ok(CapsNetIter::new(self.train_generator_for_cnn(batch_size)?))
    }

    /// The validation split with one random augmentation per image.
    ///
    /// Exactly `validation_size` single-image draws are taken from a shuffled
    /// flow, so the result always has the validation split's length.
    pub fn validation_data_for_cnn(&self) -> Result<LabeledSet> {
        let split = self.load_data()?;
        let validation = &split.validation;
        let count = self.config.validation_size;

        let mut images = Tensor::zeros(validation.images.desc().with_batch(count));
        let mut labels = Tensor::zeros(validation.labels.desc().with_batch(count));
        for (i, batch) in self.flow(validation.clone(), 1)?.take(count).enumerate() {
            images.sample_mut(i).copy_from_slice(batch.images.sample(0));
            labels.sample_mut(i).copy_from_slice(batch.labels.sample(0));
        }

        Ok(LabeledSet::new(images, labels))
    }

    pub fn validation_data_for_capsnet(&self) -> Result<CapsNetBatch> {
        Ok(CapsNetBatch::from(self.validation_data_for_cnn()?))
    }

    /// The test split with every image rotated by exactly `rotation` degrees.
    ///
    /// Deterministic, and not cumulative: each call starts from the cached
    /// test images. A rotation of 0 returns the test split itself.
    pub fn test_data(&self, rotation: f32) -> Result<LabeledSet> {
        let split = self.load_data()?;
        let test = &split.test;
        if rotation == 0.0 {
            return Ok(test.clone());
        }

        let dims = test.dims();
        let source = &test.images;
        let mut images = Tensor::zeros(source.desc().clone());
        self.pool.install(|| {
            images
                .data_mut()
                .par_chunks_exact_mut(dims.num_elements())
                .enumerate()
                .for_each(|(i, out)| {
                    apply_affine_transform(source.sample(i), out, dims, rotation, 0.0, 0.0)
                });
        });

        Ok(LabeledSet::from_shared(Arc::new(images), Arc::clone(&test.labels)))
    }
}
