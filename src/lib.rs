//! CIFAR-10 dataset preparation.
//!
//! [`DatasetProvider`] loads the corpus once and splits it into 40000
//! training, 10000 validation and 10000 test images. It then serves:
//!
//! * endless randomly augmented training batches, in CNN form
//!   (`images, labels`) or capsule network form
//!   (`[images, labels], [labels, images]`);
//! * a randomly augmented copy of the validation split;
//! * the test split under a fixed rotation.
//!
//! ```no_run
//! use cifar_prep::{Cifar10BinarySource, DatasetProvider};
//!
//! # fn main() -> Result<(), cifar_prep::DatasetError> {
//! let provider = DatasetProvider::new(Cifar10BinarySource::new("cifar-10-batches-bin"), None)?;
//! let batch = provider.train_generator_for_cnn(64)?.next().unwrap();
//! assert_eq!(batch.images.desc().to_dims(), vec![64, 32, 32, 3]);
//! # Ok(())
//! # }
//! ```

pub mod augment;
pub mod dataloader;
pub mod tensor;

pub use augment::{AugmentationConfig, Flow, ImageDataGenerator, TransformParams};
pub use dataloader::batch::{Batch, CapsNetBatch, CapsNetIter};
pub use dataloader::cifar10::{CLASSES, CLASS_NAMES, IMAGE_SHAPE, TEST_SIZE, TRAIN_SIZE, VALIDATION_SIZE};
pub use dataloader::config::DatasetConfig;
pub use dataloader::dataloader::DatasetProvider;
pub use dataloader::datasource::{CorpusSource, RawCorpus};
pub use dataloader::error::{DatasetError, Result};
pub use dataloader::for_cifar10bin::Cifar10BinarySource;
pub use dataloader::for_imagesdir::ImageDirectorySource;
pub use dataloader::info::log_dataset_info;
pub use dataloader::par_iter::{Prefetch, PrefetchIterator};
pub use dataloader::split::{DatasetSplit, LabeledSet, Split};
pub use tensor::{ImageDims, Tensor, TensorDesc};
