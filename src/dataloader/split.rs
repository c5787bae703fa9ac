use std::sync::Arc;

use crate::tensor::{ImageDims, Tensor, TensorDesc};

use super::config::DatasetConfig;
use super::datasource::RawCorpus;
use super::error::{DatasetError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Validation,
    Test,
}

/// Images and their one-hot labels, aligned along axis 0.
#[derive(Clone, Debug)]
pub struct LabeledSet {
    pub images: Arc<Tensor>,
    pub labels: Arc<Tensor>,
    dims: ImageDims,
}

impl LabeledSet {
    pub fn new(images: Tensor, labels: Tensor) -> Self {
        Self::from_shared(Arc::new(images), Arc::new(labels))
    }

    pub fn from_shared(images: Arc<Tensor>, labels: Arc<Tensor>) -> Self {
        debug_assert_eq!(images.len(), labels.len());
        let dims = images
            .desc()
            .image_dims()
            .unwrap_or_else(|| ImageDims::new(1, 1, images.desc().sample_len()));
        Self { images, labels, dims }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dims(&self) -> ImageDims {
        self.dims
    }
}

/// The three contiguous, order-preserving slices of the corpus.
#[derive(Debug)]
pub struct Split {
    pub train: LabeledSet,
    pub validation: LabeledSet,
    pub test: LabeledSet,
}

impl Split {
    /// Normalizes pixels to [0, 1], one-hot encodes labels and slices the raw
    /// training part into train and validation, keeping corpus order.
    pub fn from_raw(raw: RawCorpus, config: &DatasetConfig) -> Result<Self> {
        let train_count = raw.train_labels.len();
        let expected_train = config.train_size + config.validation_size;
        if train_count != expected_train {
            return Err(DatasetError::CorpusSizeMismatch {
                part: "train",
                expected: expected_train,
                found: train_count,
            });
        }
        if raw.test_labels.len() != config.test_size {
            return Err(DatasetError::CorpusSizeMismatch {
                part: "test",
                expected: config.test_size,
                found: raw.test_labels.len(),
            });
        }

        let sample_len = raw.dims.num_elements();
        let expected_bytes = train_count * sample_len;
        if raw.train_images.len() != expected_bytes {
            return Err(DatasetError::ShapeMismatch {
                expected: expected_bytes,
                found: raw.train_images.len(),
            });
        }

        // Normalize each slice straight from the raw bytes, no full-corpus f32 copy
        let (head, tail) = raw.train_images.split_at(config.train_size * sample_len);
        let (head_labels, tail_labels) = raw.train_labels.split_at(config.train_size);

        Ok(Self {
            train: LabeledSet::new(
                normalize(head, raw.dims, config.train_size)?,
                one_hot(head_labels, config.classes)?,
            ),
            validation: LabeledSet::new(
                normalize(tail, raw.dims, config.validation_size)?,
                one_hot(tail_labels, config.classes)?,
            ),
            test: LabeledSet::new(
                normalize(&raw.test_images, raw.dims, raw.test_labels.len())?,
                one_hot(&raw.test_labels, config.classes)?,
            ),
        })
    }

    pub fn get(&self, split: DatasetSplit) -> &LabeledSet {
        match split {
            DatasetSplit::Train => &self.train,
            DatasetSplit::Validation => &self.validation,
            DatasetSplit::Test => &self.test,
        }
    }

    pub fn total_len(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }
}

fn normalize(pixels: &[u8], dims: ImageDims, count: usize) -> Result<Tensor> {
    let data = pixels.iter().map(|&p| f32::from(p) / 255.0).collect();
    Tensor::new(TensorDesc::new_images(count, dims), data)
}

pub fn one_hot(labels: &[u8], classes: usize) -> Result<Tensor> {
    let mut data = vec![0.0; labels.len() * classes];
    for (index, (&label, row)) in labels.iter().zip(data.chunks_exact_mut(classes)).enumerate() {
        let class = usize::from(label);
        if class >= classes {
            return Err(DatasetError::LabelOutOfRange { label, index, classes });
        }
        row[class] = 1.0;
    }
    Tensor::new(TensorDesc::new_matrix(labels.len(), classes), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(train: usize, test: usize) -> RawCorpus {
        let dims = ImageDims::new(2, 2, 3);
        let n = dims.num_elements();
        RawCorpus {
            dims,
            train_images: (0..train).flat_map(|i| vec![i as u8; n]).collect(),
            train_labels: (0..train).map(|i| (i % 3) as u8).collect(),
            test_images: (0..test).flat_map(|i| vec![(100 + i) as u8; n]).collect(),
            test_labels: (0..test).map(|i| (i % 3) as u8).collect(),
        }
    }

    fn config(train: usize, validation: usize, test: usize) -> DatasetConfig {
        DatasetConfig {
            train_size: train,
            validation_size: validation,
            test_size: test,
            classes: 3,
            ..Default::default()
        }
    }

    #[test]
    fn split_is_contiguous_and_ordered() {
        let split = Split::from_raw(raw(6, 3), &config(4, 2, 3)).unwrap();
        assert_eq!(split.train.len(), 4);
        assert_eq!(split.validation.len(), 2);
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.total_len(), 9);

        // First pixel of each image identifies its raw index
        let firsts = |set: &LabeledSet| -> Vec<u8> {
            set.images.samples().map(|s| (s[0] * 255.0).round() as u8).collect()
        };
        assert_eq!(firsts(&split.train), vec![0, 1, 2, 3]);
        assert_eq!(firsts(&split.validation), vec![4, 5]);
        assert_eq!(firsts(&split.test), vec![100, 101, 102]);
    }

    #[test]
    fn slices_are_normalized_from_raw_bytes() {
        let mut corpus = raw(6, 3);
        // Last byte of the last raw train image lands in the last validation sample
        *corpus.train_images.last_mut().unwrap() = 255;
        let split = Split::from_raw(corpus, &config(4, 2, 3)).unwrap();
        assert_eq!(split.train.images.desc().to_dims(), vec![4, 2, 2, 3]);
        assert_eq!(split.validation.images.desc().to_dims(), vec![2, 2, 2, 3]);
        assert_eq!(split.validation.images.sample(1).last(), Some(&1.0));
        assert_eq!(split.train.images.sample(3)[0], 3.0 / 255.0);
    }

    #[test]
    fn short_pixel_buffer_is_an_error() {
        let mut corpus = raw(6, 3);
        corpus.train_images.pop();
        let err = Split::from_raw(corpus, &config(4, 2, 3)).unwrap_err();
        assert!(matches!(err, DatasetError::ShapeMismatch { expected: 72, found: 71 }));
    }

    #[test]
    fn pixels_are_normalized() {
        let mut corpus = raw(2, 1);
        corpus.train_images[0] = 255;
        let split = Split::from_raw(corpus, &config(1, 1, 1)).unwrap();
        let images = &split.train.images;
        assert_eq!(images.data()[0], 1.0);
        assert!(images.data().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(images.desc().to_dims(), vec![1, 2, 2, 3]);
    }

    #[test]
    fn labels_are_one_hot() {
        let split = Split::from_raw(raw(6, 3), &config(4, 2, 3)).unwrap();
        for row in split.train.labels.samples() {
            assert_eq!(row.iter().sum::<f32>(), 1.0);
        }
        assert_eq!(split.validation.labels.sample(0), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn wrong_corpus_size_is_an_error() {
        let err = Split::from_raw(raw(5, 3), &config(4, 2, 3)).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::CorpusSizeMismatch { part: "train", expected: 6, found: 5 }
        ));
        let err = Split::from_raw(raw(6, 2), &config(4, 2, 3)).unwrap_err();
        assert!(matches!(err, DatasetError::CorpusSizeMismatch { part: "test", .. }));
    }

    #[test]
    fn out_of_range_label_is_an_error() {
        let err = one_hot(&[0, 1, 3], 3).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::LabelOutOfRange { label: 3, index: 2, classes: 3 }
        ));
    }

    #[test]
    fn get_selects_split() {
        let split = Split::from_raw(raw(6, 3), &config(4, 2, 3)).unwrap();
        assert_eq!(split.get(DatasetSplit::Validation).len(), 2);
        assert!(Arc::ptr_eq(&split.get(DatasetSplit::Test).images, &split.test.images));
    }
}
