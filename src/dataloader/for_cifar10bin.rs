//! Reader for the binary CIFAR-10 distribution.
//!
//! The files can be downloaded from <https://www.cs.toronto.edu/~kriz/cifar.html>.
//! Each record is one label byte followed by the red, green and blue planes
//! of a 32x32 image.

use std::path::{Path, PathBuf};

use log::debug;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use super::cifar10::image_dims;
use super::datasource::{CorpusSource, RawCorpus};
use super::error::{DatasetError, Result};

pub const TRAIN_BATCH_FILES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];
pub const TEST_BATCH_FILE: &str = "test_batch.bin";

pub struct Cifar10BinarySource {
    dir: PathBuf,
}

impl Cifar10BinarySource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_owned(),
        }
    }
}

/// Reads one batch file into HWC pixels and labels.
fn read_batch_file(path: &Path) -> Result<(Vec<u8>, Vec<u8>)> {
    let dims = image_dims();
    let plane = dims.height * dims.width;
    let record_len = dims.num_elements() + 1;

    let data = std::fs::read(path)?;
    if data.is_empty() || data.len() % record_len != 0 {
        return Err(DatasetError::TruncatedBatchFile {
            path: path.to_owned(),
            len: data.len(),
            record_len,
        });
    }

    let records = data.len() / record_len;
    let mut images = Vec::with_capacity(records * dims.num_elements());
    let mut labels = Vec::with_capacity(records);
    for record in data.chunks_exact(record_len) {
        labels.push(record[0]);
        let planes = &record[1..];
        for pixel in 0..plane {
            for channel in 0..dims.channels {
                images.push(planes[channel * plane + pixel]);
            }
        }
    }
    debug!("read {} records from {:?}", records, path);
    Ok((images, labels))
}

impl CorpusSource for Cifar10BinarySource {
    fn load(&self) -> Result<RawCorpus> {
        if !self.dir.exists() {
            return Err(DatasetError::DirectoryNotFound(self.dir.display().to_string()));
        }

        let train = TRAIN_BATCH_FILES
            .par_iter()
            .map(|name| read_batch_file(&self.dir.join(name)))
            .collect::<Result<Vec<_>>>()?;
        let (test_images, test_labels) = read_batch_file(&self.dir.join(TEST_BATCH_FILE))?;

        let mut corpus = RawCorpus {
            dims: image_dims(),
            test_images,
            test_labels,
            ..Default::default()
        };
        for (images, labels) in train {
            corpus.train_images.extend_from_slice(&images);
            corpus.train_labels.extend_from_slice(&labels);
        }
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Record whose red plane is all `r`, green all `g`, blue all `b`
    fn record(label: u8, r: u8, g: u8, b: u8) -> Vec<u8> {
        let mut out = vec![label];
        for value in [r, g, b] {
            out.extend(std::iter::repeat(value).take(1024));
        }
        out
    }

    #[test]
    fn planes_become_channels_last() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.bin");
        let mut bytes = record(7, 10, 20, 30);
        bytes.extend(record(2, 1, 2, 3));
        std::fs::write(&path, bytes).unwrap();

        let (images, labels) = read_batch_file(&path).unwrap();
        assert_eq!(labels, vec![7, 2]);
        assert_eq!(images.len(), 2 * 3072);
        assert_eq!(&images[..6], &[10, 20, 30, 10, 20, 30]);
        assert_eq!(&images[3072..3075], &[1, 2, 3]);
    }

    #[test]
    fn truncated_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.bin");
        std::fs::write(&path, vec![0u8; 3000]).unwrap();

        let err = read_batch_file(&path).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::TruncatedBatchFile { len: 3000, record_len: 3073, .. }
        ));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let source = Cifar10BinarySource::new("/nonexistent/cifar-10-batches-bin");
        assert!(matches!(source.load(), Err(DatasetError::DirectoryNotFound(_))));
    }
}
