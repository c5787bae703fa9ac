use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    // IO and decoding errors
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Batch file {path:?} is {len} bytes, not a whole number of {record_len} byte records")]
    TruncatedBatchFile {
        path: PathBuf,
        len: usize,
        record_len: usize,
    },

    #[error("Image {path:?} is {width}x{height}, expected {expected_width}x{expected_height}")]
    UnexpectedImageDimensions {
        path: PathBuf,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    #[error("Directory {0:?} does not name a known class")]
    UnknownClassDirectory(PathBuf),

    #[error("No images found in the dataset")]
    EmptyDataset,

    // Corpus and split errors
    #[error("Corpus {part} part has {found} samples, expected {expected}")]
    CorpusSizeMismatch {
        part: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Label {label} at index {index} is out of range for {classes} classes")]
    LabelOutOfRange {
        label: u8,
        index: usize,
        classes: usize,
    },

    #[error("Batch size must be positive")]
    InvalidBatchSize,

    #[error("Invalid dataset split sizes. Train: {train}, Validation: {validation}, Test: {test}, Classes: {classes}, Threads: {threads}")]
    InvalidSplitSizes {
        train: usize,
        validation: usize,
        test: usize,
        classes: usize,
        threads: usize,
    },

    #[error("Augmentation {name} must be finite and non-negative, got {value}")]
    InvalidAugmentationRange { name: &'static str, value: f32 },

    #[error("Tensor shape holds {expected} elements but {found} were given")]
    ShapeMismatch { expected: usize, found: usize },

    // Shared state
    #[error("Failed to acquire lock on RNG")]
    RngLockError,

    #[error("Failed to acquire lock on the cached split")]
    CacheLockError,

    #[error("Thread pool error: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
