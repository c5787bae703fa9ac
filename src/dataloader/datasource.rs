use crate::tensor::ImageDims;

use super::error::Result;

/// Undecoded corpus as delivered by a source: HWC `u8` pixels and integer labels.
#[derive(Clone, Debug, Default)]
pub struct RawCorpus {
    pub dims: ImageDims,
    pub train_images: Vec<u8>,
    pub train_labels: Vec<u8>,
    pub test_images: Vec<u8>,
    pub test_labels: Vec<u8>,
}

impl RawCorpus {
    pub fn len(&self) -> usize {
        self.train_labels.len() + self.test_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait CorpusSource: Send + Sync {
    fn load(&self) -> Result<RawCorpus>;
}

impl<F> CorpusSource for F
where
    F: Fn() -> Result<RawCorpus> + Send + Sync,
{
    fn load(&self) -> Result<RawCorpus> {
        self()
    }
}
