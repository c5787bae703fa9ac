use crate::augment::config::AugmentationConfig;

use super::cifar10::{CLASSES, TEST_SIZE, TRAIN_SIZE, VALIDATION_SIZE};
use super::error::{DatasetError, Result};

pub struct DatasetConfig {
    pub train_size: usize,
    pub validation_size: usize,
    pub test_size: usize,
    pub classes: usize,
    pub seed: Option<u64>,
    pub threads: usize,
    pub prefetch_count: usize,
    pub augmentation: AugmentationConfig,
}

impl DatasetConfig {
    pub fn build(self) -> Result<Self> {
        check_split_sizes(&self)?;
        self.augmentation.validate()?;

        Ok(self)
    }

    /// Total corpus size the source is expected to deliver.
    pub fn corpus_size(&self) -> usize {
        self.train_size + self.validation_size + self.test_size
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            train_size: TRAIN_SIZE,
            validation_size: VALIDATION_SIZE,
            test_size: TEST_SIZE,
            classes: CLASSES,
            seed: None,
            threads: num_cpus::get(),
            prefetch_count: 4,
            augmentation: AugmentationConfig::random_rotation(),
        }
    }
}

fn check_split_sizes(config: &DatasetConfig) -> Result<()> {
    if config.train_size == 0
        || config.validation_size == 0
        || config.test_size == 0
        || config.classes == 0
        || config.classes > usize::from(u8::MAX) + 1
        || config.threads == 0
    {
        return Err(DatasetError::InvalidSplitSizes {
            train: config.train_size,
            validation: config.validation_size,
            test: config.test_size,
            classes: config.classes,
            threads: config.threads,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sizes_cover_the_corpus() {
        let config = DatasetConfig::default().build().unwrap();
        assert_eq!(config.corpus_size(), 60000);
        assert_eq!(config.train_size, 40000);
        assert_eq!(config.validation_size, 10000);
        assert_eq!(config.test_size, 10000);
        assert_eq!(config.classes, 10);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = DatasetConfig {
            validation_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.build(),
            Err(DatasetError::InvalidSplitSizes { validation: 0, .. })
        ));

        let config = DatasetConfig {
            threads: 0,
            ..Default::default()
        };
        assert!(config.build().is_err());
    }

    #[test]
    fn invalid_augmentation_is_rejected() {
        let config = DatasetConfig {
            augmentation: AugmentationConfig {
                rotation_range: -30.0,
                ..AugmentationConfig::random_rotation()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.build(),
            Err(DatasetError::InvalidAugmentationRange { name: "rotation_range", value }) if value == -30.0
        ));
    }
}
