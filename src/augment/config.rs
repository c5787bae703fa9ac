use crate::dataloader::error::{DatasetError, Result};

/// Options recognized by [`ImageDataGenerator`](super::ImageDataGenerator).
///
/// Shift ranges below 1.0 are a fraction of the image extent, larger values
/// are absolute pixels. `Default` disables every transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AugmentationConfig {
    /// Rotations are drawn from `[-rotation_range, rotation_range]` degrees.
    pub rotation_range: f32,
    pub width_shift_range: f32,
    pub height_shift_range: f32,
    pub horizontal_flip: bool,
    pub vertical_flip: bool,
}

impl AugmentationConfig {
    /// Configuration used by every randomized CIFAR-10 accessor.
    pub fn random_rotation() -> Self {
        Self {
            rotation_range: 30.0,
            width_shift_range: 0.1,
            height_shift_range: 0.1,
            horizontal_flip: true,
            // Upside-down images are not part of the CIFAR-10 distribution
            vertical_flip: false,
        }
    }

    /// Ranges must be finite and non-negative, otherwise sampling has no valid interval.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("rotation_range", self.rotation_range),
            ("width_shift_range", self.width_shift_range),
            ("height_shift_range", self.height_shift_range),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DatasetError::InvalidAugmentationRange { name, value });
            }
        }
        Ok(())
    }

    pub fn is_identity(&self) -> bool {
        self.rotation_range == 0.0
            && self.width_shift_range == 0.0
            && self.height_shift_range == 0.0
            && !self.horizontal_flip
            && !self.vertical_flip
    }
}
