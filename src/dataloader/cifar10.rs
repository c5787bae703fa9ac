//! Fixed layout of the CIFAR-10 benchmark.
//!
//! The raw distribution ships 50000 training and 10000 test images. The last
//! 10000 raw training images are held out as the validation split.

use crate::tensor::ImageDims;

pub const IMAGE_SHAPE: (usize, usize, usize) = (32, 32, 3);
pub const TRAIN_SIZE: usize = 40000;
pub const VALIDATION_SIZE: usize = 10000;
pub const TEST_SIZE: usize = 10000;
pub const CLASSES: usize = 10;

pub const CLASS_NAMES: [&str; CLASSES] = [
    "airplane",
    "automobile",
    "bird",
    "cat",
    "deer",
    "dog",
    "frog",
    "horse",
    "ship",
    "truck",
];

pub fn image_dims() -> ImageDims {
    let (height, width, channels) = IMAGE_SHAPE;
    ImageDims::new(height, width, channels)
}

/// Resolves a class directory name, either the index (`"3"`) or the name (`"cat"`).
pub fn class_index(name: &str) -> Option<u8> {
    if let Ok(idx) = name.parse::<u8>() {
        return (usize::from(idx) < CLASSES).then_some(idx);
    }
    CLASS_NAMES
        .iter()
        .position(|&class| class.eq_ignore_ascii_case(name))
        .map(|idx| idx as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sizes_sum_to_corpus() {
        assert_eq!(TRAIN_SIZE + VALIDATION_SIZE + TEST_SIZE, 60000);
        assert_eq!(image_dims().num_elements(), 3072);
    }

    #[test]
    fn class_directories_resolve() {
        assert_eq!(class_index("0"), Some(0));
        assert_eq!(class_index("9"), Some(9));
        assert_eq!(class_index("10"), None);
        assert_eq!(class_index("Truck"), Some(9));
        assert_eq!(class_index("cat"), Some(3));
        assert_eq!(class_index("unicorn"), None);
    }
}
