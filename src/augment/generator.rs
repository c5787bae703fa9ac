use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;

use crate::dataloader::error::{DatasetError, Result};
use crate::dataloader::split::LabeledSet;
use crate::tensor::ImageDims;

use super::affine::{apply_affine_transform, flip_horizontal, flip_vertical};
use super::config::AugmentationConfig;
use super::flow::Flow;

/// One concrete draw of the random transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformParams {
    /// Rotation in degrees.
    pub theta: f32,
    /// Shift along rows, in pixels.
    pub tx: f32,
    /// Shift along columns, in pixels.
    pub ty: f32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

fn shift_in_pixels(range: f32, extent: usize, rng: &mut StdRng) -> f32 {
    if range == 0.0 {
        return 0.0;
    }
    let shift = rng.gen_range(-range..=range);
    if range < 1.0 {
        shift * extent as f32
    } else {
        shift
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDataGenerator {
    pub config: AugmentationConfig,
}

impl ImageDataGenerator {
    pub fn new(config: AugmentationConfig) -> Self {
        Self { config }
    }

    pub fn random_transform(&self, dims: ImageDims, rng: &mut StdRng) -> TransformParams {
        let config = &self.config;

        let theta = if config.rotation_range != 0.0 {
            rng.gen_range(-config.rotation_range..=config.rotation_range)
        } else {
            0.0
        };
        let tx = shift_in_pixels(config.height_shift_range, dims.height, rng);
        let ty = shift_in_pixels(config.width_shift_range, dims.width, rng);

        TransformParams {
            theta,
            tx,
            ty,
            flip_horizontal: config.horizontal_flip && rng.gen_bool(0.5),
            flip_vertical: config.vertical_flip && rng.gen_bool(0.5),
        }
    }

    /// Writes `src` transformed by `params` into `out`. Flips run after the affine step.
    pub fn apply_transform(&self, src: &[f32], out: &mut [f32], dims: ImageDims, params: &TransformParams) {
        apply_affine_transform(src, out, dims, params.theta, params.tx, params.ty);
        if params.flip_horizontal {
            flip_horizontal(out, dims);
        }
        if params.flip_vertical {
            flip_vertical(out, dims);
        }
    }

    /// Infinite stream of augmented batches drawn from `set`.
    pub fn flow(
        &self,
        set: LabeledSet,
        batch_size: usize,
        shuffle: bool,
        rng: StdRng,
        pool: Arc<rayon::ThreadPool>,
    ) -> Result<Flow> {
        if batch_size == 0 {
            return Err(DatasetError::InvalidBatchSize);
        }
        self.config.validate()?;
        if set.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        Ok(Flow::new(*self, set, batch_size, shuffle, rng, pool))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    const DIMS: ImageDims = ImageDims {
        height: 32,
        width: 32,
        channels: 3,
    };

    #[test]
    fn draws_stay_within_ranges() {
        let generator = ImageDataGenerator::new(AugmentationConfig::random_rotation());
        let mut rng = StdRng::seed_from_u64(7);
        let mut flips = 0;
        for _ in 0..1000 {
            let p = generator.random_transform(DIMS, &mut rng);
            assert!((-30.0..=30.0).contains(&p.theta));
            assert!((-3.2..=3.2).contains(&p.tx));
            assert!((-3.2..=3.2).contains(&p.ty));
            assert!(!p.flip_vertical);
            flips += usize::from(p.flip_horizontal);
        }
        assert!(flips > 300 && flips < 700, "{flips} horizontal flips");
    }

    #[test]
    fn default_config_draws_identity() {
        let generator = ImageDataGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(generator.random_transform(DIMS, &mut rng), TransformParams::default());
    }

    #[test]
    fn same_seed_same_draws() {
        let generator = ImageDataGenerator::new(AugmentationConfig::random_rotation());
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(
                generator.random_transform(DIMS, &mut a),
                generator.random_transform(DIMS, &mut b)
            );
        }
    }

    #[test]
    fn large_shift_range_is_pixels() {
        let generator = ImageDataGenerator::new(AugmentationConfig {
            width_shift_range: 4.0,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let p = generator.random_transform(DIMS, &mut rng);
            assert!((-4.0..=4.0).contains(&p.ty));
            assert_eq!(p.tx, 0.0);
        }
    }

    #[test]
    fn apply_transform_flips_after_affine() {
        let generator = ImageDataGenerator::default();
        let dims = ImageDims::new(1, 2, 1);
        let mut out = [0.0; 2];
        let params = TransformParams {
            flip_horizontal: true,
            ..Default::default()
        };
        generator.apply_transform(&[0.25, 0.75], &mut out, dims, &params);
        assert_eq!(out, [0.75, 0.25]);
    }
}
