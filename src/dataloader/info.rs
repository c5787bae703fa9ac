use log::info;

use super::dataloader::DatasetProvider;
use super::datasource::CorpusSource;

pub fn log_dataset_info<S: CorpusSource>(provider: &DatasetProvider<S>, batch_size: usize) {
    let config = provider.config();
    let total_size = config.corpus_size();
    let batch_size = batch_size.max(1);

    info!("Dataset Information:");
    info!("-------------------");
    info!("Total size: {}", total_size);
    info!("Batch size: {}", batch_size);
    info!("Classes: {}", config.classes);

    for (name, size) in [
        ("Train", config.train_size),
        ("Validation", config.validation_size),
        ("Test", config.test_size),
    ] {
        info!(
            "{} split: {} ({:.2}%), {} batches per epoch",
            name,
            size,
            size as f32 / total_size as f32 * 100.0,
            size.div_ceil(batch_size)
        );
    }

    info!("Augmentation: {:?}", config.augmentation);
    info!("Seed: {}", provider.seed());
    info!("Threads: {}", config.threads);
}
