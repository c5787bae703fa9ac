use std::error::Error;
use std::path::Path;

use cifar_prep::{
    log_dataset_info, Cifar10BinarySource, CorpusSource, DatasetConfig, DatasetProvider,
    ImageDirectorySource, PrefetchIterator,
};

const BATCH_SIZE: usize = 32;

fn run<S: CorpusSource>(source: S) -> Result<(), Box<dyn Error>> {
    let provider = DatasetProvider::new(source, Some(DatasetConfig::default()))?;
    log_dataset_info(&provider, BATCH_SIZE);

    let depth = provider.config().prefetch_count;
    let mut batches = provider.train_generator_for_cnn(BATCH_SIZE)?.prefetch(depth);
    if let Some(batch) = batches.next() {
        log::info!(
            "First batch: images {:?}, labels {:?}",
            batch.images.desc().to_dims(),
            batch.labels.desc().to_dims()
        );
    }

    let test = provider.test_data(15.0)?;
    log::info!("Test split rotated by 15 degrees: {:?}", test.images.desc().to_dims());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CIFAR10_DIR").ok())
        .ok_or("usage: cifar_prep <cifar-10-batches-bin | image directory> (or set CIFAR10_DIR)")?;

    // The binary distribution is recognised by its test batch file
    if Path::new(&dir).join("test_batch.bin").exists() {
        run(Cifar10BinarySource::new(&dir))
    } else {
        run(ImageDirectorySource::new(&dir))
    }
}
