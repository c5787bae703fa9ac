pub mod batch;
pub mod cifar10;
pub mod config;
pub mod dataloader;
pub mod datasource;
pub mod error;
pub mod for_cifar10bin;
pub mod for_imagesdir;
pub mod info;
pub mod par_iter;
pub mod split;
