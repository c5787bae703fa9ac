use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::debug;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use super::cifar10::{class_index, image_dims};
use super::datasource::{CorpusSource, RawCorpus};
use super::error::{DatasetError, Result};

/// Corpus stored as image files, one directory per class:
/// `root/{train,test}/<class>/<file>`. `<class>` is the class index or name.
pub struct ImageDirectorySource {
    root: PathBuf,
    valid_extensions: HashSet<String>,
}

impl ImageDirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let valid_extensions = image::ImageFormat::all()
            .flat_map(|format| format.extensions_str())
            .map(|ext| ext.to_string())
            .collect();

        Self {
            root: root.as_ref().to_owned(),
            valid_extensions,
        }
    }

    fn is_valid_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.valid_extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Labeled file list for one part, ordered by class and then by file name.
    fn list_part(&self, dir: &Path) -> Result<Vec<(PathBuf, u8)>> {
        if !dir.exists() {
            return Err(DatasetError::DirectoryNotFound(dir.display().to_string()));
        }

        let mut classes = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let label = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(class_index)
                .ok_or_else(|| DatasetError::UnknownClassDirectory(path.clone()))?;
            classes.push((label, path));
        }
        classes.sort_unstable();

        let mut files = Vec::new();
        for (label, class_dir) in classes {
            // read_dir does not guarantee any order, sort for a reproducible corpus
            let mut paths: Vec<PathBuf> = std::fs::read_dir(&class_dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| self.is_valid_extension(path))
                .collect();
            paths.sort_unstable();
            files.extend(paths.into_iter().map(|path| (path, label)));
        }
        Ok(files)
    }

    fn load_part(&self, name: &str) -> Result<(Vec<u8>, Vec<u8>)> {
        let files = self.list_part(&self.root.join(name))?;
        let decoded = files
            .par_iter()
            .map(|(path, _)| decode_image(path))
            .collect::<Result<Vec<_>>>()?;

        let labels = files.iter().map(|(_, label)| *label).collect();
        let images = decoded.concat();
        debug!("decoded {} {} images under {:?}", files.len(), name, self.root);
        Ok((images, labels))
    }
}

fn decode_image(path: &Path) -> Result<Vec<u8>> {
    let dims = image_dims();
    let img = image::open(path)?.to_rgb8();
    let (width, height) = img.dimensions();
    if width as usize != dims.width || height as usize != dims.height {
        return Err(DatasetError::UnexpectedImageDimensions {
            path: path.to_owned(),
            width,
            height,
            expected_width: dims.width as u32,
            expected_height: dims.height as u32,
        });
    }
    Ok(img.into_raw())
}

impl CorpusSource for ImageDirectorySource {
    fn load(&self) -> Result<RawCorpus> {
        if !self.root.exists() {
            return Err(DatasetError::DirectoryNotFound(self.root.display().to_string()));
        }

        let (train_images, train_labels) = self.load_part("train")?;
        let (test_images, test_labels) = self.load_part("test")?;
        let corpus = RawCorpus {
            dims: image_dims(),
            train_images,
            train_labels,
            test_images,
            test_labels,
        };

        if corpus.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn write_png(path: &Path, size: u32, value: u8) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(size, size, Rgb([value, value, value]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn classes_and_files_are_ordered() {
        let root = tempfile::tempdir().unwrap();
        write_png(&root.path().join("train/cat/b.png"), 32, 2);
        write_png(&root.path().join("train/cat/a.png"), 32, 1);
        write_png(&root.path().join("train/0/z.png"), 32, 0);
        write_png(&root.path().join("test/9/x.png"), 32, 9);
        std::fs::write(root.path().join("train/0/notes.txt"), "skip me").unwrap();

        let corpus = ImageDirectorySource::new(root.path()).load().unwrap();
        assert_eq!(corpus.train_labels, vec![0, 3, 3]);
        assert_eq!(corpus.test_labels, vec![9]);
        let firsts: Vec<u8> = corpus.train_images.chunks_exact(3072).map(|img| img[0]).collect();
        assert_eq!(firsts, vec![0, 1, 2]);
    }

    #[test]
    fn wrong_image_size_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        write_png(&root.path().join("train/1/a.png"), 16, 0);
        write_png(&root.path().join("test/1/a.png"), 32, 0);

        let err = ImageDirectorySource::new(root.path()).load().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::UnexpectedImageDimensions { width: 16, height: 16, .. }
        ));
    }

    #[test]
    fn unknown_class_directory_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        write_png(&root.path().join("train/unicorn/a.png"), 32, 0);
        std::fs::create_dir_all(root.path().join("test")).unwrap();

        let err = ImageDirectorySource::new(root.path()).load().unwrap_err();
        assert!(matches!(err, DatasetError::UnknownClassDirectory(_)));
    }

    #[test]
    fn empty_tree_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("train")).unwrap();
        std::fs::create_dir_all(root.path().join("test")).unwrap();

        let err = ImageDirectorySource::new(root.path()).load().unwrap_err();
        assert!(matches!(err, DatasetError::EmptyDataset));
    }
}
