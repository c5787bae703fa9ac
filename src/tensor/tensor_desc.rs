#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageDims {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl ImageDims {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self { height, width, channels }
    }

    pub fn num_elements(&self) -> usize {
        self.height * self.width * self.channels
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TensorDesc {
    // Label batches, one row per sample (e.g. one-hot vectors)
    Matrix { rows: usize, cols: usize },

    // Image batches, channels last (NHWC)
    Tensor4D {
        batch: usize,
        height: usize,
        width: usize,
        channels: usize,
    },
}

impl TensorDesc {
    pub fn new_matrix(rows: usize, cols: usize) -> Self {
        Self::Matrix { rows, cols }
    }

    pub fn new_tensor4d(batch: usize, height: usize, width: usize, channels: usize) -> Self {
        Self::Tensor4D { batch, height, width, channels }
    }

    pub fn new_images(batch: usize, dims: ImageDims) -> Self {
        Self::new_tensor4d(batch, dims.height, dims.width, dims.channels)
    }

    pub fn size_in_bytes(&self) -> usize {
        self.num_elements() * std::mem::size_of::<f32>()
    }

    pub fn num_elements(&self) -> usize {
        self.batch() * self.sample_len()
    }

    /// Length along axis 0.
    pub fn batch(&self) -> usize {
        match self {
            Self::Matrix { rows, .. } => *rows,
            Self::Tensor4D { batch, .. } => *batch,
        }
    }

    /// Number of elements in a single sample (everything but axis 0).
    pub fn sample_len(&self) -> usize {
        match self {
            Self::Matrix { cols, .. } => *cols,
            Self::Tensor4D { height, width, channels, .. } => height * width * channels,
        }
    }

    /// Same per-sample shape with a different length along axis 0.
    pub fn with_batch(&self, n: usize) -> Self {
        match self {
            Self::Matrix { cols, .. } => Self::Matrix { rows: n, cols: *cols },
            Self::Tensor4D { height, width, channels, .. } => Self::Tensor4D {
                batch: n,
                height: *height,
                width: *width,
                channels: *channels,
            },
        }
    }

    pub fn image_dims(&self) -> Option<ImageDims> {
        match self {
            Self::Tensor4D { height, width, channels, .. } => {
                Some(ImageDims::new(*height, *width, *channels))
            }
            Self::Matrix { .. } => None,
        }
    }

    pub fn to_dims(&self) -> Vec<usize> {
        match self {
            Self::Matrix { rows, cols } => vec![*rows, *cols],
            Self::Tensor4D { batch, height, width, channels } => {
                vec![*batch, *height, *width, *channels]
            }
        }
    }
}
