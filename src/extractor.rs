use crate::image::GrayFloatImage;
use crate::options::KazeOptions;
use crate::KeyPoint;
use ndarray::Array2;

/// Dense descriptor matrix handed back by the pipeline, one row per
/// keypoint, tagged with its element type.
///
/// The element type follows from the configured descriptor kind; the
/// result encoder resolves the tag exactly once. `Float64` exists
/// because the pipeline's matrix type is not closed over the two kinds
/// the host contract can carry; the encoder rejects it.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorMatrix {
    Uint8(Array2<u8>),
    Float32(Array2<f32>),
    Float64(Array2<f64>),
}

impl DescriptorMatrix {
    /// Number of descriptors, one per keypoint.
    pub fn rows(&self) -> usize {
        match self {
            DescriptorMatrix::Uint8(m) => m.nrows(),
            DescriptorMatrix::Float32(m) => m.nrows(),
            DescriptorMatrix::Float64(m) => m.nrows(),
        }
    }

    /// Length of each descriptor vector.
    pub fn descriptor_length(&self) -> usize {
        match self {
            DescriptorMatrix::Uint8(m) => m.ncols(),
            DescriptorMatrix::Float32(m) => m.ncols(),
            DescriptorMatrix::Float64(m) => m.ncols(),
        }
    }
}

/// The detection/description pipeline, seen from the marshaling layer.
///
/// The two phases are called in order on the same extractor value, so an
/// implementation may keep its nonlinear scale space alive between
/// `detect` and `describe`. Keypoints passed to `describe` are exactly
/// the ones `detect` returned, in the same order, and the returned
/// matrix must hold one row per keypoint in that order.
pub trait FeatureExtractor {
    /// Build the scale space for `image` and detect keypoints.
    fn detect(&mut self, image: &GrayFloatImage, options: &KazeOptions) -> Vec<KeyPoint>;

    /// Compute one descriptor per keypoint.
    fn describe(&mut self, keypoints: &[KeyPoint], options: &KazeOptions) -> DescriptorMatrix;
}
