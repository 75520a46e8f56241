use crate::options::KazeOptions;
use derive_more::{Deref, DerefMut};
use image::{ImageBuffer, Luma};
use log::*;
use ndarray::Array2;

type GrayImageBuffer = ImageBuffer<Luma<f32>, Vec<f32>>;

/// The dense float image handed to the pipeline.
///
/// This is simply a wrapper around a contiguous f32 buffer with unit
/// pixel values. The pipeline side of this crate never looks past
/// `width`/`height`/`get`; the wrapper exists so the extractor seam has
/// a concrete image type that is cheap to construct from host data.
#[derive(Debug, Clone, Deref, DerefMut)]
pub struct GrayFloatImage(pub GrayImageBuffer);

/// Maps a host matrix position (row, column) to the pipeline image
/// position (x, y).
///
/// The host runtime stores 2-D data column-major while the pipeline
/// reads row-major, so the ingested image deliberately takes the host's
/// row count as its width and column count as its height. Under that
/// assignment a host sample at (row, column) lands at pipeline
/// (x = row, y = column); the image is the transpose of the visually
/// intended picture, and [`pipeline_to_host`] undoes the swap on every
/// coordinate reported back.
pub fn host_to_pipeline(row: usize, column: usize) -> (usize, usize) {
    (row, column)
}

/// Compensates [`host_to_pipeline`] on the way out: a pipeline position
/// (x, y) is reported to the host as (y, x), restoring the caller's
/// original row/column frame.
pub fn pipeline_to_host(x: f32, y: f32) -> (f32, f32) {
    (y, x)
}

impl GrayFloatImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self(ImageBuffer::from_pixel(
            width as u32,
            height as u32,
            Luma([0.0]),
        ))
    }

    pub fn width(&self) -> usize {
        self.0.width() as usize
    }

    pub fn height(&self) -> usize {
        self.0.height() as usize
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.get_pixel(x as u32, y as u32)[0]
    }

    pub fn put(&mut self, x: usize, y: usize, pixel_value: f32) {
        self.put_pixel(x as u32, y as u32, Luma([pixel_value]));
    }
}

/// Convert a host uint8 matrix into the unit float image the pipeline
/// expects, recording the dimensions into the options.
///
/// Samples map linearly from [0, 255] to [0.0, 1.0]. The dimension swap
/// follows [`host_to_pipeline`]: an R x C host matrix produces an image
/// of width R and height C.
pub fn ingest(host: &Array2<u8>, options: &mut KazeOptions) -> GrayFloatImage {
    let (rows, columns) = host.dim();
    options.image_width = rows;
    options.image_height = columns;
    debug!("Ingesting a {rows} x {columns} 8-bit host matrix");
    let mut image = GrayFloatImage::new(rows, columns);
    for ((row, column), &sample) in host.indexed_iter() {
        let (x, y) = host_to_pipeline(row, column);
        image.put(x, y, f32::from(sample) / 255f32);
    }
    image
}
