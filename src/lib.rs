//! Marshaling layer between a host numerical-computing runtime and the
//! KAZE keypoint detection/description pipeline.
//!
//! The host calls one function, [`call`], with a uint8 grayscale image
//! followed by optional name,value configuration pairs, and asks for up
//! to two outputs: an N x 2 keypoint coordinate matrix and a descriptor
//! matrix whose element type follows the configured descriptor kind.
//! The pipeline itself is injected as a [`FeatureExtractor`]; this crate
//! owns argument validation, option parsing, the transposition contract
//! between the host's column-major matrices and the pipeline's row-major
//! images, and encoding the results back into host values.

mod encode;
mod error;
mod extractor;
mod host;
mod image;
mod options;

pub use crate::encode::{encode_descriptors, encode_keypoints};
pub use crate::error::Error;
pub use crate::extractor::{DescriptorMatrix, FeatureExtractor};
pub use crate::host::HostValue;
pub use crate::image::{host_to_pipeline, ingest, pipeline_to_host, GrayFloatImage};
pub use crate::options::{DescriptorKind, DescriptorRangePolicy, Diffusivity, KazeOptions};

use cv_core::nalgebra::Point2;
use cv_core::ImagePoint;
use log::*;
use std::time::{Duration, Instant};

/// A point of interest in an image, in the ingested image's coordinate
/// frame. This pretty much follows from OpenCV conventions.
#[derive(Debug, Clone, Copy)]
pub struct KeyPoint {
    /// The horizontal coordinate in a coordinate system is
    /// defined s.t. +x faces right and starts from the top
    /// of the image.
    /// the vertical coordinate in a coordinate system is defined
    /// s.t. +y faces toward the bottom of an image and starts
    /// from the left side of the image.
    pub point: (f32, f32),
    /// The magnitude of response from the detector.
    pub response: f32,

    /// The radius defining the extent of the keypoint, in pixel units
    pub size: f32,

    /// The level of scale space in which the keypoint was detected.
    pub octave: usize,

    /// A classification ID
    pub class_id: usize,

    /// The orientation angle
    pub angle: f32,
}

impl ImagePoint for KeyPoint {
    fn image_point(&self) -> Point2<f64> {
        Point2::new(self.point.0 as f64, self.point.1 as f64)
    }
}

/// The usage text shown when [`call`] is invoked with no arguments.
pub fn usage() -> &'static str {
    "KAZE Features\n\
     Usage:\n\
     [kps,desc] = kaze(gray_img, param1, value1, ...)\n\
     \n\
     Options below are not mandatory. Unless specified, default arguments are used.\n\
     \n\
     Scale-space parameters:\n\
     soffset - Base scale offset [sigma units] (default=1.6)\n\
     omax - Maximum octave of image evolution (default=4)\n\
     nsublevels - Number of sublevels per octave (default=4)\n\
     diffusivity - Diffusivity function. Possible values:\n\
     \x20 0 -> Perona-Malik, g1 = exp(-|dL|^2/k^2)\n\
     \x20 1 -> Perona-Malik, g2 = 1 / (1 + dL^2 / k^2) (default)\n\
     \x20 2 -> Weickert diffusivity\n\
     \x20 3 -> Charbonnier diffusivity\n\
     \n\
     Feature detection parameters:\n\
     dthreshold - Feature detector threshold response for keypoints (0.001 can be a good value)\n\
     sderivatives - Smoothing factor for the derivatives (default=1.0)\n\
     \n\
     Descriptor parameters:\n\
     descriptor - Descriptor Type. Possible values:\n\
     \x20 0 -> SURF_UPRIGHT\n\
     \x20 1 -> SURF\n\
     \x20 2 -> SURF_EXTENDED_UPRIGHT\n\
     \x20 3 -> SURF_EXTENDED\n\
     \x20 4 -> MSURF_UPRIGHT\n\
     \x20 5 -> MSURF (default)\n\
     \x20 6 -> MSURF_EXTENDED_UPRIGHT\n\
     \x20 7 -> MSURF_EXTENDED\n\
     \x20 8 -> GSURF_UPRIGHT\n\
     \x20 9 -> GSURF\n\
     \x20 10 -> GSURF_EXTENDED_UPRIGHT\n\
     \x20 11 -> GSURF_EXTENDED\n\
     \n\
     Misc:\n\
     verbose - Verbose mode. Prints calculation times\n\
     save_scale_space - Store the scale-space images as they are built\n"
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// The single externally callable entry point.
///
/// `args` is the host argument list: a uint8 grayscale image first, then
/// alternating (name, value) configuration pairs. `requested_outputs` is
/// how many output values the caller asked for; up to two are produced:
///
/// * output 0: N x 2 double matrix of keypoint coordinates in the
///   caller's original frame (see [`pipeline_to_host`]),
/// * output 1: keypoint-count x descriptor-length matrix, uint8 or
///   single depending on the configured descriptor kind.
///
/// With no arguments at all, prints the [`usage`] text and succeeds with
/// no outputs. Detection always runs once an image is accepted, even
/// when no outputs were requested; description runs only when the second
/// output is. When the `verbose` option is set, point count and
/// per-phase timings are reported through the `log` facade.
///
/// Every invocation is independent: the whole options record is rebuilt
/// from the arguments and nothing persists across calls.
pub fn call<E: FeatureExtractor>(
    extractor: &mut E,
    args: &[HostValue],
    requested_outputs: usize,
) -> Result<Vec<HostValue>, Error> {
    if args.is_empty() {
        println!("{}", usage());
        return Ok(Vec::new());
    }

    let HostValue::Uint8(host_image) = &args[0] else {
        return Err(Error::NotUint8);
    };

    if args.len() % 2 == 0 {
        return Err(Error::BadArgNum);
    }

    let mut options = KazeOptions::parse_pairs(&args[1..])?;

    let (image, conversion_time) = timed(|| ingest(host_image, &mut options));
    trace!("Ingestion finished.");

    let (keypoints, detection_time) = timed(|| extractor.detect(&image, &options));
    trace!("Feature detection finished.");

    let mut outputs = Vec::new();
    if requested_outputs >= 1 {
        outputs.push(encode_keypoints(&keypoints));
    }

    let mut description_time = None;
    if requested_outputs >= 2 {
        let (descriptors, elapsed) = timed(|| extractor.describe(&keypoints, &options));
        trace!("Descriptor computation finished.");
        description_time = Some(elapsed);
        outputs.push(encode_descriptors(descriptors)?);
    }

    if options.verbose {
        info!("Number of points: {}", keypoints.len());
        info!("Time Conversion uint8->float: {:.2} ms.", millis(conversion_time));
        info!("Time Detector: {:.2} ms.", millis(detection_time));
        if let Some(elapsed) = description_time {
            info!("Time Descriptor: {:.2} ms.", millis(elapsed));
        }
    }

    Ok(outputs)
}
