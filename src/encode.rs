use crate::error::Error;
use crate::extractor::DescriptorMatrix;
use crate::host::HostValue;
use crate::image::pipeline_to_host;
use crate::KeyPoint;
use ndarray::Array2;

/// Encode detected keypoints as an N x 2 double matrix in the caller's
/// original coordinate frame.
///
/// Row i holds [`pipeline_to_host`] of keypoint i, i.e. (y, x) of the
/// pipeline-internal position, compensating the ingestion transposition.
pub fn encode_keypoints(keypoints: &[KeyPoint]) -> HostValue {
    let mut out = Array2::<f64>::zeros((keypoints.len(), 2));
    for (i, keypoint) in keypoints.iter().enumerate() {
        let (first, second) = pipeline_to_host(keypoint.point.0, keypoint.point.1);
        out[[i, 0]] = f64::from(first);
        out[[i, 1]] = f64::from(second);
    }
    HostValue::Double(out)
}

/// Encode a descriptor matrix as a host matrix of the matching element
/// type, rows = keypoint count, columns = descriptor length.
///
/// Only single-channel uint8 and float32 descriptors have host
/// counterparts; anything else is fatal.
pub fn encode_descriptors(descriptors: DescriptorMatrix) -> Result<HostValue, Error> {
    match descriptors {
        DescriptorMatrix::Uint8(m) => Ok(HostValue::Uint8(m)),
        DescriptorMatrix::Float32(m) => Ok(HostValue::Single(m)),
        DescriptorMatrix::Float64(_) => Err(Error::UnknownDescriptorType),
    }
}
