use thiserror::Error;

/// Every way a call through the entry point can fail.
///
/// All of these are fatal: the call aborts at the point of violation and
/// no output values are produced. There is no retry and no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The first input was not a 2-D matrix of unsigned 8-bit integers.
    #[error("first input must be a grayscale image of class uint8")]
    NotUint8,

    /// The arguments after the image do not form complete name,value pairs.
    #[error("first input must be an image, followed by parameter name,value pairs")]
    BadArgNum,

    /// A configuration pair was not (string, numeric).
    #[error("parameters must be string,value pairs")]
    BadParamType,

    /// A configuration name is not in the recognized set.
    #[error("bad parameter name: {0}")]
    BadParamName(String),

    /// The pipeline handed back a descriptor element type this layer
    /// cannot encode as a host matrix.
    #[error("unknown descriptor type")]
    UnknownDescriptorType,
}

impl Error {
    /// Stable identifier for this failure, in the host runtime's
    /// `component:mnemonic` convention.
    pub fn identifier(&self) -> &'static str {
        match self {
            Error::NotUint8 => "kaze:notUint8",
            Error::BadArgNum => "kaze:badArgNum",
            Error::BadParamType => "kaze:badParamTypes",
            Error::BadParamName(_) => "kaze:badParamName",
            Error::UnknownDescriptorType => "kaze:unknownDescType",
        }
    }
}
