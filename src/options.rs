use crate::error::Error;
use crate::host::HostValue;

/// The conductance function used by the nonlinear scale-space
/// construction. Wire codes 0 through 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diffusivity {
    /// Perona-Malik, g1 = exp(-|dL|^2/k^2)
    PmG1,
    /// Perona-Malik, g2 = 1 / (1 + dL^2/k^2)
    #[default]
    PmG2,
    /// Weickert diffusivity
    Weickert,
    /// Charbonnier diffusivity
    Charbonnier,
}

impl Diffusivity {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Diffusivity::PmG1),
            1 => Some(Diffusivity::PmG2),
            2 => Some(Diffusivity::Weickert),
            3 => Some(Diffusivity::Charbonnier),
            _ => None,
        }
    }
}

/// The descriptor variant to compute: SURF, M-SURF or G-SURF family,
/// optionally extended to double length, optionally upright (no rotation
/// invariance). Wire codes 0 through 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DescriptorKind {
    SurfUpright,
    Surf,
    SurfExtendedUpright,
    SurfExtended,
    MsurfUpright,
    #[default]
    Msurf,
    MsurfExtendedUpright,
    MsurfExtended,
    GsurfUpright,
    Gsurf,
    GsurfExtendedUpright,
    GsurfExtended,
}

impl DescriptorKind {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(DescriptorKind::SurfUpright),
            1 => Some(DescriptorKind::Surf),
            2 => Some(DescriptorKind::SurfExtendedUpright),
            3 => Some(DescriptorKind::SurfExtended),
            4 => Some(DescriptorKind::MsurfUpright),
            5 => Some(DescriptorKind::Msurf),
            6 => Some(DescriptorKind::MsurfExtendedUpright),
            7 => Some(DescriptorKind::MsurfExtended),
            8 => Some(DescriptorKind::GsurfUpright),
            9 => Some(DescriptorKind::Gsurf),
            10 => Some(DescriptorKind::GsurfExtendedUpright),
            11 => Some(DescriptorKind::GsurfExtended),
            _ => None,
        }
    }

    /// Whether the descriptor skips orientation estimation.
    pub fn upright(self) -> bool {
        matches!(
            self,
            DescriptorKind::SurfUpright
                | DescriptorKind::SurfExtendedUpright
                | DescriptorKind::MsurfUpright
                | DescriptorKind::MsurfExtendedUpright
                | DescriptorKind::GsurfUpright
                | DescriptorKind::GsurfExtendedUpright
        )
    }

    /// Whether the descriptor uses the extended (double) length.
    pub fn extended(self) -> bool {
        matches!(
            self,
            DescriptorKind::SurfExtendedUpright
                | DescriptorKind::SurfExtended
                | DescriptorKind::MsurfExtendedUpright
                | DescriptorKind::MsurfExtended
                | DescriptorKind::GsurfExtendedUpright
                | DescriptorKind::GsurfExtended
        )
    }
}

/// What to do with a `descriptor` code outside the valid 0..=11 range.
///
/// The historical wrapper contained a bounds check resetting such codes
/// to M-SURF, but it sat after an unconditional continue and never ran.
/// Both readings are available; [`ClampToMsurf`](Self::ClampToMsurf) is
/// what the parser uses by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptorRangePolicy {
    /// Reset out-of-range codes to [`DescriptorKind::Msurf`].
    #[default]
    ClampToMsurf,
    /// Ignore out-of-range codes, keeping whatever kind is already set.
    Ignore,
}

/// Contains the configuration parameters of the KAZE pipeline.
///
/// One record is built per invocation: the parser fills it from the
/// name,value pairs, the ingestor records the image dimensions, and the
/// extractor consumes it read-only. Nothing survives the call.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KazeOptions {
    /// Base scale offset (sigma units)
    pub base_scale_offset: f64,

    /// Maximum octave evolution of the image
    pub max_octave_evolution: u32,

    /// Number of sublevels per octave
    pub num_sublevels: u32,

    /// Diffusivity function for the nonlinear scale space
    pub diffusivity: Diffusivity,

    /// Detector response threshold to accept a point
    pub detector_threshold: f64,

    /// Smoothing factor for the derivatives
    pub derivative_smoothing: f64,

    /// Descriptor variant to compute
    pub descriptor: DescriptorKind,

    /// Print calculation times and point counts
    pub verbose: bool,

    /// Store the scale-space images as they are built
    pub save_scale_space: bool,

    /// Width of the ingested image, recorded by the ingestor
    pub image_width: usize,

    /// Height of the ingested image, recorded by the ingestor
    pub image_height: usize,
}

impl Default for KazeOptions {
    fn default() -> KazeOptions {
        KazeOptions {
            base_scale_offset: 1.6,
            max_octave_evolution: 4,
            num_sublevels: 4,
            diffusivity: Diffusivity::PmG2,
            detector_threshold: 0.001,
            derivative_smoothing: 1.0,
            descriptor: DescriptorKind::Msurf,
            verbose: false,
            save_scale_space: false,
            image_width: 0,
            image_height: 0,
        }
    }
}

impl KazeOptions {
    /// Parse the arguments after the image as strict (name, value) pairs
    /// with the default [`DescriptorRangePolicy`].
    ///
    /// The caller has already verified that `args` has even length; the
    /// arity check belongs to the entry point.
    pub fn parse_pairs(args: &[HostValue]) -> Result<Self, Error> {
        Self::parse_pairs_with_policy(args, DescriptorRangePolicy::default())
    }

    /// Like [`parse_pairs`](Self::parse_pairs) with an explicit policy
    /// for out-of-range descriptor codes.
    pub fn parse_pairs_with_policy(
        args: &[HostValue],
        policy: DescriptorRangePolicy,
    ) -> Result<Self, Error> {
        debug_assert!(args.len() % 2 == 0, "arity is validated by the caller");
        let mut options = Self::default();
        for pair in args.chunks_exact(2) {
            let name = pair[0].as_text().ok_or(Error::BadParamType)?;
            let value = pair[1].numeric_scalar().ok_or(Error::BadParamType)?;
            match name {
                "soffset" => options.base_scale_offset = value,
                "omax" => options.max_octave_evolution = value as u32,
                "nsublevels" => options.num_sublevels = value as u32,
                // An out-of-range diffusivity code went unchecked in the
                // historical wrapper; here it falls back to the default.
                "diffusivity" => {
                    options.diffusivity =
                        Diffusivity::from_code(value as i64).unwrap_or_default()
                }
                "dthreshold" => options.detector_threshold = value,
                "sderivatives" => options.derivative_smoothing = value,
                "descriptor" => match DescriptorKind::from_code(value as i64) {
                    Some(kind) => options.descriptor = kind,
                    None => {
                        if policy == DescriptorRangePolicy::ClampToMsurf {
                            options.descriptor = DescriptorKind::Msurf;
                        }
                    }
                },
                "verbose" => options.verbose = value != 0.0,
                "save_scale_space" => options.save_scale_space = value != 0.0,
                unknown => return Err(Error::BadParamName(unknown.to_string())),
            }
        }
        Ok(options)
    }
}
