/// Samples per interleaved pixel: R, G, B, A.
pub const SAMPLES_PER_PIXEL: usize = 4;

/// Identity of one channel in the interleaved RGBA source buffer.
///
/// Carried as data from declaration through chunk binding — channel
/// identity is never re-derived from the on-disk name string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelTag {
    R,
    G,
    B,
    A,
}

impl ChannelTag {
    /// Sample offset of this channel within one interleaved RGBA pixel.
    pub fn interleave_offset(self) -> usize {
        match self {
            Self::R => 0,
            Self::G => 1,
            Self::B => 2,
            Self::A => 3,
        }
    }

    /// On-disk channel name.
    pub fn name(self) -> &'static str {
        match self {
            Self::R => "R",
            Self::G => "G",
            Self::B => "B",
            Self::A => "A",
        }
    }
}

/// On-disk element type declared for a channel.
///
/// The source buffer is always 32-bit float; conversion to the declared
/// type is the compression backend's job.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelType {
    /// 16-bit half-precision float.
    Half,
    /// 32-bit float.
    Float,
    /// 32-bit unsigned integer.
    Uint,
}

impl PixelType {
    /// On-disk bytes per element.
    pub fn bytes_per_element(&self) -> usize {
        match self {
            Self::Half => 2,
            Self::Float | Self::Uint => 4,
        }
    }
}

/// Hint about how a channel's values are distributed.
///
/// Consumed by lossy band compression when choosing quantization; does
/// not alter the stored values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Perceptual {
    /// Values are perceived logarithmically (color channels).
    Logarithmic,
    /// Values are perceived linearly (alpha, data channels).
    Linear,
}
