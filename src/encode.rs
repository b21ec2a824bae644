//! Top-level encode orchestration.

use alloc::vec::Vec;

use crate::chunks;
use crate::codec::{
    ChannelDecl, Compression, LineOrder, OutputSession, ScanlineCodec, SessionOptions,
};
use crate::error::ExrError;
use crate::limits::Limits;
use crate::pixel::{ChannelTag, Perceptual, PixelType, SAMPLES_PER_PIXEL};
use crate::sink::GrowableSink;

/// Default quality level for lossy band compression.
const DEFAULT_QUALITY: i32 = 45;

/// Encode an interleaved RGBA f32 buffer into a scanline container.
///
/// Builder-style request carrying everything except the pixels: the
/// compression kind, its quality level, whether to declare an alpha
/// channel, and resource limits.
#[derive(Clone, Debug)]
pub struct EncodeRequest {
    compression: Compression,
    quality: i32,
    include_alpha: bool,
    limits: Limits,
}

impl EncodeRequest {
    /// New request for the given compression kind.
    ///
    /// Integer selectors from an external boundary go through
    /// [`Compression::from_code`], which normalizes unknown values to
    /// the default lossy band compression.
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            quality: DEFAULT_QUALITY,
            include_alpha: true,
            limits: Limits::default(),
        }
    }

    /// Quality level for quality-parameterized kinds; ignored otherwise.
    pub fn quality(mut self, quality: i32) -> Self {
        self.quality = quality;
        self
    }

    /// Whether to declare an alpha channel (default true).
    pub fn alpha(mut self, include_alpha: bool) -> Self {
        self.include_alpha = include_alpha;
        self
    }

    /// Apply resource limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Encode `pixels` (interleaved RGBA f32, row-major, at least
    /// `width * height * 4` samples) through `codec`, returning the
    /// complete container as one exact-size buffer.
    ///
    /// Validation happens before any allocation; on failure at any later
    /// stage the open session is aborted, the sink released, and no
    /// partial buffer is returned.
    pub fn encode<C: ScanlineCodec>(
        &self,
        codec: &mut C,
        pixels: &[f32],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ExrError> {
        if width == 0 || height == 0 {
            return Err(ExrError::InvalidDimensions { width, height });
        }
        self.limits.check(width, height)?;
        let needed = (width as usize)
            .checked_mul(height as usize)
            .and_then(|wh| wh.checked_mul(SAMPLES_PER_PIXEL))
            .ok_or(ExrError::DimensionsTooLarge { width, height })?;
        if pixels.len() < needed {
            return Err(ExrError::BufferTooSmall {
                needed,
                actual: pixels.len(),
            });
        }

        let mut sink = match self.limits.max_memory_bytes {
            Some(max) => GrowableSink::with_max_bytes(max),
            None => GrowableSink::new(),
        };

        let options = SessionOptions {
            quality: self.quality as f32,
        };
        let mut session = codec.open(&mut sink, options).map_err(ExrError::codec)?;
        session.add_scanline_part("main").map_err(ExrError::codec)?;
        session
            .init_attributes(width, height, self.compression)
            .map_err(ExrError::codec)?;
        session
            .set_line_order(LineOrder::IncreasingY)
            .map_err(ExrError::codec)?;
        if self.compression.takes_quality_level() {
            session
                .set_quality(self.quality as f32)
                .map_err(ExrError::codec)?;
        }
        for tag in [ChannelTag::R, ChannelTag::G, ChannelTag::B] {
            session
                .declare_channel(ChannelDecl {
                    tag,
                    pixel_type: PixelType::Half,
                    perceptual: Perceptual::Logarithmic,
                })
                .map_err(ExrError::codec)?;
        }
        if self.include_alpha {
            session
                .declare_channel(ChannelDecl {
                    tag: ChannelTag::A,
                    pixel_type: PixelType::Half,
                    perceptual: Perceptual::Linear,
                })
                .map_err(ExrError::codec)?;
        }
        session.write_header().map_err(ExrError::codec)?;

        chunks::encode_chunks(&mut session, pixels, width, height)?;

        session.finish().map_err(ExrError::codec)?;
        Ok(sink.into_vec())
    }

    /// Encode a typed RGBA f32 image.
    #[cfg(feature = "imgref")]
    pub fn encode_rgba_f32<C: ScanlineCodec>(
        &self,
        codec: &mut C,
        img: imgref::ImgRef<'_, rgb::Rgba<f32>>,
    ) -> Result<Vec<u8>, ExrError> {
        use rgb::ComponentSlice as _;

        let (buf, width, height) = img.to_contiguous_buf();
        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => self.encode(codec, buf.as_slice(), w, h),
            _ => Err(ExrError::DimensionsTooLarge {
                width: width.try_into().unwrap_or(u32::MAX),
                height: height.try_into().unwrap_or(u32::MAX),
            }),
        }
    }
}
