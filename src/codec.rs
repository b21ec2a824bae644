//! Compression backend contract.
//!
//! The encode core never compresses anything itself — it drives a
//! backend (the entropy/transform codec plus container writer) through
//! the narrow interface here. A backend receives the sink's [`WriteAt`]
//! hook when a session opens and owns every byte of on-disk layout;
//! the core owns memory, chunk iteration, and channel-plane extraction.

use crate::pixel::{ChannelTag, Perceptual, PixelType};
use crate::plane::ChannelView;
use crate::sink::WriteAt;

/// Compression kind of the scanline container.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Uncompressed,
    /// Run-length encoding.
    Rle,
    /// Deflate, one scanline per chunk.
    Zips,
    /// Deflate over multi-scanline chunks.
    Zip,
    /// Wavelet + Huffman.
    Piz,
    /// Lossy 24-bit float conversion, then deflate.
    Pxr24,
    /// Lossy 4x4 block packing.
    B44,
    /// B44 with flat-block shortcut.
    B44a,
    /// Lossy DCT band compression, 32-scanline chunks.
    Dwaa,
    /// Lossy DCT band compression, 256-scanline chunks.
    Dwab,
}

impl Compression {
    /// Resolve an external integer selector.
    ///
    /// Any value outside the known enumeration falls back to [`Dwaa`],
    /// the default lossy band compression — never an error.
    ///
    /// [`Dwaa`]: Compression::Dwaa
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Uncompressed,
            1 => Self::Rle,
            2 => Self::Zips,
            3 => Self::Zip,
            4 => Self::Piz,
            5 => Self::Pxr24,
            6 => Self::B44,
            7 => Self::B44a,
            8 => Self::Dwaa,
            9 => Self::Dwab,
            _ => Self::Dwaa,
        }
    }

    /// The integer selector for this kind.
    pub fn code(self) -> i32 {
        match self {
            Self::Uncompressed => 0,
            Self::Rle => 1,
            Self::Zips => 2,
            Self::Zip => 3,
            Self::Piz => 4,
            Self::Pxr24 => 5,
            Self::B44 => 6,
            Self::B44a => 7,
            Self::Dwaa => 8,
            Self::Dwab => 9,
        }
    }

    /// Whether this kind is parameterized by a quality level.
    pub fn takes_quality_level(self) -> bool {
        matches!(self, Self::Dwaa | Self::Dwab)
    }
}

/// Scanline ordering in the output stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOrder {
    IncreasingY,
    DecreasingY,
}

/// One channel declaration for the output part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelDecl {
    pub tag: ChannelTag,
    /// On-disk element type (the source is always f32).
    pub pixel_type: PixelType,
    pub perceptual: Perceptual,
}

/// Session-wide options passed when opening an output session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionOptions {
    /// Quality for lossy band compression; ignored by other kinds.
    pub quality: f32,
}

/// A compression backend able to open scanline output sessions.
pub trait ScanlineCodec {
    /// Backend error type, surfaced through [`ExrError::Codec`].
    ///
    /// [`ExrError::Codec`]: crate::ExrError::Codec
    type Error: core::error::Error + Send + Sync + 'static;

    /// Per-encode output session, borrowing the codec and the sink.
    type Session<'a>: OutputSession<Error = Self::Error>
    where
        Self: 'a;

    /// Open an output session that reports every produced byte range
    /// through `sink`.
    fn open<'a>(
        &'a mut self,
        sink: &'a mut dyn WriteAt,
        options: SessionOptions,
    ) -> Result<Self::Session<'a>, Self::Error>;
}

/// One open output stream: header configuration, chunk placement, and
/// per-chunk encoders.
///
/// Configuration calls must precede [`write_header`]; chunk calls must
/// follow it. Dropping a session that was not [`finish`]ed aborts the
/// stream — nothing further is written.
///
/// [`write_header`]: OutputSession::write_header
/// [`finish`]: OutputSession::finish
pub trait OutputSession {
    /// Backend error type.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Opaque placement of one row-band in the output stream. Requested
    /// fresh per row-band, never reused or mutated by the core.
    type Chunk;

    /// Per-chunk encoder: `'s` borrows the session, `'p` the pixels.
    type Encoder<'s, 'p>: ChunkEncoder<'p, Error = Self::Error>
    where
        Self: 's;

    /// Create the single scanline part of the stream.
    fn add_scanline_part(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Set the required attributes: data window and compression kind.
    fn init_attributes(
        &mut self,
        width: u32,
        height: u32,
        compression: Compression,
    ) -> Result<(), Self::Error>;

    /// Set the scanline ordering.
    fn set_line_order(&mut self, order: LineOrder) -> Result<(), Self::Error>;

    /// Set the quality level for quality-parameterized kinds.
    fn set_quality(&mut self, level: f32) -> Result<(), Self::Error>;

    /// Declare one output channel.
    fn declare_channel(&mut self, decl: ChannelDecl) -> Result<(), Self::Error>;

    /// Serialize the header into the sink.
    fn write_header(&mut self) -> Result<(), Self::Error>;

    /// Scanlines per chunk chosen by the backend. Meaningful once the
    /// header is written; the driver treats non-positive values as
    /// unspecified and falls back to its own default.
    fn scanlines_per_chunk(&self) -> i32;

    /// Compute placement for the row-band starting at `start_row`. The
    /// final band may cover fewer rows than the chunk height.
    fn chunk_info(&mut self, start_row: u32) -> Result<Self::Chunk, Self::Error>;

    /// Begin encoding one chunk. At most one encoder is live at a time;
    /// it must be dropped before the next chunk begins.
    fn begin_chunk<'s, 'p>(
        &'s mut self,
        chunk: &Self::Chunk,
    ) -> Result<Self::Encoder<'s, 'p>, Self::Error>;

    /// Finalize the stream. Consuming; a dropped-without-finish session
    /// is an abort.
    fn finish(self) -> Result<(), Self::Error>;
}

/// Encoder for a single row-band, bound to one chunk placement.
///
/// Dropping the encoder releases the backend's per-chunk working state.
/// The core drops it on every exit path, success or failure, before the
/// next chunk begins.
pub trait ChunkEncoder<'p> {
    /// Backend error type.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Number of channels this chunk expects bound.
    fn channel_count(&self) -> usize;

    /// Identity of channel `index`, in binding order.
    fn channel_tag(&self, index: usize) -> ChannelTag;

    /// Bind the source plane for channel `index`.
    fn bind_plane(&mut self, index: usize, plane: ChannelView<'p>) -> Result<(), Self::Error>;

    /// Select the backend's transform/compression routines for the
    /// bound channel set.
    fn choose_routines(&mut self) -> Result<(), Self::Error>;

    /// Compress the bound planes and write the chunk to the sink.
    fn run(&mut self) -> Result<(), Self::Error>;
}
