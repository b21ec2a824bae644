//! # zenexr
//!
//! Scanline EXR encode core: turn an interleaved RGBA f32 buffer into a
//! compressed scanline container, entirely in memory.
//!
//! The compression itself (DWAA/DWAB/ZIP/...), the container header
//! schema, and half-float quantization live in a backend implementing
//! [`ScanlineCodec`]. This crate supplies everything around it:
//!
//! - [`GrowableSink`] — an offset-addressed byte sink with geometric
//!   growth, accumulating output whose final size is unknown up front
//! - [`ChannelView`] — per-chunk stride-based extraction of one
//!   channel's plane from the interleaved source, without copying
//! - the chunk encode driver — one row-band at a time, one backend
//!   encoder live at a time, released on every exit path
//! - [`EncodeRequest`] — validation, session configuration, channel
//!   declarations, and the final exact-size snapshot
//!
//! ## Non-Goals
//!
//! - Decoding
//! - Tiled or deep storage — scanline only
//! - Channel layouts beyond R, G, B and optional A
//! - Streaming to caller-provided sinks (output is always one `Vec<u8>`)
//!
//! ## Usage
//!
//! ```no_run
//! use zenexr::{Compression, EncodeRequest, ExrError, ScanlineCodec};
//!
//! fn demo(codec: &mut impl ScanlineCodec, pixels: &[f32]) -> Result<(), ExrError> {
//!     // pixels: interleaved RGBA f32, row-major, width*height*4 samples
//!     let bytes = EncodeRequest::new(Compression::Dwaa)
//!         .quality(45)
//!         .alpha(true)
//!         .encode(codec, pixels, 1920, 1080)?;
//!     assert!(!bytes.is_empty());
//!     Ok(())
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod chunks;
mod codec;
mod encode;
mod error;
mod limits;
mod pixel;
mod plane;
mod sink;

// Re-exports
pub use codec::{
    ChannelDecl, ChunkEncoder, Compression, LineOrder, OutputSession, ScanlineCodec,
    SessionOptions,
};
pub use encode::EncodeRequest;
pub use error::ExrError;
pub use limits::Limits;
pub use pixel::{ChannelTag, Perceptual, PixelType, SAMPLES_PER_PIXEL};
pub use plane::{ChannelView, channel_view};
pub use sink::{GrowableSink, SinkError, WriteAt};
