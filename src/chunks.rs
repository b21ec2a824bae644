//! Chunk encode driver.
//!
//! Walks the image one row-band at a time in increasing row order. Per
//! band: request the chunk placement, begin a fresh encoder, bind every
//! channel the backend enumerates through the plane locator, let the
//! backend choose its routines, run it. The encoder is dropped on every
//! exit path before the next band begins — exactly one is live at a
//! time.

use crate::codec::{ChunkEncoder, OutputSession};
use crate::error::ExrError;
use crate::plane::channel_view;

/// Fallback band height when the backend reports a non-positive value.
pub(crate) const DEFAULT_SCANLINES_PER_CHUNK: u32 = 32;

pub(crate) fn encode_chunks<S: OutputSession>(
    session: &mut S,
    pixels: &[f32],
    width: u32,
    height: u32,
) -> Result<(), ExrError> {
    let declared = session.scanlines_per_chunk();
    let rows_per_chunk = if declared > 0 {
        declared as u32
    } else {
        DEFAULT_SCANLINES_PER_CHUNK
    };

    let mut start_row = 0u32;
    while start_row < height {
        let chunk = session.chunk_info(start_row).map_err(ExrError::codec)?;
        let mut encoder = session.begin_chunk(&chunk).map_err(ExrError::codec)?;
        // A backend may enumerate zero channels for a band; the chunk
        // still runs with nothing bound.
        for index in 0..encoder.channel_count() {
            let tag = encoder.channel_tag(index);
            encoder
                .bind_plane(index, channel_view(pixels, width, start_row, tag))
                .map_err(ExrError::codec)?;
        }
        encoder.choose_routines().map_err(ExrError::codec)?;
        encoder.run().map_err(ExrError::codec)?;
        start_row = start_row.saturating_add(rows_per_chunk);
    }
    Ok(())
}
