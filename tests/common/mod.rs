//! Scripted compression backend shared by the integration tests.
//!
//! [`ToyCodec`] implements the backend contract with a tiny
//! self-describing container so tests can parse the output back —
//! "compression" is nothing more than f32 → f16 conversion. Every
//! contract call is recorded in order, and the codec can be told to
//! fail at any single stage.
#![allow(dead_code)]

use zenexr::{
    ChannelDecl, ChannelTag, ChannelView, ChunkEncoder, Compression, LineOrder, OutputSession,
    Perceptual, PixelType, ScanlineCodec, SessionOptions, SinkError, WriteAt,
};

/// Container layout (all integers little endian):
///
/// header, at offset 0:
///   magic "zxr1" | width u32 | height u32 | compression u8 | quality f32
///   | line order u8 (0 = increasing) | part name len u8 + bytes
///   | channel count u8 | per channel: tag u8, pixel type u8, perceptual u8
///
/// per chunk, at monotonically increasing offsets:
///   start_row u32 | rows u32 | per channel: tag u8, rows*width f16 samples
pub const MAGIC: &[u8; 4] = b"zxr1";

/// Stage at which the scripted codec fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailAt {
    Open,
    AddPart,
    InitAttributes,
    SetLineOrder,
    SetQuality,
    DeclareChannel,
    WriteHeader,
    ChunkInfo,
    BeginChunk,
    BindPlane,
    ChooseRoutines,
    Run,
    Finish,
}

/// Everything the codec was asked to do, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Open {
        quality: f32,
    },
    AddPart(String),
    InitAttributes {
        width: u32,
        height: u32,
        compression: Compression,
    },
    SetLineOrder(LineOrder),
    SetQuality(f32),
    DeclareChannel(ChannelDecl),
    WriteHeader,
    ChunkInfo {
        start_row: u32,
    },
    BeginChunk {
        start_row: u32,
    },
    BindPlane {
        start_row: u32,
        tag: ChannelTag,
    },
    ChooseRoutines {
        start_row: u32,
    },
    Run {
        start_row: u32,
    },
    EncoderReleased {
        start_row: u32,
    },
    Finish,
    SessionReleased,
}

#[derive(Debug, thiserror::Error)]
pub enum ToyError {
    #[error("scripted failure at {0:?}")]
    Scripted(FailAt),
    #[error("channel {0} was never bound")]
    Unbound(usize),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Scripted backend: records every call and writes the toy container.
#[derive(Debug, Default)]
pub struct ToyCodec {
    /// Chunk height reported after the header; non-positive means
    /// "let the driver pick its own".
    pub scanlines_per_chunk: i32,
    /// Fail (once reached) at this stage.
    pub fail_at: Option<FailAt>,
    /// Pretend no channels need binding for any chunk.
    pub enumerate_zero_channels: bool,
    pub events: Vec<Event>,
}

impl ToyCodec {
    pub fn new(scanlines_per_chunk: i32) -> Self {
        Self {
            scanlines_per_chunk,
            ..Self::default()
        }
    }

    pub fn failing_at(scanlines_per_chunk: i32, stage: FailAt) -> Self {
        Self {
            scanlines_per_chunk,
            fail_at: Some(stage),
            ..Self::default()
        }
    }

    /// Start rows of all chunk-info requests, in order.
    pub fn chunk_requests(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::ChunkInfo { start_row } => Some(*start_row),
                _ => None,
            })
            .collect()
    }

    /// All channel declarations, in order.
    pub fn declared_channels(&self) -> Vec<ChannelDecl> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::DeclareChannel(decl) => Some(*decl),
                _ => None,
            })
            .collect()
    }
}

impl ScanlineCodec for ToyCodec {
    type Error = ToyError;
    type Session<'a>
        = ToySession<'a>
    where
        Self: 'a;

    fn open<'a>(
        &'a mut self,
        sink: &'a mut dyn WriteAt,
        options: SessionOptions,
    ) -> Result<ToySession<'a>, ToyError> {
        self.events.push(Event::Open {
            quality: options.quality,
        });
        if self.fail_at == Some(FailAt::Open) {
            return Err(ToyError::Scripted(FailAt::Open));
        }
        Ok(ToySession {
            codec: self,
            sink,
            width: 0,
            height: 0,
            compression: Compression::Dwaa,
            quality: options.quality,
            line_order: LineOrder::IncreasingY,
            part_name: String::new(),
            channels: Vec::new(),
            next_offset: 0,
        })
    }
}

pub struct ToySession<'a> {
    codec: &'a mut ToyCodec,
    sink: &'a mut dyn WriteAt,
    width: u32,
    height: u32,
    compression: Compression,
    quality: f32,
    line_order: LineOrder,
    part_name: String,
    channels: Vec<ChannelDecl>,
    next_offset: u64,
}

impl ToySession<'_> {
    fn record(&mut self, event: Event) {
        self.codec.events.push(event);
    }

    fn hit(&mut self, stage: FailAt) -> Result<(), ToyError> {
        if self.codec.fail_at == Some(stage) {
            Err(ToyError::Scripted(stage))
        } else {
            Ok(())
        }
    }

    fn rows_per_band(&self) -> u32 {
        if self.codec.scanlines_per_chunk > 0 {
            self.codec.scanlines_per_chunk as u32
        } else {
            32
        }
    }
}

impl Drop for ToySession<'_> {
    fn drop(&mut self) {
        self.codec.events.push(Event::SessionReleased);
    }
}

impl<'a> OutputSession for ToySession<'a> {
    type Error = ToyError;
    type Chunk = ToyChunk;
    type Encoder<'s, 'p>
        = ToyEncoder<'s, 'a, 'p>
    where
        Self: 's;

    fn add_scanline_part(&mut self, name: &str) -> Result<(), ToyError> {
        self.record(Event::AddPart(name.to_owned()));
        self.hit(FailAt::AddPart)?;
        self.part_name = name.to_owned();
        Ok(())
    }

    fn init_attributes(
        &mut self,
        width: u32,
        height: u32,
        compression: Compression,
    ) -> Result<(), ToyError> {
        self.record(Event::InitAttributes {
            width,
            height,
            compression,
        });
        self.hit(FailAt::InitAttributes)?;
        self.width = width;
        self.height = height;
        self.compression = compression;
        Ok(())
    }

    fn set_line_order(&mut self, order: LineOrder) -> Result<(), ToyError> {
        self.record(Event::SetLineOrder(order));
        self.hit(FailAt::SetLineOrder)?;
        self.line_order = order;
        Ok(())
    }

    fn set_quality(&mut self, level: f32) -> Result<(), ToyError> {
        self.record(Event::SetQuality(level));
        self.hit(FailAt::SetQuality)?;
        self.quality = level;
        Ok(())
    }

    fn declare_channel(&mut self, decl: ChannelDecl) -> Result<(), ToyError> {
        self.record(Event::DeclareChannel(decl));
        self.hit(FailAt::DeclareChannel)?;
        self.channels.push(decl);
        Ok(())
    }

    fn write_header(&mut self) -> Result<(), ToyError> {
        self.record(Event::WriteHeader);
        self.hit(FailAt::WriteHeader)?;
        let mut buf = Vec::new();
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&self.width.to_le_bytes());
        buf.extend_from_slice(&self.height.to_le_bytes());
        buf.push(self.compression.code() as u8);
        buf.extend_from_slice(&self.quality.to_le_bytes());
        buf.push(match self.line_order {
            LineOrder::IncreasingY => 0,
            LineOrder::DecreasingY => 1,
        });
        buf.push(self.part_name.len() as u8);
        buf.extend_from_slice(self.part_name.as_bytes());
        buf.push(self.channels.len() as u8);
        for decl in &self.channels {
            buf.push(decl.tag.interleave_offset() as u8);
            buf.push(match decl.pixel_type {
                PixelType::Half => 0,
                PixelType::Float => 1,
                _ => 2,
            });
            buf.push(match decl.perceptual {
                Perceptual::Logarithmic => 0,
                Perceptual::Linear => 1,
            });
        }
        self.sink.write_at(0, &buf)?;
        self.next_offset = buf.len() as u64;
        Ok(())
    }

    fn scanlines_per_chunk(&self) -> i32 {
        self.codec.scanlines_per_chunk
    }

    fn chunk_info(&mut self, start_row: u32) -> Result<ToyChunk, ToyError> {
        self.record(Event::ChunkInfo { start_row });
        self.hit(FailAt::ChunkInfo)?;
        let rows = self.rows_per_band().min(self.height - start_row);
        let channels = if self.codec.enumerate_zero_channels {
            0
        } else {
            self.channels.len() as u64
        };
        let bytes = 8 + channels * (1 + u64::from(rows) * u64::from(self.width) * 2);
        let chunk = ToyChunk {
            start_row,
            rows,
            offset: self.next_offset,
        };
        self.next_offset += bytes;
        Ok(chunk)
    }

    fn begin_chunk<'s, 'p>(
        &'s mut self,
        chunk: &ToyChunk,
    ) -> Result<ToyEncoder<'s, 'a, 'p>, ToyError> {
        self.record(Event::BeginChunk {
            start_row: chunk.start_row,
        });
        self.hit(FailAt::BeginChunk)?;
        let channels = if self.codec.enumerate_zero_channels {
            0
        } else {
            self.channels.len()
        };
        Ok(ToyEncoder {
            chunk: *chunk,
            planes: vec![None; channels],
            routines_chosen: false,
            session: self,
        })
    }

    fn finish(mut self) -> Result<(), ToyError> {
        self.record(Event::Finish);
        self.hit(FailAt::Finish)?;
        Ok(())
    }
}

/// Placement of one row-band in the toy container.
#[derive(Clone, Copy, Debug)]
pub struct ToyChunk {
    pub start_row: u32,
    pub rows: u32,
    pub offset: u64,
}

pub struct ToyEncoder<'s, 'a, 'p> {
    session: &'s mut ToySession<'a>,
    chunk: ToyChunk,
    planes: Vec<Option<ChannelView<'p>>>,
    routines_chosen: bool,
}

impl Drop for ToyEncoder<'_, '_, '_> {
    fn drop(&mut self) {
        let start_row = self.chunk.start_row;
        self.session.record(Event::EncoderReleased { start_row });
    }
}

impl<'p> ChunkEncoder<'p> for ToyEncoder<'_, '_, 'p> {
    type Error = ToyError;

    fn channel_count(&self) -> usize {
        self.planes.len()
    }

    fn channel_tag(&self, index: usize) -> ChannelTag {
        self.session.channels[index].tag
    }

    fn bind_plane(&mut self, index: usize, plane: ChannelView<'p>) -> Result<(), ToyError> {
        let start_row = self.chunk.start_row;
        self.session.record(Event::BindPlane {
            start_row,
            tag: plane.tag,
        });
        self.session.hit(FailAt::BindPlane)?;
        self.planes[index] = Some(plane);
        Ok(())
    }

    fn choose_routines(&mut self) -> Result<(), ToyError> {
        let start_row = self.chunk.start_row;
        self.session.record(Event::ChooseRoutines { start_row });
        self.session.hit(FailAt::ChooseRoutines)?;
        self.routines_chosen = true;
        Ok(())
    }

    fn run(&mut self) -> Result<(), ToyError> {
        let start_row = self.chunk.start_row;
        self.session.record(Event::Run { start_row });
        self.session.hit(FailAt::Run)?;
        assert!(self.routines_chosen, "run before choose_routines");
        let width = self.session.width as usize;
        let rows = self.chunk.rows as usize;
        let mut payload = Vec::with_capacity(8 + self.planes.len() * (1 + rows * width * 2));
        payload.extend_from_slice(&self.chunk.start_row.to_le_bytes());
        payload.extend_from_slice(&self.chunk.rows.to_le_bytes());
        for (index, plane) in self.planes.iter().enumerate() {
            let plane = plane.as_ref().ok_or(ToyError::Unbound(index))?;
            payload.push(plane.tag.interleave_offset() as u8);
            for row in 0..rows {
                for x in 0..width {
                    let sample = half::f16::from_f32(plane.sample(x, row));
                    payload.extend_from_slice(&sample.to_le_bytes());
                }
            }
        }
        self.session.sink.write_at(self.chunk.offset, &payload)?;
        Ok(())
    }
}
