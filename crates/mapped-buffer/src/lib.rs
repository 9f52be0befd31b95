//! Absolute, index-addressed byte access over flat or segmented buffers.
//!
//! This crate lets parsers, record stores and columnar readers read and write
//! fixed-width primitives and byte ranges at arbitrary 64-bit offsets without
//! caring whether the bytes live in one contiguous region or in an ordered
//! table of fixed-size segments, such as the mappings of a file too large to
//! map in one piece.
//!
//! - [`FlatBuffer`]: one contiguous region
//! - [`SegmentedBuffer`]: a [`SegmentTable`] of equal-size segments (the last
//!   may be shorter); values that straddle a segment boundary are split and
//!   stitched back together transparently
//! - [`Relocated`]: a zero-copy view starting at a base offset of another
//!   buffer
//!
//! All three implement [`BufferFacade`]. Byte order is fixed when the buffer
//! is built.
//!
//! # Concurrency
//!
//! Operations are synchronous, bounded memory copies and never block.
//! Writes need `&mut` access, so safe Rust code cannot race a reader against
//! a writer within one process. Boundary-crossing writes are applied one
//! segment at a time in increasing segment order and are not atomic: another
//! process sharing the same file mapping can observe a torn value. Callers
//! that need atomic cross-boundary updates must serialize access externally.
//!
//! # Slices
//!
//! [`BufferFacade::slice`] behaves differently per backing kind. A flat
//! buffer slices to the end of the buffer; a segmented buffer slices to the
//! end of the segment holding the index. Callers must not assume a slice
//! extends beyond one segment.
//!
//! # Example
//!
//! ```rust
//! use mapped_buffer::{BufferFacade, ByteOrder, SegmentedBuffer};
//!
//! # fn main() -> mapped_buffer::Result<()> {
//! let segments = vec![vec![0u8; 8], vec![0u8; 8], vec![0u8; 4]];
//! let mut buffer = SegmentedBuffer::new(segments, 8, ByteOrder::BigEndian)?;
//! assert_eq!(buffer.capacity(), 20);
//!
//! // Bytes 01 02 land at the tail of segment 0, 03 04 at the head of segment 1.
//! buffer.put_i32(6, 0x0102_0304)?;
//! assert_eq!(buffer.get_i32(6)?, 0x0102_0304);
//! assert_eq!(buffer.get_bytes(6, 4)?, vec![0x01, 0x02, 0x03, 0x04]);
//!
//! // The slice stops at the end of segment 1.
//! assert_eq!(buffer.slice(10)?.len(), 6);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod error;
pub mod facade;
pub mod flat;
pub mod relocated;
pub mod segment;
pub mod segmented;
pub mod table;

pub use config::{BufferConfig, ByteOrder, DEFAULT_SEGMENT_CAPACITY};
pub use error::{BufferError, Result};
pub use facade::BufferFacade;
pub use flat::FlatBuffer;
pub use relocated::Relocated;
pub use segment::Segment;
pub use segmented::SegmentedBuffer;
pub use table::{Location, SegmentTable, Span, Spans};
