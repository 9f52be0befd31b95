//! Buffer facade over a segment table.
//!
//! Accesses that fit inside one segment are served directly from it. Accesses
//! that straddle a boundary are decomposed into per-segment spans: reads are
//! stitched together in logical order before decoding, writes are encoded
//! first and then distributed across segments in increasing segment order.

use crate::config::{BufferConfig, ByteOrder};
use crate::error::{BufferError, Result, check_range};
use crate::facade::BufferFacade;
use crate::segment::Segment;
use crate::table::SegmentTable;
use tracing::trace;

/// A buffer made of fixed-capacity segments, such as the mappings of a file
/// too large for a single mapping.
#[derive(Debug)]
pub struct SegmentedBuffer<S> {
    table: SegmentTable<S>,
    byte_order: ByteOrder,
}

impl<S: Segment> SegmentedBuffer<S> {
    /// Build a buffer from segments of `segment_capacity` bytes each (the last
    /// may be shorter).
    ///
    /// # Errors
    ///
    /// Returns `BackingUnavailable` if the segments do not form a valid table.
    pub fn new(segments: Vec<S>, segment_capacity: usize, byte_order: ByteOrder) -> Result<Self> {
        Ok(Self::from_table(
            SegmentTable::new(segments, segment_capacity)?,
            byte_order,
        ))
    }

    /// Build a buffer, taking the per-segment capacity from the first segment.
    pub fn from_segments(segments: Vec<S>, byte_order: ByteOrder) -> Result<Self> {
        Ok(Self::from_table(
            SegmentTable::from_segments(segments)?,
            byte_order,
        ))
    }

    /// Build a buffer using the byte order and segment capacity in `config`.
    pub fn with_config(segments: Vec<S>, config: &BufferConfig) -> Result<Self> {
        Self::new(segments, config.segment_capacity, config.byte_order)
    }

    /// Wrap an already validated segment table.
    pub fn from_table(table: SegmentTable<S>, byte_order: ByteOrder) -> Self {
        Self { table, byte_order }
    }

    /// The underlying segment table.
    pub fn table(&self) -> &SegmentTable<S> {
        &self.table
    }

    /// Release the segment table, e.g. to flush or unmap the segments.
    pub fn into_table(self) -> SegmentTable<S> {
        self.table
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.table.segment_count()
    }

    /// Per-segment capacity.
    pub fn segment_capacity(&self) -> usize {
        self.table.segment_capacity()
    }
}

impl SegmentedBuffer<Vec<u8>> {
    /// Allocate a zero-filled in-memory buffer of `capacity` bytes, split into
    /// segments as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `BackingUnavailable` for a zero capacity, a zero segment
    /// capacity, or a segment count that does not fit in memory.
    pub fn allocate(capacity: u64, config: &BufferConfig) -> Result<Self> {
        let segment_capacity = config.segment_capacity;
        if segment_capacity == 0 {
            return Err(BufferError::BackingUnavailable(
                "segment capacity must be non-zero".to_string(),
            ));
        }

        let segment_size = segment_capacity as u64;
        let full = usize::try_from(capacity / segment_size).map_err(|_| {
            BufferError::BackingUnavailable(format!(
                "{capacity} bytes needs too many segments of {segment_capacity} bytes"
            ))
        })?;
        let tail = (capacity % segment_size) as usize;

        let mut segments = Vec::with_capacity(full + usize::from(tail > 0));
        segments.extend((0..full).map(|_| vec![0u8; segment_capacity]));
        if tail > 0 {
            segments.push(vec![0u8; tail]);
        }

        Self::with_config(segments, config)
    }
}

impl<S: Segment> BufferFacade for SegmentedBuffer<S> {
    fn capacity(&self) -> u64 {
        self.table.capacity()
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn is_writable(&self) -> bool {
        self.table.is_writable()
    }

    fn read_into(&self, index: u64, dst: &mut [u8]) -> Result<()> {
        let spans = self.table.spans(index, dst.len())?;

        if spans.crosses_boundary() {
            trace!(
                "Read of {} bytes at {} spans {} segments",
                dst.len(),
                index,
                spans.len()
            );
        }

        let mut filled = 0;
        for span in spans {
            let src = &self.table.segment_bytes(span.segment)[span.offset..span.end()];
            dst[filled..filled + span.len].copy_from_slice(src);
            filled += span.len;
        }

        Ok(())
    }

    fn put_bytes(&mut self, index: u64, src: &[u8]) -> Result<()> {
        // Validate before touching any segment so a failed write leaves
        // nothing behind.
        let spans = self.table.spans(index, src.len())?;
        if !self.table.is_writable() {
            return Err(BufferError::ReadOnly);
        }
        for span in spans.clone() {
            self.table.segment_bytes_mut(span.segment)?;
        }

        if spans.crosses_boundary() {
            trace!(
                "Write of {} bytes at {} spans {} segments",
                src.len(),
                index,
                spans.len()
            );
        }

        let mut consumed = 0;
        for span in spans {
            let dst = &mut self.table.segment_bytes_mut(span.segment)?[span.offset..span.end()];
            dst.copy_from_slice(&src[consumed..consumed + span.len]);
            consumed += span.len;
        }

        Ok(())
    }

    fn slice(&self, index: u64) -> Result<&[u8]> {
        if index == self.table.capacity() {
            return Ok(&[]);
        }
        let location = self.table.locate(index)?;
        Ok(&self.table.segment_bytes(location.segment)[location.offset..])
    }

    fn slice_mut(&mut self, index: u64) -> Result<&mut [u8]> {
        check_range(index, 0, self.table.capacity())?;
        if !self.table.is_writable() {
            return Err(BufferError::ReadOnly);
        }
        if index == self.table.capacity() {
            return Ok(&mut []);
        }
        let location = self.table.locate(index)?;
        Ok(&mut self.table.segment_bytes_mut(location.segment)?[location.offset..])
    }
}
