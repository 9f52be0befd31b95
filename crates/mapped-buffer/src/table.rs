//! Segment table: index resolution over an ordered run of equal-size segments.
//!
//! A logical index `i` lives in segment `i / C` at local offset `i % C`,
//! where `C` is the per-segment capacity fixed at construction. Every segment
//! except the last holds exactly `C` bytes; the last holds between 1 and `C`.

use crate::error::{BufferError, Result, check_range};
use crate::segment::Segment;
use tracing::debug;

/// Position of a logical index within the segment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Ordinal of the segment holding the index
    pub segment: usize,
    /// Byte offset within that segment
    pub offset: usize,
}

/// Contiguous part of a logical range that falls inside one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Ordinal of the segment
    pub segment: usize,
    /// First byte within the segment
    pub offset: usize,
    /// Number of bytes
    pub len: usize,
}

impl Span {
    /// One past the last byte of the span within its segment.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Iterator over the per-segment spans of a logical range, in segment order.
///
/// Created by [`SegmentTable::spans`]; the range has already been checked
/// against the table capacity.
#[derive(Debug, Clone)]
pub struct Spans {
    segment: usize,
    offset: usize,
    remaining: usize,
    segment_capacity: usize,
}

impl Spans {
    /// Whether the remaining range touches more than one segment.
    pub const fn crosses_boundary(&self) -> bool {
        self.offset + self.remaining > self.segment_capacity
    }
}

impl Iterator for Spans {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        if self.remaining == 0 {
            return None;
        }

        let len = self.remaining.min(self.segment_capacity - self.offset);
        let span = Span {
            segment: self.segment,
            offset: self.offset,
            len,
        };

        self.remaining -= len;
        self.segment += 1;
        self.offset = 0;

        Some(span)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.remaining == 0 {
            return (0, Some(0));
        }
        let first = self.segment_capacity - self.offset;
        let count = if self.remaining <= first {
            1
        } else {
            1 + (self.remaining - first).div_ceil(self.segment_capacity)
        };
        (count, Some(count))
    }
}

impl ExactSizeIterator for Spans {}

/// Ordered sequence of segments plus the fixed per-segment capacity.
///
/// The layout is validated once at construction and never changes; segment
/// contents remain freely mutable.
#[derive(Debug)]
pub struct SegmentTable<S> {
    segments: Vec<S>,
    segment_capacity: usize,
    /// `log2(segment_capacity)` when the capacity is a power of two
    shift: Option<u32>,
    capacity: u64,
    writable: bool,
}

impl<S: Segment> SegmentTable<S> {
    /// Build a table from segments of the given per-segment capacity.
    ///
    /// # Errors
    ///
    /// Returns `BackingUnavailable` if there are no segments, the capacity is
    /// zero, any segment but the last differs from `segment_capacity`, or the
    /// last segment is empty or larger than `segment_capacity`.
    pub fn new(segments: Vec<S>, segment_capacity: usize) -> Result<Self> {
        if segment_capacity == 0 {
            return Err(BufferError::BackingUnavailable(
                "segment capacity must be non-zero".to_string(),
            ));
        }

        let Some((last, full)) = segments.split_last() else {
            return Err(BufferError::BackingUnavailable(
                "segment table is empty".to_string(),
            ));
        };

        if let Some((ordinal, segment)) = full
            .iter()
            .enumerate()
            .find(|(_, segment)| segment.bytes().len() != segment_capacity)
        {
            return Err(BufferError::BackingUnavailable(format!(
                "segment {ordinal} has {} bytes, expected {segment_capacity}",
                segment.bytes().len()
            )));
        }

        let last_capacity = last.bytes().len();
        if last_capacity == 0 || last_capacity > segment_capacity {
            return Err(BufferError::BackingUnavailable(format!(
                "last segment has {last_capacity} bytes, expected 1..={segment_capacity}"
            )));
        }

        let capacity = (full.len() as u64)
            .checked_mul(segment_capacity as u64)
            .and_then(|bytes| bytes.checked_add(last_capacity as u64))
            .ok_or_else(|| {
                BufferError::BackingUnavailable("total capacity overflows u64".to_string())
            })?;

        let shift = segment_capacity
            .is_power_of_two()
            .then(|| segment_capacity.trailing_zeros());
        let writable = segments.iter().all(|segment| segment.is_writable());

        debug!(
            "Built segment table: {} segments of {} bytes, capacity {} (writable: {})",
            segments.len(),
            segment_capacity,
            capacity,
            writable
        );

        Ok(Self {
            segments,
            segment_capacity,
            shift,
            capacity,
            writable,
        })
    }

    /// Build a table whose per-segment capacity is taken from the first segment.
    pub fn from_segments(segments: Vec<S>) -> Result<Self> {
        let segment_capacity = segments.first().map_or(0, |segment| segment.bytes().len());
        Self::new(segments, segment_capacity)
    }

    /// Resolve a logical index to its segment and local offset.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` unless `index < capacity()`.
    pub fn locate(&self, index: u64) -> Result<Location> {
        check_range(index, 1, self.capacity)?;
        Ok(self.resolve(index))
    }

    /// Split `[index, index + len)` into per-segment spans.
    ///
    /// A range ending exactly on a segment boundary yields no span for the
    /// following segment, and an empty range yields no spans at all.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` unless `index + len <= capacity()`.
    pub fn spans(&self, index: u64, len: usize) -> Result<Spans> {
        check_range(index, len, self.capacity)?;
        let start = if len == 0 {
            Location {
                segment: 0,
                offset: 0,
            }
        } else {
            self.resolve(index)
        };
        Ok(Spans {
            segment: start.segment,
            offset: start.offset,
            remaining: len,
            segment_capacity: self.segment_capacity,
        })
    }

    /// Index arithmetic without bounds checking; callers guarantee `index < capacity`.
    fn resolve(&self, index: u64) -> Location {
        let (segment, offset) = match self.shift {
            Some(shift) => (index >> shift, index & (self.segment_capacity as u64 - 1)),
            None => {
                let capacity = self.segment_capacity as u64;
                (index / capacity, index % capacity)
            }
        };
        Location {
            segment: segment as usize,
            offset: offset as usize,
        }
    }

    /// Total number of addressable bytes.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Capacity of every segment except possibly the last.
    pub fn segment_capacity(&self) -> usize {
        self.segment_capacity
    }

    /// Number of segments in the table.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether every segment accepts writes.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// The segment at `ordinal`, if any.
    pub fn segment(&self, ordinal: usize) -> Option<&S> {
        self.segments.get(ordinal)
    }

    pub(crate) fn segment_bytes(&self, ordinal: usize) -> &[u8] {
        self.segments[ordinal].bytes()
    }

    pub(crate) fn segment_bytes_mut(&mut self, ordinal: usize) -> Result<&mut [u8]> {
        self.segments[ordinal]
            .bytes_mut()
            .ok_or(BufferError::ReadOnly)
    }

    /// All segments in order.
    pub fn segments(&self) -> &[S] {
        &self.segments
    }

    /// Release the segments, e.g. to flush or unmap them.
    pub fn into_segments(self) -> Vec<S> {
        self.segments
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table(sizes: &[usize], segment_capacity: usize) -> Result<SegmentTable<Vec<u8>>> {
        SegmentTable::new(
            sizes.iter().map(|&size| vec![0u8; size]).collect(),
            segment_capacity,
        )
    }

    #[test]
    fn test_capacity_is_sum_of_segments() {
        let table = table(&[8, 8, 4], 8).unwrap();
        assert_eq!(table.capacity(), 20);
        assert_eq!(table.segment_count(), 3);
        assert_eq!(table.segment_capacity(), 8);
        assert!(table.is_writable());
    }

    #[test]
    fn test_rejects_malformed_layouts() {
        assert!(matches!(
            table(&[], 8),
            Err(BufferError::BackingUnavailable(_))
        ));
        assert!(matches!(
            table(&[8, 4, 8], 8),
            Err(BufferError::BackingUnavailable(_))
        ));
        assert!(matches!(
            table(&[8, 9], 8),
            Err(BufferError::BackingUnavailable(_))
        ));
        assert!(matches!(
            table(&[8, 0], 8),
            Err(BufferError::BackingUnavailable(_))
        ));
        assert!(matches!(
            table(&[8], 0),
            Err(BufferError::BackingUnavailable(_))
        ));
    }

    #[test]
    fn test_from_segments_infers_capacity() {
        let table = SegmentTable::from_segments(vec![vec![0u8; 16], vec![0u8; 3]]).unwrap();
        assert_eq!(table.segment_capacity(), 16);
        assert_eq!(table.capacity(), 19);

        let empty: Vec<Vec<u8>> = Vec::new();
        assert!(SegmentTable::from_segments(empty).is_err());
    }

    #[test]
    fn test_locate_power_of_two() {
        let table = table(&[8, 8, 4], 8).unwrap();
        assert_eq!(
            table.locate(0).unwrap(),
            Location {
                segment: 0,
                offset: 0
            }
        );
        assert_eq!(
            table.locate(7).unwrap(),
            Location {
                segment: 0,
                offset: 7
            }
        );
        assert_eq!(
            table.locate(8).unwrap(),
            Location {
                segment: 1,
                offset: 0
            }
        );
        assert_eq!(
            table.locate(19).unwrap(),
            Location {
                segment: 2,
                offset: 3
            }
        );
        assert!(table.locate(20).is_err());
        assert!(table.locate(u64::MAX).is_err());
    }

    #[test]
    fn test_locate_non_power_of_two() {
        let table = table(&[10, 10, 10, 5], 10).unwrap();
        assert_eq!(
            table.locate(25).unwrap(),
            Location {
                segment: 2,
                offset: 5
            }
        );
        assert_eq!(
            table.locate(30).unwrap(),
            Location {
                segment: 3,
                offset: 0
            }
        );
        assert!(table.locate(35).is_err());
    }

    #[test]
    fn test_spans_within_one_segment() {
        let table = table(&[8, 8, 4], 8).unwrap();
        let spans = table.spans(2, 4).unwrap();
        assert!(!spans.crosses_boundary());
        assert_eq!(
            spans.collect::<Vec<_>>(),
            vec![Span {
                segment: 0,
                offset: 2,
                len: 4
            }]
        );
    }

    #[test]
    fn test_spans_ending_on_boundary() {
        let table = table(&[8, 8, 4], 8).unwrap();
        let spans = table.spans(4, 4).unwrap();
        assert!(!spans.crosses_boundary());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans.last().unwrap().end(), 8);
    }

    #[test]
    fn test_spans_across_three_segments() {
        let table = table(&[8, 8, 4], 8).unwrap();
        let spans = table.spans(6, 13).unwrap();
        assert!(spans.crosses_boundary());
        assert_eq!(spans.len(), 3);
        assert_eq!(
            spans.collect::<Vec<_>>(),
            vec![
                Span {
                    segment: 0,
                    offset: 6,
                    len: 2
                },
                Span {
                    segment: 1,
                    offset: 0,
                    len: 8
                },
                Span {
                    segment: 2,
                    offset: 0,
                    len: 3
                },
            ]
        );
    }

    #[test]
    fn test_empty_spans() {
        let table = table(&[8, 8, 4], 8).unwrap();
        assert_eq!(table.spans(20, 0).unwrap().count(), 0);
        assert_eq!(table.spans(5, 0).unwrap().len(), 0);
        assert!(table.spans(21, 0).is_err());
    }

    #[test]
    fn test_spans_out_of_range() {
        let table = table(&[8, 8, 4], 8).unwrap();
        assert!(table.spans(19, 10).is_err());
        assert!(table.spans(u64::MAX - 2, 8).is_err());
    }

    #[test]
    fn test_read_only_segments_mark_table() {
        let data = [0u8; 4];
        let table = SegmentTable::new(vec![&data[..], &data[..]], 4).unwrap();
        assert!(!table.is_writable());
    }
}
