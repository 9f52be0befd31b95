//! Buffer facade over a single contiguous region.

use crate::config::ByteOrder;
use crate::error::{BufferError, Result, check_range};
use crate::facade::BufferFacade;
use crate::segment::Segment;

/// A buffer backed by one contiguous region, typically for tests or data
/// small enough to map in one piece.
#[derive(Debug)]
pub struct FlatBuffer<S> {
    region: S,
    byte_order: ByteOrder,
}

impl<S: Segment> FlatBuffer<S> {
    /// Wrap `region` with the given byte order.
    pub fn new(region: S, byte_order: ByteOrder) -> Self {
        Self { region, byte_order }
    }

    /// The wrapped region.
    pub fn region(&self) -> &S {
        &self.region
    }

    /// Release the wrapped region.
    pub fn into_inner(self) -> S {
        self.region
    }

    /// Offset of `index` within the region; callers have checked the range.
    fn offset(index: u64) -> usize {
        index as usize
    }
}

impl<S: Segment> BufferFacade for FlatBuffer<S> {
    fn capacity(&self) -> u64 {
        self.region.bytes().len() as u64
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn is_writable(&self) -> bool {
        self.region.is_writable()
    }

    fn read_into(&self, index: u64, dst: &mut [u8]) -> Result<()> {
        check_range(index, dst.len(), self.capacity())?;
        let start = Self::offset(index);
        dst.copy_from_slice(&self.region.bytes()[start..start + dst.len()]);
        Ok(())
    }

    fn put_bytes(&mut self, index: u64, src: &[u8]) -> Result<()> {
        check_range(index, src.len(), self.capacity())?;
        let start = Self::offset(index);
        let bytes = self.region.bytes_mut().ok_or(BufferError::ReadOnly)?;
        bytes[start..start + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn slice(&self, index: u64) -> Result<&[u8]> {
        check_range(index, 0, self.capacity())?;
        Ok(&self.region.bytes()[Self::offset(index)..])
    }

    fn slice_mut(&mut self, index: u64) -> Result<&mut [u8]> {
        check_range(index, 0, self.capacity())?;
        let start = Self::offset(index);
        let bytes = self.region.bytes_mut().ok_or(BufferError::ReadOnly)?;
        Ok(&mut bytes[start..])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut buffer = FlatBuffer::new(vec![0u8; 32], ByteOrder::BigEndian);
        buffer.put_i64(3, i64::MIN + 7).unwrap();
        buffer.put_u16(30, 0xBEEF).unwrap();
        assert_eq!(buffer.get_i64(3).unwrap(), i64::MIN + 7);
        assert_eq!(buffer.get_u16(30).unwrap(), 0xBEEF);
        assert_eq!(buffer.get_bytes(30, 2).unwrap(), vec![0xBE, 0xEF]);
    }

    #[test]
    fn test_slice_extends_to_end_of_buffer() {
        let buffer = FlatBuffer::new(vec![0u8; 20], ByteOrder::BigEndian);
        assert_eq!(buffer.slice(10).unwrap().len(), 10);
        assert!(buffer.slice(20).unwrap().is_empty());
        assert!(buffer.slice(21).is_err());
    }

    #[test]
    fn test_out_of_range() {
        let mut buffer = FlatBuffer::new(vec![0u8; 4], ByteOrder::LittleEndian);
        assert!(matches!(
            buffer.get_i32(1),
            Err(BufferError::OutOfRange { .. })
        ));
        assert!(matches!(
            buffer.put(4, 0),
            Err(BufferError::OutOfRange { .. })
        ));
        assert!(buffer.get(u64::MAX).is_err());
    }

    #[test]
    fn test_capacity_follows_visible_bytes() {
        // Spare allocation beyond the vector's length is not addressable.
        let mut region = Vec::with_capacity(16);
        region.resize(8, 0u8);
        let buffer = FlatBuffer::new(region, ByteOrder::BigEndian);

        assert_eq!(buffer.capacity(), 8);
        assert!(matches!(
            buffer.get_i64(8),
            Err(BufferError::OutOfRange { .. })
        ));
        assert_eq!(buffer.slice(4).unwrap().len(), 4);
    }

    #[test]
    fn test_read_only_region() {
        let data = [1u8, 2, 3, 4];
        let mut buffer = FlatBuffer::new(&data[..], ByteOrder::LittleEndian);
        assert!(!buffer.is_writable());
        assert_eq!(buffer.get_i32(0).unwrap(), 0x0403_0201);
        assert_eq!(buffer.put(0, 9), Err(BufferError::ReadOnly));
    }
}
