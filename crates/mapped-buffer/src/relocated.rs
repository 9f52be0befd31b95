//! Relocated views: a base offset applied in front of another buffer.

use crate::config::ByteOrder;
use crate::error::{BufferError, Result, check_range};
use crate::facade::BufferFacade;

/// A zero-copy view of `inner` starting `base` bytes in.
///
/// Index `i` of the view addresses index `base + i` of the inner buffer, and
/// the view's capacity is the inner capacity minus `base`. Wrap `&buffer` for
/// a read-only view or `&mut buffer` for a writable one.
#[derive(Debug, Clone)]
pub struct Relocated<B> {
    inner: B,
    base: u64,
}

impl<B: BufferFacade> Relocated<B> {
    /// Create a view of `inner` starting at `base`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `base` is past the end of `inner`.
    pub fn new(inner: B, base: u64) -> Result<Self> {
        check_range(base, 0, inner.capacity())?;
        Ok(Self { inner, base })
    }

    /// Offset of this view within `inner`.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// The wrapped buffer.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Release the wrapped buffer.
    pub fn into_inner(self) -> B {
        self.inner
    }

    fn translate(&self, index: u64, len: usize) -> Result<u64> {
        check_range(index, len, self.capacity())?;
        Ok(self.base + index)
    }
}

impl<B: BufferFacade> BufferFacade for Relocated<B> {
    fn capacity(&self) -> u64 {
        self.inner.capacity() - self.base
    }

    fn byte_order(&self) -> ByteOrder {
        self.inner.byte_order()
    }

    fn relocation_base(&self) -> u64 {
        self.inner.relocation_base() + self.base
    }

    fn is_writable(&self) -> bool {
        self.inner.is_writable()
    }

    fn read_into(&self, index: u64, dst: &mut [u8]) -> Result<()> {
        let index = self.translate(index, dst.len())?;
        self.inner.read_into(index, dst)
    }

    fn put_bytes(&mut self, index: u64, src: &[u8]) -> Result<()> {
        let index = self.translate(index, src.len())?;
        self.inner.put_bytes(index, src)
    }

    fn slice(&self, index: u64) -> Result<&[u8]> {
        let index = self.translate(index, 0)?;
        self.inner.slice(index)
    }

    fn slice_mut(&mut self, index: u64) -> Result<&mut [u8]> {
        let index = self.translate(index, 0)?;
        if !self.inner.is_writable() {
            return Err(BufferError::ReadOnly);
        }
        self.inner.slice_mut(index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{FlatBuffer, SegmentedBuffer};

    #[test]
    fn test_view_translates_indices() {
        let mut buffer = FlatBuffer::new(vec![0u8; 16], ByteOrder::BigEndian);
        {
            let mut view = Relocated::new(&mut buffer, 4).unwrap();
            assert_eq!(view.capacity(), 12);
            assert_eq!(view.relocation_base(), 4);
            view.put_i32(0, 0x0A0B_0C0D).unwrap();
        }
        assert_eq!(buffer.get_i32(4).unwrap(), 0x0A0B_0C0D);
    }

    #[test]
    fn test_view_bounds_are_relative() {
        let buffer = FlatBuffer::new(vec![0u8; 16], ByteOrder::BigEndian);
        let view = Relocated::new(&buffer, 10).unwrap();
        assert!(view.get_bytes(0, 6).is_ok());
        assert_eq!(
            view.get_bytes(4, 4),
            Err(BufferError::OutOfRange {
                index: 4,
                len: 4,
                capacity: 6
            })
        );
        assert!(Relocated::new(&buffer, 17).is_err());
        assert_eq!(Relocated::new(&buffer, 16).unwrap().capacity(), 0);
    }

    #[test]
    fn test_shared_view_is_read_only() {
        let buffer = FlatBuffer::new(vec![0u8; 8], ByteOrder::BigEndian);
        let mut view = Relocated::new(&buffer, 2).unwrap();
        assert!(!view.is_writable());
        assert_eq!(view.put(0, 1), Err(BufferError::ReadOnly));
        assert!(matches!(view.slice_mut(0), Err(BufferError::ReadOnly)));
        assert!(matches!(
            view.slice_mut(7),
            Err(BufferError::OutOfRange { .. })
        ));
        assert!(matches!(
            view.put(u64::MAX, 1),
            Err(BufferError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_nested_views_accumulate_base() {
        let segments = vec![vec![0u8; 8], vec![0u8; 8], vec![0u8; 4]];
        let mut buffer = SegmentedBuffer::new(segments, 8, ByteOrder::LittleEndian).unwrap();
        {
            let outer = Relocated::new(&mut buffer, 2).unwrap();
            let mut inner = Relocated::new(outer, 3).unwrap();
            assert_eq!(inner.relocation_base(), 5);
            assert_eq!(inner.capacity(), 15);
            inner.put_u32(0, 0xCAFE_F00D).unwrap();
        }
        assert_eq!(buffer.get_u32(5).unwrap(), 0xCAFE_F00D);
    }

    #[test]
    fn test_view_slice_follows_inner_semantics() {
        let segments = vec![vec![0u8; 8], vec![0u8; 8], vec![0u8; 4]];
        let buffer = SegmentedBuffer::new(segments, 8, ByteOrder::BigEndian).unwrap();
        let view = Relocated::new(&buffer, 4).unwrap();
        // Index 6 of the view is index 10 of the buffer: 6 bytes left in segment 1.
        assert_eq!(view.slice(6).unwrap().len(), 6);
    }
}
