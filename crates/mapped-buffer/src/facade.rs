//! The buffer facade: absolute, index-addressed access to a byte buffer.
//!
//! Every index is relative to the facade's relocation base and must satisfy
//! `index + width <= capacity()`; anything else fails with
//! [`BufferError::OutOfRange`]. Buffers never grow.
//!
//! The trait is sealed. It is implemented by [`FlatBuffer`],
//! [`SegmentedBuffer`], [`Relocated`] and by references to those.
//!
//! [`FlatBuffer`]: crate::FlatBuffer
//! [`SegmentedBuffer`]: crate::SegmentedBuffer
//! [`Relocated`]: crate::Relocated

use crate::codec;
use crate::config::ByteOrder;
use crate::error::{BufferError, Result, check_range};

mod sealed {
    /// Restricts [`BufferFacade`](super::BufferFacade) to the backings in this crate.
    pub trait Sealed {}

    impl<S> Sealed for crate::FlatBuffer<S> {}
    impl<S> Sealed for crate::SegmentedBuffer<S> {}
    impl<B> Sealed for crate::Relocated<B> {}
    impl<B: Sealed + ?Sized> Sealed for &B {}
    impl<B: Sealed + ?Sized> Sealed for &mut B {}
}

/// Absolute access to a flat or segmented byte buffer.
///
/// Multi-byte operations that span a segment boundary are split across the
/// segments involved. They are not atomic: when the backing storage is also
/// visible outside this process (a shared file mapping) a concurrent reader
/// may observe part old, part new bytes. Callers that need atomic updates
/// across a boundary must serialize access themselves.
pub trait BufferFacade: sealed::Sealed {
    /// Number of addressable bytes, excluding the relocation base.
    fn capacity(&self) -> u64;

    /// Byte order applied to every multi-byte primitive.
    fn byte_order(&self) -> ByteOrder;

    /// Offset added to every index before it reaches the backing storage.
    fn relocation_base(&self) -> u64 {
        0
    }

    /// Whether `put*` operations are permitted.
    fn is_writable(&self) -> bool;

    /// Fill `dst` with the bytes starting at `index`.
    fn read_into(&self, index: u64, dst: &mut [u8]) -> Result<()>;

    /// Copy `src` into the buffer starting at `index`.
    ///
    /// The whole range is validated before any byte is written.
    fn put_bytes(&mut self, index: u64, src: &[u8]) -> Result<()>;

    /// View of the backing storage from `index` to the end of the region
    /// holding it.
    ///
    /// For a flat buffer the view extends to the end of the buffer. For a
    /// segmented buffer it ends at the end of the segment containing
    /// `index`, even when the buffer continues beyond it. `index ==
    /// capacity()` yields an empty view.
    fn slice(&self, index: u64) -> Result<&[u8]>;

    /// Mutable counterpart of [`slice`](Self::slice).
    fn slice_mut(&mut self, index: u64) -> Result<&mut [u8]>;

    /// Copy `len` bytes starting at `index` into a new vector.
    fn get_bytes(&self, index: u64, len: usize) -> Result<Vec<u8>> {
        check_range(index, len, self.capacity())?;
        let mut bytes = vec![0u8; len];
        self.read_into(index, &mut bytes)?;
        Ok(bytes)
    }

    /// Read a single byte.
    fn get(&self, index: u64) -> Result<u8> {
        let [byte] = read_array(self, index)?;
        Ok(byte)
    }

    /// Write a single byte.
    fn put(&mut self, index: u64, value: u8) -> Result<()> {
        self.put_bytes(index, &[value])
    }

    /// Read a 2-byte signed integer.
    fn get_i16(&self, index: u64) -> Result<i16> {
        Ok(codec::decode_i16(self.byte_order(), read_array(self, index)?))
    }

    /// Write a 2-byte signed integer.
    fn put_i16(&mut self, index: u64, value: i16) -> Result<()> {
        let bytes = codec::encode_i16(self.byte_order(), value);
        self.put_bytes(index, &bytes)
    }

    /// Read a 2-byte unsigned integer.
    fn get_u16(&self, index: u64) -> Result<u16> {
        Ok(codec::decode_u16(self.byte_order(), read_array(self, index)?))
    }

    /// Write a 2-byte unsigned integer.
    fn put_u16(&mut self, index: u64, value: u16) -> Result<()> {
        let bytes = codec::encode_u16(self.byte_order(), value);
        self.put_bytes(index, &bytes)
    }

    /// Read a 4-byte signed integer.
    fn get_i32(&self, index: u64) -> Result<i32> {
        Ok(codec::decode_i32(self.byte_order(), read_array(self, index)?))
    }

    /// Write a 4-byte signed integer.
    fn put_i32(&mut self, index: u64, value: i32) -> Result<()> {
        let bytes = codec::encode_i32(self.byte_order(), value);
        self.put_bytes(index, &bytes)
    }

    /// Read a 4-byte unsigned integer.
    fn get_u32(&self, index: u64) -> Result<u32> {
        Ok(codec::decode_u32(self.byte_order(), read_array(self, index)?))
    }

    /// Write a 4-byte unsigned integer.
    fn put_u32(&mut self, index: u64, value: u32) -> Result<()> {
        let bytes = codec::encode_u32(self.byte_order(), value);
        self.put_bytes(index, &bytes)
    }

    /// Read an 8-byte signed integer.
    fn get_i64(&self, index: u64) -> Result<i64> {
        Ok(codec::decode_i64(self.byte_order(), read_array(self, index)?))
    }

    /// Write an 8-byte signed integer.
    fn put_i64(&mut self, index: u64, value: i64) -> Result<()> {
        let bytes = codec::encode_i64(self.byte_order(), value);
        self.put_bytes(index, &bytes)
    }

    /// Read an 8-byte unsigned integer.
    fn get_u64(&self, index: u64) -> Result<u64> {
        Ok(codec::decode_u64(self.byte_order(), read_array(self, index)?))
    }

    /// Write an 8-byte unsigned integer.
    fn put_u64(&mut self, index: u64, value: u64) -> Result<()> {
        let bytes = codec::encode_u64(self.byte_order(), value);
        self.put_bytes(index, &bytes)
    }

    /// Read a 4-byte float, preserving its exact bit pattern.
    fn get_f32(&self, index: u64) -> Result<f32> {
        Ok(codec::decode_f32(self.byte_order(), read_array(self, index)?))
    }

    /// Write a 4-byte float, preserving its exact bit pattern.
    fn put_f32(&mut self, index: u64, value: f32) -> Result<()> {
        let bytes = codec::encode_f32(self.byte_order(), value);
        self.put_bytes(index, &bytes)
    }

    /// Read an 8-byte float, preserving its exact bit pattern.
    fn get_f64(&self, index: u64) -> Result<f64> {
        Ok(codec::decode_f64(self.byte_order(), read_array(self, index)?))
    }

    /// Write an 8-byte float, preserving its exact bit pattern.
    fn put_f64(&mut self, index: u64, value: f64) -> Result<()> {
        let bytes = codec::encode_f64(self.byte_order(), value);
        self.put_bytes(index, &bytes)
    }

    /// Read a character stored as one 2-byte UTF-16 code unit.
    ///
    /// Fails with `InvalidArgument` if the unit is a lone surrogate.
    fn get_char(&self, index: u64) -> Result<char> {
        let unit = self.get_u16(index)?;
        char::from_u32(u32::from(unit)).ok_or_else(|| {
            BufferError::InvalidArgument(format!(
                "UTF-16 unit {unit:#06x} at index {index} is a lone surrogate"
            ))
        })
    }

    /// Write a character as one 2-byte UTF-16 code unit.
    ///
    /// Fails with `InvalidArgument` for characters outside the Basic
    /// Multilingual Plane, which need two units.
    fn put_char(&mut self, index: u64, value: char) -> Result<()> {
        let unit = u16::try_from(u32::from(value)).map_err(|_| {
            BufferError::InvalidArgument(format!(
                "character U+{:04X} does not fit in one UTF-16 unit",
                u32::from(value)
            ))
        })?;
        self.put_u16(index, unit)
    }
}

/// Read exactly `N` bytes at `index`.
fn read_array<B: BufferFacade + ?Sized, const N: usize>(buffer: &B, index: u64) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    buffer.read_into(index, &mut bytes)?;
    Ok(bytes)
}

/// A shared reference is a read-only view of the same buffer.
impl<B: BufferFacade + ?Sized> BufferFacade for &B {
    fn capacity(&self) -> u64 {
        (**self).capacity()
    }

    fn byte_order(&self) -> ByteOrder {
        (**self).byte_order()
    }

    fn relocation_base(&self) -> u64 {
        (**self).relocation_base()
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn read_into(&self, index: u64, dst: &mut [u8]) -> Result<()> {
        (**self).read_into(index, dst)
    }

    fn put_bytes(&mut self, index: u64, src: &[u8]) -> Result<()> {
        check_range(index, src.len(), self.capacity())?;
        Err(BufferError::ReadOnly)
    }

    fn slice(&self, index: u64) -> Result<&[u8]> {
        (**self).slice(index)
    }

    fn slice_mut(&mut self, index: u64) -> Result<&mut [u8]> {
        check_range(index, 0, self.capacity())?;
        Err(BufferError::ReadOnly)
    }
}

impl<B: BufferFacade + ?Sized> BufferFacade for &mut B {
    fn capacity(&self) -> u64 {
        (**self).capacity()
    }

    fn byte_order(&self) -> ByteOrder {
        (**self).byte_order()
    }

    fn relocation_base(&self) -> u64 {
        (**self).relocation_base()
    }

    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }

    fn read_into(&self, index: u64, dst: &mut [u8]) -> Result<()> {
        (**self).read_into(index, dst)
    }

    fn put_bytes(&mut self, index: u64, src: &[u8]) -> Result<()> {
        (**self).put_bytes(index, src)
    }

    fn slice(&self, index: u64) -> Result<&[u8]> {
        (**self).slice(index)
    }

    fn slice_mut(&mut self, index: u64) -> Result<&mut [u8]> {
        (**self).slice_mut(index)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{FlatBuffer, SegmentedBuffer};

    #[test]
    fn test_shared_reference_reports_range_before_read_only() {
        let buffer = FlatBuffer::new(vec![0u8; 8], ByteOrder::BigEndian);
        let mut view = &buffer;

        assert!(matches!(
            view.put(u64::MAX, 0),
            Err(BufferError::OutOfRange { .. })
        ));
        assert!(matches!(
            view.put_i32(6, 1),
            Err(BufferError::OutOfRange { .. })
        ));
        assert!(matches!(
            view.slice_mut(9),
            Err(BufferError::OutOfRange { .. })
        ));
        assert_eq!(view.put_i32(4, 1), Err(BufferError::ReadOnly));
        assert!(matches!(view.slice_mut(8), Err(BufferError::ReadOnly)));
    }

    #[test]
    fn test_mutable_reference_delegates() {
        let mut buffer =
            SegmentedBuffer::new(vec![vec![0u8; 4], vec![0u8; 4]], 4, ByteOrder::LittleEndian)
                .unwrap();
        let view = &mut buffer;

        assert!(view.is_writable());
        view.put_u32(2, 0xAABB_CCDD).unwrap();
        assert_eq!(view.get_u32(2).unwrap(), 0xAABB_CCDD);
        assert_eq!(buffer.get_bytes(2, 4).unwrap(), vec![0xDD, 0xCC, 0xBB, 0xAA]);
    }
}
