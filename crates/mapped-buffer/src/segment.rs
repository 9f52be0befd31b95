//! Segment handles: the storage regions a buffer is built from.
//!
//! A segment is a contiguous, directly addressable run of bytes. How it was
//! created (heap allocation, file mapping, borrowed slice) is irrelevant to
//! the buffer; it only needs byte access and a fixed length. The length of
//! `bytes()` is the segment's capacity and must not change once the segment
//! is handed to a buffer.

use memmap2::{Mmap, MmapMut};

/// A fixed-capacity storage region addressable by local offset.
pub trait Segment {
    /// The segment contents.
    fn bytes(&self) -> &[u8];

    /// Mutable access to the segment contents, or `None` for read-only storage.
    fn bytes_mut(&mut self) -> Option<&mut [u8]>;

    /// Whether `bytes_mut` returns `Some`.
    fn is_writable(&self) -> bool;
}

impl Segment for Vec<u8> {
    fn bytes(&self) -> &[u8] {
        &self[..]
    }

    fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(&mut self[..])
    }

    fn is_writable(&self) -> bool {
        true
    }
}

impl Segment for Box<[u8]> {
    fn bytes(&self) -> &[u8] {
        &self[..]
    }

    fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(&mut self[..])
    }

    fn is_writable(&self) -> bool {
        true
    }
}

impl Segment for &mut [u8] {
    fn bytes(&self) -> &[u8] {
        &self[..]
    }

    fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(&mut self[..])
    }

    fn is_writable(&self) -> bool {
        true
    }
}

impl Segment for &[u8] {
    fn bytes(&self) -> &[u8] {
        &self[..]
    }

    fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn is_writable(&self) -> bool {
        false
    }
}

/// Writable file mapping.
impl Segment for MmapMut {
    fn bytes(&self) -> &[u8] {
        &self[..]
    }

    fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        Some(&mut self[..])
    }

    fn is_writable(&self) -> bool {
        true
    }
}

/// Read-only file mapping.
impl Segment for Mmap {
    fn bytes(&self) -> &[u8] {
        &self[..]
    }

    fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn is_writable(&self) -> bool {
        false
    }
}
