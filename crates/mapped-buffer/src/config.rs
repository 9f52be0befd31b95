//! Construction-time configuration for buffers

use serde::{Deserialize, Serialize};

/// Default per-segment capacity: 1 GiB (0x40000000 bytes).
///
/// Large enough that every fixed-width primitive crosses at most one
/// segment boundary, and small enough to map on any 64-bit platform.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 0x4000_0000;

/// Byte order used by a buffer for all multi-byte primitives.
///
/// Chosen once when the buffer is built; it is never a per-call parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    /// Most significant byte first (network order).
    #[default]
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

impl ByteOrder {
    /// The byte order of the host platform.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }
}

/// Configuration for building a segmented buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Byte order applied to every multi-byte primitive
    pub byte_order: ByteOrder,

    /// Capacity of every segment except possibly the last (in bytes)
    pub segment_capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::BigEndian,
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
        }
    }
}

impl BufferConfig {
    /// Create a configuration with the given byte order and default segment size
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            ..Default::default()
        }
    }

    /// Set the byte order
    #[must_use]
    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the per-segment capacity
    #[must_use]
    pub const fn with_segment_capacity(mut self, segment_capacity: usize) -> Self {
        self.segment_capacity = segment_capacity;
        self
    }
}
