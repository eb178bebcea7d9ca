//! CRC-32 as used by PNG chunk checksums
//!
//! Reflected polynomial `0xEDB88320`, register initialised to `0xFFFFFFFF`,
//! complemented on output. The lookup table is built on first use and shared
//! read-only afterwards.

use std::sync::LazyLock;

const POLYNOMIAL: u32 = 0xEDB88320;

static CRC_TABLE: LazyLock<[u32; 256]> = LazyLock::new(|| {
    let mut table = [0u32; 256];
    for (n, entry) in table.iter_mut().enumerate() {
        let mut c = n as u32;
        for _ in 0..8 {
            if c & 1 != 0 {
                c = (c >> 1) ^ POLYNOMIAL;
            } else {
                c >>= 1;
            }
        }
        *entry = c;
    }
    table
});

/// Incremental CRC-32 hasher
///
/// Lets a chunk checksum cover `type ‖ data` without concatenating them.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Create a hasher with the standard initial register
    pub fn new() -> Self {
        Self { state: 0xFFFFFFFF }
    }

    /// Feed more bytes into the checksum
    pub fn update(&mut self, bytes: &[u8]) {
        let table = &*CRC_TABLE;
        let mut c = self.state;
        for &byte in bytes {
            c = table[((c ^ byte as u32) & 0xFF) as usize] ^ (c >> 8);
        }
        self.state = c;
    }

    /// Final checksum value
    pub fn finalize(self) -> u32 {
        self.state ^ 0xFFFFFFFF
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-32 of a single byte sequence
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(bytes);
    hasher.finalize()
}
