//! Monotonic bit array backing a Bloom filter.

/// A fixed-length bit array whose bits can only be set, never cleared.
///
/// Because no bit is ever unset, a key whose bits were set stays a member
/// regardless of later insertions. Evicting keys requires building a new array.
#[derive(Debug, Clone)]
pub struct BitArray {
    /// Packed bits, least significant bit first within each byte
    bytes: Vec<u8>,
    /// Number of addressable bits
    len: usize,
}

impl BitArray {
    /// Creates an array of `len` bits, all unset.
    pub fn new(len: usize) -> Self {
        Self { bytes: vec![0u8; len.div_ceil(8)], len }
    }

    /// Sets the bit at `pos`. Positions past the end are ignored.
    pub fn set(&mut self, pos: usize) {
        if pos < self.len {
            self.bytes[pos / 8] |= 1 << (pos % 8);
        }
    }

    /// Returns whether the bit at `pos` is set. Positions past the end read as unset.
    pub fn get(&self, pos: usize) -> bool {
        if pos < self.len {
            (self.bytes[pos / 8] & (1 << (pos % 8))) != 0
        } else {
            false
        }
    }

    /// Number of addressable bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array has no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Size of the backing storage in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_array_is_clear() {
        let bits = BitArray::new(101);
        assert_eq!(bits.len(), 101);
        assert_eq!(bits.size_in_bytes(), 13);
        assert_eq!(bits.count_ones(), 0);
        assert!((0..101).all(|i| !bits.get(i)));
    }

    #[test]
    fn test_set_is_monotonic() {
        let mut bits = BitArray::new(64);
        bits.set(3);
        bits.set(63);
        bits.set(3);
        assert!(bits.get(3));
        assert!(bits.get(63));
        assert!(!bits.get(4));
        assert_eq!(bits.count_ones(), 2);
    }

    #[test]
    fn test_out_of_range() {
        let mut bits = BitArray::new(10);
        bits.set(10);
        bits.set(1000);
        assert!(!bits.get(10));
        assert_eq!(bits.count_ones(), 0);
    }
}
