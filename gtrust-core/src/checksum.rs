//! GT-511 checksum algorithm
//!
//! The checksum is the plain sum of the covered bytes in a 16-bit
//! accumulator, wrapping modulo 2^16. For command and response packets it
//! covers the first 10 of the 12 bytes; for data packets it covers
//! everything except the trailing two checksum bytes. This is the only
//! integrity mechanism in the protocol.

/// Calculate the additive checksum over a byte range
///
/// # Examples
///
/// ```
/// use gtrust_core::checksum;
///
/// let sum = checksum::calculate(&[0x55, 0xAA, 0x01, 0x00]);
/// assert_eq!(sum, 0x0100);
/// ```
pub fn calculate(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |sum, byte| sum.wrapping_add(u16::from(*byte)))
}

/// Verify a checksum against a byte range
pub fn verify(data: &[u8], expected: u16) -> bool {
    calculate(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checksum_empty() {
        assert_eq!(calculate(&[]), 0);
    }

    #[test]
    fn test_checksum_simple_sum() {
        assert_eq!(calculate(&[1, 2, 3]), 6);
        assert_eq!(calculate(&[0xFF]), 0xFF);
    }

    #[test]
    fn test_checksum_wraps_mod_2_16() {
        // 257 * 0xFF = 0x100FF, which wraps to 0x00FF
        let data = vec![0xFF; 257];
        assert_eq!(calculate(&data), 0x00FF);
    }

    #[test]
    fn test_checksum_verify() {
        let data = [0x55, 0xAA, 0x01, 0x00];
        let sum = calculate(&data);

        assert!(verify(&data, sum));
        assert!(!verify(&data, sum.wrapping_add(1)));
    }

    proptest! {
        #[test]
        fn checksum_is_additive_under_concatenation(
            a in proptest::collection::vec(any::<u8>(), 0..64),
            b in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let mut joined = a.clone();
            joined.extend_from_slice(&b);

            prop_assert_eq!(
                calculate(&joined),
                calculate(&a).wrapping_add(calculate(&b))
            );
        }
    }
}
