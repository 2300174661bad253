//! Code Value Generation
//!
//! Pure logic for drawing code values. Uniqueness is not guaranteed here;
//! the database unique index on `value` is authoritative and the
//! generation use case retries on collision.

use rand::Rng;

/// 32-symbol alphabet with the ambiguous I, O, 0 and 1 left out
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Standard code value length
pub const CODE_LENGTH: usize = 5;

/// Draw a random code value of the given length from the alphabet
pub fn generate_code_value(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_has_32_unambiguous_symbols() {
        assert_eq!(CODE_ALPHABET.len(), 32);
        for ambiguous in [b'I', b'O', b'0', b'1'] {
            assert!(!CODE_ALPHABET.contains(&ambiguous));
        }
    }

    #[test]
    fn test_generated_value_shape() {
        let value = generate_code_value(CODE_LENGTH);
        assert_eq!(value.len(), CODE_LENGTH);
        assert!(value.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generated_values_vary() {
        let a = generate_code_value(20);
        let b = generate_code_value(20);
        assert_ne!(a, b);
    }
}
