use crate::error::{Error, Result};
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use rand::Rng;
use tracing::debug;
use zeroize::Zeroizing;

pub const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &[u8] = b"0123456789";
pub const PUNCTUATION: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

pub const DEFAULT_LENGTH: usize = 12;

const KEY_LEN: usize = 32;
const BUFFER_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    pub length: usize,
    pub include_symbols: bool,
    pub include_numbers: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            include_symbols: true,
            include_numbers: true,
        }
    }
}

/// Characters eligible for a generated password: letters, then digits, then
/// punctuation, depending on the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet(Vec<u8>);

impl Alphabet {
    pub fn new(config: &GenerationConfig) -> Self {
        let mut chars = LETTERS.to_vec();
        if config.include_numbers {
            chars.extend_from_slice(DIGITS);
        }
        if config.include_symbols {
            chars.extend_from_slice(PUNCTUATION);
        }
        Self(chars)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.0.contains(&(c as u8))
    }

    /// Bytes at or above this value are discarded so every character is
    /// equally likely.
    pub fn rejection_threshold(&self) -> usize {
        256 - (256 % self.len().max(1))
    }

    pub fn entropy_bits(&self, length: usize) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        length as f64 * (self.len() as f64).log2()
    }
}

/// Generates a password from a freshly seeded keystream.
///
/// Two calls with the same config are not expected to return the same
/// password.
pub fn generate(config: &GenerationConfig) -> Result<Zeroizing<String>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    rand::rng().fill(&mut *key);

    generate_with_key(&key, config)
}

/// Generates a password by rejection sampling the ChaCha20 keystream for
/// `key`. The same key and config always yield the same password.
pub fn generate_with_key(
    key: &[u8; KEY_LEN],
    config: &GenerationConfig,
) -> Result<Zeroizing<String>> {
    if config.length == 0 {
        return Err(Error::InvalidArgument(
            "Password length must be at least 1".to_string(),
        ));
    }

    let alphabet = Alphabet::new(config);
    if alphabet.is_empty() {
        return Err(Error::InvalidArgument("Alphabet cannot be empty".to_string()));
    }

    let alphabet_size = alphabet.len();
    let rejection_threshold = alphabet.rejection_threshold();

    debug!(
        length = config.length,
        alphabet_size, rejection_threshold, "generating password"
    );

    let mut cipher = ChaCha20::new(key.into(), &[0u8; 12].into());
    let mut password_bytes = Zeroizing::new(Vec::with_capacity(config.length));

    let mut buffer = Zeroizing::new(vec![0u8; BUFFER_LEN]);
    cipher.apply_keystream(&mut buffer);
    let mut pos = 0;

    while password_bytes.len() < config.length {
        if pos >= buffer.len() {
            buffer.fill(0);
            cipher.apply_keystream(&mut buffer);
            pos = 0;
        }

        let random_byte = buffer[pos] as usize;
        pos += 1;

        if random_byte < rejection_threshold {
            password_bytes.push(alphabet.as_bytes()[random_byte % alphabet_size]);
        }
    }

    let password = password_bytes.iter().map(|&b| b as char).collect();

    Ok(Zeroizing::new(password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn config(length: usize, include_symbols: bool, include_numbers: bool) -> GenerationConfig {
        GenerationConfig {
            length,
            include_symbols,
            include_numbers,
        }
    }

    #[test]
    fn test_default_config() {
        let config = GenerationConfig::default();
        assert_eq!(config.length, 12);
        assert!(config.include_symbols);
        assert!(config.include_numbers);
    }

    #[test]
    fn test_alphabet_sizes() {
        assert_eq!(Alphabet::new(&config(8, false, false)).len(), 52);
        assert_eq!(Alphabet::new(&config(8, false, true)).len(), 62);
        assert_eq!(Alphabet::new(&config(8, true, false)).len(), 84);
        assert_eq!(Alphabet::new(&config(8, true, true)).len(), 94);
    }

    #[test]
    fn test_alphabet_no_duplicates() {
        let alphabet = Alphabet::new(&config(8, true, true));
        let unique: HashSet<_> = alphabet.as_bytes().iter().collect();
        assert_eq!(unique.len(), alphabet.len(), "Alphabet contains duplicates");
    }

    #[test]
    fn test_alphabet_order() {
        let alphabet = Alphabet::new(&config(8, true, true));
        let bytes = alphabet.as_bytes();
        assert_eq!(&bytes[..52], LETTERS);
        assert_eq!(&bytes[52..62], DIGITS);
        assert_eq!(&bytes[62..], PUNCTUATION);
    }

    #[test]
    fn test_punctuation_is_ascii_punctuation() {
        assert_eq!(PUNCTUATION.len(), 32);
        assert!(PUNCTUATION.iter().all(|b| b.is_ascii_punctuation()));
        let all: Vec<u8> = (0u8..128).filter(|b| b.is_ascii_punctuation()).collect();
        assert_eq!(all.len(), PUNCTUATION.len());
    }

    #[test]
    fn test_rejection_thresholds() {
        assert_eq!(Alphabet::new(&config(8, false, false)).rejection_threshold(), 208);
        assert_eq!(Alphabet::new(&config(8, false, true)).rejection_threshold(), 248);
        assert_eq!(Alphabet::new(&config(8, true, false)).rejection_threshold(), 252);
        assert_eq!(Alphabet::new(&config(8, true, true)).rejection_threshold(), 188);

        for include_symbols in [false, true] {
            for include_numbers in [false, true] {
                let alphabet = Alphabet::new(&config(8, include_symbols, include_numbers));
                let threshold = alphabet.rejection_threshold();
                assert_eq!(threshold % alphabet.len(), 0);
                assert!(256 - threshold < alphabet.len());
            }
        }
    }

    #[test]
    fn test_entropy_bits() {
        let letters = Alphabet::new(&config(8, false, false));
        let expected = 12.0 * 52f64.log2();
        assert!((letters.entropy_bits(12) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_password_length_all_configs() {
        for length in 8..=32 {
            for include_symbols in [false, true] {
                for include_numbers in [false, true] {
                    let password =
                        generate(&config(length, include_symbols, include_numbers)).unwrap();
                    assert_eq!(password.chars().count(), length);
                }
            }
        }
    }

    #[test]
    fn test_letters_only() {
        let password = generate(&config(32, false, false)).unwrap();
        assert!(password.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_full_charset() {
        let alphabet = Alphabet::new(&config(32, true, true));
        for _ in 0..50 {
            let password = generate(&config(32, true, true)).unwrap();
            for ch in password.chars() {
                assert!(
                    alphabet.contains(ch),
                    "Password contains invalid character: {:?}",
                    ch
                );
            }
        }
    }

    #[test]
    fn test_numbers_without_symbols() {
        let password = generate(&config(32, false, true)).unwrap();
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_zero_length_rejected() {
        let result = generate(&config(0, true, true));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Password length must be at least 1")
        );
    }

    #[test]
    fn test_length_one() {
        let password = generate(&config(1, true, true)).unwrap();
        assert_eq!(password.len(), 1);
    }

    #[test]
    fn test_long_password_refills_buffer() {
        let key = [7u8; 32];
        let password = generate_with_key(&key, &config(4096, true, true)).unwrap();
        assert_eq!(password.len(), 4096);
        let alphabet = Alphabet::new(&config(1, true, true));
        assert!(password.chars().all(|c| alphabet.contains(c)));
    }

    #[test]
    fn test_keyed_deterministic() {
        let key = [42u8; 32];
        let password1 = generate_with_key(&key, &config(20, true, true)).unwrap();
        let password2 = generate_with_key(&key, &config(20, true, true)).unwrap();
        assert_eq!(*password1, *password2);
    }

    #[test]
    fn test_different_keys_different_passwords() {
        let password1 = generate_with_key(&[1u8; 32], &config(20, true, true)).unwrap();
        let password2 = generate_with_key(&[2u8; 32], &config(20, true, true)).unwrap();
        assert_ne!(*password1, *password2);
    }

    #[test]
    fn test_not_idempotent() {
        let config = GenerationConfig {
            length: 32,
            ..GenerationConfig::default()
        };
        let password1 = generate(&config).unwrap();
        let password2 = generate(&config).unwrap();
        assert_ne!(*password1, *password2);
    }

    #[test]
    fn test_regression_keyed_output() {
        let key = [42u8; 32];

        assert_eq!(
            *generate_with_key(&key, &config(12, true, true)).unwrap(),
            "6zF)Lcw'[25Q"
        );
        assert_eq!(
            *generate_with_key(&key, &config(20, false, false)).unwrap(),
            "WzFsBcwqGcVGdbsQgABE"
        );
        assert_eq!(
            *generate_with_key(&key, &config(16, false, true)).unwrap(),
            "CzFiRhcwgw2BmdR8"
        );
        assert_eq!(
            *generate_with_key(&key, &config(32, true, false)).unwrap(),
            ";zF=*Vcw;a#:!dvMk'oBE\"|S=+Ndn[lN"
        );
    }
}
