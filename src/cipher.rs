use crate::args::{CipherMode, CipherType};
use derive_more::Display;
use num::Integer;
use std::{collections::HashMap, hash::Hash};

/// Common errors for ciphers
#[derive(Debug, Display, PartialEq, Eq)]
pub enum CipherError {
    #[display(fmt = "invalid key '{}'", _0)]
    InvalidKey(String),
    #[display(fmt = "unknown character {}", _0)]
    UnknownCharacter(u8),
    #[display(fmt = "cipher text has odd length")]
    OddLength,
}

impl std::error::Error for CipherError {}

/// Ciphers work on upper-case latin text, see [`transliterate`]
pub trait Cipher {
    fn encrypt(&self, message: &[u8]) -> Result<Vec<u8>, CipherError>;
    fn decrypt(&self, cipher_text: &[u8]) -> Result<Vec<u8>, CipherError>;

    fn apply(&self, mode: CipherMode, text: &[u8]) -> Result<Vec<u8>, CipherError> {
        match mode {
            CipherMode::Encrypt => self.encrypt(text),
            CipherMode::Decrypt => self.decrypt(text),
        }
    }
}

/// Builds the cipher selected on the command line
pub fn cipher_factory(cipher_type: CipherType, key: &str) -> Result<Box<dyn Cipher>, CipherError> {
    Ok(match cipher_type {
        CipherType::Caesar => Box::new(CaesarCipher::new(key)?),
        CipherType::Playfair => Box::new(PlayfairCipher::new(key)),
        CipherType::Vigenere => Box::new(VigenereCipher::new(key)?),
    })
}

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const DIGIT_NAMES: [&str; 10] = [
    "ZERO", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE",
];

/// Upper-cases latin letters, spells out digits and drops everything else
pub fn transliterate(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphabetic() {
            output.push(ch.to_ascii_uppercase());
        } else if let Some(d) = ch.to_digit(10) {
            output.push_str(DIGIT_NAMES[d as usize]);
        }
    }
    output
}

fn letter_index(ch: u8) -> Result<usize, CipherError> {
    if ch.is_ascii_uppercase() {
        Ok((ch - b'A') as usize)
    } else {
        Err(CipherError::UnknownCharacter(ch))
    }
}

/// Shifts `ch` by `by` positions, wrapping around the alphabet in both directions
fn shift(ch: u8, by: i64) -> Result<u8, CipherError> {
    let x = letter_index(ch)? as i64;
    let y = (x + by).mod_floor(&(ALPHABET.len() as i64));
    Ok(ALPHABET[y as usize])
}

/// Caesar cipher
/// https://en.wikipedia.org/wiki/Caesar_cipher
#[derive(Clone, Debug)]
pub struct CaesarCipher {
    key: i64,
}

impl CaesarCipher {
    /// Key is a non-negative decimal number, the empty key is a zero shift
    pub fn new(key: &str) -> Result<Self, CipherError> {
        if key.is_empty() {
            return Ok(Self { key: 0 });
        }
        if !key.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CipherError::InvalidKey(key.to_owned()));
        }
        let key_value: u64 = key
            .parse()
            .map_err(|_| CipherError::InvalidKey(key.to_owned()))?;
        Ok(Self {
            key: (key_value % ALPHABET.len() as u64) as i64,
        })
    }
}

impl Cipher for CaesarCipher {
    fn encrypt(&self, message: &[u8]) -> Result<Vec<u8>, CipherError> {
        message.iter().map(|&ch| shift(ch, self.key)).collect()
    }

    fn decrypt(&self, cipher_text: &[u8]) -> Result<Vec<u8>, CipherError> {
        cipher_text.iter().map(|&ch| shift(ch, -self.key)).collect()
    }
}


/// Vigenere cipher
/// https://en.wikipedia.org/wiki/Vigen%C3%A8re_cipher
#[derive(Clone, Debug)]
pub struct VigenereCipher {
    shifts: Vec<i64>,
}

impl VigenereCipher {
    pub fn new(key: &str) -> Result<Self, CipherError> {
        let shifts = transliterate(key)
            .bytes()
            .map(|ch| letter_index(ch).map(|x| x as i64))
            .collect::<Result<Vec<_>, _>>()?;
        if shifts.is_empty() {
            Err(CipherError::InvalidKey(key.to_owned()))
        } else {
            Ok(Self { shifts })
        }
    }
}

impl Cipher for VigenereCipher {
    fn encrypt(&self, message: &[u8]) -> Result<Vec<u8>, CipherError> {
        message
            .iter()
            .zip(self.shifts.iter().cycle())
            .map(|(&ch, &by)| shift(ch, by))
            .collect()
    }

    fn decrypt(&self, cipher_text: &[u8]) -> Result<Vec<u8>, CipherError> {
        cipher_text
            .iter()
            .zip(self.shifts.iter().cycle())
            .map(|(&ch, &by)| shift(ch, -by))
            .collect()
    }
}


fn inverse_map<K, V>(m: HashMap<K, V>) -> HashMap<V, K>
where
    V: Eq + Hash,
{
    let mut result = HashMap::with_capacity(m.capacity());
    for (k, v) in m {
        result.insert(v, k);
    }
    result
}

const GRID_SIZE: usize = 5;

fn merge_j(ch: u8) -> u8 {
    if ch == b'J' {
        b'I'
    } else {
        ch
    }
}

/// Playfair cipher over a 5x5 grid with J merged into I
/// https://en.wikipedia.org/wiki/Playfair_cipher
#[derive(Clone, Debug)]
pub struct PlayfairCipher {
    letters: HashMap<(usize, usize), u8>,
    positions: HashMap<u8, (usize, usize)>,
}

impl PlayfairCipher {
    pub fn new(key: &str) -> Self {
        let mut order = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for ch in transliterate(key)
            .bytes()
            .chain(ALPHABET.iter().copied())
            .map(merge_j)
        {
            if !order.contains(&ch) {
                order.push(ch);
            }
        }
        let letters: HashMap<_, _> = order
            .into_iter()
            .enumerate()
            .map(|(i, ch)| ((i / GRID_SIZE, i % GRID_SIZE), ch))
            .collect();
        let positions = inverse_map(letters.clone());
        Self { letters, positions }
    }

    fn position(&self, ch: u8) -> Result<(usize, usize), CipherError> {
        self.positions
            .get(&ch)
            .copied()
            .ok_or(CipherError::UnknownCharacter(ch))
    }

    /// Splits repeated letters within a digraph and pads to even length
    fn prepare(message: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut text: Vec<u8> = Vec::with_capacity(message.len() + 1);
        for &ch in message {
            letter_index(ch)?;
            let ch = merge_j(ch);
            if text.len() % 2 == 1 && text.last() == Some(&ch) {
                text.push(if ch == b'X' { b'Q' } else { b'X' });
            }
            text.push(ch);
        }
        if text.len() % 2 == 1 {
            text.push(if text.last() == Some(&b'Z') { b'X' } else { b'Z' });
        }
        Ok(text)
    }

    /// `step` is 1 to encrypt and `GRID_SIZE - 1` to decrypt
    fn substitute(&self, text: &[u8], step: usize) -> Result<Vec<u8>, CipherError> {
        let mut result = Vec::with_capacity(text.len());
        for pair in text.chunks(2) {
            let (mut r1, mut c1) = self.position(pair[0])?;
            let (mut r2, mut c2) = self.position(pair[1])?;
            if r1 == r2 {
                c1 = (c1 + step) % GRID_SIZE;
                c2 = (c2 + step) % GRID_SIZE;
            } else if c1 == c2 {
                r1 = (r1 + step) % GRID_SIZE;
                r2 = (r2 + step) % GRID_SIZE;
            } else {
                std::mem::swap(&mut c1, &mut c2);
            }
            result.push(self.letters[&(r1, c1)]);
            result.push(self.letters[&(r2, c2)]);
        }
        Ok(result)
    }
}

impl Cipher for PlayfairCipher {
    fn encrypt(&self, message: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.substitute(&Self::prepare(message)?, 1)
    }

    fn decrypt(&self, cipher_text: &[u8]) -> Result<Vec<u8>, CipherError> {
        if cipher_text.len() % 2 == 1 {
            return Err(CipherError::OddLength);
        }
        self.substitute(cipher_text, GRID_SIZE - 1)
    }
}
