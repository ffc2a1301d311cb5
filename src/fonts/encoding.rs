//! WinAnsiEncoding (PDF Reference, Appendix D) for simple fonts.

/// Replacement byte for characters that cannot be encoded.
pub const REPLACEMENT: u8 = b'?';

/// Code points for bytes 0x80..=0x9F; `None` marks undefined codes.
const HIGH_CONTROL: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

/// Encode a single character, or `None` if WinAnsi has no code for it.
pub fn encode_char(c: char) -> Option<u8> {
    let cp = c as u32;
    match cp {
        0x20..=0x7E | 0xA0..=0xFF => Some(cp as u8),
        _ => HIGH_CONTROL
            .iter()
            .position(|m| *m == Some(c))
            .map(|i| 0x80 + i as u8),
    }
}

/// Decode a single byte, or `None` for control and undefined codes.
pub fn decode_byte(b: u8) -> Option<char> {
    match b {
        0x20..=0x7E | 0xA0..=0xFF => Some(b as char),
        0x80..=0x9F => HIGH_CONTROL[(b - 0x80) as usize],
        _ => None,
    }
}

/// Result of encoding a string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    /// Encoded bytes, with [`REPLACEMENT`] in place of unencodable characters
    pub bytes: Vec<u8>,
    /// Characters that were replaced, in order of first appearance
    pub unencodable: Vec<char>,
}

/// Encode `text`, replacing characters WinAnsi cannot represent.
pub fn encode(text: &str) -> Encoded {
    let mut out = Encoded::default();
    for c in text.chars() {
        match encode_char(c) {
            Some(b) => out.bytes.push(b),
            None => {
                out.bytes.push(REPLACEMENT);
                if !out.unencodable.contains(&c) {
                    out.unencodable.push(c);
                }
            }
        }
    }
    out
}
