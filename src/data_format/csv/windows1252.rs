//! Unicode to Windows-1252 transliteration.
//!
//! Text is first composed to NFC. Characters in the code page repertoire map
//! to their byte. Characters outside it are replaced by their nearest visual
//! equivalent from the [`transliterate`] table, or else by their canonical
//! decomposition with the combining marks stripped; anything left is dropped.

use unicode_normalization::{
    UnicodeNormalization,
    char::{decompose_canonical, is_combining_mark},
};

/// Code points of bytes `0x80..=0x9F`. `None` marks the five undefined bytes.
const HIGH_CONTROL_RANGE: [Option<char>; 32] = [
    Some('\u{20AC}'), // 0x80 €
    None,             // 0x81
    Some('\u{201A}'), // 0x82 ‚
    Some('\u{0192}'), // 0x83 ƒ
    Some('\u{201E}'), // 0x84 „
    Some('\u{2026}'), // 0x85 …
    Some('\u{2020}'), // 0x86 †
    Some('\u{2021}'), // 0x87 ‡
    Some('\u{02C6}'), // 0x88 ˆ
    Some('\u{2030}'), // 0x89 ‰
    Some('\u{0160}'), // 0x8A Š
    Some('\u{2039}'), // 0x8B ‹
    Some('\u{0152}'), // 0x8C Œ
    None,             // 0x8D
    Some('\u{017D}'), // 0x8E Ž
    None,             // 0x8F
    None,             // 0x90
    Some('\u{2018}'), // 0x91 ‘
    Some('\u{2019}'), // 0x92 ’
    Some('\u{201C}'), // 0x93 “
    Some('\u{201D}'), // 0x94 ”
    Some('\u{2022}'), // 0x95 •
    Some('\u{2013}'), // 0x96 –
    Some('\u{2014}'), // 0x97 —
    Some('\u{02DC}'), // 0x98 ˜
    Some('\u{2122}'), // 0x99 ™
    Some('\u{0161}'), // 0x9A š
    Some('\u{203A}'), // 0x9B ›
    Some('\u{0153}'), // 0x9C œ
    None,             // 0x9D
    Some('\u{017E}'), // 0x9E ž
    Some('\u{0178}'), // 0x9F Ÿ
];

/// Returns the byte for `ch` when it belongs to the code page.
pub fn encode_char(ch: char) -> Option<u8> {
    let cp = ch as u32;
    match cp {
        0x00..=0x7F | 0xA0..=0xFF => Some(cp as u8),
        _ => HIGH_CONTROL_RANGE
            .iter()
            .position(|mapped| *mapped == Some(ch))
            .map(|index| 0x80 + index as u8),
    }
}

/// Nearest visual equivalent for characters outside the code page.
///
/// Replacements only contain characters the code page can represent.
/// `Some("")` means the character is silently removed (zero-width marks).
pub fn transliterate(ch: char) -> Option<&'static str> {
    let replacement = match ch {
        // Latin Extended-A
        'Ā' | 'Ă' | 'Ą' | 'Ǎ' => "A",
        'ā' | 'ă' | 'ą' | 'ǎ' => "a",
        'Ć' | 'Ĉ' | 'Ċ' | 'Č' => "C",
        'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'Ď' | 'Đ' => "D",
        'ď' | 'đ' => "d",
        'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĥ' | 'Ħ' => "H",
        'ĥ' | 'ħ' => "h",
        'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' => "K",
        'ķ' | 'ĸ' => "k",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ŀ' | 'Ł' => "L",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'Ń' | 'Ņ' | 'Ň' | 'Ŋ' => "N",
        'ń' | 'ņ' | 'ň' | 'ŋ' => "n",
        'ŉ' => "'n",
        'Ō' | 'Ŏ' | 'Ő' => "O",
        'ō' | 'ŏ' | 'ő' => "o",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ś' | 'Ŝ' | 'Ş' | 'Ș' => "S",
        'ś' | 'ŝ' | 'ş' | 'ș' | 'ſ' => "s",
        'Ţ' | 'Ť' | 'Ŧ' | 'Ț' => "T",
        'ţ' | 'ť' | 'ŧ' | 'ț' => "t",
        'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ŵ' => "W",
        'ŵ' => "w",
        'Ŷ' => "Y",
        'ŷ' => "y",
        'Ź' | 'Ż' => "Z",
        'ź' | 'ż' => "z",

        // Ligatures
        'ﬀ' => "ff",
        'ﬁ' => "fi",
        'ﬂ' => "fl",
        'ﬃ' => "ffi",
        'ﬄ' => "ffl",
        'ﬅ' | 'ﬆ' => "st",

        // Punctuation
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2043}' | '\u{2212}' => "-",
        '\u{2015}' => "\u{2014}",
        '\u{201B}' | '\u{2032}' => "'",
        '\u{201F}' | '\u{2033}' => "\"",
        '\u{2024}' => ".",
        '\u{2025}' => "..",
        '\u{2044}' | '\u{2215}' => "/",
        '\u{2217}' => "*",
        '\u{2219}' => "\u{00B7}",
        '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => " ",
        '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}' => "",

        // Symbols
        '\u{03BC}' => "\u{00B5}",
        '\u{2103}' => "\u{00B0}C",
        '\u{2116}' => "No",
        '\u{2120}' => "SM",
        '\u{20A4}' => "\u{00A3}",
        '\u{2153}' => "1/3",
        '\u{2154}' => "2/3",
        '\u{215B}' => "1/8",
        '\u{2190}' => "<-",
        '\u{2192}' => "->",
        '\u{2194}' => "<->",
        '\u{21D2}' => "=>",
        '\u{2260}' => "!=",
        '\u{2264}' => "<=",
        '\u{2265}' => ">=",

        _ => return None,
    };
    Some(replacement)
}

/// Encodes `text` into Windows-1252 bytes.
///
/// # Examples
///
/// ```
/// use data_format_rs::data_format::csv::windows1252::encode;
///
/// assert_eq!(encode("Café"), b"Caf\xE9");
/// assert_eq!(encode("Cafe\u{301}"), b"Caf\xE9");
/// assert_eq!(encode("Łódź"), b"L\xF3dz");
/// assert_eq!(encode("Nguyễn"), b"Nguyen");
/// assert_eq!(encode("€ 5 \u{2264} 6"), b"\x80 5 <= 6");
/// // No reasonable equivalent: dropped
/// assert_eq!(encode("日本 ok"), b" ok");
/// ```
pub fn encode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.nfc() {
        if let Some(byte) = encode_char(ch) {
            out.push(byte);
        } else if let Some(replacement) = transliterate(ch) {
            out.extend(replacement.chars().filter_map(encode_char));
        } else {
            push_base_letters(ch, &mut out);
        }
    }
    out
}

/// Writes the canonical decomposition of `ch` without its combining marks.
fn push_base_letters(ch: char, out: &mut Vec<u8>) {
    decompose_canonical(ch, |part| {
        if is_combining_mark(part) {
            return;
        }
        if let Some(byte) = encode_char(part) {
            out.push(byte);
        } else if let Some(replacement) = transliterate(part) {
            out.extend(replacement.chars().filter_map(encode_char));
        }
    });
}

/// Decodes Windows-1252 bytes. Undefined bytes map to the matching C1 control.
///
/// # Examples
///
/// ```
/// use data_format_rs::data_format::csv::windows1252::decode;
///
/// assert_eq!(decode(b"Caf\xE9 \x80"), "Café €");
/// ```
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&byte| match byte {
            0x80..=0x9F => HIGH_CONTROL_RANGE[(byte - 0x80) as usize]
                .unwrap_or(char::from(byte)),
            _ => char::from(byte),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_identity() {
        let text = "id;name \"quoted\"\t\n~";
        assert_eq!(encode(text), text.as_bytes());
    }

    #[test]
    fn latin1_range_maps_to_same_byte() {
        for cp in 0xA0u32..=0xFF {
            let ch = char::from_u32(cp).unwrap();
            assert_eq!(encode_char(ch), Some(cp as u8), "U+{:04X}", cp);
        }
    }

    #[test]
    fn high_control_range_characters() {
        let cases = [
            ('€', 0x80),
            ('‚', 0x82),
            ('ƒ', 0x83),
            ('„', 0x84),
            ('…', 0x85),
            ('Š', 0x8A),
            ('Œ', 0x8C),
            ('Ž', 0x8E),
            ('‘', 0x91),
            ('’', 0x92),
            ('“', 0x93),
            ('”', 0x94),
            ('–', 0x96),
            ('—', 0x97),
            ('™', 0x99),
            ('š', 0x9A),
            ('œ', 0x9C),
            ('ž', 0x9E),
            ('Ÿ', 0x9F),
        ];
        for (ch, byte) in cases {
            assert_eq!(encode_char(ch), Some(byte), "{}", ch);
        }
    }

    #[test]
    fn c1_controls_are_not_in_the_code_page() {
        for cp in 0x80u32..=0x9F {
            let ch = char::from_u32(cp).unwrap();
            assert_eq!(encode_char(ch), None, "U+{:04X}", cp);
        }
    }

    /// Expected bytes for U+0100..=U+017F, sixteen code points per line.
    const LATIN_EXTENDED_A: [&[u8]; 128] = [
        b"A", b"a", b"A", b"a", b"A", b"a", b"C", b"c", b"C", b"c", b"C", b"c", b"C", b"c", b"D", b"d",
        b"D", b"d", b"E", b"e", b"E", b"e", b"E", b"e", b"E", b"e", b"E", b"e", b"G", b"g", b"G", b"g",
        b"G", b"g", b"G", b"g", b"H", b"h", b"H", b"h", b"I", b"i", b"I", b"i", b"I", b"i", b"I", b"i",
        b"I", b"i", b"IJ", b"ij", b"J", b"j", b"K", b"k", b"k", b"L", b"l", b"L", b"l", b"L", b"l", b"L",
        b"l", b"L", b"l", b"N", b"n", b"N", b"n", b"N", b"n", b"'n", b"N", b"n", b"O", b"o", b"O", b"o",
        b"O", b"o", b"\x8C", b"\x9C", b"R", b"r", b"R", b"r", b"R", b"r", b"S", b"s", b"S", b"s", b"S", b"s",
        b"\x8A", b"\x9A", b"T", b"t", b"T", b"t", b"T", b"t", b"U", b"u", b"U", b"u", b"U", b"u", b"U", b"u",
        b"U", b"u", b"U", b"u", b"W", b"w", b"Y", b"y", b"\x9F", b"Z", b"z", b"Z", b"z", b"\x8E", b"\x9E", b"s",
    ];

    #[test]
    fn latin_extended_a_is_fully_mapped() {
        for (offset, expected) in LATIN_EXTENDED_A.iter().enumerate() {
            let cp = 0x100 + offset as u32;
            let ch = char::from_u32(cp).unwrap();
            assert_eq!(encode(&ch.to_string()), *expected, "U+{:04X}", cp);
        }
    }

    #[test]
    fn letters_outside_the_table_lose_their_marks() {
        assert_eq!(encode("Nguyễn"), b"Nguyen");
        assert_eq!(encode("Đỗ"), b"Do");
        assert_eq!(encode("ǐ ơ ư"), b"i o u");
        assert_eq!(encode("Ḁḿ"), b"Am");
    }

    #[test]
    fn decomposed_input_is_composed_first() {
        assert_eq!(encode("Cafe\u{301}"), b"Caf\xE9");
        assert_eq!(encode("u\u{308}ber"), b"\xFCber");
        // ẽ has no code page form: the base letter is kept
        assert_eq!(encode("e\u{303}"), b"e");
        // A stray mark with no base is dropped
        assert_eq!(encode("\u{301}x"), b"x");
    }

    #[test]
    fn accented_latin_natively_encoded() {
        assert_eq!(encode("àâäçéèêëîïôöùûüÿ"), b"\xE0\xE2\xE4\xE7\xE9\xE8\xEA\xEB\xEE\xEF\xF4\xF6\xF9\xFB\xFC\xFF");
        assert_eq!(encode("ÀÉÑÖØß"), b"\xC0\xC9\xD1\xD6\xD8\xDF");
    }

    #[test]
    fn punctuation_and_spaces() {
        assert_eq!(encode("a\u{2010}b"), b"a-b");
        assert_eq!(encode("5\u{2032}11\u{2033}"), b"5'11\"");
        assert_eq!(encode("a\u{2003}b\u{200B}c"), b"a bc");
        assert_eq!(encode("x \u{2212} y"), b"x - y");
        assert_eq!(encode("\u{2015}"), b"\x97");
        assert_eq!(encode("\u{FEFF}id"), b"id");
    }

    #[test]
    fn symbols() {
        assert_eq!(encode("\u{03BC}m"), b"\xB5m");
        assert_eq!(encode("20\u{2103}"), b"20\xB0C");
        assert_eq!(encode("\u{2116} 5"), b"No 5");
        assert_eq!(encode("\u{FB01}ne"), b"fine");
    }

    #[test]
    fn characters_without_equivalent_are_dropped() {
        assert_eq!(encode("Ωmega"), b"mega");
        assert_eq!(encode("Привет!"), b"!");
        assert_eq!(encode("ok ✓"), b"ok ");
        assert_eq!(encode("😀"), b"");
    }

    #[test]
    fn every_replacement_is_encodable() {
        for cp in 0x100u32..=0xFFFF {
            let Some(ch) = char::from_u32(cp) else {
                continue;
            };
            if let Some(replacement) = transliterate(ch) {
                assert!(
                    replacement.chars().all(|c| encode_char(c).is_some()),
                    "U+{:04X}",
                    cp
                );
            }
        }
    }

    #[test]
    fn decode_inverts_encode_for_code_page_text() {
        let text = "Crème brûlée – 5 € „ok“ œuvre Ÿ";
        assert_eq!(decode(&encode(text)), text);
    }

    #[test]
    fn decode_undefined_bytes_as_c1_controls() {
        assert_eq!(decode(&[0x81, 0x8D]), "\u{81}\u{8D}");
    }
}
