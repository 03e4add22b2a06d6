//! Font-aware decoding of PDF string operands.
//!
//! Text-showing operators carry character codes, not text. A font's
//! `/ToUnicode` CMap maps codes to Unicode; simple fonts without one fall
//! back to WinAnsi-style bytes adjusted by `/Differences`. Two-byte
//! (Type0) fonts without a CMap cannot be read and decode to nothing.

use lopdf::{Dictionary, Document, Object, ObjectId};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Decoders for a page's font resources, keyed by resource name (`F1`).
pub type FontMap = HashMap<Vec<u8>, FontDecoder>;

/// Resource inheritance is followed at most this many `/Parent` links up.
const MAX_PARENT_DEPTH: usize = 32;

/// Ranges wider than this in a `bfrange` entry are ignored.
const MAX_RANGE_SPAN: u32 = 0xFFFF;

/// WinAnsiEncoding for 0x80..=0x9F. The rest of the byte range is Latin-1.
const WIN_ANSI_HIGH: [char; 32] = [
    '€', '\u{FFFD}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{FFFD}', 'Ž',
    '\u{FFFD}', '\u{FFFD}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ',
    '\u{FFFD}', 'ž', 'Ÿ',
];

/// Maps character codes of one font to text.
#[derive(Debug, Clone, Default)]
pub struct FontDecoder {
    two_byte: bool,
    to_unicode: HashMap<u32, String>,
    differences: HashMap<u8, char>,
}

impl FontDecoder {
    /// Builds a decoder from a font dictionary, reading its `/ToUnicode`
    /// stream and `/Encoding` differences when present.
    pub fn from_dictionary(doc: &Document, font: &Dictionary) -> Self {
        let two_byte = font
            .get(b"Subtype")
            .and_then(Object::as_name)
            .is_ok_and(|subtype| subtype == b"Type0");

        let to_unicode = font
            .get(b"ToUnicode")
            .ok()
            .and_then(|obj| resolve(doc, obj))
            .and_then(|obj| obj.as_stream().ok())
            .map(|stream| {
                let data = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                parse_to_unicode(&String::from_utf8_lossy(&data))
            })
            .unwrap_or_default();

        let differences = font
            .get(b"Encoding")
            .ok()
            .and_then(|obj| resolve(doc, obj))
            .and_then(|obj| obj.as_dict().ok())
            .and_then(|enc| enc.get(b"Differences").ok())
            .and_then(|obj| obj.as_array().ok())
            .map(|items| parse_differences(items))
            .unwrap_or_default();

        Self {
            two_byte,
            to_unicode,
            differences,
        }
    }

    /// A two-byte font decoder with an explicit code map.
    pub fn two_byte(to_unicode: HashMap<u32, String>) -> Self {
        Self {
            two_byte: true,
            to_unicode,
            differences: HashMap::new(),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        let mut text = String::new();
        if self.two_byte {
            for pair in bytes.chunks(2) {
                let code = pair.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                if let Some(mapped) = self.to_unicode.get(&code) {
                    text.push_str(mapped);
                }
            }
            return text;
        }

        for &byte in bytes {
            if let Some(mapped) = self.to_unicode.get(&u32::from(byte)) {
                text.push_str(mapped);
            } else if let Some(&c) = self.differences.get(&byte) {
                text.push(c);
            } else {
                push_single_byte(&mut text, byte);
            }
        }
        text
    }
}

fn push_single_byte(text: &mut String, byte: u8) {
    match byte {
        b'\t' | b'\n' | b'\r' => text.push(' '),
        0x00..=0x1F | 0x7F => {}
        0x80..=0x9F => text.push(WIN_ANSI_HIGH[usize::from(byte - 0x80)]),
        _ => text.push(char::from(byte)),
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Collects decoders for the fonts visible on a page.
///
/// The nearest `/Resources` dictionary wins, walking up `/Parent` links for
/// pages that inherit their resources from the page tree.
pub fn page_fonts(doc: &Document, page_id: ObjectId) -> FontMap {
    let mut fonts = FontMap::new();
    let Ok(mut node) = doc.get_dictionary(page_id) else {
        return fonts;
    };

    for _ in 0..MAX_PARENT_DEPTH {
        let resources = node
            .get(b"Resources")
            .ok()
            .and_then(|obj| resolve(doc, obj))
            .and_then(|obj| obj.as_dict().ok());
        if let Some(resources) = resources {
            let font_dict = resources
                .get(b"Font")
                .ok()
                .and_then(|obj| resolve(doc, obj))
                .and_then(|obj| obj.as_dict().ok());
            if let Some(font_dict) = font_dict {
                for (name, obj) in font_dict.iter() {
                    if let Some(font) = resolve(doc, obj).and_then(|o| o.as_dict().ok()) {
                        fonts.insert(name.clone(), FontDecoder::from_dictionary(doc, font));
                    }
                }
            }
            break;
        }

        let parent = node
            .get(b"Parent")
            .ok()
            .and_then(|obj| obj.as_reference().ok())
            .and_then(|id| doc.get_dictionary(id).ok());
        match parent {
            Some(parent) => node = parent,
            None => break,
        }
    }
    fonts
}

fn parse_differences(items: &[Object]) -> HashMap<u8, char> {
    let mut map = HashMap::new();
    let mut code: Option<u32> = None;
    for item in items {
        match item {
            Object::Integer(start) => code = u32::try_from(*start).ok(),
            Object::Name(name) => {
                if let Some(current) = code {
                    let glyph = glyph_char(&String::from_utf8_lossy(name));
                    if let (Ok(byte), Some(c)) = (u8::try_from(current), glyph) {
                        map.insert(byte, c);
                    }
                    code = Some(current + 1);
                }
            }
            _ => {}
        }
    }
    map
}

/// Resolves an Adobe glyph name for the common Latin glyphs.
fn glyph_char(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c);
        }
    }

    let c = match name {
        "space" => ' ',
        "exclam" => '!',
        "quotedbl" => '"',
        "numbersign" => '#',
        "dollar" => '$',
        "percent" => '%',
        "ampersand" => '&',
        "quotesingle" => '\'',
        "parenleft" => '(',
        "parenright" => ')',
        "asterisk" => '*',
        "plus" => '+',
        "comma" => ',',
        "hyphen" => '-',
        "period" => '.',
        "slash" => '/',
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        "colon" => ':',
        "semicolon" => ';',
        "less" => '<',
        "equal" => '=',
        "greater" => '>',
        "question" => '?',
        "at" => '@',
        "bracketleft" => '[',
        "backslash" => '\\',
        "bracketright" => ']',
        "underscore" => '_',
        "quoteleft" => '‘',
        "quoteright" => '’',
        "endash" => '–',
        "emdash" => '—',
        "bullet" => '•',
        _ => return None,
    };
    Some(c)
}

fn bfchar_sections() -> &'static Regex {
    static PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)beginbfchar(.*?)endbfchar").expect("Valid bfchar regex"));
    &PATTERN
}

fn bfrange_sections() -> &'static Regex {
    static PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)beginbfrange(.*?)endbfrange").expect("Valid bfrange regex"));
    &PATTERN
}

fn char_entry() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]*)>").expect("Valid bfchar entry regex")
    });
    &PATTERN
}

fn range_entry() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>\s*(?:<([0-9A-Fa-f]*)>|\[([^\]]*)\])")
            .expect("Valid bfrange entry regex")
    });
    &PATTERN
}

fn hex_token() -> &'static Regex {
    static PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"<([0-9A-Fa-f]*)>").expect("Valid hex token regex"));
    &PATTERN
}

fn hex_code(hex: &str) -> Option<u32> {
    u32::from_str_radix(hex, 16).ok()
}

fn hex_units(hex: &str) -> Vec<u16> {
    let bytes: Vec<u8> = hex
        .as_bytes()
        .chunks(2)
        .filter_map(|pair| std::str::from_utf8(pair).ok())
        .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
        .collect();
    if bytes.len() % 2 == 1 {
        return bytes.into_iter().map(u16::from).collect();
    }
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect()
}

/// Parses the `bfchar` and `bfrange` mappings of a ToUnicode CMap.
pub fn parse_to_unicode(cmap: &str) -> HashMap<u32, String> {
    let mut map = HashMap::new();

    for section in bfchar_sections().captures_iter(cmap) {
        for entry in char_entry().captures_iter(&section[1]) {
            if let Some(code) = hex_code(&entry[1]) {
                map.insert(code, String::from_utf16_lossy(&hex_units(&entry[2])));
            }
        }
    }

    for section in bfrange_sections().captures_iter(cmap) {
        for entry in range_entry().captures_iter(&section[1]) {
            let (Some(lo), Some(hi)) = (hex_code(&entry[1]), hex_code(&entry[2])) else {
                continue;
            };
            if hi < lo || hi - lo > MAX_RANGE_SPAN {
                continue;
            }

            if let Some(start) = entry.get(3) {
                let base = hex_units(start.as_str());
                let Some((&last, prefix)) = base.split_last() else {
                    continue;
                };
                for (offset, code) in (lo..=hi).enumerate() {
                    let Ok(offset) = u16::try_from(offset) else {
                        break;
                    };
                    let mut units = prefix.to_vec();
                    units.push(last.wrapping_add(offset));
                    map.insert(code, String::from_utf16_lossy(&units));
                }
            } else if let Some(list) = entry.get(4) {
                for (code, target) in (lo..=hi).zip(hex_token().captures_iter(list.as_str())) {
                    map.insert(code, String::from_utf16_lossy(&hex_units(&target[1])));
                }
            }
        }
    }

    map
}
