//! Charset decoding for export HTML files.
//!
//! Medium exports are nominally UTF-8, but archives passed through other
//! tooling show up in legacy encodings often enough that decoding is done
//! defensively: BOM -> `<meta charset>` sniff -> chardetng detection, always
//! lossy so a stray byte degrades to U+FFFD instead of failing the file.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// How many leading bytes the meta-charset sniffer inspects.
const META_SNIFF_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
}

/// Decodes raw file bytes into UTF-8 text.
pub fn decode_html(bytes: &[u8]) -> DecodedHtml {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = sniff_meta_charset(bytes) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, encoding);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

/// Looks for `charset=` inside the document head prefix.
fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let prefix = &bytes[..bytes.len().min(META_SNIFF_LIMIT)];
    let text = String::from_utf8_lossy(prefix).to_lowercase();
    let idx = text.find("charset=")?;
    let rest = &text[idx + "charset=".len()..];
    let rest = rest.trim_start_matches(['"', '\'']);
    let label: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
        .collect();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedHtml {
    let (text, _, _) = encoding.decode(bytes);
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
    }
}
