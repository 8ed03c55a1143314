//! Text encoding detection and strict decoding.
//!
//! Government open-data exports in Taiwan are still frequently Big5/CP950,
//! while re-saved spreadsheets come back as UTF-8 (with or without a BOM)
//! or GBK. We ask `chardetng` for a best guess, then fall back through a
//! fixed list of encodings, decoding strictly so that a wrong guess fails
//! instead of producing mojibake.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{BIG5, Encoding, GBK, UTF_8, WINDOWS_1252};

use crate::NormalizeError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A decoder to try, with the label it is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingCandidate {
    /// Label reported in logs and stored on the dataset.
    pub label: &'static str,
    /// The underlying decoder.
    pub encoding: &'static Encoding,
    /// Whether a leading UTF-8 byte order mark is removed before decoding.
    pub strip_bom: bool,
}

impl EncodingCandidate {
    const fn new(label: &'static str, encoding: &'static Encoding, strip_bom: bool) -> Self {
        Self {
            label,
            encoding,
            strip_bom,
        }
    }

    /// Candidate for an encoding reported by the detector.
    #[must_use]
    pub fn detected(encoding: &'static Encoding) -> Self {
        Self::new(encoding.name(), encoding, false)
    }

    /// Decodes `bytes` without replacement characters.
    ///
    /// Returns `None` if the bytes are malformed for this encoding.
    #[must_use]
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        let bytes = if self.strip_bom {
            bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
        } else {
            bytes
        };
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
    }

    fn same_decoder(&self, other: &Self) -> bool {
        self.encoding == other.encoding && self.strip_bom == other.strip_bom
    }
}

/// Fallback encodings in priority order.
///
/// CP950 and GB2312 resolve to the same decoders as Big5 and GBK.
#[must_use]
pub fn fallback_candidates() -> [EncodingCandidate; 7] {
    [
        EncodingCandidate::new("utf-8", UTF_8, false),
        EncodingCandidate::new("big5", BIG5, false),
        EncodingCandidate::new("cp950", BIG5, false),
        EncodingCandidate::new("gb2312", GBK, false),
        EncodingCandidate::new("gbk", GBK, false),
        EncodingCandidate::new("utf-8-sig", UTF_8, true),
        EncodingCandidate::new("latin1", WINDOWS_1252, false),
    ]
}

/// Runs the statistical detector over the whole buffer.
#[must_use]
pub fn detect(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Builds the ordered candidate list: the detected encoding first, then the
/// fallbacks, keeping only the first occurrence of each decoder.
#[must_use]
pub fn candidates(detected: &'static Encoding) -> Vec<EncodingCandidate> {
    let mut out: Vec<EncodingCandidate> = Vec::with_capacity(8);

    for candidate in std::iter::once(EncodingCandidate::detected(detected))
        .chain(fallback_candidates())
    {
        if !out.iter().any(|c| c.same_decoder(&candidate)) {
            out.push(candidate);
        }
    }

    out
}

/// Plain text decoded from a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// The decoded text.
    pub text: String,
    /// Label of the encoding that succeeded.
    pub encoding: &'static str,
}

/// Decodes `bytes` with the first candidate that accepts them, without
/// requiring the text to be tabular. Used for the fixed-width default file.
///
/// # Errors
///
/// Returns [`NormalizeError::UnparsableFile`] if every candidate fails.
pub fn decode_text(bytes: &[u8]) -> Result<DecodedText, NormalizeError> {
    candidates(detect(bytes))
        .into_iter()
        .find_map(|candidate| {
            candidate.decode(bytes).map(|text| DecodedText {
                text: text.into_owned(),
                encoding: candidate.label,
            })
        })
        .ok_or(NormalizeError::UnparsableFile)
}
