//! # Refig Codec
//!
//! Losslessly embeds a [`ProvenanceRecord`] into an image payload and
//! recovers it later, without changing what the image looks like.
//!
//! ## Strategies
//!
//! ```text
//! payload bytes
//!     │
//!     ├──> PNG  ──> ancillary tEXt chunk, keyword "refig"
//!     │
//!     └──> SVG  ──> non-rendering <metadata id="refig"> element
//! ```
//!
//! The format is decided by sniffing the payload, never by trusting a
//! filename. Extraction distinguishes three outcomes: a record
//! (`Ok(Some)`), a supported payload with no parseable record
//! (`Ok(None)`), and an unsupported payload (`Err(UnsupportedFormat)`).

mod error;
mod format;
mod png;
mod svg;

pub use error::{CodecError, Result};
pub use format::{ImageFormat, PNG_SIGNATURE};

use refig_record::ProvenanceRecord;

/// Embed `record` into `payload`, replacing any previous annotation.
///
/// The returned bytes render identically to the input; only the
/// ancillary metadata slot differs.
pub fn embed(payload: &[u8], record: &ProvenanceRecord) -> Result<Vec<u8>> {
    let format = ImageFormat::sniff(payload).ok_or(CodecError::UnsupportedFormat)?;
    let json = record.to_json()?;
    log::debug!(
        "embedding {} byte record into {:?} payload ({} bytes)",
        json.len(),
        format,
        payload.len()
    );
    match format {
        ImageFormat::Png => Ok(png::embed(payload, &json)),
        ImageFormat::Svg => {
            let text = std::str::from_utf8(payload).expect("sniff verified UTF-8");
            svg::embed(text, &json)
                .map(String::into_bytes)
                .ok_or(CodecError::UnsupportedFormat)
        }
    }
}

/// Recover the embedded record from `payload`, if one is present.
///
/// A slot that exists but does not parse as a refig record (foreign
/// tooling, corruption) yields `Ok(None)`, never an error.
pub fn extract(payload: &[u8]) -> Result<Option<ProvenanceRecord>> {
    let format = ImageFormat::sniff(payload).ok_or(CodecError::UnsupportedFormat)?;
    let text = match format {
        ImageFormat::Png => png::extract(payload),
        ImageFormat::Svg => {
            let doc = std::str::from_utf8(payload).expect("sniff verified UTF-8");
            svg::extract(doc)
        }
    };
    Ok(text.and_then(|json| match ProvenanceRecord::from_json(&json) {
        Ok(record) => Some(record),
        Err(err) => {
            log::debug!("annotation present but not a refig record: {err}");
            None
        }
    }))
}
