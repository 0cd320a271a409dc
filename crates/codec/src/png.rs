//! PNG strategy: the record travels in a `tEXt` chunk with keyword
//! `refig`. `tEXt` is ancillary, so decoders that do not know the
//! keyword skip it and the decoded pixel buffer is unaffected.

use crate::format::PNG_SIGNATURE;

const METADATA_KEYWORD: &[u8] = b"refig";
const TEXT_CHUNK: [u8; 4] = *b"tEXt";
const IHDR_CHUNK: [u8; 4] = *b"IHDR";

struct Chunk<'a> {
    kind: [u8; 4],
    data: &'a [u8],
    /// Byte range of the whole chunk (length + type + data + CRC)
    /// within the stream the iterator was created over.
    start: usize,
    end: usize,
}

impl Chunk<'_> {
    fn is_refig_text(&self) -> bool {
        self.kind == TEXT_CHUNK
            && self.data.len() > METADATA_KEYWORD.len()
            && self.data.starts_with(METADATA_KEYWORD)
            && self.data[METADATA_KEYWORD.len()] == 0
    }
}

/// Walks the chunk stream after the signature. Stops (rather than
/// failing) at a truncated or malformed tail, so extraction tolerates
/// files other tools damaged.
struct ChunkIter<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ChunkIter<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let header = self.bytes.get(self.offset..self.offset.checked_add(8)?)?;
        let length = u32::from_be_bytes(header[..4].try_into().expect("4-byte slice")) as usize;
        let kind: [u8; 4] = header[4..8].try_into().expect("4-byte slice");

        let data_start = self.offset + 8;
        let data_end = data_start.checked_add(length)?;
        let end = data_end.checked_add(4)?;
        self.bytes.get(data_start..end)?;

        let chunk = Chunk {
            kind,
            data: &self.bytes[data_start..data_end],
            start: self.offset,
            end,
        };
        self.offset = end;
        Some(chunk)
    }
}

fn build_text_chunk(json: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(METADATA_KEYWORD.len() + 1 + json.len());
    data.extend_from_slice(METADATA_KEYWORD);
    data.push(0);
    data.extend_from_slice(json.as_bytes());

    let mut chunk = Vec::with_capacity(data.len() + 12);
    chunk.extend_from_slice(&(data.len() as u32).to_be_bytes());
    chunk.extend_from_slice(&TEXT_CHUNK);
    chunk.extend_from_slice(&data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&TEXT_CHUNK);
    hasher.update(&data);
    chunk.extend_from_slice(&hasher.finalize().to_be_bytes());
    chunk
}

/// Insert the record chunk, replacing any previous refig annotation.
///
/// The annotation goes directly after `IHDR` to keep the output a
/// conformant PNG. All other chunks are copied verbatim, as is any
/// unparseable tail.
pub(crate) fn embed(payload: &[u8], json: &str) -> Vec<u8> {
    debug_assert!(payload.starts_with(&PNG_SIGNATURE));
    let body = &payload[PNG_SIGNATURE.len()..];
    let annotation = build_text_chunk(json);

    let mut out = Vec::with_capacity(payload.len() + annotation.len());
    out.extend_from_slice(&PNG_SIGNATURE);

    let mut inserted = false;
    let mut consumed = 0;
    for chunk in ChunkIter::new(body) {
        if chunk.is_refig_text() {
            consumed = chunk.end;
            continue;
        }
        out.extend_from_slice(&body[chunk.start..chunk.end]);
        consumed = chunk.end;
        if !inserted && chunk.kind == IHDR_CHUNK {
            out.extend_from_slice(&annotation);
            inserted = true;
        }
    }
    if !inserted {
        out.extend_from_slice(&annotation);
    }
    // Preserve trailing bytes the chunk walk could not parse.
    out.extend_from_slice(&body[consumed..]);
    out
}

/// Pull the embedded record text back out, if any.
pub(crate) fn extract(payload: &[u8]) -> Option<String> {
    debug_assert!(payload.starts_with(&PNG_SIGNATURE));
    let body = &payload[PNG_SIGNATURE.len()..];
    for chunk in ChunkIter::new(body) {
        if chunk.is_refig_text() {
            let text = &chunk.data[METADATA_KEYWORD.len() + 1..];
            return String::from_utf8(text.to_vec()).ok();
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(kind);
        out.extend_from_slice(data);
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(kind);
        hasher.update(data);
        out.extend_from_slice(&hasher.finalize().to_be_bytes());
        out
    }

    /// Smallest PNG-shaped payload the codec cares about: signature,
    /// IHDR, one IDAT, IEND. The IDAT bytes are arbitrary; the codec
    /// never inflates pixel data.
    pub(crate) fn tiny_png() -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        let ihdr = [0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0];
        out.extend_from_slice(&chunk(b"IHDR", &ihdr));
        out.extend_from_slice(&chunk(b"IDAT", &[0x78, 0x9C, 0x62, 0x00, 0x01]));
        out.extend_from_slice(&chunk(b"IEND", &[]));
        out
    }

    fn chunk_kinds(payload: &[u8]) -> Vec<[u8; 4]> {
        ChunkIter::new(&payload[PNG_SIGNATURE.len()..])
            .map(|c| c.kind)
            .collect()
    }

    fn pixel_chunks(payload: &[u8]) -> Vec<Vec<u8>> {
        let body = &payload[PNG_SIGNATURE.len()..];
        ChunkIter::new(body)
            .filter(|c| !c.is_refig_text())
            .map(|c| body[c.start..c.end].to_vec())
            .collect()
    }

    #[test]
    fn embeds_after_ihdr_and_extracts() {
        let annotated = embed(&tiny_png(), r#"{"figure":"a.png"}"#);
        assert_eq!(
            chunk_kinds(&annotated),
            vec![*b"IHDR", *b"tEXt", *b"IDAT", *b"IEND"]
        );
        assert_eq!(extract(&annotated), Some(r#"{"figure":"a.png"}"#.to_string()));
    }

    #[test]
    fn embed_leaves_other_chunks_byte_identical() {
        let original = tiny_png();
        let annotated = embed(&original, r#"{"figure":"a.png"}"#);
        assert_eq!(pixel_chunks(&annotated), pixel_chunks(&original));
    }

    #[test]
    fn re_embed_replaces_previous_annotation() {
        let once = embed(&tiny_png(), r#"{"figure":"a.png","git_commit":"a1b2c3"}"#);
        let twice = embed(&once, r#"{"figure":"a.png","git_commit":"d4e5f6"}"#);

        let refig_chunks = ChunkIter::new(&twice[PNG_SIGNATURE.len()..])
            .filter(|c| c.is_refig_text())
            .count();
        assert_eq!(refig_chunks, 1);
        assert_eq!(
            extract(&twice),
            Some(r#"{"figure":"a.png","git_commit":"d4e5f6"}"#.to_string())
        );
    }

    #[test]
    fn extract_without_annotation_is_none() {
        assert_eq!(extract(&tiny_png()), None);
    }

    #[test]
    fn extract_ignores_foreign_text_chunks() {
        let mut payload = PNG_SIGNATURE.to_vec();
        payload.extend_from_slice(&chunk(b"IHDR", &[0; 13]));
        payload.extend_from_slice(&chunk(b"tEXt", b"Author\0somebody"));
        payload.extend_from_slice(&chunk(b"IEND", &[]));
        assert_eq!(extract(&payload), None);
    }

    #[test]
    fn extract_tolerates_truncated_tail() {
        let mut payload = embed(&tiny_png(), r#"{"figure":"a.png"}"#);
        payload.extend_from_slice(&[0xDE, 0xAD, 0xBE]);
        assert_eq!(extract(&payload), Some(r#"{"figure":"a.png"}"#.to_string()));
    }
}
