//! SVG strategy: the record lives in a `<metadata id="refig">`
//! element. `<metadata>` is defined as non-rendering, so viewers and
//! bounding-box computations never see it.

use regex::Regex;
use std::sync::OnceLock;

use crate::format::svg_open_tag;

fn metadata_element() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // The regex crate has no backreferences; spell out both quote styles.
        Regex::new(r#"(?is)<metadata\b[^>]*\bid=(?:"refig"|'refig')[^>]*>(.*?)</metadata>"#)
            .expect("valid regex")
    })
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_xml(text: &str) -> String {
    // &amp; goes last so escaped ampersands do not re-trigger.
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Insert the record, replacing the body of an existing refig metadata
/// element when present, otherwise adding one right after the `<svg>`
/// open tag. `None` when the document has no `<svg>` root.
pub(crate) fn embed(text: &str, json: &str) -> Option<String> {
    let escaped = escape_xml(json);

    if let Some(found) = metadata_element().captures(text) {
        let body = found.get(1).expect("group 1 always captured");
        let mut out = String::with_capacity(text.len() + escaped.len());
        out.push_str(&text[..body.start()]);
        out.push_str(&escaped);
        out.push_str(&text[body.end()..]);
        return Some(out);
    }

    let open_tag = svg_open_tag().find(text)?;
    let mut out = String::with_capacity(text.len() + escaped.len() + 40);
    out.push_str(&text[..open_tag.end()]);
    out.push_str("\n  <metadata id=\"refig\">");
    out.push_str(&escaped);
    out.push_str("</metadata>\n");
    out.push_str(&text[open_tag.end()..]);
    Some(out)
}

/// Pull the embedded record text back out, if any.
pub(crate) fn extract(text: &str) -> Option<String> {
    let found = metadata_element().captures(text)?;
    let body = unescape_xml(found.get(1).expect("group 1 always captured").as_str());
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    Some(body.to_string())
}
