//! Destination cleaning for autolinks.

use crate::Chunk;
use crate::error::{ModelError, Result};

const MAILTO: &[u8] = b"mailto:";

/// Turn the raw text of an autolink into an owned destination.
///
/// The chunk is trimmed, email addresses get a `mailto:` prefix, and HTML
/// entities are decoded. Input that cannot be cleaned (empty after
/// trimming or not UTF-8) is returned as raw bytes rather than dropped.
/// A chunk that does not lie within `source` is
/// [`ModelError::ChunkOutOfRange`].
///
/// # Example
/// ```
/// use marktree::{Chunk, inline::clean_autolink};
///
/// let src = b" a@b.org ";
/// let url = clean_autolink(src, Chunk::whole(src), true).unwrap();
/// assert_eq!(url, b"mailto:a@b.org");
/// ```
pub fn clean_autolink(source: &[u8], url: Chunk, is_email: bool) -> Result<Vec<u8>> {
    let Some(raw) = url.get(source) else {
        return Err(ModelError::ChunkOutOfRange {
            start: url.start,
            end: url.end,
            len: source.len(),
        });
    };

    let trimmed = url.trim(source).slice(source);
    if trimmed.is_empty() {
        tracing::debug!("empty autolink kept as raw text");
        return copy_raw(raw);
    }

    let Ok(text) = std::str::from_utf8(trimmed) else {
        tracing::debug!("autolink is not UTF-8; kept as raw text");
        return copy_raw(trimmed);
    };

    let decoded = html_escape::decode_html_entities(text);
    let prefix: &[u8] = if is_email { MAILTO } else { &[] };
    let mut out = Vec::new();
    out.try_reserve_exact(prefix.len() + decoded.len())?;
    out.extend_from_slice(prefix);
    out.extend_from_slice(decoded.as_bytes());
    Ok(out)
}

fn copy_raw(raw: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(raw.len())?;
    out.extend_from_slice(raw);
    Ok(out)
}
