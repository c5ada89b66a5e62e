//! Link reference definitions (CommonMark).
//!
//! A fixed-size hash table keyed by normalized label. Each bucket is a
//! collision chain kept in insertion order; lookups compare the full
//! normalized label, never just the hash.

use crate::error::{ModelError, Result};
use crate::limits::{MAX_LINK_LABEL_LENGTH, REFMAP_SIZE};
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::hash::Hasher;

/// How link labels are normalized before hashing and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelNormalization {
    /// Case-fold, trim, and collapse internal whitespace runs to one space.
    #[default]
    CollapseWhitespace,
    /// Case-fold and trim only. `"foo  bar"` and `"foo bar"` stay distinct.
    CaseFoldOnly,
}

/// Which definition survives when a label is defined more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first definition; later ones are ignored.
    #[default]
    FirstWins,
    /// Replace the stored destination and title with the newest definition.
    LastWins,
}

/// A link reference definition (URL + optional title).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    label: Vec<u8>,
    pub url: Vec<u8>,
    pub title: Option<Vec<u8>>,
    hash: u64,
}

impl Reference {
    /// Normalized label this definition is stored under.
    pub fn label(&self) -> &[u8] {
        &self.label
    }

    /// Precomputed hash of the normalized label.
    pub fn hash(&self) -> u64 {
        self.hash
    }
}

type Bucket = SmallVec<[Reference; 2]>;

/// Store of link reference definitions, keyed by normalized label.
#[derive(Debug, Clone)]
pub struct ReferenceMap {
    buckets: [Bucket; REFMAP_SIZE],
    len: usize,
    normalization: LabelNormalization,
    duplicates: DuplicatePolicy,
}

impl Default for ReferenceMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::with_policy(LabelNormalization::default(), DuplicatePolicy::default())
    }

    pub fn with_policy(normalization: LabelNormalization, duplicates: DuplicatePolicy) -> Self {
        Self {
            buckets: std::array::from_fn(|_| Bucket::new()),
            len: 0,
            normalization,
            duplicates,
        }
    }

    pub fn normalization(&self) -> LabelNormalization {
        self.normalization
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicates
    }

    /// Add a definition.
    ///
    /// Returns `Ok(true)` when the table changed. A label that is already
    /// present leaves the table untouched under [`DuplicatePolicy::FirstWins`].
    pub fn insert(&mut self, label: &[u8], url: Vec<u8>, title: Option<Vec<u8>>) -> Result<bool> {
        let Some(label) = normalize_checked(label, self.normalization) else {
            tracing::debug!(len = label.len(), "rejected link label");
            return Err(ModelError::InvalidLabel { len: label.len() });
        };
        let hash = label_hash(&label);
        let policy = self.duplicates;
        let bucket = &mut self.buckets[bucket_index(hash)];

        if let Some(existing) = bucket
            .iter_mut()
            .find(|r| r.hash == hash && r.label == label)
        {
            return Ok(match policy {
                DuplicatePolicy::FirstWins => {
                    tracing::debug!(
                        label = %String::from_utf8_lossy(&existing.label),
                        "duplicate reference ignored"
                    );
                    false
                }
                DuplicatePolicy::LastWins => {
                    existing.url = url;
                    existing.title = title;
                    true
                }
            });
        }

        bucket.try_reserve(1)?;
        bucket.push(Reference {
            label,
            url,
            title,
            hash,
        });
        self.len += 1;
        Ok(true)
    }

    /// Find the definition for `label`, normalizing it the same way
    /// `insert` does.
    pub fn lookup(&self, label: &[u8]) -> Option<&Reference> {
        let label = normalize_checked(label, self.normalization)?;
        let hash = label_hash(&label);
        self.buckets[bucket_index(hash)]
            .iter()
            .find(|r| r.hash == hash && r.label == label)
    }

    pub fn contains(&self, label: &[u8]) -> bool {
        self.lookup(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All definitions, bucket by bucket, in insertion order within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.buckets.iter().flat_map(|b| b.iter())
    }
}

fn normalize_checked(label: &[u8], mode: LabelNormalization) -> Option<Vec<u8>> {
    if label.len() > MAX_LINK_LABEL_LENGTH {
        return None;
    }
    let normalized = normalize_label(label, mode);
    (!normalized.is_empty()).then_some(normalized)
}

#[inline]
fn bucket_index(hash: u64) -> usize {
    (hash as usize) & (REFMAP_SIZE - 1)
}

/// Stable hash of a normalized label.
pub fn label_hash(label: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(label);
    hasher.finish()
}

/// Normalize a link label: trim, case-fold, and (depending on `mode`)
/// collapse internal whitespace runs to a single space.
///
/// Entities and backslash escapes are left alone. Bytes that are not valid
/// UTF-8 are copied through unchanged so distinct labels stay distinct.
pub fn normalize_label(bytes: &[u8], mode: LabelNormalization) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    // Length of `out` up to the last non-whitespace byte.
    let mut content_end = 0;
    let mut last_was_space = false;
    let mut buf = [0u8; 4];

    for chunk in bytes.utf8_chunks() {
        for ch in chunk.valid().chars() {
            if ch.is_whitespace() {
                if out.is_empty() {
                    continue;
                }
                match mode {
                    LabelNormalization::CollapseWhitespace => {
                        if !last_was_space {
                            out.push(b' ');
                        }
                    }
                    LabelNormalization::CaseFoldOnly => {
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    }
                }
                last_was_space = true;
                continue;
            }

            last_was_space = false;
            if ch == 'ß' || ch == 'ẞ' {
                out.extend_from_slice(b"ss");
            } else {
                for lower in ch.to_lowercase() {
                    out.extend_from_slice(lower.encode_utf8(&mut buf).as_bytes());
                }
            }
            content_end = out.len();
        }

        if !chunk.invalid().is_empty() {
            out.extend_from_slice(chunk.invalid());
            last_was_space = false;
            content_end = out.len();
        }
    }

    out.truncate(content_end);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collapse(s: &str) -> String {
        let out = normalize_label(s.as_bytes(), LabelNormalization::CollapseWhitespace);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(collapse("  Foo \t\n Bar  "), "foo bar");
        assert_eq!(collapse("FOO   BAR"), "foo bar");
    }

    #[test]
    fn test_normalize_case_fold_only_keeps_inner_whitespace() {
        let mode = LabelNormalization::CaseFoldOnly;
        assert_eq!(normalize_label(b" FOO  Bar ", mode), b"foo  bar");
        assert_eq!(normalize_label("\tA\u{3000}".as_bytes(), mode), b"a");
    }

    #[test]
    fn test_normalize_keeps_escapes_and_entities() {
        assert_eq!(collapse("a\\]b"), "a\\]b");
        assert_eq!(collapse("X\\\\Y"), "x\\\\y");
        assert_eq!(collapse("&AMP;x"), "&amp;x");
    }

    #[test]
    fn test_normalize_keeps_invalid_utf8_bytes() {
        let mode = LabelNormalization::CollapseWhitespace;
        assert_eq!(normalize_label(b" A\xff  B\xfe ", mode), b"a\xff b\xfe");
        assert_ne!(normalize_label(b"a\xff", mode), normalize_label(b"a\xfe", mode));
    }

    #[test]
    fn test_normalize_sharp_s() {
        assert_eq!(collapse("Straße"), "strasse");
        assert_eq!(collapse("STRASSE"), "strasse");
    }

    #[test]
    fn test_bucket_index_in_range() {
        for label in ["a", "foo bar", "ünïcödé", ""] {
            assert!(bucket_index(label_hash(label.as_bytes())) < REFMAP_SIZE);
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(label_hash(b"foo"), label_hash(b"foo"));
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut map = ReferenceMap::new();
        assert_eq!(map.insert(b"Foo", b"/url".to_vec(), Some(b"t".to_vec())), Ok(true));
        let r = map.lookup(b"FOO").unwrap();
        assert_eq!(r.url, b"/url");
        assert_eq!(r.title.as_deref(), Some(&b"t"[..]));
        assert_eq!(r.label(), b"foo");
        assert_eq!(r.hash(), label_hash(b"foo"));
        assert!(map.lookup(b"bar").is_none());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_first_definition_wins() {
        let mut map = ReferenceMap::new();
        map.insert(b"foo", b"/first".to_vec(), None).unwrap();
        assert_eq!(map.insert(b"FOO", b"/second".to_vec(), None), Ok(false));
        assert_eq!(map.lookup(b"foo").unwrap().url, b"/first");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_last_definition_wins_policy() {
        let mut map =
            ReferenceMap::with_policy(LabelNormalization::default(), DuplicatePolicy::LastWins);
        map.insert(b"foo", b"/first".to_vec(), None).unwrap();
        assert_eq!(map.insert(b"Foo", b"/second".to_vec(), None), Ok(true));
        assert_eq!(map.lookup(b"foo").unwrap().url, b"/second");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_invalid_labels_rejected() {
        let mut map = ReferenceMap::new();
        assert_eq!(
            map.insert(b"  \t ", b"/u".to_vec(), None),
            Err(ModelError::InvalidLabel { len: 4 })
        );
        let long = vec![b'a'; MAX_LINK_LABEL_LENGTH + 1];
        assert!(map.insert(&long, b"/u".to_vec(), None).is_err());
        assert!(map.lookup(&long).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_many_labels_share_buckets() {
        let mut map = ReferenceMap::new();
        for i in 0..100 {
            let label = format!("label {i}");
            map.insert(label.as_bytes(), label.clone().into_bytes(), None).unwrap();
        }
        assert_eq!(map.len(), 100);
        assert_eq!(map.iter().count(), 100);
        for i in 0..100 {
            let label = format!("LABEL {i}");
            let expected = format!("label {i}");
            assert_eq!(map.lookup(label.as_bytes()).unwrap().url, expected.as_bytes());
        }
    }
}
