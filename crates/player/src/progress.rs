//! Saved playback offsets per (book, chapter)

use reads_core::{BookId, KEY_SEPARATOR};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Composite key of a progress entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgressKey {
    pub book_id: BookId,
    pub chapter_index: usize,
}

impl ProgressKey {
    pub fn new(book_id: BookId, chapter_index: usize) -> Self {
        Self {
            book_id,
            chapter_index,
        }
    }

    /// Parses `<bookId>_<index>`
    ///
    /// Book ids never contain the separator, so the last one splits the key.
    pub fn parse(key: &str) -> Option<Self> {
        let (book, index) = key.rsplit_once(KEY_SEPARATOR)?;
        let book_id = BookId::parse(book).ok()?;
        let chapter_index = index.parse().ok()?;
        Some(Self::new(book_id, chapter_index))
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.book_id, KEY_SEPARATOR, self.chapter_index)
    }
}

/// Last-known offset in seconds for every chapter ever visited
///
/// Entries are never evicted. Serializes as a flat JSON object
/// `{"<bookId>_<index>": seconds}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressMap {
    entries: BTreeMap<ProgressKey, u64>,
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved offset, 0 if the chapter was never visited
    pub fn get(&self, book_id: &BookId, chapter_index: usize) -> u64 {
        self.entries
            .get(&ProgressKey::new(book_id.clone(), chapter_index))
            .copied()
            .unwrap_or(0)
    }

    pub fn set(&mut self, book_id: &BookId, chapter_index: usize, seconds: u64) {
        self.entries
            .insert(ProgressKey::new(book_id.clone(), chapter_index), seconds);
    }

    pub fn contains(&self, book_id: &BookId, chapter_index: usize) -> bool {
        self.entries
            .contains_key(&ProgressKey::new(book_id.clone(), chapter_index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProgressKey, u64)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    /// Entries of one book, ordered by chapter
    pub fn for_book<'a>(
        &'a self,
        book_id: &'a BookId,
    ) -> impl Iterator<Item = (usize, u64)> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| &k.book_id == book_id)
            .map(|(k, v)| (k.chapter_index, *v))
    }
}

impl Serialize for ProgressMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, seconds) in &self.entries {
            map.serialize_entry(&key.to_string(), seconds)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProgressMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ProgressMapVisitor)
    }
}

struct ProgressMapVisitor;

impl<'de> Visitor<'de> for ProgressMapVisitor {
    type Value = ProgressMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of \"<bookId>_<chapterIndex>\" to whole seconds")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut progress = ProgressMap::new();
        while let Some((key, seconds)) = access.next_entry::<String, u64>()? {
            let key = ProgressKey::parse(&key).ok_or_else(|| {
                de::Error::invalid_value(de::Unexpected::Str(&key), &"\"<bookId>_<chapterIndex>\"")
            })?;
            progress.entries.insert(key, seconds);
        }
        Ok(progress)
    }
}
