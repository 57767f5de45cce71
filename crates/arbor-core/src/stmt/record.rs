use super::{Path, Value};

use indexmap::IndexMap;

/// A nested, insertion-ordered map of output keys to values.
///
/// Records serve double duty: the driver delivers flat rows as records keyed
/// by alias strings, and the assembler builds nested output records keyed by
/// field aliases and relationship paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Record {
    entries: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Reads the value at a nested path. Returns `None` when any step is
    /// absent or a non-record intermediate is hit.
    pub fn get_in(&self, path: &Path) -> Option<&Value> {
        let (last, init) = path.keys().split_last()?;
        let mut cur = self;
        for key in init {
            match cur.entries.get(key) {
                Some(Value::Record(rec)) => cur = rec,
                _ => return None,
            }
        }
        cur.entries.get(last)
    }

    /// Writes `value` at a nested path, creating intermediate records as
    /// needed. A non-record intermediate is replaced by a record.
    ///
    /// The path must be non-empty; writing a whole record at the root is
    /// [`merge_at`](Self::merge_at) with the root path.
    pub fn insert_at(&mut self, path: &Path, value: impl Into<Value>) {
        let (last, init) = path
            .keys()
            .split_last()
            .expect("insert_at requires a non-empty path");
        self.record_at_mut(init).insert(last.clone(), value);
    }

    /// Merges `other` into this record: `other`'s entries are written in
    /// order, overwriting same-key entries but leaving everything else as it
    /// was.
    pub fn merge(&mut self, other: Record) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    /// Merges `other` into the record at `path`. The root path merges into
    /// this record directly; repeated merges at the same path accumulate
    /// fields.
    pub fn merge_at(&mut self, path: &Path, other: Record) {
        self.record_at_mut(path.keys()).merge(other);
    }

    fn record_at_mut(&mut self, keys: &[String]) -> &mut Record {
        let mut cur = self;
        for key in keys {
            let slot = cur
                .entries
                .entry(key.clone())
                .or_insert_with(|| Value::Record(Record::new()));
            if !matches!(slot, Value::Record(_)) {
                *slot = Value::Record(Record::new());
            }
            match slot {
                Value::Record(rec) => cur = rec,
                _ => unreachable!(),
            }
        }
        cur
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_at_creates_intermediate_records() {
        let mut rec = Record::new();
        rec.insert_at(&Path::dotted("name.full"), "Ada L.");

        let Some(Value::Record(name)) = rec.get("name") else {
            panic!("expected nested record");
        };
        assert_eq!(name.get("full"), Some(&Value::from("Ada L.")));
        assert_eq!(rec.get_in(&Path::dotted("name.full")), Some(&Value::from("Ada L.")));
    }

    #[test]
    fn merge_at_accumulates_fields() {
        let mut rec = Record::new();
        let mut first = Record::new();
        first.insert("x", 1i64);
        let mut second = Record::new();
        second.insert("y", 2i64);

        rec.merge_at(&Path::key("b_id"), first);
        rec.merge_at(&Path::key("b_id"), second);

        let Some(Value::Record(sub)) = rec.get("b_id") else {
            panic!("expected nested record");
        };
        assert_eq!(sub.get("x"), Some(&Value::I64(1)));
        assert_eq!(sub.get("y"), Some(&Value::I64(2)));
    }

    #[test]
    fn merge_at_root_merges_in_place() {
        let mut rec = Record::new();
        rec.insert("title", "Abbey Road");
        let mut other = Record::new();
        other.insert("name", "The Beatles");

        rec.merge_at(&Path::root(), other);

        assert_eq!(rec.get("title"), Some(&Value::from("Abbey Road")));
        assert_eq!(rec.get("name"), Some(&Value::from("The Beatles")));
    }

    #[test]
    fn merge_preserves_earlier_keys_unless_overwritten() {
        let mut rec = Record::new();
        rec.insert("a", 1i64);
        rec.insert("b", 2i64);
        let mut other = Record::new();
        other.insert("b", 3i64);

        rec.merge(other);

        assert_eq!(rec.get("a"), Some(&Value::I64(1)));
        assert_eq!(rec.get("b"), Some(&Value::I64(3)));
    }
}
