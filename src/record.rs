use std::fs;
use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::info;

use crate::terminal::Terminal;

/// Ordered field-name to value mapping saved as `{base_name}.json`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DataRecord {
    entries: Vec<(String, String)>,
}

impl DataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the value in place when `key` is already present.
    pub fn insert(&mut self, key: &str, value: &str) {
        for (existing, existing_value) in &mut self.entries {
            if *existing == key {
                *existing_value = value.to_owned();
                return;
            }
        }
        self.entries.push((key.to_owned(), value.to_owned()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serializing record")
    }

    /// Parse a flat JSON object whose values are all strings.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).context("parsing record")?;
        let Value::Object(map) = value else {
            return Err(anyhow!("record must be a JSON object"));
        };

        let mut record = Self::new();
        for (key, value) in &map {
            let text = value
                .as_str()
                .ok_or_else(|| anyhow!("field `{key}` is not a string: {value}"))?;
            record.insert(key, text);
        }
        Ok(record)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for DataRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key.as_ref(), value.as_ref());
        }
        record
    }
}

impl Serialize for DataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Where the values of a record come from.
#[derive(Clone, Debug)]
pub enum DataSource {
    /// Prompt `Enter the {field}: ` for each field, in order.
    Prompt(Vec<String>),
    /// Use the given pairs verbatim.
    Provided(Vec<(String, String)>),
}

/// Collect a record and write it to `{base_name}.json` in the working directory,
/// replacing any previous file of that name.
pub fn ask_for_data<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    source: &DataSource,
    base_name: &str,
) -> Result<DataRecord> {
    ask_for_data_in(term, source, Utf8Path::new("."), base_name)
}

pub fn ask_for_data_in<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    source: &DataSource,
    dir: &Utf8Path,
    base_name: &str,
) -> Result<DataRecord> {
    let record = match source {
        DataSource::Prompt(fields) => {
            let mut record = DataRecord::new();
            for field in fields {
                let value = term.prompt(&format!("Enter the {field}: "))?;
                record.insert(field, &value);
            }
            record
        }
        DataSource::Provided(pairs) => pairs.iter().map(|(k, v)| (k, v)).collect::<DataRecord>(),
    };

    let path = record_path(dir, base_name);
    fs::write(&path, record.to_json()?).with_context(|| format!("writing {path}"))?;
    term.blank_line()?;
    info!("saved {} field(s) to {}", record.len(), path);

    Ok(record)
}

/// Read `{base_name}.json` from the working directory.
pub fn load(base_name: &str) -> Result<DataRecord> {
    load_in(Utf8Path::new("."), base_name)
}

pub fn load_in(dir: &Utf8Path, base_name: &str) -> Result<DataRecord> {
    let path = record_path(dir, base_name);
    let raw = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    DataRecord::from_json(&raw).with_context(|| format!("loading {path}"))
}

pub fn record_path(dir: &Utf8Path, base_name: &str) -> Utf8PathBuf {
    dir.join(format!("{base_name}.json"))
}
