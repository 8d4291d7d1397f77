use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// One recorded cleaning operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogEntry {
    /// Parameterless operation; recording it again flips the flag.
    Flag(bool),
    /// Positional parameters, appended across repeated records.
    Values(Vec<Value>),
    /// Named parameters, merged per name across repeated records.
    Params(BTreeMap<String, Value>),
}

/// Keyed record of every transformation applied to a trace.
///
/// Entries merge rather than overwrite by default, so repeating a step is
/// auditable as a sequence instead of silently replacing history. The only
/// way to drop history is [`ProvenanceLog::clear`], reserved for the crop
/// step: after a re-crop, indices and values of prior entries no longer
/// apply to the new arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProvenanceLog {
    entries: BTreeMap<String, LogEntry>,
}

impl ProvenanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a parameterless operation. A fresh key starts at `true`;
    /// recording the same key again flips the flag.
    pub fn record_flag(&mut self, key: &str) {
        match self.entries.get_mut(key) {
            Some(LogEntry::Flag(state)) => *state = !*state,
            Some(other) => *other = LogEntry::Flag(true),
            None => {
                self.entries.insert(key.to_string(), LogEntry::Flag(true));
            }
        }
    }

    /// Records positional parameters. With `overwrite` the previous entry
    /// is replaced, otherwise the values append to the existing sequence.
    pub fn record_values(&mut self, key: &str, overwrite: bool, values: &[Value]) {
        let incoming = values.to_vec();
        match self.entries.get_mut(key) {
            Some(LogEntry::Values(existing)) if !overwrite => existing.extend(incoming),
            Some(entry) => *entry = LogEntry::Values(incoming),
            None => {
                self.entries
                    .insert(key.to_string(), LogEntry::Values(incoming));
            }
        }
    }

    /// Records named parameters. With `overwrite` the previous entry is
    /// replaced; otherwise values merge per name, a repeated name growing
    /// into a list.
    pub fn record_params(&mut self, key: &str, overwrite: bool, params: BTreeMap<String, Value>) {
        match self.entries.get_mut(key) {
            Some(LogEntry::Params(existing)) if !overwrite => {
                for (name, value) in params {
                    match existing.get_mut(&name) {
                        Some(Value::Array(list)) => list.push(value),
                        Some(previous) => {
                            *previous = Value::Array(vec![previous.clone(), value]);
                        }
                        None => {
                            existing.insert(name, value);
                        }
                    }
                }
            }
            Some(entry) => *entry = LogEntry::Params(params),
            None => {
                self.entries.insert(key.to_string(), LogEntry::Params(params));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&LogEntry> {
        self.entries.get(key)
    }

    /// Whether a parameterless operation is currently in effect.
    pub fn is_flagged(&self, key: &str) -> bool {
        matches!(self.get(key), Some(LogEntry::Flag(true)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LogEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full reset. Only the crop step may call this.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
