use super::{KeyTagError, record_key_tag};
use crate::error::{Error, Result};
use crate::zone::{ResourceRecord, ZoneReader};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::{debug, info};

/// Key tags collected per zone, across every input of a run
///
/// Duplicates are kept until [`KeyTagRecord::finalize`].
#[derive(Debug, Clone, Default)]
pub struct KeyTagRecord {
    zones: BTreeMap<String, Vec<u16>>,
}

/// Counts for one collected source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub records: usize,
    pub tags: usize,
}

impl KeyTagRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, zone: &str, key_tag: u16) {
        self.zones.entry(zone.to_string()).or_default().push(key_tag);
    }

    /// Add the key tag of a DNSKEY or DS record; other records are ignored
    pub fn add_record(
        &mut self,
        record: &ResourceRecord,
    ) -> std::result::Result<Option<u16>, KeyTagError> {
        let tag = record_key_tag(record)?;
        if let Some(tag) = tag {
            debug!("{} {} key tag {}", record.owner, record.rtype, tag);
            self.add(&record.owner, tag);
        }
        Ok(tag)
    }

    /// Read every record from `reader`, collecting trust anchor key tags.
    ///
    /// `source_name` labels errors (a path, `<stdin>`, ...).
    pub fn collect<R: BufRead>(
        &mut self,
        reader: &mut ZoneReader<R>,
        source_name: &str,
    ) -> Result<CollectStats> {
        let mut stats = CollectStats::default();
        for record in reader.records() {
            let record = record.map_err(|error| Error::Zone {
                source_name: source_name.to_string(),
                error,
            })?;
            stats.records += 1;

            let tag = self.add_record(&record).map_err(|error| Error::KeyTag {
                source_name: source_name.to_string(),
                line: record.line,
                error,
            })?;
            if tag.is_some() {
                stats.tags += 1;
            }
        }
        info!(
            "{}: {} records, {} trust anchors",
            source_name, stats.records, stats.tags
        );
        Ok(stats)
    }

    /// Raw tags for a zone, in collection order
    pub fn tags(&self, zone: &str) -> Option<&[u16]> {
        self.zones.get(zone).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Number of zones with at least one tag
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Sorted, deduplicated tags per zone, zones in name order
    pub fn finalize(&self) -> Vec<ZoneTags> {
        self.zones
            .iter()
            .filter(|(_, tags)| !tags.is_empty())
            .map(|(zone, tags)| {
                let mut tags = tags.clone();
                tags.sort_unstable();
                tags.dedup();
                ZoneTags::new(zone.clone(), tags)
            })
            .collect()
    }
}

/// Final tag set of one zone and its RFC 8145 signal query name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneTags {
    pub zone: String,
    pub tags: Vec<u16>,
    pub query_name: String,
}

impl ZoneTags {
    /// `tags` must be sorted and free of duplicates
    pub fn new(zone: String, tags: Vec<u16>) -> Self {
        let query_name = format!(
            "{}.{}",
            signal_label(&tags),
            zone.strip_suffix('.').unwrap_or(&zone)
        );
        Self {
            zone,
            tags,
            query_name,
        }
    }

    /// Full monitoring command line, e.g. `dig -t null -c in _ta-4f66.`
    pub fn query_command(&self, command: &str) -> String {
        format!("{} {}", command, self.query_name)
    }
}

/// `_ta-xxxx[-xxxx...]` with each tag as four lowercase hex digits
pub fn signal_label(tags: &[u16]) -> String {
    let mut label = String::from("_ta");
    for tag in tags {
        label.push_str(&format!("-{:04x}", tag));
    }
    label
}
