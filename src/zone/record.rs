use super::lexicon::{RecordClass, RecordType};
use std::fmt;

/// A resource record as read from a zone file
///
/// RDATA is kept in presentation format, one string per whitespace-delimited
/// part. Quotes and escapes are already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Absolute, lowercase owner name (`.` for the root)
    pub owner: String,
    /// Time to live in seconds
    pub ttl: u32,
    pub class: RecordClass,
    pub rtype: RecordType,
    pub rdata: Vec<String>,
    /// Line the record started on
    pub line: usize,
}

impl ResourceRecord {
    pub fn is_dnssec_anchor(&self) -> bool {
        self.class == RecordClass::IN
            && (self.rtype == RecordType::DNSKEY || self.rtype == RecordType::DS)
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.owner, self.ttl, self.class, self.rtype)?;
        for part in &self.rdata {
            write!(f, " {}", part)?;
        }
        Ok(())
    }
}

/// One logical entry of a zone file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneEntry {
    /// Blank or comment-only line
    Empty,
    Record(ResourceRecord),
    /// `$ORIGIN`, carrying the new absolute origin (empty for the root)
    Origin(String),
    /// `$TTL`, carrying the new default TTL
    Ttl(u32),
    /// `$INCLUDE`, recognized but never followed
    Include {
        path: String,
        origin: Option<String>,
        line: usize,
    },
}
