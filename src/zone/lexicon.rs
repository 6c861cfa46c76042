//! CLASS and TYPE mnemonic tables (IANA registry subset).
//!
//! Besides the registered mnemonics, the RFC 3597 generic forms `CLASS<n>` and
//! `TYPE<n>` are accepted for any `n` up to 65535. A generic form naming a
//! registered code resolves to the registered entry.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

const CLASSES: &[(&str, u16)] = &[
    ("IN", 1),
    ("CS", 2),
    ("CH", 3),
    ("HS", 4),
    ("NONE", 254),
    ("ANY", 255),
];

const TYPES: &[(&str, u16)] = &[
    ("A", 1),
    ("NS", 2),
    ("MD", 3),
    ("MF", 4),
    ("CNAME", 5),
    ("SOA", 6),
    ("MB", 7),
    ("MG", 8),
    ("MR", 9),
    ("NULL", 10),
    ("WKS", 11),
    ("PTR", 12),
    ("HINFO", 13),
    ("MINFO", 14),
    ("MX", 15),
    ("TXT", 16),
    ("RP", 17),
    ("AFSDB", 18),
    ("X25", 19),
    ("ISDN", 20),
    ("RT", 21),
    ("NSAP", 22),
    ("NSAP-PTR", 23),
    ("SIG", 24),
    ("KEY", 25),
    ("PX", 26),
    ("GPOS", 27),
    ("AAAA", 28),
    ("LOC", 29),
    ("NXT", 30),
    ("SRV", 33),
    ("NAPTR", 35),
    ("KX", 36),
    ("CERT", 37),
    ("A6", 38),
    ("DNAME", 39),
    ("OPT", 41),
    ("APL", 42),
    ("DS", 43),
    ("SSHFP", 44),
    ("IPSECKEY", 45),
    ("RRSIG", 46),
    ("NSEC", 47),
    ("DNSKEY", 48),
    ("DHCID", 49),
    ("NSEC3", 50),
    ("NSEC3PARAM", 51),
    ("TLSA", 52),
    ("SMIMEA", 53),
    ("HIP", 55),
    ("CDS", 59),
    ("CDNSKEY", 60),
    ("OPENPGPKEY", 61),
    ("CSYNC", 62),
    ("ZONEMD", 63),
    ("SVCB", 64),
    ("HTTPS", 65),
    ("SPF", 99),
    ("EUI48", 108),
    ("EUI64", 109),
    ("TKEY", 249),
    ("TSIG", 250),
    ("IXFR", 251),
    ("AXFR", 252),
    ("ANY", 255),
    ("URI", 256),
    ("CAA", 257),
    ("TA", 32768),
    ("DLV", 32769),
];

struct Table {
    by_name: HashMap<&'static str, u16>,
    by_code: HashMap<u16, &'static str>,
}

impl Table {
    fn build(entries: &'static [(&'static str, u16)]) -> Self {
        Self {
            by_name: entries.iter().copied().collect(),
            by_code: entries.iter().map(|&(name, code)| (code, name)).collect(),
        }
    }
}

static CLASS_TABLE: LazyLock<Table> = LazyLock::new(|| Table::build(CLASSES));
static TYPE_TABLE: LazyLock<Table> = LazyLock::new(|| Table::build(TYPES));

/// Resource record class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordClass(u16);

impl RecordClass {
    pub const IN: Self = Self(1);

    pub fn from_code(code: u16) -> Self {
        Self(code)
    }

    pub fn code(self) -> u16 {
        self.0
    }

    /// Registered mnemonic, if the code has one
    pub fn mnemonic(self) -> Option<&'static str> {
        CLASS_TABLE.by_code.get(&self.0).copied()
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "CLASS{}", self.0),
        }
    }
}

/// Resource record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordType(u16);

impl RecordType {
    pub const DS: Self = Self(43);
    pub const DNSKEY: Self = Self(48);

    pub fn from_code(code: u16) -> Self {
        Self(code)
    }

    pub fn code(self) -> u16 {
        self.0
    }

    pub fn mnemonic(self) -> Option<&'static str> {
        TYPE_TABLE.by_code.get(&self.0).copied()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "TYPE{}", self.0),
        }
    }
}

/// Look up a class mnemonic or `CLASS<n>` (case-insensitive)
pub fn class_from_str(s: &str) -> Option<RecordClass> {
    lookup(&CLASS_TABLE, "CLASS", s).map(RecordClass)
}

/// Look up a type mnemonic or `TYPE<n>` (case-insensitive)
pub fn type_from_str(s: &str) -> Option<RecordType> {
    lookup(&TYPE_TABLE, "TYPE", s).map(RecordType)
}

/// True if `s` has the shape `<prefix><digits>`, regardless of range
pub fn is_generic_form(s: &str, prefix: &str) -> bool {
    generic_digits(s, prefix).is_some()
}

fn lookup(table: &Table, prefix: &str, s: &str) -> Option<u16> {
    let upper = s.to_ascii_uppercase();
    if let Some(&code) = table.by_name.get(upper.as_str()) {
        return Some(code);
    }
    generic_digits(&upper, prefix)?.parse::<u16>().ok()
}

fn generic_digits<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() <= prefix.len() || !s.is_char_boundary(prefix.len()) {
        return None;
    }
    let (head, digits) = s.split_at(prefix.len());
    if head.eq_ignore_ascii_case(prefix) && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonics_are_case_insensitive() {
        assert_eq!(class_from_str("in"), Some(RecordClass::IN));
        assert_eq!(type_from_str("DnsKey"), Some(RecordType::DNSKEY));
        assert_eq!(type_from_str("ds"), Some(RecordType::DS));
    }

    #[test]
    fn test_generic_forms() {
        assert_eq!(type_from_str("TYPE48"), Some(RecordType::DNSKEY));
        assert_eq!(type_from_str("type65535").map(RecordType::code), Some(65535));
        assert_eq!(type_from_str("TYPE65536"), None);
        assert_eq!(class_from_str("CLASS1"), Some(RecordClass::IN));
        assert_eq!(class_from_str("CLASS"), None);
        assert!(is_generic_form("CLASS99999", "CLASS"));
        assert!(!is_generic_form("CLASSX", "CLASS"));
    }

    #[test]
    fn test_display_falls_back_to_generic() {
        assert_eq!(RecordType::DNSKEY.to_string(), "DNSKEY");
        assert_eq!(RecordType::from_code(4000).to_string(), "TYPE4000");
        assert_eq!(RecordClass::from_code(77).to_string(), "CLASS77");
    }

    #[test]
    fn test_unknown_mnemonic() {
        assert_eq!(type_from_str("BOGUS"), None);
        assert_eq!(class_from_str("XX"), None);
    }
}
