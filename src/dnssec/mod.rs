pub mod encoding;
pub mod errors;
pub mod key_tag;
pub mod trust_anchor;

pub use errors::{KeyTagError, Result};
pub use key_tag::{calculate_key_tag, key_tag_from_wire, record_key_tag};
pub use trust_anchor::{CollectStats, KeyTagRecord, ZoneTags, signal_label};

/// DNSSEC constants
pub mod constants {
    /// DNSKEY protocol field, fixed by RFC 4034
    pub const DNSKEY_PROTOCOL: u8 = 3;

    /// DNSKEY Zone Key flag
    pub const ZONE_KEY_FLAG: u16 = 0x0100;
}
