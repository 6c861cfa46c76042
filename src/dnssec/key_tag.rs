use super::constants::{DNSKEY_PROTOCOL, ZONE_KEY_FLAG};
use super::{KeyTagError, Result, encoding};
use crate::zone::{RecordClass, RecordType, ResourceRecord};
use tracing::warn;

/// DNSKEY algorithm number of RSA/MD5
const RSAMD5: u8 = 1;

/// Largest RDATA a resource record can carry on the wire
const MAX_RDATA_LEN: usize = u16::MAX as usize;

/// Calculate the key tag for a DNSKEY record (RFC 4034 Appendix B)
pub fn calculate_key_tag(flags: u16, protocol: u8, algorithm: u8, public_key: &[u8]) -> u16 {
    // Build DNSKEY RDATA: flags (2) + protocol (1) + algorithm (1) + public key
    let mut rdata = Vec::with_capacity(4 + public_key.len());
    rdata.extend_from_slice(&flags.to_be_bytes());
    rdata.push(protocol);
    rdata.push(algorithm);
    rdata.extend_from_slice(public_key);

    key_tag_from_wire(&rdata)
}

/// Key tag of wire-format DNSKEY RDATA
pub fn key_tag_from_wire(rdata: &[u8]) -> u16 {
    // RSA/MD5 keys use bits 8..24 of the modulus instead of the checksum
    if rdata.get(3) == Some(&RSAMD5) {
        let len = rdata.len();
        if len >= 4 + 3 {
            return u16::from_be_bytes([rdata[len - 3], rdata[len - 2]]);
        }
        return 0;
    }

    // Cannot overflow for any slice length that fits in memory
    let mut accumulator: u64 = 0;
    for (i, &byte) in rdata.iter().enumerate() {
        if i % 2 == 0 {
            accumulator += u64::from(byte) << 8;
        } else {
            accumulator += u64::from(byte);
        }
    }

    // Add carries and mask to 16 bits
    accumulator += (accumulator >> 16) & 0xFFFF;
    (accumulator & 0xFFFF) as u16
}

/// Key tag of a trust anchor record.
///
/// Returns `Ok(None)` for anything other than class IN DNSKEY or DS.
pub fn record_key_tag(record: &ResourceRecord) -> Result<Option<u16>> {
    if record.class != RecordClass::IN {
        return Ok(None);
    }
    match record.rtype {
        RecordType::DNSKEY => dnskey_tag(&record.rdata).map(Some),
        RecordType::DS => ds_tag(&record.rdata).map(Some),
        _ => Ok(None),
    }
}

fn dnskey_tag(rdata: &[String]) -> Result<u16> {
    if let Some(wire) = generic_rdata("DNSKEY", rdata)? {
        if wire.len() < 4 {
            return Err(malformed("DNSKEY", "generic rdata shorter than 4 octets"));
        }
        check_rdata_len("DNSKEY", wire.len())?;
        return Ok(key_tag_from_wire(&wire));
    }

    let [flags, protocol, algorithm, key @ ..] = rdata else {
        return Err(malformed(
            "DNSKEY",
            "expected flags, protocol, algorithm and public key",
        ));
    };
    let flags: u16 = numeric_field("DNSKEY", "flags", flags)?;
    let protocol: u8 = numeric_field("DNSKEY", "protocol", protocol)?;
    let algorithm: u8 = numeric_field("DNSKEY", "algorithm", algorithm)?;
    if protocol != DNSKEY_PROTOCOL {
        warn!("DNSKEY protocol {} is not {}", protocol, DNSKEY_PROTOCOL);
    }
    if flags & ZONE_KEY_FLAG == 0 {
        warn!("DNSKEY flags {} do not mark a zone key", flags);
    }

    let encoded: String = key
        .iter()
        .flat_map(|part| part.chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    let public_key = encoding::decode(&encoded)?;
    check_rdata_len("DNSKEY", 4 + public_key.len())?;

    Ok(calculate_key_tag(flags, protocol, algorithm, &public_key))
}

fn ds_tag(rdata: &[String]) -> Result<u16> {
    if let Some(wire) = generic_rdata("DS", rdata)? {
        return match wire.as_slice() {
            [hi, lo, ..] => Ok(u16::from_be_bytes([*hi, *lo])),
            _ => Err(malformed("DS", "generic rdata shorter than 2 octets")),
        };
    }
    let tag = rdata
        .first()
        .ok_or_else(|| malformed("DS", "missing key tag"))?;
    numeric_field("DS", "key tag", tag)
}

/// Decode RFC 3597 `\# <length> <hex>...` RDATA, if that is the form used
fn generic_rdata(rtype: &'static str, rdata: &[String]) -> Result<Option<Vec<u8>>> {
    let [marker, length, hex_parts @ ..] = rdata else {
        return Ok(None);
    };
    if marker != "#" {
        return Ok(None);
    }

    let length: usize = numeric_field(rtype, "generic rdata length", length)?;
    check_rdata_len(rtype, length)?;
    let wire = hex::decode(hex_parts.concat())
        .map_err(|e| malformed(rtype, format!("generic rdata: {}", e)))?;
    if wire.len() != length {
        return Err(malformed(
            rtype,
            format!("generic rdata length {} but {} octets given", length, wire.len()),
        ));
    }
    Ok(Some(wire))
}

fn check_rdata_len(rtype: &'static str, len: usize) -> Result<()> {
    if len > MAX_RDATA_LEN {
        return Err(malformed(
            rtype,
            format!("rdata of {} octets exceeds {}", len, MAX_RDATA_LEN),
        ));
    }
    Ok(())
}

/// Unsigned decimal field; digits only, no sign
fn numeric_field<T: std::str::FromStr>(rtype: &'static str, name: &str, value: &str) -> Result<T> {
    let invalid = || malformed(rtype, format!("invalid {} '{}'", name, value));
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

fn malformed(rtype: &'static str, reason: impl Into<String>) -> KeyTagError {
    KeyTagError::MalformedRdata {
        rtype,
        reason: reason.into(),
    }
}
