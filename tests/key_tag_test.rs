use anchorwatch::dnssec::{KeyTagError, KeyTagRecord, calculate_key_tag, encoding, record_key_tag};
use anchorwatch::zone::ZoneReader;
use anchorwatch::Error;
use std::io::Cursor;

const ROOT_ZONE_ANCHORS: &str = "\
; Root zone trust anchors
$ORIGIN .
$TTL 172800
@   IN  DNSKEY  257 3 8 (
        AwEAAaz/tAm8yTn4Mfeh5eyI96WSVexTBAvkMgJzkKTOiW1vkIbzxeF3
        +/4RgWOq7HrxRixHlFlExOLAJr5emLvN7SWXgnLh4+B5xQlNVz8Og8kv
        ArMtNROxVQuCaSnIDdD5LKyWbRd2n9WGe2R8PzgCmr3EgVLrjyBxWezF
        0jLHwVN8efS3rCj/EWgvIWgb9tarpVUDK/b58Da+sqqls3eNbuv7pr+e
        oZG+SrDK6nWeL3c6H5Apxz7LjVc1uTIdsIXxuOLYA4/ilBmSVIzuDWfd
        RUfhHdY6+cn8HFRm+2hM8AnXGXws9555KrUB5qihylGa8subX2Nn6UwN
        R1AkUTV74bU= ) ; KSK-2017
.   IN  DS  20326 8 2 E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8D
example.   IN  DS  ( 5 8 2
        AAAA )
example.   IN  DS  10 8 2 BBBB
";

fn collect(text: &str) -> anchorwatch::Result<KeyTagRecord> {
    let mut reader = ZoneReader::open(Cursor::new(text.as_bytes()));
    let mut record = KeyTagRecord::new();
    record.collect(&mut reader, "anchors.zone")?;
    Ok(record)
}

#[test]
fn test_root_anchor_tags() {
    let record = collect(ROOT_ZONE_ANCHORS).unwrap();
    assert_eq!(record.tags("."), Some(&[20326, 20326][..]));

    let zones = record.finalize();
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].zone, ".");
    assert_eq!(zones[0].query_name, "_ta-4f66.");
    assert_eq!(zones[1].zone, "example.");
    assert_eq!(zones[1].tags, vec![5, 10]);
    assert_eq!(
        zones[1].query_command("dig -t null -c in"),
        "dig -t null -c in _ta-0005-000a.example"
    );
}

#[test]
fn test_record_key_tag_from_reader() {
    let mut reader = ZoneReader::open(Cursor::new(ROOT_ZONE_ANCHORS.as_bytes()));
    let dnskey = reader.next_record().unwrap().unwrap();
    assert_eq!(record_key_tag(&dnskey).unwrap(), Some(20326));
}

#[test]
fn test_empty_key() {
    assert_eq!(calculate_key_tag(0, 3, 0, &[]), 0x0300);
    assert_eq!(calculate_key_tag(0, 0, 0, &[]), 0);
}

#[test]
fn test_bad_base64_reports_line() {
    let zone = "$TTL 60\n. IN DNSKEY 257 3 8 AwEA*AAA\n";
    match collect(zone).unwrap_err() {
        Error::KeyTag {
            source_name,
            line,
            error,
        } => {
            assert_eq!(source_name, "anchors.zone");
            assert_eq!(line, 2);
            assert_eq!(
                error,
                KeyTagError::InvalidBase64Symbol {
                    run: "*AAA".to_string()
                }
            );
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_truncated_base64() {
    let zone = "$TTL 60\n. IN DNSKEY 257 3 8 AwEAAQ\n";
    assert!(matches!(
        collect(zone),
        Err(Error::KeyTag {
            error: KeyTagError::TruncatedBase64 { .. },
            ..
        })
    ));
}

#[test]
fn test_zone_error_stops_collection() {
    let zone = "$TTL 60\n. IN DS 1 8 2 AA\n. IN DS ( 2 8 2 BB\n";
    assert!(matches!(collect(zone), Err(Error::Zone { .. })));
}

#[test]
fn test_decode_matches_base64_crate() {
    use base64::Engine;
    let data: Vec<u8> = (0..=255).collect();
    let text = base64::engine::general_purpose::STANDARD.encode(&data);
    assert_eq!(encoding::decode(&text).unwrap(), data);
}

#[test]
fn test_oversized_key_is_an_error() {
    use base64::Engine;
    let key = base64::engine::general_purpose::STANDARD.encode(vec![0xFF; 140_000]);
    let zone = format!("$TTL 60\n. IN DNSKEY 257 3 8 {}\n", key);
    match collect(&zone).unwrap_err() {
        Error::KeyTag { line, error, .. } => {
            assert_eq!(line, 2);
            assert!(matches!(error, KeyTagError::MalformedRdata { rtype: "DNSKEY", .. }));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_signed_ds_tag_is_an_error() {
    let zone = "$TTL 60\nexample. IN DS +5 8 2 AA\n";
    assert!(matches!(
        collect(zone),
        Err(Error::KeyTag {
            line: 2,
            error: KeyTagError::MalformedRdata { rtype: "DS", .. },
            ..
        })
    ));
}
