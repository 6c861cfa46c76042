use anchorwatch::zone::{RecordClass, RecordType, ZoneEntry, ZoneError, ZoneReader};
use std::io::Cursor;

fn reader(text: &str) -> ZoneReader<Cursor<&[u8]>> {
    ZoneReader::open(Cursor::new(text.as_bytes()))
}

#[test]
fn test_simple_zone_parsing() {
    let zone_content = r#"
$ORIGIN example.com.
$TTL 3600

@   IN  SOA ns1.example.com. admin.example.com. 2024010101 3600 900 604800 86400

@   IN  NS  ns1.example.com.
@   IN  NS  ns2.example.com.

@       IN  A   192.0.2.1
www     IN  A   192.0.2.2
mail    300 IN  A   192.0.2.3

@       IN  MX  10 mail.example.com.
"#;

    let records: Vec<_> = reader(zone_content)
        .records()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 7);

    assert_eq!(records[0].owner, "example.com.");
    assert_eq!(records[0].rtype.mnemonic(), Some("SOA"));
    assert_eq!(records[0].rdata.len(), 7);
    assert_eq!(records[0].ttl, 3600);

    assert_eq!(records[4].owner, "www.example.com.");
    assert_eq!(records[5].owner, "mail.example.com.");
    assert_eq!(records[5].ttl, 300);
    assert_eq!(records[6].rdata, vec!["10", "mail.example.com."]);
}

#[test]
fn test_multi_line_dnskey_with_comments() {
    let zone_content = "\
$TTL 172800
.   IN  DNSKEY  257 3 8 (
        AwEAAaz/tAm8yTn4Mfeh5eyI96WSVexTBAvkMgJzkKTOiW1vkIbzxeF3 ; first
        +/4RgWOq7HrxRixHlFlExOLAJr5emLvN7SWXgnLh4+B5xQlNVz8Og8kv
        ArMtNROxVQuCaSnIDdD5LKyWbRd2n9WGe2R8PzgCmr3EgVLrjyBxWezF
        0jLHwVN8efS3rCj/EWgvIWgb9tarpVUDK/b58Da+sqqls3eNbuv7pr+e
        oZG+SrDK6nWeL3c6H5Apxz7LjVc1uTIdsIXxuOLYA4/ilBmSVIzuDWfd
        RUfhHdY6+cn8HFRm+2hM8AnXGXws9555KrUB5qihylGa8subX2Nn6UwN
        R1AkUTV74bU= ) ; KSK
";
    let mut reader = reader(zone_content);
    let record = reader.next_record().unwrap().unwrap();
    assert_eq!(record.owner, ".");
    assert_eq!(record.class, RecordClass::IN);
    assert_eq!(record.rtype, RecordType::DNSKEY);
    assert_eq!(record.line, 2);
    assert_eq!(&record.rdata[..3], &["257", "3", "8"]);
    assert_eq!(record.rdata.len(), 3 + 7);
    assert!(record.is_dnssec_anchor());
    assert!(reader.next_record().is_none());
    assert_eq!(reader.line_number(), 9);
}

#[test]
fn test_directives_are_entries() {
    let entries: Vec<_> = reader("$ORIGIN example.\n$TTL 60\nwww IN DS 1 8 2 AA\n")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(entries[0], ZoneEntry::Origin("example.".to_string()));
    assert_eq!(entries[1], ZoneEntry::Ttl(60));
    match &entries[2] {
        ZoneEntry::Record(record) => assert_eq!(record.owner, "www.example."),
        other => panic!("expected record, got {:?}", other),
    }
}

#[test]
fn test_generic_mnemonics() {
    let mut reader = reader(". 60 CLASS1 TYPE43 20326 8 2 E06D\n");
    let record = reader.next_record().unwrap().unwrap();
    assert_eq!(record.class, RecordClass::IN);
    assert_eq!(record.rtype, RecordType::DS);
    assert_eq!(record.to_string(), ". 60 IN DS 20326 8 2 E06D");
}

#[test]
fn test_quoted_rdata_spanning_lines() {
    let mut reader = reader("a. 60 IN TXT \"first\nsecond\" tail\n");
    let record = reader.next_record().unwrap().unwrap();
    assert_eq!(record.rdata, vec!["first\nsecond", "tail"]);
}

#[test]
fn test_errors_carry_line_numbers() {
    let cases: &[(&str, ZoneError)] = &[
        (
            "$TTL 60\n\na. IN BOGUS x\n",
            ZoneError::UnknownRecordType {
                line: 3,
                rtype: "BOGUS".to_string(),
            },
        ),
        (
            "a. 60 CLASS70000 DS 1 8 2 AA\n",
            ZoneError::UnknownClass {
                line: 1,
                class: "CLASS70000".to_string(),
            },
        ),
        (
            "$TTL 60\na. IN DS ( 1 8 2\n (AA) )\n",
            ZoneError::NestedParenthesis { line: 3 },
        ),
        (
            "$TTL 60\na. IN DS 1 8 2 AA )\n",
            ZoneError::UnmatchedCloseParenthesis { line: 2 },
        ),
        (
            "$TTL 60\na. IN TXT \"open\n",
            ZoneError::UnterminatedQuote { line: 2 },
        ),
    ];
    for (text, expected) in cases {
        let err = reader(text).next_record().unwrap().unwrap_err();
        assert_eq!(&err, expected, "input {:?}", text);
        assert_eq!(err.line(), expected.line());
    }
}

#[test]
fn test_malformed_ttl() {
    let err = reader("a. 99999999999 IN DS 1 8 2 AA\n")
        .next_record()
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, ZoneError::MalformedTtl { line: 1, .. }));
}
