use super::*;
use crate::error::FixError;

const VALID: &[u8] =
    b"$GPRMC,225446.00,A,4916.4500,N,12311.1200,W,000.5,054.7,191194,020.3,E,A*2B";
const HIGH_PRECISION: &[u8] =
    b"$GPRMC,083559.00,A,4717.11437,N,00833.91522,E,0.004,77.52,091202,,,A*57";
const VOID: &[u8] = b"$GPRMC,225446,V,4916.45,N,12311.12,W,000.5,054.7,191194,020.3,E,N*1D";

#[test]
fn test_parse_valid_sentence() {
    let fix = parse_rmc(VALID).unwrap();
    let dt = fix.datetime();
    assert_eq!(
        (dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute(), dt.second()),
        (94, 11, 19, 22, 54, 46)
    );
    let lat = fix.latitude();
    assert_eq!((lat.degrees(), lat.minutes(), lat.seconds()), (49, 16, 27));
    assert_eq!(lat.hemisphere(), Hemisphere::North);
    let lon = fix.longitude();
    assert_eq!((lon.degrees(), lon.minutes(), lon.seconds()), (123, 11, 7));
    assert_eq!(lon.hemisphere(), Hemisphere::West);
}

#[test]
fn test_parse_rounds_fraction_to_nearest_second() {
    let fix = parse_rmc(HIGH_PRECISION).unwrap();
    // 0.11437 min = 6.86 s, 0.91522 min = 54.91 s
    assert_eq!(fix.latitude().seconds(), 7);
    assert_eq!(fix.longitude().seconds(), 55);
    assert_eq!(fix.longitude().degrees(), 8);
}

#[test]
fn test_parse_carries_into_degrees() {
    let fix = parse_rmc(b"$GNRMC,235959,A,4916.9999,S,17959.9999,W,0.0,0.0,311299,,,A*68").unwrap();
    let lat = fix.latitude();
    assert_eq!((lat.degrees(), lat.minutes(), lat.seconds()), (49, 17, 0));
    let lon = fix.longitude();
    assert_eq!((lon.degrees(), lon.minutes(), lon.seconds()), (180, 0, 0));
}

#[test]
fn test_parse_rejects_void_fix() {
    assert_eq!(parse_rmc(VOID), Err(SentenceError::NoFix));
}

#[test]
fn test_parse_rejects_bad_checksum() {
    let mut sentence = [0u8; 75];
    sentence.copy_from_slice(VALID);
    sentence[74] = b'C';
    assert_eq!(
        parse_rmc(&sentence),
        Err(SentenceError::ChecksumMismatch {
            computed: 0x2B,
            received: 0x2C
        })
    );
}

#[test]
fn test_parse_rejects_signed_checksum() {
    let mut sentence = [0u8; 75];
    sentence.copy_from_slice(VALID);
    sentence[73] = b'+';
    assert_eq!(parse_rmc(&sentence), Err(SentenceError::MalformedChecksum));
    assert_eq!(parse_hex_byte(b"+A"), None);
    assert_eq!(parse_hex_byte(b"2b"), Some(0x2B));
}

#[test]
fn test_parse_rejects_structure() {
    assert_eq!(
        parse_rmc(b"$GPRMC,1,A*00"),
        Err(SentenceError::InvalidLength { len: 13 })
    );
    assert_eq!(
        parse_rmc(b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47"),
        Err(SentenceError::UnsupportedSentence)
    );
    assert_eq!(
        parse_rmc(b"$GPRMC,225446,A,4916.45,N,12311.12,W,000.5,054.7,191194*00"),
        Err(SentenceError::FieldCount {
            expected: 13,
            found: 10
        })
    );
    assert_eq!(
        parse_rmc(b"$GPRMC,225446,A,4916.45,N,12311.12,W,000.5,054.7,191194,,,A-00"),
        Err(SentenceError::MalformedChecksum)
    );
}

#[test]
fn test_parse_rejects_invalid_values() {
    assert_eq!(
        parse_rmc(b"$GPRMC,120000,A,4916.45,X,12311.12,W,0.0,0.0,010120,,,A*7D"),
        Err(SentenceError::Fix(FixError::UnknownHemisphere { byte: b'X' }))
    );
    assert_eq!(
        parse_rmc(b"$GPRMC,120000,A,4916.45,N,12311.12,W,0.0,0.0,300220,,,A*6A"),
        Err(SentenceError::Fix(FixError::InvalidDateTime {
            field: "day",
            value: 30
        }))
    );
}

#[test]
fn test_assembler_restarts_on_dollar() {
    let mut assembler = SentenceAssembler::new();
    for &byte in b"garbage$GPRMC,12" {
        assert!(assembler.push(byte).is_none());
    }
    let mut result = None;
    for &byte in VALID.iter().chain(b"\r\n") {
        if let Some(parsed) = assembler.push(byte) {
            result = Some(parsed);
        }
    }
    assert_eq!(result, Some(parse_rmc(VALID)));
}

#[test]
fn test_assembler_ignores_bytes_outside_sentence() {
    let mut assembler = SentenceAssembler::new();
    for &byte in b"no sentence here\r\n" {
        assert!(assembler.push(byte).is_none());
    }
}

#[test]
fn test_feed_posts_latest_fix() {
    let fixes: Mailbox<LocationTimeFix> = Mailbox::new();
    let mut assembler = SentenceAssembler::new();

    assert_eq!(assembler.feed(VALID, &fixes), None);
    assert_eq!(assembler.feed(b"\r\n", &fixes), Some(Delivery::Accepted));

    assembler.feed(HIGH_PRECISION, &fixes);
    assert_eq!(assembler.feed(b"\n", &fixes), Some(Delivery::Replaced));
    assert_eq!(fixes.try_take(), parse_rmc(HIGH_PRECISION).ok());
    assert_eq!(fixes.try_take(), None);
}
