//! End-to-end transcript decoding tests against the public API

use std::io::Write;

use can_transcript_decoder::{
    DecoderError, FrameKind, LineCursor, MessageIterator, TranscriptDecoder,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn decodes_multi_frame_message_with_three_consecutive_frames() {
    init_logging();

    // total 0x1B = 27 bytes = 54 hex chars: 12 seeded by the first frame,
    // then 14 + 14 + 14 from consecutive frames 1..3
    let transcript = TranscriptDecoder::new().decode_lines([
        "ABC101B000102030405",
        "DEF3000000000000000",
        "ABC2106070809101112",
        "ABC2213141516171819",
        "ABC2320212223242526",
    ]);

    assert!(transcript.is_complete());
    assert_eq!(transcript.messages.len(), 1);

    let message = &transcript.messages[0];
    assert_eq!(message.id, "ABC");
    assert_eq!(
        message.payload,
        "000102030405060708091011121314151617181920212223242526"
    );
    // final payload length equals twice the declared length field
    assert_eq!(message.byte_len(), 0x1B);
}

#[test]
fn single_frame_payload_has_twice_declared_length() {
    init_logging();

    for declared in 0..=7usize {
        let line = format!("0010{}AABBCCDDEEFF11", declared);
        assert_eq!(line.len(), 19);
        let transcript = TranscriptDecoder::new().decode_lines([line]);
        assert!(transcript.is_complete());
        assert_eq!(transcript.messages[0].payload.len(), declared * 2);
    }
}

#[test]
fn first_frame_without_flow_control_fails_whatever_follows() {
    init_logging();

    // a well-formed consecutive sequence follows, but the flow-control line
    // is missing so nothing of it matters
    let transcript = TranscriptDecoder::new().decode_lines([
        "00103AABBCC00000000",
        "7E810140102030405CC",
        "7E821AABBCCDDEEFF00",
        "7E03000000000000000",
        "7E82211223344556677",
    ]);

    assert_eq!(transcript.messages.len(), 1);
    let failure = transcript.failure.unwrap();
    assert_eq!(failure.line, 3);
    assert!(matches!(
        failure.error,
        DecoderError::MissingFlowControl { .. }
    ));
}

#[test]
fn sequence_gap_discards_attempt_but_keeps_earlier_messages() {
    init_logging();

    let transcript = TranscriptDecoder::new().decode_lines([
        "00102AABB0000000000",
        "00101CC000000000000",
        "7E810140102030405CC",
        "7E03000000000000000",
        "7E82211223344556677",
    ]);

    // the sequence starts at 2 instead of 1; the two single-frame messages
    // decoded before the attempt must survive
    assert_eq!(transcript.messages.len(), 2);
    assert_eq!(transcript.messages[0].payload, "AABB");
    assert_eq!(transcript.messages[1].payload, "CC");

    let failure = transcript.failure.unwrap();
    assert_eq!(failure.line, 5);
    assert!(matches!(
        failure.error,
        DecoderError::SequenceMismatch { expected: 1, got: 2 }
    ));
}

#[test]
fn malformed_line_halts_mid_stream() {
    init_logging();

    let transcript = TranscriptDecoder::new().decode_lines([
        "00103AABBCC00000000",
        "00101",
        "00102DDEE0000000000",
    ]);

    assert_eq!(transcript.messages.len(), 1);
    let failure = transcript.failure.unwrap();
    assert_eq!(failure.line, 2);
    assert!(matches!(
        failure.error,
        DecoderError::MalformedLine { actual_length: 5 }
    ));
}

#[test]
fn message_iterator_decodes_lazily() {
    init_logging();

    let cursor = LineCursor::from_lines([
        "00103AABBCC00000000",
        "00102DDEE0000000000",
    ]);
    let mut iter = MessageIterator::new(cursor);

    let first = iter.next().unwrap().unwrap();
    assert_eq!(first.payload, "AABBCC");
    let second = iter.next().unwrap().unwrap();
    assert_eq!(second.payload, "DDEE");
    assert!(iter.next().is_none());
}

#[test]
fn trigger_errors_name_the_frame_kind() {
    init_logging();

    let transcript = TranscriptDecoder::new().decode_lines(["00125AABBCCDDEEFF00"]);
    let failure = transcript.failure.unwrap();
    match failure.error {
        DecoderError::UnexpectedFrameAsTrigger {
            kind: FrameKind::Consecutive { sequence },
        } => assert_eq!(sequence, 5),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn decode_file_round_trip() {
    init_logging();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "00103AABBCC00000000").unwrap();
    writeln!(file, "7E810140102030405CC").unwrap();
    writeln!(file, "7E03000000000000000").unwrap();
    writeln!(file, "7E821AABBCCDDEEFF00").unwrap();
    writeln!(file, "7E82211223344556677").unwrap();
    file.flush().unwrap();

    let transcript = TranscriptDecoder::new().decode_file(file.path()).unwrap();
    assert!(transcript.is_complete());
    assert_eq!(transcript.messages.len(), 2);
    assert_eq!(transcript.messages[0].payload, "AABBCC");
    assert_eq!(
        transcript.messages[1].payload,
        "0102030405CCAABBCCDDEEFF0011223344556677"
    );
}

#[test]
fn decode_file_missing_path_is_an_io_error() {
    init_logging();

    let err = TranscriptDecoder::new()
        .decode_file(std::path::Path::new("no-such-transcript.txt"))
        .unwrap_err();
    assert!(matches!(err, DecoderError::Io(_)));
}
