//! Property-based tests using proptest

use ezpack_core::{
    constants::MAX_PAYLOAD_SIZE,
    decoder::try_parse_frame,
    encoder::encode_packet,
    extractor::StreamExtractor,
    scanner::scan_stream,
    FrameError, Packet,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_round_trip_encode_decode(
        packet_type in any::<u8>(),
        payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE)
    ) {
        let encoded = encode_packet(packet_type, &payload).unwrap();
        let decoded = try_parse_frame(&encoded).unwrap();

        prop_assert_eq!(decoded, Packet::new(packet_type, payload));
    }

    #[test]
    fn prop_single_bit_flip_detected(
        packet_type in any::<u8>(),
        payload in prop::collection::vec(any::<u8>(), 1..64),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8
    ) {
        let mut encoded = encode_packet(packet_type, &payload).unwrap().to_vec();
        // Offset 1 is the type byte, payload starts at offset 3
        let target = match index.index(payload.len() + 1) {
            0 => 1,
            n => 2 + n,
        };
        encoded[target] ^= 1 << bit;

        let is_checksum_mismatch = matches!(
            try_parse_frame(&encoded),
            Err(FrameError::ChecksumMismatch { .. })
        );
        prop_assert!(is_checksum_mismatch);
    }

    #[test]
    fn prop_oversized_payload_rejected(len in (MAX_PAYLOAD_SIZE + 1)..1024usize) {
        let payload = vec![0u8; len];
        prop_assert_eq!(
            encode_packet(0x01, &payload),
            Err(FrameError::InvalidPayloadLength(len))
        );
    }

    #[test]
    fn prop_parse_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..512)
    ) {
        let _ = try_parse_frame(&data);
    }

    #[test]
    fn prop_scan_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..4096)
    ) {
        let _ = scan_stream(&data);
    }

    #[test]
    fn prop_fragmentation_is_transparent(
        data in prop::collection::vec(any::<u8>(), 0..1024),
        chunk in 1usize..32
    ) {
        // Whole delivery
        let mut whole = StreamExtractor::new();
        whole.extend(&data);
        let mut expected = Vec::new();
        while let Some(packet) = whole.next_packet() {
            expected.push(packet);
        }

        // Chunked delivery
        let mut chunked = StreamExtractor::new();
        let mut actual = Vec::new();
        for piece in data.chunks(chunk) {
            chunked.extend(piece);
            while let Some(packet) = chunked.next_packet() {
                actual.push(packet);
            }
        }

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_extractor_agrees_with_scanner(
        frames in prop::collection::vec(
            (any::<u8>(), prop::collection::vec(0u8..0x55, 0..32)),
            1..10
        ),
        noise in prop::collection::vec(0u8..0x55, 0..16)
    ) {
        let mut stream = noise.clone();
        for (packet_type, payload) in &frames {
            stream.extend_from_slice(&encode_packet(*packet_type, payload).unwrap());
        }

        let scanned: Vec<Packet> = scan_stream(&stream).into_iter().map(|lp| lp.packet).collect();

        let mut extractor = StreamExtractor::new();
        extractor.extend(&stream);
        let mut extracted = Vec::new();
        while let Some(packet) = extractor.next_packet() {
            extracted.push(packet);
        }

        prop_assert_eq!(extracted, scanned);
    }
}
