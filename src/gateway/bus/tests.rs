//! DLC code translation tests: classic limits, FD round-up, and readback.
use super::*;

#[test]
/// Classic frames pass 0..=8 through and reject anything larger.
fn test_classic_dlc_range() {
    for len in 0..=8u8 {
        let code = DlcCode::for_classic_len(len).unwrap();
        assert_eq!(code.raw(), len);
        assert_eq!(code.byte_count(), len);
    }
    assert_eq!(DlcCode::for_classic_len(9), None);
    assert_eq!(DlcCode::for_classic_len(64), None);
}

#[test]
/// FD lengths round up to the nearest supported size; 65 is rejected.
fn test_fd_dlc_round_up() {
    let cases = [(9u8, 12u8), (13, 16), (17, 20), (25, 32), (33, 48), (49, 64)];
    for (requested, rounded) in cases {
        let code = DlcCode::for_fd_len(requested).unwrap();
        assert_eq!(code.byte_count(), rounded);
    }
    assert_eq!(DlcCode::for_fd_len(64).unwrap().byte_count(), 64);
    assert_eq!(DlcCode::for_fd_len(65), None);
}

#[test]
/// Exact step sizes map to their own code without rounding.
fn test_fd_dlc_exact_steps() {
    for (raw, bytes) in [(9u8, 12u8), (10, 16), (11, 20), (12, 24), (13, 32), (14, 48), (15, 64)] {
        let code = DlcCode::for_fd_len(bytes).unwrap();
        assert_eq!(code.raw(), raw);
        assert_eq!(code.byte_count(), bytes);
    }
}

#[test]
/// Codes outside the 4-bit range decode to zero bytes.
fn test_unrecognized_code_maps_to_zero() {
    assert_eq!(DlcCode::from_raw(16).byte_count(), 0);
    assert_eq!(DlcCode::from_raw(0xFF).byte_count(), 0);
}

#[test]
/// Flag packing follows the status report bit layout.
fn test_status_flags_byte() {
    let status = ProtocolStatus {
        error_passive: true,
        bus_off: true,
        rx_brs: true,
        protocol_exception: true,
        ..Default::default()
    };
    assert_eq!(status.flags_byte(), 0x01 | 0x04 | 0x10 | 0x40);
    assert_eq!(ProtocolStatus::default().flags_byte(), 0);
}
