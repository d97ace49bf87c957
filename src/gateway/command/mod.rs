//! Command identifiers and the payload codecs translating between wire
//! payloads and bus messages.
//!
//! Byte 0 of every payload is the command id. The shared type byte encodes:
//!
//! - bit0: `0` classic CAN, `1` CAN-FD
//! - bit1: `0` bit-rate switch on, `1` bit-rate switch off
//! - bit2: `0` standard 11-bit identifier, `1` extended 29-bit identifier
use crate::error::DownstreamError;
use crate::gateway::bus::{CanMessage, DlcCode, FrameFormat, MAX_CAN_DATA};
use crate::gateway::wire::MAX_PAYLOAD;
use embedded_can::{ExtendedId, Id, StandardId};
use heapless::Vec;

//==================================================================================Command ids

/// Identify the gateway device.
pub const CMD_GET_DEVICE_ID: u8 = 0x00;
/// Bring the CAN controller on-bus.
pub const CMD_CAN_START: u8 = 0x01;
/// Take the CAN controller off-bus.
pub const CMD_CAN_STOP: u8 = 0x02;
/// Host → bus frame injection request.
pub const CMD_SEND_DOWNSTREAM: u8 = 0x10;
/// Bus → host frame relay (outbound only).
pub const CMD_SEND_UPSTREAM: u8 = 0x11;
/// Bus health status report (outbound only).
pub const CMD_PROTOCOL_STATUS: u8 = 0x12;

/// Fixed identity byte returned by `CMD_GET_DEVICE_ID`.
pub const DEVICE_ID: u8 = 0xAC;

//==================================================================================Type byte

/// Type byte bit0: frame is CAN-FD.
pub const TYPE_FDF: u8 = 0x01;
/// Type byte bit1: bit-rate switch disabled.
pub const TYPE_BRS_OFF: u8 = 0x02;
/// Type byte bit2: 29-bit extended identifier.
pub const TYPE_EXTENDED_ID: u8 = 0x04;

//==================================================================================Downstream

/// Decode a `CMD_SEND_DOWNSTREAM` request body (the bytes following the
/// command id): `type(1) | id(4,LE) | dlc(1) | data(dlc)`.
///
/// Classic frames reject bit-rate switching and any DLC above 8; FD frames
/// accept up to 64 bytes and round the length up to the nearest hardware
/// DLC code. Identifiers must fit the selected width.
pub fn decode_downstream(body: &[u8]) -> Result<CanMessage, DownstreamError> {
    if body.len() < 6 {
        return Err(DownstreamError::Truncated);
    }

    let type_byte = body[0];
    let raw_id = u32::from_le_bytes([body[1], body[2], body[3], body[4]]);
    let requested_dlc = body[5];

    let (format, bit_rate_switch, dlc) = if type_byte & TYPE_FDF == 0 {
        if type_byte & TYPE_BRS_OFF == 0 {
            return Err(DownstreamError::BitRateSwitchOnClassic);
        }
        let dlc = DlcCode::for_classic_len(requested_dlc).ok_or(DownstreamError::DlcTooLarge {
            requested: requested_dlc,
            max: 8,
        })?;
        (FrameFormat::Classic, false, dlc)
    } else {
        let dlc = DlcCode::for_fd_len(requested_dlc).ok_or(DownstreamError::DlcTooLarge {
            requested: requested_dlc,
            max: MAX_CAN_DATA as u8,
        })?;
        (FrameFormat::Fd, type_byte & TYPE_BRS_OFF == 0, dlc)
    };

    let id = if type_byte & TYPE_EXTENDED_ID == 0 {
        u16::try_from(raw_id)
            .ok()
            .and_then(StandardId::new)
            .map(Id::Standard)
            .ok_or(DownstreamError::IdentifierOutOfRange)?
    } else {
        ExtendedId::new(raw_id)
            .map(Id::Extended)
            .ok_or(DownstreamError::IdentifierOutOfRange)?
    };

    let payload = &body[6..];
    let count = requested_dlc as usize;
    if payload.len() < count {
        return Err(DownstreamError::Truncated);
    }

    let mut data = [0u8; MAX_CAN_DATA];
    data[..count].copy_from_slice(&payload[..count]);

    Ok(CanMessage {
        id,
        format,
        bit_rate_switch,
        dlc,
        data,
    })
}

//==================================================================================Upstream

/// Encode a received bus message into a `CMD_SEND_UPSTREAM` payload:
/// `cmd(1) | type(1) | id(4,LE) | dlc(1) | data(dlc)`, with the DLC carried
/// as a plain byte count.
pub fn encode_upstream(message: &CanMessage) -> Vec<u8, MAX_PAYLOAD> {
    let mut type_byte = 0;
    if message.format == FrameFormat::Fd {
        type_byte |= TYPE_FDF;
    }
    if !message.bit_rate_switch {
        type_byte |= TYPE_BRS_OFF;
    }
    if matches!(message.id, Id::Extended(_)) {
        type_byte |= TYPE_EXTENDED_ID;
    }

    let count = message.dlc.byte_count() as usize;
    let mut payload = Vec::new();
    // Infallible: MAX_PAYLOAD covers the header plus a full FD payload.
    let _ = payload.push(CMD_SEND_UPSTREAM);
    let _ = payload.push(type_byte);
    let _ = payload.extend_from_slice(&message.raw_id().to_le_bytes());
    let _ = payload.push(count as u8);
    let _ = payload.extend_from_slice(&message.data[..count]);
    payload
}
