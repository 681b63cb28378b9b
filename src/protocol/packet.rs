use bytes::Bytes;
use thiserror::Error;

/// Every exchange with the unit is a fixed 22-byte packet: five header
/// bytes, a type byte, fifteen payload bytes, one checksum byte.
pub const PACKET_LEN: usize = 22;

/// Leading bytes of a set-request packet. The unit echoes 0x62/0x61/0x7A in
/// byte 1 of its replies.
pub(crate) const SET_HEADER: [u8; 8] = [0xFC, 0x41, 0x01, 0x30, 0x10, 0x01, 0x00, 0x00];

/// Leading bytes of an info-request packet; byte 5 selects what to query.
pub(crate) const INFO_HEADER: [u8; 5] = [0xFC, 0x42, 0x01, 0x30, 0x10];

/// Fixed handshake a transport sends once to put the unit's service port
/// into packet mode. Its own 8-byte shape, checksum included.
pub const CONNECT: [u8; 8] = [0xFC, 0x5A, 0x01, 0x30, 0x02, 0xCA, 0x01, 0xA8];

/// Reply kinds carried in header byte 1.
pub(crate) const KIND_UPDATE_ACK: u8 = 0x61;
pub(crate) const KIND_DATA: u8 = 0x62;
pub(crate) const KIND_CONNECT_ACK: u8 = 0x7A;

/// Type bytes at offset 5.
pub(crate) mod packet_type {
    pub const SETTINGS: u8 = 0x02;
    pub const ROOM_TEMP: u8 = 0x03;
    pub const TIMERS: u8 = 0x05;
    pub const STATUS: u8 = 0x06;
    pub const REMOTE_TEMP: u8 = 0x07;
    pub const STANDBY: u8 = 0x09;
    pub const FUNCTIONS_SET_1: u8 = 0x1F;
    pub const FUNCTIONS_GET_1: u8 = 0x20;
    pub const FUNCTIONS_SET_2: u8 = 0x21;
    pub const FUNCTIONS_GET_2: u8 = 0x22;
}

/// `0xFC - sum(bytes)`, the trailing byte of every 22-byte packet. Computed
/// over bytes 0..=20.
pub fn checksum(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    0xFCu8.wrapping_sub(sum)
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("packet must be {PACKET_LEN} bytes, got {0}")]
    InvalidLength(usize),
    #[error("packet header mismatch")]
    InvalidHeader,
    #[error("invalid checksum (expected {expected:#04x}, actual {actual:#04x})")]
    InvalidChecksum { expected: u8, actual: u8 },
    #[error("unrecognized reply kind {0:#04x}")]
    UnknownKind(u8),
    #[error("unsupported packet type {0:#04x}")]
    UnsupportedType(u8),
}

/// What an info-request packet asks the unit to report. The unit answers
/// each with the matching data packet type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum InfoRequest {
    Settings,
    RoomTemperature,
    Timers,
    Status,
    Standby,
}

impl InfoRequest {
    fn type_byte(self) -> u8 {
        match self {
            InfoRequest::Settings => packet_type::SETTINGS,
            InfoRequest::RoomTemperature => packet_type::ROOM_TEMP,
            InfoRequest::Timers => packet_type::TIMERS,
            InfoRequest::Status => packet_type::STATUS,
            InfoRequest::Standby => packet_type::STANDBY,
        }
    }
}

/// One framed wire packet, header through checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet([u8; PACKET_LEN]);

impl Packet {
    /// A zeroed packet carrying the set-request header. The checksum is not
    /// valid until [`Packet::apply_checksum`] runs.
    pub(crate) fn set_request() -> Self {
        let mut bytes = [0u8; PACKET_LEN];
        bytes[..SET_HEADER.len()].copy_from_slice(&SET_HEADER);
        Packet(bytes)
    }

    /// A ready-to-send query for one category of unit state.
    pub fn info_request(kind: InfoRequest) -> Self {
        let mut bytes = [0u8; PACKET_LEN];
        bytes[..INFO_HEADER.len()].copy_from_slice(&INFO_HEADER);
        bytes[5] = kind.type_byte();
        let mut packet = Packet(bytes);
        packet.apply_checksum();
        packet
    }

    /// Validate length, header constants and checksum of a received buffer.
    pub fn parse(raw: &[u8]) -> Result<Self, DecodeError> {
        let bytes: [u8; PACKET_LEN] = raw
            .try_into()
            .map_err(|_| DecodeError::InvalidLength(raw.len()))?;

        if bytes[0] != SET_HEADER[0] || bytes[2] != SET_HEADER[2] || bytes[3] != SET_HEADER[3] {
            return Err(DecodeError::InvalidHeader);
        }

        let expected = checksum(&bytes[..PACKET_LEN - 1]);
        let actual = bytes[PACKET_LEN - 1];
        if expected != actual {
            return Err(DecodeError::InvalidChecksum { expected, actual });
        }

        Ok(Packet(bytes))
    }

    pub(crate) fn apply_checksum(&mut self) {
        self.0[PACKET_LEN - 1] = checksum(&self.0[..PACKET_LEN - 1]);
    }

    /// Header byte 1: data, update-ack or connect-ack.
    pub(crate) fn kind_byte(&self) -> u8 {
        self.0[1]
    }

    /// The type byte and everything after it, up to the checksum.
    pub(crate) fn data(&self) -> &[u8] {
        &self.0[5..PACKET_LEN - 1]
    }

    /// The 15 payload bytes following the type byte.
    pub(crate) fn payload(&self) -> &[u8; 15] {
        (&self.0[6..PACKET_LEN - 1])
            .try_into()
            .expect("packet is 22 bytes")
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8; PACKET_LEN] {
        &mut self.0
    }

    pub fn as_bytes(&self) -> &[u8; PACKET_LEN] {
        &self.0
    }

    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.0)
    }
}
