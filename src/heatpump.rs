use serde::Serialize;
use thiserror::Error;

use crate::protocol::packet::{self, packet_type, Packet};
use crate::protocol::tables;
use crate::protocol::{
    DecodeError, FanSpeed, Functions, Mode, Power, Settings, Status, Vane, WideVane,
};

// Mode byte values above this carry the i-See occupancy flag on top of the
// mode. Observed unit behavior, not a documented protocol field.
const ISEE_FLAG: u8 = 0x08;

// High nibble the unit sets on the wide-vane byte when its adjustment mode
// is active. Observed, not documented.
const WIDE_VANE_ADJ_NIBBLE: u8 = 0x80;

// Control byte 6 bits marking which fields of a set packet are meaningful.
mod control {
    pub const POWER: u8 = 0x01;
    pub const MODE: u8 = 0x02;
    pub const TEMPERATURE: u8 = 0x04;
    pub const FAN: u8 = 0x08;
    pub const VANE: u8 = 0x10;
    // Control byte 7.
    pub const WIDE_VANE: u8 = 0x01;
}

/// What a successfully decoded packet carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ReceivedPacket {
    ConnectAck,
    UpdateAck,
    Settings,
    RoomTemperature,
    Status,
    Functions,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("function configuration has not been fully read from the unit")]
    FunctionsNotRead,
    #[error("function data contains empty slots")]
    IncompleteFunctionData,
}

type SettingsCallback = Box<dyn FnMut(Settings)>;
type StatusCallback = Box<dyn FnMut(Status)>;
type RoomTempCallback = Box<dyn FnMut(f32)>;

/// Codec state for one unit connection.
///
/// Holds the last settings and status the unit reported, the settings a
/// caller wants to apply next, and the two quirks learned from received
/// packets (`temp_mode`, `wide_vane_adj`) that change how later packets are
/// encoded. Feed received packets to [`HeatPump::read_packet`]; build
/// outgoing ones with [`HeatPump::update_packet`] and friends; the caller
/// owns the transport on both sides.
///
/// Everything is synchronous. Change callbacks run inside `read_packet` and
/// must not feed packets back into the same instance.
pub struct HeatPump {
    current_settings: Settings,
    wanted_settings: Settings,
    current_status: Status,
    functions: Functions,

    // Unit reports target temperature in half degrees; use the extended
    // encoding from now on.
    temp_mode: bool,
    // Unit wants 0x80 folded into outgoing wide-vane bytes.
    wide_vane_adj: bool,

    settings_changed: Option<SettingsCallback>,
    status_changed: Option<StatusCallback>,
    room_temp_changed: Option<RoomTempCallback>,
}

impl HeatPump {
    pub fn new() -> Self {
        Self {
            current_settings: Settings::default(),
            wanted_settings: Settings::default(),
            current_status: Status::default(),
            functions: Functions::new(),
            temp_mode: false,
            wide_vane_adj: false,
            settings_changed: None,
            status_changed: None,
            room_temp_changed: None,
        }
    }

    // ---- decoded state -----------------------------------------------------

    pub fn settings(&self) -> Settings {
        self.current_settings
    }

    pub fn status(&self) -> Status {
        self.current_status
    }

    pub fn room_temperature(&self) -> f32 {
        self.current_status.room_temperature
    }

    pub fn operating(&self) -> bool {
        self.current_status.operating
    }

    pub fn i_see(&self) -> bool {
        self.current_settings.i_see
    }

    pub fn is_powered_on(&self) -> bool {
        self.current_settings.power == Some(Power::On)
    }

    pub fn functions(&self) -> &Functions {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut Functions {
        &mut self.functions
    }

    pub fn clear_functions(&mut self) {
        self.functions.clear();
    }

    // ---- staged settings ---------------------------------------------------

    pub fn wanted_settings(&self) -> Settings {
        self.wanted_settings
    }

    /// Drop staged changes, making the next update packet a no-op.
    pub fn reset_wanted_settings(&mut self) {
        self.wanted_settings = self.current_settings;
    }

    pub fn set_power(&mut self, power: Power) {
        self.wanted_settings.power = Some(power);
    }

    pub fn set_power_bool(&mut self, on: bool) {
        self.set_power(if on { Power::On } else { Power::Off });
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.wanted_settings.mode = Some(mode);
    }

    /// Stage a target temperature.
    ///
    /// On units still using the whole-degree table, values outside the table
    /// fall back to the table default; once the unit has shown the extended
    /// encoding, values are rounded to the nearest half degree and clamped
    /// to the 10..=31 range the encoding can express.
    pub fn set_temperature(&mut self, celsius: f32) {
        self.wanted_settings.temperature = Some(if self.temp_mode {
            round_to_half(celsius).clamp(10.0, 31.0)
        } else if tables::SET_TEMP.contains((celsius + 0.5) as i8) {
            celsius
        } else {
            f32::from(tables::SET_TEMP.default_value())
        });
    }

    pub fn set_fan_speed(&mut self, fan: FanSpeed) {
        self.wanted_settings.fan = Some(fan);
    }

    pub fn set_vane(&mut self, vane: Vane) {
        self.wanted_settings.vane = Some(vane);
    }

    pub fn set_wide_vane(&mut self, wide_vane: WideVane) {
        self.wanted_settings.wide_vane = Some(wide_vane);
    }

    // ---- change notification -----------------------------------------------

    pub fn on_settings_changed(&mut self, callback: impl FnMut(Settings) + 'static) {
        self.settings_changed = Some(Box::new(callback));
    }

    pub fn on_status_changed(&mut self, callback: impl FnMut(Status) + 'static) {
        self.status_changed = Some(Box::new(callback));
    }

    #[deprecated(note = "the status callback reports room temperature changes too")]
    pub fn on_room_temp_changed(&mut self, callback: impl FnMut(f32) + 'static) {
        self.room_temp_changed = Some(Box::new(callback));
    }

    // ---- encoding ----------------------------------------------------------

    /// Build the set packet that moves the unit from its current settings to
    /// the wanted ones. Fields that did not change are left out of the
    /// control bitmask and the unit ignores their bytes; with nothing staged
    /// the packet is a well-formed no-op.
    pub fn update_packet(&self) -> Packet {
        let mut packet = Packet::set_request();
        let bytes = packet.bytes_mut();
        let current = &self.current_settings;
        let wanted = &self.wanted_settings;

        if wanted.power != current.power {
            if let Some(power) = wanted.power {
                bytes[8] = tables::POWER.to_wire(power);
                bytes[6] |= control::POWER;
            }
        }
        if wanted.mode != current.mode {
            if let Some(mode) = wanted.mode {
                bytes[9] = tables::MODE.to_wire(mode);
                bytes[6] |= control::MODE;
            }
        }
        if wanted.temperature != current.temperature {
            if let Some(celsius) = wanted.temperature {
                if self.temp_mode {
                    bytes[19] = (celsius * 2.0 + 128.0) as u8;
                } else {
                    bytes[10] = tables::SET_TEMP.to_wire(celsius as i8);
                }
                bytes[6] |= control::TEMPERATURE;
            }
        }
        if wanted.fan != current.fan {
            if let Some(fan) = wanted.fan {
                bytes[11] = tables::FAN.to_wire(fan);
                bytes[6] |= control::FAN;
            }
        }
        if wanted.vane != current.vane {
            if let Some(vane) = wanted.vane {
                bytes[12] = tables::VANE.to_wire(vane);
                bytes[6] |= control::VANE;
            }
        }
        if wanted.wide_vane != current.wide_vane {
            if let Some(wide_vane) = wanted.wide_vane {
                let adj = if self.wide_vane_adj {
                    WIDE_VANE_ADJ_NIBBLE
                } else {
                    0x00
                };
                bytes[18] = tables::WIDE_VANE.to_wire(wide_vane) | adj;
                bytes[7] |= control::WIDE_VANE;
            }
        }

        packet.apply_checksum();
        packet
    }

    /// Build a packet overriding the room temperature the unit regulates
    /// against, as a paired thermostat would. Values are rounded to the
    /// nearest half degree; anything at or below zero turns the override
    /// off and hands control back to the unit's own sensor.
    pub fn set_remote_temperature(&self, celsius: f32) -> Packet {
        let mut packet = Packet::set_request();
        let bytes = packet.bytes_mut();
        bytes[5] = packet_type::REMOTE_TEMP;

        if celsius > 0.0 {
            let celsius = round_to_half(celsius);
            bytes[6] = 0x01;
            bytes[7] = (3.0 + (celsius - 10.0) * 2.0) as u8;
            bytes[8] = (celsius * 2.0 + 128.0) as u8;
        } else {
            bytes[6] = 0x00;
            bytes[8] = 0x80; // what the thermostat sends for "override off"
        }

        packet.apply_checksum();
        packet
    }

    /// Build the packet writing the first half of the function
    /// configuration back to the unit.
    pub fn set_functions1(&self) -> Result<Packet, EncodeError> {
        self.functions_packet(packet_type::FUNCTIONS_SET_1, self.functions.data1())
    }

    /// Build the packet writing the second half of the function
    /// configuration back to the unit.
    pub fn set_functions2(&self) -> Result<Packet, EncodeError> {
        self.functions_packet(packet_type::FUNCTIONS_SET_2, self.functions.data2())
    }

    fn functions_packet(&self, type_byte: u8, block: [u8; 15]) -> Result<Packet, EncodeError> {
        if !self.functions.is_valid() {
            return Err(EncodeError::FunctionsNotRead);
        }

        let mut packet = Packet::set_request();
        let bytes = packet.bytes_mut();
        bytes[5] = type_byte;
        bytes[6..21].copy_from_slice(&block);

        // Units leave the last slot of each half empty; a zero anywhere
        // before it means the block never held real unit data.
        if bytes[20] != 0 || bytes[6..20].iter().any(|&b| b == 0) {
            return Err(EncodeError::IncompleteFunctionData);
        }

        packet.apply_checksum();
        Ok(packet)
    }

    // ---- decoding ----------------------------------------------------------

    /// Decode one complete received packet, updating cached state and firing
    /// change callbacks where the decoded state differs from the cache.
    ///
    /// Any malformed or unsupported packet comes back as a [`DecodeError`];
    /// callers are expected to treat all of them the same way and move on to
    /// the next packet.
    pub fn read_packet(&mut self, raw: &[u8]) -> Result<ReceivedPacket, DecodeError> {
        let received = Packet::parse(raw)?;

        match received.kind_byte() {
            packet::KIND_UPDATE_ACK => return Ok(ReceivedPacket::UpdateAck),
            packet::KIND_CONNECT_ACK => return Ok(ReceivedPacket::ConnectAck),
            packet::KIND_DATA => {}
            other => return Err(DecodeError::UnknownKind(other)),
        }

        let data = received.data();
        match data[0] {
            packet_type::SETTINGS => {
                let i_see = data[4] > ISEE_FLAG;
                let mode_byte = if i_see { data[4] - ISEE_FLAG } else { data[4] };

                let temperature = if data[11] != 0 {
                    self.temp_mode = true;
                    half_degrees(data[11])
                } else {
                    f32::from(tables::SET_TEMP.from_wire(data[5]))
                };

                self.wide_vane_adj = (data[10] & 0xF0) == WIDE_VANE_ADJ_NIBBLE;

                let settings = Settings {
                    power: Some(tables::POWER.from_wire(data[3])),
                    mode: Some(tables::MODE.from_wire(mode_byte)),
                    temperature: Some(temperature),
                    fan: Some(tables::FAN.from_wire(data[6])),
                    vane: Some(tables::VANE.from_wire(data[7])),
                    wide_vane: Some(tables::WIDE_VANE.from_wire(data[10] & 0x0F)),
                    i_see,
                };

                let changed = settings != self.current_settings;
                self.current_settings = settings;
                if changed {
                    if let Some(callback) = self.settings_changed.as_mut() {
                        callback(settings);
                    }
                }

                Ok(ReceivedPacket::Settings)
            }

            packet_type::ROOM_TEMP => {
                let room_temperature = if data[6] != 0 {
                    half_degrees(data[6])
                } else {
                    f32::from(tables::ROOM_TEMP.from_wire(data[3]))
                };

                let changed = self.current_status.room_temperature != room_temperature;
                self.current_status.room_temperature = room_temperature;
                if changed {
                    if let Some(callback) = self.status_changed.as_mut() {
                        callback(self.current_status);
                    }
                    if let Some(callback) = self.room_temp_changed.as_mut() {
                        callback(room_temperature);
                    }
                }

                Ok(ReceivedPacket::RoomTemperature)
            }

            packet_type::STATUS => {
                let compressor_frequency = data[3];
                let operating = data[4] != 0;

                let changed = self.current_status.operating != operating
                    || self.current_status.compressor_frequency != compressor_frequency;
                self.current_status.operating = operating;
                self.current_status.compressor_frequency = compressor_frequency;
                if changed {
                    if let Some(callback) = self.status_changed.as_mut() {
                        callback(self.current_status);
                    }
                }

                Ok(ReceivedPacket::Status)
            }

            packet_type::STANDBY => {
                let compressor_state = data[3];
                let fan_mode = data[4];

                let changed = self.current_status.fan_mode != fan_mode
                    || self.current_status.compressor_state != compressor_state;
                self.current_status.fan_mode = fan_mode;
                self.current_status.compressor_state = compressor_state;
                if changed {
                    if let Some(callback) = self.status_changed.as_mut() {
                        callback(self.current_status);
                    }
                }

                Ok(ReceivedPacket::Status)
            }

            packet_type::FUNCTIONS_GET_1 => {
                self.functions.set_data1(received.payload());
                Ok(ReceivedPacket::Functions)
            }

            packet_type::FUNCTIONS_GET_2 => {
                self.functions.set_data2(received.payload());
                Ok(ReceivedPacket::Functions)
            }

            // Timer packets (0x05) fall through here: the entity exists but
            // decoding them is not supported.
            other => Err(DecodeError::UnsupportedType(other)),
        }
    }
}

impl Default for HeatPump {
    fn default() -> Self {
        Self::new()
    }
}

fn round_to_half(celsius: f32) -> f32 {
    (celsius * 2.0).round() / 2.0
}

fn half_degrees(byte: u8) -> f32 {
    (f32::from(byte) - 128.0) / 2.0
}

/// Convert to Celsius, rounded to the nearest half degree the unit can
/// express.
pub fn fahrenheit_to_celsius(fahrenheit: i32) -> f32 {
    round_to_half((fahrenheit as f32 - 32.0) / 1.8)
}

pub fn celsius_to_fahrenheit(celsius: f32) -> i32 {
    (celsius * 1.8 + 32.0 + 0.5) as i32
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use hex_literal::hex;

    use super::*;
    use crate::protocol::packet::checksum;

    // Captured settings report: power OFF, mode HEAT, 20C via the legacy
    // table, fan/vane AUTO, wide vane at the table default.
    const SETTINGS_REPORT: [u8; 22] = hex!("fc620130100200000001 0b 00000000000000000000 4f");

    // Room temperature report carrying 20.0C in the extended byte.
    const ROOM_TEMP_REPORT: [u8; 22] = hex!("fc620130100300000a0000 a8 000000000000000000 a8");

    fn data_packet(type_byte: u8, payload: &[u8]) -> [u8; 22] {
        let mut bytes = [0u8; 22];
        bytes[..5].copy_from_slice(&[0xFC, 0x62, 0x01, 0x30, 0x10]);
        bytes[5] = type_byte;
        bytes[6..6 + payload.len()].copy_from_slice(payload);
        bytes[21] = checksum(&bytes[..21]);
        bytes
    }

    fn ack_packet(kind: u8) -> [u8; 22] {
        let mut bytes = [0u8; 22];
        bytes[..5].copy_from_slice(&[0xFC, kind, 0x01, 0x30, 0x10]);
        bytes[21] = checksum(&bytes[..21]);
        bytes
    }

    // A half as units report it: fourteen populated slots, the trailing
    // slot empty.
    fn function_payload(first_code: u8, value: u8) -> [u8; 15] {
        let mut payload = [0u8; 15];
        for (i, byte) in payload[..14].iter_mut().enumerate() {
            *byte = ((first_code + i as u8 - 100) << 2) | value;
        }
        payload
    }

    fn synced_heatpump() -> HeatPump {
        let mut hp = HeatPump::new();
        hp.read_packet(&SETTINGS_REPORT).unwrap();
        hp.reset_wanted_settings();
        hp
    }

    #[test]
    fn settings_report_is_decoded() {
        let mut hp = HeatPump::new();
        let received = hp.read_packet(&SETTINGS_REPORT).unwrap();
        assert_eq!(received, ReceivedPacket::Settings);

        let settings = hp.settings();
        assert_eq!(settings.power, Some(Power::Off));
        assert_eq!(settings.mode, Some(Mode::Heat));
        assert_eq!(settings.temperature, Some(20.0));
        assert_eq!(settings.fan, Some(FanSpeed::Auto));
        assert_eq!(settings.vane, Some(Vane::Auto));
        assert_eq!(settings.wide_vane, Some(WideVane::FullLeft));
        assert!(!settings.i_see);
        assert!(!hp.is_powered_on());
    }

    #[test]
    fn isee_flag_shifts_the_mode_byte() {
        let mut hp = HeatPump::new();
        // data[3] power ON, data[4] = COOL (0x03) + i-See flag.
        let packet = data_packet(0x02, &[0x00, 0x00, 0x01, 0x03 + 0x08, 0x0B]);
        hp.read_packet(&packet).unwrap();

        assert!(hp.i_see());
        assert_eq!(hp.settings().mode, Some(Mode::Cool));
        assert_eq!(hp.settings().power, Some(Power::On));
        assert!(hp.is_powered_on());
    }

    #[test]
    fn extended_temperature_latches_half_degree_mode() {
        let mut hp = HeatPump::new();
        // data[11] = 21.5C in the extended encoding; legacy byte unused.
        let payload = [0, 0, 0, 0x01, 0, 0, 0, 0, 0, 0, 0xAB];
        hp.read_packet(&data_packet(0x02, &payload)).unwrap();
        assert_eq!(hp.settings().temperature, Some(21.5));

        // From now on the encoder must use the extended byte at offset 19.
        hp.reset_wanted_settings();
        hp.set_temperature(20.5);
        let packet = hp.update_packet();
        let bytes = packet.as_bytes();
        assert_eq!(bytes[6], 0x04);
        assert_eq!(bytes[10], 0x00);
        assert_eq!(bytes[19], 169); // 20.5 * 2 + 128
    }

    #[test]
    fn update_with_nothing_staged_is_a_noop() {
        let hp = synced_heatpump();
        let packet = hp.update_packet();
        let bytes = packet.as_bytes();
        assert_eq!(bytes[5], 0x01);
        assert_eq!(bytes[6], 0x00);
        assert_eq!(bytes[7], 0x00);
        assert!(Packet::parse(bytes).is_ok());
    }

    #[test]
    fn single_change_sets_a_single_control_bit() {
        let mut hp = synced_heatpump();
        hp.set_mode(Mode::Cool);

        let packet = hp.update_packet();
        let bytes = packet.as_bytes();
        assert_eq!(bytes[6], 0x02);
        assert_eq!(bytes[7], 0x00);
        assert_eq!(bytes[9], 0x03);
        // No other field byte written.
        assert_eq!(bytes[8], 0x00);
        assert_eq!(bytes[10], 0x00);
        assert_eq!(bytes[11], 0x00);
        assert_eq!(bytes[12], 0x00);
        assert_eq!(bytes[18], 0x00);
        assert!(Packet::parse(bytes).is_ok());
    }

    #[test]
    fn every_field_marks_its_control_bit() {
        let mut hp = synced_heatpump();
        hp.set_power(Power::On);
        hp.set_mode(Mode::Cool);
        hp.set_temperature(24.0);
        hp.set_fan_speed(FanSpeed::Three);
        hp.set_vane(Vane::Swing);
        hp.set_wide_vane(WideVane::Swing);

        let bytes = *hp.update_packet().as_bytes();
        assert_eq!(bytes[6], 0x1F);
        assert_eq!(bytes[7], 0x01);
        assert_eq!(bytes[8], 0x01);
        assert_eq!(bytes[9], 0x03);
        assert_eq!(bytes[10], 0x07); // 24C in the legacy table
        assert_eq!(bytes[11], 0x05);
        assert_eq!(bytes[12], 0x07);
        assert_eq!(bytes[18], 0x0C);
    }

    #[test]
    fn wide_vane_adjustment_is_learned_and_reapplied() {
        let mut hp = HeatPump::new();
        // data[10] = adjustment nibble + Center (0x03).
        let payload = [0, 0, 0, 0x01, 0, 0, 0, 0, 0, 0x83];
        hp.read_packet(&data_packet(0x02, &payload)).unwrap();
        assert_eq!(hp.settings().wide_vane, Some(WideVane::Center));

        hp.reset_wanted_settings();
        hp.set_wide_vane(WideVane::Left);
        let bytes = *hp.update_packet().as_bytes();
        assert_eq!(bytes[18], 0x80 | 0x02);
    }

    #[test]
    fn remote_temperature_override() {
        let hp = HeatPump::new();
        let bytes = *hp.set_remote_temperature(21.3).as_bytes();
        assert_eq!(bytes[5], 0x07);
        assert_eq!(bytes[6], 0x01);
        assert_eq!(bytes[7], 0x1A); // 3 + (21.5 - 10) * 2
        assert_eq!(bytes[8], 0xAB); // 21.5 * 2 + 128
        assert!(Packet::parse(&bytes).is_ok());
    }

    #[test]
    fn remote_temperature_disable() {
        let hp = HeatPump::new();
        let bytes = *hp.set_remote_temperature(0.0).as_bytes();
        assert_eq!(bytes[5], 0x07);
        assert_eq!(bytes[6], 0x00);
        assert_eq!(bytes[7], 0x00);
        assert_eq!(bytes[8], 0x80);
    }

    #[test]
    fn acknowledgement_packets() {
        let mut hp = HeatPump::new();
        assert_eq!(
            hp.read_packet(&ack_packet(0x61)),
            Ok(ReceivedPacket::UpdateAck)
        );
        assert_eq!(
            hp.read_packet(&ack_packet(0x7A)),
            Ok(ReceivedPacket::ConnectAck)
        );
        assert_eq!(
            hp.read_packet(&ack_packet(0x63)),
            Err(DecodeError::UnknownKind(0x63))
        );
    }

    #[test]
    fn room_temperature_legacy_and_extended() {
        let mut hp = HeatPump::new();
        assert_eq!(
            hp.read_packet(&ROOM_TEMP_REPORT),
            Ok(ReceivedPacket::RoomTemperature)
        );
        assert_eq!(hp.room_temperature(), 20.0); // (0xA8 - 128) / 2

        // Extended byte absent: fall back to the table byte at data[3].
        let packet = data_packet(0x03, &[0x00, 0x00, 0x0F]);
        hp.read_packet(&packet).unwrap();
        assert_eq!(hp.room_temperature(), 25.0);
    }

    #[test]
    fn status_fields_update_independently() {
        let mut hp = HeatPump::new();
        hp.read_packet(&data_packet(0x06, &[0x00, 0x00, 0x28, 0x01]))
            .unwrap();
        assert_eq!(hp.status().compressor_frequency, 0x28);
        assert!(hp.operating());

        hp.read_packet(&data_packet(0x09, &[0x00, 0x00, 0x02, 0x01]))
            .unwrap();
        let status = hp.status();
        assert_eq!(status.compressor_state, 0x02);
        assert_eq!(status.fan_mode, 0x01);
        // Fields from the earlier packet are untouched.
        assert_eq!(status.compressor_frequency, 0x28);
        assert!(status.operating);
    }

    #[test]
    fn settings_callback_fires_only_on_change() {
        let calls: Rc<RefCell<Vec<Settings>>> = Rc::default();
        let mut hp = HeatPump::new();
        let sink = Rc::clone(&calls);
        hp.on_settings_changed(move |settings| sink.borrow_mut().push(settings));

        hp.read_packet(&SETTINGS_REPORT).unwrap();
        hp.read_packet(&SETTINGS_REPORT).unwrap();
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0].mode, Some(Mode::Heat));
    }

    #[test]
    fn status_callback_fires_only_on_change() {
        let calls = Rc::new(RefCell::new(0));
        let mut hp = HeatPump::new();
        let sink = Rc::clone(&calls);
        hp.on_status_changed(move |_| *sink.borrow_mut() += 1);

        let packet = data_packet(0x06, &[0x00, 0x00, 0x28, 0x01]);
        hp.read_packet(&packet).unwrap();
        hp.read_packet(&packet).unwrap();
        assert_eq!(*calls.borrow(), 1);

        hp.read_packet(&data_packet(0x06, &[0x00, 0x00, 0x30, 0x01]))
            .unwrap();
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    #[allow(deprecated)]
    fn room_temp_callback_still_works() {
        let temps: Rc<RefCell<Vec<f32>>> = Rc::default();
        let mut hp = HeatPump::new();
        let sink = Rc::clone(&temps);
        hp.on_room_temp_changed(move |t| sink.borrow_mut().push(t));

        hp.read_packet(&ROOM_TEMP_REPORT).unwrap();
        hp.read_packet(&ROOM_TEMP_REPORT).unwrap();
        assert_eq!(*temps.borrow(), vec![20.0]);
    }

    #[test]
    fn function_packets_fill_both_halves() {
        let mut hp = HeatPump::new();
        assert_eq!(hp.set_functions1(), Err(EncodeError::FunctionsNotRead));

        let part1 = data_packet(0x20, &function_payload(101, 1));
        let part2 = data_packet(0x22, &function_payload(115, 2));
        assert_eq!(hp.read_packet(&part1), Ok(ReceivedPacket::Functions));
        assert!(!hp.functions().is_valid());
        assert_eq!(hp.read_packet(&part2), Ok(ReceivedPacket::Functions));
        assert!(hp.functions().is_valid());
        assert_eq!(hp.functions().value(101), 1);
        assert_eq!(hp.functions().value(115), 2);
    }

    #[test]
    fn function_set_packets_round_trip_unit_data() {
        let mut hp = HeatPump::new();
        let half1 = function_payload(101, 1);
        let half2 = function_payload(115, 2);
        hp.read_packet(&data_packet(0x20, &half1)).unwrap();
        hp.read_packet(&data_packet(0x22, &half2)).unwrap();

        let packet1 = hp.set_functions1().unwrap();
        assert_eq!(packet1.as_bytes()[5], 0x1F);
        assert_eq!(&packet1.as_bytes()[6..21], &half1);
        assert!(Packet::parse(packet1.as_bytes()).is_ok());

        let packet2 = hp.set_functions2().unwrap();
        assert_eq!(packet2.as_bytes()[5], 0x21);
        assert_eq!(&packet2.as_bytes()[6..21], &half2);
    }

    #[test]
    fn function_set_refuses_incomplete_blocks() {
        let mut hp = HeatPump::new();

        // A zero slot in the middle of the half marks garbage data.
        let mut hole = function_payload(101, 1);
        hole[4] = 0;
        hp.read_packet(&data_packet(0x20, &hole)).unwrap();
        hp.read_packet(&data_packet(0x22, &function_payload(115, 2)))
            .unwrap();
        assert_eq!(hp.set_functions1(), Err(EncodeError::IncompleteFunctionData));
        // The other half is intact and still encodes.
        assert!(hp.set_functions2().is_ok());

        // A populated trailing slot is rejected just the same.
        let mut overfull = function_payload(101, 1);
        overfull[14] = ((115 - 100) << 2) | 1;
        hp.read_packet(&data_packet(0x20, &overfull)).unwrap();
        assert_eq!(hp.set_functions1(), Err(EncodeError::IncompleteFunctionData));
    }

    #[test]
    fn timer_packets_stay_unsupported() {
        let mut hp = HeatPump::new();
        assert_eq!(
            hp.read_packet(&data_packet(0x05, &[0x00, 0x00, 0x01])),
            Err(DecodeError::UnsupportedType(0x05))
        );
        assert_eq!(
            hp.read_packet(&data_packet(0x04, &[])),
            Err(DecodeError::UnsupportedType(0x04))
        );
    }

    #[test]
    fn staged_temperature_is_normalized() {
        let mut hp = HeatPump::new();
        hp.set_temperature(22.0);
        assert_eq!(hp.wanted_settings().temperature, Some(22.0));
        hp.set_temperature(50.0);
        assert_eq!(hp.wanted_settings().temperature, Some(31.0));

        // Learn the extended encoding, then staging rounds and clamps.
        let payload = [0, 0, 0, 0x01, 0, 0, 0, 0, 0, 0, 0xAB];
        hp.read_packet(&data_packet(0x02, &payload)).unwrap();
        hp.set_temperature(21.3);
        assert_eq!(hp.wanted_settings().temperature, Some(21.5));
        hp.set_temperature(50.0);
        assert_eq!(hp.wanted_settings().temperature, Some(31.0));
        hp.set_temperature(2.0);
        assert_eq!(hp.wanted_settings().temperature, Some(10.0));
    }

    #[test]
    fn temperature_conversions_round_like_the_unit() {
        assert_eq!(fahrenheit_to_celsius(68), 20.0);
        assert_eq!(fahrenheit_to_celsius(70), 21.0);
        assert_eq!(celsius_to_fahrenheit(20.0), 68);
        assert_eq!(celsius_to_fahrenheit(21.5), 71); // 70.7 + 0.5 truncated
    }
}
