use serde::{Deserialize, Serialize};

pub mod functions;
pub mod packet;
pub mod tables;

pub use functions::Functions;
pub use packet::{DecodeError, InfoRequest, Packet};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Power {
    #[default]
    Off,
    On,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    #[default]
    Heat,
    Dry,
    Cool,
    Fan,
    Auto,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum FanSpeed {
    #[default]
    Auto,
    Quiet,
    #[strum(serialize = "1")]
    #[serde(rename = "1")]
    One,
    #[strum(serialize = "2")]
    #[serde(rename = "2")]
    Two,
    #[strum(serialize = "3")]
    #[serde(rename = "3")]
    Three,
    #[strum(serialize = "4")]
    #[serde(rename = "4")]
    Four,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Vane {
    #[default]
    Auto,
    #[strum(serialize = "1")]
    #[serde(rename = "1")]
    One,
    #[strum(serialize = "2")]
    #[serde(rename = "2")]
    Two,
    #[strum(serialize = "3")]
    #[serde(rename = "3")]
    Three,
    #[strum(serialize = "4")]
    #[serde(rename = "4")]
    Four,
    #[strum(serialize = "5")]
    #[serde(rename = "5")]
    Five,
    Swing,
}

// The horizontal vane names follow the glyphs printed on the remote.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum WideVane {
    #[default]
    #[strum(serialize = "<<")]
    #[serde(rename = "<<")]
    FullLeft,
    #[strum(serialize = "<")]
    #[serde(rename = "<")]
    Left,
    #[strum(serialize = "|")]
    #[serde(rename = "|")]
    Center,
    #[strum(serialize = ">")]
    #[serde(rename = ">")]
    Right,
    #[strum(serialize = ">>")]
    #[serde(rename = ">>")]
    FullRight,
    #[strum(serialize = "<>")]
    #[serde(rename = "<>")]
    Split,
    #[strum(serialize = "SWING")]
    #[serde(rename = "SWING")]
    Swing,
}

/// The complete settable state of the unit.
///
/// Fields are `None` until a value has been decoded from the unit or staged
/// by a setter; the encoder skips unset fields entirely.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub power: Option<Power>,
    pub mode: Option<Mode>,

    // Target temperature in Celsius. Whole degrees on older units, half
    // degrees once the unit has shown it speaks the extended encoding.
    pub temperature: Option<f32>,

    pub fan: Option<FanSpeed>,
    pub vane: Option<Vane>,
    pub wide_vane: Option<WideVane>,

    // Whether the unit carries an i-See occupancy sensor. Reported by the
    // unit, never sent to it.
    pub i_see: bool,
}

impl Settings {
    /// True when no field has been populated yet.
    pub fn is_unset(&self) -> bool {
        self.power.is_none()
            && self.mode.is_none()
            && self.temperature.is_none()
            && self.fan.is_none()
            && self.vane.is_none()
            && self.wide_vane.is_none()
            && !self.i_see
    }
}

/// Read-only operating state. Fields arrive in different packet types and
/// are updated independently; a packet that does not carry a field leaves
/// its cached value alone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub room_temperature: f32,
    pub operating: bool,
    pub compressor_frequency: u8,
    pub fan_mode: u8,
    pub compressor_state: u8,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TimerMode {
    #[default]
    None,
    Off,
    On,
    Both,
}

/// On/off timer programming. Modeled for completeness; the decoder does not
/// currently accept timer packets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timers {
    pub mode: TimerMode,
    pub on_minutes_set: u16,
    pub on_minutes_remaining: u16,
    pub off_minutes_set: u16,
    pub off_minutes_remaining: u16,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn symbolic_names_parse_case_insensitively() {
        assert_eq!("heat".parse::<Mode>().unwrap(), Mode::Heat);
        assert_eq!("HEAT".parse::<Mode>().unwrap(), Mode::Heat);
        assert_eq!("Quiet".parse::<FanSpeed>().unwrap(), FanSpeed::Quiet);
        assert_eq!("3".parse::<FanSpeed>().unwrap(), FanSpeed::Three);
        assert_eq!("swing".parse::<Vane>().unwrap(), Vane::Swing);
        assert_eq!("<>".parse::<WideVane>().unwrap(), WideVane::Split);
        assert!("sideways".parse::<Mode>().is_err());
    }

    #[test]
    fn display_matches_remote_labels() {
        assert_eq!(Power::Off.to_string(), "OFF");
        assert_eq!(FanSpeed::Four.to_string(), "4");
        assert_eq!(WideVane::FullLeft.to_string(), "<<");
        assert_eq!(WideVane::Swing.to_string(), "SWING");
    }

    #[test]
    fn settings_equality_and_unset() {
        let empty = Settings::default();
        assert!(empty.is_unset());

        let mut set = Settings::default();
        set.mode = Some(Mode::Cool);
        assert!(!set.is_unset());
        assert_ne!(empty, set);

        let same = set;
        assert_eq!(set, same);
    }

    #[test]
    fn timers_equality() {
        let a = Timers {
            mode: TimerMode::On,
            on_minutes_set: 120,
            on_minutes_remaining: 90,
            ..Timers::default()
        };
        let mut b = a;
        assert_eq!(a, b);
        b.on_minutes_remaining = 80;
        assert_ne!(a, b);
    }

    #[test]
    fn settings_serialize_with_wire_names() {
        let mut settings = Settings::default();
        settings.power = Some(Power::On);
        settings.mode = Some(Mode::Heat);
        settings.fan = Some(FanSpeed::Two);
        settings.wide_vane = Some(WideVane::Center);

        let json = serde_json::to_value(settings).unwrap();
        assert_eq!(json["power"], "ON");
        assert_eq!(json["mode"], "HEAT");
        assert_eq!(json["fan"], "2");
        assert_eq!(json["wideVane"], "|");
        assert_eq!(json["iSee"], false);
    }
}
