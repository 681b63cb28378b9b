pub mod heatpump;
pub mod protocol;

pub use heatpump::{
    celsius_to_fahrenheit, fahrenheit_to_celsius, EncodeError, HeatPump, ReceivedPacket,
};
pub use protocol::{
    DecodeError, FanSpeed, Functions, Mode, Packet, Power, Settings, Status, Timers, Vane,
    WideVane,
};
