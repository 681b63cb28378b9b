use std::io::{self, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};
use hexplay::HexViewBuilder;

use mitsupump::protocol::packet::CONNECT;
use mitsupump::protocol::{FanSpeed, InfoRequest, Mode, Packet, Power, Vane, WideVane};
use mitsupump::HeatPump;

#[derive(Parser)]
#[command(about = "Codec for the Mitsubishi heat pump service-port protocol")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read hex-encoded packets from stdin, decode them and print the
    /// accumulated unit state as JSON
    Decode {
        /// Also dump each packet as a hex view
        #[arg(long)]
        dump: bool,
    },
    /// Build a settings packet carrying the given changes
    Set {
        #[arg(long)]
        power: Option<Power>,
        #[arg(long)]
        mode: Option<Mode>,
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long)]
        fan: Option<FanSpeed>,
        #[arg(long)]
        vane: Option<Vane>,
        #[arg(long)]
        wide_vane: Option<WideVane>,
    },
    /// Build a remote temperature override packet
    RemoteTemp {
        /// Degrees Celsius; zero or below disables the override
        celsius: f32,
    },
    /// Build an info request packet querying one category of unit state
    Info { kind: InfoRequest },
    /// Print the handshake bytes that open a session on the service port
    Connect,
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Decode { dump } => decode(dump),
        Command::Set {
            power,
            mode,
            temperature,
            fan,
            vane,
            wide_vane,
        } => {
            let mut hp = HeatPump::new();
            if let Some(power) = power {
                hp.set_power(power);
            }
            if let Some(mode) = mode {
                hp.set_mode(mode);
            }
            if let Some(celsius) = temperature {
                hp.set_temperature(celsius);
            }
            if let Some(fan) = fan {
                hp.set_fan_speed(fan);
            }
            if let Some(vane) = vane {
                hp.set_vane(vane);
            }
            if let Some(wide_vane) = wide_vane {
                hp.set_wide_vane(wide_vane);
            }
            println!("{}", hex::encode(hp.update_packet().to_bytes()));
            Ok(())
        }
        Command::RemoteTemp { celsius } => {
            let packet = HeatPump::new().set_remote_temperature(celsius);
            println!("{}", hex::encode(packet.to_bytes()));
            Ok(())
        }
        Command::Info { kind } => {
            println!("{}", hex::encode(Packet::info_request(kind).to_bytes()));
            Ok(())
        }
        Command::Connect => {
            println!("{}", hex::encode(CONNECT));
            Ok(())
        }
    }
}

// Feed every packet into one codec instance so the printed state reflects
// everything seen so far, the way a bridge polling a unit would hold it.
fn decode(dump: bool) -> anyhow::Result<()> {
    let mut hp = HeatPump::new();

    let stdin = io::stdin();
    for line in stdin.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let bytes = hex::decode(line).context("packet is not valid hex")?;
        if dump {
            println!("{}", HexViewBuilder::new(&bytes).row_width(11).finish());
        }

        match hp.read_packet(&bytes) {
            Ok(received) => {
                let state = serde_json::json!({
                    "received": received,
                    "settings": hp.settings(),
                    "status": hp.status(),
                });
                println!("{}", state);
            }
            Err(err) => eprintln!("skipping packet: {}", err),
        }
        io::stdout().flush()?;
    }

    Ok(())
}
