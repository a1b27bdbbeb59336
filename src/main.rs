use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;

use enclosure_ctl::config::Config;
use enclosure_ctl::enclosure::PsuState;
use enclosure_ctl::enclosure::client::EnclosureClient;
use enclosure_ctl::notify::LogNotifier;
use enclosure_ctl::octoprint::client::OctoPrintClient;

#[derive(Parser, Debug)]
#[command(name = "enclosure-ctl")]
#[command(about = "Control a printer enclosure and PSU through the host's plugin API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Switch the power supply
    Psu {
        #[command(subcommand)]
        action: PsuAction,
    },
    /// Set a neopixel strip color
    Led {
        identifier: u32,
        red: u8,
        green: u8,
        blue: u8,
    },
    /// Switch a relay output
    Output { identifier: u32, state: Switch },
    /// Set a PWM output's duty cycle (0-100)
    Pwm { identifier: u32, duty_cycle: u8 },
    /// Read the ambient enclosure temperature
    Temp,
}

#[derive(Subcommand, Debug)]
enum PsuAction {
    On,
    Off,
    Toggle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let transport = Arc::new(OctoPrintClient::new(&config.octoprint));
    let client = EnclosureClient::new(&config, transport, Arc::new(LogNotifier));

    match cli.command {
        Command::Psu { action } => match action {
            PsuAction::On => client.set_psu_state(PsuState::On).await,
            PsuAction::Off => client.set_psu_state(PsuState::Off).await,
            PsuAction::Toggle => client.toggle_psu().await,
        },
        Command::Led {
            identifier,
            red,
            green,
            blue,
        } => client.set_led_color(identifier, red, green, blue).await,
        Command::Output { identifier, state } => {
            client.set_output(identifier, state == Switch::On).await
        }
        Command::Pwm {
            identifier,
            duty_cycle,
        } => client.set_output_pwm(identifier, duty_cycle).await,
        Command::Temp => match client.get_enclosure_temperature().await {
            Ok(reading) => {
                println!(
                    "{:.1}{} at {:.0}% humidity",
                    reading.temperature, reading.unit, reading.humidity
                );
            }
            Err(e) => {
                error!("Failed to read enclosure temperature: {}", e);
                process::exit(1);
            }
        },
    }
}
