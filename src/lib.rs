//! Client adapter for a printer host's enclosure and PSU control plugins.

pub mod config;
pub mod enclosure;
pub mod error;
pub mod notify;
pub mod octoprint;

pub use config::{Config, PsuBackend, PsuConfig};
pub use enclosure::client::EnclosureClient;
pub use enclosure::{PsuState, TemperatureReading, TemperatureUnit};
pub use error::{ConfigError, TransportError};
pub use notify::{LogNotifier, Notifier};
pub use octoprint::client::{OctoPrintClient, Transport};
