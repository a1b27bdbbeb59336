pub mod client;

use serde::Deserialize;

/// Response of `plugin/enclosure/inputs/{id}` for a temperature sensor.
#[derive(Debug, Deserialize)]
pub struct EnclosureInput {
    pub temp_sensor_temp: f64,
    pub temp_sensor_humidity: f64,
    #[serde(default)]
    pub use_fahrenheit: bool,
}
