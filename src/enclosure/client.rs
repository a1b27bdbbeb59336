use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::info;

use crate::config::{Config, PsuBackend, PsuConfig};
use crate::error::TransportError;
use crate::notify::Notifier;
use crate::octoprint::EnclosureInput;
use crate::octoprint::client::Transport;

use super::{PsuState, TemperatureReading, TemperatureUnit};

const ERR_SET_COLOR: &str = "Can't set LED color!";
const ERR_SET_OUTPUT: &str = "Can't set output!";
const ERR_PSU_STATE: &str = "Can't change PSU state!";
const WARN_NO_PROVIDER: &str = "No provider for PSU control is configured.";

/// Client adapter for the printer host's enclosure and PSU control plugins.
///
/// Write operations are best-effort, single-attempt: a transport failure is
/// reported once through the notifier and then dropped, never returned to
/// the caller. Only the temperature read returns its result.
pub struct EnclosureClient {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    psu: PsuConfig,
    ambient_sensor: String,
    /// Last commanded PSU state, updated on every dispatch.
    psu_state: Mutex<PsuState>,
}

impl EnclosureClient {
    pub fn new(config: &Config, transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            psu: config.psu.clone(),
            ambient_sensor: config.enclosure.ambient_sensor.clone(),
            psu_state: Mutex::new(PsuState::On),
        }
    }

    pub async fn get_enclosure_temperature(&self) -> Result<TemperatureReading, TransportError> {
        let path = format!("plugin/enclosure/inputs/{}", self.ambient_sensor);
        let data = self.transport.get(&path).await?;
        let input: EnclosureInput =
            serde_json::from_value(data).map_err(|source| TransportError::Decode {
                path,
                source,
            })?;

        Ok(TemperatureReading {
            temperature: input.temp_sensor_temp,
            humidity: input.temp_sensor_humidity,
            unit: if input.use_fahrenheit {
                TemperatureUnit::Fahrenheit
            } else {
                TemperatureUnit::Celsius
            },
        })
    }

    pub async fn set_led_color(&self, identifier: u32, red: u8, green: u8, blue: u8) {
        let path = format!("plugin/enclosure/neopixel/{identifier}");
        let body = json!({ "red": red, "green": green, "blue": blue });
        self.patch_or_notify(&path, body, ERR_SET_COLOR).await;
    }

    pub async fn set_output(&self, identifier: u32, status: bool) {
        let path = format!("plugin/enclosure/outputs/{identifier}");
        self.patch_or_notify(&path, json!({ "status": status }), ERR_SET_OUTPUT)
            .await;
    }

    pub async fn set_output_pwm(&self, identifier: u32, duty_cycle: u8) {
        let path = format!("plugin/enclosure/pwm/{identifier}");
        self.patch_or_notify(&path, json!({ "duty_cycle": duty_cycle }), ERR_SET_OUTPUT)
            .await;
    }

    /// Send `state` through the first configured PSU backend. With no
    /// backend configured this warns once and sends nothing.
    pub async fn set_psu_state(&self, state: PsuState) {
        let Some(backend) = self.psu.active_backend() else {
            self.notifier.warning(ERR_PSU_STATE, WARN_NO_PROVIDER);
            return;
        };

        *self.psu_state.lock().await = state;

        let (path, body) = psu_request(&backend, state);
        info!("Switching PSU {} via {}", state, path);
        if let Err(e) = self.transport.post(path, body).await {
            self.notifier.error(ERR_PSU_STATE, &e.to_string());
        }
    }

    /// Send the opposite of the last commanded state (initially ON, so the
    /// first toggle switches the PSU off). Each dispatch records the new
    /// state, so consecutive toggles alternate.
    pub async fn toggle_psu(&self) {
        let next = self.psu_state.lock().await.toggled();
        self.set_psu_state(next).await;
    }

    async fn patch_or_notify(&self, path: &str, body: Value, message: &str) {
        if let Err(e) = self.transport.patch(path, body).await {
            self.notifier.error(message, &e.to_string());
        }
    }
}

/// Build the endpoint and command body for the selected PSU backend.
fn psu_request(backend: &PsuBackend, state: PsuState) -> (&'static str, Value) {
    match backend {
        PsuBackend::PsuControl => (
            "plugin/psucontrol",
            json!({
                "command": match state {
                    PsuState::On => "turnPSUOn",
                    PsuState::Off => "turnPSUOff",
                },
            }),
        ),
        PsuBackend::TpLink { ip } => (
            "plugin/tplinksmartplug",
            json!({ "command": on_off(state), "ip": ip.to_string() }),
        ),
        PsuBackend::Tasmota { ip, idx } => (
            "plugin/tasmota",
            json!({ "command": on_off(state), "ip": ip.to_string(), "idx": idx }),
        ),
        PsuBackend::TasmotaMqtt { topic, relay } => (
            "plugin/tasmota_mqtt",
            json!({ "command": on_off(state), "topic": topic, "relayN": relay }),
        ),
    }
}

fn on_off(state: PsuState) -> &'static str {
    match state {
        PsuState::On => "turnOn",
        PsuState::Off => "turnOff",
    }
}
