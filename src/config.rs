use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub octoprint: OctoPrintConfig,
    pub enclosure: EnclosureConfig,
    pub psu: PsuConfig,
}

#[derive(Debug, Clone)]
pub struct OctoPrintConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct EnclosureConfig {
    /// Enclosure plugin input id polled for the ambient temperature.
    pub ambient_sensor: String,
}

/// Backend selections for PSU control. More than one may be configured;
/// dispatch resolves the conflict through [`PsuConfig::active_backend`].
#[derive(Debug, Clone, Default)]
pub struct PsuConfig {
    pub psu_control: bool,
    pub tplink: Option<TpLinkConfig>,
    pub tasmota: Option<TasmotaConfig>,
    pub tasmota_mqtt: Option<TasmotaMqttConfig>,
}

#[derive(Debug, Clone)]
pub struct TpLinkConfig {
    pub ip: IpAddr,
}

#[derive(Debug, Clone)]
pub struct TasmotaConfig {
    pub ip: IpAddr,
    pub idx: u8,
}

#[derive(Debug, Clone)]
pub struct TasmotaMqttConfig {
    pub topic: String,
    pub relay: u8,
}

/// The backend selected for a PSU command, with its wire parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PsuBackend {
    PsuControl,
    TpLink { ip: IpAddr },
    Tasmota { ip: IpAddr, idx: u8 },
    TasmotaMqtt { topic: String, relay: u8 },
}

fn env_required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnv(key))
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    matches!(
        env_optional(key).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

fn env_parsed<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_optional(key) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| ConfigError::InvalidEnv {
            name: key,
            reason: e.to_string(),
        }),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            octoprint: OctoPrintConfig {
                base_url: env_required("OCTOPRINT_URL")?,
                api_key: env_required("OCTOPRINT_API_KEY")?,
                timeout: Duration::from_secs(env_or_default("HTTP_TIMEOUT_SECS", 10)),
            },
            enclosure: EnclosureConfig {
                ambient_sensor: env_or_default("ENCLOSURE_AMBIENT_SENSOR", "1".to_string()),
            },
            psu: PsuConfig {
                psu_control: env_flag("PSU_CONTROL"),
                tplink: env_parsed("TPLINK_SMARTPLUG_IP")?.map(|ip| TpLinkConfig { ip }),
                tasmota: env_parsed("TASMOTA_IP")?.map(|ip| TasmotaConfig {
                    ip,
                    idx: env_or_default("TASMOTA_INDEX", 1),
                }),
                tasmota_mqtt: env_optional("TASMOTA_MQTT_TOPIC").map(|topic| TasmotaMqttConfig {
                    topic,
                    relay: env_or_default("TASMOTA_MQTT_RELAY", 1),
                }),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(name: &'static str, reason: &str) -> ConfigError {
            ConfigError::InvalidEnv {
                name,
                reason: reason.to_string(),
            }
        }

        if self.octoprint.base_url.trim().is_empty() {
            return Err(invalid("OCTOPRINT_URL", "must not be empty"));
        }
        if self.octoprint.api_key.trim().is_empty() {
            return Err(invalid("OCTOPRINT_API_KEY", "must not be empty"));
        }
        if self.octoprint.timeout.is_zero() {
            return Err(invalid("HTTP_TIMEOUT_SECS", "must be > 0"));
        }
        if self.enclosure.ambient_sensor.trim().is_empty() {
            return Err(invalid("ENCLOSURE_AMBIENT_SENSOR", "must not be empty"));
        }
        if let Some(tasmota) = &self.psu.tasmota {
            if tasmota.idx == 0 {
                return Err(invalid("TASMOTA_INDEX", "must be >= 1"));
            }
        }
        if let Some(mqtt) = &self.psu.tasmota_mqtt {
            if mqtt.relay == 0 {
                return Err(invalid("TASMOTA_MQTT_RELAY", "must be >= 1"));
            }
        }
        Ok(())
    }
}

impl PsuConfig {
    /// Resolve which backend handles PSU commands. Backends are checked in
    /// fixed priority order (PSUControl, TP-Link, Tasmota, Tasmota-MQTT) and
    /// the first configured one wins; callers may rely on that order when
    /// several are configured at once.
    pub fn active_backend(&self) -> Option<PsuBackend> {
        if self.psu_control {
            Some(PsuBackend::PsuControl)
        } else if let Some(tplink) = &self.tplink {
            Some(PsuBackend::TpLink { ip: tplink.ip })
        } else if let Some(tasmota) = &self.tasmota {
            Some(PsuBackend::Tasmota {
                ip: tasmota.ip,
                idx: tasmota.idx,
            })
        } else if let Some(mqtt) = &self.tasmota_mqtt {
            Some(PsuBackend::TasmotaMqtt {
                topic: mqtt.topic.clone(),
                relay: mqtt.relay,
            })
        } else {
            None
        }
    }
}
