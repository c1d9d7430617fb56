use crate::http_client::parse_base_url;
use anyhow::{Context, Result, ensure};
use std::{env, net::IpAddr, sync::OnceLock};

/// Zones offered for `TIMEZONE` settings when `TIMEZONES` is not set
pub const DEFAULT_TIMEZONES: [&str; 16] = [
    "Europe/London",
    "Europe/Dublin",
    "Europe/Lisbon",
    "Europe/Paris",
    "Europe/Brussels",
    "Europe/Berlin",
    "Europe/Madrid",
    "Europe/Rome",
    "Europe/Amsterdam",
    "Europe/Stockholm",
    "Europe/Zurich",
    "Europe/Athens",
    "Europe/Kyiv",
    "Europe/Warsaw",
    "Europe/Istanbul",
    "Europe/Moscow",
];

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// UI server configuration
    pub ui: UiConfig,

    /// Device connection configuration
    pub device: DeviceConfig,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub port: u16,
    pub bind_address: IpAddr,
    pub timezones: Vec<String>,
    /// Edge length of the wifi signal icon in pixels
    pub icon_size: u32,
}

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    pub url: String,
}

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// On first call all configuration is loaded from environment variables
    /// and validated. Subsequent calls return the cached instance.
    pub fn get() -> Result<&'static Self> {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

        if let Some(config) = APP_CONFIG.get() {
            return Ok(config);
        }

        let config = Self::load()?;
        Ok(APP_CONFIG.get_or_init(|| config))
    }

    fn load() -> Result<Self> {
        Ok(Self {
            ui: UiConfig::load()?,
            device: DeviceConfig::load()?,
        })
    }
}

impl UiConfig {
    fn load() -> Result<Self> {
        let port = parse_port(env::var("UI_PORT").ok().as_deref())?;
        let bind_address = parse_bind_address(env::var("UI_BIND_ADDRESS").ok().as_deref())?;
        let timezones = parse_timezones(env::var("TIMEZONES").ok().as_deref());
        let icon_size = parse_icon_size(env::var("WIFI_ICON_SIZE").ok().as_deref())?;

        Ok(Self {
            port,
            bind_address,
            timezones,
            icon_size,
        })
    }
}

impl DeviceConfig {
    fn load() -> Result<Self> {
        let url = env::var("DEVICE_URL").unwrap_or_else(|_| "http://192.168.4.1".to_string());
        let url = parse_base_url(&url).context("failed to parse DEVICE_URL")?;

        Ok(Self { url })
    }
}

fn parse_port(value: Option<&str>) -> Result<u16> {
    value
        .unwrap_or("8080")
        .parse::<u16>()
        .context("failed to parse UI_PORT: invalid format")
}

fn parse_bind_address(value: Option<&str>) -> Result<IpAddr> {
    value
        .unwrap_or("0.0.0.0")
        .parse::<IpAddr>()
        .context("failed to parse UI_BIND_ADDRESS: invalid format")
}

fn parse_timezones(value: Option<&str>) -> Vec<String> {
    let configured: Vec<String> = value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|zone| !zone.is_empty())
        .map(str::to_string)
        .collect();

    if configured.is_empty() {
        DEFAULT_TIMEZONES.map(str::to_string).to_vec()
    } else {
        configured
    }
}

fn parse_icon_size(value: Option<&str>) -> Result<u32> {
    let size = value
        .unwrap_or("32")
        .parse::<u32>()
        .context("failed to parse WIFI_ICON_SIZE: invalid format")?;

    ensure!(size > 0, "failed since WIFI_ICON_SIZE is zero");
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod ui {
        use super::*;

        #[test]
        fn defaults() {
            assert_eq!(parse_port(None).unwrap(), 8080);
            assert_eq!(
                parse_bind_address(None).unwrap(),
                "0.0.0.0".parse::<IpAddr>().unwrap()
            );
            assert_eq!(parse_icon_size(None).unwrap(), 32);
        }

        #[test]
        fn invalid_port_is_rejected() {
            let result = parse_port(Some("http"));
            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("UI_PORT"));
            assert!(parse_port(Some("70000")).is_err());
        }

        #[test]
        fn bind_address_accepts_ipv6() {
            assert!(parse_bind_address(Some("::1")).unwrap().is_ipv6());
            assert!(parse_bind_address(Some("localhost")).is_err());
        }

        #[test]
        fn icon_size_must_be_positive() {
            assert!(parse_icon_size(Some("0")).is_err());
            assert_eq!(parse_icon_size(Some("48")).unwrap(), 48);
        }
    }

    mod timezones {
        use super::*;

        #[test]
        fn default_list_is_used_when_unset_or_blank() {
            assert_eq!(parse_timezones(None).len(), 16);
            assert_eq!(parse_timezones(Some(" , ")).len(), 16);
            assert_eq!(parse_timezones(None)[0], "Europe/London");
            assert_eq!(parse_timezones(None)[15], "Europe/Moscow");
        }

        #[test]
        fn configured_list_keeps_order() {
            assert_eq!(
                parse_timezones(Some("UTC, America/New_York,Asia/Tokyo")),
                vec!["UTC", "America/New_York", "Asia/Tokyo"]
            );
        }
    }
}
