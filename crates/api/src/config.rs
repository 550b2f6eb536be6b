/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use carve_dhcp::ApplyPaths;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "Defaults::bind_address")]
    pub bind_address: SocketAddr,
    /// Wall-clock bound on every remote command and file transfer.
    #[serde(default = "Defaults::command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,
    #[serde(default)]
    pub apply: ApplyPaths,
}

pub struct Defaults;

impl Defaults {
    pub fn bind_address() -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], 3001))
    }
    pub fn command_timeout() -> Duration {
        Duration::from_secs(30)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: Defaults::bind_address(),
            command_timeout: Defaults::command_timeout(),
            apply: ApplyPaths::default(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file: {path}: {error}")]
    CouldNotRead { path: String, error: std::io::Error },
    #[error("Invalid TOML in config file: {path}: {error}")]
    InvalidToml {
        path: String,
        error: toml::de::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg = std::fs::read_to_string(path).map_err(|error| ConfigError::CouldNotRead {
            path: path.to_string_lossy().to_string(),
            error,
        })?;
        toml::from_str::<Self>(&cfg).map_err(|error| ConfigError::InvalidToml {
            path: path.to_string_lossy().to_string(),
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // Fields not present in the file fall back to the defaults.
    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
                bind_address = "127.0.0.1:8099"
                command_timeout = "45s"

                [apply]
                final_path = "/etc/dhcp/dhcpd.conf"
                service = "isc-dhcp-server"
            "#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8099".parse().unwrap());
        assert_eq!(config.command_timeout, Duration::from_secs(45));
        assert_eq!(config.apply.staging_dir, "/tmp");
        assert_eq!(config.apply.validate_command, None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/carve.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::CouldNotRead { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "bind_address = ").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToml { .. }));
    }
}
