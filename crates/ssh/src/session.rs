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

//! Live SSH sessions: password auth, command execution bounded by a
//! wall-clock timeout, and SFTP file placement.

use std::time::Duration;

use async_ssh2_tokio::{AuthMethod, Client, ServerCheckMethod};
use serde::Deserialize;

use crate::errors::SshError;

/// Captured output of one finished remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: u32,
}

/// Connection coordinates for a remote host.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectParams {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
}

fn default_port() -> u16 {
    22
}

/// Configuration for russh's SSH client connections
fn russh_client_config() -> russh::client::Config {
    russh::client::Config {
        // Some older hosts use a Diffie-Hellman group size of 2048, which is not allowed by default.
        gex: russh::client::GexParams::new(2048, 8192, 8192)
            .expect("BUG: static DH group parameters must be valid"),
        keepalive_interval: Some(Duration::from_secs(60)),
        keepalive_max: 2,
        window_size: 2097152 * 3,
        maximum_packet_size: 65535,
        ..Default::default()
    }
}

/// An authenticated session against one remote host. Share behind an `Arc`;
/// every operation takes `&self`.
pub struct SshSession {
    client: Client,
    target: String,
    timeout: Duration,
}

impl SshSession {
    /// Connects and authenticates with the given password. The host may be
    /// a name or a dotted address; the first resolved address is used.
    pub async fn connect(params: &ConnectParams, timeout: Duration) -> Result<Self, SshError> {
        let resolve_err = || SshError::Resolve {
            host: params.host.clone(),
            port: params.port,
        };
        let address = tokio::net::lookup_host((params.host.as_str(), params.port))
            .await
            .map_err(|_| resolve_err())?
            .next()
            .ok_or_else(resolve_err)?;

        let client = Client::connect_with_config(
            address,
            params.username.as_str(),
            AuthMethod::with_password(&params.password),
            ServerCheckMethod::NoCheck,
            russh_client_config(),
        )
        .await
        .map_err(|source| SshError::Connect {
            target: format!("{}:{}", params.host, params.port),
            source,
        })?;

        Ok(Self {
            client,
            target: params.host.clone(),
            timeout,
        })
    }

    /// The host this session was opened against.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Runs one command to completion, capturing both output streams and
    /// the exit status.
    pub async fn execute(&self, command: &str) -> Result<CommandOutput, SshError> {
        let result = tokio::time::timeout(self.timeout, self.client.execute(command))
            .await
            .map_err(|_| SshError::Timeout(self.timeout))?
            .map_err(SshError::Exec)?;
        Ok(CommandOutput {
            stdout: result.stdout,
            stderr: result.stderr,
            exit_status: result.exit_status,
        })
    }

    /// Places `content` at `path` on the remote host over SFTP. The upload
    /// API reads from a local file, so the bytes are spooled through a
    /// temporary file first.
    pub async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), SshError> {
        let spool = tempfile::NamedTempFile::new().map_err(SshError::Spool)?;
        tokio::fs::write(spool.path(), content)
            .await
            .map_err(SshError::Spool)?;
        let local_path = spool.path().to_string_lossy().into_owned();

        let upload = self.client.upload_file(local_path, path, None, None, false);
        tokio::time::timeout(self.timeout, upload)
            .await
            .map_err(|_| SshError::Timeout(self.timeout))?
            .map_err(|err| {
                tracing::error!("error during client.upload_file: {err:?}");
                SshError::Sftp {
                    path: path.to_string(),
                    source: err,
                }
            })
    }

    /// Tears down the underlying transport.
    pub async fn close(&self) -> Result<(), SshError> {
        self.client.disconnect().await.map_err(SshError::Exec)
    }
}
