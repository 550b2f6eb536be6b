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

//! The staged apply protocol: stage the rendered text next to the live
//! config, back the live config up, swap the staged file in, syntax-check
//! the result, and restart the service. Any failure once the swap has
//! begun moves the backup file back over the live path; the caller always
//! sees the original failure, never a rollback error.

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;

use crate::errors::{ApplyError, ApplyStep};
use crate::shell::RemoteShell;

/// Where the protocol reads and writes on the target host. The command
/// overrides exist for test rigs that have no dhcpd or systemd; production
/// configs leave them unset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApplyPaths {
    pub final_path: String,
    pub staging_dir: String,
    pub service: String,
    pub validate_command: Option<String>,
    pub restart_command: Option<String>,
}

impl Default for ApplyPaths {
    fn default() -> Self {
        Self {
            final_path: "/etc/dhcp/dhcpd.conf".to_string(),
            staging_dir: "/tmp".to_string(),
            service: "isc-dhcp-server".to_string(),
            validate_command: None,
            restart_command: None,
        }
    }
}

/// Where a successful apply left its artifacts. The backup file is kept on
/// the target for manual recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub staged_path: String,
    pub backup_path: String,
}

/// Pushes `config` onto the target as the live DHCP configuration.
/// Strictly sequential; each step runs only after the previous one
/// succeeded. Callers must serialize concurrent applies against the same
/// target so two backup/swap sequences cannot interleave.
pub async fn apply<S: RemoteShell + ?Sized>(
    shell: &S,
    config: &str,
    paths: &ApplyPaths,
) -> Result<ApplyReport, ApplyError> {
    if config.trim().is_empty() {
        return Err(ApplyError::EmptyConfig);
    }

    let timestamp = Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    let file_name = paths
        .final_path
        .rsplit('/')
        .next()
        .unwrap_or("dhcpd.conf");
    let staged = format!(
        "{}/{file_name}.{timestamp}.tmp",
        paths.staging_dir.trim_end_matches('/')
    );
    let backup = format!("{}.backup-{timestamp}", paths.final_path);

    shell
        .write_file(&staged, config.as_bytes())
        .await
        .map_err(|source| ApplyError::Shell {
            step: ApplyStep::Staging,
            source,
        })?;
    tracing::info!(staged, "Staged DHCP configuration");

    // The backup is the rollback anchor; nothing mutates the live file
    // until it exists.
    let backup_cmd = format!("sudo cp {} {backup}", paths.final_path);
    if let Err(error) = checked(shell, ApplyStep::BackingUp, &backup_cmd).await {
        clean_staged(shell, &staged).await;
        return Err(error);
    }

    match swap_validate_restart(shell, paths, &staged).await {
        Ok(()) => {
            clean_staged(shell, &staged).await;
            tracing::info!(
                final_path = paths.final_path,
                backup,
                "DHCP configuration applied"
            );
            Ok(ApplyReport {
                staged_path: staged,
                backup_path: backup,
            })
        }
        Err(error) => {
            tracing::error!(%error, "Apply failed, rolling back");
            roll_back(shell, &paths.final_path, &backup).await;
            clean_staged(shell, &staged).await;
            Err(error)
        }
    }
}

/// The live file is mutated from the swap onward; any `Err` from here
/// triggers rollback in the caller.
async fn swap_validate_restart<S: RemoteShell + ?Sized>(
    shell: &S,
    paths: &ApplyPaths,
    staged: &str,
) -> Result<(), ApplyError> {
    let final_path = &paths.final_path;
    let swap_cmd = format!(
        "sudo cp {staged} {final_path} && sudo chown root:root {final_path} && sudo chmod 644 {final_path}"
    );
    checked(shell, ApplyStep::Swapping, &swap_cmd).await?;

    let validate_cmd = paths
        .validate_command
        .clone()
        .unwrap_or_else(|| format!("sudo dhcpd -t -cf {final_path}"));
    let validation = run(shell, ApplyStep::Validating, &validate_cmd).await?;
    // dhcpd chats on stderr even on success, so the exit code alone is not
    // trusted either way: a zero exit with an error diagnostic still fails.
    if validation.exit_status != 0 || has_failure_keyword(&validation.stderr) {
        return Err(ApplyError::ValidationFailed(validation.stderr));
    }

    let restart_cmd = paths
        .restart_command
        .clone()
        .unwrap_or_else(|| format!("sudo systemctl restart {}", paths.service));
    let restart = run(shell, ApplyStep::Restarting, &restart_cmd).await?;
    // systemctl restart is silent when the unit comes up; any diagnostic
    // output at all means the restart was not clean.
    if !restart.stderr.is_empty() {
        return Err(ApplyError::RestartFailed(restart.stderr));
    }
    Ok(())
}

fn has_failure_keyword(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.contains("error") || stderr.contains("fail")
}

async fn run<S: RemoteShell + ?Sized>(
    shell: &S,
    step: ApplyStep,
    command: &str,
) -> Result<carve_ssh::CommandOutput, ApplyError> {
    tracing::debug!(%step, command, "Running remote command");
    shell
        .execute(command)
        .await
        .map_err(|source| ApplyError::Shell { step, source })
}

async fn checked<S: RemoteShell + ?Sized>(
    shell: &S,
    step: ApplyStep,
    command: &str,
) -> Result<(), ApplyError> {
    let output = run(shell, step, command).await?;
    if output.exit_status != 0 {
        return Err(ApplyError::RemoteCommandFailed {
            step,
            exit_status: output.exit_status,
            stderr: output.stderr,
        });
    }
    Ok(())
}

/// Moves the backup back over the live path. Failures here are logged
/// only; the original apply error always wins.
async fn roll_back<S: RemoteShell + ?Sized>(shell: &S, final_path: &str, backup: &str) {
    let command = format!("sudo mv {backup} {final_path}");
    match shell.execute(&command).await {
        Ok(output) if output.exit_status != 0 => {
            tracing::error!(
                backup,
                final_path,
                exit_status = output.exit_status,
                stderr = output.stderr,
                "Rollback failed, live configuration may be the rejected one"
            );
        }
        Ok(_) => {
            tracing::warn!(backup, final_path, "Rolled back to previous configuration");
        }
        Err(error) => {
            tracing::error!(
                backup,
                final_path,
                %error,
                "Rollback failed, live configuration may be the rejected one"
            );
        }
    }
}

/// Best-effort removal of the staged temp file.
async fn clean_staged<S: RemoteShell + ?Sized>(shell: &S, staged: &str) {
    let command = format!("rm -f {staged}");
    match shell.execute(&command).await {
        Ok(output) if output.exit_status != 0 => {
            tracing::warn!(staged, stderr = output.stderr, "Could not remove staged file");
        }
        Ok(_) => {}
        Err(error) => {
            tracing::warn!(staged, %error, "Could not remove staged file");
        }
    }
}
