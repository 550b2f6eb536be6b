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

use carve_ssh::SshError;
use thiserror::Error;

/// The phase of the apply protocol a failure occurred in. Rollback runs
/// for failures at or after [`ApplyStep::Swapping`]; before that the live
/// config has not been touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStep {
    Staging,
    BackingUp,
    Swapping,
    Validating,
    Restarting,
}

impl std::fmt::Display for ApplyStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ApplyStep::Staging => "staging",
            ApplyStep::BackingUp => "backing up",
            ApplyStep::Swapping => "swapping",
            ApplyStep::Validating => "validating",
            ApplyStep::Restarting => "restarting",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("DHCP configuration must not be empty")]
    EmptyConfig,

    #[error("Remote command failed while {step} (exit {exit_status}): {stderr}")]
    RemoteCommandFailed {
        step: ApplyStep,
        exit_status: u32,
        stderr: String,
    },

    #[error("SSH transport failed while {step}: {source}")]
    Shell {
        step: ApplyStep,
        #[source]
        source: SshError,
    },

    #[error("Configuration syntax check failed:\n{0}")]
    ValidationFailed(String),

    #[error("DHCP service restart failed:\n{0}")]
    RestartFailed(String),
}
