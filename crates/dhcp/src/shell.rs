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

//! The seam between the apply protocol and whatever executes commands on
//! the target host. Production code goes through a live SSH session; tests
//! use the generated mock.

use async_trait::async_trait;
use carve_ssh::{CommandOutput, SshError, SshSession};
#[cfg(test)]
use mockall::automock;

/// Everything the apply protocol needs from a remote host: run a command
/// to completion, and place a file.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteShell: Send + Sync {
    async fn execute(&self, command: &str) -> Result<CommandOutput, SshError>;
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), SshError>;
}

#[async_trait]
impl RemoteShell for SshSession {
    async fn execute(&self, command: &str) -> Result<CommandOutput, SshError> {
        SshSession::execute(self, command).await
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), SshError> {
        SshSession::write_file(self, path, content).await
    }
}
