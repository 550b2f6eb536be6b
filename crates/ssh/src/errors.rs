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

use std::time::Duration;

use thiserror::Error;

use crate::registry::SessionId;

#[derive(Error, Debug)]
pub enum SshError {
    #[error("No session with id {0}")]
    SessionNotFound(SessionId),

    #[error("Could not resolve host {host}:{port}")]
    Resolve { host: String, port: u16 },

    #[error("Could not connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: async_ssh2_tokio::Error,
    },

    #[error("Remote command failed: {0}")]
    Exec(#[source] async_ssh2_tokio::Error),

    #[error("Remote operation timed out after {}", humantime::format_duration(*.0))]
    Timeout(Duration),

    #[error("File transfer to {path} failed: {source}")]
    Sftp {
        path: String,
        #[source]
        source: async_ssh2_tokio::Error,
    },

    #[error("Could not spool file content for transfer: {0}")]
    Spool(#[source] std::io::Error),
}
