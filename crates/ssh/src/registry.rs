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

//! The in-memory session store. Callers hold a [`SessionId`] and look the
//! session up fresh for every operation; nothing about a session's validity
//! is cached between lookups.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SshError;
use crate::session::{ConnectParams, SshSession};

/// Opaque handle to one registered session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Keyed store of live sessions. Owned by the service layer and passed by
/// handle into anything that needs remote access; there is no ambient
/// global map.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<SshSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new session and registers it, returning the id callers use
    /// for every subsequent operation.
    pub async fn connect(
        &self,
        params: &ConnectParams,
        timeout: Duration,
    ) -> Result<SessionId, SshError> {
        let session = SshSession::connect(params, timeout).await?;
        let id = SessionId::new();
        tracing::info!(session_id = %id, target = session.target(), "SSH session established");
        self.sessions.insert(id, Arc::new(session));
        Ok(id)
    }

    /// Looks up a session by id. Errors rather than returning a stale
    /// handle when the id is unknown.
    pub fn get(&self, id: SessionId) -> Result<Arc<SshSession>, SshError> {
        self.sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(SshError::SessionNotFound(id))
    }

    /// Removes a session and tears down its transport. Close failures are
    /// logged; the session is gone from the registry either way.
    pub async fn disconnect(&self, id: SessionId) -> Result<(), SshError> {
        let (_, session) = self
            .sessions
            .remove(&id)
            .ok_or(SshError::SessionNotFound(id))?;
        if let Err(error) = session.close().await {
            tracing::warn!(session_id = %id, %error, "Error closing SSH session");
        }
        tracing::info!(session_id = %id, "SSH session closed");
        Ok(())
    }
}
