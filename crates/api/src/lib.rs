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

//! HTTP service for subnet planning and remote DHCP provisioning: thin
//! JSON glue over the planners, the renderer, and the apply protocol.

use std::sync::Arc;

use carve_ssh::SessionRegistry;
use dashmap::DashMap;
use eyre::WrapErr;
use tokio::sync::Mutex;

use crate::config::Config;

pub mod config;
pub mod routes;

/// Shared service state. The session registry is the only holder of live
/// SSH sessions; `apply_locks` serializes applies per target host so two
/// backup/swap sequences can never interleave on one machine.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub apply_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            apply_locks: Arc::new(DashMap::new()),
            config: Arc::new(config),
        }
    }
}

pub async fn start(config: Config) -> eyre::Result<()> {
    let bind_address = config.bind_address;
    let app = routes::router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .wrap_err_with(|| format!("Could not bind to {bind_address}"))?;
    tracing::info!(%bind_address, "carve API listening");
    axum::serve(listener, app)
        .await
        .wrap_err("HTTP server terminated")
}
