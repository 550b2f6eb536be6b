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

//! Route handlers. Every failure body is `{ "error": <display text> }`
//! with the originating error's message verbatim; nothing rewrites or
//! summarizes a failure on the way out.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use carve_dhcp::{ApplyError, GlobalOptions, RenderSubnet};
use carve_ssh::{ConnectParams, SessionId};
use carve_subnet::{HostRequirement, SubnetRecord, plan_equal, plan_vlsm};
use serde::{Deserialize, Serialize};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v0/subnets/calculate", post(calculate))
        .route("/api/v0/ssh/connect", post(connect))
        .route("/api/v0/ssh/disconnect", post(disconnect))
        .route("/api/v0/dhcp/render", post(render_config))
        .route("/api/v0/dhcp/apply", post(apply_config))
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn error(status: StatusCode, error: impl std::fmt::Display) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateRequest {
    ip: String,
    mask: String,
    #[serde(default)]
    num_subnets: Option<u32>,
    #[serde(default)]
    subnet_requirements: Option<Vec<HostRequirement>>,
}

/// One endpoint covers both planners: requirements present means VLSM,
/// otherwise an equal split (a single subnet when no count is given).
async fn calculate(
    Json(request): Json<CalculateRequest>,
) -> Result<Json<Vec<SubnetRecord>>, ApiError> {
    let plan = match &request.subnet_requirements {
        Some(requirements) if !requirements.is_empty() => {
            plan_vlsm(&request.ip, &request.mask, requirements)
        }
        _ => plan_equal(&request.ip, &request.mask, request.num_subnets.unwrap_or(1)),
    };
    plan.map(Json)
        .map_err(|err| error(StatusCode::BAD_REQUEST, err))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectResponse {
    session_id: SessionId,
}

async fn connect(
    State(state): State<AppState>,
    Json(params): Json<ConnectParams>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let session_id = state
        .registry
        .connect(&params, state.config.command_timeout)
        .await
        .map_err(|err| error(StatusCode::BAD_GATEWAY, err))?;
    Ok(Json(ConnectResponse { session_id }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisconnectRequest {
    session_id: SessionId,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

async fn disconnect(
    State(state): State<AppState>,
    Json(request): Json<DisconnectRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .registry
        .disconnect(request.session_id)
        .await
        .map_err(|err| error(StatusCode::NOT_FOUND, err))?;
    Ok(Json(MessageResponse {
        message: "SSH session closed".to_string(),
    }))
}

#[derive(Deserialize)]
struct RenderRequest {
    subnets: Vec<RenderSubnet>,
    #[serde(default)]
    options: Option<GlobalOptions>,
}

#[derive(Serialize)]
struct RenderResponse {
    config: String,
}

async fn render_config(Json(request): Json<RenderRequest>) -> Json<RenderResponse> {
    let options = request.options.unwrap_or_default();
    Json(RenderResponse {
        config: carve_dhcp::render(&request.subnets, &options),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplyRequest {
    session_id: SessionId,
    config: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplyResponse {
    message: String,
    backup_path: String,
}

async fn apply_config(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, ApiError> {
    let session = state
        .registry
        .get(request.session_id)
        .map_err(|err| error(StatusCode::NOT_FOUND, err))?;

    // At most one in-flight apply per target host.
    let lock = Arc::clone(
        state
            .apply_locks
            .entry(session.target().to_string())
            .or_default()
            .value(),
    );
    let _guard = lock.lock().await;

    let report = carve_dhcp::apply(session.as_ref(), &request.config, &state.config.apply)
        .await
        .map_err(|err| match err {
            ApplyError::EmptyConfig => error(StatusCode::BAD_REQUEST, err),
            err => error(StatusCode::BAD_GATEWAY, err),
        })?;
    Ok(Json(ApplyResponse {
        message: "DHCP configuration applied successfully".to_string(),
        backup_path: report.backup_path,
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;

    fn test_app() -> Router {
        router(AppState::new(Config::default()))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_calculate_equal_split() {
        let (status, body) = post_json(
            test_app(),
            "/api/v0/subnets/calculate",
            json!({"ip": "10.0.0.0", "mask": "/24", "numSubnets": 4}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let subnets = body.as_array().unwrap();
        assert_eq!(subnets.len(), 4);
        assert_eq!(subnets[0]["networkAddress"], "10.0.0.0");
        assert_eq!(subnets[3]["networkAddress"], "10.0.0.192");
        assert_eq!(subnets[0]["numHosts"], 62);
    }

    // No count and no requirements means the base network comes back as is.
    #[tokio::test]
    async fn test_calculate_defaults_to_single_subnet() {
        let (status, body) = post_json(
            test_app(),
            "/api/v0/subnets/calculate",
            json!({"ip": "10.0.0.0", "mask": "255.255.255.0"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let subnets = body.as_array().unwrap();
        assert_eq!(subnets.len(), 1);
        assert_eq!(subnets[0]["prefixLength"], 24);
    }

    // Requirements switch the endpoint to VLSM, allocated largest first.
    #[tokio::test]
    async fn test_calculate_vlsm() {
        let (status, body) = post_json(
            test_app(),
            "/api/v0/subnets/calculate",
            json!({
                "ip": "192.168.1.0",
                "mask": "/24",
                "subnetRequirements": [
                    {"name": "C", "hosts": 10},
                    {"name": "A", "hosts": 100},
                    {"name": "B", "hosts": 50},
                ],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let subnets = body.as_array().unwrap();
        assert_eq!(subnets[0]["name"], "A");
        assert_eq!(subnets[0]["networkAddress"], "192.168.1.0");
        assert_eq!(subnets[0]["prefixLength"], 25);
        assert_eq!(subnets[1]["name"], "B");
        assert_eq!(subnets[2]["name"], "C");
        assert_eq!(subnets[2]["networkAddress"], "192.168.1.192");
    }

    // Planning failures surface verbatim in the error envelope.
    #[tokio::test]
    async fn test_calculate_invalid_address() {
        let (status, body) = post_json(
            test_app(),
            "/api/v0/subnets/calculate",
            json!({"ip": "300.1.1.1", "mask": "/24", "numSubnets": 2}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid IPv4 address: 300.1.1.1");
    }

    #[tokio::test]
    async fn test_calculate_exhausted_space() {
        let (status, body) = post_json(
            test_app(),
            "/api/v0/subnets/calculate",
            json!({
                "ip": "192.168.1.0",
                "mask": "/24",
                "subnetRequirements": [
                    {"name": "A", "hosts": 100},
                    {"name": "B", "hosts": 100},
                    {"name": "C", "hosts": 50},
                ],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Not enough address space for all requested subnets"
        );
    }

    #[tokio::test]
    async fn test_render_round_trip() {
        let (status, body) = post_json(
            test_app(),
            "/api/v0/dhcp/render",
            json!({
                "subnets": [
                    {"name": "Office", "networkAddress": "10.0.0.0", "subnetMask": "255.255.255.192"},
                ],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let config = body["config"].as_str().unwrap();
        assert!(config.contains("subnet 10.0.0.0 netmask 255.255.255.192 {"));
        assert!(config.contains("range 10.0.0.1 10.0.0.62;"));
    }

    #[tokio::test]
    async fn test_disconnect_unknown_session() {
        let (status, body) = post_json(
            test_app(),
            "/api/v0/ssh/disconnect",
            json!({"sessionId": "7f3f0a36-0bd8-4e06-bd2c-f25a81362cde"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "No session with id 7f3f0a36-0bd8-4e06-bd2c-f25a81362cde"
        );
    }

    // A stale session id fails the apply before any remote work starts.
    #[tokio::test]
    async fn test_apply_unknown_session() {
        let (status, body) = post_json(
            test_app(),
            "/api/v0/dhcp/apply",
            json!({
                "sessionId": "7f3f0a36-0bd8-4e06-bd2c-f25a81362cde",
                "config": "subnet 10.0.0.0 netmask 255.255.255.0 {\n}\n",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "No session with id 7f3f0a36-0bd8-4e06-bd2c-f25a81362cde"
        );
    }
}
