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

//! SSH plumbing for remote provisioning: authenticated sessions with
//! timeout-bounded command execution and SFTP file placement, plus the
//! in-memory registry that hands out opaque session ids.

pub mod errors;
pub mod registry;
pub mod session;

pub use errors::SshError;
pub use registry::{SessionId, SessionRegistry};
pub use session::{CommandOutput, ConnectParams, SshSession};
