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

//! DHCP server provisioning: rendering subnet plans into `dhcpd.conf`
//! text, and pushing that text onto a remote host through a staged
//! swap-validate-restart protocol with automatic rollback.

pub mod apply;
pub mod errors;
pub mod render;
pub mod shell;

pub use apply::{ApplyPaths, ApplyReport, apply};
pub use errors::{ApplyError, ApplyStep};
pub use render::{GlobalOptions, RenderSubnet, render};
pub use shell::RemoteShell;
