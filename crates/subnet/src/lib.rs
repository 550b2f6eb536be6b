/*
 * SPDX-FileCopyrightText: Copyright (c) 2024-2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

//! IPv4 subnet arithmetic and partitioning.
//!
//! Everything in this crate is pure and synchronous: dotted-quad and mask
//! parsing, network/broadcast/usable-range math on the 32-bit address space,
//! and the two partitioning strategies (equal split and VLSM). Planning is
//! all-or-nothing; no partial results are ever returned.

pub mod addr;
pub mod errors;
pub mod plan;

pub use errors::SubnetError;
pub use plan::{HostRequirement, SubnetRecord, plan_equal, plan_vlsm};
