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
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubnetError {
    #[error("Invalid IPv4 address: {0}")]
    InvalidAddress(String),

    #[error("Invalid subnet mask: {0}")]
    InvalidMask(String),

    #[error("Cannot split /{base_prefix} into {count} subnets")]
    PrefixOverflow { base_prefix: u8, count: u32 },

    #[error("Base prefix /{0} is too small to subdivide")]
    PrefixTooSmall(u8),

    #[error("Requirement {name:?} ({hosts} hosts) does not fit within a /{base_prefix} network")]
    SubnetTooLarge {
        name: String,
        hosts: u32,
        base_prefix: u8,
    },

    #[error("Not enough address space for all requested subnets")]
    AddressSpaceExhausted,
}
