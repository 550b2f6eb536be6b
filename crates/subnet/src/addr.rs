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

//! Address-level primitives: parsing, mask/prefix conversion, and the
//! network/broadcast/usable-range math everything else builds on.

use std::net::Ipv4Addr;

use crate::errors::SubnetError;

/// Parses strict dotted-quad text into an address. Exactly four decimal
/// octets in 0..=255; anything else (including surrounding whitespace) is
/// `InvalidAddress`.
pub fn parse_address(text: &str) -> Result<Ipv4Addr, SubnetError> {
    text.parse::<Ipv4Addr>()
        .map_err(|_| SubnetError::InvalidAddress(text.to_string()))
}

/// Parses mask text into a prefix length. Accepts `/N`, a bare decimal `N`
/// (both with N in 0..=32), or a dotted-quad mask whose bit pattern is a
/// contiguous run of ones followed by zeros.
pub fn parse_mask(text: &str) -> Result<u8, SubnetError> {
    let invalid = || SubnetError::InvalidMask(text.to_string());

    let digits = text.strip_prefix('/').unwrap_or(text);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        let prefix: u8 = digits.parse().map_err(|_| invalid())?;
        if prefix > 32 {
            return Err(invalid());
        }
        return Ok(prefix);
    }

    let mask: Ipv4Addr = text.parse().map_err(|_| invalid())?;
    mask_prefix(mask).ok_or_else(invalid)
}

/// Prefix length of a dotted mask, or `None` when the bit pattern is not
/// contiguous ones (e.g. 255.0.255.0).
pub fn mask_prefix(mask: Ipv4Addr) -> Option<u8> {
    ipnet::ipv4_mask_to_prefix(mask).ok()
}

/// Mask bits for a prefix length. Prefixes above 32 saturate to all-ones.
pub fn mask_bits(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p if p >= 32 => u32::MAX,
        p => u32::MAX << (32 - p),
    }
}

/// The dotted-quad mask for a prefix length.
pub fn mask_address(prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from_bits(mask_bits(prefix))
}

/// Network address: the given address with all host bits cleared.
pub fn network_address(addr: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from_bits(addr.to_bits() & mask_bits(prefix))
}

/// Broadcast address: the given address with all host bits set.
pub fn broadcast_address(addr: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from_bits(addr.to_bits() | !mask_bits(prefix))
}

/// First assignable address, one past the network address. Callers must
/// ensure the prefix leaves usable hosts (prefix <= 30).
pub fn first_usable(network: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from_bits(network.to_bits() + 1)
}

/// Last assignable address, one before the broadcast address. Same caller
/// contract as [`first_usable`].
pub fn last_usable(broadcast: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from_bits(broadcast.to_bits() - 1)
}

/// Usable host count for a prefix: 2^(32-prefix) - 2. /31 and /32 have no
/// room for hosts once network and broadcast are reserved.
pub fn host_capacity(prefix: u8) -> u32 {
    if prefix >= 31 {
        return 0;
    }
    ((1u64 << (32 - prefix)) - 2) as u32
}
