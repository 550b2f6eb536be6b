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

//! Deterministic `dhcpd.conf` assembly. The output feeds a human-reviewed
//! preview before it is applied, so rendering is forgiving: a subnet
//! missing its network or mask is skipped with a warning instead of
//! failing the whole document, and the text carries no timestamps so
//! identical input always renders byte-identical output.

use std::net::Ipv4Addr;

use carve_subnet::SubnetRecord;
use carve_subnet::addr;
use serde::{Deserialize, Serialize};

/// Global directives emitted once at the top of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalOptions {
    pub ddns_update_style: String,
    pub default_lease_secs: u32,
    pub max_lease_secs: u32,
    pub authoritative: bool,
    pub domain_name: String,
    pub dns_servers: Vec<Ipv4Addr>,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            ddns_update_style: "none".to_string(),
            default_lease_secs: 600,
            max_lease_secs: 7200,
            authoritative: true,
            domain_name: "example.com".to_string(),
            dns_servers: vec![Ipv4Addr::new(8, 8, 8, 8)],
        }
    }
}

/// One subnet as it arrives from the preview layer. Every field is
/// optional because the preview is hand-editable; whatever can be derived
/// from `network_address` + `subnet_mask` is filled in during rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderSubnet {
    pub name: Option<String>,
    pub network_address: Option<Ipv4Addr>,
    pub subnet_mask: Option<Ipv4Addr>,
    pub first_usable: Option<Ipv4Addr>,
    pub last_usable: Option<Ipv4Addr>,
    pub broadcast_address: Option<Ipv4Addr>,
}

impl From<&SubnetRecord> for RenderSubnet {
    fn from(record: &SubnetRecord) -> Self {
        Self {
            name: Some(record.name.clone()),
            network_address: Some(record.network_address),
            subnet_mask: Some(record.subnet_mask),
            first_usable: Some(record.first_usable),
            last_usable: Some(record.last_usable),
            broadcast_address: Some(record.broadcast_address),
        }
    }
}

fn dns_list(servers: &[Ipv4Addr]) -> String {
    servers
        .iter()
        .map(Ipv4Addr::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders the full configuration document: global preamble first, then
/// one block per subnet in input order.
pub fn render(subnets: &[RenderSubnet], options: &GlobalOptions) -> String {
    let mut config = String::new();
    config.push_str("# DHCP configuration generated automatically\n\n");

    config.push_str("# Global configuration\n");
    config.push_str(&format!("ddns-update-style {};\n", options.ddns_update_style));
    config.push_str(&format!("default-lease-time {};\n", options.default_lease_secs));
    config.push_str(&format!("max-lease-time {};\n", options.max_lease_secs));
    if options.authoritative {
        config.push_str("authoritative;\n");
    }
    config.push('\n');
    config.push_str("# DNS configuration\n");
    config.push_str(&format!("option domain-name \"{}\";\n", options.domain_name));
    config.push_str(&format!(
        "option domain-name-servers {};\n\n",
        dns_list(&options.dns_servers)
    ));

    for (index, subnet) in subnets.iter().enumerate() {
        let name = match &subnet.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Subnet {}", index + 1),
        };
        let (Some(network), Some(mask)) = (subnet.network_address, subnet.subnet_mask) else {
            tracing::warn!(name, "Skipping subnet with no network or mask");
            continue;
        };
        let Some(prefix) = addr::mask_prefix(mask) else {
            tracing::warn!(name, %mask, "Skipping subnet with non-contiguous mask");
            continue;
        };

        let broadcast = subnet
            .broadcast_address
            .unwrap_or_else(|| addr::broadcast_address(network, prefix));
        // No usable range exists past /30, so those blocks carry only the
        // option lines.
        let range = if prefix <= 30 {
            // The preview is hand-editable: a broadcast of 0.0.0.0 or a
            // network of 255.255.255.255 has no neighbor to derive from.
            let first = subnet
                .first_usable
                .or_else(|| network.to_bits().checked_add(1).map(Ipv4Addr::from_bits));
            let last = subnet
                .last_usable
                .or_else(|| broadcast.to_bits().checked_sub(1).map(Ipv4Addr::from_bits));
            match (first, last) {
                (Some(first), Some(last)) => Some((first, last)),
                _ => {
                    tracing::warn!(name, "Skipping subnet with no derivable usable range");
                    continue;
                }
            }
        } else {
            None
        };

        config.push_str(&format!("# {name}\n"));
        config.push_str(&format!("subnet {network} netmask {mask} {{\n"));
        if let Some((first, last)) = range {
            config.push_str(&format!("  range {first} {last};\n"));
        }
        config.push_str(&format!("  option subnet-mask {mask};\n"));
        if let Some((first, _)) = range {
            config.push_str(&format!("  option routers {first};\n"));
        }
        config.push_str(&format!("  option broadcast-address {broadcast};\n"));
        config.push_str(&format!(
            "  option domain-name-servers {};\n",
            dns_list(&options.dns_servers)
        ));
        config.push_str("}\n\n");
    }

    config
}
