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

//! Subnet partitioning plans: equal splits and variable-length (VLSM)
//! allocation. Both planners are all-or-nothing; an error means no subnets
//! were produced.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::addr;
use crate::errors::SubnetError;

/// One named host-count requirement for a VLSM plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRequirement {
    #[serde(default)]
    pub name: Option<String>,
    pub hosts: u32,
}

/// A fully resolved subnet allocation. `sequence_id` is the 1-based
/// position in allocation order; for VLSM plans that is descending host
/// count, not the order requirements were submitted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetRecord {
    pub sequence_id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts_required: Option<u32>,
    pub network_address: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
    pub prefix_length: u8,
    pub broadcast_address: Ipv4Addr,
    pub first_usable: Ipv4Addr,
    pub last_usable: Ipv4Addr,
    pub num_hosts: u32,
}

fn record(
    sequence_id: u32,
    name: String,
    hosts_required: Option<u32>,
    network: u32,
    prefix: u8,
) -> SubnetRecord {
    let network = Ipv4Addr::from_bits(network);
    let broadcast = addr::broadcast_address(network, prefix);
    SubnetRecord {
        sequence_id,
        name,
        hosts_required,
        network_address: network,
        subnet_mask: addr::mask_address(prefix),
        prefix_length: prefix,
        broadcast_address: broadcast,
        first_usable: addr::first_usable(network),
        last_usable: addr::last_usable(broadcast),
        num_hosts: addr::host_capacity(prefix),
    }
}

/// ceil(log2(n)) for n >= 1.
fn bits_for(n: u64) -> u32 {
    n.next_power_of_two().trailing_zeros()
}

/// Splits the network containing `address` into `count` equally sized
/// subnets. The base network is derived by masking `address`, so any host
/// address inside the network names it.
pub fn plan_equal(address: &str, mask: &str, count: u32) -> Result<Vec<SubnetRecord>, SubnetError> {
    let address = addr::parse_address(address)?;
    let base_prefix = addr::parse_mask(mask)?;

    if count < 1 {
        return Err(SubnetError::PrefixOverflow { base_prefix, count });
    }
    let new_prefix = base_prefix as u32 + bits_for(count as u64);
    if new_prefix > 30 {
        return Err(SubnetError::PrefixOverflow { base_prefix, count });
    }
    let new_prefix = new_prefix as u8;

    let base = addr::network_address(address, base_prefix).to_bits() as u64;
    let upper = addr::broadcast_address(address, base_prefix).to_bits() as u64;
    let size = 1u64 << (32 - new_prefix);

    let mut subnets = Vec::with_capacity(count as usize);
    for i in 0..count as u64 {
        let network = base + i * size;
        if network + size - 1 > upper {
            return Err(SubnetError::AddressSpaceExhausted);
        }
        let sequence_id = (i + 1) as u32;
        subnets.push(record(
            sequence_id,
            format!("Subnet {sequence_id}"),
            None,
            network as u32,
            new_prefix,
        ));
    }
    Ok(subnets)
}

/// Allocates one subnet per requirement inside the network containing
/// `address`, each sized to the smallest prefix whose usable-host capacity
/// covers the requirement. Requirements are placed largest first so every
/// block lands on its natural alignment boundary.
pub fn plan_vlsm(
    address: &str,
    mask: &str,
    requirements: &[HostRequirement],
) -> Result<Vec<SubnetRecord>, SubnetError> {
    let address = addr::parse_address(address)?;
    let base_prefix = addr::parse_mask(mask)?;

    if base_prefix >= 30 {
        return Err(SubnetError::PrefixTooSmall(base_prefix));
    }

    // Stable sort keeps equal-sized requirements in submission order.
    let mut sorted: Vec<&HostRequirement> = requirements.iter().collect();
    sorted.sort_by(|a, b| b.hosts.cmp(&a.hosts));

    let mut cursor = addr::network_address(address, base_prefix).to_bits() as u64;
    let upper = addr::broadcast_address(address, base_prefix).to_bits() as u64;

    let mut subnets = Vec::with_capacity(sorted.len());
    for (position, req) in sorted.iter().enumerate() {
        let sequence_id = (position + 1) as u32;
        let name = match &req.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Subnet {sequence_id}"),
        };

        // Network and broadcast addresses sit on top of the host count.
        let hosts_needed = req.hosts as u64 + 2;
        let prefix = 32i64 - bits_for(hosts_needed) as i64;
        if prefix <= base_prefix as i64 {
            return Err(SubnetError::SubnetTooLarge {
                name,
                hosts: req.hosts,
                base_prefix,
            });
        }
        let prefix = prefix as u8;

        let size = 1u64 << (32 - prefix);
        if cursor + size - 1 > upper {
            return Err(SubnetError::AddressSpaceExhausted);
        }
        subnets.push(record(
            sequence_id,
            name,
            Some(req.hosts),
            cursor as u32,
            prefix,
        ));
        cursor += size;
    }
    Ok(subnets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(name: &str, hosts: u32) -> HostRequirement {
        HostRequirement {
            name: Some(name.to_string()),
            hosts,
        }
    }

    // Splitting a /24 four ways yields four /26 blocks on 64-address
    // boundaries, each with 62 usable hosts.
    #[test]
    fn test_plan_equal_quarters() {
        let subnets = plan_equal("10.0.0.0", "/24", 4).unwrap();
        assert_eq!(subnets.len(), 4);
        for (i, subnet) in subnets.iter().enumerate() {
            assert_eq!(subnet.sequence_id, i as u32 + 1);
            assert_eq!(subnet.name, format!("Subnet {}", i + 1));
            assert_eq!(subnet.hosts_required, None);
            assert_eq!(subnet.prefix_length, 26);
            assert_eq!(subnet.subnet_mask.to_string(), "255.255.255.192");
            assert_eq!(subnet.num_hosts, 62);
        }
        assert_eq!(subnets[0].network_address.to_string(), "10.0.0.0");
        assert_eq!(subnets[0].first_usable.to_string(), "10.0.0.1");
        assert_eq!(subnets[0].last_usable.to_string(), "10.0.0.62");
        assert_eq!(subnets[0].broadcast_address.to_string(), "10.0.0.63");
        assert_eq!(subnets[1].network_address.to_string(), "10.0.0.64");
        assert_eq!(subnets[2].network_address.to_string(), "10.0.0.128");
        assert_eq!(subnets[3].network_address.to_string(), "10.0.0.192");
    }

    // A count of one returns the base network unchanged.
    #[test]
    fn test_plan_equal_single() {
        let subnets = plan_equal("172.16.4.0", "255.255.252.0", 1).unwrap();
        assert_eq!(subnets.len(), 1);
        assert_eq!(subnets[0].network_address.to_string(), "172.16.4.0");
        assert_eq!(subnets[0].prefix_length, 22);
        assert_eq!(subnets[0].num_hosts, 1022);
    }

    // A host address anywhere inside the network names the same split.
    #[test]
    fn test_plan_equal_normalizes_host_address() {
        let from_network = plan_equal("10.0.0.0", "/24", 4).unwrap();
        let from_host = plan_equal("10.0.0.77", "/24", 4).unwrap();
        assert_eq!(from_network, from_host);
    }

    // Non-power-of-two counts round up to the next power of two.
    #[test]
    fn test_plan_equal_rounds_count_up() {
        let subnets = plan_equal("10.0.0.0", "/24", 3).unwrap();
        assert_eq!(subnets.len(), 3);
        assert_eq!(subnets[0].prefix_length, 26);
        assert_eq!(subnets[2].network_address.to_string(), "10.0.0.128");
    }

    #[test]
    fn test_plan_equal_rejects_zero_count() {
        assert_eq!(
            plan_equal("10.0.0.0", "/24", 0),
            Err(SubnetError::PrefixOverflow {
                base_prefix: 24,
                count: 0
            })
        );
    }

    // 128 subnets of a /24 would need /31 blocks, past the /30 floor.
    #[test]
    fn test_plan_equal_rejects_prefix_overflow() {
        assert_eq!(
            plan_equal("10.0.0.0", "/24", 128),
            Err(SubnetError::PrefixOverflow {
                base_prefix: 24,
                count: 128
            })
        );
        assert!(plan_equal("10.0.0.0", "/24", 64).is_ok());
    }

    #[test]
    fn test_plan_equal_propagates_parse_errors() {
        assert_eq!(
            plan_equal("10.0.0", "/24", 4),
            Err(SubnetError::InvalidAddress("10.0.0".to_string()))
        );
        assert_eq!(
            plan_equal("10.0.0.0", "255.0.255.0", 4),
            Err(SubnetError::InvalidMask("255.0.255.0".to_string()))
        );
    }

    // The three requirement sizes land on /25, /26, and /28 in descending
    // order regardless of how the input was arranged.
    #[test]
    fn test_plan_vlsm_allocates_largest_first() {
        let requirements = vec![
            requirement("C", 10),
            requirement("A", 100),
            requirement("B", 50),
        ];
        let subnets = plan_vlsm("192.168.1.0", "/24", &requirements).unwrap();
        assert_eq!(subnets.len(), 3);

        assert_eq!(subnets[0].sequence_id, 1);
        assert_eq!(subnets[0].name, "A");
        assert_eq!(subnets[0].hosts_required, Some(100));
        assert_eq!(subnets[0].network_address.to_string(), "192.168.1.0");
        assert_eq!(subnets[0].prefix_length, 25);
        assert_eq!(subnets[0].first_usable.to_string(), "192.168.1.1");
        assert_eq!(subnets[0].last_usable.to_string(), "192.168.1.126");
        assert_eq!(subnets[0].broadcast_address.to_string(), "192.168.1.127");
        assert_eq!(subnets[0].num_hosts, 126);

        assert_eq!(subnets[1].sequence_id, 2);
        assert_eq!(subnets[1].name, "B");
        assert_eq!(subnets[1].network_address.to_string(), "192.168.1.128");
        assert_eq!(subnets[1].prefix_length, 26);
        assert_eq!(subnets[1].num_hosts, 62);

        assert_eq!(subnets[2].sequence_id, 3);
        assert_eq!(subnets[2].name, "C");
        assert_eq!(subnets[2].network_address.to_string(), "192.168.1.192");
        assert_eq!(subnets[2].prefix_length, 28);
        assert_eq!(subnets[2].num_hosts, 14);
    }

    // Equal host counts keep their submission order.
    #[test]
    fn test_plan_vlsm_ties_are_stable() {
        let requirements = vec![requirement("X", 10), requirement("Y", 10)];
        let subnets = plan_vlsm("10.1.0.0", "/24", &requirements).unwrap();
        assert_eq!(subnets[0].name, "X");
        assert_eq!(subnets[1].name, "Y");
    }

    // Missing and blank names fall back to the allocation position.
    #[test]
    fn test_plan_vlsm_names_unnamed_requirements() {
        let requirements = vec![
            HostRequirement {
                name: None,
                hosts: 100,
            },
            requirement("   ", 50),
        ];
        let subnets = plan_vlsm("10.1.0.0", "/24", &requirements).unwrap();
        assert_eq!(subnets[0].name, "Subnet 1");
        assert_eq!(subnets[1].name, "Subnet 2");
    }

    #[test]
    fn test_plan_vlsm_rejects_small_base() {
        assert_eq!(
            plan_vlsm("10.1.0.0", "/30", &[requirement("A", 2)]),
            Err(SubnetError::PrefixTooSmall(30))
        );
    }

    // 300 hosts cannot fit inside a /24 at all.
    #[test]
    fn test_plan_vlsm_rejects_oversized_requirement() {
        assert_eq!(
            plan_vlsm("192.168.1.0", "/24", &[requirement("big", 300)]),
            Err(SubnetError::SubnetTooLarge {
                name: "big".to_string(),
                hosts: 300,
                base_prefix: 24,
            })
        );
    }

    // 127 hosts need 129 addresses, so the block would be the whole /24.
    // A requirement must fit in a strictly longer prefix than the base.
    #[test]
    fn test_plan_vlsm_rejects_requirement_filling_base() {
        assert_eq!(
            plan_vlsm("192.168.1.0", "/24", &[requirement("edge", 127)]),
            Err(SubnetError::SubnetTooLarge {
                name: "edge".to_string(),
                hosts: 127,
                base_prefix: 24,
            })
        );
        let subnets = plan_vlsm("192.168.1.0", "/24", &[requirement("edge", 126)]).unwrap();
        assert_eq!(subnets[0].prefix_length, 25);
    }

    // Two /25-sized blocks fill the /24; the third request has nowhere
    // to go even though its prefix is valid.
    #[test]
    fn test_plan_vlsm_exhausts_address_space() {
        let requirements = vec![
            requirement("A", 100),
            requirement("B", 100),
            requirement("C", 50),
        ];
        assert_eq!(
            plan_vlsm("192.168.1.0", "/24", &requirements),
            Err(SubnetError::AddressSpaceExhausted)
        );
    }

    #[test]
    fn test_plan_vlsm_empty_requirements() {
        assert_eq!(plan_vlsm("10.0.0.0", "/24", &[]), Ok(vec![]));
    }

    // Wire format uses camelCase keys and omits hosts_required when absent.
    #[test]
    fn test_subnet_record_serialization() {
        let subnets = plan_equal("10.0.0.0", "/24", 2).unwrap();
        let json = serde_json::to_value(&subnets[0]).unwrap();
        assert_eq!(json["sequenceId"], 1);
        assert_eq!(json["networkAddress"], "10.0.0.0");
        assert_eq!(json["subnetMask"], "255.255.255.128");
        assert_eq!(json["prefixLength"], 25);
        assert_eq!(json["numHosts"], 126);
        assert!(json.get("hostsRequired").is_none());

        let subnets = plan_vlsm("10.0.0.0", "/24", &[requirement("A", 20)]).unwrap();
        let json = serde_json::to_value(&subnets[0]).unwrap();
        assert_eq!(json["hostsRequired"], 20);
    }
}
