//! EC2-backed sweepers: instances, EBS volumes, NAT gateways, Elastic IPs,
//! security groups, and key pairs all share one client.

use std::time::Duration;

use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client;

use cleanup_sweep_core::report::ResourceRecord;
use cleanup_sweep_core::tags::{Tag, TAG_PURPOSE_VALUE};

use crate::adapters::resource::ResourceSweeper;
use crate::aws::{block_on, tag_from_pair};

/// Instances already terminating or terminated are excluded provider-side.
const INSTANCE_STATES: [&str; 3] = ["running", "stopped", "pending"];
const NAT_GATEWAY_STATES: [&str; 2] = ["available", "pending"];

/// Instances referencing a security group release it asynchronously after
/// termination; this settle window lets that release register before the
/// group is evaluated. A heuristic wait, not a confirmation.
const SECURITY_GROUP_SETTLE: Duration = Duration::from_secs(10);

fn purpose_filter() -> Filter {
    Filter::builder()
        .name("tag:Purpose")
        .values(TAG_PURPOSE_VALUE)
        .build()
}

fn state_filter(name: &str, states: &[&str]) -> Filter {
    let mut builder = Filter::builder().name(name);
    for state in states {
        builder = builder.values(*state);
    }
    builder.build()
}

fn ec2_tags(tags: &[aws_sdk_ec2::types::Tag]) -> Vec<Tag> {
    tags.iter()
        .map(|tag| tag_from_pair(tag.key(), tag.value()))
        .collect()
}

pub struct Ec2InstanceSweeper {
    client: Client,
}

impl Ec2InstanceSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for Ec2InstanceSweeper {
    fn kind(&self) -> &'static str {
        "ec2_instances"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let mut records = Vec::new();
            let mut pages = client
                .describe_instances()
                .filters(purpose_filter())
                .filters(state_filter("instance-state-name", &INSTANCE_STATES))
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|error| format!("failed to describe instances: {error}"))?;
                for reservation in page.reservations() {
                    for instance in reservation.instances() {
                        let Some(instance_id) = instance.instance_id() else {
                            continue;
                        };
                        records.push(ResourceRecord::new(instance_id, ec2_tags(instance.tags())));
                    }
                }
            }
            Ok(records)
        })
    }

    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let instance_id = record.id.clone();
        block_on(async move {
            client
                .terminate_instances()
                .instance_ids(&instance_id)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to terminate instance {instance_id}: {error}"))
        })
    }
}

pub struct EbsVolumeSweeper {
    client: Client,
}

impl EbsVolumeSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for EbsVolumeSweeper {
    fn kind(&self) -> &'static str {
        "ebs_volumes"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let mut records = Vec::new();
            // Only unattached volumes; attached ones go with their instance.
            let mut pages = client
                .describe_volumes()
                .filters(purpose_filter())
                .filters(state_filter("status", &["available"]))
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|error| format!("failed to describe volumes: {error}"))?;
                for volume in page.volumes() {
                    let Some(volume_id) = volume.volume_id() else {
                        continue;
                    };
                    records.push(ResourceRecord::new(volume_id, ec2_tags(volume.tags())));
                }
            }
            Ok(records)
        })
    }

    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let volume_id = record.id.clone();
        block_on(async move {
            client
                .delete_volume()
                .volume_id(&volume_id)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete volume {volume_id}: {error}"))
        })
    }
}

pub struct NatGatewaySweeper {
    client: Client,
}

impl NatGatewaySweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for NatGatewaySweeper {
    fn kind(&self) -> &'static str {
        "nat_gateways"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let mut records = Vec::new();
            let mut pages = client
                .describe_nat_gateways()
                .filter(purpose_filter())
                .filter(state_filter("state", &NAT_GATEWAY_STATES))
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|error| format!("failed to describe NAT gateways: {error}"))?;
                for nat in page.nat_gateways() {
                    let Some(nat_id) = nat.nat_gateway_id() else {
                        continue;
                    };
                    records.push(ResourceRecord::new(nat_id, ec2_tags(nat.tags())));
                }
            }
            Ok(records)
        })
    }

    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let nat_id = record.id.clone();
        // NAT gateway deletion is asynchronous; accepted means cleaned.
        block_on(async move {
            client
                .delete_nat_gateway()
                .nat_gateway_id(&nat_id)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete NAT gateway {nat_id}: {error}"))
        })
    }
}

pub struct ElasticIpSweeper {
    client: Client,
}

impl ElasticIpSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for ElasticIpSweeper {
    fn kind(&self) -> &'static str {
        "elastic_ips"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let listed = client
                .describe_addresses()
                .filters(purpose_filter())
                .send()
                .await
                .map_err(|error| format!("failed to describe addresses: {error}"))?;
            let mut records = Vec::new();
            for address in listed.addresses() {
                let Some(allocation_id) = address.allocation_id() else {
                    continue;
                };
                records.push(ResourceRecord::new(allocation_id, ec2_tags(address.tags())));
            }
            Ok(records)
        })
    }

    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let allocation_id = record.id.clone();
        block_on(async move {
            client
                .release_address()
                .allocation_id(&allocation_id)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to release address {allocation_id}: {error}"))
        })
    }
}

pub struct SecurityGroupSweeper {
    client: Client,
}

impl SecurityGroupSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for SecurityGroupSweeper {
    fn kind(&self) -> &'static str {
        "security_groups"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let mut records = Vec::new();
            let mut pages = client
                .describe_security_groups()
                .filters(purpose_filter())
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|error| format!("failed to describe security groups: {error}"))?;
                for group in page.security_groups() {
                    let Some(group_id) = group.group_id() else {
                        continue;
                    };
                    records.push(ResourceRecord::new(group_id, ec2_tags(group.tags())));
                }
            }
            Ok(records)
        })
    }

    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let group_id = record.id.clone();
        block_on(async move {
            client
                .delete_security_group()
                .group_id(&group_id)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete security group {group_id}: {error}"))
        })
    }

    fn settle_before_list(&self) -> Option<Duration> {
        Some(SECURITY_GROUP_SETTLE)
    }
}

pub struct KeyPairSweeper {
    client: Client,
}

impl KeyPairSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for KeyPairSweeper {
    fn kind(&self) -> &'static str {
        "key_pairs"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let listed = client
                .describe_key_pairs()
                .filters(purpose_filter())
                .send()
                .await
                .map_err(|error| format!("failed to describe key pairs: {error}"))?;
            let mut records = Vec::new();
            for key_pair in listed.key_pairs() {
                let Some(key_name) = key_pair.key_name() else {
                    continue;
                };
                records.push(ResourceRecord::new(key_name, ec2_tags(key_pair.tags())));
            }
            Ok(records)
        })
    }

    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let key_name = record.id.clone();
        block_on(async move {
            client
                .delete_key_pair()
                .key_name(&key_name)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete key pair {key_name}: {error}"))
        })
    }
}
