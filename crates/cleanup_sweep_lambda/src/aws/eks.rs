use aws_sdk_eks::Client;

use cleanup_sweep_core::report::ResourceRecord;
use serde_json::json;

use crate::adapters::resource::ResourceSweeper;
use crate::aws::{block_on, tags_from_map};
use crate::handlers::sweep::log_sweep_error;

pub struct EksClusterSweeper {
    client: Client,
}

impl EksClusterSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for EksClusterSweeper {
    fn kind(&self) -> &'static str {
        "eks_clusters"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let mut records = Vec::new();
            let mut pages = client.list_clusters().into_paginator().send();
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|error| format!("failed to list EKS clusters: {error}"))?;
                for name in page.clusters() {
                    match client.describe_cluster().name(name).send().await {
                        Ok(described) => {
                            let tags = described
                                .cluster()
                                .and_then(|cluster| cluster.tags())
                                .map(tags_from_map)
                                .unwrap_or_default();
                            records.push(ResourceRecord::new(name, tags));
                        }
                        Err(error) => {
                            // One undescribable cluster should not hide the rest.
                            log_sweep_error(
                                "cluster_describe_failed",
                                json!({ "cluster": name, "error": error.to_string() }),
                            );
                        }
                    }
                }
            }
            Ok(records)
        })
    }

    /// Nodegroups must go before the cluster. Cluster deletion itself is
    /// asynchronous and is not polled to completion; an accepted request
    /// counts as cleaned.
    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let name = record.id.clone();
        block_on(async move {
            let mut nodegroups = Vec::new();
            let mut pages = client
                .list_nodegroups()
                .cluster_name(&name)
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page = page
                    .map_err(|error| format!("failed to list nodegroups for {name}: {error}"))?;
                nodegroups.extend(page.nodegroups().iter().cloned());
            }

            for nodegroup in nodegroups {
                client
                    .delete_nodegroup()
                    .cluster_name(&name)
                    .nodegroup_name(&nodegroup)
                    .send()
                    .await
                    .map_err(|error| {
                        format!("failed to delete nodegroup {nodegroup} of {name}: {error}")
                    })?;
            }

            client
                .delete_cluster()
                .name(&name)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete EKS cluster {name}: {error}"))
        })
    }
}
