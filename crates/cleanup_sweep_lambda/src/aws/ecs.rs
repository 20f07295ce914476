use aws_sdk_ecs::Client;

use cleanup_sweep_core::report::ResourceRecord;
use serde_json::json;

use crate::adapters::resource::ResourceSweeper;
use crate::aws::{block_on, tag_from_pair};
use crate::handlers::sweep::log_sweep_error;

pub struct EcsClusterSweeper {
    client: Client,
}

impl EcsClusterSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for EcsClusterSweeper {
    fn kind(&self) -> &'static str {
        "ecs_clusters"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let mut records = Vec::new();
            let mut pages = client.list_clusters().into_paginator().send();
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|error| format!("failed to list ECS clusters: {error}"))?;
                for arn in page.cluster_arns() {
                    // ECS APIs accept the short name; the report uses it too.
                    let name = arn.rsplit('/').next().unwrap_or(arn.as_str());
                    match client.list_tags_for_resource().resource_arn(arn).send().await {
                        Ok(tagging) => {
                            let tags = tagging
                                .tags()
                                .iter()
                                .map(|tag| tag_from_pair(tag.key(), tag.value()))
                                .collect();
                            records.push(ResourceRecord::new(name, tags));
                        }
                        Err(error) => {
                            log_sweep_error(
                                "cluster_tagging_failed",
                                json!({ "cluster": arn, "error": error.to_string() }),
                            );
                        }
                    }
                }
            }
            Ok(records)
        })
    }

    /// Services must be force-deleted before the cluster itself.
    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let name = record.id.clone();
        block_on(async move {
            let mut services = Vec::new();
            let mut pages = client
                .list_services()
                .cluster(&name)
                .into_paginator()
                .send();
            while let Some(page) = pages.next().await {
                let page = page
                    .map_err(|error| format!("failed to list services of {name}: {error}"))?;
                services.extend(page.service_arns().iter().cloned());
            }

            for service in services {
                client
                    .delete_service()
                    .cluster(&name)
                    .service(&service)
                    .force(true)
                    .send()
                    .await
                    .map_err(|error| {
                        format!("failed to delete service {service} of {name}: {error}")
                    })?;
            }

            client
                .delete_cluster()
                .cluster(&name)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete ECS cluster {name}: {error}"))
        })
    }
}
