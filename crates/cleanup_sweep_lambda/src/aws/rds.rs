use aws_sdk_rds::Client;

use cleanup_sweep_core::report::ResourceRecord;
use serde_json::json;

use crate::adapters::resource::ResourceSweeper;
use crate::aws::{block_on, tag_from_pair};
use crate::handlers::sweep::log_sweep_error;

pub struct RdsInstanceSweeper {
    client: Client,
}

impl RdsInstanceSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for RdsInstanceSweeper {
    fn kind(&self) -> &'static str {
        "rds_instances"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let mut records = Vec::new();
            let mut pages = client.describe_db_instances().into_paginator().send();
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|error| format!("failed to describe DB instances: {error}"))?;
                for instance in page.db_instances() {
                    let (Some(db_id), Some(db_arn)) =
                        (instance.db_instance_identifier(), instance.db_instance_arn())
                    else {
                        continue;
                    };
                    match client.list_tags_for_resource().resource_name(db_arn).send().await {
                        Ok(tagging) => {
                            let tags = tagging
                                .tag_list()
                                .iter()
                                .map(|tag| tag_from_pair(tag.key(), tag.value()))
                                .collect();
                            records.push(ResourceRecord::new(db_id, tags));
                        }
                        Err(error) => {
                            log_sweep_error(
                                "db_tagging_failed",
                                json!({ "db_instance": db_id, "error": error.to_string() }),
                            );
                        }
                    }
                }
            }
            Ok(records)
        })
    }

    /// RDS deletion is asynchronous; an accepted request counts as cleaned.
    /// Final snapshots and automated backups are skipped, these are test
    /// databases with nothing worth keeping.
    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let db_id = record.id.clone();
        block_on(async move {
            client
                .delete_db_instance()
                .db_instance_identifier(&db_id)
                .skip_final_snapshot(true)
                .delete_automated_backups(true)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete DB instance {db_id}: {error}"))
        })
    }
}
