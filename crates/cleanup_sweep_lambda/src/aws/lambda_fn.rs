use aws_sdk_lambda::Client;

use cleanup_sweep_core::report::ResourceRecord;
use serde_json::json;

use crate::adapters::resource::ResourceSweeper;
use crate::aws::{block_on, tags_from_map};
use crate::handlers::sweep::log_sweep_error;

pub struct LambdaFunctionSweeper {
    client: Client,
}

impl LambdaFunctionSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for LambdaFunctionSweeper {
    fn kind(&self) -> &'static str {
        "lambda_functions"
    }

    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let mut records = Vec::new();
            let mut pages = client.list_functions().into_paginator().send();
            while let Some(page) = pages.next().await {
                let page =
                    page.map_err(|error| format!("failed to list functions: {error}"))?;
                for function in page.functions() {
                    let (Some(name), Some(arn)) =
                        (function.function_name(), function.function_arn())
                    else {
                        continue;
                    };
                    match client.list_tags().resource(arn).send().await {
                        Ok(tagging) => {
                            let tags = tagging.tags().map(tags_from_map).unwrap_or_default();
                            records.push(ResourceRecord::new(name, tags));
                        }
                        Err(error) => {
                            log_sweep_error(
                                "function_tagging_failed",
                                json!({ "function": name, "error": error.to_string() }),
                            );
                        }
                    }
                }
            }
            Ok(records)
        })
    }

    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let name = record.id.clone();
        block_on(async move {
            client
                .delete_function()
                .function_name(&name)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete function {name}: {error}"))
        })
    }
}
