//! AWS SDK implementations of the sweeper and notifier contracts.

pub mod ec2;
pub mod ecs;
pub mod eks;
pub mod lambda_fn;
pub mod rds;
pub mod s3;
pub mod sns;

use std::collections::HashMap;
use std::future::Future;

use cleanup_sweep_core::tags::Tag;

/// Bridges async SDK calls into the synchronous sweeper contract. Requires
/// the multi-thread Tokio runtime started by the Lambda binary.
pub(crate) fn block_on<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Converts the list-of-pairs tag shape most EC2-style APIs return.
pub(crate) fn tag_from_pair(key: Option<&str>, value: Option<&str>) -> Tag {
    Tag::new(key.unwrap_or_default(), value.unwrap_or_default())
}

/// Converts the map tag shape EKS and Lambda return.
pub(crate) fn tags_from_map(map: &HashMap<String, String>) -> Vec<Tag> {
    map.iter()
        .map(|(key, value)| Tag::new(key.clone(), value.clone()))
        .collect()
}
