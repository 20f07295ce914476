use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use cleanup_sweep_core::config::CleanupConfig;
use cleanup_sweep_core::report::SweepReport;
use cleanup_sweep_lambda::adapters::notify::Notifier;
use cleanup_sweep_lambda::adapters::resource::ResourceSweeper;
use cleanup_sweep_lambda::aws::ec2::{
    EbsVolumeSweeper, Ec2InstanceSweeper, ElasticIpSweeper, KeyPairSweeper, NatGatewaySweeper,
    SecurityGroupSweeper,
};
use cleanup_sweep_lambda::aws::ecs::EcsClusterSweeper;
use cleanup_sweep_lambda::aws::eks::EksClusterSweeper;
use cleanup_sweep_lambda::aws::lambda_fn::LambdaFunctionSweeper;
use cleanup_sweep_lambda::aws::rds::RdsInstanceSweeper;
use cleanup_sweep_lambda::aws::s3::S3BucketSweeper;
use cleanup_sweep_lambda::aws::sns::SnsNotifier;
use cleanup_sweep_lambda::handlers::sweep::run_sweep;

/// The trigger payload is ignored; scheduling lives in EventBridge. Sweep
/// failures surface inside the returned report, never as a failed
/// invocation.
async fn handle_request(_event: LambdaEvent<Value>) -> Result<SweepReport, Error> {
    let config = CleanupConfig::from_env();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    let ec2 = aws_sdk_ec2::Client::new(&aws_config);

    // Dependency tiers: orchestration and databases first (slow teardowns
    // that tend to block release of lower tiers), then compute, then
    // networking, then storage and key material.
    let sweepers: Vec<Box<dyn ResourceSweeper>> = vec![
        Box::new(EksClusterSweeper::new(aws_sdk_eks::Client::new(&aws_config))),
        Box::new(EcsClusterSweeper::new(aws_sdk_ecs::Client::new(&aws_config))),
        Box::new(RdsInstanceSweeper::new(aws_sdk_rds::Client::new(&aws_config))),
        Box::new(Ec2InstanceSweeper::new(ec2.clone())),
        Box::new(LambdaFunctionSweeper::new(aws_sdk_lambda::Client::new(
            &aws_config,
        ))),
        Box::new(EbsVolumeSweeper::new(ec2.clone())),
        Box::new(NatGatewaySweeper::new(ec2.clone())),
        Box::new(ElasticIpSweeper::new(ec2.clone())),
        Box::new(SecurityGroupSweeper::new(ec2.clone())),
        Box::new(KeyPairSweeper::new(ec2)),
        Box::new(S3BucketSweeper::new(aws_sdk_s3::Client::new(&aws_config))),
    ];
    let sweeper_refs: Vec<&dyn ResourceSweeper> =
        sweepers.iter().map(|sweeper| sweeper.as_ref()).collect();

    let notifier = config
        .notification_target
        .clone()
        .map(|topic_arn| SnsNotifier::new(aws_sdk_sns::Client::new(&aws_config), topic_arn));

    let report = run_sweep(
        &sweeper_refs,
        notifier.as_ref().map(|value| value as &dyn Notifier),
        &config,
        Utc::now(),
    );
    Ok(report)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
