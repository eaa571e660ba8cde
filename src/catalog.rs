//! Fixed metric lists for each resource category.

use crate::config::RequestEnv;
use crate::models::{Dimension, MetricSpec, ResourceCategory};

const S3_NAMESPACE: &str = "AWS/S3";
const RDS_NAMESPACE: &str = "AWS/RDS";
const EC2_NAMESPACE: &str = "AWS/EC2";
const LINUX_NAMESPACE: &str = "System/Linux";

const S3_METRICS: [&str; 7] = [
    "BucketSizeBytes",
    "NumberOfObjects",
    "BytesUploaded",
    "BytesDownloaded",
    "TotalRequestCount",
    "4xxErrorRate",
    "5xxErrorRate",
];

const RDS_METRICS: [&str; 4] = [
    "CPUUtilization",
    "DatabaseConnections",
    "FreeableMemory",
    "VolumeBytesUsed",
];

/// Metric specs for `category`, with resource ids taken from `env`.
pub fn metric_specs(category: ResourceCategory, env: &RequestEnv) -> Vec<MetricSpec> {
    match category {
        ResourceCategory::Storage => storage_specs(&env.s3_bucket_name),
        ResourceCategory::Database => database_specs(&env.rds_instance_id),
        ResourceCategory::Compute => compute_specs(&env.ec2_instance_id),
    }
}

fn storage_specs(bucket_name: &str) -> Vec<MetricSpec> {
    let dimensions = vec![
        Dimension::new("BucketName", bucket_name),
        Dimension::new("StorageType", "AllStorageTypes"),
    ];

    S3_METRICS
        .iter()
        .map(|name| MetricSpec::new(name, S3_NAMESPACE, dimensions.clone()))
        .collect()
}

fn database_specs(instance_id: &str) -> Vec<MetricSpec> {
    let dimensions = vec![Dimension::new("DBInstanceIdentifier", instance_id)];

    RDS_METRICS
        .iter()
        .map(|name| MetricSpec::new(name, RDS_NAMESPACE, dimensions.clone()))
        .collect()
}

// CPUUtilization is queried without dimensions, i.e. the account-wide series.
fn compute_specs(instance_id: &str) -> Vec<MetricSpec> {
    let instance = || vec![Dimension::new("InstanceId", instance_id)];

    vec![
        MetricSpec::new("CPUUtilization", EC2_NAMESPACE, Vec::new()),
        MetricSpec::new("MemoryUtilization", LINUX_NAMESPACE, instance()),
        MetricSpec::new("NetworkIn", EC2_NAMESPACE, instance()),
        MetricSpec::new("NetworkOut", EC2_NAMESPACE, instance()),
        MetricSpec::new("DiskSpaceUtilization", LINUX_NAMESPACE, instance()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env() -> RequestEnv {
        RequestEnv {
            s3_bucket_name: "assets".into(),
            rds_instance_id: "orders-db".into(),
            ec2_instance_id: "i-0abc".into(),
            ..RequestEnv::default()
        }
    }

    #[test]
    fn storage_metrics_share_bucket_and_storage_type() {
        let specs = metric_specs(ResourceCategory::Storage, &env());

        assert_eq!(specs.len(), 7);
        for spec in &specs {
            assert_eq!(spec.namespace, "AWS/S3");
            assert_eq!(
                spec.dimensions,
                vec![
                    Dimension::new("BucketName", "assets"),
                    Dimension::new("StorageType", "AllStorageTypes"),
                ]
            );
        }
        assert_eq!(specs[5].name, "4xxErrorRate");
    }

    #[test]
    fn database_metrics_use_instance_identifier() {
        let specs = metric_specs(ResourceCategory::Database, &env());

        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["CPUUtilization", "DatabaseConnections", "FreeableMemory", "VolumeBytesUsed"]
        );
        assert!(specs
            .iter()
            .all(|s| s.dimensions == vec![Dimension::new("DBInstanceIdentifier", "orders-db")]));
    }

    #[test]
    fn compute_metrics_vary_namespace_and_dimensions() {
        let specs = metric_specs(ResourceCategory::Compute, &env());

        assert_eq!(specs.len(), 5);
        assert_eq!(specs[0].name, "CPUUtilization");
        assert!(specs[0].dimensions.is_empty());
        assert_eq!(specs[1].namespace, "System/Linux");
        assert_eq!(specs[2].namespace, "AWS/EC2");
        assert_eq!(specs[4].dimensions, vec![Dimension::new("InstanceId", "i-0abc")]);
    }
}
