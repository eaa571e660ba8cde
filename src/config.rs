//! Process-level settings and the per-request environment.
//!
//! The historical window, region, period and statistic are fixed constants.
//! `DashboardConfig` exposes builder methods as the only override points;
//! none of them are read from the environment.

use std::env;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::models::TimeRange;

pub const DEFAULT_REGION: &str = "us-west-1";
pub const PERIOD_SECONDS: i32 = 3600;
pub const STATISTIC: &str = "Average";
pub const BATCH_SIZE: usize = 1000;
pub const DEFAULT_PORT: u16 = 8080;

/// 2023-07-01T00:00:00Z .. 2023-07-25T00:00:00Z
pub fn default_time_range() -> TimeRange {
    TimeRange::new(utc(2023, 7, 1), utc(2023, 7, 25))
}

fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub region: String,
    pub time_range: TimeRange,
    pub batch_size: usize,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            time_range: default_time_range(),
            batch_size: BATCH_SIZE,
            port: DEFAULT_PORT,
        }
    }
}

impl DashboardConfig {
    /// Only the listen port comes from the environment.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// Values read from the environment on every page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestEnv {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub s3_bucket_name: String,
    pub rds_instance_id: String,
    pub ec2_instance_id: String,
    pub db_url: Option<String>,
}

impl RequestEnv {
    pub fn from_env() -> Self {
        Self {
            aws_access_key_id: env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            aws_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            s3_bucket_name: env::var("S3_BUCKET_NAME").unwrap_or_default(),
            rds_instance_id: env::var("RDS_INSTANCE_ID").unwrap_or_default(),
            ec2_instance_id: env::var("EC2_INSTANCE_ID").unwrap_or_default(),
            db_url: env::var("DB_URL").ok().filter(|url| !url.is_empty()),
        }
    }
}

/// Where a request gets its `RequestEnv` from.
#[derive(Debug, Clone)]
pub enum EnvSource {
    Process,
    Fixed(Arc<RequestEnv>),
}

impl EnvSource {
    pub fn load(&self) -> RequestEnv {
        match self {
            EnvSource::Process => RequestEnv::from_env(),
            EnvSource::Fixed(env) => env.as_ref().clone(),
        }
    }
}
