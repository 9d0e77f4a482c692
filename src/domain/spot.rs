//! Spot instance requests.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::BlockDeviceMapping;

wire_enum! {
    pub enum SpotInstanceState {
        #[default]
        Open => "open",
        Active => "active",
        Closed => "closed",
        Cancelled => "cancelled",
        Failed => "failed",
    }
}

wire_enum! {
    pub enum SpotInstanceType {
        #[default]
        OneTime => "one-time",
        Persistent => "persistent",
    }
}

/// Parameters for the instances a spot request launches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaunchSpecification {
    pub image_id: String,
    pub instance_type: Option<String>,
    pub kernel_id: Option<String>,
    pub ramdisk_id: Option<String>,
    pub availability_zone: Option<String>,
    pub subnet_id: Option<String>,
    pub key_name: Option<String>,
    /// Security group id to name, as reported by EC2.
    pub security_group_id_to_names: BTreeMap<String, String>,
    pub security_group_ids: Vec<String>,
    pub security_group_names: Vec<String>,
    pub block_device_mappings: Vec<BlockDeviceMapping>,
    pub monitoring_enabled: Option<bool>,
    pub iam_instance_profile_arn: Option<String>,
    pub iam_instance_profile_name: Option<String>,
    /// Raw user data; sent base64 encoded, never echoed back by EC2.
    #[serde(skip)]
    pub user_data: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpotInstanceRequest {
    pub region: String,
    pub id: String,
    /// Maximum hourly price in USD.
    pub spot_price: f32,
    pub request_type: SpotInstanceType,
    pub state: SpotInstanceState,
    pub instance_id: Option<String>,
    pub launch_specification: Option<LaunchSpecification>,
    pub launch_group: Option<String>,
    pub availability_zone_group: Option<String>,
    pub launched_availability_zone: Option<String>,
    pub fault_code: Option<String>,
    pub fault_message: Option<String>,
    pub product_description: Option<String>,
    pub create_time: Option<DateTime<Utc>>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub tags: BTreeMap<String, String>,
}
