//! Instances, reservations and block device mappings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{AttachmentStatus, RootDeviceType, VirtualizationType};

wire_enum! {
    /// Lifecycle state of an instance.
    pub enum InstanceState {
        #[default]
        Pending => "pending",
        Running => "running",
        ShuttingDown => "shutting-down",
        Terminated => "terminated",
        Stopping => "stopping",
        Stopped => "stopped",
    }
}

impl InstanceState {
    /// Map the numeric state code; the high byte is reserved and ignored.
    pub fn from_code(code: u16) -> Self {
        match code & 0xff {
            0 => InstanceState::Pending,
            16 => InstanceState::Running,
            32 => InstanceState::ShuttingDown,
            48 => InstanceState::Terminated,
            64 => InstanceState::Stopping,
            80 => InstanceState::Stopped,
            other => InstanceState::Unrecognized(other.to_string()),
        }
    }
}

wire_enum! {
    /// What happens when the guest shuts itself down.
    pub enum InstanceInitiatedShutdownBehavior {
        #[default]
        Stop => "stop",
        Terminate => "terminate",
    }
}

wire_enum! {
    pub enum MonitoringState {
        #[default]
        Disabled => "disabled",
        Disabling => "disabling",
        Enabled => "enabled",
        Pending => "pending",
    }
}

/// An EBS volume attached to a running instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockDevice {
    pub volume_id: String,
    pub attachment_status: AttachmentStatus,
    pub attach_time: Option<DateTime<Utc>>,
    pub delete_on_termination: bool,
}

/// A device mapping supplied when launching instances or registering
/// images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockDeviceMapping {
    pub device_name: String,
    /// Instance store name, e.g. `ephemeral0`.
    pub virtual_name: Option<String>,
    pub snapshot_id: Option<String>,
    pub size_in_gib: Option<i32>,
    /// Suppress a device the image would otherwise map.
    pub no_device: bool,
    pub delete_on_termination: Option<bool>,
}

impl BlockDeviceMapping {
    /// A volume created from `snapshot_id`.
    pub fn map_ebs_snapshot(
        device_name: impl Into<String>,
        snapshot_id: impl Into<String>,
        size_in_gib: Option<i32>,
        delete_on_termination: bool,
    ) -> Self {
        Self {
            device_name: device_name.into(),
            snapshot_id: Some(snapshot_id.into()),
            size_in_gib,
            delete_on_termination: Some(delete_on_termination),
            ..Default::default()
        }
    }

    /// A fresh, empty volume.
    pub fn map_new_volume(
        device_name: impl Into<String>,
        size_in_gib: i32,
        delete_on_termination: bool,
    ) -> Self {
        Self {
            device_name: device_name.into(),
            size_in_gib: Some(size_in_gib),
            delete_on_termination: Some(delete_on_termination),
            ..Default::default()
        }
    }

    /// An instance store volume.
    pub fn map_ephemeral(device_name: impl Into<String>, virtual_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            virtual_name: Some(virtual_name.into()),
            ..Default::default()
        }
    }

    /// Remove a mapping inherited from the image.
    pub fn unmap(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            no_device: true,
            ..Default::default()
        }
    }
}

/// An instance as reported by DescribeInstances or RunInstances.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunningInstance {
    pub region: String,
    pub instance_id: String,
    pub image_id: Option<String>,
    pub instance_state: InstanceState,
    /// State name as sent, kept for values newer than this crate.
    pub raw_state: String,
    pub instance_type: Option<String>,
    pub group_names: Vec<String>,
    pub ami_launch_index: Option<String>,
    pub dns_name: Option<String>,
    pub private_dns_name: Option<String>,
    pub ip_address: Option<String>,
    pub private_ip_address: Option<String>,
    pub kernel_id: Option<String>,
    pub ramdisk_id: Option<String>,
    pub key_name: Option<String>,
    pub launch_time: Option<DateTime<Utc>>,
    pub availability_zone: Option<String>,
    pub placement_group: Option<String>,
    pub virtualization_type: VirtualizationType,
    pub platform: Option<String>,
    pub reason: Option<String>,
    pub root_device_type: RootDeviceType,
    pub root_device_name: Option<String>,
    /// Device name to attached volume.
    pub ebs_block_devices: BTreeMap<String, BlockDevice>,
    pub monitoring_state: Option<MonitoringState>,
    pub subnet_id: Option<String>,
    pub vpc_id: Option<String>,
    pub spot_instance_request_id: Option<String>,
    pub iam_instance_profile_arn: Option<String>,
    pub tags: BTreeMap<String, String>,
}

/// Instances launched together by one RunInstances call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reservation {
    pub region: String,
    pub reservation_id: Option<String>,
    pub owner_id: Option<String>,
    pub requester_id: Option<String>,
    pub group_names: Vec<String>,
    pub instances: Vec<RunningInstance>,
}

/// Transition reported by Start/Stop/TerminateInstances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstanceStateChange {
    pub region: String,
    pub instance_id: String,
    pub current_state: InstanceState,
    pub previous_state: InstanceState,
}
