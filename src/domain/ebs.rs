//! Elastic Block Store volumes, attachments and snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

wire_enum! {
    pub enum VolumeStatus {
        #[default]
        Creating => "creating",
        Available => "available",
        InUse => "in-use",
        Deleting => "deleting",
        Deleted => "deleted",
        Error => "error",
    }
}

wire_enum! {
    pub enum AttachmentStatus {
        #[default]
        Attaching => "attaching",
        Attached => "attached",
        Detaching => "detaching",
        Detached => "detached",
        Busy => "busy",
    }
}

wire_enum! {
    pub enum SnapshotStatus {
        #[default]
        Pending => "pending",
        Completed => "completed",
        Error => "error",
    }
}

/// A volume's attachment to an instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attachment {
    pub region: String,
    pub volume_id: String,
    pub instance_id: Option<String>,
    pub device: Option<String>,
    pub status: AttachmentStatus,
    pub attach_time: Option<DateTime<Utc>>,
    pub delete_on_termination: Option<bool>,
}

/// An EBS volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Volume {
    pub region: String,
    pub id: String,
    /// Size in GiB.
    pub size: i32,
    pub snapshot_id: Option<String>,
    pub availability_zone: Option<String>,
    pub status: VolumeStatus,
    pub create_time: Option<DateTime<Utc>>,
    pub volume_type: Option<String>,
    pub iops: Option<i32>,
    pub attachments: Vec<Attachment>,
    pub tags: BTreeMap<String, String>,
}

/// A point-in-time copy of a volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub region: String,
    pub id: String,
    pub volume_id: Option<String>,
    /// Size of the source volume in GiB.
    pub volume_size: i32,
    pub status: SnapshotStatus,
    pub start_time: Option<DateTime<Utc>>,
    /// Completion as reported, e.g. `60%`.
    pub progress: Option<String>,
    pub owner_id: Option<String>,
    pub owner_alias: Option<String>,
    pub description: Option<String>,
    pub tags: BTreeMap<String, String>,
}
