//! Options for the Elastic Block Store calls.

use super::{indexed_params, FormParams};

/// Pin DetachVolume to a specific attachment.
#[derive(Debug, Clone, Default)]
pub struct DetachVolumeOptions {
    instance_id: Option<String>,
    device: Option<String>,
}

impl DetachVolumeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_instance(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    pub fn from_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

impl FormParams for DetachVolumeOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(instance_id) = &self.instance_id {
            params.push(("InstanceId".to_string(), instance_id.clone()));
        }
        if let Some(device) = &self.device {
            params.push(("Device".to_string(), device.clone()));
        }
        params
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateSnapshotOptions {
    description: Option<String>,
}

impl CreateSnapshotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl FormParams for CreateSnapshotOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        self.description
            .iter()
            .map(|d| ("Description".to_string(), d.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DescribeSnapshotsOptions {
    owners: Vec<String>,
    restorable_by: Vec<String>,
    snapshot_ids: Vec<String>,
}

impl DescribeSnapshotsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owned_by<I: IntoIterator<Item = S>, S: Into<String>>(mut self, owners: I) -> Self {
        self.owners.extend(owners.into_iter().map(Into::into));
        self
    }

    pub fn restorable_by<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.restorable_by.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn snapshot_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.snapshot_ids.extend(ids.into_iter().map(Into::into));
        self
    }
}

impl FormParams for DescribeSnapshotsOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = indexed_params("Owner", &self.owners);
        params.extend(indexed_params("RestorableBy", &self.restorable_by));
        params.extend(indexed_params("SnapshotId", &self.snapshot_ids));
        params
    }
}
