//! Elastic Block Store volumes and snapshots.

use tracing::info;

use crate::client::{empty_on_not_found, ok_on_volume_available, Ec2Client, FormRequest};
use crate::domain::{Attachment, Permission, Snapshot, Volume};
use crate::errors::Ec2Error;
use crate::handlers::ebs::{AttachmentHandler, SnapshotHandler, VolumeHandler};
use crate::handlers::image::PermissionHandler;
use crate::handlers::ReturnHandler;
use crate::options::{CreateSnapshotOptions, DescribeSnapshotsOptions, DetachVolumeOptions};

pub struct ElasticBlockStoreApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> ElasticBlockStoreApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    /// Create an empty volume of `size` GiB in `zone`.
    pub async fn create_volume_in_availability_zone(
        &self,
        zone: &str,
        size: i32,
    ) -> Result<Volume, Ec2Error> {
        let request = FormRequest::new("CreateVolume")
            .param("AvailabilityZone", zone)
            .param("Size", size.to_string());
        self.create_volume(zone, request).await
    }

    /// Restore `snapshot_id` into `zone`, optionally growing it to `size`
    /// GiB.
    pub async fn create_volume_from_snapshot_in_availability_zone(
        &self,
        zone: &str,
        size: Option<i32>,
        snapshot_id: &str,
    ) -> Result<Volume, Ec2Error> {
        let mut request = FormRequest::new("CreateVolume")
            .param("AvailabilityZone", zone)
            .param("SnapshotId", snapshot_id);
        if let Some(size) = size {
            request = request.param("Size", size.to_string());
        }
        self.create_volume(zone, request).await
    }

    /// Volumes are created in the region that owns the zone.
    async fn create_volume(&self, zone: &str, request: FormRequest) -> Result<Volume, Ec2Error> {
        let region = self.client.region_of_zone(Some(zone));
        let handler = VolumeHandler::create_volume(self.client.region_or_default(region.as_deref()));
        let volume = self
            .client
            .execute(region.as_deref(), request, handler)
            .await?;
        info!(volume_id = %volume.id, zone, "created volume");
        Ok(volume)
    }

    pub async fn describe_volumes_in_region(
        &self,
        region: Option<&str>,
        volume_ids: &[&str],
    ) -> Result<Vec<Volume>, Ec2Error> {
        let request = FormRequest::new("DescribeVolumes").indexed("VolumeId", volume_ids);
        let handler = VolumeHandler::new(self.client.region_or_default(region));
        empty_on_not_found(self.client.execute(region, request, handler).await)
    }

    pub async fn delete_volume_in_region(
        &self,
        region: Option<&str>,
        volume_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("DeleteVolume").param("VolumeId", volume_id);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn attach_volume_in_region(
        &self,
        region: Option<&str>,
        volume_id: &str,
        instance_id: &str,
        device: &str,
    ) -> Result<Attachment, Ec2Error> {
        let request = FormRequest::new("AttachVolume")
            .param("InstanceId", instance_id)
            .param("VolumeId", volume_id)
            .param("Device", device);
        let handler = AttachmentHandler::new(self.client.region_or_default(region));
        self.client.execute(region, request, handler).await
    }

    /// Detach a volume. A volume that is already available counts as
    /// detached.
    pub async fn detach_volume_in_region(
        &self,
        region: Option<&str>,
        volume_id: &str,
        force: bool,
        options: &DetachVolumeOptions,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("DetachVolume")
            .param("VolumeId", volume_id)
            .param("Force", force.to_string())
            .with_options(options);
        ok_on_volume_available(self.client.execute(region, request, ReturnHandler).await)
    }

    pub async fn create_snapshot_in_region(
        &self,
        region: Option<&str>,
        volume_id: &str,
        options: &CreateSnapshotOptions,
    ) -> Result<Snapshot, Ec2Error> {
        let request = FormRequest::new("CreateSnapshot")
            .param("VolumeId", volume_id)
            .with_options(options);
        let handler = SnapshotHandler::single(self.client.region_or_default(region));
        self.client.execute(region, request, handler).await
    }

    pub async fn describe_snapshots_in_region(
        &self,
        region: Option<&str>,
        options: &DescribeSnapshotsOptions,
    ) -> Result<Vec<Snapshot>, Ec2Error> {
        let request = FormRequest::new("DescribeSnapshots").with_options(options);
        let handler = SnapshotHandler::new(self.client.region_or_default(region));
        empty_on_not_found(self.client.execute(region, request, handler).await)
    }

    pub async fn delete_snapshot_in_region(
        &self,
        region: Option<&str>,
        snapshot_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("DeleteSnapshot").param("SnapshotId", snapshot_id);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn add_create_volume_permissions_to_snapshot(
        &self,
        region: Option<&str>,
        user_ids: &[&str],
        user_groups: &[&str],
        snapshot_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = modify_create_volume_permission("add", user_ids, user_groups, snapshot_id);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn remove_create_volume_permissions_from_snapshot(
        &self,
        region: Option<&str>,
        user_ids: &[&str],
        user_groups: &[&str],
        snapshot_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = modify_create_volume_permission("remove", user_ids, user_groups, snapshot_id);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn get_create_volume_permission_for_snapshot(
        &self,
        region: Option<&str>,
        snapshot_id: &str,
    ) -> Result<Permission, Ec2Error> {
        let request = FormRequest::new("DescribeSnapshotAttribute")
            .param("Attribute", "createVolumePermission")
            .param("SnapshotId", snapshot_id);
        let handler = PermissionHandler::new(self.client.region_or_default(region));
        self.client.execute(region, request, handler).await
    }

    pub async fn reset_create_volume_permissions_on_snapshot(
        &self,
        region: Option<&str>,
        snapshot_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("ResetSnapshotAttribute")
            .param("Attribute", "createVolumePermission")
            .param("SnapshotId", snapshot_id);
        self.client.execute(region, request, ReturnHandler).await
    }
}

fn modify_create_volume_permission(
    operation: &str,
    user_ids: &[&str],
    user_groups: &[&str],
    snapshot_id: &str,
) -> FormRequest {
    FormRequest::new("ModifySnapshotAttribute")
        .param("OperationType", operation)
        .param("Attribute", "createVolumePermission")
        .indexed("UserId", user_ids)
        .indexed("UserGroup", user_groups)
        .param("SnapshotId", snapshot_id)
}
