//! Options for the AMI calls.

use super::{block_device_mapping_params, indexed_params, FormParams};
use crate::domain::{Architecture, BlockDeviceMapping};

/// Narrow DescribeImages by id, owner or launch permission.
#[derive(Debug, Clone, Default)]
pub struct DescribeImagesOptions {
    executable_by: Option<String>,
    image_ids: Vec<String>,
    owners: Vec<String>,
}

impl DescribeImagesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Images the given account (or `self`, `all`) may launch.
    pub fn executable_by(mut self, identity: impl Into<String>) -> Self {
        self.executable_by = Some(identity.into());
        self
    }

    pub fn image_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.image_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Owner account ids, or `amazon` / `self`.
    pub fn owners<I: IntoIterator<Item = S>, S: Into<String>>(mut self, owners: I) -> Self {
        self.owners.extend(owners.into_iter().map(Into::into));
        self
    }
}

impl FormParams for DescribeImagesOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(identity) = &self.executable_by {
            params.push(("ExecutableBy".to_string(), identity.clone()));
        }
        params.extend(indexed_params("ImageId", &self.image_ids));
        params.extend(indexed_params("Owner", &self.owners));
        params
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateImageOptions {
    description: Option<String>,
    no_reboot: bool,
}

impl CreateImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Snapshot without shutting the instance down first.
    pub fn no_reboot(mut self) -> Self {
        self.no_reboot = true;
        self
    }
}

impl FormParams for CreateImageOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(description) = &self.description {
            params.push(("Description".to_string(), description.clone()));
        }
        if self.no_reboot {
            params.push(("NoReboot".to_string(), "true".to_string()));
        }
        params
    }
}

/// Options shared by both RegisterImage flavours.
#[derive(Debug, Clone, Default)]
pub struct RegisterImageOptions {
    description: Option<String>,
    architecture: Option<Architecture>,
    kernel_id: Option<String>,
    ramdisk_id: Option<String>,
}

impl RegisterImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn as_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = Some(architecture);
        self
    }

    pub fn with_kernel_id(mut self, kernel_id: impl Into<String>) -> Self {
        self.kernel_id = Some(kernel_id.into());
        self
    }

    pub fn with_ramdisk(mut self, ramdisk_id: impl Into<String>) -> Self {
        self.ramdisk_id = Some(ramdisk_id.into());
        self
    }
}

impl FormParams for RegisterImageOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(description) = &self.description {
            params.push(("Description".to_string(), description.clone()));
        }
        if let Some(architecture) = &self.architecture {
            params.push(("Architecture".to_string(), architecture.as_wire().to_string()));
        }
        if let Some(kernel_id) = &self.kernel_id {
            params.push(("KernelId".to_string(), kernel_id.clone()));
        }
        if let Some(ramdisk_id) = &self.ramdisk_id {
            params.push(("RamdiskId".to_string(), ramdisk_id.clone()));
        }
        params
    }
}

/// Extra devices for an EBS-backed image.
///
/// `BlockDeviceMapping.0` always describes the root device, so additional
/// devices are numbered from 1.
#[derive(Debug, Clone, Default)]
pub struct RegisterImageBackedByEbsOptions {
    base: RegisterImageOptions,
    devices: Vec<BlockDeviceMapping>,
}

impl RegisterImageBackedByEbsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: RegisterImageOptions) -> Self {
        self.base = base;
        self
    }

    /// A device restored from `snapshot_id`.
    pub fn add_block_device_from_snapshot(
        mut self,
        device_name: impl Into<String>,
        virtual_name: Option<String>,
        snapshot_id: impl Into<String>,
    ) -> Self {
        self.devices.push(BlockDeviceMapping {
            device_name: device_name.into(),
            virtual_name,
            snapshot_id: Some(snapshot_id.into()),
            delete_on_termination: Some(false),
            ..Default::default()
        });
        self
    }

    /// A new empty volume of `volume_size` GiB.
    pub fn add_new_block_device(
        mut self,
        device_name: impl Into<String>,
        virtual_name: Option<String>,
        volume_size: i32,
    ) -> Self {
        self.devices.push(BlockDeviceMapping {
            device_name: device_name.into(),
            virtual_name,
            size_in_gib: Some(volume_size),
            delete_on_termination: Some(false),
            ..Default::default()
        });
        self
    }

    /// An instance store device.
    pub fn add_ephemeral_block_device(
        mut self,
        device_name: impl Into<String>,
        virtual_name: impl Into<String>,
    ) -> Self {
        self.devices
            .push(BlockDeviceMapping::map_ephemeral(device_name, virtual_name));
        self
    }
}

impl FormParams for RegisterImageBackedByEbsOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = self.base.form_params();
        for (i, device) in self.devices.iter().enumerate() {
            params.extend(block_device_mapping_params("BlockDeviceMapping", i + 1, device));
        }
        params
    }
}
