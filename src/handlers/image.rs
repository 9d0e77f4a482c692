//! Handlers for the AMI calls.

use std::collections::{BTreeMap, BTreeSet};

use super::TagSetCollector;
use crate::domain::{
    Architecture, EbsBlockDevice, Hypervisor, Image, ImageState, ImageType, Permission,
    RootDeviceType, VirtualizationType,
};
use crate::xml::{non_empty, parse_bool, parse_number, ElementPath, SaxHandler, XmlError};

/// `<imageId>` of CreateImage / RegisterImage.
#[derive(Debug, Default)]
pub struct ImageIdHandler {
    image_id: Option<String>,
}

impl SaxHandler for ImageIdHandler {
    type Output = String;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.current() == "imageId" {
            self.image_id = Some(text.to_string());
        }
        Ok(())
    }

    fn finish(self) -> Result<String, XmlError> {
        crate::xml::required(self.image_id, "imageId")
    }
}

/// Block device being assembled from a `<blockDeviceMapping><item>`.
#[derive(Debug, Default)]
struct PendingDevice {
    device_name: Option<String>,
    virtual_name: Option<String>,
    ebs: EbsBlockDevice,
    has_ebs: bool,
}

impl PendingDevice {
    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match path.current() {
            "deviceName" => self.device_name = Some(text.to_string()),
            "virtualName" => self.virtual_name = non_empty(text),
            "snapshotId" => {
                self.has_ebs = true;
                self.ebs.snapshot_id = non_empty(text);
            }
            "volumeSize" => {
                self.has_ebs = true;
                self.ebs.volume_size = parse_number("volumeSize", text)?;
            }
            "deleteOnTermination" => {
                self.has_ebs = true;
                self.ebs.delete_on_termination = parse_bool("deleteOnTermination", text)?;
            }
            "ebs" => self.has_ebs = true,
            _ => {}
        }
        Ok(())
    }
}

/// DescribeImages.
#[derive(Debug)]
pub struct DescribeImagesHandler {
    region: String,
    images: Vec<Image>,
    current: Image,
    device: PendingDevice,
    tags: TagSetCollector,
}

impl DescribeImagesHandler {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            current: Image {
                region: region.clone(),
                ..Default::default()
            },
            region,
            images: Vec::new(),
            device: PendingDevice::default(),
            tags: TagSetCollector::default(),
        }
    }

    fn image_field(&mut self, name: &str, text: &str) -> Result<(), XmlError> {
        let image = &mut self.current;
        match name {
            "imageId" => image.image_id = text.to_string(),
            "imageLocation" => image.image_location = non_empty(text),
            "imageState" => image.image_state = ImageState::from_wire(text),
            "imageOwnerId" => image.image_owner_id = non_empty(text),
            "isPublic" => image.is_public = parse_bool("isPublic", text)?,
            "architecture" => {
                image.architecture = non_empty(text).map(|a| Architecture::from_wire(&a))
            }
            "imageType" => image.image_type = ImageType::from_wire(text),
            "kernelId" => image.kernel_id = non_empty(text),
            "ramdiskId" => image.ramdisk_id = non_empty(text),
            "platform" => image.platform = non_empty(text),
            "name" => image.name = non_empty(text),
            "description" => image.description = non_empty(text),
            "rootDeviceType" => image.root_device_type = RootDeviceType::from_wire(text),
            "rootDeviceName" => image.root_device_name = non_empty(text),
            "virtualizationType" => {
                image.virtualization_type = VirtualizationType::from_wire(text)
            }
            "hypervisor" => image.hypervisor = non_empty(text).map(|h| Hypervisor::from_wire(&h)),
            _ => {}
        }
        Ok(())
    }
}

impl SaxHandler for DescribeImagesHandler {
    type Output = Vec<Image>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if self.tags.end_element(path, text) {
            return Ok(());
        }
        if path.contains("blockDeviceMapping") {
            if path.ends_with(&["blockDeviceMapping", "item"]) {
                let device = std::mem::take(&mut self.device);
                if let Some(name) = device.device_name {
                    if device.has_ebs {
                        self.current.ebs_block_devices.insert(name, device.ebs);
                    } else if let Some(virtual_name) = device.virtual_name {
                        self.current.ephemeral_devices.insert(name, virtual_name);
                    }
                }
            } else {
                self.device.end_element(path, text)?;
            }
            return Ok(());
        }
        if path.ends_with(&["productCodes", "item", "productCode"]) {
            self.current.product_codes.insert(text.to_string());
            return Ok(());
        }
        if path.ends_with(&["imagesSet", "item"]) {
            let mut image = std::mem::replace(
                &mut self.current,
                Image {
                    region: self.region.clone(),
                    ..Default::default()
                },
            );
            image.tags = self.tags.take();
            if image.image_id.is_empty() {
                return Err(XmlError::MissingElement("imageId".to_string()));
            }
            self.images.push(image);
            return Ok(());
        }
        if path.ancestor(1) == "item" && path.ancestor(2) == "imagesSet" {
            self.image_field(path.current(), text)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Image>, XmlError> {
        Ok(self.images)
    }
}

/// DescribeImageAttribute `blockDeviceMapping`.
#[derive(Debug, Default)]
pub struct EbsBlockDeviceMappingHandler {
    devices: BTreeMap<String, EbsBlockDevice>,
    device: PendingDevice,
}

impl SaxHandler for EbsBlockDeviceMappingHandler {
    type Output = BTreeMap<String, EbsBlockDevice>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.ends_with(&["blockDeviceMapping", "item"]) {
            let device = std::mem::take(&mut self.device);
            if let (Some(name), true) = (device.device_name, device.has_ebs) {
                self.devices.insert(name, device.ebs);
            }
        } else if path.contains("blockDeviceMapping") {
            self.device.end_element(path, text)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, XmlError> {
        Ok(self.devices)
    }
}

/// `launchPermission` / `createVolumePermission` attributes.
#[derive(Debug)]
pub struct PermissionHandler {
    permission: Permission,
}

impl PermissionHandler {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            permission: Permission {
                region: region.into(),
                ..Default::default()
            },
        }
    }
}

impl SaxHandler for PermissionHandler {
    type Output = Permission;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.parent() != "item" || text.is_empty() {
            return Ok(());
        }
        match path.current() {
            "userId" => {
                self.permission.user_ids.insert(text.to_string());
            }
            "group" => {
                self.permission.groups.insert(text.to_string());
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Permission, XmlError> {
        Ok(self.permission)
    }
}

/// `productCodes` attribute of an image.
#[derive(Debug, Default)]
pub struct ProductCodesHandler {
    codes: BTreeSet<String>,
}

impl SaxHandler for ProductCodesHandler {
    type Output = BTreeSet<String>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.ends_with(&["productCodes", "item", "productCode"]) && !text.is_empty() {
            self.codes.insert(text.to_string());
        }
        Ok(())
    }

    fn finish(self) -> Result<BTreeSet<String>, XmlError> {
        Ok(self.codes)
    }
}
