//! Machine images (AMIs) and their launch permissions.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

wire_enum! {
    /// CPU architecture of an image or instance.
    pub enum Architecture {
        #[default]
        I386 => "i386",
        X86_64 => "x86_64",
    }
}

wire_enum! {
    /// Registration state of an image.
    pub enum ImageState {
        #[default]
        Available => "available",
        Pending => "pending",
        Failed => "failed",
        Deregistered => "deregistered",
    }
}

wire_enum! {
    pub enum ImageType {
        #[default]
        Machine => "machine",
        Kernel => "kernel",
        Ramdisk => "ramdisk",
    }
}

wire_enum! {
    /// Where the root volume of an image or instance lives.
    pub enum RootDeviceType {
        #[default]
        InstanceStore => "instance-store",
        Ebs => "ebs",
    }
}

wire_enum! {
    pub enum VirtualizationType {
        #[default]
        Paravirtual => "paravirtual",
        Hvm => "hvm",
    }
}

wire_enum! {
    pub enum Hypervisor {
        #[default]
        Xen => "xen",
        Ovm => "ovm",
    }
}

/// An EBS volume mapped into an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EbsBlockDevice {
    pub snapshot_id: Option<String>,
    /// Size in GiB.
    pub volume_size: i64,
    pub delete_on_termination: bool,
}

/// An Amazon Machine Image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Image {
    pub region: String,
    pub image_id: String,
    pub image_location: Option<String>,
    pub image_owner_id: Option<String>,
    pub image_state: ImageState,
    pub image_type: ImageType,
    pub is_public: bool,
    pub architecture: Option<Architecture>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kernel_id: Option<String>,
    pub ramdisk_id: Option<String>,
    pub platform: Option<String>,
    pub product_codes: BTreeSet<String>,
    pub root_device_type: RootDeviceType,
    pub root_device_name: Option<String>,
    /// Device name to EBS volume.
    pub ebs_block_devices: BTreeMap<String, EbsBlockDevice>,
    /// Device name to ephemeral store name (`ephemeral0` ...).
    pub ephemeral_devices: BTreeMap<String, String>,
    pub virtualization_type: VirtualizationType,
    pub hypervisor: Option<Hypervisor>,
    pub tags: BTreeMap<String, String>,
}

impl Image {
    pub fn is_ebs_backed(&self) -> bool {
        self.root_device_type == RootDeviceType::Ebs
    }
}

/// Accounts and groups allowed to launch an image or create volumes from
/// a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub region: String,
    pub user_ids: BTreeSet<String>,
    /// Only `all` is defined by EC2.
    pub groups: BTreeSet<String>,
}

impl Permission {
    pub fn is_public(&self) -> bool {
        self.groups.contains("all")
    }
}
