//! Handlers for the instance calls.

use std::collections::BTreeMap;

use super::TagSetCollector;
use crate::domain::{
    AttachmentStatus, BlockDevice, InstanceState, InstanceStateChange, MonitoringState,
    Reservation, RootDeviceType, RunningInstance, VirtualizationType,
};
use crate::xml::{non_empty, parse_bool, parse_date, ElementPath, SaxHandler, XmlError};

/// An instance block device being assembled.
#[derive(Debug, Default)]
struct PendingBlockDevice {
    device_name: Option<String>,
    device: BlockDevice,
}

impl PendingBlockDevice {
    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match path.current() {
            "deviceName" => self.device_name = Some(text.to_string()),
            "volumeId" => self.device.volume_id = text.to_string(),
            "status" => self.device.attachment_status = AttachmentStatus::from_wire(text),
            "attachTime" if !text.is_empty() => {
                self.device.attach_time = Some(parse_date("attachTime", text)?)
            }
            "deleteOnTermination" => {
                self.device.delete_on_termination = parse_bool("deleteOnTermination", text)?
            }
            _ => {}
        }
        Ok(())
    }

    /// Yield the finished device when the mapping names one.
    fn take(&mut self) -> Option<(String, BlockDevice)> {
        let pending = std::mem::take(self);
        pending.device_name.map(|name| (name, pending.device))
    }
}

/// A security group reference inside `<groupSet>`.
#[derive(Debug, Default)]
struct PendingGroup {
    id: Option<String>,
    name: Option<String>,
}

impl PendingGroup {
    /// Older API versions put the group name in `groupId`.
    fn take_name(&mut self) -> Option<String> {
        let group = std::mem::take(self);
        group.name.or(group.id)
    }
}

/// DescribeInstances and RunInstances.
///
/// DescribeInstances nests reservations in `<reservationSet>`; RunInstances
/// answers with a single reservation at the document root.
#[derive(Debug)]
pub struct ReservationHandler {
    region: String,
    reservations: Vec<Reservation>,
    reservation: Reservation,
    instance: RunningInstance,
    device: PendingBlockDevice,
    group: PendingGroup,
    tags: TagSetCollector,
}

impl ReservationHandler {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            reservation: Reservation {
                region: region.clone(),
                ..Default::default()
            },
            instance: RunningInstance {
                region: region.clone(),
                ..Default::default()
            },
            region,
            reservations: Vec::new(),
            device: PendingBlockDevice::default(),
            group: PendingGroup::default(),
            tags: TagSetCollector::default(),
        }
    }

    /// Single-reservation variant for RunInstances.
    pub fn run_instances(region: impl Into<String>) -> RunInstancesHandler {
        RunInstancesHandler(Self::new(region))
    }

    fn instance_field(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        let instance = &mut self.instance;
        match (path.parent(), path.current()) {
            ("instanceState", "name") => {
                instance.raw_state = text.to_string();
                instance.instance_state = InstanceState::from_wire(text);
            }
            ("placement", "availabilityZone") => instance.availability_zone = non_empty(text),
            ("placement", "groupName") => instance.placement_group = non_empty(text),
            ("monitoring", "state") => {
                instance.monitoring_state = Some(MonitoringState::from_wire(text))
            }
            ("iamInstanceProfile", "arn") => instance.iam_instance_profile_arn = non_empty(text),
            ("item", name) if path.ancestor(2) == "instancesSet" => match name {
                "instanceId" => instance.instance_id = text.to_string(),
                "imageId" => instance.image_id = non_empty(text),
                "privateDnsName" => instance.private_dns_name = non_empty(text),
                "dnsName" => instance.dns_name = non_empty(text),
                "reason" => instance.reason = non_empty(text),
                "keyName" => instance.key_name = non_empty(text),
                "amiLaunchIndex" => instance.ami_launch_index = non_empty(text),
                "instanceType" => instance.instance_type = non_empty(text),
                "launchTime" if !text.is_empty() => {
                    instance.launch_time = Some(parse_date("launchTime", text)?)
                }
                "kernelId" => instance.kernel_id = non_empty(text),
                "ramdiskId" => instance.ramdisk_id = non_empty(text),
                "platform" => instance.platform = non_empty(text),
                "subnetId" => instance.subnet_id = non_empty(text),
                "vpcId" => instance.vpc_id = non_empty(text),
                "privateIpAddress" => instance.private_ip_address = non_empty(text),
                "ipAddress" => instance.ip_address = non_empty(text),
                "rootDeviceType" => instance.root_device_type = RootDeviceType::from_wire(text),
                "rootDeviceName" => instance.root_device_name = non_empty(text),
                "virtualizationType" => {
                    instance.virtualization_type = VirtualizationType::from_wire(text)
                }
                "spotInstanceRequestId" => instance.spot_instance_request_id = non_empty(text),
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }

    fn finish_instance(&mut self) -> Result<(), XmlError> {
        let mut instance = std::mem::replace(
            &mut self.instance,
            RunningInstance {
                region: self.region.clone(),
                ..Default::default()
            },
        );
        instance.tags = self.tags.take();
        if instance.instance_id.is_empty() {
            return Err(XmlError::MissingElement("instanceId".to_string()));
        }
        self.reservation.instances.push(instance);
        Ok(())
    }

    fn finish_reservation(&mut self) {
        let reservation = std::mem::replace(
            &mut self.reservation,
            Reservation {
                region: self.region.clone(),
                ..Default::default()
            },
        );
        self.reservations.push(reservation);
    }
}

impl SaxHandler for ReservationHandler {
    type Output = Vec<Reservation>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.contains("instancesSet") {
            if self.tags.end_element(path, text) {
                return Ok(());
            }
            if path.contains("blockDeviceMapping") {
                if path.ends_with(&["blockDeviceMapping", "item"]) {
                    if let Some((name, device)) = self.device.take() {
                        self.instance.ebs_block_devices.insert(name, device);
                    }
                } else {
                    self.device.end_element(path, text)?;
                }
                return Ok(());
            }
            if path.contains("groupSet") {
                match path.current() {
                    "groupId" => self.group.id = non_empty(text),
                    "groupName" => self.group.name = non_empty(text),
                    "item" => {
                        if let Some(name) = self.group.take_name() {
                            self.instance.group_names.push(name);
                        }
                    }
                    _ => {}
                }
                return Ok(());
            }
            if path.ends_with(&["instancesSet", "item"]) {
                return self.finish_instance();
            }
            return self.instance_field(path, text);
        }

        if path.contains("groupSet") {
            match path.current() {
                "groupId" => self.group.id = non_empty(text),
                "groupName" => self.group.name = non_empty(text),
                "item" => {
                    if let Some(name) = self.group.take_name() {
                        self.reservation.group_names.push(name);
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        if path.ends_with(&["reservationSet", "item"]) {
            self.finish_reservation();
            return Ok(());
        }

        let reservation_level = path.ends_with(&["reservationSet", "item", path.current()])
            || path.depth() == 2;
        if reservation_level {
            match path.current() {
                "reservationId" => self.reservation.reservation_id = non_empty(text),
                "ownerId" => self.reservation.owner_id = non_empty(text),
                "requesterId" => self.reservation.requester_id = non_empty(text),
                _ => {}
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Reservation>, XmlError> {
        Ok(self.reservations)
    }
}

/// RunInstances: the root element is the reservation.
#[derive(Debug)]
pub struct RunInstancesHandler(ReservationHandler);

impl SaxHandler for RunInstancesHandler {
    type Output = Reservation;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        self.0.end_element(path, text)
    }

    fn finish(self) -> Result<Reservation, XmlError> {
        let inner = self.0;
        if inner.reservation.reservation_id.is_none() && inner.reservation.instances.is_empty() {
            return Err(XmlError::MissingElement("reservationId".to_string()));
        }
        Ok(inner.reservation)
    }
}

/// Start/Stop/TerminateInstances.
#[derive(Debug)]
pub struct InstanceStateChangeHandler {
    region: String,
    changes: Vec<InstanceStateChange>,
    current: InstanceStateChange,
}

impl InstanceStateChangeHandler {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            changes: Vec::new(),
            current: InstanceStateChange::default(),
        }
    }
}

impl SaxHandler for InstanceStateChangeHandler {
    type Output = Vec<InstanceStateChange>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match (path.parent(), path.current()) {
            ("item", "instanceId") => self.current.instance_id = text.to_string(),
            ("currentState", "name") => self.current.current_state = InstanceState::from_wire(text),
            ("previousState", "name") => {
                self.current.previous_state = InstanceState::from_wire(text)
            }
            ("instancesSet", "item") => {
                let mut change = std::mem::take(&mut self.current);
                change.region = self.region.clone();
                self.changes.push(change);
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, XmlError> {
        Ok(self.changes)
    }
}

/// DescribeInstanceAttribute `blockDeviceMapping`.
#[derive(Debug, Default)]
pub struct BlockDeviceMappingHandler {
    devices: BTreeMap<String, BlockDevice>,
    device: PendingBlockDevice,
}

impl SaxHandler for BlockDeviceMappingHandler {
    type Output = BTreeMap<String, BlockDevice>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.ends_with(&["blockDeviceMapping", "item"]) {
            if let Some((name, device)) = self.device.take() {
                self.devices.insert(name, device);
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
