//! Spot instance request handlers.

use std::collections::BTreeMap;

use super::TagSetCollector;
use crate::domain::{
    BlockDeviceMapping, LaunchSpecification, SpotInstanceRequest, SpotInstanceState,
    SpotInstanceType,
};
use crate::xml::{non_empty, parse_bool, parse_date, parse_number, ElementPath, SaxHandler, XmlError};

/// RequestSpotInstances and DescribeSpotInstanceRequests.
#[derive(Debug)]
pub struct SpotInstanceRequestHandler {
    region: String,
    requests: Vec<SpotInstanceRequest>,
    current: SpotInstanceRequest,
    spec: Option<LaunchSpecification>,
    mapping: BlockDeviceMapping,
    group_id: Option<String>,
    group_name: Option<String>,
    tags: TagSetCollector,
}

impl SpotInstanceRequestHandler {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            current: SpotInstanceRequest {
                region: region.clone(),
                ..Default::default()
            },
            region,
            requests: Vec::new(),
            spec: None,
            mapping: BlockDeviceMapping::default(),
            group_id: None,
            group_name: None,
            tags: TagSetCollector::default(),
        }
    }

    fn spec_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        let spec = self.spec.get_or_insert_with(LaunchSpecification::default);
        if path.contains("blockDeviceMapping") {
            let mapping = &mut self.mapping;
            match path.current() {
                "deviceName" => mapping.device_name = text.to_string(),
                "virtualName" => mapping.virtual_name = non_empty(text),
                "snapshotId" => mapping.snapshot_id = non_empty(text),
                "volumeSize" if !text.is_empty() => {
                    mapping.size_in_gib = Some(parse_number("volumeSize", text)?)
                }
                "deleteOnTermination" if !text.is_empty() => {
                    mapping.delete_on_termination = Some(parse_bool("deleteOnTermination", text)?)
                }
                "noDevice" => mapping.no_device = true,
                "item" if path.parent() == "blockDeviceMapping" => {
                    spec.block_device_mappings.push(std::mem::take(mapping));
                }
                _ => {}
            }
            return Ok(());
        }
        if path.contains("groupSet") {
            match path.current() {
                "groupId" => self.group_id = non_empty(text),
                "groupName" => self.group_name = non_empty(text),
                "item" if path.parent() == "groupSet" => {
                    match (self.group_id.take(), self.group_name.take()) {
                        (Some(id), Some(name)) => {
                            spec.security_group_id_to_names.insert(id, name);
                        }
                        (Some(id), None) => spec.security_group_ids.push(id),
                        (None, Some(name)) => spec.security_group_names.push(name),
                        (None, None) => {}
                    }
                }
                _ => {}
            }
            return Ok(());
        }
        match (path.parent(), path.current()) {
            ("placement", "availabilityZone") => spec.availability_zone = non_empty(text),
            ("monitoring", "enabled") if !text.is_empty() => {
                spec.monitoring_enabled = Some(parse_bool("enabled", text)?)
            }
            ("iamInstanceProfile", "arn") => spec.iam_instance_profile_arn = non_empty(text),
            ("iamInstanceProfile", "name") => spec.iam_instance_profile_name = non_empty(text),
            ("launchSpecification", "imageId") => spec.image_id = text.to_string(),
            ("launchSpecification", "instanceType") => spec.instance_type = non_empty(text),
            ("launchSpecification", "kernelId") => spec.kernel_id = non_empty(text),
            ("launchSpecification", "ramdiskId") => spec.ramdisk_id = non_empty(text),
            ("launchSpecification", "subnetId") => spec.subnet_id = non_empty(text),
            ("launchSpecification", "keyName") => spec.key_name = non_empty(text),
            _ => {}
        }
        Ok(())
    }

    fn request_element(&mut self, name: &str, text: &str) -> Result<(), XmlError> {
        let request = &mut self.current;
        match name {
            "spotInstanceRequestId" => request.id = text.to_string(),
            "spotPrice" if !text.is_empty() => {
                request.spot_price = parse_number("spotPrice", text)?
            }
            "type" => request.request_type = SpotInstanceType::from_wire(text),
            "state" => request.state = SpotInstanceState::from_wire(text),
            "instanceId" => request.instance_id = non_empty(text),
            "launchGroup" => request.launch_group = non_empty(text),
            "availabilityZoneGroup" => request.availability_zone_group = non_empty(text),
            "launchedAvailabilityZone" => request.launched_availability_zone = non_empty(text),
            "productDescription" => request.product_description = non_empty(text),
            "createTime" if !text.is_empty() => {
                request.create_time = Some(parse_date("createTime", text)?)
            }
            "validFrom" if !text.is_empty() => {
                request.valid_from = Some(parse_date("validFrom", text)?)
            }
            "validUntil" if !text.is_empty() => {
                request.valid_until = Some(parse_date("validUntil", text)?)
            }
            _ => {}
        }
        Ok(())
    }
}

impl SaxHandler for SpotInstanceRequestHandler {
    type Output = Vec<SpotInstanceRequest>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if self.tags.end_element(path, text) {
            return Ok(());
        }
        if path.contains("launchSpecification") {
            if path.current() == "launchSpecification" {
                self.current.launch_specification = self.spec.take();
                return Ok(());
            }
            return self.spec_element(path, text);
        }
        if path.ends_with(&["spotInstanceRequestSet", "item"]) {
            let mut request = std::mem::replace(
                &mut self.current,
                SpotInstanceRequest {
                    region: self.region.clone(),
                    ..Default::default()
                },
            );
            request.tags = self.tags.take();
            if request.id.is_empty() {
                return Err(XmlError::MissingElement("spotInstanceRequestId".to_string()));
            }
            self.requests.push(request);
            return Ok(());
        }
        match (path.parent(), path.current()) {
            ("fault", "code") => self.current.fault_code = non_empty(text),
            ("fault", "message") => self.current.fault_message = non_empty(text),
            ("item", name) if path.ancestor(2) == "spotInstanceRequestSet" => {
                self.request_element(name, text)?
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<SpotInstanceRequest>, XmlError> {
        Ok(self.requests)
    }
}

/// CancelSpotInstanceRequests: request id to its new state.
#[derive(Debug, Default)]
pub struct CancelSpotInstanceRequestsHandler {
    states: BTreeMap<String, SpotInstanceState>,
    id: Option<String>,
    state: Option<SpotInstanceState>,
}

impl SaxHandler for CancelSpotInstanceRequestsHandler {
    type Output = BTreeMap<String, SpotInstanceState>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match path.current() {
            "spotInstanceRequestId" => self.id = Some(text.to_string()),
            "state" => self.state = Some(SpotInstanceState::from_wire(text)),
            "item" if path.parent() == "spotInstanceRequestSet" => {
                if let (Some(id), Some(state)) = (self.id.take(), self.state.take()) {
                    self.states.insert(id, state);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, XmlError> {
        Ok(self.states)
    }
}
