//! Availability zones, regions, subnets and placement groups.

use std::collections::BTreeMap;

use super::TagSetCollector;
use crate::domain::{
    AvailabilityZoneInfo, AvailabilityZoneState, PlacementGroup, PlacementGroupState, Subnet,
    SubnetState,
};
use crate::xml::{non_empty, parse_number, ElementPath, SaxHandler, XmlError};

/// DescribeAvailabilityZones.
#[derive(Debug, Default)]
pub struct AvailabilityZoneHandler {
    zones: Vec<AvailabilityZoneInfo>,
    current: AvailabilityZoneInfo,
}

impl SaxHandler for AvailabilityZoneHandler {
    type Output = Vec<AvailabilityZoneInfo>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match path.current() {
            "zoneName" => self.current.zone = text.to_string(),
            "zoneState" => self.current.state = AvailabilityZoneState::from_wire(text),
            "regionName" => self.current.region = text.to_string(),
            "message" => self.current.messages.push(text.to_string()),
            "item" if path.parent() == "availabilityZoneInfo" => {
                self.zones.push(std::mem::take(&mut self.current));
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, XmlError> {
        Ok(self.zones)
    }
}

/// DescribeRegions: region name to endpoint URL.
#[derive(Debug, Default)]
pub struct DescribeRegionsHandler {
    regions: BTreeMap<String, String>,
    name: Option<String>,
    endpoint: Option<String>,
}

impl SaxHandler for DescribeRegionsHandler {
    type Output = BTreeMap<String, String>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match path.current() {
            "regionName" => self.name = Some(text.to_string()),
            "regionEndpoint" => self.endpoint = Some(text.to_string()),
            "item" if path.parent() == "regionInfo" => {
                if let (Some(name), Some(endpoint)) = (self.name.take(), self.endpoint.take()) {
                    let url = if endpoint.contains("://") {
                        endpoint
                    } else {
                        format!("https://{endpoint}")
                    };
                    self.regions.insert(name, url);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, XmlError> {
        Ok(self.regions)
    }
}

/// DescribeSubnets (`<subnetSet>`) and CreateSubnet (`<subnet>`).
#[derive(Debug)]
pub struct SubnetHandler {
    region: String,
    subnets: Vec<Subnet>,
    current: Subnet,
    tags: TagSetCollector,
}

impl SubnetHandler {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            current: Subnet {
                region: region.clone(),
                ..Default::default()
            },
            region,
            subnets: Vec::new(),
            tags: TagSetCollector::default(),
        }
    }

    fn push_current(&mut self) {
        let mut subnet = std::mem::replace(
            &mut self.current,
            Subnet {
                region: self.region.clone(),
                ..Default::default()
            },
        );
        subnet.tags = self.tags.take();
        self.subnets.push(subnet);
    }
}

impl SaxHandler for SubnetHandler {
    type Output = Vec<Subnet>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if self.tags.end_element(path, text) {
            return Ok(());
        }
        if path.ends_with(&["subnetSet", "item"]) || path.current() == "subnet" {
            self.push_current();
            return Ok(());
        }
        let subnet = &mut self.current;
        match path.current() {
            "subnetId" => subnet.subnet_id = text.to_string(),
            "state" => subnet.state = SubnetState::from_wire(text),
            "vpcId" => subnet.vpc_id = non_empty(text),
            "cidrBlock" => subnet.cidr_block = non_empty(text),
            "availableIpAddressCount" if !text.is_empty() => {
                subnet.available_ip_address_count = parse_number("availableIpAddressCount", text)?
            }
            "availabilityZone" => subnet.availability_zone = non_empty(text),
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Subnet>, XmlError> {
        Ok(self.subnets)
    }
}

/// DescribePlacementGroups.
#[derive(Debug)]
pub struct PlacementGroupHandler {
    region: String,
    groups: Vec<PlacementGroup>,
    current: PlacementGroup,
}

impl PlacementGroupHandler {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            groups: Vec::new(),
            current: PlacementGroup::default(),
        }
    }
}

impl SaxHandler for PlacementGroupHandler {
    type Output = Vec<PlacementGroup>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match path.current() {
            "groupName" => self.current.name = text.to_string(),
            "strategy" => self.current.strategy = text.to_string(),
            "state" => self.current.state = PlacementGroupState::from_wire(text),
            "item" if path.parent() == "placementGroupSet" => {
                let mut group = std::mem::take(&mut self.current);
                group.region = self.region.clone();
                self.groups.push(group);
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, XmlError> {
        Ok(self.groups)
    }
}
