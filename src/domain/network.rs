//! Regions, availability zones, subnets and placement groups.

use serde::Serialize;
use std::collections::BTreeMap;

wire_enum! {
    pub enum AvailabilityZoneState {
        #[default]
        Available => "available",
        Impaired => "impaired",
        Unavailable => "unavailable",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityZoneInfo {
    pub zone: String,
    pub state: AvailabilityZoneState,
    pub region: String,
    pub messages: Vec<String>,
}

wire_enum! {
    pub enum SubnetState {
        #[default]
        Pending => "pending",
        Available => "available",
    }
}

/// A VPC subnet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Subnet {
    pub region: String,
    pub subnet_id: String,
    pub state: SubnetState,
    pub vpc_id: Option<String>,
    pub cidr_block: Option<String>,
    pub available_ip_address_count: i32,
    pub availability_zone: Option<String>,
    pub tags: BTreeMap<String, String>,
}

wire_enum! {
    pub enum PlacementGroupState {
        #[default]
        Pending => "pending",
        Available => "available",
        Deleting => "deleting",
        Deleted => "deleted",
    }
}

/// A cluster placement group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlacementGroup {
    pub region: String,
    pub name: String,
    /// Only `cluster` is defined by EC2.
    pub strategy: String,
    pub state: PlacementGroupState,
}

/// Resolve the region an availability zone belongs to.
///
/// Zone names are the region name followed by one letter.
pub fn zone_to_region(zone: &str) -> &str {
    match zone.char_indices().last() {
        Some((i, c)) if c.is_ascii_lowercase() && i > 0 => {
            let region = &zone[..i];
            if region.ends_with(|c: char| c.is_ascii_digit()) {
                region
            } else {
                zone
            }
        }
        _ => zone,
    }
}
