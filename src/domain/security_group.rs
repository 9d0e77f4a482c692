//! Security groups and their ingress rules.

use serde::Serialize;
use std::collections::BTreeMap;

wire_enum! {
    pub enum IpProtocol {
        #[default]
        Tcp => "tcp",
        Udp => "udp",
        Icmp => "icmp",
        /// Every protocol; only valid in VPC rules.
        All => "-1",
    }
}

/// Another group granted access by a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserIdGroupPair {
    pub user_id: Option<String>,
    pub group_name: Option<String>,
    pub group_id: Option<String>,
}

/// One ingress or egress rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IpPermission {
    pub ip_protocol: IpProtocol,
    /// For ICMP, the type; -1 for all.
    pub from_port: i32,
    /// For ICMP, the code; -1 for all.
    pub to_port: i32,
    pub groups: Vec<UserIdGroupPair>,
    pub cidr_blocks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecurityGroup {
    pub region: String,
    pub id: Option<String>,
    pub name: String,
    pub owner_id: Option<String>,
    pub description: Option<String>,
    pub vpc_id: Option<String>,
    pub ip_permissions: Vec<IpPermission>,
    pub ip_permissions_egress: Vec<IpPermission>,
    pub tags: BTreeMap<String, String>,
}
