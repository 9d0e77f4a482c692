//! EC2 operations grouped by API area.
//!
//! Every API borrows the [`Ec2Client`] it came from. Calls take the region
//! to run in; `None` means the configured default endpoint.

pub mod ami;
pub mod availability_zones;
pub mod ebs;
pub mod instances;
pub mod key_pairs;
pub mod monitoring;
pub mod placement_groups;
pub mod security_groups;
pub mod spot_instances;
pub mod subnets;
pub mod tags;

pub use ami::AmiApi;
pub use availability_zones::AvailabilityZoneApi;
pub use ebs::ElasticBlockStoreApi;
pub use instances::InstanceApi;
pub use key_pairs::KeyPairApi;
pub use monitoring::MonitoringApi;
pub use placement_groups::PlacementGroupApi;
pub use security_groups::SecurityGroupApi;
pub use spot_instances::SpotInstanceApi;
pub use subnets::SubnetApi;
pub use tags::TagApi;

use crate::client::Ec2Client;

impl Ec2Client {
    pub fn ami(&self) -> AmiApi<'_> {
        AmiApi::new(self)
    }

    pub fn ebs(&self) -> ElasticBlockStoreApi<'_> {
        ElasticBlockStoreApi::new(self)
    }

    pub fn instances(&self) -> InstanceApi<'_> {
        InstanceApi::new(self)
    }

    pub fn security_groups(&self) -> SecurityGroupApi<'_> {
        SecurityGroupApi::new(self)
    }

    pub fn key_pairs(&self) -> KeyPairApi<'_> {
        KeyPairApi::new(self)
    }

    pub fn availability_zones(&self) -> AvailabilityZoneApi<'_> {
        AvailabilityZoneApi::new(self)
    }

    pub fn tags(&self) -> TagApi<'_> {
        TagApi::new(self)
    }

    pub fn subnets(&self) -> SubnetApi<'_> {
        SubnetApi::new(self)
    }

    pub fn placement_groups(&self) -> PlacementGroupApi<'_> {
        PlacementGroupApi::new(self)
    }

    pub fn monitoring(&self) -> MonitoringApi<'_> {
        MonitoringApi::new(self)
    }

    pub fn spot_instances(&self) -> SpotInstanceApi<'_> {
        SpotInstanceApi::new(self)
    }
}
