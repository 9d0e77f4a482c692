//! VPC subnets.

use crate::client::{empty_on_not_found, Ec2Client, FormRequest};
use crate::domain::Subnet;
use crate::errors::Ec2Error;
use crate::handlers::network::SubnetHandler;
use crate::handlers::ReturnHandler;
use crate::options::FilterOptions;
use crate::xml::XmlError;

pub struct SubnetApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> SubnetApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    pub async fn describe_subnets_in_region(
        &self,
        region: Option<&str>,
        filter: &FilterOptions,
    ) -> Result<Vec<Subnet>, Ec2Error> {
        let request = FormRequest::new("DescribeSubnets").with_options(filter);
        let handler = SubnetHandler::new(self.client.region_or_default(region));
        empty_on_not_found(self.client.execute(region, request, handler).await)
    }

    /// Carve `cidr_block` out of `vpc_id`, optionally pinned to `zone`.
    pub async fn create_subnet_in_region(
        &self,
        region: Option<&str>,
        vpc_id: &str,
        cidr_block: &str,
        zone: Option<&str>,
    ) -> Result<Subnet, Ec2Error> {
        let request = create_subnet_request(vpc_id, cidr_block, zone);
        let handler = SubnetHandler::new(self.client.region_or_default(region));
        let mut subnets = self.client.execute(region, request, handler).await?;
        subnets
            .pop()
            .ok_or_else(|| Ec2Error::Xml(XmlError::MissingElement("subnet".to_string())))
    }

    pub async fn delete_subnet_in_region(
        &self,
        region: Option<&str>,
        subnet_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("DeleteSubnet").param("SubnetId", subnet_id);
        self.client.execute(region, request, ReturnHandler).await
    }
}

fn create_subnet_request(vpc_id: &str, cidr_block: &str, zone: Option<&str>) -> FormRequest {
    let request = FormRequest::new("CreateSubnet")
        .param("VpcId", vpc_id)
        .param("CidrBlock", cidr_block);
    match zone {
        Some(zone) => request.param("AvailabilityZone", zone),
        None => request,
    }
}
