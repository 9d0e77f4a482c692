//! Availability zones and regions.

use std::collections::BTreeMap;

use crate::client::{Ec2Client, FormRequest};
use crate::domain::AvailabilityZoneInfo;
use crate::errors::Ec2Error;
use crate::handlers::network::{AvailabilityZoneHandler, DescribeRegionsHandler};
use crate::options::{DescribeAvailabilityZonesOptions, DescribeRegionsOptions};

pub struct AvailabilityZoneApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> AvailabilityZoneApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    pub async fn describe_availability_zones_in_region(
        &self,
        region: Option<&str>,
        options: &DescribeAvailabilityZonesOptions,
    ) -> Result<Vec<AvailabilityZoneInfo>, Ec2Error> {
        let request = describe_availability_zones_request(options);
        self.client
            .execute(region, request, AvailabilityZoneHandler::default())
            .await
    }

    /// Region name to endpoint URL, asked of the default endpoint.
    pub async fn describe_regions(
        &self,
        options: &DescribeRegionsOptions,
    ) -> Result<BTreeMap<String, String>, Ec2Error> {
        let request = describe_regions_request(options);
        self.client
            .execute(None, request, DescribeRegionsHandler::default())
            .await
    }
}

fn describe_availability_zones_request(options: &DescribeAvailabilityZonesOptions) -> FormRequest {
    FormRequest::new("DescribeAvailabilityZones").with_options(options)
}

fn describe_regions_request(options: &DescribeRegionsOptions) -> FormRequest {
    FormRequest::new("DescribeRegions").with_options(options)
}
