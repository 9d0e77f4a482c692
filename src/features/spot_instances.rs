//! Spot instance requests.

use std::collections::BTreeMap;

use tracing::info;

use crate::client::{empty_on_not_found, Ec2Client, FormRequest};
use crate::domain::{LaunchSpecification, SpotInstanceRequest, SpotInstanceState};
use crate::errors::Ec2Error;
use crate::handlers::spot::{CancelSpotInstanceRequestsHandler, SpotInstanceRequestHandler};
use crate::options::{RequestSpotInstancesOptions, MAX_USER_DATA_BYTES};

pub struct SpotInstanceApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> SpotInstanceApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    pub async fn describe_spot_instance_requests_in_region(
        &self,
        region: Option<&str>,
        request_ids: &[&str],
    ) -> Result<Vec<SpotInstanceRequest>, Ec2Error> {
        let request = FormRequest::new("DescribeSpotInstanceRequests")
            .indexed("SpotInstanceRequestId", request_ids);
        let handler = SpotInstanceRequestHandler::new(self.client.region_or_default(region));
        empty_on_not_found(self.client.execute(region, request, handler).await)
    }

    /// Bid `spot_price` USD per hour for one instance of `image_id`. The
    /// count is left to its server-side default of one.
    pub async fn request_spot_instance_in_region(
        &self,
        region: Option<&str>,
        spot_price: f32,
        image_id: &str,
        instance_type: &str,
    ) -> Result<Vec<SpotInstanceRequest>, Ec2Error> {
        let spec = LaunchSpecification {
            image_id: image_id.to_string(),
            instance_type: Some(instance_type.to_string()),
            ..Default::default()
        };
        let request =
            spot_request(spot_price, None, &spec, &RequestSpotInstancesOptions::new())?;
        self.send_spot_request(region, request, &spec).await
    }

    pub async fn request_spot_instances_in_region(
        &self,
        region: Option<&str>,
        spot_price: f32,
        instance_count: u32,
        spec: &LaunchSpecification,
        options: &RequestSpotInstancesOptions,
    ) -> Result<Vec<SpotInstanceRequest>, Ec2Error> {
        let request = spot_request(spot_price, Some(instance_count), spec, options)?;
        self.send_spot_request(region, request, spec).await
    }

    async fn send_spot_request(
        &self,
        region: Option<&str>,
        request: FormRequest,
        spec: &LaunchSpecification,
    ) -> Result<Vec<SpotInstanceRequest>, Ec2Error> {
        let handler = SpotInstanceRequestHandler::new(self.client.region_or_default(region));
        let requests = self.client.execute(region, request, handler).await?;
        info!(count = requests.len(), image_id = %spec.image_id, "requested spot instances");
        Ok(requests)
    }

    /// Cancel open requests; instances they already launched keep running.
    pub async fn cancel_spot_instance_requests_in_region(
        &self,
        region: Option<&str>,
        request_ids: &[&str],
    ) -> Result<BTreeMap<String, SpotInstanceState>, Ec2Error> {
        let request = FormRequest::new("CancelSpotInstanceRequests")
            .indexed("SpotInstanceRequestId", request_ids);
        self.client
            .execute(region, request, CancelSpotInstanceRequestsHandler::default())
            .await
    }
}

/// `RequestSpotInstances`; `InstanceCount` is sent only when given.
fn spot_request(
    spot_price: f32,
    instance_count: Option<u32>,
    spec: &LaunchSpecification,
    options: &RequestSpotInstancesOptions,
) -> Result<FormRequest, Ec2Error> {
    if instance_count == Some(0) {
        return Err(Ec2Error::InvalidArgument(
            "instance count must be positive".to_string(),
        ));
    }
    if spec.user_data.as_ref().is_some_and(|d| d.len() > MAX_USER_DATA_BYTES) {
        return Err(Ec2Error::InvalidArgument(format!(
            "user data exceeds {MAX_USER_DATA_BYTES} bytes"
        )));
    }
    let mut request =
        FormRequest::new("RequestSpotInstances").param("SpotPrice", spot_price.to_string());
    if let Some(count) = instance_count {
        request = request.param("InstanceCount", count.to_string());
    }
    Ok(request.with_options(spec).with_options(options))
}
