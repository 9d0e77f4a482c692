//! Cluster placement groups.

use crate::client::{empty_on_not_found, Ec2Client, FormRequest};
use crate::domain::PlacementGroup;
use crate::errors::Ec2Error;
use crate::handlers::network::PlacementGroupHandler;
use crate::handlers::ReturnHandler;

/// The only strategy EC2 offers.
pub const CLUSTER_STRATEGY: &str = "cluster";

pub struct PlacementGroupApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> PlacementGroupApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    pub async fn create_placement_group_in_region(
        &self,
        region: Option<&str>,
        group_name: &str,
        strategy: &str,
    ) -> Result<(), Ec2Error> {
        let request = create_placement_group_request(group_name, strategy);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn delete_placement_group_in_region(
        &self,
        region: Option<&str>,
        group_name: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("DeletePlacementGroup").param("GroupName", group_name);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn describe_placement_groups_in_region(
        &self,
        region: Option<&str>,
        group_names: &[&str],
    ) -> Result<Vec<PlacementGroup>, Ec2Error> {
        let request = FormRequest::new("DescribePlacementGroups").indexed("GroupName", group_names);
        let handler = PlacementGroupHandler::new(self.client.region_or_default(region));
        empty_on_not_found(self.client.execute(region, request, handler).await)
    }
}

fn create_placement_group_request(group_name: &str, strategy: &str) -> FormRequest {
    FormRequest::new("CreatePlacementGroup")
        .param("GroupName", group_name)
        .param("Strategy", strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_placement_group_strategy() {
        let request = create_placement_group_request("group", CLUSTER_STRATEGY);
        assert_eq!(
            request.params(),
            [
                ("Action".to_string(), "CreatePlacementGroup".to_string()),
                ("GroupName".to_string(), "group".to_string()),
                ("Strategy".to_string(), "cluster".to_string()),
            ]
        );
    }
}
