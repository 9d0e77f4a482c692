//! CloudWatch detailed monitoring.

use std::collections::BTreeMap;

use crate::client::{Ec2Client, FormRequest};
use crate::domain::MonitoringState;
use crate::errors::Ec2Error;
use crate::handlers::monitoring::MonitoringStateHandler;

pub struct MonitoringApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> MonitoringApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    pub async fn monitor_instances_in_region(
        &self,
        region: Option<&str>,
        instance_ids: &[&str],
    ) -> Result<BTreeMap<String, MonitoringState>, Ec2Error> {
        self.call(region, "MonitorInstances", instance_ids).await
    }

    pub async fn unmonitor_instances_in_region(
        &self,
        region: Option<&str>,
        instance_ids: &[&str],
    ) -> Result<BTreeMap<String, MonitoringState>, Ec2Error> {
        self.call(region, "UnmonitorInstances", instance_ids).await
    }

    async fn call(
        &self,
        region: Option<&str>,
        action: &str,
        instance_ids: &[&str],
    ) -> Result<BTreeMap<String, MonitoringState>, Ec2Error> {
        let request = monitoring_request(action, instance_ids)?;
        self.client
            .execute(region, request, MonitoringStateHandler::default())
            .await
    }
}

fn monitoring_request(action: &str, instance_ids: &[&str]) -> Result<FormRequest, Ec2Error> {
    if instance_ids.is_empty() {
        return Err(Ec2Error::InvalidArgument(format!(
            "{action} needs at least one instance id"
        )));
    }
    Ok(FormRequest::new(action).indexed("InstanceId", instance_ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_request_indexes_instances() {
        let request = monitoring_request("MonitorInstances", &["i-43a4412a", "i-23a3397d"]).unwrap();
        assert_eq!(
            request.params(),
            [
                ("Action".to_string(), "MonitorInstances".to_string()),
                ("InstanceId.1".to_string(), "i-43a4412a".to_string()),
                ("InstanceId.2".to_string(), "i-23a3397d".to_string()),
            ]
        );
        let request = monitoring_request("UnmonitorInstances", &["i-43a4412a"]).unwrap();
        assert_eq!(request.action(), "UnmonitorInstances");
        assert_eq!(request.params().len(), 2);
    }

    #[test]
    fn test_monitor_request_needs_an_instance() {
        assert!(matches!(
            monitoring_request("MonitorInstances", &[]),
            Err(Ec2Error::InvalidArgument(_))
        ));
    }
}
