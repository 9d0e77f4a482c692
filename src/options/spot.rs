//! Options for spot instance requests.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

use super::{block_device_mapping_params, indexed_params, FormParams};
use crate::auth::format_timestamp;
use crate::domain::{LaunchSpecification, SpotInstanceType};

#[derive(Debug, Clone, Default)]
pub struct RequestSpotInstancesOptions {
    valid_from: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
    request_type: Option<SpotInstanceType>,
    launch_group: Option<String>,
    availability_zone_group: Option<String>,
}

impl RequestSpotInstancesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid_from(mut self, start: DateTime<Utc>) -> Self {
        self.valid_from = Some(start);
        self
    }

    pub fn valid_until(mut self, end: DateTime<Utc>) -> Self {
        self.valid_until = Some(end);
        self
    }

    pub fn request_type(mut self, request_type: SpotInstanceType) -> Self {
        self.request_type = Some(request_type);
        self
    }

    /// Launch all instances of the group together or none.
    pub fn in_launch_group(mut self, group: impl Into<String>) -> Self {
        self.launch_group = Some(group.into());
        self
    }

    /// Launch all instances of the group into one availability zone.
    pub fn in_availability_zone_group(mut self, group: impl Into<String>) -> Self {
        self.availability_zone_group = Some(group.into());
        self
    }
}

impl FormParams for RequestSpotInstancesOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.valid_from {
            params.push(("ValidFrom".to_string(), format_timestamp(start)));
        }
        if let Some(end) = self.valid_until {
            params.push(("ValidUntil".to_string(), format_timestamp(end)));
        }
        if let Some(request_type) = &self.request_type {
            params.push(("Type".to_string(), request_type.as_wire().to_string()));
        }
        if let Some(group) = &self.launch_group {
            params.push(("LaunchGroup".to_string(), group.clone()));
        }
        if let Some(group) = &self.availability_zone_group {
            params.push(("AvailabilityZoneGroup".to_string(), group.clone()));
        }
        params
    }
}

/// A launch specification renders under the `LaunchSpecification.` prefix.
impl FormParams for LaunchSpecification {
    fn form_params(&self) -> Vec<(String, String)> {
        const P: &str = "LaunchSpecification";
        let mut params = vec![(format!("{P}.ImageId"), self.image_id.clone())];
        let optional = [
            ("InstanceType", &self.instance_type),
            ("KernelId", &self.kernel_id),
            ("RamdiskId", &self.ramdisk_id),
            ("Placement.AvailabilityZone", &self.availability_zone),
            ("SubnetId", &self.subnet_id),
            ("KeyName", &self.key_name),
            ("IamInstanceProfile.Arn", &self.iam_instance_profile_arn),
            ("IamInstanceProfile.Name", &self.iam_instance_profile_name),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                params.push((format!("{P}.{name}"), value.clone()));
            }
        }
        params.extend(indexed_params(
            &format!("{P}.SecurityGroup"),
            &self.security_group_names,
        ));
        params.extend(indexed_params(
            &format!("{P}.SecurityGroupId"),
            &self.security_group_ids,
        ));
        for (i, mapping) in self.block_device_mappings.iter().enumerate() {
            params.extend(block_device_mapping_params(
                &format!("{P}.BlockDeviceMapping"),
                i + 1,
                mapping,
            ));
        }
        if let Some(enabled) = self.monitoring_enabled {
            params.push((format!("{P}.Monitoring.Enabled"), enabled.to_string()));
        }
        if let Some(data) = &self.user_data {
            params.push((format!("{P}.UserData"), BASE64_STANDARD.encode(data)));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::render;

    #[test]
    fn test_request_spot_options() {
        let start = DateTime::parse_from_rfc3339("2012-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let options = RequestSpotInstancesOptions::new()
            .valid_from(start)
            .request_type(SpotInstanceType::Persistent)
            .in_launch_group("lg");
        assert_eq!(
            render(&options.form_params()),
            "ValidFrom=2012-01-01T00:00:00.000Z&Type=persistent&LaunchGroup=lg"
        );
    }

    #[test]
    fn test_launch_specification_params() {
        let spec = LaunchSpecification {
            image_id: "ami-1".into(),
            instance_type: Some("m1.small".into()),
            availability_zone: Some("us-east-1a".into()),
            security_group_names: vec!["default".into()],
            monitoring_enabled: Some(true),
            user_data: Some(b"test".to_vec()),
            ..Default::default()
        };
        assert_eq!(
            render(&spec.form_params()),
            "LaunchSpecification.ImageId=ami-1&LaunchSpecification.InstanceType=m1.small\
             &LaunchSpecification.Placement.AvailabilityZone=us-east-1a\
             &LaunchSpecification.SecurityGroup.1=default\
             &LaunchSpecification.Monitoring.Enabled=true&LaunchSpecification.UserData=dGVzdA=="
        );
    }
}
