//! Options for RunInstances, including the AWS-only extensions.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use super::{block_device_mapping_params, indexed_params, FormParams};
use crate::domain::BlockDeviceMapping;
use crate::errors::Ec2Error;

/// Largest user data EC2 accepts, before base64 encoding.
pub const MAX_USER_DATA_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone, Default)]
pub struct RunInstancesOptions {
    key_name: Option<String>,
    security_groups: Vec<String>,
    user_data: Option<Vec<u8>>,
    instance_type: Option<String>,
    kernel_id: Option<String>,
    ramdisk_id: Option<String>,
    block_device_mappings: Vec<BlockDeviceMapping>,
    security_group_ids: Vec<String>,
    subnet_id: Option<String>,
    monitoring_enabled: bool,
    placement_group: Option<String>,
    iam_instance_profile_arn: Option<String>,
    iam_instance_profile_name: Option<String>,
    client_token: Option<String>,
}

impl RunInstancesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    /// Security groups by name.
    pub fn with_security_groups<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        groups: I,
    ) -> Self {
        self.security_groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Raw user data; base64 encoded on the wire.
    pub fn with_user_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.user_data = Some(data.into());
        self
    }

    /// e.g. `m1.small`.
    pub fn as_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = Some(instance_type.into());
        self
    }

    pub fn with_kernel_id(mut self, kernel_id: impl Into<String>) -> Self {
        self.kernel_id = Some(kernel_id.into());
        self
    }

    pub fn with_ramdisk(mut self, ramdisk_id: impl Into<String>) -> Self {
        self.ramdisk_id = Some(ramdisk_id.into());
        self
    }

    pub fn with_block_device_mappings<I: IntoIterator<Item = BlockDeviceMapping>>(
        mut self,
        mappings: I,
    ) -> Self {
        self.block_device_mappings.extend(mappings);
        self
    }

    /// Security groups by id (VPC).
    pub fn with_security_group_ids<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        ids: I,
    ) -> Self {
        self.security_group_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_subnet_id(mut self, subnet_id: impl Into<String>) -> Self {
        self.subnet_id = Some(subnet_id.into());
        self
    }

    /// Turn on detailed CloudWatch monitoring.
    pub fn enable_monitoring(mut self) -> Self {
        self.monitoring_enabled = true;
        self
    }

    pub fn in_placement_group(mut self, group_name: impl Into<String>) -> Self {
        self.placement_group = Some(group_name.into());
        self
    }

    pub fn with_iam_instance_profile_arn(mut self, arn: impl Into<String>) -> Self {
        self.iam_instance_profile_arn = Some(arn.into());
        self
    }

    pub fn with_iam_instance_profile_name(mut self, name: impl Into<String>) -> Self {
        self.iam_instance_profile_name = Some(name.into());
        self
    }

    /// Idempotency token; repeated requests with the same token launch once.
    pub fn with_client_token(mut self, token: impl Into<String>) -> Self {
        self.client_token = Some(token.into());
        self
    }

    /// Use a fresh random idempotency token.
    pub fn with_generated_client_token(self) -> Self {
        self.with_client_token(uuid::Uuid::new_v4().to_string())
    }

    /// Reject options EC2 would refuse anyway.
    pub fn validate(&self) -> Result<(), Ec2Error> {
        if let Some(data) = &self.user_data {
            if data.len() > MAX_USER_DATA_BYTES {
                return Err(Ec2Error::InvalidArgument(format!(
                    "user data is {} bytes; the limit is {MAX_USER_DATA_BYTES}",
                    data.len()
                )));
            }
        }
        if self.iam_instance_profile_arn.is_some() && self.iam_instance_profile_name.is_some() {
            return Err(Ec2Error::InvalidArgument(
                "set either the IAM instance profile arn or name, not both".to_string(),
            ));
        }
        Ok(())
    }
}

impl FormParams for RunInstancesOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(key_name) = &self.key_name {
            params.push(("KeyName".to_string(), key_name.clone()));
        }
        params.extend(indexed_params("SecurityGroup", &self.security_groups));
        if let Some(data) = &self.user_data {
            params.push(("UserData".to_string(), BASE64_STANDARD.encode(data)));
        }
        if let Some(instance_type) = &self.instance_type {
            params.push(("InstanceType".to_string(), instance_type.clone()));
        }
        if let Some(kernel_id) = &self.kernel_id {
            params.push(("KernelId".to_string(), kernel_id.clone()));
        }
        if let Some(ramdisk_id) = &self.ramdisk_id {
            params.push(("RamdiskId".to_string(), ramdisk_id.clone()));
        }
        for (i, mapping) in self.block_device_mappings.iter().enumerate() {
            params.extend(block_device_mapping_params("BlockDeviceMapping", i + 1, mapping));
        }
        params.extend(indexed_params("SecurityGroupId", &self.security_group_ids));
        if let Some(subnet_id) = &self.subnet_id {
            params.push(("SubnetId".to_string(), subnet_id.clone()));
        }
        if self.monitoring_enabled {
            params.push(("Monitoring.Enabled".to_string(), "true".to_string()));
        }
        if let Some(group) = &self.placement_group {
            params.push(("Placement.GroupName".to_string(), group.clone()));
        }
        if let Some(arn) = &self.iam_instance_profile_arn {
            params.push(("IamInstanceProfile.Arn".to_string(), arn.clone()));
        }
        if let Some(name) = &self.iam_instance_profile_name {
            params.push(("IamInstanceProfile.Name".to_string(), name.clone()));
        }
        if let Some(token) = &self.client_token {
            params.push(("ClientToken".to_string(), token.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::render;

    #[test]
    fn test_user_data_is_base64() {
        let options = RunInstancesOptions::new().with_user_data("test");
        assert_eq!(render(&options.form_params()), "UserData=dGVzdA==");
    }

    #[test]
    fn test_security_groups_indexed() {
        let options = RunInstancesOptions::new()
            .with_security_groups(["group1", "group2"])
            .with_security_group_ids(["sg-1"]);
        assert_eq!(
            render(&options.form_params()),
            "SecurityGroup.1=group1&SecurityGroup.2=group2&SecurityGroupId.1=sg-1"
        );
    }

    #[test]
    fn test_aws_extensions() {
        let options = RunInstancesOptions::new()
            .with_subnet_id("subnet-1")
            .enable_monitoring()
            .in_placement_group("hpc")
            .with_iam_instance_profile_arn("arn:aws:iam::123:instance-profile/x")
            .with_client_token("token");
        assert_eq!(
            render(&options.form_params()),
            "SubnetId=subnet-1&Monitoring.Enabled=true&Placement.GroupName=hpc\
             &IamInstanceProfile.Arn=arn:aws:iam::123:instance-profile/x&ClientToken=token"
        );
    }

    #[test]
    fn test_generated_client_token() {
        let a = RunInstancesOptions::new().with_generated_client_token();
        let b = RunInstancesOptions::new().with_generated_client_token();
        let token = |o: &RunInstancesOptions| {
            o.form_params()
                .into_iter()
                .find(|(k, _)| k == "ClientToken")
                .map(|(_, v)| v)
        };
        assert_eq!(token(&a).map(|t| t.len()), Some(36));
        assert_ne!(token(&a), token(&b));
    }

    #[test]
    fn test_block_devices_numbered_from_one() {
        let options = RunInstancesOptions::new()
            .as_type("m1.small")
            .with_block_device_mappings([BlockDeviceMapping::map_new_volume("/dev/sdh", 10, true)]);
        assert_eq!(
            render(&options.form_params()),
            "InstanceType=m1.small&BlockDeviceMapping.1.DeviceName=/dev/sdh\
             &BlockDeviceMapping.1.Ebs.VolumeSize=10&BlockDeviceMapping.1.Ebs.DeleteOnTermination=true"
        );
    }

    #[test]
    fn test_validate_user_data_limit() {
        let ok = RunInstancesOptions::new().with_user_data(vec![b'x'; MAX_USER_DATA_BYTES]);
        assert!(ok.validate().is_ok());
        let too_big = RunInstancesOptions::new().with_user_data(vec![b'x'; MAX_USER_DATA_BYTES + 1]);
        assert!(matches!(too_big.validate(), Err(Ec2Error::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_iam_profile_exclusive() {
        let options = RunInstancesOptions::new()
            .with_iam_instance_profile_arn("arn")
            .with_iam_instance_profile_name("name");
        assert!(options.validate().is_err());
    }
}
