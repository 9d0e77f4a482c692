//! Instance lifecycle and attributes.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use tracing::info;

use crate::client::{empty_on_not_found, Ec2Client, FormRequest};
use crate::domain::{BlockDevice, InstanceInitiatedShutdownBehavior, InstanceStateChange, Reservation};
use crate::errors::Ec2Error;
use crate::handlers::attribute::{
    BooleanValueHandler, ConsoleOutputHandler, ShutdownBehaviorHandler, StringValueHandler,
    UnencodeStringValueHandler,
};
use crate::handlers::instance::{
    BlockDeviceMappingHandler, InstanceStateChangeHandler, ReservationHandler,
};
use crate::handlers::ReturnHandler;
use crate::options::RunInstancesOptions;
use crate::xml::SaxHandler;

pub struct InstanceApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> InstanceApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    /// Reservations holding the given instances, or every instance when
    /// `instance_ids` is empty.
    pub async fn describe_instances_in_region(
        &self,
        region: Option<&str>,
        instance_ids: &[&str],
    ) -> Result<Vec<Reservation>, Ec2Error> {
        let request = FormRequest::new("DescribeInstances").indexed("InstanceId", instance_ids);
        let handler = ReservationHandler::new(self.client.region_or_default(region));
        empty_on_not_found(self.client.execute(region, request, handler).await)
    }

    /// Launch between `min_count` and `max_count` instances of `image_id`.
    ///
    /// With no region, a `zone` selects the region that owns it.
    pub async fn run_instances_in_region(
        &self,
        region: Option<&str>,
        zone: Option<&str>,
        image_id: &str,
        min_count: u32,
        max_count: u32,
        options: &RunInstancesOptions,
    ) -> Result<Reservation, Ec2Error> {
        if min_count == 0 || min_count > max_count {
            return Err(Ec2Error::InvalidArgument(format!(
                "invalid instance count range {min_count}..={max_count}"
            )));
        }
        options.validate()?;

        let zone_region = self.client.region_of_zone(zone);
        let region = region.or(zone_region.as_deref());
        let mut request = FormRequest::new("RunInstances")
            .param("ImageId", image_id)
            .param("MinCount", min_count.to_string())
            .param("MaxCount", max_count.to_string());
        if let Some(zone) = zone {
            request = request.param("Placement.AvailabilityZone", zone);
        }
        let request = request.with_options(options);

        let handler = ReservationHandler::run_instances(self.client.region_or_default(region));
        let reservation = self.client.execute(region, request, handler).await?;
        info!(
            image_id,
            count = reservation.instances.len(),
            reservation_id = reservation.reservation_id.as_deref().unwrap_or(""),
            "launched instances"
        );
        Ok(reservation)
    }

    pub async fn reboot_instances_in_region(
        &self,
        region: Option<&str>,
        instance_ids: &[&str],
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("RebootInstances").indexed("InstanceId", instance_ids);
        self.client.execute(region, request, ReturnHandler).await
    }

    /// Instances that are already gone yield no state changes.
    pub async fn terminate_instances_in_region(
        &self,
        region: Option<&str>,
        instance_ids: &[&str],
    ) -> Result<Vec<InstanceStateChange>, Ec2Error> {
        let request = FormRequest::new("TerminateInstances").indexed("InstanceId", instance_ids);
        self.state_changes(region, request, true).await
    }

    pub async fn stop_instances_in_region(
        &self,
        region: Option<&str>,
        force: bool,
        instance_ids: &[&str],
    ) -> Result<Vec<InstanceStateChange>, Ec2Error> {
        let request = FormRequest::new("StopInstances")
            .param("Force", force.to_string())
            .indexed("InstanceId", instance_ids);
        self.state_changes(region, request, false).await
    }

    pub async fn start_instances_in_region(
        &self,
        region: Option<&str>,
        instance_ids: &[&str],
    ) -> Result<Vec<InstanceStateChange>, Ec2Error> {
        let request = FormRequest::new("StartInstances").indexed("InstanceId", instance_ids);
        self.state_changes(region, request, false).await
    }

    async fn state_changes(
        &self,
        region: Option<&str>,
        request: FormRequest,
        empty_when_missing: bool,
    ) -> Result<Vec<InstanceStateChange>, Ec2Error> {
        let handler = InstanceStateChangeHandler::new(self.client.region_or_default(region));
        let result = self.client.execute(region, request, handler).await;
        if empty_when_missing {
            empty_on_not_found(result)
        } else {
            result
        }
    }

    /// Console output of the instance, base64 decoded.
    pub async fn get_console_output_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<String, Ec2Error> {
        let request = FormRequest::new("GetConsoleOutput").param("InstanceId", instance_id);
        self.client
            .execute(region, request, ConsoleOutputHandler::default())
            .await
    }

    // ── Attributes ──────────────────────────────────────────────────

    async fn describe_attribute<H: SaxHandler>(
        &self,
        region: Option<&str>,
        instance_id: &str,
        attribute: &str,
        handler: H,
    ) -> Result<H::Output, Ec2Error> {
        let request = FormRequest::new("DescribeInstanceAttribute")
            .param("Attribute", attribute)
            .param("InstanceId", instance_id);
        self.client.execute(region, request, handler).await
    }

    pub async fn get_user_data_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<Option<Vec<u8>>, Ec2Error> {
        self.describe_attribute(region, instance_id, "userData", UnencodeStringValueHandler::default())
            .await
    }

    pub async fn get_root_device_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<Option<String>, Ec2Error> {
        self.describe_attribute(region, instance_id, "rootDeviceName", StringValueHandler::default())
            .await
    }

    pub async fn get_ramdisk_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<Option<String>, Ec2Error> {
        self.describe_attribute(region, instance_id, "ramdisk", StringValueHandler::default())
            .await
    }

    pub async fn get_kernel_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<Option<String>, Ec2Error> {
        self.describe_attribute(region, instance_id, "kernel", StringValueHandler::default())
            .await
    }

    pub async fn is_api_termination_disabled_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<bool, Ec2Error> {
        self.describe_attribute(
            region,
            instance_id,
            "disableApiTermination",
            BooleanValueHandler::default(),
        )
        .await
    }

    pub async fn get_instance_type_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<Option<String>, Ec2Error> {
        self.describe_attribute(region, instance_id, "instanceType", StringValueHandler::default())
            .await
    }

    pub async fn get_instance_initiated_shutdown_behavior_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<InstanceInitiatedShutdownBehavior, Ec2Error> {
        self.describe_attribute(
            region,
            instance_id,
            "instanceInitiatedShutdownBehavior",
            ShutdownBehaviorHandler::default(),
        )
        .await
    }

    pub async fn get_block_device_mapping_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<BTreeMap<String, BlockDevice>, Ec2Error> {
        self.describe_attribute(
            region,
            instance_id,
            "blockDeviceMapping",
            BlockDeviceMappingHandler::default(),
        )
        .await
    }

    pub async fn reset_ramdisk_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<(), Ec2Error> {
        self.reset_attribute(region, instance_id, "ramdisk").await
    }

    pub async fn reset_kernel_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
    ) -> Result<(), Ec2Error> {
        self.reset_attribute(region, instance_id, "kernel").await
    }

    async fn reset_attribute(
        &self,
        region: Option<&str>,
        instance_id: &str,
        attribute: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("ResetInstanceAttribute")
            .param("Attribute", attribute)
            .param("InstanceId", instance_id);
        self.client.execute(region, request, ReturnHandler).await
    }

    /// Replace the user data of a stopped instance.
    pub async fn set_user_data_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
        user_data: &[u8],
    ) -> Result<(), Ec2Error> {
        let encoded = BASE64_STANDARD.encode(user_data);
        self.modify_attribute(region, instance_id, "userData", &encoded)
            .await
    }

    pub async fn set_ramdisk_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
        ramdisk: &str,
    ) -> Result<(), Ec2Error> {
        self.modify_attribute(region, instance_id, "ramdisk", ramdisk)
            .await
    }

    pub async fn set_kernel_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
        kernel: &str,
    ) -> Result<(), Ec2Error> {
        self.modify_attribute(region, instance_id, "kernel", kernel)
            .await
    }

    pub async fn set_api_termination_disabled_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
        disabled: bool,
    ) -> Result<(), Ec2Error> {
        self.modify_attribute(
            region,
            instance_id,
            "disableApiTermination",
            &disabled.to_string(),
        )
        .await
    }

    pub async fn set_instance_type_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
        instance_type: &str,
    ) -> Result<(), Ec2Error> {
        self.modify_attribute(region, instance_id, "instanceType", instance_type)
            .await
    }

    pub async fn set_instance_initiated_shutdown_behavior_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
        behavior: &InstanceInitiatedShutdownBehavior,
    ) -> Result<(), Ec2Error> {
        self.modify_attribute(
            region,
            instance_id,
            "instanceInitiatedShutdownBehavior",
            behavior.as_wire(),
        )
        .await
    }

    /// Change the delete-on-termination flag of attached EBS volumes.
    pub async fn set_block_device_mapping_for_instance_in_region(
        &self,
        region: Option<&str>,
        instance_id: &str,
        mapping: &BTreeMap<String, BlockDevice>,
    ) -> Result<(), Ec2Error> {
        let request = block_device_mapping_request(instance_id, mapping);
        self.client.execute(region, request, ReturnHandler).await
    }

    async fn modify_attribute(
        &self,
        region: Option<&str>,
        instance_id: &str,
        attribute: &str,
        value: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("ModifyInstanceAttribute")
            .param("Attribute", attribute)
            .param("Value", value)
            .param("InstanceId", instance_id);
        self.client.execute(region, request, ReturnHandler).await
    }
}

fn block_device_mapping_request(
    instance_id: &str,
    mapping: &BTreeMap<String, BlockDevice>,
) -> FormRequest {
    let mut request = FormRequest::new("ModifyInstanceAttribute").param("InstanceId", instance_id);
    for (i, (device_name, device)) in mapping.iter().enumerate() {
        let n = i + 1;
        request = request
            .param(format!("BlockDeviceMapping.{n}.DeviceName"), device_name)
            .param(format!("BlockDeviceMapping.{n}.Ebs.VolumeId"), &device.volume_id)
            .param(
                format!("BlockDeviceMapping.{n}.Ebs.DeleteOnTermination"),
                device.delete_on_termination.to_string(),
            );
    }
    request
}
