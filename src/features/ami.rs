//! Amazon Machine Images.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::client::{empty_on_not_found, Ec2Client, FormRequest};
use crate::domain::{EbsBlockDevice, Image, Permission};
use crate::errors::Ec2Error;
use crate::handlers::image::{
    DescribeImagesHandler, EbsBlockDeviceMappingHandler, ImageIdHandler, PermissionHandler,
    ProductCodesHandler,
};
use crate::handlers::ReturnHandler;
use crate::options::{
    CreateImageOptions, DescribeImagesOptions, RegisterImageBackedByEbsOptions,
    RegisterImageOptions,
};

/// Device the root volume of an EBS-backed Unix image is mapped to.
pub const UNIX_ROOT_DEVICE: &str = "/dev/sda1";

pub struct AmiApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> AmiApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    /// Images visible to the caller; empty when none match.
    pub async fn describe_images(
        &self,
        region: Option<&str>,
        options: &DescribeImagesOptions,
    ) -> Result<Vec<Image>, Ec2Error> {
        let request = FormRequest::new("DescribeImages").with_options(options);
        let handler = DescribeImagesHandler::new(self.client.region_or_default(region));
        empty_on_not_found(self.client.execute(region, request, handler).await)
    }

    /// Snapshot an EBS-backed instance into a new image and return its id.
    pub async fn create_image(
        &self,
        region: Option<&str>,
        instance_id: &str,
        name: &str,
        options: &CreateImageOptions,
    ) -> Result<String, Ec2Error> {
        let request = FormRequest::new("CreateImage")
            .param("InstanceId", instance_id)
            .param("Name", name)
            .with_options(options);
        let image_id = self
            .client
            .execute(region, request, ImageIdHandler::default())
            .await?;
        info!(%image_id, instance_id, "created image");
        Ok(image_id)
    }

    pub async fn deregister_image(&self, region: Option<&str>, image_id: &str) -> Result<(), Ec2Error> {
        let request = FormRequest::new("DeregisterImage").param("ImageId", image_id);
        self.client.execute(region, request, ReturnHandler).await
    }

    /// Register an instance-store image from a manifest in S3.
    pub async fn register_image_from_manifest(
        &self,
        region: Option<&str>,
        name: &str,
        image_location: &str,
        options: &RegisterImageOptions,
    ) -> Result<String, Ec2Error> {
        let request = FormRequest::new("RegisterImage")
            .param("ImageLocation", image_location)
            .param("Name", name)
            .with_options(options);
        self.client
            .execute(region, request, ImageIdHandler::default())
            .await
    }

    /// Register an EBS-backed Unix image whose root volume is created from
    /// `snapshot_id`.
    pub async fn register_unix_image_backed_by_ebs(
        &self,
        region: Option<&str>,
        name: &str,
        snapshot_id: &str,
        options: &RegisterImageBackedByEbsOptions,
    ) -> Result<String, Ec2Error> {
        let request = FormRequest::new("RegisterImage")
            .param("Name", name)
            .param("RootDeviceName", UNIX_ROOT_DEVICE)
            .param("BlockDeviceMapping.0.DeviceName", UNIX_ROOT_DEVICE)
            .param("BlockDeviceMapping.0.Ebs.SnapshotId", snapshot_id)
            .with_options(options);
        self.client
            .execute(region, request, ImageIdHandler::default())
            .await
    }

    pub async fn get_launch_permission_for_image(
        &self,
        region: Option<&str>,
        image_id: &str,
    ) -> Result<Permission, Ec2Error> {
        let request = describe_attribute(image_id, "launchPermission");
        let handler = PermissionHandler::new(self.client.region_or_default(region));
        self.client.execute(region, request, handler).await
    }

    pub async fn get_block_device_mappings_for_image(
        &self,
        region: Option<&str>,
        image_id: &str,
    ) -> Result<BTreeMap<String, EbsBlockDevice>, Ec2Error> {
        let request = describe_attribute(image_id, "blockDeviceMapping");
        self.client
            .execute(region, request, EbsBlockDeviceMappingHandler::default())
            .await
    }

    /// Grant launch permission to accounts and groups (`all` makes the image
    /// public).
    pub async fn add_launch_permissions_to_image(
        &self,
        region: Option<&str>,
        user_ids: &[&str],
        user_groups: &[&str],
        image_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = modify_launch_permission("add", user_ids, user_groups, image_id);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn remove_launch_permissions_from_image(
        &self,
        region: Option<&str>,
        user_ids: &[&str],
        user_groups: &[&str],
        image_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = modify_launch_permission("remove", user_ids, user_groups, image_id);
        self.client.execute(region, request, ReturnHandler).await
    }

    /// Make the image private to its owner again.
    pub async fn reset_launch_permissions_on_image(
        &self,
        region: Option<&str>,
        image_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("ResetImageAttribute")
            .param("Attribute", "launchPermission")
            .param("ImageId", image_id);
        self.client.execute(region, request, ReturnHandler).await
    }

    /// Paid product codes attached to the image.
    pub async fn get_product_codes_for_image(
        &self,
        region: Option<&str>,
        image_id: &str,
    ) -> Result<BTreeSet<String>, Ec2Error> {
        let request = describe_attribute(image_id, "productCodes");
        self.client
            .execute(region, request, ProductCodesHandler::default())
            .await
    }

    pub async fn add_product_codes_to_image(
        &self,
        region: Option<&str>,
        product_codes: &[&str],
        image_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = modify_product_codes("add", product_codes, image_id);
        self.client.execute(region, request, ReturnHandler).await?;
        info!(image_id, ?product_codes, "added product codes");
        Ok(())
    }

    pub async fn remove_product_codes_from_image(
        &self,
        region: Option<&str>,
        product_codes: &[&str],
        image_id: &str,
    ) -> Result<(), Ec2Error> {
        let request = modify_product_codes("remove", product_codes, image_id);
        self.client.execute(region, request, ReturnHandler).await
    }
}

fn describe_attribute(image_id: &str, attribute: &str) -> FormRequest {
    FormRequest::new("DescribeImageAttribute")
        .param("Attribute", attribute)
        .param("ImageId", image_id)
}

fn modify_launch_permission(
    operation: &str,
    user_ids: &[&str],
    user_groups: &[&str],
    image_id: &str,
) -> FormRequest {
    FormRequest::new("ModifyImageAttribute")
        .param("OperationType", operation)
        .param("Attribute", "launchPermission")
        .indexed("UserId", user_ids)
        .indexed("UserGroup", user_groups)
        .param("ImageId", image_id)
}

fn modify_product_codes(operation: &str, product_codes: &[&str], image_id: &str) -> FormRequest {
    FormRequest::new("ModifyImageAttribute")
        .param("OperationType", operation)
        .param("Attribute", "productCodes")
        .param("ImageId", image_id)
        .indexed("ProductCode", product_codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modify_launch_permission_params() {
        let request = modify_launch_permission("add", &["bob", "sue"], &["all"], "imageId");
        let names: Vec<&str> = request.params().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            [
                "Action",
                "OperationType",
                "Attribute",
                "UserId.1",
                "UserId.2",
                "UserGroup.1",
                "ImageId"
            ]
        );
        assert_eq!(request.action(), "ModifyImageAttribute");
    }

    #[test]
    fn test_describe_attribute_params() {
        let request = describe_attribute("ami-1", "blockDeviceMapping");
        assert_eq!(
            request.params()[1],
            ("Attribute".to_string(), "blockDeviceMapping".to_string())
        );
    }

    #[test]
    fn test_modify_product_codes_params() {
        let request = modify_product_codes("remove", &["code1", "code2"], "imageId");
        let rendered: Vec<String> = request
            .params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        assert_eq!(
            rendered.join("&"),
            "Action=ModifyImageAttribute&OperationType=remove&Attribute=productCodes\
             &ImageId=imageId&ProductCode.1=code1&ProductCode.2=code2"
        );
    }

    #[test]
    fn test_describe_product_codes_params() {
        let request = describe_attribute("imageId", "productCodes");
        let rendered: Vec<String> = request
            .params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        assert_eq!(
            rendered.join("&"),
            "Action=DescribeImageAttribute&Attribute=productCodes&ImageId=imageId"
        );
    }
}
