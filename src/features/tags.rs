//! Resource tags.

use std::collections::BTreeMap;

use crate::client::{empty_on_not_found, Ec2Client, FormRequest};
use crate::domain::Tag;
use crate::errors::Ec2Error;
use crate::handlers::tag::DescribeTagsHandler;
use crate::handlers::ReturnHandler;
use crate::options::FilterOptions;

pub struct TagApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> TagApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    /// Set `tags` on every resource in `resource_ids`, overwriting values of
    /// existing keys.
    pub async fn create_tags_in_region(
        &self,
        region: Option<&str>,
        resource_ids: &[&str],
        tags: &BTreeMap<String, String>,
    ) -> Result<(), Ec2Error> {
        let mut request = FormRequest::new("CreateTags").indexed("ResourceId", resource_ids);
        for (i, (key, value)) in tags.iter().enumerate() {
            request = request
                .param(format!("Tag.{}.Key", i + 1), key)
                .param(format!("Tag.{}.Value", i + 1), value);
        }
        self.client.execute(region, request, ReturnHandler).await
    }

    /// Remove tags. A key mapped to `None` is removed whatever its value;
    /// `Some(value)` only removes a tag with that value.
    pub async fn delete_tags_in_region(
        &self,
        region: Option<&str>,
        resource_ids: &[&str],
        tags: &BTreeMap<String, Option<String>>,
    ) -> Result<(), Ec2Error> {
        let request = delete_tags_request(resource_ids, tags);
        self.client.execute(region, request, ReturnHandler).await
    }

    pub async fn describe_tags_in_region(
        &self,
        region: Option<&str>,
        filter: &FilterOptions,
    ) -> Result<Vec<Tag>, Ec2Error> {
        let request = FormRequest::new("DescribeTags").with_options(filter);
        empty_on_not_found(
            self.client
                .execute(region, request, DescribeTagsHandler::default())
                .await,
        )
    }
}

fn delete_tags_request(resource_ids: &[&str], tags: &BTreeMap<String, Option<String>>) -> FormRequest {
    let mut request = FormRequest::new("DeleteTags").indexed("ResourceId", resource_ids);
    for (i, (key, value)) in tags.iter().enumerate() {
        request = request.param(format!("Tag.{}.Key", i + 1), key);
        if let Some(value) = value {
            request = request.param(format!("Tag.{}.Value", i + 1), value);
        }
    }
    request
}
