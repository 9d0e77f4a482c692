//! `ip/*` calls.

use serde::Deserialize;
use tracing::info;

use super::error::{empty_on_not_found, none_on_not_found};
use super::model::{FreeIps, IpDetails};
use super::{GlesysClient, GlesysError};

const MODULE: &str = "ip";

#[derive(Deserialize)]
struct IpList {
    #[serde(default)]
    iplist: Vec<IpDetails>,
}

#[derive(Deserialize)]
struct FreeList {
    iplist: FreeIps,
}

#[derive(Deserialize)]
struct DetailsBody {
    details: IpDetails,
}

pub struct IpApi<'a> {
    client: &'a GlesysClient,
}

impl<'a> IpApi<'a> {
    pub(crate) fn new(client: &'a GlesysClient) -> Self {
        Self { client }
    }

    /// Addresses held by the account; empty when there are none.
    pub async fn list_ips(&self) -> Result<Vec<IpDetails>, GlesysError> {
        let result = self
            .client
            .get::<IpList>(MODULE, "listown", &[])
            .await
            .map(|list| list.iplist);
        empty_on_not_found(result)
    }

    /// `None` when the address is unknown.
    pub async fn get_ip_details(&self, ip: &str) -> Result<Option<IpDetails>, GlesysError> {
        let result = self
            .client
            .get::<DetailsBody>(MODULE, "details", &[("ipaddress", ip)])
            .await
            .map(|body| body.details);
        none_on_not_found(result)
    }

    /// Addresses available to take; empty when none are.
    pub async fn list_free(
        &self,
        ip_version: u8,
        datacenter: &str,
        platform: &str,
    ) -> Result<Vec<String>, GlesysError> {
        let version = ip_version.to_string();
        let args = [
            ("ipversion", version.as_str()),
            ("datacenter", datacenter),
            ("platform", platform),
        ];
        let result = self
            .client
            .get::<FreeList>(MODULE, "listfree", &args)
            .await
            .map(|list| list.iplist.addresses);
        empty_on_not_found(result)
    }

    /// Reserve a free address for the account.
    pub async fn take(&self, ip: &str) -> Result<IpDetails, GlesysError> {
        let details = self
            .client
            .call::<DetailsBody>(MODULE, "take", &[("ipaddress", ip.to_string())])
            .await?
            .details;
        info!(ip, "took GleSYS address");
        Ok(details)
    }

    /// Hand a reserved address back.
    pub async fn release(&self, ip: &str) -> Result<(), GlesysError> {
        self.client
            .call_void(MODULE, "release", &[("ipaddress", ip.to_string())])
            .await
    }

    pub async fn add_ip_to_server(&self, ip: &str, server_id: &str) -> Result<(), GlesysError> {
        let args = [
            ("ipaddress", ip.to_string()),
            ("serverid", server_id.to_string()),
        ];
        self.client.call_void(MODULE, "add", &args).await
    }

    /// Detach an address, releasing it from the account when `release` is
    /// set.
    pub async fn remove_ip_from_server(
        &self,
        ip: &str,
        server_id: &str,
        release: bool,
    ) -> Result<(), GlesysError> {
        let mut args = vec![
            ("ipaddress", ip.to_string()),
            ("serverid", server_id.to_string()),
        ];
        if release {
            args.push(("release", "true".to_string()));
        }
        self.client.call_void(MODULE, "remove", &args).await
    }

    pub async fn set_ptr(&self, ip: &str, ptr: &str) -> Result<IpDetails, GlesysError> {
        let args = [("ipaddress", ip.to_string()), ("data", ptr.to_string())];
        Ok(self
            .client
            .call::<DetailsBody>(MODULE, "setptr", &args)
            .await?
            .details)
    }

    pub async fn reset_ptr(&self, ip: &str) -> Result<IpDetails, GlesysError> {
        Ok(self
            .client
            .call::<DetailsBody>(MODULE, "resetptr", &[("ipaddress", ip.to_string())])
            .await?
            .details)
    }
}
