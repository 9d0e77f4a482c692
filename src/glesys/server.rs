//! `server/*` calls.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::info;

use super::error::{empty_on_not_found, none_on_not_found};
use super::model::{
    AllowedArgumentsForCreate, CloneServerOptions, Console, CreateServerOptions,
    EditServerOptions, OsTemplate, ResourceUsageReport, Server, ServerDetails, ServerLimits,
    ServerSpec, ServerStatus, StatusType,
};
use super::{GlesysClient, GlesysError};

const MODULE: &str = "server";

#[derive(Deserialize)]
struct ServerList {
    #[serde(default)]
    servers: Vec<Server>,
}

#[derive(Deserialize)]
struct ServerBody<T> {
    server: T,
}

#[derive(Deserialize)]
struct ConsoleBody {
    console: Console,
}

#[derive(Deserialize)]
struct LimitsBody {
    limits: ServerLimits,
}

#[derive(Deserialize)]
struct UsageBody {
    usage: ResourceUsageReport,
}

#[derive(Deserialize)]
struct TemplatesBody {
    #[serde(default)]
    templates: BTreeMap<String, Vec<OsTemplate>>,
}

#[derive(Deserialize)]
struct AllowedArgumentsBody {
    #[serde(rename = "argumentslist", default)]
    arguments: BTreeMap<String, AllowedArgumentsForCreate>,
}

pub struct ServerApi<'a> {
    client: &'a GlesysClient,
}

impl<'a> ServerApi<'a> {
    pub(crate) fn new(client: &'a GlesysClient) -> Self {
        Self { client }
    }

    /// All servers on the account; empty when there are none.
    pub async fn list_servers(&self) -> Result<Vec<Server>, GlesysError> {
        let result = self
            .client
            .call::<ServerList>(MODULE, "list", &[])
            .await
            .map(|list| list.servers);
        empty_on_not_found(result)
    }

    /// `None` when the server does not exist.
    pub async fn get_server_details(&self, server_id: &str) -> Result<Option<ServerDetails>, GlesysError> {
        let args = [
            ("serverid", server_id.to_string()),
            ("includestate", "true".to_string()),
        ];
        let result = self
            .client
            .call::<ServerBody<ServerDetails>>(MODULE, "details", &args)
            .await
            .map(|body| body.server);
        none_on_not_found(result)
    }

    /// Live state and resource use; `None` when the server does not exist.
    pub async fn get_server_status(
        &self,
        server_id: &str,
        status_type: Option<StatusType>,
    ) -> Result<Option<ServerStatus>, GlesysError> {
        let args = status_args(server_id, status_type);
        let result = self
            .client
            .call::<ServerBody<ServerStatus>>(MODULE, "status", &args)
            .await
            .map(|body| body.server);
        none_on_not_found(result)
    }

    /// `None` when the server does not exist.
    pub async fn get_console(&self, server_id: &str) -> Result<Option<Console>, GlesysError> {
        let result = self
            .client
            .call::<ConsoleBody>(MODULE, "console", &[("serverid", server_id.to_string())])
            .await
            .map(|body| body.console);
        none_on_not_found(result)
    }

    /// Container limits by name; `None` when the server does not exist.
    pub async fn get_limits(&self, server_id: &str) -> Result<Option<ServerLimits>, GlesysError> {
        let result = self
            .client
            .call::<LimitsBody>(MODULE, "limits", &[("serverid", server_id.to_string())])
            .await
            .map(|body| body.limits);
        none_on_not_found(result)
    }

    /// Samples of `resource` (e.g. `diskioread`) at `resolution` (`minute`,
    /// `hour`, `day`).
    pub async fn get_resource_usage(
        &self,
        server_id: &str,
        resource: &str,
        resolution: &str,
    ) -> Result<ResourceUsageReport, GlesysError> {
        let args = [
            ("serverid", server_id.to_string()),
            ("resource", resource.to_string()),
            ("resolution", resolution.to_string()),
        ];
        Ok(self
            .client
            .call::<UsageBody>(MODULE, "resourceusage", &args)
            .await?
            .usage)
    }

    /// Every template of every platform; empty when there are none.
    pub async fn list_templates(&self) -> Result<Vec<OsTemplate>, GlesysError> {
        let result = self
            .client
            .get::<TemplatesBody>(MODULE, "templates", &[])
            .await
            .map(|body| body.templates.into_values().flatten().collect());
        empty_on_not_found(result)
    }

    /// What `server/create` accepts, by platform.
    pub async fn get_allowed_arguments(
        &self,
    ) -> Result<BTreeMap<String, AllowedArgumentsForCreate>, GlesysError> {
        let result = self
            .client
            .get::<AllowedArgumentsBody>(MODULE, "allowedarguments", &[])
            .await
            .map(|body| body.arguments);
        match result {
            Err(e) if e.is_not_found() => Ok(BTreeMap::new()),
            other => other,
        }
    }

    pub async fn create_server(
        &self,
        spec: &ServerSpec,
        hostname: &str,
        root_password: &str,
        options: &CreateServerOptions,
    ) -> Result<ServerDetails, GlesysError> {
        let args = create_args(spec, hostname, root_password, options);
        let details = self
            .client
            .call::<ServerBody<ServerDetails>>(MODULE, "create", &args)
            .await?
            .server;
        info!(server_id = %details.id, hostname, "created GleSYS server");
        Ok(details)
    }

    /// Change the size or labels of a server. The API may answer 206 with
    /// no body while the change is applied.
    pub async fn edit_server(
        &self,
        server_id: &str,
        options: &EditServerOptions,
    ) -> Result<(), GlesysError> {
        let mut args = vec![("serverid", server_id.to_string())];
        args.extend(options.form_args());
        self.client.call_void(MODULE, "edit", &args).await?;
        info!(server_id, "edited GleSYS server");
        Ok(())
    }

    /// Copy a server under a new hostname.
    pub async fn clone_server(
        &self,
        server_id: &str,
        hostname: &str,
        options: &CloneServerOptions,
    ) -> Result<ServerDetails, GlesysError> {
        let mut args = vec![
            ("serverid", server_id.to_string()),
            ("hostname", hostname.to_string()),
        ];
        args.extend(options.form_args());
        let details = self
            .client
            .call::<ServerBody<ServerDetails>>(MODULE, "clone", &args)
            .await?
            .server;
        info!(source = server_id, server_id = %details.id, hostname, "cloned GleSYS server");
        Ok(details)
    }

    pub async fn start_server(&self, server_id: &str) -> Result<(), GlesysError> {
        self.client
            .call_void(MODULE, "start", &[("serverid", server_id.to_string())])
            .await
    }

    /// A hard stop cuts power instead of asking the guest to shut down.
    pub async fn stop_server(&self, server_id: &str, hard: bool) -> Result<(), GlesysError> {
        let mut args = vec![("serverid", server_id.to_string())];
        if hard {
            args.push(("type", "hard".to_string()));
        }
        self.client.call_void(MODULE, "stop", &args).await
    }

    pub async fn reboot_server(&self, server_id: &str) -> Result<(), GlesysError> {
        self.client
            .call_void(MODULE, "reboot", &[("serverid", server_id.to_string())])
            .await
    }

    /// Destroy a server, optionally keeping its addresses on the account.
    pub async fn destroy_server(&self, server_id: &str, keep_ip: bool) -> Result<(), GlesysError> {
        let args = [
            ("serverid", server_id.to_string()),
            ("keepip", keep_ip.to_string()),
        ];
        self.client.call_void(MODULE, "destroy", &args).await?;
        info!(server_id, keep_ip, "destroyed GleSYS server");
        Ok(())
    }
}

fn status_args(server_id: &str, status_type: Option<StatusType>) -> Vec<(&'static str, String)> {
    let mut args = vec![("serverid", server_id.to_string())];
    if let Some(status_type) = status_type {
        args.push(("statustype", status_type.as_str().to_string()));
    }
    args
}

fn create_args(
    spec: &ServerSpec,
    hostname: &str,
    root_password: &str,
    options: &CreateServerOptions,
) -> Vec<(&'static str, String)> {
    let mut args = vec![
        ("hostname", hostname.to_string()),
        ("rootpassword", root_password.to_string()),
        ("datacenter", spec.datacenter.clone()),
        ("platform", spec.platform.clone()),
        ("templatename", spec.template_name.clone()),
        ("disksize", spec.disk_size_gb.to_string()),
        ("memorysize", spec.memory_size_mb.to_string()),
        ("cpucores", spec.cpu_cores.to_string()),
        ("transfer", spec.transfer_gb.to_string()),
    ];
    if let Some(ip) = &options.ip {
        args.push(("ip", ip.clone()));
    }
    if let Some(description) = &options.description {
        args.push(("description", description.clone()));
    }
    args
}
