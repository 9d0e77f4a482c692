//! GleSYS response and request types.
//!
//! Field names follow the lowercase run-together keys of the JSON API
//! (`serverid`, `templatename`, ...) through serde renames.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// `{"response": {...}}`, the wrapper around every GleSYS payload.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub response: T,
}

/// Monetary amount for a billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "timeperiod", default)]
    pub time_period: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    Running,
    Stopped,
    Locked,
    #[serde(other)]
    Unrecognized,
}

/// Entry of `server/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(rename = "serverid")]
    pub id: String,
    pub hostname: String,
    pub datacenter: String,
    pub platform: String,
}

/// Address attached to a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ip {
    #[serde(rename = "ipaddress")]
    pub address: String,
    pub version: u8,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// `server/details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerDetails {
    #[serde(rename = "serverid")]
    pub id: String,
    pub hostname: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "cpucores")]
    pub cpu_cores: u32,
    /// MB.
    #[serde(rename = "memorysize")]
    pub memory_size: u32,
    /// GB.
    #[serde(rename = "disksize")]
    pub disk_size: u32,
    /// GB per month.
    #[serde(default)]
    pub transfer: u32,
    #[serde(rename = "templatename")]
    pub template_name: String,
    pub datacenter: String,
    pub platform: String,
    #[serde(default)]
    pub state: Option<ServerState>,
    #[serde(default)]
    pub cost: Option<Cost>,
    #[serde(rename = "iplist", default)]
    pub ips: Vec<Ip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub usage: f64,
    pub max: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uptime {
    pub current: u64,
    pub unit: String,
}

/// `server/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub state: ServerState,
    #[serde(default)]
    pub cpu: Option<ResourceUsage>,
    #[serde(default)]
    pub memory: Option<ResourceUsage>,
    #[serde(default)]
    pub disk: Option<ResourceUsage>,
    #[serde(default)]
    pub uptime: Option<Uptime>,
}

/// What `server/create` should build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSpec {
    pub datacenter: String,
    pub platform: String,
    pub template_name: String,
    pub disk_size_gb: u32,
    pub memory_size_mb: u32,
    pub cpu_cores: u32,
    pub transfer_gb: u32,
}

/// Optional arguments of `server/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateServerOptions {
    pub description: Option<String>,
    /// Address to assign; otherwise one is picked by the API.
    pub ip: Option<String>,
}

/// Narrows `server/status` to one part of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    State,
    Cpu,
    Memory,
    Disk,
    Uptime,
}

impl StatusType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusType::State => "state",
            StatusType::Cpu => "cpu",
            StatusType::Memory => "memory",
            StatusType::Disk => "disk",
            StatusType::Uptime => "uptime",
        }
    }
}

/// Fields of `server/edit`; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditServerOptions {
    pub description: Option<String>,
    pub disk_size_gb: Option<u32>,
    pub memory_size_mb: Option<u32>,
    pub cpu_cores: Option<u32>,
    pub transfer_gb: Option<u32>,
    pub hostname: Option<String>,
}

impl EditServerOptions {
    pub(crate) fn form_args(&self) -> Vec<(&'static str, String)> {
        let mut args = Vec::new();
        if let Some(description) = &self.description {
            args.push(("description", description.clone()));
        }
        push_sizes(
            &mut args,
            [
                ("disksize", self.disk_size_gb),
                ("memorysize", self.memory_size_mb),
                ("cpucores", self.cpu_cores),
                ("transfer", self.transfer_gb),
            ],
        );
        if let Some(hostname) = &self.hostname {
            args.push(("hostname", hostname.clone()));
        }
        args
    }
}

/// Overrides applied to the copy made by `server/clone`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneServerOptions {
    pub description: Option<String>,
    pub disk_size_gb: Option<u32>,
    pub memory_size_mb: Option<u32>,
    pub cpu_cores: Option<u32>,
}

impl CloneServerOptions {
    pub(crate) fn form_args(&self) -> Vec<(&'static str, String)> {
        let mut args = Vec::new();
        if let Some(description) = &self.description {
            args.push(("description", description.clone()));
        }
        push_sizes(
            &mut args,
            [
                ("disksize", self.disk_size_gb),
                ("memorysize", self.memory_size_mb),
                ("cpucores", self.cpu_cores),
            ],
        );
        args
    }
}

fn push_sizes<const N: usize>(
    args: &mut Vec<(&'static str, String)>,
    sizes: [(&'static str, Option<u32>); N],
) {
    for (name, value) in sizes {
        if let Some(value) = value {
            args.push((name, value.to_string()));
        }
    }
}

/// Remote console of a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Console {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub protocol: String,
}

/// One container limit of `server/limits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerLimit {
    pub held: u64,
    #[serde(rename = "maxheld")]
    pub max_held: u64,
    pub barrier: u64,
    pub limit: u64,
    #[serde(rename = "failcnt")]
    pub fail_count: u64,
}

/// `server/limits`, keyed by limit name.
pub type ServerLimits = BTreeMap<String, ServerLimit>;

/// `server/resourceusage`: samples of one resource over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsageReport {
    pub info: ResourceUsageInfo,
    #[serde(default)]
    pub values: Vec<ResourceUsageValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsageInfo {
    pub resource: String,
    pub resolution: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsageValue {
    pub value: f64,
    pub timestamp: DateTime<FixedOffset>,
}

/// Entry of `server/templates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsTemplate {
    pub name: String,
    /// GB.
    #[serde(rename = "minimumdisksize")]
    pub min_disk_size: u32,
    /// MB.
    #[serde(rename = "minimummemorysize")]
    pub min_memory_size: u32,
    #[serde(rename = "operatingsystem")]
    pub operating_system: String,
    pub platform: String,
}

/// Values a `server/create` argument may take and what each unit costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedArguments {
    #[serde(rename = "allowedvalues")]
    pub allowed_values: Vec<u32>,
    #[serde(rename = "costperunit")]
    pub cost_per_unit: Cost,
}

/// `server/allowedarguments` for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedArgumentsForCreate {
    #[serde(rename = "datacenter", default)]
    pub datacenters: Vec<String>,
    #[serde(rename = "memorysize")]
    pub memory_sizes: AllowedArguments,
    #[serde(rename = "disksize")]
    pub disk_sizes: AllowedArguments,
    #[serde(rename = "cpucores")]
    pub cpu_cores: AllowedArguments,
    #[serde(rename = "template", default)]
    pub templates: Vec<String>,
    #[serde(rename = "transfer")]
    pub transfers: AllowedArguments,
}

/// Entry of `ip/listown` and body of `ip/details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpDetails {
    #[serde(rename = "ipaddress")]
    pub address: String,
    #[serde(alias = "ipversion")]
    pub version: u8,
    pub datacenter: String,
    pub platform: String,
    #[serde(default)]
    pub ptr: Option<String>,
    #[serde(rename = "serverid", default)]
    pub server_id: Option<String>,
    #[serde(deserialize_with = "yes_no", default)]
    pub reserved: bool,
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub netmask: Option<String>,
    #[serde(default)]
    pub broadcast: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub cost: Option<Cost>,
}

/// `ip/listfree`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeIps {
    #[serde(rename = "ipversion")]
    pub version: u8,
    pub datacenter: String,
    pub platform: String,
    #[serde(rename = "ipaddresses", default)]
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(rename = "domainname")]
    pub name: String,
    #[serde(rename = "createtime", deserialize_with = "glesys_time", default)]
    pub create_time: Option<NaiveDateTime>,
    #[serde(rename = "recordcount", default)]
    pub record_count: u32,
    #[serde(rename = "usingglesysnameserver", deserialize_with = "yes_no", default)]
    pub using_glesys_nameserver: bool,
}

/// Zone settings for `domain/add` and `domain/edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainOptions {
    pub primary_nameserver: Option<String>,
    pub responsible_person: Option<String>,
    pub ttl: Option<u32>,
    pub refresh: Option<u32>,
    pub retry: Option<u32>,
    pub expire: Option<u32>,
    pub minimum: Option<u32>,
}

impl DomainOptions {
    pub(crate) fn form_args(&self) -> Vec<(&'static str, String)> {
        let mut args = Vec::new();
        if let Some(ns) = &self.primary_nameserver {
            args.push(("primarynameserver", ns.clone()));
        }
        if let Some(person) = &self.responsible_person {
            args.push(("responsibleperson", person.clone()));
        }
        for (name, value) in [
            ("ttl", self.ttl),
            ("refresh", self.refresh),
            ("retry", self.retry),
            ("expire", self.expire),
            ("minimum", self.minimum),
        ] {
            if let Some(value) = value {
                args.push((name, value.to_string()));
            }
        }
        args
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    #[serde(rename = "recordid", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "domainname")]
    pub domain: String,
    pub host: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: String,
    pub ttl: u32,
}

/// Fields of `domain/updaterecord`; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRecordOptions {
    pub host: Option<String>,
    pub record_type: Option<String>,
    pub data: Option<String>,
    pub ttl: Option<u32>,
}

impl UpdateRecordOptions {
    pub(crate) fn form_args(&self) -> Vec<(&'static str, String)> {
        let mut args = Vec::new();
        if let Some(host) = &self.host {
            args.push(("host", host.clone()));
        }
        if let Some(record_type) = &self.record_type {
            args.push(("type", record_type.clone()));
        }
        if let Some(data) = &self.data {
            args.push(("data", data.clone()));
        }
        if let Some(ttl) = self.ttl {
            args.push(("ttl", ttl.to_string()));
        }
        args
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailQuota {
    pub max: u64,
    pub unit: String,
}

/// Mailbox of `email/list`, `email/createaccount` and `email/editaccount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAccount {
    #[serde(rename = "emailaccount")]
    pub account: String,
    pub quota: EmailQuota,
    #[serde(rename = "antispamlevel", default)]
    pub antispam_level: u32,
    #[serde(deserialize_with = "yes_no", default)]
    pub antivirus: bool,
    #[serde(deserialize_with = "yes_no", default)]
    pub autorespond: bool,
    #[serde(rename = "autorespondmessage", default)]
    pub autorespond_message: Option<String>,
    #[serde(rename = "autorespondsaveemail", deserialize_with = "yes_no", default)]
    pub autorespond_save_email: bool,
    #[serde(default)]
    pub created: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub modified: Option<DateTime<FixedOffset>>,
}

/// Forwarding address of `email/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAlias {
    #[serde(rename = "emailalias")]
    pub alias: String,
    #[serde(rename = "goto")]
    pub forward_to: String,
}

/// `email/overview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailOverview {
    pub summary: EmailOverviewSummary,
    #[serde(default)]
    pub domains: Vec<EmailOverviewDomain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailOverviewSummary {
    pub accounts: u32,
    #[serde(rename = "maxaccounts")]
    pub max_accounts: u32,
    pub aliases: u32,
    #[serde(rename = "maxaliases")]
    pub max_aliases: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailOverviewDomain {
    #[serde(rename = "domainname")]
    pub domain: String,
    pub accounts: u32,
    pub aliases: u32,
}

/// Mailbox settings for `email/createaccount` and `email/editaccount`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailAccountOptions {
    pub antispam_level: Option<u32>,
    pub antivirus: Option<bool>,
    pub autorespond: Option<bool>,
    pub autorespond_message: Option<String>,
    pub autorespond_save_email: Option<bool>,
    /// MB.
    pub quota: Option<u64>,
}

impl EmailAccountOptions {
    pub(crate) fn form_args(&self) -> Vec<(&'static str, String)> {
        let mut args = Vec::new();
        if let Some(level) = self.antispam_level {
            args.push(("antispamlevel", level.to_string()));
        }
        if let Some(on) = self.antivirus {
            args.push(("antivirus", yes_or_no(on)));
        }
        if let Some(on) = self.autorespond {
            args.push(("autorespond", yes_or_no(on)));
        }
        if let Some(message) = &self.autorespond_message {
            args.push(("autorespondmessage", message.clone()));
        }
        if let Some(on) = self.autorespond_save_email {
            args.push(("autorespondsaveemail", yes_or_no(on)));
        }
        if let Some(quota) = self.quota {
            args.push(("quota", quota.to_string()));
        }
        args
    }
}

/// `email/editaccount`: a new password and/or changed settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditAccountOptions {
    pub password: Option<String>,
    pub settings: EmailAccountOptions,
}

impl EditAccountOptions {
    pub(crate) fn form_args(&self) -> Vec<(&'static str, String)> {
        let mut args = Vec::new();
        if let Some(password) = &self.password {
            args.push(("password", password.clone()));
        }
        args.extend(self.settings.form_args());
        args
    }
}

fn yes_or_no(on: bool) -> String {
    String::from(if on { "yes" } else { "no" })
}

fn yes_no<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }
    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => match s.to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" => Ok(true),
            "no" | "false" | "0" | "" => Ok(false),
            other => Err(de::Error::custom(format!("expected yes or no, got {other}"))),
        },
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

/// `2011-12-20 10:58:51`, the API's local timestamp format.
fn glesys_time<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
            .map(Some)
            .map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_details() {
        let json = r#"{
            "serverid": "xm3276891", "hostname": "glesys-s-6dd",
            "description": "glesys-s-6dd", "cpucores": 1, "memorysize": 512,
            "disksize": 5, "transfer": 50, "templatename": "Ubuntu 11.04 x64",
            "datacenter": "Falkenberg", "platform": "Xen", "state": "running",
            "cost": {"amount": 13.22, "currency": "EUR", "timeperiod": "month"},
            "iplist": [{"ipaddress": "109.74.10.45", "version": 4, "cost": 2, "currency": "EUR"}]
        }"#;
        let details: ServerDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.id, "xm3276891");
        assert_eq!(details.memory_size, 512);
        assert_eq!(details.state, Some(ServerState::Running));
        assert_eq!(details.cost.as_ref().map(|c| c.amount), Some(13.22));
        assert_eq!(details.ips[0].address, "109.74.10.45");
        assert_eq!(details.ips[0].cost, 2.0);
    }

    #[test]
    fn test_unknown_server_state() {
        let state: ServerState = serde_json::from_str(r#""migrating""#).unwrap();
        assert_eq!(state, ServerState::Unrecognized);
    }

    #[test]
    fn test_ip_details_yes_no_and_null_server() {
        let json = r#"{
            "ipaddress": "31.192.227.37", "reserved": "yes", "version": 4,
            "datacenter": "Falkenberg", "platform": "OpenVZ",
            "nameservers": ["79.99.4.100", "79.99.4.101"], "ptr": "31-192-227-37-static.serverhotell.net.",
            "serverid": null, "netmask": "255.255.254.0",
            "cost": {"amount": 2, "currency": "EUR", "timeperiod": "month"}
        }"#;
        let ip: IpDetails = serde_json::from_str(json).unwrap();
        assert!(ip.reserved);
        assert_eq!(ip.server_id, None);
        assert_eq!(ip.nameservers.len(), 2);
        assert_eq!(ip.gateway, None);
    }

    #[test]
    fn test_domain_create_time() {
        let json = r#"{"domainname": "cl13016.test.example.org", "createtime": "2012-01-31 12:19:03",
                       "recordcount": 9, "usingglesysnameserver": "no"}"#;
        let domain: Domain = serde_json::from_str(json).unwrap();
        assert_eq!(
            domain.create_time.map(|t| t.to_string()),
            Some("2012-01-31 12:19:03".to_string())
        );
        assert!(!domain.using_glesys_nameserver);
    }

    #[test]
    fn test_record_id_number_or_string() {
        let numeric = r#"{"recordid": 224538, "domainname": "a.org", "host": "www",
                          "type": "A", "data": "127.0.0.1", "ttl": 3600}"#;
        let record: DomainRecord = serde_json::from_str(numeric).unwrap();
        assert_eq!(record.id, "224538");
        let text = numeric.replace("224538", "\"224538\"");
        let record: DomainRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(record.id, "224538");
    }

    #[test]
    fn test_domain_options_args() {
        let options = DomainOptions {
            primary_nameserver: Some("ns1.somewhere.x".into()),
            ttl: Some(300),
            minimum: Some(60),
            ..Default::default()
        };
        assert_eq!(
            options.form_args(),
            [
                ("primarynameserver", "ns1.somewhere.x".to_string()),
                ("ttl", "300".to_string()),
                ("minimum", "60".to_string()),
            ]
        );
    }

    #[test]
    fn test_edit_server_args_order() {
        let options = EditServerOptions {
            description: Some("Description-of-server".into()),
            disk_size_gb: Some(1),
            memory_size_mb: Some(512),
            cpu_cores: Some(1),
            hostname: Some("glesys-test".into()),
            ..Default::default()
        };
        let keys: Vec<&str> = options.form_args().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            ["description", "disksize", "memorysize", "cpucores", "hostname"]
        );
    }

    #[test]
    fn test_resource_usage_timestamps() {
        let json = r#"{"info":{"resource":"diskioread","resolution":"minute","unit":"KB"},
            "values":[{"value":0,"timestamp":"2012-06-24T14:21:07+02:00"},
                      {"value":5.1,"timestamp":"2012-06-24T14:22:05+02:00"}]}"#;
        let report: ResourceUsageReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.info.unit, "KB");
        assert_eq!(report.values[1].value, 5.1);
        assert_eq!(
            report.values[0].timestamp.to_rfc3339(),
            "2012-06-24T14:21:07+02:00"
        );
    }

    #[test]
    fn test_allowed_arguments() {
        let json = r#"{"datacenter":["Falkenberg"],
            "memorysize":{"allowedvalues":[512,1024],"costperunit":{"amount":0.09,"currency":"SEK","timeperiod":"month"}},
            "disksize":{"allowedvalues":[5,10],"costperunit":{"amount":2.2,"currency":"SEK","timeperiod":"month"}},
            "cpucores":{"allowedvalues":[1,2],"costperunit":{"amount":30,"currency":"SEK","timeperiod":"month"}},
            "template":["Ubuntu 11.04 x64"],
            "transfer":{"allowedvalues":[50,100],"costperunit":{"amount":0.2,"currency":"SEK","timeperiod":"month"}}}"#;
        let allowed: AllowedArgumentsForCreate = serde_json::from_str(json).unwrap();
        assert_eq!(allowed.memory_sizes.allowed_values, [512, 1024]);
        assert_eq!(allowed.cpu_cores.cost_per_unit.amount, 30.0);
        assert_eq!(allowed.templates, ["Ubuntu 11.04 x64"]);
    }

    #[test]
    fn test_email_account_flags_and_dates() {
        let json = r#"{"emailaccount":"test@example.org","quota":{"max":200,"unit":"MB"},
            "antispamlevel":3,"antivirus":"yes","autorespond":"no","autorespondmessage":null,
            "autorespondsaveemail":"yes","created":"2012-06-24T11:53:45+02:00","modified":null}"#;
        let account: EmailAccount = serde_json::from_str(json).unwrap();
        assert!(account.antivirus);
        assert!(!account.autorespond);
        assert!(account.autorespond_save_email);
        assert_eq!(account.quota.max, 200);
        assert!(account.created.is_some());
        assert_eq!(account.modified, None);
    }

    #[test]
    fn test_edit_account_args() {
        let options = EditAccountOptions {
            password: Some("anotherpass".into()),
            settings: EmailAccountOptions {
                antivirus: Some(false),
                quota: Some(200),
                ..Default::default()
            },
        };
        assert_eq!(
            options.form_args(),
            [
                ("password", "anotherpass".to_string()),
                ("antivirus", "no".to_string()),
                ("quota", "200".to_string()),
            ]
        );
    }
}
