//! `domain/*` calls: zones and their records.

use serde::Deserialize;
use tracing::info;

use super::error::{empty_on_not_found, none_on_not_found};
use super::model::{Domain, DomainOptions, DomainRecord, UpdateRecordOptions};
use super::{GlesysClient, GlesysError};

const MODULE: &str = "domain";

#[derive(Deserialize)]
struct DomainList {
    #[serde(default)]
    domains: Vec<Domain>,
}

#[derive(Deserialize)]
struct DomainBody {
    domain: Domain,
}

#[derive(Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<DomainRecord>,
}

#[derive(Deserialize)]
struct RecordBody {
    record: DomainRecord,
}

pub struct DomainApi<'a> {
    client: &'a GlesysClient,
}

impl<'a> DomainApi<'a> {
    pub(crate) fn new(client: &'a GlesysClient) -> Self {
        Self { client }
    }

    pub async fn list_domains(&self) -> Result<Vec<Domain>, GlesysError> {
        let result = self
            .client
            .call::<DomainList>(MODULE, "list", &[])
            .await
            .map(|list| list.domains);
        empty_on_not_found(result)
    }

    /// `None` when the zone is not hosted by the account.
    pub async fn get_domain(&self, domain: &str) -> Result<Option<Domain>, GlesysError> {
        let result = self
            .client
            .call::<DomainBody>(MODULE, "details", &[("domainname", domain.to_string())])
            .await
            .map(|body| body.domain);
        none_on_not_found(result)
    }

    pub async fn add_domain(&self, domain: &str, options: &DomainOptions) -> Result<Domain, GlesysError> {
        let mut args = vec![("domainname", domain.to_string())];
        args.extend(options.form_args());
        let added = self.client.call::<DomainBody>(MODULE, "add", &args).await?.domain;
        info!(domain, "added GleSYS domain");
        Ok(added)
    }

    pub async fn edit_domain(&self, domain: &str, options: &DomainOptions) -> Result<Domain, GlesysError> {
        let mut args = vec![("domainname", domain.to_string())];
        args.extend(options.form_args());
        Ok(self.client.call::<DomainBody>(MODULE, "edit", &args).await?.domain)
    }

    pub async fn delete_domain(&self, domain: &str) -> Result<(), GlesysError> {
        self.client
            .call_void(MODULE, "delete", &[("domainname", domain.to_string())])
            .await
    }

    pub async fn list_records(&self, domain: &str) -> Result<Vec<DomainRecord>, GlesysError> {
        let result = self
            .client
            .call::<RecordList>(MODULE, "listrecords", &[("domainname", domain.to_string())])
            .await
            .map(|list| list.records);
        empty_on_not_found(result)
    }

    pub async fn add_record(
        &self,
        domain: &str,
        host: &str,
        record_type: &str,
        data: &str,
        ttl: Option<u32>,
    ) -> Result<DomainRecord, GlesysError> {
        let mut args = vec![
            ("domainname", domain.to_string()),
            ("host", host.to_string()),
            ("type", record_type.to_string()),
            ("data", data.to_string()),
        ];
        if let Some(ttl) = ttl {
            args.push(("ttl", ttl.to_string()));
        }
        Ok(self.client.call::<RecordBody>(MODULE, "addrecord", &args).await?.record)
    }

    pub async fn update_record(
        &self,
        record_id: &str,
        options: &UpdateRecordOptions,
    ) -> Result<DomainRecord, GlesysError> {
        let mut args = vec![("recordid", record_id.to_string())];
        args.extend(options.form_args());
        Ok(self.client.call::<RecordBody>(MODULE, "updaterecord", &args).await?.record)
    }

    pub async fn delete_record(&self, record_id: &str) -> Result<(), GlesysError> {
        self.client
            .call_void(MODULE, "deleterecord", &[("recordid", record_id.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glesys::model::Envelope;

    #[test]
    fn test_records_envelope() {
        let json = r#"{"response":{"status":{"code":200,"text":"OK"},"records":[
            {"recordid":224538,"domainname":"testglesys.example.org","host":"@","type":"NS","data":"ns1.namesystem.se.","ttl":3600},
            {"recordid":224545,"domainname":"testglesys.example.org","host":"www","type":"A","data":"127.0.0.1","ttl":3600}]}}"#;
        let envelope: Envelope<RecordList> = serde_json::from_str(json).unwrap();
        let records = envelope.response.records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].record_type, "A");
        assert_eq!(records[1].id, "224545");
    }
}
