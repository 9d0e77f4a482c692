//! SSH key pairs.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::client::{empty_on_not_found, Ec2Client, FormRequest};
use crate::domain::KeyPair;
use crate::errors::Ec2Error;
use crate::handlers::key_pair::KeyPairHandler;
use crate::handlers::ReturnHandler;

pub struct KeyPairApi<'a> {
    client: &'a Ec2Client,
}

impl<'a> KeyPairApi<'a> {
    pub(crate) fn new(client: &'a Ec2Client) -> Self {
        Self { client }
    }

    /// Generate a key pair. The private key is only returned here.
    pub async fn create_key_pair_in_region(
        &self,
        region: Option<&str>,
        key_name: &str,
    ) -> Result<KeyPair, Ec2Error> {
        let request = FormRequest::new("CreateKeyPair").param("KeyName", key_name);
        let handler = KeyPairHandler::single(self.client.region_or_default(region));
        self.client.execute(region, request, handler).await
    }

    /// Upload the public half of an existing key, e.g. an OpenSSH
    /// `ssh-rsa AAAA...` line.
    pub async fn import_key_pair_in_region(
        &self,
        region: Option<&str>,
        key_name: &str,
        public_key_material: &str,
    ) -> Result<KeyPair, Ec2Error> {
        let request = import_key_pair_request(key_name, public_key_material);
        let handler = KeyPairHandler::single(self.client.region_or_default(region));
        self.client.execute(region, request, handler).await
    }

    pub async fn describe_key_pairs_in_region(
        &self,
        region: Option<&str>,
        key_names: &[&str],
    ) -> Result<Vec<KeyPair>, Ec2Error> {
        let request = describe_key_pairs_request(key_names);
        let handler = KeyPairHandler::new(self.client.region_or_default(region));
        empty_on_not_found(self.client.execute(region, request, handler).await)
    }

    pub async fn delete_key_pair_in_region(
        &self,
        region: Option<&str>,
        key_name: &str,
    ) -> Result<(), Ec2Error> {
        let request = FormRequest::new("DeleteKeyPair").param("KeyName", key_name);
        self.client.execute(region, request, ReturnHandler).await
    }
}

fn import_key_pair_request(key_name: &str, public_key_material: &str) -> FormRequest {
    FormRequest::new("ImportKeyPair")
        .param("KeyName", key_name)
        .param(
            "PublicKeyMaterial",
            BASE64_STANDARD.encode(public_key_material.as_bytes()),
        )
}

fn describe_key_pairs_request(key_names: &[&str]) -> FormRequest {
    FormRequest::new("DescribeKeyPairs").indexed("KeyName", key_names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_key_pair_encodes_material() {
        let request = import_key_pair_request(
            "mykey",
            "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAAAgQ admin@example.org",
        );
        assert_eq!(request.action(), "ImportKeyPair");
        assert_eq!(
            request.params()[1..],
            [
                ("KeyName".to_string(), "mykey".to_string()),
                (
                    "PublicKeyMaterial".to_string(),
                    "c3NoLXJzYSBBQUFBQjNOemFDMXljMkVBQUFBREFRQUJBQUFBZ1EgYWRtaW5AZXhhbXBsZS5vcmc="
                        .to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_describe_key_pairs_indexes_names() {
        let request = describe_key_pairs_request(&["alpha", "beta"]);
        assert_eq!(
            request.params()[1..],
            [
                ("KeyName.1".to_string(), "alpha".to_string()),
                ("KeyName.2".to_string(), "beta".to_string()),
            ]
        );
        assert_eq!(describe_key_pairs_request(&[]).params().len(), 1);
    }
}
