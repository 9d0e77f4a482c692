use serde::Serialize;

/// An SSH key pair registered with EC2.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    pub region: String,
    pub key_name: String,
    pub key_fingerprint: Option<String>,
    /// Unencrypted PEM private key; only returned by CreateKeyPair.
    pub key_material: Option<String>,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("region", &self.region)
            .field("key_name", &self.key_name)
            .field("key_fingerprint", &self.key_fingerprint)
            .field(
                "key_material",
                &self.key_material.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
