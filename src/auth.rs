//! AWS Signature Version 2 form signing.
//!
//! The EC2 query API authenticates `application/x-www-form-urlencoded`
//! POST bodies with an HMAC computed over the request parameters:
//! 1. Inject `SignatureMethod`, `SignatureVersion`, `Timestamp`, `Version`
//!    and `AWSAccessKeyId`
//! 2. Build the canonical form string (byte-ordered, RFC 3986 encoded)
//! 3. Build the string-to-sign from method, host, path and canonical form
//! 4. Base64-encode `HMAC-SHA256(secret, string-to-sign)` as `Signature`
//!
//! GleSYS uses plain HTTP Basic credentials; the header value is built here
//! as well so both providers share one authentication module.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::trace;

type HmacSha256 = Hmac<Sha256>;

/// Value of `SignatureMethod`.
pub const SIGNATURE_METHOD: &str = "HmacSHA256";

/// Value of `SignatureVersion`.
pub const SIGNATURE_VERSION: &str = "2";

const ACTION: &str = "Action";
const SIGNATURE: &str = "Signature";
const AWS_ACCESS_KEY_ID: &str = "AWSAccessKeyId";

/// Unreserved characters per RFC 3986 stay literal; everything else is
/// percent-encoded with uppercase hex.
const AWS_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Reasons a parameter set cannot be signed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    /// Every query API request names its operation.
    #[error("request has no Action parameter")]
    MissingAction,

    /// Callers must not pre-compute signatures.
    #[error("parameter {0} is reserved for the signer")]
    ReservedParameter(String),

    /// The endpoint URL cannot be signed against.
    #[error("endpoint {0} has no host")]
    MissingHost(String),
}

/// Signs EC2 query API form parameters with Signature Version 2.
#[derive(Clone)]
pub struct FormSigner {
    access_key: String,
    secret_key: String,
    api_version: String,
}

impl std::fmt::Debug for FormSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSigner")
            .field("access_key", &self.access_key)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl FormSigner {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            api_version: api_version.into(),
        }
    }

    /// The `Version` this signer stamps on every request.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Sign `params` for a request to `url` and return the form body.
    ///
    /// The body lists every parameter except `AWSAccessKeyId` in canonical
    /// order, `Signature` included, followed by `AWSAccessKeyId`.
    pub fn sign(
        &self,
        method: &str,
        url: &reqwest::Url,
        params: &[(String, String)],
        timestamp: &str,
    ) -> Result<String, SigningError> {
        if !params.iter().any(|(k, _)| k == ACTION) {
            return Err(SigningError::MissingAction);
        }
        if let Some((k, _)) = params.iter().find(|(k, _)| k == SIGNATURE) {
            return Err(SigningError::ReservedParameter(k.clone()));
        }

        let mut signed: Vec<(String, String)> = params
            .iter()
            .filter(|(k, _)| !is_signing_param(k))
            .cloned()
            .collect();
        signed.push(("SignatureMethod".to_string(), SIGNATURE_METHOD.to_string()));
        signed.push((
            "SignatureVersion".to_string(),
            SIGNATURE_VERSION.to_string(),
        ));
        signed.push(("Timestamp".to_string(), timestamp.to_string()));
        signed.push(("Version".to_string(), self.api_version.clone()));
        signed.push((AWS_ACCESS_KEY_ID.to_string(), self.access_key.clone()));

        let host = host_header(url).ok_or_else(|| SigningError::MissingHost(url.to_string()))?;
        let canonical = build_canonical_form_string(&signed);
        let string_to_sign = build_string_to_sign(method, &host, url.path(), &canonical);
        trace!(string_to_sign = %string_to_sign, "signing request");
        let signature = compute_signature(&self.secret_key, &string_to_sign);

        signed.retain(|(k, _)| k != AWS_ACCESS_KEY_ID);
        signed.push((SIGNATURE.to_string(), signature));
        signed.sort();

        let mut body = encode_pairs(&signed);
        body.push('&');
        body.push_str(AWS_ACCESS_KEY_ID);
        body.push('=');
        body.push_str(&aws_uri_encode(&self.access_key));
        Ok(body)
    }
}

/// Parameters the signer owns and overwrites.
fn is_signing_param(name: &str) -> bool {
    matches!(
        name,
        "SignatureMethod" | "SignatureVersion" | "Timestamp" | "Version" | AWS_ACCESS_KEY_ID
    )
}

// ── Canonicalization ────────────────────────────────────────────────

/// RFC 3986 encoding as required by Signature Version 2.
///
/// - Characters A-Z, a-z, 0-9, -, _, ., ~ are NOT encoded.
/// - All other bytes are percent-encoded with uppercase hex, `/` included.
pub fn aws_uri_encode(input: &str) -> String {
    utf8_percent_encode(input, AWS_ENCODE_SET).to_string()
}

/// Build the canonical form string.
///
/// Parameters are sorted by name, then value, in byte order. Names and
/// values are encoded with [`aws_uri_encode`] and joined as `k=v` pairs
/// separated by `&`. `Signature` never takes part.
pub fn build_canonical_form_string(params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> =
        params.iter().filter(|(k, _)| k != SIGNATURE).collect();
    sorted.sort();
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", aws_uri_encode(k), aws_uri_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the string to sign.
///
/// ```text
/// HTTPVerb + '\n' +
/// ValueOfHostHeaderInLowercase + '\n' +
/// HTTPRequestURI + '\n' +
/// CanonicalizedFormString
/// ```
pub fn build_string_to_sign(method: &str, host: &str, path: &str, canonical: &str) -> String {
    let path = if path.is_empty() { "/" } else { path };
    format!(
        "{}\n{}\n{}\n{}",
        method.to_uppercase(),
        host.to_lowercase(),
        path,
        canonical
    )
}

/// Compute the signature: Base64(HMAC-SHA256(secret, StringToSign)).
pub fn compute_signature(secret_key: &str, string_to_sign: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(string_to_sign.as_bytes());
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Format a `Timestamp` parameter: ISO 8601 UTC with milliseconds.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Value of the `Host` header for `url`, including any non-default port.
pub fn host_header(url: &reqwest::Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

// ── Verification ────────────────────────────────────────────────────

/// Verify a signed form body, as an EC2 endpoint would.
///
/// Returns false when the body carries no signature or the recomputed
/// signature differs.
pub fn verify_form_signature(method: &str, host: &str, path: &str, body: &str, secret_key: &str) -> bool {
    let params = parse_form(body);
    let provided = match params.iter().find(|(k, _)| k == SIGNATURE) {
        Some((_, v)) => v.clone(),
        None => return false,
    };
    let canonical = build_canonical_form_string(&params);
    let string_to_sign = build_string_to_sign(method, host, path, &canonical);
    let computed = compute_signature(secret_key, &string_to_sign);
    constant_time_eq(&computed, &provided)
}

/// Compare two signature strings in constant time.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Decode a form body into (name, value) pairs, preserving order.
pub fn parse_form(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((k, v)) => (form_decode(k), form_decode(v)),
            None => (form_decode(part), String::new()),
        })
        .collect()
}

fn form_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_decode_str(&s).decode_utf8_lossy().into_owned()
}

/// Encode pairs as a form body without reordering them.
pub fn encode_pairs(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", aws_uri_encode(k), aws_uri_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// ── Basic auth ──────────────────────────────────────────────────────

/// `Authorization` header value for HTTP Basic credentials.
pub fn basic_authorization(identity: &str, credential: &str) -> String {
    format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{identity}:{credential}"))
    )
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESTAMP: &str = "2009-11-08T15:54:08.897Z";

    fn endpoint() -> reqwest::Url {
        reqwest::Url::parse("https://ec2.us-east-1.amazonaws.com/").unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ── aws_uri_encode ──────────────────────────────────────────────

    #[test]
    fn test_uri_encode_unreserved() {
        assert_eq!(aws_uri_encode("A-Z_a-z.0~9"), "A-Z_a-z.0~9");
    }

    #[test]
    fn test_uri_encode_reserved() {
        assert_eq!(aws_uri_encode("/dev/sda1"), "%2Fdev%2Fsda1");
        assert_eq!(aws_uri_encode("a b+c=d"), "a%20b%2Bc%3Dd");
        assert_eq!(aws_uri_encode("15:54"), "15%3A54");
    }

    #[test]
    fn test_uri_encode_multibyte() {
        assert_eq!(aws_uri_encode("é"), "%C3%A9");
    }

    // ── canonical form ──────────────────────────────────────────────

    #[test]
    fn test_canonical_form_is_byte_ordered() {
        let canonical = build_canonical_form_string(&params(&[
            ("Version", "2010-06-15"),
            ("Action", "DescribeImages"),
            ("AWSAccessKeyId", "identity"),
        ]));
        // Uppercase 'W' sorts before lowercase 'c'.
        assert_eq!(
            canonical,
            "AWSAccessKeyId=identity&Action=DescribeImages&Version=2010-06-15"
        );
    }

    #[test]
    fn test_canonical_form_excludes_signature() {
        let canonical =
            build_canonical_form_string(&params(&[("Signature", "abc"), ("Action", "X")]));
        assert_eq!(canonical, "Action=X");
    }

    #[test]
    fn test_string_to_sign_layout() {
        let sts = build_string_to_sign("post", "EC2.Amazonaws.com", "", "Action=X");
        assert_eq!(sts, "POST\nec2.amazonaws.com\n/\nAction=X");
    }

    #[test]
    fn test_format_timestamp_millis() {
        let time = DateTime::parse_from_rfc3339("2009-11-08T15:54:08.897Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(time), TIMESTAMP);
    }

    #[test]
    fn test_host_header_keeps_port() {
        let url = reqwest::Url::parse("http://127.0.0.1:8773/services/Cloud").unwrap();
        assert_eq!(host_header(&url).unwrap(), "127.0.0.1:8773");
        assert_eq!(host_header(&endpoint()).unwrap(), "ec2.us-east-1.amazonaws.com");
    }

    // ── published vectors ───────────────────────────────────────────

    #[test]
    fn test_sign_create_image() {
        let signer = FormSigner::new("identity", "credential", "2010-06-15");
        let body = signer
            .sign(
                "POST",
                &endpoint(),
                &params(&[
                    ("Action", "CreateImage"),
                    ("Name", "name"),
                    ("InstanceId", "instanceId"),
                ]),
                TIMESTAMP,
            )
            .unwrap();
        assert_eq!(
            body,
            "Action=CreateImage&InstanceId=instanceId&Name=name\
             &Signature=hBIUf4IUOiCKGQKehaNwwbZUjRN4NC4RSNfJ%2B8kvJdY%3D\
             &SignatureMethod=HmacSHA256&SignatureVersion=2\
             &Timestamp=2009-11-08T15%3A54%3A08.897Z&Version=2010-06-15\
             &AWSAccessKeyId=identity"
        );
    }

    #[test]
    fn test_sign_describe_volumes() {
        let signer = FormSigner::new("identity", "credential", "2010-06-15");
        let body = signer
            .sign("POST", &endpoint(), &params(&[("Action", "DescribeVolumes")]), TIMESTAMP)
            .unwrap();
        assert!(body.contains("Signature=hNuorhZQS%2BThX5dWXOvBkvnmTpgp6SvwHmgzjjfKyG8%3D"));
    }

    #[test]
    fn test_sign_cidr_ingress_encodes_slash() {
        let signer = FormSigner::new("identity", "credential", "2010-06-15");
        let body = signer
            .sign(
                "POST",
                &endpoint(),
                &params(&[
                    ("Action", "AuthorizeSecurityGroupIngress"),
                    ("GroupName", "group"),
                    ("IpProtocol", "tcp"),
                    ("FromPort", "6000"),
                    ("ToPort", "7000"),
                    ("CidrIp", "0.0.0.0/0"),
                ]),
                TIMESTAMP,
            )
            .unwrap();
        assert!(body.contains("CidrIp=0.0.0.0%2F0"));
        assert!(body.contains("Signature=6NQega9YUGDxdwk3Y0Hv71u%2FlHi%2B0D6qMCJLpJVD%2FaI%3D"));
    }

    #[test]
    fn test_sign_block_device_mapping_newer_version() {
        let signer = FormSigner::new("identity", "credential", "2011-05-15");
        let body = signer
            .sign(
                "POST",
                &endpoint(),
                &params(&[
                    ("Action", "ModifyInstanceAttribute"),
                    ("InstanceId", "1"),
                    ("BlockDeviceMapping.1.Ebs.VolumeId", "vol-test1"),
                    ("BlockDeviceMapping.1.DeviceName", "/dev/sda1"),
                    ("BlockDeviceMapping.1.Ebs.DeleteOnTermination", "true"),
                ]),
                TIMESTAMP,
            )
            .unwrap();
        assert_eq!(
            body,
            "Action=ModifyInstanceAttribute&BlockDeviceMapping.1.DeviceName=%2Fdev%2Fsda1\
             &BlockDeviceMapping.1.Ebs.DeleteOnTermination=true\
             &BlockDeviceMapping.1.Ebs.VolumeId=vol-test1&InstanceId=1\
             &Signature=qqJpPk8UmhPY9Jica0JSADEZiY3eHf9WETm%2B5tLT0NE%3D\
             &SignatureMethod=HmacSHA256&SignatureVersion=2\
             &Timestamp=2009-11-08T15%3A54%3A08.897Z&Version=2011-05-15\
             &AWSAccessKeyId=identity"
        );
    }

    #[test]
    fn test_sign_replaces_caller_timestamp_and_version() {
        let signer = FormSigner::new("identity", "credential", "2010-06-15");
        let body = signer
            .sign(
                "POST",
                &endpoint(),
                &params(&[
                    ("Action", "DescribeVolumes"),
                    ("Timestamp", "1999-01-01T00:00:00.000Z"),
                    ("Version", "1999-01-01"),
                ]),
                TIMESTAMP,
            )
            .unwrap();
        assert!(!body.contains("1999"));
        assert!(body.contains("Signature=hNuorhZQS%2BThX5dWXOvBkvnmTpgp6SvwHmgzjjfKyG8%3D"));
    }

    #[test]
    fn test_sign_requires_action() {
        let signer = FormSigner::new("identity", "credential", "2010-06-15");
        let result = signer.sign("POST", &endpoint(), &params(&[("ImageId", "ami-1")]), TIMESTAMP);
        assert_eq!(result, Err(SigningError::MissingAction));
    }

    #[test]
    fn test_sign_rejects_presigned() {
        let signer = FormSigner::new("identity", "credential", "2010-06-15");
        let result = signer.sign(
            "POST",
            &endpoint(),
            &params(&[("Action", "DescribeImages"), ("Signature", "forged")]),
            TIMESTAMP,
        );
        assert_eq!(
            result,
            Err(SigningError::ReservedParameter("Signature".to_string()))
        );
    }

    // ── verification ────────────────────────────────────────────────

    #[test]
    fn test_verify_roundtrip() {
        let signer = FormSigner::new("identity", "credential", "2011-05-15");
        let body = signer
            .sign(
                "POST",
                &endpoint(),
                &params(&[("Action", "DescribeTags"), ("Filter.1.Name", "key")]),
                TIMESTAMP,
            )
            .unwrap();
        assert!(verify_form_signature(
            "POST",
            "ec2.us-east-1.amazonaws.com",
            "/",
            &body,
            "credential"
        ));
        assert!(!verify_form_signature(
            "POST",
            "ec2.us-east-1.amazonaws.com",
            "/",
            &body,
            "wrong"
        ));
        assert!(!verify_form_signature(
            "POST",
            "ec2.eu-west-1.amazonaws.com",
            "/",
            &body,
            "credential"
        ));
    }

    #[test]
    fn test_verify_unsigned_body() {
        assert!(!verify_form_signature("POST", "h", "/", "Action=X", "s"));
    }

    #[test]
    fn test_parse_form_decodes() {
        let parsed = parse_form("Value=dGVzdA%3D%3D&Name=a+b&Flag");
        assert_eq!(
            parsed,
            params(&[("Value", "dGVzdA=="), ("Name", "a b"), ("Flag", "")])
        );
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc123", "abc123"));
        assert!(!constant_time_eq("abc123", "abc124"));
        assert!(!constant_time_eq("abc", "abcd"));
    }

    // ── basic auth ──────────────────────────────────────────────────

    #[test]
    fn test_basic_authorization() {
        assert_eq!(
            basic_authorization("identity", "credential"),
            "Basic aWRlbnRpdHk6Y3JlZGVudGlhbA=="
        );
    }
}
