//! End-to-end EC2 client tests against an in-process mock endpoint.
//!
//! The mock checks every request's Signature Version 2 signature with the
//! shared secret before replaying a canned response for its `Action`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;

use cloudapi::auth::{parse_form, verify_form_signature};
use cloudapi::config::{Config, CredentialsConfig, Ec2Config, HttpConfig};
use cloudapi::domain::{SpotInstanceState, VolumeStatus};
use cloudapi::options::{DescribeImagesOptions, DescribeRegionsOptions, DetachVolumeOptions};
use cloudapi::{Ec2Client, Ec2Error};

const SECRET: &str = "credential";

#[derive(Default)]
struct MockEc2 {
    /// Responses per action; the last one repeats.
    script: Mutex<HashMap<String, Vec<(StatusCode, String)>>>,
    requests: Mutex<Vec<Vec<(String, String)>>>,
}

impl MockEc2 {
    fn respond(&self, action: &str, status: StatusCode, body: &str) {
        self.script
            .lock()
            .unwrap()
            .entry(action.to_string())
            .or_default()
            .push((status, body.to_string()));
    }

    fn calls(&self, action: &str) -> Vec<Vec<(String, String)>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|params| params.iter().any(|(k, v)| k == "Action" && v == action))
            .cloned()
            .collect()
    }
}

fn error_document(code: &str, message: &str) -> String {
    format!(
        "<Response><Errors><Error><Code>{code}</Code><Message>{message}</Message></Error></Errors>\
         <RequestID>req-1</RequestID></Response>"
    )
}

async fn handle(
    State(mock): State<Arc<MockEc2>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !verify_form_signature("POST", &host, "/", &body, SECRET) {
        return (
            StatusCode::UNAUTHORIZED,
            error_document("AuthFailure", "signature mismatch"),
        );
    }
    let params = parse_form(&body);
    let action = params
        .iter()
        .find(|(k, _)| k == "Action")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    mock.requests.lock().unwrap().push(params);

    let mut script = mock.script.lock().unwrap();
    match script.get_mut(&action) {
        Some(responses) if responses.len() > 1 => responses.remove(0),
        Some(responses) if !responses.is_empty() => responses[0].clone(),
        _ => (
            StatusCode::BAD_REQUEST,
            error_document("InvalidAction", "unexpected action"),
        ),
    }
}

async fn start(mock: Arc<MockEc2>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/", post(handle)).with_state(mock);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(endpoint: &str, secret: &str) -> Config {
    Config {
        credentials: CredentialsConfig {
            access_key: "identity".to_string(),
            secret_key: secret.to_string(),
        },
        ec2: Ec2Config {
            endpoint: endpoint.to_string(),
            regions: BTreeMap::from([("us-east-1".to_string(), endpoint.to_string())]),
            ..Default::default()
        },
        http: HttpConfig {
            max_retries: 2,
            retry_base_delay_ms: 1,
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn client_with(mock: &Arc<MockEc2>) -> Ec2Client {
    let endpoint = start(mock.clone()).await;
    Ec2Client::new(&config(&endpoint, SECRET)).unwrap()
}

const DESCRIBE_VOLUMES: &str = r#"<DescribeVolumesResponse xmlns="http://ec2.amazonaws.com/doc/2011-05-15/">
  <requestId>1</requestId>
  <volumeSet>
    <item>
      <volumeId>vol-2a21e543</volumeId>
      <size>1</size>
      <snapshotId/>
      <availabilityZone>us-east-1a</availabilityZone>
      <status>available</status>
      <createTime>2009-12-28T05:42:53.000Z</createTime>
      <attachmentSet/>
    </item>
  </volumeSet>
</DescribeVolumesResponse>"#;

#[tokio::test]
async fn test_describe_volumes_is_signed_and_parsed() {
    let mock = Arc::new(MockEc2::default());
    mock.respond("DescribeVolumes", StatusCode::OK, DESCRIBE_VOLUMES);
    let client = client_with(&mock).await;

    let volumes = client
        .ebs()
        .describe_volumes_in_region(None, &["vol-2a21e543"])
        .await
        .unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].id, "vol-2a21e543");
    assert_eq!(volumes[0].status, VolumeStatus::Available);
    assert_eq!(volumes[0].region, "us-east-1");

    let calls = mock.calls("DescribeVolumes");
    assert_eq!(calls.len(), 1);
    let params = &calls[0];
    assert!(params.contains(&("VolumeId.1".to_string(), "vol-2a21e543".to_string())));
    assert!(params.contains(&("Version".to_string(), "2011-05-15".to_string())));
    assert!(params.contains(&("SignatureVersion".to_string(), "2".to_string())));
    assert_eq!(
        params.last(),
        Some(&("AWSAccessKeyId".to_string(), "identity".to_string()))
    );
}

#[tokio::test]
async fn test_create_volume_routes_by_zone() {
    let mock = Arc::new(MockEc2::default());
    mock.respond(
        "CreateVolume",
        StatusCode::OK,
        "<CreateVolumeResponse><requestId>1</requestId><volumeId>vol-9</volumeId><size>5</size>\
         <snapshotId/><availabilityZone>us-east-1b</availabilityZone><status>creating</status>\
         </CreateVolumeResponse>",
    );
    let client = client_with(&mock).await;

    let volume = client
        .ebs()
        .create_volume_in_availability_zone("us-east-1b", 5)
        .await
        .unwrap();
    assert_eq!(volume.id, "vol-9");
    assert_eq!(volume.status, VolumeStatus::Creating);
    let params = &mock.calls("CreateVolume")[0];
    assert!(params.contains(&("AvailabilityZone".to_string(), "us-east-1b".to_string())));
    assert!(params.contains(&("Size".to_string(), "5".to_string())));
}

#[tokio::test]
async fn test_describe_images_not_found_is_empty() {
    let mock = Arc::new(MockEc2::default());
    mock.respond(
        "DescribeImages",
        StatusCode::BAD_REQUEST,
        &error_document("InvalidAMIID.NotFound", "The AMI ID 'ami-1' does not exist"),
    );
    let client = client_with(&mock).await;

    let options = DescribeImagesOptions::new().image_ids(["ami-1"]);
    let images = client.ami().describe_images(None, &options).await.unwrap();
    assert!(images.is_empty());
    assert_eq!(mock.calls("DescribeImages").len(), 1);
}

#[tokio::test]
async fn test_throttling_is_retried_with_fresh_signature() {
    let mock = Arc::new(MockEc2::default());
    mock.respond(
        "DescribeRegions",
        StatusCode::SERVICE_UNAVAILABLE,
        &error_document("RequestLimitExceeded", "slow down"),
    );
    mock.respond(
        "DescribeRegions",
        StatusCode::OK,
        "<DescribeRegionsResponse><requestId>1</requestId><regionInfo>\
         <item><regionName>eu-west-1</regionName><regionEndpoint>ec2.eu-west-1.amazonaws.com</regionEndpoint></item>\
         </regionInfo></DescribeRegionsResponse>",
    );
    let client = client_with(&mock).await;

    let regions = client
        .availability_zones()
        .describe_regions(&DescribeRegionsOptions::new())
        .await
        .unwrap();
    assert_eq!(regions["eu-west-1"], "https://ec2.eu-west-1.amazonaws.com");
    assert_eq!(mock.calls("DescribeRegions").len(), 2);
}

#[tokio::test]
async fn test_wrong_secret_is_auth_failure() {
    let mock = Arc::new(MockEc2::default());
    mock.respond("DescribeVolumes", StatusCode::OK, DESCRIBE_VOLUMES);
    let endpoint = start(mock.clone()).await;
    let client = Ec2Client::new(&config(&endpoint, "not-the-secret")).unwrap();

    let err = client
        .ebs()
        .describe_volumes_in_region(None, &[])
        .await
        .unwrap_err();
    assert_eq!(err.code(), "AuthFailure");
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(!err.is_retryable());
    assert!(mock.calls("DescribeVolumes").is_empty());
}

#[tokio::test]
async fn test_detach_already_available_volume_succeeds() {
    let mock = Arc::new(MockEc2::default());
    mock.respond(
        "DetachVolume",
        StatusCode::BAD_REQUEST,
        &error_document("IncorrectState", "Volume 'vol-1' is in the 'available' state."),
    );
    let client = client_with(&mock).await;

    client
        .ebs()
        .detach_volume_in_region(None, "vol-1", true, &DetachVolumeOptions::new())
        .await
        .unwrap();
    let params = &mock.calls("DetachVolume")[0];
    assert!(params.contains(&("Force".to_string(), "true".to_string())));
}

#[tokio::test]
async fn test_other_api_errors_surface() {
    let mock = Arc::new(MockEc2::default());
    mock.respond(
        "DeleteVolume",
        StatusCode::BAD_REQUEST,
        &error_document("VolumeInUse", "vol-1 is attached"),
    );
    let client = client_with(&mock).await;

    let err = client
        .ebs()
        .delete_volume_in_region(None, "vol-1")
        .await
        .unwrap_err();
    match err {
        Ec2Error::Api {
            code, request_id, ..
        } => {
            assert_eq!(code, "VolumeInUse");
            assert_eq!(request_id.as_deref(), Some("req-1"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_request_spot_instance_round_trip() {
    let mock = Arc::new(MockEc2::default());
    mock.respond(
        "RequestSpotInstances",
        StatusCode::OK,
        r#"<RequestSpotInstancesResponse xmlns="http://ec2.amazonaws.com/doc/2011-05-15/">
  <requestId>1</requestId>
  <spotInstanceRequestSet>
    <item>
      <spotInstanceRequestId>sir-1ede0012</spotInstanceRequestId>
      <spotPrice>0.010000</spotPrice>
      <type>one-time</type>
      <state>open</state>
      <launchSpecification><imageId>ami-voo</imageId><instanceType>m1.small</instanceType></launchSpecification>
      <createTime>2011-03-08T03:30:36.000Z</createTime>
      <productDescription>Linux/UNIX</productDescription>
    </item>
  </spotInstanceRequestSet>
</RequestSpotInstancesResponse>"#,
    );
    let client = client_with(&mock).await;

    let requests = client
        .spot_instances()
        .request_spot_instance_in_region(None, 0.01, "ami-voo", "m1.small")
        .await
        .unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, "sir-1ede0012");
    assert_eq!(requests[0].state, SpotInstanceState::Open);
    assert_eq!(requests[0].region, "us-east-1");

    let params = &mock.calls("RequestSpotInstances")[0];
    assert!(params.contains(&("SpotPrice".to_string(), "0.01".to_string())));
    assert!(params.contains(&(
        "LaunchSpecification.ImageId".to_string(),
        "ami-voo".to_string()
    )));
    assert!(!params.iter().any(|(k, _)| k == "InstanceCount"));
}

#[tokio::test]
async fn test_key_pair_round_trip() {
    let mock = Arc::new(MockEc2::default());
    mock.respond(
        "ImportKeyPair",
        StatusCode::OK,
        "<ImportKeyPairResponse><requestId>1</requestId><keyName>mykey</keyName>\
         <keyFingerprint>1f:51:ae:28:bf:89:e9:d8:1f:25:5d:37:2d:7d:b8:ca:9f:f5:f1:6f</keyFingerprint>\
         </ImportKeyPairResponse>",
    );
    mock.respond(
        "DescribeKeyPairs",
        StatusCode::OK,
        "<DescribeKeyPairsResponse><requestId>1</requestId><keySet>\
         <item><keyName>mykey</keyName><keyFingerprint>1f:51</keyFingerprint></item>\
         </keySet></DescribeKeyPairsResponse>",
    );
    let client = client_with(&mock).await;

    let imported = client
        .key_pairs()
        .import_key_pair_in_region(None, "mykey", "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAAAgQ admin@example.org")
        .await
        .unwrap();
    assert_eq!(imported.key_name, "mykey");
    assert_eq!(imported.key_material, None);
    let params = &mock.calls("ImportKeyPair")[0];
    assert!(params.contains(&(
        "PublicKeyMaterial".to_string(),
        "c3NoLXJzYSBBQUFBQjNOemFDMXljMkVBQUFBREFRQUJBQUFBZ1EgYWRtaW5AZXhhbXBsZS5vcmc=".to_string()
    )));

    let pairs = client
        .key_pairs()
        .describe_key_pairs_in_region(None, &["mykey"])
        .await
        .unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].key_fingerprint.as_deref(), Some("1f:51"));
    assert!(mock.calls("DescribeKeyPairs")[0]
        .contains(&("KeyName.1".to_string(), "mykey".to_string())));
}
