//! Integration tests for value resolution using wiremock and tempfile

use azure_paramgen::config::Cli;
use azure_paramgen::output::OUTPUT_FILE;
use azure_paramgen::resolve::CLOUD_CONFIG_TEMPLATE;
use azure_paramgen::{ParamGenError, ParameterSet, Resolver, generate};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DISCOVERY_URL: &str = "https://discovery.etcd.io/new/abc123";

fn write_ssh_key(home: &Path, content: &str) {
    fs::create_dir_all(home.join(".ssh")).unwrap();
    fs::write(home.join(".ssh/id_rsa.pub"), content).unwrap();
}

fn resolver(server: &MockServer, dir: &Path) -> Resolver {
    Resolver::new()
        .unwrap()
        .with_discovery_endpoint(format!("{}/new", server.uri()))
        .with_template_path(dir.join(CLOUD_CONFIG_TEMPLATE))
        .with_home_dir(dir.join("home"))
}

fn prefilled() -> ParameterSet {
    let mut params = Cli::try_from_args(["azure-paramgen"]).unwrap().parameters();
    params.ssh_key_data.value = "ssh-rsa AAAA prefilled".to_string();
    params.discovery_url.value = DISCOVERY_URL.to_string();
    params.custom_data.value = STANDARD.encode("#cloud-config\n");
    params
}

/// Test all three fields are resolved in order
#[tokio::test]
async fn test_resolve_all_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .and(query_param("size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DISCOVERY_URL))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    write_ssh_key(&dir.path().join("home"), "ssh-rsa AAAAB3NzaC1yc2E user@host\n");
    fs::write(
        dir.path().join(CLOUD_CONFIG_TEMPLATE),
        "nodes: {{.NumberOfNodes.Value}}\ndiscovery: {{.DiscoveryUrl.Value}}\nkey: {{.SshKeyData.Value}}",
    )
    .unwrap();

    let params = Cli::try_from_args(["azure-paramgen", "-numberOfNodes", "5"])
        .unwrap()
        .parameters();
    let params = resolver(&mock_server, dir.path())
        .resolve(params)
        .await
        .unwrap();

    assert_eq!(params.ssh_key_data.value, "ssh-rsa AAAAB3NzaC1yc2E user@host");
    assert_eq!(params.discovery_url.value, DISCOVERY_URL);

    let decoded = STANDARD.decode(&params.custom_data.value).unwrap();
    assert_eq!(
        String::from_utf8(decoded).unwrap(),
        format!(
            "nodes: 5\ndiscovery: {}\nkey: ssh-rsa AAAAB3NzaC1yc2E user@host",
            DISCOVERY_URL
        )
    );
}

/// Test that pre-filled fields skip every resolution step
#[tokio::test]
async fn test_resolve_skips_prefilled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unexpected"))
        .expect(0)
        .mount(&mock_server)
        .await;

    // No ssh key and no template on disk
    let dir = TempDir::new().unwrap();
    let params = prefilled();

    let resolved = resolver(&mock_server, dir.path())
        .resolve(params.clone())
        .await
        .unwrap();

    assert_eq!(resolved, params);
}

/// Test discovery service failure
#[tokio::test]
async fn test_discovery_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    write_ssh_key(&dir.path().join("home"), "ssh-rsa AAAA\n");

    let mut params = prefilled();
    params.discovery_url.value.clear();

    let result = resolver(&mock_server, dir.path()).resolve(params).await;
    assert!(matches!(result, Err(ParamGenError::Discovery(_))));
}

/// Test the discovery body is stored verbatim, even when empty
#[tokio::test]
async fn test_discovery_body_verbatim() {
    let dir = TempDir::new().unwrap();

    for body in ["", "https://discovery.etcd.io/new/abc123\n"] {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut params = prefilled();
        params.discovery_url.value.clear();

        let resolved = resolver(&mock_server, dir.path())
            .resolve(params)
            .await
            .unwrap();
        assert_eq!(resolved.discovery_url.value, body);
    }
}

/// Test discovery service unreachable
#[tokio::test]
async fn test_discovery_unreachable() {
    let dir = TempDir::new().unwrap();

    let mut params = prefilled();
    params.discovery_url.value.clear();

    let resolver = Resolver::new()
        .unwrap()
        .with_discovery_endpoint("http://127.0.0.1:1/new")
        .with_home_dir(dir.path());

    let result = resolver.resolve(params).await;
    assert!(matches!(result, Err(ParamGenError::Discovery(_))));
}

/// Test missing ssh key is fatal
#[tokio::test]
async fn test_missing_ssh_key() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut params = prefilled();
    params.ssh_key_data.value.clear();

    let result = resolver(&mock_server, dir.path()).resolve(params).await;
    assert!(matches!(result, Err(ParamGenError::SshKey { .. })));
}

/// Test that a missing template leaves an existing output file untouched
#[tokio::test]
async fn test_missing_template_writes_nothing() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join(OUTPUT_FILE);
    fs::write(&output, "previous run").unwrap();

    let mut params = prefilled();
    params.custom_data.value.clear();

    let result = generate(params, &resolver(&mock_server, dir.path()), &output).await;

    assert!(matches!(result, Err(ParamGenError::TemplateLoad { .. })));
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous run");
}

/// Test that a missing template does not create the output file
#[tokio::test]
async fn test_missing_template_creates_no_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join(OUTPUT_FILE);

    let mut params = prefilled();
    params.custom_data.value.clear();

    let result = generate(params, &resolver(&mock_server, dir.path()), &output).await;

    assert!(result.is_err());
    assert!(!output.exists());
}

/// Test two runs with pre-filled values produce identical files
#[tokio::test]
async fn test_generate_idempotent() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let resolver = resolver(&mock_server, dir.path());

    generate(prefilled(), &resolver, &first).await.unwrap();
    generate(prefilled(), &resolver, &second).await.unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

/// Test default flag values end up in the written document
#[tokio::test]
async fn test_generate_defaults() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join(OUTPUT_FILE);

    generate(prefilled(), &resolver(&mock_server, dir.path()), &output)
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&fs::read(&output).unwrap()).unwrap();
    let params = &json["parameters"];

    assert_eq!(
        json["$schema"],
        "http://schema.management.azure.com/schemas/2015-01-01/deploymentParameters.json#"
    );
    assert_eq!(json["contentVersion"], "1.0.0.0");
    assert_eq!(params["location"]["value"], "West US");
    assert_eq!(params["newStorageAccountName"]["value"], "costorageaccountre");
    assert_eq!(params["adminUserName"]["value"], "core");
    assert_eq!(params["numberOfNodes"]["value"], 3);
    assert_eq!(params["vmNamePrefix"]["value"], "core");
    assert_eq!(params["vmSize"]["value"], "core");
    assert_eq!(params["discoveryUrl"]["value"], DISCOVERY_URL);
}
