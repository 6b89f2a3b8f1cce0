#![allow(dead_code)]

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

pub const DEFAULT_REPOSITORY_NAME: &str = "Test Repo";
pub const DATE_GRANULARITY: &str = "YYYY-MM-DD";
pub const TIME_GRANULARITY: &str = "YYYY-MM-DDThh:mm:ssZ";

static TEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

#[derive(Clone)]
pub struct MockOaiConfig {
    pub repository_name: String,
    pub granularity: String,
    pub record_fields: Vec<String>,
}

impl MockOaiConfig {
    pub fn new(granularity: &str, record_fields: &[&str]) -> Self {
        Self {
            repository_name: DEFAULT_REPOSITORY_NAME.to_string(),
            granularity: granularity.to_string(),
            record_fields: record_fields.iter().map(ToString::to_string).collect(),
        }
    }
}

pub struct MockOaiServer {
    pub endpoint: String,
    handle: JoinHandle<()>,
}

impl Drop for MockOaiServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn create_temp_dir(name: &str) -> anyhow::Result<PathBuf> {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = env::temp_dir().join(format!("harvester-gen-{name}-{id}"));
    fs::create_dir_all(&path)?;
    Ok(path)
}

pub async fn start_mock_oai_server(config: MockOaiConfig) -> anyhow::Result<MockOaiServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    let endpoint = format!("http://{}", address);
    let endpoint_for_task = endpoint.clone();
    let shared_config = Arc::new(config);

    let handle = tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(value) => value,
                Err(_) => break,
            };
            let endpoint = endpoint_for_task.clone();
            let config = shared_config.clone();
            tokio::spawn(async move {
                if let Err(error) = handle_connection(&mut socket, &endpoint, &config).await {
                    eprintln!("mock OAI server request handling failed: {}", error);
                }
            });
        }
    });

    Ok(MockOaiServer { endpoint, handle })
}

async fn handle_connection(
    socket: &mut TcpStream,
    endpoint: &str,
    config: &MockOaiConfig,
) -> anyhow::Result<()> {
    let mut buf = vec![0u8; 8192];
    let mut total = 0usize;

    loop {
        let bytes_read = socket.read(&mut buf[total..]).await?;
        if bytes_read == 0 {
            return Ok(());
        }
        total += bytes_read;
        if buf[..total].windows(4).any(|window| window == b"\r\n\r\n") {
            break;
        }
        if total == buf.len() {
            break;
        }
    }

    let request = String::from_utf8_lossy(&buf[..total]);
    let request_line = request.lines().next().unwrap_or_default();
    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let params = parse_query_params(path);
    let body = build_oai_response(endpoint, config, &params);
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );

    socket.write_all(response.as_bytes()).await?;
    Ok(())
}

fn parse_query_params(path: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let query = path.split_once('?').map(|(_, query)| query).unwrap_or("");
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(key.to_string(), value.to_string());
    }
    params
}

fn build_oai_response(
    endpoint: &str,
    config: &MockOaiConfig,
    params: &HashMap<String, String>,
) -> String {
    match params.get("verb").map(|value| value.as_str()) {
        Some("Identify") => identify_response(endpoint, config),
        Some("ListRecords") => list_records_response(endpoint, config),
        _ => error_response(endpoint, params, "badVerb", "Unknown or missing verb"),
    }
}

fn identify_response(endpoint: &str, config: &MockOaiConfig) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <responseDate>2026-08-05T00:00:00Z</responseDate>
  <request verb="Identify">{endpoint}</request>
  <Identify>
    <repositoryName>{name}</repositoryName>
    <baseURL>{endpoint}</baseURL>
    <protocolVersion>2.0</protocolVersion>
    <adminEmail>integration@example.com</adminEmail>
    <earliestDatestamp>2026-01-01</earliestDatestamp>
    <deletedRecord>persistent</deletedRecord>
    <granularity>{granularity}</granularity>
  </Identify>
</OAI-PMH>"#,
        name = config.repository_name,
        granularity = config.granularity,
    )
}

fn list_records_response(endpoint: &str, config: &MockOaiConfig) -> String {
    if config.record_fields.is_empty() {
        return format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <responseDate>2026-08-05T00:00:00Z</responseDate>
  <request verb="ListRecords" metadataPrefix="oai_dc">{endpoint}</request>
  <error code="noRecordsMatch">No matching records in this repository</error>
</OAI-PMH>"#
        );
    }

    let field_xml = config
        .record_fields
        .iter()
        .map(|field| format!("<dc:{field}>sample value</dc:{field}>"))
        .collect::<Vec<_>>()
        .join("");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <responseDate>2026-08-05T00:00:00Z</responseDate>
  <request verb="ListRecords" metadataPrefix="oai_dc">{endpoint}</request>
  <ListRecords>
    <record>
      <header>
        <identifier>oai:test:record-1</identifier>
        <datestamp>2026-08-03</datestamp>
      </header>
      <metadata>
        <oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/"
                   xmlns:dc="http://purl.org/dc/elements/1.1/">{field_xml}</oai_dc:dc>
      </metadata>
    </record>
  </ListRecords>
</OAI-PMH>"#
    )
}

fn error_response(
    endpoint: &str,
    params: &HashMap<String, String>,
    code: &str,
    message: &str,
) -> String {
    let verb = params.get("verb").map(String::as_str).unwrap_or("Unknown");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/">
  <responseDate>2026-08-05T00:00:00Z</responseDate>
  <request verb="{verb}">{endpoint}</request>
  <error code="{code}">{message}</error>
</OAI-PMH>"#
    )
}
