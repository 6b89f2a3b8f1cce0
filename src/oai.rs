use anyhow::Context;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use thiserror::Error;
use tracing::info;

pub const OAI_PMH_NS: &str = "http://www.openarchives.org/OAI/2.0/";
pub const OAI_DC_PREFIX: &str = "oai_dc";

/// Namespace bindings used to resolve elements of an OAI-PMH response.
///
/// Endpoints declaring a non-standard protocol namespace can be supported
/// by swapping the binding instead of changing the parser.
#[derive(Debug, Clone)]
pub struct Namespaces {
    pub oai_pmh: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            oai_pmh: OAI_PMH_NS.to_string(),
        }
    }
}

impl Namespaces {
    fn binds_oai_pmh(&self, resolution: &ResolveResult<'_>) -> bool {
        matches!(resolution, ResolveResult::Bound(Namespace(ns)) if *ns == self.oai_pmh.as_bytes())
    }
}

#[derive(Debug, Error)]
pub enum OaiError {
    #[error("OAI request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unable to parse OAI response: {0}")]
    Parse(String),

    #[error("OAI Identify response has no {0} element")]
    MissingElement(&'static str),

    #[error("no records were returned, try setting the date range manually")]
    EmptyRange,
}

/// Repository details reported by the `Identify` verb.
#[derive(Debug, Clone)]
pub struct RepositoryIdentity {
    pub repository_name: String,
    pub granularity: String,
}

impl RepositoryIdentity {
    /// True when the advertised datestamp granularity has a time component.
    pub fn supports_time(&self) -> bool {
        self.granularity.contains("hh:mm:ss")
    }
}

pub struct OaiClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
    namespaces: Namespaces,
}

impl OaiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = reqwest::Url::parse(base_url).context("endpoint is not a valid url")?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => anyhow::bail!("endpoint must use http or https, got {other}"),
        }
        if !base_url.has_host() {
            anyhow::bail!("endpoint url is missing a host");
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            namespaces: Namespaces::default(),
        })
    }

    pub fn with_namespaces(mut self, namespaces: Namespaces) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Fetch the repository name and datestamp granularity via `Identify`.
    pub async fn identify(&self) -> Result<RepositoryIdentity, OaiError> {
        let body = self.fetch(&[("verb", "Identify")]).await?;
        parse_identify(&body, &self.namespaces)
    }

    /// Fetch the metadata field names of the first record on the first
    /// `ListRecords` page. The configured date range is not forwarded to
    /// the endpoint; any current page of records serves as the sample.
    pub async fn sample_record_fields(&self) -> Result<Vec<String>, OaiError> {
        let body = self
            .fetch(&[("verb", "ListRecords"), ("metadataPrefix", OAI_DC_PREFIX)])
            .await?;
        parse_record_fields(&body, &self.namespaces)
    }

    async fn fetch(&self, query: &[(&str, &str)]) -> Result<String, OaiError> {
        let request = self.client.get(self.base_url.clone()).query(query).build()?;
        info!("requesting {}", request.url());

        let response = self.client.execute(request).await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Extract `repositoryName` and `granularity` from an `Identify` response.
pub fn parse_identify(body: &str, namespaces: &Namespaces) -> Result<RepositoryIdentity, OaiError> {
    enum IdentifyField {
        RepositoryName,
        Granularity,
    }

    let mut reader = NsReader::from_str(body);
    let mut repository_name = None;
    let mut granularity = None;
    let mut capture = None;

    loop {
        match reader.read_resolved_event().map_err(parse_error)? {
            (resolution, Event::Start(start)) if namespaces.binds_oai_pmh(&resolution) => {
                capture = match start.local_name().as_ref() {
                    b"repositoryName" => Some(IdentifyField::RepositoryName),
                    b"granularity" => Some(IdentifyField::Granularity),
                    _ => None,
                };
            }
            (_, Event::Start(_)) => capture = None,
            (_, Event::Text(text)) => {
                if let Some(field) = &capture {
                    let decoded = text.decode().map_err(parse_error)?;
                    let value = quick_xml::escape::unescape(&decoded)
                        .map_err(parse_error)?
                        .trim()
                        .to_string();
                    match field {
                        IdentifyField::RepositoryName => repository_name = Some(value),
                        IdentifyField::Granularity => granularity = Some(value),
                    }
                }
            }
            (_, Event::End(_)) => capture = None,
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    Ok(RepositoryIdentity {
        repository_name: repository_name.ok_or(OaiError::MissingElement("repositoryName"))?,
        granularity: granularity.ok_or(OaiError::MissingElement("granularity"))?,
    })
}

/// Extract the field element names of the first record in a `ListRecords`
/// response: the children of the first child of the first `<metadata>`
/// element, with namespace prefixes stripped.
pub fn parse_record_fields(body: &str, namespaces: &Namespaces) -> Result<Vec<String>, OaiError> {
    let mut reader = NsReader::from_str(body);
    let mut fields = Vec::new();
    let mut in_metadata = false;
    let mut depth = 0usize;

    loop {
        match reader.read_resolved_event().map_err(parse_error)? {
            (resolution, Event::Start(start)) => {
                if in_metadata {
                    depth += 1;
                    if depth == 2 {
                        fields.push(local_name_of(&start));
                    }
                } else if namespaces.binds_oai_pmh(&resolution)
                    && start.local_name().as_ref() == b"metadata"
                {
                    in_metadata = true;
                    depth = 0;
                }
            }
            (_, Event::Empty(start)) if in_metadata && depth == 1 => {
                fields.push(local_name_of(&start));
            }
            (_, Event::End(_)) if in_metadata => {
                if depth <= 1 {
                    // The first record's field wrapper is exhausted
                    break;
                }
                depth -= 1;
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    if fields.is_empty() {
        return Err(OaiError::EmptyRange);
    }
    Ok(fields)
}

fn local_name_of(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn parse_error(error: impl std::fmt::Display) -> OaiError {
    OaiError::Parse(error.to_string())
}
