use std::sync::LazyLock;

use regex::Regex;

use crate::oai::RepositoryIdentity;

use super::GeneratorConfig;

static ENTRY_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^/]*").expect("entry url pattern"));

/// Values substituted into the generated scrapi harvester source.
#[derive(Debug)]
pub(super) struct HarvesterTemplate {
    example_call: String,
    class_name: String,
    short_name: String,
    long_name: String,
    entry_url: String,
    base_url: String,
    property_list: String,
    timezone_granularity: bool,
}

impl HarvesterTemplate {
    pub(super) fn new(
        config: &GeneratorConfig,
        identity: &RepositoryIdentity,
        properties: &[String],
    ) -> anyhow::Result<Self> {
        Ok(Self {
            example_call: format!(
                "{}?verb=ListRecords&metadataPrefix=oai_dc",
                config.base_url
            ),
            class_name: capitalize_first(&config.short_name),
            short_name: config.short_name.clone(),
            long_name: identity.repository_name.clone(),
            entry_url: entry_url(&config.base_url)?,
            base_url: config.base_url.clone(),
            property_list: python_list(properties),
            timezone_granularity: identity.supports_time(),
        })
    }

    /// Render the harvester class definition. The shape of this file is
    /// scrapi's import surface and must stay stable.
    pub(super) fn render(&self) -> String {
        format!(
            "'''
Harvester for the {long_name} for the SHARE project

Example API call: {example_call}
'''
from __future__ import unicode_literals

from scrapi.base import OAIHarvester


class {class_name}Harvester(OAIHarvester):
    short_name = '{short_name}'
    long_name = '{long_name}'
    url = '{entry_url}'

    base_url = '{base_url}'
    property_list = {property_list}
    timezone_granularity = {timezone_granularity}
",
            long_name = self.long_name,
            example_call = self.example_call,
            class_name = self.class_name,
            short_name = self.short_name,
            entry_url = self.entry_url,
            base_url = self.base_url,
            property_list = self.property_list,
            timezone_granularity = if self.timezone_granularity {
                "True"
            } else {
                "False"
            },
        )
    }
}

/// Uppercase the first character only; the rest of the name is kept as-is.
fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The scheme and host portion of the base url, up to the first slash
/// after the authority.
fn entry_url(base_url: &str) -> anyhow::Result<String> {
    let matched = ENTRY_URL
        .find(base_url)
        .ok_or_else(|| anyhow::anyhow!("base url must start with http:// or https://"))?;
    Ok(matched.as_str().to_string())
}

fn python_list(properties: &[String]) -> String {
    let quoted: Vec<String> = properties
        .iter()
        .map(|property| format!("'{property}'"))
        .collect();
    format!("[{}]", quoted.join(", "))
}
