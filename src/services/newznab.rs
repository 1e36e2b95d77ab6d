//! Newznab indexer client.
//!
//! Searches are plain `t=search` queries; results come back as RSS with one
//! `<item>` per release.

use super::ReleaseIndexer;
use crate::models::config::IndexerConfig;
use crate::models::release::Release;
use crate::{Error, Result};
use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Newznab indexer client.
pub struct NewznabClient {
    name: String,
    url: String,
    api_key: String,
    max_results: usize,
    client: reqwest::Client,
}

impl NewznabClient {
    pub fn new(config: &IndexerConfig, max_results: usize, client: reqwest::Client) -> Self {
        Self {
            name: config.name.clone(),
            url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
            max_results,
            client,
        }
    }

    /// Build the search URL for a query.
    pub fn search_url(&self, query: &str) -> String {
        let sep = if self.url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}t=search&q={}&apikey={}",
            self.url,
            sep,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        )
    }

    /// Check the indexer answers a capabilities request.
    pub async fn health_check(&self) -> Result<bool> {
        let sep = if self.url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}t=caps&apikey={}", self.url, sep, urlencoding::encode(&self.api_key));
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

#[async_trait]
impl ReleaseIndexer for NewznabClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<Release>> {
        tracing::debug!("Searching {} for: {}", self.name, query);
        let resp = self.client.get(self.search_url(query)).send().await?;
        if !resp.status().is_success() {
            return Err(Error::indexer(&self.name, format!("HTTP {}", resp.status())));
        }
        let body = resp.text().await?;
        parse_results(&body, self.max_results).map_err(|e| match e {
            Error::Other(message) => Error::indexer(&self.name, message),
            other => other,
        })
    }

    async fn fetch(&self, release: &Release) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(&release.link)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[derive(Default)]
struct ItemBuilder {
    title: Option<String>,
    link: Option<String>,
}

/// Parse a Newznab RSS response, keeping at most `max_results` items.
///
/// A Newznab `<error code=".." description=".."/>` document becomes an
/// `Error::Other` carrying the description.
pub fn parse_results(xml: &str, max_results: usize) -> Result<Vec<Release>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut releases = Vec::new();
    let mut current: Option<ItemBuilder> = None;
    let mut current_tag = String::new();

    loop {
        if releases.len() >= max_results {
            break;
        }
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag == "error" {
                    return Err(newznab_error(e));
                }
                if tag == "item" {
                    current = Some(ItemBuilder::default());
                }
                current_tag = tag;
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"error" {
                    return Err(newznab_error(e));
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(ItemBuilder {
                        title: Some(title),
                        link: Some(link),
                    }) = current.take()
                    {
                        releases.push(Release { title, link });
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut item) = current {
                    let text = e.unescape().unwrap_or_default().to_string();
                    match current_tag.as_str() {
                        "title" => item.title = Some(text),
                        "link" => item.link = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(ref mut item) = current {
                    let text = String::from_utf8_lossy(e).to_string();
                    match current_tag.as_str() {
                        "title" => item.title = Some(text),
                        "link" => item.link = Some(text),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    tracing::debug!("Parsed {} releases", releases.len());
    Ok(releases)
}

fn newznab_error(e: &BytesStart<'_>) -> Error {
    let attr = |name: &str| {
        e.try_get_attribute(name)
            .ok()
            .flatten()
            .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
    };
    let code = attr("code").unwrap_or_default();
    let description = attr("description").unwrap_or_else(|| "unknown error".to_string());
    Error::other(format!("error {}: {}", code, description))
}
