use serde_json::Value;
use url::Url;

use crate::jsonld::{JsonLdError, json_ld_items};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no JSON-LD structured data found on {url}")]
    MissingStructuredData { url: Url },

    #[error("malformed JSON-LD structured data on {url}: {reason}")]
    MalformedStructuredData { url: Url, reason: String },
}

impl From<JsonLdError> for ExtractError {
    fn from(err: JsonLdError) -> Self {
        match err {
            JsonLdError::InvalidJson { url, block, source } => Self::MalformedStructuredData {
                url,
                reason: format!("block {block} is not valid JSON: {source}"),
            },
        }
    }
}

/// Returns the program entries listed in the `@graph` of the first JSON-LD item on the page.
///
/// Only the first item is consulted, even when later ones also carry a graph.
pub fn extract(document: &str, source_url: &Url) -> Result<Vec<Value>, ExtractError> {
    let items = json_ld_items(document, source_url)?;
    let first = items
        .into_iter()
        .next()
        .ok_or_else(|| ExtractError::MissingStructuredData {
            url: source_url.clone(),
        })?;

    let malformed = |reason: &str| ExtractError::MalformedStructuredData {
        url: source_url.clone(),
        reason: reason.to_owned(),
    };

    let Value::Object(mut block) = first else {
        return Err(malformed("first JSON-LD item is not an object"));
    };
    let entries = match block.remove("@graph") {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(malformed("`@graph` is not an array")),
        None => return Err(malformed("first JSON-LD item has no `@graph`")),
    };

    tracing::debug!(url = %source_url, entries = entries.len(), "extracted json-ld graph");
    Ok(entries)
}
