//! JSON-LD discovery in HTML documents.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

static TYPED_SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type]").expect("valid script selector"));

#[derive(Debug, thiserror::Error)]
pub enum JsonLdError {
    #[error("JSON-LD block {block} on {url} is not valid JSON")]
    InvalidJson {
        url: Url,
        block: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Returns every JSON-LD item embedded in `html`, in document order.
///
/// A script whose payload is a top-level array contributes each element as its
/// own item. Scripts with an empty body are skipped. `base_url` names the page
/// in errors.
pub fn json_ld_items(html: &str, base_url: &Url) -> Result<Vec<Value>, JsonLdError> {
    let document = Html::parse_document(html);

    let mut items = Vec::new();
    let mut block = 0_usize;
    for script in document.select(&TYPED_SCRIPT_SELECTOR) {
        let is_json_ld = script
            .value()
            .attr("type")
            .is_some_and(|ty| ty.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_json_ld {
            continue;
        }

        let text = script.text().collect::<String>();
        let payload = strip_wrappers(&text);
        if payload.is_empty() {
            continue;
        }
        block += 1;

        let parsed: Value =
            serde_json::from_str(payload).map_err(|source| JsonLdError::InvalidJson {
                url: base_url.clone(),
                block,
                source,
            })?;
        match parsed {
            Value::Array(elements) => items.extend(elements),
            other => items.push(other),
        }
    }

    tracing::debug!(url = %base_url, blocks = block, items = items.len(), "scanned json-ld");
    Ok(items)
}

fn strip_wrappers(text: &str) -> &str {
    let mut payload = text.trim();
    for (open, close) in [("<![CDATA[", "]]>"), ("<!--", "-->")] {
        if let Some(inner) = payload.strip_prefix(open) {
            payload = inner.strip_suffix(close).unwrap_or(inner).trim();
        }
    }
    payload
}
