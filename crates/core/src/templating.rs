//! Per-item naming and content derivation for batch QR codes.
//!
//! Everything a generated QR code carries is a function of its batch and its
//! 1-based index, so regenerating the same batch yields the same names and
//! contents in the same order.

/// Placeholder replaced with the item index inside a URL template.
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// Base URL used for content when a batch has no URL template.
pub const DEFAULT_FALLBACK_BASE_URL: &str = "https://example.com";

/// Derived fields for one batch item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemContent {
    pub name: String,
    pub content: String,
    pub url: String,
}

/// Build the display name for item `index`.
///
/// `{prefix}_{batch_name}_{index}`, or `{batch_name}_{index}` without a prefix.
///
/// ```
/// use office_core::templating::item_name;
///
/// assert_eq!(item_name("ticket", "Event", 3), "ticket_Event_3");
/// assert_eq!(item_name("", "Event", 3), "Event_3");
/// ```
pub fn item_name(prefix: &str, batch_name: &str, index: u32) -> String {
    if prefix.is_empty() {
        format!("{batch_name}_{index}")
    } else {
        format!("{prefix}_{batch_name}_{index}")
    }
}

/// Build the encoded content for item `index`.
///
/// Every `{index}` in `url_template` is replaced with the decimal index. An
/// empty template falls back to `{base_url}/{batch_id}/{index}`, which is
/// unique per item within and across batches.
pub fn item_content(url_template: &str, base_url: &str, batch_id: &str, index: u32) -> String {
    if url_template.is_empty() {
        format!("{}/{batch_id}/{index}", base_url.trim_end_matches('/'))
    } else {
        url_template.replace(INDEX_PLACEHOLDER, &index.to_string())
    }
}

/// Derive name, content, and URL for one item. Content and URL are the same
/// string.
pub fn render_item(
    prefix: &str,
    batch_name: &str,
    url_template: &str,
    base_url: &str,
    batch_id: &str,
    index: u32,
) -> ItemContent {
    let content = item_content(url_template, base_url, batch_id, index);
    ItemContent {
        name: item_name(prefix, batch_name, index),
        url: content.clone(),
        content,
    }
}
