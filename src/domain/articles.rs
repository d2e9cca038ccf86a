//! Article listing payloads served by the content API, and the pure helpers the
//! infinite-scroll list builds on.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of grid columns article cards are laid out on at the small breakpoint.
pub const CARD_GRID_COLUMNS: u32 = 4;

/// Article identifiers arrive either as strings or as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Number(value) => write!(f, "{value}"),
            ArticleId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ArticleId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ArticleId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Uploaded file referenced by an article (thumbnail or social preview image).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleAsset {
    pub id: String,
    pub url: String,
    pub original_name: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Listing entry for an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image_asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_asset: Option<ArticleAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image_asset: Option<ArticleAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Article {
    /// Grid span and start classes for this article's card.
    pub fn card_classes(&self) -> String {
        card_grid_classes(self.weight.as_ref())
    }
}

/// One page of the cursor-paginated article listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    #[serde(default)]
    pub items: Vec<Article>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub next_cursor: Option<i64>,
}

impl ArticlePage {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Full article payload returned by the by-slug endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub title: String,
    /// Rich-text body; handed to the document renderer as-is.
    #[serde(default)]
    pub content: Option<Value>,
}

/// Append `incoming` to `existing`, skipping articles whose id is already present.
///
/// Each id keeps the position of its first appearance. Within `existing` a repeated
/// id takes the payload of its last occurrence; incoming articles never replace an
/// id that is already listed.
pub fn merge_unique_by_id(existing: Vec<Article>, incoming: Vec<Article>) -> Vec<Article> {
    let mut positions: HashMap<ArticleId, usize> =
        HashMap::with_capacity(existing.len() + incoming.len());
    let mut merged: Vec<Article> = Vec::with_capacity(existing.len() + incoming.len());

    for article in existing {
        match positions.get(&article.id) {
            Some(&index) => merged[index] = article,
            None => {
                positions.insert(article.id.clone(), merged.len());
                merged.push(article);
            }
        }
    }

    for article in incoming {
        if !positions.contains_key(&article.id) {
            positions.insert(article.id.clone(), merged.len());
            merged.push(article);
        }
    }

    merged
}

/// Clamp a card weight into `1..=cols`. Missing or non-numeric weights count as 1.
pub fn clamp_weight_to_cols(weight: Option<&Value>, cols: u32) -> u32 {
    let numeric = match weight {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => parse_js_number(text),
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        Some(Value::Null) => Some(0.0),
        _ => None,
    };

    match numeric {
        Some(value) if value.is_finite() => {
            let truncated = value.trunc();
            truncated.clamp(1.0, f64::from(cols.max(1))) as u32
        }
        _ => 1,
    }
}

/// Span and start classes for a card on the four-column grid.
///
/// Wide cards (three and four columns) always start on the first column so they
/// never squeeze into the remainder of a row.
pub fn card_grid_classes(weight: Option<&Value>) -> String {
    let width = clamp_weight_to_cols(weight, CARD_GRID_COLUMNS);
    let span = format!("sm:col-span-{width}");
    match width {
        3 | 4 => format!("{span} sm:col-start-1"),
        _ => span,
    }
}

/// Thumbnail asset ids referenced by the listing that are not hydrated yet, in
/// first-seen order without duplicates.
pub fn missing_thumbnail_ids(articles: &[Article]) -> Vec<String> {
    let hydrated: HashSet<&str> = articles
        .iter()
        .filter_map(|article| article.thumbnail_asset.as_ref())
        .map(|asset| asset.id.as_str())
        .collect();

    let mut seen = HashSet::new();
    articles
        .iter()
        .filter_map(|article| article.thumbnail_asset_id.as_deref())
        .filter(|id| !id.is_empty() && !hydrated.contains(id))
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Fill `thumbnail_asset` from fetched assets. Articles that already carry an
/// asset, or whose asset could not be fetched, are left untouched.
pub fn attach_thumbnails(
    articles: Vec<Article>,
    assets: &HashMap<String, ArticleAsset>,
) -> Vec<Article> {
    articles
        .into_iter()
        .map(|mut article| {
            if article.thumbnail_asset.is_none() {
                article.thumbnail_asset = article
                    .thumbnail_asset_id
                    .as_deref()
                    .and_then(|id| assets.get(id))
                    .cloned();
            }
            article
        })
        .collect()
}

fn parse_js_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn num(value: i64) -> ArticleId {
        ArticleId::Number(value)
    }

    fn article(id: ArticleId, title: &str) -> Article {
        Article {
            id,
            weight: None,
            title: title.to_string(),
            description: String::new(),
            slug: None,
            image: None,
            thumbnail_asset_id: None,
            og_image_asset_id: None,
            thumbnail_asset: None,
            og_image_asset: None,
            date: None,
        }
    }

    fn asset(id: &str) -> ArticleAsset {
        ArticleAsset {
            id: id.to_string(),
            url: format!("https://cdn.example/{id}.png"),
            original_name: format!("{id}.png"),
            mime_type: "image/png".to_string(),
            metadata: None,
        }
    }

    #[test]
    fn page_payload_deserializes_from_camel_case() {
        let page: ArticlePage = serde_json::from_value(json!({
            "items": [
                { "id": 7, "title": "Seven", "description": "d", "thumbnailAssetId": "a1" },
                { "id": "slug-id", "title": "Text id", "description": "" }
            ],
            "total": 2,
            "limit": 10,
            "nextCursor": null
        }))
        .expect("page parses");

        assert_eq!(page.items[0].id, ArticleId::Number(7));
        assert_eq!(page.items[0].thumbnail_asset_id.as_deref(), Some("a1"));
        assert_eq!(page.items[1].id, ArticleId::Text("slug-id".into()));
        assert!(!page.has_more());
    }

    #[test]
    fn merge_keeps_existing_and_appends_unseen() {
        let existing = vec![article(num(1), "one"), article(num(2), "two")];
        let incoming = vec![
            article(num(2), "two again"),
            article(num(3), "three"),
            article(num(3), "dup"),
        ];

        let merged = merge_unique_by_id(existing, incoming);
        let titles: Vec<&str> = merged.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
    }

    #[test]
    fn merge_keeps_the_last_existing_payload_in_the_first_position() {
        let existing = vec![
            article(num(1), "stale"),
            article(num(2), "two"),
            article(num(1), "fresh"),
        ];

        let merged = merge_unique_by_id(existing, vec![article(num(1), "incoming")]);
        let titles: Vec<&str> = merged.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["fresh", "two"]);
    }

    #[test]
    fn merge_distinguishes_numeric_and_text_ids() {
        let merged = merge_unique_by_id(
            vec![article(num(1), "number")],
            vec![article(ArticleId::from("1"), "text")],
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn weights_clamp_into_grid() {
        assert_eq!(clamp_weight_to_cols(None, 4), 1);
        assert_eq!(clamp_weight_to_cols(Some(&json!(2)), 4), 2);
        assert_eq!(clamp_weight_to_cols(Some(&json!(3.9)), 4), 3);
        assert_eq!(clamp_weight_to_cols(Some(&json!(9)), 4), 4);
        assert_eq!(clamp_weight_to_cols(Some(&json!(-3)), 4), 1);
        assert_eq!(clamp_weight_to_cols(Some(&json!("3")), 4), 3);
        assert_eq!(clamp_weight_to_cols(Some(&json!("wide")), 4), 1);
        assert_eq!(clamp_weight_to_cols(Some(&json!({})), 4), 1);
    }

    #[test]
    fn wide_cards_start_on_first_column() {
        assert_eq!(card_grid_classes(None), "sm:col-span-1");
        assert_eq!(card_grid_classes(Some(&json!(2))), "sm:col-span-2");
        assert_eq!(
            card_grid_classes(Some(&json!(3))),
            "sm:col-span-3 sm:col-start-1"
        );
        assert_eq!(
            card_grid_classes(Some(&json!(4))),
            "sm:col-span-4 sm:col-start-1"
        );
    }

    #[test]
    fn thumbnails_hydrate_only_missing_assets() {
        let mut hydrated = article(num(1), "hydrated");
        hydrated.thumbnail_asset_id = Some("a1".into());
        hydrated.thumbnail_asset = Some(asset("a1"));

        let mut pending = article(num(2), "pending");
        pending.thumbnail_asset_id = Some("a2".into());

        let mut shared = article(num(3), "shares a2");
        shared.thumbnail_asset_id = Some("a2".into());

        let mut unresolved = article(num(4), "unresolved");
        unresolved.thumbnail_asset_id = Some("a3".into());

        let articles = vec![hydrated, pending, shared, unresolved];
        assert_eq!(missing_thumbnail_ids(&articles), vec!["a2", "a3"]);

        let fetched = HashMap::from([("a2".to_string(), asset("a2"))]);
        let attached = attach_thumbnails(articles, &fetched);

        assert_eq!(attached[0].thumbnail_asset, Some(asset("a1")));
        assert_eq!(attached[1].thumbnail_asset, Some(asset("a2")));
        assert_eq!(attached[2].thumbnail_asset, Some(asset("a2")));
        assert_eq!(attached[3].thumbnail_asset, None);
    }
}
