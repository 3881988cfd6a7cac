//! Book record domain model.
//!
//! This module defines [`BookRecord`], the value produced for every catalog item
//! and stored in the favorites set. Records are built leniently from raw catalog
//! JSON: a malformed field falls back to its default instead of failing the whole
//! page. Only a missing identifier makes an item unusable.
//!
//! The serialized form uses the catalog's camelCase field names so the persisted
//! favorites array stays readable next to raw catalog payloads.

use crate::domain::error::{BookscoutError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserializes a field, falling back to its default when the value has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Cover image URLs as returned by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default, deserialize_with = "lenient")]
    pub small_thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub thumbnail: Option<String>,
}

/// Bibliographic data for a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub publisher: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub categories: Vec<String>,
    /// Free-form date string (`"2014"`, `"2014-12"` or `"2014-12-27"`).
    #[serde(default, deserialize_with = "lenient")]
    pub published_date: String,
    #[serde(default, deserialize_with = "lenient")]
    pub image_links: Option<ImageLinks>,
}

/// Retail price of a volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPrice {
    #[serde(default, deserialize_with = "lenient")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub currency_code: String,
}

/// Sale data, present only for volumes the catalog sells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub buy_link: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub list_price: Option<ListPrice>,
}

/// A single catalog volume.
///
/// All fields except `is_favorite` are fixed once the record is built.
/// `is_favorite` is a projection of the favorites set taken when the record was
/// fetched and is only changed by favorites operations.
///
/// # Invariants
///
/// - `id` is never empty for records built through [`BookRecord::new`] or
///   [`BookRecord::from_raw`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Stable catalog identifier.
    pub id: String,

    #[serde(default, deserialize_with = "lenient")]
    pub kind: String,

    /// Canonical catalog URL of the volume (`selfLink` in raw payloads).
    #[serde(default, alias = "selfLink", deserialize_with = "lenient")]
    pub link: String,

    #[serde(default, deserialize_with = "lenient")]
    pub volume_info: VolumeInfo,

    #[serde(default, deserialize_with = "lenient")]
    pub sale_info: Option<SaleInfo>,

    #[serde(default, deserialize_with = "lenient")]
    pub is_favorite: bool,
}

impl BookRecord {
    /// Creates a record with only an identifier and a title.
    ///
    /// # Errors
    ///
    /// Returns [`BookscoutError::MalformedRecord`] if `id` is empty or whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookscout::domain::BookRecord;
    ///
    /// let book = BookRecord::new("zyTCAlFPjgYC", "The Google Story")?;
    /// assert!(!book.is_favorite);
    /// assert!(BookRecord::new("  ", "untitled").is_err());
    /// # Ok::<(), bookscout::domain::BookscoutError>(())
    /// ```
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(BookscoutError::MalformedRecord(
                "record id is empty".to_string(),
            ));
        }

        Ok(Self {
            id,
            volume_info: VolumeInfo {
                title: title.into(),
                ..VolumeInfo::default()
            },
            ..Self::default()
        })
    }

    /// Builds a record from one raw catalog item.
    ///
    /// Every field is parsed independently: a field of the wrong shape takes its
    /// default value and the rest of the record is kept. `is_favorite` comes from
    /// the caller, never from the payload.
    ///
    /// # Errors
    ///
    /// Returns [`BookscoutError::MalformedRecord`] if the item has no non-empty
    /// string `id`, since such an item cannot be tracked or favorited.
    pub fn from_raw(raw: &serde_json::Value, is_favorite: bool) -> Result<Self> {
        let id = raw
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                BookscoutError::MalformedRecord("catalog item has no usable id".to_string())
            })?
            .to_string();

        let mut record = serde_json::from_value::<Self>(raw.clone()).unwrap_or_else(|e| {
            tracing::debug!(id = %id, error = %e, "catalog item did not parse, keeping id only");
            Self::default()
        });

        record.id = id;
        record.is_favorite = is_favorite;
        Ok(record)
    }

    /// Returns the best available cover image URL, or an empty string.
    ///
    /// Prefers the regular thumbnail over the small one.
    #[must_use]
    pub fn cover_image(&self) -> &str {
        self.volume_info
            .image_links
            .as_ref()
            .and_then(|links| {
                links
                    .thumbnail
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .or_else(|| links.small_thumbnail.as_deref())
            })
            .unwrap_or("")
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.volume_info.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_raw_reads_catalog_item() {
        let raw = json!({
            "kind": "books#volume",
            "id": "zyTCAlFPjgYC",
            "selfLink": "https://www.googleapis.com/books/v1/volumes/zyTCAlFPjgYC",
            "volumeInfo": {
                "title": "The Google Story",
                "authors": ["David A. Vise", "Mark Malseed"],
                "publisher": "Random House",
                "publishedDate": "2005-11-15",
                "categories": ["Business"],
                "imageLinks": {
                    "smallThumbnail": "http://example.test/small.jpg",
                    "thumbnail": "http://example.test/thumb.jpg"
                }
            },
            "saleInfo": {
                "buyLink": "http://example.test/buy",
                "listPrice": { "amount": 11.99, "currencyCode": "USD" }
            }
        });

        let record = BookRecord::from_raw(&raw, true).unwrap();

        assert_eq!(record.id, "zyTCAlFPjgYC");
        assert_eq!(record.kind, "books#volume");
        assert!(record.link.ends_with("/zyTCAlFPjgYC"));
        assert_eq!(record.title(), "The Google Story");
        assert_eq!(record.volume_info.authors.len(), 2);
        assert_eq!(record.cover_image(), "http://example.test/thumb.jpg");
        let price = record.sale_info.unwrap().list_price.unwrap();
        assert!((price.amount - 11.99).abs() < f64::EPSILON);
        assert_eq!(price.currency_code, "USD");
        assert!(record.is_favorite);
    }

    #[test]
    fn malformed_fields_fall_back_to_defaults() {
        let raw = json!({
            "id": "abc",
            "kind": 42,
            "volumeInfo": {
                "title": "Kept",
                "authors": "not-a-list",
                "imageLinks": "nope"
            },
            "saleInfo": { "listPrice": { "amount": "free" } }
        });

        let record = BookRecord::from_raw(&raw, false).unwrap();

        assert_eq!(record.id, "abc");
        assert_eq!(record.kind, "");
        assert_eq!(record.title(), "Kept");
        assert!(record.volume_info.authors.is_empty());
        assert_eq!(record.cover_image(), "");
        let price = record.sale_info.unwrap().list_price.unwrap();
        assert!(price.amount.abs() < f64::EPSILON);
        assert!(!record.is_favorite);
    }

    #[test]
    fn payload_favorite_flag_is_ignored() {
        let raw = json!({ "id": "abc", "isFavorite": true });
        let record = BookRecord::from_raw(&raw, false).unwrap();
        assert!(!record.is_favorite);
    }

    #[test]
    fn missing_or_blank_id_is_rejected() {
        for raw in [json!({ "kind": "books#volume" }), json!({ "id": "   " }), json!({ "id": 7 }), json!("text")] {
            assert!(matches!(
                BookRecord::from_raw(&raw, false),
                Err(BookscoutError::MalformedRecord(_))
            ));
        }
    }

    #[test]
    fn cover_falls_back_to_small_thumbnail() {
        let raw = json!({
            "id": "abc",
            "volumeInfo": { "imageLinks": { "smallThumbnail": "http://example.test/s.jpg" } }
        });
        let record = BookRecord::from_raw(&raw, false).unwrap();
        assert_eq!(record.cover_image(), "http://example.test/s.jpg");
    }

    #[test]
    fn persisted_form_round_trips_with_camel_case_names() {
        let mut record = BookRecord::new("abc", "Title").unwrap();
        record.is_favorite = true;

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["isFavorite"], true);
        assert_eq!(json["volumeInfo"]["title"], "Title");

        let back: BookRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
