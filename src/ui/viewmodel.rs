//! View model types representing renderable UI state.
//!
//! View models are computed from the published result list, the favorites
//! snapshot, and the current error. They contain no business logic, only
//! display-ready strings.
//!
//! # Example
//!
//! ```rust
//! use bookscout::domain::BookRecord;
//! use bookscout::ui::compute_viewmodel;
//!
//! let books = vec![BookRecord::new("b1", "Eloquent JavaScript")?];
//! let vm = compute_viewmodel(Some("javascript"), Some(&books), None);
//! assert_eq!(vm.books[0].title, "Eloquent JavaScript");
//! assert!(vm.empty_state.is_none());
//! # Ok::<(), bookscout::domain::BookscoutError>(())
//! ```

use chrono::{Datelike, NaiveDate};

use crate::domain::BookRecord;

/// Complete view model for one screen of books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsViewModel {
    pub header: HeaderInfo,
    pub books: Vec<BookView>,

    /// Shown instead of the list when there is nothing to display.
    pub empty_state: Option<EmptyState>,

    /// Latest fetch error, shown below the list.
    pub error: Option<String>,
}

/// Display information for a single book card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookView {
    /// One-based position used by the `:fav <n>` command.
    pub position: usize,
    pub title: String,

    /// Comma-separated authors, or `"Unknown author"`.
    pub authors: String,
    pub year: Option<i32>,

    /// Formatted list price with currency, when the book is for sale.
    pub price: Option<String>,

    /// Cover image URL, empty when the catalog has none.
    pub cover: String,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Builds the view model for the search results screen.
///
/// `results` is `None` until the first page has loaded.
#[must_use]
pub fn compute_viewmodel(
    query: Option<&str>,
    results: Option<&[BookRecord]>,
    error: Option<&str>,
) -> ResultsViewModel {
    let books: Vec<BookView> = results
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, book)| BookView::from_record(i + 1, book))
        .collect();

    let empty_state = match (results, books.is_empty()) {
        (None, _) => Some(EmptyState {
            message: "Start typing to search the catalog".to_string(),
            subtitle: "/search <text> searches immediately, :q quits".to_string(),
        }),
        (Some(_), true) => Some(EmptyState {
            message: "No books found".to_string(),
            subtitle: "Try a different query".to_string(),
        }),
        (Some(_), false) => None,
    };

    let title = query.map_or_else(
        || "bookscout".to_string(),
        |q| format!("bookscout: \"{q}\""),
    );

    ResultsViewModel {
        header: HeaderInfo {
            title,
            count: books.len(),
        },
        books,
        empty_state,
        error: error.map(str::to_string),
    }
}

/// Builds the view model for the favorites screen.
#[must_use]
pub fn favorites_viewmodel(favorites: &[BookRecord]) -> ResultsViewModel {
    let books: Vec<BookView> = favorites
        .iter()
        .enumerate()
        .map(|(i, book)| BookView::from_record(i + 1, book))
        .collect();

    ResultsViewModel {
        header: HeaderInfo {
            title: "favorites".to_string(),
            count: books.len(),
        },
        empty_state: books.is_empty().then(|| EmptyState {
            message: "No favorites yet".to_string(),
            subtitle: ":fav <n> marks a search result".to_string(),
        }),
        books,
        error: None,
    }
}

impl BookView {
    fn from_record(position: usize, book: &BookRecord) -> Self {
        let info = &book.volume_info;

        let authors = if info.authors.is_empty() {
            "Unknown author".to_string()
        } else {
            info.authors.join(", ")
        };

        let price = book
            .sale_info
            .as_ref()
            .and_then(|sale| sale.list_price.as_ref())
            .map(|p| format!("{:.2} {}", p.amount, p.currency_code).trim_end().to_string());

        Self {
            position,
            title: if info.title.is_empty() {
                "(untitled)".to_string()
            } else {
                info.title.clone()
            },
            authors,
            year: published_year(&info.published_date),
            price,
            cover: book.cover_image().to_string(),
            is_favorite: book.is_favorite,
        }
    }
}

/// Extracts the year from `"2014-12-27"`, `"2014-12"` or `"2014"`.
fn published_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if let Ok(full) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(full.year());
    }

    date.get(..4)
        .filter(|year| year.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|year| year.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ImageLinks, ListPrice, SaleInfo};

    fn sample() -> BookRecord {
        let mut book = BookRecord::new("zyTCAlFPjgYC", "The Google Story").expect("valid id");
        book.volume_info.authors = vec!["David A. Vise".into(), "Mark Malseed".into()];
        book.volume_info.published_date = "2005-11-15".into();
        book.volume_info.image_links = Some(ImageLinks {
            small_thumbnail: Some("http://books.google.com/small".into()),
            thumbnail: None,
        });
        book.sale_info = Some(SaleInfo {
            buy_link: None,
            list_price: Some(ListPrice {
                amount: 9.5,
                currency_code: "USD".into(),
            }),
        });
        book
    }

    #[test]
    fn book_view_fields() {
        let view = BookView::from_record(1, &sample());
        assert_eq!(view.authors, "David A. Vise, Mark Malseed");
        assert_eq!(view.year, Some(2005));
        assert_eq!(view.price.as_deref(), Some("9.50 USD"));
        assert_eq!(view.cover, "http://books.google.com/small");
    }

    #[test]
    fn partial_dates() {
        assert_eq!(published_year("2014-12"), Some(2014));
        assert_eq!(published_year("1999"), Some(1999));
        assert_eq!(published_year("n.d."), None);
        assert_eq!(published_year(""), None);
    }

    #[test]
    fn empty_states() {
        let before = compute_viewmodel(None, None, None);
        assert!(before.empty_state.is_some());
        assert_eq!(before.header.title, "bookscout");

        let none_found = compute_viewmodel(Some("zzz"), Some(&[]), Some("HTTP 500"));
        assert_eq!(
            none_found.empty_state.map(|e| e.message).as_deref(),
            Some("No books found")
        );
        assert_eq!(none_found.error.as_deref(), Some("HTTP 500"));
    }
}
