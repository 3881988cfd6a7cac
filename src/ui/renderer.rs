//! Plain-text rendering of view models.
//!
//! Output is line-oriented so it works on any terminal and in pipes:
//!
//! ```text
//! == bookscout: "javascript" (3) ==
//!  1. * Eloquent JavaScript
//!       Marijn Haverbeke | 2018 | 29.99 USD
//!       cover: http://books.google.com/...
//! ```

use std::io::{self, Write};

use crate::ui::viewmodel::{BookView, ResultsViewModel};

/// Writes `vm` to `out`.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render(vm: &ResultsViewModel, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "== {} ({}) ==", vm.header.title, vm.header.count)?;

    if let Some(empty) = &vm.empty_state {
        writeln!(out, "   {}", empty.message)?;
        writeln!(out, "   {}", empty.subtitle)?;
    }

    for book in &vm.books {
        render_book(book, out)?;
    }

    if let Some(error) = &vm.error {
        writeln!(out, "!! {error}")?;
    }

    out.flush()
}

fn render_book(book: &BookView, out: &mut impl Write) -> io::Result<()> {
    let marker = if book.is_favorite { '*' } else { ' ' };
    writeln!(out, "{:>2}. {marker} {}", book.position, book.title)?;

    let mut details = vec![book.authors.clone()];
    details.extend(book.year.map(|y| y.to_string()));
    details.extend(book.price.clone());
    writeln!(out, "      {}", details.join(" | "))?;

    if !book.cover.is_empty() {
        writeln!(out, "      cover: {}", book.cover)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookRecord;
    use crate::ui::viewmodel::compute_viewmodel;

    fn rendered(vm: &ResultsViewModel) -> String {
        let mut out = Vec::new();
        render(vm, &mut out).expect("render to buffer");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn renders_rows_with_favorite_marker() {
        let mut favorite = BookRecord::new("a", "Eloquent JavaScript").expect("valid id");
        favorite.is_favorite = true;
        let plain = BookRecord::new("b", "You Don't Know JS").expect("valid id");

        let text = rendered(&compute_viewmodel(Some("js"), Some(&[favorite, plain]), None));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "== bookscout: \"js\" (2) ==");
        assert_eq!(lines[1], " 1. * Eloquent JavaScript");
        assert_eq!(lines[2], "      Unknown author");
        assert_eq!(lines[3], " 2.   You Don't Know JS");
    }

    #[test]
    fn renders_error_after_list() {
        let text = rendered(&compute_viewmodel(Some("js"), Some(&[]), Some("HTTP 503")));
        assert!(text.contains("No books found"));
        assert!(text.trim_end().ends_with("!! HTTP 503"));
    }
}
