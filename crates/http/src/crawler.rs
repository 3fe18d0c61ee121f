//! HTML directory-listing crawler for the ODE archive website.
//!
//! Grounded on `Crawler._get_subdirs_file` in
//! `examples/original_source/pds_crawler/extractor/pds_ode_website.py`:
//! the archive renders directory listings as a single HTML `<table>` with
//! one `<a href>` per entry, and subdirectory/file links lack a `title`
//! attribute (the header row's sort-arrow links carry one).

use scraper::{Html, Selector};

/// One entry found in a directory listing: a link's href and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// The `href` attribute.
    pub url: String,
    /// The link's text content, trimmed.
    pub name: String,
}

/// Parses the last `<table>` in `html` and returns every `<a href>` entry
/// that lacks a `title` attribute.
pub fn parse_directory_listing(html: &str) -> Vec<DirEntry> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").expect("static selector");
    let link_selector = Selector::parse("a[href]").expect("static selector");

    let Some(table) = document.select(&table_selector).last() else {
        return Vec::new();
    };

    table
        .select(&link_selector)
        .filter(|link| link.value().attr("title").is_none())
        .filter_map(|link| {
            let url = link.value().attr("href")?.to_string();
            let name = link.text().collect::<String>().trim().to_string();
            Some(DirEntry { url, name })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <table>
          <tr><th><a href="?C=N;O=A" title="sort by name">Name</a></th></tr>
          <tr><td><a href="voldesc.cat">voldesc.cat</a></td></tr>
          <tr><td><a href="catalog/">catalog/</a></td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn extracts_entries_without_title() {
        let entries = parse_directory_listing(LISTING);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "voldesc.cat");
        assert_eq!(entries[1].name, "catalog/");
    }

    #[test]
    fn no_table_returns_empty() {
        assert!(parse_directory_listing("<html><body>empty</body></html>").is_empty());
    }
}
