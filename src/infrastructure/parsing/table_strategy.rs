//! Staff tables: `<table>` rows and ARIA grid rows

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::classifier::{
    extract_email_from_mailto, extract_phone_from_tel, is_title_cell, looks_like_person_name,
};
use super::strategy::{element_text, find_href_with_scheme, ExtractionStrategy, RawCandidate};

static ROWS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table tr, [role='row']").expect("static selector"));

static CELLS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td, th, [role='cell'], [role='gridcell'], [role='rowheader']")
        .expect("static selector")
});

const MIN_CELLS: usize = 2;

#[derive(Debug, Default)]
pub struct TableStrategy;

impl TableStrategy {
    fn read_row(row: ElementRef<'_>) -> Option<RawCandidate> {
        let cells: Vec<ElementRef<'_>> = row.select(&CELLS).collect();
        if cells.len() < MIN_CELLS {
            return None;
        }

        let mut name = None;
        let mut candidate = RawCandidate::default();
        for cell in cells {
            if let Some(href) = find_href_with_scheme(&cell, "mailto:") {
                if candidate.email.is_none() {
                    candidate.email = extract_email_from_mailto(&href);
                }
                continue;
            }
            if let Some(href) = find_href_with_scheme(&cell, "tel:") {
                if candidate.phone.is_none() {
                    candidate.phone = extract_phone_from_tel(&href);
                }
                continue;
            }

            let text = element_text(&cell);
            if name.is_none() && looks_like_person_name(&text) {
                name = Some(text);
            } else if candidate.title.is_none() && is_title_cell(&text) {
                candidate.title = Some(text);
            }
        }

        name.map(|name| RawCandidate { name, ..candidate })
    }
}

impl ExtractionStrategy for TableStrategy {
    fn name(&self) -> &'static str {
        "table"
    }

    fn extract(&self, document: &Html, _page_url: &str) -> Vec<RawCandidate> {
        document.select(&ROWS).filter_map(Self::read_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<RawCandidate> {
        TableStrategy.extract(&Html::parse_document(html), "https://x.edu/coaches")
    }

    #[test]
    fn test_reads_name_title_and_contacts() {
        let rows = extract(
            r#"<table>
                <tr><th>Name</th><th>Title</th><th>Email</th></tr>
                <tr><td>Jane Doe</td><td>Head Coach</td>
                    <td><a href="mailto:JDoe@X.edu">Email</a></td>
                    <td><a href="tel:555-0100">555-0100</a></td></tr>
                <tr><td>Sam Lee</td><td>Assistant Coach</td></tr>
            </table>"#,
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(rows[0].title.as_deref(), Some("Head Coach"));
        assert_eq!(rows[0].email.as_deref(), Some("jdoe@x.edu"));
        assert_eq!(rows[0].phone.as_deref(), Some("555-0100"));
        assert_eq!(rows[1].name, "Sam Lee");
    }

    #[test]
    fn test_skips_single_cell_and_nameless_rows() {
        let rows = extract(
            r"<table>
                <tr><td>Jane Doe</td></tr>
                <tr><td>Read More</td><td>Head Coach</td></tr>
            </table>",
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn test_reads_aria_grid_rows() {
        let rows = extract(
            r#"<div role="grid">
                <div role="row"><span role="cell">Pat Kim</span><span role="cell">Volunteer Assistant Coach</span></div>
            </div>"#,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("Volunteer Assistant Coach"));
    }
}
