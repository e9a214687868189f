//! Module rendering document specifications into the XHTML consumed by the test runner

use chrono::NaiveDate;

use crate::domain::{DocumentSpec, TableSpec};

mod file;
mod xml;


pub use file::{FileBuilder, prepare_output_directory};
pub use xml::{Element, Node, serialize};

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

const STYLE: &str = "
td.unique
{
  color : red;
  font : bold
}
td.claimnumber
{
  color : purple;
  font : bold
}
";

/// Builds the node tree of `document`, dated `generated_on`.
///
/// The metadata block is always present, followed by one heading and one table per table of
/// the document.
pub fn build_document(document: &DocumentSpec, generated_on: NaiveDate) -> Element {
    let head = Element::new("head")
        .child(Element::new("title").text(document.suite_name()))
        .child(Element::new("style").attr("type", "text/css").text(STYLE));

    let mut body = Element::new("body")
        .child(description_list(document, generated_on))
        .child(Element::new("hr"));
    for table in document.tables() {
        body.push(Element::new("h2").text(table.heading()));
        body.push(table_element(table));
    }

    Element::new("html")
        .attr("xmlns", XHTML_NAMESPACE)
        .attr("xml:lang", "en")
        .child(head)
        .child(body)
}

/// Renders `document` to pretty-printed XHTML text
pub fn render(document: &DocumentSpec, generated_on: NaiveDate) -> String {
    serialize(&build_document(document, generated_on))
}

fn description_list(document: &DocumentSpec, generated_on: NaiveDate) -> Element {
    let date = generated_on.format("%Y-%m-%d").to_string();
    let entries = [
        ("Project:", document.project_name()),
        ("Author:", document.author()),
        ("Date:", date.as_str()),
        ("Repeatable:", document.repeatable_label()),
        ("Description:", document.description()),
    ];

    entries
        .into_iter()
        .fold(Element::new("dl"), |dl, (term, description)| {
            dl.child(Element::new("dt").text(term))
                .child(Element::new("dd").text(description))
        })
}

fn table_element(table: &TableSpec) -> Element {
    let fixture_row = Element::new("tr").child(Element::new("td").text(table.fixture()));

    let header_row = table
        .columns()
        .iter()
        .zip(table.highlight())
        .fold(Element::new("tr"), |tr, (column, highlighted)| {
            let cell = Element::new("td").text(column.as_str());
            tr.child(if *highlighted {
                cell.attr("class", "unique")
            } else {
                cell
            })
        });

    let mut element = Element::new("table")
        .attr("border", "1")
        .child(fixture_row)
        .child(header_row);
    for row in table.rows() {
        element.push(row.iter().fold(Element::new("tr"), |tr, value| {
            tr.child(Element::new("td").text(value.as_str()))
        }));
    }
    element
}
