//! Citation formatting, labels and links

use crate::bib::ANON_LABEL;
use crate::document::DocumentRecord;

/// Output flavor for citations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiteStyle {
    /// Journal title wrapped in `<em>`
    Html,
    /// No markup
    Plain,
}

/// Render a document as a bibliographic citation
///
/// `Last, First, Second Author, and Third Author. "Title." Journal 12,
/// no. 3 (March 1991): 1–20.`
pub fn cite(doc: &DocumentRecord, style: CiteStyle) -> String {
    let mut result = match doc.lead_author_parts() {
        Some((surname, given)) => {
            let mut names = surname.to_string();
            if !given.is_empty() {
                names.push_str(", ");
                names.push_str(&given);
            }
            let n = doc.authors.len();
            if n > 2 {
                names.push_str(", ");
                names.push_str(&doc.authors[1..n - 1].join(", "));
            }
            if n > 1 {
                names.push_str(", and ");
                names.push_str(&doc.authors[n - 1]);
            }
            names
        }
        None => ANON_LABEL.to_string(),
    };

    result.push_str(". ");
    result.push_str(&format!("\"{}.\"", doc.title));
    match style {
        CiteStyle::Html => result.push_str(&format!(" <em>{}</em> ", doc.journal_title)),
        CiteStyle::Plain => result.push_str(&format!(" {} ", doc.journal_title)),
    }
    result.push_str(&format!("{}, no. {}", doc.volume, doc.issue));
    result.push_str(&format!(" ({}): ", doc.date.format("%B %Y")));
    result.push_str(&doc.page_range);
    result.push('.');

    // commas arrive escaped as underscores in some exports
    result.replace('_', ",").replace('\t', "")
}

/// External link for a document, optionally through a library proxy suffix
pub fn doc_uri(doc: &DocumentRecord, proxy: &str) -> String {
    format!("http://dx.doi.org{}/{}", proxy, doc.doi)
}

/// One-based topic number followed by its words
pub fn topic_label<S: AsRef<str>>(topic: usize, words: &[S]) -> String {
    let mut label = (topic + 1).to_string();
    label.push(' ');
    label.push_str(
        &words
            .iter()
            .map(|w| w.as_ref())
            .collect::<Vec<&str>>()
            .join(" "),
    );
    label
}

pub fn topic_link(topic: usize) -> String {
    format!("#/topic/{}", topic + 1)
}

pub fn doc_link(doc: usize) -> String {
    format!("#/doc/{}", doc)
}

pub fn word_link(word: &str) -> String {
    format!("#/word/{}", word)
}

/// Relative path of a pre-rendered yearly plot for a topic
pub fn topic_plot_path(topic: usize) -> String {
    format!("topic_plot/{:03}.png", topic + 1)
}
