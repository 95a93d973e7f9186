//! Hash-route parsing
//!
//! Routes look like `#/topic/3`, `#/word/novel`, `#/doc/12`, `#/bib`.
//! Topic numbers are one-based in routes and zero-based everywhere else;
//! document numbers are zero-based in both.

/// A parsed view selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRoute {
    Model,
    About,
    Bib,
    /// Zero-based topic index
    Topic(usize),
    Word(String),
    Doc(usize),
    /// Unrecognized view or missing/invalid parameter
    Unknown,
}

impl ViewRoute {
    /// Parse a location hash; an empty hash selects the model view
    pub fn parse(hash: &str) -> Self {
        let mut parts = hash.split('/');
        // leading "#" (or nothing)
        parts.next();
        let view = parts.next();
        let param = parts.next().filter(|p| !p.is_empty());

        match view {
            None | Some("") | Some("model") => ViewRoute::Model,
            Some("about") => ViewRoute::About,
            Some("bib") => ViewRoute::Bib,
            Some("topic") => param
                .and_then(|p| p.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
                .map(ViewRoute::Topic)
                .unwrap_or(ViewRoute::Unknown),
            Some("word") => param
                .map(|w| ViewRoute::Word(w.to_string()))
                .unwrap_or(ViewRoute::Unknown),
            Some("doc") => param
                .and_then(|p| p.parse::<usize>().ok())
                .map(ViewRoute::Doc)
                .unwrap_or(ViewRoute::Unknown),
            Some(_) => ViewRoute::Unknown,
        }
    }

    /// View name, as used for the page element ids
    pub fn name(&self) -> &'static str {
        match self {
            ViewRoute::Model => "model",
            ViewRoute::About => "about",
            ViewRoute::Bib => "bib",
            ViewRoute::Topic(_) => "topic",
            ViewRoute::Word(_) => "word",
            ViewRoute::Doc(_) => "doc",
            ViewRoute::Unknown => "unknown",
        }
    }

    /// Unknown routes fall back to the model view
    pub fn or_model(self) -> Self {
        match self {
            ViewRoute::Unknown => ViewRoute::Model,
            other => other,
        }
    }
}
