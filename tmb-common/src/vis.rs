//! View configuration
//!
//! Dashboard preferences: bibliography sort, how many words/documents/topics
//! each view lists, the library proxy for document links, and plot geometry.
//! Built-in defaults can be overridden per model by the `VIS` object in
//! `info.json`. The resulting value is passed explicitly to whatever needs
//! it; nothing reads preferences from global state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::bib::BibSort;

/// Bibliography sort preference names, resolved with fallback at use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BibSortPrefs {
    pub major: String,
    pub minor: String,
}

impl Default for BibSortPrefs {
    fn default() -> Self {
        Self {
            major: "year".to_string(),
            minor: "alpha".to_string(),
        }
    }
}

impl BibSortPrefs {
    pub fn resolve(&self) -> BibSort {
        BibSort::from_names(&self.major, &self.minor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotMargins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Default for PlotMargins {
    fn default() -> Self {
        Self {
            left: 40,
            right: 20,
            top: 20,
            bottom: 20,
        }
    }
}

/// Yearly topic plot geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub w: u32,
    pub h: u32,
    pub m: PlotMargins,
    /// Bar width in days
    pub bar_width: u32,
    /// Tick count for both axes
    pub ticks: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            w: 640,
            h: 300,
            m: PlotMargins::default(),
            bar_width: 300,
            ticks: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    pub bib_sort: BibSortPrefs,
    /// Words per topic in labels and the model overview
    pub overview_words: usize,
    pub topic_view_words: usize,
    pub topic_view_docs: usize,
    pub doc_view_topics: usize,
    /// Appended to the DOI resolver host, e.g. ".proxy.library.edu"
    pub uri_proxy: String,
    /// Point at pre-rendered plot images instead of serving plot data
    pub prefab_plots: bool,
    pub plot: PlotConfig,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            bib_sort: BibSortPrefs::default(),
            overview_words: 15,
            topic_view_words: 50,
            topic_view_docs: 20,
            doc_view_topics: 10,
            uri_proxy: String::new(),
            prefab_plots: true,
            plot: PlotConfig::default(),
        }
    }
}

impl VisConfig {
    /// Apply per-model overrides
    ///
    /// Top-level keys of `overrides` replace the matching fields wholesale.
    /// Unknown keys are skipped. A value that does not fit its field leaves
    /// the field unchanged.
    pub fn with_overrides(self, overrides: &Value) -> Self {
        let Some(entries) = overrides.as_object() else {
            warn!("VIS overrides are not an object; ignoring");
            return self;
        };

        let mut current = self;
        for (key, value) in entries {
            let mut fields = match serde_json::to_value(&current) {
                Ok(Value::Object(fields)) => fields,
                _ => return current,
            };
            if !fields.contains_key(key) {
                debug!("Ignoring unknown VIS key '{}'", key);
                continue;
            }
            fields.insert(key.clone(), value.clone());
            match serde_json::from_value::<VisConfig>(Value::Object(fields)) {
                Ok(updated) => current = updated,
                Err(e) => warn!("Ignoring VIS override '{}': {}", key, e),
            }
        }
        current
    }

    /// Resolved bibliography strategies
    pub fn bib_sort(&self) -> BibSort {
        self.bib_sort.resolve()
    }
}
