//! HTTP API handlers for tmb-web

pub mod about;
pub mod bib;
pub mod buildinfo;
pub mod dispatch;
pub mod doc;
pub mod health;
pub mod model;
pub mod sse;
pub mod status;
pub mod topic;
pub mod ui;
pub mod word;

pub use about::get_about_view;
pub use bib::get_bib_view;
pub use buildinfo::get_build_info;
pub use dispatch::dispatch_route;
pub use doc::get_doc_view;
pub use health::health_routes;
pub use model::get_model_view;
pub use sse::event_stream;
pub use status::{get_config, get_status};
pub use topic::{get_topic_view, get_topic_yearly};
pub use ui::{serve_app_js, serve_index};
pub use word::get_word_view;
