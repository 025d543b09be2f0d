pub mod answers;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;

pub use answers::{resolve_answer, RenderedAnswer, DISCLAIMER, FALLBACK_ANSWER};
pub use catalog::{
    source_from_config, CachedCatalog, Catalog, CatalogSource, Clock, FileCatalogSource,
    HttpCatalogSource, ManualClock, SystemClock,
};
pub use domain::faq::FaqCategory;
pub use domain::product::{Faqs, Product, ProductId};
pub use errors::{CatalogError, ClientError, SessionError};
pub use flows::{Session, SessionEvent, SessionState, Transition};
