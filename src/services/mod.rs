pub mod cache_gate;
pub mod error;
pub mod extractor;
pub mod merger;
pub mod movie_service;
pub mod normalizer;
pub mod page_parser;
pub mod rules;

pub use cache_gate::CacheGate;
pub use error::{CacheError, ScrapeError, Upstream};
pub use extractor::{Capture, Extracted, Rule, RuleSet};
pub use merger::{merge, MergeField, MergePolicy, MergedRecord, Precedence, SecondaryRecord};
pub use movie_service::MovieService;
pub use page_parser::{parse_box_office_page, PrimaryRecord};
