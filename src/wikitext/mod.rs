//! Wikitext module root
//!
//! Declares the markup layer: the template scanner (`parser`), parameter
//! value interpretation (`value`), link parsing (`types::links`) and the shared
//! error type.

pub mod errors;
pub mod parser;
pub mod types;
pub mod value;

pub use errors::{Result, WtError};
pub use parser::{Template, TemplateMap, extract_title, parse_templates};
pub use value::{ElementMap, ParsedValue, interpret_value};
