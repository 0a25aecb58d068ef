//! Typographic transforms on XHTML text

pub mod hyphenate;
pub mod quotes;

pub use hyphenate::{SOFT_HYPHEN, document_language, hyphenate_xhtml, load_hyphenator};
pub use quotes::{QuoteStyle, convert_british_to_american, guess_quoting_style};
