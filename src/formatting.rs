//! Text and markup formatting
//!
//! Pure string transforms used by the handlers: title casing, URL slugs,
//! Roman numerals, and the canonical XHTML pretty-printer.

pub mod roman;
pub mod titlecase;
pub mod url_safe;
pub mod xhtml;

pub use roman::{MAX_ROMAN, from_roman, to_roman};
pub use titlecase::titlecase;
pub use url_safe::{make_url_safe, remove_diacritics};
pub use xhtml::{FormatOptions, format_xhtml, format_xhtml_file};
