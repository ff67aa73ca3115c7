//! Contains parsers and utilities related to **U**niform **R**esource **L**ocators ([URL]s).
//!
//! You can find the relevant specification [here](https://url.spec.whatwg.org/).
//!
//! The preferred way to obtain a [URL] is to parse it like this:
//! ```
//! # use whatwg_url::URL;
//! let url: URL = "https://google.com".parse().unwrap();
//!
//! assert_eq!(url.scheme(), "https");
//! ```
//!
//! Parsing never fails on recoverable oddities (stray whitespace, a `\`
//! where a `/` belongs, unencoded code points); those surface as
//! [validation errors](ValidationError) on a [ValidationErrorHandler] of
//! your choosing while the parse still produces a URL:
//! ```
//! # use whatwg_url::URL;
//! let mut seen_validation_error = false;
//! let url = URL::parse_with_error_handler(
//!     " https://example.com/a\tb ",
//!     None,
//!     None,
//!     None,
//!     &mut seen_validation_error,
//! )
//! .unwrap();
//!
//! assert!(seen_validation_error);
//! assert_eq!(url.href(), "https://example.com/ab");
//! ```

mod host;
mod ip;
mod parser;
mod path;
mod percent_encode;
mod set;
mod url;
mod util;
mod validation;

pub use crate::ip::IPParseError;
pub use crate::parser::URLParserState;
pub use crate::url::*;
pub use host::{Host, HostParseError};
pub use path::Path;
pub use percent_encode::{percent_decode, percent_encode};
pub use validation::{
    IgnoreValidationErrors, LogValidationErrors, ValidationError, ValidationErrorHandler,
};
