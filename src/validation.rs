//! The soft error channel of the parser
//!
//! Validation errors do not abort a parse; they point out places where the
//! input strays from the grammar while still being recoverable. Callers
//! choose what happens to them by picking a [ValidationErrorHandler].

use thiserror::Error;

/// A non-fatal, spec-defined condition observed during parsing
///
/// [Specification](https://url.spec.whatwg.org/#validation-error)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    /// A code point was found that is not a URL unit, or stray whitespace
    /// was removed from the input
    #[error("code point is not a URL unit")]
    InvalidURLUnit,

    /// A special scheme was not followed by `//`
    #[error("special scheme is not followed by \"//\"")]
    SpecialSchemeMissingFollowingSolidus,

    /// A relative input was parsed without a usable base URL
    #[error("input is missing a scheme and no base URL was given")]
    MissingSchemeNonRelativeURL,

    /// A `\` was used where the grammar wants `/`
    #[error("unexpected \"\\\"")]
    InvalidReverseSolidus,

    /// An `@` made part of the authority read as credentials
    #[error("input includes credentials")]
    InvalidCredentials,

    /// A host was required but the input has none
    #[error("input is missing a host")]
    HostMissing,

    /// A port was larger than 65535
    #[error("port is outside of the allowed range")]
    PortOutOfRange,

    /// A port contained a non-digit
    #[error("port is not a decimal number")]
    PortInvalid,

    /// An IPv6 literal was opened with `[` but never closed
    #[error("IPv6 address is missing the closing \"]\"")]
    IPv6Unclosed,

    /// An empty IPv4 dot-part, as in `127.0.0.1.`
    #[error("IPv4 address part is empty")]
    IPv4EmptyPart,

    /// An IPv4 part was written in hexadecimal or octal notation
    #[error("IPv4 address part is not expressed in decimal")]
    IPv4NonDecimalPart,

    /// An IPv4 part exceeded 255
    #[error("IPv4 address part exceeds 255")]
    IPv4OutOfRangePart,

    /// A forbidden code point inside an opaque host
    #[error("host contains a forbidden host code point")]
    HostInvalidCodepoint,

    /// A forbidden code point inside a domain
    #[error("domain contains a forbidden domain code point")]
    DomainInvalidCodepoint,

    /// IDNA processing rejected the domain
    #[error("domain could not be converted to ASCII")]
    DomainToASCII,

    /// A Windows drive letter was used in a position that resets the path
    #[error("unexpected Windows drive letter")]
    FileInvalidWindowsDriveLetter,

    /// A Windows drive letter was used as a file host
    #[error("Windows drive letter used as a file host")]
    FileInvalidWindowsDriveLetterHost,
}

/// Receives the validation errors observed during a parse
pub trait ValidationErrorHandler {
    fn validation_error(&mut self, error: ValidationError);
}

/// Drops all validation errors, the default for plain [parse](crate::URL::parse) calls
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreValidationErrors;

impl ValidationErrorHandler for IgnoreValidationErrors {
    fn validation_error(&mut self, _: ValidationError) {}
}

/// Reports each validation error through the [log] facade
#[derive(Clone, Copy, Debug, Default)]
pub struct LogValidationErrors;

impl ValidationErrorHandler for LogValidationErrors {
    fn validation_error(&mut self, error: ValidationError) {
        log::warn!("url validation error: {error}");
    }
}

/// The single-flag observable: set to `true` if any validation error fired
impl ValidationErrorHandler for bool {
    fn validation_error(&mut self, _: ValidationError) {
        *self = true;
    }
}

/// Collects every validation error, in the order they fired
impl ValidationErrorHandler for Vec<ValidationError> {
    fn validation_error(&mut self, error: ValidationError) {
        self.push(error);
    }
}
