use std::fmt;

use thiserror::Error;

use crate::{
    ip::{ipv4_parse, ipv6_parse, ipv4_serialize, ipv6_serialize, IPParseError},
    percent_encode::{is_c0_percent_encode_set, percent_decode, percent_encode},
    util,
    validation::{ValidationError, ValidationErrorHandler},
};

/// <https://url.spec.whatwg.org/#forbidden-host-code-point>
fn is_forbidden_host_code_point(c: char) -> bool {
    matches!(
        c,
        '\0' | '\t'
            | '\n'
            | '\r'
            | ' '
            | '#'
            | '%'
            | '/'
            | ':'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
            | '|'
    )
}

/// Typically either a network address or an opaque identifier in situations
/// where a network address is not required.
///
/// [Specification](https://url.spec.whatwg.org/#concept-host)
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Host {
    /// An ASCII domain name, the result of IDNA processing
    Domain(String),

    /// An IPv4 address
    Ipv4(u32),

    /// An IPv6 address as eight 16-bit pieces
    Ipv6([u16; 8]),

    /// A host of a non-special URL, kept as-is apart from percent-encoding
    Opaque(String),

    /// The empty host, as in `file:///etc/passwd`
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum HostParseError {
    #[error("host is malformed")]
    MalformedInput,

    #[error("host contains a forbidden code point")]
    ForbiddenCodePoint,

    #[error("domain could not be converted to ASCII")]
    DomainToASCII,

    #[error(transparent)]
    IP(#[from] IPParseError),
}

impl fmt::Display for Host {
    /// <https://url.spec.whatwg.org/#host-serializing>
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4(address) => f.write_str(&ipv4_serialize(*address)),
            Self::Ipv6(address) => write!(f, "[{}]", ipv6_serialize(address)),
            Self::Domain(host) | Self::Opaque(host) => f.write_str(host),
            Self::Empty => Ok(()),
        }
    }
}

/// <https://url.spec.whatwg.org/#concept-host-parser>
pub(crate) fn host_parse<H>(
    input: &str,
    is_opaque: bool,
    error_handler: &mut H,
) -> Result<Host, HostParseError>
where
    H: ValidationErrorHandler,
{
    // If input starts with U+005B ([), then:
    if input.starts_with('[') {
        // If input does not end with U+005D (])
        if !input.ends_with(']') {
            // IPv6-unclosed validation error
            error_handler.validation_error(ValidationError::IPv6Unclosed);

            // return failure.
            return Err(HostParseError::MalformedInput);
        }

        // Return the result of IPv6 parsing input with its
        // leading U+005B ([) and trailing U+005D (]) removed.
        let ipv6_text = &input[1..input.len() - 1];
        return Ok(Host::Ipv6(ipv6_parse(ipv6_text)?));
    }

    // If isOpaque is true
    if is_opaque {
        // then return the result of opaque-host parsing input.
        return opaque_host_parse(input, error_handler);
    }

    // Assert: input is not the empty string.
    debug_assert!(!input.is_empty());

    // Let domain be the result of running
    // UTF-8 decode without BOM on the percent-decoding of input.
    let domain_bytes = percent_decode(input.as_bytes());
    let domain = String::from_utf8_lossy(&domain_bytes);

    // Let asciiDomain be the result of running domain to ASCII with domain.
    // If asciiDomain is failure, validation error, return failure.
    let ascii_domain = match idna::domain_to_ascii(&domain) {
        Ok(ascii_domain) if !ascii_domain.is_empty() => ascii_domain.to_ascii_lowercase(),
        _ => {
            error_handler.validation_error(ValidationError::DomainToASCII);
            return Err(HostParseError::DomainToASCII);
        },
    };

    // If asciiDomain contains a forbidden host code point,
    if ascii_domain.chars().any(is_forbidden_host_code_point) {
        // domain-invalid-code-point validation error
        error_handler.validation_error(ValidationError::DomainInvalidCodepoint);

        // return failure.
        return Err(HostParseError::ForbiddenCodePoint);
    }

    // If asciiDomain ends in a number
    if ends_in_a_number(&ascii_domain) {
        // then return the result of IPv4 parsing asciiDomain.
        let address = ipv4_parse(&ascii_domain, error_handler)?;
        return Ok(Host::Ipv4(address));
    }

    // Return asciiDomain.
    Ok(Host::Domain(ascii_domain))
}

/// <https://url.spec.whatwg.org/#concept-opaque-host-parser>
fn opaque_host_parse<H>(input: &str, error_handler: &mut H) -> Result<Host, HostParseError>
where
    H: ValidationErrorHandler,
{
    // An absent authority is the empty host
    if input.is_empty() {
        return Ok(Host::Empty);
    }

    // If input contains a forbidden host code point.
    // U+0025 (%) is exempt, it introduces a percent-escape.
    if input
        .chars()
        .any(|c| c != '%' && is_forbidden_host_code_point(c))
    {
        // host-invalid-code-point validation error
        error_handler.validation_error(ValidationError::HostInvalidCodepoint);

        // return failure.
        return Err(HostParseError::ForbiddenCodePoint);
    }

    for (index, c) in input.char_indices() {
        // If input contains a code point that is not a URL code point and not U+0025 (%)
        if c != '%' && !util::is_url_codepoint(c) {
            // invalid-URL-unit validation error
            error_handler.validation_error(ValidationError::InvalidURLUnit);
        }

        // If input contains a U+0025 (%) and the two code points
        // following it are not ASCII hex digits
        if c == '%' && !util::starts_with_two_hex_digits(input[index + 1..].chars()) {
            // invalid-URL-unit validation error
            error_handler.validation_error(ValidationError::InvalidURLUnit);
        }
    }

    // Return the result of running UTF-8 percent-encode on input
    // using the C0 control percent-encode set.
    let mut percent_encoded = String::with_capacity(input.len());
    percent_encode(input.as_bytes(), is_c0_percent_encode_set, &mut percent_encoded);
    Ok(Host::Opaque(percent_encoded))
}

/// <https://url.spec.whatwg.org/#ends-in-a-number-checker>
fn ends_in_a_number(input: &str) -> bool {
    let mut parts: Vec<&str> = input.split('.').collect();

    if parts.last() == Some(&"") {
        if parts.len() == 1 {
            return false;
        }
        parts.pop();
    }

    let Some(last) = parts.last() else {
        return false;
    };

    if !last.is_empty() && last.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    // A hex part also counts, "0x" by itself included
    if let Some(hex) = last.strip_prefix("0x").or_else(|| last.strip_prefix("0X")) {
        return hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::IgnoreValidationErrors;

    fn parse(input: &str, is_opaque: bool) -> Result<Host, HostParseError> {
        host_parse(input, is_opaque, &mut IgnoreValidationErrors)
    }

    #[test]
    fn domain() {
        assert_eq!(
            parse("example.com", false),
            Ok(Host::Domain("example.com".to_string()))
        );
        assert_eq!(
            parse("EXAMPLE.com", false),
            Ok(Host::Domain("example.com".to_string()))
        );
    }

    #[test]
    fn percent_encoded_domain() {
        assert_eq!(
            parse("ex%61mple.com", false),
            Ok(Host::Domain("example.com".to_string()))
        );
    }

    #[test]
    fn internationalized_domain() {
        assert_eq!(
            parse("münchen.de", false),
            Ok(Host::Domain("xn--mnchen-3ya.de".to_string()))
        );
    }

    #[test]
    fn ipv4_detection() {
        assert_eq!(parse("127.0.0.1", false), Ok(Host::Ipv4(0x7F00_0001)));
        assert_eq!(parse("127.0.0.1.", false), Ok(Host::Ipv4(0x7F00_0001)));
        assert_eq!(parse("0x7f.1", false), Ok(Host::Ipv4(0x7F00_0001)));

        // Not numeric, stays a domain
        assert_eq!(
            parse("127.0.0.1x", false),
            Ok(Host::Domain("127.0.0.1x".to_string()))
        );
    }

    #[test]
    fn ipv6_literal() {
        assert_eq!(
            parse("[2001:db8::1]", false),
            Ok(Host::Ipv6([0x2001, 0xDB8, 0, 0, 0, 0, 0, 1]))
        );
        assert_eq!(
            parse("[2001:db8::1", false),
            Err(HostParseError::MalformedInput)
        );
    }

    #[test]
    fn opaque_host() {
        assert_eq!(
            parse("ex ample", true),
            Err(HostParseError::ForbiddenCodePoint)
        );
        assert_eq!(
            parse("hôst", true),
            Ok(Host::Opaque("h%C3%B4st".to_string()))
        );
        assert_eq!(
            parse("h%6fst", true),
            Ok(Host::Opaque("h%6fst".to_string()))
        );
    }

    #[test]
    fn forbidden_code_points() {
        assert_eq!(parse("ex#ample", true), Err(HostParseError::ForbiddenCodePoint));
        assert_eq!(
            parse("exa|mple.com", false),
            Err(HostParseError::ForbiddenCodePoint)
        );
    }

    #[test]
    fn serialization() {
        assert_eq!(Host::Domain("example.com".to_string()).to_string(), "example.com");
        assert_eq!(Host::Ipv4(0x7F00_0001).to_string(), "127.0.0.1");
        assert_eq!(
            Host::Ipv6([0x2001, 0xDB8, 0, 0, 0, 0, 0, 1]).to_string(),
            "[2001:db8::1]"
        );
        assert_eq!(Host::Empty.to_string(), "");
    }
}
