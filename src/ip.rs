//! IPv4 and IPv6 address parsing and canonical serialization
//!
//! An IPv4 address is a 32-bit integer, an IPv6 address is eight 16-bit
//! pieces. Both only ever round-trip through their canonical textual
//! forms: dotted quad for IPv4, `::`-compressed lowercase hex for IPv6.

use std::fmt::Write;

use thiserror::Error;

use crate::validation::{ValidationError, ValidationErrorHandler};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IPParseError {
    #[error("IPv4 part is not a number")]
    Ipv4NonNumericPart,

    #[error("IPv4 address has more than four parts")]
    Ipv4TooManyParts,

    #[error("IPv4 part is out of range")]
    Ipv4OutOfRangePart,

    #[error("IPv6 address starts with a lone \":\"")]
    Ipv6InvalidCompression,

    #[error("IPv6 address has more than eight pieces")]
    Ipv6TooManyPieces,

    #[error("IPv6 address contains \"::\" more than once")]
    Ipv6MultipleCompression,

    #[error("IPv6 address contains an unexpected code point")]
    Ipv6InvalidCodepoint,

    #[error("IPv6 address has too few pieces")]
    Ipv6TooFewPieces,

    #[error("IPv4 tail of an IPv6 address starts too late")]
    Ipv4InIpv6TooManyPieces,

    #[error("IPv4 tail of an IPv6 address contains an unexpected code point")]
    Ipv4InIpv6InvalidCodepoint,

    #[error("IPv4 tail of an IPv6 address has an out of range part")]
    Ipv4InIpv6OutOfRangePart,

    #[error("IPv4 tail of an IPv6 address has fewer than four parts")]
    Ipv4InIpv6TooFewParts,
}

/// Parse a single part of an IPv4 address
///
/// Returns the numeric value and whether the part used a non-decimal
/// notation (which the caller reports as a validation error).
fn ipv4_number_parse(part: &str) -> Result<(u64, bool), IPParseError> {
    if part.is_empty() {
        return Err(IPParseError::Ipv4NonNumericPart);
    }

    let mut input = part;
    let mut radix = 10;
    let mut uses_legacy_notation = false;

    if input.len() >= 2 && (input.starts_with("0x") || input.starts_with("0X")) {
        uses_legacy_notation = true;
        radix = 16;
        input = &input[2..];
    } else if input.len() >= 2 && input.starts_with('0') {
        uses_legacy_notation = true;
        radix = 8;
        input = &input[1..];
    }

    // "0x" on its own denotes zero
    if input.is_empty() {
        return Ok((0, true));
    }

    if !input.chars().all(|c| c.is_digit(radix)) {
        return Err(IPParseError::Ipv4NonNumericPart);
    }

    // A part too large for an u64 is certainly out of range
    let value =
        u64::from_str_radix(input, radix).map_err(|_| IPParseError::Ipv4OutOfRangePart)?;

    Ok((value, uses_legacy_notation))
}

/// <https://url.spec.whatwg.org/#concept-ipv4-parser>
pub(crate) fn ipv4_parse<H>(input: &str, error_handler: &mut H) -> Result<u32, IPParseError>
where
    H: ValidationErrorHandler,
{
    let mut parts: Vec<&str> = input.split('.').collect();

    // A single trailing dot is allowed
    if parts.last() == Some(&"") {
        error_handler.validation_error(ValidationError::IPv4EmptyPart);
        if parts.len() > 1 {
            parts.pop();
        }
    }

    if parts.len() > 4 {
        return Err(IPParseError::Ipv4TooManyParts);
    }

    let mut numbers = Vec::with_capacity(parts.len());
    for part in parts {
        let (number, uses_legacy_notation) = ipv4_number_parse(part)?;

        if uses_legacy_notation {
            error_handler.validation_error(ValidationError::IPv4NonDecimalPart);
        }

        numbers.push(number);
    }

    if numbers.iter().any(|&n| n > 255) {
        error_handler.validation_error(ValidationError::IPv4OutOfRangePart);
    }

    let (&last, rest) = numbers
        .split_last()
        .expect("split always yields at least one part");

    // Every part except the last is one octet; the last fills the rest
    if rest.iter().any(|&n| n > 255) {
        return Err(IPParseError::Ipv4OutOfRangePart);
    }

    if last >= 256u64.pow(4 - rest.len() as u32) {
        return Err(IPParseError::Ipv4OutOfRangePart);
    }

    let mut address = last as u32;
    for (index, &number) in rest.iter().enumerate() {
        address += (number as u32) << (8 * (3 - index));
    }

    Ok(address)
}

/// <https://url.spec.whatwg.org/#concept-ipv4-serializer>
pub(crate) fn ipv4_serialize(address: u32) -> String {
    let octets = address.to_be_bytes();
    format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3])
}

/// <https://url.spec.whatwg.org/#concept-ipv6-parser>
pub(crate) fn ipv6_parse(input: &str) -> Result<[u16; 8], IPParseError> {
    let input: Vec<char> = input.chars().collect();
    let c = |at: usize| input.get(at).copied();

    let mut address = [0u16; 8];
    let mut piece_index = 0;
    let mut compress = None;
    let mut pointer = 0;

    if c(0) == Some(':') {
        if c(1) != Some(':') {
            return Err(IPParseError::Ipv6InvalidCompression);
        }

        pointer += 2;
        piece_index += 1;
        compress = Some(piece_index);
    }

    while pointer < input.len() {
        if piece_index == 8 {
            return Err(IPParseError::Ipv6TooManyPieces);
        }

        if c(pointer) == Some(':') {
            if compress.is_some() {
                return Err(IPParseError::Ipv6MultipleCompression);
            }

            pointer += 1;
            piece_index += 1;
            compress = Some(piece_index);
            continue;
        }

        // Up to four hex digits form one piece
        let mut value: u16 = 0;
        let mut length = 0;
        while length < 4 {
            let Some(digit) = c(pointer).and_then(|c| c.to_digit(16)) else {
                break;
            };

            value = value * 0x10 + digit as u16;
            pointer += 1;
            length += 1;
        }

        if c(pointer) == Some('.') {
            // The rest of the input is an embedded IPv4 address
            if length == 0 {
                return Err(IPParseError::Ipv4InIpv6InvalidCodepoint);
            }

            pointer -= length;

            if piece_index > 6 {
                return Err(IPParseError::Ipv4InIpv6TooManyPieces);
            }

            let mut numbers_seen = 0;
            while pointer < input.len() {
                if numbers_seen > 0 {
                    if c(pointer) == Some('.') && numbers_seen < 4 {
                        pointer += 1;
                    } else {
                        return Err(IPParseError::Ipv4InIpv6InvalidCodepoint);
                    }
                }

                if !c(pointer).is_some_and(|c| c.is_ascii_digit()) {
                    return Err(IPParseError::Ipv4InIpv6InvalidCodepoint);
                }

                let mut ipv4_piece: Option<u16> = None;
                while let Some(digit) = c(pointer).and_then(|c| c.to_digit(10)) {
                    ipv4_piece = match ipv4_piece {
                        None => Some(digit as u16),
                        // Leading zeroes are not allowed
                        Some(0) => return Err(IPParseError::Ipv4InIpv6InvalidCodepoint),
                        Some(piece) => Some(piece * 10 + digit as u16),
                    };

                    if ipv4_piece.is_some_and(|piece| piece > 255) {
                        return Err(IPParseError::Ipv4InIpv6OutOfRangePart);
                    }

                    pointer += 1;
                }

                address[piece_index] = address[piece_index] * 0x100
                    + ipv4_piece.expect("at least one digit was consumed");
                numbers_seen += 1;

                if numbers_seen == 2 || numbers_seen == 4 {
                    piece_index += 1;
                }
            }

            if numbers_seen != 4 {
                return Err(IPParseError::Ipv4InIpv6TooFewParts);
            }

            break;
        } else if c(pointer) == Some(':') {
            pointer += 1;

            if pointer == input.len() {
                return Err(IPParseError::Ipv6InvalidCodepoint);
            }
        } else if pointer < input.len() {
            return Err(IPParseError::Ipv6InvalidCodepoint);
        }

        address[piece_index] = value;
        piece_index += 1;
    }

    if let Some(compress) = compress {
        // Move everything after the compression to the back
        let mut swaps = piece_index - compress;
        piece_index = 7;
        while piece_index != 0 && swaps > 0 {
            address.swap(piece_index, compress + swaps - 1);
            piece_index -= 1;
            swaps -= 1;
        }
    } else if piece_index != 8 {
        return Err(IPParseError::Ipv6TooFewPieces);
    }

    Ok(address)
}

/// <https://url.spec.whatwg.org/#concept-ipv6-serializer>
pub(crate) fn ipv6_serialize(address: &[u16; 8]) -> String {
    // Find the leftmost longest run of at least two zero pieces
    let mut compress = None;
    let mut compress_length = 0;
    let mut index = 0;
    while index < address.len() {
        if address[index] != 0 {
            index += 1;
            continue;
        }

        let run_start = index;
        while index < address.len() && address[index] == 0 {
            index += 1;
        }

        if index - run_start > compress_length {
            compress = Some(run_start);
            compress_length = index - run_start;
        }
    }

    if compress_length < 2 {
        compress = None;
    }

    let mut output = String::new();
    let mut in_compressed_run = false;
    for (piece_index, &piece) in address.iter().enumerate() {
        if in_compressed_run {
            if piece == 0 {
                continue;
            }
            in_compressed_run = false;
        }

        if compress == Some(piece_index) {
            output.push_str(if piece_index == 0 { "::" } else { ":" });
            in_compressed_run = true;
            continue;
        }

        let _ = write!(output, "{piece:x}");
        if piece_index != 7 {
            output.push(':');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::IgnoreValidationErrors;

    fn ipv4(input: &str) -> Result<u32, IPParseError> {
        ipv4_parse(input, &mut IgnoreValidationErrors)
    }

    #[test]
    fn ipv4_dotted_quad() {
        assert_eq!(ipv4("127.0.0.1"), Ok(0x7F00_0001));
        assert_eq!(ipv4("0.0.0.0"), Ok(0));
        assert_eq!(ipv4("255.255.255.255"), Ok(u32::MAX));
    }

    #[test]
    fn ipv4_legacy_notations() {
        // Hex, octal and partial forms
        assert_eq!(ipv4("0x7f.1"), Ok(0x7F00_0001));
        assert_eq!(ipv4("0x7f.0.0.1"), Ok(0x7F00_0001));
        assert_eq!(ipv4("017.0.0.1"), Ok(0x0F00_0001));
        assert_eq!(ipv4("2130706433"), Ok(0x7F00_0001));
        assert_eq!(ipv4("127.1"), Ok(0x7F00_0001));
        assert_eq!(ipv4("0x"), Ok(0));
    }

    #[test]
    fn ipv4_trailing_dot() {
        assert_eq!(ipv4("127.0.0.1."), Ok(0x7F00_0001));
        assert_eq!(ipv4("127.0.0.1.."), Err(IPParseError::Ipv4TooManyParts));
    }

    #[test]
    fn ipv4_rejects_out_of_range() {
        assert_eq!(ipv4("256.0.0.1"), Err(IPParseError::Ipv4OutOfRangePart));
        assert_eq!(ipv4("1.2.3.256"), Err(IPParseError::Ipv4OutOfRangePart));
        assert_eq!(ipv4("4294967296"), Err(IPParseError::Ipv4OutOfRangePart));
        assert_eq!(
            ipv4("1.2.3.4.5"),
            Err(IPParseError::Ipv4TooManyParts)
        );
        assert_eq!(ipv4("1.2.x.4"), Err(IPParseError::Ipv4NonNumericPart));
    }

    #[test]
    fn ipv4_reports_legacy_notation() {
        let mut errors: Vec<ValidationError> = vec![];
        ipv4_parse("0x7f.0.0.1", &mut errors).unwrap();
        assert_eq!(errors, [ValidationError::IPv4NonDecimalPart]);
    }

    #[test]
    fn ipv4_roundtrip() {
        assert_eq!(ipv4_serialize(0x7F00_0001), "127.0.0.1");
        assert_eq!(ipv4_serialize(0), "0.0.0.0");
        assert_eq!(ipv4_serialize(u32::MAX), "255.255.255.255");
    }

    #[test]
    fn ipv6_full_form() {
        assert_eq!(
            ipv6_parse("1:2:3:4:5:6:7:8"),
            Ok([1, 2, 3, 4, 5, 6, 7, 8])
        );
    }

    #[test]
    fn ipv6_compression() {
        assert_eq!(
            ipv6_parse("2001:db8::1"),
            Ok([0x2001, 0xDB8, 0, 0, 0, 0, 0, 1])
        );
        assert_eq!(ipv6_parse("::"), Ok([0; 8]));
        assert_eq!(ipv6_parse("::1"), Ok([0, 0, 0, 0, 0, 0, 0, 1]));
        assert_eq!(ipv6_parse("1::"), Ok([1, 0, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn ipv6_embedded_ipv4() {
        assert_eq!(
            ipv6_parse("::ffff:192.168.0.1"),
            Ok([0, 0, 0, 0, 0, 0xFFFF, 0xC0A8, 0x1])
        );
        assert_eq!(
            ipv6_parse("::ffff:192.168.1"),
            Err(IPParseError::Ipv4InIpv6TooFewParts)
        );
        assert_eq!(
            ipv6_parse("::ffff:192.168.0.256"),
            Err(IPParseError::Ipv4InIpv6OutOfRangePart)
        );
    }

    #[test]
    fn ipv6_rejects_malformed() {
        assert_eq!(ipv6_parse(":1"), Err(IPParseError::Ipv6InvalidCompression));
        assert_eq!(ipv6_parse("1:2"), Err(IPParseError::Ipv6TooFewPieces));
        assert_eq!(
            ipv6_parse("1::2::3"),
            Err(IPParseError::Ipv6MultipleCompression)
        );
        assert_eq!(
            ipv6_parse("1:2:3:4:5:6:7:8:9"),
            Err(IPParseError::Ipv6TooManyPieces)
        );
        assert_eq!(ipv6_parse("1:2:3"), Err(IPParseError::Ipv6TooFewPieces));
        assert_eq!(ipv6_parse("x::1"), Err(IPParseError::Ipv6InvalidCodepoint));
        assert_eq!(ipv6_parse("1:"), Err(IPParseError::Ipv6InvalidCodepoint));
    }

    #[test]
    fn ipv6_serializer_compresses_longest_run() {
        assert_eq!(ipv6_serialize(&[0x2001, 0xDB8, 0, 0, 0, 0, 0, 1]), "2001:db8::1");
        assert_eq!(ipv6_serialize(&[0; 8]), "::");
        assert_eq!(ipv6_serialize(&[0, 0, 0, 0, 0, 0, 0, 1]), "::1");
        assert_eq!(ipv6_serialize(&[1, 0, 0, 0, 0, 0, 0, 0]), "1::");
        assert_eq!(
            ipv6_serialize(&[1, 2, 3, 4, 5, 6, 7, 8]),
            "1:2:3:4:5:6:7:8"
        );
        // The first of two equally long runs wins
        assert_eq!(ipv6_serialize(&[1, 0, 0, 2, 3, 0, 0, 4]), "1::2:3:0:0:4");
        // Single zero pieces are not compressed
        assert_eq!(ipv6_serialize(&[1, 0, 2, 3, 4, 5, 6, 7]), "1:0:2:3:4:5:6:7");
    }
}
