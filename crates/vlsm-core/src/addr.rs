// ── IPv4 address arithmetic ──
//
// Conversions between dotted-decimal text and `u32`, prefix → mask
// derivation, and the syntactic CIDR gate. Everything here is a pure
// function over integers; the most significant octet is always first.

use std::net::Ipv4Addr;

use crate::error::CoreError;

/// Longest IPv4 prefix length.
pub const MAX_PREFIX: u8 = 32;

/// Parse a dotted-quad (`a.b.c.d`) into its 32-bit value.
///
/// Fails with [`CoreError::Format`] unless the text has exactly four
/// dot-separated decimal octets, each in `0..=255`.
pub fn parse_address(text: &str) -> Result<u32, CoreError> {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 4 {
        return Err(CoreError::format(
            text,
            format!("expected 4 octets, found {}", parts.len()),
        ));
    }

    parts.iter().try_fold(0_u32, |acc, part| {
        let octet = parse_octet(part).ok_or_else(|| {
            CoreError::format(text, format!("octet '{part}' is not a number in 0-255"))
        })?;
        Ok((acc << 8) | u32::from(octet))
    })
}

/// Render a 32-bit value as four decimal octets.
pub fn format_address(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}

/// Subnet mask with the top `prefix` bits set.
///
/// `/0` is all zeros and `/32` all ones. Prefixes beyond 32 clamp to 32.
pub fn mask_from_prefix(prefix: u8) -> u32 {
    let prefix = u32::from(prefix.min(MAX_PREFIX));
    // A shift by the full width is not a valid `<<`, hence checked_shl.
    u32::MAX.checked_shl(32 - prefix).unwrap_or(0)
}

/// Wildcard (host) mask: the complement of [`mask_from_prefix`].
pub fn wildcard_from_prefix(prefix: u8) -> u32 {
    !mask_from_prefix(prefix)
}

/// Dotted binary form of a value, e.g. `11111111.11111111.11111111.00000000`.
pub fn to_binary(value: u32) -> String {
    value
        .to_be_bytes()
        .iter()
        .map(|octet| format!("{octet:08b}"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Syntactic gate for `A.B.C.D/P` notation.
///
/// Each octet is one to three ASCII digits with a value of at most 255.
/// The prefix is `0`–`32` written with one or two digits and no leading
/// zero on two-digit values (`05` and `032` are rejected).
pub fn validate_cidr(text: &str) -> bool {
    let Some((address, prefix)) = text.split_once('/') else {
        return false;
    };

    let octets: Vec<&str> = address.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| is_octet(o)) && is_prefix(prefix)
}

/// Split CIDR text into `(address, prefix)` without normalizing host bits.
pub fn parse_cidr(text: &str) -> Result<(u32, u8), CoreError> {
    let (address, prefix) = text
        .split_once('/')
        .ok_or_else(|| CoreError::format(text, "missing '/<prefix>'"))?;

    let address = parse_address(address)?;
    let prefix: u8 = prefix
        .parse()
        .ok()
        .filter(|p| *p <= MAX_PREFIX)
        .ok_or_else(|| CoreError::format(text, format!("prefix '{prefix}' is not in 0-32")))?;

    Ok((address, prefix))
}

fn parse_octet(part: &str) -> Option<u8> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn is_octet(part: &str) -> bool {
    (1..=3).contains(&part.len())
        && part.bytes().all(|b| b.is_ascii_digit())
        && part.parse::<u16>().is_ok_and(|v| v <= 255)
}

fn is_prefix(prefix: &str) -> bool {
    match prefix.as_bytes() {
        [d] => d.is_ascii_digit(),
        [b'1' | b'2', d] => d.is_ascii_digit(),
        [b'3', b'0'..=b'2'] => true,
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_address_most_significant_first() {
        assert_eq!(parse_address("192.168.0.1").unwrap(), 0xC0A8_0001);
        assert_eq!(parse_address("0.0.0.0").unwrap(), 0);
        assert_eq!(parse_address("255.255.255.255").unwrap(), u32::MAX);
    }

    #[test]
    fn parse_address_rejects_wrong_octet_count() {
        let err = parse_address("10.0.0").unwrap_err();
        assert!(matches!(err, CoreError::Format { .. }));
        assert!(parse_address("10.0.0.0.0").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn parse_address_rejects_bad_octets() {
        assert!(parse_address("256.0.0.0").is_err());
        assert!(parse_address("a.b.c.d").is_err());
        assert!(parse_address("1..2.3").is_err());
        assert!(parse_address("-1.0.0.0").is_err());
        assert!(parse_address("+1.0.0.0").is_err());
    }

    #[test]
    fn format_address_has_no_leading_zeros() {
        assert_eq!(format_address(0x0A00_0001), "10.0.0.1");
        assert_eq!(format_address(0), "0.0.0.0");
        assert_eq!(format_address(u32::MAX), "255.255.255.255");
    }

    #[test]
    fn round_trip_across_the_address_space() {
        let samples = (0..=u32::MAX)
            .step_by(7_919_993)
            .chain([0, 1, 255, 256, 0x00FF_FFFF, u32::MAX - 1, u32::MAX]);
        for v in samples {
            assert_eq!(parse_address(&format_address(v)).unwrap(), v, "value {v:#x}");
        }
    }

    #[test]
    fn mask_edges() {
        assert_eq!(mask_from_prefix(0), 0);
        assert_eq!(mask_from_prefix(1), 0x8000_0000);
        assert_eq!(mask_from_prefix(31), 0xFFFF_FFFE);
        assert_eq!(mask_from_prefix(32), u32::MAX);
        assert_eq!(mask_from_prefix(40), u32::MAX);
        assert_eq!(format_address(mask_from_prefix(24)), "255.255.255.0");
    }

    #[test]
    fn mask_and_wildcard_are_complements_for_every_prefix() {
        for p in 0..=MAX_PREFIX {
            let mask = mask_from_prefix(p);
            let wildcard = wildcard_from_prefix(p);
            assert_eq!(mask & wildcard, 0, "/{p}");
            assert_eq!(mask | wildcard, u32::MAX, "/{p}");
            assert_eq!(mask.count_ones(), u32::from(p), "/{p}");
        }
    }

    #[test]
    fn wildcard_for_common_prefixes() {
        assert_eq!(format_address(wildcard_from_prefix(24)), "0.0.0.255");
        assert_eq!(format_address(wildcard_from_prefix(0)), "255.255.255.255");
        assert_eq!(format_address(wildcard_from_prefix(32)), "0.0.0.0");
    }

    #[test]
    fn binary_form() {
        assert_eq!(
            to_binary(mask_from_prefix(20)),
            "11111111.11111111.11110000.00000000"
        );
    }

    #[test]
    fn validate_cidr_accepts_well_formed_blocks() {
        assert!(validate_cidr("10.0.0.0/24"));
        assert!(validate_cidr("0.0.0.0/0"));
        assert!(validate_cidr("255.255.255.255/32"));
        assert!(validate_cidr("192.168.001.010/9"));
    }

    #[test]
    fn validate_cidr_rejects_out_of_range_values() {
        assert!(!validate_cidr("300.1.1.1/24"));
        assert!(!validate_cidr("10.0.0.0/33"));
        assert!(!validate_cidr("10.0.0.256/8"));
    }

    #[test]
    fn validate_cidr_rejects_malformed_text() {
        for bad in [
            "",
            "10.0.0.0",
            "10.0.0/24",
            "10.0.0.0.0/24",
            "10.0.0.0/",
            "10.0.0.0/05",
            "10.0.0.0/032",
            "10.0.0.0/24/8",
            "1000.0.0.0/8",
            " 10.0.0.0/8",
            "10.0.0.0/8 ",
            "a.b.c.d/8",
            "10.0.0.0/x",
        ] {
            assert!(!validate_cidr(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn parse_cidr_keeps_host_bits() {
        assert_eq!(parse_cidr("192.168.1.5/24").unwrap(), (0xC0A8_0105, 24));
    }

    #[test]
    fn parse_cidr_rejects_missing_or_oversized_prefix() {
        assert!(parse_cidr("10.0.0.0").is_err());
        assert!(parse_cidr("10.0.0.0/33").is_err());
        assert!(parse_cidr("10.0.0.0/abc").is_err());
    }
}
