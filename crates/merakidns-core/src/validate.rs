// ── DNS address validation ──

use std::net::Ipv4Addr;

use crate::error::CoreError;

/// Returns `true` when `candidate` is a dotted-quad IPv4 address.
///
/// Empty input, out-of-range octets, missing octets, leading zeros and
/// surrounding whitespace are all rejected.
pub fn is_valid_ipv4(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.parse::<Ipv4Addr>().is_ok()
}

/// Parse an operator-supplied DNS address, naming `field` in the error.
pub fn parse_dns_address(field: &str, candidate: &str) -> Result<Ipv4Addr, CoreError> {
    if candidate.is_empty() {
        return Err(CoreError::validation(field, "address is empty"));
    }
    candidate.parse().map_err(|_| {
        CoreError::validation(
            field,
            format!("'{candidate}' is not a dotted-quad IPv4 address"),
        )
    })
}
