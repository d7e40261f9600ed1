//! Subject alternative name entries.
//!
//! Free-text tokens are classified as an IP address when they parse as an
//! IPv4 or IPv6 literal and as a DNS name otherwise. DNS names are taken
//! as-is, wildcards included.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use der::asn1::{Ia5String, OctetString};
use x509_cert::ext::pkix::name::GeneralName;

use crate::error::{CaError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SanEntry {
    IpAddress(IpAddr),
    DnsName(String),
}

impl SanEntry {
    /// Classifies a single token. IP literals are tried first so an address
    /// never ends up in a `dNSName` field.
    pub fn parse(entry: &str) -> Self {
        match entry.parse::<IpAddr>() {
            Ok(ip) => SanEntry::IpAddress(ip),
            Err(_) => SanEntry::DnsName(entry.to_string()),
        }
    }

    /// Splits a comma-separated list, trimming whitespace and skipping empty
    /// tokens. Order and duplicates are kept.
    pub fn parse_list(alt_names: &str) -> Vec<Self> {
        alt_names
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Self::parse)
            .collect()
    }

    pub fn to_general_name(&self) -> Result<GeneralName> {
        match self {
            SanEntry::IpAddress(ip) => Ok(GeneralName::from(*ip)),
            SanEntry::DnsName(name) => Ia5String::new(name)
                .map(GeneralName::DnsName)
                .map_err(|e| CaError::InvalidInput(format!("DNS name {name:?}: {e}"))),
        }
    }

    pub fn from_general_name(name: &GeneralName) -> Result<Self> {
        match name {
            GeneralName::DnsName(dns) => Ok(SanEntry::DnsName(dns.to_string())),
            GeneralName::IpAddress(octets) => ip_from_octets(octets).map(SanEntry::IpAddress),
            _ => Err(CaError::DecodingError(
                "Unsupported general name type".to_string(),
            )),
        }
    }
}

impl fmt::Display for SanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanEntry::IpAddress(ip) => write!(f, "IP:{ip}"),
            SanEntry::DnsName(name) => write!(f, "DNS:{name}"),
        }
    }
}

fn ip_from_octets(octets: &OctetString) -> Result<IpAddr> {
    let bytes = octets.as_bytes();
    if let Ok(v4) = <[u8; 4]>::try_from(bytes) {
        return Ok(IpAddr::V4(Ipv4Addr::from(v4)));
    }
    if let Ok(v6) = <[u8; 16]>::try_from(bytes) {
        return Ok(IpAddr::V6(Ipv6Addr::from(v6)));
    }
    Err(CaError::DecodingError(format!(
        "invalid IP address length {}",
        bytes.len()
    )))
}
