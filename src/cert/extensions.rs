use const_oid::AssociatedOid;
use der::{Decode, Encode, oid::ObjectIdentifier};

pub use der::flagset::FlagSet;
use x509_cert::ext::pkix::KeyUsage as X509KeyUsage;
pub use x509_cert::ext::pkix::KeyUsages;

use super::san::SanEntry;
use crate::error::CaError;

/// Trait for converting to and from X.509 extensions.
///
/// This trait provides methods to encode and decode X.509 extension values.
///
/// # Example
/// ```
/// use homelab_ca::cert::extensions::{SubjectAltName, ToAndFromX509Extension};
/// use homelab_ca::cert::san::SanEntry;
///
/// let san = SubjectAltName { names: vec![SanEntry::parse("example.com")] };
/// let encoded = san.to_x509_extension_value().unwrap();
/// let decoded = SubjectAltName::from_x509_extension_value(&encoded).unwrap();
/// assert_eq!(san.names, decoded.names);
/// ```
pub trait ToAndFromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension into a DER-encoded byte vector.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CaError>;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CaError>
    where
        Self: Sized;
}

/// Represents the Subject Alternative Name (SAN) extension.
///
/// # Fields
/// * `names` - DNS names and IP addresses, in certificate order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAltName {
    pub names: Vec<SanEntry>,
}

impl ToAndFromX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CaError> {
        let san = x509_cert::ext::pkix::SubjectAltName(
            self.names
                .iter()
                .map(SanEntry::to_general_name)
                .collect::<Result<Vec<_>, _>>()?,
        );

        Ok(san.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CaError> {
        let san = x509_cert::ext::pkix::SubjectAltName::from_der(extension)
            .map_err(|e| CaError::DecodingError(e.to_string()))?;
        let names = san
            .0
            .iter()
            .map(SanEntry::from_general_name)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { names })
    }
}

/// Represents the Basic Constraints extension.
///
/// # Fields
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `max_path_length` - The maximum number of intermediate CAs allowed,
///   `None` for no restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u8>,
}

impl ToAndFromX509Extension for BasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CaError> {
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint: self.max_path_length,
        };

        Ok(bc.to_der()?)
    }

    fn from_x509_extension_value(der_bytes: &[u8]) -> Result<Self, CaError> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(der_bytes)
            .map_err(|e| CaError::DecodingError(e.to_string()))?;
        Ok(Self {
            is_ca: bc.ca,
            max_path_length: bc.path_len_constraint,
        })
    }
}

/// Represents the Key Usage extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl KeyUsage {
    /// Key usage of a root CA: signing certificates and CRLs.
    pub fn certificate_authority() -> Self {
        Self(KeyUsages::KeyCertSign | KeyUsages::CRLSign)
    }
}

impl ToAndFromX509Extension for KeyUsage {
    const OID: ObjectIdentifier = <X509KeyUsage as AssociatedOid>::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CaError> {
        let ku = X509KeyUsage(self.0);
        Ok(ku.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CaError> {
        let ku = X509KeyUsage::from_der(extension)
            .map_err(|e| CaError::DecodingError(e.to_string()))?;
        Ok(Self(ku.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_constraints_without_path_length() {
        let value = BasicConstraints {
            is_ca: true,
            max_path_length: None,
        };
        let encoded = value.to_x509_extension_value().unwrap();
        let decoded = BasicConstraints::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn test_subject_alt_name_keeps_mixed_order() {
        let value = SubjectAltName {
            names: SanEntry::parse_list("db.lan, 10.0.0.5, *.db.lan, ::1"),
        };
        let encoded = value.to_x509_extension_value().unwrap();
        let decoded = SubjectAltName::from_x509_extension_value(&encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn test_ca_key_usage() {
        let usage = KeyUsage::certificate_authority();
        assert!(usage.0.contains(KeyUsages::KeyCertSign));
        assert!(!usage.0.contains(KeyUsages::DigitalSignature));
        let encoded = usage.to_x509_extension_value().unwrap();
        assert_eq!(KeyUsage::from_x509_extension_value(&encoded).unwrap(), usage);
    }

    #[test]
    fn test_garbage_is_a_decoding_error() {
        assert!(matches!(
            SubjectAltName::from_x509_extension_value(&[0xff, 0x00]),
            Err(CaError::DecodingError(_))
        ));
    }
}
