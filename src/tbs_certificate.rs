use std::time::SystemTime;

use der::asn1::{GeneralizedTime, UtcTime};
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::Time;

use crate::cert::SignatureAlgorithm;
use crate::cert::params::{ExtensionParam, Validity};
use crate::error::{CaError, Result};

/// Number of random bytes in a serial number. The top bit is cleared so
/// the value stays positive and fits the 20 octets RFC 5280 allows.
const SERIAL_NUMBER_LEN: usize = 20;

/// Draws a fresh random serial number. Collisions are not tracked; with 159
/// random bits they are treated as impossible.
pub fn random_serial_number() -> Vec<u8> {
    let mut bytes = rand::random::<[u8; SERIAL_NUMBER_LEN]>();
    bytes[0] &= 0x7f;
    bytes.to_vec()
}

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// # Fields
/// * `serial_number` - The unique identifier for the certificate.
/// * `signature_algorithm` - The algorithm the issuer signs with.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The certificate's validity period.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key_info` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
pub struct TbsCertificate {
    pub serial_number: Vec<u8>,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key_info: SubjectPublicKeyInfoOwned,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let extensions = self
            .extensions
            .iter()
            .map(ExtensionParam::to_x509)
            .collect::<Result<Vec<_>>>()?;

        let validity = x509_cert::time::Validity {
            not_before: to_x509_time(self.validity.not_before)?,
            not_after: to_x509_time(self.validity.not_after)?,
        };

        let serial_number = SerialNumber::new(self.serial_number.as_slice())?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number,
            signature: self.signature_algorithm.into(),
            issuer: self.issuer.clone(),
            validity,
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key_info.clone(),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: (!extensions.is_empty()).then_some(extensions),
        })
    }
}

// UTCTime up to 2049, GeneralizedTime after, whole seconds only.
fn to_x509_time(instant: time::OffsetDateTime) -> Result<Time> {
    let truncated = instant
        .replace_nanosecond(0)
        .map_err(|e| CaError::InvalidInput(e.to_string()))?;
    let system_time = SystemTime::from(truncated);
    if truncated.year() < 2050 {
        Ok(Time::UtcTime(UtcTime::from_system_time(system_time)?))
    } else {
        Ok(Time::GeneralTime(GeneralizedTime::from_system_time(system_time)?))
    }
}

#[cfg(test)]
mod tests {
    use x509_cert::certificate::Rfc5280;

    use super::*;

    #[test]
    fn test_serial_numbers_are_positive_and_distinct() {
        let first = random_serial_number();
        let second = random_serial_number();
        assert_eq!(first.len(), SERIAL_NUMBER_LEN);
        assert!(first[0] & 0x80 == 0);
        assert_ne!(first, second);
        assert!(SerialNumber::<Rfc5280>::new(&first).is_ok());
    }

    #[test]
    fn test_validity_is_truncated_to_seconds() {
        let validity = Validity::for_days(30).unwrap();
        let encoded = to_x509_time(validity.not_before).unwrap();
        let round_trip = time::OffsetDateTime::from(encoded.to_system_time());
        assert_eq!(round_trip.nanosecond(), 0);
        assert_eq!(round_trip.unix_timestamp(), validity.not_before.unix_timestamp());
    }

    #[test]
    fn test_time_encoding_switches_in_2050() {
        let before = time::OffsetDateTime::from_unix_timestamp(2_524_607_999).unwrap();
        let after = time::OffsetDateTime::from_unix_timestamp(2_524_608_000).unwrap();
        assert!(matches!(to_x509_time(before).unwrap(), Time::UtcTime(_)));
        assert!(matches!(to_x509_time(after).unwrap(), Time::GeneralTime(_)));
    }
}
