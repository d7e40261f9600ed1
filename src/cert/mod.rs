pub mod extensions;
pub mod params;
pub mod san;

use crate::error::CaError;
pub type Result<T> = std::result::Result<T, CaError>;
use der::{DecodePem, Encode, EncodePem};
use extensions::{BasicConstraints, SubjectAltName, ToAndFromX509Extension};
use params::{DistinguishedName, Validity};
use san::SanEntry;
use time::OffsetDateTime;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::key::KeyAlgorithm;

/// Represents the supported signature algorithms for certificates.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption.
    Sha256WithRSA,
    /// SHA-256 with ECDSA.
    Sha256WithECDSA,
    /// SHA-384 with ECDSA.
    Sha384WithECDSA,
    /// SHA-512 with ECDSA.
    Sha512WithECDSA,
}

impl SignatureAlgorithm {
    pub fn from_oid(oid: const_oid::ObjectIdentifier) -> Result<Self> {
        match oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => Ok(Self::Sha256WithRSA),
            const_oid::db::rfc5912::ECDSA_WITH_SHA_256 => Ok(Self::Sha256WithECDSA),
            const_oid::db::rfc5912::ECDSA_WITH_SHA_384 => Ok(Self::Sha384WithECDSA),
            const_oid::db::rfc5912::ECDSA_WITH_SHA_512 => Ok(Self::Sha512WithECDSA),
            other => Err(CaError::DecodingError(format!(
                "Unsupported signature algorithm {other}"
            ))),
        }
    }
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA carries an explicit NULL parameter, ECDSA carries none.
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(der::Any::null()),
            },
            SignatureAlgorithm::Sha256WithECDSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
                parameters: None,
            },
            SignatureAlgorithm::Sha384WithECDSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_384,
                parameters: None,
            },
            SignatureAlgorithm::Sha512WithECDSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_512,
                parameters: None,
            },
        }
    }
}

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM
/// formats and to read back the fields the engine sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CaError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CaError::EncodingError(e.to_string()))
    }

    /// Parses a PEM-encoded certificate.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = CertificateInner::from_pem(pem.as_bytes())
            .map_err(|e| CaError::DecodingError(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn subject_name(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer_name(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    pub fn subject(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(self.subject_name())
    }

    pub fn issuer(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(self.issuer_name())
    }

    /// Serial number as big-endian bytes.
    pub fn serial_number(&self) -> &[u8] {
        self.inner.tbs_certificate.serial_number.as_bytes()
    }

    pub fn validity(&self) -> Validity {
        let validity = &self.inner.tbs_certificate.validity;
        Validity {
            not_before: OffsetDateTime::from(validity.not_before.to_system_time()),
            not_after: OffsetDateTime::from(validity.not_after.to_system_time()),
        }
    }

    pub fn public_key_info(&self) -> &SubjectPublicKeyInfoOwned {
        &self.inner.tbs_certificate.subject_public_key_info
    }

    pub fn public_key_algorithm(&self) -> Result<KeyAlgorithm> {
        KeyAlgorithm::from_spki(self.public_key_info())
    }

    pub fn signature_algorithm(&self) -> Result<SignatureAlgorithm> {
        SignatureAlgorithm::from_oid(self.inner.signature_algorithm.oid)
    }

    /// Returns the decoded extension of type `E` and its criticality, if
    /// the certificate carries one.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<(E, bool)>> {
        let Some(extensions) = &self.inner.tbs_certificate.extensions else {
            return Ok(None);
        };
        extensions
            .iter()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| {
                E::from_x509_extension_value(ext.extn_value.as_bytes())
                    .map(|value| (value, ext.critical))
            })
            .transpose()
    }

    /// Subject alternative names in certificate order; empty when the
    /// extension is absent.
    pub fn subject_alt_names(&self) -> Result<Vec<SanEntry>> {
        Ok(self
            .extension::<SubjectAltName>()?
            .map(|(san, _)| san.names)
            .unwrap_or_default())
    }

    pub fn basic_constraints(&self) -> Result<Option<BasicConstraints>> {
        Ok(self.extension::<BasicConstraints>()?.map(|(bc, _)| bc))
    }

    pub fn is_ca(&self) -> Result<bool> {
        Ok(self.basic_constraints()?.is_some_and(|bc| bc.is_ca))
    }

    pub fn is_self_issued(&self) -> bool {
        self.subject_name() == self.issuer_name()
    }
}
