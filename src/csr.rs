//! PKCS#10 certificate signing requests.
//!
//! The request is signed by the key it carries. That proves possession of
//! the private key; the CA does not derive any trust from it.

use const_oid::db::rfc5912::ID_EXTENSION_REQ;
use der::asn1::{BitString, SetOfVec};
use der::{Any, DecodePem, Encode, EncodePem};
use tracing::{debug, instrument};
use x509_cert::attr::Attribute;
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::request::{CertReq, CertReqInfo, Version};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::extensions::{SubjectAltName, ToAndFromX509Extension};
use crate::cert::params::{DistinguishedName, ExtensionParam};
use crate::cert::san::SanEntry;
use crate::error::{CaError, Result};
use crate::key::KeyPair;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSigningRequest {
    pub inner: CertReq,
}

impl CertificateSigningRequest {
    /// Builds and self-signs a request for `subject`, asking for a
    /// non-critical SAN extension with `subject_alt_names`.
    #[instrument(
        name = "build_signing_request",
        skip_all,
        fields(subject = %subject.common_name)
    )]
    pub fn new(
        subject: &DistinguishedName,
        subject_alt_names: &[SanEntry],
        key: &KeyPair,
    ) -> Result<Self> {
        let san = SubjectAltName {
            names: subject_alt_names.to_vec(),
        };
        let requested: Vec<Extension> =
            vec![ExtensionParam::from_extension(&san, false)?.to_x509()?];

        let extension_request = Attribute {
            oid: ID_EXTENSION_REQ,
            values: SetOfVec::try_from(vec![Any::encode_from(&requested)?])?,
        };

        let info = CertReqInfo {
            version: Version::V1,
            subject: subject.as_x509_name()?,
            public_key: key.as_spki()?,
            attributes: SetOfVec::try_from(vec![extension_request])?,
        };

        let signature = key.sign_data(&info.to_der()?)?;
        debug!(
            request.san = ?subject_alt_names,
            request.public_key.algorithm = %key.algorithm(),
            "signed certificate request"
        );

        Ok(Self {
            inner: CertReq {
                info,
                algorithm: key.signature_algorithm().into(),
                signature: BitString::from_bytes(&signature)?,
            },
        })
    }

    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CaError::EncodingError(e.to_string()))
    }

    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = CertReq::from_pem(pem.as_bytes())
            .map_err(|e| CaError::DecodingError(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn subject_name(&self) -> &Name {
        &self.inner.info.subject
    }

    pub fn public_key_info(&self) -> &SubjectPublicKeyInfoOwned {
        &self.inner.info.public_key
    }

    /// All extensions listed in the request's extensionRequest attribute.
    pub fn requested_extensions(&self) -> Result<Vec<ExtensionParam>> {
        let mut extensions = Vec::new();
        for attribute in self.inner.info.attributes.iter() {
            if attribute.oid != ID_EXTENSION_REQ {
                continue;
            }
            for value in attribute.values.iter() {
                let requested = value
                    .decode_as::<Vec<Extension>>()
                    .map_err(|e| CaError::DecodingError(e.to_string()))?;
                extensions.extend(requested.iter().map(ExtensionParam::from_x509));
            }
        }
        Ok(extensions)
    }

    /// The requested SAN extension, as carried in the request.
    pub fn subject_alt_name_extension(&self) -> Result<Option<ExtensionParam>> {
        Ok(self
            .requested_extensions()?
            .into_iter()
            .find(|ext| ext.oid == SubjectAltName::OID))
    }

    pub fn subject_alt_names(&self) -> Result<Vec<SanEntry>> {
        Ok(match self.subject_alt_name_extension()? {
            Some(ext) => ext.to_extension::<SubjectAltName>()?.names,
            None => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyAlgorithm;

    fn subject(common_name: &str) -> DistinguishedName {
        DistinguishedName::builder()
            .common_name(common_name.to_string())
            .organization("Homelab".to_string())
            .build()
    }

    #[test]
    fn test_request_carries_subject_and_sans() {
        let key = KeyPair::generate(KeyAlgorithm::EcdsaP256).unwrap();
        let sans = SanEntry::parse_list("db.lan, 10.0.0.5, *.db.lan");
        let csr = CertificateSigningRequest::new(&subject("db.lan"), &sans, &key).unwrap();

        assert_eq!(
            DistinguishedName::from_x509_name(csr.subject_name())
                .unwrap()
                .common_name,
            "db.lan"
        );
        assert_eq!(csr.subject_alt_names().unwrap(), sans);
        assert!(!csr.subject_alt_name_extension().unwrap().unwrap().critical);
        assert_eq!(csr.public_key_info(), &key.as_spki().unwrap());
    }

    #[test]
    fn test_pem_round_trip() {
        let key = KeyPair::generate(KeyAlgorithm::EcdsaP384).unwrap();
        let csr =
            CertificateSigningRequest::new(&subject("nas"), &[SanEntry::parse("nas")], &key)
                .unwrap();
        let pem = csr.to_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE REQUEST-----"));
        assert_eq!(CertificateSigningRequest::from_pem(&pem).unwrap(), csr);
    }
}
