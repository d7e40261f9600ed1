use der::Encode;
use tracing::debug;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::Certificate;
use crate::cert::params::{ExtensionParam, Validity};
use crate::error::Result;
use crate::key::KeyPair;
use crate::tbs_certificate::{TbsCertificate, random_serial_number};

/// Represents an entity capable of issuing certificates.
///
/// Implementors provide the issuer name and signing key; the default
/// [`Issuer::issue`] assembles and signs the certificate.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> &Name;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Issues a certificate for `subject` and its public key.
    ///
    /// Every call draws a new random serial number. `extensions` are
    /// written in the given order with their given criticality.
    fn issue(
        &self,
        subject: Name,
        subject_public_key_info: SubjectPublicKeyInfoOwned,
        extensions: Vec<ExtensionParam>,
        validity: Validity,
    ) -> Result<Certificate> {
        let signature_algorithm = self.signing_key().signature_algorithm();

        let tbs_cert = TbsCertificate {
            serial_number: random_serial_number(),
            signature_algorithm,
            issuer: self.issuer_name().clone(),
            validity,
            subject,
            subject_public_key_info,
            extensions,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        debug!(
            certificate.subject = %tbs_cert_inner.subject,
            certificate.issuer = %tbs_cert_inner.issuer,
            certificate.serial = %tbs_cert_inner.serial_number,
            certificate.not_before = %tbs_cert_inner.validity.not_before,
            certificate.not_after = %tbs_cert_inner.validity.not_after,
            certificate.signature_algorithm = ?signature_algorithm,
            "signing certificate"
        );

        let signature = self.signing_key().sign_data(&tbs_cert_inner.to_der()?)?;

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: signature_algorithm.into(),
            signature: der::asn1::BitString::from_bytes(&signature)?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

/// Issuer for self-signed certificates: the subject signs itself.
pub(crate) struct SelfIssuer<'a> {
    pub name: Name,
    pub key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> &Name {
        &self.name
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }
}
