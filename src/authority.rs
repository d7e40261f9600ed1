//! The root certificate authority.
//!
//! The CA is a key pair plus a self-signed certificate stored as
//! `ca.key`/`ca.pem` under the configured CA directory. Creating a CA
//! overwrites whatever was there before.

use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument};
use x509_cert::name::Name;

use crate::cert::Certificate;
use crate::cert::extensions::{BasicConstraints, KeyUsage};
use crate::cert::params::{DistinguishedName, ExtensionParam, Validity};
use crate::config::CaConfig;
use crate::csr::CertificateSigningRequest;
use crate::error::{CaError, Result};
use crate::issuer::{Issuer, SelfIssuer};
use crate::key::{KeyAlgorithm, KeyPair};

/// A root CA: the signing key and its self-signed certificate.
#[derive(Debug, Clone)]
pub struct CertificateAuthority {
    key: KeyPair,
    certificate: Certificate,
}

impl CertificateAuthority {
    /// Generates a new CA and writes it to the configured CA paths.
    ///
    /// Any existing CA material is overwritten without confirmation, which
    /// orphans every certificate it issued. If writing the certificate
    /// fails after the key was written, the key stays on disk.
    #[instrument(
        name = "create_certificate_authority",
        skip(config),
        fields(ca.root = %config.ca_root.display())
    )]
    pub fn create(config: &CaConfig, algorithm: KeyAlgorithm) -> Result<Self> {
        let key = KeyPair::generate(algorithm)?;
        let ca = Self::self_signed(config, key)?;
        ca.persist(config)?;

        info!(
            ca.subject = %ca.certificate.subject_name(),
            ca.public_key.algorithm = %algorithm,
            ca.not_after = %ca.certificate.inner.tbs_certificate.validity.not_after,
            "created certificate authority"
        );
        Ok(ca)
    }

    /// Builds the self-signed CA certificate for `key` without touching
    /// the filesystem.
    ///
    /// The certificate carries a critical BasicConstraints extension with
    /// `cA = true` and no path length limit, plus a critical KeyUsage for
    /// certificate and CRL signing. A `ca_validity_days` below one or past
    /// the representable date range is [`CaError::InvalidInput`].
    pub fn self_signed(config: &CaConfig, key: KeyPair) -> Result<Self> {
        let subject = config.ca_subject().as_x509_name()?;
        let basic_constraints = BasicConstraints {
            is_ca: true,
            max_path_length: None,
        };
        let extensions = vec![
            ExtensionParam::from_extension(&basic_constraints, true)?,
            ExtensionParam::from_extension(&KeyUsage::certificate_authority(), true)?,
        ];

        let self_issuer = SelfIssuer {
            name: subject.clone(),
            key: &key,
        };
        let certificate = self_issuer.issue(
            subject,
            key.as_spki()?,
            extensions,
            Validity::for_days(config.ca_validity_days)?,
        )?;

        Ok(Self { key, certificate })
    }

    /// Reads the CA from the configured paths.
    ///
    /// Fails with [`CaError::CaNotInitialized`] if either file is missing
    /// and [`CaError::CaCorrupt`] if either cannot be parsed. Whether the
    /// key actually belongs to the certificate is not checked.
    #[instrument(
        name = "load_certificate_authority",
        skip(config),
        fields(ca.root = %config.ca_root.display())
    )]
    pub fn load(config: &CaConfig) -> Result<Self> {
        let cert_path = config.ca_cert_path();
        let key_path = config.ca_key_path();
        for path in [&cert_path, &key_path] {
            if !path.is_file() {
                return Err(CaError::CaNotInitialized { path: path.clone() });
            }
        }

        let cert_pem = read_text(&cert_path)?;
        let certificate = Certificate::from_pem(&cert_pem)
            .map_err(|e| CaError::CaCorrupt(format!("{}: {e}", cert_path.display())))?;

        let key_pem = read_text(&key_path)?;
        let key = KeyPair::from_pkcs8_pem(&key_pem)
            .map_err(|e| CaError::CaCorrupt(format!("{}: {e}", key_path.display())))?;

        debug!(
            ca.subject = %certificate.subject_name(),
            ca.public_key.algorithm = %key.algorithm(),
            "loaded certificate authority"
        );
        Ok(Self { key, certificate })
    }

    /// Returns `true` if both CA files are present.
    pub fn exists(config: &CaConfig) -> bool {
        config.ca_cert_path().is_file() && config.ca_key_path().is_file()
    }

    /// Writes `ca.key` and `ca.pem`, creating the CA directory if needed.
    pub fn persist(&self, config: &CaConfig) -> Result<()> {
        fs::create_dir_all(&config.ca_root).map_err(|e| CaError::io(&config.ca_root, e))?;

        let key_path = config.ca_key_path();
        fs::write(&key_path, self.key.to_pkcs8_pem()?).map_err(|e| CaError::io(&key_path, e))?;

        let cert_path = config.ca_cert_path();
        fs::write(&cert_path, self.certificate_pem()?).map_err(|e| CaError::io(&cert_path, e))?;

        Ok(())
    }

    /// Signs a leaf certificate for a request.
    ///
    /// The subject and public key are copied from the request, the issuer
    /// is this CA's subject, and the requested SAN extension (if any) is
    /// carried over as non-critical. The validity starts now and lasts
    /// `validity_days`; clamping is the caller's business, and fewer than
    /// one day is [`CaError::InvalidInput`].
    #[instrument(name = "sign_certificate_request", skip(self, csr))]
    pub fn sign(&self, csr: &CertificateSigningRequest, validity_days: i64) -> Result<Certificate> {
        let extensions = csr
            .subject_alt_name_extension()?
            .map(|san| ExtensionParam {
                critical: false,
                ..san
            })
            .into_iter()
            .collect();

        self.issue(
            csr.subject_name().clone(),
            csr.public_key_info().clone(),
            extensions,
            Validity::for_days(validity_days)?,
        )
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key
    }

    pub fn subject(&self) -> Result<DistinguishedName> {
        self.certificate.subject()
    }

    pub fn certificate_pem(&self) -> Result<String> {
        self.certificate.to_pem()
    }
}

impl Issuer for CertificateAuthority {
    fn issuer_name(&self) -> &Name {
        // The name of the issuer is the subject of the CA certificate
        self.certificate.subject_name()
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| CaError::io(path, e))?;
    String::from_utf8(bytes)
        .map_err(|_| CaError::CaCorrupt(format!("{} is not valid UTF-8", path.display())))
}
