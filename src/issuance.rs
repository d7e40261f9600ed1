use tracing::{info, instrument};

use crate::authority::CertificateAuthority;
use crate::cert::Certificate;
use crate::cert::params::clamp_validity_days;
use crate::cert::san::SanEntry;
use crate::config::CaConfig;
use crate::csr::CertificateSigningRequest;
use crate::error::{CaError, Result};
use crate::key::{KeyAlgorithm, KeyPair};
use crate::names::ensure_safe;
use crate::store::{ArtifactSet, ArtifactStore};

/// A freshly issued leaf certificate and its private key, not yet written
/// anywhere.
#[derive(Debug, Clone)]
pub struct IssuedCertificate {
    pub key: KeyPair,
    pub certificate: Certificate,
}

/// Everything a caller shows or links after a successful issuance.
#[derive(Debug, Clone)]
pub struct IssuedArtifacts {
    pub key_pem: String,
    pub certificate_pem: String,
    pub artifacts: ArtifactSet,
    pub certificate: Certificate,
}

/// Issues leaf certificates signed by the CA found at the configured paths.
pub struct CertificateIssuer<'a> {
    config: &'a CaConfig,
}

impl<'a> CertificateIssuer<'a> {
    pub fn new(config: &'a CaConfig) -> Self {
        Self { config }
    }

    /// Issues a certificate for `hostname`.
    ///
    /// `alt_names` is a comma-separated list; the hostname is always the
    /// first SAN entry. `validity_days` is clamped to 1..=3650. The CA is
    /// loaded before the leaf key is generated, so a missing CA fails fast.
    #[instrument(name = "issue_certificate", skip(self))]
    pub fn issue(
        &self,
        hostname: &str,
        alt_names: &str,
        key_algorithm: KeyAlgorithm,
        validity_days: i64,
    ) -> Result<IssuedCertificate> {
        let validity_days = clamp_validity_days(validity_days);
        if hostname.is_empty() {
            return Err(CaError::InvalidInput("hostname must not be empty".to_string()));
        }

        let ca = CertificateAuthority::load(self.config)?;
        let key = KeyPair::generate(key_algorithm)?;

        let mut subject_alt_names = vec![SanEntry::parse(hostname)];
        subject_alt_names.extend(SanEntry::parse_list(alt_names));

        let csr =
            CertificateSigningRequest::new(&self.config.subject(hostname), &subject_alt_names, &key)?;
        let certificate = ca.sign(&csr, validity_days)?;

        info!(
            certificate.subject = %certificate.subject_name(),
            certificate.serial = %certificate.inner.tbs_certificate.serial_number,
            certificate.validity_days = validity_days,
            "issued certificate"
        );
        Ok(IssuedCertificate { key, certificate })
    }

    /// Checks the hostname, issues a certificate and writes its artifacts.
    ///
    /// Nothing is generated or written if the hostname is unsafe or the CA
    /// is missing.
    pub fn issue_and_store(
        &self,
        hostname: &str,
        alt_names: &str,
        key_algorithm: KeyAlgorithm,
        validity_days: i64,
    ) -> Result<IssuedArtifacts> {
        ensure_safe(hostname)?;
        let IssuedCertificate { key, certificate } =
            self.issue(hostname, alt_names, key_algorithm, validity_days)?;
        let artifacts = ArtifactStore::new(self.config).save(hostname, &key, &certificate)?;

        Ok(IssuedArtifacts {
            key_pem: key.to_pkcs8_pem()?,
            certificate_pem: certificate.to_pem()?,
            artifacts,
            certificate,
        })
    }
}
