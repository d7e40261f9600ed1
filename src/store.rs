//! On-disk artifacts of issued certificates.
//!
//! Each host gets a directory `<data-root>/<hostname>/` holding
//! `<hostname>.key`, `<hostname>.crt` and `<hostname>.pem` (key followed by
//! certificate). Re-issuing for the same host overwrites all three.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::cert::Certificate;
use crate::config::{CA_KEY_FILE, CaConfig};
use crate::error::{CaError, Result};
use crate::key::KeyPair;
use crate::names::ensure_safe;

/// Paths of the three files written for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub key_path: PathBuf,
    pub certificate_path: PathBuf,
    pub combined_path: PathBuf,
}

impl ArtifactSet {
    fn for_host(host_dir: &Path, hostname: &str) -> Self {
        Self {
            key_path: host_dir.join(format!("{hostname}.key")),
            certificate_path: host_dir.join(format!("{hostname}.crt")),
            combined_path: host_dir.join(format!("{hostname}.pem")),
        }
    }
}

pub struct ArtifactStore<'a> {
    config: &'a CaConfig,
}

impl<'a> ArtifactStore<'a> {
    pub fn new(config: &'a CaConfig) -> Self {
        Self { config }
    }

    /// Writes the key, the certificate and the combined PEM for `hostname`.
    #[instrument(name = "save_artifacts", skip(self, key, certificate))]
    pub fn save(
        &self,
        hostname: &str,
        key: &KeyPair,
        certificate: &Certificate,
    ) -> Result<ArtifactSet> {
        ensure_safe(hostname)?;
        let key_pem = key.to_pkcs8_pem()?;
        let cert_pem = certificate.to_pem()?;

        let host_dir = self.config.host_dir(hostname);
        fs::create_dir_all(&host_dir).map_err(|e| CaError::io(&host_dir, e))?;

        let artifacts = ArtifactSet::for_host(&host_dir, hostname);
        write(&artifacts.key_path, key_pem.as_bytes())?;
        write(&artifacts.certificate_path, cert_pem.as_bytes())?;
        write(
            &artifacts.combined_path,
            &[key_pem.as_bytes(), cert_pem.as_bytes()].concat(),
        )?;

        info!(
            artifacts.dir = %host_dir.display(),
            "saved key and certificate"
        );
        Ok(artifacts)
    }

    /// Resolves a download request to a path below the data root.
    ///
    /// The CA key file name is refused before anything else is looked at.
    /// Both identifiers must pass [`crate::names::is_safe`], and the file
    /// must exist.
    pub fn resolve(&self, hostname: &str, filename: &str) -> Result<PathBuf> {
        if filename == CA_KEY_FILE {
            return Err(CaError::ForbiddenArtifact(filename.to_string()));
        }
        ensure_safe(hostname)?;
        ensure_safe(filename)?;

        let path = self.config.host_dir(hostname).join(filename);
        if !path.is_file() {
            return Err(CaError::ArtifactNotFound { path });
        }
        debug!(artifact.path = %path.display(), "resolved download");
        Ok(path)
    }

    /// Reads the artifact a download request points to.
    pub fn read(&self, hostname: &str, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(hostname, filename)?;
        fs::read(&path).map_err(|e| CaError::io(&path, e))
    }
}

fn write(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| CaError::io(path, e))
}
