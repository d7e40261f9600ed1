use std::path::PathBuf;

use bon::Builder;

use crate::cert::params::DistinguishedName;

/// File name of the CA certificate inside `ca_root`.
pub const CA_CERT_FILE: &str = "ca.pem";

/// File name of the CA private key inside `ca_root`. This file is never
/// served for download.
pub const CA_KEY_FILE: &str = "ca.key";

/// Default display name of the root CA.
pub const DEFAULT_CA_COMMON_NAME: &str = "Homelab Root CA";

/// Default lifetime of the root CA certificate.
pub const DEFAULT_CA_VALIDITY_DAYS: i64 = 825;

/// Process-wide settings of the engine.
///
/// Built once at startup and passed by reference into every component. The
/// directories are not resolved here; the embedding application decides
/// where they live.
///
/// ```
/// use homelab_ca::config::CaConfig;
///
/// let config = CaConfig::builder()
///     .ca_root("/local-ca")
///     .data_root("/data")
///     .build();
/// assert_eq!(config.ca_cert_path().to_str(), Some("/local-ca/ca.pem"));
/// ```
#[derive(Clone, Debug, Builder)]
pub struct CaConfig {
    /// Directory holding `ca.pem` and `ca.key`.
    #[builder(into)]
    pub ca_root: PathBuf,
    /// Directory under which one sub-directory per host is created.
    #[builder(into)]
    pub data_root: PathBuf,
    #[builder(into, default = String::from("DE"))]
    pub country: String,
    #[builder(into, default = String::from("Germany"))]
    pub state: String,
    #[builder(into, default = String::from("LAN"))]
    pub locality: String,
    #[builder(into, default = String::from("Homelab"))]
    pub organization: String,
    #[builder(into, default = String::from(DEFAULT_CA_COMMON_NAME))]
    pub ca_common_name: String,
    #[builder(default = DEFAULT_CA_VALIDITY_DAYS)]
    pub ca_validity_days: i64,
}

impl CaConfig {
    pub fn ca_cert_path(&self) -> PathBuf {
        self.ca_root.join(CA_CERT_FILE)
    }

    pub fn ca_key_path(&self) -> PathBuf {
        self.ca_root.join(CA_KEY_FILE)
    }

    /// Directory for the artifacts of `hostname`. The caller must have
    /// checked the name with [`crate::names::is_safe`].
    pub fn host_dir(&self, hostname: &str) -> PathBuf {
        self.data_root.join(hostname)
    }

    /// The fixed organizational identity with the given common name.
    pub fn subject(&self, common_name: &str) -> DistinguishedName {
        DistinguishedName::builder()
            .common_name(common_name.to_string())
            .country(self.country.clone())
            .state(self.state.clone())
            .locality(self.locality.clone())
            .organization(self.organization.clone())
            .build()
    }

    /// Subject of the root CA.
    pub fn ca_subject(&self) -> DistinguishedName {
        self.subject(&self.ca_common_name)
    }
}
