//! # homelab-ca - A Small Private Certificate Authority
//!
//! homelab-ca creates a self-signed root CA and issues leaf certificates
//! signed by it, for internal and lab networks. It is built entirely on
//! rustcrypto libraries and writes its keys and certificates as PEM files.
//!
//! ## Supported Key Types
//!
//! - **RSA**: 2048 and 4096-bit keys (`rsa2048`, `rsa4096`)
//! - **ECDSA**: P-256, P-384 and P-521 curves (`secp256r1`, `secp384r1`,
//!   `secp521r1`)
//!
//! The CA and every leaf can use any of them independently.
//!
//! ## On-disk Layout
//!
//! ```text
//! <ca-root>/ca.pem                         CA certificate
//! <ca-root>/ca.key                         CA private key (PKCS#8, unencrypted)
//! <data-root>/<hostname>/<hostname>.key
//! <data-root>/<hostname>/<hostname>.crt
//! <data-root>/<hostname>/<hostname>.pem    key followed by certificate
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use homelab_ca::{
//!     authority::CertificateAuthority,
//!     config::CaConfig,
//!     issuance::CertificateIssuer,
//!     key::KeyAlgorithm,
//! };
//!
//! # fn main() -> Result<(), homelab_ca::error::CaError> {
//! let config = CaConfig::builder()
//!     .ca_root("/local-ca")
//!     .data_root("/data")
//!     .build();
//!
//! // Once: create the root CA. This overwrites an existing one.
//! CertificateAuthority::create(&config, KeyAlgorithm::EcdsaP256)?;
//!
//! // Per host: issue and store a certificate.
//! let issued = CertificateIssuer::new(&config).issue_and_store(
//!     "db.lan",
//!     "10.0.0.5, *.db.lan",
//!     "rsa2048".parse()?,
//!     365,
//! )?;
//! println!("{}", issued.certificate_pem);
//! println!("written to {}", issued.artifacts.combined_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`error::CaError`]. Callers that only need to
//! pick a response status can use [`error::CaError::kind`]:
//!
//! ```rust
//! use homelab_ca::{error::ErrorKind, store::ArtifactStore, config::CaConfig};
//!
//! let config = CaConfig::builder().ca_root("/ca").data_root("/data").build();
//! let err = ArtifactStore::new(&config).resolve("db.lan", "ca.key").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ForbiddenArtifact);
//! ```
//!
//! ## Module Organization
//!
//! - [`names`]: Safe-name checks for anything that becomes a path
//! - [`key`]: Key generation, PEM import/export and signing
//! - [`cert`]: Certificates, names, extensions and SAN entries
//! - [`csr`]: Certificate signing requests
//! - [`authority`]: Creating, loading and signing with the root CA
//! - [`issuance`]: The leaf issuance workflow
//! - [`store`]: Writing artifacts and resolving downloads
//! - [`config`]: Paths and organizational identity
//! - [`error`]: Error types

pub mod authority;
pub mod cert;
pub mod config;
pub mod csr;
pub mod error;
pub mod issuance;
pub mod issuer;
pub mod key;
pub mod names;
pub mod store;
pub mod tbs_certificate;
