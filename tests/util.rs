use homelab_ca::authority::CertificateAuthority;
use homelab_ca::config::CaConfig;
use homelab_ca::key::KeyAlgorithm;
use tempfile::TempDir;

/// A CA and data directory living in a throwaway temp dir.
pub struct TestEnv {
    // Held so the directory outlives the test.
    _dir: TempDir,
    pub config: CaConfig,
}

pub fn test_env() -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = CaConfig::builder()
        .ca_root(dir.path().join("local-ca"))
        .data_root(dir.path().join("data"))
        .build();
    TestEnv { _dir: dir, config }
}

pub fn test_env_with_ca(algorithm: KeyAlgorithm) -> (TestEnv, CertificateAuthority) {
    let env = test_env();
    let ca = CertificateAuthority::create(&env.config, algorithm).expect("Failed to create CA");
    (env, ca)
}
