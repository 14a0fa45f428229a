//! Test fixtures for confcache
//!
//! Writes small document sets into a temporary directory. The directory is
//! removed when the [`TestFixtures`] value is dropped.

use std::fs;
use std::path::{Path, PathBuf};

/// Test fixture categories
pub enum FixtureType {
    /// `base.yaml` and `override.yaml` sharing `db.host`
    BaseOverride,
    /// Only `d.app.yaml` exists for the `app` identifier
    DefaultFallback,
    /// Payload wrapped under a single `parameters` root key
    Wrapped,
    /// Keys and values that use the literal-code sigil
    Literals,
    /// `broken.yaml` holds malformed YAML
    Malformed,
}

/// Main test fixtures provider
pub struct TestFixtures {
    temp_dir: Option<tempfile::TempDir>,
}

impl Default for TestFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixtures {
    pub fn new() -> Self {
        Self { temp_dir: None }
    }

    /// Create a temporary directory with test fixtures
    pub fn setup(&mut self, fixture_type: FixtureType) -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();

        match fixture_type {
            FixtureType::BaseOverride => self.setup_base_override(&path),
            FixtureType::DefaultFallback => self.setup_default_fallback(&path),
            FixtureType::Wrapped => self.setup_wrapped(&path),
            FixtureType::Literals => self.setup_literals(&path),
            FixtureType::Malformed => self.setup_malformed(&path),
        }

        self.temp_dir = Some(dir);
        path
    }

    /// Write an extra document into the current fixture directory
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let dir = self
            .temp_dir
            .as_ref()
            .expect("setup() must run before write()");
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn setup_base_override(&self, base: &Path) {
        fs::write(
            base.join("base.yaml"),
            r#"app:
  name: shop
  debug: true
db:
  host: localhost
  port: 5432
"#,
        )
        .unwrap();
        fs::write(
            base.join("override.yaml"),
            r#"db:
  host: prod
"#,
        )
        .unwrap();
    }

    fn setup_default_fallback(&self, base: &Path) {
        fs::write(
            base.join("d.app.yaml"),
            r#"locale: en
timezone: UTC
"#,
        )
        .unwrap();
    }

    fn setup_wrapped(&self, base: &Path) {
        fs::write(
            base.join("parameters.yaml"),
            r#"parameters:
  mailer:
    transport: smtp
    port: 25
  secret: s3cr3t
"#,
        )
        .unwrap();
    }

    fn setup_literals(&self, base: &Path) {
        fs::write(
            base.join("literals.yaml"),
            r#"paths:
  root: "≈__DIR__"
  name: "bar"
"≈PORT_KEY": 8080
"#,
        )
        .unwrap();
    }

    fn setup_malformed(&self, base: &Path) {
        fs::write(base.join("broken.yaml"), "key: [unclosed\n  other: }\n").unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_written() {
        let mut fixtures = TestFixtures::new();
        let root = fixtures.setup(FixtureType::BaseOverride);
        assert!(root.join("base.yaml").is_file());
        assert!(root.join("override.yaml").is_file());

        let extra = fixtures.write("nested/extra.yaml", "a: 1\n");
        assert!(extra.is_file());
    }
}
