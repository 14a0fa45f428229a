//! Resolving and merging real document sets

use confcache_core::{flatten, lookup, ConfigValue};
use confcache_parser::{DocumentLoader, ParserError, Resolver, YamlParser};
use confcache_test_fixtures::{FixtureType, TestFixtures};
use pretty_assertions::assert_eq;

#[test]
fn test_override_document_wins() -> Result<(), Box<dyn std::error::Error>> {
    let mut fixtures = TestFixtures::new();
    let root = fixtures.setup(FixtureType::BaseOverride);

    let docs = Resolver::new(&root).resolve_all(["base", "override"])?;
    let merged = DocumentLoader::new(YamlParser::new()).load(&docs)?;

    let db = lookup(&merged.tree, "db").ok_or("db missing")?;
    assert_eq!(db.get("host"), Some(&ConfigValue::from("prod")));
    // Untouched keys of the base survive
    assert_eq!(db.get("port"), Some(&ConfigValue::from(5432_i64)));

    let flat = flatten(&merged.tree);
    let hosts: Vec<_> = flat
        .iter()
        .filter(|(k, _)| k.as_str() == "db.host")
        .collect();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].1, &ConfigValue::from("prod"));
    Ok(())
}

#[test]
fn test_provenance_lists_sources_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut fixtures = TestFixtures::new();
    let root = fixtures.setup(FixtureType::BaseOverride);

    let docs = Resolver::new(&root).resolve_all(["base.yaml", "override"])?;
    let merged = DocumentLoader::new(YamlParser::new()).load(&docs)?;

    assert_eq!(
        merged.provenance(),
        vec![
            root.join("base.yaml").display().to_string(),
            root.join("override.yaml").display().to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_reversed_order_reverses_precedence() -> Result<(), Box<dyn std::error::Error>> {
    let mut fixtures = TestFixtures::new();
    let root = fixtures.setup(FixtureType::BaseOverride);

    let docs = Resolver::new(&root).resolve_all(["override", "base"])?;
    let merged = DocumentLoader::new(YamlParser::new()).load(&docs)?;
    let db = lookup(&merged.tree, "db").ok_or("db missing")?;
    assert_eq!(db.get("host"), Some(&ConfigValue::from("localhost")));

    // Keys first seen in the earlier document keep their position
    let keys: Vec<&str> = merged.tree.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["db", "app"]);
    Ok(())
}

#[test]
fn test_default_document_is_loaded() -> Result<(), Box<dyn std::error::Error>> {
    let mut fixtures = TestFixtures::new();
    let root = fixtures.setup(FixtureType::DefaultFallback);

    let docs = Resolver::new(&root).resolve_all(["app"])?;
    assert_eq!(docs[0].name, "d.app.yaml");

    let merged = DocumentLoader::new(YamlParser::new()).load(&docs)?;
    assert_eq!(lookup(&merged.tree, "locale"), Some(&ConfigValue::from("en")));
    Ok(())
}

#[test]
fn test_malformed_document_propagates_parse_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut fixtures = TestFixtures::new();
    let root = fixtures.setup(FixtureType::Malformed);

    let docs = Resolver::new(&root).resolve_all(["broken"])?;
    let result = DocumentLoader::new(YamlParser::new()).load(&docs);
    match result {
        Err(ParserError::Parse { path, .. }) => assert_eq!(path, root.join("broken.yaml")),
        other => return Err(format!("expected parse error, got {:?}", other).into()),
    }
    Ok(())
}

#[test]
fn test_missing_document_stops_resolution() {
    let mut fixtures = TestFixtures::new();
    let root = fixtures.setup(FixtureType::BaseOverride);

    let result = Resolver::new(&root).resolve_all(["base", "nope", "override"]);
    assert!(
        matches!(result, Err(ParserError::FileNotFound { path }) if path == root.join("nope.yaml"))
    );
}
