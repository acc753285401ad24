//! Resolves a (family, label) pair into a concrete `schema name -> target
//! version` map for downgrade-on-write (spec.md §4.4, grounded in
//! `_downgrade_version_manifest`/`add_family_label_version` from
//! `examples/original_source/src/opentimelineio/serialization.cpp`). The
//! built-in `"OTIO_CORE"` family always names every schema this crate
//! builds at its current version; additional family/label pairs can be
//! registered against other (older) version sets as a compatibility target.

use std::collections::BTreeMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::registry::TypeRegistry;

const BUILTIN_FAMILY: &str = "OTIO_CORE";

static FAMILIES: Lazy<RwLock<BTreeMap<(String, String), BTreeMap<String, i64>>>> = Lazy::new(|| RwLock::new(BTreeMap::new()));

/// Registers `schema_name -> version` under `(family, label)`. Refuses to
/// add to the built-in `"OTIO_CORE"` family, which is always derived live
/// from the registry's current versions rather than a fixed snapshot.
pub fn add_family_label_version(family: &str, label: &str, schema_name: &str, version: i64) -> Result<()> {
    if family == BUILTIN_FAMILY {
        return Err(Error::NotImplemented(format!(
            "cannot register a version under the builtin \"{BUILTIN_FAMILY}\" family"
        )));
    }
    let mut families = FAMILIES.write().unwrap();
    families
        .entry((family.to_string(), label.to_string()))
        .or_default()
        .insert(schema_name.to_string(), version);
    Ok(())
}

/// Resolves `(family, label)` into a `schema_name -> target_version` map
/// suitable for [`crate::serialization::writer::serialize_json_to_string`].
/// `("OTIO_CORE", "CURRENT")` resolves to every schema at its registry
/// current version (i.e. effectively "don't downgrade anything").
pub fn resolve(family: &str, label: &str) -> Result<BTreeMap<String, i64>> {
    if family == BUILTIN_FAMILY {
        return Ok(current_versions());
    }
    FAMILIES
        .read()
        .unwrap()
        .get(&(family.to_string(), label.to_string()))
        .cloned()
        .ok_or_else(|| Error::NotImplemented(format!("no downgrade manifest registered for {family}/{label}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otio_core_current_resolves_every_builtin_schema_at_its_registry_version() {
        let manifest = resolve("OTIO_CORE", "CURRENT").unwrap();
        assert_eq!(manifest.get("Clip"), TypeRegistry::global().current_version_of("Clip").as_ref());
        assert_eq!(manifest.len(), current_versions().len());
    }

    #[test]
    fn cannot_register_a_version_under_the_builtin_family() {
        let err = add_family_label_version("OTIO_CORE", "CUSTOM", "Clip", 1).unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
    }

    #[test]
    fn registers_and_resolves_a_custom_family_label() {
        add_family_label_version("MY_STUDIO", "2022", "Clip", 1).unwrap();
        add_family_label_version("MY_STUDIO", "2022", "Track", 1).unwrap();

        let manifest = resolve("MY_STUDIO", "2022").unwrap();
        assert_eq!(manifest.get("Clip"), Some(&1));
        assert_eq!(manifest.get("Track"), Some(&1));
    }

    #[test]
    fn resolving_an_unknown_family_label_fails() {
        let err = resolve("MY_STUDIO", "no-such-label").unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
    }
}

fn current_versions() -> BTreeMap<String, i64> {
    const NAMES: &[&str] = &[
        "Track",
        "Stack",
        "Clip",
        "Gap",
        "Transition",
        "Effect",
        "Marker",
        "ExternalReference",
        "MissingReference",
        "GeneratorReference",
        "ImageSequenceReference",
    ];
    let registry = TypeRegistry::global();
    NAMES
        .iter()
        .filter_map(|name| registry.current_version_of(name).map(|v| (name.to_string(), v)))
        .collect()
}
