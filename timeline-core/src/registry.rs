//! Process-wide schema registry (spec.md §4.4): every schema name maps to
//! its current version plus the chain of upgrade/downgrade functions
//! bridging older/newer wire versions. `TypeRegistry::global()` is the
//! runtime's single instance; `test_support::fresh()` builds an isolated
//! one (with the same built-ins) for tests that don't want to share process
//! state.

use std::collections::{BTreeMap, HashMap};
use std::sync::{OnceLock, RwLock};

use base::tracing_debug;

use crate::error::{Error, Result};
use crate::object::AnyObject;
use crate::serialization::reader;
use crate::serialization::resolver::Resolver;
use crate::value::{AnyDictionary, AnyValue};

pub type UpgradeFn = fn(&mut AnyDictionary);
pub type DowngradeFn = fn(&mut AnyDictionary);

struct SchemaRecord {
    current_version: i64,
    upgraders: BTreeMap<i64, UpgradeFn>,
    downgraders: BTreeMap<i64, DowngradeFn>,
}

pub struct TypeRegistry {
    schemas: RwLock<HashMap<String, SchemaRecord>>,
}

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

/// Every concrete schema this runtime builds, at its current version. All
/// sit at version 1 today — there is nothing yet to upgrade from, but the
/// upgrader/downgrader chains exist so a future version bump only adds a
/// registration, not new plumbing.
const BUILTIN_SCHEMAS: &[(&str, i64)] = &[
    ("Track", 1),
    ("Stack", 1),
    ("Clip", 1),
    ("Gap", 1),
    ("Transition", 1),
    ("Effect", 1),
    ("Marker", 1),
    ("ExternalReference", 1),
    ("MissingReference", 1),
    ("GeneratorReference", 1),
    ("ImageSequenceReference", 1),
];

impl TypeRegistry {
    pub fn global() -> &'static TypeRegistry {
        GLOBAL.get_or_init(TypeRegistry::with_builtins)
    }

    fn empty() -> Self {
        Self { schemas: RwLock::new(HashMap::new()) }
    }

    fn with_builtins() -> Self {
        let registry = Self::empty();
        for (name, version) in BUILTIN_SCHEMAS {
            registry
                .register(name, *version)
                .expect("builtin schema registration cannot conflict");
        }
        registry
    }

    /// Idempotent: re-registering the same name at the same version is a
    /// no-op; a different version is a [`Error::SchemaConflict`].
    pub fn register(&self, schema_name: &str, current_version: i64) -> Result<()> {
        tracing_debug!(schema_name, current_version, "registering schema");
        let mut schemas = self.schemas.write().unwrap();
        if let Some(existing) = schemas.get(schema_name) {
            if existing.current_version != current_version {
                return Err(Error::SchemaConflict {
                    schema_name: schema_name.to_string(),
                    version: current_version,
                });
            }
            return Ok(());
        }
        schemas.insert(
            schema_name.to_string(),
            SchemaRecord {
                current_version,
                upgraders: BTreeMap::new(),
                downgraders: BTreeMap::new(),
            },
        );
        Ok(())
    }

    pub fn add_upgrader(&self, schema_name: &str, from_version: i64, f: UpgradeFn) {
        let mut schemas = self.schemas.write().unwrap();
        if let Some(rec) = schemas.get_mut(schema_name) {
            rec.upgraders.insert(from_version, f);
        }
    }

    pub fn add_downgrader(&self, schema_name: &str, from_version: i64, f: DowngradeFn) {
        let mut schemas = self.schemas.write().unwrap();
        if let Some(rec) = schemas.get_mut(schema_name) {
            rec.downgraders.insert(from_version, f);
        }
    }

    pub fn current_version_of(&self, schema_name: &str) -> Option<i64> {
        self.schemas.read().unwrap().get(schema_name).map(|r| r.current_version)
    }

    pub fn is_known(&self, schema_name: &str) -> bool {
        self.schemas.read().unwrap().contains_key(schema_name)
    }

    /// Applies registered upgraders until `dict`'s version matches the
    /// registry's current version for `schema_name`, then builds the live
    /// entity. Unknown schema names fall back to [`crate::object::UnknownSchema`]
    /// rather than failing (spec.md §4.6).
    pub fn instance_from_schema(
        &self,
        schema_name: &str,
        incoming_version: i64,
        mut dict: AnyDictionary,
        resolver: &mut Resolver,
    ) -> Result<AnyObject> {
        let current_version = {
            let schemas = self.schemas.read().unwrap();
            match schemas.get(schema_name) {
                Some(rec) => rec.current_version,
                None => return reader::decode_unknown_schema(schema_name, incoming_version, dict),
            }
        };
        if incoming_version > current_version {
            return Err(Error::SchemaVersionUnsupported {
                schema_name: schema_name.to_string(),
                incoming_version,
                current_version,
            });
        }
        let mut version = incoming_version;
        while version < current_version {
            let upgrader = {
                let schemas = self.schemas.read().unwrap();
                schemas.get(schema_name).and_then(|r| r.upgraders.get(&version).copied())
            };
            match upgrader {
                Some(f) => f(&mut dict),
                None => break,
            }
            tracing_debug!(schema_name, from = version - 1, to = version, "applied upgrader");
            version += 1;
        }
        reader::decode_known_schema(schema_name, dict, resolver)
    }

    /// Downgrades `dict` in place by reading its own `OTIO_SCHEMA` tag,
    /// walking `downgraders` from the tag's version down to whatever
    /// `manifest` names as the target, and rewriting the tag (mirrors
    /// `_downgrade_dictionary` in the original serializer). A no-op if the
    /// tag's schema isn't named in `manifest` or is already at/under target.
    pub fn downgrade_tagged_dict(&self, dict: &mut AnyDictionary, manifest: &BTreeMap<String, i64>) -> Result<()> {
        let Some(tag) = dict.get("OTIO_SCHEMA").and_then(|v| v.as_str()).map(str::to_string) else {
            return Ok(());
        };
        let Some((schema_name, version_str)) = tag.rsplit_once('.') else {
            return Ok(());
        };
        let Ok(mut version) = version_str.parse::<i64>() else {
            return Ok(());
        };
        let Some(&target_version) = manifest.get(schema_name) else {
            return Ok(());
        };
        if version <= target_version {
            return Ok(());
        }
        let schema_name = schema_name.to_string();
        tracing_debug!(schema_name, from = version, to = target_version, "downgrading schema");
        while version > target_version {
            let downgrader = {
                let schemas = self.schemas.read().unwrap();
                schemas.get(&schema_name).and_then(|r| r.downgraders.get(&version).copied())
            };
            let f = downgrader.ok_or_else(|| Error::NoDowngradePath {
                schema_name: schema_name.clone(),
                from_version: version,
                to_version: target_version,
            })?;
            f(dict);
            version -= 1;
        }
        dict.insert("OTIO_SCHEMA", AnyValue::String(format!("{schema_name}.{version}")));
        Ok(())
    }

    /// Explicit-args form (spec.md §4.4): downgrades `dict` from the
    /// registry's current version of `schema_name` down to `target_version`,
    /// stamping `OTIO_SCHEMA` before walking so the tagged-dict path above
    /// can be reused unconditionally.
    pub fn downgrade(&self, dict: &mut AnyDictionary, schema_name: &str, target_version: i64) -> Result<()> {
        let current = self
            .current_version_of(schema_name)
            .ok_or_else(|| Error::MalformedSchema {
                schema: schema_name.to_string(),
                detail: "unknown schema name".to_string(),
            })?;
        dict.insert("OTIO_SCHEMA", AnyValue::String(format!("{schema_name}.{current}")));
        let mut manifest = BTreeMap::new();
        manifest.insert(schema_name.to_string(), target_version);
        self.downgrade_tagged_dict(dict, &manifest)
    }

    /// Rebuilds a live entity from a dictionary that already carries its own
    /// `OTIO_SCHEMA` tag, which is consumed (removed) before the per-schema
    /// builder sees the rest of the fields.
    pub fn rehydrate(&self, mut dict: AnyDictionary, resolver: &mut Resolver) -> Result<AnyObject> {
        let tag = dict
            .remove("OTIO_SCHEMA")
            .and_then(|v| match v {
                AnyValue::String(s) => Some(s),
                _ => None,
            })
            .ok_or_else(|| Error::MalformedSchema {
                schema: "?".to_string(),
                detail: "missing OTIO_SCHEMA".to_string(),
            })?;
        let (schema_name, version_str) = tag.rsplit_once('.').ok_or_else(|| Error::MalformedSchema {
            schema: tag.clone(),
            detail: "missing version suffix".to_string(),
        })?;
        let version: i64 = version_str.parse().map_err(|_| Error::MalformedSchema {
            schema: tag.clone(),
            detail: "non-numeric version".to_string(),
        })?;
        self.instance_from_schema(schema_name, version, dict, resolver)
    }
}

/// A scoped registry for tests that register custom/experimental schemas
/// without touching the process-wide [`TypeRegistry::global`] singleton.
pub mod test_support {
    use super::TypeRegistry;

    pub fn fresh() -> TypeRegistry {
        TypeRegistry::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::AnyValue;

    #[test]
    fn re_registering_same_version_is_idempotent() {
        let registry = test_support::fresh();
        registry.register("Gap", 1).unwrap();
        assert_eq!(registry.current_version_of("Gap"), Some(1));
    }

    #[test]
    fn re_registering_a_different_version_conflicts() {
        let registry = test_support::fresh();
        let err = registry.register("Gap", 2).unwrap_err();
        assert!(matches!(err, Error::SchemaConflict { .. }));
    }

    #[test]
    fn instance_from_schema_rejects_a_newer_incoming_version() {
        let registry = test_support::fresh();
        let mut resolver = Resolver::new();
        let err = registry
            .instance_from_schema("Gap", 2, AnyDictionary::new(), &mut resolver)
            .unwrap_err();
        assert!(matches!(err, Error::SchemaVersionUnsupported { .. }));
    }

    #[test]
    fn instance_from_schema_applies_upgraders_before_building() {
        let registry = test_support::fresh();
        registry.add_upgrader("Gap", 0, |dict| {
            if let Some(old_name) = dict.remove("gap_name") {
                dict.insert("name", old_name);
            }
        });

        let mut dict = AnyDictionary::new();
        dict.insert("gap_name", AnyValue::String("legacy gap".to_string()));
        let mut resolver = Resolver::new();
        let object = registry.instance_from_schema("Gap", 0, dict, &mut resolver).unwrap();

        let AnyObject::Composable(r) = object else { panic!("expected a Composable") };
        assert_eq!(r.borrow().name(), "legacy gap");
    }

    #[test]
    fn downgrade_rewrites_tag_and_applies_downgraders_in_order() {
        let registry = test_support::fresh();
        registry.add_downgrader("Gap", 1, |dict| {
            if let Some(name) = dict.remove("name") {
                dict.insert("gap_name", name);
            }
        });

        let mut dict = AnyDictionary::new();
        dict.insert("name", AnyValue::String("a gap".to_string()));
        registry.downgrade(&mut dict, "Gap", 0).unwrap();

        assert_eq!(dict.get("OTIO_SCHEMA"), Some(&AnyValue::String("Gap.0".to_string())));
        assert_eq!(dict.get("gap_name"), Some(&AnyValue::String("a gap".to_string())));
        assert!(dict.get("name").is_none());
    }

    #[test]
    fn downgrade_without_a_registered_downgrader_fails() {
        let registry = test_support::fresh();
        let mut dict = AnyDictionary::new();
        let err = registry.downgrade(&mut dict, "Gap", 0).unwrap_err();
        assert!(matches!(err, Error::NoDowngradePath { .. }));
    }

    #[test]
    fn downgrade_of_an_unknown_schema_name_fails() {
        let registry = test_support::fresh();
        let mut dict = AnyDictionary::new();
        let err = registry.downgrade(&mut dict, "NoSuchSchema", 0).unwrap_err();
        assert!(matches!(err, Error::MalformedSchema { .. }));
    }
}
