//! Yarn 2+ ("Berry") lockfile parser
//!
//! Berry lockfiles are YAML documents whose top-level keys are package
//! specs, plus one reserved `__metadata` key describing the file itself.

use super::{ParseAttempt, ParsedLockfile};
use crate::types::{LockfileEntries, LockfileFormat, ResolvedEntry};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// Reserved top-level key holding lockfile metadata
pub const METADATA_KEY: &str = "__metadata";

/// Try to parse `content` as a Berry lockfile.
///
/// Valid YAML that doesn't have the shape of a lockfile (a mapping of spec
/// keys to entries with a scalar `version`) is reported as a failure too,
/// which is what lets classic lockfiles that happen to be valid YAML fall
/// through to the classic parser.
pub fn parse(content: &str) -> ParseAttempt {
    let document: Value = match serde_yaml::from_str(content) {
        Ok(document) => document,
        Err(e) => return ParseAttempt::Failure(format!("invalid YAML: {e}")),
    };

    let Value::Mapping(mapping) = document else {
        return ParseAttempt::Failure("top-level YAML value is not a mapping".to_string());
    };

    match entries_from_mapping(mapping) {
        Ok(entries) => ParseAttempt::Success(ParsedLockfile {
            format: LockfileFormat::Berry,
            entries,
        }),
        Err(reason) => ParseAttempt::Failure(reason),
    }
}

fn entries_from_mapping(mapping: Mapping) -> Result<LockfileEntries, String> {
    let mut entries = LockfileEntries::new();

    for (key, value) in mapping {
        let Some(spec) = scalar_to_string(&key) else {
            return Err(format!("non-scalar key {key:?}"));
        };
        if spec == METADATA_KEY {
            continue;
        }

        let Value::Mapping(fields) = value else {
            return Err(format!("entry '{spec}' is not a mapping"));
        };
        let entry = resolved_entry(&fields).ok_or_else(|| format!("entry '{spec}' has no version"))?;
        entries.insert(spec, entry);
    }

    Ok(entries)
}

fn resolved_entry(fields: &Mapping) -> Option<ResolvedEntry> {
    let version = fields.get("version").and_then(scalar_to_string)?;

    let dependencies = match fields.get("dependencies") {
        Some(Value::Mapping(deps)) => deps
            .iter()
            .filter_map(|(name, range)| Some((scalar_to_string(name)?, scalar_to_string(range)?)))
            .collect(),
        _ => BTreeMap::new(),
    };

    Some(ResolvedEntry {
        version,
        resolution: fields.get("resolution").and_then(scalar_to_string),
        integrity: fields.get("checksum").and_then(scalar_to_string),
        dependencies,
    })
}

/// YAML scalars as strings; numbers keep their YAML spelling
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
