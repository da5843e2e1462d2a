//! Extkit core types: managed extension resources and the facts derived from them.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod names;
pub mod phase;

pub use config::{ConfigError, ExtKitConfig, ExtensionKind, PlatformConstants};
pub use names::shorten_id;
pub use phase::{is_migrating, is_restoring, OperationalPhase};

/// Annotations or labels as key/value pairs. Same ordered map kube uses for `ObjectMeta`.
pub type MetadataMap = BTreeMap<String, String>;

/// One instance of the extension-managed object, as read from the cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManagedResource {
    pub name: String,
    pub namespace: String,
    /// Extension type discriminator (`spec.type`).
    #[serde(rename = "type")]
    pub type_: String,
    /// `None` when the object carries no annotations at all.
    #[serde(default)]
    pub annotations: Option<MetadataMap>,
    /// Remaining object fields, owned by the host platform.
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl ManagedResource {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            type_: type_.into(),
            annotations: None,
            raw: serde_json::Value::Null,
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.get_or_insert_with(MetadataMap::new).insert(key.into(), value.into());
        self
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.as_ref()?.get(key).map(String::as_str)
    }
}

/// Outcome of a lookup that may legitimately find nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Absent,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Lookup::Found(v) => Lookup::Found(v),
            Lookup::Absent => Lookup::Absent,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(v) => Lookup::Found(f(v)),
            Lookup::Absent => Lookup::Absent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Lookup::Found(v),
            None => Lookup::Absent,
        }
    }
}

/// Errors surfaced by a resource read capability.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// Nothing to list, or the kind itself is not served.
    #[error("not_found: {0}")]
    NotFound(String),
    #[error("cancelled")]
    Cancelled,
    #[error("api {code}: {message}")]
    Api { code: u16, message: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReadError::NotFound(_))
    }
}

/// Copy a metadata map without aliasing the source. `None` stays `None`.
pub fn clone_map(m: Option<&MetadataMap>) -> Option<MetadataMap> {
    m.cloned()
}

pub mod prelude {
    pub use super::{
        clone_map, is_migrating, is_restoring, shorten_id, ExtKitConfig, ExtensionKind, Lookup, ManagedResource, MetadataMap,
        OperationalPhase, PlatformConstants, ReadError,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_map_preserves_absence() {
        assert_eq!(clone_map(None), None);
    }

    #[test]
    fn clone_map_keeps_empty_distinct_from_absent() {
        let empty = MetadataMap::new();
        assert_eq!(clone_map(Some(&empty)), Some(MetadataMap::new()));
    }

    #[test]
    fn clone_map_is_independent_of_source() {
        let mut src = MetadataMap::new();
        src.insert("a".into(), "1".into());
        src.insert("b".into(), "2".into());

        let mut copy = clone_map(Some(&src)).expect("some");
        assert_eq!(copy, src);

        copy.insert("c".into(), "3".into());
        copy.remove("a");
        assert_eq!(src.len(), 2);
        assert_eq!(src.get("a").map(String::as_str), Some("1"));

        src.insert("b".into(), "changed".into());
        assert_eq!(copy.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn lookup_helpers() {
        let found: Lookup<u8> = Some(3).into();
        assert!(found.is_found());
        assert_eq!(found.as_ref(), Lookup::Found(&3));
        assert_eq!(found.map(|v| v * 2).into_option(), Some(6));

        let absent: Lookup<u8> = None.into();
        assert!(!absent.is_found());
        assert_eq!(absent.into_option(), None);
    }

    #[test]
    fn managed_resource_serializes_type_field() {
        let r = ManagedResource::new("dns", "shoot--a--b", "shoot-dns-service").with_annotation("k", "v");
        let v = serde_json::to_value(&r).expect("serialize");
        assert_eq!(v["type"], "shoot-dns-service");
        assert_eq!(r.annotation("k"), Some("v"));
        assert_eq!(r.annotation("missing"), None);

        let back: ManagedResource = serde_json::from_value(serde_json::json!({
            "name": "dns", "namespace": "ns", "type": "x"
        }))
        .expect("deserialize");
        assert_eq!(back.annotations, None);
        assert_eq!(back.raw, serde_json::Value::Null);
    }

    #[test]
    fn read_error_classification() {
        assert!(ReadError::NotFound("extensions".into()).is_not_found());
        assert!(!ReadError::Cancelled.is_not_found());
        assert!(!ReadError::Api { code: 500, message: "boom".into() }.is_not_found());
        assert!(!ReadError::Other(anyhow::anyhow!("io")).is_not_found());
    }
}
