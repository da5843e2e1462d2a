//! Operational phase of a managed resource, derived from its operation annotation.

use serde::{Deserialize, Serialize};

use crate::{ManagedResource, PlatformConstants};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OperationalPhase {
    #[default]
    Normal,
    Migrating,
    Restoring,
}

impl OperationalPhase {
    /// Recomputed from the annotations on every call; missing annotations mean `Normal`.
    pub fn classify(resource: &ManagedResource, constants: &PlatformConstants) -> Self {
        if is_migrating(resource, constants) {
            OperationalPhase::Migrating
        } else if is_restoring(resource, constants) {
            OperationalPhase::Restoring
        } else {
            OperationalPhase::Normal
        }
    }
}

fn operation<'a>(resource: &'a ManagedResource, constants: &PlatformConstants) -> Option<&'a str> {
    resource.annotation(&constants.operation_annotation)
}

pub fn is_migrating(resource: &ManagedResource, constants: &PlatformConstants) -> bool {
    operation(resource, constants) == Some(constants.migrate_value.as_str())
}

pub fn is_restoring(resource: &ManagedResource, constants: &PlatformConstants) -> bool {
    operation(resource, constants) == Some(constants.restore_value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataMap;

    fn ext() -> ManagedResource {
        ManagedResource::new("dns", "shoot--p--s", "shoot-dns-service")
    }

    #[test]
    fn nil_annotations_are_normal() {
        let c = PlatformConstants::default();
        let r = ext();
        assert!(r.annotations.is_none());
        assert!(!is_migrating(&r, &c));
        assert!(!is_restoring(&r, &c));
        assert_eq!(OperationalPhase::classify(&r, &c), OperationalPhase::Normal);
    }

    #[test]
    fn empty_or_unrelated_annotations_are_normal() {
        let c = PlatformConstants::default();
        let mut r = ext();
        r.annotations = Some(MetadataMap::new());
        assert_eq!(OperationalPhase::classify(&r, &c), OperationalPhase::Normal);

        let r = ext().with_annotation(&c.operation_annotation, "reconcile");
        assert!(!is_migrating(&r, &c));
        assert!(!is_restoring(&r, &c));
        assert_eq!(OperationalPhase::classify(&r, &c), OperationalPhase::Normal);
    }

    #[test]
    fn migrate_sentinel() {
        let c = PlatformConstants::default();
        let r = ext().with_annotation("gardener.cloud/operation", "migrate");
        assert!(is_migrating(&r, &c));
        assert!(!is_restoring(&r, &c));
        assert_eq!(OperationalPhase::classify(&r, &c), OperationalPhase::Migrating);
    }

    #[test]
    fn restore_sentinel() {
        let c = PlatformConstants::default();
        let r = ext().with_annotation("gardener.cloud/operation", "restore");
        assert!(!is_migrating(&r, &c));
        assert!(is_restoring(&r, &c));
        assert_eq!(OperationalPhase::classify(&r, &c), OperationalPhase::Restoring);
    }

    #[test]
    fn injected_constants_are_honoured() {
        let c = PlatformConstants {
            operation_annotation: "example.com/op".into(),
            migrate_value: "move".into(),
            restore_value: "revive".into(),
            extension_type: "x".into(),
        };
        let r = ext().with_annotation("gardener.cloud/operation", "migrate");
        assert_eq!(OperationalPhase::classify(&r, &c), OperationalPhase::Normal);

        let r = ext().with_annotation("example.com/op", "revive");
        assert_eq!(OperationalPhase::classify(&r, &c), OperationalPhase::Restoring);
    }
}
