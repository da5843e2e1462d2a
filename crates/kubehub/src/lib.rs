//! Extkit kubehub – read capability over the cluster and extension resolution

#![forbid(unsafe_code)]

use anyhow::{anyhow, Context};
use tracing::{debug, warn};

use extkit_core::{ExtensionKind, ManagedResource, ReadError};
use kube::{
    api::{Api, ListParams},
    core::{ApiResource, DynamicObject, GroupVersionKind},
    Client,
};

mod resolve;
pub mod testing;

pub use resolve::{find_extension, find_extension_phase};

/// Read capability: list resources of one kind in one namespace.
///
/// An empty `namespace` lists across all namespaces.
#[async_trait::async_trait]
pub trait ResourceReader: Send + Sync {
    async fn list(&self, kind: &ExtensionKind, namespace: &str) -> Result<Vec<ManagedResource>, ReadError>;
}

/// Reader backed by a kube-rs client and dynamic objects.
#[derive(Clone)]
pub struct KubeReader {
    client: Client,
}

impl KubeReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build from the ambient kubeconfig / in-cluster environment.
    pub async fn try_default() -> anyhow::Result<Self> {
        let client = Client::try_default().await.context("creating kube client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ResourceReader for KubeReader {
    async fn list(&self, kind: &ExtensionKind, namespace: &str) -> Result<Vec<ManagedResource>, ReadError> {
        let ar = api_resource(kind);
        let api: Api<DynamicObject> = if namespace.is_empty() {
            Api::all_with(self.client.clone(), &ar)
        } else {
            Api::namespaced_with(self.client.clone(), namespace, &ar)
        };
        let list = api.list(&ListParams::default()).await.map_err(map_kube_error)?;
        debug!(kind = %kind, ns = %namespace, count = list.items.len(), "listed");
        Ok(shape_items(kind, &list.items))
    }
}

/// Shape listed objects, skipping (with a warning) those missing a name or `spec.type`.
pub fn shape_items(kind: &ExtensionKind, items: &[DynamicObject]) -> Vec<ManagedResource> {
    let mut out = Vec::with_capacity(items.len());
    for obj in items {
        match resource_from_dynamic(obj) {
            Ok(r) => out.push(r),
            Err(e) => warn!(kind = %kind, name = ?obj.metadata.name, error = %e, "skipping unshapeable object"),
        }
    }
    out
}

pub fn api_resource(kind: &ExtensionKind) -> ApiResource {
    let gvk = GroupVersionKind::gvk(&kind.group, &kind.version, &kind.kind);
    ApiResource::from_gvk(&gvk)
}

/// 404 becomes `NotFound`, other API statuses keep their code.
pub fn map_kube_error(err: kube::Error) -> ReadError {
    match err {
        kube::Error::Api(ae) if ae.code == 404 => ReadError::NotFound(ae.message),
        kube::Error::Api(ae) => ReadError::Api { code: ae.code, message: ae.message },
        other => ReadError::Other(anyhow::Error::new(other)),
    }
}

fn strip_managed_fields(v: &mut serde_json::Value) {
    if let Some(meta) = v.get_mut("metadata") {
        if let Some(obj) = meta.as_object_mut() {
            obj.remove("managedFields");
        }
    }
}

/// Shape a dynamic object into a [`ManagedResource`]. Requires `metadata.name` and `spec.type`.
pub fn resource_from_dynamic(obj: &DynamicObject) -> anyhow::Result<ManagedResource> {
    let name = obj.metadata.name.clone().ok_or_else(|| anyhow!("object missing metadata.name"))?;
    let type_ = obj
        .data
        .get("spec")
        .and_then(|s| s.get("type"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| anyhow!("object {} missing spec.type", name))?
        .to_string();
    let mut raw = serde_json::to_value(obj).context("serializing DynamicObject")?;
    strip_managed_fields(&mut raw);
    Ok(ManagedResource {
        name,
        namespace: obj.metadata.namespace.clone().unwrap_or_default(),
        type_,
        annotations: obj.metadata.annotations.clone(),
        raw,
    })
}
