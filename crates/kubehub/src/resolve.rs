use tokio_util::sync::CancellationToken;
use tracing::debug;

use extkit_core::{ExtKitConfig, Lookup, ManagedResource, OperationalPhase, ReadError};

use crate::ResourceReader;

/// Find the managed resource of the configured extension type in `namespace`.
///
/// Issues one list call and returns the first entry whose `type` matches. An empty list
/// and a not-found list error both yield `Lookup::Absent`. Any other error, including
/// cancellation of `ctx` while the list is pending, is returned as is.
pub async fn find_extension<R>(
    ctx: &CancellationToken,
    reader: &R,
    namespace: &str,
    cfg: &ExtKitConfig,
) -> Result<Lookup<ManagedResource>, ReadError>
where
    R: ResourceReader + ?Sized,
{
    if ctx.is_cancelled() {
        return Err(ReadError::Cancelled);
    }
    debug!(kind = %cfg.kind, ns = %namespace, ext_type = %cfg.constants.extension_type, "resolving extension");
    let listed = tokio::select! {
        biased;
        _ = ctx.cancelled() => return Err(ReadError::Cancelled),
        res = reader.list(&cfg.kind, namespace) => res,
    };
    let items = match listed {
        Ok(items) => items,
        Err(e) if e.is_not_found() => {
            debug!(ns = %namespace, error = %e, "extension kind not found, treating as absent");
            return Ok(Lookup::Absent);
        }
        Err(e) => return Err(e),
    };

    let found = items.into_iter().find(|r| r.type_ == cfg.constants.extension_type);
    match &found {
        Some(r) => debug!(ns = %namespace, name = %r.name, "extension found"),
        None => debug!(ns = %namespace, "extension absent"),
    }
    Ok(found.into())
}

/// [`find_extension`] plus the phase of the found resource.
pub async fn find_extension_phase<R>(
    ctx: &CancellationToken,
    reader: &R,
    namespace: &str,
    cfg: &ExtKitConfig,
) -> Result<Lookup<(ManagedResource, OperationalPhase)>, ReadError>
where
    R: ResourceReader + ?Sized,
{
    let found = find_extension(ctx, reader, namespace, cfg).await?;
    Ok(found.map(|r| {
        let phase = OperationalPhase::classify(&r, &cfg.constants);
        (r, phase)
    }))
}
