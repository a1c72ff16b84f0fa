//! Resolution of mixed identifier/name reference lists

use crate::error::{ControllerError, ReferenceKind};
use alb_cloud_client::{CallContext, CloudApiTrait, CloudError, Scheme};
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;

/// Identifier returned by a name lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupMatch {
    /// Resolved identifier
    pub id: String,
    /// Name the identifier matched, when the inventory reports it
    pub name: Option<String>,
}

impl LookupMatch {
    /// Match whose name the inventory does not report
    pub fn id(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None }
    }

    /// Match carrying the name it was found under
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

/// Resolve `input` into identifiers.
///
/// Items carrying the kind's identifier prefix pass through untouched. The
/// remaining names are resolved with a single `lookup` call. Output is the
/// pass-through identifiers followed by the resolved ones and must have the
/// same length as `input`. Resolution also fails when a lookup returns the
/// same identifier twice, or when the lookup reports names and one of the
/// requested names is not among them.
pub async fn resolve_references<F, Fut>(
    kind: ReferenceKind,
    input: &[String],
    lookup: F,
) -> Result<Vec<String>, ControllerError>
where
    F: FnOnce(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<LookupMatch>, CloudError>>,
{
    let (mut resolved, names): (Vec<String>, Vec<String>) =
        input.iter().cloned().partition(|item| item.starts_with(kind.id_prefix()));

    let mut complete = true;
    if !names.is_empty() {
        debug!("Resolving {} {} by name: {:?}", names.len(), kind, names);
        let matches = lookup(names.clone())
            .await
            .map_err(|source| ControllerError::ReferenceLookup { kind, source })?;

        complete = names_matched(&names, &matches) && ids_unique(&matches);

        resolved.extend(matches.into_iter().map(|m| m.id));
    }

    if !complete || resolved.len() != input.len() {
        return Err(ControllerError::UnresolvedReference {
            kind,
            requested: input.to_vec(),
            resolved,
        });
    }

    Ok(resolved)
}

/// Every requested name is reported, unless the lookup reports no names at all
fn names_matched(names: &[String], matches: &[LookupMatch]) -> bool {
    if matches.iter().all(|m| m.name.is_none()) {
        return true;
    }
    let matched: HashSet<&str> = matches.iter().filter_map(|m| m.name.as_deref()).collect();
    names.iter().all(|name| matched.contains(name.as_str()))
}

fn ids_unique(matches: &[LookupMatch]) -> bool {
    let mut seen = HashSet::new();
    matches.iter().all(|m| seen.insert(m.id.as_str()))
}

/// Resolve security group IDs and names. An empty list stays empty.
pub async fn resolve_security_groups(
    cloud: &dyn CloudApiTrait,
    ctx: &CallContext,
    input: &[String],
) -> Result<Vec<String>, ControllerError> {
    resolve_references(ReferenceKind::SecurityGroup, input, |names| async move {
        let groups = cloud.get_security_groups_by_name(ctx, &names).await?;
        Ok(groups
            .into_iter()
            .map(|sg| LookupMatch::named(sg.group_id, sg.group_name))
            .collect())
    })
    .await
}

/// Resolve subnet IDs and names into a sorted list.
///
/// An empty list falls back to the cluster's default subnets for `scheme`.
pub async fn resolve_subnets(
    cloud: &dyn CloudApiTrait,
    ctx: &CallContext,
    input: &[String],
    scheme: Scheme,
) -> Result<Vec<String>, ControllerError> {
    let mut subnets = if input.is_empty() {
        debug!("No subnets annotated, using cluster {} subnets", scheme);
        cloud
            .cluster_subnets(ctx, scheme)
            .await
            .map_err(|source| ControllerError::ReferenceLookup {
                kind: ReferenceKind::Subnet,
                source,
            })?
    } else {
        resolve_references(ReferenceKind::Subnet, input, |names| async move {
            let ids = cloud.get_subnets_by_name(ctx, &names).await?;
            Ok(ids.into_iter().map(LookupMatch::id).collect())
        })
        .await?
    };
    subnets.sort();
    Ok(subnets)
}
