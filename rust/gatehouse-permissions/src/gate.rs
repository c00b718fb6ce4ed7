use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use gatehouse_model::{
    Collection, Organization, Project, Resource, ResourceType, RoleType, UserId, View, ViewId,
};

use crate::{
    Directory, GatehousePermissionsError, Grantee, Lookup, Settings, Workspace, resolver,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DecisionKey {
    user: UserId,
    resource_type: ResourceType,
    resource_id: String,
    role: RoleType,
}

impl DecisionKey {
    fn new<R>(user: &UserId, resource: &R, role: RoleType) -> Self
    where
        R: Resource + ?Sized,
    {
        Self {
            user: user.clone(),
            resource_type: resource.resource_type(),
            resource_id: resource.id().to_owned(),
            role,
        }
    }
}

/// How a resource relates to collections when its roles are resolved
pub(crate) enum Endpoints {
    /// An ordinary resource
    Unlinked,
    /// A link type naming fewer than two collections
    Unbound,
    /// A link type and the two collections it joins
    Bound(Arc<Collection>, Arc<Collection>),
}

/// A [PermissionGate] answers permission questions for one session (one
/// request, typically).
///
/// Positive and negative decisions are memoized per user, resource and role
/// for the lifetime of the gate. The gate never notices when a resource's
/// grants change, so callers that mutate grants in the middle of a session
/// must call [PermissionGate::invalidate_cache].
///
/// The gate may carry an active [View]: when set, a user may reach
/// collections and link types through the view's query with the roles of
/// the view's author (see [PermissionGate::has_role_in_collection_with_view]).
pub struct PermissionGate<D>
where
    D: Directory,
{
    pub(crate) lookup: Lookup<D>,
    pub(crate) settings: Settings,
    decisions: HashMap<DecisionKey, bool>,
    view_id: Option<ViewId>,
}

impl<D> PermissionGate<D>
where
    D: Directory,
{
    /// Start a session over `directory` with default [Settings]
    pub fn new(directory: D) -> Self {
        Self::with_settings(directory, Settings::default())
    }

    /// Start a session over `directory`
    pub fn with_settings(directory: D, settings: Settings) -> Self {
        Self {
            lookup: Lookup::new(directory),
            settings,
            decisions: HashMap::new(),
            view_id: None,
        }
    }

    /// The settings in effect
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The session's entity lookup
    pub fn lookup(&mut self) -> &mut Lookup<D> {
        &mut self.lookup
    }

    /// Make `view_id` the active view. An empty id clears it.
    pub fn set_view_id(&mut self, view_id: impl Into<ViewId>) {
        let view_id = view_id.into();
        if view_id.is_empty() {
            self.view_id = None;
        } else {
            self.view_id = Some(view_id);
        }
    }

    /// Forget the active view
    pub fn clear_view_id(&mut self) {
        self.view_id = None;
    }

    /// The id of the active view, if any
    pub fn view_id(&self) -> Option<&ViewId> {
        self.view_id.as_ref()
    }

    /// The active view. The view is read once and kept for the rest of the
    /// session.
    pub async fn active_view(&mut self) -> Result<Option<Arc<View>>, GatehousePermissionsError> {
        let Some(view_id) = self.view_id.clone() else {
            return Ok(None);
        };
        Ok(Some(self.lookup.view(&view_id).await?))
    }

    pub(crate) async fn endpoints<R>(
        &mut self,
        resource: &R,
    ) -> Result<Endpoints, GatehousePermissionsError>
    where
        R: Resource + ?Sized,
    {
        if resource.linked_collection_ids().is_none() {
            return Ok(Endpoints::Unlinked);
        }
        Ok(match resource.bound_collection_ids() {
            Some((first, second)) => Endpoints::Bound(
                self.lookup.collection(first).await?,
                self.lookup.collection(second).await?,
            ),
            None => Endpoints::Unbound,
        })
    }

    pub(crate) fn resolve<R>(
        &self,
        workspace: Workspace<'_>,
        resource: &R,
        endpoints: &Endpoints,
        grantee: Grantee<'_>,
    ) -> BTreeSet<RoleType>
    where
        R: Resource + ?Sized,
    {
        match endpoints {
            Endpoints::Unlinked => {
                resolver::roles_in_resource(&self.settings, workspace, resource, grantee)
            }
            Endpoints::Unbound => {
                resolver::roles_in_link_type(&self.settings, workspace, resource, None, grantee)
            }
            Endpoints::Bound(first, second) => resolver::roles_in_link_type(
                &self.settings,
                workspace,
                resource,
                Some((first.as_ref(), second.as_ref())),
                grantee,
            ),
        }
    }

    /// Every role type `user_id` holds on `resource` inside `workspace`.
    /// Link types are resolved together with the collections they join.
    pub async fn roles_in_resource<R>(
        &mut self,
        workspace: Workspace<'_>,
        resource: &R,
        user_id: &UserId,
    ) -> Result<BTreeSet<RoleType>, GatehousePermissionsError>
    where
        R: Resource + ?Sized,
    {
        let user = self.lookup.user(user_id).await?;
        let groups = self
            .lookup
            .user_groups(workspace.organization, &user)
            .await?;
        let endpoints = self.endpoints(resource).await?;

        Ok(self.resolve(
            workspace,
            resource,
            &endpoints,
            Grantee::new(&user.id, &groups),
        ))
    }

    /// True if `user_id` holds `role` on `resource`. Decisions are
    /// memoized for the rest of the session.
    pub async fn has_role<R>(
        &mut self,
        workspace: Workspace<'_>,
        resource: &R,
        role: RoleType,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError>
    where
        R: Resource + ?Sized,
    {
        let key = DecisionKey::new(user_id, resource, role);
        if let Some(granted) = self.decisions.get(&key) {
            tracing::trace!(
                user = %user_id,
                resource_type = %key.resource_type,
                resource = %key.resource_id,
                %role,
                granted,
                "Reusing cached decision"
            );
            return Ok(*granted);
        }

        let granted = self
            .roles_in_resource(workspace, resource, user_id)
            .await?
            .contains(&role);
        tracing::debug!(
            user = %user_id,
            resource_type = %key.resource_type,
            resource = %key.resource_id,
            %role,
            granted,
            "Resolved role"
        );
        self.decisions.insert(key, granted);

        Ok(granted)
    }

    /// Like [PermissionGate::has_role], but a missing role is an error
    pub async fn check_role<R>(
        &mut self,
        workspace: Workspace<'_>,
        resource: &R,
        role: RoleType,
        user_id: &UserId,
    ) -> Result<(), GatehousePermissionsError>
    where
        R: Resource + ?Sized,
    {
        if self.has_role(workspace, resource, role, user_id).await? {
            return Ok(());
        }
        tracing::warn!(
            user = %user_id,
            resource_type = %resource.resource_type(),
            resource = resource.id(),
            %role,
            "Permission denied"
        );
        Err(GatehousePermissionsError::resource_denied(resource))
    }

    /// True if `user_id` holds at least one of `roles` on `resource`
    pub async fn has_any_role<R, I>(
        &mut self,
        workspace: Workspace<'_>,
        resource: &R,
        roles: I,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError>
    where
        R: Resource + ?Sized,
        I: IntoIterator<Item = RoleType>,
    {
        for role in roles {
            if self.has_role(workspace, resource, role, user_id).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Drop every memoized decision about `resource`, for all users and
    /// roles. Decisions about other resources are kept.
    pub fn invalidate_cache<R>(&mut self, resource: &R)
    where
        R: Resource + ?Sized,
    {
        let resource_type = resource.resource_type();
        let resource_id = resource.id();
        self.decisions.retain(|key, _| {
            key.resource_type != resource_type || key.resource_id != resource_id
        });
        tracing::debug!(
            %resource_type,
            resource = resource_id,
            "Invalidated cached decisions"
        );
    }

    /// True if `user_id` may read every resource in the organization (and
    /// project) through a transitive Read
    pub async fn can_read_all_in_workspace(
        &mut self,
        organization: &Organization,
        project: Option<&Project>,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError> {
        let user = self.lookup.user(user_id).await?;
        let groups = self.lookup.user_groups(Some(organization), &user).await?;

        Ok(resolver::can_read_all_in_workspace(
            organization,
            project,
            Grantee::new(&user.id, &groups),
        ))
    }
}
