//! Access mediated by the active view.
//!
//! A user who holds a role on the active view may act on the collections and
//! link types its query reads, with whatever the view's author holds there.
//! Nothing is gained through a view the user holds no roles on, through a
//! view without an author, or on resources the query does not read.

use std::collections::BTreeSet;

use gatehouse_model::{Collection, LinkType, ResourceType, RoleType, UserId};

use crate::{Directory, GatehousePermissionsError, PermissionGate, Workspace};

impl<D> PermissionGate<D>
where
    D: Directory,
{
    /// The role types the active view grants `user_id` on `collection`: the
    /// user's roles on the view intersected with the author's roles on the
    /// collection.
    pub async fn roles_in_collection_via_view(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        user_id: &UserId,
    ) -> Result<BTreeSet<RoleType>, GatehousePermissionsError> {
        let Some(view) = self.active_view().await? else {
            return Ok(BTreeSet::new());
        };
        let view_roles = self
            .roles_in_resource(workspace, view.as_ref(), user_id)
            .await?;
        if view_roles.is_empty() {
            return Ok(BTreeSet::new());
        }
        let referenced = self.lookup.referenced_collection_ids(&view.query).await?;
        let Some(author) = view.author() else {
            return Ok(BTreeSet::new());
        };
        if !referenced.contains(&collection.id) {
            return Ok(BTreeSet::new());
        }

        let author_roles = self.roles_in_resource(workspace, collection, author).await?;
        Ok(view_roles.intersection(&author_roles).copied().collect())
    }

    /// The role types the active view grants `user_id` on `link_type`
    pub async fn roles_in_link_type_via_view(
        &mut self,
        workspace: Workspace<'_>,
        link_type: &LinkType,
        user_id: &UserId,
    ) -> Result<BTreeSet<RoleType>, GatehousePermissionsError> {
        let Some(view) = self.active_view().await? else {
            return Ok(BTreeSet::new());
        };
        let view_roles = self
            .roles_in_resource(workspace, view.as_ref(), user_id)
            .await?;
        if view_roles.is_empty() {
            return Ok(BTreeSet::new());
        }
        let Some(author) = view.author() else {
            return Ok(BTreeSet::new());
        };
        if !view.query.link_type_ids().contains(&link_type.id) {
            return Ok(BTreeSet::new());
        }

        let author_roles = self.roles_in_resource(workspace, link_type, author).await?;
        Ok(view_roles.intersection(&author_roles).copied().collect())
    }

    /// True if `user_id` holds `role` on `collection`, either directly or
    /// by holding `view_role` on the active view whose author holds `role`
    /// on the collection.
    pub async fn has_role_in_collection_with_view(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        role: RoleType,
        view_role: RoleType,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError> {
        if self.has_role(workspace, collection, role, user_id).await? {
            return Ok(true);
        }

        let Some(view) = self.active_view().await? else {
            return Ok(false);
        };
        if !self
            .has_role(workspace, view.as_ref(), view_role, user_id)
            .await?
        {
            return Ok(false);
        }
        let Some(author) = view.author() else {
            return Ok(false);
        };
        let referenced = self.lookup.referenced_collection_ids(&view.query).await?;
        if !referenced.contains(&collection.id) {
            return Ok(false);
        }

        let granted = self.has_role(workspace, collection, role, author).await?;
        if granted {
            tracing::debug!(
                user = %user_id,
                view = %view.id,
                collection = %collection.id,
                %role,
                "Granted through view"
            );
        }
        Ok(granted)
    }

    /// Like [PermissionGate::has_role_in_collection_with_view], but a
    /// missing role is an error
    pub async fn check_role_in_collection_with_view(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        role: RoleType,
        view_role: RoleType,
        user_id: &UserId,
    ) -> Result<(), GatehousePermissionsError> {
        if self
            .has_role_in_collection_with_view(workspace, collection, role, view_role, user_id)
            .await?
        {
            return Ok(());
        }
        tracing::warn!(
            user = %user_id,
            collection = %collection.id,
            %role,
            %view_role,
            "Permission denied"
        );
        Err(GatehousePermissionsError::resource_denied(collection))
    }

    /// True if `user_id` holds `role` on `link_type`, either directly or by
    /// holding `role` on the active view whose author holds `role` on the
    /// link type.
    pub async fn has_role_in_link_type_with_view(
        &mut self,
        workspace: Workspace<'_>,
        link_type: &LinkType,
        role: RoleType,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError> {
        if self.has_role(workspace, link_type, role, user_id).await? {
            return Ok(true);
        }

        let Some(view) = self.active_view().await? else {
            return Ok(false);
        };
        if !self
            .has_role(workspace, view.as_ref(), role, user_id)
            .await?
        {
            return Ok(false);
        }
        let Some(author) = view.author() else {
            return Ok(false);
        };
        if !view.query.link_type_ids().contains(&link_type.id) {
            return Ok(false);
        }

        self.has_role(workspace, link_type, role, author).await
    }

    /// Like [PermissionGate::has_role_in_link_type_with_view], but a missing
    /// role is an error
    pub async fn check_role_in_link_type_with_view(
        &mut self,
        workspace: Workspace<'_>,
        link_type: &LinkType,
        role: RoleType,
        user_id: &UserId,
    ) -> Result<(), GatehousePermissionsError> {
        if self
            .has_role_in_link_type_with_view(workspace, link_type, role, user_id)
            .await?
        {
            return Ok(());
        }
        tracing::warn!(
            user = %user_id,
            link_type = %link_type.id,
            %role,
            "Permission denied"
        );
        Err(GatehousePermissionsError::PermissionDenied {
            resource_type: ResourceType::LinkType,
        })
    }
}
