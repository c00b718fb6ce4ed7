use gatehouse_model::{Collection, Document, RoleType, User, UserId};
use serde_json::Value;

use crate::{Directory, GatehousePermissionsError, PermissionGate, Workspace};

fn names_user(value: &str, user: &User) -> bool {
    let value = value.trim();
    (!user.email.is_empty() && value.eq_ignore_ascii_case(&user.email))
        || (!user.id.is_empty() && value == user.id.as_str())
}

/// True if the document's assignee attribute names `user`, for collections
/// whose purpose designates one. The attribute may hold a single email or
/// user id, or a list of them.
pub fn is_purpose_owner(collection: &Collection, document: &Document, user: &User) -> bool {
    let Some(attribute) = collection.purpose.owner_attribute() else {
        return false;
    };
    match document.value(attribute) {
        Some(Value::String(value)) => names_user(value, user),
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .any(|value| names_user(value, user)),
        _ => false,
    }
}

impl<D> PermissionGate<D>
where
    D: Directory,
{
    /// True if `user_id` may add documents to `collection`, directly or
    /// through the active view
    pub async fn can_create_documents(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError> {
        self.has_role_in_collection_with_view(
            workspace,
            collection,
            RoleType::Contribute,
            RoleType::Contribute,
            user_id,
        )
        .await
    }

    /// Like [PermissionGate::can_create_documents], but a refusal is an error
    pub async fn check_can_create_documents(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        user_id: &UserId,
    ) -> Result<(), GatehousePermissionsError> {
        self.check_role_in_collection_with_view(
            workspace,
            collection,
            RoleType::Contribute,
            RoleType::Contribute,
            user_id,
        )
        .await
    }

    /// True if `user_id` may change `document`: through Write on the
    /// collection (directly or via the active view) or as its owner.
    pub async fn can_edit_document(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        document: &Document,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError> {
        self.can_change_document(workspace, collection, document, RoleType::Write, user_id)
            .await
    }

    /// Like [PermissionGate::can_edit_document], but a refusal is an error
    pub async fn check_can_edit_document(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        document: &Document,
        user_id: &UserId,
    ) -> Result<(), GatehousePermissionsError> {
        if self
            .can_edit_document(workspace, collection, document, user_id)
            .await?
        {
            return Ok(());
        }
        Err(self.document_denied(document, RoleType::Write, user_id))
    }

    /// True if `user_id` may remove `document`: through Delete on the
    /// collection (directly or via the active view) or as its owner.
    pub async fn can_delete_document(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        document: &Document,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError> {
        self.can_change_document(workspace, collection, document, RoleType::Delete, user_id)
            .await
    }

    /// Like [PermissionGate::can_delete_document], but a refusal is an error
    pub async fn check_can_delete_document(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        document: &Document,
        user_id: &UserId,
    ) -> Result<(), GatehousePermissionsError> {
        if self
            .can_delete_document(workspace, collection, document, user_id)
            .await?
        {
            return Ok(());
        }
        Err(self.document_denied(document, RoleType::Delete, user_id))
    }

    /// True if `user_id` owns `document`: either they contributed it and may
    /// still contribute to the collection, or they can read the collection
    /// and the document is assigned to them.
    pub async fn is_document_owner(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        document: &Document,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError> {
        if document.is_created_by(user_id)
            && self
                .has_role_in_collection_with_view(
                    workspace,
                    collection,
                    RoleType::Contribute,
                    RoleType::Contribute,
                    user_id,
                )
                .await?
        {
            return Ok(true);
        }

        if collection.purpose.owner_attribute().is_none() {
            return Ok(false);
        }
        if !self
            .has_role_in_collection_with_view(
                workspace,
                collection,
                RoleType::Read,
                RoleType::Read,
                user_id,
            )
            .await?
        {
            return Ok(false);
        }
        let user = self.lookup.user(user_id).await?;
        Ok(is_purpose_owner(collection, document, &user))
    }

    async fn can_change_document(
        &mut self,
        workspace: Workspace<'_>,
        collection: &Collection,
        document: &Document,
        role: RoleType,
        user_id: &UserId,
    ) -> Result<bool, GatehousePermissionsError> {
        if self
            .has_role_in_collection_with_view(workspace, collection, role, role, user_id)
            .await?
        {
            return Ok(true);
        }
        self.is_document_owner(workspace, collection, document, user_id)
            .await
    }

    fn document_denied(
        &self,
        document: &Document,
        role: RoleType,
        user_id: &UserId,
    ) -> GatehousePermissionsError {
        tracing::warn!(
            user = %user_id,
            document = %document.id,
            collection = %document.collection_id,
            %role,
            "Permission denied"
        );
        GatehousePermissionsError::DocumentPermissionDenied {
            document_id: document.id.clone(),
        }
    }
}
