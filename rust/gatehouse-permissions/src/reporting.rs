use std::collections::BTreeSet;

use gatehouse_model::{
    LinkType, Organization, Project, Resource, RoleType, RolesDifference, UserId,
};

use crate::{
    Directory, GatehousePermissionsError, Grantee, PermissionGate, Workspace, group_membership,
};

impl<D> PermissionGate<D>
where
    D: Directory,
{
    /// Every user of `organization` holding `role` on `resource` inside
    /// it. These answers are computed fresh and never memoized.
    pub async fn resource_users_by_role<R>(
        &mut self,
        organization: &Organization,
        project: Option<&Project>,
        resource: &R,
        role: RoleType,
    ) -> Result<BTreeSet<UserId>, GatehousePermissionsError>
    where
        R: Resource + ?Sized,
    {
        let users = self.lookup.users(&organization.id).await?;
        let groups = self.lookup.groups(&organization.id).await?;
        let endpoints = self.endpoints(resource).await?;
        let workspace = Workspace::new(Some(organization), project);

        Ok(users
            .iter()
            .filter(|user| {
                let membership = group_membership(&organization.id, user, &groups);
                self.resolve(
                    workspace,
                    resource,
                    &endpoints,
                    Grantee::new(&user.id, &membership),
                )
                .contains(&role)
            })
            .map(|user| user.id.clone())
            .collect())
    }

    /// Every user holding `role` on the organization itself
    pub async fn organization_users_by_role(
        &mut self,
        organization: &Organization,
        role: RoleType,
    ) -> Result<BTreeSet<UserId>, GatehousePermissionsError> {
        self.resource_users_by_role(organization, None, organization, role)
            .await
    }

    /// Every user of `organization` holding `role` on `project`
    pub async fn project_users_by_role(
        &mut self,
        organization: &Organization,
        project: &Project,
        role: RoleType,
    ) -> Result<BTreeSet<UserId>, GatehousePermissionsError> {
        self.resource_users_by_role(organization, Some(project), project, role)
            .await
    }

    /// Every user of `organization` holding `role` on `link_type`
    pub async fn link_type_users_by_role(
        &mut self,
        organization: &Organization,
        project: Option<&Project>,
        link_type: &LinkType,
        role: RoleType,
    ) -> Result<BTreeSet<UserId>, GatehousePermissionsError> {
        self.resource_users_by_role(organization, project, link_type, role)
            .await
    }

    /// Who gained and who lost Read between two versions of an organization
    pub async fn organization_readers_difference(
        &mut self,
        old: &Organization,
        new: &Organization,
    ) -> Result<RolesDifference, GatehousePermissionsError> {
        let before = self.organization_users_by_role(old, RoleType::Read).await?;
        let after = self.organization_users_by_role(new, RoleType::Read).await?;
        Ok(RolesDifference::between(&before, &after))
    }

    /// Who gained and who lost Read between two versions of a project
    pub async fn project_readers_difference(
        &mut self,
        organization: &Organization,
        old: &Project,
        new: &Project,
    ) -> Result<RolesDifference, GatehousePermissionsError> {
        let before = self
            .project_users_by_role(organization, old, RoleType::Read)
            .await?;
        let after = self
            .project_users_by_role(organization, new, RoleType::Read)
            .await?;
        Ok(RolesDifference::between(&before, &after))
    }

    /// Who gained and who lost Read between two versions of a resource
    pub async fn resource_readers_difference<R>(
        &mut self,
        organization: &Organization,
        project: Option<&Project>,
        old: &R,
        new: &R,
    ) -> Result<RolesDifference, GatehousePermissionsError>
    where
        R: Resource + ?Sized,
    {
        let before = self
            .resource_users_by_role(organization, project, old, RoleType::Read)
            .await?;
        let after = self
            .resource_users_by_role(organization, project, new, RoleType::Read)
            .await?;
        Ok(RolesDifference::between(&before, &after))
    }
}
