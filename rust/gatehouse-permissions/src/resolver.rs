//! Pure role arithmetic. Nothing here performs I/O: callers fetch the
//! entities and the user's groups up front and hand them in as a
//! [`Grantee`].

use std::collections::BTreeSet;

use gatehouse_model::{
    Collection, Group, GroupId, Organization, OrganizationId, Project, Resource, ResourceType,
    Role, RoleType, User, UserId,
};

use crate::{Settings, Workspace};

/// A user together with the groups they hold roles through
#[derive(Debug, Clone, Copy)]
pub struct Grantee<'a> {
    /// The user being evaluated
    pub user: &'a UserId,
    /// The user's groups in the enclosing organization
    pub groups: &'a BTreeSet<GroupId>,
}

impl<'a> Grantee<'a> {
    /// Pair a user with their groups
    pub fn new(user: &'a UserId, groups: &'a BTreeSet<GroupId>) -> Self {
        Self { user, groups }
    }
}

/// The groups of `organization` that `user` belongs to, taking both the
/// user's own record and the groups' member lists into account.
pub fn group_membership(
    organization: &OrganizationId,
    user: &User,
    groups: &[Group],
) -> BTreeSet<GroupId> {
    let listed = groups
        .iter()
        .filter(|group| &group.organization_id == organization && group.has_member(&user.id))
        .map(|group| group.id.clone());

    user.groups_in(organization).cloned().chain(listed).collect()
}

fn grants_read(roles: &BTreeSet<Role>) -> bool {
    roles.iter().any(|role| role.role_type == RoleType::Read)
}

/// The effective role types `grantee` holds on `resource` inside
/// `workspace`.
///
/// The result is the union of the roles granted on the resource itself and
/// the transitive roles granted on the enclosing Organization and Project.
/// When [`Settings::require_workspace_read`] is set, a user who cannot read
/// an enclosing level holds nothing at all.
pub fn roles_in_resource<R>(
    settings: &Settings,
    workspace: Workspace<'_>,
    resource: &R,
    grantee: Grantee<'_>,
) -> BTreeSet<RoleType>
where
    R: Resource + ?Sized,
{
    let resource_type = resource.resource_type();
    let mut roles = resource
        .permissions()
        .roles_of(grantee.user, grantee.groups);

    let organization_roles = workspace
        .organization
        .map(|organization| {
            organization
                .permissions
                .roles_of(grantee.user, grantee.groups)
        })
        .unwrap_or_default();

    if workspace.organization.is_some() && resource_type != ResourceType::Organization {
        if settings.require_workspace_read && !grants_read(&organization_roles) {
            return BTreeSet::new();
        }
        roles.extend(organization_roles.iter().filter(|role| role.transitive));
    }

    if let Some(project) = workspace.project {
        if !matches!(
            resource_type,
            ResourceType::Organization | ResourceType::Project
        ) {
            let project_roles = project.permissions.roles_of(grantee.user, grantee.groups);
            if settings.require_workspace_read
                && !organization_roles.iter().any(Role::is_transitive_read)
                && !grants_read(&project_roles)
            {
                return BTreeSet::new();
            }
            roles.extend(project_roles.into_iter().filter(|role| role.transitive));
        }
    }

    roles.into_iter().map(|role| role.role_type).collect()
}

/// The effective role types `grantee` holds on a link type joining
/// `collections`.
///
/// Nobody holds anything on a link type unless they can read both joined
/// collections. Beyond the link type's own roles, a role held on both
/// collections applies to the link type too. A link type naming fewer than
/// two collections (`collections` is `None`) grants nothing.
pub fn roles_in_link_type<R>(
    settings: &Settings,
    workspace: Workspace<'_>,
    link_type: &R,
    collections: Option<(&Collection, &Collection)>,
    grantee: Grantee<'_>,
) -> BTreeSet<RoleType>
where
    R: Resource + ?Sized,
{
    let Some((first, second)) = collections else {
        return BTreeSet::new();
    };

    let first_roles = roles_in_resource(settings, workspace, first, grantee);
    let second_roles = roles_in_resource(settings, workspace, second, grantee);
    if !first_roles.contains(&RoleType::Read) || !second_roles.contains(&RoleType::Read) {
        return BTreeSet::new();
    }

    let mut roles = roles_in_resource(settings, workspace, link_type, grantee);
    roles.extend(first_roles.intersection(&second_roles).copied());
    roles
}

/// True if `grantee` may read every resource of the workspace through a
/// transitive Read on the Organization or on the Project.
pub fn can_read_all_in_workspace(
    organization: &Organization,
    project: Option<&Project>,
    grantee: Grantee<'_>,
) -> bool {
    let transitive_read = |roles: BTreeSet<Role>| roles.iter().any(Role::is_transitive_read);

    transitive_read(
        organization
            .permissions
            .roles_of(grantee.user, grantee.groups),
    ) || project.is_some_and(|project| {
        transitive_read(project.permissions.roles_of(grantee.user, grantee.groups))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_model::{LinkType, Permissions, View};
    use pretty_assertions::assert_eq;

    fn user() -> UserId {
        UserId::from("u1")
    }

    fn reader_organization() -> Organization {
        Organization::new("o1", "ACME")
            .with_permissions(Permissions::default().with_user(&user(), [RoleType::Read]))
    }

    fn reader_project() -> Project {
        Project::new("p1", "ROADMAP")
            .with_permissions(Permissions::default().with_user(&user(), [RoleType::Read]))
    }

    #[test]
    fn it_returns_direct_grants() {
        let settings = Settings::default();
        let (organization, project) = (reader_organization(), reader_project());
        let workspace = Workspace::organization(&organization).with_project(&project);
        let collection = Collection::new("c1", "Tasks").with_permissions(
            Permissions::default().with_user(&user(), [RoleType::Read, RoleType::Write]),
        );
        let groups = BTreeSet::new();

        let roles = roles_in_resource(
            &settings,
            workspace,
            &collection,
            Grantee::new(&user(), &groups),
        );

        assert_eq!(roles, BTreeSet::from([RoleType::Read, RoleType::Write]));
    }

    #[test]
    fn it_adds_group_and_transitive_grants() {
        let settings = Settings::default();
        let team = GroupId::from("team");
        let organization = Organization::new("o1", "ACME").with_permissions(
            Permissions::default()
                .with_user(&user(), [Role::transitive(RoleType::Read)])
                .with_group(&team, [Role::transitive(RoleType::Manage)]),
        );
        let project = Project::new("p1", "ROADMAP");
        let workspace = Workspace::organization(&organization).with_project(&project);
        let collection = Collection::new("c1", "Tasks")
            .with_permissions(Permissions::default().with_group(&team, [RoleType::Contribute]));
        let groups = BTreeSet::from([team.clone()]);

        let roles = roles_in_resource(
            &settings,
            workspace,
            &collection,
            Grantee::new(&user(), &groups),
        );

        assert_eq!(
            roles,
            BTreeSet::from([RoleType::Read, RoleType::Contribute, RoleType::Manage])
        );
    }

    #[test]
    fn it_ignores_non_transitive_workspace_grants_below_them() {
        let settings = Settings::default();
        let organization = Organization::new("o1", "ACME").with_permissions(
            Permissions::default().with_user(&user(), [RoleType::Read, RoleType::Manage]),
        );
        let project = reader_project();
        let workspace = Workspace::organization(&organization).with_project(&project);
        let groups = BTreeSet::new();

        let roles = roles_in_resource(
            &settings,
            workspace,
            &Collection::new("c1", "Tasks"),
            Grantee::new(&user(), &groups),
        );

        assert!(roles.is_empty());
    }

    #[test]
    fn it_requires_read_on_every_enclosing_level() {
        let settings = Settings::default();
        let organization = Organization::new("o1", "ACME").with_permissions(
            Permissions::default().with_user(&user(), [Role::transitive(RoleType::Write)]),
        );
        let project = reader_project();
        let workspace = Workspace::organization(&organization).with_project(&project);
        let collection = Collection::new("c1", "Tasks")
            .with_permissions(Permissions::default().with_user(&user(), [RoleType::Read]));
        let groups = BTreeSet::new();
        let id = user();
        let grantee = Grantee::new(&id, &groups);

        assert!(roles_in_resource(&settings, workspace, &collection, grantee).is_empty());

        let lenient = Settings {
            require_workspace_read: false,
            ..Settings::default()
        };
        assert_eq!(
            roles_in_resource(&lenient, workspace, &collection, grantee),
            BTreeSet::from([RoleType::Read, RoleType::Write])
        );
    }

    #[test]
    fn it_lets_a_transitive_organization_read_stand_in_for_project_read() {
        let settings = Settings::default();
        let organization = Organization::new("o1", "ACME").with_permissions(
            Permissions::default().with_user(&user(), [Role::transitive(RoleType::Read)]),
        );
        let project = Project::new("p1", "ROADMAP");
        let workspace = Workspace::organization(&organization).with_project(&project);
        let groups = BTreeSet::new();

        let roles = roles_in_resource(
            &settings,
            workspace,
            &Collection::new("c1", "Tasks"),
            Grantee::new(&user(), &groups),
        );

        assert_eq!(roles, BTreeSet::from([RoleType::Read]));
    }

    #[test]
    fn it_evaluates_workspace_levels_on_their_own_grants() {
        let settings = Settings::default();
        let organization = Organization::new("o1", "ACME").with_permissions(
            Permissions::default().with_user(&user(), [Role::transitive(RoleType::Manage)]),
        );
        let project = Project::new("p1", "ROADMAP")
            .with_permissions(Permissions::default().with_user(&user(), [RoleType::Write]));
        let workspace = Workspace::organization(&organization).with_project(&project);
        let groups = BTreeSet::new();
        let id = user();
        let grantee = Grantee::new(&id, &groups);

        assert_eq!(
            roles_in_resource(&settings, workspace, &organization, grantee),
            BTreeSet::from([RoleType::Manage])
        );
        // No organization Read, so nothing inside it counts.
        assert!(roles_in_resource(&settings, workspace, &project, grantee).is_empty());
    }

    #[test]
    fn it_treats_absent_levels_as_empty() {
        let settings = Settings::default();
        let view = View::new("v1", "Board")
            .with_permissions(Permissions::default().with_user(&user(), [RoleType::Read]));
        let groups = BTreeSet::new();

        let roles = roles_in_resource(
            &settings,
            Workspace::none(),
            &view,
            Grantee::new(&user(), &groups),
        );

        assert_eq!(roles, BTreeSet::from([RoleType::Read]));
    }

    #[test]
    fn it_never_loses_roles_when_grants_are_added() {
        let settings = Settings::default();
        let (organization, project) = (reader_organization(), reader_project());
        let workspace = Workspace::organization(&organization).with_project(&project);
        let groups = BTreeSet::new();
        let id = user();
        let grantee = Grantee::new(&id, &groups);
        let mut collection = Collection::new("c1", "Tasks")
            .with_permissions(Permissions::default().with_user(&user(), [RoleType::Read]));

        let before = roles_in_resource(&settings, workspace, &collection, grantee);
        collection
            .permissions
            .grant_user(&user(), [RoleType::Delete]);
        let after = roles_in_resource(&settings, workspace, &collection, grantee);

        assert!(before.is_subset(&after));
        assert!(after.contains(&RoleType::Delete));
    }

    #[test]
    fn it_shares_roles_held_on_both_linked_collections() {
        let settings = Settings::default();
        let (organization, project) = (reader_organization(), reader_project());
        let workspace = Workspace::organization(&organization).with_project(&project);
        let groups = BTreeSet::new();
        let id = user();
        let grantee = Grantee::new(&id, &groups);
        let tasks = Collection::new("c1", "Tasks").with_permissions(
            Permissions::default().with_user(&user(), [RoleType::Read, RoleType::Write]),
        );
        let people = Collection::new("c2", "People").with_permissions(
            Permissions::default().with_user(&user(), [RoleType::Read, RoleType::Write]),
        );
        let assignees = LinkType::new("l1", "c1", "c2")
            .with_permissions(Permissions::default().with_user(&user(), [RoleType::Manage]));

        let roles = roles_in_link_type(
            &settings,
            workspace,
            &assignees,
            Some((&tasks, &people)),
            grantee,
        );
        assert_eq!(
            roles,
            BTreeSet::from([RoleType::Read, RoleType::Write, RoleType::Manage])
        );

        let hidden = Collection::new("c2", "People");
        let roles = roles_in_link_type(
            &settings,
            workspace,
            &assignees,
            Some((&tasks, &hidden)),
            grantee,
        );
        assert!(roles.is_empty());

        assert!(roles_in_link_type(&settings, workspace, &assignees, None, grantee).is_empty());
    }

    #[test]
    fn it_merges_user_and_group_sourced_membership() {
        let organization = OrganizationId::from("o1");
        let user = User::new("u1", "u1@example.com").in_group("o1", "g1");
        let groups = [
            Group::new("g2", "o1").with_member("u1"),
            Group::new("g3", "o2").with_member("u1"),
            Group::new("g4", "o1"),
        ];

        assert_eq!(
            group_membership(&organization, &user, &groups),
            BTreeSet::from([GroupId::from("g1"), GroupId::from("g2")])
        );
    }

    #[test]
    fn it_detects_workspace_wide_readers() {
        let organization = reader_organization();
        let project = Project::new("p1", "ROADMAP").with_permissions(
            Permissions::default().with_user(&user(), [Role::transitive(RoleType::Read)]),
        );
        let groups = BTreeSet::new();
        let id = user();
        let grantee = Grantee::new(&id, &groups);

        assert!(!can_read_all_in_workspace(&organization, None, grantee));
        assert!(can_read_all_in_workspace(&organization, Some(&project), grantee));
    }
}
