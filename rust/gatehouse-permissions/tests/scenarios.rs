use std::collections::BTreeSet;

use gatehouse_model::{
    Collection, Document, Organization, Permissions, Project, Purpose, Query, QueryStem,
    ResourceType, Role, RoleType, User, UserId, View,
};
use gatehouse_permissions::{
    DirectoryCache, GatehousePermissionsError, MemoryDirectory, PermissionGate, Workspace,
};
use testresult::TestResult;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test;
#[cfg(target_arch = "wasm32")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn members<'a>(users: impl IntoIterator<Item = &'a UserId>) -> Permissions {
    users
        .into_iter()
        .fold(Permissions::default(), |permissions, user| {
            permissions.with_user(user, [RoleType::Read])
        })
}

fn users(ids: &[&str]) -> MemoryDirectory {
    ids.iter().fold(MemoryDirectory::default(), |directory, id| {
        directory.with_user(User::new(*id, format!("{id}@example.com")))
    })
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn transitive_organization_read_covers_the_whole_workspace() -> TestResult {
    let u1 = UserId::from("u1");
    let organization = Organization::new("o1", "ACME").with_permissions(
        Permissions::default().with_user(&u1, [Role::transitive(RoleType::Read)]),
    );
    let project = Project::new("p1", "ROADMAP");
    let mut gate = PermissionGate::new(users(&["u1"]));

    assert!(
        gate.can_read_all_in_workspace(&organization, Some(&project), &u1)
            .await?
    );

    let workspace = Workspace::organization(&organization).with_project(&project);
    assert!(
        gate.has_role(workspace, &Collection::new("c1", "Tasks"), RoleType::Read, &u1)
            .await?
    );
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn a_shared_view_lends_only_what_its_author_holds() -> TestResult {
    let (u1, u2) = (UserId::from("u1"), UserId::from("u2"));
    let organization = Organization::new("o1", "ACME").with_permissions(members([&u1, &u2]));
    let project = Project::new("p1", "ROADMAP").with_permissions(members([&u1, &u2]));
    let workspace = Workspace::organization(&organization).with_project(&project);
    let c2 = Collection::new("c2", "Contacts")
        .with_permissions(Permissions::default().with_user(&u1, [RoleType::Read]));
    let directory = users(&["u1", "u2"]).with_view(
        View::new("v1", "Contacts board")
            .authored_by("u1")
            .with_query(Query::new([QueryStem::new("c2")]))
            .with_permissions(Permissions::default().with_user(&u2, [RoleType::Read])),
    );
    let mut gate = PermissionGate::new(directory);
    gate.set_view_id("v1");

    assert!(
        gate.has_role_in_collection_with_view(workspace, &c2, RoleType::Read, RoleType::Read, &u2)
            .await?
    );
    assert!(
        !gate
            .has_role_in_collection_with_view(
                workspace,
                &c2,
                RoleType::Write,
                RoleType::Write,
                &u2
            )
            .await?
    );

    // Whatever the view lends is held by both the viewer and the author.
    let lent = gate.roles_in_collection_via_view(workspace, &c2, &u2).await?;
    let view = gate.active_view().await?.ok_or("active view")?;
    let viewer = gate.roles_in_resource(workspace, view.as_ref(), &u2).await?;
    let author = gate.roles_in_resource(workspace, &c2, &u1).await?;
    let bound: BTreeSet<_> = viewer.intersection(&author).copied().collect();
    assert!(lent.is_subset(&bound));
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn contributors_own_the_documents_they_created() -> TestResult {
    let u3 = UserId::from("u3");
    let organization = Organization::new("o1", "ACME").with_permissions(members([&u3]));
    let project = Project::new("p1", "ROADMAP").with_permissions(members([&u3]));
    let workspace = Workspace::organization(&organization).with_project(&project);
    let c1 = Collection::new("c1", "Tasks")
        .with_permissions(Permissions::default().with_user(&u3, [RoleType::Contribute]));
    let d1 = Document::new("d1", "c1").created_by("u3");
    let foreign = Document::new("d2", "c1").created_by("u4");
    let mut gate = PermissionGate::new(users(&["u3"]));

    assert!(!gate.has_role(workspace, &c1, RoleType::Write, &u3).await?);
    assert!(gate.can_edit_document(workspace, &c1, &d1, &u3).await?);
    assert!(gate.can_delete_document(workspace, &c1, &d1, &u3).await?);
    assert!(gate.can_create_documents(workspace, &c1, &u3).await?);

    assert!(!gate.can_edit_document(workspace, &c1, &foreign, &u3).await?);
    assert_eq!(
        gate.check_can_delete_document(workspace, &c1, &foreign, &u3)
            .await,
        Err(GatehousePermissionsError::DocumentPermissionDenied {
            document_id: "d2".into()
        })
    );
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn each_route_to_editing_a_document_stands_on_its_own() -> TestResult {
    let ann = UserId::from("ann");
    let organization = Organization::new("o1", "ACME").with_permissions(members([&ann]));
    let project = Project::new("p1", "ROADMAP").with_permissions(members([&ann]));
    let workspace = Workspace::organization(&organization).with_project(&project);
    let tasks = |roles: &[RoleType]| {
        Collection::new("c1", "Tasks")
            .with_purpose(Purpose::tasks("assignee"))
            .with_permissions(Permissions::default().with_user(&ann, roles.iter().copied()))
    };
    let plain = Document::new("d1", "c1");
    let created = Document::new("d1", "c1").created_by("ann");
    let assigned = Document::new("d1", "c1").with_value("assignee", "ann@example.com");

    let cases = [
        (tasks(&[RoleType::Write]), &plain, true),
        (tasks(&[RoleType::Read]), &plain, false),
        (tasks(&[RoleType::Contribute]), &created, true),
        (tasks(&[RoleType::Read]), &created, false),
        (tasks(&[RoleType::Read]), &assigned, true),
        (tasks(&[]), &assigned, false),
    ];

    for (collection, document, expected) in cases {
        // A fresh session per case: every case reuses the collection id.
        let mut gate = PermissionGate::new(users(&["ann"]));
        assert_eq!(
            gate.can_edit_document(workspace, &collection, document, &ann)
                .await?,
            expected,
            "roles {:?} on {:?}",
            collection.permissions.users.get(&ann),
            document
        );
    }
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn each_route_to_deleting_a_document_stands_on_its_own() -> TestResult {
    let ann = UserId::from("ann");
    let organization = Organization::new("o1", "ACME").with_permissions(members([&ann]));
    let project = Project::new("p1", "ROADMAP").with_permissions(members([&ann]));
    let workspace = Workspace::organization(&organization).with_project(&project);
    let tasks = |roles: &[RoleType]| {
        Collection::new("c1", "Tasks")
            .with_purpose(Purpose::tasks("assignee"))
            .with_permissions(Permissions::default().with_user(&ann, roles.iter().copied()))
    };
    let plain = Document::new("d1", "c1");
    let created = Document::new("d1", "c1").created_by("ann");
    let assigned = Document::new("d1", "c1").with_value("assignee", "ann@example.com");

    let cases = [
        (tasks(&[RoleType::Delete]), &plain, true),
        (tasks(&[RoleType::Write]), &plain, false),
        (tasks(&[RoleType::Read]), &plain, false),
        (tasks(&[RoleType::Contribute]), &created, true),
        (tasks(&[RoleType::Read]), &created, false),
        (tasks(&[RoleType::Read]), &assigned, true),
        (tasks(&[]), &assigned, false),
    ];

    for (collection, document, expected) in cases {
        let mut gate = PermissionGate::new(users(&["ann"]));
        assert_eq!(
            gate.can_delete_document(workspace, &collection, document, &ann)
                .await?,
            expected,
            "roles {:?} on {:?}",
            collection.permissions.users.get(&ann),
            document
        );
    }
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn refusals_name_what_was_refused() -> TestResult {
    let (writer, reader) = (UserId::from("writer"), UserId::from("reader"));
    let organization =
        Organization::new("o1", "ACME").with_permissions(members([&writer, &reader]));
    let workspace = Workspace::organization(&organization);
    let c1 = Collection::new("c1", "Tasks").with_permissions(
        Permissions::default()
            .with_user(&writer, [RoleType::Contribute, RoleType::Write])
            .with_user(&reader, [RoleType::Read]),
    );
    let d1 = Document::new("d1", "c1").created_by("writer");
    let mut gate = PermissionGate::new(users(&["writer", "reader"]));

    assert_eq!(
        gate.check_can_create_documents(workspace, &c1, &reader)
            .await,
        Err(GatehousePermissionsError::ResourcePermissionDenied {
            resource_type: ResourceType::Collection,
            resource_id: "c1".into(),
        })
    );
    assert_eq!(
        gate.check_can_edit_document(workspace, &c1, &d1, &reader)
            .await,
        Err(GatehousePermissionsError::DocumentPermissionDenied {
            document_id: "d1".into()
        })
    );

    gate.check_can_create_documents(workspace, &c1, &writer)
        .await?;
    gate.check_can_edit_document(workspace, &c1, &d1, &writer)
        .await?;
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn a_view_lends_nothing_on_collections_its_query_ignores() -> TestResult {
    let (author, viewer) = (UserId::from("author"), UserId::from("viewer"));
    let organization =
        Organization::new("o1", "ACME").with_permissions(members([&author, &viewer]));
    let workspace = Workspace::organization(&organization);
    let directory = users(&["author", "viewer"]).with_view(
        View::new("v1", "Board")
            .authored_by("author")
            .with_query(Query::new([QueryStem::new("c1")]))
            .with_permissions(Permissions::default().with_user(&viewer, [RoleType::Manage])),
    );
    let unrelated = Collection::new("c9", "Archive")
        .with_permissions(Permissions::default().with_user(&author, RoleType::ALL));
    let mut gate = PermissionGate::new(directory);
    gate.set_view_id("v1");

    assert!(
        gate.roles_in_collection_via_view(workspace, &unrelated, &viewer)
            .await?
            .is_empty()
    );
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn grant_changes_show_after_invalidation() -> TestResult {
    let user = UserId::from("u1");
    let organization = Organization::new("o1", "ACME").with_permissions(members([&user]));
    let workspace = Workspace::organization(&organization);
    let mut collection = Collection::new("c1", "Tasks");
    let other = Collection::new("c2", "Notes")
        .with_permissions(Permissions::default().with_user(&user, [RoleType::Write]));
    let mut gate = PermissionGate::new(users(&["u1"]));

    assert!(!gate.has_role(workspace, &collection, RoleType::Write, &user).await?);
    assert!(gate.has_role(workspace, &other, RoleType::Write, &user).await?);

    collection.permissions.grant_user(&user, [RoleType::Write]);
    assert!(!gate.has_role(workspace, &collection, RoleType::Write, &user).await?);

    gate.invalidate_cache(&collection);
    assert!(gate.has_role(workspace, &collection, RoleType::Write, &user).await?);
    assert!(gate.has_role(workspace, &other, RoleType::Write, &user).await?);
    Ok(())
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
#[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
async fn sessions_can_share_a_directory_cache() -> TestResult {
    let user = UserId::from("u1");
    let organization = Organization::new("o1", "ACME").with_permissions(
        Permissions::default().with_group(&"staff".into(), [Role::transitive(RoleType::Read)]),
    );
    let workspace = Workspace::organization(&organization);
    let collection = Collection::new("c1", "Tasks");
    let backing = MemoryDirectory::default()
        .with_user(User::new("u1", "u1@example.com").in_group("o1", "staff"));
    let cache = DirectoryCache::new(backing.clone(), 16)?;

    let mut first = PermissionGate::new(cache.clone());
    assert!(first.has_role(workspace, &collection, RoleType::Read, &user).await?);

    backing.insert_user(User::new("u1", "u1@example.com"));

    let mut cached = PermissionGate::new(cache.clone());
    assert!(cached.has_role(workspace, &collection, RoleType::Read, &user).await?);

    cache.forget_user(&user).await;
    let mut refreshed = PermissionGate::new(cache);
    assert!(!refreshed.has_role(workspace, &collection, RoleType::Read, &user).await?);
    Ok(())
}
