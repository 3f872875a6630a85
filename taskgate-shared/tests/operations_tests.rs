/// Domain operation tests against the in-memory store
///
/// Run with: cargo test --test operations_tests

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use taskgate_shared::auth::jwt::{validate_token, TokenSettings};
use taskgate_shared::auth::password::HashParams;
use taskgate_shared::auth::permissions::{can_manage_team, has_project_access, has_task_access, is_team_member};
use taskgate_shared::error::DomainError;
use taskgate_shared::models::{
    project::Project,
    task::{Task, TaskPatch, TaskStatus},
    team::Team,
    user::{NewUser, Role, User},
    Id,
};
use taskgate_shared::ops::{self, Services};
use taskgate_shared::store::{memory::MemoryStore, Store};
use taskgate_shared::validation::{inputs::*, validate};

const SECRET: &str = "operations-test-secret-0123456789abcdef";

struct World {
    services: Services,
    admin: User,
    manager: User,
    member: User,
    outsider: User,
}

impl World {
    async fn new() -> Self {
        let services = Services::new(
            Arc::new(MemoryStore::new()),
            TokenSettings::new(SECRET, 1),
            HashParams::fast(),
        );

        let admin = seed_user(&services, "admin@example.com", Role::Admin).await;
        let manager = seed_user(&services, "manager@example.com", Role::Manager).await;
        let member = seed_user(&services, "member@example.com", Role::Member).await;
        let outsider = seed_user(&services, "outsider@example.com", Role::Member).await;

        Self {
            services,
            admin,
            manager,
            member,
            outsider,
        }
    }

    fn store(&self) -> &dyn Store {
        self.services.store()
    }

    /// Team created by the manager with the member in it, plus one project
    async fn team_with_project(&self, name: &str) -> (Team, Project) {
        let team = ops::teams::create_team(
            &self.services,
            Some(&self.manager),
            input(json!({ "name": name, "members": [self.member.id] })),
        )
        .await
        .unwrap();

        let project = ops::projects::create_project(
            &self.services,
            Some(&self.manager),
            input(json!({ "teamId": team.id, "name": format!("{name} project") })),
        )
        .await
        .unwrap();

        (team, project)
    }

    async fn task(&self, project: &Project, title: &str, assignee: Option<Id>) -> Task {
        let body = match assignee {
            Some(id) => json!({ "title": title, "assigneeId": id }),
            None => json!({ "title": title }),
        };

        ops::tasks::create_task(
            &self.services,
            Some(&self.manager),
            input(json!({ "projectId": project.id })),
            input(body),
        )
        .await
        .unwrap()
    }
}

async fn seed_user(services: &Services, email: &str, role: Role) -> User {
    services
        .store()
        .create_user(NewUser {
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role,
        })
        .await
        .unwrap()
}

fn input<T: taskgate_shared::validation::Shaped>(raw: serde_json::Value) -> T {
    validate(raw).unwrap()
}

fn id_input(id: Id) -> GenericIdInput {
    input(json!({ "id": id }))
}

// ---------------------------------------------------------------------------
// Registration and login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_register_issues_member_token() {
    let world = World::new().await;

    let payload = ops::auth::register(
        &world.services,
        input(json!({ "name": "Ada", "email": " Ada@Example.com ", "password": "secret1" })),
    )
    .await
    .unwrap();

    assert_eq!(payload.user.role, Role::Member);
    assert_eq!(payload.user.email, "ada@example.com");
    assert_ne!(payload.user.password_hash, "secret1");

    let claims = validate_token(&payload.token, SECRET).unwrap();
    assert_eq!(claims.sub, payload.user.id);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let world = World::new().await;
    let body = json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" });

    ops::auth::register(&world.services, input(body.clone())).await.unwrap();
    let err = ops::auth::register(&world.services, input(body)).await.unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(err.to_string(), "Email already in use");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let world = World::new().await;
    ops::auth::register(
        &world.services,
        input(json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" })),
    )
    .await
    .unwrap();

    let wrong_password = ops::auth::login(
        &world.services,
        input(json!({ "email": "ada@example.com", "password": "nope" })),
    )
    .await
    .unwrap_err();
    let unknown_email = ops::auth::login(
        &world.services,
        input(json!({ "email": "bob@example.com", "password": "secret1" })),
    )
    .await
    .unwrap_err();

    assert!(matches!(wrong_password, DomainError::Unauthenticated(_)));
    assert!(matches!(unknown_email, DomainError::Unauthenticated(_)));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());

    let ok = ops::auth::login(
        &world.services,
        input(json!({ "email": "ADA@example.com", "password": "secret1" })),
    )
    .await
    .unwrap();
    assert_eq!(ok.user.email, "ada@example.com");
}

#[tokio::test]
async fn test_unknown_email_costs_a_password_check() {
    let params = HashParams {
        memory_kib: 16 * 1024,
        iterations: 2,
        parallelism: 1,
    };
    let services = Services::new(Arc::new(MemoryStore::new()), TokenSettings::new(SECRET, 1), params);
    ops::auth::register(
        &services,
        input(json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" })),
    )
    .await
    .unwrap();

    let started = Instant::now();
    ops::auth::login(&services, input(json!({ "email": "ada@example.com", "password": "nope" })))
        .await
        .unwrap_err();
    let wrong_password = started.elapsed();

    let started = Instant::now();
    ops::auth::login(&services, input(json!({ "email": "bob@example.com", "password": "nope" })))
        .await
        .unwrap_err();
    let unknown_email = started.elapsed();

    assert!(
        unknown_email * 4 >= wrong_password,
        "unknown email took {unknown_email:?}, wrong password took {wrong_password:?}"
    );
}

#[tokio::test]
async fn test_me_returns_actor_or_none() {
    let world = World::new().await;

    assert!(ops::auth::me(None).is_none());
    assert_eq!(ops::auth::me(Some(&world.member)).unwrap().id, world.member.id);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_update_user_applies_present_fields_only() {
    let world = World::new().await;

    let updated = ops::users::update_user(
        &world.services,
        Some(&world.admin),
        input(json!({ "userId": world.member.id, "role": "MANAGER" })),
    )
    .await
    .unwrap();

    assert_eq!(updated.role, Role::Manager);
    assert_eq!(updated.name, world.member.name);

    let err = ops::users::update_user(
        &world.services,
        Some(&world.admin),
        input(json!({ "userId": Id::new_v4(), "name": "Ghost" })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let err = ops::users::list_users(&world.services, Some(&world.manager)).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_team_puts_creator_first_and_dedups() {
    let world = World::new().await;

    let team = ops::teams::create_team(
        &world.services,
        Some(&world.manager),
        input(json!({
            "name": "Core",
            "members": [world.member.id, world.member.id, world.manager.id]
        })),
    )
    .await
    .unwrap();

    assert_eq!(team.members, vec![world.manager.id, world.member.id]);
    assert_eq!(team.created_by, world.manager.id);

    let err = ops::teams::create_team(&world.services, Some(&world.admin), input(json!({ "name": "Core" })))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let err = ops::teams::create_team(
        &world.services,
        Some(&world.admin),
        input(json!({ "name": "Other", "members": [Id::new_v4()] })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "User not found");
}

#[tokio::test]
async fn test_team_membership_round_trip() {
    let world = World::new().await;
    let (team, _) = world.team_with_project("Core").await;
    let store = world.store();

    assert!(!is_team_member(store, world.outsider.id, team.id).await.unwrap());

    let body = || input::<TeamMemberInput>(json!({ "teamId": team.id, "userId": world.outsider.id }));

    ops::teams::add_user_to_team(&world.services, Some(&world.manager), body()).await.unwrap();
    assert!(is_team_member(store, world.outsider.id, team.id).await.unwrap());

    let again = ops::teams::add_user_to_team(&world.services, Some(&world.manager), body()).await.unwrap();
    assert_eq!(again.members.iter().filter(|id| **id == world.outsider.id).count(), 1);

    ops::teams::remove_user_from_team(&world.services, Some(&world.manager), body()).await.unwrap();
    assert!(!is_team_member(store, world.outsider.id, team.id).await.unwrap());

    let err = ops::teams::remove_user_from_team(&world.services, Some(&world.manager), body())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::BadRequest(_)));
}

#[tokio::test]
async fn test_only_creator_or_admin_manages_members() {
    let world = World::new().await;
    let (team, _) = world.team_with_project("Core").await;
    let other_manager = seed_user(&world.services, "other@example.com", Role::Manager).await;

    assert!(can_manage_team(world.store(), &world.manager, team.id).await.unwrap());
    assert!(can_manage_team(world.store(), &world.admin, team.id).await.unwrap());
    assert!(!can_manage_team(world.store(), &other_manager, team.id).await.unwrap());

    let err = ops::teams::add_user_to_team(
        &world.services,
        Some(&other_manager),
        input(json!({ "teamId": team.id, "userId": world.outsider.id })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    ops::teams::add_user_to_team(
        &world.services,
        Some(&world.admin),
        input(json!({ "teamId": team.id, "userId": world.outsider.id })),
    )
    .await
    .unwrap();

    let err = ops::teams::add_user_to_team(
        &world.services,
        Some(&world.admin),
        input(json!({ "teamId": team.id, "userId": Id::new_v4() })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "User not found");
}

#[tokio::test]
async fn test_team_listing_by_role() {
    let world = World::new().await;
    world.team_with_project("Core").await;
    ops::teams::create_team(&world.services, Some(&world.admin), input(json!({ "name": "Ops" })))
        .await
        .unwrap();

    let all = ops::teams::list_teams(&world.services, Some(&world.admin)).await.unwrap();
    assert_eq!(all.len(), 2);

    let mine = ops::teams::list_teams(&world.services, Some(&world.manager)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Core");

    let err = ops::teams::list_teams(&world.services, Some(&world.member)).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_project_access_follows_team_membership() {
    let world = World::new().await;
    let (team, project) = world.team_with_project("Core").await;
    let store = world.store();

    assert!(has_project_access(store, &world.member, project.id).await.unwrap());
    assert!(has_project_access(store, &world.admin, project.id).await.unwrap());
    assert!(!has_project_access(store, &world.outsider, project.id).await.unwrap());
    assert!(!has_project_access(store, &world.admin, Id::new_v4()).await.unwrap());

    let listed = ops::projects::list_projects(&world.services, Some(&world.member), input(json!({ "teamId": team.id })))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let err = ops::projects::list_projects(&world.services, Some(&world.outsider), input(json!({ "teamId": team.id })))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = ops::projects::list_projects(
        &world.services,
        Some(&world.member),
        input(json!({ "teamId": Id::new_v4() })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Team not found");
}

#[tokio::test]
async fn test_create_project_checks_access_before_name() {
    let world = World::new().await;
    let (team, project) = world.team_with_project("Core").await;
    let other_manager = seed_user(&world.services, "other@example.com", Role::Manager).await;

    let err = ops::projects::create_project(
        &world.services,
        Some(&other_manager),
        input(json!({ "teamId": team.id, "name": project.name })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = ops::projects::create_project(
        &world.services,
        Some(&world.manager),
        input(json!({ "teamId": team.id, "name": project.name })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_task_requires_team_member_assignee() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;

    let err = ops::tasks::create_task(
        &world.services,
        Some(&world.manager),
        input(json!({ "projectId": project.id })),
        input(json!({ "title": "Ship", "assigneeId": world.outsider.id })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::BadRequest(_)));
    assert_eq!(err.to_string(), "Assignee must be a team member");

    let task = world.task(&project, "Ship", Some(world.member.id)).await;
    assert_eq!(task.assignee, Some(world.member.id));
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.created_by, world.manager.id);
}

#[tokio::test]
async fn test_members_cannot_create_tasks() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;

    let err = ops::tasks::create_task(
        &world.services,
        Some(&world.member),
        input(json!({ "projectId": project.id })),
        input(json!({ "title": "Ship" })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn test_inaccessible_task_reads_as_not_found() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;
    let task = world.task(&project, "Secret", None).await;

    assert!(!has_task_access(world.store(), &world.outsider, task.id).await.unwrap());

    let err = ops::tasks::get_task(&world.services, Some(&world.outsider), id_input(task.id))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let err = ops::tasks::get_task(&world.services, Some(&world.member), id_input(Id::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let found = ops::tasks::get_task(&world.services, Some(&world.member), id_input(task.id))
        .await
        .unwrap();
    assert_eq!(found.id, task.id);
}

#[tokio::test]
async fn test_task_listing_row_filter() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;

    world.task(&project, "one", Some(world.member.id)).await;
    world.task(&project, "two", None).await;
    world.task(&project, "three", Some(world.manager.id)).await;
    world.task(&project, "four", Some(world.member.id)).await;

    let query = || input::<TaskListQuery>(json!({ "projectId": project.id }));

    let admin_page = ops::tasks::list_tasks(&world.services, Some(&world.admin), query()).await.unwrap();
    assert_eq!(admin_page.total_items, 4);
    assert_eq!(admin_page.items[0].title, "four");

    let member_page = ops::tasks::list_tasks(&world.services, Some(&world.member), query()).await.unwrap();
    assert_eq!(member_page.total_items, 2);
    assert!(member_page.items.iter().all(|t| t.assignee == Some(world.member.id)));
    assert_eq!(
        member_page.items.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
        vec!["four", "one"]
    );

    let err = ops::tasks::list_tasks(&world.services, Some(&world.outsider), query())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn test_task_listing_pages_and_status() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;

    for i in 0..5 {
        world.task(&project, &format!("task {i}"), None).await;
    }
    let done = world.task(&project, "finished", None).await;
    ops::tasks::update_task(
        &world.services,
        Some(&world.manager),
        id_input(done.id),
        input(json!({ "status": "DONE" })),
    )
    .await
    .unwrap();

    let page = ops::tasks::list_tasks(
        &world.services,
        Some(&world.admin),
        input(json!({ "projectId": project.id, "page": 2, "limit": 4 })),
    )
    .await
    .unwrap();
    assert_eq!(page.total_items, 6);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page, 2);

    let page = ops::tasks::list_tasks(
        &world.services,
        Some(&world.admin),
        input(json!({ "projectId": project.id, "status": "DONE" })),
    )
    .await
    .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].id, done.id);
}

#[test]
fn test_limit_above_maximum_is_rejected() {
    let err = validate::<TaskListQuery>(json!({ "projectId": Id::new_v4(), "limit": 201 })).unwrap_err();
    match err {
        DomainError::ValidationFailed(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].field, "limit");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_task_partial_and_clearing() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;
    let task = ops::tasks::create_task(
        &world.services,
        Some(&world.manager),
        input(json!({ "projectId": project.id })),
        input(json!({
            "title": "Ship",
            "description": "soon",
            "assigneeId": world.member.id,
            "dueDate": "2025-01-31T10:00:00Z"
        })),
    )
    .await
    .unwrap();

    let updated = ops::tasks::update_task(
        &world.services,
        Some(&world.manager),
        id_input(task.id),
        input(json!({ "description": null, "status": "IN_PROGRESS" })),
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "Ship");
    assert_eq!(updated.description, None);
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.assignee, Some(world.member.id));
    assert!(updated.due_date.is_some());

    let err = ops::tasks::update_task(
        &world.services,
        Some(&world.manager),
        id_input(task.id),
        input(json!({ "assigneeId": world.outsider.id })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::BadRequest(_)));

    let cleared = ops::tasks::update_task(
        &world.services,
        Some(&world.manager),
        id_input(task.id),
        input(json!({ "assigneeId": null, "dueDate": null })),
    )
    .await
    .unwrap();
    assert_eq!(cleared.assignee, None);
    assert_eq!(cleared.due_date, None);
}

#[tokio::test]
async fn test_task_mutations_report_missing_before_forbidden() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;
    let task = world.task(&project, "Ship", None).await;
    let other_manager = seed_user(&world.services, "other@example.com", Role::Manager).await;

    let err = ops::tasks::assign_task(
        &world.services,
        Some(&other_manager),
        input(json!({ "taskId": Id::new_v4(), "userId": world.member.id })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let err = ops::tasks::assign_task(
        &world.services,
        Some(&other_manager),
        input(json!({ "taskId": task.id, "userId": world.member.id })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let assigned = ops::tasks::assign_task(
        &world.services,
        Some(&world.manager),
        input(json!({ "taskId": task.id, "userId": world.member.id })),
    )
    .await
    .unwrap();
    assert_eq!(assigned.assignee, Some(world.member.id));
}

#[tokio::test]
async fn test_delete_task_removes_comments() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;
    let task = world.task(&project, "Ship", Some(world.member.id)).await;

    for text in ["first", "second"] {
        ops::comments::add_comment(
            &world.services,
            Some(&world.member),
            input(json!({ "taskId": task.id, "text": text })),
        )
        .await
        .unwrap();
    }
    assert_eq!(world.store().count_comments_by_task(task.id).await.unwrap(), 2);

    let deleted = ops::tasks::delete_task(&world.services, Some(&world.manager), id_input(task.id))
        .await
        .unwrap();

    assert!(deleted);
    assert!(world.store().find_task(task.id).await.unwrap().is_none());
    assert_eq!(world.store().count_comments_by_task(task.id).await.unwrap(), 0);

    let err = ops::tasks::delete_task(&world.services, Some(&world.manager), id_input(task.id))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_my_tasks_spans_projects() {
    let world = World::new().await;
    let (_, core) = world.team_with_project("Core").await;
    let (_, ops_project) = world.team_with_project("Ops").await;

    world.task(&core, "a", Some(world.member.id)).await;
    world.task(&ops_project, "b", Some(world.member.id)).await;
    world.task(&ops_project, "c", None).await;

    let mine = ops::tasks::my_tasks(&world.services, Some(&world.member)).await.unwrap();
    assert_eq!(mine.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), vec!["b", "a"]);

    let err = ops::tasks::my_tasks(&world.services, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated(_)));
}

#[tokio::test]
async fn test_removed_member_is_unassigned_and_loses_my_tasks() {
    let world = World::new().await;
    let (team, project) = world.team_with_project("Core").await;
    let task = world.task(&project, "secret", Some(world.member.id)).await;

    ops::teams::remove_user_from_team(
        &world.services,
        Some(&world.manager),
        input(json!({ "teamId": team.id, "userId": world.member.id })),
    )
    .await
    .unwrap();

    let stored = world.store().find_task(task.id).await.unwrap().unwrap();
    assert_eq!(stored.assignee, None);

    let err = ops::tasks::get_task(&world.services, Some(&world.member), id_input(task.id))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let mine = ops::tasks::my_tasks(&world.services, Some(&world.member)).await.unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn test_my_tasks_hides_tasks_outside_actor_teams() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;
    let task = world.task(&project, "secret", None).await;

    // Assignment written below the operations layer, bypassing the member check
    world
        .store()
        .update_task(
            task.id,
            TaskPatch {
                assignee: Some(Some(world.outsider.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mine = ops::tasks::my_tasks(&world.services, Some(&world.outsider)).await.unwrap();
    assert!(mine.is_empty());

    let err = ops::tasks::get_task(&world.services, Some(&world.outsider), id_input(task.id))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_add_comment_access() {
    let world = World::new().await;
    let (_, project) = world.team_with_project("Core").await;
    let task = world.task(&project, "Ship", None).await;

    let comment = ops::comments::add_comment(
        &world.services,
        Some(&world.member),
        input(json!({ "taskId": task.id, "text": "  on it  " })),
    )
    .await
    .unwrap();
    assert_eq!(comment.text, "on it");
    assert_eq!(comment.author, world.member.id);

    let err = ops::comments::add_comment(
        &world.services,
        Some(&world.outsider),
        input(json!({ "taskId": task.id, "text": "hi" })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = ops::comments::add_comment(
        &world.services,
        Some(&world.member),
        input(json!({ "taskId": Id::new_v4(), "text": "hi" })),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}
