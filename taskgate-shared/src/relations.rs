/// Relation resolution
///
/// Entities reference each other by id. Responses embed the referenced
/// entities ("population"), e.g. a task carries its assignee and its project
/// with the project's team. Every relation is a variant of [`Relation`],
/// reachable through a static table keyed by entity kind and relation name.
///
/// # Relations
///
/// | Kind | Name | Target |
/// |------|------|--------|
/// | user | `teams` | teams listing the user as member |
/// | team | `members` | member users, in join order |
/// | team | `projects` | projects owned by the team |
/// | team | `createdBy` | creating user |
/// | project | `team` | owning team |
/// | project | `tasks` | tasks of the project, newest first |
/// | task | `project` | owning project |
/// | task | `assignee` | assigned user, or `null` |
/// | task | `comments` | comments of the task, oldest first |
/// | comment | `author` | writing user |
/// | comment | `task` | owning task |
///
/// # Example
///
/// ```no_run
/// use taskgate_shared::relations::{populate, Node, TASK_POPULATE};
/// use taskgate_shared::models::task::Task;
/// use taskgate_shared::store::Store;
///
/// # async fn example(store: &dyn Store, task: Task) -> Result<(), Box<dyn std::error::Error>> {
/// let body = populate(store, Node::Task(task), TASK_POPULATE).await?;
/// println!("{}", body["project"]["team"]["name"]);
/// # Ok(())
/// # }
/// ```

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::models::{
    comment::Comment,
    project::Project,
    task::{Task, TaskFilter},
    team::Team,
    user::User,
};
use crate::store::{Store, StoreResult};

/// Population applied to task responses
pub const TASK_POPULATE: &[&str] = &["assignee", "project.team"];

/// Population applied to single-task reads
pub const TASK_DETAIL_POPULATE: &[&str] = &["assignee", "project.team", "comments.author"];

/// Population applied to comment responses
pub const COMMENT_POPULATE: &[&str] = &["author", "task"];

/// Population applied to team responses
pub const TEAM_POPULATE: &[&str] = &["members"];

/// Entity kinds that participate in relations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Team,
    Project,
    Task,
    Comment,
}

/// A loaded entity
#[derive(Debug, Clone)]
pub enum Node {
    User(User),
    Team(Team),
    Project(Project),
    Task(Task),
    Comment(Comment),
}

impl Node {
    pub fn kind(&self) -> EntityKind {
        match self {
            Node::User(_) => EntityKind::User,
            Node::Team(_) => EntityKind::Team,
            Node::Project(_) => EntityKind::Project,
            Node::Task(_) => EntityKind::Task,
            Node::Comment(_) => EntityKind::Comment,
        }
    }

    /// Serializes the entity without any population
    pub fn to_value(&self) -> Value {
        let value = match self {
            Node::User(u) => serde_json::to_value(u),
            Node::Team(t) => serde_json::to_value(t),
            Node::Project(p) => serde_json::to_value(p),
            Node::Task(t) => serde_json::to_value(t),
            Node::Comment(c) => serde_json::to_value(c),
        };
        value.unwrap_or_default()
    }
}

/// Every known relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    UserTeams,
    TeamMembers,
    TeamProjects,
    TeamCreatedBy,
    ProjectTeam,
    ProjectTasks,
    TaskProject,
    TaskAssignee,
    TaskComments,
    CommentAuthor,
    CommentTask,
}

const RELATIONS: &[(EntityKind, &str, Relation)] = &[
    (EntityKind::User, "teams", Relation::UserTeams),
    (EntityKind::Team, "members", Relation::TeamMembers),
    (EntityKind::Team, "projects", Relation::TeamProjects),
    (EntityKind::Team, "createdBy", Relation::TeamCreatedBy),
    (EntityKind::Project, "team", Relation::ProjectTeam),
    (EntityKind::Project, "tasks", Relation::ProjectTasks),
    (EntityKind::Task, "project", Relation::TaskProject),
    (EntityKind::Task, "assignee", Relation::TaskAssignee),
    (EntityKind::Task, "comments", Relation::TaskComments),
    (EntityKind::Comment, "author", Relation::CommentAuthor),
    (EntityKind::Comment, "task", Relation::CommentTask),
];

/// Result of resolving one relation
#[derive(Debug, Clone)]
pub enum Resolved {
    One(Option<Node>),
    Many(Vec<Node>),
}

impl Relation {
    /// Looks up a relation by entity kind and name
    pub fn lookup(kind: EntityKind, name: &str) -> Option<Relation> {
        RELATIONS
            .iter()
            .find(|(k, n, _)| *k == kind && *n == name)
            .map(|(_, _, relation)| *relation)
    }

    /// Name under which the relation is embedded
    pub fn name(&self) -> &'static str {
        RELATIONS
            .iter()
            .find(|(_, _, r)| r == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("")
    }

    /// Loads the related entities of `node`
    ///
    /// A relation applied to the wrong kind of node resolves to nothing.
    pub async fn resolve(&self, store: &dyn Store, node: &Node) -> StoreResult<Resolved> {
        let resolved = match (self, node) {
            (Relation::UserTeams, Node::User(user)) => {
                Resolved::Many(store.list_teams_by_member(user.id).await?.into_iter().map(Node::Team).collect())
            }
            (Relation::TeamMembers, Node::Team(team)) => {
                let mut users = store.list_users_by_ids(&team.members).await?;
                users.sort_by_key(|u| team.members.iter().position(|m| *m == u.id));
                Resolved::Many(users.into_iter().map(Node::User).collect())
            }
            (Relation::TeamProjects, Node::Team(team)) => Resolved::Many(
                store
                    .list_projects_by_team(team.id)
                    .await?
                    .into_iter()
                    .map(Node::Project)
                    .collect(),
            ),
            (Relation::TeamCreatedBy, Node::Team(team)) => {
                Resolved::One(store.find_user(team.created_by).await?.map(Node::User))
            }
            (Relation::ProjectTeam, Node::Project(project)) => {
                Resolved::One(store.find_team(project.team).await?.map(Node::Team))
            }
            (Relation::ProjectTasks, Node::Project(project)) => {
                let filter = TaskFilter {
                    project: Some(project.id),
                    ..Default::default()
                };
                let count = store.count_tasks(filter).await?;
                Resolved::Many(
                    store
                        .list_tasks(filter, 0, count)
                        .await?
                        .into_iter()
                        .map(Node::Task)
                        .collect(),
                )
            }
            (Relation::TaskProject, Node::Task(task)) => {
                Resolved::One(store.find_project(task.project).await?.map(Node::Project))
            }
            (Relation::TaskAssignee, Node::Task(task)) => match task.assignee {
                Some(id) => Resolved::One(store.find_user(id).await?.map(Node::User)),
                None => Resolved::One(None),
            },
            (Relation::TaskComments, Node::Task(task)) => Resolved::Many(
                store
                    .list_comments_by_task(task.id)
                    .await?
                    .into_iter()
                    .map(Node::Comment)
                    .collect(),
            ),
            (Relation::CommentAuthor, Node::Comment(comment)) => {
                Resolved::One(store.find_user(comment.author).await?.map(Node::User))
            }
            (Relation::CommentTask, Node::Comment(comment)) => {
                Resolved::One(store.find_task(comment.task).await?.map(Node::Task))
            }
            _ => Resolved::One(None),
        };

        Ok(resolved)
    }
}

/// Serializes `node` with the given dotted relation paths embedded
///
/// `"project.team"` embeds the project and, inside it, the project's team.
/// Unknown relation names are ignored with a debug log.
pub async fn populate(store: &dyn Store, node: Node, paths: &[&str]) -> StoreResult<Value> {
    let paths: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
    populate_node(store, node, paths).await
}

/// Populates each node of a listing
pub async fn populate_all<T: Send>(
    store: &dyn Store,
    items: Vec<T>,
    wrap: fn(T) -> Node,
    paths: &[&str],
) -> StoreResult<Vec<Value>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(populate(store, wrap(item), paths).await?);
    }
    Ok(out)
}

type BoxedValue<'a> = Pin<Box<dyn Future<Output = StoreResult<Value>> + Send + 'a>>;

fn populate_node<'a>(store: &'a dyn Store, node: Node, paths: Vec<String>) -> BoxedValue<'a> {
    Box::pin(async move {
        let mut value = node.to_value();

        // Group nested paths by their first segment, keeping first-seen order
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for path in paths {
            let (head, rest) = match path.split_once('.') {
                Some((head, rest)) => (head.to_string(), Some(rest.to_string())),
                None => (path, None),
            };
            let index = match groups.iter().position(|(h, _)| *h == head) {
                Some(i) => i,
                None => {
                    groups.push((head, Vec::new()));
                    groups.len() - 1
                }
            };
            if let Some(rest) = rest {
                groups[index].1.push(rest);
            }
        }

        for (head, nested) in groups {
            let Some(relation) = Relation::lookup(node.kind(), &head) else {
                tracing::debug!(kind = ?node.kind(), relation = %head, "Unknown relation");
                continue;
            };

            let embedded = match relation.resolve(store, &node).await? {
                Resolved::One(Some(child)) => populate_node(store, child, nested.clone()).await?,
                Resolved::One(None) => Value::Null,
                Resolved::Many(children) => {
                    let mut items = Vec::with_capacity(children.len());
                    for child in children {
                        items.push(populate_node(store, child, nested.clone()).await?);
                    }
                    Value::Array(items)
                }
            };

            if let Value::Object(map) = &mut value {
                map.insert(head, embedded);
            }
        }

        Ok(value)
    })
}
