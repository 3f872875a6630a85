/// Database models for TaskGate
///
/// This module contains the entity types and their PostgreSQL CRUD operations.
/// Handlers never call these functions directly; they go through the
/// [`Store`](crate::store::Store) trait, whose Postgres implementation
/// delegates here.
///
/// # Models
///
/// - `user`: User accounts, credentials and global role
/// - `team`: Teams and their member sets
/// - `project`: Projects owned by a team
/// - `task`: Tasks owned by a project
/// - `comment`: Comments owned by a task
///
/// # Ownership
///
/// ```text
/// Team 1──N Project 1──N Task 1──N Comment
/// Team N──M User (team_members)
/// ```

pub mod comment;
pub mod project;
pub mod task;
pub mod team;
pub mod user;

/// Native identifier of every stored entity
pub type Id = uuid::Uuid;
