//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_collaborator_repository;
mod in_memory_collaborator_cache;
mod in_memory_collaborator_repository;

pub use http_collaborator_repository::HttpCollaboratorRepository;
pub use in_memory_collaborator_cache::InMemoryCollaboratorCache;
pub use in_memory_collaborator_repository::InMemoryCollaboratorRepository;
