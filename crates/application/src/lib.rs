//! Application services and ports.

#![forbid(unsafe_code)]

mod collaborator_ports;
mod collaborator_service;

pub use collaborator_ports::{CollaboratorCache, CollaboratorRepository};
pub use collaborator_service::{CollaboratorService, DEFAULT_CACHE_TTL_SECONDS};
