//! Domain Layer - Entities and repository traits

pub mod entities;
pub mod repository;
