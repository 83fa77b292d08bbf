//! Infrastructure Layer - Repository implementations

pub mod static_repository;
