//! Infrastructure layer: storage implementations and wire DTOs.

pub mod dto;
pub mod repository;
