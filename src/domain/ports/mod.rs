pub mod role_repository;
pub mod time_service;
