pub mod repo;
pub mod vacancy_service;
pub mod vacancy_writer;
