// src/handlers.rs

pub mod auth;
pub mod cursos;
pub mod relatorios;
pub mod solicitacoes;
pub mod usuarios;
