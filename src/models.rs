pub mod auth;
pub mod curso;
pub mod solicitacao;
