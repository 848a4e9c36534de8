pub mod curso_repo;
pub mod solicitacao_repo;
pub mod user_repo;

pub use curso_repo::CursoRepository;
pub use solicitacao_repo::SolicitacaoRepository;
pub use user_repo::UserRepository;
