// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::estabelecer_sessao,
        handlers::auth::get_me,

        // --- Solicitações ---
        handlers::solicitacoes::criar,
        handlers::solicitacoes::listar,
        handlers::solicitacoes::anexar_comprovante,
        handlers::solicitacoes::registrar_parecer,

        // --- Cursos ---
        handlers::cursos::listar,
        handlers::cursos::criar,
        handlers::cursos::vincular_coordenador,

        // --- Usuários ---
        handlers::usuarios::listar,

        // --- Relatórios ---
        handlers::relatorios::exportar_solicitacoes,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Perfil,
            models::auth::UserProfile,
            models::auth::AtualizarUsuarioPayload,

            // --- Cursos ---
            models::curso::Curso,
            models::curso::CursoCoordenador,
            models::curso::SalvarCursoPayload,
            models::curso::VincularCoordenadorPayload,

            // --- Solicitações ---
            models::solicitacao::StatusSolicitacao,
            models::solicitacao::TipoIngresso,
            models::solicitacao::SolicitacaoDesconto,
            models::solicitacao::SolicitacaoDetalhada,
            models::solicitacao::CriarSolicitacaoPayload,
            models::solicitacao::FinalizarSolicitacaoPayload,
            models::solicitacao::DevolverSolicitacaoPayload,
            models::solicitacao::ReenviarSolicitacaoPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Sessão e provisionamento de perfis"),
        (name = "Solicitações", description = "Ciclo de vida das solicitações de desconto"),
        (name = "Cursos", description = "Catálogo de cursos e vínculo de coordenadores"),
        (name = "Usuários", description = "Gestão de perfis (papel e situação)"),
        (name = "Relatórios", description = "Exportação em PDF e CSV")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
