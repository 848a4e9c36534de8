// src/handlers/relatorios.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::PerfilAutenticado, i18n::Locale},
    models::solicitacao::StatusSolicitacao,
    services::relatorio,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatoRelatorio {
    Pdf,
    Csv,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParametrosRelatorio {
    #[serde(default = "formato_padrao")]
    #[param(value_type = String, example = "pdf")]
    pub formato: FormatoRelatorio,
    pub titulo: Option<String>,
    pub status: Option<StatusSolicitacao>,
}

fn formato_padrao() -> FormatoRelatorio {
    FormatoRelatorio::Pdf
}

/// Exporta as solicitações visíveis ao papel da sessão. O mesmo conjunto de
/// linhas alimenta o PDF e o CSV.
#[utoipa::path(
    get,
    path = "/api/relatorios/solicitacoes",
    tag = "Relatórios",
    params(ParametrosRelatorio),
    responses(
        (status = 200, description = "Arquivo do relatório (PDF ou CSV)")
    ),
    security(("api_jwt" = []))
)]
pub async fn exportar_solicitacoes(
    State(app_state): State<AppState>,
    locale: Locale,
    PerfilAutenticado(sessao): PerfilAutenticado,
    Query(params): Query<ParametrosRelatorio>,
) -> Result<Response, ApiError> {
    let solicitacoes = app_state
        .solicitacao_service
        .listar(&sessao, params.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let linhas = relatorio::montar_linhas(&solicitacoes);

    let titulo = params
        .titulo
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Relatório de Solicitações".to_string());
    let hoje = chrono::Utc::now().date_naive();

    let (bytes, content_type, nome) = match params.formato {
        FormatoRelatorio::Pdf => (
            relatorio::gerar_pdf(&titulo, &linhas).map_err(|e| e.to_api_error(&locale))?,
            "application/pdf",
            relatorio::nome_arquivo(&titulo, "pdf", hoje),
        ),
        FormatoRelatorio::Csv => (
            relatorio::gerar_csv(&linhas).map_err(|e| e.to_api_error(&locale))?,
            "text/csv",
            relatorio::nome_arquivo(&titulo, "csv", hoje),
        ),
    };

    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{nome}\""),
        ),
    ];

    Ok((headers, bytes).into_response())
}
