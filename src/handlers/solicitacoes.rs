// src/handlers/solicitacoes.rs

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::PerfilAutenticado,
        i18n::Locale,
        rbac::{RequerPerfil, SomenteAdmin, SomenteConsultor, SomenteCoordenador},
    },
    models::solicitacao::{
        CriarSolicitacaoPayload, DevolverSolicitacaoPayload, FinalizarSolicitacaoPayload,
        ReenviarSolicitacaoPayload, SolicitacaoDesconto, SolicitacaoDetalhada,
        StatusSolicitacao,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct FiltroSolicitacoes {
    pub status: Option<StatusSolicitacao>,
}

#[utoipa::path(
    post,
    path = "/api/solicitacoes",
    tag = "Solicitações",
    request_body = CriarSolicitacaoPayload,
    responses(
        (status = 201, description = "Solicitação criada", body = SolicitacaoDesconto),
        (status = 400, description = "Dados inválidos ou curso indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteConsultor>,
    PerfilAutenticado(sessao): PerfilAutenticado,
    Json(payload): Json<CriarSolicitacaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(AppError::ValidationError)
        .map_err(|e| e.to_api_error(&locale))?;

    let criada = app_state
        .solicitacao_service
        .criar(&sessao, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(criada)))
}

#[utoipa::path(
    get,
    path = "/api/solicitacoes",
    tag = "Solicitações",
    params(FiltroSolicitacoes),
    responses(
        (status = 200, description = "Solicitações visíveis ao papel da sessão", body = Vec<SolicitacaoDetalhada>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    locale: Locale,
    PerfilAutenticado(sessao): PerfilAutenticado,
    Query(filtro): Query<FiltroSolicitacoes>,
) -> Result<Json<Vec<SolicitacaoDetalhada>>, ApiError> {
    let solicitacoes = app_state
        .solicitacao_service
        .listar(&sessao, filtro.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(solicitacoes))
}

/// Fila de parecer do coordenador (cursos vinculados, no estágio de decisão).
pub async fn fila(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteCoordenador>,
    PerfilAutenticado(sessao): PerfilAutenticado,
) -> Result<Json<Vec<SolicitacaoDetalhada>>, ApiError> {
    let solicitacoes = app_state
        .solicitacao_service
        .fila_do_coordenador(&sessao)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(solicitacoes))
}

pub async fn detalhar(
    State(app_state): State<AppState>,
    locale: Locale,
    PerfilAutenticado(sessao): PerfilAutenticado,
    Path(id): Path<Uuid>,
) -> Result<Json<SolicitacaoDetalhada>, ApiError> {
    let detalhe = app_state
        .solicitacao_service
        .detalhar(&sessao, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(detalhe))
}

pub async fn reenviar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteConsultor>,
    PerfilAutenticado(sessao): PerfilAutenticado,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReenviarSolicitacaoPayload>,
) -> Result<Json<SolicitacaoDesconto>, ApiError> {
    let reenviada = app_state
        .solicitacao_service
        .reenviar(&sessao, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(reenviada))
}

#[utoipa::path(
    post,
    path = "/api/solicitacoes/{id}/comprovante",
    tag = "Solicitações",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Comprovante anexado", body = SolicitacaoDesconto),
        (status = 422, description = "Solicitação fora do estágio de anexo")
    ),
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    security(("api_jwt" = []))
)]
pub async fn anexar_comprovante(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SolicitacaoDesconto>, ApiError> {
    let mut arquivo: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::StorageError(e.to_string()).to_api_error(&locale))?
    {
        if field.name() == Some("arquivo") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::StorageError(e.to_string()).to_api_error(&locale))?;
            arquivo = Some(bytes.to_vec());
        }
    }

    let arquivo = arquivo
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::ComprovanteObrigatorio.to_api_error(&locale))?;

    let atualizada = app_state
        .solicitacao_service
        .anexar_comprovante(id, arquivo)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(atualizada))
}

/// URL assinada de leitura do comprovante (validade curta, gerada sob demanda).
pub async fn url_comprovante(
    State(app_state): State<AppState>,
    locale: Locale,
    PerfilAutenticado(sessao): PerfilAutenticado,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let url = app_state
        .solicitacao_service
        .url_comprovante(&sessao, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(json!({ "url": url })))
}

#[utoipa::path(
    post,
    path = "/api/solicitacoes/{id}/parecer",
    tag = "Solicitações",
    request_body = FinalizarSolicitacaoPayload,
    responses(
        (status = 200, description = "Parecer registrado", body = SolicitacaoDesconto),
        (status = 403, description = "Coordenador sem vínculo com o curso"),
        (status = 422, description = "Transição não permitida ou comprovante ausente")
    ),
    params(("id" = Uuid, Path, description = "ID da solicitação")),
    security(("api_jwt" = []))
)]
pub async fn registrar_parecer(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteCoordenador>,
    PerfilAutenticado(sessao): PerfilAutenticado,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinalizarSolicitacaoPayload>,
) -> Result<Json<SolicitacaoDesconto>, ApiError> {
    payload
        .validate()
        .map_err(AppError::ValidationError)
        .map_err(|e| e.to_api_error(&locale))?;

    let finalizada = app_state
        .solicitacao_service
        .finalizar(&sessao, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(finalizada))
}

/// Devolve a solicitação para um consultor corrigir e reenviar.
pub async fn devolver(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DevolverSolicitacaoPayload>,
) -> Result<Json<SolicitacaoDesconto>, ApiError> {
    let devolvida = app_state
        .solicitacao_service
        .devolver(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(devolvida))
}

pub async fn excluir(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .solicitacao_service
        .excluir(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
