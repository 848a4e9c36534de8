// src/handlers/cursos.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::PerfilAutenticado,
        i18n::Locale,
        rbac::{RequerPerfil, SomenteAdmin},
    },
    models::{
        auth::Perfil,
        curso::{Curso, CursoCoordenador, SalvarCursoPayload, VincularCoordenadorPayload},
        solicitacao::TipoIngresso,
    },
    services::finance,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct FiltroCursos {
    /// Inclui cursos inativos na listagem (somente admin).
    #[serde(default)]
    pub todos: bool,
}

#[utoipa::path(
    get,
    path = "/api/cursos",
    tag = "Cursos",
    params(FiltroCursos),
    responses(
        (status = 200, description = "Catálogo de cursos", body = Vec<Curso>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    locale: Locale,
    PerfilAutenticado(sessao): PerfilAutenticado,
    Query(filtro): Query<FiltroCursos>,
) -> Result<Json<Vec<Curso>>, ApiError> {
    // Cursos inativos só aparecem na tela de gestão do admin.
    let somente_ativos = !(filtro.todos && sessao.perfil == Perfil::Admin);

    let cursos = app_state
        .curso_repo
        .listar(somente_ativos)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cursos))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FiltroSugestao {
    pub tipo_ingresso: Option<TipoIngresso>,
}

/// Valores de pré-preenchimento do formulário de solicitação: a mensalidade
/// padrão do curso e o desconto sugerido para o tipo de ingresso.
pub async fn sugestao_de_desconto(
    State(app_state): State<AppState>,
    locale: Locale,
    PerfilAutenticado(_sessao): PerfilAutenticado,
    Path(id): Path<Uuid>,
    Query(filtro): Query<FiltroSugestao>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let curso = app_state
        .curso_repo
        .find_by_id(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?
        .filter(|c| c.ativo)
        .ok_or_else(|| AppError::CursoIndisponivel.to_api_error(&locale))?;

    let sugerido = finance::desconto_padrao(&curso, filtro.tipo_ingresso);

    Ok(Json(serde_json::json!({
        "mensalidadePadrao": curso.mensalidade_padrao,
        "descontoSugeridoPercent": sugerido,
    })))
}

#[utoipa::path(
    post,
    path = "/api/cursos",
    tag = "Cursos",
    request_body = SalvarCursoPayload,
    responses(
        (status = 201, description = "Curso criado", body = Curso),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Json(payload): Json<SalvarCursoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(AppError::ValidationError)
        .map_err(|e| e.to_api_error(&locale))?;

    let curso = app_state
        .curso_repo
        .criar(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(curso)))
}

pub async fn atualizar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SalvarCursoPayload>,
) -> Result<Json<Curso>, ApiError> {
    payload
        .validate()
        .map_err(AppError::ValidationError)
        .map_err(|e| e.to_api_error(&locale))?;

    let curso = app_state
        .curso_repo
        .atualizar(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(curso))
}

/// Exclui o curso. Solicitações já criadas sobrevivem com curso_id nulo.
pub async fn excluir(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .curso_repo
        .excluir(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/cursos/{id}/coordenador",
    tag = "Cursos",
    request_body = VincularCoordenadorPayload,
    responses(
        (status = 200, description = "Coordenador vinculado (substitui vínculo anterior)", body = CursoCoordenador),
        (status = 404, description = "Curso ou coordenador não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do curso")),
    security(("api_jwt" = []))
)]
pub async fn vincular_coordenador(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VincularCoordenadorPayload>,
) -> Result<Json<CursoCoordenador>, ApiError> {
    let resultado = async {
        app_state
            .curso_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Curso"))?;

        // O vínculo só aceita perfis COORDENADOR ativos.
        app_state
            .user_repo
            .find_by_id(payload.coordenador_id)
            .await?
            .filter(|u| u.perfil == Perfil::Coordenador && u.ativo)
            .ok_or(AppError::NaoEncontrado("Coordenador"))?;

        app_state
            .curso_repo
            .vincular_coordenador(id, payload.coordenador_id)
            .await
    }
    .await
    .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(resultado))
}

pub async fn remover_coordenador(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .curso_repo
        .remover_vinculo(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn coordenador_do_curso(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<CursoCoordenador>>, ApiError> {
    let vinculo = app_state
        .curso_repo
        .vinculo_do_curso(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(vinculo))
}
