// src/handlers/usuarios.rs
//
// Gestão de perfis locais. Criação não existe aqui: perfis nascem no
// provisionamento da primeira sessão da identidade externa.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequerPerfil, SomenteAdmin},
    },
    models::auth::{AtualizarUsuarioPayload, Perfil, UserProfile},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct FiltroUsuarios {
    /// Restringe a listagem a um papel (ex.: CONSULTOR, para a devolução).
    pub perfil: Option<Perfil>,
}

#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuários",
    params(FiltroUsuarios),
    responses(
        (status = 200, description = "Perfis cadastrados", body = Vec<UserProfile>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Query(filtro): Query<FiltroUsuarios>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let usuarios = match filtro.perfil {
        Some(perfil) => app_state.user_repo.listar_por_perfil(perfil).await,
        None => app_state.user_repo.listar().await,
    }
    .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(usuarios))
}

/// Atualização parcial de papel e/ou situação (ativo).
pub async fn atualizar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarUsuarioPayload>,
) -> Result<Json<UserProfile>, ApiError> {
    let atualizado = app_state
        .user_repo
        .atualizar(id, payload.perfil, payload.ativo)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(atualizado))
}

pub async fn excluir(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequerPerfil<SomenteAdmin>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .user_repo
        .excluir(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
