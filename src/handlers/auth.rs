// src/handlers/auth.rs
//
// A autenticação em si (senha, 2FA, redefinição) acontece no provedor de
// identidade externo. Aqui só reconciliamos o token com o perfil local.

use axum::{Json, extract::State};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::{PerfilAutenticado, PrincipalExterno},
        i18n::Locale,
    },
    models::auth::UserProfile,
};

/// Estabelece a sessão local: provisiona o perfil na primeira entrada da
/// identidade e aplica fail-closed para perfis inativos.
#[utoipa::path(
    post,
    path = "/api/auth/sessao",
    tag = "Auth",
    responses(
        (status = 200, description = "Perfil da sessão", body = UserProfile),
        (status = 401, description = "Token inválido"),
        (status = 403, description = "Perfil inativo ou não provisionado")
    ),
    security(("api_jwt" = []))
)]
pub async fn estabelecer_sessao(
    State(app_state): State<AppState>,
    locale: Locale,
    PrincipalExterno(claims): PrincipalExterno,
) -> Result<Json<UserProfile>, ApiError> {
    let perfil = app_state
        .provisioning_service
        .estabelecer_sessao(&claims)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(perfil))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Perfil da sessão atual", body = UserProfile)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(PerfilAutenticado(perfil): PerfilAutenticado) -> Json<UserProfile> {
    Json(perfil)
}
