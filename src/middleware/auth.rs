// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{ClaimsExternas, UserProfile},
};

/// Valida o token Bearer emitido pelo provedor de identidade externo e
/// devolve os claims do principal. A autenticação em si (senha, 2FA,
/// redefinição por código) acontece no provedor, fora desta aplicação.
pub fn validar_token_externo(token: &str, jwt_secret: &str) -> Result<ClaimsExternas, AppError> {
    let token_data = decode::<ClaimsExternas>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data.claims)
}

fn extrair_bearer(parts_headers: &axum::http::HeaderMap) -> Result<&str, AppError> {
    parts_headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidToken)
}

/// Middleware de sessão: valida o token e resolve o perfil local já
/// provisionado. Identidade válida sem perfil é estado terminal (403),
/// nunca um perfil fabricado em silêncio.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extrair_bearer(request.headers())?;
    let claims = validar_token_externo(token, &app_state.jwt_secret)?;

    let perfil = app_state
        .user_repo
        .find_by_identidade(&claims.sub)
        .await?
        .filter(|p| p.ativo)
        .ok_or(AppError::PerfilNaoEncontrado)?;

    request.extensions_mut().insert(perfil);
    Ok(next.run(request).await)
}

/// Extrator do perfil autenticado, para uso direto nos handlers.
/// É o contexto de sessão explícito passado a repositórios e serviços.
#[derive(Debug, Clone)]
pub struct PerfilAutenticado(pub UserProfile);

impl<S> FromRequestParts<S> for PerfilAutenticado
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserProfile>()
            .cloned()
            .map(PerfilAutenticado)
            .ok_or(AppError::InvalidToken)
    }
}

/// Extrator do principal externo ainda não reconciliado com um perfil local.
/// Usado apenas pelo endpoint de estabelecimento de sessão, que roda o
/// provisionamento.
pub struct PrincipalExterno(pub ClaimsExternas);

impl<S> FromRequestParts<S> for PrincipalExterno
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = extrair_bearer(&parts.headers)?;
        let claims = validar_token_externo(token, &app_state.jwt_secret)?;
        Ok(PrincipalExterno(claims))
    }
}
