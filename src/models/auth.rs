// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "perfil_usuario", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Perfil {
    Admin,       // Diretor / acesso total
    Consultor,   // Linha de frente, abre solicitações
    Coordenador, // Parecer final por curso
}

// --- Structs ---

/// Perfil local reconciliado com o principal do provedor de identidade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    /// ID opaco emitido pelo provedor de identidade externo.
    #[schema(example = "user_2aBcD3eFgH")]
    pub identidade_externa: String,

    #[schema(example = "Maria Souza")]
    pub nome: String,

    #[schema(example = "maria.souza@instituicao.edu.br")]
    pub email: String,

    pub perfil: Perfil,

    #[schema(example = true)]
    pub ativo: bool,

    pub criado_em: DateTime<Utc>,
}

/// Claims do token emitido pelo provedor de identidade.
/// O campo `perfil` é a dica de papel carregada nos metadados do provedor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsExternas {
    pub sub: String,
    pub email: String,
    pub nome: Option<String>,
    pub perfil: Option<Perfil>,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarUsuarioPayload {
    pub perfil: Option<Perfil>,
    pub ativo: Option<bool>,
}
