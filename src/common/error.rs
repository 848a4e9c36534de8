// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::Locale;
use crate::models::solicitacao::StatusSolicitacao;

// Erro de domínio. As variantes de validação nunca chegam ao banco;
// erros de colaboradores (banco, storage) são repassados como vieram.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Transição de status não permitida: {de:?} -> {para:?}")]
    TransicaoNaoPermitida {
        de: StatusSolicitacao,
        para: StatusSolicitacao,
    },

    #[error("Comprovante obrigatório")]
    ComprovanteObrigatorio,

    #[error("Percentual de desconto fora do intervalo [0, 100]")]
    PercentualForaDoIntervalo,

    #[error("Mensalidade deve ser maior que zero")]
    MensalidadeInvalida,

    #[error("Curso inativo ou inexistente")]
    CursoIndisponivel,

    #[error("Perfil não encontrado para a identidade autenticada")]
    PerfilNaoEncontrado,

    #[error("Acesso negado")]
    AcessoNegado,

    #[error("{0} não encontrado(a)")]
    NaoEncontrado(&'static str),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro no serviço de armazenamento: {0}")]
    StorageError(String),

    #[error("Erro ao gerar relatório: {0}")]
    RelatorioError(String),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::StorageError(e.to_string())
    }
}

// Erro voltado para o HTTP, já com status e mensagem no idioma do cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => Json(json!({ "error": self.error, "details": details })),
            None => Json(json!({ "error": self.error })),
        };
        (self.status, body).into_response()
    }
}

impl AppError {
    /// Converte o erro de domínio em resposta HTTP, traduzindo a mensagem
    /// quando a tabela de tradução conhece o caso.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let pt = locale.pt();

        let (status, error) = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                return ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: traduzir(pt, "Um ou mais campos são inválidos.", "One or more fields are invalid."),
                    details: Some(serde_json::Value::Object(details)),
                };
            }
            AppError::TransicaoNaoPermitida { de, para } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                if pt {
                    format!("Transição de status não permitida: {de:?} -> {para:?}.")
                } else {
                    format!("Status transition not allowed: {de:?} -> {para:?}.")
                },
            ),
            AppError::ComprovanteObrigatorio => (
                StatusCode::UNPROCESSABLE_ENTITY,
                traduzir(
                    pt,
                    "Você deve anexar o comprovante para prosseguir.",
                    "A supporting document must be attached before proceeding.",
                ),
            ),
            AppError::PercentualForaDoIntervalo => (
                StatusCode::BAD_REQUEST,
                traduzir(
                    pt,
                    "O percentual de desconto deve estar entre 0 e 100.",
                    "The discount percentage must be between 0 and 100.",
                ),
            ),
            AppError::MensalidadeInvalida => (
                StatusCode::BAD_REQUEST,
                traduzir(
                    pt,
                    "A mensalidade deve ser maior que zero.",
                    "The tuition amount must be greater than zero.",
                ),
            ),
            AppError::CursoIndisponivel => (
                StatusCode::BAD_REQUEST,
                traduzir(
                    pt,
                    "O curso selecionado está inativo ou não existe.",
                    "The selected course is inactive or does not exist.",
                ),
            ),
            AppError::PerfilNaoEncontrado => (
                StatusCode::FORBIDDEN,
                traduzir(
                    pt,
                    "Nenhum perfil provisionado para esta identidade. Saia e contate o suporte.",
                    "No profile is provisioned for this identity. Sign out and contact support.",
                ),
            ),
            AppError::AcessoNegado => (
                StatusCode::FORBIDDEN,
                traduzir(
                    pt,
                    "Seu perfil não tem permissão para esta ação.",
                    "Your role is not allowed to perform this action.",
                ),
            ),
            AppError::NaoEncontrado(entidade) => (
                StatusCode::NOT_FOUND,
                if pt {
                    format!("{entidade} não encontrado(a).")
                } else {
                    format!("{entidade} not found.")
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                traduzir(
                    pt,
                    "Token de autenticação inválido ou ausente.",
                    "Missing or invalid authentication token.",
                ),
            ),
            // Colaboradores: a mensagem do provedor é repassada como veio.
            AppError::DatabaseError(e) => {
                tracing::error!("Erro de banco de dados: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::StorageError(msg) => {
                tracing::error!("Erro de storage: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::RelatorioError(msg) => {
                tracing::error!("Erro ao gerar relatório: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    traduzir(pt, "Falha ao gerar o relatório.", "Failed to generate the report."),
                )
            }
            AppError::JwtError(_) => (
                StatusCode::UNAUTHORIZED,
                traduzir(pt, "Token de autenticação inválido.", "Invalid authentication token."),
            ),
            AppError::InternalServerError(e) => {
                tracing::error!("Erro Interno do Servidor: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    traduzir(pt, "Ocorreu um erro inesperado.", "An unexpected error occurred."),
                )
            }
        };

        ApiError { status, error, details: None }
    }
}

fn traduzir(pt: bool, msg_pt: &str, msg_en: &str) -> String {
    if pt { msg_pt.to_string() } else { msg_en.to_string() }
}

// Fallback para extratores e middlewares que não têm o Locale em mãos:
// responde em pt-BR, o idioma padrão da instituição.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::padrao()).into_response()
    }
}
