// src/models/solicitacao.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_solicitacao", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusSolicitacao {
    EmAnalise,             // Modelo simplificado: estágio único antes do parecer
    AguardandoDiretor,     // Modelo completo: aguarda anexo do comprovante
    AguardandoCoordenador, // Aguarda parecer final do coordenador
    RevisaoConsultor,      // Devolvida pelo admin para correção
    Deferido,
    Indeferido,
}

impl StatusSolicitacao {
    pub fn terminal(&self) -> bool {
        matches!(self, Self::Deferido | Self::Indeferido)
    }

    pub fn rotulo(&self) -> &'static str {
        match self {
            Self::EmAnalise => "EM ANÁLISE",
            Self::AguardandoDiretor => "AGUARDANDO DIRETOR",
            Self::AguardandoCoordenador => "AGUARDANDO COORDENADOR",
            Self::RevisaoConsultor => "REVISÃO DO CONSULTOR",
            Self::Deferido => "DEFERIDO",
            Self::Indeferido => "INDEFERIDO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_ingresso", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoIngresso {
    Enem,
    Vestibular,
    PortadorDiploma,
    Transferencia,
}

impl TipoIngresso {
    pub fn rotulo(&self) -> &'static str {
        match self {
            Self::Enem => "ENEM",
            Self::Vestibular => "VESTIBULAR",
            Self::PortadorDiploma => "PORTADOR DE DIPLOMA",
            Self::Transferencia => "TRANSFERÊNCIA",
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitacaoDesconto {
    pub id: Uuid,

    /// Código de inscrição/protocolo informado pelo consultor.
    #[schema(example = "2024-ABC")]
    pub inscricao: String,

    #[schema(example = "000.000.000-00")]
    pub cpf_matricula: String,

    #[schema(example = "João da Silva")]
    pub nome_aluno: String,

    pub tipo_ingresso: TipoIngresso,

    /// Nulo quando o curso foi excluído depois da criação da solicitação.
    pub curso_id: Option<Uuid>,

    #[schema(example = "1000.00")]
    pub mensalidade_atual: Decimal,
    #[schema(example = "10.00")]
    pub desconto_atual_percent: Decimal,

    // Sempre derivada: round2(mensalidade_atual * (1 - desconto/100)).
    #[schema(example = "850.00")]
    pub mensalidade_solicitada: Decimal,
    #[schema(example = "15.00")]
    pub desconto_solicitado_percent: Decimal,

    pub status: StatusSolicitacao,

    /// Identificador do chamado aberto no sistema acadêmico externo.
    pub numero_chamado: Option<String>,

    pub observacoes: Option<String>,

    /// Carimbo do anexo do comprovante; a transição para parecer exige valor não nulo.
    pub comprovante_em: Option<DateTime<Utc>>,

    pub criado_por: Uuid,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Solicitação enriquecida para telas de detalhe e relatórios.
/// Linhas relacionadas ausentes viram `None`, nunca erro fatal.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolicitacaoDetalhada {
    #[serde(flatten)]
    pub solicitacao: SolicitacaoDesconto,

    pub nome_curso: Option<String>,
    pub consultor_nome: Option<String>,
    pub consultor_email: Option<String>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarSolicitacaoPayload {
    #[validate(length(min = 1, message = "A inscrição/protocolo é obrigatória."))]
    pub inscricao: String,

    #[validate(length(min = 1, message = "O CPF ou matrícula é obrigatório."))]
    pub cpf_matricula: String,

    #[validate(length(min = 1, message = "O nome do aluno é obrigatório."))]
    pub nome_aluno: String,

    pub tipo_ingresso: TipoIngresso,
    pub curso_id: Uuid,

    pub mensalidade_atual: Decimal,
    pub desconto_atual_percent: Decimal,
    pub desconto_solicitado_percent: Decimal,

    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalizarSolicitacaoPayload {
    /// Somente DEFERIDO ou INDEFERIDO são aceitos como parecer final.
    pub status: StatusSolicitacao,

    #[validate(length(min = 1, message = "O número do chamado externo é obrigatório."))]
    pub numero_chamado: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DevolverSolicitacaoPayload {
    /// Consultor que recebe a solicitação para correção.
    pub consultor_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReenviarSolicitacaoPayload {
    pub desconto_solicitado_percent: Decimal,
    pub observacoes: Option<String>,
}
