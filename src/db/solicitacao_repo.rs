// src/db/solicitacao_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::solicitacao::{CriarSolicitacaoPayload, SolicitacaoDesconto, StatusSolicitacao},
};

const COLUNAS: &str = "id, inscricao, cpf_matricula, nome_aluno, tipo_ingresso, curso_id, \
                       mensalidade_atual, desconto_atual_percent, mensalidade_solicitada, \
                       desconto_solicitado_percent, status, numero_chamado, observacoes, \
                       comprovante_em, criado_por, criado_em, atualizado_em";

// Repositório da tabela 'solicitacoes_desconto'.
#[derive(Clone)]
pub struct SolicitacaoRepository {
    pool: PgPool,
}

impl SolicitacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar(
        &self,
        p: &CriarSolicitacaoPayload,
        mensalidade_solicitada: Decimal,
        status: StatusSolicitacao,
        criado_por: Uuid,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = sqlx::query_as::<_, SolicitacaoDesconto>(&format!(
            r#"
            INSERT INTO solicitacoes_desconto (
                inscricao, cpf_matricula, nome_aluno, tipo_ingresso, curso_id,
                mensalidade_atual, desconto_atual_percent,
                mensalidade_solicitada, desconto_solicitado_percent,
                status, observacoes, criado_por
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COLUNAS}
            "#
        ))
        .bind(&p.inscricao)
        .bind(&p.cpf_matricula)
        .bind(&p.nome_aluno)
        .bind(p.tipo_ingresso)
        .bind(p.curso_id)
        .bind(p.mensalidade_atual)
        .bind(p.desconto_atual_percent)
        .bind(mensalidade_solicitada)
        .bind(p.desconto_solicitado_percent)
        .bind(status)
        .bind(&p.observacoes)
        .bind(criado_por)
        .fetch_one(&self.pool)
        .await?;

        Ok(solicitacao)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SolicitacaoDesconto>, AppError> {
        let maybe = sqlx::query_as::<_, SolicitacaoDesconto>(&format!(
            "SELECT {COLUNAS} FROM solicitacoes_desconto WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe)
    }

    /// Escopo do consultor: apenas solicitações criadas por ele.
    pub async fn listar_por_criador(
        &self,
        criado_por: Uuid,
    ) -> Result<Vec<SolicitacaoDesconto>, AppError> {
        let solicitacoes = sqlx::query_as::<_, SolicitacaoDesconto>(&format!(
            "SELECT {COLUNAS} FROM solicitacoes_desconto WHERE criado_por = $1 \
             ORDER BY criado_em DESC"
        ))
        .bind(criado_por)
        .fetch_all(&self.pool)
        .await?;

        Ok(solicitacoes)
    }

    /// Escopo do coordenador: cursos vinculados, com filtro opcional de status.
    pub async fn listar_por_cursos(
        &self,
        curso_ids: &[Uuid],
        status: Option<StatusSolicitacao>,
    ) -> Result<Vec<SolicitacaoDesconto>, AppError> {
        let solicitacoes = sqlx::query_as::<_, SolicitacaoDesconto>(&format!(
            "SELECT {COLUNAS} FROM solicitacoes_desconto \
             WHERE curso_id = ANY($1) AND ($2::status_solicitacao IS NULL OR status = $2) \
             ORDER BY atualizado_em DESC"
        ))
        .bind(curso_ids)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(solicitacoes)
    }

    /// Escopo do admin: tudo.
    pub async fn listar_todas(&self) -> Result<Vec<SolicitacaoDesconto>, AppError> {
        let solicitacoes = sqlx::query_as::<_, SolicitacaoDesconto>(&format!(
            "SELECT {COLUNAS} FROM solicitacoes_desconto ORDER BY criado_em DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(solicitacoes)
    }

    /// Carimba o anexo do comprovante e avança o status.
    pub async fn marcar_comprovante(
        &self,
        id: Uuid,
        novo_status: StatusSolicitacao,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = sqlx::query_as::<_, SolicitacaoDesconto>(&format!(
            r#"
            UPDATE solicitacoes_desconto
            SET status = $2, comprovante_em = NOW(), atualizado_em = NOW()
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(novo_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(solicitacao)
    }

    /// Parecer final: grava chamado externo e o status terminal.
    pub async fn finalizar(
        &self,
        id: Uuid,
        status: StatusSolicitacao,
        numero_chamado: &str,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = sqlx::query_as::<_, SolicitacaoDesconto>(&format!(
            r#"
            UPDATE solicitacoes_desconto
            SET status = $2, numero_chamado = $3, atualizado_em = NOW()
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(numero_chamado)
        .fetch_one(&self.pool)
        .await?;

        Ok(solicitacao)
    }

    /// Devolução pelo admin: reatribui o criador e volta para revisão.
    pub async fn devolver(
        &self,
        id: Uuid,
        consultor_id: Uuid,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = sqlx::query_as::<_, SolicitacaoDesconto>(&format!(
            r#"
            UPDATE solicitacoes_desconto
            SET status = $2, criado_por = $3, atualizado_em = NOW()
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(StatusSolicitacao::RevisaoConsultor)
        .bind(consultor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(solicitacao)
    }

    /// Reenvio pelo consultor após correção: recalcula valores e retorna à fila.
    pub async fn reenviar(
        &self,
        id: Uuid,
        desconto_solicitado_percent: Decimal,
        mensalidade_solicitada: Decimal,
        observacoes: Option<&str>,
        novo_status: StatusSolicitacao,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = sqlx::query_as::<_, SolicitacaoDesconto>(&format!(
            r#"
            UPDATE solicitacoes_desconto
            SET desconto_solicitado_percent = $2,
                mensalidade_solicitada = $3,
                observacoes = COALESCE($4, observacoes),
                status = $5,
                atualizado_em = NOW()
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(desconto_solicitado_percent)
        .bind(mensalidade_solicitada)
        .bind(observacoes)
        .bind(novo_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(solicitacao)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM solicitacoes_desconto WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NaoEncontrado("Solicitação"));
        }
        Ok(())
    }
}
