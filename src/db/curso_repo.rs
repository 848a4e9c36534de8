// src/db/curso_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::curso::{Curso, CursoCoordenador, SalvarCursoPayload},
};

const COLUNAS: &str = "id, nome_curso, ativo, mensalidade_padrao, desconto_padrao, \
                       desconto_enem, desconto_diploma, desconto_transferencia";

// Repositório das tabelas 'cursos' e 'curso_coordenador'.
#[derive(Clone)]
pub struct CursoRepository {
    pool: PgPool,
}

impl CursoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self, somente_ativos: bool) -> Result<Vec<Curso>, AppError> {
        let cursos = sqlx::query_as::<_, Curso>(&format!(
            "SELECT {COLUNAS} FROM cursos WHERE ativo = TRUE OR $1 = FALSE ORDER BY nome_curso ASC"
        ))
        .bind(somente_ativos)
        .fetch_all(&self.pool)
        .await?;

        Ok(cursos)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Curso>, AppError> {
        let maybe_curso =
            sqlx::query_as::<_, Curso>(&format!("SELECT {COLUNAS} FROM cursos WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(maybe_curso)
    }

    /// Busca em lote para enriquecimento de listagens.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Curso>, AppError> {
        let cursos =
            sqlx::query_as::<_, Curso>(&format!("SELECT {COLUNAS} FROM cursos WHERE id = ANY($1)"))
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(cursos)
    }

    pub async fn criar(&self, p: &SalvarCursoPayload) -> Result<Curso, AppError> {
        let curso = sqlx::query_as::<_, Curso>(&format!(
            r#"
            INSERT INTO cursos (
                nome_curso, ativo, mensalidade_padrao,
                desconto_padrao, desconto_enem, desconto_diploma, desconto_transferencia
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUNAS}
            "#
        ))
        .bind(&p.nome_curso)
        .bind(p.ativo)
        .bind(p.mensalidade_padrao)
        .bind(p.desconto_padrao)
        .bind(p.desconto_enem)
        .bind(p.desconto_diploma)
        .bind(p.desconto_transferencia)
        .fetch_one(&self.pool)
        .await?;

        Ok(curso)
    }

    pub async fn atualizar(&self, id: Uuid, p: &SalvarCursoPayload) -> Result<Curso, AppError> {
        let curso = sqlx::query_as::<_, Curso>(&format!(
            r#"
            UPDATE cursos
            SET nome_curso = $2,
                ativo = $3,
                mensalidade_padrao = $4,
                desconto_padrao = $5,
                desconto_enem = $6,
                desconto_diploma = $7,
                desconto_transferencia = $8
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(&p.nome_curso)
        .bind(p.ativo)
        .bind(p.mensalidade_padrao)
        .bind(p.desconto_padrao)
        .bind(p.desconto_enem)
        .bind(p.desconto_diploma)
        .bind(p.desconto_transferencia)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NaoEncontrado("Curso"))?;

        Ok(curso)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cursos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NaoEncontrado("Curso"));
        }
        Ok(())
    }

    // =========================================================================
    //  VÍNCULO CURSO <-> COORDENADOR
    // =========================================================================

    /// Revinculação é delete+insert, mas dentro de uma única transação:
    /// uma falha no meio não deixa o curso temporariamente sem coordenador.
    pub async fn vincular_coordenador(
        &self,
        curso_id: Uuid,
        coordenador_id: Uuid,
    ) -> Result<CursoCoordenador, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM curso_coordenador WHERE curso_id = $1")
            .bind(curso_id)
            .execute(&mut *tx)
            .await?;

        let vinculo = sqlx::query_as::<_, CursoCoordenador>(
            r#"
            INSERT INTO curso_coordenador (curso_id, coordenador_id)
            VALUES ($1, $2)
            RETURNING id, curso_id, coordenador_id
            "#,
        )
        .bind(curso_id)
        .bind(coordenador_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(vinculo)
    }

    pub async fn remover_vinculo(&self, curso_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM curso_coordenador WHERE curso_id = $1")
            .bind(curso_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn vinculo_do_curso(
        &self,
        curso_id: Uuid,
    ) -> Result<Option<CursoCoordenador>, AppError> {
        let maybe_vinculo = sqlx::query_as::<_, CursoCoordenador>(
            "SELECT id, curso_id, coordenador_id FROM curso_coordenador WHERE curso_id = $1",
        )
        .bind(curso_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_vinculo)
    }

    /// Cursos sob responsabilidade de um coordenador (escopo das listagens).
    pub async fn cursos_do_coordenador(
        &self,
        coordenador_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<(Uuid,)> =
            sqlx::query_as("SELECT curso_id FROM curso_coordenador WHERE coordenador_id = $1")
                .bind(coordenador_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
