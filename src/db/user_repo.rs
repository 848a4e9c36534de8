// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Perfil, UserProfile},
};

const COLUNAS: &str = "id, identidade_externa, nome, email, perfil, ativo, criado_em";

// Repositório da tabela 'users_profile'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_identidade(
        &self,
        identidade_externa: &str,
    ) -> Result<Option<UserProfile>, AppError> {
        let maybe_profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {COLUNAS} FROM users_profile WHERE identidade_externa = $1"
        ))
        .bind(identidade_externa)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_profile)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, AppError> {
        let maybe_profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {COLUNAS} FROM users_profile WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_profile)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let maybe_profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {COLUNAS} FROM users_profile WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_profile)
    }

    /// Upsert chaveado na identidade externa: logins repetidos com o mesmo
    /// principal atualizam nome/e-mail e devolvem sempre a mesma linha.
    pub async fn upsert_por_identidade(
        &self,
        identidade_externa: &str,
        nome: &str,
        email: &str,
        perfil: Perfil,
    ) -> Result<UserProfile, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            INSERT INTO users_profile (identidade_externa, nome, email, perfil)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (identidade_externa)
            DO UPDATE SET nome = EXCLUDED.nome, email = EXCLUDED.email
            RETURNING {COLUNAS}
            "#
        ))
        .bind(identidade_externa)
        .bind(nome)
        .bind(email)
        .bind(perfil)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Migração do sistema chaveado por e-mail: adota uma linha antiga,
    /// gravando nela a identidade do provedor atual.
    pub async fn adotar_identidade(
        &self,
        id: Uuid,
        identidade_externa: &str,
    ) -> Result<UserProfile, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            UPDATE users_profile
            SET identidade_externa = $2
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(identidade_externa)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn listar(&self) -> Result<Vec<UserProfile>, AppError> {
        let profiles = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {COLUNAS} FROM users_profile ORDER BY nome ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Usuários ativos de um perfil (dropdowns de reatribuição e vínculo).
    pub async fn listar_por_perfil(&self, perfil: Perfil) -> Result<Vec<UserProfile>, AppError> {
        let profiles = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {COLUNAS} FROM users_profile WHERE perfil = $1 AND ativo = TRUE ORDER BY nome ASC"
        ))
        .bind(perfil)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Busca em lote para enriquecimento de listagens.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserProfile>, AppError> {
        let profiles = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {COLUNAS} FROM users_profile WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Mutação do admin: troca de papel e ativação/desativação (soft-disable).
    pub async fn atualizar(
        &self,
        id: Uuid,
        perfil: Option<Perfil>,
        ativo: Option<bool>,
    ) -> Result<UserProfile, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            UPDATE users_profile
            SET perfil = COALESCE($2, perfil),
                ativo = COALESCE($3, ativo)
            WHERE id = $1
            RETURNING {COLUNAS}
            "#
        ))
        .bind(id)
        .bind(perfil)
        .bind(ativo)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NaoEncontrado("Usuário"))?;

        Ok(profile)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users_profile WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NaoEncontrado("Usuário"));
        }
        Ok(())
    }
}
