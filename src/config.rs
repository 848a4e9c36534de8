// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{CursoRepository, SolicitacaoRepository, UserRepository},
    services::{
        lifecycle::{Lifecycle, ModeloStatus},
        provisioning::ProvisioningService,
        solicitacao_service::SolicitacaoService,
        storage::StorageService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub modelo: ModeloStatus,
    pub user_repo: UserRepository,
    pub curso_repo: CursoRepository,
    pub provisioning_service: ProvisioningService,
    pub solicitacao_service: SolicitacaoService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // MODELO_STATUS: "completo" (com etapa do diretor) ou "simplificado".
        let modelo = ModeloStatus::from_env(
            &env::var("MODELO_STATUS").unwrap_or_else(|_| "completo".to_string()),
        );

        let storage_url = env::var("STORAGE_URL").expect("STORAGE_URL deve ser definida");
        let storage_bucket =
            env::var("STORAGE_BUCKET").unwrap_or_else(|_| "comprovantes".to_string());
        let storage_service_key =
            env::var("STORAGE_SERVICE_KEY").expect("STORAGE_SERVICE_KEY deve ser definida");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        tracing::info!("🔧 Modelo de fluxo ativo: {:?}", modelo);

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let curso_repo = CursoRepository::new(db_pool.clone());
        let solicitacao_repo = SolicitacaoRepository::new(db_pool.clone());

        let storage = StorageService::new(storage_url, storage_bucket, storage_service_key);
        let provisioning_service = ProvisioningService::new(user_repo.clone());
        let solicitacao_service = SolicitacaoService::new(
            solicitacao_repo,
            curso_repo.clone(),
            user_repo.clone(),
            storage,
            Lifecycle::new(modelo),
        );

        Ok(Self {
            db_pool,
            jwt_secret,
            modelo,
            user_repo,
            curso_repo,
            provisioning_service,
            solicitacao_service,
        })
    }
}
