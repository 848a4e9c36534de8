// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é aceitável aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Estabelecimento de sessão: valida o token externo e provisiona o
    // perfil local, por isso fica fora do auth_guard.
    let sessao_routes = Router::new()
        .route("/sessao", post(handlers::auth::estabelecer_sessao));

    let me_routes = Router::new()
        .route("/me", get(handlers::auth::get_me));

    let solicitacao_routes = Router::new()
        .route("/"
               ,post(handlers::solicitacoes::criar)
               .get(handlers::solicitacoes::listar)
        )
        .route("/fila", get(handlers::solicitacoes::fila))
        .route("/{id}"
               ,get(handlers::solicitacoes::detalhar)
               .delete(handlers::solicitacoes::excluir)
        )
        .route("/{id}/reenviar", post(handlers::solicitacoes::reenviar))
        .route("/{id}/comprovante"
               ,post(handlers::solicitacoes::anexar_comprovante)
               .get(handlers::solicitacoes::url_comprovante)
        )
        .route("/{id}/parecer", post(handlers::solicitacoes::registrar_parecer))
        .route("/{id}/consultor", put(handlers::solicitacoes::devolver));

    let curso_routes = Router::new()
        .route("/"
               ,get(handlers::cursos::listar)
               .post(handlers::cursos::criar)
        )
        .route("/{id}"
               ,put(handlers::cursos::atualizar)
               .delete(handlers::cursos::excluir)
        )
        .route("/{id}/sugestao", get(handlers::cursos::sugestao_de_desconto))
        .route("/{id}/coordenador"
               ,get(handlers::cursos::coordenador_do_curso)
               .put(handlers::cursos::vincular_coordenador)
               .delete(handlers::cursos::remover_coordenador)
        );

    let usuario_routes = Router::new()
        .route("/", get(handlers::usuarios::listar))
        .route("/{id}"
               ,put(handlers::usuarios::atualizar)
               .delete(handlers::usuarios::excluir)
        );

    let relatorio_routes = Router::new()
        .route("/solicitacoes", get(handlers::relatorios::exportar_solicitacoes));

    // Tudo, menos a sessão, passa pelo auth_guard (token + perfil ativo).
    let protegido = Router::new()
        .nest("/api/auth", me_routes)
        .nest("/api/solicitacoes", solicitacao_routes)
        .nest("/api/cursos", curso_routes)
        .nest("/api/usuarios", usuario_routes)
        .nest("/api/relatorios", relatorio_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", sessao_routes)
        .merge(protegido)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
