// src/services/solicitacao_service.rs
//
// Orquestra o ciclo de vida da solicitação: carrega o estado atual, valida a
// intenção contra a máquina de estados e só então escreve. Toda operação
// recebe o perfil da sessão explicitamente; o escopo de leitura por papel
// (consultor vê o que criou, coordenador vê seus cursos, admin vê tudo) é
// aplicado aqui, nunca deixado para a tela.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CursoRepository, SolicitacaoRepository, UserRepository},
    models::{
        auth::{Perfil, UserProfile},
        solicitacao::{
            CriarSolicitacaoPayload, DevolverSolicitacaoPayload, FinalizarSolicitacaoPayload,
            ReenviarSolicitacaoPayload, SolicitacaoDesconto, SolicitacaoDetalhada,
            StatusSolicitacao,
        },
    },
    services::{
        finance,
        lifecycle::Lifecycle,
        storage::StorageService,
    },
};

// Validade da URL assinada de leitura do comprovante, em segundos.
const TTL_URL_COMPROVANTE: u64 = 60;

#[derive(Clone)]
pub struct SolicitacaoService {
    repo: SolicitacaoRepository,
    curso_repo: CursoRepository,
    user_repo: UserRepository,
    storage: StorageService,
    lifecycle: Lifecycle,
}

impl SolicitacaoService {
    pub fn new(
        repo: SolicitacaoRepository,
        curso_repo: CursoRepository,
        user_repo: UserRepository,
        storage: StorageService,
        lifecycle: Lifecycle,
    ) -> Self {
        Self { repo, curso_repo, user_repo, storage, lifecycle }
    }

    // =========================================================================
    //  CRIAÇÃO E REENVIO (CONSULTOR)
    // =========================================================================

    pub async fn criar(
        &self,
        sessao: &UserProfile,
        payload: &CriarSolicitacaoPayload,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let curso = self
            .curso_repo
            .find_by_id(payload.curso_id)
            .await?
            .filter(|c| c.ativo)
            .ok_or(AppError::CursoIndisponivel)?;

        finance::validar_percentual(payload.desconto_atual_percent)?;
        let mensalidade_solicitada = finance::mensalidade_liquida(
            payload.mensalidade_atual,
            payload.desconto_solicitado_percent,
        )?;

        let status = self.lifecycle.modelo.status_inicial();
        let criada = self
            .repo
            .criar(payload, mensalidade_solicitada, status, sessao.id)
            .await?;

        tracing::info!(
            "📝 Solicitação {} criada para o curso {} ({:?})",
            criada.id,
            curso.nome_curso,
            status
        );
        Ok(criada)
    }

    pub async fn reenviar(
        &self,
        sessao: &UserProfile,
        id: Uuid,
        payload: &ReenviarSolicitacaoPayload,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = self.carregar_no_escopo(sessao, id).await?;

        // Só o criador atual reenvia a própria solicitação devolvida.
        if solicitacao.criado_por != sessao.id {
            return Err(AppError::NaoEncontrado("Solicitação"));
        }

        let novo_status = self.lifecycle.validar_reenvio(&solicitacao)?;
        let mensalidade_solicitada = finance::mensalidade_liquida(
            solicitacao.mensalidade_atual,
            payload.desconto_solicitado_percent,
        )?;

        self.repo
            .reenviar(
                id,
                payload.desconto_solicitado_percent,
                mensalidade_solicitada,
                payload.observacoes.as_deref(),
                novo_status,
            )
            .await
    }

    // =========================================================================
    //  COMPROVANTE (DIREÇÃO)
    // =========================================================================

    pub async fn anexar_comprovante(
        &self,
        id: Uuid,
        arquivo: Vec<u8>,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Solicitação"))?;

        // Valida a transição antes de tocar o storage.
        let novo_status = self.lifecycle.validar_anexo(&solicitacao)?;

        let chave = StorageService::chave_comprovante(id);
        self.storage.upload(&chave, arquivo).await?;

        self.repo.marcar_comprovante(id, novo_status).await
    }

    pub async fn url_comprovante(
        &self,
        sessao: &UserProfile,
        id: Uuid,
    ) -> Result<String, AppError> {
        let solicitacao = self.carregar_no_escopo(sessao, id).await?;
        if solicitacao.comprovante_em.is_none() {
            return Err(AppError::NaoEncontrado("Comprovante"));
        }

        let chave = StorageService::chave_comprovante(id);
        self.storage
            .criar_url_assinada(&chave, TTL_URL_COMPROVANTE)
            .await
    }

    // =========================================================================
    //  PARECER FINAL (COORDENADOR)
    // =========================================================================

    pub async fn finalizar(
        &self,
        sessao: &UserProfile,
        id: Uuid,
        payload: &FinalizarSolicitacaoPayload,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Solicitação"))?;

        // Coordenador só decide sobre cursos vinculados a ele; o admin
        // mantém autoridade de override.
        if sessao.perfil == Perfil::Coordenador {
            let meus_cursos = self.curso_repo.cursos_do_coordenador(sessao.id).await?;
            let vinculado = solicitacao
                .curso_id
                .map(|curso_id| meus_cursos.contains(&curso_id))
                .unwrap_or(false);
            if !vinculado {
                return Err(AppError::AcessoNegado);
            }
        }

        self.lifecycle.validar_parecer(&solicitacao, payload.status)?;

        self.repo
            .finalizar(id, payload.status, &payload.numero_chamado)
            .await
    }

    // =========================================================================
    //  DEVOLUÇÃO E EXCLUSÃO (ADMIN)
    // =========================================================================

    pub async fn devolver(
        &self,
        id: Uuid,
        payload: &DevolverSolicitacaoPayload,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Solicitação"))?;

        self.lifecycle.validar_devolucao(&solicitacao)?;

        // O destino precisa ser um consultor ativo.
        let destino = self
            .user_repo
            .find_by_id(payload.consultor_id)
            .await?
            .filter(|u| u.perfil == Perfil::Consultor && u.ativo)
            .ok_or(AppError::NaoEncontrado("Consultor"))?;

        let devolvida = self.repo.devolver(id, destino.id).await?;
        tracing::info!("↩️ Solicitação {} devolvida para {}", id, destino.email);
        Ok(devolvida)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.excluir(id).await
    }

    // =========================================================================
    //  LEITURA ESCOPADA POR PAPEL
    // =========================================================================

    pub async fn listar(
        &self,
        sessao: &UserProfile,
        status: Option<StatusSolicitacao>,
    ) -> Result<Vec<SolicitacaoDetalhada>, AppError> {
        let solicitacoes = match sessao.perfil {
            Perfil::Consultor => self.repo.listar_por_criador(sessao.id).await?,
            Perfil::Coordenador => {
                let meus_cursos = self.curso_repo.cursos_do_coordenador(sessao.id).await?;
                if meus_cursos.is_empty() {
                    Vec::new()
                } else {
                    self.repo.listar_por_cursos(&meus_cursos, status).await?
                }
            }
            Perfil::Admin => self.repo.listar_todas().await?,
        };

        let filtradas = match (sessao.perfil, status) {
            // Consultor e admin filtram em memória; coordenador já filtrou na query.
            (Perfil::Coordenador, _) => solicitacoes,
            (_, Some(status)) => solicitacoes
                .into_iter()
                .filter(|s| s.status == status)
                .collect(),
            (_, None) => solicitacoes,
        };

        self.enriquecer(filtradas).await
    }

    /// Fila de parecer do coordenador: cursos vinculados, no estágio de parecer.
    pub async fn fila_do_coordenador(
        &self,
        sessao: &UserProfile,
    ) -> Result<Vec<SolicitacaoDetalhada>, AppError> {
        self.listar(sessao, Some(self.lifecycle.modelo.estagio_de_parecer()))
            .await
    }

    pub async fn detalhar(
        &self,
        sessao: &UserProfile,
        id: Uuid,
    ) -> Result<SolicitacaoDetalhada, AppError> {
        let solicitacao = self.carregar_no_escopo(sessao, id).await?;
        let mut detalhadas = self.enriquecer(vec![solicitacao]).await?;
        detalhadas.pop().ok_or(AppError::NaoEncontrado("Solicitação"))
    }

    /// Carrega a solicitação aplicando a visibilidade do papel: fora do
    /// escopo responde "não encontrado", sem vazar a existência da linha.
    async fn carregar_no_escopo(
        &self,
        sessao: &UserProfile,
        id: Uuid,
    ) -> Result<SolicitacaoDesconto, AppError> {
        let solicitacao = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Solicitação"))?;

        let visivel = match sessao.perfil {
            Perfil::Admin => true,
            Perfil::Consultor => solicitacao.criado_por == sessao.id,
            Perfil::Coordenador => {
                let meus_cursos = self.curso_repo.cursos_do_coordenador(sessao.id).await?;
                solicitacao
                    .curso_id
                    .map(|curso_id| meus_cursos.contains(&curso_id))
                    .unwrap_or(false)
            }
        };

        if !visivel {
            return Err(AppError::NaoEncontrado("Solicitação"));
        }
        Ok(solicitacao)
    }

    /// Enriquecimento em lote (curso -> nome, criador -> nome/e-mail).
    /// Linha relacionada ausente vira None; nunca derruba a listagem.
    async fn enriquecer(
        &self,
        solicitacoes: Vec<SolicitacaoDesconto>,
    ) -> Result<Vec<SolicitacaoDetalhada>, AppError> {
        let curso_ids: Vec<Uuid> = {
            let mut ids: Vec<Uuid> = solicitacoes.iter().filter_map(|s| s.curso_id).collect();
            ids.sort();
            ids.dedup();
            ids
        };
        let criador_ids: Vec<Uuid> = {
            let mut ids: Vec<Uuid> = solicitacoes.iter().map(|s| s.criado_por).collect();
            ids.sort();
            ids.dedup();
            ids
        };

        let cursos: HashMap<Uuid, String> = self
            .curso_repo
            .find_by_ids(&curso_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c.nome_curso))
            .collect();

        let criadores: HashMap<Uuid, (String, String)> = self
            .user_repo
            .find_by_ids(&criador_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, (u.nome, u.email)))
            .collect();

        Ok(solicitacoes
            .into_iter()
            .map(|s| {
                let nome_curso = s.curso_id.and_then(|id| cursos.get(&id).cloned());
                let consultor = criadores.get(&s.criado_por).cloned();
                SolicitacaoDetalhada {
                    nome_curso,
                    consultor_nome: consultor.as_ref().map(|(nome, _)| nome.clone()),
                    consultor_email: consultor.map(|(_, email)| email),
                    solicitacao: s,
                }
            })
            .collect())
    }
}
