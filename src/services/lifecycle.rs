// src/services/lifecycle.rs
//
// Máquina de estados da solicitação de desconto. As regras aqui são puras:
// recebem o estado atual e a intenção, e devolvem o próximo status ou um
// erro de validação ANTES de qualquer escrita no banco. A garantia de que
// nenhuma solicitação chega a estado terminal sem comprovante anexado vive
// aqui, não no esquema.

use crate::{
    common::error::AppError,
    models::solicitacao::{SolicitacaoDesconto, StatusSolicitacao},
};

/// Variante de implantação do fluxo.
///
/// O modelo completo passa pela direção (anexo de comprovante) e admite a
/// devolução para revisão do consultor. O simplificado é a tabela reduzida
/// da primeira versão do sistema: um único estágio de análise antes do
/// parecer final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeloStatus {
    Completo,
    Simplificado,
}

impl ModeloStatus {
    pub fn from_env(valor: &str) -> Self {
        match valor.to_ascii_lowercase().as_str() {
            "simplificado" => ModeloStatus::Simplificado,
            _ => ModeloStatus::Completo,
        }
    }

    /// Status de toda solicitação recém-criada.
    pub fn status_inicial(self) -> StatusSolicitacao {
        match self {
            ModeloStatus::Completo => StatusSolicitacao::AguardandoDiretor,
            ModeloStatus::Simplificado => StatusSolicitacao::EmAnalise,
        }
    }

    /// Estágio em que o coordenador pode dar o parecer final.
    pub fn estagio_de_parecer(self) -> StatusSolicitacao {
        match self {
            ModeloStatus::Completo => StatusSolicitacao::AguardandoCoordenador,
            ModeloStatus::Simplificado => StatusSolicitacao::EmAnalise,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Lifecycle {
    pub modelo: ModeloStatus,
}

impl Lifecycle {
    pub fn new(modelo: ModeloStatus) -> Self {
        Self { modelo }
    }

    /// Anexo do comprovante pela direção: só sai de AGUARDANDO_DIRETOR.
    pub fn validar_anexo(
        &self,
        solicitacao: &SolicitacaoDesconto,
    ) -> Result<StatusSolicitacao, AppError> {
        if self.modelo != ModeloStatus::Completo
            || solicitacao.status != StatusSolicitacao::AguardandoDiretor
        {
            return Err(AppError::TransicaoNaoPermitida {
                de: solicitacao.status,
                para: StatusSolicitacao::AguardandoCoordenador,
            });
        }
        Ok(StatusSolicitacao::AguardandoCoordenador)
    }

    /// Parecer final do coordenador: o alvo precisa ser terminal, o status
    /// atual precisa ser o estágio de parecer e, no modelo completo, o
    /// comprovante precisa estar anexado.
    pub fn validar_parecer(
        &self,
        solicitacao: &SolicitacaoDesconto,
        alvo: StatusSolicitacao,
    ) -> Result<(), AppError> {
        if !alvo.terminal() || solicitacao.status != self.modelo.estagio_de_parecer() {
            return Err(AppError::TransicaoNaoPermitida {
                de: solicitacao.status,
                para: alvo,
            });
        }
        if self.modelo == ModeloStatus::Completo && solicitacao.comprovante_em.is_none() {
            return Err(AppError::ComprovanteObrigatorio);
        }
        Ok(())
    }

    /// Devolução pelo admin: qualquer status não terminal, só no modelo completo.
    pub fn validar_devolucao(&self, solicitacao: &SolicitacaoDesconto) -> Result<(), AppError> {
        if self.modelo != ModeloStatus::Completo || solicitacao.status.terminal() {
            return Err(AppError::TransicaoNaoPermitida {
                de: solicitacao.status,
                para: StatusSolicitacao::RevisaoConsultor,
            });
        }
        Ok(())
    }

    /// Reenvio pelo consultor após correção: volta para a fila da direção.
    pub fn validar_reenvio(
        &self,
        solicitacao: &SolicitacaoDesconto,
    ) -> Result<StatusSolicitacao, AppError> {
        if solicitacao.status != StatusSolicitacao::RevisaoConsultor {
            return Err(AppError::TransicaoNaoPermitida {
                de: solicitacao.status,
                para: StatusSolicitacao::AguardandoDiretor,
            });
        }
        Ok(StatusSolicitacao::AguardandoDiretor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::solicitacao::TipoIngresso;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn solicitacao(status: StatusSolicitacao) -> SolicitacaoDesconto {
        SolicitacaoDesconto {
            id: Uuid::new_v4(),
            inscricao: "2024-ABC".to_string(),
            cpf_matricula: "000.000.000-00".to_string(),
            nome_aluno: "João da Silva".to_string(),
            tipo_ingresso: TipoIngresso::Enem,
            curso_id: Some(Uuid::new_v4()),
            mensalidade_atual: Decimal::from(1000),
            desconto_atual_percent: Decimal::from(10),
            mensalidade_solicitada: Decimal::new(85000, 2),
            desconto_solicitado_percent: Decimal::from(15),
            status,
            numero_chamado: None,
            observacoes: None,
            comprovante_em: None,
            criado_por: Uuid::new_v4(),
            criado_em: Utc::now(),
            atualizado_em: Utc::now(),
        }
    }

    fn com_comprovante(status: StatusSolicitacao) -> SolicitacaoDesconto {
        let mut s = solicitacao(status);
        s.comprovante_em = Some(Utc::now());
        s
    }

    #[test]
    fn status_inicial_depende_do_modelo() {
        assert_eq!(
            ModeloStatus::Completo.status_inicial(),
            StatusSolicitacao::AguardandoDiretor
        );
        assert_eq!(
            ModeloStatus::Simplificado.status_inicial(),
            StatusSolicitacao::EmAnalise
        );
    }

    #[test]
    fn anexo_so_sai_de_aguardando_diretor() {
        let engine = Lifecycle::new(ModeloStatus::Completo);

        let proxima = engine
            .validar_anexo(&solicitacao(StatusSolicitacao::AguardandoDiretor))
            .unwrap();
        assert_eq!(proxima, StatusSolicitacao::AguardandoCoordenador);

        for status in [
            StatusSolicitacao::AguardandoCoordenador,
            StatusSolicitacao::RevisaoConsultor,
            StatusSolicitacao::Deferido,
            StatusSolicitacao::Indeferido,
        ] {
            assert!(engine.validar_anexo(&solicitacao(status)).is_err());
        }
    }

    #[test]
    fn parecer_exige_estagio_correto_e_alvo_terminal() {
        let engine = Lifecycle::new(ModeloStatus::Completo);
        let pronta = com_comprovante(StatusSolicitacao::AguardandoCoordenador);

        assert!(engine.validar_parecer(&pronta, StatusSolicitacao::Deferido).is_ok());
        assert!(engine.validar_parecer(&pronta, StatusSolicitacao::Indeferido).is_ok());

        // "Aguardando coordenador" escolhido como parecer final é rejeitado.
        assert!(matches!(
            engine.validar_parecer(&pronta, StatusSolicitacao::AguardandoCoordenador),
            Err(AppError::TransicaoNaoPermitida { .. })
        ));

        // Fora do estágio de parecer, nada transita para terminal.
        for status in [
            StatusSolicitacao::AguardandoDiretor,
            StatusSolicitacao::RevisaoConsultor,
            StatusSolicitacao::Deferido,
        ] {
            assert!(engine
                .validar_parecer(&com_comprovante(status), StatusSolicitacao::Deferido)
                .is_err());
        }
    }

    #[test]
    fn terminal_nunca_sem_comprovante_no_modelo_completo() {
        let engine = Lifecycle::new(ModeloStatus::Completo);
        let sem_anexo = solicitacao(StatusSolicitacao::AguardandoCoordenador);

        assert!(matches!(
            engine.validar_parecer(&sem_anexo, StatusSolicitacao::Deferido),
            Err(AppError::ComprovanteObrigatorio)
        ));
    }

    #[test]
    fn modelo_simplificado_finaliza_direto_de_em_analise() {
        let engine = Lifecycle::new(ModeloStatus::Simplificado);

        assert!(engine
            .validar_parecer(&solicitacao(StatusSolicitacao::EmAnalise), StatusSolicitacao::Deferido)
            .is_ok());

        // Sem etapa da direção e sem ciclo de revisão no modelo reduzido.
        assert!(engine
            .validar_anexo(&solicitacao(StatusSolicitacao::EmAnalise))
            .is_err());
        assert!(engine
            .validar_devolucao(&solicitacao(StatusSolicitacao::EmAnalise))
            .is_err());
    }

    #[test]
    fn devolucao_vale_para_qualquer_nao_terminal() {
        let engine = Lifecycle::new(ModeloStatus::Completo);

        for status in [
            StatusSolicitacao::AguardandoDiretor,
            StatusSolicitacao::AguardandoCoordenador,
            StatusSolicitacao::RevisaoConsultor,
        ] {
            assert!(engine.validar_devolucao(&solicitacao(status)).is_ok());
        }
        for status in [StatusSolicitacao::Deferido, StatusSolicitacao::Indeferido] {
            assert!(engine.validar_devolucao(&solicitacao(status)).is_err());
        }
    }

    #[test]
    fn reenvio_so_sai_de_revisao_consultor() {
        let engine = Lifecycle::new(ModeloStatus::Completo);

        assert_eq!(
            engine
                .validar_reenvio(&solicitacao(StatusSolicitacao::RevisaoConsultor))
                .unwrap(),
            StatusSolicitacao::AguardandoDiretor
        );
        assert!(engine
            .validar_reenvio(&solicitacao(StatusSolicitacao::AguardandoDiretor))
            .is_err());
    }
}
