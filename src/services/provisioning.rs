// src/services/provisioning.rs
//
// Reconciliação do principal do provedor de identidade com o perfil local.
// O upsert é chaveado na identidade externa, então logins repetidos são
// idempotentes. Identidade válida sem perfil resolvível é estado terminal
// (fail-closed): nunca fabricamos um perfil com privilégio além da regra
// de papel padrão documentada aqui.

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{ClaimsExternas, Perfil, UserProfile},
};

/// Papel do perfil novo: (a) papel de um registro antigo achado por e-mail,
/// senão (b) a dica de papel nos metadados do provedor, senão (c) CONSULTOR.
pub fn resolver_perfil(existente: Option<Perfil>, dica: Option<Perfil>) -> Perfil {
    existente.or(dica).unwrap_or(Perfil::Consultor)
}

/// Nome de exibição extraído do e-mail quando o provedor não informa nome:
/// "joao.silva@x" -> "Joao Silva".
pub fn nome_do_email(email: &str) -> String {
    let usuario = email.split('@').next().unwrap_or(email);
    usuario
        .split(['.', '_', '-'])
        .filter(|parte| !parte.is_empty())
        .map(|parte| {
            let mut chars = parte.chars();
            match chars.next() {
                Some(primeira) => {
                    primeira.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone)]
pub struct ProvisioningService {
    user_repo: UserRepository,
}

impl ProvisioningService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Executado no estabelecimento da sessão (pós-login no provedor).
    pub async fn estabelecer_sessao(
        &self,
        claims: &ClaimsExternas,
    ) -> Result<UserProfile, AppError> {
        // 1. Caminho quente: identidade já conhecida.
        if let Some(perfil) = self.user_repo.find_by_identidade(&claims.sub).await? {
            return ativo_ou_fail_closed(perfil);
        }

        // 2. Migração do sistema chaveado por e-mail: adota a linha antiga,
        //    preservando o papel que ela já tinha.
        if let Some(antigo) = self.user_repo.find_by_email(&claims.email).await? {
            tracing::info!(
                "🔗 Perfil {} adotado pela identidade externa {}",
                antigo.id,
                claims.sub
            );
            let adotado = self
                .user_repo
                .adotar_identidade(antigo.id, &claims.sub)
                .await?;
            return ativo_ou_fail_closed(adotado);
        }

        // 3. Primeiro login: cria o perfil com o papel resolvido.
        let perfil = resolver_perfil(None, claims.perfil);
        let nome = claims
            .nome
            .clone()
            .unwrap_or_else(|| nome_do_email(&claims.email));

        let criado = self
            .user_repo
            .upsert_por_identidade(&claims.sub, &nome, &claims.email, perfil)
            .await?;

        tracing::info!("✅ Perfil provisionado para {} ({:?})", criado.email, criado.perfil);
        Ok(criado)
    }
}

fn ativo_ou_fail_closed(perfil: UserProfile) -> Result<UserProfile, AppError> {
    if perfil.ativo {
        Ok(perfil)
    } else {
        Err(AppError::PerfilNaoEncontrado)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn papel_existente_vence_a_dica_do_provedor() {
        assert_eq!(
            resolver_perfil(Some(Perfil::Coordenador), Some(Perfil::Admin)),
            Perfil::Coordenador
        );
    }

    #[test]
    fn dica_do_provedor_vence_o_padrao() {
        assert_eq!(resolver_perfil(None, Some(Perfil::Admin)), Perfil::Admin);
    }

    #[test]
    fn sem_registro_e_sem_dica_cai_em_consultor() {
        assert_eq!(resolver_perfil(None, None), Perfil::Consultor);
    }

    #[test]
    fn nome_extraido_do_email() {
        assert_eq!(nome_do_email("joao.silva@instituicao.edu.br"), "Joao Silva");
        assert_eq!(nome_do_email("ana_maria-souza@x.com"), "Ana Maria Souza");
        assert_eq!(nome_do_email("carla@x.com"), "Carla");
    }
}
