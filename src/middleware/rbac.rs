// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Perfil, UserProfile},
};

/// 1. O Trait que define quais perfis uma rota exige.
pub trait PerfilExigido: Send + Sync + 'static {
    fn permitidos() -> &'static [Perfil];

    /// O ADMIN mantém autoridade de override em todas as etapas do fluxo,
    /// exceto onde a regra de negócio amarra a ação ao criador (criação
    /// de solicitações, que pertence ao consultor).
    fn admin_tem_override() -> bool {
        true
    }
}

/// 2. O Extractor (Guardião)
pub struct RequerPerfil<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequerPerfil<T>
where
    T: PerfilExigido,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let perfil = parts
            .extensions
            .get::<UserProfile>()
            .map(|p| p.perfil)
            .ok_or(AppError::InvalidToken)?;

        let autorizado = T::permitidos().contains(&perfil)
            || (T::admin_tem_override() && perfil == Perfil::Admin);

        if !autorizado {
            return Err(AppError::AcessoNegado);
        }

        Ok(RequerPerfil(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS EXIGIDOS (TIPOS)
// ---

/// Criação e reenvio de solicitações: exclusivo do consultor, pois o
/// campo criado_por precisa referenciar um perfil CONSULTOR.
pub struct SomenteConsultor;
impl PerfilExigido for SomenteConsultor {
    fn permitidos() -> &'static [Perfil] {
        &[Perfil::Consultor]
    }
    fn admin_tem_override() -> bool {
        false
    }
}

/// Fila e parecer final: coordenador do curso (o vínculo é conferido no
/// serviço), com override do admin.
pub struct SomenteCoordenador;
impl PerfilExigido for SomenteCoordenador {
    fn permitidos() -> &'static [Perfil] {
        &[Perfil::Coordenador]
    }
}

/// Anexo de comprovante, gestão de usuários/cursos, devolução e exclusão.
pub struct SomenteAdmin;
impl PerfilExigido for SomenteAdmin {
    fn permitidos() -> &'static [Perfil] {
        &[Perfil::Admin]
    }
}
