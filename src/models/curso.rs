// src/models/curso.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ---
// Validação Customizada
// ---
fn validar_percentual_desconto(val: &Decimal) -> Result<(), ValidationError> {
    if *val < Decimal::ZERO || *val > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &100.0);
        err.message = Some("O percentual de desconto deve estar entre 0 e 100.".into());
        return Err(err);
    }
    Ok(())
}

fn validar_mensalidade_positiva(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        err.message = Some("A mensalidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Curso {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440001")]
    pub id: Uuid,

    #[schema(example = "Administração")]
    pub nome_curso: String,

    #[schema(example = true)]
    pub ativo: bool,

    #[schema(example = "1000.00")]
    pub mensalidade_padrao: Decimal,

    // Percentuais de desconto por tipo de ingresso, todos em [0, 100].
    #[schema(example = "10.00")]
    pub desconto_padrao: Decimal,
    #[schema(example = "15.00")]
    pub desconto_enem: Decimal,
    #[schema(example = "20.00")]
    pub desconto_diploma: Decimal,
    #[schema(example = "25.00")]
    pub desconto_transferencia: Decimal,
}

/// Vínculo curso -> coordenador. No modelo simples, no máximo um por curso.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CursoCoordenador {
    pub id: Uuid,
    pub curso_id: Uuid,
    pub coordenador_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalvarCursoPayload {
    #[validate(length(min = 1, message = "O nome do curso é obrigatório."))]
    pub nome_curso: String,

    #[serde(default = "ativo_padrao")]
    pub ativo: bool,

    #[validate(custom(function = "validar_mensalidade_positiva"))]
    pub mensalidade_padrao: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validar_percentual_desconto"))]
    pub desconto_padrao: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validar_percentual_desconto"))]
    pub desconto_enem: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validar_percentual_desconto"))]
    pub desconto_diploma: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validar_percentual_desconto"))]
    pub desconto_transferencia: Decimal,
}

fn ativo_padrao() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VincularCoordenadorPayload {
    pub coordenador_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_valido() -> SalvarCursoPayload {
        SalvarCursoPayload {
            nome_curso: "Administração".to_string(),
            ativo: true,
            mensalidade_padrao: Decimal::from(1000),
            desconto_padrao: Decimal::from(10),
            desconto_enem: Decimal::from(15),
            desconto_diploma: Decimal::from(20),
            desconto_transferencia: Decimal::from(25),
        }
    }

    #[test]
    fn payload_dentro_dos_limites_passa() {
        assert!(payload_valido().validate().is_ok());

        // As bordas do intervalo são válidas.
        let mut bordas = payload_valido();
        bordas.desconto_padrao = Decimal::ZERO;
        bordas.desconto_enem = Decimal::ONE_HUNDRED;
        assert!(bordas.validate().is_ok());
    }

    #[test]
    fn percentual_fora_do_intervalo_e_rejeitado_antes_do_banco() {
        let mut acima = payload_valido();
        acima.desconto_padrao = Decimal::from(150);
        let erros = acima.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("desconto_padrao"));

        let mut negativo = payload_valido();
        negativo.desconto_enem = Decimal::from(-5);
        let erros = negativo.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("desconto_enem"));
    }

    #[test]
    fn mensalidade_nao_positiva_e_rejeitada() {
        let mut negativa = payload_valido();
        negativa.mensalidade_padrao = Decimal::from(-10);
        let erros = negativa.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("mensalidade_padrao"));

        let mut zerada = payload_valido();
        zerada.mensalidade_padrao = Decimal::ZERO;
        assert!(zerada.validate().is_err());
    }
}
