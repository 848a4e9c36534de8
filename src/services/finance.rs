// src/services/finance.rs
//
// Calculadora financeira: funções puras, sem efeito colateral.
// O valor solicitado gravado no banco é SEMPRE derivado daqui; o cliente
// nunca envia mensalidade_solicitada.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::error::AppError,
    models::{curso::Curso, solicitacao::TipoIngresso},
};

/// Percentual de desconto padrão do curso para um tipo de ingresso.
/// Tipo ausente cai no desconto padrão (vestibular) do curso.
pub fn desconto_padrao(curso: &Curso, tipo: Option<TipoIngresso>) -> Decimal {
    match tipo {
        Some(TipoIngresso::Enem) => curso.desconto_enem,
        Some(TipoIngresso::PortadorDiploma) => curso.desconto_diploma,
        Some(TipoIngresso::Transferencia) => curso.desconto_transferencia,
        Some(TipoIngresso::Vestibular) | None => curso.desconto_padrao,
    }
}

/// Percentual fora de [0, 100] é erro de validação, nunca clamp silencioso.
pub fn validar_percentual(percentual: Decimal) -> Result<(), AppError> {
    if percentual < Decimal::ZERO || percentual > Decimal::ONE_HUNDRED {
        return Err(AppError::PercentualForaDoIntervalo);
    }
    Ok(())
}

/// mensalidade_liquida = round2(base * (1 - percentual/100))
pub fn mensalidade_liquida(base: Decimal, percentual: Decimal) -> Result<Decimal, AppError> {
    if base <= Decimal::ZERO {
        return Err(AppError::MensalidadeInvalida);
    }
    validar_percentual(percentual)?;

    let fator = Decimal::ONE - percentual / Decimal::ONE_HUNDRED;
    Ok((base * fator).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn curso_exemplo() -> Curso {
        Curso {
            id: Uuid::new_v4(),
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
    fn desconto_segue_o_tipo_de_ingresso() {
        let curso = curso_exemplo();
        assert_eq!(desconto_padrao(&curso, Some(TipoIngresso::Enem)), Decimal::from(15));
        assert_eq!(desconto_padrao(&curso, Some(TipoIngresso::Vestibular)), Decimal::from(10));
        assert_eq!(
            desconto_padrao(&curso, Some(TipoIngresso::PortadorDiploma)),
            Decimal::from(20)
        );
        assert_eq!(
            desconto_padrao(&curso, Some(TipoIngresso::Transferencia)),
            Decimal::from(25)
        );
    }

    #[test]
    fn tipo_ausente_cai_no_desconto_padrao() {
        let curso = curso_exemplo();
        assert_eq!(desconto_padrao(&curso, None), curso.desconto_padrao);
    }

    #[test]
    fn enem_de_15_por_cento_sobre_1000_da_850() {
        let liquida = mensalidade_liquida(Decimal::from(1000), Decimal::from(15)).unwrap();
        assert_eq!(liquida, Decimal::new(85000, 2));
    }

    #[test]
    fn percentual_zero_preserva_a_base() {
        let base = Decimal::new(123456, 2);
        assert_eq!(mensalidade_liquida(base, Decimal::ZERO).unwrap(), base);
    }

    #[test]
    fn liquida_nunca_cresce_com_o_percentual() {
        let base = Decimal::from(997);
        let mut anterior = mensalidade_liquida(base, Decimal::ZERO).unwrap();
        for p in 1..=100 {
            let atual = mensalidade_liquida(base, Decimal::from(p)).unwrap();
            assert!(atual <= anterior, "liquida cresceu em p={p}");
            anterior = atual;
        }
        assert_eq!(anterior, Decimal::ZERO.round_dp(2));
    }

    #[test]
    fn arredonda_para_duas_casas() {
        // 999.99 com 12.5% -> 874.99125 -> 874.99
        let liquida =
            mensalidade_liquida(Decimal::new(99999, 2), Decimal::new(125, 1)).unwrap();
        assert_eq!(liquida, Decimal::new(87499, 2));
    }

    #[test]
    fn percentual_fora_do_intervalo_e_erro_nao_clamp() {
        let base = Decimal::from(1000);
        assert!(matches!(
            mensalidade_liquida(base, Decimal::from(101)),
            Err(AppError::PercentualForaDoIntervalo)
        ));
        assert!(matches!(
            mensalidade_liquida(base, Decimal::from(-1)),
            Err(AppError::PercentualForaDoIntervalo)
        ));
    }

    #[test]
    fn base_nao_positiva_e_erro() {
        assert!(matches!(
            mensalidade_liquida(Decimal::ZERO, Decimal::from(10)),
            Err(AppError::MensalidadeInvalida)
        ));
        assert!(matches!(
            mensalidade_liquida(Decimal::from(-500), Decimal::from(10)),
            Err(AppError::MensalidadeInvalida)
        ));
    }
}
