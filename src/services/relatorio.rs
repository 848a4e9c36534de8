// src/services/relatorio.rs

use chrono::NaiveDate;
use genpdf::{elements, style, Element};
use serde::Serialize;

use crate::{
    common::error::AppError,
    models::solicitacao::SolicitacaoDetalhada,
};

/// Linha "achatada" do relatório. O mesmo conjunto de colunas alimenta o CSV
/// e a tabela do PDF; relacionamento ausente vira "N/A".
#[derive(Debug, Clone, Serialize)]
pub struct LinhaRelatorio {
    pub aluno: String,
    pub inscricao: String,
    pub cpf_matricula: String,
    pub curso: String,
    pub tipo_ingresso: String,
    pub consultor: String,
    pub mensalidade_atual: String,
    pub desconto_solicitado: String,
    pub mensalidade_solicitada: String,
    pub status: String,
    pub numero_chamado: String,
    pub criado_em: String,
}

pub fn montar_linhas(solicitacoes: &[SolicitacaoDetalhada]) -> Vec<LinhaRelatorio> {
    solicitacoes
        .iter()
        .map(|d| {
            let s = &d.solicitacao;
            LinhaRelatorio {
                aluno: s.nome_aluno.clone(),
                inscricao: s.inscricao.clone(),
                cpf_matricula: s.cpf_matricula.clone(),
                curso: d.nome_curso.clone().unwrap_or_else(|| "N/A".to_string()),
                tipo_ingresso: s.tipo_ingresso.rotulo().to_string(),
                consultor: d
                    .consultor_nome
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
                mensalidade_atual: format!("R$ {:.2}", s.mensalidade_atual),
                desconto_solicitado: format!("{:.2}%", s.desconto_solicitado_percent),
                mensalidade_solicitada: format!("R$ {:.2}", s.mensalidade_solicitada),
                status: s.status.rotulo().to_string(),
                numero_chamado: s
                    .numero_chamado
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
                criado_em: s.criado_em.format("%d/%m/%Y").to_string(),
            }
        })
        .collect()
}

/// Normaliza o título para um nome de arquivo seguro: minúsculas, sem
/// acentos comuns, qualquer outro caractere vira underscore.
pub fn slugify(titulo: &str) -> String {
    let mut slug = String::with_capacity(titulo.len());
    for c in titulo.to_lowercase().chars() {
        let mapeado = match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            c if c.is_ascii_alphanumeric() => c,
            _ => '_',
        };
        slug.push(mapeado);
    }
    // Colapsa underscores repetidos e apara as pontas.
    let mut saida = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '_' && saida.ends_with('_') {
            continue;
        }
        saida.push(c);
    }
    saida.trim_matches('_').to_string()
}

pub fn nome_arquivo(titulo: &str, extensao: &str, data: NaiveDate) -> String {
    format!("{}_{}.{}", slugify(titulo), data.format("%Y-%m-%d"), extensao)
}

pub fn gerar_csv(linhas: &[LinhaRelatorio]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for linha in linhas {
        writer
            .serialize(linha)
            .map_err(|e| AppError::RelatorioError(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::RelatorioError(e.to_string()))
}

pub fn gerar_pdf(titulo: &str, linhas: &[LinhaRelatorio]) -> Result<Vec<u8>, AppError> {
    // Carrega a fonte da pasta 'fonts/'
    let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
        .map_err(|_| {
            AppError::RelatorioError("Fonte não encontrada na pasta ./fonts".to_string())
        })?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(titulo);
    // A4 paisagem: a tabela tem colunas demais para o retrato.
    doc.set_paper_size(genpdf::Size::new(297, 210));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- CABEÇALHO ---
    doc.push(
        elements::Paragraph::new(titulo)
            .styled(style::Style::new().bold().with_font_size(16)),
    );
    doc.push(elements::Paragraph::new(format!(
        "Gerado em: {}",
        chrono::Utc::now().format("%d/%m/%Y")
    )));
    doc.push(elements::Break::new(1.5));

    // --- TABELA ---
    // Pesos: Aluno (3), Curso (3), Consultor (2), Mens. (2), Desc. (1),
    // Nova Mens. (2), Status (2), Data (2)
    let mut table = elements::TableLayout::new(vec![3, 3, 2, 2, 1, 2, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let style_bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Aluno").styled(style_bold))
        .element(elements::Paragraph::new("Curso").styled(style_bold))
        .element(elements::Paragraph::new("Consultor").styled(style_bold))
        .element(elements::Paragraph::new("Mensalidade").styled(style_bold))
        .element(elements::Paragraph::new("Desc.").styled(style_bold))
        .element(elements::Paragraph::new("Nova Mens.").styled(style_bold))
        .element(elements::Paragraph::new("Status").styled(style_bold))
        .element(elements::Paragraph::new("Data").styled(style_bold))
        .push()
        .map_err(|e| AppError::RelatorioError(e.to_string()))?;

    for linha in linhas {
        table
            .row()
            .element(elements::Paragraph::new(linha.aluno.clone()))
            .element(elements::Paragraph::new(linha.curso.clone()))
            .element(elements::Paragraph::new(linha.consultor.clone()))
            .element(elements::Paragraph::new(linha.mensalidade_atual.clone()))
            .element(elements::Paragraph::new(linha.desconto_solicitado.clone()))
            .element(elements::Paragraph::new(linha.mensalidade_solicitada.clone()))
            .element(elements::Paragraph::new(linha.status.clone()))
            .element(elements::Paragraph::new(linha.criado_em.clone()))
            .push()
            .map_err(|e| AppError::RelatorioError(e.to_string()))?;
    }

    doc.push(table);
    doc.push(elements::Break::new(1.5));

    let mut rodape =
        elements::Paragraph::new(format!("Total de solicitações: {}", linhas.len()));
    rodape.set_alignment(genpdf::Alignment::Right);
    doc.push(rodape.styled(style::Style::new().bold().with_font_size(10)));

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::RelatorioError(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::models::solicitacao::{
        SolicitacaoDesconto, StatusSolicitacao, TipoIngresso,
    };

    fn detalhada(nome_curso: Option<&str>) -> SolicitacaoDetalhada {
        let agora = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        SolicitacaoDetalhada {
            solicitacao: SolicitacaoDesconto {
                id: Uuid::new_v4(),
                inscricao: "2025-001".to_string(),
                cpf_matricula: "111.222.333-44".to_string(),
                nome_aluno: "Maria Souza".to_string(),
                tipo_ingresso: TipoIngresso::Enem,
                curso_id: nome_curso.map(|_| Uuid::new_v4()),
                mensalidade_atual: Decimal::new(100000, 2),
                desconto_atual_percent: Decimal::new(1000, 2),
                mensalidade_solicitada: Decimal::new(85000, 2),
                desconto_solicitado_percent: Decimal::new(1500, 2),
                status: StatusSolicitacao::AguardandoCoordenador,
                numero_chamado: None,
                observacoes: None,
                comprovante_em: None,
                criado_por: Uuid::new_v4(),
                criado_em: agora,
                atualizado_em: agora,
            },
            nome_curso: nome_curso.map(|n| n.to_string()),
            consultor_nome: Some("Carlos Lima".to_string()),
            consultor_email: Some("carlos@exemplo.com".to_string()),
        }
    }

    #[test]
    fn slugify_remove_acentos_e_colapsa_separadores() {
        assert_eq!(slugify("Relatório de Solicitações"), "relatorio_de_solicitacoes");
        assert_eq!(slugify("  Fila -- Coordenação  "), "fila_coordenacao");
    }

    #[test]
    fn nome_arquivo_usa_data_iso() {
        let data = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            nome_arquivo("Relatório Geral", "csv", data),
            "relatorio_geral_2025-03-10.csv"
        );
    }

    #[test]
    fn curso_excluido_vira_na() {
        let linhas = montar_linhas(&[detalhada(None)]);
        assert_eq!(linhas[0].curso, "N/A");
        assert_eq!(linhas[0].numero_chamado, "N/A");
    }

    #[test]
    fn csv_inclui_cabecalho_e_valores_formatados() {
        let linhas = montar_linhas(&[detalhada(Some("Direito"))]);
        let bytes = gerar_csv(&linhas).unwrap();
        let texto = String::from_utf8(bytes).unwrap();

        assert!(texto.starts_with("aluno,inscricao,cpf_matricula,curso"));
        assert!(texto.contains("Direito"));
        assert!(texto.contains("R$ 850.00"));
        assert!(texto.contains("10/03/2025"));
    }
}
