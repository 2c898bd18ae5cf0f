// src/services/document_service.rs

use std::path::PathBuf;

use chrono::NaiveDate;
use genpdf::{elements, style, Alignment, Element};

use crate::{
    common::error::AppError,
    models::{inventory::ReorderSuggestion, orders::OrderDetail},
};

// Uma linha da tabela impressa: quantidade sempre em peças
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfRow {
    pub code: String,
    pub description: String,
    pub pieces: i64,
}

#[derive(Clone)]
pub struct DocumentService {
    font_dir: PathBuf,
    font_family: String,
}

impl DocumentService {
    pub fn new(font_dir: impl Into<PathBuf>, font_family: impl Into<String>) -> Self {
        Self {
            font_dir: font_dir.into(),
            font_family: font_family.into(),
        }
    }

    pub fn suggestion_rows(suggestions: &[ReorderSuggestion]) -> Vec<PdfRow> {
        suggestions
            .iter()
            .map(|s| PdfRow {
                code: s.code.clone(),
                description: s.description.clone(),
                pieces: s.suggested_pieces,
            })
            .collect()
    }

    pub fn order_rows(order: &OrderDetail) -> Vec<PdfRow> {
        order
            .lines
            .iter()
            .map(|l| PdfRow {
                code: l.code.clone(),
                description: l.description.clone(),
                pieces: i64::from(l.quantity.max(0)) * i64::from(l.pieces_per_box.max(0)),
            })
            .collect()
    }

    pub fn render(&self, title: &str, rows: &[PdfRow], date: NaiveDate) -> Result<Vec<u8>, AppError> {
        // 1. Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.font_dir, &self.font_family, None)
            .map_err(|_| AppError::FontNotFound(format!("{}/{}", self.font_dir.display(), self.font_family)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(title);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new(title).styled(style::Style::new().bold().with_font_size(16)));
        doc.push(elements::Paragraph::new(format!("Data: {}", date.format("%d/%m/%Y")))
            .styled(style::Style::new().with_font_size(10)));
        doc.push(elements::Break::new(1.5));

        // --- TABELA ---
        // Pesos das colunas: Código (2), Descrição (6), Peças (2)
        let mut table = elements::TableLayout::new(vec![2, 6, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        let mut pieces_header = elements::Paragraph::new("Pezzi");
        pieces_header.set_alignment(Alignment::Right);
        table
            .row()
            .element(elements::Paragraph::new("Codice").styled(style_bold))
            .element(elements::Paragraph::new("Descrizione").styled(style_bold))
            .element(pieces_header.styled(style_bold))
            .push()?;

        for row in rows {
            let mut pieces = elements::Paragraph::new(row.pieces.to_string());
            pieces.set_alignment(Alignment::Right);
            table
                .row()
                .element(elements::Paragraph::new(row.code.clone()))
                .element(elements::Paragraph::new(row.description.clone()))
                .element(pieces)
                .push()?;
        }

        doc.push(table);

        // 2. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)?;
        Ok(buffer)
    }
}
