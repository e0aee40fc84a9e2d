//! ingest.rs — Carrega CSV (Latin-1) ou planilha (xls/xlsx) como tabela de texto
//!
//! Linhas malformadas são ignoradas: CSV com campos a mais é descartado,
//! campos a menos são completados com vazio, linhas em branco são puladas.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::types::RawTable;

/// Formatos de entrada suportados, decididos pela extensão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Spreadsheet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("xls") | Some("xlsx") => Ok(FileFormat::Spreadsheet),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Lê o arquivo conforme a extensão.
pub fn load_table(path: &Path) -> Result<RawTable, IngestError> {
    let format = FileFormat::from_path(path)?;
    let table = match format {
        FileFormat::Csv => read_csv(&std::fs::read(path)?)?,
        FileFormat::Spreadsheet => read_spreadsheet(path)?,
    };
    info!(
        "Arquivo {} carregado ({:?}): {} colunas, {} linhas",
        path.display(),
        format,
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Interpreta bytes CSV em Latin-1. A primeira linha é o cabeçalho.
pub fn read_csv(bytes: &[u8]) -> Result<RawTable, IngestError> {
    // Latin-1 mapeia cada byte diretamente para o code point de mesmo valor.
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();
    let mut rows = Vec::new();

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!("CSV: linha {} ignorada: {}", line + 2, e);
                continue;
            }
        };
        if record.len() > width {
            debug!(
                "CSV: linha {} ignorada ({} campos, esperado {})",
                line + 2,
                record.len(),
                width
            );
            continue;
        }
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

/// Lê a primeira aba da planilha. A primeira linha é o cabeçalho.
pub fn read_spreadsheet(path: &Path) -> Result<RawTable, IngestError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)??;

    let mut lines = range.rows();
    let headers: Vec<String> = match lines.next() {
        Some(cells) => cells.iter().map(cell_text).collect(),
        None => return Ok(RawTable::default()),
    };

    let rows = lines
        .map(|cells| cells.iter().map(cell_text).collect::<Vec<String>>())
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
        other => other.to_string(),
    }
}
