//! pipeline.rs — Orquestra ingestão, normalização, limpeza, filtro, agregação e exportação

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{aggregate, filter_records};
use crate::clean::clean_records;
use crate::error::PipelineError;
use crate::export::write_report;
use crate::ingest::load_table;
use crate::schema::{ColumnMapping, normalize};
use crate::types::{AvailabilityPolicy, AvailabilityRow, RawTable, SourceAggregate};

/// Resultado de uma execução completa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub sources: Vec<SourceAggregate>,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub rows_matched: usize,
}

impl Report {
    /// Linhas no formato da camada de apresentação.
    pub fn display_rows(&self) -> Vec<AvailabilityRow> {
        self.sources.iter().map(AvailabilityRow::from).collect()
    }
}

/// Executa o pipeline sobre uma tabela já carregada. Não toca em disco.
pub fn analyze(
    table: &RawTable,
    mapping: &ColumnMapping,
    policy: &AvailabilityPolicy,
) -> Result<Report, PipelineError> {
    let rows = normalize(table, mapping)?;
    let rows_read = rows.len();

    let cleaned = clean_records(rows);
    let matched = filter_records(cleaned.records, policy);

    info!(
        "Linhas lidas: {}, descartadas: {}, dentro do filtro (ID {}, >= {} min): {}",
        rows_read,
        cleaned.dropped,
        policy.target_alarm_id,
        policy.min_duration_minutes,
        matched.len()
    );

    if matched.is_empty() {
        warn!("Nenhum alarme restou após o filtro");
        return Err(PipelineError::EmptyResult {
            target_alarm_id: policy.target_alarm_id,
            min_duration_minutes: policy.min_duration_minutes,
        });
    }

    Ok(Report {
        sources: aggregate(&matched, policy),
        rows_read,
        rows_dropped: cleaned.dropped,
        rows_matched: matched.len(),
    })
}

/// Lê `input`, agrega e grava a planilha em `output`.
///
/// A planilha só é escrita após a agregação ter sucesso.
pub fn process_file(
    input: &Path,
    output: &Path,
    mapping: &ColumnMapping,
    policy: &AvailabilityPolicy,
) -> Result<Report, PipelineError> {
    let table = load_table(input)?;
    let report = analyze(&table, mapping, policy)?;
    write_report(&report.sources, output)?;
    Ok(report)
}
