//! Tipos de erro do pipeline de disponibilidade.

use std::path::PathBuf;

use thiserror::Error;

use crate::duration::DurationParseError;

/// Motivo de descarte de uma linha individual. Nunca chega ao usuário.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("alarm_id '{0}' não é numérico")]
    InvalidAlarmId(String),
    #[error("alarm_source vazio")]
    MissingSource,
    #[error("duração ausente")]
    MissingDuration,
    #[error("duração '{raw}' inválida: {source}")]
    InvalidDuration {
        raw: String,
        #[source]
        source: DurationParseError,
    },
}

/// Falha ao carregar o arquivo de entrada.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("tipo de arquivo não suportado: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("workbook has no worksheets")]
    NoWorksheet,
}

/// Falha ao gravar a planilha de resultado.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("erro ao gerar xlsx: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("erro de I/O ao gravar {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Erros terminais de uma execução do pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported file type")]
    UnsupportedFormat,
    #[error("Error reading file: {0}")]
    Ingest(IngestError),
    #[error("Missing required columns ({})", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error(
        "No alarms found for Alarm ID {target_alarm_id} with duration >= {min_duration_minutes} minutes."
    )]
    EmptyResult {
        target_alarm_id: i64,
        min_duration_minutes: f64,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<IngestError> for PipelineError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedFormat { .. } => PipelineError::UnsupportedFormat,
            other => PipelineError::Ingest(other),
        }
    }
}
