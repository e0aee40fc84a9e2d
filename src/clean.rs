//! clean.rs — Coerção por campo e descarte silencioso de linhas inválidas

use tracing::debug;

use crate::duration::duration_to_minutes;
use crate::error::RecordError;
use crate::types::{AlarmRecord, ParsedRecord, RawAlarmRow};

/// Resultado da limpeza: registros válidos e quantidade descartada.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanOutcome {
    pub records: Vec<ParsedRecord>,
    pub dropped: usize,
}

/// Converte o texto do ID em inteiro.
///
/// Aceita inteiros e números finitos (`"100.0"`), truncando a parte decimal.
pub fn coerce_alarm_id(raw: &str) -> Result<i64, RecordError> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        return Ok(id);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() < i64::MAX as f64 => Ok(value.trunc() as i64),
        _ => Err(RecordError::InvalidAlarmId(raw.to_string())),
    }
}

/// Valida uma linha normalizada. Célula de duração vazia é valor ausente.
pub fn parse_record(row: RawAlarmRow) -> Result<ParsedRecord, RecordError> {
    let alarm_id = coerce_alarm_id(&row.alarm_id)?;

    if row.alarm_source.trim().is_empty() {
        return Err(RecordError::MissingSource);
    }
    if row.duration.trim().is_empty() {
        return Err(RecordError::MissingDuration);
    }

    let duration_minutes =
        duration_to_minutes(&row.duration).map_err(|source| RecordError::InvalidDuration {
            raw: row.duration.clone(),
            source,
        })?;

    Ok(ParsedRecord {
        record: AlarmRecord {
            alarm_id,
            alarm_source: row.alarm_source,
            raw_duration: row.duration,
        },
        duration_minutes,
    })
}

/// Filter-map sobre as linhas: `Err` é descartado e apenas contabilizado.
pub fn clean_records<I>(rows: I) -> CleanOutcome
where
    I: IntoIterator<Item = RawAlarmRow>,
{
    let mut outcome = CleanOutcome::default();
    for (line, row) in rows.into_iter().enumerate() {
        match parse_record(row) {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                debug!("Linha {} descartada: {}", line + 1, e);
                outcome.dropped += 1;
            }
        }
    }
    outcome
}
