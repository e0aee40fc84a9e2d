use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PipelineError;
use crate::types::{RawAlarmRow, RawTable};

pub const ALARM_ID_FIELD: &str = "alarm_id";
pub const ALARM_SOURCE_FIELD: &str = "alarm_source";
pub const DURATION_FIELD: &str = "duration";

/// Mapeamento cabeçalho de origem -> campo canônico.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Cabeçalho que vira `alarm_id`.
    pub alarm_id: String,
    /// Cabeçalho que vira `alarm_source`.
    pub alarm_source: String,
    /// Cabeçalho que vira `duration`.
    pub duration: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            alarm_id: "Alarm ID".to_string(),
            alarm_source: "Alarm Source".to_string(),
            duration: "Duration".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Pares (campo canônico, cabeçalho de origem).
    fn fields(&self) -> [(&'static str, &str); 3] {
        [
            (ALARM_ID_FIELD, self.alarm_id.as_str()),
            (ALARM_SOURCE_FIELD, self.alarm_source.as_str()),
            (DURATION_FIELD, self.duration.as_str()),
        ]
    }

    /// Índice da coluna que alimenta o campo: o cabeçalho mapeado ou o próprio nome canônico.
    ///
    /// Se o arquivo trouxer os dois (ex.: `Alarm ID` e `alarm_id`), vale a
    /// coluna mais à esquerda; as demais são ignoradas.
    fn position(headers: &[String], canonical: &str, source: &str) -> Option<usize> {
        headers
            .iter()
            .position(|h| h == source || h == canonical)
    }
}

/// Renomeia as colunas para os campos canônicos e extrai as três colunas exigidas.
///
/// Retorna `PipelineError::Schema` listando os cabeçalhos ausentes.
pub fn normalize(table: &RawTable, mapping: &ColumnMapping) -> Result<Vec<RawAlarmRow>, PipelineError> {
    let mut indices = [0usize; 3];
    let mut missing = Vec::new();

    for (slot, (canonical, source)) in indices.iter_mut().zip(mapping.fields()) {
        match ColumnMapping::position(&table.headers, canonical, source) {
            Some(idx) => *slot = idx,
            None => missing.push(source.to_string()),
        }
    }

    if !missing.is_empty() {
        debug!("Cabeçalhos disponíveis: {:?}", table.headers);
        return Err(PipelineError::Schema { missing });
    }

    let [id_idx, source_idx, duration_idx] = indices;

    Ok(table
        .rows
        .iter()
        .map(|row| RawAlarmRow {
            alarm_id: cell(row, id_idx),
            alarm_source: cell(row, source_idx),
            duration: cell(row, duration_idx),
        })
        .collect())
}

/// Célula ausente (linha curta) vira texto vazio.
fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn renames_default_headers() {
        let t = table(
            &["Site", "Alarm ID", "Duration", "Alarm Source"],
            &[&["x", "100", "0 hours 45 minutes 0 seconds", "A"]],
        );
        let rows = normalize(&t, &ColumnMapping::default()).unwrap();
        assert_eq!(
            rows,
            vec![RawAlarmRow {
                alarm_id: "100".into(),
                alarm_source: "A".into(),
                duration: "0 hours 45 minutes 0 seconds".into(),
            }]
        );
    }

    #[test]
    fn accepts_canonical_headers() {
        let t = table(&["alarm_id", "alarm_source", "duration"], &[&["1", "B", ""]]);
        let rows = normalize(&t, &ColumnMapping::default()).unwrap();
        assert_eq!(rows[0].alarm_source, "B");
    }

    #[test]
    fn short_rows_are_padded() {
        let t = table(&["Alarm ID", "Alarm Source", "Duration"], &[&["100", "A"]]);
        let rows = normalize(&t, &ColumnMapping::default()).unwrap();
        assert_eq!(rows[0].duration, "");
    }

    #[test]
    fn reports_missing_columns() {
        let t = table(&["Alarm ID", "Source"], &[]);
        let err = normalize(&t, &ColumnMapping::default()).unwrap_err();
        match err {
            PipelineError::Schema { missing } => {
                assert_eq!(missing, vec!["Alarm Source".to_string(), "Duration".to_string()])
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn leftmost_matching_column_wins() {
        let t = table(
            &["alarm_id", "Alarm ID", "Alarm Source", "Duration"],
            &[&["1", "2", "A", "1 hours"]],
        );
        let rows = normalize(&t, &ColumnMapping::default()).unwrap();
        assert_eq!(rows[0].alarm_id, "1");

        let t = table(
            &["Alarm ID", "alarm_id", "Alarm Source", "Duration"],
            &[&["1", "2", "A", "1 hours"]],
        );
        let rows = normalize(&t, &ColumnMapping::default()).unwrap();
        assert_eq!(rows[0].alarm_id, "1");
    }

    #[test]
    fn custom_mapping_is_honored() {
        let mapping = ColumnMapping {
            alarm_id: "Código".into(),
            alarm_source: "Origem".into(),
            duration: "Duração".into(),
        };
        let t = table(&["Origem", "Duração", "Código"], &[&["R1", "1 hours", "100"]]);
        let rows = normalize(&t, &mapping).unwrap();
        assert_eq!(rows[0].alarm_id, "100");
        assert_eq!(rows[0].alarm_source, "R1");
    }
}
