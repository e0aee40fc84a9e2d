use serde::{Deserialize, Serialize};

/// ID de alarme considerado como indisponibilidade.
pub const TARGET_ALARM_ID: i64 = 100;

/// Duração mínima (minutos) para um alarme contar como indisponibilidade.
pub const MIN_DURATION_MINUTES: f64 = 30.0;

/// Janela de observação: 1 semana em minutos.
pub const WINDOW_MINUTES: f64 = 7.0 * 24.0 * 60.0;

/// Tabela bruta carregada de CSV/planilha (cabeçalho + linhas em texto)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// Linha já normalizada para os campos canônicos, ainda sem coerção
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAlarmRow {
    pub alarm_id: String,
    pub alarm_source: String,
    pub duration: String,
}

/// Struct de alarme com ID já convertido para inteiro
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRecord {
    pub alarm_id: i64,
    pub alarm_source: String,
    pub raw_duration: String,
}

/// Alarme com a duração interpretada em minutos (sempre >= 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub record: AlarmRecord,
    pub duration_minutes: f64,
}

impl ParsedRecord {
    pub fn alarm_id(&self) -> i64 {
        self.record.alarm_id
    }

    pub fn alarm_source(&self) -> &str {
        &self.record.alarm_source
    }
}

/// Agregado de indisponibilidade por origem de alarme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAggregate {
    pub alarm_source: String,
    pub total_duration_minutes: f64,
    pub formatted_downtime: String,
    pub availability_percent: f64,
}

/// Linha de resultado para a camada de apresentação
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub alarm_source: String,
    pub downtime: String,
    pub availability: f64,
}

impl From<&SourceAggregate> for AvailabilityRow {
    fn from(aggregate: &SourceAggregate) -> Self {
        Self {
            alarm_source: aggregate.alarm_source.clone(),
            downtime: aggregate.formatted_downtime.clone(),
            availability: aggregate.availability_percent,
        }
    }
}

/// Parâmetros do filtro e da janela de disponibilidade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityPolicy {
    pub target_alarm_id: i64,
    pub min_duration_minutes: f64,
    pub window_minutes: f64,
}

impl Default for AvailabilityPolicy {
    fn default() -> Self {
        Self {
            target_alarm_id: TARGET_ALARM_ID,
            min_duration_minutes: MIN_DURATION_MINUTES,
            window_minutes: WINDOW_MINUTES,
        }
    }
}

impl AvailabilityPolicy {
    /// Filtro aplicado linha a linha, antes da agregação.
    pub fn accepts(&self, record: &ParsedRecord) -> bool {
        record.alarm_id() == self.target_alarm_id
            && record.duration_minutes >= self.min_duration_minutes
    }
}
