//! aggregate.rs — Soma de indisponibilidade por origem e cálculo de disponibilidade

use std::collections::BTreeMap;

use crate::duration::minutes_to_hms;
use crate::types::{AvailabilityPolicy, ParsedRecord, SourceAggregate};

/// Mantém só as linhas do alarme alvo com duração mínima.
pub fn filter_records(records: Vec<ParsedRecord>, policy: &AvailabilityPolicy) -> Vec<ParsedRecord> {
    records.into_iter().filter(|r| policy.accepts(r)).collect()
}

/// Disponibilidade (%) na janela, arredondada a 2 casas. Não é limitada a 0.
pub fn availability_percent(downtime_minutes: f64, window_minutes: f64) -> f64 {
    let ratio = (window_minutes - downtime_minutes) / window_minutes;
    round2(ratio * 100.0)
}

/// Meio-termo arredonda para o par (99.125 -> 99.12).
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Agrupa por origem (igualdade exata) e soma os minutos.
///
/// Espera registros já filtrados. Saída ordenada pelo nome da origem.
pub fn aggregate(records: &[ParsedRecord], policy: &AvailabilityPolicy) -> Vec<SourceAggregate> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.alarm_source()).or_insert(0.0) += record.duration_minutes;
    }

    totals
        .into_iter()
        .map(|(source, minutes)| SourceAggregate {
            alarm_source: source.to_string(),
            total_duration_minutes: minutes,
            formatted_downtime: minutes_to_hms(minutes),
            availability_percent: availability_percent(minutes, policy.window_minutes),
        })
        .collect()
}
