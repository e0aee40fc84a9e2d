//! duration.rs — Conversão entre texto "X hours Y minutes Z seconds" e minutos
//!
//! O parser consome pares `valor unidade` separados por espaço. Unidades
//! desconhecidas são ignoradas; a última ocorrência de cada unidade vence.

use thiserror::Error;

/// Falha ao interpretar uma string de duração.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DurationParseError {
    #[error("valor '{value}' sem unidade correspondente")]
    MissingUnit { value: String },
    #[error("valor '{0}' não é um inteiro")]
    InvalidValue(String),
    #[error("duração total negativa ({0} min)")]
    NegativeTotal(f64),
    #[error("duração excede o limite numérico")]
    Overflow,
}

/// Converte `"0 hours 10 minutes 2 seconds"` em minutos totais.
///
/// Segundos entram como fração de minuto (`s / 60`). Entrada vazia ou só
/// com espaços retorna `0.0` (não é erro).
pub fn duration_to_minutes(input: &str) -> Result<f64, DurationParseError> {
    let lowered = input.to_lowercase();
    let parts: Vec<&str> = lowered.split_whitespace().collect();

    let (mut hours, mut minutes, mut seconds) = (0i64, 0i64, 0i64);

    for pair in parts.chunks(2) {
        let value: i64 = pair[0]
            .parse()
            .map_err(|_| DurationParseError::InvalidValue(pair[0].to_string()))?;
        let Some(unit) = pair.get(1) else {
            return Err(DurationParseError::MissingUnit {
                value: pair[0].to_string(),
            });
        };

        if unit.contains("hour") {
            hours = value;
        } else if unit.contains("minute") {
            minutes = value;
        } else if unit.contains("second") {
            seconds = value;
        }
    }

    let whole = hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .ok_or(DurationParseError::Overflow)?;

    // Componentes podem ser negativos; só o total precisa ser >= 0.
    let total = whole as f64 + seconds as f64 / 60.0;
    if total < 0.0 {
        return Err(DurationParseError::NegativeTotal(total));
    }
    Ok(total)
}

/// Formata minutos como `"<H> hours <M> minutes <S> seconds"`.
///
/// Trabalha sobre segundos inteiros (fração de segundo é descartada). Horas
/// não são limitadas a 24.
pub fn minutes_to_hms(total_minutes: f64) -> String {
    let total_seconds = whole_seconds(total_minutes);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours} hours {minutes} minutes {seconds} seconds")
}

fn whole_seconds(total_minutes: f64) -> u64 {
    if !total_minutes.is_finite() || total_minutes <= 0.0 {
        return 0;
    }
    let seconds = total_minutes * 60.0;
    // Ruído de ponto flutuante (ex.: 2/60*60 = 1.9999999) não perde um segundo.
    let nearest = seconds.round();
    if (seconds - nearest).abs() < 1e-6 {
        nearest as u64
    } else {
        seconds.floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_full_duration() {
        let minutes = duration_to_minutes("1 hours 30 minutes 30 seconds").unwrap();
        assert_eq!(minutes, 90.5);
    }

    #[test]
    fn parses_subset_and_any_order() {
        assert_eq!(duration_to_minutes("45 minutes").unwrap(), 45.0);
        assert_eq!(duration_to_minutes("30 seconds 2 hours").unwrap(), 120.5);
        assert_eq!(duration_to_minutes("1 Hour 1 MINUTE").unwrap(), 61.0);
    }

    #[test]
    fn last_occurrence_wins() {
        assert_eq!(duration_to_minutes("5 minutes 7 minutes").unwrap(), 7.0);
    }

    #[test]
    fn unknown_units_are_ignored() {
        assert_eq!(duration_to_minutes("3 days 10 minutes").unwrap(), 10.0);
    }

    #[test]
    fn empty_input_is_zero_not_error() {
        assert_eq!(duration_to_minutes("").unwrap(), 0.0);
        assert_eq!(duration_to_minutes("   \t ").unwrap(), 0.0);
    }

    #[test]
    fn non_numeric_input_fails() {
        assert_eq!(
            duration_to_minutes("abc"),
            Err(DurationParseError::InvalidValue("abc".into()))
        );
        assert!(duration_to_minutes("x minutes").is_err());
        assert!(duration_to_minutes("1.5 hours").is_err());
    }

    #[test]
    fn dangling_value_fails() {
        assert_eq!(
            duration_to_minutes("1 hours 5"),
            Err(DurationParseError::MissingUnit { value: "5".into() })
        );
    }

    #[test]
    fn negative_total_fails() {
        assert_eq!(
            duration_to_minutes("-5 minutes"),
            Err(DurationParseError::NegativeTotal(-5.0))
        );
        assert!(duration_to_minutes("1 hours -61 minutes").is_err());
    }

    #[test]
    fn mixed_sign_components_sum_up() {
        assert_eq!(duration_to_minutes("2 hours -10 minutes").unwrap(), 110.0);
        assert_eq!(duration_to_minutes("1 minutes -30 seconds").unwrap(), 0.5);
    }

    #[test]
    fn huge_hours_overflow() {
        let input = format!("{} hours", i64::MAX);
        assert_eq!(duration_to_minutes(&input), Err(DurationParseError::Overflow));
    }

    #[test]
    fn formats_zero() {
        assert_eq!(minutes_to_hms(0.0), "0 hours 0 minutes 0 seconds");
    }

    #[test]
    fn formats_without_wrapping_hours() {
        assert_eq!(minutes_to_hms(1500.0), "25 hours 0 minutes 0 seconds");
        assert_eq!(minutes_to_hms(90.5), "1 hours 30 minutes 30 seconds");
    }

    #[test]
    fn formatting_discards_sub_second() {
        // 10 minutos + 2.5 segundos
        assert_eq!(minutes_to_hms(10.0 + 2.5 / 60.0), "0 hours 10 minutes 2 seconds");
    }

    #[test]
    fn formatting_absorbs_float_noise() {
        let minutes = duration_to_minutes("0 hours 10 minutes 2 seconds").unwrap();
        assert_eq!(minutes_to_hms(minutes), "0 hours 10 minutes 2 seconds");
    }

    #[test]
    fn negative_formats_as_zero() {
        assert_eq!(minutes_to_hms(-3.0), "0 hours 0 minutes 0 seconds");
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

        #[test]
        fn canonical_duration_is_exact(h in 0i64..10_000, m in 0i64..60, s in 0i64..60) {
            let input = format!("{h} hours {m} minutes {s} seconds");
            let expected = (h * 60 + m) as f64 + s as f64 / 60.0;
            prop_assert_eq!(duration_to_minutes(&input).unwrap(), expected);
        }

        #[test]
        fn format_is_idempotent_under_reparse(x in 0.0f64..1_000_000.0) {
            let first = minutes_to_hms(x);
            let reparsed = duration_to_minutes(&first).unwrap();
            prop_assert_eq!(minutes_to_hms(reparsed), first);
        }

        #[test]
        fn formatted_components_stay_in_range(x in 0.0f64..1_000_000.0) {
            let text = minutes_to_hms(x);
            let parts: Vec<u64> = text
                .split_whitespace()
                .step_by(2)
                .map(|p| p.parse().unwrap())
                .collect();
            prop_assert!(parts[1] < 60);
            prop_assert!(parts[2] < 60);
        }
    }
}
