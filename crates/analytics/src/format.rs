use crate::report::{CalculationResult, MetricValue, Trend};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Formats a money amount as `$1,234.56`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

/// Formats an integer with thousands separators.
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// Formats a percentage with an explicit sign, e.g. `+50.00%`.
pub fn format_percent(pct: Decimal) -> String {
    if pct < Decimal::ZERO {
        format!("{:.2}%", pct)
    } else {
        format!("+{:.2}%", pct.abs())
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metric = &self.metric;
        match &self.value {
            MetricValue::Currency { amount } => {
                write!(f, "{}: {}", metric, format_currency(*amount))
            }
            MetricValue::Count { count, unit } => {
                write!(f, "{}: {} {}", metric, format_count(*count), unit)
            }
            MetricValue::Ranking { limit, entries } => {
                writeln!(f, "{} (Top {}):", metric, limit)?;
                writeln!(f)?;
                for entry in entries {
                    writeln!(f, "{}. {}: {}", entry.rank, entry.label, format_currency(entry.value))?;
                }
                Ok(())
            }
            MetricValue::Breakdown { entries: groups } | MetricValue::TimeSeries { points: groups } => {
                writeln!(f, "{}:", metric)?;
                writeln!(f)?;
                for group in groups {
                    writeln!(f, "- {}: {}", group.label, format_currency(group.value))?;
                }
                Ok(())
            }
            MetricValue::Growth(growth) => {
                writeln!(f, "{}:", metric)?;
                writeln!(f)?;
                writeln!(f, "Latest month ({}): {}", growth.latest_period, format_currency(growth.latest))?;
                writeln!(
                    f,
                    "Previous month ({}): {}",
                    growth.previous_period,
                    format_currency(growth.previous)
                )?;
                writeln!(f, "Growth rate: {}", format_percent(growth.growth_pct))?;
                writeln!(f)?;
                match growth.trend {
                    Trend::Positive => write!(f, "📈 Positive growth"),
                    Trend::Negative => write!(f, "📉 Negative growth"),
                    Trend::Flat => write!(f, "➡️ No change"),
                }
            }
        }
    }
}

impl CalculationResult {
    /// A single-line rendering of the value, used for table cells.
    pub fn summary(&self) -> String {
        match &self.value {
            MetricValue::Currency { amount } => format_currency(*amount),
            MetricValue::Count { count, unit } => format!("{} {}", format_count(*count), unit),
            MetricValue::Ranking { entries, .. } => entries
                .iter()
                .map(|e| format!("{}. {} {}", e.rank, e.label, format_currency(e.value)))
                .collect::<Vec<_>>()
                .join("; "),
            MetricValue::Breakdown { entries: groups } | MetricValue::TimeSeries { points: groups } => groups
                .iter()
                .map(|g| format!("{} {}", g.label, format_currency(g.value)))
                .collect::<Vec<_>>()
                .join("; "),
            MetricValue::Growth(growth) => format!(
                "{} ({} vs {})",
                format_percent(growth.growth_pct),
                growth.latest_period,
                growth.previous_period
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{GroupTotal, GrowthComparison, RankedEntry};
    use rust_decimal_macros::dec;

    fn result(value: MetricValue) -> CalculationResult {
        CalculationResult {
            metric: "m".to_string(),
            period: "all".to_string(),
            value,
        }
    }

    #[test]
    fn currency_uses_separators_and_cents() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(999.5)), "$999.50");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(657.575)), "$657.58");
        assert_eq!(format_currency(dec!(-1000)), "-$1,000.00");
    }

    #[test]
    fn counts_and_percentages() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(123456), "123,456");
        assert_eq!(format_percent(dec!(50)), "+50.00%");
        assert_eq!(format_percent(dec!(-33.33)), "-33.33%");
        assert_eq!(format_percent(dec!(0)), "+0.00%");
    }

    #[test]
    fn ranking_text() {
        let text = result(MetricValue::Ranking {
            limit: 5,
            entries: vec![
                RankedEntry { rank: 1, label: "Laptop".into(), value: dec!(6400) },
                RankedEntry { rank: 2, label: "Mouse".into(), value: dec!(175.75) },
            ],
        })
        .to_string();
        assert_eq!(text, "m (Top 5):\n\n1. Laptop: $6,400.00\n2. Mouse: $175.75\n");
    }

    #[test]
    fn breakdown_text() {
        let text = result(MetricValue::Breakdown {
            entries: vec![GroupTotal { label: "Online".into(), value: dec!(12) }],
        })
        .to_string();
        assert_eq!(text, "m:\n\n- Online: $12.00\n");
    }

    #[test]
    fn growth_text() {
        let text = result(MetricValue::Growth(GrowthComparison {
            latest_period: "2024-02".into(),
            latest: dec!(150),
            previous_period: "2024-01".into(),
            previous: dec!(100),
            growth_pct: dec!(50.00),
            trend: Trend::Positive,
        }))
        .to_string();
        assert!(text.contains("Latest month (2024-02): $150.00\n"));
        assert!(text.contains("Previous month (2024-01): $100.00\n"));
        assert!(text.contains("Growth rate: +50.00%\n"));
        assert!(text.ends_with("📈 Positive growth"));
    }

    #[test]
    fn summary_is_single_line() {
        let summary = result(MetricValue::Count { count: 1500, unit: "transactions".into() }).summary();
        assert_eq!(summary, "1,500 transactions");
    }
}
