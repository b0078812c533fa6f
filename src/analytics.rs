//! Mood history analytics.
//!
//! Every function here is a pure transformation of a borrowed history slice.
//! Nothing is cached between calls and the input is never reordered, so
//! index-based measures (recent average, trend, risk periods, streak) follow
//! the order the caller supplies. Records are assumed to be validated at the
//! ingestion boundary: moods lie in `1..=10` and timestamps are real dates.

use crate::insights::generate_insights;
use crate::models::CheckIn;
use chrono::{Datelike, NaiveDate, Timelike};
use serde::Serialize;

pub const RECENT_WINDOW: usize = 7;
pub const MIN_TREND_ENTRIES: usize = 2;
pub const MIN_CONSISTENCY_ENTRIES: usize = 2;
pub const MIN_WEEKLY_ENTRIES: usize = 7;
pub const MIN_IMPROVEMENT_ENTRIES: usize = 7;
pub const MIN_FORECAST_ENTRIES: usize = 5;
pub const DEFAULT_FORECAST_DAYS: usize = 7;

/// Slope magnitude (mood points per check-in) separating a stable trend from a moving one.
pub const TREND_THRESHOLD: f64 = 0.1;

pub const LOW_MOOD_THRESHOLD: u8 = 4;
pub const MIN_RISK_RUN: usize = 3;
pub const HIGH_SEVERITY_RUN: usize = 5;
pub const GOOD_MOOD_THRESHOLD: u8 = 6;

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Result of a computation that needs a minimum history length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ready { value: T },
    InsufficientData { required: usize, available: usize },
}

impl<T> Outcome<T> {
    fn gate(available: usize, required: usize, compute: impl FnOnce() -> T) -> Self {
        if available < required {
            Outcome::InsufficientData {
                required,
                available,
            }
        } else {
            Outcome::Ready { value: compute() }
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ready { value } => Some(value),
            Outcome::InsufficientData { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub average: Option<f64>,
    pub min: Option<u8>,
    pub max: Option<u8>,
    pub recent_average: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl TrendDirection {
    pub fn from_slope(slope: f64) -> Self {
        if slope > TREND_THRESHOLD {
            TrendDirection::Improving
        } else if slope < -TREND_THRESHOLD {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub slope: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consistency {
    pub score: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAverage {
    pub day: &'static str,
    pub average: f64,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPattern {
    pub days: Vec<DayAverage>,
    pub best_day: Option<&'static str>,
    pub worst_day: Option<&'static str>,
    /// False below `MIN_WEEKLY_ENTRIES` check-ins; the averages are still reported.
    pub reliable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthAverage {
    pub month: u32,
    pub name: &'static str,
    pub average: f64,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPattern {
    pub months: Vec<MonthAverage>,
    pub best_month: Option<u32>,
    pub worst_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourAverage {
    pub hour: u32,
    pub average: f64,
    pub entries: usize,
}

/// Mean mood per hour of day. Check-ins recorded as a bare date sit at hour 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPattern {
    pub hours: Vec<HourAverage>,
    pub best_hour: Option<u32>,
    pub worst_hour: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPeriod {
    pub start_index: usize,
    pub duration: usize,
    pub severity: Severity,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    Good,
    Challenging,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Streak {
    pub length: usize,
    pub kind: Option<StreakKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub predictions: Vec<f64>,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAverages {
    pub energy: Option<f64>,
    pub stress: Option<f64>,
    pub sleep: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodReport {
    pub summary: SummaryStatistics,
    pub trend: Outcome<Trend>,
    pub consistency: Outcome<Consistency>,
    pub weekly_pattern: WeeklyPattern,
    pub monthly_pattern: MonthlyPattern,
    pub hourly_pattern: HourlyPattern,
    pub risk_periods: Vec<RiskPeriod>,
    pub streak: Streak,
    pub improvement_rate: Outcome<f64>,
    pub metrics: MetricAverages,
    pub insights: Vec<String>,
}

pub fn analyze(history: &[CheckIn]) -> MoodReport {
    let summary = summary_statistics(history);
    let trend = trend(history);
    let consistency = consistency_score(history);
    let weekly_pattern = weekly_pattern(history);
    let risk_periods = risk_periods(history, LOW_MOOD_THRESHOLD, MIN_RISK_RUN);
    let streak = current_streak(history, GOOD_MOOD_THRESHOLD);
    let insights = generate_insights(
        &summary,
        &trend,
        &consistency,
        &weekly_pattern,
        &risk_periods,
        &streak,
    );

    MoodReport {
        monthly_pattern: monthly_pattern(history),
        hourly_pattern: hourly_pattern(history),
        improvement_rate: improvement_rate(history),
        metrics: metric_averages(history),
        summary,
        trend,
        consistency,
        weekly_pattern,
        risk_periods,
        streak,
        insights,
    }
}

pub fn summary_statistics(history: &[CheckIn]) -> SummaryStatistics {
    let count = history.len();
    let recent = &history[count - count.min(RECENT_WINDOW)..];

    SummaryStatistics {
        count,
        average: mean(&moods(history)),
        min: history.iter().map(|entry| entry.mood).min(),
        max: history.iter().map(|entry| entry.mood).max(),
        recent_average: mean(&moods(recent)),
    }
}

/// Least-squares slope of mood against 0-based sequence position.
pub fn trend(history: &[CheckIn]) -> Outcome<Trend> {
    Outcome::gate(history.len(), MIN_TREND_ENTRIES, || {
        let (slope, _) = linear_fit(&moods(history));
        Trend {
            slope,
            direction: TrendDirection::from_slope(slope),
        }
    })
}

/// `100 - 10 * sample standard deviation`, clamped to `0..=100`.
pub fn consistency_score(history: &[CheckIn]) -> Outcome<Consistency> {
    Outcome::gate(history.len(), MIN_CONSISTENCY_ENTRIES, || {
        let std_dev = sample_std_dev(&moods(history));
        Consistency {
            score: (100.0 - 10.0 * std_dev).clamp(0.0, 100.0),
            std_dev,
        }
    })
}

pub fn weekly_pattern(history: &[CheckIn]) -> WeeklyPattern {
    let buckets = bucket_means::<7>(history, |entry| {
        entry.timestamp.weekday().num_days_from_monday() as usize
    });
    let extremes = extremes(&buckets);

    WeeklyPattern {
        days: buckets
            .iter()
            .map(|bucket| DayAverage {
                day: DAY_NAMES[bucket.slot],
                average: bucket.average,
                entries: bucket.entries,
            })
            .collect(),
        best_day: extremes.map(|(best, _)| DAY_NAMES[best]),
        worst_day: extremes.map(|(_, worst)| DAY_NAMES[worst]),
        reliable: history.len() >= MIN_WEEKLY_ENTRIES,
    }
}

pub fn monthly_pattern(history: &[CheckIn]) -> MonthlyPattern {
    let buckets = bucket_means::<12>(history, |entry| entry.timestamp.month0() as usize);
    let extremes = extremes(&buckets);

    MonthlyPattern {
        months: buckets
            .iter()
            .map(|bucket| MonthAverage {
                month: bucket.slot as u32 + 1,
                name: MONTH_NAMES[bucket.slot],
                average: bucket.average,
                entries: bucket.entries,
            })
            .collect(),
        best_month: extremes.map(|(best, _)| best as u32 + 1),
        worst_month: extremes.map(|(_, worst)| worst as u32 + 1),
    }
}

pub fn hourly_pattern(history: &[CheckIn]) -> HourlyPattern {
    let buckets = bucket_means::<24>(history, |entry| entry.timestamp.hour() as usize);
    let extremes = extremes(&buckets);

    HourlyPattern {
        hours: buckets
            .iter()
            .map(|bucket| HourAverage {
                hour: bucket.slot as u32,
                average: bucket.average,
                entries: bucket.entries,
            })
            .collect(),
        best_hour: extremes.map(|(best, _)| best as u32),
        worst_hour: extremes.map(|(_, worst)| worst as u32),
    }
}

/// Maximal runs of at least `min_run` consecutive entries with `mood <= low_threshold`.
pub fn risk_periods(history: &[CheckIn], low_threshold: u8, min_run: usize) -> Vec<RiskPeriod> {
    let mut periods = Vec::new();
    let mut run_start: Option<usize> = None;

    for (index, entry) in history.iter().enumerate() {
        let low = entry.mood <= low_threshold;
        match (low, run_start) {
            (true, None) => run_start = Some(index),
            (false, Some(start)) => {
                close_run(&mut periods, history, start, index, min_run);
                run_start = None;
            }
            _ => {}
        }
    }

    // a run still open at the end of the history counts too
    if let Some(start) = run_start {
        close_run(&mut periods, history, start, history.len(), min_run);
    }

    periods
}

fn close_run(
    periods: &mut Vec<RiskPeriod>,
    history: &[CheckIn],
    start: usize,
    end: usize,
    min_run: usize,
) {
    let duration = end - start;
    if duration == 0 || duration < min_run {
        return;
    }

    periods.push(RiskPeriod {
        start_index: start,
        duration,
        severity: if duration >= HIGH_SEVERITY_RUN {
            Severity::High
        } else {
            Severity::Medium
        },
        start_date: history[start].date(),
        end_date: history[end - 1].date(),
    });
}

/// Consecutive entries, counted back from the latest, on the same side of
/// `good_threshold` as the latest entry.
pub fn current_streak(history: &[CheckIn], good_threshold: u8) -> Streak {
    let Some(last) = history.last() else {
        return Streak {
            length: 0,
            kind: None,
        };
    };

    let good = last.mood >= good_threshold;
    let length = history
        .iter()
        .rev()
        .take_while(|entry| (entry.mood >= good_threshold) == good)
        .count();

    Streak {
        length,
        kind: Some(if good {
            StreakKind::Good
        } else {
            StreakKind::Challenging
        }),
    }
}

/// Percent change between the mean of the last seven and the first seven
/// check-ins. The windows overlap for histories shorter than fourteen.
pub fn improvement_rate(history: &[CheckIn]) -> Outcome<f64> {
    Outcome::gate(history.len(), MIN_IMPROVEMENT_ENTRIES, || {
        let values = moods(history);
        let earlier = mean(&values[..RECENT_WINDOW]).unwrap_or_default();
        let recent = mean(&values[values.len() - RECENT_WINDOW..]).unwrap_or_default();
        if earlier == 0.0 {
            0.0
        } else {
            (recent - earlier) / earlier * 100.0
        }
    })
}

/// Extends the trend line over the next `days` positions, clamped to the mood scale.
pub fn forecast(history: &[CheckIn], days: usize) -> Outcome<Forecast> {
    Outcome::gate(history.len(), MIN_FORECAST_ENTRIES, || {
        let (slope, intercept) = linear_fit(&moods(history));
        let start = history.len();
        let predictions: Vec<f64> = (start..start + days)
            .map(|position| (intercept + slope * position as f64).clamp(1.0, 10.0))
            .collect();
        Forecast {
            average: mean(&predictions),
            predictions,
        }
    })
}

pub fn metric_averages(history: &[CheckIn]) -> MetricAverages {
    let field_mean = |pick: fn(&CheckIn) -> Option<u8>| {
        let values: Vec<f64> = history
            .iter()
            .filter_map(pick)
            .map(f64::from)
            .collect();
        mean(&values)
    };

    MetricAverages {
        energy: field_mean(|entry| entry.energy),
        stress: field_mean(|entry| entry.stress),
        sleep: field_mean(|entry| entry.sleep),
    }
}

struct Bucket {
    slot: usize,
    average: f64,
    entries: usize,
}

fn bucket_means<const N: usize>(
    history: &[CheckIn],
    slot: impl Fn(&CheckIn) -> usize,
) -> Vec<Bucket> {
    let mut sums = [0u64; N];
    let mut counts = [0usize; N];
    for entry in history {
        let index = slot(entry);
        sums[index] += u64::from(entry.mood);
        counts[index] += 1;
    }

    (0..N)
        .filter(|&index| counts[index] > 0)
        .map(|index| Bucket {
            slot: index,
            average: sums[index] as f64 / counts[index] as f64,
            entries: counts[index],
        })
        .collect()
}

/// Best and worst slots; ties go to the earliest slot.
fn extremes(buckets: &[Bucket]) -> Option<(usize, usize)> {
    let (first, rest) = buckets.split_first()?;
    let mut best = first;
    let mut worst = first;
    for bucket in rest {
        if bucket.average > best.average {
            best = bucket;
        }
        if bucket.average < worst.average {
            worst = bucket;
        }
    }
    Some((best.slot, worst.slot))
}

fn moods(history: &[CheckIn]) -> Vec<f64> {
    history.iter().map(|entry| f64::from(entry.mood)).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std_dev(values: &[f64]) -> f64 {
    let Some(avg) = mean(values) else {
        return 0.0;
    };
    if values.len() < 2 {
        return 0.0;
    }
    let squares: f64 = values.iter().map(|value| (value - avg).powi(2)).sum();
    (squares / (values.len() - 1) as f64).sqrt()
}

/// Returns `(slope, intercept)` of the least-squares line through `(index, value)`.
fn linear_fit(values: &[f64]) -> (f64, f64) {
    let Some(y_mean) = mean(values) else {
        return (0.0, 0.0);
    };
    let x_mean = (values.len() - 1) as f64 / 2.0;

    let mut covariance = 0.0;
    let mut spread = 0.0;
    for (index, value) in values.iter().enumerate() {
        let dx = index as f64 - x_mean;
        covariance += dx * (value - y_mean);
        spread += dx * dx;
    }

    let slope = if spread == 0.0 { 0.0 } else { covariance / spread };
    (slope, y_mean - slope * x_mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};

    fn day(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    // one check-in per day starting Monday 2026-01-05
    fn daily(moods: &[u8]) -> Vec<CheckIn> {
        let start = day(2026, 1, 5);
        moods
            .iter()
            .enumerate()
            .map(|(offset, &mood)| CheckIn::new(start + Duration::days(offset as i64), mood))
            .collect()
    }

    #[test]
    fn summary_of_empty_history_has_no_values() {
        let summary = summary_statistics(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, None);
        assert_eq!(summary.min, None);
        assert_eq!(summary.max, None);
        assert_eq!(summary.recent_average, None);
    }

    #[test]
    fn summary_recent_average_uses_last_seven_in_input_order() {
        let history = daily(&[10, 10, 1, 2, 3, 4, 5, 6, 7]);
        let summary = summary_statistics(&history);
        assert_eq!(summary.count, 9);
        assert_eq!(summary.average, Some(48.0 / 9.0));
        assert_eq!(summary.min, Some(1));
        assert_eq!(summary.max, Some(10));
        assert_eq!(summary.recent_average, Some(4.0));

        let short = daily(&[6, 8]);
        assert_eq!(summary_statistics(&short).recent_average, Some(7.0));
    }

    #[test]
    fn flat_low_history() {
        let history = daily(&[3; 7]);

        let consistency = consistency_score(&history);
        assert_eq!(consistency.value().map(|c| c.score), Some(100.0));

        let trend = trend(&history);
        let trend = trend.value().unwrap();
        assert_eq!(trend.slope, 0.0);
        assert_eq!(trend.direction, TrendDirection::Stable);

        let periods = risk_periods(&history, LOW_MOOD_THRESHOLD, MIN_RISK_RUN);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start_index, 0);
        assert_eq!(periods[0].duration, 7);
        assert_eq!(periods[0].severity, Severity::High);
        assert_eq!(periods[0].end_date, NaiveDate::from_ymd_opt(2026, 1, 11).unwrap());
    }

    #[test]
    fn single_low_run_between_good_days() {
        let history = daily(&[8, 8, 8, 2, 2, 2, 2, 8, 8]);
        let periods = risk_periods(&history, LOW_MOOD_THRESHOLD, MIN_RISK_RUN);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start_index, 3);
        assert_eq!(periods[0].duration, 4);
        assert_eq!(periods[0].severity, Severity::Medium);
    }

    #[test]
    fn trailing_low_run_is_flushed() {
        let history = daily(&[7, 1, 4, 9, 2, 3, 4, 1, 2]);
        let periods = risk_periods(&history, LOW_MOOD_THRESHOLD, MIN_RISK_RUN);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start_index, 4);
        assert_eq!(periods[0].duration, 5);
        assert_eq!(periods[0].severity, Severity::High);
    }

    #[test]
    fn separate_runs_are_reported_in_order() {
        let history = daily(&[3, 3, 3, 6, 4, 4, 4, 4, 7, 2, 2]);
        let periods = risk_periods(&history, LOW_MOOD_THRESHOLD, MIN_RISK_RUN);
        let starts: Vec<(usize, usize)> = periods
            .iter()
            .map(|p| (p.start_index, p.duration))
            .collect();
        assert_eq!(starts, vec![(0, 3), (4, 4)]);
    }

    #[test]
    fn risk_thresholds_are_configurable() {
        let history = daily(&[5, 7, 2, 8, 5, 5, 9]);

        let singles = risk_periods(&history, LOW_MOOD_THRESHOLD, 1);
        let runs: Vec<(usize, usize)> = singles
            .iter()
            .map(|p| (p.start_index, p.duration))
            .collect();
        assert_eq!(runs, vec![(2, 1)]);
        assert_eq!(singles[0].severity, Severity::Medium);

        let looser = risk_periods(&history, 5, 1);
        let runs: Vec<(usize, usize)> = looser
            .iter()
            .map(|p| (p.start_index, p.duration))
            .collect();
        assert_eq!(runs, vec![(0, 1), (2, 1), (4, 2)]);

        let pairs = risk_periods(&history, 5, 2);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].start_index, 4);
        assert_eq!(pairs[0].end_date, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
    }

    #[test]
    fn increasing_history_is_improving() {
        let history = daily(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let trend = trend(&history);
        let trend = trend.value().unwrap();
        assert!((trend.slope - 1.0).abs() < 1e-12);
        assert_eq!(trend.direction, TrendDirection::Improving);

        let declining = daily(&[9, 7, 6, 4]);
        assert_eq!(
            super::trend(&declining).value().map(|t| t.direction),
            Some(TrendDirection::Declining)
        );
    }

    #[test]
    fn length_gated_measures_report_insufficient_data() {
        let single = daily(&[5]);
        assert_eq!(
            trend(&single),
            Outcome::InsufficientData {
                required: 2,
                available: 1
            }
        );
        assert!(!consistency_score(&single).is_ready());
        assert!(!improvement_rate(&daily(&[5; 6])).is_ready());
        assert!(!forecast(&daily(&[5; 4]), 7).is_ready());
        assert!(!trend(&[]).is_ready());
    }

    #[test]
    fn consistency_uses_sample_deviation() {
        let history = daily(&[2, 4, 4, 4, 5, 5, 7, 9]);
        let consistency = consistency_score(&history);
        let consistency = consistency.value().unwrap();
        let expected_sd = (32.0f64 / 7.0).sqrt();
        assert!((consistency.std_dev - expected_sd).abs() < 1e-12);
        assert!((consistency.score - (100.0 - 10.0 * expected_sd)).abs() < 1e-9);

        let wild = daily(&[1, 10, 1, 10, 1, 10]);
        let score = consistency_score(&wild).value().unwrap().score;
        assert!(score > 50.0 && score < 51.0);
    }

    #[test]
    fn streak_counts_back_from_latest() {
        let mut history = daily(&[5, 7, 8, 9]);
        let streak = current_streak(&history, GOOD_MOOD_THRESHOLD);
        assert_eq!(streak.length, 3);
        assert_eq!(streak.kind, Some(StreakKind::Good));

        let next = history.last().unwrap().timestamp + Duration::days(1);
        history.push(CheckIn::new(next, 4));
        let streak = current_streak(&history, GOOD_MOOD_THRESHOLD);
        assert_eq!(streak.length, 1);
        assert_eq!(streak.kind, Some(StreakKind::Challenging));

        let empty = current_streak(&[], GOOD_MOOD_THRESHOLD);
        assert_eq!(empty.length, 0);
        assert_eq!(empty.kind, None);
    }

    #[test]
    fn weekly_pattern_reports_only_observed_days() {
        let history = vec![
            CheckIn::new(day(2026, 1, 5), 4),
            CheckIn::new(day(2026, 1, 7), 9),
            CheckIn::new(day(2026, 1, 12), 6),
        ];
        let pattern = weekly_pattern(&history);
        let days: Vec<(&str, f64)> = pattern.days.iter().map(|d| (d.day, d.average)).collect();
        assert_eq!(days, vec![("Monday", 5.0), ("Wednesday", 9.0)]);
        assert_eq!(pattern.best_day, Some("Wednesday"));
        assert_eq!(pattern.worst_day, Some("Monday"));
        assert!(!pattern.reliable);
        assert!(weekly_pattern(&daily(&[5; 7])).reliable);
    }

    #[test]
    fn pattern_ties_go_to_earliest_slot() {
        let history = vec![
            CheckIn::new(day(2026, 1, 6), 7),
            CheckIn::new(day(2026, 1, 5), 7),
        ];
        let weekly = weekly_pattern(&history);
        assert_eq!(weekly.best_day, Some("Monday"));
        assert_eq!(weekly.worst_day, Some("Monday"));

        let monthly = monthly_pattern(&[
            CheckIn::new(day(2026, 3, 2), 6),
            CheckIn::new(day(2026, 1, 2), 6),
        ]);
        assert_eq!(monthly.best_month, Some(1));
        assert_eq!(monthly.worst_month, Some(1));
    }

    #[test]
    fn monthly_pattern_groups_by_calendar_month() {
        let history = vec![
            CheckIn::new(day(2026, 1, 30), 4),
            CheckIn::new(day(2026, 1, 31), 6),
            CheckIn::new(day(2026, 3, 1), 8),
            CheckIn::new(day(2027, 1, 3), 8),
        ];
        let pattern = monthly_pattern(&history);
        let months: Vec<(u32, &str, f64, usize)> = pattern
            .months
            .iter()
            .map(|m| (m.month, m.name, m.average, m.entries))
            .collect();
        assert_eq!(months, vec![(1, "Jan", 6.0, 3), (3, "Mar", 8.0, 1)]);
        assert_eq!(pattern.best_month, Some(3));
        assert_eq!(pattern.worst_month, Some(1));
        assert!(monthly_pattern(&[]).months.is_empty());
    }

    #[test]
    fn hourly_pattern_groups_by_time_of_day() {
        let at = |d: u32, h: u32, m: u32| {
            NaiveDate::from_ymd_opt(2026, 1, d)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap()
        };
        let history = vec![
            CheckIn::new(at(5, 8, 15), 4),
            CheckIn::new(at(6, 8, 50), 6),
            CheckIn::new(at(6, 21, 0), 9),
            CheckIn::new(at(7, 0, 0), 3),
        ];
        let pattern = hourly_pattern(&history);
        let hours: Vec<(u32, f64, usize)> = pattern
            .hours
            .iter()
            .map(|h| (h.hour, h.average, h.entries))
            .collect();
        assert_eq!(hours, vec![(0, 3.0, 1), (8, 5.0, 2), (21, 9.0, 1)]);
        assert_eq!(pattern.best_hour, Some(21));
        assert_eq!(pattern.worst_hour, Some(0));

        let empty = hourly_pattern(&[]);
        assert!(empty.hours.is_empty());
        assert_eq!(empty.best_hour, None);
        assert_eq!(analyze(&history).hourly_pattern, pattern);
    }

    #[test]
    fn improvement_rate_compares_first_and_last_week() {
        let history = daily(&[4, 4, 4, 4, 4, 4, 4, 6, 6, 6, 6, 6, 6, 6]);
        assert_eq!(improvement_rate(&history).value().copied(), Some(50.0));
    }

    #[test]
    fn forecast_extends_trend_and_clamps() {
        let history = daily(&[6, 7, 8, 9, 10]);
        let outcome = forecast(&history, 3);
        let forecast = outcome.value().unwrap();
        assert_eq!(forecast.predictions, vec![10.0, 10.0, 10.0]);
        assert_eq!(forecast.average, Some(10.0));

        let flat = daily(&[5; 5]);
        let outcome = super::forecast(&flat, DEFAULT_FORECAST_DAYS);
        assert_eq!(outcome.value().unwrap().predictions, vec![5.0; 7]);
    }

    #[test]
    fn metric_averages_skip_missing_fields() {
        let mut history = daily(&[5, 6, 7]);
        history[0].energy = Some(4);
        history[2].energy = Some(8);
        history[1].sleep = Some(9);
        let metrics = metric_averages(&history);
        assert_eq!(metrics.energy, Some(6.0));
        assert_eq!(metrics.stress, None);
        assert_eq!(metrics.sleep, Some(9.0));
    }

    #[test]
    fn repeated_analysis_is_identical() {
        let history = daily(&[6, 3, 2, 2, 8, 9, 4, 7, 5, 6, 10, 1]);
        let first = serde_json::to_string(&analyze(&history)).unwrap();
        let second = serde_json::to_string(&analyze(&history)).unwrap();
        assert_eq!(first, second);
        assert_eq!(history.len(), 12);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(trend(&daily(&[5]))).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["required"], 2);
        assert_eq!(json["available"], 1);

        let json = serde_json::to_value(trend(&daily(&[5, 5]))).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["value"]["direction"], "stable");
    }
}
