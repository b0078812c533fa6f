use crate::analytics::{
    Consistency, Outcome, RiskPeriod, Severity, Streak, StreakKind, SummaryStatistics, Trend,
    TrendDirection, WeeklyPattern,
};

const HIGH_CONSISTENCY: f64 = 80.0;
const MODERATE_CONSISTENCY: f64 = 60.0;
const MIN_STREAK_INSIGHT: usize = 3;

/// Turns computed analytics into short sentences, in a fixed order:
/// trend, consistency, weekly pattern, risk, streak. Anything that reported
/// insufficient data is skipped.
pub fn generate_insights(
    stats: &SummaryStatistics,
    trend: &Outcome<Trend>,
    consistency: &Outcome<Consistency>,
    weekly: &WeeklyPattern,
    risk_periods: &[RiskPeriod],
    streak: &Streak,
) -> Vec<String> {
    let mut insights = Vec::new();
    if stats.count == 0 {
        return insights;
    }

    if let Some(trend) = trend.value() {
        insights.push(trend_insight(trend.direction).to_string());
    }

    if let Some(consistency) = consistency.value() {
        insights.push(consistency_insight(consistency.score));
    }

    if weekly.reliable {
        if let (Some(best), Some(worst)) = (weekly.best_day, weekly.worst_day) {
            if best != worst {
                insights.push(format!(
                    "You tend to feel best on {best}s and may need extra support on {worst}s."
                ));
            }
        }
    }

    if let Some(insight) = risk_insight(risk_periods) {
        insights.push(insight.to_string());
    }

    if streak.length >= MIN_STREAK_INSIGHT {
        match streak.kind {
            Some(StreakKind::Good) => insights.push(format!(
                "You are on a {}-check-in good mood streak. Keep it going!",
                streak.length
            )),
            Some(StreakKind::Challenging) => insights.push(format!(
                "{} challenging check-ins in a row. This will pass.",
                streak.length
            )),
            None => {}
        }
    }

    insights
}

fn trend_insight(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Improving => {
            "Your mood has been improving over time. Keep up the great work."
        }
        TrendDirection::Declining => {
            "Your mood trend shows a decline. Consider reaching out for support."
        }
        TrendDirection::Stable => "Your mood has been relatively stable over time.",
    }
}

fn consistency_insight(score: f64) -> String {
    if score > HIGH_CONSISTENCY {
        format!("High consistency: your mood patterns are very consistent ({score:.1} score).")
    } else if score > MODERATE_CONSISTENCY {
        format!("Moderate consistency: your mood shows some variation ({score:.1} score).")
    } else {
        format!(
            "High variability: your mood varies significantly ({score:.1} score). \
             This is normal but worth monitoring."
        )
    }
}

fn risk_insight(periods: &[RiskPeriod]) -> Option<&'static str> {
    if periods.iter().any(|period| period.severity == Severity::High) {
        Some("Detected an extended period of low mood. Consider professional support.")
    } else if !periods.is_empty() {
        Some("Detected several consecutive low-mood check-ins. Be gentle with yourself.")
    } else {
        None
    }
}
