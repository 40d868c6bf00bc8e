//! 전체 신뢰도 집계.
//!
//! 외국인/기관 신뢰도의 평균에 두 주체의 방향 일치(+10)/충돌(-15)을 반영합니다.

use smartflow_core::{InvestorAnalysis, ScoringConfig};
use tracing::trace;

/// 신뢰도 집계기.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceAggregator {
    config: ScoringConfig,
}

impl ConfidenceAggregator {
    /// 새 집계기 생성.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// 전체 신뢰도 (0 ~ 100).
    ///
    /// 방향 계열은 당일 순매수 부호로 판단합니다. 한쪽이 0이면 가감하지 않습니다.
    /// 개인/자기매매 분석은 받기만 하고 값에는 반영하지 않습니다.
    pub fn calculate_overall_confidence(
        &self,
        foreign: &InvestorAnalysis,
        institution: &InvestorAnalysis,
        retail: Option<&InvestorAnalysis>,
        prop: Option<&InvestorAnalysis>,
    ) -> f64 {
        let base = (foreign.confidence + institution.confidence) / 2.0;

        let foreign_dir = foreign.direction();
        let institution_dir = institution.direction();

        let adjusted = if foreign_dir.agrees_with(institution_dir) {
            base + self.config.agreement_bonus
        } else if foreign_dir.conflicts_with(institution_dir) {
            base - self.config.conflict_penalty
        } else {
            base
        };

        trace!(
            base,
            adjusted,
            retail_confidence = ?retail.map(|a| a.confidence),
            prop_confidence = ?prop.map(|a| a.confidence),
            "overall confidence aggregated"
        );

        adjusted.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use smartflow_core::{FlowTrend, InvestorCategory, SignalStrength};

    fn analysis(net: Decimal, confidence: f64) -> InvestorAnalysis {
        InvestorAnalysis {
            category: InvestorCategory::Foreign,
            today_net: net,
            signal_strength: SignalStrength::Neutral,
            flow_trend: FlowTrend::Neutral,
            confidence,
            trend_5day: Decimal::ZERO,
            avg_5day: Decimal::ZERO,
            vs_average: Decimal::ZERO,
        }
    }

    #[test]
    fn test_agreement_bonus() {
        let agg = ConfidenceAggregator::default();
        let result = agg.calculate_overall_confidence(
            &analysis(dec!(300), 70.0),
            &analysis(dec!(150), 60.0),
            None,
            None,
        );
        assert_eq!(result, 75.0);
    }

    #[test]
    fn test_conflict_penalty() {
        let agg = ConfidenceAggregator::default();
        let result = agg.calculate_overall_confidence(
            &analysis(dec!(-600), 90.0),
            &analysis(dec!(50), 50.0),
            None,
            None,
        );
        assert_eq!(result, 55.0);
    }

    #[test]
    fn test_flat_side_is_unchanged() {
        let agg = ConfidenceAggregator::default();
        let result = agg.calculate_overall_confidence(
            &analysis(dec!(-600), 90.0),
            &analysis(Decimal::ZERO, 50.0),
            None,
            None,
        );
        assert_eq!(result, 70.0);
    }

    #[test]
    fn test_clamped_to_range() {
        let agg = ConfidenceAggregator::default();
        let high = agg.calculate_overall_confidence(
            &analysis(dec!(900), 100.0),
            &analysis(dec!(900), 100.0),
            None,
            None,
        );
        assert_eq!(high, 100.0);

        let low = agg.calculate_overall_confidence(
            &analysis(dec!(900), 5.0),
            &analysis(dec!(-900), 5.0),
            None,
            None,
        );
        assert_eq!(low, 0.0);
    }

    #[test]
    fn test_context_categories_do_not_change_value() {
        let agg = ConfidenceAggregator::default();
        let foreign = analysis(dec!(300), 70.0);
        let institution = analysis(dec!(150), 60.0);
        let retail = analysis(dec!(-900), 10.0);

        let without = agg.calculate_overall_confidence(&foreign, &institution, None, None);
        let with =
            agg.calculate_overall_confidence(&foreign, &institution, Some(&retail), Some(&retail));
        assert_eq!(without, with);
    }
}
