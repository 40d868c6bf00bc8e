//! 투자자 유형별 분석기.
//!
//! 분류기 결과와 최근 5일 이력을 묶어 [`InvestorAnalysis`]를 만들고 신뢰도를 계산합니다.

use rust_decimal::Decimal;
use smartflow_core::{
    FlowRecord, FlowTrend, InvestorAnalysis, InvestorCategory, ScoringConfig, SignalStrength,
};
use tracing::trace;

use crate::classifier::FlowClassifier;

/// 투자자 유형별 분석기.
///
/// # 신뢰도
///
/// 기본 50점에서 시작하여:
/// - Strong 단계 +25, Buy/Sell 단계 +15
/// - 가속 추세 +15, 유지 추세 +10
/// - |순매수| > 1000 이면 +10, > 500 이면 +5
///
/// 최종값은 0 ~ 100으로 제한됩니다.
#[derive(Debug, Clone, Default)]
pub struct InvestorScorer {
    classifier: FlowClassifier,
    config: ScoringConfig,
}

impl InvestorScorer {
    /// 새 분석기 생성.
    pub fn new(classifier: FlowClassifier, config: ScoringConfig) -> Self {
        Self { classifier, config }
    }

    /// 한 투자자 유형의 당일 수급 분석.
    ///
    /// # 인자
    ///
    /// * `category` - 투자자 유형
    /// * `today_flow` - 당일 수급
    /// * `historical_flows` - 과거 수급 (시간순, 당일 제외). 비어 있어도 됩니다
    pub fn score_investor_signal(
        &self,
        category: InvestorCategory,
        today_flow: &FlowRecord,
        historical_flows: &[FlowRecord],
    ) -> InvestorAnalysis {
        let today_net = today_flow.net;
        let history_nets: Vec<Decimal> = historical_flows.iter().map(|f| f.net).collect();

        let signal_strength = self.classifier.classify_signal_strength(today_net);
        let flow_trend = self.classifier.detect_flow_trend(today_net, &history_nets);

        // 최근 N일 (시간순이므로 뒤에서부터)
        let window_start = history_nets.len().saturating_sub(self.config.history_window);
        let recent = &history_nets[window_start..];
        let trend_5day: Decimal = recent.iter().sum();
        let avg_5day = if recent.is_empty() {
            Decimal::ZERO
        } else {
            trend_5day / Decimal::from(recent.len())
        };

        let confidence = self.calculate_confidence(signal_strength, flow_trend, today_net);

        trace!(
            %category,
            %today_net,
            %signal_strength,
            %flow_trend,
            confidence,
            "investor signal scored"
        );

        InvestorAnalysis {
            category,
            today_net,
            signal_strength,
            flow_trend,
            confidence,
            trend_5day,
            avg_5day,
            vs_average: today_net - avg_5day,
        }
    }

    /// 강도, 추세, 수급 규모로부터 신뢰도 계산 (0 ~ 100).
    pub fn calculate_confidence(
        &self,
        strength: SignalStrength,
        trend: FlowTrend,
        net_flow: Decimal,
    ) -> f64 {
        let c = &self.config;
        let mut confidence = c.base_confidence;

        if strength.is_strong() {
            confidence += c.strong_tier_confidence;
        } else if strength.is_moderate() {
            confidence += c.moderate_tier_confidence;
        }

        if trend.is_accelerating() {
            confidence += c.accelerating_confidence;
        } else if trend.is_stable() {
            confidence += c.stable_confidence;
        }

        let magnitude = net_flow.abs();
        if magnitude > c.large_flow_threshold {
            confidence += c.large_flow_confidence;
        } else if magnitude > c.medium_flow_threshold {
            confidence += c.medium_flow_confidence;
        }

        confidence.clamp(0.0, 100.0)
    }
}
