//! 스마트 머니 종합 점수 계산기.
//!
//! 투자자 유형별 개별 점수(0 ~ 50)를 가중 합산하여 0 ~ 100 종합 점수를 산출합니다.
//!
//! # 가중치 (기본값)
//!
//! - **외국인**: 개별 점수 × 1.2 (상한 50)
//! - **기관**: 개별 점수 × 1.0 (상한 50)
//! - **개인 / 자기매매**: 개별 점수 × 0.25 (상한 25), 데이터가 없으면 0
//!
//! 종합 = min(100, min(100, 외국인 + 기관) × 0.8 + (개인 + 자기매매) × 0.2)
//!
//! 스마트 머니가 점수를 결정하고, 개인/자기매매는 확인 용도로만 반영됩니다.

use rust_decimal::Decimal;
use smartflow_core::{CompositeScoreComponents, InvestorAnalysis, ScoringConfig};
use tracing::debug;

/// 종합 점수 계산기.
#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    config: ScoringConfig,
}

impl CompositeScorer {
    /// 새 계산기 생성.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// 투자자 유형 하나의 개별 점수 (0 ~ 50).
    ///
    /// 기본 25점에서 강도(±20 / ±10), 가속 추세(±5),
    /// 5일 누적 수급(|합계| > 200 이면 ±3)을 가감합니다.
    pub fn calculate_individual_score(&self, analysis: &InvestorAnalysis) -> f64 {
        let c = &self.config;
        let mut score = c.individual_base;

        let strength = analysis.signal_strength;
        let direction = f64::from(strength.sign());
        if strength.is_strong() {
            score += direction * c.strong_tier_points;
        } else if strength.is_moderate() {
            score += direction * c.moderate_tier_points;
        }

        score += f64::from(analysis.flow_trend.acceleration_sign()) * c.accelerating_points;

        if analysis.trend_5day.abs() > c.trend_5day_threshold {
            let sign = if analysis.trend_5day > Decimal::ZERO { 1.0 } else { -1.0 };
            score += sign * c.trend_5day_points;
        }

        score.clamp(0.0, c.individual_cap)
    }

    /// 스마트 머니 종합 점수.
    ///
    /// # 인자
    ///
    /// * `foreign` - 외국인 분석
    /// * `institution` - 기관 분석
    /// * `retail` - 개인 분석 (선택)
    /// * `prop` - 자기매매 분석 (선택)
    pub fn calculate_smart_money_score(
        &self,
        foreign: &InvestorAnalysis,
        institution: &InvestorAnalysis,
        retail: Option<&InvestorAnalysis>,
        prop: Option<&InvestorAnalysis>,
    ) -> CompositeScoreComponents {
        let c = &self.config;

        let foreign_score = (self.calculate_individual_score(foreign) * c.foreign_multiplier)
            .clamp(0.0, c.individual_cap);
        let institution_score = (self.calculate_individual_score(institution)
            * c.institution_multiplier)
            .clamp(0.0, c.individual_cap);

        let context_score = |analysis: Option<&InvestorAnalysis>| {
            analysis
                .map(|a| {
                    (self.calculate_individual_score(a) * c.context_multiplier)
                        .clamp(0.0, c.context_cap)
                })
                .unwrap_or(0.0)
        };
        let retail_score = context_score(retail);
        let prop_score = context_score(prop);

        let smart_money_total = (foreign_score + institution_score).min(100.0);
        let context_total = retail_score + prop_score;
        let total_score = (smart_money_total * c.smart_money_weight
            + context_total * c.context_weight)
            .clamp(0.0, 100.0);

        debug!(
            foreign_score,
            institution_score,
            retail_score,
            prop_score,
            total_score,
            "smart money score calculated"
        );

        CompositeScoreComponents {
            foreign_score,
            institution_score,
            retail_score,
            prop_score,
            total_score,
        }
    }
}
