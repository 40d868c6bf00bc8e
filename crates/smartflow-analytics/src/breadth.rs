//! 시장 폭 (Market Breadth) 계산기.
//!
//! 상승/하락/보합 종목 수와 신고가/신저가 종목 수로부터
//! A/D 비율, 시장 상태, 변동성, 신뢰도, 직전 대비 추세를 산출합니다.
//!
//! # 상태 기준 (기본값, 강세부터 평가)
//!
//! | 상태          | A/D 비율 | 상승 비중 |
//! |---------------|----------|-----------|
//! | StrongBullish | >= 2.0   | >= 65%    |
//! | Bullish       | >= 1.2   | >= 55%    |
//! | Neutral       | >= 0.8   | >= 40%    |
//! | Bearish       | >= 0.5   | >= 30%    |
//! | StrongBearish | 그 외    |           |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use smartflow_core::{
    BreadthConfig, BreadthInput, BreadthMetrics, BreadthReport, BreadthStatus, BreadthTrend,
    VolatilityLevel,
};
use tracing::debug;

/// 표본 크기별 신뢰도 (종목 수 하한, 점수).
const SAMPLE_CONFIDENCE: [(u64, u32); 3] = [(1000, 40), (500, 30), (100, 20)];
const MIN_SAMPLE_CONFIDENCE: u32 = 10;
/// |A/D - 1| 구간별 신뢰도.
const EXTREMITY_CONFIDENCE: [(Decimal, u32); 3] =
    [(dec!(1), 30), (dec!(0.5), 20), (dec!(0.2), 10)];
const HIGH_LOW_CONFIDENCE: u32 = 20;
const HIGH_LOW_AGREEMENT_CONFIDENCE: u32 = 10;

/// 시장 폭 계산기.
#[derive(Debug, Clone, Default)]
pub struct BreadthCalculator {
    config: BreadthConfig,
}

impl BreadthCalculator {
    /// 새 계산기 생성.
    pub fn new(config: BreadthConfig) -> Self {
        Self { config }
    }

    /// 지표 계산.
    ///
    /// - A/D = 상승 / 하락 (하락 0 & 상승 > 0 이면 999, 둘 다 0이면 0)
    /// - 비중은 거래 종목 수 대비 %, 거래 종목이 없으면 0
    /// - 모든 비율은 소수점 2자리 반올림
    pub fn calculate_metrics(&self, input: &BreadthInput) -> BreadthMetrics {
        let total_traded =
            u64::from(input.advances) + u64::from(input.declines) + u64::from(input.unchanged);

        let ad_ratio = if input.declines == 0 {
            if input.advances > 0 {
                self.config.ad_ratio_sentinel
            } else {
                Decimal::ZERO
            }
        } else {
            (Decimal::from(input.advances) / Decimal::from(input.declines)).round_dp(2)
        };

        let pct = |count: u32| {
            if total_traded == 0 {
                Decimal::ZERO
            } else {
                let share = Decimal::from(count) / Decimal::from(total_traded);
                (share * Decimal::ONE_HUNDRED).round_dp(2)
            }
        };

        let net_new_highs = match (input.new_highs, input.new_lows) {
            (Some(highs), Some(lows)) => i64::from(highs) - i64::from(lows),
            _ => 0,
        };

        BreadthMetrics {
            advances: input.advances,
            declines: input.declines,
            unchanged: input.unchanged,
            total_traded,
            ad_ratio,
            advance_percent: pct(input.advances),
            decline_percent: pct(input.declines),
            unchanged_percent: pct(input.unchanged),
            new_highs: input.new_highs,
            new_lows: input.new_lows,
            net_new_highs,
        }
    }

    /// 시장 상태 판정 (A/D 비율과 상승 비중 모두 충족해야 해당 단계).
    pub fn calculate_status(&self, metrics: &BreadthMetrics) -> BreadthStatus {
        let c = &self.config;
        let tiers = [
            (c.strong_bullish_ratio, c.strong_bullish_advance_pct, BreadthStatus::StrongBullish),
            (c.bullish_ratio, c.bullish_advance_pct, BreadthStatus::Bullish),
            (c.neutral_ratio, c.neutral_advance_pct, BreadthStatus::Neutral),
            (c.bearish_ratio, c.bearish_advance_pct, BreadthStatus::Bearish),
        ];

        tiers
            .into_iter()
            .find(|(ratio, advance_pct, _)| {
                metrics.ad_ratio >= *ratio && metrics.advance_percent >= *advance_pct
            })
            .map(|(_, _, status)| status)
            .unwrap_or(BreadthStatus::StrongBearish)
    }

    /// 변동성 판정.
    ///
    /// 신고가/신저가 데이터가 없으면 A/D 비율 기준만 사용합니다.
    /// 거래 종목이 없으면 Calm.
    pub fn calculate_volatility(&self, metrics: &BreadthMetrics) -> VolatilityLevel {
        let c = &self.config;
        if metrics.total_traded == 0 {
            return VolatilityLevel::Calm;
        }

        let ratio = metrics.ad_ratio;
        let extremes = match (metrics.new_highs, metrics.new_lows) {
            (Some(highs), Some(lows)) => Some(u64::from(highs) + u64::from(lows)),
            _ => None,
        };

        let aggressive_ratio = ratio >= c.aggressive_ratio_high || ratio <= c.aggressive_ratio_low;
        let moderate_ratio = ratio >= c.moderate_ratio_high || ratio <= c.moderate_ratio_low;

        match extremes {
            Some(e) if e >= u64::from(c.aggressive_extremes) => VolatilityLevel::Aggressive,
            _ if aggressive_ratio => VolatilityLevel::Aggressive,
            Some(e) if e >= u64::from(c.moderate_extremes) => VolatilityLevel::Moderate,
            _ if moderate_ratio => VolatilityLevel::Moderate,
            _ => VolatilityLevel::Calm,
        }
    }

    /// 신뢰도 (0 ~ 100).
    ///
    /// 표본 크기(10 ~ 40) + A/D 극단성(0 ~ 30) + 신고가/신저가 데이터(20, 방향 일치 시 +10).
    pub fn calculate_confidence(&self, metrics: &BreadthMetrics) -> u32 {
        let sample = SAMPLE_CONFIDENCE
            .iter()
            .find(|(min, _)| metrics.total_traded >= *min)
            .map(|(_, points)| *points)
            .unwrap_or(MIN_SAMPLE_CONFIDENCE);

        let extremity = (metrics.ad_ratio - Decimal::ONE).abs();
        let ratio_points = EXTREMITY_CONFIDENCE
            .iter()
            .find(|(min, _)| extremity >= *min)
            .map(|(_, points)| *points)
            .unwrap_or(0);

        let mut high_low_points = 0;
        if metrics.has_highs_lows() {
            high_low_points += HIGH_LOW_CONFIDENCE;
            let agrees = (metrics.ad_ratio > Decimal::ONE && metrics.net_new_highs > 0)
                || (metrics.ad_ratio < Decimal::ONE && metrics.net_new_highs < 0);
            if agrees {
                high_low_points += HIGH_LOW_AGREEMENT_CONFIDENCE;
            }
        }

        (sample + ratio_points + high_low_points).min(100)
    }

    /// 직전 A/D 비율 대비 추세.
    pub fn calculate_trend(&self, current: Decimal, previous: Option<Decimal>) -> BreadthTrend {
        let Some(previous) = previous else {
            return BreadthTrend::Stable;
        };
        let delta = current - previous;

        if delta >= self.config.trend_delta {
            BreadthTrend::Improving
        } else if delta <= -self.config.trend_delta {
            BreadthTrend::Deteriorating
        } else {
            BreadthTrend::Stable
        }
    }

    /// 전체 분석.
    pub fn analyze(
        &self,
        input: &BreadthInput,
        previous_ad_ratio: Option<Decimal>,
    ) -> BreadthReport {
        let metrics = self.calculate_metrics(input);
        let status = self.calculate_status(&metrics);
        let volatility = self.calculate_volatility(&metrics);
        let confidence = self.calculate_confidence(&metrics);
        let trend = self.calculate_trend(metrics.ad_ratio, previous_ad_ratio);

        debug!(
            ad_ratio = %metrics.ad_ratio,
            %status,
            %volatility,
            confidence,
            %trend,
            "market breadth analyzed"
        );

        BreadthReport {
            metrics,
            status,
            volatility,
            confidence,
            trend,
        }
    }
}
