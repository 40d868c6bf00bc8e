//! 설정 관리.
//!
//! 분석 엔진의 모든 임계값과 가중치는 [`EngineConfig`] 하나에 모여 있습니다.
//! 시장별 재보정은 코드 수정 없이 TOML 파일이나 환경 변수로 합니다.
//! 금액 임계값의 단위는 백만 바트입니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FlowError, FlowResult};
use crate::logging::LogConfig;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LogConfig,
    /// 분석 엔진 설정
    pub engine: EngineConfig,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값에 환경 변수(`SMARTFLOW__ENGINE__...`)만 적용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> FlowResult<Self> {
        let builder = config::Config::builder()
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("SMARTFLOW")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.engine.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> FlowResult<Self> {
        Self::load("config/default.toml")
    }
}

/// 분석 엔진 설정.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 순매수 강도/추세 분류
    pub classifier: ClassifierConfig,
    /// 신뢰도 및 점수 산출
    pub scoring: ScoringConfig,
    /// 종합 신호/리스크 판정
    pub signal: SignalConfig,
    /// 추세 통계
    pub trend: TrendConfig,
    /// 패턴 감지
    pub pattern: PatternConfig,
    /// 시장 폭
    pub breadth: BreadthConfig,
}

impl EngineConfig {
    /// 설정값의 일관성을 검증합니다.
    pub fn validate(&self) -> FlowResult<()> {
        self.classifier.validate()?;
        self.scoring.validate()?;
        self.signal.validate()?;
        self.trend.validate()?;
        self.pattern.validate()?;
        self.breadth.validate()
    }

    /// TOML 문자열로 직렬화합니다.
    pub fn to_toml_string(&self) -> FlowResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn ensure(condition: bool, message: &str) -> FlowResult<()> {
    if condition {
        Ok(())
    } else {
        Err(FlowError::Config(message.to_string()))
    }
}

/// 순매수 강도/추세 분류 임계값.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// StrongBuy/StrongSell 경계 (닫힌 구간)
    pub strong_threshold: Decimal,
    /// Buy/Sell 경계 (닫힌 구간)
    pub moderate_threshold: Decimal,
    /// 이력 평균 대비 |변화량|이 이 값을 넘으면 가속
    pub accelerating_change: Decimal,
    /// |변화량|이 이 값을 넘으면 유지, 이하이면 둔화
    pub stable_band: Decimal,
    /// 중립 구간에서 매수 둔화/매도 둔화로 재분류하는 변화폭
    pub neutral_shift: Decimal,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strong_threshold: dec!(500),
            moderate_threshold: dec!(100),
            accelerating_change: dec!(100),
            stable_band: dec!(20),
            neutral_shift: dec!(50),
        }
    }
}

impl ClassifierConfig {
    fn validate(&self) -> FlowResult<()> {
        ensure(
            self.moderate_threshold > Decimal::ZERO,
            "classifier.moderate_threshold must be positive",
        )?;
        ensure(
            self.strong_threshold > self.moderate_threshold,
            "classifier.strong_threshold must exceed moderate_threshold",
        )?;
        ensure(
            self.accelerating_change >= Decimal::ZERO
                && self.stable_band >= Decimal::ZERO
                && self.neutral_shift >= Decimal::ZERO,
            "classifier change bands must be non-negative",
        )?;
        ensure(
            self.stable_band <= self.accelerating_change,
            "classifier.stable_band must not exceed accelerating_change",
        )
    }
}

/// 투자자별 신뢰도, 개별 점수, 종합 점수 가중치.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// 5일 통계에 사용할 최근 이력 개수
    pub history_window: usize,

    /// 신뢰도 기본값
    pub base_confidence: f64,
    /// Strong 단계 신뢰도 가산
    pub strong_tier_confidence: f64,
    /// Buy/Sell 단계 신뢰도 가산
    pub moderate_tier_confidence: f64,
    /// 가속 추세 신뢰도 가산
    pub accelerating_confidence: f64,
    /// 유지 추세 신뢰도 가산
    pub stable_confidence: f64,
    /// 대규모 수급 기준
    pub large_flow_threshold: Decimal,
    /// 대규모 수급 신뢰도 가산
    pub large_flow_confidence: f64,
    /// 중규모 수급 기준
    pub medium_flow_threshold: Decimal,
    /// 중규모 수급 신뢰도 가산
    pub medium_flow_confidence: f64,

    /// 개별 점수 기본값
    pub individual_base: f64,
    /// Strong 단계 점수 가감
    pub strong_tier_points: f64,
    /// Buy/Sell 단계 점수 가감
    pub moderate_tier_points: f64,
    /// 가속 추세 점수 가감
    pub accelerating_points: f64,
    /// 5일 누적 수급 기준
    pub trend_5day_threshold: Decimal,
    /// 5일 누적 수급 점수 가감
    pub trend_5day_points: f64,
    /// 개별 점수 상한
    pub individual_cap: f64,

    /// 외국인 점수 배수 (태국 시장에서 외국인 수급 영향력이 큼)
    pub foreign_multiplier: f64,
    /// 기관 점수 배수
    pub institution_multiplier: f64,
    /// 개인/자기매매 점수 배수
    pub context_multiplier: f64,
    /// 개인/자기매매 점수 상한
    pub context_cap: f64,
    /// 종합 점수 중 스마트 머니 비중
    pub smart_money_weight: f64,
    /// 종합 점수 중 개인/자기매매 비중
    pub context_weight: f64,

    /// 외국인/기관 방향 일치 시 신뢰도 가산
    pub agreement_bonus: f64,
    /// 외국인/기관 방향 충돌 시 신뢰도 차감
    pub conflict_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            history_window: 5,

            base_confidence: 50.0,
            strong_tier_confidence: 25.0,
            moderate_tier_confidence: 15.0,
            accelerating_confidence: 15.0,
            stable_confidence: 10.0,
            large_flow_threshold: dec!(1000),
            large_flow_confidence: 10.0,
            medium_flow_threshold: dec!(500),
            medium_flow_confidence: 5.0,

            individual_base: 25.0,
            strong_tier_points: 20.0,
            moderate_tier_points: 10.0,
            accelerating_points: 5.0,
            trend_5day_threshold: dec!(200),
            trend_5day_points: 3.0,
            individual_cap: 50.0,

            foreign_multiplier: 1.2,
            institution_multiplier: 1.0,
            context_multiplier: 0.25,
            context_cap: 25.0,
            smart_money_weight: 0.8,
            context_weight: 0.2,

            agreement_bonus: 10.0,
            conflict_penalty: 15.0,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> FlowResult<()> {
        ensure(self.history_window > 0, "scoring.history_window must be at least 1")?;
        ensure(
            self.individual_cap > 0.0 && self.context_cap > 0.0,
            "scoring caps must be positive",
        )?;
        ensure(
            [
                self.foreign_multiplier,
                self.institution_multiplier,
                self.context_multiplier,
                self.smart_money_weight,
                self.context_weight,
            ]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0),
            "scoring multipliers and weights must be finite and non-negative",
        )?;
        ensure(
            self.large_flow_threshold >= self.medium_flow_threshold,
            "scoring.large_flow_threshold must not be below medium_flow_threshold",
        )
    }
}

/// 종합 신호, 리스크 레짐, 주도 세력 판정 기준.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    /// 외국인 + 기관 합계 StrongBuy/StrongSell 기준
    pub combined_strong_threshold: Decimal,
    /// 외국인 + 기관 합계 Buy/Sell 기준
    pub combined_threshold: Decimal,

    /// RiskOn 최소 점수 (StrongBuy와 함께)
    pub risk_on_score: f64,
    /// RiskOnMild 최소 점수 (Buy와 함께)
    pub risk_on_mild_score: f64,
    /// RiskOff 최대 점수 (StrongSell과 함께)
    pub risk_off_score: f64,
    /// RiskOffMild 최대 점수 (Sell과 함께)
    pub risk_off_mild_score: f64,

    /// 점수 기반 StrongBuy 기준
    pub strong_buy_score: f64,
    /// 점수 기반 Buy 기준
    pub buy_score: f64,
    /// 점수 기반 StrongSell 기준
    pub strong_sell_score: f64,
    /// 점수 기반 Sell 기준
    pub sell_score: f64,
    /// 근거 문구 최대 개수
    pub max_evidence: usize,

    /// 주도 세력 판정 배수 (1위 / 2위)
    pub driver_dominance_ratio: Decimal,
    /// 주도 세력 최소 수급
    pub driver_min_flow: Decimal,

    /// 자기매매 순매도가 이 값보다 작으면 "매도 축소"로 해석
    pub prop_easing_threshold: Decimal,
    /// 관찰 문구 최대 개수
    pub max_observations: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            combined_strong_threshold: dec!(600),
            combined_threshold: dec!(100),

            risk_on_score: 70.0,
            risk_on_mild_score: 60.0,
            risk_off_score: 30.0,
            risk_off_mild_score: 40.0,

            strong_buy_score: 70.0,
            buy_score: 55.0,
            strong_sell_score: 30.0,
            sell_score: 45.0,
            max_evidence: 3,

            driver_dominance_ratio: dec!(1.5),
            driver_min_flow: dec!(500),

            prop_easing_threshold: dec!(200),
            max_observations: 4,
        }
    }
}

impl SignalConfig {
    fn validate(&self) -> FlowResult<()> {
        ensure(
            self.combined_strong_threshold > self.combined_threshold
                && self.combined_threshold > Decimal::ZERO,
            "signal combined thresholds must satisfy strong > moderate > 0",
        )?;
        ensure(
            self.strong_sell_score <= self.sell_score
                && self.sell_score < self.buy_score
                && self.buy_score <= self.strong_buy_score,
            "signal score bands must be ordered strong_sell <= sell < buy <= strong_buy",
        )?;
        ensure(
            self.driver_dominance_ratio >= Decimal::ONE,
            "signal.driver_dominance_ratio must be at least 1",
        )
    }
}

/// 추세 통계 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrendConfig {
    /// 상승/하락 판정 OLS 기울기 (백만 바트/일)
    pub slope_threshold: f64,
    /// 추세 강도 계산 최소 포인트 수
    pub min_points: usize,
    /// 데이터 부족/횡보 시 추세 강도
    pub neutral_strength: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            slope_threshold: 50.0,
            min_points: 3,
            neutral_strength: 50.0,
        }
    }
}

impl TrendConfig {
    fn validate(&self) -> FlowResult<()> {
        ensure(
            self.slope_threshold >= 0.0,
            "trend.slope_threshold must be non-negative",
        )?;
        ensure(
            (0.0..=100.0).contains(&self.neutral_strength),
            "trend.neutral_strength must be within 0..=100",
        )
    }
}

/// 개별 패턴 규칙의 강도/참여 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunRuleConfig {
    /// 최소 연속 일수
    pub min_run: usize,
    /// 일수당 강도 가중치
    pub strength_weight: f64,
    /// 누적 수급 강도 환산 단위
    pub flow_scale: f64,
    /// 이 값 미만의 누적 수급은 "참여 없음"
    pub participation_threshold: Decimal,
}

impl RunRuleConfig {
    fn new(min_run: usize, strength_weight: f64, flow_scale: f64, participation: Decimal) -> Self {
        Self {
            min_run,
            strength_weight,
            flow_scale,
            participation_threshold: participation,
        }
    }

    fn validate(&self, name: &str) -> FlowResult<()> {
        if self.min_run == 0 || self.flow_scale <= 0.0 || self.strength_weight < 0.0 {
            return Err(FlowError::Config(format!(
                "pattern.{}: min_run must be >= 1, flow_scale > 0, strength_weight >= 0",
                name
            )));
        }
        Ok(())
    }
}

/// 패턴 감지 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternConfig {
    /// 괴리 판정 시 스마트 머니/개인 최소 수급
    pub divergence_min_flow: Decimal,
    /// FOMO/패닉 판정 개인 수급 기준
    pub retail_extreme_flow: Decimal,
    /// 방향 전환 전 최소 선행 구간 일수
    pub reversal_prior_run: usize,
    /// 방향 전환 후 일별 최소 수급
    pub reversal_min_flow: Decimal,
    /// 전체 수급 중 이 비중 이상이면 "주도"
    pub driving_share: f64,

    /// 매집
    pub accumulation: RunRuleConfig,
    /// 분산
    pub distribution: RunRuleConfig,
    /// 괴리
    pub divergence: RunRuleConfig,
    /// 개인 추격 매수
    pub fomo: RunRuleConfig,
    /// 개인 투매
    pub panic: RunRuleConfig,
    /// 방향 전환
    pub reversal: RunRuleConfig,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            divergence_min_flow: dec!(100),
            retail_extreme_flow: dec!(500),
            reversal_prior_run: 3,
            reversal_min_flow: dec!(100),
            driving_share: 0.35,

            accumulation: RunRuleConfig::new(3, 15.0, 100.0, dec!(100)),
            distribution: RunRuleConfig::new(3, 15.0, 100.0, dec!(100)),
            divergence: RunRuleConfig::new(2, 20.0, 50.0, dec!(100)),
            fomo: RunRuleConfig::new(2, 20.0, 100.0, dec!(200)),
            panic: RunRuleConfig::new(2, 20.0, 100.0, dec!(200)),
            reversal: RunRuleConfig::new(2, 15.0, 100.0, dec!(100)),
        }
    }
}

impl PatternConfig {
    fn validate(&self) -> FlowResult<()> {
        self.accumulation.validate("accumulation")?;
        self.distribution.validate("distribution")?;
        self.divergence.validate("divergence")?;
        self.fomo.validate("fomo")?;
        self.panic.validate("panic")?;
        self.reversal.validate("reversal")?;
        ensure(
            self.reversal_prior_run > 0,
            "pattern.reversal_prior_run must be at least 1",
        )?;
        ensure(
            self.driving_share > 0.0 && self.driving_share <= 1.0,
            "pattern.driving_share must be within (0, 1]",
        )
    }
}

/// 시장 폭 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BreadthConfig {
    /// 하락 종목이 없을 때의 A/D 비율
    pub ad_ratio_sentinel: Decimal,

    /// StrongBullish (A/D, 상승 %)
    pub strong_bullish_ratio: Decimal,
    pub strong_bullish_advance_pct: Decimal,
    /// Bullish (A/D, 상승 %)
    pub bullish_ratio: Decimal,
    pub bullish_advance_pct: Decimal,
    /// Neutral (A/D, 상승 %)
    pub neutral_ratio: Decimal,
    pub neutral_advance_pct: Decimal,
    /// Bearish (A/D, 상승 %), 미달이면 StrongBearish
    pub bearish_ratio: Decimal,
    pub bearish_advance_pct: Decimal,

    /// Aggressive: 신고가 + 신저가
    pub aggressive_extremes: u32,
    /// Aggressive: A/D 상단 / 하단
    pub aggressive_ratio_high: Decimal,
    pub aggressive_ratio_low: Decimal,
    /// Moderate: 신고가 + 신저가
    pub moderate_extremes: u32,
    /// Moderate: A/D 상단 / 하단
    pub moderate_ratio_high: Decimal,
    pub moderate_ratio_low: Decimal,

    /// 직전 대비 A/D 변화 기준
    pub trend_delta: Decimal,
}

impl Default for BreadthConfig {
    fn default() -> Self {
        Self {
            ad_ratio_sentinel: dec!(999),

            strong_bullish_ratio: dec!(2.0),
            strong_bullish_advance_pct: dec!(65),
            bullish_ratio: dec!(1.2),
            bullish_advance_pct: dec!(55),
            neutral_ratio: dec!(0.8),
            neutral_advance_pct: dec!(40),
            bearish_ratio: dec!(0.5),
            bearish_advance_pct: dec!(30),

            aggressive_extremes: 100,
            aggressive_ratio_high: dec!(3.0),
            aggressive_ratio_low: dec!(0.33),
            moderate_extremes: 40,
            moderate_ratio_high: dec!(1.8),
            moderate_ratio_low: dec!(0.55),

            trend_delta: dec!(0.2),
        }
    }
}

impl BreadthConfig {
    fn validate(&self) -> FlowResult<()> {
        ensure(
            self.strong_bullish_ratio >= self.bullish_ratio
                && self.bullish_ratio >= self.neutral_ratio
                && self.neutral_ratio >= self.bearish_ratio,
            "breadth status ratios must be ordered from most bullish to most bearish",
        )?;
        ensure(
            self.aggressive_ratio_low <= self.moderate_ratio_low
                && self.moderate_ratio_high <= self.aggressive_ratio_high,
            "breadth volatility ratio bands must nest",
        )?;
        ensure(
            self.trend_delta >= Decimal::ZERO,
            "breadth.trend_delta must be non-negative",
        )
    }
}
