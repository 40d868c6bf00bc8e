//! 스마트 머니 분석 엔진 (진입점).
//!
//! 일간 수급 시계열 하나로 전체 분석 파이프라인을 실행합니다.
//!
//! ```text
//! DailyFlow[] ─┬─ InvestorScorer ─┬─ CompositeScorer ──┐
//!              │                  └─ ConfidenceAggregator ─┴─ SignalGenerator
//!              └─ TrendAnalyzer / PatternDetector
//! ```
//!
//! 시계열은 시간순(과거 → 최근)이며 마지막 날이 "당일"입니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smartflow_core::{
    flow_span, BreadthInput, BreadthReport, CombinedSignal, CompositeScoreComponents, DailyFlow,
    DetectedPattern, EngineConfig, FlowError, FlowRecord, FlowResult, InvestorAnalysis,
    InvestorCategory, InvestorTrend, PrimaryDriver, RiskSignal, SmartMoneySignal,
};
use tracing::info;

use crate::breadth::BreadthCalculator;
use crate::classifier::FlowClassifier;
use crate::composite_scorer::CompositeScorer;
use crate::confidence::ConfidenceAggregator;
use crate::investor_scorer::InvestorScorer;
use crate::patterns::PatternDetector;
use crate::signal_generator::SignalGenerator;
use crate::trend_analyzer::TrendAnalyzer;

/// 전체 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartMoneyReport {
    /// 분석 기준일 (시계열 마지막 날)
    pub date: NaiveDate,
    /// 시계열 일수
    pub days: usize,
    /// 외국인 분석
    pub foreign: InvestorAnalysis,
    /// 기관 분석
    pub institution: InvestorAnalysis,
    /// 개인 분석 (당일 데이터가 있을 때)
    pub retail: Option<InvestorAnalysis>,
    /// 자기매매 분석 (당일 데이터가 있을 때)
    pub proprietary: Option<InvestorAnalysis>,
    /// 종합 점수
    pub scores: CompositeScoreComponents,
    /// 전체 신뢰도 (0 ~ 100)
    pub confidence: f64,
    /// 외국인 + 기관 순매수 기반 종합 신호
    pub combined_signal: CombinedSignal,
    /// Risk-On/Off 레짐
    pub risk_signal: RiskSignal,
    /// 점수 기반 신호와 근거
    pub smart_money_signal: SmartMoneySignal,
    /// 수급 주도 세력
    pub primary_driver: PrimaryDriver,
    /// 관찰 문구
    pub observations: Vec<String>,
    /// 투자자 유형별 추세
    pub trends: Vec<InvestorTrend>,
    /// 감지된 패턴 (강도 내림차순)
    pub patterns: Vec<DetectedPattern>,
}

/// 스마트 머니 분석 엔진.
#[derive(Debug, Clone)]
pub struct SmartMoneyEngine {
    scorer: InvestorScorer,
    composite: CompositeScorer,
    confidence: ConfidenceAggregator,
    signals: SignalGenerator,
    trends: TrendAnalyzer,
    patterns: PatternDetector,
    breadth: BreadthCalculator,
}

impl SmartMoneyEngine {
    /// 설정을 검증하고 엔진 생성.
    pub fn new(config: EngineConfig) -> FlowResult<Self> {
        config.validate()?;

        let classifier = FlowClassifier::new(config.classifier.clone());
        Ok(Self {
            scorer: InvestorScorer::new(classifier, config.scoring.clone()),
            composite: CompositeScorer::new(config.scoring.clone()),
            confidence: ConfidenceAggregator::new(config.scoring.clone()),
            signals: SignalGenerator::new(config.signal.clone()),
            trends: TrendAnalyzer::new(config.trend.clone()),
            patterns: PatternDetector::new(config.pattern.clone()),
            breadth: BreadthCalculator::new(config.breadth.clone()),
        })
    }

    /// 전체 분석 실행.
    ///
    /// # 오류
    ///
    /// - 빈 시계열
    /// - 음수 매수/매도 금액
    /// - 날짜가 오름차순이 아닌 시계열
    pub fn analyze(&self, series: &[DailyFlow]) -> FlowResult<SmartMoneyReport> {
        let span = flow_span!("smart_money_analyze", series.len());
        let _enter = span.enter();

        let (today, history) = validate_series(series)?;

        let foreign = self.score(InvestorCategory::Foreign, &today.foreign, history);
        let institution = self.score(InvestorCategory::Institution, &today.institution, history);
        let retail = today
            .retail
            .as_ref()
            .map(|record| self.score(InvestorCategory::Retail, record, history));
        let proprietary = today
            .proprietary
            .as_ref()
            .map(|record| self.score(InvestorCategory::Proprietary, record, history));

        let scores = self.composite.calculate_smart_money_score(
            &foreign,
            &institution,
            retail.as_ref(),
            proprietary.as_ref(),
        );
        let confidence = self.confidence.calculate_overall_confidence(
            &foreign,
            &institution,
            retail.as_ref(),
            proprietary.as_ref(),
        );

        let combined_signal = self.signals.generate_combined_signal(&foreign, &institution);
        let risk_signal = self.signals.generate_risk_on_off_signal(combined_signal, &scores);
        let smart_money_signal = self.signals.generate_smart_money_signal(&scores, confidence);
        let primary_driver = self.signals.detect_primary_driver(
            &foreign,
            &institution,
            retail.as_ref(),
            proprietary.as_ref(),
        );
        let observations = self.signals.generate_smart_money_observations(
            &foreign,
            &institution,
            retail.as_ref(),
            proprietary.as_ref(),
        );

        let trends = self.trends.analyze_all(series);
        let patterns = self.patterns.detect_all(series);

        info!(
            date = %today.date,
            total_score = scores.total_score,
            confidence,
            %combined_signal,
            %risk_signal,
            %primary_driver,
            patterns = patterns.len(),
            "smart money analysis completed"
        );

        Ok(SmartMoneyReport {
            date: today.date,
            days: series.len(),
            foreign,
            institution,
            retail,
            proprietary,
            scores,
            confidence,
            combined_signal,
            risk_signal,
            smart_money_signal,
            primary_driver,
            observations,
            trends,
            patterns,
        })
    }

    /// 패턴 감지만 실행.
    pub fn detect_patterns(&self, series: &[DailyFlow]) -> FlowResult<Vec<DetectedPattern>> {
        let span = flow_span!("pattern_detect", series.len());
        let _enter = span.enter();

        validate_series(series)?;
        Ok(self.patterns.detect_all(series))
    }

    /// 시장 폭 분석.
    pub fn analyze_breadth(
        &self,
        input: &BreadthInput,
        previous_ad_ratio: Option<Decimal>,
    ) -> BreadthReport {
        self.breadth.analyze(input, previous_ad_ratio)
    }

    fn score(
        &self,
        category: InvestorCategory,
        today: &FlowRecord,
        history: &[DailyFlow],
    ) -> InvestorAnalysis {
        let historical: Vec<FlowRecord> = history
            .iter()
            .filter_map(|day| day.get(category).copied())
            .collect();
        self.scorer.score_investor_signal(category, today, &historical)
    }
}

/// 시계열 검증 후 (당일, 과거)로 분리.
fn validate_series(series: &[DailyFlow]) -> FlowResult<(&DailyFlow, &[DailyFlow])> {
    let (today, history) = series
        .split_last()
        .ok_or_else(|| FlowError::InvalidInput("수급 시계열이 비어 있습니다".to_string()))?;

    for day in series {
        day.validate()?;
    }
    if let Some(pair) = series.windows(2).find(|pair| pair[0].date >= pair[1].date) {
        return Err(FlowError::InvalidInput(format!(
            "날짜가 오름차순이 아닙니다: {} → {}",
            pair[0].date, pair[1].date
        )));
    }

    Ok((today, history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use smartflow_core::PatternType;

    fn day(d: u32, foreign: Decimal, institution: Decimal) -> DailyFlow {
        DailyFlow::new(
            NaiveDate::from_ymd_opt(2024, 9, d).unwrap(),
            FlowRecord::from_net(foreign),
            FlowRecord::from_net(institution),
        )
    }

    fn engine() -> SmartMoneyEngine {
        SmartMoneyEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_empty_series() {
        let err = engine().analyze(&[]).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_rejects_negative_amounts() {
        let mut series = vec![day(2, dec!(100), dec!(100))];
        series[0].foreign = FlowRecord::new(dec!(-5), dec!(10), dec!(-15));
        let err = engine().analyze(&series).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_rejects_unordered_dates() {
        let series = vec![day(3, dec!(100), dec!(100)), day(2, dec!(100), dec!(100))];
        assert!(engine().analyze(&series).is_err());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.classifier.moderate_threshold = dec!(900);
        assert!(SmartMoneyEngine::new(config).is_err());
    }

    #[test]
    fn test_single_day_analysis() {
        let report = engine().analyze(&[day(2, dec!(700), dec!(-50))]).unwrap();

        assert_eq!(report.days, 1);
        assert_eq!(report.foreign.avg_5day, Decimal::ZERO);
        assert!(report.retail.is_none());
        assert!(report.patterns.is_empty());
        assert_eq!(report.trends.len(), 2);
        assert_eq!(report.combined_signal, CombinedSignal::StrongBuy);
    }

    #[test]
    fn test_history_feeds_investor_analysis() {
        let series = vec![
            day(2, dec!(100), dec!(200)),
            day(3, dec!(200), dec!(200)),
            day(4, dec!(300), dec!(200)),
        ];
        let report = engine().analyze(&series).unwrap();

        assert_eq!(report.foreign.trend_5day, dec!(300));
        assert_eq!(report.foreign.avg_5day, dec!(150));
        assert_eq!(report.patterns[0].pattern_type, PatternType::Accumulation);
    }

    #[test]
    fn test_detect_patterns_validates() {
        assert!(engine().detect_patterns(&[]).is_err());
    }
}
