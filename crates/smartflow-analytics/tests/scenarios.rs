//! 대표 시나리오 통합 테스트.
//!
//! ## 시나리오
//! | 시나리오 | 외국인              | 기관               | 기대 결과                          |
//! |----------|---------------------|--------------------|------------------------------------|
//! | A        | +500, +550, +600    | +400, +450, +500   | StrongBuy / RiskOn / Accumulation  |
//! | B        | -600                | +50                | Neutral, 충돌 감점                 |

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use smartflow_analytics::{ConfidenceAggregator, InvestorScorer, SmartMoneyEngine};
use smartflow_core::{
    CombinedSignal, DailyFlow, EngineConfig, FlowRecord, InvestorCategory, PatternAction,
    PatternType, PrimaryDriver, RiskLevel, RiskSignal, SignalStrength,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, day).unwrap()
}

fn series(foreign: &[Decimal], institution: &[Decimal]) -> Vec<DailyFlow> {
    foreign
        .iter()
        .zip(institution)
        .enumerate()
        .map(|(i, (f, inst))| {
            DailyFlow::new(
                date(i as u32 + 1),
                FlowRecord::from_net(*f),
                FlowRecord::from_net(*inst),
            )
        })
        .collect()
}

fn engine() -> SmartMoneyEngine {
    SmartMoneyEngine::new(EngineConfig::default()).unwrap()
}

// =============================================================================
// 시나리오 A: 외국인/기관 동반 강한 순매수
// =============================================================================

#[test]
fn scenario_a_joint_strong_buying() {
    let flows = series(
        &[dec!(500), dec!(550), dec!(600)],
        &[dec!(400), dec!(450), dec!(500)],
    );
    let report = engine().analyze(&flows).unwrap();

    assert_eq!(report.foreign.signal_strength, SignalStrength::StrongBuy);
    assert_eq!(report.institution.signal_strength, SignalStrength::StrongBuy);
    assert_eq!(report.combined_signal, CombinedSignal::StrongBuy);
    assert!(report.scores.total_score >= 70.0, "total={}", report.scores.total_score);
    assert_eq!(report.risk_signal, RiskSignal::RiskOn);
    assert_eq!(report.primary_driver, PrimaryDriver::Both);

    let accumulation = report
        .patterns
        .iter()
        .find(|p| p.pattern_type == PatternType::Accumulation)
        .expect("accumulation pattern");
    assert_eq!(accumulation.consecutive_days, 3);
    assert_eq!(accumulation.action.as_str(), "accumulate");
    assert_eq!(accumulation.risk_level, RiskLevel::Low);
    assert_eq!(accumulation.start_date, date(1));
    assert_eq!(accumulation.end_date, date(3));
}

#[test]
fn scenario_a_score_breakdown() {
    let flows = series(
        &[dec!(500), dec!(550), dec!(600)],
        &[dec!(400), dec!(450), dec!(500)],
    );
    let report = engine().analyze(&flows).unwrap();

    // 외국인: 25 + 20 + 3 = 48 × 1.2 → 상한 50, 기관: 48
    assert_eq!(report.scores.foreign_score, 50.0);
    assert_eq!(report.scores.institution_score, 48.0);
    // (50 + 48) × 0.8
    assert!((report.scores.total_score - 78.4).abs() < 1e-9);
    // 외국인 90, 기관 85, 평균 87.5 + 일치 10
    assert!((report.confidence - 97.5).abs() < 1e-9);
}

#[test]
fn accumulation_needs_third_day() {
    let two_days = series(&[dec!(500), dec!(550)], &[dec!(400), dec!(450)]);
    let report = engine().analyze(&two_days).unwrap();
    assert!(report
        .patterns
        .iter()
        .all(|p| p.pattern_type != PatternType::Accumulation));

    let three_days = series(
        &[dec!(500), dec!(550), dec!(600)],
        &[dec!(400), dec!(450), dec!(500)],
    );
    let report = engine().analyze(&three_days).unwrap();
    assert!(report
        .patterns
        .iter()
        .any(|p| {
            p.pattern_type == PatternType::Accumulation && p.action == PatternAction::Accumulate
        }));
}

// =============================================================================
// 시나리오 B: 외국인 강한 순매도, 기관 소폭 순매수
// =============================================================================

#[test]
fn scenario_b_conflicting_smart_money() {
    let report = engine()
        .analyze(&series(&[dec!(-600)], &[dec!(50)]))
        .unwrap();

    assert_eq!(report.foreign.signal_strength, SignalStrength::StrongSell);
    assert_eq!(report.institution.signal_strength, SignalStrength::Neutral);
    assert_eq!(report.combined_signal, CombinedSignal::Neutral);
    assert_eq!(report.risk_signal, RiskSignal::Neutral);
}

#[test]
fn scenario_b_confidence_penalty() {
    let scorer = InvestorScorer::default();
    let aggregator = ConfidenceAggregator::default();

    let foreign = scorer.score_investor_signal(
        InvestorCategory::Foreign,
        &FlowRecord::from_net(dec!(-600)),
        &[],
    );
    let institution_up = scorer.score_investor_signal(
        InvestorCategory::Institution,
        &FlowRecord::from_net(dec!(50)),
        &[],
    );
    let institution_down = scorer.score_investor_signal(
        InvestorCategory::Institution,
        &FlowRecord::from_net(dec!(-50)),
        &[],
    );

    let base = (foreign.confidence + institution_up.confidence) / 2.0;
    let conflicting =
        aggregator.calculate_overall_confidence(&foreign, &institution_up, None, None);
    let agreeing = aggregator.calculate_overall_confidence(&foreign, &institution_down, None, None);

    assert_eq!(base, 70.0);
    assert_eq!(conflicting, base - 15.0);
    assert_eq!(agreeing, base + 10.0);
}
