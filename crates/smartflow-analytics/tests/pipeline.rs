//! 전체 파이프라인 통합 테스트.
//!
//! 4개 투자자 유형이 모두 포함된 2주 시계열로 엔진 결과 전체를 검증합니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use smartflow_analytics::SmartMoneyEngine;
use smartflow_core::{
    BreadthInput, BreadthStatus, DailyFlow, EngineConfig, FlowRecord, InvestorCategory,
    PatternType, TrendDirection,
};

/// (외국인, 기관, 개인, 자기매매) 순매수
const FLOWS: [(i64, i64, i64, i64); 10] = [
    (-300, -150, 420, 30),
    (-250, -200, 380, 70),
    (-400, -100, 520, -20),
    (-200, -150, 310, 40),
    (150, 80, -260, 30),
    (300, 120, -450, 30),
    (420, 160, -610, 30),
    (510, 220, -760, 30),
    (640, 260, -880, -20),
    (720, 310, -950, -80),
];

fn record(net: i64) -> FlowRecord {
    let net = Decimal::from(net);
    let gross = dec!(2000);
    // 거래대금이 일정하다고 가정하고 매수/매도 분리
    FlowRecord::new((gross + net) / dec!(2), (gross - net) / dec!(2), net)
}

fn two_week_series() -> Vec<DailyFlow> {
    FLOWS
        .iter()
        .enumerate()
        .map(|(i, (f, inst, retail, prop))| {
            DailyFlow::new(
                NaiveDate::from_ymd_opt(2024, 11, i as u32 + 4).unwrap(),
                record(*f),
                record(*inst),
            )
            .with_retail(record(*retail))
            .with_proprietary(record(*prop))
        })
        .collect()
}

#[test]
fn full_report_for_two_weeks() {
    let engine = SmartMoneyEngine::new(EngineConfig::default()).unwrap();
    let series = two_week_series();
    let report = engine.analyze(&series).unwrap();

    assert_eq!(report.days, 10);
    assert_eq!(report.date, NaiveDate::from_ymd_opt(2024, 11, 13).unwrap());
    assert!(report.retail.is_some());
    assert!(report.proprietary.is_some());
    // 개인 대량 순매도 → 0, 자기매매 중립 25 × 0.25
    assert_eq!(report.scores.retail_score, 0.0);
    assert_eq!(report.scores.prop_score, 6.25);
    assert!((0.0..=100.0).contains(&report.confidence));
    assert!(report.observations.len() <= 4);
    assert!(report.smart_money_signal.evidence.len() <= 3);

    // 4개 유형 모두 추세 보유
    assert_eq!(report.trends.len(), 4);
    let foreign_trend = report
        .trends
        .iter()
        .find(|t| t.category == InvestorCategory::Foreign)
        .unwrap();
    assert_eq!(foreign_trend.metrics.trend_direction, TrendDirection::Up);
    assert!(foreign_trend.moving_averages.ma10.is_some());

    let retail_trend = report
        .trends
        .iter()
        .find(|t| t.category == InvestorCategory::Retail)
        .unwrap();
    assert_eq!(retail_trend.metrics.trend_direction, TrendDirection::Down);

    // 6일 연속 매집, 매도 4일 후 전환, 개인과의 괴리
    let types: Vec<PatternType> = report.patterns.iter().map(|p| p.pattern_type).collect();
    assert!(types.contains(&PatternType::Accumulation));
    assert!(types.contains(&PatternType::Distribution));
    assert!(types.contains(&PatternType::Divergence));
    assert!(types.contains(&PatternType::Reversal));
    assert!(types.contains(&PatternType::Panic));
    assert!(report
        .patterns
        .windows(2)
        .all(|pair| pair[0].strength >= pair[1].strength));

    let accumulation = report
        .patterns
        .iter()
        .find(|p| p.pattern_type == PatternType::Accumulation)
        .unwrap();
    assert_eq!(accumulation.consecutive_days, 6);
    assert_eq!(accumulation.strength, 100.0);
}

#[test]
fn report_serializes_to_camel_case_json() {
    let engine = SmartMoneyEngine::new(EngineConfig::default()).unwrap();
    let report = engine.analyze(&two_week_series()).unwrap();
    let json: Value = serde_json::to_value(&report).unwrap();

    assert!(json.get("combinedSignal").is_some());
    assert!(json.get("riskSignal").is_some());
    assert_eq!(json["foreign"]["category"], "foreign");
    assert!(json["foreign"].get("signalStrength").is_some());
    assert!(json["foreign"].get("trend5Day").is_some());
    assert!(json["foreign"].get("avg5Day").is_some());
    assert!(json["retail"].get("vsAverage").is_some());
    assert!(json["scores"].get("totalScore").is_some());

    let first_pattern = &json["patterns"][0];
    assert!(first_pattern.get("participantRoles").is_some());
    assert!(first_pattern.get("consecutiveDays").is_some());
}

#[test]
fn breadth_through_engine() {
    let engine = SmartMoneyEngine::new(EngineConfig::default()).unwrap();
    let input = BreadthInput::new(420, 180, 100).with_highs_lows(25, 8);
    let report = engine.analyze_breadth(&input, None);

    assert_eq!(report.metrics.total_traded, 700);
    assert_eq!(report.metrics.ad_ratio, dec!(2.33));
    assert_eq!(report.metrics.advance_percent, dec!(60));
    // A/D >= 2.0 이지만 상승 비중 60% < 65% → Bullish
    assert_eq!(report.status, BreadthStatus::Bullish);
}
