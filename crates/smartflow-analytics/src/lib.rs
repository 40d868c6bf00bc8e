//! 스마트 머니 수급 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 순매수 강도/추세 분류 및 투자자 유형별 분석
//! - 0 ~ 100 종합 점수와 신뢰도 집계
//! - 종합 신호, Risk-On/Off 레짐, 주도 세력, 관찰 문구
//! - OLS 기반 수급 추세 통계
//! - 매집/분산/괴리/FOMO/패닉/방향 전환 패턴 감지
//! - 시장 폭 (A/D) 분석
//!
//! 모든 계산기는 설정을 받아 생성되며 이후 불변입니다.
//! 일반적으로는 [`SmartMoneyEngine`]을 진입점으로 사용합니다.
//!
//! # 예제
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use smartflow_analytics::SmartMoneyEngine;
//! use smartflow_core::{DailyFlow, EngineConfig, FlowRecord};
//!
//! let engine = SmartMoneyEngine::new(EngineConfig::default()).unwrap();
//! let series = vec![DailyFlow::new(
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     FlowRecord::from_net(dec!(650)),
//!     FlowRecord::from_net(dec!(120)),
//! )];
//!
//! let report = engine.analyze(&series).unwrap();
//! assert!(report.scores.total_score <= 100.0);
//! ```

pub mod breadth;
pub mod classifier;
pub mod composite_scorer;
pub mod confidence;
pub mod engine;
pub mod investor_scorer;
pub mod patterns;
pub mod signal_generator;
pub mod trend_analyzer;

pub use breadth::BreadthCalculator;
pub use classifier::FlowClassifier;
pub use composite_scorer::CompositeScorer;
pub use confidence::ConfidenceAggregator;
pub use engine::{SmartMoneyEngine, SmartMoneyReport};
pub use investor_scorer::InvestorScorer;
pub use patterns::PatternDetector;
pub use signal_generator::SignalGenerator;
pub use trend_analyzer::TrendAnalyzer;
