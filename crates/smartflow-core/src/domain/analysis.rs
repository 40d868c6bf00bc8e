//! 투자자 유형별 분석 결과와 종합 점수.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::flow::InvestorCategory;
use super::signal::{CombinedSignal, FlowDirection, FlowTrend, RiskSignal, SignalStrength};

/// 한 투자자 유형의 당일 수급 분석.
///
/// 호출마다 새로 계산되며 엔진은 이를 보관하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorAnalysis {
    /// 투자자 유형
    pub category: InvestorCategory,
    /// 당일 순매수
    pub today_net: Decimal,
    /// 순매수 강도
    pub signal_strength: SignalStrength,
    /// 이력 대비 추세
    pub flow_trend: FlowTrend,
    /// 신뢰도 (0 ~ 100)
    pub confidence: f64,
    /// 최근 5일 순매수 합계
    #[serde(rename = "trend5Day")]
    pub trend_5day: Decimal,
    /// 최근 5일 평균 순매수
    #[serde(rename = "avg5Day")]
    pub avg_5day: Decimal,
    /// 당일 순매수 - 5일 평균
    pub vs_average: Decimal,
}

impl InvestorAnalysis {
    /// 당일 순매수의 방향 계열.
    pub fn direction(&self) -> FlowDirection {
        FlowDirection::from_net(self.today_net)
    }
}

/// 스마트 머니 종합 점수 구성 요소.
///
/// # 범위
///
/// - `foreign_score`, `institution_score`: 0 ~ 50
/// - `retail_score`, `prop_score`: 0 ~ 25
/// - `total_score`: 0 ~ 100
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScoreComponents {
    /// 외국인 점수
    pub foreign_score: f64,
    /// 기관 점수
    pub institution_score: f64,
    /// 개인 점수
    pub retail_score: f64,
    /// 자기매매 점수
    pub prop_score: f64,
    /// 종합 점수
    pub total_score: f64,
}

/// 종합 점수만으로 재산출한 스마트 머니 신호.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartMoneySignal {
    /// 점수 기반 신호
    pub signal: CombinedSignal,
    /// 점수 기반 리스크 레짐
    pub risk_signal: RiskSignal,
    /// 전체 신뢰도 (0 ~ 100)
    pub confidence: f64,
    /// 근거 문구 (최대 3개)
    pub evidence: Vec<String>,
}
