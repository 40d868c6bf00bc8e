//! 다일간 수급 행동 패턴.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::flow::InvestorCategory;

/// 패턴 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    /// 스마트 머니 연속 순매수 (매집)
    Accumulation,
    /// 스마트 머니 연속 순매도 (분산)
    Distribution,
    /// 스마트 머니와 개인의 반대 매매
    Divergence,
    /// 개인 추격 매수
    Fomo,
    /// 개인 투매
    Panic,
    /// 스마트 머니 방향 전환
    Reversal,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accumulation => "ACCUMULATION",
            Self::Distribution => "DISTRIBUTION",
            Self::Divergence => "DIVERGENCE",
            Self::Fomo => "FOMO",
            Self::Panic => "PANIC",
            Self::Reversal => "REVERSAL",
        };
        write!(f, "{}", s)
    }
}

/// 패턴 감지 시 권장 행동.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternAction {
    /// 분할 매수
    Accumulate,
    /// 비중 축소
    Reduce,
    /// 스마트 머니 방향 추종
    FollowSmartMoney,
    /// 차익 실현
    TakeProfit,
    /// 반등 관찰
    WatchForRebound,
    /// 포지션 재점검
    ReassessPosition,
}

impl PatternAction {
    /// 직렬화 이름과 동일한 문자열.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accumulate => "accumulate",
            Self::Reduce => "reduce",
            Self::FollowSmartMoney => "follow_smart_money",
            Self::TakeProfit => "take_profit",
            Self::WatchForRebound => "watch_for_rebound",
            Self::ReassessPosition => "reassess_position",
        }
    }
}

impl fmt::Display for PatternAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 패턴의 리스크 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// 낮음
    Low,
    /// 보통
    Medium,
    /// 높음
    High,
}

/// 패턴 내 투자자 유형의 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// 패턴을 주도
    Driving,
    /// 같은 방향으로 동참
    Following,
    /// 유의미한 수급 없음
    Absent,
    /// 반대 방향
    Opposing,
}

impl ParticipantRole {
    /// 패턴에 참여한 역할인지 (주도 또는 동참).
    pub fn is_involved(self) -> bool {
        matches!(self, Self::Driving | Self::Following)
    }
}

/// 감지된 패턴.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPattern {
    /// 패턴 유형
    pub pattern_type: PatternType,
    /// 설명
    pub description: String,
    /// 시작일
    pub start_date: NaiveDate,
    /// 종료일
    pub end_date: NaiveDate,
    /// 강도 (0 ~ 100)
    pub strength: f64,
    /// 참여 투자자 유형 (주도 + 동참)
    pub involved_categories: Vec<InvestorCategory>,
    /// 연속 일수
    pub consecutive_days: usize,
    /// 패턴 기간의 누적 수급
    pub total_flow: Decimal,
    /// 권장 행동
    pub action: PatternAction,
    /// 리스크 수준
    pub risk_level: RiskLevel,
    /// 해석
    pub insight: String,
    /// 투자자 유형별 역할
    pub participant_roles: BTreeMap<InvestorCategory, ParticipantRole>,
}
