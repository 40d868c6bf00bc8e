//! Market Breadth - 시장 폭 측정 시스템.
//!
//! 상승/하락/보합 종목 수와 신고가/신저가 종목 수로 시장 전체 건강 상태를 측정합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 시장 폭 원시 입력.
///
/// 신고가/신저가 수는 데이터 제공처에 따라 없을 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadthInput {
    /// 상승 종목 수
    pub advances: u32,
    /// 하락 종목 수
    pub declines: u32,
    /// 보합 종목 수
    pub unchanged: u32,
    /// 신고가 종목 수
    #[serde(default)]
    pub new_highs: Option<u32>,
    /// 신저가 종목 수
    #[serde(default)]
    pub new_lows: Option<u32>,
}

impl BreadthInput {
    /// 상승/하락/보합만으로 생성.
    pub fn new(advances: u32, declines: u32, unchanged: u32) -> Self {
        Self {
            advances,
            declines,
            unchanged,
            new_highs: None,
            new_lows: None,
        }
    }

    /// 신고가/신저가 수 추가.
    pub fn with_highs_lows(mut self, new_highs: u32, new_lows: u32) -> Self {
        self.new_highs = Some(new_highs);
        self.new_lows = Some(new_lows);
        self
    }
}

/// Market Breadth 지표.
///
/// 비율/백분율은 소수점 2자리로 반올림됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadthMetrics {
    /// 상승 종목 수
    pub advances: u32,
    /// 하락 종목 수
    pub declines: u32,
    /// 보합 종목 수
    pub unchanged: u32,
    /// 전체 거래 종목 수
    pub total_traded: u64,
    /// 상승/하락 비율 (하락 0 & 상승 > 0이면 999)
    pub ad_ratio: Decimal,
    /// 상승 비율 (%)
    pub advance_percent: Decimal,
    /// 하락 비율 (%)
    pub decline_percent: Decimal,
    /// 보합 비율 (%)
    pub unchanged_percent: Decimal,
    /// 신고가 종목 수
    pub new_highs: Option<u32>,
    /// 신저가 종목 수
    pub new_lows: Option<u32>,
    /// 신고가 - 신저가
    pub net_new_highs: i64,
}

impl BreadthMetrics {
    /// 신고가/신저가 데이터가 모두 있는지 확인.
    pub fn has_highs_lows(&self) -> bool {
        self.new_highs.is_some() && self.new_lows.is_some()
    }
}

/// 시장 폭 상태 (5단계).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreadthStatus {
    /// 매우 강세
    StrongBullish,
    /// 강세
    Bullish,
    /// 중립
    #[default]
    Neutral,
    /// 약세
    Bearish,
    /// 매우 약세
    StrongBearish,
}

impl fmt::Display for BreadthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StrongBullish => "STRONG_BULLISH",
            Self::Bullish => "BULLISH",
            Self::Neutral => "NEUTRAL",
            Self::Bearish => "BEARISH",
            Self::StrongBearish => "STRONG_BEARISH",
        };
        write!(f, "{}", s)
    }
}

/// 시장 변동성 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityLevel {
    /// 과격
    Aggressive,
    /// 보통
    Moderate,
    /// 안정
    #[default]
    Calm,
}

impl fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Aggressive => "AGGRESSIVE",
            Self::Moderate => "MODERATE",
            Self::Calm => "CALM",
        };
        write!(f, "{}", s)
    }
}

/// 직전 대비 시장 폭 추세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreadthTrend {
    /// 개선
    Improving,
    /// 유지
    #[default]
    Stable,
    /// 악화
    Deteriorating,
}

impl fmt::Display for BreadthTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Improving => "IMPROVING",
            Self::Stable => "STABLE",
            Self::Deteriorating => "DETERIORATING",
        };
        write!(f, "{}", s)
    }
}

/// 시장 폭 종합 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadthReport {
    /// 지표
    pub metrics: BreadthMetrics,
    /// 상태
    pub status: BreadthStatus,
    /// 변동성
    pub volatility: VolatilityLevel,
    /// 신뢰도 (0 ~ 100)
    pub confidence: u32,
    /// 직전 대비 추세
    pub trend: BreadthTrend,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadth_input_builder() {
        let input = BreadthInput::new(400, 300, 100).with_highs_lows(25, 10);
        assert_eq!(input.new_highs, Some(25));
        assert_eq!(input.new_lows, Some(10));
    }

    #[test]
    fn test_breadth_input_json_without_highs_lows() {
        let input: BreadthInput =
            serde_json::from_str(r#"{"advances": 10, "declines": 5, "unchanged": 1}"#).unwrap();
        assert_eq!(input, BreadthInput::new(10, 5, 1));
    }

    #[test]
    fn test_breadth_status_display() {
        assert_eq!(BreadthStatus::StrongBullish.to_string(), "STRONG_BULLISH");
        assert_eq!(BreadthStatus::default(), BreadthStatus::Neutral);
        assert_eq!(VolatilityLevel::Moderate.to_string(), "MODERATE");
        assert_eq!(BreadthTrend::Deteriorating.to_string(), "DETERIORATING");
    }
}
