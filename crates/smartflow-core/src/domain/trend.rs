//! 투자자 유형별 수급 추세 통계.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::flow::InvestorCategory;

/// 하루치 수급 추세 포인트 (차트용).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendPoint {
    /// 거래일
    pub date: NaiveDate,
    /// 거래일 00:00 UTC 기준 밀리초 타임스탬프
    pub timestamp: i64,
    /// 매수 금액
    pub buy: Decimal,
    /// 매도 금액
    pub sell: Decimal,
    /// 순매수
    pub net: Decimal,
    /// 당일 거래대금 중 매수 비중 (%)
    pub buy_pct: Decimal,
    /// 당일 거래대금 중 매도 비중 (%)
    pub sell_pct: Decimal,
}

/// OLS 기울기로 판단한 추세 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// 상승
    Up,
    /// 하락
    Down,
    /// 횡보
    #[default]
    Sideways,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Sideways => "sideways",
        };
        write!(f, "{}", s)
    }
}

/// 특정 일자의 값 (최대 매수일/최대 매도일).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    /// 거래일
    pub date: NaiveDate,
    /// 금액
    pub value: Decimal,
}

/// 기간 집계 지표.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    /// 총 매수
    pub total_buy: Decimal,
    /// 총 매도
    pub total_sell: Decimal,
    /// 총 순매수
    pub total_net: Decimal,
    /// 일평균 순매수
    pub avg_daily: Decimal,
    /// 최대 매수일 (동률이면 먼저 나온 날)
    pub max_buy: Option<DatedValue>,
    /// 최대 매도일 (동률이면 먼저 나온 날)
    pub max_sell: Option<DatedValue>,
    /// 추세 방향
    pub trend_direction: TrendDirection,
    /// 추세 강도 (0 ~ 100)
    pub trend_strength: f64,
    /// 순매수 모표준편차
    pub std_dev: f64,
}

impl Default for AggregatedMetrics {
    fn default() -> Self {
        Self {
            total_buy: Decimal::ZERO,
            total_sell: Decimal::ZERO,
            total_net: Decimal::ZERO,
            avg_daily: Decimal::ZERO,
            max_buy: None,
            max_sell: None,
            trend_direction: TrendDirection::Sideways,
            trend_strength: 50.0,
            std_dev: 0.0,
        }
    }
}

/// 순매수 단순이동평균 (최근 구간 기준).
///
/// 데이터가 구간보다 짧으면 `None`입니다.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingAverages {
    /// 3일 이동평균
    pub ma3: Option<Decimal>,
    /// 5일 이동평균
    pub ma5: Option<Decimal>,
    /// 10일 이동평균
    pub ma10: Option<Decimal>,
}

/// 한 투자자 유형의 추세 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorTrend {
    /// 투자자 유형
    pub category: InvestorCategory,
    /// 일별 포인트 (시간순)
    pub points: Vec<DailyTrendPoint>,
    /// 기간 집계
    pub metrics: AggregatedMetrics,
    /// 이동평균
    pub moving_averages: MovingAverages,
    /// 최근 순매수의 일평균 대비 비율 (%), 평균이 0이면 0
    pub latest_vs_average_pct: Decimal,
}
