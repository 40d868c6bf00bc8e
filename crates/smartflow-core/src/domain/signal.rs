//! 수급 신호 분류 타입.
//!
//! - `SignalStrength` - 투자자 유형별 당일 순매수 강도 (5단계)
//! - `FlowTrend` - 최근 이력 대비 수급 추세
//! - `FlowDirection` - 순매수 부호에 따른 방향 계열
//! - `CombinedSignal` / `RiskSignal` - 스마트 머니 종합 신호와 리스크 레짐
//! - `PrimaryDriver` - 수급을 주도하는 투자자 유형

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::flow::InvestorCategory;

/// 당일 순매수 강도.
///
/// # 기준 (기본값, 백만 바트)
///
/// - **StrongBuy**: >= 500
/// - **Buy**: 100 ~ 500
/// - **Neutral**: -100 ~ 100 (양 끝 제외)
/// - **Sell**: -500 ~ -100
/// - **StrongSell**: <= -500
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStrength {
    /// 강한 순매수
    StrongBuy,
    /// 순매수
    Buy,
    /// 중립
    #[default]
    Neutral,
    /// 순매도
    Sell,
    /// 강한 순매도
    StrongSell,
}

impl SignalStrength {
    /// 강한 단계(StrongBuy/StrongSell)인지 확인.
    pub fn is_strong(self) -> bool {
        matches!(self, Self::StrongBuy | Self::StrongSell)
    }

    /// 보통 단계(Buy/Sell)인지 확인.
    pub fn is_moderate(self) -> bool {
        matches!(self, Self::Buy | Self::Sell)
    }

    /// 매수 계열인지 확인.
    pub fn is_buy(self) -> bool {
        matches!(self, Self::StrongBuy | Self::Buy)
    }

    /// 매도 계열인지 확인.
    pub fn is_sell(self) -> bool {
        matches!(self, Self::StrongSell | Self::Sell)
    }

    /// 점수 가감 방향 (+1 매수 계열, -1 매도 계열, 0 중립).
    pub fn sign(self) -> i8 {
        if self.is_buy() {
            1
        } else if self.is_sell() {
            -1
        } else {
            0
        }
    }
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Neutral => "NEUTRAL",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
        };
        write!(f, "{}", s)
    }
}

/// 최근 이력 평균 대비 수급 추세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowTrend {
    /// 순매수 확대
    AcceleratingBuy,
    /// 순매수 유지
    StableBuy,
    /// 순매수 둔화
    DecreasingBuy,
    /// 방향성 없음
    #[default]
    Neutral,
    /// 순매도 둔화
    DecreasingSell,
    /// 순매도 유지
    StableSell,
    /// 순매도 확대
    AcceleratingSell,
}

impl FlowTrend {
    /// 가속 단계인지 확인.
    pub fn is_accelerating(self) -> bool {
        matches!(self, Self::AcceleratingBuy | Self::AcceleratingSell)
    }

    /// 유지 단계인지 확인.
    pub fn is_stable(self) -> bool {
        matches!(self, Self::StableBuy | Self::StableSell)
    }

    /// 가속 방향 (+1 매수 가속, -1 매도 가속, 0 그 외).
    pub fn acceleration_sign(self) -> i8 {
        match self {
            Self::AcceleratingBuy => 1,
            Self::AcceleratingSell => -1,
            _ => 0,
        }
    }
}

impl fmt::Display for FlowTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AcceleratingBuy => "ACCELERATING_BUY",
            Self::StableBuy => "STABLE_BUY",
            Self::DecreasingBuy => "DECREASING_BUY",
            Self::Neutral => "NEUTRAL",
            Self::DecreasingSell => "DECREASING_SELL",
            Self::StableSell => "STABLE_SELL",
            Self::AcceleratingSell => "ACCELERATING_SELL",
        };
        write!(f, "{}", s)
    }
}

/// 순매수 부호에 따른 방향 계열.
///
/// 두 투자자 유형의 합의/충돌 판단에 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowDirection {
    /// 순매수 (> 0)
    Bullish,
    /// 순매도 (< 0)
    Bearish,
    /// 0
    Flat,
}

impl FlowDirection {
    /// 순매수 금액으로부터 방향 판단.
    pub fn from_net(net: Decimal) -> Self {
        if net > Decimal::ZERO {
            Self::Bullish
        } else if net < Decimal::ZERO {
            Self::Bearish
        } else {
            Self::Flat
        }
    }

    /// 같은 방향 계열인지 (둘 다 매수 또는 둘 다 매도).
    pub fn agrees_with(self, other: Self) -> bool {
        self == other && self != Self::Flat
    }

    /// 반대 방향 계열인지 (한쪽 매수, 다른 쪽 매도).
    pub fn conflicts_with(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Bullish, Self::Bearish) | (Self::Bearish, Self::Bullish)
        )
    }
}

/// 외국인 + 기관 종합 신호.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombinedSignal {
    /// 강한 매수
    StrongBuy,
    /// 매수
    Buy,
    /// 중립
    #[default]
    Neutral,
    /// 매도
    Sell,
    /// 강한 매도
    StrongSell,
}

impl fmt::Display for CombinedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Neutral => "NEUTRAL",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
        };
        write!(f, "{}", s)
    }
}

/// 리스크 선호 레짐.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskSignal {
    /// 위험자산 선호
    RiskOn,
    /// 약한 위험자산 선호
    RiskOnMild,
    /// 중립
    #[default]
    Neutral,
    /// 약한 위험 회피
    RiskOffMild,
    /// 위험 회피
    RiskOff,
}

impl fmt::Display for RiskSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RiskOn => "RISK_ON",
            Self::RiskOnMild => "RISK_ON_MILD",
            Self::Neutral => "NEUTRAL",
            Self::RiskOffMild => "RISK_OFF_MILD",
            Self::RiskOff => "RISK_OFF",
        };
        write!(f, "{}", s)
    }
}

/// 수급을 주도하는 투자자 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryDriver {
    /// 외국인
    Foreign,
    /// 기관
    Institution,
    /// 개인
    Retail,
    /// 자기매매
    Proprietary,
    /// 외국인과 기관이 같은 방향으로 강하게 움직임
    Both,
    /// 주도 세력 없음
    #[default]
    None,
}

impl From<InvestorCategory> for PrimaryDriver {
    fn from(category: InvestorCategory) -> Self {
        match category {
            InvestorCategory::Foreign => Self::Foreign,
            InvestorCategory::Institution => Self::Institution,
            InvestorCategory::Retail => Self::Retail,
            InvestorCategory::Proprietary => Self::Proprietary,
        }
    }
}

impl fmt::Display for PrimaryDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Foreign => "foreign",
            Self::Institution => "institution",
            Self::Retail => "retail",
            Self::Proprietary => "proprietary",
            Self::Both => "both",
            Self::None => "none",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signal_strength_families() {
        assert!(SignalStrength::StrongBuy.is_strong());
        assert!(SignalStrength::Sell.is_moderate());
        assert_eq!(SignalStrength::StrongSell.sign(), -1);
        assert_eq!(SignalStrength::Neutral.sign(), 0);
        assert_eq!(SignalStrength::default(), SignalStrength::Neutral);
    }

    #[test]
    fn test_flow_direction() {
        let bull = FlowDirection::from_net(dec!(50));
        let bear = FlowDirection::from_net(dec!(-600));
        let flat = FlowDirection::from_net(Decimal::ZERO);

        assert!(bull.agrees_with(FlowDirection::Bullish));
        assert!(bull.conflicts_with(bear));
        assert!(!flat.agrees_with(flat));
        assert!(!flat.conflicts_with(bear));
    }

    #[test]
    fn test_display() {
        assert_eq!(SignalStrength::StrongBuy.to_string(), "STRONG_BUY");
        assert_eq!(FlowTrend::DecreasingSell.to_string(), "DECREASING_SELL");
        assert_eq!(RiskSignal::RiskOffMild.to_string(), "RISK_OFF_MILD");
        assert_eq!(PrimaryDriver::Both.to_string(), "both");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&RiskSignal::RiskOnMild).unwrap();
        assert_eq!(json, "\"RISK_ON_MILD\"");
        let json = serde_json::to_string(&PrimaryDriver::Institution).unwrap();
        assert_eq!(json, "\"institution\"");
    }
}
