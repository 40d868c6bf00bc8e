//! 순매수 강도 및 수급 추세 분류기.
//!
//! 하루치 순매수를 5단계 강도로 분류하고, 최근 이력 평균과 비교하여
//! 가속/유지/둔화 추세를 판정합니다.

use rust_decimal::Decimal;
use smartflow_core::{ClassifierConfig, FlowTrend, SignalStrength};

/// 순매수 분류기.
///
/// # 강도 판정 (기본값)
///
/// | 순매수          | 강도       |
/// |-----------------|------------|
/// | >= 500          | StrongBuy  |
/// | 100 ~ 500       | Buy        |
/// | -100 ~ 100      | Neutral    |
/// | -500 ~ -100     | Sell       |
/// | <= -500         | StrongSell |
///
/// 경계값은 바깥 단계에 포함됩니다 (500 → StrongBuy, 100 → Buy).
#[derive(Debug, Clone, Default)]
pub struct FlowClassifier {
    config: ClassifierConfig,
}

impl FlowClassifier {
    /// 새 분류기 생성.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// 순매수 강도 분류.
    pub fn classify_signal_strength(&self, net_flow: Decimal) -> SignalStrength {
        let strong = self.config.strong_threshold;
        let moderate = self.config.moderate_threshold;

        if net_flow >= strong {
            SignalStrength::StrongBuy
        } else if net_flow >= moderate {
            SignalStrength::Buy
        } else if net_flow <= -strong {
            SignalStrength::StrongSell
        } else if net_flow <= -moderate {
            SignalStrength::Sell
        } else {
            SignalStrength::Neutral
        }
    }

    /// 이력 평균 대비 수급 추세 판정.
    ///
    /// # 인자
    ///
    /// * `current_net` - 당일 순매수
    /// * `historical_nets` - 과거 순매수 (시간순). 비어 있으면 당일 값만으로 판정
    ///
    /// # 판정
    ///
    /// - 이력 없음: Buy 구간이면 StableBuy, Sell 구간이면 StableSell, 그 외 Neutral
    /// - Buy/Sell 구간: |변화량|이 `accelerating_change` 초과면 가속,
    ///   `stable_band` 초과면 유지, 그 이하이면 둔화 (평균 대비 움직임이 거의 없음)
    /// - 중립 구간: 변화량이 `neutral_shift` 초과면 매도 둔화,
    ///   `-neutral_shift` 미만이면 매수 둔화
    pub fn detect_flow_trend(
        &self,
        current_net: Decimal,
        historical_nets: &[Decimal],
    ) -> FlowTrend {
        let moderate = self.config.moderate_threshold;

        if historical_nets.is_empty() {
            return if current_net >= moderate {
                FlowTrend::StableBuy
            } else if current_net <= -moderate {
                FlowTrend::StableSell
            } else {
                FlowTrend::Neutral
            };
        }

        let avg = historical_nets.iter().sum::<Decimal>() / Decimal::from(historical_nets.len());
        let change = current_net - avg;

        if current_net >= moderate {
            match self.phase(change) {
                Phase::Accelerating => FlowTrend::AcceleratingBuy,
                Phase::Stable => FlowTrend::StableBuy,
                Phase::Decreasing => FlowTrend::DecreasingBuy,
            }
        } else if current_net <= -moderate {
            match self.phase(change) {
                Phase::Accelerating => FlowTrend::AcceleratingSell,
                Phase::Stable => FlowTrend::StableSell,
                Phase::Decreasing => FlowTrend::DecreasingSell,
            }
        } else if change > self.config.neutral_shift {
            FlowTrend::DecreasingSell
        } else if change < -self.config.neutral_shift {
            FlowTrend::DecreasingBuy
        } else {
            FlowTrend::Neutral
        }
    }

    fn phase(&self, change: Decimal) -> Phase {
        let magnitude = change.abs();
        if magnitude > self.config.accelerating_change {
            Phase::Accelerating
        } else if magnitude > self.config.stable_band {
            Phase::Stable
        } else {
            Phase::Decreasing
        }
    }
}

enum Phase {
    Accelerating,
    Stable,
    Decreasing,
}
