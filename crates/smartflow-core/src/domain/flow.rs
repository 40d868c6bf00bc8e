//! 투자자 유형별 일간 수급 데이터.
//!
//! 모든 금액은 백만 바트(THB) 단위의 [`Decimal`]입니다.
//! 이력 슬라이스는 항상 시간순(가장 오래된 값이 앞, 가장 최근 값이 뒤)입니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FlowError, FlowResult};

/// 투자자 유형.
///
/// - **Foreign / Institution**: 스마트 머니 (정보 우위가 있는 주체)
/// - **Retail / Proprietary**: 보조 지표 (스마트 머니 신호를 확인하는 용도)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestorCategory {
    /// 외국인
    Foreign,
    /// 기관
    Institution,
    /// 개인
    Retail,
    /// 증권사 자기매매
    Proprietary,
}

impl InvestorCategory {
    /// 모든 투자자 유형 (표시 순서).
    pub const ALL: [InvestorCategory; 4] = [
        InvestorCategory::Foreign,
        InvestorCategory::Institution,
        InvestorCategory::Retail,
        InvestorCategory::Proprietary,
    ];

    /// 스마트 머니 유형인지 확인.
    pub fn is_smart_money(self) -> bool {
        matches!(self, Self::Foreign | Self::Institution)
    }

    /// 표시용 이름.
    pub fn label(self) -> &'static str {
        match self {
            Self::Foreign => "Foreign investors",
            Self::Institution => "Institutional investors",
            Self::Retail => "Retail investors",
            Self::Proprietary => "Proprietary desks",
        }
    }
}

impl fmt::Display for InvestorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Foreign => "foreign",
            Self::Institution => "institution",
            Self::Retail => "retail",
            Self::Proprietary => "proprietary",
        };
        write!(f, "{}", s)
    }
}

/// 한 투자자 유형의 하루 수급.
///
/// `net`은 호출자가 직접 제공하며 `buy - sell`과 같을 필요는 없습니다
/// (거래소 공시 수치를 그대로 사용하기 위함).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlowRecord {
    /// 매수 금액 (>= 0)
    pub buy: Decimal,
    /// 매도 금액 (>= 0)
    pub sell: Decimal,
    /// 순매수 금액
    pub net: Decimal,
}

impl FlowRecord {
    /// 매수/매도/순매수를 그대로 사용하여 생성.
    pub fn new(buy: Decimal, sell: Decimal, net: Decimal) -> Self {
        Self { buy, sell, net }
    }

    /// 매수/매도로부터 순매수를 계산하여 생성.
    pub fn from_buy_sell(buy: Decimal, sell: Decimal) -> Self {
        Self {
            buy,
            sell,
            net: buy - sell,
        }
    }

    /// 순매수만 알고 있을 때 사용하는 생성자.
    ///
    /// 양수면 매수 측, 음수면 매도 측에 절대값을 기록합니다.
    pub fn from_net(net: Decimal) -> Self {
        if net >= Decimal::ZERO {
            Self::new(net, Decimal::ZERO, net)
        } else {
            Self::new(Decimal::ZERO, -net, net)
        }
    }

    /// 총 거래대금 (매수 + 매도).
    pub fn total(&self) -> Decimal {
        self.buy + self.sell
    }

    /// 매수/매도 금액이 음수가 아닌지 검증.
    pub fn validate(&self) -> FlowResult<()> {
        if self.buy < Decimal::ZERO || self.sell < Decimal::ZERO {
            return Err(FlowError::InvalidInput(format!(
                "buy/sell must be non-negative (buy={}, sell={})",
                self.buy, self.sell
            )));
        }
        Ok(())
    }
}

/// 하루 동안의 투자자 유형별 수급 스냅샷.
///
/// 개인/자기매매 데이터는 선택 사항이며, 없으면 0으로 취급합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFlow {
    /// 거래일
    pub date: NaiveDate,
    /// 외국인 수급
    pub foreign: FlowRecord,
    /// 기관 수급
    pub institution: FlowRecord,
    /// 개인 수급
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail: Option<FlowRecord>,
    /// 자기매매 수급
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proprietary: Option<FlowRecord>,
}

impl DailyFlow {
    /// 스마트 머니 데이터만으로 생성.
    pub fn new(date: NaiveDate, foreign: FlowRecord, institution: FlowRecord) -> Self {
        Self {
            date,
            foreign,
            institution,
            retail: None,
            proprietary: None,
        }
    }

    /// 개인 수급 추가.
    pub fn with_retail(mut self, retail: FlowRecord) -> Self {
        self.retail = Some(retail);
        self
    }

    /// 자기매매 수급 추가.
    pub fn with_proprietary(mut self, proprietary: FlowRecord) -> Self {
        self.proprietary = Some(proprietary);
        self
    }

    /// 투자자 유형별 수급 조회.
    pub fn get(&self, category: InvestorCategory) -> Option<&FlowRecord> {
        match category {
            InvestorCategory::Foreign => Some(&self.foreign),
            InvestorCategory::Institution => Some(&self.institution),
            InvestorCategory::Retail => self.retail.as_ref(),
            InvestorCategory::Proprietary => self.proprietary.as_ref(),
        }
    }

    /// 투자자 유형별 순매수 (데이터가 없으면 0).
    pub fn net(&self, category: InvestorCategory) -> Decimal {
        self.get(category).map(|r| r.net).unwrap_or(Decimal::ZERO)
    }

    /// 스마트 머니(외국인 + 기관) 순매수.
    pub fn smart_money_net(&self) -> Decimal {
        self.foreign.net + self.institution.net
    }

    /// 스냅샷에 존재하는 모든 수급 레코드 검증.
    pub fn validate(&self) -> FlowResult<()> {
        for category in InvestorCategory::ALL {
            if let Some(record) = self.get(category) {
                record.validate().map_err(|e| {
                    FlowError::InvalidInput(format!("{} {}: {}", self.date, category, e))
                })?;
            }
        }
        Ok(())
    }
}
