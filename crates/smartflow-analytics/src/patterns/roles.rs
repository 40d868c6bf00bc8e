//! 패턴 구간 내 투자자 유형별 역할 판정.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use smartflow_core::{DailyFlow, InvestorCategory, ParticipantRole};

use super::run::signum;

/// 구간 누적 수급으로 유형별 역할 판정.
///
/// - |누적| < `threshold` → Absent
/// - 패턴 방향과 반대 부호 → Opposing
/// - 전체 |누적| 합 중 비중 >= `driving_share` → Driving
/// - 그 외 → Following
pub fn assign_participant_roles(
    window: &[DailyFlow],
    direction: i8,
    threshold: Decimal,
    driving_share: f64,
) -> BTreeMap<InvestorCategory, ParticipantRole> {
    let totals: Vec<(InvestorCategory, Decimal)> = InvestorCategory::ALL
        .into_iter()
        .map(|category| (category, window.iter().map(|day| day.net(category)).sum()))
        .collect();
    let gross: Decimal = totals.iter().map(|(_, total)| total.abs()).sum();

    totals
        .into_iter()
        .map(|(category, total)| {
            let role = if total.abs() < threshold {
                ParticipantRole::Absent
            } else if direction != 0 && signum(total) == -direction {
                ParticipantRole::Opposing
            } else if share(total.abs(), gross) >= driving_share {
                ParticipantRole::Driving
            } else {
                ParticipantRole::Following
            };
            (category, role)
        })
        .collect()
}

/// 주도/동참 유형 목록 (유형 순서).
pub fn involved_categories(
    roles: &BTreeMap<InvestorCategory, ParticipantRole>,
) -> Vec<InvestorCategory> {
    roles
        .iter()
        .filter(|(_, role)| role.is_involved())
        .map(|(category, _)| *category)
        .collect()
}

fn share(part: Decimal, gross: Decimal) -> f64 {
    if gross.is_zero() {
        return 0.0;
    }
    (part / gross).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use smartflow_core::FlowRecord;

    fn day(foreign: Decimal, institution: Decimal, retail: Decimal) -> DailyFlow {
        DailyFlow::new(
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            FlowRecord::from_net(foreign),
            FlowRecord::from_net(institution),
        )
        .with_retail(FlowRecord::from_net(retail))
    }

    #[test]
    fn test_roles_for_buying_window() {
        let window = vec![
            day(dec!(600), dec!(150), dec!(-500)),
            day(dec!(500), dec!(100), dec!(-400)),
        ];
        let roles = assign_participant_roles(&window, 1, dec!(100), 0.35);

        // 외국인 1100 / 2250 ≈ 0.49 → 주도, 기관 250 / 2250 ≈ 0.11 → 동참
        assert_eq!(roles[&InvestorCategory::Foreign], ParticipantRole::Driving);
        assert_eq!(roles[&InvestorCategory::Institution], ParticipantRole::Following);
        assert_eq!(roles[&InvestorCategory::Retail], ParticipantRole::Opposing);
        assert_eq!(roles[&InvestorCategory::Proprietary], ParticipantRole::Absent);

        assert_eq!(
            involved_categories(&roles),
            vec![InvestorCategory::Foreign, InvestorCategory::Institution]
        );
    }

    #[test]
    fn test_small_flows_are_absent() {
        let window = vec![day(dec!(40), dec!(30), dec!(-20))];
        let roles = assign_participant_roles(&window, 1, dec!(100), 0.35);
        assert!(roles.values().all(|r| *r == ParticipantRole::Absent));
        assert!(involved_categories(&roles).is_empty());
    }
}
