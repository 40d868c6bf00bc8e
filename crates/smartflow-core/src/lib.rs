//! # SmartFlow Core
//!
//! 스마트 머니 수급 분석 엔진의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 엔진 전반에서 사용되는 기본 타입을 제공합니다:
//! - 투자자 유형별 일간 수급 레코드
//! - 신호 강도, 수급 추세, 리스크 신호 등 분류 타입
//! - 추세 통계, 패턴, 시장 폭 결과 구조체
//! - 엔진 설정 (임계값, 가중치)
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
