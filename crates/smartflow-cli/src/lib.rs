//! SmartFlow CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - JSON 수급 파일 분석 (`analyze`, `patterns`)
//! - 시장 폭 계산 (`breadth`)
//! - 유효 설정 출력 (`config`)

pub mod commands;
