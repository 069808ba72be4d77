//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 순위 내보내기 분석 (변동성 키워드 테이블/JSON 보고서)
//! - 키워드 차트 페이로드 추출
//! - 되돌림 레벨 계산기
//! - 유효 설정 출력

pub mod commands;
