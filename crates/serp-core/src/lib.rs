//! # SERP Core
//!
//! 키워드 순위 분석 시스템의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 순위 레코드 및 키워드 시계열
//! - 피보나치 되돌림 레벨
//! - 변동성/패턴/예측 결과 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::{init_logging, init_logging_from_env, LogConfig, LogFormat};
