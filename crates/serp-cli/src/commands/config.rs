//! 유효 설정 출력.

use anyhow::{Context, Result};
use serp_core::AppConfig;

/// 기본값, 설정 파일, 환경 변수를 모두 반영한 설정을 TOML로 직렬화합니다.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config to TOML")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_config() {
        let text = render_config(&AppConfig::default()).unwrap();

        assert!(text.contains("[volatility]"));
        assert!(text.contains("threshold = 10.0"));
        assert!(text.contains("[retracement]"));
        assert!(text.contains("max_position = 100"));
    }

    #[test]
    fn test_rendered_config_parses_back() {
        let text = render_config(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed.normalizer.max_position, 100);
        assert_eq!(parsed.retracement.tolerance, 2.0);
        assert_eq!(parsed.logging.format, "compact");
    }
}
