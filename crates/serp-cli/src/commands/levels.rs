//! 되돌림 레벨 계산기.

use anyhow::{bail, Result};
use serp_core::RetracementLevels;

/// `(low, high)` 쌍의 레벨을 계산합니다.
///
/// `low`는 가장 좋은 순위(작은 숫자), `high`는 가장 나쁜 순위입니다.
pub fn compute_levels(low: f64, high: f64) -> Result<RetracementLevels> {
    if !low.is_finite() || !high.is_finite() {
        bail!("Levels require finite bounds: low={}, high={}", low, high);
    }
    if low > high {
        bail!(
            "low must not exceed high (low={}, high={}); rank numbers: lower is better",
            low,
            high
        );
    }
    Ok(RetracementLevels::from_range(low, high))
}

/// 레벨 테이블. `position`이 주어지면 가장 가까운 레벨에 표시합니다.
pub fn format_levels(levels: &RetracementLevels, position: Option<f64>) -> String {
    let nearest = position.map(|p| levels.nearest(p).level);
    let mut output = String::new();

    output.push_str(&format!("{:<8} {:<8} {:>10}\n", "RATIO", "LABEL", "POSITION"));
    output.push_str(&"-".repeat(30));
    output.push('\n');

    for level in levels.iter() {
        let marker = if nearest == Some(level.level) { " <" } else { "" };
        output.push_str(&format!(
            "{:<8} {:<8} {:>10.3}{}\n",
            level.level.key(),
            level.level.label(),
            level.value,
            marker
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Range: {} ~ {} ({})",
        levels.low(),
        levels.high(),
        levels.range()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_levels_rejects_inverted_range() {
        assert!(compute_levels(10.0, 3.0).is_err());
        assert!(compute_levels(f64::NAN, 3.0).is_err());
        assert!(compute_levels(3.0, 3.0).is_ok());
    }

    #[test]
    fn test_format_levels() {
        let levels = compute_levels(3.0, 10.0).unwrap();
        let table = format_levels(&levels, Some(6.4));

        assert!(table.contains("0.5      50%           6.500 <"));
        assert!(table.contains("Range: 3 ~ 10 (7)"));
        assert_eq!(table.matches(" <").count(), 1);
    }
}
