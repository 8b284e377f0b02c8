use crate::types::{Config, LoggingConfig, OutputConfig, ProjectionConfig, SegmentConfig};
use anyhow::{Context, Result};
use std::fs;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read config {path}"))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {path}"))?;
        Ok(config)
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            input_dir: "data/segments".to_string(),
            min_ticks: 10,
            deterministic_order: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: "output/report.json".to_string(),
            max_missing_listed: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ProjectionConfig {
    /// Free-text filter over projection names.
    pub fn admits(&self, name: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|term| name.contains(term.as_str()));
        let excluded = self.exclude.iter().any(|term| name.contains(term.as_str()));
        included && !excluded
    }

    /// Projection names to skip when building: explicit ignores plus
    /// everything the include/exclude filter rejects.
    pub fn ignore_list<'a>(&self, available: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut ignore = self.ignore.clone();
        for name in available {
            if !self.admits(name) && !ignore.iter().any(|i| i == name) {
                ignore.push(name.to_string());
            }
        }
        ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
segments:
  input_dir: logs
thresholds:
  behind_offset: 3.5
projections:
  exclude: [safety]
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.segments.input_dir, "logs");
        assert_eq!(config.segments.min_ticks, 10);
        assert!(config.segments.deterministic_order);
        assert_eq!(config.thresholds.behind_offset, 3.5);
        assert_eq!(config.thresholds.beside_offset, 2.0);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.projections.exclude, vec!["safety".to_string()]);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.output.report_path, "output/report.json");
        assert_eq!(config.thresholds.prevalence, 0.5);
    }

    #[test]
    fn test_projection_filter() {
        let filter = ProjectionConfig {
            include: vec!["env".into(), "rules".into()],
            exclude: vec!["rules".into()],
            ignore: vec!["full".into()],
        };
        assert!(filter.admits("environment"));
        assert!(!filter.admits("rules"), "exclude wins over include");
        assert!(!filter.admits("behavior"), "not matched by any include term");

        let ignore = filter.ignore_list(["environment", "rules", "behavior", "full"]);
        assert_eq!(ignore, vec!["full", "rules", "behavior"]);
    }

    #[test]
    fn test_empty_filter_admits_everything() {
        let filter = ProjectionConfig::default();
        assert!(filter.admits("anything"));
        assert!(filter.ignore_list(["a", "b"]).is_empty());
    }
}
