use crate::core::probes::{self, DEFAULT_MISSING_FILE, DEFAULT_RECURSION_LIMIT};
use crate::core::scoring::{builtin_cases, ScoreRules};
use crate::core::ConfigProvider;
use crate::domain::model::ScoreCase;
use crate::utils::error::{FiestaError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_RECURSION_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub probes: Option<ProbesConfig>,
    pub scoring: Option<ScoringConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbesConfig {
    pub recursion_limit: Option<usize>,
    pub missing_file: Option<String>,
    pub only: Option<Vec<String>>,
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub speed_threshold_secs: Option<f64>,
    pub speed_bonus: Option<i64>,
    pub commit_allowance: Option<u32>,
    pub penalty_per_commit: Option<i64>,
    pub cases: Option<Vec<ScoreCase>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FiestaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，${VAR} 從環境變數取值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// 從 TOML 字串解析配置，${VAR} 由 `lookup` 取值
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| FiestaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換 ${VAR} 佔位符，查不到的變數保持原樣
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FiestaError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(probes_config) = &self.probes {
            if let Some(limit) = probes_config.recursion_limit {
                validation::validate_range("probes.recursion_limit", limit, 1, MAX_RECURSION_LIMIT)?;
            }
            if let Some(path) = &probes_config.missing_file {
                validation::validate_path("probes.missing_file", path)?;
            }
            for name in probes_config.only.iter().flatten() {
                if probes::find(name).is_none() {
                    return Err(FiestaError::UnknownProbe { name: name.clone() });
                }
            }
        }

        if let Some(scoring) = &self.scoring {
            if let Some(threshold) = scoring.speed_threshold_secs {
                validation::validate_non_negative_finite("scoring.speed_threshold_secs", threshold)?;
            }
            for case in scoring.cases.iter().flatten() {
                validation::validate_non_empty_string("scoring.cases.name", &case.name)?;
                validation::validate_non_negative_finite(
                    &format!("scoring.cases.{}.build_time", case.name),
                    case.input.build_time,
                )?;
            }
        }

        Ok(())
    }

    /// 取得計分規則，未設定的欄位使用預設值
    pub fn score_rules(&self) -> ScoreRules {
        let defaults = ScoreRules::default();
        match &self.scoring {
            None => defaults,
            Some(s) => ScoreRules {
                speed_threshold_secs: s.speed_threshold_secs.unwrap_or(defaults.speed_threshold_secs),
                speed_bonus: s.speed_bonus.unwrap_or(defaults.speed_bonus),
                commit_allowance: s.commit_allowance.unwrap_or(defaults.commit_allowance),
                penalty_per_commit: s.penalty_per_commit.unwrap_or(defaults.penalty_per_commit),
            },
        }
    }

    /// 取得計分案例，沒有設定時回傳內建的三個案例
    pub fn score_cases(&self) -> Vec<ScoreCase> {
        self.scoring
            .as_ref()
            .and_then(|s| s.cases.clone())
            .filter(|cases| !cases.is_empty())
            .unwrap_or_else(builtin_cases)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn recursion_limit(&self) -> usize {
        self.probes
            .as_ref()
            .and_then(|p| p.recursion_limit)
            .unwrap_or(DEFAULT_RECURSION_LIMIT)
    }

    fn missing_file(&self) -> &str {
        self.probes
            .as_ref()
            .and_then(|p| p.missing_file.as_deref())
            .unwrap_or(DEFAULT_MISSING_FILE)
    }

    fn selected_probes(&self) -> &[String] {
        self.probes
            .as_ref()
            .and_then(|p| p.only.as_deref())
            .unwrap_or(&[])
    }

    fn strict(&self) -> bool {
        self.probes.as_ref().and_then(|p| p.strict).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
