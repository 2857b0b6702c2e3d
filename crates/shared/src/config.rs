//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use crate::observability::ObservabilityConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 规则引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 要求表达式之后紧跟输入结束，否则剩余记号被忽略
    pub strict_end: bool,
    /// 未闭合的字符串常量报错，否则读到输入末尾
    pub strict_strings: bool,
    /// and / or 短路求值（左操作数能决定结果时跳过右操作数），默认两侧都求值
    pub short_circuit: bool,
    /// 注册扩展函数（containsAll、startsWith、endsWith、equals、isEmpty、matches）
    pub extended_functions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_end: false,
            strict_strings: false,
            short_circuit: false,
            extended_functions: false,
        }
    }
}

impl EngineConfig {
    /// 同时开启 strict_end 与 strict_strings
    pub fn strict() -> Self {
        Self {
            strict_end: true,
            strict_strings: true,
            ..Self::default()
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（RULE_ 前缀，层级用双下划线分隔，如 RULE_ENGINE__STRICT_END -> engine.strict_end）
    ///
    /// 环境名取自 RULE_ENV（默认 development），配置目录取自 CONFIG_DIR（默认 config）。
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("RULE_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), &env, service_name)
    }

    /// 从指定目录加载配置
    pub fn load_from(config_dir: &Path, env: &str, service_name: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", service_name))).required(false),
            )
            .add_source(
                Environment::with_prefix("RULE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        // 日志配置未指定服务名时沿用应用服务名
        if config.observability.service_name.is_empty() {
            config.observability.service_name = config.service_name.clone();
        }

        Ok(config)
    }
}
