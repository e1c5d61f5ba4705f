//! 命令行配置
//!
//! 配置文件为 JSON，读取失败时退回默认值；命令行参数覆盖文件中的值。

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chess_ai::AiConfig;
use chess_core::Color;
use serde::{Deserialize, Serialize};

/// 自对弈默认最多走的半回合数
pub const DEFAULT_MAX_PLIES: u32 = 200;

/// 运行配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// AI 参数
    pub ai: AiConfig,
    /// 人类执哪一方
    pub human: Color,
    /// 起始局面，None 为标准开局
    pub fen: Option<String>,
    /// AI 自对弈
    pub self_play: bool,
    /// 自对弈最多走的半回合数
    pub max_plies: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            human: Color::White,
            fen: None,
            self_play: false,
            max_plies: DEFAULT_MAX_PLIES,
        }
    }
}

impl CliConfig {
    /// 从文件加载配置
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    tracing::info!("loaded config: {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("invalid config file {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("cannot read config file {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// 解析命令行参数（不含程序名）
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();

        // 先找配置文件，其余参数在其基础上覆盖
        let config_path = args
            .iter()
            .position(|a| a == "--config")
            .map(|i| args.get(i + 1).map(PathBuf::from).context("--config needs a path"))
            .transpose()?;
        let mut config = match config_path {
            Some(path) => Self::load(&path),
            None => Self::default(),
        };

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    iter.next();
                }
                "--depth" => {
                    let value = next_value(&mut iter, "--depth")?;
                    config.ai.max_depth = value
                        .parse()
                        .with_context(|| format!("invalid depth: {}", value))?;
                }
                "--seed" => {
                    let value = next_value(&mut iter, "--seed")?;
                    config.ai.seed = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid seed: {}", value))?,
                    );
                }
                "--no-shuffle" => config.ai.shuffle_moves = false,
                "--fen" => config.fen = Some(next_value(&mut iter, "--fen")?),
                "--self-play" => config.self_play = true,
                "--plies" => {
                    let value = next_value(&mut iter, "--plies")?;
                    config.max_plies = value
                        .parse()
                        .with_context(|| format!("invalid ply count: {}", value))?;
                }
                "--white" => config.human = Color::White,
                "--black" => config.human = Color::Black,
                other => bail!("unknown argument: {}", other),
            }
        }

        if config.ai.max_depth == 0 {
            bail!("search depth must be at least 1");
        }
        Ok(config)
    }
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    iter.next().with_context(|| format!("{} needs a value", flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_args() {
        let config = CliConfig::from_args(args(&[])).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.ai.max_depth, 3);
    }

    #[test]
    fn test_flags_override() {
        let config = CliConfig::from_args(args(&[
            "--depth", "2", "--seed", "11", "--black", "--self-play", "--plies", "30",
        ]))
        .unwrap();
        assert_eq!(config.ai.max_depth, 2);
        assert_eq!(config.ai.seed, Some(11));
        assert_eq!(config.human, Color::Black);
        assert!(config.self_play);
        assert_eq!(config.max_plies, 30);
    }

    #[test]
    fn test_fen_flag() {
        let config = CliConfig::from_args(args(&["--fen", "4k3/8/8/8/8/8/8/4K3 w - - 0 1"])).unwrap();
        assert_eq!(config.fen.as_deref(), Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
    }

    #[test]
    fn test_invalid_args() {
        assert!(CliConfig::from_args(args(&["--depth"])).is_err());
        assert!(CliConfig::from_args(args(&["--depth", "x"])).is_err());
        assert!(CliConfig::from_args(args(&["--depth", "0"])).is_err());
        assert!(CliConfig::from_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_missing_config_file_falls_back() {
        let config = CliConfig::load(Path::new("/nonexistent/chess-cli.json"));
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config: CliConfig =
            serde_json::from_str(r#"{"human":"Black","ai":{"max_depth":2}}"#).unwrap();
        assert_eq!(config.human, Color::Black);
        assert_eq!(config.ai.max_depth, 2);
        assert_eq!(config.max_plies, DEFAULT_MAX_PLIES);
    }
}
