//! 国际象棋命令行
//!
//! 人机对弈：输入坐标走法（`e2e4`），`undo` 悔棋，`moves` 列出合法走法，
//! `log` 查看记谱，`fen` 输出当前局面，`quit` 退出。

mod config;
mod render;

use std::io::Write;

use anyhow::{Context, Result};
use chess_ai::AiEngine;
use chess_core::{Color, Fen, Game, Move, Notation, Position};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志，RUST_LOG 可覆盖
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("chess_cli=info,chess_ai=info"))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = CliConfig::from_args(std::env::args().skip(1))?;
    info!("starting with {:?}", config);

    let position = match &config.fen {
        Some(fen) => Fen::parse(fen).with_context(|| format!("invalid FEN: {}", fen))?,
        None => Position::initial(),
    };
    let game = Game::from_position(position);
    let engine = AiEngine::new(config.ai.clone());

    let game = if config.self_play {
        self_play(game, engine, config.max_plies).await?
    } else {
        play_human(game, engine, config.human).await?
    };

    println!("{}", render::board(game.position()));
    if let Some(text) = render::status(game.status()) {
        println!("{}", text);
    }
    println!("{}", game.move_log().join(" "));
    Ok(())
}

/// 在阻塞线程池中搜索，避免占住异步运行时
async fn think(engine: AiEngine, position: Position) -> Result<(AiEngine, Option<Move>)> {
    tokio::task::spawn_blocking(move || {
        let mut engine = engine;
        let mut position = position;
        let mv = engine.best_move(&mut position);
        (engine, mv)
    })
    .await
    .context("search task failed")
}

/// AI 走一步，没有走法时返回 false
async fn ai_turn(game: &mut Game, engine: &mut AiEngine) -> Result<bool> {
    let (returned, mv) = think(engine.clone(), game.position().clone()).await?;
    *engine = returned;

    let Some(mv) = mv else {
        return Ok(false);
    };
    let record = game.apply_move(mv)?;
    println!(
        "{} plays {} (score {:?}, {} nodes)",
        record.color(),
        record.notation(),
        engine.last_score(),
        engine.nodes_searched()
    );
    Ok(true)
}

async fn self_play(mut game: Game, mut engine: AiEngine, max_plies: u32) -> Result<Game> {
    for _ in 0..max_plies {
        if game.is_over() || !ai_turn(&mut game, &mut engine).await? {
            break;
        }
    }
    if !game.is_over() {
        info!("stopped after {} plies", max_plies);
    }
    Ok(game)
}

/// 读取下一行输入，跳过无法解码的行，输入结束或读取失败时返回 None
async fn next_input<R>(lines: &mut Lines<R>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Ok(line) => return line,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!("skipping unreadable input line: {}", e);
            }
            Err(e) => {
                warn!("failed to read input: {}", e);
                return None;
            }
        }
    }
}

async fn play_human(mut game: Game, mut engine: AiEngine, human: Color) -> Result<Game> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while !game.is_over() {
        if game.side_to_move() != human {
            if !ai_turn(&mut game, &mut engine).await? {
                break;
            }
            continue;
        }

        println!("{}", render::board(game.position()));
        if game.is_in_check(human) {
            println!("check!");
        }
        print!("{} to move> ", human);
        std::io::stdout().flush()?;

        let Some(line) = next_input(&mut lines).await else {
            break;
        };
        match line.trim() {
            "" => {}
            "quit" | "exit" => break,
            "undo" => {
                // 撤回 AI 的应着和自己的上一步
                if !game.undo_move() {
                    println!("nothing to undo");
                } else if game.side_to_move() != human {
                    game.undo_move();
                }
            }
            "moves" => {
                let moves: Vec<String> = game
                    .all_valid_moves()
                    .iter()
                    .map(|m| m.to_string())
                    .collect();
                println!("{}", moves.join(" "));
            }
            "log" => println!("{}", game.move_log().join(" ")),
            "fen" => println!("{}", Fen::to_string(game.position())),
            text => match Notation::parse_coordinate(text) {
                Ok((from, to)) => match game.try_move(from, to) {
                    Ok(record) => println!("you play {}", record.notation()),
                    Err(e) => println!("{}", e),
                },
                Err(e) => {
                    warn!("bad input: {}", text);
                    println!("{}", e);
                }
            },
        }
    }
    Ok(game)
}
