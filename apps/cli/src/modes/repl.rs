//! REPL 模式（交互式 Shell）
//!
//! 在多条命令之间保持同一个 Session。工位命令与 one-shot 模式共用
//! [`StationCommand`] 的 clap 定义。

use anyhow::Result;
use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tcs_sdk::driver::SessionState;
use tracing::warn;

use crate::commands::StationCommand;
use crate::connection::{Arm, ConnectionArgs};

const HISTORY_FILE: &str = ".tcs_history";

/// 一行 REPL 输入中的工位命令
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: StationCommand,
}

/// REPL 会话（保持控制器连接）
pub struct ReplSession {
    args: ConnectionArgs,
    arm: Option<Arm>,
}

impl ReplSession {
    pub fn new(args: ConnectionArgs) -> Self {
        Self { args, arm: None }
    }

    /// 连接并 attach；已有可用会话时不重复连接
    pub fn connect(&mut self) -> Result<()> {
        if self.arm.as_ref().is_some_and(|arm| arm.session().is_attached()) {
            println!("⚠️  已经连接");
            return Ok(());
        }

        println!("⏳ 连接到控制器...");
        self.arm = Some(self.args.connect()?);
        println!("✅ 已连接并 attach");
        Ok(())
    }

    pub fn status(&self) -> String {
        match &self.arm {
            None => "未连接".to_string(),
            Some(arm) => arm.session().state().to_string(),
        }
    }

    fn arm(&mut self) -> Result<&mut Arm> {
        self.arm
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("未连接，请先使用 connect 命令"))
    }

    /// 处理一行输入；返回 `false` 表示退出
    pub fn handle_line(&mut self, line: &str) -> Result<bool> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = parts.first() else {
            return Ok(true);
        };

        match first {
            "exit" | "quit" => return Ok(false),
            "help" => print_help(),
            "status" => println!("📊 状态: {}", self.status()),
            "connect" => self.connect()?,
            "attach" => {
                self.arm()?.attach()?;
                println!("✅ 已 attach");
            },
            "release" => {
                self.arm()?.release()?;
                println!("✅ 已 release");
            },
            "shutdown" => {
                self.arm()?.shutdown()?;
                println!("✅ 控制器会话已关闭");
            },
            _ => {
                let parsed = ReplLine::try_parse_from(parts.iter().copied())
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                parsed.command.execute(self.arm()?)?;
            },
        }
        Ok(true)
    }

    /// 退出前释放仍处于 attach 状态的会话
    pub fn close(&mut self) {
        if let Some(arm) = self.arm.as_mut()
            && arm.session().state() == SessionState::Attached
            && let Err(e) = arm.release()
        {
            warn!("Release on exit failed: {}", e);
        }
    }
}

/// 运行 REPL 模式
pub fn run_repl(args: ConnectionArgs) -> Result<()> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| anyhow::anyhow!("Failed to initialize readline: {}", e))?;
    rl.load_history(HISTORY_FILE).ok(); // 首次运行时不存在

    println!("TCS CLI v{} - 交互式 Shell", env!("CARGO_PKG_VERSION"));
    println!("输入 'help' 查看帮助，'exit' 退出");
    println!();

    let mut session = ReplSession::new(args);

    loop {
        match rl.readline("tcs> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match session.handle_line(line) {
                    Ok(true) => {},
                    Ok(false) => break,
                    Err(err) => {
                        eprintln!("❌ Error: {err:#}");
                        print_help_hint(line);
                    },
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            },
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            },
        }
    }

    rl.save_history(HISTORY_FILE).ok();
    session.close();
    println!("👋 再见！");
    Ok(())
}

/// 打印帮助信息
fn print_help() {
    println!("可用命令:");
    println!("  connect                               连接控制器并 attach");
    println!("  attach / release                      重新 attach / 释放控制权");
    println!("  shutdown                              释放控制权并发送 exit");
    println!("  where [--joint]                       查询当前位置");
    println!("  dest [--joint]                        查询目标位置");
    println!("  set-station <ix> <c1> <c2>... [--joint]  设置工位坐标");
    println!("  move <ix> <profile>                   移动到工位");
    println!("  teach <ix> [--clearance N]            示教托盘");
    println!("  pick|place <ix> [--compliance] [--torque N]");
    println!("  move-plate <from> <to> [--compliance] [--torque N]");
    println!("  load <csv> [--joint]                  批量设置工位");
    println!("  status                                显示会话状态");
    println!("  help                                  显示帮助");
    println!("  exit / quit                           退出（自动 release）");
    println!();
}

/// 提供基于错误的帮助提示
fn print_help_hint(command: &str) {
    if command.starts_with("set-station") {
        eprintln!("💡 提示: 使用 'set-station 1 4 8 4 --joint' 设置关节坐标");
    } else if command.starts_with("move-plate") {
        eprintln!("💡 提示: 搬运失败时托盘可能仍在夹爪中");
    } else {
        eprintln!("💡 提示: 输入 'help' 查看所有命令");
    }
}
