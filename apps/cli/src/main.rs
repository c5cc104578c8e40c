//! # TCS CLI
//!
//! Command-line interface for TCS robot arm controllers.
//!
//! ## 双模式架构
//!
//! ### One-shot 模式（推荐用于 CI/脚本）
//!
//! ```bash
//! # 配置控制器地址
//! tcs-cli config set --address 192.168.0.1 --coordinates joint
//!
//! # 执行操作（内部：连接 -> attach -> 操作 -> release）
//! tcs-cli set-station 1 4 8 4 --joint
//! tcs-cli move-plate 2 5
//! ```
//!
//! ### REPL 模式（推荐用于调试）
//!
//! ```bash
//! $ tcs-cli shell
//! tcs> connect
//! tcs> where
//! tcs> move 1 1
//! tcs> exit
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod connection;
mod modes;

use commands::{ConfigCommand, StationCommand};
use connection::ConnectionArgs;
use modes::oneshot::OneShotMode;
use modes::repl::run_repl;

/// TCS CLI - 机械臂控制器命令行工具
#[derive(Parser, Debug)]
#[command(name = "tcs-cli")]
#[command(about = "Command-line interface for TCS robot arm controllers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    #[command(flatten)]
    Station(StationCommand),

    /// 释放控制权并关闭控制器会话（attach 0 + exit）
    Shutdown,

    /// 启动交互式 Shell（REPL 模式）
    Shell,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let directives: &[&str] = if verbose {
        &[
            "tcs_cli=debug",
            "tcs_driver=debug",
            "tcs_client=debug",
            "tcs_control=debug",
            "tcs_transport=debug",
        ]
    } else {
        &["tcs_cli=info"]
    };

    let mut filter = EnvFilter::from_default_env();
    for directive in directives {
        filter = filter.add_directive(directive.parse()?);
    }

    // 日志写到 stderr，stdout 只保留命令输出
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Config(cmd) => {
            let path = cli.connection.config_path()?;
            cmd.execute(&path)
        },

        // One-shot 模式：连接 -> attach -> 执行 -> release
        Commands::Station(cmd) => OneShotMode::connect(&cli.connection)?.run(&cmd),

        Commands::Shutdown => OneShotMode::connect(&cli.connection)?.shutdown(),

        // REPL 模式：交互式 Shell
        Commands::Shell => run_repl(cli.connection),
    }
}
