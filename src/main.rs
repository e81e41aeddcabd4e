use std::error::Error;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use spa_edge::edge::{EdgeHandler, EdgeListener};
use spa_edge::function::{self, FunctionKind};
use spa_edge::logging::init_logging;
use spa_edge::settings::{LogOutput, LogSettings, Settings};

#[derive(Parser)]
#[command(name = "spa-edge", version, about = "SPA 정적 사이트용 엣지 호스트")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// 엣지 호스트 실행 (기본값)
    Serve,
    /// 이벤트 문서로 viewer-response 함수를 시험 실행
    TestFunction {
        /// 이벤트 JSON 파일 (없으면 표준 입력)
        #[arg(long)]
        event: Option<PathBuf>,

        /// 실행할 함수
        #[arg(long, default_value = "redirect-host-rewrite")]
        function: FunctionKind,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::TestFunction { event, function } => test_function(event, function),
    }
}

async fn serve() -> Result<(), Box<dyn Error>> {
    let settings = Settings::load()?;
    let _guard = init_logging(&settings.logging)?;

    let mut handler = EdgeHandler::new(settings.distribution.clone())?;
    if settings.server.https_enabled {
        handler = handler.with_https_port(settings.server.https_port);
    }
    let handler = Arc::new(handler);
    info!(
        origin = %settings.distribution.origin.domain_name,
        viewer_protocol = ?settings.distribution.behavior.viewer_protocol_policy,
        allowed_methods = ?settings.distribution.behavior.allowed_methods,
        "엣지 호스트 시작"
    );

    let listener = EdgeListener::new(&settings.server).await?;
    tokio::select! {
        result = listener.run(handler) => result?,
        _ = tokio::signal::ctrl_c() => info!("종료 신호 수신"),
    }

    Ok(())
}

fn test_function(event: Option<PathBuf>, kind: FunctionKind) -> Result<(), Box<dyn Error>> {
    // 표준 출력은 결과 문서 전용
    let mut log_settings = LogSettings::from_env()?;
    if log_settings.output == LogOutput::Stdout {
        log_settings.output = LogOutput::Stderr;
    }
    let _guard = init_logging(&log_settings)?;

    let event_json = match event {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let output = function::test_function(kind, &event_json)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
