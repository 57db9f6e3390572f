// ==========================================
// 催收名单导入系统 - 命令行入口
// ==========================================
// 用法:
//   callfile-import <file> [bucket_id]
// 环境变量:
//   CALLFILE_IMPORT_DB_PATH  数据库路径（默认用户数据目录）
//   RUST_LOG                 日志级别
// 退出码: 终态为 ALL_SUCCEEDED 时为 0,其余为 1,参数错误为 2
// ==========================================

use callfile_import::app::{get_default_db_path, AppState};
use callfile_import::{logging, ImportStatus};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(file_path) = args.next().map(PathBuf::from) else {
        eprintln!("用法: callfile-import <file> [bucket_id]");
        return ExitCode::from(2);
    };
    let bucket_id = args.next();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", callfile_import::APP_NAME, callfile_import::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    let state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match state
        .import_api
        .import_file(&file_path, bucket_id.as_deref())
        .await
    {
        Ok(response) => {
            println!("{}", response.message);
            if let Ok(json) = serde_json::to_string_pretty(&response) {
                tracing::debug!(response = %json, "导入响应");
            }
            if response.status == ImportStatus::AllSucceeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
