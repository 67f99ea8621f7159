use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use exam_session::orchestrator::{
    LifecycleState, SessionOrchestrator, SessionSource, SubmissionOutcome,
};
use exam_session::utils::logging;
use exam_session::{Config, ExamClient, RequestDeduplicator};
use tracing::{info, warn};

/// 无人值守跑完一场考试：每个阶段和休息都立即提交（空答案）
///
/// 用法：`exam_session [exam_id]`，不带参数时申请新考试
#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = match std::env::var("EXAM_CONFIG_FILE") {
        Ok(path) => Config::from_toml_file(Path::new(&path))?,
        Err(_) => Config::from_env(),
    };

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::log_startup(&config);

    let client = ExamClient::new(&config).context("无法创建考试服务客户端")?;
    let mut orchestrator =
        SessionOrchestrator::new(Arc::new(client), RequestDeduplicator::new(), config);

    let source = match std::env::args().nth(1) {
        Some(exam_id) => SessionSource::Existing(exam_id),
        None => SessionSource::New,
    };
    orchestrator
        .initialize(source)
        .await
        .context("考试加载失败")?;

    let mut fallbacks = 0;
    loop {
        let before = orchestrator.state();
        match before {
            LifecycleState::Start => orchestrator.start()?,
            LifecycleState::Pending => orchestrator.continue_exam()?,
            LifecycleState::InProgress => {
                if let Some(descriptor) = orchestrator.descriptor() {
                    logging::log_descriptor(&descriptor, 60);
                }
                if orchestrator.finish_phase().await? == SubmissionOutcome::LocalFallback {
                    fallbacks += 1;
                }
            }
            LifecycleState::Break => {
                if orchestrator.finish_break().await? == SubmissionOutcome::LocalFallback {
                    fallbacks += 1;
                }
            }
            LifecycleState::Loading => {
                if !orchestrator.pump().await? {
                    break;
                }
            }
            LifecycleState::Completed | LifecycleState::Error => {}
        }

        logging::log_transition(before, orchestrator.state());
        for notice in orchestrator.take_notices() {
            warn!("🔔 {}", notice);
        }
        if orchestrator.state().is_terminal() {
            break;
        }
    }

    if let Some(navigation) = orchestrator.navigation() {
        info!("➡ 跳转: {:?}", navigation);
    }

    let exam_id = orchestrator
        .session()
        .map(|s| s.exam_id.clone())
        .unwrap_or_default();
    logging::print_final_stats(&exam_id, orchestrator.state(), fallbacks);

    orchestrator.teardown();
    Ok(())
}
