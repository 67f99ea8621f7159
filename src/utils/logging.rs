/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::LifecycleState;
use crate::workflow::PhaseDescriptor;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("exam_session={}", default_level)));

    // 测试中可能重复初始化，忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 考试会话启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 服务地址: {}", config.api_base_url);
    info!(
        "⏱ 阶段时长: {:?} 分钟 | 休息: {} 分钟",
        config.phase_minutes, config.break_minutes
    );
    info!("{}", "=".repeat(60));
}

/// 记录状态转换
pub fn log_transition(from: LifecycleState, to: LifecycleState) {
    if from != to {
        info!("🔀 {} → {}", from, to);
    }
}

/// 记录阶段题目概览
///
/// # 参数
/// - `descriptor`: 当前阶段描述
/// - `max_len`: 每道题内容预览的最大长度
pub fn log_descriptor(descriptor: &PhaseDescriptor, max_len: usize) {
    info!("📄 {} 共 {} 秒", descriptor, descriptor.total_seconds());
    for (i, question) in descriptor.questions.iter().enumerate() {
        info!(
            "   {}. [{}] {}",
            i + 1,
            question.question_id,
            truncate_text(&question.content, max_len)
        );
    }
}

/// 打印最终统计信息
pub fn print_final_stats(exam_id: &str, state: LifecycleState, fallbacks: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 考试结束统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🆔 考试: {}", exam_id);
    info!("🏁 最终状态: {}", state);
    info!("⚠️ 本地推进次数: {}", fallbacks);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
