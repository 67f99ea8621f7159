//! 考试会话编排器 - 编排层
//!
//! ## 职责
//!
//! 持有生命周期状态、当前阶段、服务端会话、作答记录和计时器，
//! 负责所有状态转换：加载、开始、阶段提交、休息、完成、出错。
//!
//! ## 状态转换
//!
//! ```text
//! LOADING ──成功──▶ START ──开始/超时──▶ PENDING ──继续──▶ IN_PROGRESS
//!    │                 └──(require_continue = false)──────────▶ IN_PROGRESS
//!    ├──404──▶ 跳转 NotFound
//!    └──失败──▶ ERROR
//!
//! IN_PROGRESS ──提交──▶ BREAK / IN_PROGRESS(下一阶段) / COMPLETED
//! BREAK ──超时/跳过──▶ 空提交 ──▶ IN_PROGRESS
//! ```
//!
//! ## 并发模型
//!
//! 所有操作都通过 `&mut self` 串行执行；计时器在独立任务里计时，
//! 通过 channel 把事件交回编排器，由 `handle_event` 在同一个调用序列中处理。

use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::clients::ExamApi;
use crate::config::Config;
use crate::error::{ExamError, Result};
use crate::infrastructure::{CountdownTimer, TimerEvent, TimerKind};
use crate::models::{Answer, AnswerMap, ExamSession, InternalPhase, Question, SubmittedAnswer};
use crate::orchestrator::state::{
    LifecycleState, Navigation, Notice, OneShotLatch, SessionSource, SubmissionOutcome,
};
use crate::services::submission_encoder::resolve_value;
use crate::services::{encode_submission, PhaseMapper, RequestDeduplicator};
use crate::workflow::{resolve_descriptor, PhaseDescriptor, SessionCtx};

/// 新考试请求的去重 key
pub const NEW_SESSION_KEY: &str = "<new>";

/// 考试会话编排器
pub struct SessionOrchestrator {
    api: Arc<dyn ExamApi>,
    loads: RequestDeduplicator<ExamSession>,
    config: Config,
    mapper: PhaseMapper,
    init_latch: OneShotLatch,

    state: LifecycleState,
    session: Option<ExamSession>,
    /// 服务端最近报告的阶段，每次替换会话时映射一次
    server_phase: Option<InternalPhase>,
    phase: Option<InternalPhase>,
    answers: AnswerMap,

    timer: Option<CountdownTimer>,
    timer_generation: u64,
    remaining_seconds: Option<u64>,
    events_tx: UnboundedSender<TimerEvent>,
    events_rx: UnboundedReceiver<TimerEvent>,

    notices: Vec<Notice>,
    navigation: Option<Navigation>,
    last_error: Option<ExamError>,
    desynced: bool,
    disposed: bool,
}

impl SessionOrchestrator {
    /// 创建编排器
    ///
    /// `loads` 通常在多个编排器之间共享，保证同一场考试只有一个在途加载请求
    pub fn new(
        api: Arc<dyn ExamApi>,
        loads: RequestDeduplicator<ExamSession>,
        config: Config,
    ) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        let mapper = PhaseMapper::new(&config.vocabulary);

        Self {
            api,
            loads,
            config,
            mapper,
            init_latch: OneShotLatch::new(),
            state: LifecycleState::Loading,
            session: None,
            server_phase: None,
            phase: None,
            answers: AnswerMap::new(),
            timer: None,
            timer_generation: 0,
            remaining_seconds: None,
            events_tx,
            events_rx,
            notices: Vec::new(),
            navigation: None,
            last_error: None,
            desynced: false,
            disposed: false,
        }
    }

    // ========== 只读访问 ==========

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn phase(&self) -> Option<InternalPhase> {
        self.phase
    }

    pub fn session(&self) -> Option<&ExamSession> {
        self.session.as_ref()
    }

    /// 当前阶段描述，每次调用都重新推导
    pub fn descriptor(&self) -> Option<PhaseDescriptor> {
        let session = self.session.as_ref()?;
        resolve_descriptor(session, self.phase, self.server_phase, &self.config)
    }

    /// 当前计时器剩余秒数
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.remaining_seconds
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// 当前阶段已作答的题目数
    pub fn answered_count(&self) -> usize {
        self.descriptor()
            .map(|d| {
                d.questions
                    .iter()
                    .filter(|q| self.answers.contains_key(&q.question_id))
                    .count()
            })
            .unwrap_or(0)
    }

    /// 取出并清空待显示的提示
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn navigation(&self) -> Option<&Navigation> {
        self.navigation.as_ref()
    }

    pub fn last_error(&self) -> Option<&ExamError> {
        self.last_error.as_ref()
    }

    /// 本地阶段是否因提交失败而与服务端不一致
    pub fn is_desynced(&self) -> bool {
        self.desynced
    }

    // ========== 初始化 ==========

    /// 初始化会话
    ///
    /// 每个编排器只执行一次，重复调用直接返回
    pub async fn initialize(&mut self, source: SessionSource) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        if !self.init_latch.try_acquire() {
            debug!("编排器已初始化，忽略重复调用");
            return Ok(());
        }

        match source {
            SessionSource::Provided(session) => {
                info!("📋 使用外部提供的会话: {}", session.exam_id);
                self.replace_session(session);
                self.enter_start();
                Ok(())
            }
            SessionSource::Resumed(session) => {
                info!("📋 恢复会话: {} (阶段 '{}')", session.exam_id, session.progress);
                self.replace_session(session);
                self.enter_server_phase();
                Ok(())
            }
            SessionSource::Existing(exam_id) => self.load(Some(exam_id)).await,
            SessionSource::New => self.load(None).await,
        }
    }

    async fn load(&mut self, exam_id: Option<String>) -> Result<()> {
        self.state = LifecycleState::Loading;

        let key = exam_id.clone().unwrap_or_else(|| NEW_SESSION_KEY.to_string());
        let operation = match &exam_id {
            Some(id) => format!("GET /exam/{}", id),
            None => "GET /exam".to_string(),
        };
        if self.loads.is_in_flight(&key) {
            info!("🔍 加入在途加载: {}", operation);
        } else {
            info!("🔍 加载考试: {}", operation);
        }

        let api = Arc::clone(&self.api);
        let result = self
            .loads
            .load_once(&key, move || async move {
                match exam_id {
                    Some(id) => api.fetch_exam(&id).await,
                    None => api.create_exam().await,
                }
            })
            .await;

        match result {
            Ok(session) => {
                info!(
                    "✓ 考试 {} 加载成功，阶段 '{}'，{} 道题",
                    session.exam_id,
                    session.progress,
                    session.questions.len()
                );
                self.replace_session(session);
                self.enter_start();
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                error!("❌ 考试不存在 ({}): {}", operation, e);
                self.navigation = Some(Navigation::NotFound {
                    exam_id: key.clone(),
                });
                self.last_error = Some(e.clone());
                Err(e)
            }
            Err(e) => {
                error!("❌ 考试加载失败 ({}): {}", operation, e);
                self.state = LifecycleState::Error;
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    // ========== 用户操作 ==========

    /// 离开说明页
    pub fn start(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.require_state(LifecycleState::Start, "start")?;
        self.stop_timer();

        if self.config.require_continue {
            info!("{} ⏸ 等待继续", self.ctx());
            self.state = LifecycleState::Pending;
        } else {
            self.enter_server_phase();
        }
        Ok(())
    }

    /// PENDING → IN_PROGRESS
    pub fn continue_exam(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.require_state(LifecycleState::Pending, "continue_exam")?;
        self.enter_server_phase();
        Ok(())
    }

    /// 记录作答
    ///
    /// 只接受当前阶段的题目；单选题必须是该题已有的选项
    pub fn set_answer(&mut self, question_id: &str, answer: Answer) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.require_state(LifecycleState::InProgress, "set_answer")?;

        let descriptor = self
            .descriptor()
            .ok_or_else(|| ExamError::invalid_answer(question_id, "当前阶段没有可作答的题目"))?;
        let question = descriptor
            .questions
            .iter()
            .find(|q| q.question_id == question_id)
            .ok_or_else(|| ExamError::invalid_answer(question_id, "题目不属于当前阶段"))?;

        resolve_value(question, &answer)
            .map_err(|e| ExamError::invalid_answer(question_id, e.to_string()))?;

        self.answers.insert(question_id.to_string(), answer);
        Ok(())
    }

    /// 清除作答
    pub fn clear_answer(&mut self, question_id: &str) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.require_state(LifecycleState::InProgress, "clear_answer")?;
        self.answers.remove(question_id);
        Ok(())
    }

    /// 结束当前阶段并提交
    pub async fn finish_phase(&mut self) -> Result<SubmissionOutcome> {
        if self.disposed {
            return Ok(SubmissionOutcome::Accepted);
        }
        self.require_state(LifecycleState::InProgress, "finish_phase")?;

        let Some(phase) = self.phase else {
            return Err(ExamError::invalid_state("finish_phase", self.state));
        };

        let batch = self.pending_batch();
        self.run_submission(phase, batch).await
    }

    /// 跳过休息
    pub async fn finish_break(&mut self) -> Result<SubmissionOutcome> {
        if self.disposed {
            return Ok(SubmissionOutcome::Accepted);
        }
        self.require_state(LifecycleState::Break, "finish_break")?;

        let batch = self.pending_batch();
        self.run_submission(InternalPhase::Break, batch).await
    }

    // ========== 计时事件 ==========

    /// 等待下一个计时事件
    ///
    /// 没有运行中的计时器时返回 `None`
    pub async fn next_event(&mut self) -> Option<TimerEvent> {
        if self.disposed || self.timer.is_none() {
            return None;
        }
        self.events_rx.recv().await
    }

    /// 处理计时事件
    ///
    /// 旧计时器的事件直接丢弃；到期事件只触发一次对应动作
    pub async fn handle_event(&mut self, event: TimerEvent) -> Result<()> {
        if self.disposed {
            return Ok(());
        }

        let current = self.timer.as_ref().map(|t| t.generation());
        if current != Some(event.generation) {
            debug!(
                "丢弃过期计时事件 #{} (当前 {:?})",
                event.generation, current
            );
            return Ok(());
        }

        self.remaining_seconds = Some(event.remaining);
        if !event.is_expired() {
            return Ok(());
        }

        // 先摘掉计时器，保证同一个阶段不会再次触发
        self.stop_timer();
        info!("{} ⏰ 计时结束 {:?}", self.ctx(), event.kind);

        match event.kind {
            TimerKind::StartGrace if self.state == LifecycleState::Start => self.start(),
            TimerKind::Phase(InternalPhase::Break) if self.state == LifecycleState::Break => {
                self.finish_break().await.map(|_| ())
            }
            TimerKind::Phase(phase)
                if self.state == LifecycleState::InProgress && self.phase == Some(phase) =>
            {
                self.finish_phase().await.map(|_| ())
            }
            kind => {
                warn!(
                    "{} 计时结束时状态为 {}，忽略 {:?}",
                    self.ctx(),
                    self.state,
                    kind
                );
                Ok(())
            }
        }
    }

    /// 处理一个计时事件，没有运行中的计时器时返回 `false`
    pub async fn pump(&mut self) -> Result<bool> {
        match self.next_event().await {
            Some(event) => {
                self.handle_event(event).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 销毁编排器：停止计时，之后所有操作都不再生效
    ///
    /// 在途的加载或提交随其 future 一起丢弃即取消
    pub fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.stop_timer();
        self.disposed = true;
        info!("{} 编排器已销毁", self.ctx());
    }

    // ========== 内部流程 ==========

    /// 整体替换会话，并映射一次服务端阶段
    fn replace_session(&mut self, session: ExamSession) {
        if self.mapper.is_terminal(&session.progress) {
            debug!("服务端报告考试 {} 已结束", session.exam_id);
        }
        self.server_phase = self.mapper.map(&session.progress);
        self.session = Some(session);
    }

    /// 服务端当前阶段的全部题目
    ///
    /// 与本地阶段一致时就是阶段描述里的题目；本地因提交失败已提前推进时，
    /// 服务端仍停在未确认的阶段，需要按它的题目提交，保留的作答一并带上。
    /// 服务端处于休息或已结束时为空。
    fn server_phase_questions(&self) -> Vec<Question> {
        match (self.session.as_ref(), self.server_phase.and_then(InternalPhase::module)) {
            (Some(session), Some(module)) => session.questions_for(module),
            _ => Vec::new(),
        }
    }

    /// 编码要提交的答案，每道服务端阶段题目恰好一条
    fn pending_batch(&self) -> Result<Vec<SubmittedAnswer>> {
        if self.desynced {
            warn!(
                "{} ⚠️ 本地阶段与服务端 {:?} 不一致，按服务端阶段提交",
                self.ctx(),
                self.server_phase
            );
        }
        let questions = self.server_phase_questions();
        encode_submission(&questions, &self.answers).map_err(ExamError::from)
    }

    /// 提交流程
    ///
    /// 1. 停止计时器
    /// 2. 进入 LOADING，提交答案
    /// 3. 成功：整体替换会话，按服务端阶段转换
    /// 4. 失败：提示并按后继阶段本地推进
    async fn run_submission(
        &mut self,
        from: InternalPhase,
        batch: Result<Vec<SubmittedAnswer>>,
    ) -> Result<SubmissionOutcome> {
        self.stop_timer();

        let Some(exam_id) = self.session.as_ref().map(|s| s.exam_id.clone()) else {
            return Err(ExamError::invalid_state("submit", self.state));
        };
        let operation = format!("POST /exam/{}/submit", exam_id);

        let result = match batch {
            Ok(batch) => {
                info!(
                    "{} 📤 提交 {} 条答案 ({} 条空白)",
                    self.ctx(),
                    batch.len(),
                    batch.iter().filter(|a| a.is_blank()).count()
                );
                self.state = LifecycleState::Loading;
                self.api.submit(&exam_id, &batch).await
            }
            Err(e) => {
                error!("{} ❌ 答案编码失败，这是程序缺陷: {}", self.ctx(), e);
                Err(e)
            }
        };

        match result {
            Ok(session) => {
                info!(
                    "{} ✓ 提交成功，服务端阶段 '{}'",
                    self.ctx(),
                    session.progress
                );
                self.replace_session(session);
                self.desynced = false;
                self.apply_phase(self.server_phase);
                Ok(SubmissionOutcome::Accepted)
            }
            Err(e) if e.is_not_found() => {
                error!("{} ❌ 提交时考试不存在 ({}): {}", self.ctx(), operation, e);
                self.navigation = Some(Navigation::NotFound { exam_id });
                self.state = LifecycleState::Error;
                self.last_error = Some(e.clone());
                Err(e)
            }
            Err(e) => {
                let e = ExamError::submission(&operation, e);
                let fallback = from.successor();
                error!("{} ❌ {}", self.ctx(), e);
                warn!(
                    "{} ⚠️ 本地推进到 {:?}，与服务端阶段 '{}' 可能不一致",
                    self.ctx(),
                    fallback,
                    self.session.as_ref().map(|s| s.progress.as_str()).unwrap_or_default()
                );
                self.notices
                    .push(Notice::new(format!("答案提交失败，已进入下一阶段: {}", e)));
                self.last_error = Some(e);
                self.desynced = true;
                self.apply_phase(fallback);
                Ok(SubmissionOutcome::LocalFallback)
            }
        }
    }

    fn enter_start(&mut self) {
        self.phase = None;
        self.state = LifecycleState::Start;
        info!("{} 📖 说明页，{} 秒后自动开始", self.ctx(), self.config.start_grace_secs);
        self.start_timer(TimerKind::StartGrace, self.config.start_grace_secs);
    }

    /// 进入服务端当前报告的阶段
    fn enter_server_phase(&mut self) {
        self.apply_phase(self.server_phase);
    }

    fn apply_phase(&mut self, next: Option<InternalPhase>) {
        self.stop_timer();
        self.phase = next;

        match next {
            None => {
                self.state = LifecycleState::Completed;
                let exam_id = self
                    .session
                    .as_ref()
                    .map(|s| s.exam_id.clone())
                    .unwrap_or_default();
                info!("{} 🏁 考试完成", self.ctx());
                self.navigation = Some(Navigation::Results { exam_id });
            }
            Some(InternalPhase::Break) => {
                self.state = LifecycleState::Break;
                info!("{} ☕ 休息 {} 分钟", self.ctx(), self.config.break_minutes);
                self.start_timer(
                    TimerKind::Phase(InternalPhase::Break),
                    self.config.seconds_for(InternalPhase::Break),
                );
            }
            Some(phase) => {
                self.state = LifecycleState::InProgress;
                match self.descriptor() {
                    Some(descriptor) => info!("{} ▶ 开始答题 {}", self.ctx(), descriptor),
                    None => warn!("{} ⚠️ 开始答题，但没有可显示的题目", self.ctx()),
                }
                self.start_timer(TimerKind::Phase(phase), self.config.seconds_for(phase));
            }
        }
    }

    fn start_timer(&mut self, kind: TimerKind, total_secs: u64) {
        self.stop_timer();
        self.timer_generation += 1;
        self.remaining_seconds = Some(total_secs);
        self.timer = Some(CountdownTimer::start(
            self.timer_generation,
            kind,
            total_secs,
            self.events_tx.clone(),
        ));
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
        self.remaining_seconds = None;
    }

    fn require_state(&self, expected: LifecycleState, action: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            warn!("{} 状态 {} 下不能执行 {}", self.ctx(), self.state, action);
            Err(ExamError::invalid_state(action, self.state))
        }
    }

    fn ctx(&self) -> SessionCtx {
        SessionCtx::new(
            self.session
                .as_ref()
                .map(|s| s.exam_id.as_str())
                .unwrap_or(NEW_SESSION_KEY),
            self.phase,
        )
    }
}

impl Drop for SessionOrchestrator {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerOption, Module, Question, QuestionType};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    /// 按脚本返回结果的假服务
    #[derive(Default)]
    struct ScriptedApi {
        fetch: Mutex<Vec<Result<ExamSession>>>,
        submits: Mutex<Vec<Result<ExamSession>>>,
        submitted: Mutex<Vec<Vec<SubmittedAnswer>>>,
    }

    #[async_trait]
    impl ExamApi for ScriptedApi {
        async fn fetch_exam(&self, exam_id: &str) -> Result<ExamSession> {
            self.fetch.lock().unwrap().pop().unwrap_or(Err(ExamError::NotFound {
                exam_id: exam_id.to_string(),
            }))
        }

        async fn create_exam(&self) -> Result<ExamSession> {
            self.fetch_exam(NEW_SESSION_KEY).await
        }

        async fn submit(&self, _exam_id: &str, answers: &[SubmittedAnswer]) -> Result<ExamSession> {
            self.submitted.lock().unwrap().push(answers.to_vec());
            self.submits.lock().unwrap().remove(0)
        }
    }

    fn questions() -> Vec<Question> {
        vec![
            Question {
                question_id: "rw1".to_string(),
                question_type: QuestionType::Choice,
                content: "pick".to_string(),
                image_url: None,
                module: Module::ReadingWriting,
                options: vec![AnswerOption {
                    option_id: "rw1-a".to_string(),
                    value: "A".to_string(),
                }],
            },
            Question {
                question_id: "rw2".to_string(),
                question_type: QuestionType::Text,
                content: "write".to_string(),
                image_url: None,
                module: Module::ReadingWriting,
                options: Vec::new(),
            },
        ]
    }

    fn session(progress: &str) -> ExamSession {
        ExamSession {
            exam_id: "exam-1".to_string(),
            progress: progress.to_string(),
            questions: questions(),
        }
    }

    fn orchestrator(api: Arc<ScriptedApi>) -> SessionOrchestrator {
        let config = Config {
            require_continue: false,
            ..Config::default()
        };
        SessionOrchestrator::new(api, RequestDeduplicator::new(), config)
    }

    #[tokio::test]
    async fn test_provided_session_starts_at_start_screen() {
        let api = Arc::new(ScriptedApi::default());
        let mut orch = orchestrator(api);

        assert_ok!(orch.initialize(SessionSource::Provided(session("section-1"))).await);
        assert_eq!(orch.state(), LifecycleState::Start);
        assert!(orch.descriptor().is_none());

        assert_ok!(orch.start());
        assert_eq!(orch.state(), LifecycleState::InProgress);
        assert_eq!(orch.phase(), Some(InternalPhase::Phase1));
        assert_eq!(orch.descriptor().unwrap().questions.len(), 2);
    }

    #[tokio::test]
    async fn test_second_initialize_is_ignored() {
        let api = Arc::new(ScriptedApi::default());
        let mut orch = orchestrator(api);

        assert_ok!(orch.initialize(SessionSource::Resumed(session("section-1"))).await);
        assert_ok!(orch.initialize(SessionSource::Resumed(session("break"))).await);
        assert_eq!(orch.state(), LifecycleState::InProgress);
        assert_eq!(orch.phase(), Some(InternalPhase::Phase1));
    }

    #[tokio::test]
    async fn test_set_answer_validation() {
        let api = Arc::new(ScriptedApi::default());
        let mut orch = orchestrator(api);
        assert_ok!(orch.initialize(SessionSource::Resumed(session("section-1"))).await);

        assert_ok!(orch.set_answer("rw1", Answer::Choice("rw1-a".to_string())));
        assert_ok!(orch.set_answer("rw2", Answer::Text("because".to_string())));
        assert_eq!(orch.answered_count(), 2);

        assert_err!(orch.set_answer("rw1", Answer::Choice("rw1-z".to_string())));
        assert_err!(orch.set_answer("rw2", Answer::Choice("rw1-a".to_string())));
        assert_err!(orch.set_answer("m1", Answer::Text("1".to_string())));

        assert_ok!(orch.clear_answer("rw2"));
        assert_eq!(orch.answered_count(), 1);
    }

    #[tokio::test]
    async fn test_actions_rejected_in_wrong_state() {
        let api = Arc::new(ScriptedApi::default());
        let mut orch = orchestrator(api);
        assert_ok!(orch.initialize(SessionSource::Provided(session("section-1"))).await);

        assert_err!(orch.continue_exam());
        assert_err!(orch.finish_phase().await);
        assert_err!(orch.finish_break().await);
        assert_err!(orch.set_answer("rw1", Answer::Choice("rw1-a".to_string())));
    }

    #[tokio::test]
    async fn test_unknown_marker_is_mapped_when_session_is_replaced() {
        let api = Arc::new(ScriptedApi::default());
        let mut orch = orchestrator(api);
        assert_ok!(orch.initialize(SessionSource::Resumed(session("warmup"))).await);

        // 映射结果随会话缓存，渲染时不再重新映射
        assert_eq!(orch.server_phase, Some(InternalPhase::Phase1));
        assert_eq!(orch.phase(), Some(InternalPhase::Phase1));
        for _ in 0..3 {
            assert_eq!(orch.descriptor().unwrap().questions.len(), 2);
        }
        assert_ok!(orch.set_answer("rw1", Answer::Choice("rw1-a".to_string())));
        assert_eq!(orch.answered_count(), 1);
    }

    #[tokio::test]
    async fn test_resumed_at_end_is_completed() {
        let api = Arc::new(ScriptedApi::default());
        let mut orch = orchestrator(api);
        assert_ok!(orch.initialize(SessionSource::Resumed(session("end"))).await);

        assert_eq!(orch.state(), LifecycleState::Completed);
        assert!(orch.descriptor().is_none());
        assert_eq!(
            orch.navigation(),
            Some(&Navigation::Results {
                exam_id: "exam-1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_teardown_makes_operations_no_ops() {
        let api = Arc::new(ScriptedApi::default());
        let mut orch = orchestrator(api.clone());
        assert_ok!(orch.initialize(SessionSource::Resumed(session("section-1"))).await);

        orch.teardown();
        assert!(orch.next_event().await.is_none());
        assert!(!assert_ok!(orch.pump().await));
        assert_ok!(orch.finish_phase().await);
        assert!(api.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_timer_event_is_ignored() {
        let api = Arc::new(ScriptedApi::default());
        let mut orch = orchestrator(api.clone());
        assert_ok!(orch.initialize(SessionSource::Resumed(session("section-1"))).await);

        let stale = TimerEvent {
            generation: 0,
            kind: TimerKind::Phase(InternalPhase::Phase1),
            remaining: 0,
        };
        assert_ok!(orch.handle_event(stale).await);
        assert_eq!(orch.state(), LifecycleState::InProgress);
        assert!(api.submitted.lock().unwrap().is_empty());
    }
}
