/// 考试服务 API 客户端
///
/// 封装所有与考试服务相关的调用逻辑
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ExamError, Result};
use crate::models::{ExamSession, SubmittedAnswer};

/// 考试服务接口
///
/// 编排器只依赖这个 trait，测试时可注入假实现
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// `GET /exam/{id}`
    async fn fetch_exam(&self, exam_id: &str) -> Result<ExamSession>;

    /// `GET /exam`：分配一场新考试
    async fn create_exam(&self) -> Result<ExamSession>;

    /// `POST /exam/{id}/submit`；休息结束时 `answers` 为空
    async fn submit(&self, exam_id: &str, answers: &[SubmittedAnswer]) -> Result<ExamSession>;
}

/// 基于 reqwest 的考试服务客户端
pub struct ExamClient {
    http: Client,
    base_url: String,
}

impl ExamClient {
    /// 创建新的考试服务客户端
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ExamError::network("build http client", e))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 解析会话响应
    ///
    /// - 404 → `NotFound`
    /// - 其他非成功状态 → `BadStatus`
    /// - 缺字段或无法解析 → `MalformedResponse`
    async fn read_session(
        response: Response,
        operation: &str,
        exam_id: Option<&str>,
    ) -> Result<ExamSession> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            warn!("{} 返回 404", operation);
            return Err(ExamError::NotFound {
                exam_id: exam_id.unwrap_or_default().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExamError::network(operation, e))?;

        if !status.is_success() {
            return Err(ExamError::BadStatus {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        parse_session(&body, operation)
    }
}

/// 解析会话 JSON，`examId` 为空视为格式错误
pub fn parse_session(body: &str, operation: &str) -> Result<ExamSession> {
    let session: ExamSession =
        serde_json::from_str(body).map_err(|e| ExamError::malformed(operation, e))?;

    if session.exam_id.trim().is_empty() {
        return Err(ExamError::malformed(
            operation,
            <serde_json::Error as serde::de::Error>::custom("examId is empty"),
        ));
    }

    debug!(
        "{} → 考试 {} 阶段 '{}'，{} 道题",
        operation,
        session.exam_id,
        session.progress,
        session.questions.len()
    );
    Ok(session)
}

#[async_trait]
impl ExamApi for ExamClient {
    async fn fetch_exam(&self, exam_id: &str) -> Result<ExamSession> {
        let operation = format!("GET /exam/{}", exam_id);
        let response = self
            .http
            .get(self.url(&format!("exam/{}", exam_id)))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ExamError::network(&operation, e))?;

        Self::read_session(response, &operation, Some(exam_id)).await
    }

    async fn create_exam(&self) -> Result<ExamSession> {
        let operation = "GET /exam";
        let response = self
            .http
            .get(self.url("exam"))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ExamError::network(operation, e))?;

        Self::read_session(response, operation, None).await
    }

    async fn submit(&self, exam_id: &str, answers: &[SubmittedAnswer]) -> Result<ExamSession> {
        let operation = format!("POST /exam/{}/submit", exam_id);
        debug!("{} Payload: {} 条答案", operation, answers.len());

        let response = self
            .http
            .post(self.url(&format!("exam/{}/submit", exam_id)))
            .header("Accept", "application/json")
            .json(answers)
            .send()
            .await
            .map_err(|e| ExamError::network(&operation, e))?;

        Self::read_session(response, &operation, Some(exam_id)).await
    }
}
