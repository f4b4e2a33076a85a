//! Typed accessors for every Planty REST operation.
//!
//! Each method builds one [`ApiRequest`], sends it through the transport and
//! decodes the response. Nothing here caches or retries; see
//! [`Store`](super::store::Store) for the cached, invalidating layer.

use super::error::ApiError;
use super::transport::{ApiRequest, HttpTransport, Transport};
use crate::libs::attachment::{self, EncryptedFile};
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::form::{SectionCreate, SectionMove, SectionUpdate, TaskCreate, TaskUpdate};
use crate::libs::hierarchy::SectionsQuery;
use crate::libs::reorder::TaskMove;
use crate::libs::section::Section;
use crate::libs::task::{ArchivedTasks, Attachment, AttachmentUploadInfo, Task, TasksByDate, User};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct Created {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct UpdatedTask {
    task: Task,
}

#[derive(Debug, Serialize)]
struct AttachmentUploadRequest<'a> {
    task_id: Uuid,
    aes_key_b64: &'a str,
    aes_iv_b64: &'a str,
}

pub struct PlantyApi<T: Transport = HttpTransport> {
    transport: T,
}

impl<T: Transport> PlantyApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn call<R: serde::de::DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        self.transport.send(request).await?.error_for_status()?.json()
    }

    async fn call_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.transport.send(request).await?.error_for_status()?;
        Ok(())
    }

    // --- auth ---

    /// Form login; on success the transport keeps the session cookie.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post("/auth/login").form(&[("username", email), ("password", password)]);
        self.call_empty(request).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.call_empty(ApiRequest::post("/auth/logout")).await;
        self.transport.clear_session();
        match result {
            Err(ApiError::Unauthorized) | Ok(()) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let request = ApiRequest::post("/auth/register").json(&json!({"email": email, "password": password}))?;
        self.call(request).await
    }

    /// Current user; `Ok(None)` when the session is missing or expired.
    pub async fn me(&self) -> Result<Option<User>, ApiError> {
        match self.call(ApiRequest::get("/auth/me")).await {
            Ok(user) => Ok(Some(user)),
            Err(ApiError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // --- tasks ---

    pub async fn create_task(&self, payload: &TaskCreate) -> Result<Uuid, ApiError> {
        let created: Created = self.call(ApiRequest::post("/task").json(payload)?).await?;
        Ok(created.id)
    }

    pub async fn update_task(&self, payload: &TaskUpdate) -> Result<Task, ApiError> {
        let updated: UpdatedTask = self.call(ApiRequest::patch("/task").json(payload)?).await?;
        Ok(updated.task)
    }

    pub async fn remove_task(&self, task_id: Uuid) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::delete("/task").json(&json!({ "task_id": task_id }))?)
            .await
    }

    pub async fn move_task(&self, payload: &TaskMove) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::post("/task/move").json(payload)?).await
    }

    /// Returns the task's section as it is after the toggle.
    pub async fn toggle_completed(&self, task_id: Uuid, auto_archive: bool) -> Result<Section, ApiError> {
        let body = json!({ "task_id": task_id, "auto_archive": auto_archive });
        self.call(ApiRequest::post("/task/toggle_completed").json(&body)?).await
    }

    pub async fn toggle_archived(&self, task_id: Uuid) -> Result<Section, ApiError> {
        let body = json!({ "task_id": task_id });
        self.call(ApiRequest::post("/task/toggle_archived").json(&body)?).await
    }

    pub async fn tasks_by_date(&self, not_before: NaiveDate, not_after: NaiveDate) -> Result<TasksByDate, ApiError> {
        let request = ApiRequest::get("/task/by_date")
            .query("not_before", not_before.format("%Y-%m-%d"))
            .query("not_after", not_after.format("%Y-%m-%d"));
        self.call(request).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Task>, ApiError> {
        self.call(ApiRequest::get("/task/search").query("query", query)).await
    }

    pub async fn archived(&self) -> Result<ArchivedTasks, ApiError> {
        self.call(ApiRequest::get("/tasks/archived")).await
    }

    // --- sections ---

    pub async fn create_section(&self, payload: &SectionCreate) -> Result<Uuid, ApiError> {
        let created: Created = self.call(ApiRequest::post("/section").json(payload)?).await?;
        Ok(created.id)
    }

    pub async fn edit_section(&self, payload: &SectionUpdate) -> Result<Section, ApiError> {
        self.call(ApiRequest::patch("/section").json(payload)?).await
    }

    pub async fn section(&self, section_id: Uuid) -> Result<Section, ApiError> {
        self.call(ApiRequest::get(format!("/section/{}", section_id))).await
    }

    pub async fn move_section(&self, payload: &SectionMove) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::post("/section/move").json(payload)?).await
    }

    pub async fn shuffle_section(&self, section_id: Uuid) -> Result<Section, ApiError> {
        let body = json!({ "section_id": section_id });
        self.call(ApiRequest::post("/section/shuffle").json(&body)?).await
    }

    /// Both flags are always sent: the backend defaults `leaves_only` to true.
    pub async fn sections(&self, query: SectionsQuery) -> Result<Vec<Section>, ApiError> {
        let request = ApiRequest::get("/sections")
            .query("leaves_only", query.leaves_only)
            .query("as_tree", query.as_tree);
        self.call(request).await
    }

    // --- attachments ---

    pub async fn attachment_upload_info(&self, task_id: Uuid, file: &EncryptedFile) -> Result<AttachmentUploadInfo, ApiError> {
        let body = AttachmentUploadRequest {
            task_id,
            aes_key_b64: &file.aes_key_b64,
            aes_iv_b64: &file.aes_iv_b64,
        };
        self.call(ApiRequest::post("/task/attachment").json(&body)?).await
    }

    pub async fn remove_attachment(&self, task_id: Uuid, attachment_id: Uuid) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::delete(format!("/task/{}/attachment/{}", task_id, attachment_id)))
            .await
    }
}

impl PlantyApi<HttpTransport> {
    /// Client for the configured backend with the session kept in the default
    /// data directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(HttpTransport::new(&config.api_url(), &DataStorage::new()))
    }

    /// Registers the attachment with the API, then posts the ciphertext
    /// straight to the storage bucket.
    pub async fn upload_attachment(&self, task_id: Uuid, file: EncryptedFile) -> anyhow::Result<()> {
        let info = self.attachment_upload_info(task_id, &file).await?;
        let form = attachment::upload_form(&info, file)?;

        let res = self.transport.client().post(&info.post_url).multipart(form).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &body).into());
        }
        tracing::debug!(%task_id, status = status.as_u16(), "attachment uploaded");
        Ok(())
    }

    /// Downloads an attachment and returns the decrypted bytes.
    pub async fn download_attachment(&self, attachment: &Attachment) -> anyhow::Result<Vec<u8>> {
        let res = self.transport.client().get(&attachment.url).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &body).into());
        }
        let ciphertext = res.bytes().await?;
        Ok(attachment::decrypt_attachment(&ciphertext, &attachment.aes_key_b64, &attachment.aes_iv_b64)?)
    }
}
