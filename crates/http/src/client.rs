use crate::upload::{load_attachments, progress_part, UploadCounter};
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response};
use sobra_core::{
    ClientConfig, CreatePatientRequest, Group, ProgressObserver, RegistrationService,
    ServiceError,
};
use std::sync::Arc;

#[derive(Debug, serde::Deserialize)]
struct CreatePatientResponse {
    message: String,
}

/// [`RegistrationService`] backed by the registration REST API.
#[derive(Debug, Clone)]
pub struct HttpRegistrationService {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpRegistrationService {
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(transport)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.api_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn transport(e: reqwest::Error) -> ServiceError {
    ServiceError::Transport(e.to_string())
}

/// Turns a non-2xx response into [`ServiceError::Status`] carrying the body text.
async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ServiceError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RegistrationService for HttpRegistrationService {
    async fn fetch_groups(&self, category: &str) -> Result<Vec<Group>, ServiceError> {
        let url = self.config.endpoint("groups");
        tracing::debug!(%url, category, "fetching groups");

        let response = self
            .authorize(self.client.get(&url).query(&[("category", category)]))
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;

        response
            .json::<Vec<Group>>()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }

    async fn create_patient(
        &self,
        request: CreatePatientRequest,
        progress: Arc<dyn ProgressObserver>,
    ) -> Result<String, ServiceError> {
        let loaded = load_attachments(&request.attachments).await?;
        let total: u64 = loaded.iter().map(|a| a.bytes.len() as u64).sum();
        let counter = Arc::new(UploadCounter::new(total, progress));

        let mut form = Form::new();
        for (name, value) in request.patient.text_fields() {
            form = form.text(name, value.to_string());
        }
        form = form
            .text("category", request.category)
            .text(
                "groupId",
                request.group_id.map(|id| id.to_string()).unwrap_or_default(),
            )
            .text("flag", request.flag);
        if let Some(extra) = request.extra {
            form = form.text("extra", extra);
        }
        for attachment in loaded {
            let field = attachment.slot.form_field();
            form = form.part(field, progress_part(attachment, counter.clone())?);
        }

        let url = self.config.endpoint("patients");
        tracing::info!(%url, bytes = total, "uploading registration");

        let response = self
            .authorize(self.client.post(&url).multipart(form))
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;

        let body = response
            .json::<CreatePatientResponse>()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        counter.finish();

        Ok(body.message)
    }
}
