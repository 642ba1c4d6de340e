//! EmailJS REST delivery

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use super::{ContactForm, FormErrors};
use crate::config::ContactConfig;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Email service is not configured. Please contact me directly at {0}")]
    NotConfigured(String),

    #[error("Form has invalid fields")]
    Invalid(FormErrors),

    #[error("Failed to reach the mail relay: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail relay rejected the message ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    from_name: &'a str,
    from_email: &'a str,
    subject: &'a str,
    message: &'a str,
    to_name: &'a str,
}

#[derive(Debug, Clone)]
struct Credentials {
    service_id: String,
    template_id: String,
    user_id: String,
}

/// Sends validated contact forms through EmailJS
#[derive(Debug, Clone)]
pub struct Mailer {
    http: reqwest::Client,
    endpoint: String,
    to_name: String,
    fallback_email: String,
    credentials: Option<Credentials>,
}

impl Mailer {
    pub fn new(config: &ContactConfig) -> Result<Self, MailError> {
        let present = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        let credentials = match (
            present(&config.service_id),
            present(&config.template_id),
            present(&config.user_id),
        ) {
            (Some(service_id), Some(template_id), Some(user_id)) => Some(Credentials {
                service_id,
                template_id,
                user_id,
            }),
            _ => None,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            to_name: config.to_name.clone(),
            fallback_email: config.fallback_email.clone(),
            credentials,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Validate and deliver a form
    pub async fn send(&self, form: &ContactForm) -> Result<(), MailError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(MailError::Invalid(errors));
        }
        let Some(creds) = &self.credentials else {
            return Err(MailError::NotConfigured(self.fallback_email.clone()));
        };

        let request = SendRequest {
            service_id: &creds.service_id,
            template_id: &creds.template_id,
            user_id: &creds.user_id,
            template_params: TemplateParams {
                from_name: form.name.trim(),
                from_email: form.email.trim(),
                subject: form.subject_or_default(),
                message: form.message.trim(),
                to_name: &self.to_name,
            },
        };

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status, body });
        }

        tracing::info!("Contact message from {} delivered", form.email.trim());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: String::new(),
            message: "Hello there, nice site!".to_string(),
        }
    }

    fn configured(server: &MockServer) -> ContactConfig {
        ContactConfig {
            service_id: Some("svc".to_string()),
            template_id: Some("tpl".to_string()),
            user_id: Some("usr".to_string()),
            endpoint: server.url("/api/v1.0/email/send"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sends_template_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1.0/email/send")
                    .json_body(serde_json::json!({
                        "service_id": "svc",
                        "template_id": "tpl",
                        "user_id": "usr",
                        "template_params": {
                            "from_name": "Ada",
                            "from_email": "ada@example.com",
                            "subject": "New Contact Form Submission",
                            "message": "Hello there, nice site!",
                            "to_name": "Jack Luo"
                        }
                    }));
                then.status(200).body("OK");
            })
            .await;

        let mailer = Mailer::new(&configured(&server)).unwrap();
        mailer.send(&form()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unconfigured_message() {
        let mailer = Mailer::new(&ContactConfig::default()).unwrap();
        assert!(!mailer.is_configured());
        let err = mailer.send(&form()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Email service is not configured. Please contact me directly at jack@hexahacks.com"
        );
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200);
            })
            .await;

        let mailer = Mailer::new(&configured(&server)).unwrap();
        let mut bad = form();
        bad.message = "hi".to_string();
        match mailer.send(&bad).await {
            Err(MailError::Invalid(errors)) => assert!(errors.message.is_some()),
            other => panic!("unexpected: {:?}", other),
        }
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_relay_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(400).body("The user ID is invalid");
            })
            .await;

        let mailer = Mailer::new(&configured(&server)).unwrap();
        let err = mailer.send(&form()).await.unwrap_err();
        assert!(matches!(err, MailError::Rejected { .. }));
    }
}
