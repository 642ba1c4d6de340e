//! Contact form validation and delivery

mod mailer;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use mailer::{MailError, Mailer};

const NAME_MIN: usize = 2;
const SUBJECT_MAX: usize = 100;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 1000;

/// Subject used when the sender leaves it blank
pub const DEFAULT_SUBJECT: &str = "New Contact Form Submission";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Per-field validation messages; empty when the form is valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.subject.is_none() && self.message.is_none()
    }
}

impl ContactForm {
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.name = Some("Name is required");
        } else if name.chars().count() < NAME_MIN {
            errors.name = Some("Name must be at least 2 characters");
        }

        if self.email.trim().is_empty() {
            errors.email = Some("Email is required");
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.email = Some("Please enter a valid email address");
        }

        if self.subject.trim().chars().count() > SUBJECT_MAX {
            errors.subject = Some("Subject must be less than 100 characters");
        }

        let message = self.message.trim();
        let length = message.chars().count();
        if message.is_empty() {
            errors.message = Some("Message is required");
        } else if length < MESSAGE_MIN {
            errors.message = Some("Message must be at least 10 characters");
        } else if length > MESSAGE_MAX {
            errors.message = Some("Message must be less than 1000 characters");
        }

        errors
    }

    /// Subject line actually sent
    pub fn subject_or_default(&self) -> &str {
        match self.subject.trim() {
            "" => DEFAULT_SUBJECT,
            subject => subject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: String::new(),
            message: "Hello there, nice site!".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(valid().validate().is_empty());
        assert_eq!(valid().subject_or_default(), DEFAULT_SUBJECT);
    }

    #[test]
    fn test_name_rules() {
        let mut form = valid();
        form.name = "   ".to_string();
        assert_eq!(form.validate().name, Some("Name is required"));
        form.name = " A ".to_string();
        assert_eq!(form.validate().name, Some("Name must be at least 2 characters"));
    }

    #[test]
    fn test_email_rules() {
        let mut form = valid();
        for bad in ["ada", "ada@example", "a da@example.com", "@example.com"] {
            form.email = bad.to_string();
            assert_eq!(
                form.validate().email,
                Some("Please enter a valid email address"),
                "{}",
                bad
            );
        }
        form.email = String::new();
        assert_eq!(form.validate().email, Some("Email is required"));
    }

    #[test]
    fn test_length_limits() {
        let mut form = valid();
        form.subject = "s".repeat(101);
        form.message = "short".to_string();
        let errors = form.validate();
        assert!(errors.subject.is_some());
        assert_eq!(errors.message, Some("Message must be at least 10 characters"));

        form.subject = "s".repeat(100);
        form.message = "m".repeat(1001);
        let errors = form.validate();
        assert!(errors.subject.is_none());
        assert_eq!(errors.message, Some("Message must be less than 1000 characters"));

        form.message = format!("  {}  ", "m".repeat(1000));
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_errors_serialize_only_failed_fields() {
        let mut form = valid();
        form.name.clear();
        let json = serde_json::to_value(form.validate()).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Name is required"}));
    }
}
