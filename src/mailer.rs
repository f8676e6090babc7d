//! Outbound mail relay for the site's form submissions.
//!
//! Wraps the async SMTP transport: each form submission becomes one
//! plain-text message to the configured admin address, with the submitter
//! as reply-to. Sends are fire-and-forget; a failure is reported to the
//! caller and not queued for retry.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use chrono::Utc;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use regex::Regex;
use tracing::info;

use crate::config::Config;

/// A contact-page submission.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A bespoke-solution request from the business page.
#[derive(Debug, Clone)]
pub struct SolutionRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
}

/// One answered step of the multi-step form.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FormAnswer {
    pub question: String,
    pub answer: String,
}

/// A completed multi-step form (the perfume-finder questionnaire).
#[derive(Debug, Clone)]
pub struct MultiStepForm {
    pub email: String,
    pub answers: Vec<FormAnswer>,
}

/// Check an email address against a single anchored pattern: one `@`,
/// non-empty local part, a dot somewhere in the domain.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Email regex should compile")
    });
    re.is_match(email)
}

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    admin_email: String,
    from_email: String,
}

impl Mailer {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .context("Failed to build SMTP transport")?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            admin_email: config.admin_email.clone(),
            from_email: config.from_email.clone(),
        })
    }

    pub async fn send_contact(&self, submission: &ContactMessage) -> Result<()> {
        self.send(
            "New contact form submission",
            contact_body(submission),
            &submission.email,
        )
        .await
    }

    pub async fn send_solution(&self, request: &SolutionRequest) -> Result<()> {
        self.send(
            "New solution request",
            solution_body(request),
            &request.email,
        )
        .await
    }

    pub async fn send_multi_step(&self, form: &MultiStepForm) -> Result<()> {
        self.send(
            "New perfume finder submission",
            multi_step_body(form),
            &form.email,
        )
        .await
    }

    async fn send(&self, subject: &str, body: String, reply_to: &str) -> Result<()> {
        let email = Message::builder()
            .from(self.from_email.parse().context("Invalid from address")?)
            .reply_to(reply_to.parse().context("Invalid reply-to address")?)
            .to(self.admin_email.parse().context("Invalid admin address")?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .context("Failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("Failed to send email via SMTP relay")?;

        info!(subject = subject, "Form submission forwarded to admin");
        Ok(())
    }
}

// ==================== Body formatting ====================

fn contact_body(submission: &ContactMessage) -> String {
    format!(
        "Contact form submission\n{}\n\nName: {}\nEmail: {}\n\n{}",
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        submission.name,
        submission.email,
        submission.message
    )
}

fn solution_body(request: &SolutionRequest) -> String {
    format!(
        "Solution request\n{}\n\nName: {}\nEmail: {}\nCompany: {}\n\n{}",
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        request.name,
        request.email,
        request.company,
        request.message
    )
}

fn multi_step_body(form: &MultiStepForm) -> String {
    let answers = form
        .answers
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{}. {}\n   {}", i + 1, a.question, a.answer))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Perfume finder submission\n{}\n\nEmail: {}\n\n{}",
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        form.email,
        answers
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Email Validation Tests ====================

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@mail.example.co.uk"));
        assert!(is_valid_email("user+tag@example.io"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email("user@@example.com"));
    }

    // ==================== Body Formatting Tests ====================

    #[test]
    fn test_contact_body_contains_fields() {
        let body = contact_body(&ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "I love the amber one.".to_string(),
        });

        assert!(body.contains("Name: Ada"));
        assert!(body.contains("Email: ada@example.com"));
        assert!(body.contains("I love the amber one."));
        assert!(body.contains(" UTC"));
    }

    #[test]
    fn test_solution_body_contains_company() {
        let body = solution_body(&SolutionRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            company: "Analytical Engines".to_string(),
            message: "Private label inquiry".to_string(),
        });

        assert!(body.contains("Company: Analytical Engines"));
        assert!(body.contains("Private label inquiry"));
    }

    #[test]
    fn test_multi_step_body_numbers_answers() {
        let body = multi_step_body(&MultiStepForm {
            email: "ada@example.com".to_string(),
            answers: vec![
                FormAnswer {
                    question: "Preferred intensity?".to_string(),
                    answer: "Subtle".to_string(),
                },
                FormAnswer {
                    question: "Favourite season?".to_string(),
                    answer: "Autumn".to_string(),
                },
            ],
        });

        assert!(body.contains("1. Preferred intensity?"));
        assert!(body.contains("2. Favourite season?"));
        assert!(body.contains("Email: ada@example.com"));
    }

    #[test]
    fn test_multi_step_body_empty_answers() {
        let body = multi_step_body(&MultiStepForm {
            email: "ada@example.com".to_string(),
            answers: vec![],
        });

        assert!(body.contains("Email: ada@example.com"));
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_mailer_builds_from_config() {
        let config = Config {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_user: "mailer".to_string(),
            smtp_password: "secret".to_string(),
            admin_email: "admin@essenza.example".to_string(),
            from_email: "noreply@essenza.example".to_string(),
            cms_project_url: "https://cms.example.com".to_string(),
            cms_dataset: "production".to_string(),
            cms_api_token: "cms-token".to_string(),
            cms_api_version: "2024-01-01".to_string(),
            instagram_api_base: "https://graph.instagram.com".to_string(),
            instagram_access_token: "ig-token".to_string(),
            instagram_verify_token: "verify-me".to_string(),
            instagram_cache_ttl_secs: 3600,
            site_base_url: "https://essenza.example".to_string(),
            port: 8080,
        };

        let mailer = Mailer::new(&config).expect("Should build mailer");
        assert_eq!(mailer.admin_email, "admin@essenza.example");
        assert_eq!(mailer.from_email, "noreply@essenza.example");
    }
}
