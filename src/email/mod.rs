pub mod templates;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

pub struct SystemMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SystemMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("System SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    pub async fn send_account_created(
        &self,
        to_email: &str,
        to_name: &str,
        role_label: &str,
        base_url: &str,
    ) -> Result<(), String> {
        let html = templates::render_account_created(to_name, role_label, base_url);
        self.send(to_email, "Your StatSubmit account", &html).await
    }

    pub async fn send_awaiting_action(
        &self,
        to_email: &str,
        to_name: &str,
        reference_code: &str,
        status_label: &str,
        submission_url: &str,
    ) -> Result<(), String> {
        let html = templates::render_awaiting_action(
            to_name,
            reference_code,
            status_label,
            submission_url,
        );
        self.send(
            to_email,
            &format!("{reference_code} is awaiting your action - StatSubmit"),
            &html,
        )
        .await
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(to.parse().map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| format!("Failed to build email: {e}"))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}
