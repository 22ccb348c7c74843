use std::fs;

use async_trait::async_trait;
use color_eyre::Result;
use eyre::WrapErr;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde_json::Value;
use tracing::{info, instrument};

/// Outbound delivery of one-time codes.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_otp_email(&self, to: &str, otp: &str) -> Result<()>;
}

pub struct SmtpEmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    platform_name: String,
    otp_template: String,
}

impl SmtpEmailService {
    pub fn new(
        smtp_host: &str,
        smtp_user: &str,
        smtp_pass: &str,
        platform_name: &str,
        template_path: &str,
    ) -> Result<Self> {
        let creds = Credentials::new(smtp_user.to_string(), smtp_pass.to_string());

        let otp_template = load_template(template_path)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)
            .wrap_err("Configuring SMTP relay")?
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from_address: smtp_user.to_string(),
            platform_name: platform_name.to_string(),
            otp_template,
        })
    }

    #[instrument(skip(self, template, data))]
    pub async fn send_email(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        data: &Value,
    ) -> Result<()> {
        let body = render_template(template, data);

        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)?;

        self.mailer
            .send(email)
            .await
            .wrap_err("Sending email")?;

        info!("Email sent");
        Ok(())
    }
}

#[async_trait]
impl EmailSender for SmtpEmailService {
    async fn send_otp_email(&self, to: &str, otp: &str) -> Result<()> {
        let template_data = serde_json::json!({
            "otp": otp,
            "platformName": self.platform_name
        });

        self.send_email(to, "Verify Your Email", &self.otp_template, &template_data)
            .await
    }
}

/// Read once at startup so sends never touch the filesystem.
fn load_template(path: &str) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("Reading email template {path}"))
}

/// Replace `{{key}}` placeholders with the matching string or number in `data`.
pub fn render_template(template: &str, data: &Value) -> String {
    let mut body = template.to_string();
    if let Some(fields) = data.as_object() {
        for (key, value) in fields {
            let placeholder = format!("{{{{{}}}}}", key);
            let replacement = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            body = body.replace(&placeholder, &replacement);
        }
    }
    body
}
