use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use picker_core::{NotifyError, PickNotifier, TradeDecision};
use sheet_store::render_csv;

/// SMTP settings for the picks email.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_to: Vec<String>,
    pub smtp_tls: SmtpTls,
}

#[derive(Debug, Clone, Default)]
pub enum SmtpTls {
    #[default]
    StartTls,
    Tls,
    None,
}

impl NotifierConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        let smtp_to = std::env::var("PICKS_EMAIL_TO")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let smtp_tls = match std::env::var("SMTP_TLS").unwrap_or_default().as_str() {
            "tls" => SmtpTls::Tls,
            "none" => SmtpTls::None,
            _ => SmtpTls::StartTls,
        };

        Self {
            smtp_host: std::env::var("SMTP_HOST").ok().filter(|s| !s.is_empty()),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            smtp_username: std::env::var("SMTP_USERNAME")
                .ok()
                .filter(|s| !s.is_empty()),
            smtp_password: std::env::var("SMTP_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            smtp_from: std::env::var("SMTP_FROM_ADDRESS")
                .ok()
                .filter(|s| !s.is_empty()),
            smtp_to,
            smtp_tls,
        }
    }

    /// Whether there is enough configuration to send anything.
    pub fn is_configured(&self) -> bool {
        self.smtp_host.is_some() && self.smtp_from.is_some() && !self.smtp_to.is_empty()
    }
}

/// Emails the ranked picks as a CSV attachment.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailNotifier {
    pub fn new(config: &NotifierConfig) -> Result<Self, NotifyError> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| NotifyError::Config("SMTP_HOST not set".into()))?;
        let from_addr = config
            .smtp_from
            .as_deref()
            .ok_or_else(|| NotifyError::Config("SMTP_FROM_ADDRESS not set".into()))?;

        let from: Mailbox = from_addr
            .parse()
            .map_err(|e| NotifyError::Config(format!("Invalid from address: {e}")))?;

        let to: Vec<Mailbox> = config
            .smtp_to
            .iter()
            .filter_map(|addr| addr.parse().ok())
            .collect();

        if to.is_empty() {
            return Err(NotifyError::Config(
                "No valid PICKS_EMAIL_TO addresses".into(),
            ));
        }

        let mut builder = match config.smtp_tls {
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
            SmtpTls::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                host,
            )),
        }
        .map_err(|e| NotifyError::Smtp(format!("SMTP transport error: {e}")))?;

        builder = builder.port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }
}

#[async_trait]
impl PickNotifier for EmailNotifier {
    async fn notify(&self, picks: &[TradeDecision], stamp: &str) -> Result<(), NotifyError> {
        let csv_bytes =
            render_csv(picks, stamp).map_err(|e| NotifyError::Render(e.to_string()))?;

        let csv_type = ContentType::parse("text/csv")
            .map_err(|e| NotifyError::Config(format!("Invalid attachment type: {e}")))?;
        let attachment =
            Attachment::new(format!("trading-picks-{stamp}.csv")).body(csv_bytes, csv_type);

        for recipient in &self.to {
            let email = Message::builder()
                .from(self.from.clone())
                .to(recipient.clone())
                .subject(format!("Trading Picks - {stamp}"))
                .multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(String::from(
                            "Here are today's picks for your trade. Check the attachment.",
                        )))
                        .singlepart(attachment.clone()),
                )
                .map_err(|e| NotifyError::Smtp(format!("Failed to build email: {e}")))?;

            self.transport
                .send(email)
                .await
                .map_err(|e| NotifyError::Smtp(format!("Failed to send email: {e}")))?;
        }

        tracing::info!("Emailed {} picks to {} recipients", picks.len(), self.to.len());
        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}
