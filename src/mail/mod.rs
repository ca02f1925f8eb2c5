// src/mail/mod.rs
// =============================================================================
// This module sends the finished report by email.
//
// Key functionality:
// - Mailer trait: "send this message" (so tests can use a fake)
// - SmtpMailer: the real implementation on top of lettre
// - deliver(): renders the report, echoes it to stdout and sends it ONCE
//
// A failed send is logged and then forgotten. No retries, and the run still
// counts as completed.
// =============================================================================

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::{SmtpCredentials, SmtpSettings};
use crate::report::{render_text, subject, RunReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<()>;
}

// Where to connect, after resolving `service` names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpEndpoint {
    pub host: String,
    pub port: u16,
    /// true = TLS from the first byte, false = upgrade with STARTTLS
    pub secure: bool,
}

// Well-known providers: (service name, host, port, implicit TLS)
const KNOWN_SERVICES: &[(&str, &str, u16, bool)] = &[
    ("gmail", "smtp.gmail.com", 465, true),
    ("outlook", "smtp-mail.outlook.com", 587, false),
    ("hotmail", "smtp-mail.outlook.com", 587, false),
    ("office365", "smtp.office365.com", 587, false),
    ("yahoo", "smtp.mail.yahoo.com", 465, true),
    ("icloud", "smtp.mail.me.com", 587, false),
    ("zoho", "smtp.zoho.com", 465, true),
];

impl SmtpEndpoint {
    // Works out host/port/TLS from the config
    //
    // An explicit host always wins. Otherwise the service name is looked up,
    // and port/secure from the config still override the provider defaults.
    pub fn resolve(settings: &SmtpSettings) -> Result<Self> {
        if let Some(host) = settings.host.as_deref().filter(|h| !h.is_empty()) {
            let secure = settings.secure.unwrap_or(false);
            let port = settings.port.unwrap_or(if secure { 465 } else { 587 });
            return Ok(Self {
                host: host.to_string(),
                port,
                secure,
            });
        }

        let service = settings
            .service
            .as_deref()
            .ok_or_else(|| anyhow!("smtp config needs either a host or a service"))?;

        let Some(&(_, host, port, secure)) = KNOWN_SERVICES
            .iter()
            .find(|(name, ..)| name.eq_ignore_ascii_case(service))
        else {
            bail!("unknown smtp service '{}'", service);
        };

        Ok(Self {
            host: host.to_string(),
            port: settings.port.unwrap_or(port),
            secure: settings.secure.unwrap_or(secure),
        })
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings, credentials: &SmtpCredentials) -> Result<Self> {
        let endpoint = SmtpEndpoint::resolve(settings)?;

        let builder = if endpoint.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&endpoint.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&endpoint.host)
        };
        let builder =
            builder.with_context(|| format!("Failed to set up SMTP transport for {}", endpoint.host))?;

        let transport = builder
            .port(endpoint.port)
            .credentials(Credentials::new(credentials.user.clone(), credentials.pass.clone()))
            .build();

        info!(host = %endpoint.host, port = endpoint.port, secure = endpoint.secure, "smtp transport ready");
        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        let email = Message::builder()
            .from(message.from.parse().context("Invalid sender address")?)
            .to(message.to.parse().context("Invalid recipient address")?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.text.clone())?;

        self.transport.send(email).await.context("SMTP send failed")?;
        Ok(())
    }
}

// Builds the email for a finished run
pub fn compose(report: &RunReport, from: &str, to: &str) -> MailMessage {
    MailMessage {
        from: from.to_string(),
        to: to.to_string(),
        subject: subject(report),
        text: render_text(report),
    }
}

// Prints the email to stdout and, if a mailer is given, sends it once
//
// Parameters:
//   message: the composed email
//   mailer: None for a dry run (or when no mailer could be built)
//
// Returns: true if the email went out
pub async fn deliver(message: &MailMessage, mailer: Option<&dyn Mailer>) -> bool {
    println!("Subject:");
    println!("{}", message.subject);
    println!("ReportText:");
    println!("{}", message.text);
    println!("Receiver email: {}", message.to);

    let Some(mailer) = mailer else {
        info!("report not sent (no mailer)");
        return false;
    };

    match mailer.send(message).await {
        Ok(()) => {
            info!(to = %message.to, "monitoring report sent successfully");
            true
        }
        Err(e) => {
            error!(to = %message.to, error = ?e, "failed to send email");
            false
        }
    }
}
