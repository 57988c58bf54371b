//! Argument model and dispatch for the `waha` binary.

use clap::{ArgAction, Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use waha_client::openapi;
use waha_client::{
    phone_to_chat_id, MessageTextRequest, RequestCodeRequest, SessionLogoutRequest,
    SessionStartRequest, SessionStopRequest, WahaConfig, WahaError, WahaResult, WahaService,
    DEFAULT_SESSION,
};

#[derive(Debug, Parser)]
#[command(name = "waha", version, about = "Talk to a WhatsApp HTTP API (WAHA) server")]
pub struct Cli {
    /// Server root, overrides WAHA_URL.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API key, overrides WAHA_API_KEY.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds, overrides WAHA_TIMEOUT_SEC.
    #[arg(long, global = true)]
    pub timeout: Option<u32>,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(subcommand)]
    Sessions(SessionsCommand),
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Send a text message to a phone number or chat id.
    SendText {
        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,
        to: String,
        text: String,
        #[arg(long)]
        reply_to: Option<String>,
    },
    /// Check whether a phone number is on WhatsApp.
    CheckNumber {
        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,
        phone: String,
    },
    #[command(subcommand)]
    Openapi(OpenapiCommand),
}

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    List {
        /// Include stopped sessions.
        #[arg(long)]
        all: bool,
    },
    Start {
        #[arg(long, default_value = DEFAULT_SESSION)]
        name: String,
    },
    Stop {
        #[arg(long, default_value = DEFAULT_SESSION)]
        name: String,
        #[arg(long)]
        logout: bool,
    },
    Logout {
        #[arg(long, default_value = DEFAULT_SESSION)]
        name: String,
    },
    /// Account the session is logged in as.
    Me {
        #[arg(default_value = DEFAULT_SESSION)]
        session: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Fetch the pairing QR code.
    Qr {
        #[arg(default_value = DEFAULT_SESSION)]
        session: String,
        /// Print the raw QR value instead of saving an image.
        #[arg(long)]
        raw: bool,
        #[arg(short, long, default_value = "qr.png")]
        output: PathBuf,
    },
    /// Request a pairing code for a phone number.
    RequestCode {
        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,
        phone: String,
        #[arg(long)]
        method: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum OpenapiCommand {
    /// Sort and indent an openapi.json, optionally retyping fields.
    Format {
        #[arg(long, default_value = "openapi.json")]
        input: PathBuf,
        #[arg(long, default_value = "openapi_formatted.json")]
        output: PathBuf,
        /// `Schema.property` typed `object` upstream that should be `string`.
        #[arg(long = "string-field")]
        string_fields: Vec<String>,
    },
}

impl Cli {
    /// Environment settings with command-line overrides applied.
    pub fn config(&self) -> WahaResult<WahaConfig> {
        self.config_with(|key| std::env::var(key).ok())
    }

    /// Settings from `lookup` with flags on top, validated once at the end.
    pub fn config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> WahaResult<WahaConfig> {
        let mut config = WahaConfig::from_lookup(lookup)?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut WahaConfig) {
        if let Some(ref url) = self.url {
            config.base_url = url.clone();
        }
        if let Some(ref key) = self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_sec = timeout;
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Run one command, writing its result to `out`.
pub async fn dispatch(cli: &Cli, out: &mut impl Write) -> WahaResult<()> {
    let result: Value = match &cli.command {
        Command::Openapi(cmd) => return format_spec(cmd, out),
        Command::Sessions(cmd) => sessions_command(&service(cli)?, cmd).await?,
        Command::Auth(cmd) => auth_command(&service(cli)?, cmd).await?,
        Command::SendText {
            session,
            to,
            text,
            reply_to,
        } => {
            let mut req = MessageTextRequest::new(phone_to_chat_id(to), text.as_str())
                .in_session(session.as_str());
            if let Some(id) = reply_to {
                req = req.replying_to(id.as_str());
            }
            let svc = service(cli)?;
            to_json(&svc.chatting()?.send_text(&req).await?)?
        }
        Command::CheckNumber { session, phone } => {
            let svc = service(cli)?;
            to_json(&svc.contacts()?.check_exists(phone, session).await?)?
        }
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    Ok(())
}

fn service(cli: &Cli) -> WahaResult<WahaService> {
    WahaService::with_config(cli.config()?)
}

async fn sessions_command(svc: &WahaService, cmd: &SessionsCommand) -> WahaResult<Value> {
    let sessions = svc.sessions()?;
    match cmd {
        SessionsCommand::List { all } => to_json(&sessions.list_all(*all).await?),
        SessionsCommand::Start { name } => {
            let req = SessionStartRequest::named(name.as_str());
            to_json(&sessions.start(Some(req)).await?)
        }
        SessionsCommand::Stop { name, logout } => {
            let req = SessionStopRequest {
                name: name.clone(),
                logout: *logout,
            };
            sessions.stop(Some(req)).await?;
            Ok(json!({ "name": name, "stopped": true }))
        }
        SessionsCommand::Logout { name } => {
            let req = SessionLogoutRequest { name: name.clone() };
            sessions.logout(Some(req)).await?;
            Ok(json!({ "name": name, "loggedOut": true }))
        }
        SessionsCommand::Me { session } => to_json(&sessions.me(session).await?),
    }
}

async fn auth_command(svc: &WahaService, cmd: &AuthCommand) -> WahaResult<Value> {
    let auth = svc.auth()?;
    match cmd {
        AuthCommand::Qr {
            session,
            raw: true,
            ..
        } => to_json(&auth.qr_raw(session).await?),
        AuthCommand::Qr {
            session, output, ..
        } => {
            let image = auth.qr_image(session).await?;
            std::fs::write(output, &image)?;
            Ok(json!({ "written": output.display().to_string(), "bytes": image.len() }))
        }
        AuthCommand::RequestCode {
            session,
            phone,
            method,
        } => {
            let req = RequestCodeRequest {
                phone_number: phone.clone(),
                method: method.clone(),
            };
            to_json(&auth.request_code(session, req).await?)
        }
    }
}

fn format_spec(cmd: &OpenapiCommand, out: &mut impl Write) -> WahaResult<()> {
    let OpenapiCommand::Format {
        input,
        output,
        string_fields,
    } = cmd;

    let mut spec = openapi::read_spec(input)?;
    let fields = string_fields
        .iter()
        .map(|f| openapi::parse_field(f))
        .collect::<WahaResult<Vec<_>>>()?;
    let changed = openapi::retype_fields(&mut spec, &fields)?;
    openapi::write_spec(&spec, output)?;
    writeln!(
        out,
        "Formatted {} -> {} ({} field(s) retyped to string)",
        input.display(),
        output.display(),
        changed
    )?;
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> WahaResult<Value> {
    serde_json::to_value(value).map_err(WahaError::from)
}
