//
// Newsletter sign-up. Not part of the aggregation engine: the registrar is
// handed an email and the newsletter choice and answers with an opaque
// confirmation.
//

use crate::error::{Error, Result};
use serde_derive::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// either a plain yes/no opt-in, or the id of a specific newsletter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NewsletterChoice {
    Flag(bool),
    List(String),
}

impl NewsletterChoice {
    pub fn parse(s: &str) -> NewsletterChoice {
        match s.trim() {
            "true" => NewsletterChoice::Flag(true),
            "false" => NewsletterChoice::Flag(false),
            other => NewsletterChoice::List(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub email: String,
    pub newsletter: NewsletterChoice,
    pub status: String,
}

pub trait NewsletterRegistrar {
    fn register(&self, email: &str, newsletter: NewsletterChoice) -> Result<Confirmation>;
}

fn valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

// appends one JSON object per sign-up to a file
pub struct JsonLinesRegistrar {
    path: PathBuf,
}

impl JsonLinesRegistrar {
    pub fn new<P: Into<PathBuf>>(path: P) -> JsonLinesRegistrar {
        JsonLinesRegistrar { path: path.into() }
    }
}

impl NewsletterRegistrar for JsonLinesRegistrar {
    fn register(&self, email: &str, newsletter: NewsletterChoice) -> Result<Confirmation> {
        let email = email.trim();
        if !valid_email(email) {
            return Err(Error::InvalidEmail(email.to_string()));
        }
        let confirmation = Confirmation {
            email: email.to_string(),
            newsletter,
            status: "subscribed".to_string(),
        };
        let mut line = serde_json::to_string(&confirmation)?;
        line.push('\n');
        let mut fd = OpenOptions::new().create(true).append(true).open(&self.path)?;
        fd.write_all(line.as_bytes())?;
        info!(path = %self.path.display(), "newsletter registration recorded");
        Ok(confirmation)
    }
}
