//! Remote schema initialization collaborator.
//!
//! The deployment may expose an HTTP endpoint that creates the schema on
//! the caller's behalf. It is tried before local DDL during first run.

use log::debug;
use reqwest::blocking::Client;

const INIT_DB_PATH: &str = "/api/init-db";

/// Something that can create the schema out of process.
pub trait SchemaInitializer {
    /// Requests schema creation. Errors are human-readable messages.
    fn initialize(&self) -> Result<(), String>;
}

/// Calls `POST {base_url}/api/init-db`.
pub struct HttpSchemaInitializer {
    endpoint: String,
    client: Client,
}

impl HttpSchemaInitializer {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: init_endpoint(base_url),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SchemaInitializer for HttpSchemaInitializer {
    fn initialize(&self) -> Result<(), String> {
        debug!(
            "event=remote_init module=db status=start endpoint={}",
            self.endpoint
        );
        let response = self
            .client
            .post(&self.endpoint)
            .send()
            .map_err(|err| format!("request to `{}` failed: {err}", self.endpoint))?;
        response
            .error_for_status()
            .map_err(|err| format!("`{}` rejected init request: {err}", self.endpoint))?;
        Ok(())
    }
}

fn init_endpoint(base_url: &str) -> String {
    format!("{}{INIT_DB_PATH}", base_url.trim().trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::init_endpoint;

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        assert_eq!(
            init_endpoint("https://share.example.com/"),
            "https://share.example.com/api/init-db"
        );
        assert_eq!(
            init_endpoint(" http://localhost:3000 "),
            "http://localhost:3000/api/init-db"
        );
    }
}
