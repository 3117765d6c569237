use crate::error::{CodebinError, Result};
use crate::models::{Mode, SaveResponse, Snippet};
use reqwest::blocking::multipart::Form;
use reqwest::StatusCode;

/// HTTP client for the two calls the pages make: submit-on-save and
/// fetch-on-view. One request per page lifetime, no retries, no timeout.
pub struct SnippetClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl SnippetClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(SnippetClient {
            http: reqwest::blocking::Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn save_url(&self) -> String {
        format!("{}/api/save", self.base_url)
    }

    pub fn view_url(&self, id: &str) -> String {
        format!("{}/api/view/{}", self.base_url, id)
    }

    /// POST the form fields and return the saved snippet id.
    ///
    /// Anything but a 200 becomes an `Api` error carrying the response body,
    /// which is exactly what the editor surfaces in its notification.
    pub fn submit(&self, name: &str, body: &str, mode: Mode) -> Result<String> {
        let form = Form::new()
            .text("snippetName", name.to_string())
            .text("snippetText", body.to_string())
            .text("mode", mode.as_str());

        let resp = self.http.post(self.save_url()).multipart(form).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if status != StatusCode::OK {
            return Err(CodebinError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let saved: SaveResponse = serde_json::from_str(&body)?;
        Ok(saved.snippet_id)
    }

    /// GET the snippet with the given id.
    pub fn fetch(&self, id: &str) -> Result<Snippet> {
        let resp = self.http.get(self.view_url(id)).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if status != StatusCode::OK {
            return Err(CodebinError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_rooted_at_the_server() {
        let client = SnippetClient::new("http://localhost:8080").expect("client");
        assert_eq!(client.save_url(), "http://localhost:8080/api/save");
        assert_eq!(
            client.view_url("0123456789abcdef0123456789abcdef"),
            "http://localhost:8080/api/view/0123456789abcdef0123456789abcdef"
        );
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let client = SnippetClient::new("http://localhost:8080/").expect("client");
        assert_eq!(client.save_url(), "http://localhost:8080/api/save");
    }
}
