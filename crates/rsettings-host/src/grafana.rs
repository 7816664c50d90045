//! Grafana HTTP implementation of [`HostSettings`]
//!
//! Talks to `GET`/`POST {base}/api/plugins/{id}/settings`. `ureq` is a
//! blocking client, so every request runs on tokio's blocking pool.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use rsettings_core::prelude::*;
use rsettings_core::{PluginSettingsUpdate, StoredSettings};

use crate::settings::HostSettings;

/// Characters escaped when the plugin id is used as a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Default request timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings API client for a Grafana instance
#[derive(Clone)]
pub struct GrafanaHost {
    base_url: Url,
    token: Option<String>,
    agent: ureq::Agent,
}

impl std::fmt::Debug for GrafanaHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrafanaHost")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GrafanaHost {
    /// Create a client for the Grafana instance at `base_url`.
    ///
    /// An empty `token` is treated as no token.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::config_invalid(format!("Invalid host URL {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config_invalid(format!(
                "Host URL cannot be used as a base: {}",
                base_url
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        Ok(Self {
            base_url,
            token: token.filter(|t| !t.is_empty()),
            agent,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the settings endpoint for `plugin_id`
    pub fn settings_url(&self, plugin_id: &str) -> Result<Url> {
        let segment = utf8_percent_encode(plugin_id, PATH_SEGMENT).to_string();
        self.base_url
            .join(&format!("api/plugins/{}/settings", segment))
            .map_err(|e| Error::config_invalid(format!("Invalid plugin id {:?}: {}", plugin_id, e)))
    }

    fn request(&self, method: &str, url: &Url) -> ureq::Request {
        let request = self
            .agent
            .request(method, url.as_str())
            .set("Accept", "application/json");
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {}", token)),
            None => request,
        }
    }
}

impl HostSettings for GrafanaHost {
    async fn read_settings(&self, plugin_id: &str) -> Result<StoredSettings> {
        let url = self.settings_url(plugin_id)?;
        debug!("Reading plugin settings from {}", url);

        let request = self.request("GET", &url);
        let body = run_blocking(move || request.call()).await?;

        serde_json::from_str(&body)
            .map_err(|e| Error::host_response(format!("Malformed settings response: {}", e)))
    }

    async fn update_settings(&self, plugin_id: &str, update: &PluginSettingsUpdate) -> Result<()> {
        let url = self.settings_url(plugin_id)?;
        let body = serde_json::to_string(update)?;
        debug!(
            "Posting plugin settings to {} (enabled={}, secret included={})",
            url,
            update.enabled,
            update.secure_json_data.is_some()
        );

        let request = self
            .request("POST", &url)
            .set("Content-Type", "application/json");
        run_blocking(move || request.send_string(&body)).await?;

        Ok(())
    }
}

/// Run a blocking `ureq` call and read the response body
async fn run_blocking<F>(call: F) -> Result<String>
where
    F: FnOnce() -> std::result::Result<ureq::Response, ureq::Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || match call() {
        Ok(response) => response
            .into_string()
            .map_err(|e| Error::host_response(format!("Failed to read response body: {}", e))),
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            Err(Error::host_status(status, body))
        }
        Err(ureq::Error::Transport(transport)) => Err(Error::host_request(transport.to_string())),
    })
    .await
    .map_err(|e| Error::host_request(format!("Request task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsettings_core::{JsonData, SecureJsonData};
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread::JoinHandle;

    /// Answer exactly one request on a local port with a canned response.
    /// The handle yields the raw request as received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });
        (format!("http://{}", addr), handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    fn request_body(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn sample_update(secure_json_data: Option<SecureJsonData>) -> PluginSettingsUpdate {
        PluginSettingsUpdate {
            enabled: true,
            pinned: true,
            json_data: JsonData {
                app_url: "http://grafana:3000".to_string(),
                tls_skip_verify: true,
                orientation: "portrait".to_string(),
                layout: "simple".to_string(),
                dashboard_mode: "default".to_string(),
                time_zone: String::new(),
                logo: String::new(),
                max_browser_workers: 6,
                max_render_workers: 2,
                remote_chrome_url: String::new(),
            },
            secure_json_data,
        }
    }

    #[test]
    fn test_settings_url_joins_base() {
        let host = GrafanaHost::new("http://localhost:3000", None, DEFAULT_TIMEOUT).unwrap();
        let url = host.settings_url("reporter-app").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/plugins/reporter-app/settings"
        );
    }

    #[test]
    fn test_settings_url_keeps_sub_path() {
        let host = GrafanaHost::new("https://example.com/grafana", None, DEFAULT_TIMEOUT).unwrap();
        let url = host.settings_url("reporter-app").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/grafana/api/plugins/reporter-app/settings"
        );
    }

    #[test]
    fn test_settings_url_escapes_plugin_id() {
        let host = GrafanaHost::new("http://localhost:3000/", None, DEFAULT_TIMEOUT).unwrap();
        let url = host.settings_url("odd/id?x").unwrap();
        assert_eq!(url.path(), "/api/plugins/odd%2Fid%3Fx/settings");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = GrafanaHost::new("not a url", None, DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let host =
            GrafanaHost::new("http://localhost:3000", Some(String::new()), DEFAULT_TIMEOUT).unwrap();
        assert!(host.token.is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let host = GrafanaHost::new(
            "http://localhost:3000",
            Some("glsa_secret".to_string()),
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        let debug = format!("{:?}", host);
        assert!(!debug.contains("glsa_secret"));
        assert!(debug.contains("redacted"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let host = GrafanaHost::new(
            "http://127.0.0.1:9",
            None,
            Duration::from_millis(500),
        )
        .unwrap();
        let err = host.read_settings("reporter-app").await.unwrap_err();
        assert!(matches!(err, Error::HostRequest { .. }), "got {:?}", err);
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_read_settings_parses_response() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"enabled":true,"pinned":false,"jsonData":{"layout":"grid","maxRenderWorkers":4},"secureJsonFields":{"secretToken":true}}"#,
        );
        let host = GrafanaHost::new(&base, Some("glsa_x".to_string()), DEFAULT_TIMEOUT).unwrap();

        let stored = host.read_settings("reporter-app").await.unwrap();

        assert!(stored.enabled);
        assert!(!stored.pinned);
        assert_eq!(stored.json_data["layout"], "grid");
        assert_eq!(stored.json_data["maxRenderWorkers"], 4);
        assert!(stored.secret_present());

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /api/plugins/reporter-app/settings "));
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer glsa_x"));
    }

    #[tokio::test]
    async fn test_read_settings_tolerates_null_objects() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"enabled":false,"jsonData":null,"secureJsonFields":null}"#,
        );
        let host = GrafanaHost::new(&base, None, DEFAULT_TIMEOUT).unwrap();

        let stored = host.read_settings("reporter-app").await.unwrap();

        assert!(stored.json_data.is_empty());
        assert!(!stored.secret_present());
        let request = server.join().unwrap();
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_response_error() {
        let (base, server) = serve_once("200 OK", "<html>login</html>");
        let host = GrafanaHost::new(&base, None, DEFAULT_TIMEOUT).unwrap();

        let err = host.read_settings("reporter-app").await.unwrap_err();

        assert!(matches!(err, Error::HostResponse { .. }), "got {:?}", err);
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_update_posts_wire_names_without_preserved_secret() {
        let (base, server) = serve_once("200 OK", r#"{"message":"Plugin settings updated"}"#);
        let host = GrafanaHost::new(&base, None, DEFAULT_TIMEOUT).unwrap();

        host.update_settings("reporter-app", &sample_update(None))
            .await
            .unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/plugins/reporter-app/settings "));
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/json"));

        let body = request_body(&request);
        assert_eq!(body["enabled"], true);
        assert_eq!(body["pinned"], true);
        assert_eq!(body["jsonData"]["appURL"], "http://grafana:3000");
        assert_eq!(body["jsonData"]["tlsSkipVerify"], true);
        assert_eq!(body["jsonData"]["maxBrowserWorkers"], 6);
        assert_eq!(body["jsonData"]["remoteChromeURL"], "");
        assert!(body.get("secureJsonData").is_none());
    }

    #[tokio::test]
    async fn test_update_sends_secret_token() {
        let (base, server) = serve_once("200 OK", "{}");
        let host = GrafanaHost::new(&base, None, DEFAULT_TIMEOUT).unwrap();
        let update = sample_update(Some(SecureJsonData {
            secret_token: "glsa_new".to_string(),
        }));

        host.update_settings("reporter-app", &update).await.unwrap();

        let body = request_body(&server.join().unwrap());
        assert_eq!(body["secureJsonData"]["secretToken"], "glsa_new");
    }

    #[tokio::test]
    async fn test_rejected_update_is_status_error() {
        let (base, server) = serve_once("403 Forbidden", r#"{"message":"Permission denied"}"#);
        let host = GrafanaHost::new(&base, Some("glsa_viewer".to_string()), DEFAULT_TIMEOUT)
            .unwrap();

        let err = host
            .update_settings("reporter-app", &sample_update(None))
            .await
            .unwrap_err();

        match &err {
            Error::HostStatus { status, body } => {
                assert_eq!(*status, 403);
                assert!(body.contains("Permission denied"));
            }
            other => panic!("expected HostStatus, got {:?}", other),
        }
        assert!(err.is_recoverable());
        server.join().unwrap();
    }
}
