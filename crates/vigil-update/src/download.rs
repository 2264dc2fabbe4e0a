use async_trait::async_trait;
use log::{debug, info};

use crate::error::UpdateError;
use crate::feed::AssetInfo;

/// Hop cap for manual redirect following. The feed's CDN normally resolves
/// in one or two hops; anything past this is treated as a loop.
pub const MAX_REDIRECT_HOPS: usize = 10;

const ACCEPT_HEADER: (&str, &str) = ("Accept", "application/octet-stream");

/// One HTTP response: either a terminal payload or a redirect target.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub body: Vec<u8>,
    pub redirect: Option<String>,
}

/// Minimal byte-fetching seam between the downloader and the HTTP stack.
#[async_trait]
pub trait ByteTransport: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, String)])
    -> Result<FetchResponse, UpdateError>;
}

/// `reqwest`-backed transport with automatic redirects disabled, so the
/// downloader performs (and caps) every hop itself.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, UpdateError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent("vigil")
            .build()
            .map_err(|error| UpdateError::Download(format!("failed to build client: {error}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ByteTransport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, String)],
    ) -> Result<FetchResponse, UpdateError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|error| UpdateError::Download(format!("request to {url} failed: {error}")))?;

        let status = response.status();
        if status.is_redirection() {
            let target = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
                .ok_or_else(|| {
                    UpdateError::Download(format!("redirect from {url} has no Location header"))
                })?;
            return Ok(FetchResponse {
                body: Vec::new(),
                redirect: Some(target),
            });
        }

        if !status.is_success() {
            return Err(UpdateError::Download(format!(
                "{url} returned HTTP {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| UpdateError::Download(format!("reading body of {url}: {error}")))?
            .to_vec();
        Ok(FetchResponse {
            body,
            redirect: None,
        })
    }
}

/// Download one release asset, following redirects to completion.
///
/// With a token, the first request carries `Authorization: token <token>`
/// and targets the asset's feed-API URL; private feeds only serve asset
/// bytes through that path. Redirect hops are plain GETs with no headers
/// re-sent, as the redirect targets are pre-signed CDN URLs.
///
/// # Errors
/// Fails on transport errors, non-success terminal status, or when the
/// redirect chain exceeds [`MAX_REDIRECT_HOPS`]. No retry is attempted; the
/// next scheduled cycle retries naturally.
pub async fn fetch(
    transport: &dyn ByteTransport,
    asset: &AssetInfo,
    token: Option<&str>,
) -> Result<Vec<u8>, UpdateError> {
    let (url, headers) = match token {
        Some(token) => (
            asset.url.as_str(),
            vec![
                (ACCEPT_HEADER.0, ACCEPT_HEADER.1.to_string()),
                ("Authorization", format!("token {token}")),
            ],
        ),
        None => (
            asset.browser_download_url.as_str(),
            vec![(ACCEPT_HEADER.0, ACCEPT_HEADER.1.to_string())],
        ),
    };

    debug!("downloading {} from {url}", asset.name);
    let mut response = transport.get(url, &headers).await?;

    let mut hops = 0;
    while let Some(target) = response.redirect.take() {
        hops += 1;
        if hops > MAX_REDIRECT_HOPS {
            return Err(UpdateError::RedirectLoop {
                limit: MAX_REDIRECT_HOPS,
                url: target,
            });
        }
        debug!("following redirect {hops} to {target}");
        response = transport.get(&target, &[]).await?;
    }

    info!("downloaded {} ({} bytes)", asset.name, response.body.len());
    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{ByteTransport, FetchResponse, MAX_REDIRECT_HOPS, fetch};
    use crate::error::UpdateError;
    use crate::feed::AssetInfo;

    #[derive(Debug, Clone)]
    struct RecordedRequest {
        url: String,
        headers: Vec<(String, String)>,
    }

    struct ScriptedTransport {
        responses: Mutex<Vec<FetchResponse>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<FetchResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<RecordedRequest> {
            self.requests
                .lock()
                .expect("request log should not be poisoned")
                .clone()
        }
    }

    #[async_trait]
    impl ByteTransport for ScriptedTransport {
        async fn get(
            &self,
            url: &str,
            headers: &[(&str, String)],
        ) -> Result<FetchResponse, UpdateError> {
            self.requests
                .lock()
                .expect("request log should not be poisoned")
                .push(RecordedRequest {
                    url: url.to_string(),
                    headers: headers
                        .iter()
                        .map(|(name, value)| ((*name).to_string(), value.clone()))
                        .collect(),
                });
            let mut responses = self
                .responses
                .lock()
                .expect("response script should not be poisoned");
            if responses.is_empty() {
                return Err(UpdateError::Download("script exhausted".to_string()));
            }
            Ok(responses.remove(0))
        }
    }

    fn asset() -> AssetInfo {
        AssetInfo {
            name: "vigil-1.3.0.zip".to_string(),
            browser_download_url: "https://example.test/download/vigil-1.3.0.zip".to_string(),
            url: "https://api.example.test/assets/77".to_string(),
        }
    }

    fn redirect(target: &str) -> FetchResponse {
        FetchResponse {
            body: Vec::new(),
            redirect: Some(target.to_string()),
        }
    }

    fn payload(bytes: &[u8]) -> FetchResponse {
        FetchResponse {
            body: bytes.to_vec(),
            redirect: None,
        }
    }

    #[tokio::test]
    async fn returns_terminal_payload_with_one_request_per_hop() {
        let transport = ScriptedTransport::new(vec![
            redirect("https://cdn.example.test/a"),
            redirect("https://cdn.example.test/b"),
            payload(b"package-bytes"),
        ]);

        let bytes = fetch(&transport, &asset(), None)
            .await
            .expect("fetch should resolve through the redirect chain");

        assert_eq!(bytes, b"package-bytes");
        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].url, asset().browser_download_url);
        assert_eq!(requests[1].url, "https://cdn.example.test/a");
        assert_eq!(requests[2].url, "https://cdn.example.test/b");
    }

    #[tokio::test]
    async fn anonymous_fetch_uses_public_url_and_octet_stream_accept() {
        let transport = ScriptedTransport::new(vec![payload(b"x")]);

        fetch(&transport, &asset(), None)
            .await
            .expect("fetch should succeed");

        let requests = transport.requests();
        assert_eq!(requests[0].url, asset().browser_download_url);
        assert_eq!(
            requests[0].headers,
            vec![(
                "Accept".to_string(),
                "application/octet-stream".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn token_fetch_targets_api_url_and_sends_auth_only_once() {
        let transport = ScriptedTransport::new(vec![
            redirect("https://cdn.example.test/signed"),
            payload(b"x"),
        ]);

        fetch(&transport, &asset(), Some("s3cr3t"))
            .await
            .expect("fetch should succeed");

        let requests = transport.requests();
        assert_eq!(requests[0].url, asset().url);
        assert!(
            requests[0]
                .headers
                .contains(&("Authorization".to_string(), "token s3cr3t".to_string()))
        );
        // Redirect hops are plain GETs; nothing is re-sent.
        assert!(requests[1].headers.is_empty());
    }

    #[tokio::test]
    async fn redirect_chains_past_the_cap_fail_with_redirect_loop() {
        let responses = (0..=MAX_REDIRECT_HOPS + 1)
            .map(|i| redirect(&format!("https://cdn.example.test/{i}")))
            .collect();
        let transport = ScriptedTransport::new(responses);

        let error = fetch(&transport, &asset(), None)
            .await
            .expect_err("an endless redirect chain should fail");

        assert!(matches!(
            error,
            UpdateError::RedirectLoop { limit, .. } if limit == MAX_REDIRECT_HOPS
        ));
    }

    #[tokio::test]
    async fn transport_errors_abort_the_fetch() {
        let transport = ScriptedTransport::new(Vec::new());
        let error = fetch(&transport, &asset(), None)
            .await
            .expect_err("transport failure should propagate");
        assert!(matches!(error, UpdateError::Download(_)));
    }
}
