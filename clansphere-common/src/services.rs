//! Client for the JSON service namespace.
//!
//! Every call is exactly one GET round-trip: no caching, no
//! deduplication, no retry. [`ServiceClient::call`] surfaces network and
//! decode failures as errors; [`ServiceClient::call_detached`] keeps the
//! historical fire-and-forget shape, where a failed call only leaves a
//! log line behind.

use crate::{Error, Result, CONFIG};
use clansphere_api::Service;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &'static str = "Clansphere/0.1.0";
const SERVICE_NAMESPACE: &'static str = "_services/json";

/// Builds the URL for a named JSON service.
pub fn service_url(root_url: &str, identifier: &str) -> String {
    format!(
        "{}/{}/{}",
        root_url.trim_end_matches('/'),
        SERVICE_NAMESPACE,
        identifier
    )
}

#[derive(Clone)]
pub struct ServiceClient {
    root_url: String,
    client: reqwest::Client,
}

impl ServiceClient {
    pub fn new(root_url: &str) -> Result<ServiceClient> {
        Url::parse(root_url).map_err(|_| Error::Url)?;
        let mut builder = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(CONFIG.request_timeout);
        if let Some(proxy) = CONFIG.proxy.clone() {
            builder = builder.proxy(proxy);
        }
        Ok(ServiceClient {
            root_url: root_url.trim_end_matches('/').to_owned(),
            client: builder.build()?,
        })
    }

    /// Client for the instance named by `SPHERE_ROOT_URL`.
    pub fn from_env() -> Result<ServiceClient> {
        ServiceClient::new(&CONFIG.root_url)
    }

    /// Calls the service a payload type is bound to, and decodes the
    /// response into it.
    pub async fn call<T, Q>(&self, params: &Q) -> Result<T>
    where
        T: Service + DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.get_json(T::identifier(), params).await
    }

    /// Calls an arbitrary service, leaving the response shape opaque.
    pub async fn call_value<Q>(&self, identifier: &str, params: &Q) -> Result<serde_json::Value>
    where
        Q: Serialize + ?Sized,
    {
        self.get_json(identifier, params).await
    }

    /// Fire-and-forget call: spawns the request on the runtime and runs
    /// `callback` once on success. On failure the callback never runs
    /// and the error is only logged.
    pub fn call_detached<T, Q, F>(&self, params: Q, callback: F) -> JoinHandle<()>
    where
        T: Service + DeserializeOwned + Send + 'static,
        Q: Serialize + Send + Sync + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            match client.call::<T, Q>(&params).await {
                Ok(value) => callback(value),
                Err(err) => warn!("Call to {} failed: {:?}", T::identifier(), err),
            }
        })
    }

    async fn get_json<T, Q>(&self, identifier: &str, params: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = service_url(&self.root_url, identifier);
        debug!("Calling {}", url);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        response.json().await.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clansphere_api::comments::Comment;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[test]
    fn service_urls_are_deterministic() {
        assert_eq!(
            service_url("https://example.com", "get_comment"),
            "https://example.com/_services/json/get_comment"
        );
        assert_eq!(
            service_url("https://example.com/", "get_taglist"),
            "https://example.com/_services/json/get_taglist"
        );
    }

    /// Serves a single canned JSON response and returns the request line
    /// it saw.
    async fn one_shot_json(body: &'static str) -> (String, JoinHandle<String>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut read = 0;
            loop {
                let n = stream.read(&mut buf[read..]).await.unwrap();
                read += n;
                if n == 0 || read == buf.len() || buf[..read].windows(4).any(|w| w == b"\r\n\r\n")
                {
                    break;
                }
            }
            let request = String::from_utf8_lossy(&buf[..read]).into_owned();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn calls_decode_the_response() {
        let (root, server) = one_shot_json(
            r#"{"id":42,"parent":null,"body":"hello","author":"jane","email":null,"pub_date":1234567890}"#,
        )
        .await;
        let client = ServiceClient::new(&root).unwrap();
        let comment: Comment = client.call(&[("comment_id", "42")]).await.unwrap();

        assert_eq!(comment.id, 42);
        assert_eq!(comment.parent, None);
        assert_eq!(comment.author, "jane");

        let request_line = server.await.unwrap();
        assert_eq!(
            request_line,
            "GET /_services/json/get_comment?comment_id=42 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn untyped_calls_return_the_raw_value() {
        let (root, server) = one_shot_json(r#"{"tags":["linux","games","rust"]}"#).await;
        let client = ServiceClient::new(&root).unwrap();
        let value = client
            .call_value("get_taglist", &Vec::<(String, String)>::new())
            .await
            .unwrap();

        assert_json_diff::assert_json_eq!(
            value,
            serde_json::json!({ "tags": ["linux", "games", "rust"] })
        );
        let request_line = server.await.unwrap();
        assert_eq!(request_line, "GET /_services/json/get_taglist HTTP/1.1");
    }

    #[tokio::test]
    async fn failed_calls_surface_as_errors() {
        // nothing listens on the discard port
        let client = ServiceClient::new("http://127.0.0.1:9").unwrap();
        let result: Result<Comment> = client.call(&[("comment_id", "42")]).await;
        assert!(matches!(result, Err(Error::Request(_))));
    }

    #[tokio::test]
    async fn undecodable_responses_surface_as_errors() {
        let (root, server) = one_shot_json("<html>Gateway timeout</html>").await;
        let client = ServiceClient::new(&root).unwrap();
        let result: Result<Comment> = client.call(&[("comment_id", "42")]).await;

        assert!(matches!(result, Err(Error::Request(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn detached_calls_swallow_undecodable_responses() {
        let (root, server) = one_shot_json("not json").await;
        let client = ServiceClient::new(&root).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = client.call_detached::<Comment, _, _>(
            vec![("comment_id".to_string(), "42".to_string())],
            move |comment| {
                tx.send(comment).unwrap();
            },
        );
        handle.await.unwrap();
        server.await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn detached_calls_swallow_failures() {
        let client = ServiceClient::new("http://127.0.0.1:9").unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = client.call_detached::<Comment, _, _>(
            vec![("comment_id".to_string(), "42".to_string())],
            move |comment| {
                tx.send(comment).unwrap();
            },
        );
        handle.await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn detached_calls_run_the_callback_once() {
        let (root, server) = one_shot_json(r#"{"tags":["linux","rust"]}"#).await;
        let client = ServiceClient::new(&root).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = client.call_detached::<clansphere_api::tags::TagList, _, _>(
            Vec::<(String, String)>::new(),
            move |list| {
                tx.send(list).unwrap();
            },
        );
        handle.await.unwrap();
        server.await.unwrap();

        let list = rx.try_recv().unwrap();
        assert_eq!(list.tags, vec!["linux", "rust"]);
        assert!(rx.try_recv().is_err());
    }
}
