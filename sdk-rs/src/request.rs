use crate::Error;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// Appends percent-encoded path segments to `base`.
pub(crate) fn join(base: &Url, segments: &[&str]) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Sends the request and decodes a successful JSON response into `T`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    operation: &'static str,
    builder: RequestBuilder,
) -> Result<T, Error> {
    let res = send(operation, builder).await?;
    let body = res.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Like [send_json], but an empty success body decodes to `T::default()`.
pub(crate) async fn send_json_or_default<T: DeserializeOwned + Default>(
    operation: &'static str,
    builder: RequestBuilder,
) -> Result<T, Error> {
    let res = send(operation, builder).await?;
    let body = res.text().await?;
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&body)?)
}

/// Sends the request, discarding the body of a successful response.
pub(crate) async fn send_empty(operation: &'static str, builder: RequestBuilder) -> Result<(), Error> {
    send(operation, builder).await?;
    Ok(())
}

async fn send(operation: &'static str, builder: RequestBuilder) -> Result<Response, Error> {
    let (client, request) = builder.build_split();
    let request = request?;
    debug!(
        operation = operation,
        method = %request.method(),
        url = %request.url(),
        "sending request"
    );

    let res = client.execute(request).await?;
    let status = res.status();
    debug!(operation = operation, status = %status, "received response");

    if !status.is_success() {
        let body = res.text().await?;
        warn!(operation = operation, status = %status, body = %body, "request failed");
        return Err(Error::from_response(operation, status, body));
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_appends_segments() {
        let base = Url::parse("https://confluent.cloud/api/").unwrap();
        let url = join(&base, &["accounts", "env-123"]).unwrap();
        assert_eq!(url.as_str(), "https://confluent.cloud/api/accounts/env-123");
    }

    #[test]
    fn test_join_encodes_ids() {
        let base = Url::parse("https://confluent.cloud/api/").unwrap();
        let url = join(&base, &["clusters", "lkc/1?x"]).unwrap();
        assert_eq!(url.as_str(), "https://confluent.cloud/api/clusters/lkc%2F1%3Fx");
    }

    #[test]
    fn test_join_without_trailing_slash() {
        let base = Url::parse("https://pkac-123.us-west-2.aws.confluent.cloud").unwrap();
        let url = join(&base, &["2.0", "kafka", "lkc-1", "acls"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://pkac-123.us-west-2.aws.confluent.cloud/2.0/kafka/lkc-1/acls"
        );
    }
}
