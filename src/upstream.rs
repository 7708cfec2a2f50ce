use crate::error::UpstreamStatus;

/// Passes a success response through; otherwise captures status and body.
pub async fn assert_ok_response(
    response: reqwest::Response,
) -> Result<reqwest::Response, UpstreamStatus> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(UpstreamStatus { status, body })
}
