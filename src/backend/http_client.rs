use super::*;

impl HttpBackend {
    /// Sends the request and returns the body of a 2xx response.
    ///
    /// Any other status keeps its raw body so the caller can normalize
    /// whatever shape the broker chose to send.
    pub(super) async fn send(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, BackendError> {
        let resp = req.send().await.map_err(BackendError::transport)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(BackendError::transport)?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes.to_vec())
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
