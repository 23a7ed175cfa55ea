use serde::Deserialize;

use crate::prelude::*;

/// DSM Web API response envelope.
#[derive(Deserialize)]
pub struct Response<D> {
    success: bool,
    data: Option<D>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ApiError {
    code: u32,
}

impl<D> Response<D> {
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Unwrap the payload of a successful response.
    pub fn into_data(self) -> Result<D> {
        if !self.success {
            match self.error {
                Some(error) => bail!("the API returned error code {}", error.code),
                None => bail!("the API call failed without an error code"),
            }
        }
        self.data.context("the API response is missing the `data` payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Empty {}

    #[test]
    fn successful_response_yields_data() -> Result {
        let response: Response<Empty> =
            serde_json::from_str(r#"{"success": true, "data": {}}"#)?;
        assert!(response.is_success());
        let _ = response.into_data()?;
        Ok(())
    }

    #[test]
    fn failed_response_carries_the_error_code() -> Result {
        let response: Response<Empty> =
            serde_json::from_str(r#"{"success": false, "error": {"code": 119}}"#)?;
        assert!(!response.is_success());
        let error = response.into_data().unwrap_err();
        assert!(error.to_string().contains("119"));
        Ok(())
    }
}
