use log::error;
use serde::Serialize;

use crate::{Error, ErrorKind};

/// The outcome of a remote call, flattened so it can be handed around without propagating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            is_success: true,
            data: Some(data),
            error: None,
            kind: None,
        }
    }

    pub fn err(e: &Error) -> Self {
        error!("remote call failed: {}", e);
        Self {
            is_success: false,
            data: None,
            error: Some(e.to_string()),
            kind: Some(e.kind()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            is_success: self.is_success,
            data: self.data.map(f),
            error: self.error,
            kind: self.kind,
        }
    }

    /// Get the data back out, or the kind and message of the failure.
    pub fn into_result(self) -> Result<T, (ErrorKind, String)> {
        match (self.is_success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err((ErrorKind::Decode, Error::EmptyResponse.to_string())),
            (false, _) => Err((
                self.kind.unwrap_or(ErrorKind::Rejected),
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

impl<T> From<crate::Result<T>> for Envelope<T> {
    fn from(r: crate::Result<T>) -> Self {
        match r {
            Ok(data) => Envelope::ok(data),
            Err(e) => Envelope::err(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn failure_keeps_kind_and_message() {
        let env: Envelope<()> = Err(Error::Rejected("bad input".to_string())).into();
        assert!(!env.is_success);
        assert_eq!(
            env.into_result(),
            Err((ErrorKind::Rejected, "request rejected: bad input".to_string()))
        );
    }

    #[test]
    fn serialises_like_a_response() {
        let env = Envelope::ok(3);
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({ "isSuccess": true, "data": 3 })
        );
    }

    #[test]
    fn success_without_data_is_a_failure() {
        let env: Envelope<u8> = Envelope {
            is_success: true,
            data: None,
            error: None,
            kind: None,
        };
        assert_eq!(env.into_result().unwrap_err().0, ErrorKind::Decode);
    }
}
