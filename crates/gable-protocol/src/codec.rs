//! Line-delimited JSON framing
//!
//! Every protocol message is one JSON document terminated by a newline.
//! The socket itself provides reliable, ordered delivery; this module only
//! handles the text form.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ProtocolError;

/// Encode a message as a single newline-terminated JSON line
pub fn encode_line<T: Serialize>(message: &T) -> Result<String, ProtocolError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Decode a message from one line of input
///
/// Trailing newline and surrounding whitespace are ignored.
pub fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, ProtocolError> {
    Ok(serde_json::from_str(line.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{CallOutcome, CallRequest};
    use serde_json::json;

    #[test]
    fn test_encoded_line_is_newline_terminated() {
        let req = CallRequest::new("focus_next", vec![], Default::default());
        let line = encode_line(&req).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let outcome = CallOutcome::success(json!("ok"));
        let line = encode_line(&outcome).unwrap();
        let decoded: CallOutcome = decode_line(&format!("  {line}")).unwrap();
        assert_eq!(decoded, outcome);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result: Result<CallRequest, _> = decode_line("not json");
        assert!(result.is_err());
    }
}
