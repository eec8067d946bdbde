use serde_json::Value;

use crate::error::AuthError;

/// Fields taken from a successful client-credentials response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Parse and shape-check the token endpoint body.
///
/// `access_token` must be a non-empty string. `expires_in` must be a
/// non-negative integer; a numeric string such as `"3600"` is accepted too.
pub fn parse_token_response(body: &str) -> Result<TokenResponse, AuthError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|err| AuthError::MalformedResponse(format!("body is not JSON: {}", err)))?;

    let access_token = match json.get("access_token") {
        Some(Value::String(token)) if !token.is_empty() => token.to_owned(),
        Some(Value::String(_)) => {
            return Err(AuthError::MalformedResponse("'access_token' is empty".into()))
        }
        Some(other) => {
            return Err(AuthError::MalformedResponse(format!(
                "'access_token' must be a string, got {}",
                other
            )))
        }
        None => return Err(AuthError::MalformedResponse("'access_token' is missing".into())),
    };

    let expires_in = match json.get("expires_in") {
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| {
            AuthError::MalformedResponse(format!(
                "'expires_in' must be a non-negative integer, got {}",
                n
            ))
        })?,
        Some(Value::String(s)) => s.trim().parse::<u64>().map_err(|_| {
            AuthError::MalformedResponse(format!(
                "'expires_in' must be a non-negative integer, got \"{}\"",
                s
            ))
        })?,
        Some(other) => {
            return Err(AuthError::MalformedResponse(format!(
                "'expires_in' must be an integer, got {}",
                other
            )))
        }
        None => return Err(AuthError::MalformedResponse("'expires_in' is missing".into())),
    };

    Ok(TokenResponse {
        access_token,
        expires_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_response() {
        let parsed = parse_token_response(
            r#"{"access_token":"abc","token_type":"bearer","expires_in":3600}"#,
        )
        .unwrap();

        assert_eq!(
            parsed,
            TokenResponse {
                access_token: "abc".into(),
                expires_in: 3600
            }
        );
    }

    #[test]
    fn accepts_numeric_string_expiry() {
        let parsed = parse_token_response(r#"{"access_token":"abc","expires_in":"60"}"#).unwrap();
        assert_eq!(parsed.expires_in, 60);
    }

    #[test]
    fn rejects_missing_or_empty_token() {
        for body in [
            r#"{"expires_in":3600}"#,
            r#"{"access_token":"","expires_in":3600}"#,
            r#"{"access_token":42,"expires_in":3600}"#,
        ] {
            assert!(matches!(
                parse_token_response(body),
                Err(AuthError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn rejects_bad_expiry() {
        for body in [
            r#"{"access_token":"abc"}"#,
            r#"{"access_token":"abc","expires_in":-5}"#,
            r#"{"access_token":"abc","expires_in":1.5}"#,
            r#"{"access_token":"abc","expires_in":"soon"}"#,
            r#"{"access_token":"abc","expires_in":null}"#,
        ] {
            assert!(matches!(
                parse_token_response(body),
                Err(AuthError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_token_response("<html>bad gateway</html>").unwrap_err();
        assert!(err.to_string().starts_with("malformed token response: body is not JSON"));
    }
}
