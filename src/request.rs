//! Request builder: translates `(method, path, params, body)` into an
//! immutable transport-level request value. Pure — no I/O.

use crate::error::DispatcherError;
use bytes::Bytes;
use once_cell::sync::Lazy;
use std::fmt;
use url::Url;

static URI_VALIDATION_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("http://dispatcher.invalid").expect("static base url is valid"));

/// The five verbs this dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Parses an uppercased method name. Unknown verbs are `UnsupportedMethod`.
    pub fn parse(raw: &str) -> Result<Self, DispatcherError> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(DispatcherError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable request value, ready to hand to a [`crate::transport::Transport`].
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl Request {
    /// Validates and assembles a request. Fails with `InvalidUri` if `path`
    /// cannot be parsed, `UnsupportedMethod` for an unrecognized verb, and
    /// `UnsupportedOperation` for a `HEAD` request carrying a body.
    pub fn build(
        method: &str,
        path: &str,
        params: Vec<(String, String)>,
        headers: Vec<(String, String)>,
        body: Option<Bytes>,
    ) -> Result<Self, DispatcherError> {
        let method = Method::parse(method)?;
        validate_path(path)?;

        if method == Method::Head && body.is_some() {
            return Err(DispatcherError::UnsupportedOperation {
                reason: "HEAD requests must not carry a body".to_string(),
            });
        }

        Ok(Self {
            method,
            path: path.to_string(),
            params,
            headers,
            body,
        })
    }

    /// The path plus query string, params in insertion order, percent-encoded.
    pub fn uri(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            serializer.append_pair(key, value);
        }
        format!("{}?{}", self.path, serializer.finish())
    }
}

fn validate_path(path: &str) -> Result<(), DispatcherError> {
    URI_VALIDATION_BASE.join(path).map(|_| ()).map_err(|e| DispatcherError::InvalidUri {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_methods_case_insensitively() {
        assert_eq!(Method::parse("get").unwrap(), Method::Get);
        assert_eq!(Method::parse("DELETE").unwrap(), Method::Delete);
    }

    #[test]
    fn unknown_method_is_unsupported() {
        let err = Method::parse("PATCH").unwrap_err();
        assert!(matches!(err, DispatcherError::UnsupportedMethod { .. }));
    }

    #[test]
    fn head_with_body_is_rejected_before_any_network_call() {
        let err = Request::build("HEAD", "/x", vec![], vec![], Some(Bytes::from_static(b"x"))).unwrap_err();
        assert!(matches!(err, DispatcherError::UnsupportedOperation { .. }));
    }

    #[test]
    fn get_and_delete_may_carry_a_body() {
        assert!(Request::build("GET", "/x", vec![], vec![], Some(Bytes::from_static(b"x"))).is_ok());
        assert!(Request::build("DELETE", "/x", vec![], vec![], Some(Bytes::from_static(b"x"))).is_ok());
    }

    #[test]
    fn unparseable_path_is_invalid_uri() {
        let err = Request::build("GET", "http://[::1", vec![], vec![], None).unwrap_err();
        assert!(matches!(err, DispatcherError::InvalidUri { .. }));
    }

    #[test]
    fn uri_preserves_param_insertion_order() {
        let req = Request::build(
            "GET",
            "/_search",
            vec![("q".to_string(), "a b".to_string()), ("size".to_string(), "10".to_string())],
            vec![],
            None,
        )
        .unwrap();
        assert_eq!(req.uri(), "/_search?q=a+b&size=10");
    }

    #[test]
    fn uri_round_trips_through_form_urlencoded_parse() {
        let params = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "two words".to_string()),
        ];
        let req = Request::build("GET", "/x", params.clone(), vec![], None).unwrap();
        let query = req.uri().split_once('?').unwrap().1.to_string();
        let parsed: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(parsed, params);
    }
}
