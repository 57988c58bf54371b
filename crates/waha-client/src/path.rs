//! Endpoint path templates such as `/api/{session}/auth/qr`.

use crate::error::{WahaError, WahaResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

lazy_static! {
    // Placeholder directly after a slash. The trailing slash is not
    // consumed so `/{a}/{b}` yields both names.
    static ref PATH_PARAM: Regex =
        Regex::new(r"/\{([A-Za-z][A-Za-z0-9_]*)\}").expect("valid path param pattern");
}

/// A parsed endpoint path with its declared placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    params: Vec<String>,
}

impl PathTemplate {
    pub fn parse(path: &str) -> Self {
        let mut params: Vec<String> = Vec::new();
        for cap in PATH_PARAM.captures_iter(path) {
            let name = cap[1].to_string();
            if !params.contains(&name) {
                params.push(name);
            }
        }
        Self {
            raw: path.to_string(),
            params,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of appearance.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Substitute `args` into the template.
    ///
    /// The supplied names must match the declared placeholders exactly.
    pub fn render(&self, args: &BTreeMap<String, String>) -> WahaResult<String> {
        let expected: BTreeSet<&str> = self.params.iter().map(String::as_str).collect();
        let got: BTreeSet<&str> = args.keys().map(String::as_str).collect();
        if expected != got {
            return Err(WahaError::PathParams {
                expected: self.params.clone(),
                got: args.keys().cloned().collect(),
            });
        }

        for (name, value) in args {
            let dot_segment = value == "." || value == "..";
            if value.is_empty() || dot_segment || value.contains(['/', '?', '#']) {
                return Err(WahaError::InvalidPathValue {
                    name: name.clone(),
                    value: value.clone(),
                });
            }
        }

        Ok(populate_path_params(&self.raw, args))
    }
}

/// Replace every `{key}` in `path` with its value from `lookup`.
///
/// Plain substitution; unknown placeholders are left untouched.
pub fn populate_path_params(path: &str, lookup: &BTreeMap<String, String>) -> String {
    let mut out = path.to_string();
    for (key, value) in lookup {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_params() {
        let t = PathTemplate::parse("/api/sessions/start");
        assert!(!t.has_params());
        assert_eq!(t.render(&BTreeMap::new()).unwrap(), "/api/sessions/start");
    }

    #[test]
    fn test_extracts_params() {
        let t = PathTemplate::parse("/api/{session}/auth/qr");
        assert_eq!(t.params(), &["session".to_string()]);

        let t = PathTemplate::parse("/api/{session}/chats/{chatId}/messages");
        assert_eq!(t.params(), &["session".to_string(), "chatId".to_string()]);
    }

    #[test]
    fn test_adjacent_params() {
        let t = PathTemplate::parse("/api/{session}/{chatId}");
        assert_eq!(t.params().len(), 2);
        let out = t
            .render(&args(&[("session", "default"), ("chatId", "123@c.us")]))
            .unwrap();
        assert_eq!(out, "/api/default/123@c.us");
    }

    #[test]
    fn test_render_rejects_missing_and_extra() {
        let t = PathTemplate::parse("/api/sessions/{session}/me");
        let err = t.render(&BTreeMap::new()).unwrap_err();
        assert!(matches!(err, WahaError::PathParams { .. }));

        let err = t
            .render(&args(&[("session", "a"), ("other", "b")]))
            .unwrap_err();
        match err {
            WahaError::PathParams { expected, got } => {
                assert_eq!(expected, vec!["session"]);
                assert_eq!(got, vec!["other", "session"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_render_rejects_unsafe_values() {
        let t = PathTemplate::parse("/api/sessions/{session}/me");
        for bad in ["", "a/b", "a?x=1", "a#frag", ".", ".."] {
            let err = t.render(&args(&[("session", bad)])).unwrap_err();
            assert!(matches!(err, WahaError::InvalidPathValue { .. }), "{bad}");
        }
    }

    #[test]
    fn test_render_allows_dots_inside_values() {
        let t = PathTemplate::parse("/api/sessions/{session}/me");
        let out = t.render(&args(&[("session", "v1.2")])).unwrap();
        assert_eq!(out, "/api/sessions/v1.2/me");
        assert!(t.render(&args(&[("session", "...")])).is_ok());
    }

    #[test]
    fn test_populate_path_params_plain() {
        let out = populate_path_params(
            "/api/{session}/auth/{kind}",
            &args(&[("session", "work"), ("kind", "qr")]),
        );
        assert_eq!(out, "/api/work/auth/qr");

        let untouched = populate_path_params("/api/{session}", &BTreeMap::new());
        assert_eq!(untouched, "/api/{session}");
    }
}
