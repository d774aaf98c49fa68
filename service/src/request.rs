//! Normalized requests.

use mockd_core::Record;
use mockd_parser::{parse_resource_path, ResourcePath};
use mockd_query::QueryOptions;
use std::fmt;
use std::str::FromStr;

use crate::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PATCH" | "PUT" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ServiceError::method_not_allowed(s, "*")),
        }
    }
}

/// A request against the modeled service.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: ResourcePath,
    /// Bound action invoked on the addressed entity (`v4treedraft.draftEdit`).
    pub action: Option<String>,
    pub options: QueryOptions,
    pub body: Option<Record>,
    /// Requesting user; the configured default applies when absent.
    pub principal: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: ResourcePath) -> Self {
        Self {
            method,
            path,
            action: None,
            options: QueryOptions::default(),
            body: None,
            principal: None,
        }
    }

    /// Build a request from a service-relative URL such as
    /// `/SalesOrganizations(ID='EMEA',IsActiveEntity=true)/v4treedraft.draftEdit?$select=ID`.
    ///
    /// A trailing qualified segment without key becomes the action name.
    pub fn from_url(method: Method, url: &str) -> ServiceResult<Self> {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url, None),
        };

        let path = decode(path)?;
        let mut path = parse_resource_path(&path)?;
        let mut action = None;
        if path.segments.len() > 1 {
            if let Some(last) = path.last() {
                if last.key.is_none() && last.name.contains('.') {
                    action = path.segments.pop().map(|segment| segment.name);
                }
            }
        }

        let mut pairs = Vec::new();
        for pair in query.unwrap_or_default().split('&').filter(|pair| !pair.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            pairs.push((decode(name)?, decode(value)?));
        }
        let options = QueryOptions::parse(pairs.iter().map(|(name, value)| (name.as_str(), value.as_str())))?;

        Ok(Self {
            action,
            options,
            ..Self::new(method, path)
        })
    }

    pub fn with_body(mut self, body: Record) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }
}

fn decode(text: &str) -> ServiceResult<String> {
    urlencoding::decode(text)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| ServiceError::invalid_request(format!("malformed URL encoding: {}", err)))
}
