use std::{convert::Infallible, fmt::Display, str::FromStr};

/// The HTTP verbs the MailChimp v3 API is driven with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    /// Whether parameters travel as a JSON body (POST, PATCH, PUT) rather
    /// than as a query string (GET, DELETE).
    pub fn sends_json_body(self) -> bool {
        match self {
            Method::Post | Method::Patch | Method::Put => true,
            Method::Get | Method::Delete => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Parsing never fails: anything that isn't a known verb is a GET.
impl FromStr for Method {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "post" => Method::Post,
            "patch" => Method::Patch,
            "put" => Method::Put,
            "delete" => Method::Delete,
            _ => Method::Get,
        })
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}
