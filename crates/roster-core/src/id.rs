use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use data_encoding::{Encoding, Specification};
use serde::{Deserialize, Serialize};
use snafu::Snafu;

/// Base64 with `-` and `~` in place of `+` and `/`
///
/// Output is safe inside a query string value and an element id.
static TOKEN_ENCODING: LazyLock<Encoding> = LazyLock::new(|| {
    let mut spec = Specification::new();
    spec.symbols
        .push_str("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-~");
    spec.padding = Some('=');
    spec.encoding().expect("Can't fail")
});

/// Human readable identity of a persona
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaName(String);

impl PersonaName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonaName {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for PersonaName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Snafu)]
pub enum IdTokenError {
    #[snafu(display("Id token can't be empty"))]
    Empty,
    #[snafu(display("Id token contains a character outside of the token alphabet: {token}"))]
    InvalidChar { token: String },
}

/// Transport-safe form of a [`PersonaName`]
///
/// Used as the `persona` argument of mutations and as a row correlation key.
/// The client never decodes it, tokens received from the server are passed
/// back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdToken(String);

impl IdToken {
    pub fn encode(name: &PersonaName) -> Self {
        Self(TOKEN_ENCODING.encode(name.as_str().as_bytes()))
    }

    /// Take a token from a server document as-is
    pub fn from_wire(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Element identifier like `trusted-link-<token>`
    pub fn dom_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.0)
    }
}

impl fmt::Display for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsing checks the alphabet, for tokens typed in by an operator
impl FromStr for IdToken {
    type Err = IdTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return EmptySnafu.fail();
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '~' | '='))
        {
            return InvalidCharSnafu { token: s }.fail();
        }
        Ok(Self(s.to_owned()))
    }
}
