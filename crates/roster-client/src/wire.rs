//! Decoding of the trust endpoint's documents
//!
//! The endpoint answers with small XML documents:
//!
//! ```text
//! <Revision>5</Revision>
//!
//! <Users>
//!   <Persona>
//!     <User>alice</User>
//!     <UserB64>YWxpY2U=</UserB64>
//!     <Subscribed>false</Subscribed>
//!     <Reason>good uploads</Reason>
//!   </Persona>
//! </Users>
//! ```
//!
//! They are parsed leniently with the html5ever based `scraper`, so element
//! names match regardless of case. HTML parsing has no notion of empty
//! elements, so `<Reason/>` style tags are expanded to an open/close pair
//! first.

use std::borrow::Cow;

use roster_core::{IdToken, Persona, PersonaName, Revision, TrustList};
use scraper::{ElementRef, Html, Selector};
use snafu::OptionExt as _;
use tracing::trace;

use crate::error::{InvalidRevisionSnafu, MissingFieldSnafu, ParseError, ParseResult};

const LOG_TARGET: &str = "roster::wire";

/// The first non-blank text node of the document, as an integer
pub fn parse_revision(doc: &str) -> ParseResult<Revision> {
    let html = Html::parse_document(&expand_empty_elements(doc));
    let text = html
        .root_element()
        .text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or_default();

    text.parse::<u64>()
        .map(Revision)
        .map_err(|_| InvalidRevisionSnafu { text }.build())
}

/// All `<Persona>` records of a list document, in document order
///
/// `User` and `UserB64` are required, as is `Subscribed` for the trusted list.
/// A missing `Reason` reads as empty.
pub fn parse_personas(doc: &str, list: TrustList) -> ParseResult<Vec<Persona>> {
    let html = Html::parse_document(&expand_empty_elements(doc));
    let persona_selector = Selector::parse("persona").map_err(|_| ParseError::Selector)?;
    let user_selector = Selector::parse("user").map_err(|_| ParseError::Selector)?;
    let token_selector = Selector::parse("userb64").map_err(|_| ParseError::Selector)?;
    let subscribed_selector = Selector::parse("subscribed").map_err(|_| ParseError::Selector)?;
    let reason_selector = Selector::parse("reason").map_err(|_| ParseError::Selector)?;

    let mut personas = vec![];
    for (index, element) in html.select(&persona_selector).enumerate() {
        let name = child_text(element, &user_selector)
            .filter(|s| !s.is_empty())
            .context(MissingFieldSnafu {
                field: "User",
                index,
            })?;
        let token = child_text(element, &token_selector)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .context(MissingFieldSnafu {
                field: "UserB64",
                index,
            })?;
        let subscribed = match list {
            TrustList::Trusted => {
                let subscribed =
                    child_text(element, &subscribed_selector).context(MissingFieldSnafu {
                        field: "Subscribed",
                        index,
                    })?;
                subscribed.trim() == "true"
            }
            TrustList::Distrusted => false,
        };
        let reason = child_text(element, &reason_selector).unwrap_or_default();

        trace!(target: LOG_TARGET, %list, %name, %token, "Parsed persona");
        personas.push(Persona {
            name: PersonaName::from(name),
            token: IdToken::from_wire(token),
            subscribed,
            reason,
        });
    }

    Ok(personas)
}

/// Rewrite `<Name/>` (and `<Name attr="x" />`) as `<Name></Name>`
pub(crate) fn expand_empty_elements(doc: &str) -> Cow<'_, str> {
    if !doc.contains("/>") {
        return Cow::Borrowed(doc);
    }

    let mut out = String::with_capacity(doc.len() + 16);
    let mut rest = doc;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find('>') else {
            rest = tail;
            break;
        };
        let tag = &tail[..=end];
        rest = &tail[end + 1..];

        let name = tag
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix("/>"))
            .and_then(|t| t.split_whitespace().next())
            .filter(|n| n.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        match name {
            Some(name) => {
                out.push_str(&tag[..tag.len() - 2]);
                out.push_str("></");
                out.push_str(name);
                out.push('>');
            }
            None => out.push_str(tag),
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn child_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|child| child.text().collect())
}
