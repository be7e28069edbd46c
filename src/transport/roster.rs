//! Reads the current user and the user list out of the server's index page.
//!
//! The page marks the logged-in user with `<body data-username="...">` and
//! renders one `<li data-username="...">` per known user.

use scraper::{Html, Selector};
use thiserror::Error;

const USERNAME_ATTRIBUTE: &str = "data-username";
const CURRENT_USER_SELECTOR: &str = "body[data-username]";
const USER_ENTRY_SELECTOR: &str = "li[data-username]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("page has no <body data-username> attribute; is the session logged in?")]
    MissingCurrentUser,
    #[error("invalid selector `{selector}`: {details}")]
    Selector {
        selector: &'static str,
        details: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPage {
    pub current_username: String,
    /// Usernames in page order, duplicates removed.
    pub usernames: Vec<String>,
}

pub fn parse_index_page(html: &str) -> Result<RosterPage, RosterError> {
    let document = Html::parse_document(html);

    let current_username = document
        .select(&selector(CURRENT_USER_SELECTOR)?)
        .filter_map(|body| body.value().attr(USERNAME_ATTRIBUTE))
        .find(|name| !name.is_empty())
        .map(str::to_owned)
        .ok_or(RosterError::MissingCurrentUser)?;

    let mut usernames: Vec<String> = Vec::new();
    for entry in document.select(&selector(USER_ENTRY_SELECTOR)?) {
        let Some(name) = entry.value().attr(USERNAME_ATTRIBUTE) else {
            continue;
        };
        if !name.is_empty() && !usernames.iter().any(|known| known == name) {
            usernames.push(name.to_owned());
        }
    }

    Ok(RosterPage {
        current_username,
        usernames,
    })
}

fn selector(css: &'static str) -> Result<Selector, RosterError> {
    Selector::parse(css).map_err(|error| RosterError::Selector {
        selector: css,
        details: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Chat</title></head>
<body class="app" data-username="alice">
  <ul id="userList">
    <li data-username="bob" class="offline">bob</li>
    <li class="online" data-username='carol'>carol</li>
    <li data-username="o&#39;brien">o'brien</li>
    <li data-username="bob">bob again</li>
    <li>not a user</li>
  </ul>
  <link rel="stylesheet" href="x.css">
</body>
</html>"#;

    #[test]
    fn extracts_current_user_and_roster_in_order() {
        let page = parse_index_page(INDEX_PAGE).expect("page should parse");

        assert_eq!(page.current_username, "alice");
        assert_eq!(page.usernames, ["bob", "carol", "o'brien"]);
    }

    #[test]
    fn missing_body_attribute_is_an_error() {
        let result = parse_index_page("<html><body><form action=\"/login\"></form></body></html>");

        assert_eq!(result, Err(RosterError::MissingCurrentUser));
    }

    #[test]
    fn page_without_users_yields_empty_roster() {
        let page = parse_index_page(r#"<BODY DATA-USERNAME="alice"><ul></ul></BODY>"#)
            .expect("page should parse");

        assert_eq!(page.current_username, "alice");
        assert!(page.usernames.is_empty());
    }

    #[test]
    fn similar_tag_names_are_not_matched() {
        let page = parse_index_page(
            r#"<body data-username="alice"><link data-username="nope"><li data-username="bob"></li></body>"#,
        )
        .expect("page should parse");

        assert_eq!(page.usernames, ["bob"]);
    }

    #[test]
    fn commented_out_entries_are_ignored() {
        let page = parse_index_page(
            r#"<body data-username="alice"><ul><!-- <li data-username="ghost"></li> --><li data-username="bob">bob</li></ul></body>"#,
        )
        .expect("page should parse");

        assert_eq!(page.usernames, ["bob"]);
    }

    #[test]
    fn attribute_text_inside_other_values_is_not_read() {
        let page = parse_index_page(
            r#"<body data-username="alice"><ul><li title="see data-username=x" data-username="bob">bob</li></ul></body>"#,
        )
        .expect("page should parse");

        assert_eq!(page.usernames, ["bob"]);
    }

    #[test]
    fn entities_in_usernames_are_decoded() {
        let page = parse_index_page(
            r#"<body data-username="a&amp;b"><ul><li data-username="&lt;3&gt;">x</li></ul></body>"#,
        )
        .expect("page should parse");

        assert_eq!(page.current_username, "a&b");
        assert_eq!(page.usernames, ["<3>"]);
    }
}
