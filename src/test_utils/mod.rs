#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;

pub(crate) use html::{assert_element_text, assert_valid_html, count_elements, parse_html_document};
pub(crate) use http::assert_redirect;
