//! Anti-forgery token lookup shared by every mutating request.

use std::cell::RefCell;

use percent_encoding::percent_decode_str;

pub const DEFAULT_COOKIE_NAME: &str = "csrftoken";

/// The page's cookie header. The token is looked up again for every command
/// so a rotated cookie takes effect immediately.
#[derive(Debug, Default)]
pub struct CookieJar {
    header: RefCell<String>,
    csrf_name: String,
}

impl CookieJar {
    pub fn new(header: impl Into<String>, csrf_name: impl Into<String>) -> Self {
        Self {
            header: RefCell::new(header.into()),
            csrf_name: csrf_name.into(),
        }
    }

    pub fn set_header(&self, header: impl Into<String>) {
        *self.header.borrow_mut() = header.into();
    }

    pub fn get(&self, name: &str) -> Option<String> {
        cookie_value(&self.header.borrow(), name)
    }

    pub fn csrf_token(&self) -> Option<String> {
        self.get(&self.csrf_name)
    }
}

pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
}
