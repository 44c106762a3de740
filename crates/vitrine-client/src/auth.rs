//! Date-scoped request authentication.
//!
//! The remote API expects `X-Auth: md5("<password>_<YYYYMMDD>")` with the
//! current UTC date. The token changes at UTC midnight, so it is computed for
//! every request and never cached.

use chrono::{NaiveDate, Utc};
use md5::{Digest, Md5};

pub const AUTH_HEADER: &str = "X-Auth";

/// Lowercase hex MD5 of `"<secret>_<YYYYMMDD>"` for `date`.
#[must_use]
pub fn auth_token(secret: &str, date: NaiveDate) -> String {
    let stamp = date.format("%Y%m%d");
    format!("{:x}", Md5::digest(format!("{secret}_{stamp}").as_bytes()))
}

/// Token for the current UTC date.
#[must_use]
pub(crate) fn current_auth_token(secret: &str) -> String {
    auth_token(secret, Utc::now().date_naive())
}
