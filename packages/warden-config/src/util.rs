use url::Url;

use crate::error::Result;

/// Joins a REST path onto a base endpoint
///
/// The base may or may not carry a scheme (https is assumed) or a trailing slash,
/// and may itself have a path component (e.g. a proxy like `https://rest.cosmos.directory/cosmoshub`)
/// which is kept intact.
pub fn rest_url(base: &str, path: &str) -> Result<Url> {
    let base = if base.contains("://") {
        base.to_string()
    } else {
        format!("https://{base}")
    };

    let mut url = Url::parse(&base)?;

    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);

    Ok(url)
}
