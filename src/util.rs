/// Turns a user-entered region URL into a usable base URL. Bare hosts like
/// `dm-us.informaticacloud.com` get an `https://` prefix; an explicit
/// `http(s)://` URL is kept as-is so tests can point at a local server.
pub fn normalize_region_url(region: &str) -> String {
    let trimmed = region.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
