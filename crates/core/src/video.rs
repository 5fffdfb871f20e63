use url::Url;

const SHORT_HOST: &str = "youtu.be";
const SITE_HOST: &str = "youtube.com";

/// Video id from a `youtu.be/<id>` link or any youtube.com URL with `?v=<id>`.
pub fn video_id_from_url(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;
    let host = url.host_str()?;

    if host == SHORT_HOST {
        return non_empty(url.path().trim_start_matches('/'));
    }

    if host.contains(SITE_HOST) {
        return url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .and_then(|(_, value)| non_empty(&value));
    }

    None
}

/// Like [`video_id_from_url`], but youtube.com URLs must point at a watch page.
pub fn watch_video_id(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;
    let host = url.host_str()?;

    if host.contains(SITE_HOST) && !url.path().starts_with("/watch") {
        return None;
    }

    video_id_from_url(input)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
