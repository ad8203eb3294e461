use chrono::{Datelike as _, NaiveDate, Utc};
use chrono_tz::Europe::London;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.bbc.co.uk/schedules";
pub const DEFAULT_SERVICE: &str = "p00fzl7j";

/// The requested schedule day, or today's date on UK civil time.
pub fn resolve_date(requested: Option<NaiveDate>) -> NaiveDate {
    requested.unwrap_or_else(|| Utc::now().with_timezone(&London).date_naive())
}

/// Builds `<base>/<service>/<YYYY>/<MM>/<DD>`.
pub fn schedule_url(base: &Url, service: &str, date: NaiveDate) -> anyhow::Result<Url> {
    if service.is_empty() || service.contains('/') {
        anyhow::bail!("service id must be a single path segment: {service:?}");
    }

    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| anyhow::anyhow!("base url cannot have path segments: {base}"))?;
        segments.pop_if_empty();
        segments.push(service);
        segments.push(&format!("{:04}", date.year()));
        segments.push(&format!("{:02}", date.month()));
        segments.push(&format!("{:02}", date.day()));
    }
    Ok(url)
}
