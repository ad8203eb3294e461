use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use url::Url;

use crate::cli::{FetchArgs, ParseArgs, ShowArgs};
use crate::extract::extract;
use crate::fetch::{HttpPageSource, PageSource};
use crate::formats::{Schedule, TIMESTAMP_FORMAT};
use crate::normalize::normalize;

/// Extract and normalize one page. No state survives between calls.
pub fn schedule_from_html(html: &str, source_url: &Url) -> anyhow::Result<Schedule> {
    let entries = extract(html, source_url).context("extract program entries")?;
    let schedule = normalize(&entries).context("normalize program entries")?;
    Ok(schedule)
}

pub fn scrape_page(source: &dyn PageSource, url: &Url) -> anyhow::Result<Schedule> {
    let html = source.fetch(url).context("fetch schedule page")?;
    schedule_from_html(&html, url)
}

pub fn fetch(args: FetchArgs) -> anyhow::Result<()> {
    let date = crate::date::resolve_date(args.date);
    let base_url = Url::parse(&args.base_url).context("parse --base-url")?;
    if base_url.scheme() != "http" && base_url.scheme() != "https" {
        anyhow::bail!("--base-url must be http/https: {base_url}");
    }
    let url = crate::date::schedule_url(&base_url, &args.service, date)
        .context("build schedule url")?;

    let out_path = crate::store::schedule_path(Path::new(&args.out), date);
    if out_path.exists() && !args.force {
        anyhow::bail!("schedule output already exists: {}", out_path.display());
    }

    tracing::info!(%url, %date, "scraping schedule");
    let source = HttpPageSource::new().context("init page source")?;
    let schedule = scrape_page(&source, &url)?;

    crate::store::write_schedule(&out_path, &schedule, args.force)
        .context("write schedule")?;
    tracing::info!(
        records = schedule.len(),
        out = %out_path.display(),
        "schedule saved"
    );

    Ok(())
}

pub fn parse(args: ParseArgs) -> anyhow::Result<()> {
    let html_path = PathBuf::from(&args.html);
    let html = std::fs::read_to_string(&html_path)
        .with_context(|| format!("read html: {}", html_path.display()))?;

    let source_url = match args.url.as_deref() {
        Some(raw) => Url::parse(raw).context("parse --url")?,
        None => file_url(&html_path)?,
    };

    let schedule = schedule_from_html(&html, &source_url)?;

    match args.out.as_deref() {
        Some(out) => {
            let out_path = PathBuf::from(out);
            crate::store::write_schedule(&out_path, &schedule, args.force)
                .context("write schedule")?;
            tracing::info!(
                records = schedule.len(),
                out = %out_path.display(),
                "schedule saved"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &schedule)
                .context("serialize schedule json")?;
            stdout.write_all(b"\n").context("write stdout")?;
        }
    }

    Ok(())
}

pub fn show(args: ShowArgs) -> anyhow::Result<()> {
    let schedule = crate::store::read_schedule(Path::new(&args.schedule))?;
    let mut stdout = std::io::stdout().lock();
    write_listing(&mut stdout, &schedule).context("write listing")?;
    Ok(())
}

pub fn write_listing(out: &mut impl std::io::Write, schedule: &Schedule) -> std::io::Result<()> {
    for (key, record) in schedule.iter() {
        writeln!(
            out,
            "{key:>3}  {}  {}  {}  {}",
            record.start_time.format(TIMESTAMP_FORMAT),
            record.end_time.format(TIMESTAMP_FORMAT),
            record.pid,
            record.name
        )?;
    }
    out.flush()
}

fn file_url(path: &Path) -> anyhow::Result<Url> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("resolve html path: {}", path.display()))?;
    Url::from_file_path(&absolute)
        .map_err(|()| anyhow::anyhow!("html path is not a valid file url: {}", absolute.display()))
}
