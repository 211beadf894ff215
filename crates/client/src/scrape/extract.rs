//! Profile field extraction from a rendered profile page.
//!
//! Each field tries a list of page locations in order and falls back to the
//! page's Open Graph tags for name and title.

use insyt_core::{ScrapedProfile, now_millis};
use scraper::{ElementRef, Html, Selector};

use super::ScrapeError;

/// URL fragments that mean the site bounced us to its sign-in page.
const LOGIN_MARKERS: &[&str] = &["/login", "/uas/login"];

const NAME_SELECTORS: &[&str] = &[".mt2.relative h1", "h1"];
const TITLE_SELECTORS: &[&str] = &[".text-body-medium", ".pv-text-details__left-panel div"];
const LOCATION_SELECTORS: &[&str] = &[
    ".text-body-small.inline.t-black--light.break-words",
    ".pv-text-details__left-panel .text-body-small",
];
const COMPANY_LOGO_SELECTOR: &str = r#"[data-field="experience_company_logo"] img"#;
const COMPANY_TEXT_SELECTOR: &str = ".pv-top-card--experience-list-item";

/// True when `url` is a sign-in page rather than a profile.
pub fn is_login_redirect(url: &str) -> bool {
    LOGIN_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Extract profile fields from page HTML.
///
/// `final_url` is where the view ended up after redirects; it becomes the
/// record's `profile_url`.
pub fn extract_profile(html: &str, final_url: &str) -> Result<ScrapedProfile, ScrapeError> {
    if is_login_redirect(final_url) {
        return Err(ScrapeError::Unauthenticated(final_url.to_string()));
    }

    if html.trim().is_empty() {
        return Err(ScrapeError::ExtractionFailed("page produced an empty document".into()));
    }

    let document = Html::parse_document(html);

    let name = first_text(&document, NAME_SELECTORS).or_else(|| meta_content(&document, "og:title"));
    let title = first_text(&document, TITLE_SELECTORS).or_else(|| meta_content(&document, "og:description"));

    let location = first_text(&document, LOCATION_SELECTORS);

    let company = first_attr(&document, COMPANY_LOGO_SELECTOR, "alt")
        .or_else(|| first_text(&document, &[COMPANY_TEXT_SELECTOR]));

    let profile = ScrapedProfile {
        name,
        title,
        location,
        company,
        profile_url: final_url.to_string(),
        scraped_at: now_millis(),
    };
    tracing::debug!(?profile, "extracted profile data");

    Ok(profile)
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(css, "skipping unparsable selector: {e}");
            None
        }
    }
}

fn collapse(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() { None } else { Some(collapsed) }
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    collapse(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text of the first element matched by the first selector that matches anything.
fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|css| selector(css))
        .find_map(|sel| document.select(&sel).next().and_then(element_text))
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .and_then(collapse)
}

fn meta_content(document: &Html, property: &str) -> Option<String> {
    first_attr(document, &format!(r#"meta[property="{property}"]"#), "content")
}
