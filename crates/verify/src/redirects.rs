// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Live host redirect tracing against the deployed site.
//!
//! Opt-in: nothing touches the network unless `SEO_VERIFY_LIVE_REDIRECTS`
//! is truthy. Both the canonical origin and its www/apex twin are followed
//! hop by hop with redirects disabled, and must converge on the canonical
//! host without looping or bouncing between the two.

use std::collections::BTreeSet;
use std::time::Duration;

use corpus::CANONICAL_ORIGIN;
use diagnostics::{info_event, warn_event};
use serde::Serialize;
use url::Url;

use crate::{Report, VerifyError, is_truthy};

pub const ENABLE_ENV: &str = "SEO_VERIFY_LIVE_REDIRECTS";
pub const SITE_URL_ENVS: [&str; 2] = ["SEO_LIVE_SITE_URL", "NEXT_PUBLIC_SITE_URL"];
pub const APEX_DOMAIN: &str = "shrigajananmaharajsanstan.com";
pub const MAX_REDIRECT_HOPS: usize = 8;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const USER_AGENT: &str = "seo-live-redirect-verifier/1.0";

/// Status and `Location` header of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopResponse {
    pub status: u16,
    pub location: Option<String>,
}

/// Issues one request without following redirects.
pub trait HopFetcher {
    fn fetch(&self, url: &str) -> Result<HopResponse, VerifyError>;
}

/// Blocking HTTP client with redirects disabled.
#[derive(Debug, Clone)]
pub struct HttpHopFetcher {
    client: reqwest::blocking::Client,
}

impl HttpHopFetcher {
    pub fn new() -> Result<Self, VerifyError> {
        let client = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| VerifyError::Http {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl HopFetcher for HttpHopFetcher {
    fn fetch(&self, url: &str) -> Result<HopResponse, VerifyError> {
        let response = self.client.get(url).send().map_err(|e| VerifyError::Http {
            url: url.to_string(),
            reason: if e.is_timeout() {
                format!("Request timed out after {}ms", REQUEST_TIMEOUT.as_millis())
            } else {
                e.to_string()
            },
        })?;
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(HopResponse {
            status: response.status().as_u16(),
            location,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hop {
    pub from: String,
    pub status: u16,
    pub location: Option<String>,
}

/// Result of following one redirect chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectChain {
    pub hops: Vec<Hop>,
    pub final_url: String,
    pub loop_at: Option<String>,
    pub max_hops_reached: bool,
}

impl RedirectChain {
    pub fn loop_detected(&self) -> bool {
        self.loop_at.is_some()
    }

    pub fn final_host(&self) -> Option<String> {
        host_of(&self.final_url)
    }

    fn first_location(&self) -> Option<&str> {
        self.hops.first().and_then(|hop| hop.location.as_deref())
    }
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string))
}

fn invalid_url(url: &str, e: url::ParseError) -> VerifyError {
    VerifyError::Http {
        url: url.to_string(),
        reason: e.to_string(),
    }
}

/// Follow redirects from `start` for at most [`MAX_REDIRECT_HOPS`] requests.
pub fn trace_redirects(fetcher: &dyn HopFetcher, start: &str) -> Result<RedirectChain, VerifyError> {
    let mut current = Url::parse(start).map_err(|e| invalid_url(start, e))?;
    let mut visited = BTreeSet::from([current.to_string()]);
    let mut chain = RedirectChain::default();

    for _ in 0..MAX_REDIRECT_HOPS {
        let response = fetcher.fetch(current.as_str())?;
        chain.hops.push(Hop {
            from: current.to_string(),
            status: response.status,
            location: response.location.clone(),
        });

        let location = response
            .location
            .filter(|_| (300..400).contains(&response.status));
        let Some(location) = location else {
            chain.final_url = current.to_string();
            return Ok(chain);
        };

        let next = current.join(&location).map_err(|e| invalid_url(&location, e))?;
        if !visited.insert(next.to_string()) {
            chain.final_url = next.to_string();
            chain.loop_at = Some(next.to_string());
            return Ok(chain);
        }
        current = next;
    }

    chain.final_url = current.to_string();
    chain.max_hops_reached = true;
    Ok(chain)
}

/// Scheme and host of `url`, with the apex domain mapped to `www.`.
pub fn normalize_canonical_origin(candidate: &str) -> Option<String> {
    let with_scheme = if candidate.starts_with("http://") || candidate.starts_with("https://") {
        candidate.to_string()
    } else {
        format!("https://{candidate}")
    };
    let mut parsed = Url::parse(&with_scheme).ok()?;
    if parsed.host_str() == Some(APEX_DOMAIN) {
        parsed.set_host(Some(&format!("www.{APEX_DOMAIN}"))).ok()?;
    }
    let origin = parsed.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Origin to verify, from `SEO_LIVE_SITE_URL`, then `NEXT_PUBLIC_SITE_URL`,
/// then the production origin.
pub fn resolve_live_origin<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let candidate = SITE_URL_ENVS
        .iter()
        .filter_map(|name| lookup(*name))
        .find(|value| !value.trim().is_empty());
    let Some(candidate) = candidate else {
        return CANONICAL_ORIGIN.to_string();
    };
    normalize_canonical_origin(candidate.trim()).unwrap_or_else(|| {
        warn_event!("live-redirect-verify-warning", {
            "message": "Invalid canonical origin candidate. Falling back to default.",
            "candidate": candidate,
            "fallback": CANONICAL_ORIGIN,
        });
        CANONICAL_ORIGIN.to_string()
    })
}

/// The www twin of an apex origin, or the apex of a www origin.
pub fn alternate_origin(canonical: &str) -> Option<String> {
    let mut parsed = Url::parse(canonical).ok()?;
    let host = parsed.host_str()?.to_string();
    let alternate = match host.strip_prefix("www.") {
        Some(apex) => apex.to_string(),
        None => format!("www.{host}"),
    };
    parsed.set_host(Some(&alternate)).ok()?;
    Some(parsed.origin().ascii_serialization())
}

fn same_origin(location: &str, origin: &str) -> bool {
    match (Url::parse(location), Url::parse(origin)) {
        (Ok(a), Ok(b)) => a.origin() == b.origin(),
        _ => false,
    }
}

/// Trace both hosts and check loops, hop limits, the final host and
/// two-way bouncing. Skipped with a passing report unless enabled;
/// `connect` is only called once the checks are enabled.
pub fn verify_live_redirects<F, C, H>(lookup: F, connect: C) -> Result<Report, VerifyError>
where
    F: Fn(&str) -> Option<String>,
    C: FnOnce() -> Result<H, VerifyError>,
    H: HopFetcher,
{
    let mut report = Report::new("live-redirect-verify");
    if !is_truthy(lookup(ENABLE_ENV).as_deref()) {
        info_event!("live-redirect-verify-skipped", {
            "reason": format!("Set {ENABLE_ENV}=true to enable deployed host redirect checks."),
        });
        report.detail("skipped", true);
        return Ok(report);
    }

    let canonical = resolve_live_origin(&lookup);
    let alternate = alternate_origin(&canonical).ok_or_else(|| VerifyError::Http {
        url: canonical.clone(),
        reason: "Cannot derive alternate host".into(),
    })?;
    info_event!("live-redirect-verify-start", {
        "canonicalOrigin": canonical,
        "alternateOrigin": alternate,
        "maxRedirectHops": MAX_REDIRECT_HOPS,
    });

    let fetcher = connect()?;
    let canonical_chain = trace_redirects(&fetcher, &canonical)?;
    let alternate_chain = trace_redirects(&fetcher, &alternate)?;

    for (label, chain) in [("canonical", &canonical_chain), ("alternate", &alternate_chain)] {
        if let Some(loop_at) = &chain.loop_at {
            report.fail(
                format!("{label}-chain-loop"),
                format!("{} host chain entered a redirect loop at {loop_at}.", capitalize(label)),
            );
        }
        if chain.max_hops_reached {
            report.fail(
                format!("{label}-chain-max-hops"),
                format!("{} host exceeded {MAX_REDIRECT_HOPS} hops.", capitalize(label)),
            );
        }
    }

    let canonical_host = host_of(&canonical);
    let canonical_final = canonical_chain.final_host();
    if canonical_final != canonical_host {
        report.fail(
            "canonical-final-host",
            format!(
                "Canonical origin does not resolve back to canonical host (ended at {}).",
                canonical_final.unwrap_or_default()
            ),
        );
    }
    let alternate_final = alternate_chain.final_host();
    if alternate_final != canonical_host {
        report.fail(
            "alternate-final-host",
            format!(
                "Alternate host does not converge to canonical host (ended at {}).",
                alternate_final.unwrap_or_default()
            ),
        );
    }

    let bounced = canonical_chain
        .first_location()
        .zip(alternate_chain.first_location())
        .is_some_and(|(from_canonical, from_alternate)| {
            same_origin(from_canonical, &alternate) && same_origin(from_alternate, &canonical)
        });
    if bounced {
        report.fail(
            "two-way-host-bounce",
            "Detected two-way redirect bounce between canonical and alternate host.",
        );
    }

    report.detail("canonicalOrigin", &canonical);
    report.detail("alternateOrigin", &alternate);
    report.detail("canonicalChain", &canonical_chain);
    report.detail("alternateChain", &alternate_chain);
    Ok(report)
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
