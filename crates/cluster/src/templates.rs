// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Markdown body templates for generated posts, rendered with Tera.
//!
//! Every template links to at least one `/locations/*` page, to `/booking`
//! and `/contact`, and to each related post under `/blog/*`.

use serde::Serialize;
use tera::{Context, Tera};

use crate::ClusterError;

/// A `/blog/<slug>` link with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedLink {
    pub slug: String,
    pub label: String,
}

pub const LOCATION_POST_TEMPLATE: &str = r#"# {{ city }} {{ topic_title }}

{{ city }} remains one of the most searched pilgrimage destinations by devotees looking for trusted temple guidance, darshan clarity, and Sansthan accommodation support. This guide on **{{ city }} {{ topic_title | lower }}** is written for families who want a practical and peaceful yatra experience.

{{ focus }}

## Why this {{ city }} guide matters for devotees

When devotees search for terms like "Shri Gajanan Maharaj Sansthan {{ city }}", "Shree Gajanan Maharaj Sansthan {{ city }}", or "{{ city }} temple accommodation", they usually need clear, reliable, and actionable guidance. This article consolidates travel intent, accommodation intent, and darshan intent in one place.

## Accommodation and booking support

- Explore official location details: [{{ city }} Sansthan Accommodation]({{ location_page }})
- Start your request flow: [Accommodation Booking Request](/booking)
- Need direct office help? [Contact Sansthan Team](/contact)

## Darshan and visit planning checklist

1. Keep a flexible darshan window to handle day-wise crowd variation.
2. Carry valid ID documents for all family members.
3. Keep one active phone number for booking follow-up.
4. Plan local movement in advance for senior citizens and children.
5. Use official Sansthan communication channels for confirmations.

## Related guides for deeper planning

{% for entry in related -%}
- [{{ entry.label }}](/blog/{{ entry.slug }})
{% endfor %}
## Practical conclusion for {{ city }} devotees

This {{ city }} planning resource is built to make your pilgrimage smoother, more spiritual, and better organized. For best outcomes, complete your route planning early, confirm accommodation through official support, and keep your itinerary realistic for all age groups.
"#;

pub const CROSS_LOCATION_GUIDE_TEMPLATE: &str = r#"# {{ title }}

This guide helps devotees compare multiple locations connected to Shri Gajanan Maharaj Sansthan and related pilgrimage circuits. It is ideal for families planning a structured trip across Shegaon, Omkareshwar, Pandharpur, and Trimbakeshwar.

## Core planning actions

1. Decide the primary darshan priority for your family.
2. Assign travel days with enough rest intervals.
3. Keep accommodation communication centralized.
4. Prepare emergency contacts and health essentials.

## Official pages to use during planning

- [Shegaon Bhakt Niwas](/locations/shegaon-bhakt-niwas)
- [Omkareshwar Accommodation](/locations/omkareshwar)
- [Pandharpur Sansthan Location](/locations/pandharpur-math)
- [Trimbakeshwar Sansthan Location](/locations/trimbakeshwar)
- [Booking Request Page](/booking)
- [Contact Sansthan Support](/contact)

## Related reading

{% for entry in related -%}
- [{{ entry.label }}](/blog/{{ entry.slug }})
{% endfor %}
## Final note

For the best pilgrimage experience, keep your plan devotional but practical: focus on darshan flow, family comfort, and official communication clarity at every stage.
"#;

pub const SPIRITUAL_OR_EVENT_TEMPLATE: &str = r#"# {{ title }}

{{ focus_keyword }} is frequently searched by devotees who want both spiritual clarity and practical planning support. This article provides structured guidance aligned with Sansthan discipline and family-friendly travel needs.

## {{ heading_label }}

- Keep darshan planning realistic and time-buffered.
- Align travel expectations with senior citizens and children.
- Confirm accommodation and communication channels in advance.
- Focus on seva, discipline, and mindful conduct throughout the journey.

## Helpful official links

- [Shegaon Bhakt Niwas Location](/locations/shegaon-bhakt-niwas)
- [Omkareshwar Sansthan Location](/locations/omkareshwar)
- [Accommodation Booking Request](/booking)
- [Contact Sansthan Office](/contact)

## Continue reading

{% for entry in related -%}
- [{{ entry.label }}](/blog/{{ entry.slug }})
{% endfor %}
## Devotee takeaway

Use this guidance as a planning companion, and rely on official channels for final operational details, availability, and schedule-sensitive updates.
"#;

/// Render `template` with `context`, collecting the full Tera error chain
/// into the returned error.
pub fn render(name: &str, template: &str, context: &Context) -> Result<String, ClusterError> {
    let mut tera = Tera::default();
    tera.render_str(template, context).map_err(|e| {
        let mut error_parts = vec![format!("Template rendering failed for {name}: {e}")];
        let chain = collect_error_chain(&e);
        if chain.len() > 1 {
            error_parts.push(format!("Error chain ({} levels):", chain.len()));
            for (i, err_msg) in chain.iter().enumerate().skip(1) {
                error_parts.push(format!("  ├─ Level {i}: {err_msg}"));
            }
        }
        ClusterError::Template(error_parts.join("\n"))
    })
}

fn collect_error_chain(err: &dyn std::error::Error) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(err) = source {
        chain.push(err.to_string());
        source = err.source();
    }
    chain
}
