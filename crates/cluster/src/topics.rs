// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Hardcoded topic tables the generator draws from.

/// A reusable location topic, combined with a location key into
/// `<location>-<suffix>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicVariant {
    pub suffix: &'static str,
    pub title: &'static str,
    pub intent: &'static str,
}

const fn topic(suffix: &'static str, title: &'static str, intent: &'static str) -> TopicVariant {
    TopicVariant {
        suffix,
        title,
        intent,
    }
}

pub const LOCATION_TOPIC_VARIANTS: [TopicVariant; 30] = [
    topic("darshan-timing-guide", "Darshan Timing Guide", "darshan"),
    topic("weekend-planning-guide", "Weekend Planning Guide", "travel-guide"),
    topic("family-accommodation-checklist", "Family Accommodation Checklist", "accommodation"),
    topic("best-time-to-visit", "Best Time to Visit", "seasonal-guide"),
    topic("route-and-transport-options", "Route and Transport Options", "transport"),
    topic("one-day-itinerary", "One Day Itinerary", "itinerary"),
    topic("two-day-itinerary", "Two Day Itinerary", "itinerary"),
    topic("devotee-faqs", "Devotee FAQs", "faq"),
    topic("first-time-visitor-guide", "First Time Visitor Guide", "beginner-guide"),
    topic("senior-citizen-travel-tips", "Senior Citizen Travel Tips", "family-travel"),
    topic("group-yatra-planning", "Group Yatra Planning", "group-travel"),
    topic("accommodation-near-temple", "Accommodation Near Temple", "accommodation"),
    topic("morning-darshan-planning", "Morning Darshan Planning", "darshan"),
    topic("festival-season-guide", "Festival Season Guide", "festival-planning"),
    topic("budget-pilgrimage-guide", "Budget Pilgrimage Guide", "budget-guide"),
    topic("family-safety-and-comfort-tips", "Family Safety and Comfort Tips", "family-travel"),
    topic("prayer-and-darshan-etiquette", "Prayer and Darshan Etiquette", "devotional"),
    topic("packing-checklist", "Packing Checklist", "travel-tips"),
    topic("rainy-season-visit-guide", "Rainy Season Visit Guide", "seasonal-guide"),
    topic("summer-visit-guide", "Summer Visit Guide", "seasonal-guide"),
    topic("winter-visit-guide", "Winter Visit Guide", "seasonal-guide"),
    topic("temple-area-food-and-facilities", "Temple Area Food and Facilities", "facilities"),
    topic("local-travel-checklist", "Local Travel Checklist", "travel-tips"),
    topic("darshan-queue-time-optimization", "Darshan Queue Time Optimization", "darshan"),
    topic("photo-and-memory-planning", "Photo and Memory Planning", "family-travel"),
    topic("festival-crowd-management-guide", "Festival Crowd Management Guide", "festival-planning"),
    topic("evening-darshan-planning", "Evening Darshan Planning", "darshan"),
    topic("temple-circuit-extension-guide", "Temple Circuit Extension Guide", "pilgrimage-circuit"),
    topic("kids-friendly-yatra-guide", "Kids Friendly Yatra Guide", "family-travel"),
    topic("contact-and-support-guide", "Contact and Support Guide", "contact"),
];

/// One sentence of topic-specific focus for a location post.
pub fn intent_focus(intent: &str) -> &'static str {
    match intent {
        "darshan" => "Plan darshan slots around queue patterns, aarti times and rest breaks for elders.",
        "travel-guide" => "Balance travel time, darshan time and rest so the weekend stays devotional rather than rushed.",
        "accommodation" => "Confirm room type, check-in window and family requirements before you travel.",
        "seasonal-guide" => "Match clothing, travel hours and darshan timing to the season you visit in.",
        "transport" => "Compare rail, road and local transport so arrival fits the darshan window.",
        "itinerary" => "Keep the itinerary realistic, with buffers between darshan, meals and travel.",
        "faq" => "These are the questions devotees ask the Sansthan office most often.",
        "beginner-guide" => "First visits go smoothly when booking, documents and darshan flow are clear in advance.",
        "family-travel" => "Keep comfort, safety and pace in mind for children and senior citizens.",
        "group-travel" => "Group yatras need one coordinator, a shared contact list and early accommodation requests.",
        "festival-planning" => "Festival days bring heavy crowds, so book early and keep darshan plans flexible.",
        "budget-guide" => "Simple stays, shared transport and early planning keep the pilgrimage affordable.",
        "devotional" => "Respectful conduct, silence in queues and mindful prayer keep the darshan meaningful.",
        "travel-tips" => "A short checklist prevents most last-minute problems on the road.",
        "facilities" => "Know where meals, drinking water and rest areas are before the day begins.",
        "pilgrimage-circuit" => "Extend the visit to nearby temples only when the core darshan plan is settled.",
        "contact" => "Use official phone, WhatsApp and booking channels for every confirmation.",
        _ => "Plan early and rely on official Sansthan communication for confirmations.",
    }
}

/// Per-location settings for the location clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationProfile {
    pub key: &'static str,
    pub city: &'static str,
    pub image: &'static str,
    pub location_page: &'static str,
    pub location_ids: &'static [&'static str],
    pub keyword_seed: [&'static str; 5],
    /// Cross-cluster guide slugs linked from every post of this location.
    pub pillar_slugs: [&'static str; 2],
}

pub const LOCATION_PROFILES: [LocationProfile; 4] = [
    LocationProfile {
        key: "shegaon",
        city: "Shegaon",
        image: "/images/shegaon-temple.jpg",
        location_page: "/locations/shegaon-bhakt-niwas",
        location_ids: &["shegaon-bhakt-niwas", "shegaon-anand-vihar", "shegaon-visawa"],
        keyword_seed: [
            "shri gajanan maharaj sansthan shegaon",
            "shree gajanan maharaj sansthan shegaon",
            "sri gajanan maharaj sansthan shegaon",
            "shegaon temple accommodation",
            "shegaon darshan planning",
        ],
        pillar_slugs: [
            "shegaon-to-omkareshwar-route-guide",
            "pandharpur-and-shegaon-family-yatra-plan",
        ],
    },
    LocationProfile {
        key: "omkareshwar",
        city: "Omkareshwar",
        image: "/images/omkareshwar.jpg",
        location_page: "/locations/omkareshwar",
        location_ids: &["omkareshwar"],
        keyword_seed: [
            "shri gajanan maharaj sansthan omkareshwar",
            "shree gajanan maharaj sansthan omkareshwar",
            "sri gajanan maharaj sansthan omkareshwar",
            "omkareshwar temple accommodation",
            "omkareshwar darshan timings",
        ],
        pillar_slugs: [
            "shegaon-to-omkareshwar-route-guide",
            "omkareshwar-to-trimbakeshwar-pilgrimage-checklist",
        ],
    },
    LocationProfile {
        key: "pandharpur",
        city: "Pandharpur",
        image: "/images/pandharpur.jpg",
        location_page: "/locations/pandharpur-math",
        location_ids: &["pandharpur-math"],
        keyword_seed: [
            "shri gajanan maharaj sansthan pandharpur",
            "shree gajanan maharaj sansthan pandharpur",
            "sri gajanan maharaj sansthan pandharpur",
            "pandharpur temple stay",
            "pandharpur accommodation guide",
        ],
        pillar_slugs: [
            "shegaon-to-pandharpur-route-guide",
            "pandharpur-and-shegaon-family-yatra-plan",
        ],
    },
    LocationProfile {
        key: "trimbakeshwar",
        city: "Trimbakeshwar",
        image: "/images/trimbakeshwar.jpg",
        location_page: "/locations/trimbakeshwar",
        location_ids: &["trimbakeshwar"],
        keyword_seed: [
            "shri gajanan maharaj sansthan trimbakeshwar",
            "shree gajanan maharaj sansthan trimbakeshwar",
            "sri gajanan maharaj sansthan trimbakeshwar",
            "trimbakeshwar accommodation",
            "trimbakeshwar darshan planning",
        ],
        pillar_slugs: [
            "shegaon-to-trimbakeshwar-route-guide",
            "omkareshwar-to-trimbakeshwar-pilgrimage-checklist",
        ],
    },
];

pub fn location_profile(key: &str) -> Option<&'static LocationProfile> {
    LOCATION_PROFILES.iter().find(|profile| profile.key == key)
}

pub const CROSS_LOCATION_GUIDE_VARIANTS: [&str; 15] = [
    "multi-location-pilgrimage-planning-guide",
    "shegaon-to-omkareshwar-route-guide",
    "shegaon-to-pandharpur-route-guide",
    "shegaon-to-trimbakeshwar-route-guide",
    "omkareshwar-to-trimbakeshwar-pilgrimage-checklist",
    "pandharpur-and-shegaon-family-yatra-plan",
    "jyotirlinga-and-sansthan-combined-itinerary",
    "temple-accommodation-comparison-guide",
    "week-long-devotional-circuit-planner",
    "pilgrimage-budget-planning-for-families",
    "festival-season-multi-city-travel-guide",
    "devotee-document-checklist-for-all-locations",
    "phone-and-whatsapp-booking-best-practices",
    "sansthan-location-selection-guide",
    "month-wise-pilgrimage-planning-calendar",
];

pub const SPIRITUAL_POST_VARIANTS: [&str; 5] = [
    "teachings-of-shri-gajanan-maharaj-for-modern-families",
    "daily-devotional-routine-for-pilgrimage-travelers",
    "importance-of-seva-in-sansthan-tradition",
    "how-devotees-can-prepare-mindfully-for-darshan",
    "spiritual-benefits-of-disciplined-yatra-planning",
];

pub const EVENT_POST_VARIANTS: [&str; 5] = [
    "ram-navami-devotee-planning-guide",
    "rishi-panchami-visit-preparation-guide",
    "major-utsav-crowd-planning-checklist",
    "festival-darshan-timing-awareness-guide",
    "community-seva-event-participation-guide",
];

/// Hand-authored posts every generated post may point at, with link labels.
pub const CORE_RELATED_SLUGS: [(&str, &str); 5] = [
    ("shegaon-travel-guide", "Complete Travel Guide to Shegaon"),
    ("shegaon-accommodation-guide", "Shegaon Accommodation Guide"),
    ("nearby-places-from-shegaon", "Nearby Places from Shegaon"),
    ("omkareshwar-darshan-timings", "Omkareshwar Darshan Timings Guide"),
    ("welcome-to-sansthan", "Welcome to Sansthan"),
];

/// Guide slugs appended to every location post's related list.
pub const TERTIARY_PILLAR_SLUGS: [&str; 2] = [
    "multi-location-pilgrimage-planning-guide",
    "sansthan-location-selection-guide",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_topic_suffixes_unique() {
        let suffixes: HashSet<&str> = LOCATION_TOPIC_VARIANTS.iter().map(|t| t.suffix).collect();
        assert_eq!(suffixes.len(), LOCATION_TOPIC_VARIANTS.len());
    }

    #[test]
    fn test_pillars_are_guides() {
        for profile in &LOCATION_PROFILES {
            for pillar in profile.pillar_slugs {
                assert!(CROSS_LOCATION_GUIDE_VARIANTS.contains(&pillar), "{pillar}");
            }
        }
        for pillar in TERTIARY_PILLAR_SLUGS {
            assert!(CROSS_LOCATION_GUIDE_VARIANTS.contains(&pillar));
        }
    }

    #[test]
    fn test_location_ids_are_known() {
        for profile in &LOCATION_PROFILES {
            for id in profile.location_ids {
                assert!(corpus::site::is_known_location(id), "{id}");
            }
            assert!(profile.location_page.starts_with("/locations/"));
        }
    }
}
