// src/store/defaults.rs
//
// Built-in collection, used only when both tiers come back empty.

use crate::listing::Listing;

struct Seed {
    id: &'static str,
    name: &'static str,
    website: &'static str,
    phone: &'static str,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    label: &'static str,
    facebook: &'static str,
    instagram: &'static str,
    linkedin: &'static str,
    description: &'static str,
    services: &'static [&'static str],
    rating: f64,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "comp-default-1",
        name: "LeafGuard Gutters",
        website: "https://www.leafguard.com",
        phone: "+1-800-290-6106",
        address: "1595 Georgetown Rd",
        city: "Hudson",
        state: "OH",
        label: "Hudson, Ohio, USA",
        facebook: "https://www.facebook.com/LeafGuard",
        instagram: "https://www.instagram.com/leafguard",
        linkedin: "https://www.linkedin.com/company/leafguard",
        description: "LeafGuard Gutters is a nationally recognized gutter installation company known for its patented one-piece seamless gutter system. It serves homeowners through a wide network of authorized dealers, covering gutter replacement, gutter guards, downspout optimization and water management, with warranties on materials and workmanship.",
        services: &["Gutter Replacement", "Gutter Guards", "Downspout Optimization", "Water Management"],
        rating: 4.8,
    },
    Seed {
        id: "comp-default-2",
        name: "Gutter Helmet",
        website: "https://www.gutterhelmet.com",
        phone: "+1-800-824-3773",
        address: "1515 E Main St",
        city: "Tipp City",
        state: "OH",
        label: "Tipp City, Ohio, USA",
        facebook: "https://www.facebook.com/GutterHelmet",
        instagram: "",
        linkedin: "https://www.linkedin.com/company/gutter-helmet",
        description: "Gutter Helmet specializes in engineered gutter guard systems built for heavy rainfall and debris. Its aluminum covers fit over existing gutters to prevent clogging while keeping water flowing, and are installed by professional crews nationwide.",
        services: &["Gutter Guard Systems", "Gutter Protection", "Professional Installation"],
        rating: 4.7,
    },
    Seed {
        id: "comp-default-3",
        name: "The Brothers That Just Do Gutters",
        website: "https://www.brothersgutters.com",
        phone: "+1-844-276-8837",
        address: "1120 Rt 73",
        city: "Mount Laurel",
        state: "NJ",
        label: "Mount Laurel, New Jersey, USA",
        facebook: "https://www.facebook.com/BrothersGut",
        instagram: "https://www.instagram.com/brothersgutters",
        linkedin: "https://www.linkedin.com/company/the-brothers-that-just-do-gutters",
        description: "The Brothers That Just Do Gutters is a franchise focused only on gutters: installation, repair, cleaning and guards. Local teams design each solution around the roof structure and drainage needs of the home.",
        services: &["Gutter Installation", "Gutter Repair", "Gutter Cleaning", "Gutter Guards"],
        rating: 4.9,
    },
    Seed {
        id: "comp-default-4",
        name: "ABC Seamless",
        website: "https://www.abcseamless.com",
        phone: "+1-800-767-8880",
        address: "2510 E Main St",
        city: "Fargo",
        state: "ND",
        label: "Fargo, North Dakota, USA",
        facebook: "https://www.facebook.com/ABCSeamless",
        instagram: "",
        linkedin: "https://www.linkedin.com/company/abc-seamless",
        description: "ABC Seamless builds custom-fit seamless steel siding and gutter systems, manufacturing gutters on site to cut leaks and improve drainage. It works through a dealer network serving residential homeowners in several states.",
        services: &["Seamless Steel Gutters", "Siding", "Downspouts", "Water Drainage"],
        rating: 4.6,
    },
    Seed {
        id: "comp-default-5",
        name: "Englert Inc.",
        website: "https://www.englertinc.com",
        phone: "+1-800-255-4702",
        address: "1200 Amboy Ave",
        city: "Perth Amboy",
        state: "NJ",
        label: "Perth Amboy, New Jersey, USA",
        facebook: "https://www.facebook.com/EnglertInc",
        instagram: "https://www.instagram.com/englertinc",
        linkedin: "https://www.linkedin.com/company/englert",
        description: "Englert Inc. manufactures metal roofing and gutter systems for residential and commercial buildings, including custom-formed seamless gutters, downspouts and rainwater management products distributed nationwide.",
        services: &["Metal Roofing", "Seamless Gutters", "Rainwater Management", "Commercial Gutters"],
        rating: 4.8,
    },
];

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s!(s)) }
}

fn build(seed: &Seed) -> Listing {
    let domain = seed
        .website
        .trim_start_matches("https://")
        .trim_start_matches("www.");
    let mut l = Listing::new(seed.id, seed.name).located(seed.city, seed.state);
    l.website = s!(seed.website);
    l.email = format!("info@{domain}");
    l.phone = s!(seed.phone);
    l.address = s!(seed.address);
    l.location_label = non_empty(seed.label);
    l.facebook_url = non_empty(seed.facebook);
    l.instagram_url = non_empty(seed.instagram);
    l.linkedin_url = non_empty(seed.linkedin);
    l.description = non_empty(seed.description);
    l.services = seed.services.iter().map(|s| s.to_string()).collect();
    l.rating = Some(seed.rating);
    l
}

/// The built-in collection.
pub fn builtin_listings() -> Vec<Listing> {
    SEEDS.iter().map(build).collect()
}
