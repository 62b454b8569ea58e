//! Curated table of well-known websites and the names people say for them.
//!
//! Entries are matched in table order, so more specific entries (Google Maps)
//! sit before broader ones (Google).

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One canonical site and its spoken aliases.
#[derive(Debug, Clone, Copy)]
pub struct SiteAlias {
    pub url: &'static str,
    pub aliases: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// Static table
// ---------------------------------------------------------------------------

pub static SITE_ALIASES: &[SiteAlias] = &[
    SiteAlias {
        url: "https://www.youtube.com/",
        aliases: &["youtube", "you tube", "yt"],
    },
    SiteAlias {
        url: "https://www.google.com/maps",
        aliases: &["google maps", "maps"],
    },
    SiteAlias {
        url: "https://mail.google.com/",
        aliases: &["gmail", "google mail"],
    },
    SiteAlias {
        url: "https://drive.google.com/",
        aliases: &["google drive"],
    },
    SiteAlias {
        url: "https://www.google.com/",
        aliases: &["google", "google search"],
    },
    SiteAlias {
        url: "https://www.wikipedia.org/",
        aliases: &["wikipedia", "wiki"],
    },
    SiteAlias {
        url: "https://www.facebook.com/",
        aliases: &["facebook", "fb"],
    },
    SiteAlias {
        url: "https://www.instagram.com/",
        aliases: &["instagram", "insta"],
    },
    SiteAlias {
        url: "https://www.linkedin.com/",
        aliases: &["linkedin", "linked in"],
    },
    SiteAlias {
        url: "https://www.reddit.com/",
        aliases: &["reddit"],
    },
    SiteAlias {
        url: "https://www.amazon.com/",
        aliases: &["amazon"],
    },
    SiteAlias {
        url: "https://www.ebay.com/",
        aliases: &["ebay", "e bay"],
    },
    SiteAlias {
        url: "https://www.netflix.com/",
        aliases: &["netflix"],
    },
    SiteAlias {
        url: "https://open.spotify.com/",
        aliases: &["spotify"],
    },
    SiteAlias {
        url: "https://github.com/",
        aliases: &["github", "git hub"],
    },
    SiteAlias {
        url: "https://stackoverflow.com/",
        aliases: &["stack overflow", "stackoverflow"],
    },
    SiteAlias {
        url: "https://www.bbc.com/news",
        aliases: &["bbc", "bbc news"],
    },
    SiteAlias {
        url: "https://www.cnn.com/",
        aliases: &["cnn"],
    },
    SiteAlias {
        url: "https://www.nytimes.com/",
        aliases: &["new york times", "nytimes"],
    },
    SiteAlias {
        url: "https://www.theguardian.com/",
        aliases: &["the guardian", "guardian"],
    },
    SiteAlias {
        url: "https://weather.com/",
        aliases: &["weather channel", "weather"],
    },
    SiteAlias {
        url: "https://outlook.live.com/",
        aliases: &["outlook", "hotmail"],
    },
    SiteAlias {
        url: "https://www.yahoo.com/",
        aliases: &["yahoo"],
    },
    SiteAlias {
        url: "https://www.bing.com/",
        aliases: &["bing"],
    },
    SiteAlias {
        url: "https://duckduckgo.com/",
        aliases: &["duckduckgo", "duck duck go"],
    },
    SiteAlias {
        url: "https://www.twitch.tv/",
        aliases: &["twitch"],
    },
    SiteAlias {
        url: "https://www.tiktok.com/",
        aliases: &["tiktok", "tik tok"],
    },
    SiteAlias {
        url: "https://www.pinterest.com/",
        aliases: &["pinterest"],
    },
    SiteAlias {
        url: "https://web.whatsapp.com/",
        aliases: &["whatsapp", "whats app"],
    },
    SiteAlias {
        url: "https://chatgpt.com/",
        aliases: &["chatgpt", "chat gpt"],
    },
    // Last: the single-letter alias matches inside many unrelated words.
    SiteAlias {
        url: "https://x.com/",
        aliases: &["twitter", "x"],
    },
];

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Comparison key: lowercase ASCII letters and digits only.
///
/// ```
/// use page_narrator::site::comparison_key;
///
/// assert_eq!(comparison_key("You Tube!"), "youtube");
/// assert_eq!(comparison_key("  "), "");
/// ```
pub fn comparison_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Canonical URL for `query`: an exact alias match anywhere in the table,
/// else the first entry with an alias contained in the query.
pub fn lookup_alias(query: &str) -> Option<&'static str> {
    let key = comparison_key(query);
    if key.is_empty() {
        return None;
    }

    let exact = SITE_ALIASES
        .iter()
        .find(|entry| entry.aliases.iter().any(|a| comparison_key(a) == key));
    if let Some(entry) = exact {
        return Some(entry.url);
    }

    SITE_ALIASES
        .iter()
        .find(|entry| {
            entry.aliases.iter().any(|a| {
                let alias = comparison_key(a);
                !alias.is_empty() && key.contains(&alias)
            })
        })
        .map(|entry| entry.url)
}
