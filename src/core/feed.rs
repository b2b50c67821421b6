use chrono::{DateTime, Utc};

/// Render a human-readable message for one activity entry.
///
/// `actor_name` is whatever name the entry recorded for the acting user;
/// callers pass "Someone" when no name is available.
pub fn format_activity_message(action: &str, actor_name: &str) -> String {
    match action {
        "interest_submitted" => format!("{} expressed interest in your offering", actor_name),
        "interest_accepted" => "Your interest was accepted by the founder".to_string(),
        "interest_declined" => "Your interest was declined".to_string(),
        "offering_created" => format!("{} created a new offering", actor_name),
        "offering_live" => "Your offering is now live".to_string(),
        "offering_funded" => "Congratulations! Your offering reached its target".to_string(),
        "profile_updated" => format!("{} updated their profile", actor_name),
        "document_uploaded" => format!("{} uploaded a document", actor_name),
        "offering_saved" => format!("{} saved an offering to watchlist", actor_name),
        _ => format!("{} performed an action", actor_name),
    }
}

/// Relative-time label for feed entries ("just now", "3h ago", "2w ago")
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);

    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{}d ago", days);
    }
    let weeks = days / 7;
    if weeks < 4 {
        return format!("{}w ago", weeks);
    }
    let months = days / 30;
    if months < 12 {
        return format!("{}mo ago", months);
    }
    format!("{}y ago", days / 365)
}
