//! HTML fragments for the views of [`crate::detail`].
//!
//! The output only depends on its input, so rendering the same view twice
//! yields the same bytes.

use std::fmt::Write as _;

use crate::detail::*;

/// Escapes text for HTML.
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

fn registration_html(buf: &mut String, r: &RegistrationBlock) {
    buf.push_str("<div class=\"registration-info\"><h3>Voter Registration</h3>");
    if let Some(d) = &r.deadline {
        let _ = write!(
            buf,
            "<p><strong>Registration Deadline:</strong> {}</p>",
            esc(d)
        );
    }
    if let Some(w) = &r.website {
        let _ = write!(
            buf,
            "<p><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Register to Vote</a></p>",
            esc(w)
        );
    }
    buf.push_str("</div>");
}

fn election_html(buf: &mut String, e: &ElectionEntry) {
    let _ = write!(
        buf,
        "<div class=\"election-item{}\"><div class=\"election-title\">{}</div>\
         <div class=\"election-date\">{} &bull; {}</div>\
         <span class=\"badge {}\">{} {}</span>",
        if e.concluded { " concluded" } else { "" },
        esc(&e.title),
        esc(&e.date),
        esc(&e.kind),
        e.badge.css_class,
        e.badge.icon,
        esc(&e.badge.label)
    );
    if e.competitive {
        buf.push_str("<span class=\"badge competitive\">Competitive Race</span>");
    }
    if let Some(s) = &e.stakes {
        let _ = write!(buf, "<div class=\"election-stakes\">{}</div>", esc(s));
    }
    if !e.candidates.is_empty() {
        buf.push_str("<div class=\"candidates\">");
        let parts: Vec<String> = e
            .candidates
            .iter()
            .map(|c| {
                format!(
                    "<span class=\"candidate {}\">{} ({}){}</span>",
                    c.party_class,
                    esc(&c.name),
                    esc(&c.party),
                    if c.incumbent { ", Incumbent" } else { "" }
                )
            })
            .collect();
        buf.push_str(&parts.join(" vs. "));
        buf.push_str("</div>");
    }
    buf.push_str("</div>");
}

/// The overlay body for one region.
pub fn detail_html(view: &DetailView) -> String {
    let mut buf = String::with_capacity(1024);
    let _ = write!(buf, "<h2 class=\"modal-title\">{}</h2>", esc(&view.title));
    for section in view.sections.iter() {
        match section {
            DetailSection::Concluded { state_name } => {
                let _ = write!(
                    buf,
                    "<div class=\"elections-over\"><strong>Elections Are Over</strong>\
                     <p>The election cycle in {} has concluded.</p></div>",
                    esc(state_name)
                );
            }
            DetailSection::Registration(r) => registration_html(&mut buf, r),
            DetailSection::ElectionCount { count } => {
                let _ = write!(
                    buf,
                    "<h3>{}</h3>",
                    plural(*count, "Upcoming Election", "Upcoming Elections")
                );
            }
            DetailSection::Election(e) => election_html(&mut buf, e),
            DetailSection::NoElections => {
                let _ = write!(buf, "<p class=\"no-elections\">{}</p>", NO_ELECTIONS_MESSAGE);
            }
            DetailSection::NoData => {
                let _ = write!(buf, "<p class=\"no-data\">{}</p>", NO_DATA_MESSAGE);
            }
        }
    }
    buf
}

/// The list shown after activating a summary widget.
pub fn filtered_html(view: &FilteredView) -> String {
    let mut buf = String::with_capacity(1024);
    let _ = write!(buf, "<h2 class=\"modal-title\">{}</h2>", esc(view.label));
    let summary = match view.summary() {
        Some(s) => s,
        None => {
            let _ = write!(buf, "<p class=\"no-elections\">{}</p>", NO_FILTER_MATCH_MESSAGE);
            return buf;
        }
    };
    let _ = write!(buf, "<p class=\"filter-summary\">{}</p>", esc(&summary));
    for region in view.regions.iter() {
        let _ = write!(
            buf,
            "<div class=\"filtered-state\" data-state=\"{}\"><h3>{} ({})</h3>\
             <p class=\"election-count\">{}</p><ul>",
            esc(&region.code),
            esc(&region.name),
            esc(&region.code),
            plural(region.elections.len(), "election", "elections")
        );
        for e in region.elections.iter() {
            let _ = write!(
                buf,
                "<li>{} &mdash; {}</li>",
                esc(&e.title),
                esc(&e.date)
            );
        }
        buf.push_str("</ul>");
        if let Some(w) = &region.registration_website {
            let _ = write!(
                buf,
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Register in {}</a>",
                esc(w),
                esc(&region.name)
            );
        }
        buf.push_str("</div>");
    }
    buf
}

/// The hover tooltip.
pub fn tooltip_html(view: &TooltipView) -> String {
    let mut buf = String::with_capacity(256);
    let _ = write!(buf, "<strong>{}</strong>", esc(&view.name));
    if view.election_count == 0 {
        buf.push_str("<br>No elections listed");
        return buf;
    }
    let _ = write!(
        buf,
        "<br>{}<br><small>{}</small>",
        plural(view.election_count, "election", "elections"),
        esc(&view.categories.join(", "))
    );
    buf.push_str("<ul class=\"tooltip-list\">");
    for line in view.lines.iter() {
        let _ = write!(buf, "<li>{}", esc(&line.title));
        if line.incumbent_running {
            buf.push_str(" <em>(Incumbent Running)</em>");
        }
        if line.competitive {
            buf.push_str(" <span class=\"competitive\">Competitive</span>");
        }
        buf.push_str("</li>");
    }
    buf.push_str("</ul>");
    buf
}
