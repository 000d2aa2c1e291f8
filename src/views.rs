//! Server-rendered HTML pages for the web interface.
//!
//! Every value that originated from a user goes through [`escape`] before it is
//! written into markup.

use std::fmt::Write;

use crate::db::models::Bank;
use crate::middleware::flash::Flash;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 48rem; color: #222; }
nav a { margin-right: 1rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: .5rem; text-align: left; }
form.inline { display: inline; }
label { display: block; margin-top: .75rem; }
input[type=text] { width: 100%; padding: .4rem; }
.actions { margin-top: 1rem; }
.notice { padding: .75rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.notice-success { background: #e6f4ea; color: #1e4620; }
.notice-warning { background: #fff4e5; color: #663c00; }
.notice-danger { background: #fdecea; color: #611a15; }
"#;

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
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

fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let notice = flash
        .map(|f| {
            format!(
                r#"<div class="notice notice-{}" role="alert">{}</div>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Bank Management</title>
<style>{STYLE}</style>
</head>
<body>
<nav><a href="/">All Banks</a><a href="/bank/new">Add New Bank</a></nav>
<h1>{title}</h1>
{notice}
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn index(banks: &[Bank], flash: Option<&Flash>) -> String {
    let body = if banks.is_empty() {
        r#"<p>No banks yet. <a href="/bank/new">Add the first one</a>.</p>"#.to_string()
    } else {
        let mut rows = String::new();
        for bank in banks {
            let _ = write!(
                rows,
                r#"<tr>
<td>{id}</td>
<td><a href="/bank/{id}">{name}</a></td>
<td>{location}</td>
<td>
<a href="/bank/{id}/edit">Edit</a>
<form class="inline" method="post" action="/bank/{id}/delete"><button type="submit">Delete</button></form>
</td>
</tr>
"#,
                id = bank.id,
                name = escape(&bank.name),
                location = escape(&bank.location),
            );
        }
        format!(
            r#"<table>
<thead><tr><th>ID</th><th>Name</th><th>Location</th><th></th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<p>{count} bank(s)</p>"#,
            count = banks.len(),
        )
    };
    layout("All Banks", flash, &body)
}

pub fn bank_detail(bank: &Bank, flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<dl>
<dt>ID</dt><dd>{id}</dd>
<dt>Name</dt><dd>{name}</dd>
<dt>Location</dt><dd>{location}</dd>
</dl>
<div class="actions">
<a href="/bank/{id}/edit">Edit</a>
<form class="inline" method="post" action="/bank/{id}/delete"><button type="submit">Delete</button></form>
<a href="/">Back to list</a>
</div>"#,
        id = bank.id,
        name = escape(&bank.name),
        location = escape(&bank.location),
    );
    layout(&bank.name, flash, &body)
}

fn bank_form(action: &str, name: &str, location: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label for="name">Name</label>
<input type="text" id="name" name="name" value="{name}" required>
<label for="location">Location</label>
<input type="text" id="location" name="location" value="{location}" required>
<div class="actions">
<button type="submit">{submit}</button>
<a href="/">Cancel</a>
</div>
</form>"#,
        action = escape(action),
        name = escape(name),
        location = escape(location),
    )
}

/// Empty form, or the last submission when it is re-rendered after a failure.
pub fn create_form(name: &str, location: &str, flash: Option<&Flash>) -> String {
    layout(
        "Add New Bank",
        flash,
        &bank_form("/bank/new", name, location, "Create Bank"),
    )
}

pub fn edit_form(bank: &Bank, flash: Option<&Flash>) -> String {
    layout(
        "Edit Bank",
        flash,
        &bank_form(
            &format!("/bank/{}/edit", bank.id),
            &bank.name,
            &bank.location,
            "Update Bank",
        ),
    )
}

pub fn not_found() -> String {
    layout(
        "Not Found",
        None,
        r#"<p>No such page. <a href="/">Back to all banks</a>.</p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(id: i64, name: &str, location: &str) -> Bank {
        Bank {
            id,
            name: name.to_string(),
            location: location.to_string(),
        }
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
    }

    #[test]
    fn index_lists_banks_and_escapes_names() {
        let html = index(
            &[bank(3, "<b>Evil</b>", "Here"), bank(1, "Plain", "There")],
            None,
        );
        assert!(html.contains("All Banks"));
        assert!(html.contains("&lt;b&gt;Evil&lt;/b&gt;"));
        assert!(!html.contains("<b>Evil</b>"));
        assert!(html.contains(r#"action="/bank/3/delete""#));
        assert!(html.contains("2 bank(s)"));
    }

    #[test]
    fn empty_index_invites_first_entry() {
        let html = index(&[], None);
        assert!(html.contains("No banks yet"));
    }

    #[test]
    fn flash_is_rendered_with_level_class() {
        let html = index(&[], Some(&Flash::warning("Bank not found")));
        assert!(html.contains(r#"class="notice notice-warning""#));
        assert!(html.contains("Bank not found"));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let html = edit_form(&bank(9, "Citi", "New York, NY"), None);
        assert!(html.contains("Edit Bank"));
        assert!(html.contains(r#"action="/bank/9/edit""#));
        assert!(html.contains(r#"value="Citi""#));
        assert!(html.contains(r#"value="New York, NY""#));
    }

    #[test]
    fn create_form_keeps_submitted_values() {
        let html = create_form("Half \"filled\"", "", None);
        assert!(html.contains("Add New Bank"));
        assert!(html.contains(r#"value="Half &quot;filled&quot;""#));
    }
}
