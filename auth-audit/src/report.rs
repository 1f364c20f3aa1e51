//! Human-readable audit report.

use std::fmt::{self, Write};

use auth_audit_common::UserRecord;

const RULE: &str = "--------------------------------------------------";
const RECORD_RULE: &str = "------------------------------";

/// Whether a watched email belongs to any fetched user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchStatus {
    pub email: String,
    pub found: bool,
}

/// Check each watched email against the records, keeping the watch order.
pub fn check_watch_list(records: &[UserRecord], watch_emails: &[String]) -> Vec<WatchStatus> {
    watch_emails
        .iter()
        .map(|email| WatchStatus {
            email: email.clone(),
            found: records.iter().any(|r| r.has_email(email)),
        })
        .collect()
}

/// Render the report for a fetched user list.
pub fn render_report(records: &[UserRecord], watch_emails: &[String]) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    let _ = write_report(&mut out, records, watch_emails);
    out
}

/// Write the report into any formatter sink.
pub fn write_report<W: Write>(
    out: &mut W,
    records: &[UserRecord],
    watch_emails: &[String],
) -> fmt::Result {
    writeln!(out, "📊 Found {} users in auth.users:", records.len())?;
    writeln!(out, "{}", RULE)?;

    for record in records {
        write_record(out, record)?;
    }

    if records.is_empty() {
        writeln!(out, "❌ No users found in auth.users")?;
        writeln!(
            out,
            "An empty user list is a likely cause of authentication failures."
        )?;
    }

    for status in check_watch_list(records, watch_emails) {
        let verdict = if status.found { "✅ EXISTS" } else { "❌ NOT FOUND" };
        writeln!(out, "🔍 {}: {}", status.email, verdict)?;
    }

    Ok(())
}

fn write_record<W: Write>(out: &mut W, record: &UserRecord) -> fmt::Result {
    let email = record.email.as_deref().unwrap_or("No email");
    let id = if record.id.is_empty() { "No ID" } else { &record.id };
    let created = if record.created_at.is_empty() {
        "Unknown"
    } else {
        &record.created_at
    };
    let confirmed = if record.is_confirmed() { "✓" } else { "❌" };

    writeln!(out, "Email: {}", email)?;
    writeln!(out, "ID: {}", id)?;
    writeln!(out, "Created: {}", created)?;
    writeln!(out, "Email Confirmed: {}", confirmed)?;
    if let Some(ref last) = record.last_sign_in_at {
        writeln!(out, "Last Sign In: {}", last)?;
    }
    writeln!(out, "{}", RECORD_RULE)
}
