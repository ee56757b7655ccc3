//! The three fixed letter layouts.
//!
//! Each function is pure: the same record, body and date always produce the
//! same bytes. Recipient lines end in two spaces (Markdown hard breaks).

use crate::models::application::ApplicationRecord;
use crate::templates::address::AddressFragments;

const FORMAL_NAME_GAP: usize = 40;
const FORMAL_CONTACT_INDENT: usize = 45;
const FORMAL_RULE_WIDTH: usize = 60;
const MODERN_RULE_WIDTH: usize = 54;

/// Salutation used when the recruiter field has no name in it.
pub const DEFAULT_SALUTATION: &str = "Hiring Manager";

fn recipient_block(record: &ApplicationRecord) -> String {
    format!(
        "{}  \n{}  \n{}  \n",
        record.recruiter, record.company, record.company_address
    )
}

pub fn render_minimal(body: &str, record: &ApplicationRecord, date: &str) -> String {
    format!(
        "\n{name}\n{contact}\n\n{date}\n\n{recipient}\n{body}\n\n\n",
        name = record.applicant_name.to_uppercase(),
        contact = record.contact_line(),
        recipient = recipient_block(record),
    )
}

pub fn render_formal(body: &str, record: &ApplicationRecord, date: &str) -> String {
    let fragments = AddressFragments::parse(&record.address);
    format!(
        "\n{name}{gap}{city}, {state_zip}  \n{indent}{phone} | {email}  \n{rule}\n\n{date}\n\n{recipient}\n{body}\n\n\n",
        name = record.applicant_name.to_uppercase(),
        gap = " ".repeat(FORMAL_NAME_GAP),
        city = fragments.city(),
        state_zip = fragments.state_zip(),
        indent = " ".repeat(FORMAL_CONTACT_INDENT),
        phone = record.phone,
        email = record.email,
        rule = "-".repeat(FORMAL_RULE_WIDTH),
        recipient = recipient_block(record),
    )
}

pub fn render_modern(body: &str, record: &ApplicationRecord, date: &str) -> String {
    format!(
        "\n{name}\n{title}\n\n{contact}\n{rule}\n\n{date}\n\n{recipient}\nDear {salutation},\n\n{body}\n\n\n\n",
        name = record.applicant_name.to_uppercase(),
        title = record.job_title.to_uppercase(),
        contact = record.contact_line(),
        rule = "_".repeat(MODERN_RULE_WIDTH),
        recipient = recipient_block(record),
        salutation = salutation(&record.recruiter),
    )
}

/// First whitespace-delimited token of the recruiter name.
fn salutation(recruiter: &str) -> &str {
    recruiter.split_whitespace().next().unwrap_or(DEFAULT_SALUTATION)
}
