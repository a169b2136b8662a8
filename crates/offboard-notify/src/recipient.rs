//! To-address convention: `given.surname@domain`, lowercased, no whitespace.
//!
//! This is a naming rule, not a directory lookup; the address may not exist.

pub fn build_recipient_email(given_name: &str, surname: &str, domain: &str) -> String {
    let local: String = format!("{given_name}.{surname}")
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{local}@{}", domain.trim())
}
