//! HTML email bodies.
//!
//! Two templates: one asking the employee to return the listed equipment,
//! and one telling them nothing was found. Names are escaped before use.

use offboard_io::html::escape_html;

/// Body for an employee with at least one asset. `table_html` is the
/// pre-rendered preview table.
pub fn equipment_return_body(given_name: &str, surname: &str, table_html: &str) -> String {
    let given = escape_html(given_name);
    let sur = escape_html(surname);
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family:Segoe UI, Arial, sans-serif; font-size:18px; color:#333; line-height:1.5;">
    <p>Dear {given} {sur},</p>
    <p>
      For your <strong>Offboarding</strong>, please make sure to
      <u><strong>return all your IT Equipment as listed below.</strong></u>
    </p>
    <p>
      <span style="background-color: yellow;"><strong><u>Important:</u></strong></span>
    </p>
    <hr style="border:none; border-top:1px solid #ddd; margin:20px 0;">
    <p style="margin:0 0 8px 0;"><strong>Hardware assigned to your account (inline preview):</strong></p>
    {table_html}
    <p style="font-size:12px; color:#666; margin-top:10px;">
      This inline table is for a quick preview. The full details are also attached as an Excel file.
    </p>
    <p>Best regards,<br/>IT Team</p>
  </body>
</html>
"#
    )
}

/// Body for an employee with no assets on record.
pub fn nothing_found_body(given_name: &str, surname: &str) -> String {
    let given = escape_html(given_name);
    let sur = escape_html(surname);
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family:Segoe UI, Arial, sans-serif; font-size:14px; color:#333; line-height:1.5;">
    <p>Hi {given} {sur},</p>
    <p>We could not find any hardware currently assigned to your account.</p>
    <p>If this is unexpected, please contact IT Support.</p>
    <p>Best regards,<br/>IT Support</p>
  </body>
</html>
"#
    )
}

/// Pick the template by row count.
pub fn render_body(given_name: &str, surname: &str, row_count: usize, table_html: &str) -> String {
    if row_count > 0 {
        equipment_return_body(given_name, surname, table_html)
    } else {
        nothing_found_body(given_name, surname)
    }
}
