//! Rendering of the confirmation mail

use cb_core::services::notification::ConfirmationEmail;

pub(crate) const CONFIRMATION_SUBJECT: &str = "Confirm your email";

pub(crate) fn confirmation_html(mail: &ConfirmationEmail) -> String {
    let link = mail.confirmation_link();
    format!(
        "<p>Hello {username},</p>\
         <p>Thanks for signing up. Please confirm your email address by following the link below.</p>\
         <p><a href=\"{link}\">{link}</a></p>\
         <p>If you did not create an account, you can ignore this message.</p>",
        username = escape_html(&mail.username),
        link = link,
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
