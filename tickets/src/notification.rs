//! Ticket creation email.

use crate::model::Ticket;
use studentdesk_auth::providers::EmailMessage;
use studentdesk_auth::providers::email::escape_html;

/// Confirmation sent to the ticket's contact address.
#[must_use]
pub fn ticket_created(ticket: &Ticket, student_name: &str) -> EmailMessage {
    let subject = format!("Ticket {} created: {}", ticket.subject, ticket.title);

    let text = format!(
        "Hello {student_name},\n\n\
         Your support ticket has been created.\n\n\
         Ticket: {}\n\
         Title: {}\n\
         Description: {}\n\n\
         We will get back to you on this address.",
        ticket.subject, ticket.title, ticket.description
    );

    let html = format!(
        r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Ticket {subject_id} created</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">Ticket {subject_id} created</h2>
        <p>Hello {student_name},</p>
        <p>Your support ticket has been created.</p>
        <table style="margin: 20px 0;">
            <tr><td style="color: #666; padding-right: 16px;">Title</td><td>{title}</td></tr>
            <tr><td style="color: #666; padding-right: 16px;">Description</td><td>{description}</td></tr>
        </table>
        <p style="color: #666; font-size: 14px;">We will get back to you on this address.</p>
    </div>
</body>
</html>
            "#,
        subject_id = ticket.subject,
        student_name = escape_html(student_name),
        title = escape_html(&ticket.title),
        description = escape_html(&ticket.description),
    );

    EmailMessage::new(ticket.allowed_email.clone(), subject, text, html)
}
