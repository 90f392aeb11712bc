fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(heading: &str, body: &str, link: &str, link_text: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>{heading}</h2>
    {body}
    <p><a href="{link}" style="display: inline-block; padding: 10px 20px; background: #1f4e79; color: white; text-decoration: none; border-radius: 4px;">{link_text}</a></p>
    <p style="color: #666; font-size: 14px;">This is an automated message from StatSubmit.</p>
</body>
</html>"#
    )
}

pub fn render_account_created(name: &str, role_label: &str, base_url: &str) -> String {
    let name = escape(name);
    layout(
        "Welcome to StatSubmit",
        &format!(
            "<p>Hi {name},</p>\n    <p>An account has been created for you with the role <strong>{role_label}</strong>.</p>"
        ),
        base_url,
        "Log In",
    )
}

pub fn render_awaiting_action(
    name: &str,
    reference_code: &str,
    status_label: &str,
    submission_url: &str,
) -> String {
    let name = escape(name);
    let reference_code = escape(reference_code);
    layout(
        &format!("{reference_code} needs your review"),
        &format!(
            "<p>Hi {name},</p>\n    <p>Submission <strong>{reference_code}</strong> is now <strong>{status_label}</strong> and is waiting on you.</p>"
        ),
        submission_url,
        "Open Submission",
    )
}
