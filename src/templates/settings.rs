// src/templates/settings.rs
use super::{html_escape, render_page};
use crate::storage::settings::Settings;

pub fn render(settings: &Settings, notice: Option<&str>, error: Option<&str>) -> String {
    let notice_html = notice
        .map(|n| format!(r#"<p class="notice">{}</p>"#, html_escape(n)))
        .unwrap_or_default();
    let error_html = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, html_escape(e)))
        .unwrap_or_default();

    let content = format!(
        r#"
    <h1>Settings &amp; Config</h1>
    {}{}
    <form method="POST" action="/settings">
        <section class="section">
            <h2>RPC Configuration</h2>
            <label>Primary RPC Endpoint
                <input type="url" name="primary_rpc" value="{}" required>
            </label>
            <label>Backup RPC Endpoint
                <input type="url" name="backup_rpc" value="{}" placeholder="Optional backup endpoint">
            </label>
        </section>
        <section class="section">
            <h2>Preferences</h2>
            <label><input type="checkbox" name="show_animations"{}> Show animations</label>
            <label><input type="checkbox" name="enable_notifications"{}> Enable notifications</label>
            <label><input type="checkbox" name="dev_mode"{}> Developer mode</label>
        </section>
        <button type="submit">Save Changes</button>
    </form>
    "#,
        notice_html,
        error_html,
        html_escape(&settings.primary_rpc),
        html_escape(&settings.backup_rpc),
        checked(settings.show_animations),
        checked(settings.enable_notifications),
        checked(settings.dev_mode)
    );

    render_page("Settings", "/settings", &content)
}

fn checked(value: bool) -> &'static str {
    if value {
        " checked"
    } else {
        ""
    }
}
