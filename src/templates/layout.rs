// src/templates/layout.rs

const NAV_ITEMS: [(&str, &str); 4] = [
    ("/dashboard", "Dashboard"),
    ("/network-map", "Network Map"),
    ("/search", "Search"),
    ("/settings", "Settings"),
];

pub fn render_page(title: &str, active: &str, content: &str) -> String {
    let nav = NAV_ITEMS
        .iter()
        .map(|(href, text)| nav_link(href, text, *href == active))
        .collect::<Vec<_>>()
        .join("\n                    ");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{} - Xandeum pNode Analytics</title>
    <style>
        body {{ background: #0B0E14; color: #fff; font-family: system-ui, sans-serif; margin: 0; }}
        a {{ color: #00E4FF; }}
        .container {{ max-width: 1200px; margin: 0 auto; padding: 0 1.5rem; }}
        .header {{ border-bottom: 1px solid rgba(255,255,255,0.08); padding: 1rem 0; }}
        .header-content {{ display: flex; justify-content: space-between; align-items: center; }}
        .nav-link {{ margin-left: 1rem; color: rgba(255,255,255,0.6); text-decoration: none; }}
        .nav-link.active {{ color: #00E4FF; }}
        .stats-grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; }}
        .stat-card {{ background: rgba(255,255,255,0.05); border-radius: 1rem; padding: 1rem; }}
        .stat-label {{ color: rgba(255,255,255,0.4); font-size: 0.85rem; }}
        .stat-value {{ font-size: 1.5rem; font-weight: bold; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ text-align: left; padding: 0.6rem 1rem; border-bottom: 1px solid rgba(255,255,255,0.05); }}
        .status {{ text-transform: capitalize; }}
        .status-online, .status-healthy {{ color: #0BDA51; }}
        .status-warning, .status-syncing {{ color: #FFB02E; }}
        .status-offline, .status-critical {{ color: #D0021B; }}
        .pagination a, .pagination span {{ margin-right: 0.5rem; }}
        .error {{ color: #D0021B; }}
        .notice {{ color: #0BDA51; }}
    </style>
</head>
<body>
    <header class="header">
        <div class="container">
            <div class="header-content">
                <div class="logo"><a href="/dashboard">Xandeum pNode Analytics</a></div>
                <nav class="nav">
                    {}
                </nav>
            </div>
        </div>
    </header>

    <main class="main">
        <div class="container">
            {}
        </div>
    </main>

    <footer class="footer">
        <div class="container">
            <p>Xandeum pNode Analytics</p>
        </div>
    </footer>
</body>
</html>"#,
        title, nav, content
    )
}

pub fn nav_link(href: &str, text: &str, active: bool) -> String {
    let class = if active { "nav-link active" } else { "nav-link" };
    format!(r#"<a href="{}" class="{}">{}</a>"#, href, class, text)
}
