use crate::models::{CategoryFilter, GameRecord, StatsSummary};
use crate::notify::Notice;
use std::fmt::Write;

/// Data every page shows in its header.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub total_games: usize,
    pub total_downloads: u64,
    pub is_admin: bool,
    pub notices: Vec<Notice>,
}

pub const RESTRICTED_MESSAGE: &str = "Restricted area. Log in as admin to continue.";

pub fn render_index(ctx: &PageContext, games: &[&GameRecord], selected: CategoryFilter) -> String {
    let mut body = String::new();
    body.push_str("<section class=\"hero\"><h1>PC Games</h1><p>Discover and download the best PC games.</p></section>");

    body.push_str("<nav class=\"filters\">");
    for option in CategoryFilter::options() {
        let class = if option == selected { "chip active" } else { "chip" };
        let _ = write!(
            body,
            "<a class=\"{class}\" href=\"/?category={}\">{}</a>",
            urlencoding::encode(option.label()),
            escape(option.label())
        );
    }
    let _ = write!(body, "<span class=\"count\">{} games</span></nav>", games.len());

    if games.is_empty() {
        let message = if ctx.total_games == 0 {
            "No games registered yet. Add some from the admin panel."
        } else {
            "No games found in this category. Try another one."
        };
        let _ = write!(body, "<p class=\"empty\">{message}</p>");
    } else {
        body.push_str("<div class=\"grid\">");
        for game in games {
            body.push_str(&game_card(game));
        }
        body.push_str("</div>");
    }

    layout("GameHub", ctx, &body)
}

pub fn render_details(ctx: &PageContext, game: &GameRecord) -> String {
    let body = format!(
        "<a class=\"back\" href=\"/\">&larr; Back</a>\
         <article class=\"details\">\
           <img src=\"{image}\" alt=\"{title}\" />\
           <div>\
             <h1>{title}</h1>\
             <p><span class=\"badge\">{category}</span> {clicks} downloads &middot; added {date}</p>\
             <p>{description}</p>\
             {download}\
           </div>\
         </article>",
        image = escape(&game.image),
        title = escape(&game.title),
        category = escape(game.category.label()),
        clicks = game.clicks,
        date = game.date_added.format("%Y-%m-%d"),
        description = escape(&game.description),
        download = download_form(game),
    );
    layout(&game.title, ctx, &body)
}

pub fn render_admin(ctx: &PageContext, games: &[GameRecord]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Admin panel</h1><section class=\"card\"><h2>Add new game</h2>");
    body.push_str(&game_form("/admin/games", None, "Add game"));
    body.push_str("</section>");

    let _ = write!(body, "<section class=\"card\"><h2>Manage games ({})</h2>", games.len());
    for game in games {
        let action = format!("/admin/games/{}", urlencoding::encode(&game.id));
        let _ = write!(
            body,
            "<details class=\"row\"><summary>{title} <span class=\"badge\">{category}</span> {clicks} downloads</summary>\
             {form}\
             <form method=\"post\" action=\"{action}/delete\"><button class=\"danger\" type=\"submit\">Delete</button></form>\
             </details>",
            title = escape(&game.title),
            category = escape(game.category.label()),
            clicks = game.clicks,
            form = game_form(&action, Some(game), "Save changes"),
        );
    }
    body.push_str("</section>");
    body.push_str("<form method=\"post\" action=\"/refresh\"><button type=\"submit\">Reload catalog</button></form>");

    layout("Admin", ctx, &body)
}

pub fn render_stats(
    ctx: &PageContext,
    stats: &StatsSummary,
    top: &[&GameRecord],
    recent: &[&GameRecord],
) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>Statistics</h1><section class=\"tiles\">\
         <div class=\"tile\"><span>Total games</span><strong>{}</strong></div>\
         <div class=\"tile\"><span>Total downloads</span><strong>{}</strong></div>\
         <div class=\"tile\"><span>Most downloaded</span><strong>{}</strong><small>{} downloads</small></div>\
         </section>",
        stats.total_games,
        stats.total_downloads,
        escape(&stats.top_game.title),
        stats.top_game.clicks
    );

    body.push_str("<section class=\"card\"><h2>Most downloaded</h2><ol>");
    for game in top {
        let _ = write!(
            body,
            "<li>{} <span class=\"badge\">{}</span> {} downloads</li>",
            escape(&game.title),
            escape(game.category.label()),
            game.clicks
        );
    }
    body.push_str("</ol></section>");

    body.push_str("<section class=\"card\"><h2>Recent activity</h2><ul>");
    if stats.recent_activity.is_empty() {
        body.push_str("<li class=\"empty\">No downloads yet.</li>");
    }
    for entry in &stats.recent_activity {
        let _ = write!(
            body,
            "<li>{} +{} <small>{}</small></li>",
            escape(&entry.game_title),
            entry.clicks_delta,
            entry.timestamp.format("%Y-%m-%d %H:%M")
        );
    }
    body.push_str("</ul></section>");

    body.push_str("<section class=\"card\"><h2>Recently added</h2><ul>");
    for game in recent {
        let _ = write!(
            body,
            "<li>{} <small>{}</small></li>",
            escape(&game.title),
            game.date_added.format("%Y-%m-%d")
        );
    }
    body.push_str("</ul></section>");

    layout("Statistics", ctx, &body)
}

pub fn render_restricted(ctx: &PageContext) -> String {
    let body = format!(
        "<section class=\"card restricted\"><h1>Restricted</h1><p>{RESTRICTED_MESSAGE}</p>\
         <a class=\"button\" href=\"/login\">Log in</a></section>"
    );
    layout("Restricted", ctx, &body)
}

pub fn render_login(ctx: &PageContext, error: Option<&str>) -> String {
    let alert = error
        .map(|message| format!("<p class=\"notice notice-error\" role=\"alert\">{}</p>", escape(message)))
        .unwrap_or_default();
    let body = format!(
        "<section class=\"card\"><h1>Admin login</h1>{alert}\
         <form method=\"post\" action=\"/login\">\
           <label for=\"secret\">Passphrase</label>\
           <input id=\"secret\" name=\"secret\" type=\"password\" required />\
           <button type=\"submit\">Log in</button>\
         </form></section>"
    );
    layout("Login", ctx, &body)
}

fn game_card(game: &GameRecord) -> String {
    format!(
        "<article class=\"game\">\
           <img src=\"{image}\" alt=\"{title}\" />\
           <h3><a href=\"/games/{id}\">{title}</a></h3>\
           <p><span class=\"badge\">{category}</span> {clicks} downloads</p>\
           {download}\
         </article>",
        image = escape(&game.image),
        title = escape(&game.title),
        id = urlencoding::encode(&game.id),
        category = escape(game.category.label()),
        clicks = game.clicks,
        download = download_form(game),
    )
}

fn download_form(game: &GameRecord) -> String {
    format!(
        "<form method=\"post\" action=\"/games/{}/download\" target=\"_blank\">\
         <button type=\"submit\">Download</button></form>",
        urlencoding::encode(&game.id)
    )
}

fn game_form(action: &str, game: Option<&GameRecord>, submit: &str) -> String {
    let value = |pick: fn(&GameRecord) -> &str| game.map(pick).map(escape).unwrap_or_default();
    let required = if game.is_some() { "" } else { " required" };

    let mut options = String::new();
    if game.is_none() {
        options.push_str("<option value=\"\">Select a category</option>");
    }
    for category in crate::models::Category::ALL {
        let selected = if game.map(|g| g.category) == Some(category) { " selected" } else { "" };
        let _ = write!(
            options,
            "<option value=\"{label}\"{selected}>{label}</option>",
            label = escape(category.label())
        );
    }

    format!(
        "<form class=\"game-form\" method=\"post\" action=\"{action}\">\
           <input name=\"title\" placeholder=\"Title\" value=\"{title}\"{required} />\
           <select name=\"category\"{required}>{options}</select>\
           <textarea name=\"description\" rows=\"3\" placeholder=\"Description\"{required}>{description}</textarea>\
           <input name=\"image\" type=\"url\" placeholder=\"https://example.com/image.jpg\" value=\"{image}\"{required} />\
           <input name=\"downloadLink\" type=\"url\" placeholder=\"https://example.com/download\" value=\"{link}\"{required} />\
           <button type=\"submit\">{submit}</button>\
         </form>",
        action = escape(action),
        title = value(|g| g.title.as_str()),
        description = value(|g| g.description.as_str()),
        image = value(|g| g.image.as_str()),
        link = value(|g| g.download_link.as_str()),
    )
}

fn layout(title: &str, ctx: &PageContext, body: &str) -> String {
    let mut nav = String::from("<a href=\"/\">Home</a>");
    if ctx.is_admin {
        nav.push_str(
            "<a href=\"/admin\">Admin</a><a href=\"/stats\">Stats</a>\
             <form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>",
        );
    } else {
        nav.push_str("<a href=\"/login\">Admin login</a>");
    }

    let mut notices = String::new();
    for notice in &ctx.notices {
        let _ = write!(
            notices,
            "<div class=\"notice {}\"><strong>{}</strong><span>{}</span></div>",
            notice.level.css_class(),
            escape(&notice.title),
            escape(&notice.description)
        );
    }

    let title = escape(title);
    let games = ctx.total_games.to_string();
    let downloads = ctx.total_downloads.to_string();
    fill(
        LAYOUT_HTML,
        &[
            ("TITLE", title.as_str()),
            ("GAMES", games.as_str()),
            ("DOWNLOADS", downloads.as_str()),
            ("NAV", nav.as_str()),
            ("NOTICES", notices.as_str()),
            ("BODY", body),
        ],
    )
}

/// Substitutes `{{NAME}}` slots of `template` in one pass. Substituted text
/// is never scanned again; unknown slots are left as written.
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let slot = after.find("}}").and_then(|end| {
            slots
                .iter()
                .find(|(name, _)| *name == &after[..end])
                .map(|(_, value)| (end, *value))
        });
        match slot {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: #0b0b10;
      --panel: #1f2937;
      --border: #374151;
      --ink: #f5f5f7;
      --muted: #9ca3af;
      --accent: #a855f7;
      --accent-2: #ec4899;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, #111827, var(--bg) 50%, #111827);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
      padding: 16px 32px;
      border-bottom: 1px solid var(--border);
    }

    header nav {
      display: flex;
      gap: 12px;
      align-items: center;
    }

    a {
      color: var(--ink);
    }

    main {
      width: min(1100px, 100%);
      margin: 0 auto;
      padding: 32px 18px 48px;
      display: grid;
      gap: 24px;
    }

    .brand {
      font-weight: 700;
      font-size: 1.4rem;
      background: linear-gradient(90deg, var(--accent), var(--accent-2));
      -webkit-background-clip: text;
      color: transparent;
    }

    .badge, .chip {
      display: inline-block;
      padding: 2px 10px;
      border-radius: 999px;
      border: 1px solid var(--border);
      color: var(--muted);
      text-decoration: none;
    }

    .chip.active {
      background: linear-gradient(90deg, var(--accent), var(--accent-2));
      color: white;
    }

    .filters {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      align-items: center;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
      gap: 20px;
    }

    .game, .card, .tile {
      background: var(--panel);
      border: 1px solid var(--border);
      border-radius: 16px;
      padding: 16px;
    }

    .game img, .details img {
      width: 100%;
      border-radius: 12px;
    }

    .details {
      display: grid;
      grid-template-columns: minmax(0, 1fr) minmax(0, 1fr);
      gap: 24px;
    }

    .tiles {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 16px;
    }

    .tile strong {
      display: block;
      font-size: 1.8rem;
    }

    .notice {
      display: grid;
      gap: 4px;
      padding: 12px 16px;
      border-radius: 12px;
      border: 1px solid var(--border);
    }

    .notice-success {
      background: rgba(34, 197, 94, 0.15);
    }

    .notice-error {
      background: rgba(239, 68, 68, 0.15);
    }

    .game-form {
      display: grid;
      gap: 10px;
    }

    input, select, textarea {
      background: #111827;
      color: var(--ink);
      border: 1px solid var(--border);
      border-radius: 8px;
      padding: 8px;
    }

    button, .button {
      border: none;
      border-radius: 10px;
      padding: 8px 16px;
      color: white;
      background: linear-gradient(90deg, var(--accent), var(--accent-2));
      cursor: pointer;
      text-decoration: none;
    }

    button.danger {
      background: #b91c1c;
    }

    .empty {
      color: var(--muted);
      text-align: center;
    }

    @media (max-width: 720px) {
      .details, .tiles {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <header>
    <a class="brand" href="/">GameHub</a>
    <div><span class="badge">{{GAMES}} games</span> <span class="badge">{{DOWNLOADS}} downloads</span></div>
    <nav>{{NAV}}</nav>
  </header>
  <main>
    <div class="notices">{{NOTICES}}</div>
    {{BODY}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;

    fn game(title: &str) -> GameRecord {
        GameRecord {
            id: "1".into(),
            title: title.to_string(),
            description: "desc".into(),
            image: "https://example.com/i.jpg".into(),
            download_link: "https://example.com/d".into(),
            category: Category::Fps,
            clicks: 12,
            date_added: Utc::now(),
        }
    }

    #[test]
    fn titles_are_escaped() {
        let record = game("<script>alert(1)</script>");
        let page = render_index(&PageContext::default(), &[&record], CategoryFilter::All);
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>alert"));
    }

    #[test]
    fn empty_catalog_message_differs_from_empty_filter() {
        let ctx = PageContext::default();
        let page = render_index(&ctx, &[], CategoryFilter::Only(Category::Rpg));
        assert!(page.contains("No games registered yet"));

        let ctx = PageContext {
            total_games: 3,
            ..PageContext::default()
        };
        let page = render_index(&ctx, &[], CategoryFilter::Only(Category::Rpg));
        assert!(page.contains("No games found in this category"));
    }

    #[test]
    fn placeholder_text_in_data_is_not_substituted() {
        let page = render_details(&PageContext::default(), &game("{{NAV}}"));
        assert!(page.contains("<title>{{NAV}}</title>"));
        assert_eq!(page.matches("href=\"/login\"").count(), 1);

        let ctx = PageContext {
            notices: vec![Notice {
                level: crate::notify::NoticeLevel::Success,
                title: "Game added".into(),
                description: "{{BODY}} was added to the library.".into(),
            }],
            ..PageContext::default()
        };
        let page = render_restricted(&ctx);
        assert!(page.contains("<span>{{BODY}} was added to the library.</span>"));
        assert_eq!(page.matches(RESTRICTED_MESSAGE).count(), 1);
    }

    #[test]
    fn fill_leaves_unknown_slots() {
        assert_eq!(fill("a {{X}} b {{Y}} {{", &[("X", "{{Y}}")]), "a {{Y}} b {{Y}} {{");
    }

    #[test]
    fn restricted_page_hides_admin_links() {
        let page = render_restricted(&PageContext::default());
        assert!(page.contains(RESTRICTED_MESSAGE));
        assert!(!page.contains("href=\"/admin\""));
    }
}
