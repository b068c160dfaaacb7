use sn_core::Article;

const SUMMARY_PREVIEW_LEN: usize = 300;
const ADMIN_MESSAGE_LEN: usize = 200;
const READ_MORE: &str = "Читать полностью";
const TRANSLATED_NOTE: &str = "_Переведено с английского_";

fn source_label(source: &str) -> String {
    let label = match source {
        "TheHackerNews" => "🇺🇸 The Hacker News",
        "BleepingComputer" => "💻 BleepingComputer",
        "SecurityWeek" => "🔒 SecurityWeek",
        "InfoSecurity Magazine" => "📊 InfoSecurity Magazine",
        "KrebsOnSecurity" => "🔍 Krebs on Security",
        "DarkReading" => "🌐 Dark Reading",
        "Threatpost" => "⚠️ Threatpost",
        "CSOOnline" => "👔 CSO Online",
        "SecurityAffairs" => "🛡️ Security Affairs",
        other => return format!("📰 {}", escape_markdown(other)),
    };
    label.to_string()
}

/// Escapes the characters legacy Telegram Markdown treats as markup.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Legacy Markdown has no escapes inside an entity, so markup characters are
/// dropped from text that goes between `*` and brackets become parentheses.
fn entity_text(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '_' | '*' | '`'))
        .map(|c| match c {
            '[' => '(',
            ']' => ')',
            other => other,
        })
        .collect()
}

fn truncate_chars(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

/// Renders an article as a Markdown chat message.
pub fn format_article(article: &Article) -> String {
    let mut text = format!("📰 *{}*\n\n", entity_text(&article.title));

    if let Some(summary) = article.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        text.push_str(&escape_markdown(&truncate_chars(summary, SUMMARY_PREVIEW_LEN)));
        text.push_str("\n\n");
    }

    if !article.source.is_empty() {
        text.push_str(&format!("📍 {}\n", source_label(&article.source)));
    }
    if let Some(published_at) = article.published_at {
        text.push_str(&format!("📅 {}\n", published_at.format("%d.%m.%Y %H:%M")));
    }
    text.push_str(&format!("🔗 [{}]({})", READ_MORE, article.url));

    if article.title_translated != article.title_original {
        text.push_str("\n\n");
        text.push_str(TRANSLATED_NOTE);
    }
    text
}

pub fn admin_notification(message: &str) -> String {
    format!(
        "⚙️ *System notification*\n\n{}",
        escape_markdown(&truncate_chars(message, ADMIN_MESSAGE_LEN))
    )
}
