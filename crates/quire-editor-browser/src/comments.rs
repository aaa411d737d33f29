//! Markup for the comments list and like buttons.
//!
//! Everything the server sends is escaped before it reaches `innerHTML`.

use markdown_weaver_escape::escape_html;
use quire_common::Comment;
use quire_common::ids::last_segment;

pub const DEFAULT_AVATAR: &str = "/static/avatar.jpg";
pub const NO_COMMENTS_HTML: &str = "<p>No comments yet.</p>";
pub const LOAD_FAILED_HTML: &str = "<p>Could not load comments.</p>";

/// Class of a comment's like button.
pub const LIKE_BUTTON_CLASS: &str = "comment-action-btn";
/// Class of the count label inside a like button.
pub const LIKE_COUNT_CLASS: &str = "like-count";

fn push_escaped(out: &mut String, text: &str) {
    // Writing into a String cannot fail.
    let _ = escape_html(&mut *out, text);
}

pub fn like_label(count: u64) -> String {
    format!("{count} Likes")
}

/// Label of an entry's like button in the feed: `1 Like`, `N Likes`.
pub fn entry_like_label(count: u64) -> String {
    if count == 1 {
        "1 Like".to_string()
    } else {
        format!("{count} Likes")
    }
}

/// Count shown in a like label. Reads leading digits only; anything else is 0.
pub fn parse_like_label(label: &str) -> u64 {
    let trimmed = label.trim_start();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().unwrap_or(0)
}

/// The label after one more like, in the style `format` gives.
pub fn next_like_label<F: Fn(u64) -> String>(label: &str, format: F) -> String {
    format(parse_like_label(label).saturating_add(1))
}

/// One comment box. `date` is the already formatted publication time.
pub fn comment_html(comment: &Comment, date: &str) -> String {
    let avatar = comment
        .author
        .profile_image
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_AVATAR);

    let mut out = String::with_capacity(512);
    out.push_str(r#"<div class="comment-box"><div class="comment-avatar"><img src=""#);
    push_escaped(&mut out, avatar);
    out.push_str(r#"" alt="Avatar"></div><div class="comment-content"><div class="comment-author">"#);
    push_escaped(&mut out, &comment.author.display_name);
    out.push_str(r#"</div><span class="comment-date">"#);
    push_escaped(&mut out, date);
    out.push_str(r#"</span><div class="comment-text">"#);
    push_escaped(&mut out, &comment.comment);
    out.push_str(r#"</div><div class="comment-actions"><button class=""#);
    out.push_str(LIKE_BUTTON_CLASS);
    out.push_str(r#"" data-comment-id=""#);
    push_escaped(&mut out, &comment.id);
    out.push_str(r#"" data-author-id=""#);
    push_escaped(&mut out, last_segment(&comment.author.id));
    out.push_str(r#""><span class="action-icon">❤️</span><span class="action-text "#);
    out.push_str(LIKE_COUNT_CLASS);
    out.push_str(r#"">"#);
    out.push_str(&like_label(comment.likes.count));
    out.push_str("</span></button></div></div></div>");
    out
}

/// The whole comments section, or the empty-state message.
pub fn comments_html<F>(comments: &[Comment], format_date: F) -> String
where
    F: Fn(&str) -> String,
{
    if comments.is_empty() {
        return NO_COMMENTS_HTML.to_string();
    }
    comments
        .iter()
        .map(|c| comment_html(c, &format_date(c.published.as_deref().unwrap_or_default())))
        .collect()
}
