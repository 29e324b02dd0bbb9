//! Text transforms for user supplied content.
//!
//! These run outside the parse pipeline. Applications call them on post bodies,
//! comments and similar text before handing it to a view.
use once_cell::sync::Lazy;
use regex::Regex;

static BBCODE: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?is)\[b\](.*?)\[/b\]", "<b>$1</b>"),
        (r"(?is)\[p\](.*?)\[/p\]", "<p>$1</p>"),
        (r"(?is)\[i\](.*?)\[/i\]", "<i>$1</i>"),
        (r"(?is)\[u\](.*?)\[/u\]", "<u>$1</u>"),
        (r"(?is)\[s\](.*?)\[/s\]", "<del>$1</del>"),
        (r"(?is)\[code\](.*?)\[/code\]", "<code>$1</code>"),
        (r"(?is)\[color=(.*?)\](.*?)\[/color\]", "<font color='$1'>$2</font>"),
        (r"(?is)\[img\](.*?)\[/img\]", "<img src='$1'>"),
        (r"(?i)\(c\)", "&#10004;"),
        (r"(?i)\(x\)", "&#10006;"),
        (r"\(!\)", "&#10069;"),
        (r"\(\?\)", "&#10068;"),
        (r"(?is)\[list\](.*?)\[/list\]", "<ul>$1</ul>"),
        (r"(?m)\(\.\)(.*)$", "<li>$1</li>"),
        (r"(?is)\[url=(.*?)\](.*?)\[/url\]", "<a href='$1'>$2</a>"),
        (r"(?is)\[quote=(.*?)\](.*?)\[/quote\]", "<blockquote cite='$1'>$2</blockquote>"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (Regex::new(pattern).expect("bbcode pattern is valid"), replacement)
    })
    .collect()
});

static MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\s)@(\w*[a-zA-Z_]+\w*)").expect("mention pattern is valid"));
static HASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\s)#(\w*[a-zA-Z_]+\w*)").expect("hashtag pattern is valid"));
static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"));
// A `//` right after `:` belongs to a URL scheme.
static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^:])//.*").expect("line comment pattern is valid"));

/// Convert BBCode markup into HTML.
///
/// Supports `[b]`, `[p]`, `[i]`, `[u]`, `[s]`, `[code]`, `[color=..]`, `[img]`,
/// `[list]` with `(.)` items, `[url=..]` and `[quote=..]`, along with the
/// `(c)`, `(x)`, `(!)` and `(?)` glyphs.
///
/// # Examples
///
/// ```
/// use tempus::markup::bbcode;
///
/// assert_eq!(
///     bbcode("[b]bold[/b] and [url=/about]us[/url]"),
///     "<b>bold</b> and <a href='/about'>us</a>"
/// );
/// ```
pub fn bbcode(text: &str) -> String {
    BBCODE
        .iter()
        .fold(text.to_string(), |text, (pattern, replacement)| {
            pattern.replace_all(&text, *replacement).into_owned()
        })
}

/// Link `@name` mentions to `link` followed by the name.
pub fn mentions(text: &str, link: &str) -> String {
    link_words(&MENTION, '@', text, link)
}

/// Link `#tag` hashtags to `link` followed by the tag.
pub fn hashtags(text: &str, link: &str) -> String {
    link_words(&HASHTAG, '#', text, link)
}

fn link_words(pattern: &Regex, sigil: char, text: &str, link: &str) -> String {
    let link = link.replace('$', "$$");
    let replacement = format!(r#"${{1}}<a href="{link}${{2}}">{sigil}${{2}}</a>"#);

    pattern.replace_all(text, replacement.as_str()).into_owned()
}

/// Remove `/* block */` and `// line` comments.
pub fn strip_comments(text: &str) -> String {
    let text = BLOCK_COMMENT.replace_all(text, "");

    LINE_COMMENT.replace_all(&text, "${1}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbcode() {
        assert_eq!(
            bbcode("[B]x[/b] [color=red]y[/color] [img]/a.png[/img] [s]z[/s]"),
            "<b>x</b> <font color='red'>y</font> <img src='/a.png'> <del>z</del>"
        );
        assert_eq!(bbcode("done (c) failed (X) (!) (?)"), "done &#10004; failed &#10006; &#10069; &#10068;");
    }

    #[test]
    fn test_bbcode_list() {
        assert_eq!(
            bbcode("[list]\n(.)one\n(.)two\n[/list]"),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>"
        );
    }

    #[test]
    fn test_bbcode_quote() {
        assert_eq!(
            bbcode("[quote=taylor]\nhello\n[/quote]"),
            "<blockquote cite='taylor'>\nhello\n</blockquote>"
        );
    }

    #[test]
    fn test_mentions() {
        assert_eq!(
            mentions("@taylor hi @sam, mail a@b.c", "/users/"),
            "<a href=\"/users/taylor\">@taylor</a> hi <a href=\"/users/sam\">@sam</a>, mail a@b.c"
        );
    }

    #[test]
    fn test_hashtags() {
        assert_eq!(
            hashtags("new #rust_lang post, not#this or #123", "/tags/"),
            "new <a href=\"/tags/rust_lang\">#rust_lang</a> post, not#this or #123"
        );
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(
            strip_comments("a /* gone\nhere */b // note\nhttp://example.com // more"),
            "a b \nhttp://example.com "
        );
        assert_eq!(strip_comments("// whole line\nkeep"), "\nkeep");
    }
}
