// src/checker/text.rs
// =============================================================================
// This module turns raw HTML into the plain text a visitor would read.
//
// It is NOT a real HTML parser. It is a small set of regex passes that run
// in a fixed order:
// 1. Drop <script>...</script> blocks (tags AND content)
// 2. Drop <style>...</style> blocks (tags AND content)
// 3. Turn &nbsp; &amp; &quot; &lt; &gt; into a single space
// 4. Turn every remaining <...> tag into a single space
// 5. Collapse whitespace runs into one space and trim the ends
//
// The keyword check runs on this output, so the order matters: if tags were
// stripped before scripts, the script bodies would leak into the text.
//
// Rust concepts:
// - LazyLock: Compile each regex once, the first time it is used
// - Cow<str>: Regex::replace_all only allocates when something matched
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

// (?is) = case-insensitive, and '.' also matches newlines
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex"));

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"));

// Only these five named entities, and only in lower case
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(nbsp|amp|quot|lt|gt);").expect("valid regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

// Extracts the visible text from an HTML document
//
// Parameters:
//   html: the raw markup (borrowed, we never modify the caller's string)
//
// Returns: the text with markup removed and whitespace collapsed
//
// Example:
//   "<p>Hello <b>World</b></p>" -> "Hello World"
pub fn extract_text(html: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(html, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = ENTITY.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");

    text.trim().to_string()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why .expect() on Regex::new?
//    - The patterns are constants written by us, not user input
//    - If one is invalid that is a programmer error, caught by the tests
//
// 2. Why does each line shadow `text`?
//    - replace_all borrows its input and returns a new Cow<str>
//    - Rebinding the name lets each pass feed the next one
//
// 3. What does *? mean in ".*?"?
//    - It is a lazy match: it stops at the FIRST </script>
//    - A greedy ".*" would swallow everything up to the LAST </script>
// -----------------------------------------------------------------------------
