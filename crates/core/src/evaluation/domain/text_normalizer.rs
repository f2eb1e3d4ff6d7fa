use unicode_normalization::UnicodeNormalization;

/// Sentence-terminal and Latin punctuation ignored when comparing speech.
const IGNORED_PUNCTUATION: &[char] = &['。', '、', '！', '？', '!', '?', '.', ','];

/// Canonicalizes text for fair comparison of expected and spoken lines.
///
/// Only used for scoring; normalized text is never shown to the learner.
pub struct TextNormalizer;

impl TextNormalizer {
    /// Compatibility-normalize (NFKC), drop parenthesized reading glosses,
    /// drop ignored punctuation, collapse whitespace, lowercase and trim.
    pub fn normalize(text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let composed: String = text.nfkc().collect();
        let without_glosses = strip_glosses(&composed);
        let without_punctuation: String = without_glosses
            .chars()
            .filter(|c| !IGNORED_PUNCTUATION.contains(c))
            .collect();
        let collapsed = collapse_whitespace(&without_punctuation);

        collapsed.to_lowercase().trim().to_string()
    }
}

/// Remove every `(...)` span, parentheses included. Each span closes at the
/// first `)` after its opening `(`; an opening parenthesis that is never
/// closed is kept as-is.
fn strip_glosses(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        match rest[open + 1..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + 1 + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", "")]
    #[case::reading_gloss("元気(げんき)ですか？", "元気ですか")]
    #[case::fullwidth_gloss("元気（げんき）です", "元気です")]
    #[case::several_glosses("今日(きょう)は天気(てんき)", "今日は天気")]
    #[case::japanese_punctuation("はい、元気です。", "はい元気です")]
    #[case::fullwidth_marks("本当！？", "本当")]
    #[case::latin("Hello, World!", "hello world")]
    #[case::whitespace_runs("  a \t\n b  ", "a b")]
    #[case::ideographic_space("はい\u{3000}そう", "はい そう")]
    #[case::fullwidth_latin("ＡＢＣ", "abc")]
    #[case::halfwidth_kana("ｶﾞｯｺｳ", "ガッコウ")]
    #[case::unclosed_paren("元気(げんき", "元気(げんき")]
    #[case::nested_parens("a((b))c", "a)c")]
    #[case::gloss_leaves_gap("a (x) b", "a b")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(TextNormalizer::normalize(input), expected);
    }

    #[rstest]
    #[case("元気(げんき)ですか？ はい、元気です！")]
    #[case("  Hello,   World!! (aside)  ")]
    #[case("a((b))c")]
    #[case("(a\nb) c")]
    #[case("ＡＢＣ　ｄｅｆ")]
    #[case("x ( y ) ( z")]
    #[case("ﾊﾟﾝ(ぱん)")]
    fn test_normalize_is_idempotent(#[case] input: &str) {
        let once = TextNormalizer::normalize(input);
        assert_eq!(TextNormalizer::normalize(&once), once);
    }

    #[test]
    fn test_gloss_spanning_lines_is_removed() {
        assert_eq!(TextNormalizer::normalize("(a\nb) c"), "c");
    }
}
